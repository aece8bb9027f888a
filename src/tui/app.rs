use std::path::PathBuf;

use crate::api::ImageGenerator;
use crate::config::Config;
use crate::core::prompt::edit_suggestions;
use crate::core::{
    AssetType, BrandField, Finish, GeneratedAsset, GenerationMode, ImageData, SlotStatus, StudioError,
};
use crate::imaging::{self, SampleImage};
use crate::session::Session;
use crate::studio::Studio;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Main view (generate / gallery / chat panels)
    Main,
    /// Text input mode
    Input(InputTarget),
    /// Brand form
    Brand,
    /// Key reference
    Help,
}

/// What the input line is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    UploadPath,
    ChatInstruction,
    /// Background edit for a product-lock result slot
    PlateInstruction(usize),
}

impl InputTarget {
    pub fn title(&self) -> &'static str {
        match self {
            InputTarget::UploadPath => "Product image path, PNG or JPG (Enter to upload, Esc to cancel)",
            InputTarget::ChatInstruction => {
                "Edit instruction (Enter to apply, Tab for ideas, Esc to cancel)"
            }
            InputTarget::PlateInstruction(_) => {
                "Background edit, the product stays as photographed (Enter to apply, Esc to cancel)"
            }
        }
    }
}

/// Panel shown in main mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Generate,
    Gallery,
    Chat,
}

impl View {
    pub fn all() -> &'static [View] {
        &[View::Generate, View::Gallery, View::Chat]
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Generate => "Generate",
            View::Gallery => "Gallery",
            View::Chat => "Chat Edit",
        }
    }

    pub fn next(&self) -> View {
        match self {
            View::Generate => View::Gallery,
            View::Gallery => View::Chat,
            View::Chat => View::Generate,
        }
    }

    pub fn previous(&self) -> View {
        match self {
            View::Generate => View::Chat,
            View::Gallery => View::Generate,
            View::Chat => View::Gallery,
        }
    }
}

/// Work queued by a key press, run after the next draw so the UI shows
/// what is happening while the call is awaited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Upload(PathBuf),
    GenerateAll,
    Chat(String),
    PlateEdit(usize, String),
    SuggestStyles,
}

impl PendingAction {
    pub fn describe(&self) -> String {
        match self {
            PendingAction::Upload(path) => format!("Loading {}...", path.display()),
            PendingAction::GenerateAll => "Starting generation...".to_string(),
            PendingAction::Chat(instruction) => format!("Applying edit: {}...", instruction),
            PendingAction::PlateEdit(_, instruction) => {
                format!("Editing background: {}...", instruction)
            }
            PendingAction::SuggestStyles => "Asking for style suggestions...".to_string(),
        }
    }
}

/// TUI application state
pub struct App<G: ImageGenerator> {
    /// Current mode
    pub mode: AppMode,

    /// Current panel
    pub view: View,

    /// Configuration
    pub config: Config,

    /// Generation pipeline
    pub studio: Studio<G>,

    /// Everything the user has produced this session
    pub session: Session,

    /// Bundled sample products
    pub samples: Vec<SampleImage>,

    /// Current input line
    pub input: String,

    /// Cursor position in input, in chars
    pub cursor_pos: usize,

    /// Cursor in the asset type list
    pub selected_asset: usize,

    /// Cursor in the gallery
    pub selected_gallery: usize,

    /// Cursor in the chat history
    pub selected_chat: usize,

    /// Next edit idea offered by Tab
    pub suggestion_index: usize,

    /// Brand form: selected field index
    pub brand_selected: usize,

    /// Brand form: currently editing
    pub brand_editing: bool,

    /// Brand form: edit buffer
    pub brand_edit_buffer: String,

    /// Action to run after the next draw
    pub pending: Option<PendingAction>,

    /// Next slot of a running batch
    pub batch_next: Option<usize>,

    /// Image to show full screen after the next draw
    pub preview: Option<ImageData>,

    /// Status message
    pub status_message: Option<String>,

    /// Error message
    pub error_message: Option<String>,

    /// Whether to quit
    pub should_quit: bool,

    /// Whether config was changed
    pub config_changed: bool,
}

impl<G: ImageGenerator> App<G> {
    pub fn new(config: Config, studio: Studio<G>, samples: Vec<SampleImage>) -> Self {
        let session = Session::from_config(&config);
        Self {
            mode: AppMode::Main,
            view: View::Generate,
            config,
            studio,
            session,
            samples,
            input: String::new(),
            cursor_pos: 0,
            selected_asset: 0,
            selected_gallery: 0,
            selected_chat: 0,
            suggestion_index: 0,
            brand_selected: 0,
            brand_editing: false,
            brand_edit_buffer: String::new(),
            pending: None,
            batch_next: None,
            preview: None,
            status_message: None,
            error_message: None,
            should_quit: false,
            config_changed: false,
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.error_message = None;
    }

    /// Set error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
        self.status_message = None;
    }

    /// Show a studio error in the status bar
    pub fn report(&mut self, err: &StudioError) {
        tracing::debug!("{:?}", err);
        self.set_error(err.user_message());
    }

    /// Clear messages
    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }

    /// A call is queued or in flight; key presses wait
    pub fn busy(&self) -> bool {
        self.pending.is_some() || self.batch_next.is_some()
    }

    /// Queue work and say so in the status bar
    pub fn queue(&mut self, action: PendingAction) {
        self.set_status(action.describe());
        self.pending = Some(action);
    }

    pub fn cursor_asset(&self) -> AssetType {
        let all = AssetType::all();
        all[self.selected_asset.min(all.len() - 1)]
    }

    /// Result slot index for the asset type under the cursor
    pub fn cursor_result(&self) -> Option<usize> {
        let asset_type = self.cursor_asset();
        self.session
            .results
            .iter()
            .position(|s| s.asset_type == asset_type)
    }

    pub fn selected_gallery_asset(&self) -> Option<&GeneratedAsset> {
        self.session.gallery.get(self.selected_gallery)
    }

    /// Move selection up in the current panel
    pub fn select_previous(&mut self) {
        let cursor = match self.view {
            View::Generate => &mut self.selected_asset,
            View::Gallery => &mut self.selected_gallery,
            View::Chat => &mut self.selected_chat,
        };
        *cursor = cursor.saturating_sub(1);
    }

    /// Move selection down in the current panel
    pub fn select_next(&mut self) {
        let len = match self.view {
            View::Generate => AssetType::all().len(),
            View::Gallery => self.session.gallery.len(),
            View::Chat => self.session.chat_history.len(),
        };
        let cursor = match self.view {
            View::Generate => &mut self.selected_asset,
            View::Gallery => &mut self.selected_gallery,
            View::Chat => &mut self.selected_chat,
        };
        if *cursor < len.saturating_sub(1) {
            *cursor += 1;
        }
    }

    pub fn enter_input(&mut self, target: InputTarget) {
        self.mode = AppMode::Input(target);
        self.input.clear();
        self.cursor_pos = 0;
        self.clear_messages();
    }

    /// Replace the input with the next edit idea for this product
    pub fn cycle_edit_suggestion(&mut self) {
        let ideas = edit_suggestions(&self.session.brand.product_kind());
        if ideas.is_empty() {
            return;
        }
        let idea = ideas[self.suggestion_index % ideas.len()];
        self.suggestion_index += 1;
        self.input = idea.to_string();
        self.cursor_pos = self.input.chars().count();
    }

    pub fn cycle_style(&mut self) {
        self.session.style = self.session.style.next();
        self.set_status(format!(
            "Style: {} - {}",
            self.session.style,
            self.session.style.description()
        ));
    }

    pub fn toggle_brand_text(&mut self) {
        self.session.ensure_brand_text = !self.session.ensure_brand_text;
        let state = if self.session.ensure_brand_text { "on" } else { "off" };
        self.set_status(format!("Ensure brand text visible: {}", state));
    }

    pub fn toggle_mode(&mut self) {
        self.session.mode = self.session.mode.next();
        let detail = match self.session.mode {
            GenerationMode::Scene => "the model re-stages the product",
            GenerationMode::ProductLock => "background plate + your exact product photo",
        };
        self.set_status(format!("Mode: {} ({})", self.session.mode, detail));
    }

    /// Open the background edit line for the product-lock result under the cursor
    pub fn start_plate_edit(&mut self) {
        let plate = self
            .cursor_result()
            .and_then(|i| self.session.results[i].asset.as_ref().map(|a| (i, a.plate.is_some())));
        match plate {
            Some((index, true)) => self.enter_input(InputTarget::PlateInstruction(index)),
            Some((_, false)) => {
                self.set_error("Background edits need a product-lock result (m switches mode)")
            }
            None => self.set_error(format!("No result for {} yet", self.cursor_asset())),
        }
    }

    /// Change the finish of the result under the cursor
    fn refinish_cursor(&mut self, change: impl FnOnce(Finish) -> Finish) {
        let current = self
            .cursor_result()
            .and_then(|i| self.session.results[i].asset.as_ref().map(|a| (i, a.finish)));
        let Some((index, finish)) = current else {
            self.set_error(format!("No result for {} yet", self.cursor_asset()));
            return;
        };
        let finish = change(finish);
        match self.studio.refinish(&mut self.session, index, finish) {
            Ok(()) => self.set_status(format!(
                "{}: crop {}, overlay {}",
                self.session.results[index].asset_type,
                finish.aspect,
                if finish.overlay { "on" } else { "off" }
            )),
            Err(e) => self.report(&e),
        }
    }

    pub fn toggle_cursor_overlay(&mut self) {
        self.refinish_cursor(|f| Finish {
            overlay: !f.overlay,
            ..f
        });
    }

    pub fn cycle_cursor_crop(&mut self) {
        self.refinish_cursor(|f| Finish {
            aspect: f.aspect.next(),
            ..f
        });
    }

    /// Switch the overlay text color and redraw every result that has one
    pub fn cycle_overlay_color(&mut self) {
        self.session.overlay_color = self.session.overlay_color.next();
        let overlaid: Vec<(usize, Finish)> = self
            .session
            .results
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.asset.as_ref().map(|a| (i, a.finish)))
            .filter(|(_, finish)| finish.overlay)
            .collect();
        for (index, finish) in overlaid {
            if let Err(e) = self.studio.refinish(&mut self.session, index, finish) {
                self.report(&e);
                return;
            }
        }
        self.set_status(format!("Overlay text color: {}", self.session.overlay_color));
    }

    pub fn toggle_cursor_asset(&mut self) {
        let asset_type = self.cursor_asset();
        let selected = self.session.toggle_asset(asset_type);
        let verb = if selected { "Selected" } else { "Deselected" };
        self.set_status(format!("{} {}", verb, asset_type));
    }

    /// Load bundled sample `n` (1-based)
    pub async fn load_sample(&mut self, n: usize) {
        let Some(sample) = n.checked_sub(1).and_then(|i| self.samples.get(i)) else {
            self.set_error(format!("No sample {}", n));
            return;
        };
        let path = sample.path.clone();
        self.upload(path).await;
    }

    pub async fn upload(&mut self, path: PathBuf) {
        match imaging::load_upload_file(&path).await {
            Ok(product) => {
                let info = product.info.clone();
                let name = product.name.clone();
                self.session.set_product(product);
                self.set_status(format!(
                    "Loaded {}: {}x{} {} {} ({})",
                    name, info.width, info.height, info.format, info.file_size, info.aspect_ratio
                ));
            }
            Err(e) => self.report(&e),
        }
    }

    /// Save the result under the cursor to the gallery
    pub fn save_cursor_result(&mut self) {
        let Some(index) = self.cursor_result() else {
            self.set_error(format!("No result for {} yet", self.cursor_asset()));
            return;
        };
        if self.session.results[index].saved {
            self.set_status("Already saved to gallery");
            return;
        }
        match self.session.save_to_gallery(index) {
            Ok(gallery_index) => {
                self.selected_gallery = gallery_index;
                self.set_status(format!(
                    "Saved {} to gallery ({} items)",
                    self.session.results[index].asset_type,
                    self.session.gallery.len()
                ));
            }
            Err(e) => self.report(&e),
        }
    }

    /// Save the selected chat result to the gallery
    pub fn save_chat_result(&mut self) {
        match self.session.save_chat_result(self.selected_chat) {
            Ok(gallery_index) => {
                self.selected_gallery = gallery_index;
                self.set_status(format!(
                    "Saved edit to gallery ({} items)",
                    self.session.gallery.len()
                ));
            }
            Err(e) => self.report(&e),
        }
    }

    /// Use the selected gallery image as the chat target
    pub fn target_selected_for_chat(&mut self) {
        match self.session.select_for_chat(self.selected_gallery) {
            Ok(()) => {
                self.view = View::Chat;
                self.set_status("Image selected for editing. Press i to describe a change");
            }
            Err(e) => self.report(&e),
        }
    }

    /// The image the current panel points at, if any
    pub fn focused_asset(&self) -> Option<GeneratedAsset> {
        match self.view {
            View::Generate => self
                .cursor_result()
                .and_then(|i| self.session.results[i].asset.clone()),
            View::Gallery => self.selected_gallery_asset().cloned(),
            View::Chat => self
                .session
                .chat_history
                .get(self.selected_chat)
                .map(|turn| turn.to_asset()),
        }
    }

    /// Write the focused image to the output directory
    pub async fn export_focused(&mut self) {
        let Some(asset) = self.focused_asset() else {
            self.set_error("Nothing to export here");
            return;
        };
        match imaging::export_asset(&asset, &self.config.output_dir()).await {
            Ok(path) => self.set_status(format!("Exported to {}", path.display())),
            Err(e) => self.report(&e),
        }
    }

    pub fn preview_focused(&mut self) {
        match self.focused_asset() {
            Some(asset) => self.preview = Some(asset.image),
            None => self.set_error("Nothing to preview here"),
        }
    }

    pub fn clear_cache(&mut self) {
        self.session.clear_cache();
        self.selected_gallery = 0;
        self.selected_chat = 0;
        self.set_status("Cleared results, gallery and chat history");
    }

    pub fn reset(&mut self) {
        self.session.reset(&self.config);
        self.selected_asset = 0;
        self.selected_gallery = 0;
        self.selected_chat = 0;
        self.view = View::Generate;
        self.set_status("Session reset");
    }

    /// Current brand form value
    pub fn brand_value(&self, field: BrandField) -> String {
        self.session.brand.get(field)
    }

    /// Store the session's brand as the default for new sessions
    pub fn save_brand_defaults(&mut self) {
        self.config.brand = self.session.brand.clone();
        self.config.studio.style_preset = self.session.style;
        self.config.studio.ensure_brand_text = self.session.ensure_brand_text;
        self.config.studio.mode = self.session.mode;
        self.config.studio.overlay_color = self.session.overlay_color;
        self.config_changed = true;
        self.set_status("Brand saved as default");
    }

    /// Run queued work: one batch slot, or one pending action
    pub async fn step(&mut self) {
        if let Some(index) = self.batch_next {
            self.run_batch_slot(index).await;
            return;
        }

        let Some(action) = self.pending.take() else {
            return;
        };
        match action {
            PendingAction::Upload(path) => self.upload(path).await,
            PendingAction::GenerateAll => match self.session.begin_batch() {
                Ok(count) => {
                    self.batch_next = Some(0);
                    self.view = View::Generate;
                    self.set_status(format!("Generating 1/{}...", count));
                }
                Err(e) => self.report(&e),
            },
            PendingAction::Chat(instruction) => {
                match self.studio.chat_edit(&mut self.session, &instruction).await {
                    Ok(index) => {
                        self.selected_chat = index;
                        self.set_status("Edit applied. w saves it to the gallery");
                    }
                    Err(e) => self.report(&e),
                }
            }
            PendingAction::PlateEdit(index, instruction) => {
                match self.studio.edit_plate(&mut self.session, index, &instruction).await {
                    Ok(()) => self.set_status("Background edited and product re-composited"),
                    Err(e) => self.report(&e),
                }
            }
            PendingAction::SuggestStyles => {
                if self.studio.suggest_styles(&mut self.session).await {
                    self.set_status(format!(
                        "{} style suggestions ready",
                        self.session.style_suggestions.len()
                    ));
                } else {
                    self.set_status("Using default style suggestions");
                }
            }
        }
    }

    async fn run_batch_slot(&mut self, index: usize) {
        if let Err(e) = self.studio.run_slot(&mut self.session, index).await {
            self.batch_next = None;
            self.report(&e);
            return;
        }

        let total = self.session.results.len();
        if index + 1 < total {
            self.batch_next = Some(index + 1);
            self.set_status(format!("Generating {}/{}...", index + 2, total));
            return;
        }

        self.batch_next = None;
        let failed = self
            .session
            .results
            .iter()
            .filter(|s| matches!(s.status, SlotStatus::Failed { .. }))
            .count();
        if failed == 0 {
            self.set_status(format!("Generated {} asset(s). w saves, d exports", total));
        } else {
            self.set_error(format!(
                "Generated {}/{} asset(s); {} failed",
                total - failed,
                total,
                failed
            ));
        }
    }
}
