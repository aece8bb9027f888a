use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::app::{App, AppMode, View};
use crate::api::ImageGenerator;
use crate::core::prompt::edit_suggestions;
use crate::core::{AssetType, BrandField, SlotStatus};
use crate::imaging::format_file_size;

/// Main draw function
pub fn draw<G: ImageGenerator>(frame: &mut Frame, app: &App<G>) {
    match app.mode {
        AppMode::Main | AppMode::Input(_) => draw_main(frame, app),
        AppMode::Brand => draw_brand(frame, app),
        AppMode::Help => draw_help_screen(frame),
    }
}

fn label_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn heading_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn cursor_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn status_color(status: &SlotStatus) -> Color {
    match status {
        SlotStatus::Completed => Color::Green,
        SlotStatus::Failed { .. } => Color::Red,
        SlotStatus::Running => Color::Yellow,
        SlotStatus::Queued => Color::Blue,
    }
}

/// Draw main view
fn draw_main<G: ImageGenerator>(frame: &mut Frame, app: &App<G>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title/product or input
            Constraint::Length(1), // Tabs
            Constraint::Min(10),   // Panel
            Constraint::Length(3), // Status bar
            Constraint::Length(2), // Help line
        ])
        .split(frame.area());

    // Title or input
    if let AppMode::Input(target) = app.mode {
        draw_input(frame, app, target.title(), chunks[0]);
    } else {
        draw_title(frame, app, chunks[0]);
    }

    draw_tabs(frame, app, chunks[1]);

    match app.view {
        View::Generate => draw_generate(frame, app, chunks[2]),
        View::Gallery => draw_gallery(frame, app, chunks[2]),
        View::Chat => draw_chat(frame, app, chunks[2]),
    }

    // Status bar
    draw_status(frame, app, chunks[3]);

    // Help line
    draw_help(frame, app, chunks[4]);
}

fn draw_title<G: ImageGenerator>(frame: &mut Frame, app: &App<G>, area: Rect) {
    let session = &app.session;
    let product = match &session.product {
        Some(p) => Span::styled(
            format!(
                "{} ({}x{}, {}, {})",
                p.name, p.info.width, p.info.height, p.info.format, p.info.file_size
            ),
            Style::default().fg(Color::White),
        ),
        None => Span::styled(
            "no product image - press u to upload or 1-3 for a sample",
            Style::default().fg(Color::DarkGray),
        ),
    };

    let title = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("🍌 ", Style::default()),
            Span::styled(
                "Banana Studio",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" - Product Marketing Assets", label_style()),
        ]),
        Line::from(vec![
            Span::styled("Product: ", label_style()),
            product,
            Span::styled("  Brand: ", label_style()),
            Span::styled(session.brand.display_name(), Style::default().fg(Color::White)),
            Span::styled("  Style: ", label_style()),
            Span::styled(session.style.as_str(), Style::default().fg(Color::Magenta)),
            Span::styled("  Brand text: ", label_style()),
            Span::styled(
                if session.ensure_brand_text { "on" } else { "off" },
                Style::default().fg(Color::White),
            ),
            Span::styled("  Mode: ", label_style()),
            Span::styled(session.mode.as_str(), Style::default().fg(Color::Green)),
            Span::styled("  Overlay: ", label_style()),
            Span::styled(session.overlay_color.as_str(), Style::default().fg(Color::White)),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(title, area);
}

fn draw_input<G: ImageGenerator>(frame: &mut Frame, app: &App<G>, title: &str, area: Rect) {
    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title.to_string()),
        );
    frame.render_widget(input, area);

    // Show cursor
    frame.set_cursor_position((area.x + app.cursor_pos as u16 + 1, area.y + 1));
}

fn draw_tabs<G: ImageGenerator>(frame: &mut Frame, app: &App<G>, area: Rect) {
    let mut spans = Vec::new();
    for view in View::all() {
        let count = match view {
            View::Generate => app.session.results.len(),
            View::Gallery => app.session.gallery.len(),
            View::Chat => app.session.chat_history.len(),
        };
        let style = if *view == app.view {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            label_style()
        };
        spans.push(Span::styled(format!(" {} ({}) ", view.title(), count), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_generate<G: ImageGenerator>(frame: &mut Frame, app: &App<G>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let items: Vec<ListItem> = AssetType::all()
        .iter()
        .enumerate()
        .map(|(i, asset_type)| {
            let d = asset_type.descriptor();
            let check = if app.session.is_selected(*asset_type) { "[x]" } else { "[ ]" };
            let slot = app.session.results.iter().find(|s| s.asset_type == *asset_type);

            let mut spans = vec![
                Span::styled(format!("{} {} ", check, d.icon), Style::default()),
                Span::styled(format!("{:<20}", d.label), cursor_style(i == app.selected_asset)),
                Span::styled(format!("{:<10} {:<5}", d.resolution(), d.aspect_ratio()), label_style()),
            ];
            if let Some(slot) = slot {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    format!("{:<10}", slot.status.name()),
                    Style::default().fg(status_color(&slot.status)),
                ));
                if slot.saved {
                    spans.push(Span::styled("saved", Style::default().fg(Color::Green)));
                }
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let selected = app.session.selected_assets.len();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Asset Types ({} selected)", selected)),
    );
    frame.render_widget(list, columns[0]);

    // Details of the asset type under the cursor
    let asset_type = app.cursor_asset();
    let d = asset_type.descriptor();
    let mut lines = vec![
        Line::from(Span::styled(format!("{} {}", d.icon, d.label), heading_style())),
        Line::from(Span::styled(d.description, Style::default().fg(Color::White))),
        Line::from(vec![
            Span::styled("Size: ", label_style()),
            Span::raw(format!("{} ({})", d.resolution(), d.aspect_ratio())),
        ]),
        Line::from(""),
    ];

    if let Some(slot) = app
        .cursor_result()
        .and_then(|i| app.session.results.get(i))
    {
        lines.push(Line::from(vec![
            Span::styled("Status: ", label_style()),
            Span::styled(slot.status.to_string(), Style::default().fg(status_color(&slot.status))),
        ]));
        if let Some(asset) = &slot.asset {
            lines.push(Line::from(vec![
                Span::styled("Image: ", label_style()),
                Span::raw(format!(
                    "{} {}x{} {}",
                    asset.id,
                    asset.image.width,
                    asset.image.height,
                    format_file_size(asset.image.size_bytes() as u64)
                )),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Finish: ", label_style()),
                Span::raw(format!(
                    "crop {}, overlay {}",
                    asset.finish.aspect,
                    if asset.finish.overlay { "on" } else { "off" }
                )),
            ]));
            if let Some(plate) = &asset.plate {
                lines.push(Line::from(vec![
                    Span::styled("Plate: ", label_style()),
                    Span::raw(format!("{}x{} (p edits the background)", plate.width, plate.height)),
                ]));
            }
        }
        lines.push(Line::from(""));
    }

    if let Some(scene) = app.session.scene_for(asset_type) {
        lines.push(Line::from(vec![
            Span::styled("Scene suggestion: ", heading_style()),
            Span::styled(scene.summary(), label_style()),
        ]));
        for (label, value) in [
            ("Background", &scene.background_tone),
            ("Surface", &scene.surface_type),
            ("Prop", &scene.accent_prop),
            ("Lighting", &scene.lighting),
            ("Camera", &scene.camera_angle),
            ("Text", &scene.suggested_text),
        ] {
            if !value.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {}: ", label), label_style()),
                    Span::raw(value.as_str()),
                ]));
            }
        }
    }

    let details = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });
    frame.render_widget(details, columns[1]);
}

fn draw_gallery<G: ImageGenerator>(frame: &mut Frame, app: &App<G>, area: Rect) {
    let items: Vec<ListItem> = app
        .session
        .gallery
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let target = if app.session.chat_target == Some(i) { " ✎" } else { "" };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>3}. ", i + 1), label_style()),
                Span::styled(
                    format!("{:<20}", asset.asset_type.to_string()),
                    cursor_style(i == app.selected_gallery),
                ),
                Span::styled(format!("{:<12}", asset.id), label_style()),
                Span::raw(format!(
                    "{}x{}  {}",
                    asset.image.width,
                    asset.image.height,
                    asset.created_at.format("%H:%M:%S")
                )),
                Span::styled(target, Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let title = if items.is_empty() {
        "Gallery (empty - press w on a result to save it)".to_string()
    } else {
        format!("Gallery ({})", items.len())
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn draw_chat<G: ImageGenerator>(frame: &mut Frame, app: &App<G>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(5)])
        .split(area);

    let target = match app.session.chat_target() {
        Some((target, asset)) => Line::from(vec![
            Span::styled("Editing: ", label_style()),
            Span::styled(
                format!("#{} {} ({})", target.gallery_index + 1, target.asset_type, asset.id),
                Style::default().fg(Color::White),
            ),
        ]),
        None => Line::from(Span::styled(
            "No image selected - pick one in the Gallery with Enter",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(
        Paragraph::new(target).block(Block::default().borders(Borders::ALL).title("Target")),
        rows[0],
    );

    let items: Vec<ListItem> = app
        .session
        .chat_history
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>3}. ", i + 1), label_style()),
                Span::styled(format!("{:<12}", turn.id), label_style()),
                Span::styled(turn.instruction.as_str(), cursor_style(i == app.selected_chat)),
                Span::styled(
                    format!("  → {} #{}", turn.target.asset_type, turn.target.gallery_index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    let history = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("History ({})", app.session.chat_history.len())),
    );
    frame.render_widget(history, rows[1]);

    let ideas: Vec<Line> = edit_suggestions(&app.session.brand.product_kind())
        .into_iter()
        .take(3)
        .map(|idea| Line::from(Span::styled(format!("• {}", idea), label_style())))
        .collect();
    frame.render_widget(
        Paragraph::new(ideas).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Ideas (Tab while typing for more)"),
        ),
        rows[2],
    );
}

fn draw_status<G: ImageGenerator>(frame: &mut Frame, app: &App<G>, area: Rect) {
    let (message, style) = if let Some(err) = &app.error_message {
        (err.as_str(), Style::default().fg(Color::Red))
    } else if let Some(status) = &app.status_message {
        let color = if app.busy() { Color::Yellow } else { Color::Green };
        (status.as_str(), Style::default().fg(color))
    } else if app.busy() {
        ("Generating...", Style::default().fg(Color::Yellow))
    } else {
        ("Ready", label_style())
    };

    let status = Paragraph::new(message)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}

fn draw_help<G: ImageGenerator>(frame: &mut Frame, app: &App<G>, area: Rect) {
    let help_text = match (app.mode, app.view) {
        (AppMode::Input(_), _) => "Enter: Submit | Esc: Cancel",
        (_, View::Generate) => {
            "Space: Select | g: Generate All | m: Mode | w: Save | o/a: Overlay/Crop | p: Background | d: Export | v: View | u: Upload | e: Brand | s: Style | ?: Help | q: Quit"
        }
        (_, View::Gallery) => "Enter: Edit in chat | d: Export | v: View | Tab: Next panel | ?: Help | q: Quit",
        (_, View::Chat) => "i: Describe edit | w: Save to gallery | d: Export | v: View | ?: Help | q: Quit",
    };

    let help = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

/// Draw the brand form
fn draw_brand<G: ImageGenerator>(frame: &mut Frame, app: &App<G>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Field list
            Constraint::Length(3), // Status
            Constraint::Length(2), // Help
        ])
        .split(area);

    // Header
    let header = Paragraph::new("Brand Guidelines")
        .style(heading_style())
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = BrandField::all()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let is_selected = i == app.brand_selected;
            let value = if app.brand_editing && is_selected {
                format!("{}▏", app.brand_edit_buffer)
            } else {
                app.brand_value(*field)
            };

            let content = Line::from(vec![
                Span::styled(format!("{:<22}", field.label()), cursor_style(is_selected)),
                Span::styled(
                    value,
                    if is_selected && app.brand_editing {
                        Style::default().fg(Color::Yellow)
                    } else {
                        label_style()
                    },
                ),
            ]);

            ListItem::new(content)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL));
    frame.render_widget(list, chunks[1]);

    // Status
    draw_status(frame, app, chunks[2]);

    // Help
    let help_text = if app.brand_editing {
        "Enter: Save | Esc: Cancel"
    } else {
        "↑↓: Navigate | Enter: Edit | S: Save as default | Esc/q: Back"
    };
    let help = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

fn draw_help_screen(frame: &mut Frame) {
    let keys: [(&str, &str); 25] = [
        ("u", "Upload a product image (PNG/JPG)"),
        ("1-3", "Use a sample product"),
        ("e", "Edit brand guidelines"),
        ("s", "Cycle style preset"),
        ("b", "Toggle keeping brand text visible"),
        ("y", "Get AI style suggestions"),
        ("Space", "Select/deselect asset type"),
        ("m", "Switch scene / product-lock mode"),
        ("g", "Generate all selected assets"),
        ("o", "Toggle quote overlay on the result"),
        ("a", "Cycle crop of the result (keep, 1:1, 9:16, 16:9)"),
        ("O", "Switch overlay text color (white / black)"),
        ("p", "Edit the background plate (product-lock results)"),
        ("w", "Save result (or chat edit) to gallery"),
        ("Enter", "Gallery: edit the image in chat"),
        ("i", "Chat: describe an edit"),
        ("Tab", "Next panel / next edit idea while typing"),
        ("d", "Export the focused image"),
        ("v", "View the focused image"),
        ("x", "Clear results, gallery and chat"),
        ("X", "Reset the session"),
        ("↑↓ / jk", "Move"),
        ("?", "This help"),
        ("q / Esc", "Quit"),
        ("Ctrl-C", "Quit"),
    ];

    let mut lines = vec![Line::from(Span::styled("Keys", heading_style())), Line::from("")];
    for (key, action) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", key), Style::default().fg(Color::Yellow)),
            Span::styled(action, Style::default().fg(Color::White)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Press any key to return", label_style())));

    let help = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    frame.render_widget(help, frame.area());
}
