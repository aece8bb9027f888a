use super::{AssetType, BrandProfile, GenerationMode, ImageData, OverlayColor, StylePreset, StyleSuggestion};

/// Parameters for one call to the image model
#[derive(Debug, Clone)]
pub struct GenerateParams {
    /// The prompt for image generation or editing
    pub prompt: String,

    /// Aspect ratio (e.g., "1:1", "16:9", "9:16")
    pub aspect_ratio: String,

    /// Model to use
    pub model: String,

    /// Reference image sent alongside the prompt
    pub reference_image: Option<ImageData>,
}

fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            aspect_ratio: default_aspect_ratio(),
            model: default_model(),
            reference_image: None,
        }
    }
}

impl GenerateParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_aspect_ratio(mut self, ar: impl Into<String>) -> Self {
        self.aspect_ratio = ar.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_reference_image(mut self, image: ImageData) -> Self {
        self.reference_image = Some(image);
        self
    }

    /// Check if this is an edit request (has reference image)
    pub fn is_edit(&self) -> bool {
        self.reference_image.is_some()
    }
}

/// Everything needed to generate one asset. Built per generation and
/// consumed by a single API call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub source: &'a ImageData,
    pub asset_type: AssetType,
    pub style: StylePreset,
    pub brand: &'a BrandProfile,
    pub ensure_brand_text: bool,
    /// Optional scene direction from a style suggestion
    pub scene: Option<&'a StyleSuggestion>,
    pub mode: GenerationMode,
    pub overlay_color: OverlayColor,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(
        source: &'a ImageData,
        asset_type: AssetType,
        style: StylePreset,
        brand: &'a BrandProfile,
    ) -> Self {
        Self {
            source,
            asset_type,
            style,
            brand,
            ensure_brand_text: true,
            scene: None,
            mode: GenerationMode::default(),
            overlay_color: OverlayColor::default(),
        }
    }

    pub fn with_brand_text(mut self, ensure: bool) -> Self {
        self.ensure_brand_text = ensure;
        self
    }

    pub fn with_scene(mut self, scene: Option<&'a StyleSuggestion>) -> Self {
        self.scene = scene;
        self
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_overlay_color(mut self, color: OverlayColor) -> Self {
        self.overlay_color = color;
        self
    }
}
