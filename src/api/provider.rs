use async_trait::async_trait;

use crate::core::{GenerateParams, ImageData, StudioError};

/// The external generative model, seen as an opaque function.
///
/// `GeminiClient` is the real implementation; the pipeline only depends on
/// this trait.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// One call: prompt (plus optional reference image) in, image out.
    async fn generate_image(&self, params: &GenerateParams) -> Result<ImageData, StudioError>;

    /// One text completion, used for style suggestions.
    async fn complete_text(&self, system: &str, user: &str) -> Result<String, StudioError>;

    /// Image model identifier, for logging and params.
    fn image_model(&self) -> &str;
}
