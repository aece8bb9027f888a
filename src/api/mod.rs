mod provider;
mod types;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::io::Cursor;

pub use provider::ImageGenerator;
pub use types::*;

use crate::config::Config;
use crate::core::{GenerateParams, ImageData, StudioError};
use crate::http_client::HTTP_CLIENT;

/// Gemini API client
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    text_model: String,
}

impl GeminiClient {
    /// Create a new client from config
    pub fn from_config(config: &Config) -> Result<Self, StudioError> {
        let api_key = config
            .api_key()
            .ok_or(StudioError::MissingApiKey)?
            .to_string();

        let base_url = config.api.base_url.trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(StudioError::ConfigError(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                config.api.base_url
            )));
        }

        Ok(Self {
            api_key,
            base_url: base_url.to_string(),
            model: config.api.model.clone(),
            text_model: config.api.text_model.clone(),
        })
    }

    /// POST a generateContent request and parse the response
    pub async fn send(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse, StudioError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        tracing::debug!("Sending generateContent request to: {}", url);

        let response = HTTP_CLIENT
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.clone());
            return Err(StudioError::from_status(status.as_u16(), message));
        }

        let response: GenerateResponse = serde_json::from_str(&body)?;
        if let Some(usage) = &response.usage_metadata {
            tracing::debug!("Token usage: {:?}", usage.total_token_count);
        }
        Ok(response)
    }

    /// Build the API request body
    pub fn build_generate_request(params: &GenerateParams) -> GenerateRequest {
        let mut parts = vec![ContentPart::Text {
            text: params.prompt.clone(),
        }];

        // Reference image goes first
        if let Some(image) = &params.reference_image {
            parts.insert(
                0,
                ContentPart::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.to_base64(),
                    },
                },
            );
        }

        GenerateRequest {
            contents: vec![Content { parts, role: None }],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                image_config: Some(ImageConfig {
                    aspect_ratio: Some(params.aspect_ratio.clone()),
                }),
            }),
        }
    }

    fn build_text_request(system: &str, user: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    ContentPart::Text {
                        text: system.to_string(),
                    },
                    ContentPart::Text {
                        text: user.to_string(),
                    },
                ],
                role: Some("user".to_string()),
            }],
            generation_config: None,
        }
    }

    fn check_refusal(response: &GenerateResponse) -> Result<(), StudioError> {
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            let message = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason_message.clone())
                .unwrap_or_else(|| format!("Prompt blocked: {}", reason));
            tracing::warn!("Prompt blocked: {} - {}", reason, message);
            return Err(StudioError::GenerationFailed(message));
        }

        for candidate in response.candidates.iter().flatten() {
            if let Some(reason) = &candidate.finish_reason {
                if reason != "STOP" && reason != "MAX_TOKENS" {
                    let message = candidate
                        .finish_message
                        .as_deref()
                        .unwrap_or("Image generation was refused by the API");
                    tracing::warn!("Generation refused: {} - {}", reason, message);
                    return Err(StudioError::GenerationFailed(message.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Return the first inline image in the response
    pub fn extract_image(response: GenerateResponse) -> Result<ImageData, StudioError> {
        Self::check_refusal(&response)?;

        for candidate in response.candidates.unwrap_or_default() {
            let Some(content) = candidate.content else {
                continue;
            };
            for part in content.parts {
                match part {
                    ContentPart::InlineData { inline_data } => {
                        let bytes = BASE64
                            .decode(inline_data.data.as_bytes())
                            .map_err(|e| StudioError::InvalidResponse(format!("bad base64 image: {}", e)))?;
                        let (width, height) = image::io::Reader::new(Cursor::new(&bytes))
                            .with_guessed_format()?
                            .into_dimensions()
                            .map_err(|e| StudioError::InvalidResponse(format!("undecodable image: {}", e)))?;
                        return Ok(ImageData::new(bytes, inline_data.mime_type, width, height));
                    }
                    ContentPart::Text { text } => {
                        tracing::debug!("Response text: {}", text);
                    }
                    ContentPart::Other(_) => {}
                }
            }
        }

        Err(StudioError::GenerationFailed("No image in response".to_string()))
    }

    /// Concatenate all text parts in the response
    pub fn extract_text(response: GenerateResponse) -> Result<String, StudioError> {
        Self::check_refusal(&response)?;

        let text: String = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text),
                _ => None,
            })
            .collect();

        if text.trim().is_empty() {
            return Err(StudioError::InvalidResponse("empty text response".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_image(&self, params: &GenerateParams) -> Result<ImageData, StudioError> {
        tracing::debug!(
            "Image request: model={} aspect={} edit={}",
            params.model,
            params.aspect_ratio,
            params.is_edit()
        );
        let request = Self::build_generate_request(params);
        let response = self.send(&params.model, &request).await?;
        Self::extract_image(response)
    }

    async fn complete_text(&self, system: &str, user: &str) -> Result<String, StudioError> {
        let request = Self::build_text_request(system, user);
        let response = self.send(&self.text_model, &request).await?;
        Self::extract_text(response)
    }

    fn image_model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging;
    use image::{DynamicImage, ImageBuffer, Rgba};

    fn png() -> ImageData {
        let img = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(4, 3, Rgba([1, 2, 3, 255])));
        imaging::encode_png(&img).unwrap()
    }

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_uses_camel_case_and_image_first() {
        let params = GenerateParams::new("Edit this")
            .with_aspect_ratio("9:16")
            .with_reference_image(png());
        let request = GeminiClient::build_generate_request(&params);
        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("generationConfig").is_some());
        assert_eq!(json["generationConfig"]["imageConfig"]["aspectRatio"], "9:16");
        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["text"], "Edit this");
    }

    #[test]
    fn test_extract_image() {
        let image = png();
        let json = format!(
            r#"{{"candidates":[{{"content":{{"parts":[{{"text":"here"}},{{"inlineData":{{"mimeType":"image/png","data":"{}"}}}}]}},"finishReason":"STOP"}}]}}"#,
            image.to_base64()
        );
        let out = GeminiClient::extract_image(parse(&json)).unwrap();
        assert_eq!(out.bytes, image.bytes);
        assert_eq!((out.width, out.height), (4, 3));
    }

    #[test]
    fn test_extract_image_skips_unknown_parts() {
        let resp = parse(r#"{"candidates":[{"content":{"parts":[{}]}}]}"#);
        assert!(matches!(
            GeminiClient::extract_image(resp),
            Err(StudioError::GenerationFailed(_))
        ));
    }

    #[test]
    fn test_refusal_is_generation_failure() {
        let resp = parse(
            r#"{"candidates":[{"finishReason":"IMAGE_SAFETY","finishMessage":"Blocked for safety"}]}"#,
        );
        match GeminiClient::extract_image(resp) {
            Err(StudioError::GenerationFailed(msg)) => assert_eq!(msg, "Blocked for safety"),
            other => panic!("unexpected: {other:?}"),
        }

        let blocked = parse(
            r#"{"candidates":[],"promptFeedback":{"blockReason":"SAFETY","blockReasonMessage":"Prompt was blocked"}}"#,
        );
        assert!(matches!(
            GeminiClient::extract_image(blocked),
            Err(StudioError::GenerationFailed(_))
        ));
    }

    #[test]
    fn test_malformed_base64_is_invalid_response() {
        let resp = parse(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"!!!"}}]}}]}"#,
        );
        assert!(matches!(
            GeminiClient::extract_image(resp),
            Err(StudioError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_extract_text_concatenates() {
        let resp = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"assets\":"},{"text":"[]}"}]}}]}"#,
        );
        assert_eq!(GeminiClient::extract_text(resp).unwrap(), r#"{"assets":[]}"#);
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let mut config = Config::default();
        config.api.key = None;
        let err = GeminiClient::from_config(&config).err().unwrap();
        assert!(matches!(err, StudioError::MissingApiKey));
    }

    #[test]
    fn test_bad_base_url_is_configuration_error() {
        let mut config = Config::default();
        config.api.key = Some("k".to_string());
        config.api.base_url = "generativelanguage.googleapis.com".to_string();
        let err = GeminiClient::from_config(&config).err().unwrap();
        assert_eq!(err.kind(), crate::core::ErrorKind::Configuration);

        config.api.base_url = "https://example.test/v1beta/".to_string();
        assert!(GeminiClient::from_config(&config).is_ok());
    }
}
