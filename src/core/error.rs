use thiserror::Error;

/// Broad error classes, used to decide how an error is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or broken configuration. Fatal only at startup.
    Configuration,
    /// Bad user input (unsupported image, nothing selected, ...).
    Input,
    /// The generative model API failed or refused.
    Api,
    /// Anything else.
    Unexpected,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "Configuration error",
            ErrorKind::Input => "Input error",
            ErrorKind::Api => "API error",
            ErrorKind::Unexpected => "Unexpected error",
        }
    }
}

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("API key not configured. Set GEMINI_API_KEY (environment or .env) or run: banana-studio config set api.key <your-key>")]
    MissingApiKey,

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Unsupported image format: {0}. Use PNG or JPG")]
    UnsupportedImage(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("API error: {message}")]
    ApiError {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("API key rejected: {0}")]
    InvalidApiKey(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Image processing error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StudioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StudioError::MissingApiKey | StudioError::ConfigError(_) => ErrorKind::Configuration,
            StudioError::UnsupportedImage(_)
            | StudioError::InvalidImage(_)
            | StudioError::InvalidParameter(_) => ErrorKind::Input,
            StudioError::ApiError { .. }
            | StudioError::InvalidApiKey(_)
            | StudioError::QuotaExceeded(_)
            | StudioError::InvalidResponse(_)
            | StudioError::GenerationFailed(_)
            | StudioError::Timeout => ErrorKind::Api,
            StudioError::ImageError(_) | StudioError::IoError(_) => ErrorKind::Unexpected,
        }
    }

    /// Message shown in the status bar or on stderr.
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.kind().label(), self)
    }

    /// Map a non-success HTTP status and the API's error message to an error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => StudioError::InvalidApiKey(message),
            429 => StudioError::QuotaExceeded(message),
            _ => StudioError::ApiError {
                message,
                status: Some(status),
                source: None,
            },
        }
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return StudioError::Timeout;
        }
        StudioError::ApiError {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
            source: Some(err),
        }
    }
}

impl From<image::ImageError> for StudioError {
    fn from(err: image::ImageError) -> Self {
        StudioError::ImageError(err.to_string())
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        StudioError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_configuration_error() {
        let err = StudioError::MissingApiKey;
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.user_message().starts_with("Configuration error:"));
        assert!(err.user_message().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            StudioError::from_status(429, "Resource exhausted"),
            StudioError::QuotaExceeded(_)
        ));
        assert!(matches!(
            StudioError::from_status(403, "API key not valid"),
            StudioError::InvalidApiKey(_)
        ));
        match StudioError::from_status(500, "Internal") {
            StudioError::ApiError { status, message, .. } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "Internal");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(StudioError::UnsupportedImage("gif".into()).kind(), ErrorKind::Input);
        assert_eq!(StudioError::Timeout.kind(), ErrorKind::Api);
        assert_eq!(StudioError::ImageError("x".into()).kind(), ErrorKind::Unexpected);
    }
}
