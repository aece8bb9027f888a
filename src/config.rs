use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{BrandField, BrandProfile, GenerationMode, OverlayColor, StudioError, StylePreset};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub studio: StudioConfig,
    /// Brand profile every new session starts from
    #[serde(default)]
    pub brand: BrandProfile,
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(skip)]
    pub config_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    #[serde(default)]
    pub style_preset: StylePreset,
    #[serde(default = "default_true")]
    pub ensure_brand_text: bool,
    /// scene or product-lock
    #[serde(default)]
    pub mode: GenerationMode,
    #[serde(default)]
    pub overlay_color: OverlayColor,
    /// Crop and resize results to the asset type's exact resolution
    #[serde(default = "default_true")]
    pub fit_to_resolution: bool,
    #[serde(default = "default_samples_dir")]
    pub samples_dir: String,
    /// TTF used for testimonial text; system fonts are tried when unset
    #[serde(default)]
    pub font_path: Option<String>,
    /// Product category passed to style suggestions
    #[serde(default = "default_category")]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    #[serde(default = "default_display")]
    pub display: DisplayMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Terminal,
    None,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Terminal => "terminal",
            DisplayMode::None => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "terminal" => Some(DisplayMode::Terminal),
            "none" => Some(DisplayMode::None),
            _ => None,
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["terminal", "none"]
    }
}

// Default value functions
fn default_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_samples_dir() -> String {
    "sample_images".to_string()
}

fn default_category() -> String {
    "Skincare".to_string()
}

fn default_output_directory() -> String {
    "./studio-output".to_string()
}

fn default_true() -> bool {
    true
}

fn default_display() -> DisplayMode {
    DisplayMode::Terminal
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            model: default_model(),
            text_model: default_text_model(),
            base_url: default_base_url(),
        }
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            style_preset: StylePreset::default(),
            ensure_brand_text: true,
            mode: GenerationMode::default(),
            overlay_color: OverlayColor::default(),
            fit_to_resolution: true,
            samples_dir: default_samples_dir(),
            font_path: None,
            category: default_category(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            display: default_display(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            studio: StudioConfig::default(),
            brand: BrandProfile::default(),
            output: OutputConfig::default(),
            config_path: PathBuf::new(),
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    value.parse().context("Invalid boolean value")
}

fn config_error(err: anyhow::Error) -> StudioError {
    StudioError::ConfigError(format!("{:#}", err))
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "nanobanan", "banana-studio")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the platform config file, creating it if missing.
    /// Any failure here is a configuration error.
    pub fn load_or_create() -> Result<Self, StudioError> {
        let env_key = std::env::var(API_KEY_ENV).ok().and_then(|k| non_empty(&k));
        let path = Self::config_path().map_err(config_error)?;
        Self::load_or_create_at(&path, env_key)
    }

    /// Load config from `path`, creating a default file if missing.
    /// `env_key` takes precedence over the key stored in the file.
    pub fn load_or_create_at(path: &Path, env_key: Option<String>) -> Result<Self, StudioError> {
        let mut config = Self::read_or_create(path).map_err(config_error)?;
        if let Some(key) = env_key {
            config.api.key = Some(key);
        }
        Ok(config)
    }

    fn read_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config {
                config_path: path.to_path_buf(),
                ..Config::default()
            };
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get API key (from config or environment)
    pub fn api_key(&self) -> Option<&str> {
        self.api.key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// The API key, or the startup configuration error
    pub fn require_api_key(&self) -> Result<&str, StudioError> {
        self.api_key().ok_or(StudioError::MissingApiKey)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output.directory)
    }

    pub fn samples_dir(&self) -> PathBuf {
        PathBuf::from(&self.studio.samples_dir)
    }

    /// Set a config value by key path (e.g., "api.key", "studio.style_preset")
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(field) = BrandField::from_config_key(key) {
            self.brand.set(field, value);
            return Ok(());
        }

        match key {
            "api.key" => self.api.key = non_empty(value),
            "api.model" => self.api.model = value.to_string(),
            "api.text_model" => self.api.text_model = value.to_string(),
            "api.base_url" => self.api.base_url = value.to_string(),
            "studio.style_preset" => self.studio.style_preset = value.parse()?,
            "studio.ensure_brand_text" => self.studio.ensure_brand_text = parse_bool(value)?,
            "studio.mode" => self.studio.mode = value.parse()?,
            "studio.overlay_color" => self.studio.overlay_color = value.parse()?,
            "studio.fit_to_resolution" => self.studio.fit_to_resolution = parse_bool(value)?,
            "studio.samples_dir" => self.studio.samples_dir = value.to_string(),
            "studio.font_path" => self.studio.font_path = non_empty(value),
            "studio.category" => self.studio.category = value.to_string(),
            "output.directory" => self.output.directory = value.to_string(),
            "output.display" => {
                self.output.display = DisplayMode::parse(value).with_context(|| {
                    format!(
                        "Invalid display mode. Valid values: {}",
                        DisplayMode::variants().join(", ")
                    )
                })?;
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get a config value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(field) = BrandField::from_config_key(key) {
            return Some(self.brand.get(field));
        }

        match key {
            "api.key" => self.api.key.clone().map(|_| "****".to_string()), // Mask API key
            "api.model" => Some(self.api.model.clone()),
            "api.text_model" => Some(self.api.text_model.clone()),
            "api.base_url" => Some(self.api.base_url.clone()),
            "studio.style_preset" => Some(self.studio.style_preset.to_string()),
            "studio.ensure_brand_text" => Some(self.studio.ensure_brand_text.to_string()),
            "studio.mode" => Some(self.studio.mode.to_string()),
            "studio.overlay_color" => Some(self.studio.overlay_color.to_string()),
            "studio.fit_to_resolution" => Some(self.studio.fit_to_resolution.to_string()),
            "studio.samples_dir" => Some(self.studio.samples_dir.clone()),
            "studio.font_path" => Some(self.studio.font_path.clone().unwrap_or_default()),
            "studio.category" => Some(self.studio.category.clone()),
            "output.directory" => Some(self.output.directory.clone()),
            "output.display" => Some(self.output.display.as_str().to_string()),
            _ => None,
        }
    }

    /// Get all config keys
    pub fn keys() -> Vec<&'static str> {
        let mut keys = vec![
            "api.key",
            "api.model",
            "api.text_model",
            "api.base_url",
            "studio.style_preset",
            "studio.ensure_brand_text",
            "studio.mode",
            "studio.overlay_color",
            "studio.fit_to_resolution",
            "studio.samples_dir",
            "studio.font_path",
            "studio.category",
            "output.directory",
            "output.display",
        ];
        keys.extend(BrandField::all().iter().map(|f| f.config_key()));
        keys
    }

    /// Available image models
    pub fn models() -> &'static [&'static str] {
        &["gemini-2.5-flash-image", "gemini-2.5-flash-image-preview", "gemini-3-pro-image-preview"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        config.set("studio.style_preset", "minimalist").unwrap();
        config.set("output.display", "none").unwrap();
        config.set("brand.name", "Acme").unwrap();
        config.set("brand.palette", "red; blue").unwrap();
        config.set("studio.mode", "product-lock").unwrap();
        config.set("studio.overlay_color", "black").unwrap();

        assert_eq!(config.get("studio.style_preset").as_deref(), Some("Minimalist"));
        assert_eq!(config.get("output.display").as_deref(), Some("none"));
        assert_eq!(config.brand.name, "Acme");
        assert_eq!(config.get("brand.palette").as_deref(), Some("red, blue"));
        assert_eq!(config.get("studio.mode").as_deref(), Some("product-lock"));
        assert_eq!(config.studio.overlay_color, OverlayColor::Black);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        assert!(config.set("studio.style_preset", "baroque").is_err());
        assert!(config.set("studio.fit_to_resolution", "maybe").is_err());
        assert!(config.set("output.display", "hologram").is_err());
        assert!(config.set("studio.mode", "collage").is_err());
        assert!(config.set("nope.key", "x").is_err());
    }

    #[test]
    fn test_every_key_is_readable() {
        let config = Config::default();
        for key in Config::keys() {
            if key != "api.key" {
                assert!(config.get(key).is_some(), "{}", key);
            }
        }
    }

    #[test]
    fn test_api_key_masked_and_required() {
        let mut config = Config::default();
        assert!(matches!(config.require_api_key(), Err(StudioError::MissingApiKey)));

        config.set("api.key", "secret").unwrap();
        assert_eq!(config.get("api.key").as_deref(), Some("****"));
        assert_eq!(config.require_api_key().unwrap(), "secret");

        config.set("api.key", "  ").unwrap();
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_load_or_create_round_trip() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::load_or_create_at(&path, None)?;
        assert!(path.exists());
        assert!(config.api_key().is_none());

        config.set("brand.name", "Acme")?;
        config.set("studio.ensure_brand_text", "false")?;
        config.save()?;

        let reloaded = Config::load_or_create_at(&path, Some("from-env".to_string()))?;
        assert_eq!(reloaded.brand.name, "Acme");
        assert!(!reloaded.studio.ensure_brand_text);
        assert_eq!(reloaded.api_key(), Some("from-env"));
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_configuration_error() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "[studio\nmode = ")?;

        let err = Config::load_or_create_at(&path, None).unwrap_err();
        assert!(matches!(err, StudioError::ConfigError(_)));
        assert_eq!(err.kind(), crate::core::ErrorKind::Configuration);
        assert!(err.to_string().contains("config.toml"));

        fs::write(&path, "[studio]\nmode = \"collage\"\n")?;
        assert!(Config::load_or_create_at(&path, None).is_err());
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "[brand]\nname = \"Acme\"\n")?;

        let config = Config::load_or_create_at(&path, None)?;
        assert_eq!(config.brand.name, "Acme");
        assert_eq!(config.brand.tagline, BrandProfile::default().tagline);
        assert_eq!(config.api.model, default_model());
        Ok(())
    }
}
