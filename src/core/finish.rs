use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{AssetType, StudioError};

/// How an asset is produced from the product photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// The model re-stages the product from the reference image
    #[default]
    Scene,
    /// The model paints an empty background plate and the real product
    /// photo is composited on top
    ProductLock,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Scene => "scene",
            GenerationMode::ProductLock => "product-lock",
        }
    }

    pub fn next(&self) -> GenerationMode {
        match self {
            GenerationMode::Scene => GenerationMode::ProductLock,
            GenerationMode::ProductLock => GenerationMode::Scene,
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "scene" => Ok(GenerationMode::Scene),
            "product-lock" | "lock" | "plate" => Ok(GenerationMode::ProductLock),
            _ => Err(StudioError::InvalidParameter(format!(
                "Unknown generation mode '{}'. Valid values: scene, product-lock",
                s
            ))),
        }
    }
}

/// Text color of the testimonial overlay. The band behind the text takes
/// the opposite tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayColor {
    #[default]
    White,
    Black,
}

impl OverlayColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayColor::White => "white",
            OverlayColor::Black => "black",
        }
    }

    pub fn next(&self) -> OverlayColor {
        match self {
            OverlayColor::White => OverlayColor::Black,
            OverlayColor::Black => OverlayColor::White,
        }
    }
}

impl fmt::Display for OverlayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverlayColor {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(OverlayColor::White),
            "black" => Ok(OverlayColor::Black),
            _ => Err(StudioError::InvalidParameter(format!(
                "Unknown overlay color '{}'. Valid values: white, black",
                s
            ))),
        }
    }
}

/// Re-crop applied before export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CropAspect {
    #[default]
    Keep,
    Square,
    Portrait,
    Landscape,
}

impl CropAspect {
    pub fn all() -> &'static [CropAspect] {
        &[
            CropAspect::Keep,
            CropAspect::Square,
            CropAspect::Portrait,
            CropAspect::Landscape,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            CropAspect::Keep => "keep",
            CropAspect::Square => "1:1",
            CropAspect::Portrait => "9:16",
            CropAspect::Landscape => "16:9",
        }
    }

    /// Target ratio, or `None` to leave the image as generated
    pub fn ratio(&self) -> Option<(u32, u32)> {
        match self {
            CropAspect::Keep => None,
            CropAspect::Square => Some((1, 1)),
            CropAspect::Portrait => Some((9, 16)),
            CropAspect::Landscape => Some((16, 9)),
        }
    }

    pub fn next(&self) -> CropAspect {
        let all = Self::all();
        let idx = all.iter().position(|a| a == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl fmt::Display for CropAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CropAspect {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CropAspect::all()
            .iter()
            .copied()
            .find(|a| a.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                StudioError::InvalidParameter(format!(
                    "Unknown crop '{}'. Valid values: keep, 1:1, 9:16, 16:9",
                    s
                ))
            })
    }
}

/// Post-processing of one result: optional re-crop and text overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Finish {
    pub aspect: CropAspect,
    /// Draw the customer quote over the image
    pub overlay: bool,
}

impl Finish {
    /// Testimonial graphics carry the overlay unless turned off
    pub fn for_asset(asset_type: AssetType) -> Self {
        Self {
            aspect: CropAspect::Keep,
            overlay: asset_type == AssetType::TestimonialGraphic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("product_lock".parse::<GenerationMode>().unwrap(), GenerationMode::ProductLock);
        assert_eq!(" Scene ".parse::<GenerationMode>().unwrap(), GenerationMode::Scene);
        assert!("collage".parse::<GenerationMode>().is_err());
        assert_eq!(GenerationMode::Scene.next().next(), GenerationMode::Scene);
    }

    #[test]
    fn test_crop_aspect_cycle_and_parse() {
        assert_eq!(CropAspect::Landscape.next(), CropAspect::Keep);
        assert_eq!("9:16".parse::<CropAspect>().unwrap(), CropAspect::Portrait);
        assert_eq!(CropAspect::Keep.ratio(), None);
        assert!("4:3".parse::<CropAspect>().is_err());
    }

    #[test]
    fn test_default_finish_per_asset_type() {
        assert!(Finish::for_asset(AssetType::TestimonialGraphic).overlay);
        assert!(!Finish::for_asset(AssetType::AdCreative).overlay);
        assert_eq!(Finish::for_asset(AssetType::AdCreative).aspect, CropAspect::Keep);
    }
}
