use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::StudioError;

/// A named marketing-image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetType {
    InstagramPost,
    InstagramStory,
    WebsiteBanner,
    AdCreative,
    TestimonialGraphic,
}

/// Static description of an asset type. Shared and read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub asset_type: AssetType,
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    /// Aspect ratio as (width, height) in lowest terms
    pub aspect: (u32, u32),
    pub icon: &'static str,
    pub description: &'static str,
    /// How the framing is phrased in the generation prompt
    pub framing: &'static str,
    /// Asset-specific line appended to the generation prompt
    pub requirement: &'static str,
}

impl AssetDescriptor {
    /// Resolution as shown to the user, e.g. "1080x1920"
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Aspect ratio in the form the API expects, e.g. "9:16"
    pub fn aspect_ratio(&self) -> String {
        format!("{}:{}", self.aspect.0, self.aspect.1)
    }
}

const ASSET_TABLE: [AssetDescriptor; 5] = [
    AssetDescriptor {
        asset_type: AssetType::InstagramPost,
        label: "Instagram Post",
        width: 1080,
        height: 1080,
        aspect: (1, 1),
        icon: "📱",
        description: "Perfect square for Instagram feed",
        framing: "square 1:1",
        requirement: "Create an eye-catching square composition perfect for Instagram feed",
    },
    AssetDescriptor {
        asset_type: AssetType::InstagramStory,
        label: "Instagram Story",
        width: 1080,
        height: 1920,
        aspect: (9, 16),
        icon: "📲",
        description: "Vertical format for Stories",
        framing: "vertical 9:16",
        requirement: "Design for vertical mobile viewing with the product prominently displayed",
    },
    AssetDescriptor {
        asset_type: AssetType::WebsiteBanner,
        label: "Website Banner",
        width: 1920,
        height: 1080,
        aspect: (16, 9),
        icon: "🖥️",
        description: "Wide format for web headers",
        framing: "horizontal 16:9",
        requirement: "Create a wide cinematic scene with the product as hero element",
    },
    AssetDescriptor {
        asset_type: AssetType::AdCreative,
        label: "Ad Creative",
        width: 1200,
        height: 1200,
        aspect: (1, 1),
        icon: "📢",
        description: "Optimized for social media ads",
        framing: "square 1:1",
        requirement: "Make it bold and attention-grabbing for social media advertising",
    },
    AssetDescriptor {
        asset_type: AssetType::TestimonialGraphic,
        label: "Testimonial Graphic",
        width: 1080,
        height: 1080,
        aspect: (1, 1),
        icon: "💬",
        description: "Customer testimonial with quote overlay",
        framing: "square 1:1",
        requirement: "Design a testimonial-ready scene with elegant, trustworthy atmosphere",
    },
];

impl AssetType {
    /// All asset types in display order
    pub fn all() -> &'static [AssetType] {
        &[
            AssetType::InstagramPost,
            AssetType::InstagramStory,
            AssetType::WebsiteBanner,
            AssetType::AdCreative,
            AssetType::TestimonialGraphic,
        ]
    }

    pub fn descriptor(&self) -> &'static AssetDescriptor {
        let idx = match self {
            AssetType::InstagramPost => 0,
            AssetType::InstagramStory => 1,
            AssetType::WebsiteBanner => 2,
            AssetType::AdCreative => 3,
            AssetType::TestimonialGraphic => 4,
        };
        &ASSET_TABLE[idx]
    }

    pub fn label(&self) -> &'static str {
        self.descriptor().label
    }

    /// Lowercase, underscore separated label used for file names
    pub fn file_stem(&self) -> String {
        self.label().to_lowercase().replace(' ', "_")
    }

    /// Short slug accepted on the command line, e.g. "instagram-post"
    pub fn slug(&self) -> String {
        self.label().to_lowercase().replace(' ', "-")
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for AssetType {
    type Err = StudioError;

    /// Accepts the label ("Instagram Post"), the slug ("instagram-post") or
    /// the file stem ("instagram_post"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect();

        AssetType::all()
            .iter()
            .copied()
            .find(|t| t.label().to_lowercase() == wanted)
            .ok_or_else(|| {
                let valid: Vec<String> = AssetType::all().iter().map(|t| t.slug()).collect();
                StudioError::InvalidParameter(format!(
                    "Unknown asset type '{}'. Valid values: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_reported_values() {
        let expected = [
            (AssetType::InstagramPost, "1080x1080", "1:1"),
            (AssetType::InstagramStory, "1080x1920", "9:16"),
            (AssetType::WebsiteBanner, "1920x1080", "16:9"),
            (AssetType::AdCreative, "1200x1200", "1:1"),
            (AssetType::TestimonialGraphic, "1080x1080", "1:1"),
        ];

        assert_eq!(AssetType::all().len(), expected.len());
        for (asset_type, resolution, aspect) in expected {
            let d = asset_type.descriptor();
            assert_eq!(d.asset_type, asset_type);
            assert_eq!(d.resolution(), resolution);
            assert_eq!(d.aspect_ratio(), aspect);
        }
    }

    #[test]
    fn test_aspect_agrees_with_resolution() {
        for t in AssetType::all() {
            let d = t.descriptor();
            assert_eq!(d.width * d.aspect.1, d.height * d.aspect.0, "{}", d.label);
        }
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("Instagram Story".parse::<AssetType>().unwrap(), AssetType::InstagramStory);
        assert_eq!("website-banner".parse::<AssetType>().unwrap(), AssetType::WebsiteBanner);
        assert_eq!("AD_CREATIVE".parse::<AssetType>().unwrap(), AssetType::AdCreative);
        assert!("billboard".parse::<AssetType>().is_err());
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(AssetType::TestimonialGraphic.file_stem(), "testimonial_graphic");
    }
}
