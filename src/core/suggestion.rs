use serde::{Deserialize, Serialize};

use super::AssetType;

/// A scene direction for one asset type, suggested by the text model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSuggestion {
    pub asset_type: String,
    #[serde(default)]
    pub background_tone: String,
    #[serde(default)]
    pub surface_type: String,
    #[serde(default)]
    pub accent_prop: String,
    #[serde(default)]
    pub lighting: String,
    #[serde(default)]
    pub camera_angle: String,
    #[serde(default, alias = "overlayText")]
    pub suggested_text: String,
}

#[derive(Debug, Deserialize)]
struct SuggestionEnvelope {
    #[serde(default)]
    assets: Vec<StyleSuggestion>,
}

impl StyleSuggestion {
    /// The asset type this suggestion is for, if the label is recognised
    pub fn target(&self) -> Option<AssetType> {
        self.asset_type.parse().ok()
    }

    /// One-line summary for lists
    pub fn summary(&self) -> String {
        [
            self.background_tone.as_str(),
            self.surface_type.as_str(),
            self.lighting.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" / ")
    }
}

/// Parse the text model's reply. Tolerates code fences and a leading
/// "json" language tag. Returns `None` if nothing usable came back.
pub fn parse_suggestions(text: &str) -> Option<Vec<StyleSuggestion>> {
    let mut body = text.trim().trim_matches('`').trim();
    if let Some(rest) = body.strip_prefix("json") {
        body = rest.trim();
    }

    let envelope: SuggestionEnvelope = serde_json::from_str(body).ok()?;
    if envelope.assets.is_empty() {
        None
    } else {
        Some(envelope.assets)
    }
}

fn suggestion(
    asset_type: AssetType,
    background_tone: &str,
    surface_type: &str,
    accent_prop: &str,
    lighting: &str,
    camera_angle: &str,
    suggested_text: &str,
) -> StyleSuggestion {
    StyleSuggestion {
        asset_type: asset_type.label().to_string(),
        background_tone: background_tone.to_string(),
        surface_type: surface_type.to_string(),
        accent_prop: accent_prop.to_string(),
        lighting: lighting.to_string(),
        camera_angle: camera_angle.to_string(),
        suggested_text: suggested_text.to_string(),
    }
}

/// Used when the text model is unreachable or returns garbage
pub fn default_suggestions() -> Vec<StyleSuggestion> {
    vec![
        suggestion(
            AssetType::InstagramPost,
            "soft gradient from coral to cream",
            "marble surface with subtle veining",
            "dried flowers and gold accents",
            "warm, diffused natural light",
            "45-degree elevated angle",
            "Discover your glow",
        ),
        suggestion(
            AssetType::InstagramStory,
            "ethereal lavender mist",
            "silk fabric with gentle folds",
            "crystal prisms creating light refractions",
            "soft backlight with golden hour tones",
            "straight-on portrait orientation",
            "New arrival alert!",
        ),
        suggestion(
            AssetType::WebsiteBanner,
            "deep emerald to teal gradient",
            "water surface with gentle ripples",
            "botanical elements and dewdrops",
            "dramatic side lighting",
            "wide cinematic shot",
            "Transform your routine",
        ),
        suggestion(
            AssetType::AdCreative,
            "luxurious black with gold particles",
            "reflective obsidian surface",
            "geometric gold frames",
            "spotlight with rim lighting",
            "dynamic diagonal composition",
            "Limited time: 20% off",
        ),
        suggestion(
            AssetType::TestimonialGraphic,
            "soft beige with warm undertones",
            "textured linen or silk fabric",
            "subtle floral arrangements",
            "soft, diffused window light",
            "slightly elevated, centered composition",
            "Real results from real customers",
        ),
    ]
}

/// Built-in scene direction for one asset type
pub fn default_suggestion_for(asset_type: AssetType) -> Option<StyleSuggestion> {
    default_suggestions()
        .into_iter()
        .find(|s| s.target() == Some(asset_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_json() {
        let reply = "```json\n{\"assets\":[{\"assetType\":\"Website Banner\",\"backgroundTone\":\"sage\",\"lighting\":\"dawn\"}]}\n```";
        let parsed = parse_suggestions(reply).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].target(), Some(AssetType::WebsiteBanner));
        assert_eq!(parsed[0].summary(), "sage / dawn");
    }

    #[test]
    fn test_parse_accepts_overlay_text_alias() {
        let reply = r#"{"assets":[{"assetType":"Ad Creative","overlayText":"10% Off"}]}"#;
        let parsed = parse_suggestions(reply).unwrap();
        assert_eq!(parsed[0].suggested_text, "10% Off");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_suggestions("I cannot help with that").is_none());
        assert!(parse_suggestions(r#"{"assets":[]}"#).is_none());
    }

    #[test]
    fn test_defaults_cover_every_asset_type() {
        let defaults = default_suggestions();
        for t in AssetType::all() {
            assert!(defaults.iter().any(|s| s.target() == Some(*t)));
            assert!(default_suggestion_for(*t).is_some());
        }
    }
}
