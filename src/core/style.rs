use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::StudioError;

/// A named visual tone modifier injected into the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StylePreset {
    #[default]
    Luxury,
    Minimalist,
    Natural,
    Tech,
    Vibrant,
    Custom,
}

/// Palette, mood and prop hints shown next to a preset
#[derive(Debug, Clone, Copy)]
pub struct StyleHints {
    pub colors: &'static [&'static str],
    pub mood: &'static str,
    pub props: &'static str,
}

impl StylePreset {
    pub fn all() -> &'static [StylePreset] {
        &[
            StylePreset::Luxury,
            StylePreset::Minimalist,
            StylePreset::Natural,
            StylePreset::Tech,
            StylePreset::Vibrant,
            StylePreset::Custom,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StylePreset::Luxury => "Luxury",
            StylePreset::Minimalist => "Minimalist",
            StylePreset::Natural => "Natural",
            StylePreset::Tech => "Tech",
            StylePreset::Vibrant => "Vibrant",
            StylePreset::Custom => "Custom",
        }
    }

    /// Scene description used in the generation prompt
    pub fn description(&self) -> &'static str {
        match self {
            StylePreset::Luxury => {
                "premium, elegant, sophisticated with rich textures and golden accents"
            }
            StylePreset::Minimalist => "clean, simple, modern with plenty of white space",
            StylePreset::Natural => {
                "organic, earthy, authentic with natural materials and soft lighting"
            }
            StylePreset::Tech => {
                "futuristic, sleek, innovative with geometric shapes and cool tones"
            }
            StylePreset::Vibrant => "colorful, energetic, bold with dynamic compositions",
            StylePreset::Custom => "based on brand guidelines",
        }
    }

    /// Custom has no hints; it defers to the brand profile.
    pub fn hints(&self) -> Option<StyleHints> {
        let hints = match self {
            StylePreset::Luxury => StyleHints {
                colors: &["gold", "black", "white", "cream"],
                mood: "elegant, sophisticated, premium",
                props: "marble, gold accents, silk, crystals",
            },
            StylePreset::Minimalist => StyleHints {
                colors: &["white", "gray", "beige", "soft pastels"],
                mood: "clean, simple, modern",
                props: "geometric shapes, clean surfaces, minimal decor",
            },
            StylePreset::Natural => StyleHints {
                colors: &["green", "brown", "earth tones", "soft blues"],
                mood: "organic, authentic, eco-friendly",
                props: "plants, wood, stones, natural textures",
            },
            StylePreset::Tech => StyleHints {
                colors: &["blue", "silver", "black", "neon accents"],
                mood: "futuristic, innovative, sleek",
                props: "LED lights, metallic surfaces, geometric patterns",
            },
            StylePreset::Vibrant => StyleHints {
                colors: &["bright colors", "gradients", "bold contrasts"],
                mood: "energetic, playful, dynamic",
                props: "colorful backgrounds, abstract shapes, bold patterns",
            },
            StylePreset::Custom => return None,
        };
        Some(hints)
    }

    /// Next preset in display order, wrapping around
    pub fn next(&self) -> StylePreset {
        let all = Self::all();
        let idx = all.iter().position(|p| p == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StylePreset {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StylePreset::all()
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let valid: Vec<&str> = StylePreset::all().iter().map(|p| p.as_str()).collect();
                StudioError::InvalidParameter(format!(
                    "Unknown style preset '{}'. Valid values: {}",
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
    fn test_parse_is_case_insensitive() {
        assert_eq!("luxury".parse::<StylePreset>().unwrap(), StylePreset::Luxury);
        assert_eq!(" TECH ".parse::<StylePreset>().unwrap(), StylePreset::Tech);
        assert!("baroque".parse::<StylePreset>().is_err());
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(StylePreset::Luxury.next(), StylePreset::Minimalist);
        assert_eq!(StylePreset::Custom.next(), StylePreset::Luxury);
    }

    #[test]
    fn test_custom_has_no_hints() {
        assert!(StylePreset::Custom.hints().is_none());
        assert!(StylePreset::Vibrant.hints().is_some());
    }
}
