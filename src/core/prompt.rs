//! Prompt assembly. Everything here is plain string formatting.

use super::{AssetType, BrandProfile, GenerationRequest, StyleSuggestion};

/// Build the generation prompt for one asset.
///
/// Empty optional brand fields are left out rather than replaced with filler.
pub fn generation_prompt(request: &GenerationRequest<'_>) -> String {
    let brand = request.brand;
    let descriptor = request.asset_type.descriptor();
    let brand_name = brand.display_name();

    let text_rule = if request.ensure_brand_text {
        format!(
            "Ensure any text on the product (including brand name '{}') remains clearly visible",
            brand_name
        )
    } else {
        "Keep product text visible".to_string()
    };

    let mut prompt = format!(
        "Create a {framing} photorealistic marketing {label} for {brand_name} \
         (target resolution {resolution}).\n\n\
         ABSOLUTELY CRITICAL REQUIREMENTS - MUST FOLLOW:\n\
         1. USE THE EXACT PRODUCT FROM THE PROVIDED IMAGE - DO NOT CREATE A NEW PRODUCT\n\
         2. The product in the image MUST remain EXACTLY the same - same shape, same color, same packaging, same text\n\
         3. DO NOT generate a different product or change any aspect of the product itself\n\
         4. Only change the BACKGROUND, SCENE, PROPS, and LIGHTING around the product\n\
         5. The product from the image must be the central focus in the new scene\n\
         6. {text_rule}\n\
         7. Place the EXACT SAME product from the reference image into a new marketing scene\n\n\
         What you CAN change:\n\
         - Background environment and colors\n\
         - Surface the product sits on\n\
         - Props and decorative elements around the product\n\
         - Lighting and shadows\n\
         - Overall composition and angle (but keep the same product)\n\n\
         What you CANNOT change:\n\
         - The product itself (must be identical to the input image)\n\
         - Product shape, color, or packaging design\n\
         - Any text or labels on the product\n\
         - Product material or texture\n\n\
         Visual Style for the SCENE (not the product): {style}\n",
        framing = descriptor.framing,
        label = descriptor.label,
        resolution = descriptor.resolution(),
        style = request.style.description(),
    );

    if let Some(hints) = request.style.hints() {
        prompt.push_str(&format!(
            "Style cues: {} mood; colors like {}; props such as {}\n",
            hints.mood,
            hints.colors.join(", "),
            hints.props
        ));
    }

    let palette = brand.palette.join(", ");
    let guidelines: Vec<(&str, &str)> = [
        ("Product", brand.product_name.as_str()),
        ("Product description", brand.product_description.as_str()),
        ("Tone", brand.tone.as_str()),
        ("Color Palette FOR BACKGROUND", palette.as_str()),
        ("Product Placement", brand.placement.as_str()),
        ("Composition", brand.composition.as_str()),
        ("Campaign tagline (mood only)", brand.tagline.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .collect();

    if !guidelines.is_empty() {
        prompt.push_str("\nBrand Guidelines for the SCENE:\n");
        for (label, value) in guidelines {
            prompt.push_str(&format!("- {}: {}\n", label, value.trim()));
        }
    }

    if let Some(scene) = request.scene {
        let directions: Vec<String> = [
            ("Background", scene.background_tone.as_str()),
            ("Surface", scene.surface_type.as_str()),
            ("Accent prop (subtle, non-dominant)", scene.accent_prop.as_str()),
            ("Lighting", scene.lighting.as_str()),
            ("Camera angle", scene.camera_angle.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("- {}: {}", label, value))
        .collect();

        if !directions.is_empty() {
            prompt.push_str("\nScene direction:\n");
            prompt.push_str(&directions.join("\n"));
            prompt.push('\n');
        }
    }

    prompt.push_str(&format!(
        "\nSpecific requirements for {}:\n- {}\n\n\
         FINAL REMINDER: Use the EXACT product from the provided image. Only create a new scene/background around it.",
        descriptor.label, descriptor.requirement
    ));

    prompt
}

/// Prompt for an empty background plate the real product is composited onto.
///
/// `scene` supplies the background, surface, prop, lighting and camera
/// fields; blank fields are left out.
pub fn background_plate_prompt(request: &GenerationRequest<'_>, scene: &StyleSuggestion) -> String {
    let descriptor = request.asset_type.descriptor();

    let mut prompt = format!(
        "Create a {framing} BACKGROUND PLATE for {label} with NO product, NO jars, NO bottles, \
         NO containers. Compose a premium minimal stage (target resolution {resolution}) that matches:\n",
        framing = descriptor.framing,
        label = descriptor.label,
        resolution = descriptor.resolution(),
    );

    for (label, value) in [
        ("Background", scene.background_tone.as_str()),
        ("Surface", scene.surface_type.as_str()),
        ("Accent prop (subtle, non-dominant)", scene.accent_prop.as_str()),
        ("Lighting", scene.lighting.as_str()),
        ("Camera angle", scene.camera_angle.as_str()),
    ] {
        if !value.trim().is_empty() {
            prompt.push_str(&format!("- {}: {}\n", label, value.trim()));
        }
    }

    prompt.push_str(&format!("- Visual style: {}\n", request.style.description()));
    if !request.brand.palette.is_empty() {
        prompt.push_str(&format!("- Palette: {}\n", request.brand.palette.join(", ")));
    }

    prompt.push_str(
        "\nLeave the central lower area clean for a product to be placed later. \
         Do not add any text. Return one image.",
    );
    prompt
}

/// Edit an existing background plate without adding a product or text
pub fn plate_edit_prompt(instruction: &str) -> String {
    format!(
        "Edit this BACKGROUND PLATE image ONLY. \
         Do NOT add any product, jars, bottles, or text. \
         Apply ONLY this change: {}. Return one image.",
        instruction.trim().trim_end_matches('.')
    )
}

/// Wrap a chat instruction with the rules that keep the product intact
pub fn chat_edit_prompt(instruction: &str) -> String {
    format!(
        "{}\n\n\
         CRITICAL RULES:\n\
         - DO NOT change the product itself - keep the EXACT same product from the image\n\
         - Only modify the background, lighting, props, or scene around the product\n\
         - Maintain the product's shape, color, branding, and all text exactly as shown\n\
         - The product must remain the central focus\n\
         - Ensure high quality photorealistic output",
        instruction.trim()
    )
}

/// System and user prompts asking the text model for scene suggestions
pub fn style_suggestion_prompts(brand: &BrandProfile, category: &str) -> (String, String) {
    let system = "You are a luxury product photographer/stylist.\n\
        Return JSON ONLY with asset style suggestions.\n\
        Format: {\"assets\":[{\"assetType\":\"...\", \"backgroundTone\":\"...\", \
        \"surfaceType\":\"...\", \"accentProp\":\"...\", \"lighting\":\"...\", \
        \"cameraAngle\":\"...\", \"suggestedText\":\"...\"}]}\n\
        Create one style per asset type, varied but cohesive."
        .to_string();

    let labels: Vec<&str> = AssetType::all().iter().map(|t| t.label()).collect();
    let user = format!(
        "Product: {}\nBrand: {}\nTone: {}\nColors: {}\nCategory: {}\n\n\
         Generate {} asset style suggestions for {}.",
        brand.product_name,
        brand.display_name(),
        brand.tone,
        brand.palette.join(", "),
        category,
        labels.len(),
        labels.join(", ")
    );

    (system, user)
}

/// Canned edit instructions for the chat panel
pub fn edit_suggestions(product_kind: &str) -> Vec<&'static str> {
    let mut suggestions = vec![
        "Change the background to a sunset beach",
        "Add golden hour lighting",
        "Make it more luxurious and premium",
        "Add subtle sparkle effects",
        "Place on a marble surface",
        "Add botanical elements around the product",
        "Create a dreamy, ethereal atmosphere",
        "Add water droplets for freshness",
        "Place in a minimalist setting",
        "Add geometric shadows",
    ];

    let kind = product_kind.to_lowercase();
    if kind.contains("serum") || kind.contains("skincare") {
        suggestions.extend([
            "Add dewdrops on the bottle",
            "Place with rose petals",
            "Create a spa-like atmosphere",
            "Add jade roller as prop",
        ]);
    } else if kind.contains("tech") {
        suggestions.extend([
            "Add holographic effects",
            "Create a futuristic background",
            "Add neon lighting",
            "Place on a tech desk setup",
        ]);
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{default_suggestions, ImageData, StylePreset};

    fn source() -> ImageData {
        ImageData::new(vec![0u8; 4], "image/png", 1, 1)
    }

    #[test]
    fn test_prompt_contains_brand_name() {
        let image = source();
        let brand = BrandProfile {
            name: "Acme".to_string(),
            ..Default::default()
        };
        let request =
            GenerationRequest::new(&image, AssetType::InstagramPost, StylePreset::Luxury, &brand);
        let prompt = generation_prompt(&request);

        assert!(!prompt.is_empty());
        assert!(prompt.contains("Acme"));
        assert!(prompt.contains(StylePreset::Luxury.description()));
        assert!(prompt.contains("square 1:1"));
        assert!(prompt.contains("1080x1080"));
    }

    #[test]
    fn test_brand_text_flag() {
        let image = source();
        let brand = BrandProfile {
            name: "Acme".to_string(),
            ..Default::default()
        };
        let on = generation_prompt(
            &GenerationRequest::new(&image, AssetType::AdCreative, StylePreset::Tech, &brand)
                .with_brand_text(true),
        );
        let off = generation_prompt(
            &GenerationRequest::new(&image, AssetType::AdCreative, StylePreset::Tech, &brand)
                .with_brand_text(false),
        );

        assert!(on.contains("including brand name 'Acme'"));
        assert!(!off.contains("including brand name"));
        assert!(off.contains("Keep product text visible"));
    }

    #[test]
    fn test_empty_optional_fields_are_omitted() {
        let image = source();
        let brand = BrandProfile {
            name: "Acme".to_string(),
            tone: String::new(),
            palette: Vec::new(),
            product_description: String::new(),
            tagline: String::new(),
            product_name: String::new(),
            placement: String::new(),
            composition: String::new(),
            quote: String::new(),
            customer_name: String::new(),
        };
        let prompt = generation_prompt(&GenerationRequest::new(
            &image,
            AssetType::WebsiteBanner,
            StylePreset::Minimalist,
            &brand,
        ));

        assert!(!prompt.contains("Brand Guidelines"));
        assert!(!prompt.contains("Tone:"));
        assert!(prompt.contains("horizontal 16:9"));
    }

    #[test]
    fn test_style_cues_only_for_named_presets() {
        let image = source();
        let brand = BrandProfile::default();
        let natural = generation_prompt(&GenerationRequest::new(
            &image,
            AssetType::AdCreative,
            StylePreset::Natural,
            &brand,
        ));
        let custom = generation_prompt(&GenerationRequest::new(
            &image,
            AssetType::AdCreative,
            StylePreset::Custom,
            &brand,
        ));
        assert!(natural.contains("plants, wood, stones"));
        assert!(!custom.contains("Style cues:"));
    }

    #[test]
    fn test_scene_direction_is_appended() {
        let image = source();
        let brand = BrandProfile::default();
        let scenes = default_suggestions();
        let prompt = generation_prompt(
            &GenerationRequest::new(&image, AssetType::InstagramStory, StylePreset::Natural, &brand)
                .with_scene(scenes.get(1)),
        );
        assert!(prompt.contains("Scene direction:"));
        assert!(prompt.contains("ethereal lavender mist"));
    }

    #[test]
    fn test_background_plate_prompt_uses_scene_fields() {
        let image = source();
        let brand = BrandProfile::default();
        let mut scene = default_suggestions().remove(2);
        scene.accent_prop = String::new();
        let request =
            GenerationRequest::new(&image, AssetType::WebsiteBanner, StylePreset::Natural, &brand);
        let prompt = background_plate_prompt(&request, &scene);

        assert!(prompt.starts_with("Create a horizontal 16:9 BACKGROUND PLATE for Website Banner"));
        assert!(prompt.contains("NO product"));
        assert!(prompt.contains("- Surface: water surface with gentle ripples"));
        assert!(!prompt.contains("Accent prop"));
        assert!(prompt.contains("deep emerald"));
        assert!(prompt.contains("Do not add any text"));
    }

    #[test]
    fn test_plate_edit_prompt() {
        let prompt = plate_edit_prompt(" Soften shadows slightly. ");
        assert!(prompt.contains("Apply ONLY this change: Soften shadows slightly. Return"));
        assert!(prompt.contains("Do NOT add any product"));
    }

    #[test]
    fn test_chat_prompt_keeps_instruction() {
        let prompt = chat_edit_prompt("  Add golden hour lighting ");
        assert!(prompt.starts_with("Add golden hour lighting"));
        assert!(prompt.contains("DO NOT change the product"));
    }

    #[test]
    fn test_edit_suggestions_by_product() {
        assert!(edit_suggestions("Capsula Serum X").contains(&"Add jade roller as prop"));
        assert!(edit_suggestions("Tech gadget").contains(&"Add neon lighting"));
        assert_eq!(edit_suggestions("Chair").len(), 10);
    }

    #[test]
    fn test_style_suggestion_prompts_list_all_types() {
        let (system, user) = style_suggestion_prompts(&BrandProfile::default(), "Skincare");
        assert!(system.contains("JSON ONLY"));
        for t in AssetType::all() {
            assert!(user.contains(t.label()));
        }
    }
}
