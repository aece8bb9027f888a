use serde::{Deserialize, Serialize};

/// Brand parameters entered by the user. Lives for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandProfile {
    pub name: String,
    pub tone: String,
    /// Color values, e.g. ["coral blush", "deep emerald"]
    pub palette: Vec<String>,
    /// Free-text description of the product
    pub product_description: String,
    pub tagline: String,
    pub product_name: String,
    pub placement: String,
    pub composition: String,
    /// Customer quote used on testimonial graphics
    pub quote: String,
    pub customer_name: String,
}

impl Default for BrandProfile {
    fn default() -> Self {
        Self {
            name: "Capsula".to_string(),
            tone: "Modern biotech luxury - innovative, pure, immersive.".to_string(),
            palette: parse_palette(
                "Coral blush, teal turquoise, deep emerald, warm beige, onyx black.",
            ),
            product_description: "Hydrating face serum in a frosted glass dropper bottle"
                .to_string(),
            tagline: "Glow deeper. Shine brighter.".to_string(),
            product_name: "Capsula Serum X".to_string(),
            placement: "Geometric pedestals or refined vanity; sparse organic props.".to_string(),
            composition:
                "Clean symmetry for single-product; off-center for lifestyle; generous negative space."
                    .to_string(),
            quote: "My skin has never felt this good - truly a game-changer!".to_string(),
            customer_name: "Sarah M.".to_string(),
        }
    }
}

/// Split a comma or semicolon separated palette, dropping empties and a
/// trailing period.
pub fn parse_palette(input: &str) -> Vec<String> {
    input
        .split([',', ';'])
        .map(|c| c.trim().trim_end_matches('.').trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Editable fields of a brand profile, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandField {
    Name,
    Tone,
    Palette,
    ProductName,
    ProductDescription,
    Tagline,
    Placement,
    Composition,
    Quote,
    CustomerName,
}

impl BrandField {
    pub fn all() -> &'static [BrandField] {
        &[
            BrandField::Name,
            BrandField::Tone,
            BrandField::Palette,
            BrandField::ProductName,
            BrandField::ProductDescription,
            BrandField::Tagline,
            BrandField::Placement,
            BrandField::Composition,
            BrandField::Quote,
            BrandField::CustomerName,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            BrandField::Name => "Brand Name",
            BrandField::Tone => "Brand Tone & Voice",
            BrandField::Palette => "Color Palette",
            BrandField::ProductName => "Product Name",
            BrandField::ProductDescription => "Product Description",
            BrandField::Tagline => "Tagline",
            BrandField::Placement => "Product Placement",
            BrandField::Composition => "Composition",
            BrandField::Quote => "Customer Quote",
            BrandField::CustomerName => "Customer Name",
        }
    }

    /// Key under the `[brand]` config section
    pub fn config_key(&self) -> &'static str {
        match self {
            BrandField::Name => "brand.name",
            BrandField::Tone => "brand.tone",
            BrandField::Palette => "brand.palette",
            BrandField::ProductName => "brand.product_name",
            BrandField::ProductDescription => "brand.product_description",
            BrandField::Tagline => "brand.tagline",
            BrandField::Placement => "brand.placement",
            BrandField::Composition => "brand.composition",
            BrandField::Quote => "brand.quote",
            BrandField::CustomerName => "brand.customer_name",
        }
    }

    pub fn from_config_key(key: &str) -> Option<BrandField> {
        BrandField::all().iter().copied().find(|f| f.config_key() == key)
    }
}

impl BrandProfile {
    pub fn get(&self, field: BrandField) -> String {
        match field {
            BrandField::Name => self.name.clone(),
            BrandField::Tone => self.tone.clone(),
            BrandField::Palette => self.palette.join(", "),
            BrandField::ProductName => self.product_name.clone(),
            BrandField::ProductDescription => self.product_description.clone(),
            BrandField::Tagline => self.tagline.clone(),
            BrandField::Placement => self.placement.clone(),
            BrandField::Composition => self.composition.clone(),
            BrandField::Quote => self.quote.clone(),
            BrandField::CustomerName => self.customer_name.clone(),
        }
    }

    pub fn set(&mut self, field: BrandField, value: &str) {
        let value = value.trim().to_string();
        match field {
            BrandField::Name => self.name = value,
            BrandField::Tone => self.tone = value,
            BrandField::Palette => self.palette = parse_palette(&value),
            BrandField::ProductName => self.product_name = value,
            BrandField::ProductDescription => self.product_description = value,
            BrandField::Tagline => self.tagline = value,
            BrandField::Placement => self.placement = value,
            BrandField::Composition => self.composition = value,
            BrandField::Quote => self.quote = value,
            BrandField::CustomerName => self.customer_name = value,
        }
    }

    /// Brand name, or a neutral phrase when none was entered
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            "the brand"
        } else {
            name
        }
    }

    /// Text used to pick edit suggestions: product name plus description
    pub fn product_kind(&self) -> String {
        format!("{} {}", self.product_name, self.product_description)
    }
}
