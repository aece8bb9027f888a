//! Per-session state: the uploaded product, brand inputs, batch results,
//! gallery and chat history. Owned by whoever drives the interaction loop.

use uuid::Uuid;

use crate::config::Config;
use crate::core::{
    AssetType, BrandProfile, ChatTarget, ChatTurn, GeneratedAsset, GenerationMode, ImageData,
    OverlayColor, Slot, StudioError, StylePreset, StyleSuggestion,
};
use crate::imaging::SourceImage;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub product: Option<SourceImage>,
    pub brand: BrandProfile,
    pub style: StylePreset,
    pub ensure_brand_text: bool,
    pub mode: GenerationMode,
    /// Text color of testimonial overlays
    pub overlay_color: OverlayColor,
    /// Selected asset types, kept in table order
    pub selected_assets: Vec<AssetType>,
    /// Slots of the latest batch, one per selected asset type
    pub results: Vec<Slot>,
    /// Saved assets in insertion order
    pub gallery: Vec<GeneratedAsset>,
    pub chat_history: Vec<ChatTurn>,
    /// Gallery index chat edits apply to
    pub chat_target: Option<usize>,
    pub style_suggestions: Vec<StyleSuggestion>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product: None,
            brand: BrandProfile::default(),
            style: StylePreset::default(),
            ensure_brand_text: true,
            mode: GenerationMode::default(),
            overlay_color: OverlayColor::default(),
            selected_assets: AssetType::all().to_vec(),
            results: Vec::new(),
            gallery: Vec::new(),
            chat_history: Vec::new(),
            chat_target: None,
            style_suggestions: Vec::new(),
        }
    }
}

impl Session {
    /// Start a session from the configured brand and studio defaults
    pub fn from_config(config: &Config) -> Self {
        Self {
            brand: config.brand.clone(),
            style: config.studio.style_preset,
            ensure_brand_text: config.studio.ensure_brand_text,
            mode: config.studio.mode,
            overlay_color: config.studio.overlay_color,
            ..Self::default()
        }
    }

    /// Replace the product image. Results of the previous product are dropped;
    /// the gallery and chat history stay.
    pub fn set_product(&mut self, product: SourceImage) {
        tracing::info!(
            "Product image set: {} ({}x{})",
            product.name,
            product.info.width,
            product.info.height
        );
        self.product = Some(product);
        self.results.clear();
    }

    pub fn product_image(&self) -> Result<&ImageData, StudioError> {
        self.product.as_ref().map(|p| &p.image).ok_or_else(|| {
            StudioError::InvalidParameter("Upload a product image first".to_string())
        })
    }

    pub fn is_selected(&self, asset_type: AssetType) -> bool {
        self.selected_assets.contains(&asset_type)
    }

    /// Flip selection of one asset type. Returns the new state.
    pub fn toggle_asset(&mut self, asset_type: AssetType) -> bool {
        if self.is_selected(asset_type) {
            self.selected_assets.retain(|t| *t != asset_type);
            false
        } else {
            self.selected_assets.push(asset_type);
            self.selected_assets.sort();
            true
        }
    }

    pub fn select_assets(&mut self, asset_types: &[AssetType]) {
        self.selected_assets = asset_types.to_vec();
        self.selected_assets.sort();
        self.selected_assets.dedup();
    }

    /// Replace the results with one queued slot per selected asset type
    pub fn begin_batch(&mut self) -> Result<usize, StudioError> {
        self.product_image()?;
        if self.selected_assets.is_empty() {
            return Err(StudioError::InvalidParameter(
                "Select at least one asset type".to_string(),
            ));
        }
        self.results = self.selected_assets.iter().copied().map(Slot::new).collect();
        Ok(self.results.len())
    }

    /// Copy a completed result into the gallery. Returns the new gallery index.
    pub fn save_to_gallery(&mut self, result_index: usize) -> Result<usize, StudioError> {
        let slot = self.results.get_mut(result_index).ok_or_else(|| {
            StudioError::InvalidParameter(format!("No result at position {}", result_index + 1))
        })?;
        let asset = slot.asset.clone().ok_or_else(|| {
            StudioError::InvalidParameter(format!(
                "{} has no image to save ({})",
                slot.asset_type, slot.status
            ))
        })?;

        slot.saved = true;
        self.gallery.push(asset);
        Ok(self.gallery.len() - 1)
    }

    /// Pick the gallery image chat edits apply to
    pub fn select_for_chat(&mut self, gallery_index: usize) -> Result<(), StudioError> {
        if gallery_index >= self.gallery.len() {
            return Err(StudioError::InvalidParameter(format!(
                "No gallery image at position {}",
                gallery_index + 1
            )));
        }
        self.chat_target = Some(gallery_index);
        Ok(())
    }

    /// The selected chat target and its asset
    pub fn chat_target(&self) -> Option<(ChatTarget, &GeneratedAsset)> {
        let index = self.chat_target?;
        let asset = self.gallery.get(index)?;
        Some((
            ChatTarget {
                gallery_index: index,
                asset_id: asset.id.clone(),
                asset_type: asset.asset_type,
            },
            asset,
        ))
    }

    pub fn record_chat_turn(&mut self, turn: ChatTurn) -> usize {
        self.chat_history.push(turn);
        self.chat_history.len() - 1
    }

    /// Save a chat result to the gallery as a new entry. The edited original
    /// stays where it is.
    pub fn save_chat_result(&mut self, turn_index: usize) -> Result<usize, StudioError> {
        let turn = self.chat_history.get(turn_index).ok_or_else(|| {
            StudioError::InvalidParameter(format!("No chat result at position {}", turn_index + 1))
        })?;
        self.gallery.push(turn.to_asset());
        Ok(self.gallery.len() - 1)
    }

    /// Scene direction suggested for this asset type, if any
    pub fn scene_for(&self, asset_type: AssetType) -> Option<&StyleSuggestion> {
        self.style_suggestions
            .iter()
            .find(|s| s.target() == Some(asset_type))
    }

    /// Drop results, gallery and chat. The product and brand stay.
    pub fn clear_cache(&mut self) {
        self.results.clear();
        self.gallery.clear();
        self.chat_history.clear();
        self.chat_target = None;
        self.style_suggestions.clear();
    }

    /// Back to a fresh session with the same starting brand and style
    pub fn reset(&mut self, config: &Config) {
        *self = Self::from_config(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ImageInfo;

    fn image(tag: u8) -> ImageData {
        ImageData::new(vec![tag; 4], "image/png", 2, 2)
    }

    fn product() -> SourceImage {
        SourceImage {
            name: "serum.png".to_string(),
            image: image(0),
            info: ImageInfo {
                width: 500,
                height: 500,
                format: "PNG".to_string(),
                file_size: "1.00 KB".to_string(),
                aspect_ratio: "1:1".to_string(),
            },
        }
    }

    fn session_with_results() -> Session {
        let mut session = Session::default();
        session.set_product(product());
        session.begin_batch().unwrap();
        for (i, slot) in session.results.iter_mut().enumerate() {
            let asset = GeneratedAsset::new(slot.asset_type, image(i as u8 + 1), "p");
            slot.set_completed(asset);
        }
        session
    }

    #[test]
    fn test_toggle_keeps_table_order() {
        let mut session = Session::default();
        session.select_assets(&[]);
        assert!(session.toggle_asset(AssetType::TestimonialGraphic));
        assert!(session.toggle_asset(AssetType::InstagramPost));
        assert_eq!(
            session.selected_assets,
            vec![AssetType::InstagramPost, AssetType::TestimonialGraphic]
        );
        assert!(!session.toggle_asset(AssetType::InstagramPost));
        assert_eq!(session.selected_assets, vec![AssetType::TestimonialGraphic]);
    }

    #[test]
    fn test_begin_batch_requires_product_and_selection() {
        let mut session = Session::default();
        assert!(matches!(session.begin_batch(), Err(StudioError::InvalidParameter(_))));

        session.set_product(product());
        session.select_assets(&[]);
        assert!(session.begin_batch().is_err());

        session.select_assets(&[AssetType::AdCreative, AssetType::WebsiteBanner]);
        assert_eq!(session.begin_batch().unwrap(), 2);
        assert_eq!(session.results[0].asset_type, AssetType::WebsiteBanner);
    }

    #[test]
    fn test_save_to_gallery_appends_exactly_one() {
        let mut session = session_with_results();
        session.save_to_gallery(2).unwrap();
        let first_ids: Vec<String> = session.gallery.iter().map(|a| a.id.clone()).collect();

        let index = session.save_to_gallery(0).unwrap();
        assert_eq!(index, 1);
        assert_eq!(session.gallery.len(), 2);
        assert_eq!(session.gallery[0].id, first_ids[0]);
        assert_eq!(session.gallery[1].asset_type, AssetType::InstagramPost);
        assert!(session.results[0].saved);
    }

    #[test]
    fn test_failed_slot_cannot_be_saved() {
        let mut session = session_with_results();
        session.results[1].set_failed("quota");
        assert!(session.save_to_gallery(1).is_err());
        assert!(session.save_to_gallery(99).is_err());
        assert!(session.gallery.is_empty());
    }

    #[test]
    fn test_chat_result_saved_as_new_entry() {
        let mut session = session_with_results();
        session.save_to_gallery(0).unwrap();
        session.select_for_chat(0).unwrap();
        let original = session.gallery[0].clone();

        let (target, _) = session.chat_target().unwrap();
        let turn = session.record_chat_turn(ChatTurn::new("add sparkle", target, image(42)));
        session.save_chat_result(turn).unwrap();

        assert_eq!(session.gallery.len(), 2);
        assert_eq!(session.gallery[0].image, original.image);
        assert_eq!(session.gallery[1].image, image(42));
        assert_eq!(session.gallery[1].asset_type, original.asset_type);
    }

    #[test]
    fn test_select_for_chat_bounds() {
        let mut session = Session::default();
        assert!(session.select_for_chat(0).is_err());
        assert!(session.chat_target().is_none());
    }

    #[test]
    fn test_clear_cache_and_reset() {
        let config = Config::default();
        let mut session = session_with_results();
        session.save_to_gallery(0).unwrap();
        session.brand.name = "Acme".to_string();

        session.clear_cache();
        assert!(session.results.is_empty());
        assert!(session.gallery.is_empty());
        assert!(session.product.is_some());
        assert_eq!(session.brand.name, "Acme");

        let old_id = session.id.clone();
        session.reset(&config);
        assert!(session.product.is_none());
        assert_eq!(session.brand, config.brand);
        assert_ne!(session.id, old_id);
    }
}
