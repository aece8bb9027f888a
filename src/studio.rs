//! The generation pipeline: prompt assembly, one model call, post-processing,
//! and storing the result in the session.

use image::DynamicImage;
use rusttype::Font;
use std::path::Path;

use crate::api::ImageGenerator;
use crate::config::Config;
use crate::core::prompt::{
    background_plate_prompt, chat_edit_prompt, generation_prompt, plate_edit_prompt,
    style_suggestion_prompts,
};
use crate::core::{
    default_suggestion_for, default_suggestions, parse_suggestions, AssetType, BrandProfile,
    ChatTurn, Finish, GenerateParams, GeneratedAsset, GenerationMode, GenerationRequest, ImageData,
    OverlayColor, Slot, SlotStatus, StudioError,
};
use crate::imaging;
use crate::overlay::{self, Testimonial};
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct StudioSettings {
    /// Crop and resize model output to the asset type's resolution
    pub fit_to_resolution: bool,
    /// Product category for style suggestions
    pub category: String,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            fit_to_resolution: true,
            category: "Skincare".to_string(),
        }
    }
}

/// Outcome of a "Generate All" batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub failed: Vec<(AssetType, String)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.completed + self.failed.len()
    }
}

pub struct Studio<G: ImageGenerator> {
    generator: G,
    settings: StudioSettings,
    font: Option<Font<'static>>,
}

impl<G: ImageGenerator> Studio<G> {
    pub fn new(generator: G, config: &Config) -> Self {
        let font = overlay::load_font(config.studio.font_path.as_deref().map(Path::new));
        Self {
            generator,
            settings: StudioSettings {
                fit_to_resolution: config.studio.fit_to_resolution,
                category: config.studio.category.clone(),
            },
            font,
        }
    }

    pub fn with_settings(generator: G, settings: StudioSettings) -> Self {
        Self {
            generator,
            settings,
            font: None,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Generate one asset with a single model call.
    ///
    /// Scene mode sends the product as the reference image and lets the model
    /// re-stage it. Product-lock mode asks for an empty background plate and
    /// composites the real product photo onto it. Either way the result is
    /// fitted to the asset type's resolution and finished.
    pub async fn generate_asset(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<GeneratedAsset, StudioError> {
        match request.mode {
            GenerationMode::Scene => self.generate_scene(request).await,
            GenerationMode::ProductLock => self.generate_locked(request).await,
        }
    }

    async fn generate_scene(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<GeneratedAsset, StudioError> {
        let descriptor = request.asset_type.descriptor();
        let prompt = generation_prompt(&request);

        let params = GenerateParams::new(prompt.clone())
            .with_aspect_ratio(descriptor.aspect_ratio())
            .with_model(self.generator.image_model())
            .with_reference_image(request.source.clone());

        tracing::info!("Generating {} ({})", descriptor.label, descriptor.resolution());
        let raw = self.generator.generate_image(&params).await?;
        let img = self.fit(imaging::decode(&raw)?, request.asset_type);

        let finish = Finish::for_asset(request.asset_type);
        let finished = self.apply_finish(&img, finish, request.brand, request.overlay_color);
        Ok(GeneratedAsset::finished(
            request.asset_type,
            imaging::encode_png(&img)?,
            imaging::encode_png(&finished)?,
            finish,
            prompt,
        ))
    }

    async fn generate_locked(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<GeneratedAsset, StudioError> {
        let descriptor = request.asset_type.descriptor();
        let fallback = default_suggestion_for(request.asset_type).unwrap_or_default();
        let scene = request.scene.unwrap_or(&fallback);
        let prompt = background_plate_prompt(&request, scene);

        // No reference image: the model never sees the product
        let params = GenerateParams::new(prompt.clone())
            .with_aspect_ratio(descriptor.aspect_ratio())
            .with_model(self.generator.image_model());

        tracing::info!(
            "Generating {} background plate ({})",
            descriptor.label,
            descriptor.resolution()
        );
        let raw = self.generator.generate_image(&params).await?;
        let plate = self.fit(imaging::decode(&raw)?, request.asset_type);
        let product = imaging::decode(request.source)?;
        let composite = imaging::composite_on_plate(&plate, &product);

        let finish = Finish::for_asset(request.asset_type);
        let finished = self.apply_finish(&composite, finish, request.brand, request.overlay_color);
        Ok(GeneratedAsset::finished(
            request.asset_type,
            imaging::encode_png(&composite)?,
            imaging::encode_png(&finished)?,
            finish,
            prompt,
        )
        .with_plate(imaging::encode_png(&plate)?))
    }

    fn fit(&self, img: DynamicImage, asset_type: AssetType) -> DynamicImage {
        if !self.settings.fit_to_resolution {
            return img;
        }
        let descriptor = asset_type.descriptor();
        imaging::fit_to_resolution(&img, descriptor.width, descriptor.height)
    }

    /// Re-crop, then draw the customer quote if the finish asks for it
    fn apply_finish(
        &self,
        base: &DynamicImage,
        finish: Finish,
        brand: &BrandProfile,
        color: OverlayColor,
    ) -> DynamicImage {
        let img = match finish.aspect.ratio() {
            Some(ratio) => imaging::aspect_crop(base, ratio),
            None => base.clone(),
        };
        if !finish.overlay {
            return img;
        }
        let testimonial = Testimonial {
            quote: &brand.quote,
            customer_name: &brand.customer_name,
            product_name: &brand.product_name,
        };
        overlay::testimonial_overlay(&img, &testimonial, self.font.as_ref(), color)
    }

    /// Run one slot of the current batch. The outcome lands in the slot;
    /// a failure here never touches the other slots.
    pub async fn run_slot(&self, session: &mut Session, index: usize) -> Result<(), StudioError> {
        let asset_type = match session.results.get_mut(index) {
            Some(slot) => {
                slot.set_running();
                slot.asset_type
            }
            None => {
                return Err(StudioError::InvalidParameter(format!(
                    "No result slot at position {}",
                    index + 1
                )))
            }
        };

        let outcome = {
            let source = session.product_image()?;
            let request = GenerationRequest::new(source, asset_type, session.style, &session.brand)
                .with_brand_text(session.ensure_brand_text)
                .with_scene(session.scene_for(asset_type))
                .with_mode(session.mode)
                .with_overlay_color(session.overlay_color);
            self.generate_asset(request).await
        };

        if let Some(slot) = session.results.get_mut(index) {
            match outcome {
                Ok(asset) => slot.set_completed(asset),
                Err(e) => {
                    tracing::warn!("{} failed: {}", asset_type, e);
                    slot.set_failed(e.user_message());
                }
            }
        }
        Ok(())
    }

    /// "Generate All": one sequential call per selected asset type.
    /// `on_progress` is called after each slot settles.
    pub async fn generate_all<F>(
        &self,
        session: &mut Session,
        mut on_progress: F,
    ) -> Result<BatchSummary, StudioError>
    where
        F: FnMut(usize, &Slot),
    {
        let count = session.begin_batch()?;
        tracing::info!("Generating {} assets", count);

        for index in 0..count {
            self.run_slot(session, index).await?;
            on_progress(index, &session.results[index]);
        }

        Ok(summarize(&session.results))
    }

    /// Apply a natural-language edit to the selected gallery image.
    /// Appends a chat turn and returns its index; the original is untouched.
    pub async fn chat_edit(
        &self,
        session: &mut Session,
        instruction: &str,
    ) -> Result<usize, StudioError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(StudioError::InvalidParameter(
                "Enter an edit instruction".to_string(),
            ));
        }
        let (target, asset) = session.chat_target().ok_or_else(|| {
            StudioError::InvalidParameter("Select a gallery image to edit first".to_string())
        })?;

        let descriptor = target.asset_type.descriptor();
        let params = GenerateParams::new(chat_edit_prompt(instruction))
            .with_aspect_ratio(descriptor.aspect_ratio())
            .with_model(self.generator.image_model())
            .with_reference_image(asset.image.clone());

        tracing::info!("Editing {} ({}): {}", target.asset_type, target.asset_id, instruction);
        let raw = self.generator.generate_image(&params).await?;
        let result = self.finish_edit(&raw, target.asset_type)?;

        Ok(session.record_chat_turn(ChatTurn::new(instruction, target, result)))
    }

    fn finish_edit(&self, raw: &ImageData, asset_type: AssetType) -> Result<ImageData, StudioError> {
        if !self.settings.fit_to_resolution {
            return Ok(raw.clone());
        }
        imaging::encode_png(&self.fit(imaging::decode(raw)?, asset_type))
    }

    /// Edit only the background plate of a product-lock result, then
    /// composite the product again. The result replaces the slot's asset;
    /// gallery copies keep the old image.
    pub async fn edit_plate(
        &self,
        session: &mut Session,
        result_index: usize,
        instruction: &str,
    ) -> Result<(), StudioError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(StudioError::InvalidParameter(
                "Enter a background edit instruction".to_string(),
            ));
        }
        let asset = completed_asset(session, result_index)?;
        let plate = asset.plate.clone().ok_or_else(|| {
            StudioError::InvalidParameter(format!(
                "{} has no background plate. Generate it in product-lock mode",
                asset.asset_type
            ))
        })?;

        let descriptor = asset.asset_type.descriptor();
        let prompt = plate_edit_prompt(instruction);
        let params = GenerateParams::new(prompt.clone())
            .with_aspect_ratio(descriptor.aspect_ratio())
            .with_model(self.generator.image_model())
            .with_reference_image(plate);

        tracing::info!("Editing {} background: {}", asset.asset_type, instruction);
        let raw = self.generator.generate_image(&params).await?;
        let new_plate = self.fit(imaging::decode(&raw)?, asset.asset_type);
        let product = imaging::decode(session.product_image()?)?;
        let composite = imaging::composite_on_plate(&new_plate, &product);
        let finished =
            self.apply_finish(&composite, asset.finish, &session.brand, session.overlay_color);

        let edited = GeneratedAsset::finished(
            asset.asset_type,
            imaging::encode_png(&composite)?,
            imaging::encode_png(&finished)?,
            asset.finish,
            prompt,
        )
        .with_plate(imaging::encode_png(&new_plate)?);

        if let Some(slot) = session.results.get_mut(result_index) {
            slot.set_completed(edited);
            slot.saved = false;
        }
        Ok(())
    }

    /// Apply a new crop or overlay setting to a result. No model call.
    pub fn refinish(
        &self,
        session: &mut Session,
        result_index: usize,
        finish: Finish,
    ) -> Result<(), StudioError> {
        let asset = completed_asset(session, result_index)?;
        let base = imaging::decode(&asset.base)?;
        let finished = self.apply_finish(&base, finish, &session.brand, session.overlay_color);
        let refinished = asset.refinished(imaging::encode_png(&finished)?, finish);

        if let Some(slot) = session.results.get_mut(result_index) {
            slot.asset = Some(refinished);
            slot.saved = false;
        }
        Ok(())
    }

    /// Ask the text model for scene directions. Falls back to the built-in
    /// suggestions on any failure. Returns whether the model's answer was used.
    pub async fn suggest_styles(&self, session: &mut Session) -> bool {
        let (system, user) = style_suggestion_prompts(&session.brand, &self.settings.category);

        let parsed = match self.generator.complete_text(&system, &user).await {
            Ok(text) => parse_suggestions(&text),
            Err(e) => {
                tracing::warn!("Style suggestions failed: {}", e);
                None
            }
        };

        match parsed {
            Some(suggestions) => {
                session.style_suggestions = suggestions;
                true
            }
            None => {
                session.style_suggestions = default_suggestions();
                false
            }
        }
    }
}

fn completed_asset(session: &Session, result_index: usize) -> Result<GeneratedAsset, StudioError> {
    let slot = session.results.get(result_index).ok_or_else(|| {
        StudioError::InvalidParameter(format!("No result at position {}", result_index + 1))
    })?;
    slot.asset.clone().ok_or_else(|| {
        StudioError::InvalidParameter(format!("{} has no image yet ({})", slot.asset_type, slot.status))
    })
}

fn summarize(results: &[Slot]) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for slot in results {
        match &slot.status {
            SlotStatus::Completed => summary.completed += 1,
            SlotStatus::Failed { error } => {
                summary.failed.push((slot.asset_type, error.clone()))
            }
            _ => {}
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CropAspect;
    use crate::imaging::{ImageInfo, SourceImage};
    use async_trait::async_trait;
    use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba};
    use std::sync::Mutex;

    fn png(w: u32, h: u32, shade: u8) -> ImageData {
        let img = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(w, h, Rgba([shade, 0, 0, 255])));
        imaging::encode_png(&img).unwrap()
    }

    /// Records every call; fails when the prompt mentions `fail_on`
    #[derive(Default)]
    struct FakeGenerator {
        calls: Mutex<Vec<GenerateParams>>,
        fail_on: Option<&'static str>,
        text_reply: Option<&'static str>,
    }

    impl FakeGenerator {
        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ImageGenerator for FakeGenerator {
        async fn generate_image(&self, params: &GenerateParams) -> Result<ImageData, StudioError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(params.clone());
                calls.len() - 1
            };
            if let Some(needle) = self.fail_on {
                if params.prompt.contains(needle) {
                    return Err(StudioError::QuotaExceeded("slow down".to_string()));
                }
            }
            // every call paints a different shade
            Ok(png(64, 48, 200u8.saturating_sub((call as u8).saturating_mul(40))))
        }

        async fn complete_text(&self, _system: &str, _user: &str) -> Result<String, StudioError> {
            self.text_reply
                .map(str::to_string)
                .ok_or(StudioError::Timeout)
        }

        fn image_model(&self) -> &str {
            "fake-image-model"
        }
    }

    fn studio(generator: FakeGenerator) -> Studio<FakeGenerator> {
        Studio::with_settings(generator, StudioSettings::default())
    }

    fn session() -> Session {
        let mut session = Session::default();
        session.brand.name = "Acme".to_string();
        session.set_product(SourceImage {
            name: "product.png".to_string(),
            image: png(320, 320, 10),
            info: ImageInfo {
                width: 320,
                height: 320,
                format: "PNG".to_string(),
                file_size: "1.00 KB".to_string(),
                aspect_ratio: "1:1".to_string(),
            },
        });
        session
    }

    #[tokio::test]
    async fn test_generate_all_one_call_per_selected_type() {
        let studio = studio(FakeGenerator::default());
        let mut session = session();
        session.select_assets(&[
            AssetType::InstagramPost,
            AssetType::InstagramStory,
            AssetType::WebsiteBanner,
        ]);

        let mut progress = Vec::new();
        let summary = studio
            .generate_all(&mut session, |i, slot| progress.push((i, slot.status.clone())))
            .await
            .unwrap();

        assert_eq!(studio.generator().call_count(), 3);
        assert_eq!(summary.completed, 3);
        assert_eq!(session.results.len(), 3);
        assert_eq!(progress.len(), 3);

        for slot in &session.results {
            let asset = slot.asset.as_ref().unwrap();
            let d = slot.asset_type.descriptor();
            assert_eq!((asset.image.width, asset.image.height), (d.width, d.height));
        }

        let calls = studio.generator().calls.lock().unwrap();
        assert_eq!(calls[1].aspect_ratio, "9:16");
        assert_eq!(calls[0].model, "fake-image-model");
        assert!(calls.iter().all(|c| c.is_edit() && c.prompt.contains("Acme")));
    }

    #[tokio::test]
    async fn test_failed_slot_does_not_block_others() {
        let studio = studio(FakeGenerator {
            fail_on: Some("Website Banner"),
            ..Default::default()
        });
        let mut session = session();

        let summary = studio.generate_all(&mut session, |_, _| {}).await.unwrap();

        assert_eq!(studio.generator().call_count(), AssetType::all().len());
        assert_eq!(summary.total(), AssetType::all().len());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, AssetType::WebsiteBanner);

        let banner = &session.results[2];
        assert!(matches!(banner.status, SlotStatus::Failed { .. }));
        assert!(session.results[3].asset.is_some());
    }

    #[tokio::test]
    async fn test_generate_all_without_product_makes_no_calls() {
        let studio = studio(FakeGenerator::default());
        let mut session = Session::default();
        let err = studio.generate_all(&mut session, |_, _| {}).await.unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::Input);
        assert_eq!(studio.generator().call_count(), 0);
    }

    #[tokio::test]
    async fn test_testimonial_keeps_resolution() {
        let studio = studio(FakeGenerator::default());
        let session = session();
        let source = session.product_image().unwrap();
        let request = GenerationRequest::new(
            source,
            AssetType::TestimonialGraphic,
            session.style,
            &session.brand,
        );
        let asset = studio.generate_asset(request).await.unwrap();
        let img = imaging::decode(&asset.image).unwrap();
        assert_eq!(img.dimensions(), (1080, 1080));
        // bottom third is darkened by the band
        let px = img.get_pixel(540, 1000);
        assert!(px[0] < 200);
    }

    /// The product as it must appear on a plate of `plate_size`
    fn expected_product(session: &Session, plate_size: (u32, u32)) -> imaging::Placement {
        let product = imaging::decode(session.product_image().unwrap()).unwrap();
        imaging::place_product(plate_size, &product)
    }

    fn assert_product_intact(image: &ImageData, placement: &imaging::Placement) {
        let img = imaging::decode(image).unwrap().to_rgba8();
        let (w, h) = placement.product.dimensions();
        for y in 0..h {
            for x in 0..w {
                assert_eq!(
                    img.get_pixel(placement.x as u32 + x, placement.y as u32 + y),
                    placement.product.get_pixel(x, y),
                    "product pixel ({}, {}) changed",
                    x,
                    y
                );
            }
        }
    }

    #[tokio::test]
    async fn test_product_lock_composites_the_real_product() {
        let studio = studio(FakeGenerator::default());
        let mut session = session();
        session.mode = GenerationMode::ProductLock;
        session.select_assets(&[AssetType::InstagramPost]);

        let summary = studio.generate_all(&mut session, |_, _| {}).await.unwrap();
        assert_eq!(summary.completed, 1);

        let calls = studio.generator().calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].is_edit());
        assert!(calls[0].prompt.contains("BACKGROUND PLATE"));
        assert!(calls[0].prompt.contains("coral to cream"));

        let asset = session.results[0].asset.as_ref().unwrap();
        let plate = asset.plate.as_ref().unwrap();
        assert_eq!((plate.width, plate.height), (1080, 1080));
        assert_eq!((asset.image.width, asset.image.height), (1080, 1080));
        assert_product_intact(&asset.image, &expected_product(&session, (1080, 1080)));

        // background outside the product comes from the plate
        let composite = imaging::decode(&asset.image).unwrap();
        let background = imaging::decode(plate).unwrap();
        assert_eq!(composite.get_pixel(5, 5), background.get_pixel(5, 5));
    }

    #[tokio::test]
    async fn test_plate_edit_recomposites_without_touching_product() {
        let studio = studio(FakeGenerator::default());
        let mut session = session();
        session.mode = GenerationMode::ProductLock;
        session.select_assets(&[AssetType::InstagramStory]);
        studio.generate_all(&mut session, |_, _| {}).await.unwrap();
        session.save_to_gallery(0).unwrap();
        let before = session.results[0].asset.clone().unwrap();

        studio
            .edit_plate(&mut session, 0, "Soften shadows slightly")
            .await
            .unwrap();

        let after = session.results[0].asset.as_ref().unwrap();
        assert_eq!(after.asset_type, AssetType::InstagramStory);
        assert_ne!(after.plate, before.plate);
        assert_ne!(after.image, before.image);
        assert_product_intact(&after.image, &expected_product(&session, (1080, 1920)));
        assert!(!session.results[0].saved);
        // the saved copy is left alone
        assert_eq!(session.gallery[0].image, before.image);

        let calls = studio.generator().calls.lock().unwrap();
        let last = calls.last().unwrap();
        assert!(last.prompt.starts_with("Edit this BACKGROUND PLATE"));
        assert!(last.prompt.contains("Soften shadows slightly"));
        assert_eq!(last.reference_image.as_ref(), before.plate.as_ref());
        assert_eq!(last.aspect_ratio, "9:16");
    }

    #[tokio::test]
    async fn test_plate_edit_needs_a_plate() {
        let studio = studio(FakeGenerator::default());
        let mut session = session();
        session.select_assets(&[AssetType::AdCreative]);
        studio.generate_all(&mut session, |_, _| {}).await.unwrap();

        let err = studio.edit_plate(&mut session, 0, "warmer light").await.unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::Input);
        assert!(studio.edit_plate(&mut session, 0, "  ").await.is_err());
        assert!(studio.edit_plate(&mut session, 7, "warmer light").await.is_err());
        assert_eq!(studio.generator().call_count(), 1);
    }

    #[tokio::test]
    async fn test_refinish_crops_and_overlays_from_base() {
        let studio = studio(FakeGenerator::default());
        let mut session = session();
        session.select_assets(&[AssetType::InstagramPost]);
        studio.generate_all(&mut session, |_, _| {}).await.unwrap();
        let base = session.results[0].asset.as_ref().unwrap().base.clone();

        let finish = Finish {
            aspect: CropAspect::Portrait,
            overlay: true,
        };
        studio.refinish(&mut session, 0, finish).unwrap();

        let asset = session.results[0].asset.as_ref().unwrap();
        assert_eq!(asset.finish, finish);
        assert_eq!(asset.base, base);
        let img = imaging::decode(&asset.image).unwrap();
        assert_eq!(img.dimensions(), (607, 1080));
        assert!(img.get_pixel(300, 1050)[0] < 150);
        assert!(img.get_pixel(300, 10)[0] >= 150);

        studio
            .refinish(&mut session, 0, Finish::for_asset(AssetType::InstagramPost))
            .unwrap();
        let asset = session.results[0].asset.as_ref().unwrap();
        assert_eq!((asset.image.width, asset.image.height), (1080, 1080));
        assert_eq!(studio.generator().call_count(), 1);
    }

    #[tokio::test]
    async fn test_chat_edit_appends_and_keeps_original() {
        let studio = studio(FakeGenerator::default());
        let mut session = session();
        session.select_assets(&[AssetType::InstagramPost]);
        studio.generate_all(&mut session, |_, _| {}).await.unwrap();
        session.save_to_gallery(0).unwrap();
        session.select_for_chat(0).unwrap();
        let original = session.gallery[0].clone();

        let index = studio.chat_edit(&mut session, "  Add golden hour lighting ").await.unwrap();

        assert_eq!(index, 0);
        assert_eq!(session.chat_history.len(), 1);
        assert_eq!(session.chat_history[0].instruction, "Add golden hour lighting");
        assert_eq!(session.chat_history[0].target.asset_id, original.id);
        assert_eq!(session.gallery.len(), 1);
        assert_eq!(session.gallery[0].image, original.image);

        let calls = studio.generator().calls.lock().unwrap();
        let last = calls.last().unwrap();
        assert!(last.prompt.starts_with("Add golden hour lighting"));
        assert_eq!(last.reference_image.as_ref(), Some(&original.image));
    }

    #[tokio::test]
    async fn test_chat_edit_rejects_empty_and_untargeted() {
        let studio = studio(FakeGenerator::default());
        let mut session = session();
        assert!(studio.chat_edit(&mut session, "   ").await.is_err());
        assert!(studio.chat_edit(&mut session, "add sparkle").await.is_err());
        assert_eq!(studio.generator().call_count(), 0);
        assert!(session.chat_history.is_empty());
    }

    #[tokio::test]
    async fn test_suggest_styles_falls_back_to_defaults() {
        let studio = studio(FakeGenerator::default());
        let mut session = session();
        assert!(!studio.suggest_styles(&mut session).await);
        assert_eq!(session.style_suggestions, default_suggestions());
    }

    #[tokio::test]
    async fn test_suggest_styles_uses_model_reply() {
        let studio = studio(FakeGenerator {
            text_reply: Some(
                "```json\n{\"assets\":[{\"assetType\":\"Ad Creative\",\"lighting\":\"hard noon sun\"}]}\n```",
            ),
            ..Default::default()
        });
        let mut session = session();
        assert!(studio.suggest_styles(&mut session).await);
        assert_eq!(session.style_suggestions.len(), 1);
        assert!(session.scene_for(AssetType::AdCreative).is_some());
        assert!(session.scene_for(AssetType::InstagramPost).is_none());
    }
}
