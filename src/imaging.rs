//! Image I/O: upload validation, PNG normalisation, cropping and resizing,
//! sample images and export.

use image::imageops::{self, FilterType};
use image::{
    DynamicImage, GenericImageView, ImageBuffer, ImageFormat, ImageOutputFormat, Rgba, RgbaImage,
};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::core::{GeneratedAsset, ImageData, StudioError};

pub const MIN_UPLOAD_SIDE: u32 = 300;
pub const MAX_UPLOAD_SIDE: u32 = 4000;
/// Longest side of an image printed to the terminal
pub const PREVIEW_SIDE: u32 = 1024;

/// The product photo the user uploaded
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// File name as uploaded
    pub name: String,
    /// Normalised RGBA PNG
    pub image: ImageData,
    pub info: ImageInfo,
}

/// Facts about an uploaded file, for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub file_size: String,
    pub aspect_ratio: String,
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// "1080:1920" reduced to "9:16"
pub fn reduced_ratio(width: u32, height: u32) -> String {
    let g = gcd(width, height).max(1);
    format!("{}:{}", width / g, height / g)
}

/// Human readable size, e.g. "1.50 MB"
pub fn format_file_size(size_bytes: u64) -> String {
    let mut size = size_bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} TB", size)
}

fn is_supported_extension(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("png") | Some("jpg") | Some("jpeg")
    )
}

/// Validate and normalise uploaded bytes.
///
/// Only PNG and JPEG content is accepted. The image must be between
/// `MIN_UPLOAD_SIDE` and `MAX_UPLOAD_SIDE` pixels on each side. The result
/// is re-encoded as RGBA PNG.
pub fn load_upload(name: &str, bytes: &[u8]) -> Result<SourceImage, StudioError> {
    let format = image::guess_format(bytes)
        .map_err(|_| StudioError::UnsupportedImage(format!("{} (unrecognised content)", name)))?;
    let format_name = match format {
        ImageFormat::Png => "PNG",
        ImageFormat::Jpeg => "JPEG",
        other => {
            return Err(StudioError::UnsupportedImage(format!("{} ({:?})", name, other)));
        }
    };

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| StudioError::InvalidImage(format!("{}: {}", name, e)))?;
    let (width, height) = img.dimensions();

    if width < MIN_UPLOAD_SIDE || height < MIN_UPLOAD_SIDE {
        return Err(StudioError::InvalidImage(format!(
            "resolution {}x{} is too low. Please use at least {}x{} pixels",
            width, height, MIN_UPLOAD_SIDE, MIN_UPLOAD_SIDE
        )));
    }
    if width > MAX_UPLOAD_SIDE || height > MAX_UPLOAD_SIDE {
        return Err(StudioError::InvalidImage(format!(
            "{}x{} is too large. Please use images under {}x{} pixels",
            width, height, MAX_UPLOAD_SIDE, MAX_UPLOAD_SIDE
        )));
    }

    let info = ImageInfo {
        width,
        height,
        format: format_name.to_string(),
        file_size: format_file_size(bytes.len() as u64),
        aspect_ratio: reduced_ratio(width, height),
    };

    let image = encode_png(&DynamicImage::ImageRgba8(img.to_rgba8()))?;

    Ok(SourceImage {
        name: name.to_string(),
        image,
        info,
    })
}

/// Read an upload from disk. The extension must be png/jpg/jpeg.
pub async fn load_upload_file(path: &Path) -> Result<SourceImage, StudioError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    if !is_supported_extension(path) {
        return Err(StudioError::UnsupportedImage(name));
    }

    let bytes = tokio::fs::read(path).await?;
    load_upload(&name, &bytes)
}

pub fn decode(image: &ImageData) -> Result<DynamicImage, StudioError> {
    Ok(image::load_from_memory(&image.bytes)?)
}

pub fn encode_png(img: &DynamicImage) -> Result<ImageData, StudioError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageOutputFormat::Png)?;
    Ok(ImageData::new(
        buf.into_inner(),
        "image/png",
        img.width(),
        img.height(),
    ))
}

/// Center-crop to the target aspect ratio
pub fn aspect_crop(img: &DynamicImage, ratio: (u32, u32)) -> DynamicImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || ratio.0 == 0 || ratio.1 == 0 {
        return img.clone();
    }

    let target = ratio.0 as f64 / ratio.1 as f64;
    let current = w as f64 / h as f64;

    if (current - target).abs() < 1e-6 {
        return img.clone();
    }

    if current > target {
        // too wide
        let new_w = ((h as f64 * target) as u32).max(1);
        let left = (w - new_w) / 2;
        img.crop_imm(left, 0, new_w, h)
    } else {
        let new_h = ((w as f64 / target) as u32).max(1);
        let top = (h - new_h) / 2;
        img.crop_imm(0, top, w, new_h)
    }
}

/// Crop to the aspect of `width`x`height`, then resize to exactly that size
pub fn fit_to_resolution(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    let g = gcd(width, height).max(1);
    let cropped = aspect_crop(img, (width / g, height / g));
    cropped.resize_exact(width, height, FilterType::Lanczos3)
}

/// Product width as a share of the plate width
const PRODUCT_SCALE: f32 = 0.55;
/// Tallest the product may get, as a share of the plate height
const PRODUCT_MAX_HEIGHT: f32 = 0.8;
/// Top edge of the product, as a share of the plate height
const PRODUCT_TOP: f32 = 0.38;
const BOTTOM_MARGIN: f32 = 0.04;
/// Shadow geometry at a 1080 px wide plate; scaled with the plate
const SHADOW_SIGMA: f32 = 24.0;
const SHADOW_OFFSET: f32 = 18.0;
const SHADOW_OPACITY: u32 = 120;

/// Where and how large the product lands on a plate
#[derive(Debug, Clone)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    /// The product resized for the plate
    pub product: RgbaImage,
}

/// Size the product to 55% of the plate width (less if that would make it
/// too tall), centred horizontally with its top at 38% of the plate height,
/// nudged up to keep a bottom margin.
pub fn place_product(plate_size: (u32, u32), product: &DynamicImage) -> Placement {
    let (pw, ph) = plate_size;
    let (w, h) = product.dimensions();

    let mut scale = pw as f32 * PRODUCT_SCALE / w.max(1) as f32;
    if h as f32 * scale > ph as f32 * PRODUCT_MAX_HEIGHT {
        scale = ph as f32 * PRODUCT_MAX_HEIGHT / h.max(1) as f32;
    }
    let tw = ((w as f32 * scale).round() as u32).max(1);
    let th = ((h as f32 * scale).round() as u32).max(1);
    let resized = imageops::resize(&product.to_rgba8(), tw, th, FilterType::Lanczos3);

    let x = (pw as i64 - tw as i64) / 2;
    let lowest = ph as f32 * (1.0 - BOTTOM_MARGIN) - th as f32;
    let y = (ph as f32 * PRODUCT_TOP).min(lowest).max(0.0).round() as i64;

    Placement {
        x,
        y,
        product: resized,
    }
}

/// Soft shadow from the product's alpha. Returns the shadow and the padding
/// added on each side so the blur is not clipped.
fn drop_shadow(product: &RgbaImage, sigma: f32) -> (RgbaImage, u32) {
    let pad = (sigma * 2.0).ceil() as u32;
    let (w, h) = product.dimensions();
    let mut mask = RgbaImage::new(w + 2 * pad, h + 2 * pad);
    for (x, y, p) in product.enumerate_pixels() {
        let a = (p[3] as u32 * SHADOW_OPACITY / 255) as u8;
        mask.put_pixel(x + pad, y + pad, Rgba([0, 0, 0, a]));
    }

    // Blurring at quarter size is much cheaper and looks the same
    let (mw, mh) = mask.dimensions();
    let small = imageops::resize(&mask, (mw / 4).max(1), (mh / 4).max(1), FilterType::Triangle);
    let blurred = imageops::blur(&small, (sigma / 4.0).max(0.5));
    (imageops::resize(&blurred, mw, mh, FilterType::Triangle), pad)
}

/// Composite the real product onto a background plate with a soft shadow.
/// The plate is not modified.
pub fn composite_on_plate(plate: &DynamicImage, product: &DynamicImage) -> DynamicImage {
    let mut canvas = plate.to_rgba8();
    let placement = place_product(canvas.dimensions(), product);

    let unit = canvas.width() as f32 / 1080.0;
    let (shadow, pad) = drop_shadow(&placement.product, SHADOW_SIGMA * unit);
    let offset = (SHADOW_OFFSET * unit).round() as i64;
    imageops::overlay(
        &mut canvas,
        &shadow,
        placement.x + offset - pad as i64,
        placement.y + offset - pad as i64,
    );
    imageops::overlay(&mut canvas, &placement.product, placement.x, placement.y);

    DynamicImage::ImageRgba8(canvas)
}

/// Shrink so neither side exceeds `max_size`, keeping the aspect ratio
pub fn resize_for_display(img: &DynamicImage, max_size: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    if w <= max_size && h <= max_size {
        return img.clone();
    }
    img.resize(max_size, max_size, FilterType::Lanczos3)
}

/// A bundled demo product
#[derive(Debug, Clone)]
pub struct SampleImage {
    pub name: &'static str,
    pub file_name: &'static str,
    pub description: &'static str,
    pub path: PathBuf,
}

const SAMPLES: [(&str, &str, &str); 3] = [
    ("Premium Serum", "serum_bottle.png", "Luxury skincare serum with dropper"),
    ("Face Cream", "cream_jar.png", "Rich moisturizing cream jar"),
    ("Beauty Oil", "beauty_oil.png", "Nourishing facial oil bottle"),
];

fn placeholder(shade: u8) -> DynamicImage {
    let size = 500u32;
    let buf = ImageBuffer::from_fn(size, size, |_, y| {
        let v = (80 + (y * 50 / size)) as u8;
        Rgba([v, v, v.saturating_add(20).saturating_add(shade), 255])
    });
    DynamicImage::ImageRgba8(buf)
}

/// Make sure the sample directory exists and every sample has a file.
/// Missing samples are written as gradient placeholders.
pub fn ensure_sample_images(dir: &Path) -> Result<Vec<SampleImage>, StudioError> {
    std::fs::create_dir_all(dir)?;

    let mut samples = Vec::with_capacity(SAMPLES.len());
    for (i, &(name, file_name, description)) in SAMPLES.iter().enumerate() {
        let path = dir.join(file_name);
        if !path.exists() {
            placeholder(i as u8 * 30).save_with_format(&path, ImageFormat::Png)?;
            tracing::info!("Created placeholder sample image: {}", path.display());
        }
        samples.push(SampleImage {
            name,
            file_name,
            description,
            path,
        });
    }
    Ok(samples)
}

/// Write an asset to `output_dir` and return the file path
pub async fn export_asset(asset: &GeneratedAsset, output_dir: &Path) -> Result<PathBuf, StudioError> {
    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(asset.file_name());
    tokio::fs::write(&path, &asset.image.bytes).await?;
    tracing::info!("Saved image to: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AssetType;

    fn solid(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(w, h, Rgba([200, 10, 10, 255])))
    }

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        encode_png(&solid(w, h)).unwrap().bytes
    }

    #[test]
    fn test_aspect_crop_wide_and_tall() {
        let wide = aspect_crop(&solid(400, 100), (1, 1));
        assert_eq!(wide.dimensions(), (100, 100));

        let tall = aspect_crop(&solid(900, 1600), (16, 9));
        assert_eq!(tall.dimensions(), (900, 506));

        let same = aspect_crop(&solid(160, 90), (16, 9));
        assert_eq!(same.dimensions(), (160, 90));
    }

    #[test]
    fn test_fit_to_every_asset_resolution() {
        let src = solid(640, 480);
        for t in AssetType::all() {
            let d = t.descriptor();
            let out = fit_to_resolution(&src, d.width, d.height);
            assert_eq!(out.dimensions(), (d.width, d.height), "{}", d.label);
        }
    }

    #[test]
    fn test_place_product_centres_in_lower_part() {
        let placement = place_product((1000, 1000), &solid(200, 100));
        assert_eq!(placement.product.dimensions(), (550, 275));
        assert_eq!(placement.x, 225);
        assert_eq!(placement.y, 380);

        // a tall product is limited by height and lifted off the bottom edge
        let tall = place_product((1600, 900), &solid(100, 400));
        let (w, h) = tall.product.dimensions();
        assert_eq!(h, 720);
        assert_eq!(w, 180);
        assert!(tall.y as u32 + h <= 900);
    }

    #[test]
    fn test_composite_keeps_product_pixels_and_casts_shadow() {
        let plate = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(400, 400, Rgba([240, 240, 240, 255])));
        let product = DynamicImage::ImageRgba8(ImageBuffer::from_fn(120, 120, |x, _| {
            Rgba([(x * 2) as u8, 30, 90, 255])
        }));

        let out = composite_on_plate(&plate, &product).to_rgba8();
        let placement = place_product((400, 400), &product);
        let (w, h) = placement.product.dimensions();
        for y in 0..h {
            for x in 0..w {
                let got = out.get_pixel(placement.x as u32 + x, placement.y as u32 + y);
                assert_eq!(got, placement.product.get_pixel(x, y));
            }
        }

        // far corner untouched, shadow just past the product's lower right edge
        assert_eq!(*out.get_pixel(0, 0), Rgba([240, 240, 240, 255]));
        let sx = placement.x as u32 + w + 2;
        let sy = placement.y as u32 + h + 2;
        assert!(out.get_pixel(sx, sy)[0] < 240);
        // plate left as it was
        assert_eq!(plate.get_pixel(sx, sy), Rgba([240, 240, 240, 255]));
    }

    #[test]
    fn test_resize_for_display() {
        let out = resize_for_display(&solid(1600, 800), 800);
        assert_eq!(out.dimensions(), (800, 400));
        let small = resize_for_display(&solid(100, 50), 800);
        assert_eq!(small.dimensions(), (100, 50));
    }

    #[test]
    fn test_load_upload_normalises_to_png() {
        let src = load_upload("product.png", &png_bytes(320, 640)).unwrap();
        assert_eq!(src.image.mime_type, "image/png");
        assert_eq!((src.image.width, src.image.height), (320, 640));
        assert_eq!(src.info.format, "PNG");
        assert_eq!(src.info.aspect_ratio, "1:2");
    }

    #[test]
    fn test_load_upload_rejects_small_and_unknown() {
        assert!(matches!(
            load_upload("tiny.png", &png_bytes(100, 100)),
            Err(StudioError::InvalidImage(_))
        ));
        assert!(matches!(
            load_upload("notes.txt", b"hello world, not an image"),
            Err(StudioError::UnsupportedImage(_))
        ));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512.00 B");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[tokio::test]
    async fn test_upload_file_checks_extension() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("product.gif");
        std::fs::write(&path, png_bytes(320, 320))?;
        let err = load_upload_file(&path).await.unwrap_err();
        assert!(matches!(err, StudioError::UnsupportedImage(_)));
        Ok(())
    }

    #[test]
    fn test_sample_images_created_once() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let samples = ensure_sample_images(temp.path())?;
        assert_eq!(samples.len(), 3);
        for sample in &samples {
            assert!(sample.path.exists());
        }

        // Existing files are left alone
        std::fs::write(&samples[0].path, b"user supplied")?;
        ensure_sample_images(temp.path())?;
        assert_eq!(std::fs::read(&samples[0].path)?, b"user supplied");
        Ok(())
    }

    #[tokio::test]
    async fn test_export_writes_png() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let image = encode_png(&solid(10, 10))?;
        let asset = GeneratedAsset::new(AssetType::WebsiteBanner, image.clone(), "p");
        let path = export_asset(&asset, &temp.path().join("out")).await?;
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("website_banner_"));
        assert_eq!(std::fs::read(&path)?, image.bytes);
        Ok(())
    }
}
