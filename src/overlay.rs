//! Testimonial overlay: a translucent band across the bottom third with the
//! customer quote, attribution and product name drawn on top.

use image::{DynamicImage, Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

use crate::core::OverlayColor;

const ACCENT_LINE: Rgba<u8> = Rgba([102, 126, 234, 150]);

/// Band and text colors for one overlay color
struct Palette {
    band: Rgba<u8>,
    quote: Rgba<u8>,
    name: Rgba<u8>,
    product: Rgba<u8>,
}

fn palette(color: OverlayColor) -> Palette {
    match color {
        OverlayColor::White => Palette {
            band: Rgba([25, 25, 35, 220]),
            quote: Rgba([255, 255, 255, 255]),
            name: Rgba([255, 255, 255, 200]),
            product: Rgba([255, 200, 100, 255]),
        },
        OverlayColor::Black => Palette {
            band: Rgba([250, 248, 242, 215]),
            quote: Rgba([10, 10, 10, 255]),
            name: Rgba([10, 10, 10, 200]),
            product: Rgba([140, 80, 10, 255]),
        },
    }
}

const FONT_CANDIDATES: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Text placed on a testimonial graphic
#[derive(Debug, Clone, Default)]
pub struct Testimonial<'a> {
    pub quote: &'a str,
    pub customer_name: &'a str,
    pub product_name: &'a str,
}

/// Load the configured font, or the first system font found.
///
/// Returns `None` when nothing loads; the overlay then draws the band only.
pub fn load_font(configured: Option<&Path>) -> Option<Font<'static>> {
    let candidates = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(FONT_CANDIDATES.iter().map(PathBuf::from));

    for path in candidates {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        if let Some(font) = Font::try_from_vec(bytes) {
            tracing::debug!("Loaded overlay font: {}", path.display());
            return Some(font);
        }
        tracing::warn!("Not a usable font file: {}", path.display());
    }

    tracing::warn!("No overlay font found; testimonial text will be skipped");
    None
}

fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let a = (src[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    for c in 0..3 {
        dst[c] = (src[c] as f32 * a + dst[c] as f32 * (1.0 - a)).round() as u8;
    }
    dst[3] = (a * 255.0 + dst[3] as f32 * (1.0 - a)).round().min(255.0) as u8;
}

fn fill_rect(img: &mut RgbaImage, top: u32, bottom: u32, color: Rgba<u8>) {
    let bottom = bottom.min(img.height());
    for y in top..bottom {
        for x in 0..img.width() {
            blend(img.get_pixel_mut(x, y), color, 1.0);
        }
    }
}

fn text_width(font: &Font<'static>, px: f32, text: &str) -> f32 {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    font.layout(text, scale, point(0.0, v_metrics.ascent))
        .filter_map(|g| g.pixel_bounding_box())
        .map(|bb| bb.max.x as f32)
        .fold(0.0, f32::max)
}

fn draw_text(img: &mut RgbaImage, font: &Font<'static>, px: f32, x: i32, y: i32, color: Rgba<u8>, text: &str) {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let start = point(x as f32, y as f32 + v_metrics.ascent);
    let (w, h) = img.dimensions();

    for glyph in font.layout(text, scale, start) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, v| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 || px as u32 >= w || py as u32 >= h {
                return;
            }
            blend(img.get_pixel_mut(px as u32, py as u32), color, v);
        });
    }
}

/// Greedy word wrap to `max_width` pixels
pub fn wrap_text(font: &Font<'static>, px: f32, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(font, px, &candidate) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Draw the testimonial overlay onto a copy of `base`
pub fn testimonial_overlay(
    base: &DynamicImage,
    testimonial: &Testimonial<'_>,
    font: Option<&Font<'static>>,
    color: OverlayColor,
) -> DynamicImage {
    let colors = palette(color);
    let mut img = base.to_rgba8();
    let (width, height) = img.dimensions();

    let band_height = height / 3;
    let band_top = height - band_height;
    fill_rect(&mut img, band_top, height, colors.band);
    fill_rect(&mut img, band_top, band_top + 2, ACCENT_LINE);

    let quote = testimonial.quote.trim();
    let Some(font) = font else {
        return DynamicImage::ImageRgba8(img);
    };
    if quote.is_empty() {
        return DynamicImage::ImageRgba8(img);
    }

    let quote = if quote.starts_with('"') || quote.starts_with('“') {
        quote.to_string()
    } else {
        format!("“{}”", quote)
    };

    let quote_px = (height as f32 * 0.03).max(22.0);
    let name_px = (height as f32 * 0.022).max(18.0);
    let product_px = (height as f32 * 0.018).max(16.0);

    let margin = width / 15;
    let max_width = width.saturating_sub(2 * margin) as f32;
    let wrapped = wrap_text(font, quote_px, &quote, max_width);

    let line_height = quote_px + 8.0;
    let mut block = wrapped.len() as f32 * line_height;
    if !testimonial.customer_name.trim().is_empty() {
        block += name_px + 15.0;
    }
    if !testimonial.product_name.trim().is_empty() {
        block += product_px + 10.0;
    }

    let mut y = band_top as f32 + (band_height as f32 - block) / 2.0;
    y = y.max(band_top as f32 + 20.0);
    let x = margin as i32;

    for line in &wrapped {
        draw_text(&mut img, font, quote_px, x, y as i32, colors.quote, line);
        y += line_height;
    }
    y += 10.0;

    let customer = testimonial.customer_name.trim();
    if !customer.is_empty() {
        draw_text(&mut img, font, name_px, x, y as i32, colors.name, &format!("- {}", customer));
        y += name_px + 8.0;
    }

    let product = testimonial.product_name.trim();
    if !product.is_empty() {
        draw_text(&mut img, font, product_px, x, y as i32, colors.product, product);
    }

    DynamicImage::ImageRgba8(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageBuffer};

    fn white(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(w, h, Rgba([255, 255, 255, 255])))
    }

    #[test]
    fn test_band_darkens_bottom_third_without_font() {
        let base = white(90, 90);
        let testimonial = Testimonial {
            quote: "Great stuff",
            customer_name: "Sam",
            product_name: "Serum",
        };
        let out = testimonial_overlay(&base, &testimonial, None, OverlayColor::White);

        assert_eq!(out.dimensions(), (90, 90));
        // top untouched
        assert_eq!(out.get_pixel(10, 10), Rgba([255, 255, 255, 255]));
        // inside the band, below the accent line
        let p = out.get_pixel(10, 80);
        assert!(p[0] < 80 && p[1] < 80 && p[2] < 80, "{:?}", p);
        // base is not modified
        assert_eq!(base.get_pixel(10, 80), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_blend_respects_coverage() {
        let mut px = Rgba([255, 255, 255, 255]);
        blend(&mut px, Rgba([0, 0, 0, 255]), 0.0);
        assert_eq!(px, Rgba([255, 255, 255, 255]));
        blend(&mut px, Rgba([0, 0, 0, 255]), 1.0);
        assert_eq!(px, Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_black_text_uses_light_band() {
        let base = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(60, 60, Rgba([0, 0, 0, 255])));
        let out = testimonial_overlay(&base, &Testimonial::default(), None, OverlayColor::Black);
        assert!(out.get_pixel(5, 55)[0] > 150);
        assert_eq!(out.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_text_drawn_inside_band_and_wrapped() {
        let Some(font) = load_font(Some(Path::new("/definitely/not/here.ttf"))) else {
            eprintln!("no system font available; skipping");
            return;
        };

        let base = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(1080, 1080, Rgba([120, 160, 200, 255])));
        let testimonial = Testimonial {
            quote: "My skin has never felt this good. I use it every single morning. \
                    Friends keep asking what changed. It is truly a game-changer!",
            customer_name: "Sarah M.",
            product_name: "Capsula Serum X",
        };
        let band_only = testimonial_overlay(&base, &testimonial, None, OverlayColor::White).to_rgba8();
        let with_text = testimonial_overlay(&base, &testimonial, Some(&font), OverlayColor::White).to_rgba8();

        let band_top = 1080 - 1080 / 3;
        let mut changed = 0;
        for (x, y, p) in with_text.enumerate_pixels() {
            if p != band_only.get_pixel(x, y) {
                changed += 1;
                assert!(y >= band_top, "text pixel above the band at ({}, {})", x, y);
            }
            if y < band_top {
                assert_eq!(*p, base.get_pixel(x, y));
            }
        }
        assert!(changed > 0);

        let quote_px = 1080.0 * 0.03;
        let max_width = (1080 - 2 * (1080 / 15)) as f32;
        let lines = wrap_text(&font, quote_px, testimonial.quote, max_width);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(&font, quote_px, line) <= max_width || !line.contains(' '));
        }
    }
}
