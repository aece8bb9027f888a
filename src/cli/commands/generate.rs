use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::GeminiClient;
use crate::config::{Config, DisplayMode};
use crate::core::{AssetType, CropAspect, Finish, GenerationMode, OverlayColor, SlotStatus, StylePreset};
use crate::imaging;
use crate::session::Session;
use crate::studio::Studio;

#[derive(Args)]
pub struct GenerateArgs {
    /// Product photo (PNG or JPG)
    #[arg(required_unless_present = "sample")]
    pub product: Option<PathBuf>,

    /// Use a bundled sample product instead (1-3)
    #[arg(long, conflicts_with = "product")]
    pub sample: Option<usize>,

    /// Asset type to generate; repeat for several (default: all)
    #[arg(short, long = "asset")]
    pub assets: Vec<AssetType>,

    /// Brand name (overrides brand.name)
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Style preset (luxury, minimalist, natural, tech, vibrant, custom)
    #[arg(short, long)]
    pub style: Option<StylePreset>,

    /// Don't ask the model to keep brand text visible
    #[arg(long)]
    pub no_brand_text: bool,

    /// Ask the text model for scene directions first
    #[arg(long)]
    pub suggest: bool,

    /// scene (model re-stages the product) or product-lock (background plate
    /// plus the exact product photo)
    #[arg(short, long)]
    pub mode: Option<GenerationMode>,

    /// Draw the customer quote on every asset, not just testimonials
    #[arg(long)]
    pub overlay: bool,

    /// Overlay text color (white, black)
    #[arg(long)]
    pub overlay_color: Option<OverlayColor>,

    /// Re-crop results before export (keep, 1:1, 9:16, 16:9)
    #[arg(long, default_value = "keep")]
    pub crop: CropAspect,

    /// Output directory for the images
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (text, json, quiet)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Serialize)]
struct AssetReport {
    asset_type: AssetType,
    resolution: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BatchReport {
    session: String,
    product: String,
    brand: String,
    style: StylePreset,
    mode: GenerationMode,
    completed: usize,
    failed: usize,
    assets: Vec<AssetReport>,
}

async fn load_product(args: &GenerateArgs, config: &Config) -> Result<imaging::SourceImage> {
    if let Some(n) = args.sample {
        let samples = imaging::ensure_sample_images(&config.samples_dir())?;
        let sample = n
            .checked_sub(1)
            .and_then(|i| samples.get(i))
            .with_context(|| format!("No sample {}. Choose 1-{}", n, samples.len()))?;
        return Ok(imaging::load_upload_file(&sample.path).await?);
    }

    let path = args.product.as_deref().context("No product image given")?;
    Ok(imaging::load_upload_file(path).await?)
}

pub async fn run(args: GenerateArgs, config: &Config) -> Result<()> {
    let product = load_product(&args, config).await?;

    let mut session = Session::from_config(config);
    if let Some(brand) = &args.brand {
        session.brand.name = brand.clone();
    }
    if let Some(style) = args.style {
        session.style = style;
    }
    if args.no_brand_text {
        session.ensure_brand_text = false;
    }
    if let Some(mode) = args.mode {
        session.mode = mode;
    }
    if let Some(color) = args.overlay_color {
        session.overlay_color = color;
    }
    if !args.assets.is_empty() {
        session.select_assets(&args.assets);
    }
    let product_name = product.name.clone();
    session.set_product(product);

    // Create API client
    let client = GeminiClient::from_config(config)?;
    let studio = Studio::new(client, config);

    let text = args.format == "text";

    if args.suggest {
        let from_model = studio.suggest_styles(&mut session).await;
        if text && !from_model {
            eprintln!(
                "{}: style suggestions unavailable, using defaults",
                "Warning".yellow().bold()
            );
        }
    }

    // Show progress
    let pb = if text {
        let pb = ProgressBar::new(session.selected_assets.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.yellow} [{bar:30.yellow}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.set_message(format!("Generating for {}...", session.brand.display_name()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let summary = studio
        .generate_all(&mut session, |_, slot| {
            if let Some(pb) = &pb {
                pb.inc(1);
                pb.set_message(format!("{}: {}", slot.asset_type, slot.status.name()));
            }
        })
        .await?;

    if let Some(pb) = &pb {
        let mark = if summary.failed.is_empty() {
            "✓".green()
        } else {
            "!".yellow()
        };
        pb.finish_with_message(format!(
            "{} Generated {}/{} asset(s)",
            mark,
            summary.completed,
            summary.total()
        ));
    }

    if args.overlay || args.crop != CropAspect::Keep {
        for index in 0..session.results.len() {
            let Some(current) = session.results[index].asset.as_ref().map(|a| a.finish) else {
                continue;
            };
            let finish = Finish {
                aspect: args.crop,
                overlay: current.overlay || args.overlay,
            };
            studio.refinish(&mut session, index, finish)?;
        }
    }

    // Export
    let output_dir = args.output.clone().unwrap_or_else(|| config.output_dir());
    let mut reports = Vec::with_capacity(session.results.len());
    for slot in &session.results {
        let mut report = AssetReport {
            asset_type: slot.asset_type,
            resolution: slot.asset_type.descriptor().resolution(),
            status: slot.status.name().to_string(),
            id: None,
            path: None,
            error: None,
        };
        match (&slot.status, &slot.asset) {
            (SlotStatus::Completed, Some(asset)) => {
                report.id = Some(asset.id.clone());
                report.path = Some(imaging::export_asset(asset, &output_dir).await?);
            }
            (SlotStatus::Failed { error }, _) => report.error = Some(error.clone()),
            _ => {}
        }
        reports.push(report);
    }

    let report = BatchReport {
        session: session.id.clone(),
        product: product_name,
        brand: session.brand.display_name().to_string(),
        style: session.style,
        mode: session.mode,
        completed: summary.completed,
        failed: summary.failed.len(),
        assets: reports,
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "quiet" => {
            for path in report.assets.iter().filter_map(|a| a.path.as_ref()) {
                println!("{}", path.display());
            }
        }
        _ => print_report(&report, config),
    }

    if summary.completed == 0 {
        anyhow::bail!("No assets were generated");
    }
    Ok(())
}

fn print_report(report: &BatchReport, config: &Config) {
    println!();
    println!("{}: {}", "Product".cyan().bold(), report.product);
    println!("{}: {}", "Brand".cyan().bold(), report.brand);
    println!("{}: {}", "Style".cyan().bold(), report.style);
    println!("{}: {}", "Mode".cyan().bold(), report.mode);
    println!();
    println!("{}:", "Assets".cyan().bold());
    for asset in &report.assets {
        match (&asset.path, &asset.error) {
            (Some(path), _) => println!(
                "  {} {:<20} {}",
                "✓".green(),
                asset.asset_type.to_string(),
                path.display()
            ),
            (None, Some(error)) => println!(
                "  {} {:<20} {}",
                "✗".red(),
                asset.asset_type.to_string(),
                error.red()
            ),
            _ => println!("  - {:<20} {}", asset.asset_type.to_string(), asset.status),
        }
    }

    // Try to display the first image in terminal
    if config.output.display == DisplayMode::Terminal {
        if let Some(first) = report.assets.iter().find_map(|a| a.path.as_deref()) {
            println!();
            display_image_terminal(first);
        }
    }
}

/// Display an image in the terminal using viuer
fn display_image_terminal(path: &Path) {
    let conf = viuer::Config {
        width: Some(80),
        height: Some(30),
        absolute_offset: false,
        ..Default::default()
    };

    if let Err(e) = viuer::print_from_file(path, &conf) {
        tracing::debug!("Failed to display image in terminal: {}", e);
    }
}
