pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "banana-studio",
    author = "Christian Weinmayr",
    version,
    about = "🍌 Banana Studio - Turn product photos into marketing assets with Google Gemini",
    long_about = r#"🍌 Banana Studio - Turn product photos into marketing assets with Google Gemini

Upload one product photo, describe your brand, and generate an Instagram post,
story, website banner, ad creative and testimonial graphic in one go. The
product stays exactly as photographed; only the scene around it changes.
Run without arguments to launch the interactive studio.

SETUP:
  Set your API key via environment variable, .env file or config:
    export GEMINI_API_KEY=your-key-here
    banana-studio config set api.key your-key-here

EXAMPLES:
  Launch the interactive studio:
    banana-studio

  Generate every asset type for a product photo:
    banana-studio generate product.png
    banana-studio g product.jpg --brand Acme --style minimalist

  Only some asset types:
    banana-studio generate product.png --asset instagram-post --asset website-banner

  List asset types:
    banana-studio assets

  Manage configuration:
    banana-studio config show
    banana-studio config set brand.name Acme
    banana-studio config set studio.style_preset natural

OUTPUT FORMATS:
  --format text   Human-readable output (default)
  --format json   Machine-readable JSON
  --format quiet  Minimal output, just file paths"#,
    after_help = r#"CONFIGURATION:
  Config file: ~/.config/banana-studio/config.toml (Linux)
  Sample products: ./sample_images (created on first launch)

  Style presets: Luxury (default), Minimalist, Natural, Tech, Vibrant, Custom
  Asset types: Instagram Post, Instagram Story, Website Banner, Ad Creative,
               Testimonial Graphic

MORE INFO:
  GitHub: https://github.com/christianweinmayr/nanobanan-cli"#
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate marketing assets from a product photo
    ///
    /// Runs "Generate All" without the interactive studio: one image per
    /// selected asset type, each saved to the output directory.
    #[command(
        alias = "g",
        after_help = r#"EXAMPLES:
  All asset types with the configured brand:
    banana-studio generate serum.png

  Override brand and style:
    banana-studio generate serum.png --brand Acme --style vibrant

  Selected asset types only:
    banana-studio generate serum.png -a instagram-story -a ad-creative

  Use a bundled sample product:
    banana-studio generate --sample 1

  Keep the exact product photo, composited onto generated backgrounds:
    banana-studio generate serum.png --mode product-lock --overlay --overlay-color black

  Square crops for every asset:
    banana-studio generate serum.png --crop 1:1

  JSON output:
    banana-studio generate serum.png --format json"#
    )]
    Generate(commands::generate::GenerateArgs),

    /// List the asset types with their resolution and aspect ratio
    #[command(alias = "a")]
    Assets(commands::assets::AssetsArgs),

    /// View or modify configuration
    ///
    /// Manage the API key, brand defaults, studio and output settings.
    /// Changes are saved to the config file immediately.
    #[command(
        alias = "c",
        after_help = r#"EXAMPLES:
  Show all settings:
    banana-studio config show

  Get a specific value:
    banana-studio config get brand.palette

  Set values:
    banana-studio config set api.key YOUR_API_KEY
    banana-studio config set brand.palette "sand, ivory, charcoal"
    banana-studio config set studio.ensure_brand_text false
    banana-studio config set output.directory ~/Pictures/studio

  Show config file path:
    banana-studio config path

  Reset to defaults:
    banana-studio config reset --force

AVAILABLE SETTINGS:
  api.key                   - Gemini API key
  api.model                 - Image model
  api.text_model            - Text model for style suggestions
  studio.style_preset       - Default style preset
  studio.ensure_brand_text  - Keep brand text visible (true/false)
  studio.fit_to_resolution  - Crop/resize to exact asset size (true/false)
  studio.samples_dir        - Sample product directory
  studio.font_path          - TTF font for testimonial text
  studio.category           - Product category for suggestions
  studio.mode               - Generation mode (scene/product-lock)
  studio.overlay_color      - Testimonial text color (white/black)
  brand.*                   - Brand profile defaults (name, tone, palette, ...)
  output.directory          - Where exported images go
  output.display            - Display mode (terminal/none)"#
    )]
    Config(commands::config::ConfigArgs),
}
