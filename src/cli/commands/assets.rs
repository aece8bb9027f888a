use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::core::AssetType;

#[derive(Args)]
pub struct AssetsArgs {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn run(args: AssetsArgs) -> Result<()> {
    if args.format == "json" {
        let rows: Vec<serde_json::Value> = AssetType::all()
            .iter()
            .map(|t| {
                let d = t.descriptor();
                serde_json::json!({
                    "id": t.slug(),
                    "label": d.label,
                    "resolution": d.resolution(),
                    "aspect_ratio": d.aspect_ratio(),
                    "description": d.description,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<22} {:<12} {:<7} {}",
        "Asset".cyan().bold(),
        "Resolution".cyan().bold(),
        "Aspect".cyan().bold(),
        "Description".cyan().bold()
    );
    println!("{}", "-".repeat(80).dimmed());
    for t in AssetType::all() {
        let d = t.descriptor();
        println!(
            "{} {:<19} {:<12} {:<7} {}",
            d.icon,
            d.label,
            d.resolution(),
            d.aspect_ratio(),
            d.description.dimmed()
        );
    }
    println!();
    println!(
        "{}",
        "Use the ids with --asset, e.g. --asset instagram-story".dimmed()
    );
    Ok(())
}
