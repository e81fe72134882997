//! Styles command: list the fill styles.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use scrawl::FillStyle;

#[derive(Debug, Clone, Args)]
pub struct StylesArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StyleEntry {
    name: &'static str,
    description: &'static str,
}

fn entries() -> Vec<StyleEntry> {
    FillStyle::ALL
        .iter()
        .map(|style| StyleEntry { name: style.name(), description: style.description() })
        .collect()
}

pub fn cmd_styles(args: &StylesArgs) -> Result<()> {
    let entries = entries();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries).context("failed to encode JSON")?);
        return Ok(());
    }

    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    println!("Fill styles:");
    for entry in &entries {
        println!("  {:<width$}  {}", entry.name, entry.description);
    }
    Ok(())
}
