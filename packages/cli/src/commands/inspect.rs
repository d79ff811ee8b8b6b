use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use opendesign_import::{import_dropped_file, DesignFormat};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Design file (canonical or any format the converter accepts)
    pub file: PathBuf,
}

pub async fn inspect(args: InspectArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = cwd.join(&args.file);
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    let format = DesignFormat::sniff(&bytes);

    let converter = config.converter();
    let dropped = import_dropped_file(bytes, converter.as_ref()).await?;
    let manifest = dropped.manifest();

    println!("{} {} ({})", "🔍".bright_blue(), args.file.display(), format.to_string().dimmed());
    println!();

    for page in manifest.pages() {
        println!("{} {}", "Page".bold(), page.name);
        let components = manifest.components_for_page(&page.id);
        if components.is_empty() {
            println!("  {}", "(empty)".dimmed());
        }
        for component in components {
            println!("  {} {} {}", "•".green(), component.name, component.id.dimmed());
        }
    }

    let orphans = manifest.orphaned_components();
    if !orphans.is_empty() {
        println!("{}", "Not on any page".bold());
        for component in orphans {
            println!("  {} {} {}", "•".yellow(), component.name, component.id.dimmed());
        }
    }

    println!();
    println!("{}", "Selectable components".bold());
    for option in manifest.selection_options() {
        println!("  {}  {}", option.component_id.cyan(), option.label);
    }

    Ok(())
}
