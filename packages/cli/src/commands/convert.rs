use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use opendesign_import::{convert_to_canonical, read_manifest, DesignFormat};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Design file to convert
    pub file: PathBuf,

    /// Output path (defaults to the input with an .octopus extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn convert(args: ConvertArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = cwd.join(&args.file);
    let output = match &args.output {
        Some(output) => cwd.join(output),
        None => input.with_extension("octopus"),
    };

    let bytes = tokio::fs::read(&input)
        .await
        .with_context(|| format!("cannot read {}", input.display()))?;
    let format = DesignFormat::sniff(&bytes);

    let converter = config.converter();
    let canonical = convert_to_canonical(bytes, converter.as_ref()).await?;
    let manifest = read_manifest(&canonical)?;

    tokio::fs::write(&output, &canonical)
        .await
        .with_context(|| format!("cannot write {}", output.display()))?;

    println!(
        "  {} {} ({}) → {}",
        "✓".green(),
        args.file.display(),
        format,
        output.display()
    );
    println!(
        "{} {} pages, {} components",
        "✅".green(),
        manifest.pages().len(),
        manifest.components().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendesign_import::OctopusFile;
    use opendesign_manifest::{Manifest, ManifestComponent, ManifestPage};

    #[tokio::test]
    async fn test_canonical_input_is_copied() {
        let dir = tempfile::tempdir().unwrap();
        let file = OctopusFile::new(Manifest::new(
            vec![ManifestPage::new("p", "Page", &["c"])],
            vec![ManifestComponent::new("c", "Card")],
        ));
        let bytes = file.to_bytes().unwrap();
        std::fs::write(dir.path().join("design.json"), &bytes).unwrap();

        convert(
            ConvertArgs {
                file: "design.json".into(),
                output: None,
            },
            dir.path(),
        )
        .await
        .unwrap();

        assert_eq!(std::fs::read(dir.path().join("design.octopus")).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_unknown_input_without_converter_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("design.psd"), b"8BPS....").unwrap();

        let result = convert(
            ConvertArgs {
                file: "design.psd".into(),
                output: Some("out.octopus".into()),
            },
            dir.path(),
        )
        .await;

        assert!(result.is_err());
        assert!(!dir.path().join("out.octopus").exists());
    }
}
