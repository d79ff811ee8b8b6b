use crate::config::Config;
use crate::event::load_event;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use opendesign_clipboard::{import_from_clipboard, PasteEvent};
use opendesign_common::DirectoryAssetSource;
use opendesign_editor::{ComponentSelection, Editor, EngineImageLoader, ImageLoader, Node, PasteOutcome};
use opendesign_engine::HeadlessEngine;
use opendesign_import::import_dropped_file;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct PasteArgs {
    /// Paste-event file (JSON list of representations)
    pub event: PathBuf,

    /// Design to paste into; a blank document when omitted
    #[arg(long)]
    pub design: Option<PathBuf>,

    /// Component of the design to paste into (defaults to the first one)
    #[arg(long, requires = "design")]
    pub component: Option<String>,
}

pub async fn paste(args: PasteArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    run(&args, &config, cwd).await.map(|_| ())
}

async fn run(args: &PasteArgs, config: &Config, cwd: &Path) -> Result<(PasteOutcome, Vec<String>)> {
    let event = load_event(&cwd.join(&args.event)).await?;
    // a fixture always carries its own representations
    let payload = import_from_clipboard(Some(&event), &PasteEvent::default())
        .await?
        .ok_or_else(|| anyhow!("Paste event carries nothing usable"))?;

    println!("{}", "📋 Clipboard payload".bright_blue().bold());
    for part in payload.parts() {
        println!("  {} {}", "•".dimmed(), part);
    }
    println!();

    let engine = Arc::new(HeadlessEngine::new());
    let images: Box<dyn ImageLoader> = Box::new(EngineImageLoader::new(DirectoryAssetSource::new(
        config.get_assets_dir(cwd),
    )));
    let mut editor = open_editor(args, config, cwd, engine.clone(), images).await?;

    let outcome = editor.paste(&payload).await?;
    for warning in &outcome.warnings {
        println!("  {} {}", "⚠️".yellow(), warning.to_string().yellow());
    }

    let component = editor
        .current_component()
        .ok_or_else(|| anyhow!("Document has no component to paste into"))?;
    let tree = render_tree(Node::Component(component));
    for line in &tree {
        println!("{line}");
    }

    println!();
    println!(
        "{} Pasted {} ({} images loaded, {} warnings)",
        "✅".green(),
        outcome.layer_id.bold(),
        engine.image_count(),
        outcome.warnings.len()
    );
    Ok((outcome, tree))
}

async fn open_editor(
    args: &PasteArgs,
    config: &Config,
    cwd: &Path,
    engine: Arc<HeadlessEngine>,
    images: Box<dyn ImageLoader>,
) -> Result<Editor> {
    let Some(design) = &args.design else {
        return Ok(Editor::empty(engine, images)?);
    };

    let path = cwd.join(design);
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    let converter = config.converter();
    let dropped = import_dropped_file(bytes, converter.as_ref()).await?;

    let editor = match &args.component {
        Some(id) => Editor::open_dropped(engine, &dropped, id, images)?,
        None => Editor::open(engine, &dropped.file()?, &ComponentSelection::All, images)?,
    };
    Ok(editor)
}

/// Indented outline of `node` and its descendants
pub fn render_tree(node: Node<'_>) -> Vec<String> {
    fn walk(node: Node<'_>, depth: usize, lines: &mut Vec<String>) {
        lines.push(format!("{}{}", "  ".repeat(depth), node));
        for child in node.children() {
            walk(child, depth + 1, lines);
        }
    }

    let mut lines = Vec::new();
    walk(node, 0, &mut lines);
    lines
}
