mod commands;
mod config;
mod event;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{convert, inspect, paste, ConvertArgs, InspectArgs, PasteArgs};
use config::Config;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// OpenDesign CLI - load, convert and merge design documents
#[derive(Parser, Debug)]
#[command(name = "opendesign")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the pages and components of a design
    Inspect(InspectArgs),

    /// Convert a design file to the canonical octopus encoding
    Convert(ConvertArgs),

    /// Merge a recorded paste event into a design
    Paste(PasteArgs),
}

fn init_logging(cwd: &Path) {
    // a broken config is reported by the command itself
    let fallback = Config::load(cwd).map(|c| c.log_filter).unwrap_or_else(|_| Config::default().log_filter);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };
    init_logging(&cwd);

    let result = match cli.command {
        Command::Inspect(args) => inspect(args, &cwd).await,
        Command::Convert(args) => convert(args, &cwd).await,
        Command::Paste(args) => paste(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
