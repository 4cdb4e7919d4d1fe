//! navpage - build and exercise section navigation outside the browser
//!
//! `render` prints a page with its navigation menu built. `replay` runs a
//! recorded event script against a static layout and prints the resulting
//! report as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use section_nav::{replay, Layout, Page, PageConfig, PageEvent, SimulatedViewport};

#[derive(Parser)]
#[command(name = "navpage")]
#[command(version)]
#[command(about = "Section navigation runtime driver", long_about = None)]
struct Cli {
    /// Page configuration (JSON); defaults to the stock landing-page markup
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log controller activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the page with the navigation menu built
    Render {
        /// HTML page
        page: PathBuf,
    },

    /// Replay an event script and print the report
    Replay {
        /// HTML page
        page: PathBuf,

        /// Viewport height and absolute section offsets (JSON)
        #[arg(short, long)]
        layout: PathBuf,

        /// Event script (JSON array)
        #[arg(short, long)]
        events: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = match &cli.config {
        Some(path) => PageConfig::from_json(&read(path)?)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PageConfig::default(),
    };

    match cli.command {
        Commands::Render { page: path } => {
            let html = read(&path)?;
            let page = Page::new(&html, SimulatedViewport::default(), config)
                .with_context(|| format!("Failed to load page {}", path.display()))?;
            println!("{}", page.to_html()?);
        }
        Commands::Replay {
            page,
            layout,
            events,
        } => {
            let html = read(&page)?;
            let layout: Layout = read_json(&layout)?;
            let events: Vec<PageEvent> = read_json(&events)?;

            let report = replay(&html, layout, config, &events)
                .with_context(|| format!("Failed to replay {}", page.display()))?;
            for error in &report.errors {
                log::error!("Event {} failed: {}", error.index, error.message);
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    serde_json::from_str(&read(path)?)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
