//! Tile preview tool.
//!
//! Reads a JSON table description, displays it through an interactive
//! shell with notebook display registered, and writes the result as a
//! standalone HTML page.
//!
//! ```json
//! { "title": "Elevation tiles",
//!   "columns": [
//!     { "name": "id", "values": [1, 2] },
//!     { "name": "tile", "values": [
//!         { "cols": 2, "rows": 1, "cell_type": "int16", "cells": [3, 4] },
//!         { "cols": 2, "rows": 2 } ] } ] }
//! ```

mod page;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use notebook_display::{
    global_options, register_notebook_display, set_active_shell, InteractiveShell, NotebookConfig,
};
use renderer::ColormapSpec;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use page::{PageInput, PreviewPage};

#[derive(Parser, Debug)]
#[command(name = "tile-preview")]
#[command(about = "Render a JSON table of raster tiles to an HTML page")]
struct Args {
    /// Table description (JSON)
    input: PathBuf,

    /// Output HTML file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Notebook display config (YAML)
    #[arg(short, long, env = "TILE_PREVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Colormap name, overriding the config
    #[arg(long, env = "TILE_PREVIEW_COLORMAP")]
    colormap: Option<String>,

    /// Maximum rows shown, overriding the config
    #[arg(long)]
    max_rows: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr so stdout can carry the page
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .init();

    configure(&args)?;

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read: {:?}", args.input))?;
    let input: PageInput = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse table description: {:?}", args.input))?;
    let title = input.title.clone();
    let frame = input
        .into_frame()
        .with_context(|| format!("Invalid table in {:?}", args.input))?;
    info!(
        rows = frame.num_rows(),
        columns = frame.num_columns(),
        "Loaded table"
    );

    let shell = Arc::new(InteractiveShell::new());
    set_active_shell(Arc::clone(&shell));
    if !register_notebook_display() {
        anyhow::bail!("notebook display could not be registered");
    }

    let bundle = shell.display(&frame);
    let page = PreviewPage::new(title.as_deref(), &bundle).render();

    match &args.output {
        Some(path) => {
            std::fs::write(path, &page).with_context(|| format!("Failed to write: {:?}", path))?;
            info!("Wrote {} bytes to {:?}", page.len(), path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(page.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Install config file and CLI overrides into the global display options.
fn configure(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => NotebookConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config: {:?}", path))?,
        None => NotebookConfig::default(),
    };
    let mut options = config.display_options()?;

    if let Some(name) = &args.colormap {
        let spec = ColormapSpec::Named(name.clone());
        spec.resolve()?;
        options.thumbnail.colormap = spec;
    }
    if let Some(max_rows) = args.max_rows {
        options.max_rows = Some(max_rows);
    }

    global_options().replace(options);
    Ok(())
}
