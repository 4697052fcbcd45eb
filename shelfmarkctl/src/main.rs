use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shelfmark_config::{Config, ConfigSource};
use shelfmark_core::{CategoryPages, MediaScanner, NfoParser, NoteRenderer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "shelfmarkctl",
    about = "Scan media directories, recover sidecar metadata, emit vault notes"
)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Add a source directory (repeatable; overrides the config file)
    #[arg(long = "source-dir")]
    source_dirs: Vec<PathBuf>,

    /// Directory the notes are written into (overrides the config file)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Rebuild category pages from existing notes and exit
    #[arg(long)]
    categories_only: bool,

    /// Verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (mut config, source) = Config::load(cli.config.as_deref())?;
    match &source {
        ConfigSource::Default => info!("using built-in configuration defaults"),
        ConfigSource::Explicit(path) | ConfigSource::EnvPath(path) | ConfigSource::File(path) => {
            info!("loaded configuration from {}", path.display());
        }
    }

    if !cli.source_dirs.is_empty() {
        config.scan.source_directories = cli.source_dirs.clone();
    }
    if let Some(output) = &cli.output_dir {
        config.render.output_directory = output.clone();
    }
    config.validate();

    if cli.categories_only {
        let pages = CategoryPages::new(config.render.clone())?;
        let written = pages
            .regenerate_from_notes()
            .context("failed to rebuild category pages from notes")?;
        info!("rebuilt {written} category pages");
        return Ok(());
    }

    run_pipeline(&config)
}

fn run_pipeline(config: &Config) -> Result<()> {
    let scanner = MediaScanner::new(config.scan.clone())
        .context("invalid scan configuration")?;
    let report = scanner.scan();
    for error in &report.errors {
        warn!("{error}");
    }
    info!(
        "scan found {} items across {} files ({} matched, {} skipped)",
        report.items.len(),
        report.total_files,
        report.matched_files,
        report.skipped_files
    );

    let parser = NfoParser::new(config.nfo.defaults.clone());
    let renderer = NoteRenderer::new(config.render.clone())?;

    let mut entries = Vec::with_capacity(report.items.len());
    let mut notes_written = 0usize;
    for item in report.items.into_values() {
        let record = match &item.nfo {
            Some(nfo) => parser.parse(nfo),
            None => {
                info!("{} has no metadata sidecar", item.code);
                shelfmark_model::NfoRecord::with_defaults(parser.defaults())
            }
        };

        let note = renderer.render(&item, &record);
        renderer
            .save(&item, &note)
            .with_context(|| format!("failed to write note for {}", item.code))?;
        notes_written += 1;
        entries.push((item, record));
    }

    let pages = CategoryPages::new(config.render.clone())?;
    let pages_written = pages
        .generate(&entries)
        .context("failed to write category pages")?;

    info!("wrote {notes_written} notes and {pages_written} category pages");
    Ok(())
}
