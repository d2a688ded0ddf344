//! Binary entrypoint for the collage tool.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::{ArgAction, Parser};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use rust_photo_collage::builder::{self, BuildOptions};
use rust_photo_collage::config::Configuration;
use rust_photo_collage::{catalog, scan};

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "rust-photo-collage", about = "Row-justified photo collages")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Photo directories (override the config's photo-paths)
    #[arg(value_name = "DIR")]
    paths: Vec<PathBuf>,

    /// Override collage width (px)
    #[arg(long, value_name = "PIXELS")]
    width: Option<u32>,

    /// Override nominal row height (px)
    #[arg(long, value_name = "PIXELS")]
    row_height: Option<u32>,

    /// Override output file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Override shuffle seed for random ordering
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("rust_photo_collage={}", level).parse()?);
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Configuration::default(),
    };
    if !cli.paths.is_empty() {
        cfg.photo_paths = cli.paths.clone();
    }
    if let Some(width) = cli.width {
        cfg.target_width = width;
    }
    if let Some(height) = cli.row_height {
        cfg.row_height = height;
    }
    if let Some(output) = cli.output {
        cfg.output = output;
    }
    if let Some(seed) = cli.seed {
        cfg.shuffle_seed = Some(seed);
    }
    let cfg = cfg.validated().context("validating configuration")?;
    ensure!(
        !cfg.photo_paths.is_empty(),
        "no photo directories given (pass them as arguments or set photo-paths)"
    );

    let scan_opts = scan::ScanOptions {
        recursive: cfg.recursive,
        ..Default::default()
    };
    let mut files = scan::scan_with_options(&cfg.photo_paths, &scan_opts)?;
    scan::order_paths(&mut files, cfg.order, cfg.shuffle_seed);
    info!(count = files.len(), "discovered images");

    let images = catalog::load_images(&files)?;

    let options = BuildOptions {
        break_policy: cfg.break_policy,
        background: cfg.background,
    };
    let (collage, row_height) = if cfg.compact.enabled {
        builder::build_compacted(
            &images,
            cfg.target_width,
            cfg.row_height,
            &options,
            &(&cfg.compact).into(),
        )?
    } else {
        (
            builder::build_with(&images, cfg.target_width, cfg.row_height, &options)?,
            cfg.row_height,
        )
    };
    if row_height != cfg.row_height {
        info!(row_height, "compacted nominal row height");
    }
    info!(
        width = collage.width(),
        height = collage.height(),
        rows = collage.rows().len(),
        "collage composed"
    );

    collage
        .image()
        .save(&cfg.output)
        .with_context(|| format!("writing {}", cfg.output.display()))?;
    info!(path = %cfg.output.display(), "collage saved");
    Ok(())
}
