//! assetscraper
//!
//! Runs one scrape cycle on the local host and prints the metric batch as JSON

use std::path::PathBuf;

use assetscraper_core::build_scraper;
use assetscraper_exec::ExecContext;
use assetscraper_metrics::Settings;
use clap::Parser;
use color_eyre::Result;
use tracing::{info, info_span, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::Config;

/// Host asset inventory scraper
#[derive(Parser, Debug)]
#[command(name = "assetscraper", version, about)]
struct Args {
    /// Config file (defaults to $ASSETSCRAPER_CONFIG or the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, overrides RUST_LOG and the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Pretty-print the metric batch
    #[arg(long)]
    pretty: bool,
}

fn init_tracing(args: &Args, config: &Config) -> Result<()> {
    let filter = match &args.log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log.level))?,
    };

    // stdout carries the batch, logs go to stderr
    let registry = tracing_subscriber::registry().with(filter);
    if args.json_logs || config.log.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let path = args.config.clone().or_else(Config::default_path);
    let config = match &path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    init_tracing(&args, &config)?;
    match &path {
        Some(path) => info!(path = %path.display(), "loaded configuration"),
        None => warn!("no config file found, using defaults"),
    }

    let ctx = ExecContext::new();
    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling scrape");
            interrupt.cancel();
        }
    });

    let span = info_span!("scraper");
    let mut scraper = build_scraper(&config.scraper, Settings::default(), span, &ctx).await?;
    scraper.start().await?;

    let report = scraper.scrape(&ctx).await;
    if !report.is_complete() {
        warn!(failed = report.errors.len(), "scrape incomplete, some metrics are missing");
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&report.batch)?
    } else {
        serde_json::to_string(&report.batch)?
    };
    println!("{output}");

    if ctx.is_cancelled() {
        eyre::bail!("scrape interrupted");
    }
    Ok(())
}
