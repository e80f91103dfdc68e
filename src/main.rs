use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vmscraper::{
    config::{self, ScrapeConfig},
    fetch::{GithubSource, LocalSource},
    parse::Policies,
    pipeline,
};

/// Scrape Azure VM size documents into a flat CSV of
/// size, vCPU, memory and network bandwidth.
#[derive(Parser)]
#[command(name = "vmscraper", version)]
struct Cli {
    /// Output CSV
    #[arg(short, long, default_value = "azure.csv")]
    output: PathBuf,

    /// YAML file overriding the default scrape settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read documents from a local checkout of the docs repo instead of GitHub
    #[arg(long)]
    local: Option<PathBuf>,

    /// Log fetch failures and per-document details
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::log_directive("error", cli.debug)));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) configure ────────────────────────────────────────────────
    let config = ScrapeConfig::load_or_default(cli.config.as_deref())?;
    let concurrency = config.concurrency;
    let policies = Policies::default();

    // ─── 3) discover, fetch, join, write ─────────────────────────────
    let summary = match cli.local {
        Some(root) => {
            let source = LocalSource::new(root, config);
            pipeline::scrape_to_csv(&source, &policies, &cli.output, concurrency).await?
        }
        None => {
            let source = GithubSource::new(config)?;
            pipeline::scrape_to_csv(&source, &policies, &cli.output, concurrency).await?
        }
    };

    info!(
        rows = summary.rows,
        output = %cli.output.display(),
        "all done"
    );
    Ok(())
}
