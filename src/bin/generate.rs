use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::{fs, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use vmscraper::{codegen, config, vendor::VendorSchema};

/// Turn per-vendor CSV exports (`aws.csv`, `azure.csv`, `gcp.csv`) into
/// `<vendor>_instances.cpp` lookup tables.
#[derive(Parser)]
#[command(name = "generate", version)]
struct Cli {
    /// Directory holding `<vendor>.csv`
    #[arg(short, long, default_value = ".")]
    input: PathBuf,

    /// Directory the generated sources are written to
    #[arg(short, long, default_value = "../src/cloud")]
    output: PathBuf,

    /// YAML list of vendor schemas replacing the built-in AWS/Azure/GCP ones
    #[arg(long)]
    vendors: Option<PathBuf>,

    /// Only generate these vendors (by name, case-insensitive)
    #[arg(long = "vendor")]
    only: Vec<String>,

    /// Skip running clang-format -i on the generated files
    #[arg(long)]
    no_format: bool,

    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::log_directive("info", cli.debug)));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let mut schemas = match &cli.vendors {
        Some(path) => VendorSchema::load_all(path)?,
        None => VendorSchema::builtin(),
    };
    if !cli.only.is_empty() {
        schemas.retain(|s| cli.only.iter().any(|o| o.eq_ignore_ascii_case(&s.vendor)));
    }
    if schemas.is_empty() {
        anyhow::bail!("no vendor schemas selected");
    }

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;

    // vendors are independent; each writes its own file
    let results: Vec<(String, Result<(PathBuf, usize)>)> = schemas
        .par_iter()
        .map(|s| {
            (
                s.vendor.clone(),
                codegen::generate_vendor(s, &cli.input, &cli.output),
            )
        })
        .collect();

    let mut failed = 0;
    for (vendor, res) in results {
        match res {
            Ok((path, n)) => {
                if !cli.no_format {
                    codegen::clang_format(&path);
                }
                info!(%vendor, records = n, path = %path.display(), "done");
            }
            Err(e) => {
                error!(%vendor, "generation failed: {:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} vendor(s) failed", failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_unless_disabled() {
        let cli = Cli::parse_from(["generate"]);
        assert!(!cli.no_format);
        let cli = Cli::parse_from(["generate", "--no-format"]);
        assert!(cli.no_format);
    }
}
