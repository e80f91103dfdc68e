// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// Where the Azure size documents live and how to fetch them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Directory holding the per-family subfolders.
    pub sizes_root: String,
    pub subfolders: Vec<String>,
    pub api_root: String,
    pub raw_root: String,
    /// Documents are kept when their file name contains this suffix.
    pub suffix: String,
    pub timeout_secs: u64,
    /// Documents fetched at once.
    pub concurrency: usize,
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            owner: "MicrosoftDocs".into(),
            repo: "azure-compute-docs".into(),
            branch: "main".into(),
            sizes_root: "articles/virtual-machines/sizes".into(),
            subfolders: [
                "general-purpose",
                "compute-optimized",
                "memory-optimized",
                "storage-optimized",
                "gpu-accelerated",
                "fpga-accelerated",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            api_root: "https://api.github.com".into(),
            raw_root: "https://raw.githubusercontent.com".into(),
            suffix: "-series.md".into(),
            timeout_secs: 30,
            concurrency: 4,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl ScrapeConfig {
    /// Read a YAML file; keys it omits keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// `load` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Is `file_name` one of the size documents we scrape?
    pub fn is_series_doc(&self, file_name: &str) -> bool {
        file_name.ends_with(".md") && file_name.contains(&self.suffix)
    }
}

/// Default `EnvFilter` directive: `base` for everything, raised to `debug`
/// for this crate's own targets when `debug` is set.
pub fn log_directive(base: &str, debug: bool) -> String {
    if debug {
        format!("{base},vmscraper=debug,generate=debug")
    } else {
        base.to_string()
    }
}
