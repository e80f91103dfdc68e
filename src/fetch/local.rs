// src/fetch/local.rs

use std::{collections::BTreeSet, path::PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::DocumentSource;
use crate::config::ScrapeConfig;

/// Reads documents from a local checkout of the docs repository, laid out
/// like the remote one (`<root>/<sizes_root>/<subfolder>/*-series.md`).
pub struct LocalSource {
    root: PathBuf,
    config: ScrapeConfig,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>, config: ScrapeConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    async fn list_folder(&self, subfolder: &str) -> Vec<String> {
        let rel_dir = format!("{}/{}", self.config.sizes_root.trim_matches('/'), subfolder);
        let dir = self.root.join(&rel_dir);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "listing failed");
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(e)) => e,
                Ok(None) => break,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "listing interrupted");
                    break;
                }
            };
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            let name = entry.file_name().to_string_lossy().to_string();
            if is_file && self.config.is_series_doc(&name) {
                out.push(format!("{}/{}", rel_dir, name));
            }
        }
        out
    }
}

impl DocumentSource for LocalSource {
    async fn discover(&self) -> Vec<String> {
        let mut paths = BTreeSet::new();
        for sub in &self.config.subfolders {
            let found = self.list_folder(sub).await;
            debug!(folder = %sub, count = found.len(), "listed folder");
            paths.extend(found);
        }
        info!(count = paths.len(), root = %self.root.display(), "discovered series files");
        paths.into_iter().collect()
    }

    async fn fetch(&self, path: &str) -> Option<String> {
        let full = self.root.join(path);
        match fs::read_to_string(&full).await {
            Ok(t) => Some(t),
            Err(e) => {
                warn!(path = %full.display(), error = %e, "read failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn discovers_only_series_docs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = ScrapeConfig {
            subfolders: vec!["gp".into(), "missing".into()],
            ..ScrapeConfig::default()
        };
        let gp = dir.path().join(&cfg.sizes_root).join("gp");
        std::fs::create_dir_all(gp.join("nested-series.md"))?;
        std::fs::write(gp.join("dv5-series.md"), "| Size |\n")?;
        std::fs::write(gp.join("av2-series.md"), "")?;
        std::fs::write(gp.join("overview.md"), "")?;

        let src = LocalSource::new(dir.path(), cfg.clone());
        let paths = src.discover().await;
        assert_eq!(
            paths,
            vec![
                format!("{}/gp/av2-series.md", cfg.sizes_root),
                format!("{}/gp/dv5-series.md", cfg.sizes_root),
            ]
        );
        assert_eq!(src.fetch(&paths[1]).await.as_deref(), Some("| Size |\n"));
        assert_eq!(src.fetch("nope/x-series.md").await, None);
        Ok(())
    }
}
