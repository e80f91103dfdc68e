// src/fetch/github.rs

use anyhow::{Context, Result};
use reqwest::{header::ACCEPT, Client};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::DocumentSource;
use crate::config::ScrapeConfig;

/// One entry of the GitHub "repository contents" listing.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    path: String,
}

/// Lists documents through the GitHub contents API and reads them from
/// raw.githubusercontent.com.
pub struct GithubSource {
    client: Client,
    config: ScrapeConfig,
}

impl GithubSource {
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, config })
    }

    fn contents_url(&self, subfolder: &str) -> Result<Url> {
        let c = &self.config;
        let raw = format!(
            "{}/repos/{}/{}/contents/{}/{}",
            c.api_root.trim_end_matches('/'),
            c.owner,
            c.repo,
            c.sizes_root.trim_matches('/'),
            subfolder
        );
        Url::parse(&raw).with_context(|| format!("parsing contents URL {}", raw))
    }

    fn raw_url(&self, path: &str) -> Result<Url> {
        let c = &self.config;
        let raw = format!(
            "{}/{}/{}/{}/{}",
            c.raw_root.trim_end_matches('/'),
            c.owner,
            c.repo,
            c.branch,
            path.trim_start_matches('/')
        );
        Url::parse(&raw).with_context(|| format!("parsing raw URL {}", raw))
    }

    async fn get_text_core(&self, url: &Url, accept: Option<&str>) -> Result<String> {
        debug!("Fetching text from {}", url);
        let mut req = self.client.get(url.clone());
        if let Some(accept) = accept {
            req = req.header(ACCEPT, accept);
        }
        req.send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .text()
            .await
            .with_context(|| format!("Reading text from {}", url))
    }

    async fn list_folder(&self, subfolder: &str) -> Vec<String> {
        let url = match self.contents_url(subfolder) {
            Ok(u) => u,
            Err(e) => {
                warn!(error = %e, "skipping folder");
                return Vec::new();
            }
        };
        let body = match self
            .get_text_core(&url, Some("application/vnd.github+json"))
            .await
        {
            Ok(b) => b,
            Err(e) => {
                warn!(%url, error = %e, "listing failed");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Value>(&body) {
            Ok(v) => series_paths(&v, &self.config),
            Err(e) => {
                warn!(%url, error = %e, "listing is not JSON");
                Vec::new()
            }
        }
    }
}

/// Paths of series documents in a contents listing. Anything but a JSON
/// array (e.g. an API error object) yields nothing.
fn series_paths(listing: &Value, config: &ScrapeConfig) -> Vec<String> {
    let Some(items) = listing.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| serde_json::from_value::<ContentEntry>(item.clone()).ok())
        .filter(|e| e.kind == "file" && config.is_series_doc(&e.name))
        .map(|e| e.path)
        .collect()
}

impl DocumentSource for GithubSource {
    #[instrument(level = "info", skip(self))]
    async fn discover(&self) -> Vec<String> {
        let mut paths = BTreeSet::new();
        for sub in &self.config.subfolders {
            let found = self.list_folder(sub).await;
            debug!(folder = %sub, count = found.len(), "listed folder");
            paths.extend(found);
        }
        info!(count = paths.len(), "discovered series files");
        paths.into_iter().collect()
    }

    async fn fetch(&self, path: &str) -> Option<String> {
        let url = match self.raw_url(path) {
            Ok(u) => u,
            Err(e) => {
                warn!(%path, error = %e, "bad document path");
                return None;
            }
        };
        match self.get_text_core(&url, None).await {
            Ok(t) => Some(t),
            Err(e) => {
                warn!(%url, error = %e, "fetch failed");
                None
            }
        }
    }
}
