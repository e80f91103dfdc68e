// src/fetch/mod.rs
pub mod github;
pub mod local;

pub use github::GithubSource;
pub use local::LocalSource;

/// Where documents come from.
///
/// Neither method fails: an unreachable listing yields no paths and an
/// unreadable document yields `None`, which the pipeline treats as a
/// document without tables.
#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    /// Document paths to scrape, sorted and without duplicates.
    async fn discover(&self) -> Vec<String>;

    /// Raw text of one discovered document.
    async fn fetch(&self, path: &str) -> Option<String>;
}
