// src/pipeline.rs

use anyhow::{bail, Result};
use futures::{stream, StreamExt};
use std::{path::Path, time::Instant};
use tracing::{debug, info, instrument};

use crate::fetch::DocumentSource;
use crate::join::{classify_and_join, CanonicalRecord, JoinStats};
use crate::parse::Policies;
use crate::sink::CsvSink;
use crate::tables;

/// Totals for one scrape run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub documents: usize,
    /// Documents that could not be fetched.
    pub missing: usize,
    pub tables: usize,
    pub rows: u64,
}

/// Locate, classify and join the tables of one document.
pub fn process_document(text: &str, policies: &Policies) -> (Vec<CanonicalRecord>, JoinStats) {
    let (acc, stats) = classify_and_join(tables::locate(text), policies);
    let partials = acc.len();
    let records = acc.finish();
    debug!(
        tables = stats.tables,
        ignored = stats.ignored_tables,
        partials,
        records = records.len(),
        "processed document"
    );
    (records, stats)
}

/// Discover, fetch and process every document of `source`, writing the
/// canonical rows to a CSV at `output`.
///
/// Fails before touching `output` when nothing is discovered. Documents are
/// fetched `concurrency` at a time but processed and written in discovery
/// order.
#[instrument(level = "info", skip(source, policies, output), fields(output = %output.as_ref().display()))]
pub async fn scrape_to_csv<S, P>(
    source: &S,
    policies: &Policies,
    output: P,
    concurrency: usize,
) -> Result<Summary>
where
    S: DocumentSource,
    P: AsRef<Path>,
{
    let start = Instant::now();
    let paths = source.discover().await;
    if paths.is_empty() {
        bail!("no series documents discovered; refusing to write an empty output");
    }
    info!(documents = paths.len(), "discovered documents");

    let mut sink = CsvSink::create(output.as_ref())?;
    let mut summary = Summary::default();

    let mut docs = stream::iter(paths.iter())
        .map(|p| async move { (p, source.fetch(p).await) })
        .buffered(concurrency.max(1));

    while let Some((path, text)) = docs.next().await {
        summary.documents += 1;
        let Some(text) = text else {
            debug!(%path, "no document text; treating as empty");
            summary.missing += 1;
            continue;
        };
        let (records, stats) = process_document(&text, policies);
        sink.write_all(&records)?;
        summary.tables += stats.tables;
        info!(%path, tables = stats.tables, rows = records.len(), "wrote document rows");
    }
    summary.rows = sink.rows();

    info!(
        documents = summary.documents,
        missing = summary.missing,
        rows = summary.rows,
        elapsed = ?start.elapsed(),
        "scrape done"
    );
    Ok(summary)
}
