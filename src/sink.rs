// src/sink.rs

use anyhow::{Context, Result};
use std::{fs::File, io::Write, path::Path};

use crate::join::CanonicalRecord;

/// Header row of the scrape output, in record order.
pub const HEADER: [&str; 4] = ["Size", "vC", "Memory", "Network Bandwidth"];

/// Append-only CSV of canonical records.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl CsvSink<File> {
    /// Create (truncate) `path` and write the header row.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        Self::new(file)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER).context("writing CSV header")?;
        Ok(Self { writer, rows: 0 })
    }

    /// Write one document's records and flush, so a document's rows land
    /// together.
    pub fn write_all(&mut self, records: &[CanonicalRecord]) -> Result<()> {
        for r in records {
            self.writer
                .write_record([
                    r.size.clone(),
                    r.vcpu.to_string(),
                    r.memory.to_string(),
                    r.network_bandwidth.to_string(),
                ])
                .with_context(|| format!("writing row for {}", r.size))?;
            self.rows += 1;
        }
        self.writer.flush().context("flushing CSV")?;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("finishing CSV: {}", e.error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows_in_order() -> Result<()> {
        let mut sink = CsvSink::new(Vec::new())?;
        sink.write_all(&[CanonicalRecord {
            size: "Standard_D2s_v3".into(),
            vcpu: 2,
            memory: 8,
            network_bandwidth: 3000,
        }])?;
        assert_eq!(sink.rows(), 1);
        let out = String::from_utf8(sink.into_inner()?)?;
        assert_eq!(
            out,
            "Size,vC,Memory,Network Bandwidth\nStandard_D2s_v3,2,8,3000\n"
        );
        Ok(())
    }

    #[test]
    fn header_written_without_rows() -> Result<()> {
        let sink = CsvSink::new(Vec::new())?;
        let out = String::from_utf8(sink.into_inner()?)?;
        assert_eq!(out, "Size,vC,Memory,Network Bandwidth\n");
        Ok(())
    }
}
