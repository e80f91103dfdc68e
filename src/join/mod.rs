// src/join/mod.rs
pub mod record;

pub use record::{Accumulator, CanonicalRecord, PartialRecord};

use std::collections::HashMap;
use tracing::{debug, trace};

use crate::parse::{CanonicalField, Policies};
use crate::tables::RawTable;

/// Recognized columns of one table. Duplicate headers: the last one wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    cols: HashMap<CanonicalField, usize>,
}

impl ColumnMap {
    pub fn from_headers(headers: &[String], policies: &Policies) -> Self {
        let cols = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| policies.headers.normalize(h).field().map(|f| (f, i)))
            .collect();
        Self { cols }
    }

    pub fn get(&self, field: CanonicalField) -> Option<usize> {
        self.cols.get(&field).copied()
    }

    pub fn has(&self, field: CanonicalField) -> bool {
        self.cols.contains_key(&field)
    }
}

/// What a table can contribute to the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Size + vCPU and/or memory.
    Basics,
    /// Size + network bandwidth.
    Network,
    /// Both of the above in one table.
    Combined,
}

impl TableKind {
    pub fn classify(cols: &ColumnMap) -> Option<Self> {
        if !cols.has(CanonicalField::Size) {
            return None;
        }
        let basics = cols.has(CanonicalField::VCpu) || cols.has(CanonicalField::Memory);
        let network = cols.has(CanonicalField::NetworkBandwidth);
        match (basics, network) {
            (true, true) => Some(TableKind::Combined),
            (true, false) => Some(TableKind::Basics),
            (false, true) => Some(TableKind::Network),
            (false, false) => None,
        }
    }

    fn basics(self) -> bool {
        matches!(self, TableKind::Basics | TableKind::Combined)
    }

    fn network(self) -> bool {
        matches!(self, TableKind::Network | TableKind::Combined)
    }
}

/// Counters for one document's join pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JoinStats {
    pub tables: usize,
    pub ignored_tables: usize,
    pub rows: usize,
    pub skipped_rows: usize,
}

/// Feed every table into a fresh accumulator.
pub fn classify_and_join<I>(tables: I, policies: &Policies) -> (Accumulator, JoinStats)
where
    I: IntoIterator<Item = RawTable>,
{
    let mut acc = Accumulator::new();
    let mut stats = JoinStats::default();
    for table in tables {
        join_table(&table, policies, &mut acc, &mut stats);
    }
    (acc, stats)
}

/// Merge the rows of a single table into `acc`. Tables that are neither
/// basics nor network tables contribute nothing.
pub fn join_table(
    table: &RawTable,
    policies: &Policies,
    acc: &mut Accumulator,
    stats: &mut JoinStats,
) {
    stats.tables += 1;
    let cols = ColumnMap::from_headers(&table.headers, policies);
    let Some(kind) = TableKind::classify(&cols) else {
        trace!(headers = ?table.headers, "ignoring table");
        stats.ignored_tables += 1;
        return;
    };
    let Some(size_col) = cols.get(CanonicalField::Size) else {
        return;
    };

    let value = |row: &[String], field: CanonicalField| -> Option<u64> {
        cols.get(field)
            .and_then(|i| row.get(i))
            .and_then(|cell| policies.numbers.extract(cell))
    };

    for row in table.rows.iter().map(Vec::as_slice) {
        if row.len() < table.headers.len() {
            stats.skipped_rows += 1;
            continue;
        }
        let size = row[size_col].trim();
        if size.is_empty() {
            stats.skipped_rows += 1;
            continue;
        }

        let mut partial = PartialRecord::new(size);
        if kind.basics() {
            partial.vcpu = value(row, CanonicalField::VCpu);
            partial.memory = value(row, CanonicalField::Memory);
        }
        if kind.network() {
            partial.network_bandwidth = value(row, CanonicalField::NetworkBandwidth);
        }
        acc.merge(partial);
        stats.rows += 1;
    }

    debug!(?kind, rows = table.rows.len(), "joined table");
}
