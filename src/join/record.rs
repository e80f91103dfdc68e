// src/join/record.rs

use serde::Serialize;
use std::collections::HashMap;

/// Fields seen so far for one instance size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRecord {
    pub size: String,
    pub vcpu: Option<u64>,
    pub memory: Option<u64>,
    pub network_bandwidth: Option<u64>,
}

impl PartialRecord {
    pub fn new(size: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            vcpu: None,
            memory: None,
            network_bandwidth: None,
        }
    }

    /// Copy every non-null field of `newer` over `self`. Fields `newer`
    /// lacks are left untouched.
    pub fn merge_non_null(&mut self, newer: &PartialRecord) {
        debug_assert_eq!(self.size, newer.size);
        if newer.vcpu.is_some() {
            self.vcpu = newer.vcpu;
        }
        if newer.memory.is_some() {
            self.memory = newer.memory;
        }
        if newer.network_bandwidth.is_some() {
            self.network_bandwidth = newer.network_bandwidth;
        }
    }

    /// `Some` only when every required field is present.
    pub fn complete(&self) -> Option<CanonicalRecord> {
        Some(CanonicalRecord {
            size: self.size.clone(),
            vcpu: self.vcpu?,
            memory: self.memory?,
            network_bandwidth: self.network_bandwidth?,
        })
    }
}

/// A fully resolved row, in sink column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRecord {
    pub size: String,
    pub vcpu: u64,
    pub memory: u64,
    pub network_bandwidth: u64,
}

/// Per-document join state. PartialRecords are kept in first-sighting order.
#[derive(Debug, Default)]
pub struct Accumulator {
    records: Vec<PartialRecord>,
    index: HashMap<String, usize>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `partial.size` if unseen, then merge its non-null fields.
    pub fn merge(&mut self, partial: PartialRecord) {
        match self.index.get(&partial.size) {
            Some(&i) => self.records[i].merge_non_null(&partial),
            None => {
                self.index.insert(partial.size.clone(), self.records.len());
                self.records.push(partial);
            }
        }
    }

    pub fn get(&self, size: &str) -> Option<&PartialRecord> {
        self.index.get(size).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Promote complete records; incomplete keys are dropped.
    pub fn finish(self) -> Vec<CanonicalRecord> {
        self.records
            .iter()
            .filter_map(PartialRecord::complete)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(size: &str, vcpu: Option<u64>, memory: Option<u64>, net: Option<u64>) -> PartialRecord {
        PartialRecord {
            size: size.into(),
            vcpu,
            memory,
            network_bandwidth: net,
        }
    }

    #[test]
    fn later_value_wins_per_field() {
        let mut acc = Accumulator::new();
        acc.merge(partial("A", Some(2), Some(8), None));
        acc.merge(partial("A", Some(4), None, Some(1000)));
        assert_eq!(acc.get("A"), Some(&partial("A", Some(4), Some(8), Some(1000))));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn incomplete_records_are_dropped() {
        let mut acc = Accumulator::new();
        acc.merge(partial("A", Some(2), Some(8), Some(500)));
        acc.merge(partial("B", Some(2), None, Some(500)));
        acc.merge(partial("C", None, None, None));
        let out = acc.finish();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].size, "A");
    }

    #[test]
    fn first_sighting_order() {
        let mut acc = Accumulator::new();
        for s in ["z", "a", "m"] {
            acc.merge(partial(s, Some(1), Some(1), Some(1)));
        }
        acc.merge(partial("a", Some(2), None, None));
        let sizes: Vec<_> = acc.finish().into_iter().map(|r| r.size).collect();
        assert_eq!(sizes, vec!["z", "a", "m"]);
    }
}
