// src/parse/header.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of columns the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    Size,
    VCpu,
    Memory,
    NetworkBandwidth,
    /// Burst/tier bandwidth, only reported by some vendors. No default rule
    /// maps to it; it is the target for `RuleTable::with_rule` extensions.
    /// Vendor exports name their tier column directly in `VendorSchema::tier`.
    Tier1Bandwidth,
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CanonicalField::Size => "Size",
            CanonicalField::VCpu => "vCPU",
            CanonicalField::Memory => "Memory",
            CanonicalField::NetworkBandwidth => "Network Bandwidth",
            CanonicalField::Tier1Bandwidth => "Tier1 Bandwidth",
        };
        f.write_str(s)
    }
}

/// A normalized column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Field(CanonicalField),
    /// Header text that matched no rule, trimmed. Callers ignore these columns.
    Unrecognized(String),
}

impl Header {
    pub fn field(&self) -> Option<CanonicalField> {
        match self {
            Header::Field(f) => Some(*f),
            Header::Unrecognized(_) => None,
        }
    }
}

/// Maps arbitrary header text to a canonical field.
pub trait HeaderPolicy {
    fn normalize(&self, header: &str) -> Header;
}

#[derive(Debug, Clone)]
enum Needle {
    AnyOf(Vec<String>),
    AllOf(Vec<String>),
}

/// One substring rule. Needles are stored lowercase.
#[derive(Debug, Clone)]
pub struct Rule {
    needle: Needle,
    field: CanonicalField,
}

impl Rule {
    /// Matches when the header contains at least one of `needles`.
    pub fn any_of(needles: &[&str], field: CanonicalField) -> Self {
        Self {
            needle: Needle::AnyOf(needles.iter().map(|n| n.to_lowercase()).collect()),
            field,
        }
    }

    /// Matches only when the header contains every one of `needles`.
    pub fn all_of(needles: &[&str], field: CanonicalField) -> Self {
        Self {
            needle: Needle::AllOf(needles.iter().map(|n| n.to_lowercase()).collect()),
            field,
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        match &self.needle {
            Needle::AnyOf(ns) => ns.iter().any(|n| lowered.contains(n.as_str())),
            Needle::AllOf(ns) => ns.iter().all(|n| lowered.contains(n.as_str())),
        }
    }
}

/// Ordered, case-insensitive substring rules. First match wins.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            rules: vec![
                Rule::any_of(&["size"], CanonicalField::Size),
                Rule::any_of(&["vcpu", "vcpus", "core"], CanonicalField::VCpu),
                Rule::any_of(&["memory", "ram"], CanonicalField::Memory),
                Rule::all_of(&["network", "bandwidth"], CanonicalField::NetworkBandwidth),
            ],
        }
    }
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Append a rule after the existing ones, so it only sees headers the
    /// earlier rules did not claim.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

impl HeaderPolicy for RuleTable {
    fn normalize(&self, header: &str) -> Header {
        let trimmed = header.trim();
        let lowered = trimmed.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&lowered))
            .map(|r| Header::Field(r.field))
            .unwrap_or_else(|| Header::Unrecognized(trimmed.to_string()))
    }
}

/// Normalize with the default rule table.
pub fn normalize(header: &str) -> Header {
    RuleTable::default().normalize(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_headers() {
        assert_eq!(
            normalize("Network Bandwidth (Mbps)"),
            Header::Field(CanonicalField::NetworkBandwidth)
        );
        assert_eq!(normalize("vCPUs"), Header::Field(CanonicalField::VCpu));
        assert_eq!(normalize("vCPU cores"), Header::Field(CanonicalField::VCpu));
        assert_eq!(normalize("Memory: GiB"), Header::Field(CanonicalField::Memory));
        assert_eq!(normalize(" Size "), Header::Field(CanonicalField::Size));
    }

    #[test]
    fn unrecognized_passes_through() {
        assert_eq!(normalize("Notes"), Header::Unrecognized("Notes".into()));
        // both words are required for network bandwidth
        assert_eq!(
            normalize("Max network interfaces"),
            Header::Unrecognized("Max network interfaces".into())
        );
    }

    #[test]
    fn first_rule_wins() {
        // "size" is checked before "memory"
        assert_eq!(normalize("Memory size"), Header::Field(CanonicalField::Size));
    }

    #[test]
    fn extra_rules_come_last() {
        let table = RuleTable::default().with_rule(Rule::any_of(&["tier"], CanonicalField::Tier1Bandwidth));
        assert_eq!(
            table.normalize("Tier_1 egress"),
            Header::Field(CanonicalField::Tier1Bandwidth)
        );
        assert_eq!(table.normalize("Size"), Header::Field(CanonicalField::Size));
    }
}
