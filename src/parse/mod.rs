pub mod header;
pub mod numeric;

pub use header::{normalize, CanonicalField, Header, HeaderPolicy, Rule, RuleTable};
pub use numeric::{extract, parse_decimal, LargestNumber, NumberPolicy};

/// The pluggable heuristics used while reading tables.
pub struct Policies {
    pub headers: Box<dyn HeaderPolicy + Send + Sync>,
    pub numbers: Box<dyn NumberPolicy + Send + Sync>,
}

impl Default for Policies {
    fn default() -> Self {
        Self {
            headers: Box::new(RuleTable::default()),
            numbers: Box::new(LargestNumber),
        }
    }
}

impl Policies {
    pub fn new(
        headers: impl HeaderPolicy + Send + Sync + 'static,
        numbers: impl NumberPolicy + Send + Sync + 'static,
    ) -> Self {
        Self {
            headers: Box::new(headers),
            numbers: Box::new(numbers),
        }
    }
}
