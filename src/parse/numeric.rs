// src/parse/numeric.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading "16k" / "1.5 k" shorthand.
static SHORTHAND_K: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?)\s*k\b").expect("shorthand regex"));

/// Any run of digits that may carry thousands separators or a decimal point.
static NUMERIC_CHUNK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9][0-9,.]*").expect("numeric chunk regex"));

/// Turns noisy vendor text into a single number.
///
/// Implementations must never fail: anything they cannot make sense of is
/// `None`.
pub trait NumberPolicy {
    fn extract(&self, text: &str) -> Option<u64>;
}

/// Default policy: `k` shorthand first, otherwise the largest number in the
/// text. Vendor cells like "16,000 (up to 25,000)" or "8 / 16" resolve to
/// the biggest value.
#[derive(Debug, Default, Clone, Copy)]
pub struct LargestNumber;

impl NumberPolicy for LargestNumber {
    fn extract(&self, text: &str) -> Option<u64> {
        extract(text)
    }
}

/// Best-effort integer extraction.
///
/// `"16,000+"`, `"16k"` and `"16,000 Mb/s"` all give `16000`; `"672 GB"`
/// gives `672`. Decimals are truncated toward zero.
pub fn extract(text: &str) -> Option<u64> {
    let s = text.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = SHORTHAND_K.captures(&s) {
        if let Ok(v) = caps[1].parse::<f64>() {
            return Some(truncate(v * 1000.0));
        }
    }

    NUMERIC_CHUNK
        .find_iter(&s)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .map(truncate)
        .max()
}

/// Decimal-aware parse: keeps only ASCII digits and `.` and reads the rest
/// as a float. `"8 GiB"` → `8.0`, `"1.5 GiB"` → `1.5`, `"N/A"` → `None`.
///
/// Unlike [`extract`] this glues every digit together, so "0.5 - 1.5" is
/// unparsable rather than a range.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if kept.is_empty() {
        return None;
    }
    kept.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Truncate toward zero, clamping negatives (never produced by the regexes)
/// to zero.
pub(crate) fn truncate(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        v.trunc() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separator_and_unit_noise() {
        assert_eq!(extract("16,000+ Mbps"), Some(16000));
        assert_eq!(extract("16,000 Mb/s"), Some(16000));
        assert_eq!(extract("672 GB"), Some(672));
    }

    #[test]
    fn k_shorthand() {
        assert_eq!(extract("1.5k"), Some(1500));
        assert_eq!(extract("16k"), Some(16000));
        assert_eq!(extract(" 50 K "), Some(50000));
        // "kb" is a unit, not the shorthand marker
        assert_eq!(extract("16kb"), Some(16));
    }

    #[test]
    fn absent_values() {
        assert_eq!(extract(""), None);
        assert_eq!(extract("   "), None);
        assert_eq!(extract("N/A"), None);
        assert_eq!(extract("-"), None);
    }

    #[test]
    fn picks_largest_of_many() {
        assert_eq!(extract("12500 (up to 25000)"), Some(25000));
        assert_eq!(extract("2<sup>1</sup> / 4"), Some(4));
        assert_eq!(extract("8 / 16 / 3"), Some(16));
    }

    #[test]
    fn decimals_truncate() {
        assert_eq!(extract("12.9 Gbps"), Some(12));
        // malformed chunk is skipped, the others still count
        assert_eq!(extract("1.2.3 or 7"), Some(7));
    }

    #[test]
    fn policy_delegates_to_extract() {
        assert_eq!(LargestNumber.extract("3000 Mbps"), Some(3000));
    }

    #[test]
    fn decimal_path() {
        assert_eq!(parse_decimal("8 GiB"), Some(8.0));
        assert_eq!(parse_decimal("1.5 GiB"), Some(1.5));
        assert_eq!(parse_decimal("N/A"), None);
        assert_eq!(parse_decimal("0.5 - 1.5"), None);
        assert_eq!(parse_decimal(""), None);
    }
}
