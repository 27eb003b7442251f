//! Salary extraction for boards that want numeric bounds (Kalibrr).
//!
//! The free-text range is read as millions of rupiah: `"8-12"` → 8,000,000..12,000,000.
//! Job records elsewhere store full figures (`"10000000-15000000"`), which this
//! scaling inflates by a further million. Kept as-is pending product clarification.

use std::sync::OnceLock;

use regex::Regex;

const MILLION: f64 = 1_000_000.0;

/// With a single number the maximum is assumed 50% above the minimum.
const SINGLE_VALUE_MAX_FACTOR: f64 = 1.5;

static NUMBER: OnceLock<Regex> = OnceLock::new();

fn number_pattern() -> &'static Regex {
    NUMBER.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number pattern"))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryBounds {
    pub min: f64,
    pub max: f64,
}

/// First number → min, second → max, both ×1,000,000. No number → 0..0.
pub fn parse_salary_millions(range: &str) -> SalaryBounds {
    let mut numbers = number_pattern()
        .find_iter(range)
        .filter_map(|m| m.as_str().parse::<f64>().ok());

    let min = numbers.next().map(|n| n * MILLION).unwrap_or(0.0);
    let max = numbers
        .next()
        .map(|n| n * MILLION)
        .unwrap_or(min * SINGLE_VALUE_MAX_FACTOR);

    SalaryBounds { min, max }
}
