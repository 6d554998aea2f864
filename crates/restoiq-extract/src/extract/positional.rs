//! Keyword-gated positional assignment for bare-number queries.
//!
//! Only consulted when no explicit phrase and no tabular block produced a
//! numeric field, e.g. "sales 50000 labor 15000 food 14000".

use once_cell::sync::Lazy;
use regex::Regex;
use restoiq_core::{FieldMap, FieldValue};
use tracing::debug;

use super::normalize::parse_amount;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$?\d[\d,]*(?:\.\d+)?k?\b").unwrap());

static SALES_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:sales|revenue|total)\b").unwrap());
static LABOR_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\blabou?r\b").unwrap());
static FOOD_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bfood\b").unwrap());
static HOUR_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bhours?\b").unwrap());
static RATE_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:rate|wage|hourly)\b").unwrap());
static TURNOVER_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bturnover\b").unwrap());

const HOURLY_RATE_RANGE: (f64, f64) = (10.0, 100.0);
const MAX_HOURS: f64 = 1000.0;

/// All non-negative numbers in the (lower-cased) query, in order of appearance.
pub fn numbers_in(lower: &str) -> Vec<f64> {
    NUMBER
        .find_iter(lower)
        .filter(|m| !lower[..m.start()].ends_with('-'))
        .filter_map(|m| parse_amount(m.as_str()))
        .collect()
}

/// Assign bare numbers to fields by position, gated on keywords.
///
/// Slot 0 is sales; labor and food take the following slots in that order
/// when their keywords are present. Hours takes the largest value under
/// 1000, the hourly rate the first value after slot 0 within `[10, 100]`,
/// and turnover the first value.
pub fn assign_positional(lower: &str) -> FieldMap {
    let mut fields = FieldMap::new();
    let numbers = numbers_in(lower);
    if numbers.is_empty() {
        return fields;
    }

    let mut next_slot = 0usize;
    if SALES_WORDS.is_match(lower) {
        fields.insert_if_absent("total_sales", FieldValue::Number(numbers[0]));
        next_slot = 1;
    }
    if LABOR_WORDS.is_match(lower) {
        if let Some(v) = numbers.get(next_slot) {
            fields.insert_if_absent("labor_cost", FieldValue::Number(*v));
            next_slot += 1;
        }
    }
    if FOOD_WORDS.is_match(lower) {
        if let Some(v) = numbers.get(next_slot) {
            fields.insert_if_absent("food_cost", FieldValue::Number(*v));
        }
    }
    if HOUR_WORDS.is_match(lower) {
        let hours = numbers
            .iter()
            .copied()
            .filter(|n| *n > 0.0 && *n < MAX_HOURS)
            .fold(None, |acc: Option<f64>, n| Some(acc.map_or(n, |a| a.max(n))));
        if let Some(h) = hours {
            fields.insert_if_absent("hours_worked", FieldValue::Number(h));
        }
    }
    if RATE_WORDS.is_match(lower) {
        let (lo, hi) = HOURLY_RATE_RANGE;
        if let Some(rate) = numbers.iter().skip(1).find(|n| **n >= lo && **n <= hi) {
            fields.insert_if_absent("hourly_rate", FieldValue::Number(*rate));
        }
    }
    if TURNOVER_WORDS.is_match(lower) {
        fields.insert_if_absent("turnover_rate", FieldValue::Number(numbers[0]));
    }

    if !fields.is_empty() {
        debug!("Positional fallback assigned {} fields", fields.len());
    }
    fields
}
