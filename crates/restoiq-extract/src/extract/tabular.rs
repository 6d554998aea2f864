//! Header-row / value-row detection for pasted spreadsheet data.
//!
//! A line whose tokens normalise to known field names is a header; the next
//! non-blank line holds the values, zipped by position. Only the first
//! qualifying block is used.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use restoiq_core::{
    is_canonical, DetectedMarker, FieldMap, FieldValue, BUSINESS_FIELDS, CANONICAL_FIELDS,
    GROWTH_FIELDS,
};
use tracing::debug;

use super::normalize::parse_amount;

/// Fields whose presence in a header row makes the row a tabular block.
pub const FIELDS_OF_INTEREST: &[&str] = &[
    "revenue_target",
    "budget_total",
    "marketing_spend",
    "staffing_cost",
    "timeline_months",
    "market_size",
    "market_share",
    "competition_level",
    "investment_budget",
    "expansion_cost",
    "projected_revenue",
    "total_sales",
    "labor_cost",
    "food_cost",
    "hours_worked",
    "hourly_rate",
    "prime_cost",
    "turnover_rate",
    "ingredient_cost",
    "portion_cost",
    "recipe_price",
];

const TEXT_COLUMNS: &[&str] = &["recipe_name", "category_filter"];

static HEADER_SYNONYMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for (alias, field) in [
        ("sales", "total_sales"),
        ("revenue", "total_sales"),
        ("gross_sales", "total_sales"),
        ("net_sales", "total_sales"),
        ("total_revenue", "total_sales"),
        ("labor", "labor_cost"),
        ("labour", "labor_cost"),
        ("payroll", "labor_cost"),
        ("food", "food_cost"),
        ("cogs", "food_cost"),
        ("hours", "hours_worked"),
        ("labor_hours", "hours_worked"),
        ("wage", "hourly_rate"),
        ("goal", "revenue_target"),
        ("target_revenue", "revenue_target"),
        ("revenue_goal", "revenue_target"),
        ("sales_goal", "revenue_target"),
        ("sales_target", "revenue_target"),
        ("budget", "budget_total"),
        ("total_budget", "budget_total"),
        ("ad_spend", "marketing_spend"),
        ("advertising", "marketing_spend"),
        ("staff_cost", "staffing_cost"),
        ("months", "timeline_months"),
        ("timeframe", "timeline_months"),
        ("tam", "market_size"),
        ("share", "market_share"),
        ("competitors", "competition_level"),
        ("capex", "investment_budget"),
        ("revenue_projection", "projected_revenue"),
        ("projected_sales", "projected_revenue"),
        ("turnover", "turnover_rate"),
        ("recipe", "recipe_name"),
        ("category", "category_filter"),
    ] {
        m.insert(alias, field);
    }
    m
});

/// Prefix rules, checked in order. `market_siz` must precede `market_s`.
const HEADER_PREFIXES: &[(&str, &str)] = &[
    ("market_siz", "market_size"),
    ("market_s", "market_share"),
    ("revenue_t", "revenue_target"),
    ("revenue_g", "revenue_target"),
    ("budget_t", "budget_total"),
    ("total_bud", "budget_total"),
    ("marketing_s", "marketing_spend"),
    ("staffing_c", "staffing_cost"),
    ("investment_b", "investment_budget"),
    ("expansion_c", "expansion_cost"),
    ("projected_r", "projected_revenue"),
    ("competition_l", "competition_level"),
    ("total_sal", "total_sales"),
    ("labor_c", "labor_cost"),
    ("food_c", "food_cost"),
    ("hourly_r", "hourly_rate"),
];

const HEADER_SUBSTRINGS: &[(&str, &str)] = &[
    ("invest", "investment_budget"),
    ("compet", "competition_level"),
    ("marketing", "marketing_spend"),
    ("staffing", "staffing_cost"),
    ("expansion", "expansion_cost"),
    ("timeline", "timeline_months"),
];

const MAX_HEADER_LEN: usize = 40;

static MULTI_SPACE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\s{2,}").ok());

static COMMA_VALUE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\s*\$?\d{1,3}(?:,\d{3})+(?:\.\d+)?%?|[^,]+").ok());

/// How a header row separates its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
    MultiSpace,
    SingleSpace,
}

impl Delimiter {
    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        let tokens: Vec<&str> = match self {
            Self::Comma => line.split(',').collect(),
            Self::Tab => line.split('\t').collect(),
            Self::MultiSpace => match MULTI_SPACE.as_ref() {
                Some(re) => re.split(line.trim()).collect(),
                None => line.split_whitespace().collect(),
            },
            Self::SingleSpace => line.split_whitespace().collect(),
        };
        tokens.into_iter().map(str::trim).collect()
    }

    /// Split a value row, re-joining `50,000`-style amounts on comma rows.
    fn split_values<'a>(&self, line: &'a str, expected: usize) -> Vec<&'a str> {
        let naive = self.split(line);
        if *self != Self::Comma || naive.len() <= expected {
            return naive;
        }
        match COMMA_VALUE.as_ref() {
            Some(re) => re.find_iter(line).map(|m| m.as_str().trim()).collect(),
            None => naive,
        }
    }
}

/// Map a header cell onto a canonical field name.
pub fn normalize_header(token: &str) -> Option<&'static str> {
    let lowered = token.trim().to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match c {
            'a'..='z' => cleaned.push(c),
            ' ' | '-' | '_' | '.' | '/' => {
                if !cleaned.ends_with('_') {
                    cleaned.push('_');
                }
            }
            '$' | '%' | '(' | ')' | '#' | '*' | '"' | '\'' | ':' => {}
            _ => return None,
        }
    }
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() || cleaned.len() > MAX_HEADER_LEN {
        return None;
    }

    if let Some(field) = HEADER_SYNONYMS.get(cleaned) {
        return Some(*field);
    }
    if let Some(field) = CANONICAL_FIELDS.iter().find(|f| **f == cleaned) {
        return Some(*field);
    }
    if let Some((_, field)) = HEADER_PREFIXES.iter().find(|(p, _)| cleaned.starts_with(p)) {
        return Some(*field);
    }
    HEADER_SUBSTRINGS
        .iter()
        .find(|(s, _)| cleaned.contains(s))
        .map(|(_, field)| *field)
}

fn pick_delimiter(line: &str) -> Option<Delimiter> {
    if line.contains(',') {
        return Some(Delimiter::Comma);
    }
    if line.contains('\t') {
        return Some(Delimiter::Tab);
    }
    if MULTI_SPACE
        .as_ref()
        .map(|re| re.is_match(line.trim()))
        .unwrap_or(false)
    {
        return Some(Delimiter::MultiSpace);
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let known = tokens
        .iter()
        .filter(|t| normalize_header(t).is_some())
        .count();
    if tokens.len() >= 3 && known >= 2 {
        Some(Delimiter::SingleSpace)
    } else {
        None
    }
}

/// Business vs growth, by which set has strictly more positive fields.
pub fn marker_for(fields: &FieldMap) -> DetectedMarker {
    let business = fields.positive_count(BUSINESS_FIELDS);
    let growth = fields.positive_count(GROWTH_FIELDS);
    if business > growth {
        DetectedMarker::Business
    } else if growth > business {
        DetectedMarker::Growth
    } else {
        DetectedMarker::Unset
    }
}

/// A detected header/value block.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularBlock {
    /// Zero-based line index of the header row.
    pub header_line: usize,
    pub delimiter: Delimiter,
    pub fields: FieldMap,
    pub marker: DetectedMarker,
}

impl TabularBlock {
    /// Whether any cell parsed to a number.
    pub fn has_numeric_value(&self) -> bool {
        self.fields.iter().any(|(_, v)| v.as_f64().is_some())
    }
}

fn value_for(field: &str, raw: &str) -> FieldValue {
    if TEXT_COLUMNS.contains(&field) {
        return FieldValue::Text(raw.trim().to_string());
    }
    match parse_amount(raw) {
        Some(v) => FieldValue::Number(v),
        None => FieldValue::Text(String::new()),
    }
}

/// Find the first header/value block in the query.
pub fn detect_tabular_block(text: &str) -> Option<TabularBlock> {
    let lines: Vec<&str> = text.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(delimiter) = pick_delimiter(line) else {
            continue;
        };
        let headers: Vec<Option<&'static str>> = delimiter
            .split(line)
            .into_iter()
            .map(normalize_header)
            .collect();
        if !headers
            .iter()
            .flatten()
            .any(|h| FIELDS_OF_INTEREST.contains(h))
        {
            continue;
        }
        let Some(value_line) = lines[idx + 1..].iter().find(|l| !l.trim().is_empty()) else {
            continue;
        };
        let values = delimiter.split_values(value_line, headers.len());
        if !values.iter().any(|v| parse_amount(v).is_some()) {
            continue;
        }
        // Space-separated rows carry no cell boundaries, so every token must
        // be an amount and line up with a header.
        if delimiter == Delimiter::SingleSpace
            && (values.len() != headers.len() || values.iter().any(|v| parse_amount(v).is_none()))
        {
            debug!("Line {} is prose, not a space-separated value row", idx + 1);
            continue;
        }

        let mut fields = FieldMap::new();
        for (pos, header) in headers.iter().enumerate() {
            let Some(field) = header.filter(|f| is_canonical(f)) else {
                continue;
            };
            let raw = values.get(pos).copied().unwrap_or("");
            fields.insert_if_absent(field, value_for(field, raw));
        }
        let marker = marker_for(&fields);
        debug!(
            "Tabular block at line {} ({:?}): {} fields, marker {}",
            idx,
            delimiter,
            fields.len(),
            marker
        );
        return Some(TabularBlock {
            header_line: idx,
            delimiter,
            fields,
            marker,
        });
    }
    None
}
