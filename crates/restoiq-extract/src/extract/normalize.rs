//! Value normalisers and query pre-processing.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use restoiq_core::FieldValue;

/// Upper bound on extracted text values, in characters.
pub const MAX_TEXT_LEN: usize = 60;

static PERCENT_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"%([0-9A-Fa-f]{2})").unwrap());

/// How a captured value string becomes a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    /// Dollar amount: optional `$`, thousands separators, `k` suffix.
    Money,
    /// Percentage: optional trailing `%`.
    Percent,
    /// Whole number.
    Count,
    /// Any non-negative number.
    Number,
    /// Short free text.
    Text,
    /// The rule matching at all yields this constant text.
    Fixed(&'static str),
}

impl Normalizer {
    pub fn apply(&self, raw: &str) -> Option<FieldValue> {
        match self {
            Self::Money | Self::Number | Self::Percent => parse_amount(raw).map(FieldValue::Number),
            Self::Count => parse_count(raw).map(FieldValue::Integer),
            Self::Text => clean_text(raw).map(FieldValue::Text),
            Self::Fixed(value) => Some(FieldValue::Text((*value).to_string())),
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text | Self::Fixed(_))
    }
}

/// Strip currency, separators, percent signs and whitespace.
///
/// Idempotent: cleaning an already clean string returns it unchanged.
pub fn clean_numeric(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect()
}

/// Parse a non-negative amount, honouring a trailing `k` multiplier.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = clean_numeric(raw).to_ascii_lowercase();
    let (digits, multiplier) = match cleaned.strip_suffix('k') {
        Some(d) => (d, 1_000.0),
        None => (cleaned.as_str(), 1.0),
    };
    let trimmed = digits.trim_end_matches('.');
    let value: f64 = trimmed.parse().ok()?;
    let value = value * multiplier;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Parse a non-negative whole number; `4.0` is accepted, `4.5` is not.
pub fn parse_count(raw: &str) -> Option<i64> {
    let value = parse_amount(raw)?;
    if value.fract() == 0.0 && value <= i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn clean_text(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() && c != '&');
    let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed.chars().count() > MAX_TEXT_LEN {
        None
    } else {
        Some(collapsed)
    }
}

/// Decode `%XX` escapes from URL-encoded prompts, leaving other `%` alone.
pub fn decode_percent_escapes(text: &str) -> Cow<'_, str> {
    if !PERCENT_ESCAPE.is_match(text) {
        return Cow::Borrowed(text);
    }
    PERCENT_ESCAPE.replace_all(text, |caps: &regex::Captures| {
        let hex = &caps[1];
        match u8::from_str_radix(hex, 16) {
            Ok(b) if b.is_ascii() && (b.is_ascii_graphic() || b == b' ' || b == b'\n') => {
                (b as char).to_string()
            }
            _ => caps[0].to_string(),
        }
    })
}

/// Truncate to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_normalization() {
        assert_eq!(parse_amount("$50,000"), Some(50000.0));
        assert_eq!(parse_amount("50000"), Some(50000.0));
        assert_eq!(parse_amount("$ 1,250.75"), Some(1250.75));
        assert_eq!(parse_amount("50k"), Some(50000.0));
        assert_eq!(parse_amount("28%"), Some(28.0));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_clean_numeric_is_idempotent() {
        for raw in ["$50,000", "50000", "28.5%", "$ 1,000,000.00"] {
            let once = clean_numeric(raw);
            assert_eq!(clean_numeric(&once), once);
        }
        assert_eq!(
            Normalizer::Money.apply("$50,000"),
            Normalizer::Money.apply("50000")
        );
    }

    #[test]
    fn test_count_rejects_fractions() {
        assert_eq!(parse_count("12"), Some(12));
        assert_eq!(parse_count("1,200"), Some(1200));
        assert_eq!(parse_count("4.0"), Some(4));
        assert_eq!(parse_count("4.5"), None);
    }

    #[test]
    fn test_text_normalizer() {
        assert_eq!(
            Normalizer::Text.apply("  \"Chicken  Parmesan\" "),
            Some(FieldValue::Text("Chicken Parmesan".into()))
        );
        assert_eq!(Normalizer::Text.apply("  "), None);
        assert_eq!(
            Normalizer::Fixed("Main Course").apply("entrees"),
            Some(FieldValue::Text("Main Course".into()))
        );
    }

    #[test]
    fn test_decode_percent_escapes() {
        assert_eq!(
            decode_percent_escapes("total%20sales%3A%2050000"),
            "total sales: 50000"
        );
        assert_eq!(decode_percent_escapes("28% food cost"), "28% food cost");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
