//! Field extraction: explicit phrases first, then a tabular block, then
//! positional bare numbers.
//!
//! Precedence is strict. Tabular values only fill fields the phrase rules
//! left unset, and the positional pass runs only when neither of the first
//! two produced a numeric field.

pub mod catalog;
pub mod normalize;
pub mod positional;
pub mod rules;
pub mod tabular;

use restoiq_core::config::DEFAULT_MAX_QUERY_LEN;
use restoiq_core::{DetectedMarker, FieldMap};
use serde::Serialize;
use tracing::debug;

use self::normalize::{decode_percent_escapes, truncate_chars};
use self::rules::{apply_rules, FieldRules, RULE_TABLE};

/// Which pass contributed fields to an extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub phrase_fields: usize,
    pub tabular_fields: usize,
    pub positional_fields: usize,
}

/// Output of a single extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    /// The query after percent-decoding and truncation. Later stages read
    /// this rather than the raw input.
    pub text: String,
    pub fields: FieldMap,
    pub marker: DetectedMarker,
    pub passes: PassSummary,
}

/// Extractor bound to a rule table and a query length cap.
pub struct FieldExtractor {
    rules: &'static [FieldRules],
    max_query_len: usize,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_QUERY_LEN)
    }
}

impl FieldExtractor {
    pub fn new(max_query_len: usize) -> Self {
        Self {
            rules: RULE_TABLE.as_slice(),
            max_query_len,
        }
    }

    /// Extract canonical fields from a free-form query. Never fails.
    pub fn extract(&self, query: &str) -> Extraction {
        let decoded = decode_percent_escapes(query);
        let text = truncate_chars(&decoded, self.max_query_len);
        let lower = text.to_lowercase();

        let hits = apply_rules(self.rules, text, &lower);
        let mut fields = hits.fields;
        let mut passes = PassSummary {
            phrase_fields: fields.len(),
            ..PassSummary::default()
        };

        let mut marker = DetectedMarker::Unset;
        let mut tabular_numeric = false;
        if let Some(block) = tabular::detect_tabular_block(text) {
            marker = block.marker;
            tabular_numeric = block.has_numeric_value();
            passes.tabular_fields = fields.merge_absent(block.fields);
        }

        if hits.numeric_hits == 0 && !tabular_numeric {
            passes.positional_fields = fields.merge_absent(positional::assign_positional(&lower));
        }

        debug!(
            "Extracted {} fields (phrase {}, tabular {}, positional {}), marker {}",
            fields.len(),
            passes.phrase_fields,
            passes.tabular_fields,
            passes.positional_fields,
            marker
        );
        Extraction {
            text: text.to_string(),
            fields,
            marker,
            passes,
        }
    }
}

/// Extract with the default query length cap.
pub fn extract_fields(query: &str) -> Extraction {
    FieldExtractor::default().extract(query)
}
