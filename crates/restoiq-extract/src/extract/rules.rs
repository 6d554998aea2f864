//! Ordered per-field rule cascades and the interpreter that runs them.
//!
//! Every numeric field gets the same four templates, tried in order:
//!
//! 1. `<label> is|was|of|at|... <value>`
//! 2. `<label>: <value>` / `<label> = <value>`
//! 3. `<label> <value>`
//! 4. `<value> <unit>` (money needs `$`, percentages need `%`)
//!
//! The first rule whose pattern matches decides the field. A value that
//! then fails to normalise leaves the field unset.

use once_cell::sync::Lazy;
use regex::Regex;
use restoiq_core::FieldMap;
use tracing::{debug, warn};

use super::catalog::{FieldSpec, CATEGORY_FILTERS, FIELD_SPECS, RECIPE_NAME_PATTERNS};
use super::normalize::Normalizer;

const CONNECTORS: &str = r"(?:is|was|were|are|equals?|totals?|totaled|totalled|came to|comes to|ran|runs|hit|of|at|around|about|approximately|roughly|nearly)";
/// Rules never match across a line break; rows belong to the tabular pass.
const HSPACE: &str = r"[ \t]";
const QUALIFIERS: &str = r"(?:of|at|around|about|approximately|roughly|nearly)";

/// Which form of the query a rule reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    Lower,
    Original,
}

/// One pattern with its value normaliser. Capture group 1 is the value.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Regex,
    pub normalizer: Normalizer,
    pub casing: Casing,
}

/// The ordered rule cascade for a single field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: Vec<Rule>,
}

impl FieldRules {
    pub fn is_numeric(&self) -> bool {
        self.rules.iter().all(|r| r.normalizer.is_numeric())
    }
}

/// Rule table for every extractable field, compiled once.
pub static RULE_TABLE: Lazy<Vec<FieldRules>> = Lazy::new(build_rule_table);

fn value_pattern(normalizer: Normalizer) -> &'static str {
    match normalizer {
        Normalizer::Money => r"(\$?[ \t]?\d[\d,]*(?:\.\d+)?k?)(?:[^%\w]|$)",
        Normalizer::Percent => r"(\d[\d,]*(?:\.\d+)?)[ \t]?(?:%|percent)?",
        Normalizer::Count => r"(\d[\d,]*)(?:[^%\w.]|\.(?:\D|$)|$)",
        _ => r"(\$?\d[\d,]*(?:\.\d+)?)",
    }
}

fn leading_value_pattern(normalizer: Normalizer) -> &'static str {
    match normalizer {
        Normalizer::Money => r"(\$[ \t]?\d[\d,]*(?:\.\d+)?k?)",
        Normalizer::Percent => r"\b(\d[\d,]*(?:\.\d+)?)[ \t]?(?:%|percent)",
        Normalizer::Count => r"\b(\d[\d,]*)",
        _ => r"\b(\d[\d,]*(?:\.\d+)?)",
    }
}

fn label_fragment(label: &str) -> String {
    label.replace(' ', r"[ \t_-]+")
}

fn compile(pattern: &str, field: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Skipping malformed rule for {}: {}", field, e);
            None
        }
    }
}

/// Expand a field's labels and units into its ordered rule list.
pub fn rules_for(spec: &FieldSpec) -> FieldRules {
    let value = value_pattern(spec.normalizer);
    let labels: Vec<String> = spec.labels.iter().map(|l| label_fragment(l)).collect();

    let mut patterns: Vec<String> = Vec::new();
    for label in &labels {
        patterns.push(format!(
            r"\b{label}{HSPACE}+{CONNECTORS}(?:{HSPACE}+{QUALIFIERS})?{HSPACE}+{value}"
        ));
    }
    for label in &labels {
        patterns.push(format!(r"\b{label}{HSPACE}*[:=]{HSPACE}*{value}"));
    }
    for label in &labels {
        patterns.push(format!(r"\b{label}{HSPACE}+{value}"));
    }
    let leading = leading_value_pattern(spec.normalizer);
    for unit in spec.units {
        let unit = label_fragment(unit);
        patterns.push(format!(r"{leading}{HSPACE}*{unit}\b"));
    }

    let rules = patterns
        .iter()
        .filter_map(|p| compile(p, spec.name))
        .map(|pattern| Rule {
            pattern,
            normalizer: spec.normalizer,
            casing: Casing::Lower,
        })
        .collect();
    FieldRules {
        field: spec.name,
        rules,
    }
}

fn build_rule_table() -> Vec<FieldRules> {
    let mut table: Vec<FieldRules> = FIELD_SPECS.iter().map(rules_for).collect();

    table.push(FieldRules {
        field: "recipe_name",
        rules: RECIPE_NAME_PATTERNS
            .iter()
            .filter_map(|p| compile(p, "recipe_name"))
            .map(|pattern| Rule {
                pattern,
                normalizer: Normalizer::Text,
                casing: Casing::Original,
            })
            .collect(),
    });
    table.push(FieldRules {
        field: "category_filter",
        rules: CATEGORY_FILTERS
            .iter()
            .filter_map(|(p, canonical)| {
                compile(&format!("({p})"), "category_filter").map(|pattern| Rule {
                    pattern,
                    normalizer: Normalizer::Fixed(canonical),
                    casing: Casing::Lower,
                })
            })
            .collect(),
    });
    table
}

/// Result of running the rule table over a query.
#[derive(Debug, Default)]
pub struct RuleHits {
    pub fields: FieldMap,
    /// Numeric fields set by an explicit phrase.
    pub numeric_hits: usize,
}

/// Run every field's cascade; the first matching rule per field decides it.
pub fn apply_rules(table: &[FieldRules], original: &str, lower: &str) -> RuleHits {
    let mut hits = RuleHits::default();
    for field_rules in table {
        let Some((rule, raw)) = field_rules.rules.iter().find_map(|rule| {
            let haystack = match rule.casing {
                Casing::Lower => lower,
                Casing::Original => original,
            };
            rule.pattern
                .captures(haystack)
                .and_then(|caps| caps.get(1))
                .map(|m| (rule, m.as_str()))
        }) else {
            continue;
        };

        match rule.normalizer.apply(raw) {
            Some(value) => {
                debug!("Rule hit {} = {}", field_rules.field, value);
                if hits.fields.insert_if_absent(field_rules.field, value)
                    && rule.normalizer.is_numeric()
                {
                    hits.numeric_hits += 1;
                }
            }
            None => debug!("Discarding unparseable value {:?} for {}", raw, field_rules.field),
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use restoiq_core::FieldValue;

    fn run(text: &str) -> RuleHits {
        apply_rules(&RULE_TABLE, text, &text.to_lowercase())
    }

    #[test]
    fn test_colon_form() {
        let hits = run("Total sales: $50,000, Labor cost: $15,000, Food cost: $14,000");
        assert_eq!(hits.fields.number("total_sales"), Some(50000.0));
        assert_eq!(hits.fields.number("labor_cost"), Some(15000.0));
        assert_eq!(hits.fields.number("food_cost"), Some(14000.0));
        assert_eq!(hits.numeric_hits, 3);
    }

    #[test]
    fn test_connector_form_and_k_suffix() {
        let hits = run("my labor cost was $12k and total sales were 40k");
        assert_eq!(hits.fields.number("labor_cost"), Some(12000.0));
        assert_eq!(hits.fields.number("total_sales"), Some(40000.0));
    }

    #[test]
    fn test_value_first_requires_currency() {
        let hits = run("we did $8,000 in sales with 400 hours");
        assert_eq!(hits.fields.number("total_sales"), Some(8000.0));
        assert_eq!(hits.fields.number("hours_worked"), Some(400.0));

        let hits = run("we did 8000 in sales");
        assert!(!hits.fields.contains("total_sales"));
    }

    #[test]
    fn test_money_label_skips_percent_values() {
        let hits = run("target labor cost: 28%. labor cost: $9,000");
        assert_eq!(hits.fields.number("labor_cost"), Some(9000.0));
        assert_eq!(hits.fields.number("target_labor_percent"), Some(28.0));
    }

    #[test]
    fn test_snake_case_labels() {
        let hits = run("turnover_rate=45 employee_count=20");
        assert_eq!(hits.fields.number("turnover_rate"), Some(45.0));
        assert_eq!(hits.fields.get("employee_count"), Some(&FieldValue::Integer(20)));
    }

    #[test]
    fn test_text_rules() {
        let hits = run("Cost out my Chicken Parmesan recipe, it serves 4");
        assert_eq!(hits.fields.text("recipe_name"), Some("Chicken Parmesan"));
        assert_eq!(hits.fields.get("servings"), Some(&FieldValue::Integer(4)));

        let hits = run("What are my best selling appetizers?");
        assert_eq!(hits.fields.text("category_filter"), Some("Appetizers"));
        assert_eq!(hits.numeric_hits, 0);
    }

    #[test]
    fn test_no_numbers_no_hits() {
        let hits = run("How is my restaurant doing?");
        assert!(hits.fields.is_empty());
    }
}
