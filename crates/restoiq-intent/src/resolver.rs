//! Layered intent resolution.
//!
//! Checked in fixed order, first satisfied layer wins:
//! explicit `analysis type:` override, tabular marker, field-presence
//! scoring, then no match.

use once_cell::sync::Lazy;
use regex::Regex;
use restoiq_core::{DetectedMarker, FieldMap, BUSINESS_FIELDS, GROWTH_FIELDS};
use tracing::debug;

use crate::derived::{business_metrics, growth_metrics};
use crate::guidance::Guidance;
use crate::intent::{Intent, Resolution, ResolutionLayer, ResolvedIntent};
use crate::operations::{find_operation, priority_rank, Operation, OPERATIONS};

static OVERRIDE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\banalysis[ _-]?type\s*[:=]\s*([^\n.;,!?]+)").unwrap()
});

/// Keyword-in-value table for override markers, checked in order.
pub const OVERRIDE_TABLE: &[(&[&str], (&str, &str))] = &[
    (&["best way", "sequence", "roadmap", "planning"], ("strategic", "planning_sequence")),
    (&["swot", "strength", "weakness", "opportunit", "threat"], ("strategic", "swot")),
    (&["scal"], ("recipe", "scaling")),
    (&["ingredient"], ("recipe", "ingredient_optimization")),
    (&["recipe"], ("recipe", "costing")),
    (&["growth", "expansion"], ("strategic", "growth_strategy")),
    (&["business", "goal"], ("strategic", "business_goals")),
    (&["prime"], ("kpi", "prime_cost")),
    (&["schedul"], ("hr", "labor_scheduling")),
    (&["labor", "labour"], ("kpi", "labor_cost")),
    (&["food"], ("kpi", "food_cost")),
    (&["forecast"], ("strategic", "sales_forecasting")),
    (&["sales"], ("kpi", "sales_performance")),
    (&["liquor", "bar cost"], ("beverage", "liquor_cost")),
    (&["inventory"], ("beverage", "inventory")),
    (&["drink pric", "beverage pric"], ("beverage", "pricing")),
    (&["product mix", "menu engineering"], ("menu", "product_mix")),
    (&["design", "layout"], ("menu", "design")),
    (&["pricing", "price"], ("menu", "pricing")),
    (&["menu"], ("menu", "product_mix")),
    (&["retention", "turnover"], ("hr", "staff_retention")),
    (&["performance optim"], ("kpi_dashboard", "performance_optimization")),
    (&["performance"], ("hr", "performance_management")),
    (&["operational", "operations"], ("strategic", "operational_excellence")),
    (&["comprehensive", "dashboard", "kpi"], ("kpi_dashboard", "comprehensive_analysis")),
];

/// The override value (`X` in `analysis type: X`), if present.
pub fn override_value(text: &str) -> Option<String> {
    OVERRIDE_MARKER
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

/// Map an override value onto an operation via the keyword table.
pub fn override_operation(value: &str) -> Option<&'static Operation> {
    let value = value.replace(['_', '-'], " ");
    OVERRIDE_TABLE
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| value.contains(n)))
        .and_then(|(_, (service, subtask))| find_operation(service, subtask))
}

/// Growth chosen while only business fields carry values routes to business goals.
fn reinterpret_growth(op: &'static Operation, fields: &FieldMap) -> &'static Operation {
    if op.is("strategic", "growth_strategy")
        && fields.positive_count(BUSINESS_FIELDS) > 0
        && fields.positive_count(GROWTH_FIELDS) == 0
    {
        if let Some(business) = find_operation("strategic", "business_goals") {
            debug!("Reinterpreting growth strategy as business goals");
            return business;
        }
    }
    op
}

fn derived_for(op: &Operation, fields: &FieldMap) -> FieldMap {
    if op.is("strategic", "business_goals") {
        business_metrics(fields)
    } else if op.is("strategic", "growth_strategy") {
        growth_metrics(fields)
    } else {
        FieldMap::new()
    }
}

/// Whether enough inputs are present to run `op` on an explicit override.
pub fn passes_field_check(op: &Operation, fields: &FieldMap) -> bool {
    !op.numeric || fields.positive_count(op.required) >= op.minimum.max(1)
}

/// Resolver over a static operation catalogue.
pub struct IntentResolver {
    operations: &'static [Operation],
}

impl Default for IntentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentResolver {
    pub fn new() -> Self {
        Self {
            operations: OPERATIONS,
        }
    }

    pub fn operations(&self) -> &'static [Operation] {
        self.operations
    }

    /// Resolve a query to a single operation, guidance, or no match.
    pub fn resolve(&self, text: &str, fields: &FieldMap, marker: DetectedMarker) -> Resolution {
        if let Some(resolution) = self.resolve_override(text, fields) {
            return resolution;
        }
        if let Some(resolved) = self.resolve_marker(fields, marker) {
            return Resolution::Dispatch(resolved);
        }
        if let Some(resolved) = self.resolve_scoring(text, fields) {
            return Resolution::Dispatch(resolved);
        }
        debug!("No intent matched");
        Resolution::NoMatch
    }

    fn dispatch(
        &self,
        op: &'static Operation,
        layer: ResolutionLayer,
        confidence: f64,
        fields: &FieldMap,
    ) -> ResolvedIntent {
        debug!("Resolved {} via {} (confidence {:.2})", op.key(), layer, confidence);
        ResolvedIntent {
            intent: Intent::for_operation(op, confidence),
            layer,
            params: fields.clone(),
            derived: derived_for(op, fields),
        }
    }

    fn resolve_override(&self, text: &str, fields: &FieldMap) -> Option<Resolution> {
        let value = override_value(text)?;
        let Some(op) = override_operation(&value) else {
            debug!("Override value {:?} names no known operation", value);
            return None;
        };
        let op = reinterpret_growth(op, fields);
        if !passes_field_check(op, fields) {
            debug!("Override {} lacks required fields", op.key());
            return Some(Resolution::NeedMoreData(Guidance::for_operation(op, fields)));
        }
        Some(Resolution::Dispatch(self.dispatch(
            op,
            ResolutionLayer::Override,
            1.0,
            fields,
        )))
    }

    fn resolve_marker(&self, fields: &FieldMap, marker: DetectedMarker) -> Option<ResolvedIntent> {
        let (service, subtask) = match marker {
            DetectedMarker::Business => ("strategic", "business_goals"),
            DetectedMarker::Growth => ("strategic", "growth_strategy"),
            DetectedMarker::Unset => return None,
        };
        let op = find_operation(service, subtask)?;
        Some(self.dispatch(op, ResolutionLayer::Marker, 1.0, fields))
    }

    fn resolve_scoring(&self, text: &str, fields: &FieldMap) -> Option<ResolvedIntent> {
        let lower = text.to_lowercase();
        let mut best: Option<(&'static Operation, usize)> = None;
        for op in self.operations {
            if !op.keyword_hit(&lower) {
                continue;
            }
            let count = fields.positive_count(op.required);
            if count < op.minimum {
                continue;
            }
            best = match best {
                None => Some((op, count)),
                Some((cur, cur_count)) => {
                    if count > cur_count
                        || (count == cur_count && priority_rank(op) < priority_rank(cur))
                    {
                        Some((op, count))
                    } else {
                        Some((cur, cur_count))
                    }
                }
            };
        }
        let (op, _) = best?;
        let op = reinterpret_growth(op, fields);
        let confidence = if op.required.is_empty() {
            1.0
        } else {
            fields.positive_count(op.required) as f64 / op.required.len() as f64
        };
        Some(self.dispatch(op, ResolutionLayer::Scoring, confidence, fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restoiq_core::FieldValue;

    fn fields(pairs: &[(&str, f64)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (*k, FieldValue::Number(*v)))
            .collect()
    }

    fn key_of(resolution: &Resolution) -> Option<String> {
        resolution.resolved().map(|r| r.intent.task_key())
    }

    #[test]
    fn test_override_value_parsing() {
        assert_eq!(override_value("Analysis_type: Best Way").as_deref(), Some("best way"));
        assert_eq!(
            override_value("Please help.\nanalysis type = SWOT\nthanks").as_deref(),
            Some("swot")
        );
        assert_eq!(override_value("analysistype:recipe costing").as_deref(), Some("recipe costing"));
        assert_eq!(override_value("no marker here"), None);
    }

    #[test]
    fn test_override_table_order() {
        let key = |v: &str| override_operation(v).map(|op| op.key());
        assert_eq!(key("recipe scaling").as_deref(), Some("recipe.scaling"));
        assert_eq!(key("recipe").as_deref(), Some("recipe.costing"));
        assert_eq!(key("labor scheduling").as_deref(), Some("hr.labor_scheduling"));
        assert_eq!(key("sales forecast").as_deref(), Some("strategic.sales_forecasting"));
        assert_eq!(key("strengths_and_weaknesses").as_deref(), Some("strategic.swot"));
        assert_eq!(key("something else"), None);
    }

    #[test]
    fn test_non_numeric_override_always_fires() {
        let resolver = IntentResolver::new();
        let r = resolver.resolve("Analysis_type: Best Way", &FieldMap::new(), DetectedMarker::Unset);
        let resolved = r.resolved().unwrap();
        assert_eq!(resolved.intent.task_key(), "strategic.planning_sequence");
        assert_eq!(resolved.layer, ResolutionLayer::Override);
        assert!(resolved.params.is_empty());
        assert_eq!(resolved.intent.confidence, 1.0);
    }

    #[test]
    fn test_numeric_override_without_fields_needs_more_data() {
        let resolver = IntentResolver::new();
        let f = fields(&[("revenue_target", 50000.0), ("budget_total", 20000.0)]);
        let r = resolver.resolve("analysis type: prime cost", &f, DetectedMarker::Business);
        match r {
            Resolution::NeedMoreData(g) => {
                assert_eq!(g.subtask, "prime_cost");
                assert_eq!(g.missing_fields.len(), 3);
            }
            other => panic!("expected guidance, got {:?}", other),
        }
    }

    #[test]
    fn test_override_beats_marker() {
        let resolver = IntentResolver::new();
        let f = fields(&[
            ("revenue_target", 50000.0),
            ("budget_total", 20000.0),
            ("total_sales", 50000.0),
            ("food_cost", 14000.0),
        ]);
        let r = resolver.resolve("analysis type: food cost", &f, DetectedMarker::Business);
        assert_eq!(key_of(&r).as_deref(), Some("kpi.food_cost"));
    }

    #[test]
    fn test_growth_override_reinterpreted_as_business() {
        let resolver = IntentResolver::new();
        let f = fields(&[("revenue_target", 50000.0), ("budget_total", 20000.0)]);
        let r = resolver.resolve("Analysis type: growth", &f, DetectedMarker::Unset);
        let resolved = r.resolved().unwrap();
        assert_eq!(resolved.intent.task_key(), "strategic.business_goals");
        assert_eq!(resolved.derived.number("roi_achieved"), Some(150.0));
        assert!(!resolved.params.contains("roi_achieved"));
        assert_eq!(resolved.params.len(), 2);
    }

    #[test]
    fn test_text_under_numeric_field_does_not_count() {
        let resolver = IntentResolver::new();
        let mut f = FieldMap::new();
        f.insert_if_absent("total_sales", FieldValue::Number(50000.0));
        f.insert_if_absent("labor_cost", FieldValue::Text("abc".into()));
        let op = find_operation("kpi", "labor_cost").unwrap();
        assert!(!passes_field_check(op, &f));

        let r = resolver.resolve("analyze my labor cost", &f, DetectedMarker::Unset);
        assert_ne!(key_of(&r).as_deref(), Some("kpi.labor_cost"));

        match resolver.resolve("analysis type: labor cost", &f, DetectedMarker::Unset) {
            Resolution::NeedMoreData(guidance) => {
                assert_eq!(guidance.subtask, "labor_cost");
                assert!(guidance.missing_fields.contains(&"labor_cost".to_string()));
                assert!(!guidance.missing_fields.contains(&"total_sales".to_string()));
            }
            other => panic!("expected guidance, got {:?}", other),
        }
    }

    #[test]
    fn test_marker_route_computes_derived_metrics() {
        let resolver = IntentResolver::new();
        let f = fields(&[
            ("market_size", 2_000_000.0),
            ("investment_budget", 100_000.0),
            ("projected_revenue", 150_000.0),
        ]);
        let r = resolver.resolve("", &f, DetectedMarker::Growth);
        let resolved = r.resolved().unwrap();
        assert_eq!(resolved.layer, ResolutionLayer::Marker);
        assert_eq!(resolved.intent.task_key(), "strategic.growth_strategy");
        assert_eq!(resolved.derived.number("roi_projected"), Some(50.0));
    }

    #[test]
    fn test_scoring_prefers_most_fields() {
        let resolver = IntentResolver::new();
        let f = fields(&[("total_sales", 50000.0), ("labor_cost", 15000.0), ("food_cost", 14000.0)]);
        let r = resolver.resolve(
            "analyze my prime cost. labor cost and food cost too",
            &f,
            DetectedMarker::Unset,
        );
        let resolved = r.resolved().unwrap();
        assert_eq!(resolved.intent.task_key(), "kpi.prime_cost");
        assert_eq!(resolved.layer, ResolutionLayer::Scoring);
        assert_eq!(resolved.intent.confidence, 1.0);
    }

    #[test]
    fn test_scoring_tie_break_priority() {
        let resolver = IntentResolver::new();
        let f = fields(&[("total_sales", 50000.0), ("food_cost", 14000.0)]);
        // sales_performance and food_cost both score 2.
        let r = resolver.resolve("sales analysis with food cost", &f, DetectedMarker::Unset);
        assert_eq!(key_of(&r).as_deref(), Some("kpi.sales_performance"));
    }

    #[test]
    fn test_scoring_requires_keyword_and_minimum() {
        let resolver = IntentResolver::new();
        let f = fields(&[("total_sales", 50000.0), ("labor_cost", 15000.0), ("food_cost", 14000.0)]);
        assert_eq!(resolver.resolve("how am i doing", &f, DetectedMarker::Unset), Resolution::NoMatch);

        let f = fields(&[("total_sales", 50000.0)]);
        assert_eq!(resolver.resolve("prime cost please", &f, DetectedMarker::Unset), Resolution::NoMatch);
    }

    #[test]
    fn test_scoring_partial_confidence() {
        let resolver = IntentResolver::new();
        let f = fields(&[("total_sales", 50000.0), ("labor_cost", 15000.0)]);
        let r = resolver.resolve("what is my labor cost", &f, DetectedMarker::Unset);
        let resolved = r.resolved().unwrap();
        assert_eq!(resolved.intent.task_key(), "kpi.labor_cost");
        assert!((resolved.intent.confidence - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_numeric_scoring_without_fields() {
        let resolver = IntentResolver::new();
        let r = resolver.resolve("run a swot analysis", &FieldMap::new(), DetectedMarker::Unset);
        assert_eq!(key_of(&r).as_deref(), Some("strategic.swot"));
    }
}
