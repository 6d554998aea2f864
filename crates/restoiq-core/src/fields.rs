//! Extracted field values and the insertion-ordered field map.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Canonical field vocabulary shared by every analysis domain.
pub const CANONICAL_FIELDS: &[&str] = &[
    // KPI
    "total_sales",
    "labor_cost",
    "food_cost",
    "hours_worked",
    "hourly_rate",
    "previous_sales",
    "prime_cost",
    "overtime_hours",
    "covers",
    "avg_check",
    "waste_cost",
    "target_labor_percent",
    "target_food_percent",
    "target_prime_percent",
    // HR
    "turnover_rate",
    "industry_average",
    "employee_count",
    "customer_satisfaction",
    "sales_performance",
    "efficiency_score",
    "attendance_rate",
    // Beverage
    "expected_oz",
    "actual_oz",
    "liquor_cost",
    "current_stock",
    "reorder_point",
    "monthly_usage",
    "inventory_value",
    "drink_price",
    "cost_per_drink",
    "sales_volume",
    "competitor_price",
    // Menu
    "item_sales",
    "item_cost",
    "item_profit",
    "item_price",
    "menu_items",
    "high_profit_items",
    "sales_distribution",
    "visual_hierarchy",
    "category_filter",
    "target_food_cost",
    // Recipe
    "recipe_name",
    "servings",
    "ingredient_cost",
    "portion_cost",
    "recipe_price",
    "current_cost",
    "supplier_cost",
    "waste_percentage",
    "quality_score",
    "current_batch",
    "target_batch",
    "yield_percentage",
    "consistency_score",
    // Strategic
    "historical_sales",
    "current_sales",
    "growth_rate",
    "seasonal_factor",
    "market_size",
    "market_share",
    "competition_level",
    "investment_budget",
    "expansion_cost",
    "projected_revenue",
    "process_time",
    "quality_rating",
    "revenue_target",
    "budget_total",
    "marketing_spend",
    "staffing_cost",
    "timeline_months",
    // Dashboard
    "current_performance",
    "target_performance",
    "optimization_potential",
];

/// Business-goal field set, scored against [`GROWTH_FIELDS`].
pub const BUSINESS_FIELDS: &[&str] = &[
    "revenue_target",
    "budget_total",
    "marketing_spend",
    "staffing_cost",
    "timeline_months",
];

/// Growth-strategy field set. Disjoint from [`BUSINESS_FIELDS`].
pub const GROWTH_FIELDS: &[&str] = &[
    "market_size",
    "market_share",
    "competition_level",
    "investment_budget",
    "expansion_cost",
    "projected_revenue",
];

/// Whether `name` belongs to the canonical vocabulary.
pub fn is_canonical(name: &str) -> bool {
    CANONICAL_FIELDS.contains(&name)
}

/// A typed value produced by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value; text never converts.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(i) => Some(*i as f64),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Strictly positive number. Text is never positive.
    pub fn is_positive(&self) -> bool {
        match self {
            Self::Number(n) => *n > 0.0,
            Self::Integer(i) => *i > 0,
            Self::Text(_) => false,
        }
    }

    /// Positive number, or text with something other than whitespace.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(s) => !s.trim().is_empty(),
            _ => self.is_positive(),
        }
    }

    /// True for the placeholder recorded when a header had no usable value.
    pub fn is_empty_placeholder(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Analysis-type marker set by the tabular block detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedMarker {
    #[default]
    Unset,
    /// Business-goal fields dominate the detected row.
    Business,
    /// Growth-strategy fields dominate the detected row.
    Growth,
}

impl DetectedMarker {
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl std::fmt::Display for DetectedMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, "<none>"),
            Self::Business => write!(f, "business"),
            Self::Growth => write!(f, "growth"),
        }
    }
}

/// Insertion-ordered mapping of canonical field name to value.
///
/// The first value written for a name wins; later writes for the same name
/// are ignored so that higher-precedence rules are never overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the name is already present. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: FieldValue) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value));
        true
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Numeric value for `name`, if present and numeric.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Present with a strictly positive numeric value.
    pub fn is_positive(&self, name: &str) -> bool {
        self.get(name).map(FieldValue::is_positive).unwrap_or(false)
    }

    /// Present with a positive number or non-blank text.
    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).map(FieldValue::is_present).unwrap_or(false)
    }

    /// How many of `names` are present and positive.
    pub fn positive_count(&self, names: &[&str]) -> usize {
        names.iter().filter(|n| self.is_positive(n)).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge `other` into `self`, keeping existing values on conflict.
    pub fn merge_absent(&mut self, other: FieldMap) -> usize {
        let mut added = 0;
        for (name, value) in other.entries {
            if self.insert_if_absent(name, value) {
                added += 1;
            }
        }
        added
    }

    /// Plain key → value JSON object, as handed to handlers.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert_if_absent(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_wins() {
        let mut map = FieldMap::new();
        assert!(map.insert_if_absent("total_sales", FieldValue::Number(50000.0)));
        assert!(!map.insert_if_absent("total_sales", FieldValue::Number(1.0)));
        assert_eq!(map.number("total_sales"), Some(50000.0));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let map: FieldMap = vec![
            ("labor_cost", FieldValue::Number(1.0)),
            ("total_sales", FieldValue::Number(2.0)),
            ("recipe_name", FieldValue::Text("Tacos".into())),
        ]
        .into_iter()
        .collect();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["labor_cost", "total_sales", "recipe_name"]);

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"labor_cost":1.0,"total_sales":2.0,"recipe_name":"Tacos"}"#);
    }

    #[test]
    fn test_positive_checks() {
        let mut map = FieldMap::new();
        map.insert_if_absent("budget_total", FieldValue::Text(String::new()));
        map.insert_if_absent("revenue_target", FieldValue::Number(0.0));
        map.insert_if_absent("servings", FieldValue::Integer(4));
        assert!(!map.is_positive("budget_total"));
        assert!(map.get("budget_total").unwrap().is_empty_placeholder());
        assert!(!map.is_positive("revenue_target"));
        assert!(map.is_positive("servings"));
        assert!(!map.is_positive("missing"));
        assert_eq!(
            map.positive_count(&["budget_total", "revenue_target", "servings"]),
            1
        );
    }

    #[test]
    fn test_text_is_present_but_never_positive() {
        let mut map = FieldMap::new();
        map.insert_if_absent("labor_cost", FieldValue::Text("abc".into()));
        map.insert_if_absent("category_filter", FieldValue::Text("Desserts".into()));
        map.insert_if_absent("recipe_name", FieldValue::Text("  ".into()));
        map.insert_if_absent("total_sales", FieldValue::Number(50000.0));

        assert!(!map.is_positive("labor_cost"));
        assert!(!map.is_positive("category_filter"));
        assert!(map.is_present("category_filter"));
        assert!(!map.is_present("recipe_name"));
        assert!(map.is_present("total_sales"));
        assert_eq!(map.positive_count(&["labor_cost", "total_sales"]), 1);
    }

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let mut names: Vec<&str> = CANONICAL_FIELDS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CANONICAL_FIELDS.len());
        assert!(is_canonical("market_share"));
        assert!(!is_canonical("marketshare"));
        for name in BUSINESS_FIELDS.iter().chain(GROWTH_FIELDS) {
            assert!(is_canonical(name));
        }
        assert!(!BUSINESS_FIELDS.iter().any(|f| GROWTH_FIELDS.contains(f)));
    }

    #[test]
    fn test_marker_display() {
        assert_eq!(DetectedMarker::Business.to_string(), "business");
        assert_eq!(DetectedMarker::Unset.to_string(), "<none>");
        assert!(!DetectedMarker::Unset.is_set());
    }
}
