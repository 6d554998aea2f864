//! Validation and response helpers shared by every handler.

use restoiq_core::{FieldMap, FieldValue, StatusCode};
use restoiq_dispatch::{TaskError, TaskRequest, TaskResult};
use serde_json::Value;
use tracing::debug;

/// Headline metrics plus short recommendation lines.
#[derive(Debug, Default)]
pub struct Analysis {
    pub data: Value,
    pub insights: Vec<String>,
}

impl Analysis {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            insights: Vec::new(),
        }
    }

    pub fn insight(mut self, line: impl Into<String>) -> Self {
        self.insights.push(line.into());
        self
    }

    pub fn insight_if(self, cond: bool, line: impl Into<String>) -> Self {
        if cond {
            self.insight(line)
        } else {
            self
        }
    }
}

/// Turn an analysis result into the handler's response.
///
/// Validation failures become a 400 envelope listing the fields involved;
/// internal failures are returned as `Err` for the dispatcher to report.
pub fn respond(req: &TaskRequest<'_>, analysis: Result<Analysis, TaskError>) -> TaskResult {
    match analysis {
        Ok(a) => Ok((req.success(a.data).with_insights(a.insights), StatusCode::OK)),
        Err(e) if e.is_validation() => {
            debug!("{}.{} rejected input: {}", req.service, req.subtask, e);
            let envelope = req.error(e.to_string()).with_missing_fields(e.fields());
            Ok((envelope, StatusCode::BAD_REQUEST))
        }
        Err(e) => Err(e),
    }
}

/// All of `fields` must be present.
pub fn require(params: &FieldMap, fields: &[&str]) -> Result<(), TaskError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|f| !params.contains(f))
        .map(|f| f.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TaskError::MissingFields(missing))
    }
}

/// At least one of `fields` must be present with a positive value.
pub fn require_any(params: &FieldMap, fields: &[&str]) -> Result<(), TaskError> {
    if params.positive_count(fields) > 0 {
        Ok(())
    } else {
        Err(TaskError::NeedsOneOf(
            fields.iter().map(|f| f.to_string()).collect(),
        ))
    }
}

/// Non-negative number for a present field. An empty placeholder counts as missing.
pub fn number(params: &FieldMap, field: &str) -> Result<f64, TaskError> {
    match params.get(field).filter(|v| !v.is_empty_placeholder()) {
        None => Err(TaskError::MissingFields(vec![field.to_string()])),
        Some(value) => checked(field, value),
    }
}

/// Like [`number`], but a missing field yields `default`.
pub fn number_or(params: &FieldMap, field: &str, default: f64) -> Result<f64, TaskError> {
    match params.get(field).filter(|v| !v.is_empty_placeholder()) {
        None => Ok(default),
        Some(value) => checked(field, value),
    }
}

fn checked(field: &str, value: &FieldValue) -> Result<f64, TaskError> {
    let n = value
        .as_f64()
        .ok_or_else(|| TaskError::invalid(field, "must be a valid number"))?;
    if !n.is_finite() {
        return Err(TaskError::invalid(field, "must be a valid number"));
    }
    if n < 0.0 {
        return Err(TaskError::invalid(field, "must be >= 0"));
    }
    Ok(n)
}

/// Number that must also be strictly positive (used as a divisor).
pub fn positive(params: &FieldMap, field: &str) -> Result<f64, TaskError> {
    let n = number(params, field)?;
    if n <= 0.0 {
        return Err(TaskError::invalid(field, "must be greater than 0"));
    }
    Ok(n)
}

pub fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Rating for a metric where lower is better, given excellent/good/acceptable ceilings.
pub fn rate_at_most(value: f64, bands: [f64; 3]) -> &'static str {
    if value <= bands[0] {
        "Excellent"
    } else if value <= bands[1] {
        "Good"
    } else if value <= bands[2] {
        "Acceptable"
    } else {
        "Needs Improvement"
    }
}

/// Rating for a metric where higher is better.
pub fn rate_at_least(value: f64, bands: [f64; 3]) -> &'static str {
    if value >= bands[0] {
        "Excellent"
    } else if value >= bands[1] {
        "Good"
    } else if value >= bands[2] {
        "Acceptable"
    } else {
        "Needs Improvement"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FieldMap {
        let mut p = FieldMap::new();
        p.insert_if_absent("total_sales", FieldValue::Number(50000.0));
        p.insert_if_absent("labor_cost", FieldValue::Number(-5.0));
        p.insert_if_absent("recipe_name", FieldValue::Text("Tacos".into()));
        p.insert_if_absent("budget_total", FieldValue::Text(String::new()));
        p
    }

    #[test]
    fn test_require() {
        let p = params();
        assert!(require(&p, &["total_sales"]).is_ok());
        assert_eq!(
            require(&p, &["total_sales", "food_cost", "hours_worked"]),
            Err(TaskError::MissingFields(vec!["food_cost".into(), "hours_worked".into()]))
        );
    }

    #[test]
    fn test_require_any_ignores_empty_placeholders() {
        let p = params();
        assert!(require_any(&p, &["total_sales", "covers"]).is_ok());
        assert!(matches!(
            require_any(&p, &["budget_total", "revenue_target"]),
            Err(TaskError::NeedsOneOf(_))
        ));
    }

    #[test]
    fn test_number_validation() {
        let p = params();
        assert_eq!(number(&p, "total_sales"), Ok(50000.0));
        assert_eq!(number_or(&p, "covers", 7.0), Ok(7.0));
        assert!(matches!(number(&p, "labor_cost"), Err(TaskError::InvalidValue { .. })));
        assert!(matches!(number(&p, "recipe_name"), Err(TaskError::InvalidValue { .. })));
        assert!(matches!(number(&p, "food_cost"), Err(TaskError::MissingFields(_))));
        assert!(matches!(number(&p, "budget_total"), Err(TaskError::MissingFields(_))));
        assert_eq!(number_or(&p, "budget_total", 1.0), Ok(1.0));
        assert!(positive(&p, "total_sales").is_ok());
    }

    #[test]
    fn test_ratings() {
        assert_eq!(rate_at_most(24.0, [25.0, 30.0, 35.0]), "Excellent");
        assert_eq!(rate_at_most(30.0, [25.0, 30.0, 35.0]), "Good");
        assert_eq!(rate_at_most(36.0, [25.0, 30.0, 35.0]), "Needs Improvement");
        assert_eq!(rate_at_least(65.0, [80.0, 60.0, 40.0]), "Good");
        assert_eq!(ratio_percent(15.0, 0.0), 0.0);
        assert_eq!(round1(29.96), 30.0);
        assert_eq!(round2(12.345678), 12.35);
    }
}
