//! Recipe costing, scaling and ingredient sourcing.

use restoiq_core::FieldMap;
use restoiq_dispatch::{TaskError, TaskRequest, TaskResult};
use serde_json::json;

use crate::common::{number_or, ratio_percent, require_any, respond, round1, round2, Analysis};

const COSTING_FIELDS: &[&str] = &["ingredient_cost", "portion_cost", "recipe_price", "total_cost"];
const SCALING_FIELDS: &[&str] = &["current_batch", "target_batch", "yield_percentage", "consistency_score"];
const SOURCING_FIELDS: &[&str] = &["current_cost", "supplier_cost", "waste_percentage", "quality_score"];

const TARGET_PLATE_MARGIN: f64 = 70.0;

pub fn costing(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_costing(req.params))
}

pub fn scaling(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_scaling(req.params))
}

pub fn ingredient_optimization(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_sourcing(req.params))
}

fn analyze_costing(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, COSTING_FIELDS)?;
    let ingredient_cost = number_or(params, "ingredient_cost", 0.0)?;
    let servings = number_or(params, "servings", 1.0)?.max(1.0);
    let price = number_or(params, "recipe_price", 0.0)?;
    let portion_cost = match number_or(params, "portion_cost", 0.0)? {
        p if p > 0.0 => p,
        _ => ingredient_cost / servings,
    };

    let mut data = json!({
        "recipe_name": params.text("recipe_name"),
        "servings": servings,
        "cost_per_portion": round2(portion_cost),
        "suggested_price": round2(portion_cost / (1.0 - TARGET_PLATE_MARGIN / 100.0)),
    });
    let mut margin = None;
    if price > 0.0 && portion_cost > 0.0 {
        let m = ratio_percent(price - portion_cost, price);
        data["profit_margin"] = json!(round1(m));
        data["food_cost_percent"] = json!(round1(ratio_percent(portion_cost, price)));
        margin = Some(m);
    }

    Ok(Analysis::new(data).insight_if(
        margin.map_or(false, |m| m < TARGET_PLATE_MARGIN),
        format!("Plate margin is under {}%; re-cost garnish and portion sizes", TARGET_PLATE_MARGIN),
    ))
}

fn analyze_scaling(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, SCALING_FIELDS)?;
    let current = number_or(params, "current_batch", 0.0)?;
    let target = number_or(params, "target_batch", 0.0)?;
    let yield_pct = number_or(params, "yield_percentage", 100.0)?;
    let consistency = number_or(params, "consistency_score", 8.0)?;
    if yield_pct > 100.0 {
        return Err(TaskError::invalid("yield_percentage", "must be between 0 and 100"));
    }

    let ratio = if current > 0.0 && target > 0.0 { target / current } else { 1.0 };
    let data = json!({
        "scaling_ratio": round2(ratio),
        "batch_difference": round1(target - current),
        // Raw batch needed to land the target after yield loss.
        "adjusted_batch": round1(if yield_pct > 0.0 { target / (yield_pct / 100.0) } else { target }),
        "yield_percentage": yield_pct,
        "consistency_score": consistency,
    });

    Ok(Analysis::new(data)
        .insight_if(ratio >= 3.0, "Scale in steps above 3x; spices and leaveners do not scale linearly")
        .insight_if(yield_pct < 85.0, "Yield under 85%; check trim loss and cooking shrink"))
}

fn analyze_sourcing(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, SOURCING_FIELDS)?;
    let current = number_or(params, "current_cost", 0.0)?;
    let supplier = number_or(params, "supplier_cost", 0.0)?;
    let waste = number_or(params, "waste_percentage", 0.0)?;
    let quality = number_or(params, "quality_score", 0.0)?;

    let savings = if supplier > 0.0 { current - supplier } else { 0.0 };
    let data = json!({
        "cost_savings": round2(savings),
        "savings_percent": round1(ratio_percent(savings, current)),
        "waste_cost": round2(waste / 100.0 * current),
        "effective_cost": round2(current * (1.0 - waste / 100.0)),
        "quality_score": quality,
    });

    Ok(Analysis::new(data)
        .insight_if(savings > 0.0, format!("Switching supplier saves ${:.2} per unit", savings))
        .insight_if(waste > 10.0, "Waste above 10%; review storage and FIFO rotation"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use restoiq_core::FieldValue;

    #[test]
    fn test_costing_from_ingredients() {
        let params: FieldMap = vec![
            ("recipe_name", FieldValue::Text("Chicken Parmesan".into())),
            ("ingredient_cost", FieldValue::Number(24.0)),
            ("servings", FieldValue::Integer(6)),
            ("recipe_price", FieldValue::Number(18.0)),
        ]
        .into_iter()
        .collect();
        let a = analyze_costing(&params).unwrap();
        assert_eq!(a.data["cost_per_portion"], 4.0);
        assert_eq!(a.data["recipe_name"], "Chicken Parmesan");
        assert_eq!(a.data["profit_margin"], 77.8);
        assert!(a.insights.is_empty());
    }

    #[test]
    fn test_scaling_ratio() {
        let params: FieldMap = vec![
            ("current_batch", FieldValue::Number(10.0)),
            ("target_batch", FieldValue::Number(25.0)),
        ]
        .into_iter()
        .collect();
        let a = analyze_scaling(&params).unwrap();
        assert_eq!(a.data["scaling_ratio"], 2.5);
        assert_eq!(a.data["adjusted_batch"], 25.0);
    }

    #[test]
    fn test_sourcing_requires_metric() {
        assert!(analyze_sourcing(&FieldMap::new()).is_err());
        let params: FieldMap = vec![
            ("current_cost", FieldValue::Number(4.2)),
            ("supplier_cost", FieldValue::Number(3.8)),
            ("waste_percentage", FieldValue::Number(8.0)),
        ]
        .into_iter()
        .collect();
        let a = analyze_sourcing(&params).unwrap();
        assert_eq!(a.data["cost_savings"], 0.4);
        assert_eq!(a.insights.len(), 1);
    }
}
