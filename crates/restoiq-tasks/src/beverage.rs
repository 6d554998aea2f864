//! Bar analyses: liquor variance, inventory and drink pricing.

use restoiq_core::FieldMap;
use restoiq_dispatch::{TaskError, TaskRequest, TaskResult};
use serde_json::json;

use crate::common::{number_or, ratio_percent, require_any, respond, round1, round2, Analysis};

const LIQUOR_FIELDS: &[&str] = &["expected_oz", "actual_oz", "liquor_cost"];
const INVENTORY_FIELDS: &[&str] = &["current_stock", "reorder_point", "monthly_usage", "inventory_value"];
const PRICING_FIELDS: &[&str] = &["drink_price", "cost_per_drink", "sales_volume", "competitor_price"];

/// Acceptable pour variance, in percent either way.
const VARIANCE_TOLERANCE: f64 = 5.0;
const TARGET_LIQUOR_PERCENT: f64 = 20.0;
const TARGET_DRINK_MARGIN: f64 = 75.0;
const CARRYING_COST_PERCENT: f64 = 25.0;

pub fn liquor_cost(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_liquor_cost(req.params))
}

pub fn inventory(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_inventory(req.params))
}

pub fn pricing(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_pricing(req.params))
}

fn analyze_liquor_cost(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, LIQUOR_FIELDS)?;
    let expected = number_or(params, "expected_oz", 0.0)?;
    let actual = number_or(params, "actual_oz", 0.0)?;
    let cost = number_or(params, "liquor_cost", 0.0)?;
    let sales = number_or(params, "total_sales", 0.0)?;

    let variance_oz = actual - expected;
    let variance_percent = ratio_percent(variance_oz, expected);
    let cost_per_oz = if actual > 0.0 { cost / actual } else { 0.0 };
    let mut data = json!({
        "variance_oz": round1(variance_oz),
        "variance_percent": round1(variance_percent),
        "cost_per_oz": round2(cost_per_oz),
        "waste_cost": round2(variance_oz.max(0.0) * cost_per_oz),
        "within_tolerance": variance_percent.abs() <= VARIANCE_TOLERANCE,
    });
    let mut cost_percent = None;
    if sales > 0.0 && cost > 0.0 {
        let pct = ratio_percent(cost, sales);
        data["liquor_cost_percent"] = json!(round1(pct));
        cost_percent = Some(pct);
    }

    Ok(Analysis::new(data)
        .insight_if(
            variance_percent > VARIANCE_TOLERANCE,
            format!("Pours run {:.1}% over expected; check jiggers and comps", variance_percent),
        )
        .insight_if(
            cost_percent.map_or(false, |p| p > TARGET_LIQUOR_PERCENT),
            format!("Liquor cost is above the {}% target", TARGET_LIQUOR_PERCENT),
        ))
}

fn analyze_inventory(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, INVENTORY_FIELDS)?;
    let stock = number_or(params, "current_stock", 0.0)?;
    let reorder = number_or(params, "reorder_point", 0.0)?;
    let usage = number_or(params, "monthly_usage", 0.0)?;
    let value = number_or(params, "inventory_value", 0.0)?;

    let days_of_stock = if usage > 0.0 { stock / usage * 30.0 } else { 0.0 };
    let annual_turnover = if stock > 0.0 { usage * 12.0 / stock } else { 0.0 };
    let needs_reorder = reorder > 0.0 && stock <= reorder;
    let data = json!({
        "days_of_stock": round1(days_of_stock),
        "annual_turnover": round1(annual_turnover),
        "needs_reorder": needs_reorder,
        "annual_carrying_cost": round2(value * CARRYING_COST_PERCENT / 100.0),
    });

    Ok(Analysis::new(data)
        .insight_if(needs_reorder, "Stock is at or below the reorder point; place an order")
        .insight_if(
            days_of_stock > 60.0,
            format!("{:.0} days on hand ties up cash; lower par levels", days_of_stock),
        ))
}

fn analyze_pricing(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, PRICING_FIELDS)?;
    let price = number_or(params, "drink_price", 0.0)?;
    let cost = number_or(params, "cost_per_drink", 0.0)?;
    let volume = number_or(params, "sales_volume", 0.0)?;
    let competitor = number_or(params, "competitor_price", 0.0)?;

    let margin = ratio_percent(price - cost, price);
    let optimal_price = cost / (1.0 - TARGET_DRINK_MARGIN / 100.0);
    let mut data = json!({
        "current_margin": round1(margin),
        "optimal_price": round2(optimal_price),
        "target_margin": TARGET_DRINK_MARGIN,
    });
    if competitor > 0.0 && price > 0.0 {
        data["vs_competitor_percent"] = json!(round1(ratio_percent(price - competitor, competitor)));
    }
    if volume > 0.0 {
        data["period_profit"] = json!(round2((price - cost) * volume));
    }

    Ok(Analysis::new(data)
        .insight_if(
            price > 0.0 && margin < TARGET_DRINK_MARGIN,
            format!("Margin of {:.1}% is under target; consider ${:.2}", margin, optimal_price),
        )
        .insight_if(
            competitor > 0.0 && price > competitor * 1.15,
            "Priced well above competitors; make sure the experience supports it",
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use restoiq_core::FieldValue;

    fn map(pairs: &[(&str, f64)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (*k, FieldValue::Number(*v)))
            .collect()
    }

    #[test]
    fn test_liquor_variance() {
        let a = analyze_liquor_cost(&map(&[("expected_oz", 1000.0), ("actual_oz", 1080.0)])).unwrap();
        assert_eq!(a.data["variance_oz"], 80.0);
        assert_eq!(a.data["variance_percent"], 8.0);
        assert_eq!(a.data["within_tolerance"], false);
        assert_eq!(a.insights.len(), 1);
    }

    #[test]
    fn test_inventory_needs_a_metric() {
        let err = analyze_inventory(&FieldMap::new()).unwrap_err();
        assert_eq!(err.fields().len(), 4);
        let a = analyze_inventory(&map(&[("current_stock", 30.0), ("reorder_point", 40.0), ("monthly_usage", 300.0)]))
            .unwrap();
        assert_eq!(a.data["days_of_stock"], 3.0);
        assert_eq!(a.data["needs_reorder"], true);
    }

    #[test]
    fn test_drink_pricing() {
        let a = analyze_pricing(&map(&[("drink_price", 12.0), ("cost_per_drink", 2.5), ("competitor_price", 13.0)]))
            .unwrap();
        assert_eq!(a.data["optimal_price"], 10.0);
        assert_eq!(a.data["current_margin"], 79.2);
        assert!(a.insights.is_empty());
    }
}
