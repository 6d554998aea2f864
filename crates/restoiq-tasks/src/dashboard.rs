//! KPI dashboard roll-ups.

use restoiq_core::{DefaultTargets, FieldMap};
use restoiq_dispatch::{TaskError, TaskRequest, TaskResult};
use serde_json::{json, Map, Value};

use crate::common::{
    number_or, rate_at_most, ratio_percent, require_any, respond, round1, round2, Analysis,
};

const DASHBOARD_FIELDS: &[&str] = &["total_sales", "labor_cost", "food_cost", "prime_cost"];
const OPTIMIZATION_FIELDS: &[&str] = &[
    "current_performance",
    "target_performance",
    "optimization_potential",
    "efficiency_score",
];

pub fn comprehensive_analysis(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_dashboard(req.params, &req.context.targets))
}

pub fn performance_optimization(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_optimization(req.params))
}

fn analyze_dashboard(params: &FieldMap, targets: &DefaultTargets) -> Result<Analysis, TaskError> {
    require_any(params, DASHBOARD_FIELDS)?;
    let sales = number_or(params, "total_sales", 0.0)?;
    let labor = number_or(params, "labor_cost", 0.0)?;
    let food = number_or(params, "food_cost", 0.0)?;
    let prime = match number_or(params, "prime_cost", 0.0)? {
        p if p > 0.0 => p,
        _ => labor + food,
    };

    let mut kpis = Map::new();
    let mut insights = Vec::new();
    if sales > 0.0 {
        let rows = [
            ("labor_percent", labor, targets.target_labor_percent, [25.0, 30.0, 35.0]),
            ("food_percent", food, targets.target_food_percent, [28.0, 32.0, 38.0]),
            ("prime_percent", prime, targets.target_prime_percent, [55.0, 60.0, 65.0]),
        ];
        for (name, cost, target, bands) in rows {
            if cost <= 0.0 {
                continue;
            }
            let pct = ratio_percent(cost, sales);
            kpis.insert(
                name.to_string(),
                json!({"value": round1(pct), "target": target, "rating": rate_at_most(pct, bands)}),
            );
            if pct > target {
                insights.push(format!("{} of {:.1}% is above the {}% target", name, pct, target));
            }
        }
        let hours = number_or(params, "hours_worked", 0.0)?;
        if hours > 0.0 {
            kpis.insert("sales_per_labor_hour".into(), json!(round2(sales / hours)));
        }
        let covers = number_or(params, "covers", 0.0)?;
        if covers > 0.0 {
            kpis.insert("average_check".into(), json!(round2(sales / covers)));
        }
        let previous = number_or(params, "previous_sales", 0.0)?;
        if previous > 0.0 {
            kpis.insert("sales_growth".into(), json!(round1(ratio_percent(sales - previous, previous))));
        }
    } else {
        insights.push("Add total sales to turn costs into percentages".to_string());
    }

    let analysis = Analysis::new(json!({
        "kpis": Value::Object(kpis),
        "prime_cost": round2(prime),
    }));
    Ok(insights.into_iter().fold(analysis, Analysis::insight))
}

fn analyze_optimization(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, OPTIMIZATION_FIELDS)?;
    let current = number_or(params, "current_performance", 0.0)?;
    let target = number_or(params, "target_performance", 0.0)?;
    let potential = number_or(params, "optimization_potential", 0.0)?;

    let gap = (target - current).max(0.0);
    // Monthly improvement of 10% of target.
    let months_to_target = if gap > 0.0 && target > 0.0 {
        (gap / (target * 0.10)).ceil()
    } else {
        0.0
    };
    let data = json!({
        "performance_gap": round1(gap),
        "gap_percent": round1(ratio_percent(gap, target)),
        "optimization_potential": potential,
        "estimated_months_to_target": months_to_target,
    });
    Ok(Analysis::new(data)
        .insight_if(gap > 0.0, format!("Close a {:.1}-point gap with weekly progress checks", gap))
        .insight_if(gap == 0.0 && current > 0.0, "At or above target; raise the bar"))
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
    fn test_dashboard_rollup() {
        let a = analyze_dashboard(
            &map(&[("total_sales", 50000.0), ("labor_cost", 17000.0), ("food_cost", 14000.0)]),
            &DefaultTargets::default(),
        )
        .unwrap();
        assert_eq!(a.data["kpis"]["labor_percent"]["value"], 34.0);
        assert_eq!(a.data["kpis"]["prime_percent"]["value"], 62.0);
        assert_eq!(a.data["prime_cost"], 31000.0);
        assert_eq!(a.insights.len(), 2);
    }

    #[test]
    fn test_dashboard_without_sales() {
        let a = analyze_dashboard(&map(&[("labor_cost", 1000.0)]), &DefaultTargets::default()).unwrap();
        assert!(a.data["kpis"].as_object().unwrap().is_empty());
        assert_eq!(a.insights.len(), 1);
    }

    #[test]
    fn test_optimization_gap() {
        let a = analyze_optimization(&map(&[("current_performance", 72.0), ("target_performance", 85.0)])).unwrap();
        assert_eq!(a.data["performance_gap"], 13.0);
        assert_eq!(a.data["estimated_months_to_target"], 2.0);
    }
}
