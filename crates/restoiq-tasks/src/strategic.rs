//! Strategic planning analyses.

use restoiq_core::{FieldMap, BUSINESS_FIELDS, GROWTH_FIELDS};
use restoiq_dispatch::{TaskError, TaskRequest, TaskResult};
use restoiq_intent::derived::{business_metrics, growth_metrics};
use serde_json::{json, Value};

use crate::common::{
    number_or, rate_at_least, ratio_percent, require_any, respond, round1, round2, Analysis,
};

const FORECAST_FIELDS: &[&str] = &["historical_sales", "current_sales", "growth_rate"];
const GROWTH_REQUIRED: &[&str] = &["market_size", "market_share", "competition_level", "investment_budget"];
const BUSINESS_REQUIRED: &[&str] = &["revenue_target", "budget_total", "marketing_spend", "staffing_cost"];
const OPERATIONAL_FIELDS: &[&str] = &["efficiency_score", "process_time", "quality_rating", "customer_satisfaction"];

/// Ordered planning steps with the inputs that unlock each one.
const PLANNING_STEPS: &[(&str, &str, &[&str])] = &[
    ("Know your numbers", "kpi.prime_cost", &["total_sales", "labor_cost", "food_cost"]),
    ("Fix the menu", "menu.product_mix", &["item_sales", "item_cost", "item_price"]),
    ("Right-size labor", "hr.labor_scheduling", &["hourly_rate", "hours_worked"]),
    ("Keep your team", "hr.staff_retention", &["turnover_rate"]),
    ("Set business goals", "strategic.business_goals", &["revenue_target", "budget_total"]),
    ("Plan growth", "strategic.growth_strategy", &["market_size", "investment_budget"]),
];

/// `(field, higher_is_better, threshold, label)` checks used to sort SWOT signals.
const SWOT_SIGNALS: &[(&str, bool, f64, &str)] = &[
    ("customer_satisfaction", true, 85.0, "guest satisfaction"),
    ("efficiency_score", true, 80.0, "operational efficiency"),
    ("turnover_rate", false, 70.0, "staff turnover"),
    ("growth_rate", true, 3.0, "sales growth"),
    ("market_share", true, 10.0, "market share"),
    ("competition_level", false, 6.0, "competitive pressure"),
];

pub fn sales_forecasting(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_forecast(req.params))
}

pub fn growth_strategy(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_growth(req.params))
}

pub fn operational_excellence(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_operations(req.params))
}

pub fn business_goals(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_business_goals(req.params))
}

pub fn planning_sequence(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, Ok(plan_sequence(req.params)))
}

pub fn swot(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, Ok(swot_analysis(req.params)))
}

fn analyze_forecast(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, FORECAST_FIELDS)?;
    let historical = number_or(params, "historical_sales", 0.0)?;
    let current = number_or(params, "current_sales", historical)?;
    let seasonal = number_or(params, "seasonal_factor", 1.0)?;
    let growth = match number_or(params, "growth_rate", 0.0)? {
        g if g > 0.0 => g,
        _ if historical > 0.0 && current > 0.0 => ratio_percent(current - historical, historical),
        _ => 0.0,
    };

    let projected = current * (1.0 + growth / 100.0) * seasonal;
    let data = json!({
        "growth_rate": round1(growth),
        "projected_sales": round2(projected),
        "projected_change": round2(projected - current),
        "seasonal_factor": seasonal,
    });
    Ok(Analysis::new(data)
        .insight_if(current <= 0.0, "Add current sales to anchor the projection")
        .insight_if(
            (seasonal - 1.0).abs() > 0.15,
            "Strong seasonality; staff and order against the adjusted forecast",
        ))
}

fn analyze_growth(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, GROWTH_REQUIRED)?;
    let market_size = number_or(params, "market_size", 0.0)?;
    let market_share = number_or(params, "market_share", 0.0)?;
    let competition = number_or(params, "competition_level", 5.0)?;
    if market_share > 100.0 {
        return Err(TaskError::invalid("market_share", "must be between 0 and 100"));
    }

    let opportunity = market_size * (100.0 - market_share) / 100.0;
    let mut data = json!({
        "market_opportunity": round2(opportunity),
        "current_market_revenue": round2(market_size * market_share / 100.0),
        "competitive_position": rate_at_least(10.0 - competition, [7.0, 5.0, 3.0]),
    });
    merge_metrics(&mut data, growth_metrics(params));

    let roi = data.get("roi_projected").and_then(Value::as_f64);
    Ok(Analysis::new(data)
        .insight_if(
            roi.map_or(false, |r| r < 20.0),
            "Projected ROI under 20%; stage the investment",
        )
        .insight_if(competition >= 8.0, "Crowded market; differentiate before expanding"))
}

fn analyze_operations(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, OPERATIONAL_FIELDS)?;
    let efficiency = number_or(params, "efficiency_score", 0.0)?;
    let process_time = number_or(params, "process_time", 0.0)?;
    let quality = number_or(params, "quality_rating", 0.0)?;
    let satisfaction = number_or(params, "customer_satisfaction", 0.0)?;

    // Quality and satisfaction may arrive on a 5- or 10-point scale.
    let to_hundred = |v: f64| if v <= 5.0 { v * 20.0 } else if v <= 10.0 { v * 10.0 } else { v };
    let scores: Vec<f64> = [efficiency, to_hundred(quality), to_hundred(satisfaction)]
        .into_iter()
        .filter(|v| *v > 0.0)
        .collect();
    let excellence = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };
    let data = json!({
        "excellence_score": round1(excellence),
        "process_time": process_time,
        "rating": rate_at_least(excellence, [85.0, 75.0, 65.0]),
    });
    Ok(Analysis::new(data)
        .insight_if(process_time > 15.0, "Ticket times above 15 minutes; rebalance the line")
        .insight_if(
            excellence > 0.0 && excellence < 75.0,
            "Pick one metric to improve this quarter and track it weekly",
        ))
}

fn analyze_business_goals(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, BUSINESS_REQUIRED)?;
    let revenue_target = number_or(params, "revenue_target", 0.0)?;
    let months = number_or(params, "timeline_months", 12.0)?.max(1.0);

    let mut data = json!({
        "revenue_target": revenue_target,
        "timeline_months": months,
        "monthly_revenue_needed": round2(revenue_target / months),
    });
    merge_metrics(&mut data, business_metrics(params));

    let roi = data.get("roi_achieved").and_then(Value::as_f64);
    Ok(Analysis::new(data)
        .insight_if(revenue_target <= 0.0, "Add a revenue target to measure the plan against")
        .insight_if(
            roi.map_or(false, |r| r < 0.0),
            "Planned spend exceeds the revenue target",
        ))
}

fn plan_sequence(params: &FieldMap) -> Analysis {
    let steps: Vec<Value> = PLANNING_STEPS
        .iter()
        .enumerate()
        .map(|(i, (title, task, inputs))| {
            let ready = params.positive_count(inputs) == inputs.len();
            json!({
                "step": i + 1,
                "title": title,
                "task": task,
                "inputs": inputs,
                "ready": ready,
            })
        })
        .collect();
    let next = PLANNING_STEPS
        .iter()
        .find(|(_, _, inputs)| params.positive_count(inputs) < inputs.len())
        .map(|(title, _, _)| *title);

    let analysis = Analysis::new(json!({ "steps": steps, "next_step": next }));
    match next {
        Some(title) => analysis.insight(format!("Start with: {}", title)),
        None => analysis.insight("Every step has its inputs; run them in order"),
    }
}

fn swot_analysis(params: &FieldMap) -> Analysis {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    for (field, higher_better, threshold, label) in SWOT_SIGNALS {
        let Some(value) = params.number(field).filter(|v| *v > 0.0) else {
            continue;
        };
        if (value >= *threshold) == *higher_better {
            strengths.push(*label);
        } else {
            weaknesses.push(*label);
        }
    }

    let mut opportunities = Vec::new();
    let mut threats = Vec::new();
    if params.positive_count(GROWTH_FIELDS) > 0 {
        opportunities.push("untapped market share");
    }
    if params.positive_count(BUSINESS_FIELDS) > 0 {
        opportunities.push("funded business goals");
    }
    if params.number("competition_level").map_or(false, |c| c >= 7.0) {
        threats.push("high local competition");
    }
    if params.number("turnover_rate").map_or(false, |t| t > 70.0) {
        threats.push("staffing instability");
    }

    let has_signals = !(strengths.is_empty() && weaknesses.is_empty());
    Analysis::new(json!({
        "strengths": strengths,
        "weaknesses": weaknesses,
        "opportunities": opportunities,
        "threats": threats,
    }))
    .insight_if(
        !has_signals,
        "Share satisfaction, efficiency, turnover or market figures for a data-backed SWOT",
    )
}

fn merge_metrics(data: &mut Value, metrics: FieldMap) {
    if let (Value::Object(map), Value::Object(extra)) = (data, metrics.to_json()) {
        for (k, v) in extra {
            map.entry(k).or_insert(v);
        }
    }
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
    fn test_business_goals_include_roi() {
        let a = analyze_business_goals(&map(&[("revenue_target", 50000.0), ("budget_total", 20000.0)])).unwrap();
        assert_eq!(a.data["total_spend"], 20000.0);
        assert_eq!(a.data["roi_achieved"], 150.0);
        assert_eq!(a.data["monthly_revenue_needed"], 4166.67);
    }

    #[test]
    fn test_growth_strategy() {
        let a = analyze_growth(&map(&[
            ("market_size", 2_000_000.0),
            ("market_share", 5.0),
            ("investment_budget", 150_000.0),
        ]))
        .unwrap();
        assert_eq!(a.data["market_opportunity"], 1_900_000.0);
        assert_eq!(a.data["total_investment"], 150_000.0);
        let err = analyze_growth(&map(&[("market_share", 150.0)])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_forecast_derives_growth() {
        let a = analyze_forecast(&map(&[("historical_sales", 50000.0), ("current_sales", 55000.0)])).unwrap();
        assert_eq!(a.data["growth_rate"], 10.0);
        assert_eq!(a.data["projected_sales"], 60500.0);
    }

    #[test]
    fn test_planning_sequence_without_inputs() {
        let a = plan_sequence(&FieldMap::new());
        assert_eq!(a.data["steps"].as_array().unwrap().len(), PLANNING_STEPS.len());
        assert_eq!(a.data["next_step"], "Know your numbers");
    }

    #[test]
    fn test_swot_buckets() {
        let a = swot_analysis(&map(&[("customer_satisfaction", 92.0), ("turnover_rate", 95.0)]));
        assert_eq!(a.data["strengths"], json!(["guest satisfaction"]));
        assert_eq!(a.data["weaknesses"], json!(["staff turnover"]));
        assert_eq!(a.data["threats"], json!(["staffing instability"]));
        assert!(a.insights.is_empty());

        let a = swot_analysis(&FieldMap::new());
        assert_eq!(a.insights.len(), 1);
    }

    #[test]
    fn test_operations_scales() {
        let a = analyze_operations(&map(&[("efficiency_score", 80.0), ("quality_rating", 4.5)])).unwrap();
        assert_eq!(a.data["excellence_score"], 85.0);
        assert_eq!(a.data["rating"], "Excellent");
    }
}
