//! Core KPI analyses: labor, food, prime cost and sales performance.

use restoiq_core::{DefaultTargets, FieldMap};
use restoiq_dispatch::{TaskError, TaskRequest, TaskResult};
use serde_json::json;

use crate::common::{
    number, number_or, positive, rate_at_least, rate_at_most, ratio_percent, require, respond,
    round1, round2, Analysis,
};

const LABOR_BANDS: [f64; 3] = [25.0, 30.0, 35.0];
const FOOD_BANDS: [f64; 3] = [28.0, 32.0, 38.0];
const PRIME_BANDS: [f64; 3] = [55.0, 60.0, 65.0];
/// Sales per labor hour; higher is better.
const SPLH_BANDS: [f64; 3] = [80.0, 60.0, 40.0];

pub fn labor_cost(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_labor_cost(req.params, &req.context.targets))
}

pub fn food_cost(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_food_cost(req.params, &req.context.targets))
}

pub fn prime_cost(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_prime_cost(req.params, &req.context.targets))
}

pub fn sales_performance(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_sales_performance(req.params))
}

fn analyze_labor_cost(params: &FieldMap, targets: &DefaultTargets) -> Result<Analysis, TaskError> {
    require(params, &["total_sales", "labor_cost", "hours_worked"])?;
    let total_sales = positive(params, "total_sales")?;
    let labor_cost = number(params, "labor_cost")?;
    let hours_worked = positive(params, "hours_worked")?;
    let target = number_or(params, "target_labor_percent", targets.target_labor_percent)?;

    let labor_percent = ratio_percent(labor_cost, total_sales);
    let target_labor_cost = target / 100.0 * total_sales;
    let potential_savings = labor_cost - target_labor_cost;
    let rating = rate_at_most(labor_percent, LABOR_BANDS);

    let mut data = json!({
        "labor_percent": round1(labor_percent),
        "sales_per_labor_hour": round2(total_sales / hours_worked),
        "cost_per_labor_hour": round2(labor_cost / hours_worked),
        "target_labor_percent": target,
        "target_labor_cost": round2(target_labor_cost),
        "potential_savings": round2(potential_savings.max(0.0)),
        "rating": rating,
    });
    if let Ok(overtime) = number(params, "overtime_hours") {
        data["overtime_percent"] = json!(round1(ratio_percent(overtime, hours_worked)));
    }

    Ok(Analysis::new(data)
        .insight_if(
            labor_percent > target,
            format!(
                "Labor is {:.1}% of sales; trimming ${:.2} reaches the {}% target",
                labor_percent, potential_savings, target
            ),
        )
        .insight_if(
            labor_percent <= target,
            format!("Labor at {:.1}% of sales is within the {}% target", labor_percent, target),
        ))
}

fn analyze_food_cost(params: &FieldMap, targets: &DefaultTargets) -> Result<Analysis, TaskError> {
    require(params, &["total_sales", "food_cost"])?;
    let total_sales = positive(params, "total_sales")?;
    let food_cost = number(params, "food_cost")?;
    let target = number_or(params, "target_food_percent", targets.target_food_percent)?;

    let food_percent = ratio_percent(food_cost, total_sales);
    let target_food_cost = target / 100.0 * total_sales;
    let mut data = json!({
        "food_percent": round1(food_percent),
        "gross_profit": round2(total_sales - food_cost),
        "target_food_percent": target,
        "target_food_cost": round2(target_food_cost),
        "potential_savings": round2((food_cost - target_food_cost).max(0.0)),
        "rating": rate_at_most(food_percent, FOOD_BANDS),
    });
    let mut waste_share = None;
    if let Ok(waste) = number(params, "waste_cost") {
        let share = ratio_percent(waste, food_cost);
        data["waste_percent_of_food"] = json!(round1(share));
        waste_share = Some(share);
    }

    Ok(Analysis::new(data)
        .insight_if(
            food_percent > target,
            format!("Food cost at {:.1}% is above the {}% target; review portions and supplier pricing", food_percent, target),
        )
        .insight_if(
            waste_share.map_or(false, |w| w > 5.0),
            "Waste exceeds 5% of food cost; tighten prep par levels",
        ))
}

fn analyze_prime_cost(params: &FieldMap, targets: &DefaultTargets) -> Result<Analysis, TaskError> {
    require(params, &["total_sales", "labor_cost", "food_cost"])?;
    let total_sales = positive(params, "total_sales")?;
    let labor_cost = number(params, "labor_cost")?;
    let food_cost = number(params, "food_cost")?;
    let target = number_or(params, "target_prime_percent", targets.target_prime_percent)?;

    let prime_cost = labor_cost + food_cost;
    let prime_percent = ratio_percent(prime_cost, total_sales);
    let target_prime_cost = target / 100.0 * total_sales;
    let data = json!({
        "prime_cost": round2(prime_cost),
        "prime_percent": round1(prime_percent),
        "labor_percent": round1(ratio_percent(labor_cost, total_sales)),
        "food_percent": round1(ratio_percent(food_cost, total_sales)),
        "labor_portion": round1(ratio_percent(labor_cost, prime_cost)),
        "food_portion": round1(ratio_percent(food_cost, prime_cost)),
        "target_prime_percent": target,
        "target_prime_cost": round2(target_prime_cost),
        "potential_savings": round2((prime_cost - target_prime_cost).max(0.0)),
        "rating": rate_at_most(prime_percent, PRIME_BANDS),
    });

    let bigger = if labor_cost >= food_cost { "labor" } else { "food" };
    Ok(Analysis::new(data)
        .insight(format!(
            "Prime cost is {:.1}% of sales against a {}% target",
            prime_percent, target
        ))
        .insight_if(
            prime_percent > target,
            format!("Start with {} cost, the larger share of prime cost", bigger),
        ))
}

fn analyze_sales_performance(params: &FieldMap) -> Result<Analysis, TaskError> {
    require(params, &["total_sales", "labor_cost", "food_cost", "hours_worked"])?;
    let total_sales = positive(params, "total_sales")?;
    let labor_cost = number(params, "labor_cost")?;
    let food_cost = number(params, "food_cost")?;
    let hours_worked = positive(params, "hours_worked")?;

    let sales_per_labor_hour = total_sales / hours_worked;
    let labor_percent = ratio_percent(labor_cost, total_sales);
    let food_percent = ratio_percent(food_cost, total_sales);
    let mut data = json!({
        "sales_per_labor_hour": round2(sales_per_labor_hour),
        "labor_percent": round1(labor_percent),
        "food_percent": round1(food_percent),
        "prime_percent": round1(labor_percent + food_percent),
        "rating": rate_at_least(sales_per_labor_hour, SPLH_BANDS),
    });
    let previous = number_or(params, "previous_sales", 0.0)?;
    if previous > 0.0 {
        data["sales_growth"] = json!(round1(ratio_percent(total_sales - previous, previous)));
    }
    let covers = number_or(params, "covers", 0.0)?;
    if covers > 0.0 {
        data["average_check"] = json!(round2(total_sales / covers));
    }

    Ok(Analysis::new(data)
        .insight_if(
            sales_per_labor_hour < SPLH_BANDS[2],
            format!(
                "Sales per labor hour of ${:.2} is below ${}; tighten scheduling in slow dayparts",
                sales_per_labor_hour, SPLH_BANDS[2]
            ),
        )
        .insight_if(
            sales_per_labor_hour >= SPLH_BANDS[0],
            "Labor productivity is excellent; protect it during peak periods",
        ))
}
