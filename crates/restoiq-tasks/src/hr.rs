//! Workforce analyses.

use restoiq_core::{DefaultTargets, FieldMap};
use restoiq_dispatch::{TaskError, TaskRequest, TaskResult};
use serde_json::json;

use crate::common::{
    number, number_or, positive, rate_at_least, rate_at_most, ratio_percent, require, require_any,
    respond, round1, round2, Analysis,
};

const DEFAULT_INDUSTRY_TURNOVER: f64 = 70.0;
const MAX_TURNOVER: f64 = 200.0;
const TURNOVER_BANDS: [f64; 3] = [30.0, 50.0, 70.0];
/// Replacement cost per departing employee (1.5x a $30k salary).
const REPLACEMENT_COST: f64 = 45_000.0;
const DEFAULT_HEADCOUNT: f64 = 25.0;

const PERFORMANCE_METRICS: &[&str] = &[
    "customer_satisfaction",
    "sales_performance",
    "efficiency_score",
    "attendance_rate",
];

pub fn staff_retention(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_staff_retention(req.params))
}

pub fn labor_scheduling(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_labor_scheduling(req.params, &req.context.targets))
}

pub fn performance_management(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_performance(req.params))
}

fn analyze_staff_retention(params: &FieldMap) -> Result<Analysis, TaskError> {
    require(params, &["turnover_rate"])?;
    let turnover = number(params, "turnover_rate")?;
    if turnover > MAX_TURNOVER {
        return Err(TaskError::invalid("turnover_rate", "cannot exceed 200%"));
    }
    let industry = number_or(params, "industry_average", DEFAULT_INDUSTRY_TURNOVER)?;
    let headcount = number_or(params, "employee_count", DEFAULT_HEADCOUNT)?;

    let vs_industry = turnover - industry;
    let risk = if turnover > industry + 20.0 {
        "High"
    } else if turnover > industry {
        "Moderate"
    } else {
        "Low"
    };
    let data = json!({
        "turnover_rate": turnover,
        "retention_rate": round1(100.0 - turnover),
        "industry_average": industry,
        "vs_industry": round1(vs_industry),
        "risk_level": risk,
        "estimated_annual_turnover_cost": round2(turnover / 100.0 * headcount * REPLACEMENT_COST),
        "rating": rate_at_most(turnover, TURNOVER_BANDS),
    });

    let analysis = Analysis::new(data);
    Ok(if vs_industry > 0.0 {
        analysis
            .insight(format!(
                "Reduce turnover by {:.1} points to match the industry average",
                vs_industry
            ))
            .insight("Hold stay interviews to learn why people leave")
    } else {
        analysis.insight("Retention beats the industry average; keep investing in development")
    })
}

fn analyze_labor_scheduling(
    params: &FieldMap,
    targets: &DefaultTargets,
) -> Result<Analysis, TaskError> {
    require(params, &["total_sales", "hourly_rate"])?;
    if !params.contains("hours_worked") {
        return Err(TaskError::MissingFields(vec!["hours_worked".into()]));
    }
    let total_sales = positive(params, "total_sales")?;
    let hourly_rate = number(params, "hourly_rate")?;
    let hours = positive(params, "hours_worked")?;
    let overtime = number_or(params, "overtime_hours", 0.0)?;

    let scheduled_cost = hours * hourly_rate + overtime * hourly_rate * 1.5;
    let labor_percent = ratio_percent(scheduled_cost, total_sales);
    let target = targets.target_labor_percent;
    let target_cost = target / 100.0 * total_sales;
    let data = json!({
        "scheduled_labor_cost": round2(scheduled_cost),
        "labor_percent": round1(labor_percent),
        "sales_per_labor_hour": round2(total_sales / hours),
        "affordable_hours": round1(target_cost / hourly_rate.max(f64::EPSILON)),
        "potential_savings": round2((scheduled_cost - target_cost).max(0.0)),
        "rating": rate_at_most(labor_percent, [25.0, 30.0, 35.0]),
    });

    Ok(Analysis::new(data)
        .insight_if(
            labor_percent > target,
            format!(
                "Scheduled labor is {:.1}% of sales; cut off-peak hours toward {}%",
                labor_percent, target
            ),
        )
        .insight_if(
            overtime > 0.0,
            format!("{:.0} overtime hours cost a 50% premium; cross-train to cover", overtime),
        ))
}

fn analyze_performance(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, PERFORMANCE_METRICS)?;
    let satisfaction = number_or(params, "customer_satisfaction", 85.0)?;
    let sales = number_or(params, "sales_performance", 100.0)?;
    let efficiency = number_or(params, "efficiency_score", 80.0)?;
    let attendance = number_or(params, "attendance_rate", 95.0)?;
    for (field, value) in [
        ("customer_satisfaction", satisfaction),
        ("efficiency_score", efficiency),
        ("attendance_rate", attendance),
    ] {
        if value > 100.0 {
            return Err(TaskError::invalid(field, "must be between 0 and 100"));
        }
    }

    let overall = (satisfaction + sales.min(100.0) + efficiency + attendance) / 4.0;
    let data = json!({
        "overall_score": round1(overall),
        "customer_satisfaction": satisfaction,
        "sales_performance": sales,
        "efficiency_score": efficiency,
        "attendance_rate": attendance,
        "rating": rate_at_least(overall, [90.0, 80.0, 70.0]),
    });

    Ok(Analysis::new(data)
        .insight_if(satisfaction < 90.0, "Guest satisfaction trails the 90 target; coach service standards")
        .insight_if(efficiency < 85.0, "Efficiency trails the 85 target; review station workflows")
        .insight_if(attendance < 98.0, "Attendance trails the 98% target; address call-outs early"))
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
    fn test_staff_retention() {
        let a = analyze_staff_retention(&map(&[("turnover_rate", 95.0)])).unwrap();
        assert_eq!(a.data["retention_rate"], 5.0);
        assert_eq!(a.data["risk_level"], "High");
        assert_eq!(a.data["rating"], "Needs Improvement");
        assert_eq!(a.insights.len(), 2);

        let a = analyze_staff_retention(&map(&[("turnover_rate", 40.0), ("industry_average", 60.0)])).unwrap();
        assert_eq!(a.data["risk_level"], "Low");
        assert_eq!(a.data["rating"], "Good");
    }

    #[test]
    fn test_turnover_cap() {
        let err = analyze_staff_retention(&map(&[("turnover_rate", 250.0)])).unwrap_err();
        assert!(matches!(err, TaskError::InvalidValue { ref field, .. } if field == "turnover_rate"));
    }

    #[test]
    fn test_labor_scheduling() {
        let a = analyze_labor_scheduling(
            &map(&[("total_sales", 40000.0), ("hourly_rate", 16.0), ("hours_worked", 900.0)]),
            &DefaultTargets::default(),
        )
        .unwrap();
        assert_eq!(a.data["scheduled_labor_cost"], 14400.0);
        assert_eq!(a.data["labor_percent"], 36.0);
        assert_eq!(a.data["affordable_hours"], 750.0);
        assert_eq!(a.data["potential_savings"], 2400.0);

        let err = analyze_labor_scheduling(
            &map(&[("total_sales", 40000.0), ("hourly_rate", 16.0)]),
            &DefaultTargets::default(),
        )
        .unwrap_err();
        assert_eq!(err.fields(), vec!["hours_worked"]);
    }

    #[test]
    fn test_performance_needs_one_metric() {
        assert!(matches!(analyze_performance(&FieldMap::new()), Err(TaskError::NeedsOneOf(_))));
        let a = analyze_performance(&map(&[("efficiency_score", 82.0)])).unwrap();
        assert_eq!(a.data["overall_score"], 90.5);
        assert_eq!(a.data["rating"], "Excellent");
    }
}
