//! Metrics computed inline for business-goal and growth-strategy routes.

use restoiq_core::{FieldMap, FieldValue};

fn num(fields: &FieldMap, name: &str) -> f64 {
    fields.number(name).filter(|v| *v > 0.0).unwrap_or(0.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// `total_spend`, `projected_net` and `roi_achieved` for a business-goal row.
///
/// Spend is marketing plus staffing when either is given, otherwise the
/// total budget. ROI is omitted when spend is not positive.
pub fn business_metrics(fields: &FieldMap) -> FieldMap {
    let mut out = FieldMap::new();
    let itemised = num(fields, "marketing_spend") + num(fields, "staffing_cost");
    let total_spend = if itemised > 0.0 {
        itemised
    } else {
        num(fields, "budget_total")
    };
    let revenue_target = num(fields, "revenue_target");

    out.insert_if_absent("total_spend", FieldValue::Number(round2(total_spend)));
    let projected_net = revenue_target - total_spend;
    out.insert_if_absent("projected_net", FieldValue::Number(round2(projected_net)));
    if total_spend > 0.0 {
        out.insert_if_absent(
            "roi_achieved",
            FieldValue::Number(round2(projected_net / total_spend * 100.0)),
        );
    }
    out
}

/// `total_investment`, `projected_net` and `roi_projected` for a growth row.
pub fn growth_metrics(fields: &FieldMap) -> FieldMap {
    let mut out = FieldMap::new();
    let total_investment = num(fields, "investment_budget") + num(fields, "expansion_cost");
    let projected_revenue = num(fields, "projected_revenue");

    out.insert_if_absent("total_investment", FieldValue::Number(round2(total_investment)));
    let projected_net = projected_revenue - total_investment;
    out.insert_if_absent("projected_net", FieldValue::Number(round2(projected_net)));
    if total_investment > 0.0 {
        out.insert_if_absent(
            "roi_projected",
            FieldValue::Number(round2(projected_net / total_investment * 100.0)),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, f64)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (*k, FieldValue::Number(*v)))
            .collect()
    }

    #[test]
    fn test_business_uses_budget_when_not_itemised() {
        let m = business_metrics(&map(&[("revenue_target", 50000.0), ("budget_total", 20000.0)]));
        assert_eq!(m.number("total_spend"), Some(20000.0));
        assert_eq!(m.number("projected_net"), Some(30000.0));
        assert_eq!(m.number("roi_achieved"), Some(150.0));
    }

    #[test]
    fn test_business_prefers_itemised_spend() {
        let m = business_metrics(&map(&[
            ("revenue_target", 90000.0),
            ("budget_total", 20000.0),
            ("marketing_spend", 5000.0),
            ("staffing_cost", 25000.0),
        ]));
        assert_eq!(m.number("total_spend"), Some(30000.0));
        assert_eq!(m.number("roi_achieved"), Some(200.0));
    }

    #[test]
    fn test_roi_omitted_without_spend() {
        let m = business_metrics(&map(&[("revenue_target", 50000.0)]));
        assert!(!m.contains("roi_achieved"));
        let g = growth_metrics(&map(&[("projected_revenue", 10000.0)]));
        assert!(!g.contains("roi_projected"));
    }

    #[test]
    fn test_growth_metrics() {
        let g = growth_metrics(&map(&[
            ("investment_budget", 100000.0),
            ("expansion_cost", 50000.0),
            ("projected_revenue", 240000.0),
        ]));
        assert_eq!(g.number("total_investment"), Some(150000.0));
        assert_eq!(g.number("projected_net"), Some(90000.0));
        assert_eq!(g.number("roi_projected"), Some(60.0));
    }
}
