//! Menu engineering analyses.
//!
//! These run on the figures supplied with the query; full item-level
//! menu datasets are handled by the reporting layer, not here.

use restoiq_core::FieldMap;
use restoiq_dispatch::{TaskError, TaskRequest, TaskResult};
use serde_json::{json, Value};

use crate::common::{number_or, ratio_percent, require_any, respond, round1, round2, Analysis};

const DEFAULT_TARGET_FOOD_COST: f64 = 32.0;

const QUADRANTS: &[(&str, &str)] = &[
    ("stars", "high popularity, high profit: keep prominent and protect quality"),
    ("plowhorses", "high popularity, low profit: re-cost or nudge price up"),
    ("puzzles", "low popularity, high profit: reposition and rename"),
    ("dogs", "low popularity, low profit: remove or re-engineer"),
];

/// Menu questions the conversational layer can route here, with the inputs each needs.
const QUESTIONS: &[(&str, &[&str])] = &[
    ("highest contribution margin", &["item_price", "item_cost", "item_sales"]),
    ("top 5 profit percentage", &["item_profit", "item_sales"]),
    ("dog quadrant", &["item_sales", "item_profit"]),
    ("sales trends category", &["item_sales", "category_filter"]),
    ("menu mix percentages", &["item_sales", "category_filter"]),
    ("hidden stars", &["item_profit", "item_sales"]),
    ("profit per labor minute", &["item_profit"]),
    ("average check influence", &["item_sales", "item_price"]),
    ("undervalued items", &["item_price", "item_cost"]),
    ("price increase impact", &["item_price", "item_sales"]),
    ("price elasticity", &["item_price", "item_sales"]),
    ("food cost vs target", &["item_price", "item_cost", "target_food_cost"]),
    ("pricing strategy", &["item_price", "item_cost", "competitor_price"]),
    ("bundling opportunities", &["item_price", "item_sales"]),
    ("vendor inflation impact", &["item_cost"]),
    ("visual zone performance", &["menu_items", "item_sales"]),
    ("callout effectiveness", &["menu_items", "item_sales"]),
    ("category sequencing", &["menu_items"]),
    ("design value perception", &["menu_items", "item_price"]),
    ("limited time offers", &["item_sales", "item_profit"]),
];

pub fn product_mix(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_product_mix(req.params))
}

pub fn pricing(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_pricing(req.params))
}

pub fn design(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, analyze_design(req.params))
}

pub fn questions(req: &TaskRequest<'_>) -> TaskResult {
    respond(req, answer_question(req.arg("question"), req.params))
}

fn unit_economics(params: &FieldMap) -> Result<Option<Value>, TaskError> {
    let price = number_or(params, "item_price", 0.0)?;
    let cost = number_or(params, "item_cost", 0.0)?;
    if price <= 0.0 || cost <= 0.0 {
        return Ok(None);
    }
    Ok(Some(json!({
        "contribution_margin": round2(price - cost),
        "food_cost_percent": round1(ratio_percent(cost, price)),
    })))
}

fn analyze_product_mix(params: &FieldMap) -> Result<Analysis, TaskError> {
    let mut data = json!({
        "category_filter": params.text("category_filter"),
        "quadrants": QUADRANTS
            .iter()
            .map(|(name, action)| json!({"quadrant": name, "action": action}))
            .collect::<Vec<_>>(),
    });
    if let Some(unit) = unit_economics(params)? {
        data["unit_economics"] = unit;
    }
    let sales = number_or(params, "item_sales", 0.0)?;
    let profit = number_or(params, "item_profit", 0.0)?;
    if sales > 0.0 && profit > 0.0 {
        data["profit_per_unit"] = json!(round2(profit / sales));
    }

    let mut analysis = Analysis::new(data)
        .insight("Rank items by units sold and contribution margin to place them in quadrants");
    if let Some(category) = params.text("category_filter") {
        analysis = analysis.insight(format!("Scoped to {}", category));
    }
    Ok(analysis)
}

fn analyze_pricing(params: &FieldMap) -> Result<Analysis, TaskError> {
    require_any(params, &["item_price", "item_cost"])?;
    let price = number_or(params, "item_price", 0.0)?;
    let cost = number_or(params, "item_cost", 0.0)?;
    let target = number_or(params, "target_food_cost", DEFAULT_TARGET_FOOD_COST)?;
    if target <= 0.0 || target >= 100.0 {
        return Err(TaskError::invalid("target_food_cost", "must be between 0 and 100"));
    }

    let mut data = json!({ "target_food_cost": target });
    let mut analysis_lines = Vec::new();
    if cost > 0.0 {
        let suggested = cost / (target / 100.0);
        data["suggested_price"] = json!(round2(suggested));
        if price > 0.0 {
            let food_cost_percent = ratio_percent(cost, price);
            data["food_cost_percent"] = json!(round1(food_cost_percent));
            data["contribution_margin"] = json!(round2(price - cost));
            data["price_gap"] = json!(round2(suggested - price));
            if food_cost_percent > target {
                analysis_lines.push(format!(
                    "Underpriced: {:.1}% food cost vs {}% target; move toward ${:.2}",
                    food_cost_percent, target, suggested
                ));
            } else if food_cost_percent < target * 0.75 {
                analysis_lines.push("Food cost well below target; there may be room for value pricing".to_string());
            }
        }
    }
    let competitor = number_or(params, "competitor_price", 0.0)?;
    if competitor > 0.0 && price > 0.0 {
        data["vs_competitor_percent"] = json!(round1(ratio_percent(price - competitor, competitor)));
    }

    Ok(analysis_lines
        .into_iter()
        .fold(Analysis::new(data), |a, line| a.insight(line)))
}

fn analyze_design(params: &FieldMap) -> Result<Analysis, TaskError> {
    let items = number_or(params, "menu_items", 0.0)?;
    let high_profit = number_or(params, "high_profit_items", 0.0)?;

    let mut data = json!({
        "placement": {
            "golden_triangle": "center, top right, top left: place stars and puzzles here",
            "first_and_last": "first and last items in a category draw the most attention",
            "callouts": "box or icon at most one item per category",
        }
    });
    if items > 0.0 {
        data["items_per_panel"] = json!((items / 3.0).ceil());
        if high_profit > 0.0 {
            data["high_profit_share"] = json!(round1(ratio_percent(high_profit, items)));
        }
    }
    Ok(Analysis::new(data)
        .insight_if(
            items > 40.0,
            format!("{} items is a long menu; aim for 7 or fewer per category", items),
        )
        .insight("Lead each category with its highest-margin item"))
}

fn answer_question(question: Option<&str>, params: &FieldMap) -> Result<Analysis, TaskError> {
    let Some(question) = question else {
        return Err(TaskError::MissingFields(vec!["question".into()]));
    };
    let Some((topic, inputs)) = QUESTIONS.iter().find(|(q, _)| *q == question) else {
        return Err(TaskError::invalid("question", format!("unknown menu question: {}", question)));
    };
    let missing: Vec<&str> = inputs.iter().copied().filter(|f| !params.is_present(f)).collect();
    let data = json!({
        "question": topic,
        "inputs": inputs,
        "missing_inputs": missing,
        "unit_economics": unit_economics(params)?,
    });
    Ok(Analysis::new(data).insight_if(
        !missing.is_empty(),
        format!("Answering this needs: {}", missing.join(", ")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use restoiq_core::FieldValue;

    #[test]
    fn test_product_mix_without_numbers() {
        let a = analyze_product_mix(&FieldMap::new()).unwrap();
        assert_eq!(a.data["quadrants"].as_array().unwrap().len(), 4);
        assert!(a.data["category_filter"].is_null());
    }

    #[test]
    fn test_menu_pricing_underpriced() {
        let params: FieldMap = vec![
            ("item_price", FieldValue::Number(15.0)),
            ("item_cost", FieldValue::Number(6.0)),
            ("target_food_cost", FieldValue::Number(30.0)),
        ]
        .into_iter()
        .collect();
        let a = analyze_pricing(&params).unwrap();
        assert_eq!(a.data["food_cost_percent"], 40.0);
        assert_eq!(a.data["suggested_price"], 20.0);
        assert!(a.insights[0].starts_with("Underpriced"));
    }

    #[test]
    fn test_question_lookup() {
        let mut params = FieldMap::new();
        params.insert_if_absent("item_sales", FieldValue::Number(120.0));
        let a = answer_question(Some("hidden stars"), &params).unwrap();
        assert_eq!(a.data["missing_inputs"], json!(["item_profit"]));

        let unknown = answer_question(Some("astrology"), &FieldMap::new());
        assert!(unknown.unwrap_err().is_validation());
        let missing = answer_question(None, &params).unwrap_err();
        assert_eq!(missing.fields(), vec!["question".to_string()]);
    }

    #[test]
    fn test_category_filter_counts_as_supplied_text() {
        let params: FieldMap = vec![
            ("item_sales", FieldValue::Number(300.0)),
            ("category_filter", FieldValue::Text("Desserts".into())),
        ]
        .into_iter()
        .collect();
        let a = answer_question(Some("menu mix percentages"), &params).unwrap();
        assert_eq!(a.data["missing_inputs"], json!([]));
        assert!(a.insights.is_empty());
    }

    #[test]
    fn test_design_panels() {
        let mut params = FieldMap::new();
        params.insert_if_absent("menu_items", FieldValue::Integer(45));
        let a = analyze_design(&params).unwrap();
        assert_eq!(a.data["items_per_panel"], 15.0);
        assert_eq!(a.insights.len(), 2);
    }
}
