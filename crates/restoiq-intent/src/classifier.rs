//! Keyword classifier for menu questions.
//!
//! Independent of [`crate::IntentResolver`]: it scores free text against
//! fixed keyword lists and is used to suggest a conversational follow-up
//! when the resolver finds nothing to dispatch.

use once_cell::sync::Lazy;
use regex::Regex;
use restoiq_core::{FieldMap, FieldValue};
use serde::Serialize;

struct KeywordIntent {
    name: &'static str,
    keywords: &'static [&'static str],
    endpoint: Option<&'static str>,
    extract: Option<&'static str>,
    question: Option<&'static str>,
    category: &'static str,
}

const fn menu(
    name: &'static str,
    keywords: &'static [&'static str],
    endpoint: &'static str,
    extract: Option<&'static str>,
) -> KeywordIntent {
    KeywordIntent {
        name,
        keywords,
        endpoint: Some(endpoint),
        extract,
        question: None,
        category: "menu",
    }
}

const fn question(
    name: &'static str,
    keywords: &'static [&'static str],
    question: &'static str,
) -> KeywordIntent {
    KeywordIntent {
        name,
        keywords,
        endpoint: Some("menu/questions"),
        extract: None,
        question: Some(question),
        category: "menu",
    }
}

const HELP: &str = "help";

static KEYWORD_INTENTS: &[KeywordIntent] = &[
    menu(
        "highest_selling",
        &["highest selling", "top selling", "best selling", "most popular", "top food seller", "top seller", "best seller", "what sells", "popular items"],
        "menu/product_mix",
        Some("top_performers.by_units_sold"),
    ),
    menu(
        "most_profitable",
        &["most profitable", "highest profit", "best margin", "biggest earners"],
        "menu/product_mix",
        Some("top_performers.by_total_profit"),
    ),
    menu(
        "stars",
        &["star items", "stars", "best items", "top performers"],
        "menu/product_mix",
        Some("quadrant_summary.stars"),
    ),
    menu(
        "dogs",
        &["dog items", "dogs", "worst items", "underperformers", "remove"],
        "menu/product_mix",
        Some("quadrant_summary.dogs"),
    ),
    menu(
        "menu_analysis",
        &["menu analysis", "analyze menu", "menu engineering", "product mix"],
        "menu/product_mix",
        None,
    ),
    menu(
        "pricing_strategy",
        &["pricing strategy", "optimize pricing", "pricing analysis", "pricing opportunities"],
        "menu/pricing",
        None,
    ),
    menu(
        "underpriced_items",
        &["underpriced", "too cheap", "raise price"],
        "menu/pricing",
        Some("pricing_opportunities.underpriced_items"),
    ),
    menu(
        "overpriced_items",
        &["overpriced", "too expensive", "lower price"],
        "menu/pricing",
        Some("pricing_opportunities.overpriced_items"),
    ),
    menu(
        "golden_triangle",
        &["where should i place", "where to place", "placement", "golden triangle"],
        "menu/design",
        None,
    ),
    menu(
        "menu_design",
        &["menu design", "visual hierarchy", "menu layout", "design recommendations"],
        "menu/design",
        None,
    ),
    // Product mix questions
    question(
        "q_highest_contribution_margin",
        &["highest contribution margin", "best margin versus sales", "margin vs sales volume"],
        "highest contribution margin",
    ),
    question(
        "q_top_profit_percentage",
        &["top 5", "top selling profit", "pareto", "percentage of total profit"],
        "top 5 profit percentage",
    ),
    question(
        "q_dog_quadrant",
        &["dog quadrant", "remove items", "re-engineer", "low popularity low profit"],
        "dog quadrant",
    ),
    question(
        "q_sales_trends_category",
        &["sales trends", "month over month", "category trends", "trend analysis"],
        "sales trends category",
    ),
    question(
        "q_menu_mix_percentages",
        &["menu mix", "category percentage", "mix percentages", "industry benchmark"],
        "menu mix percentages",
    ),
    question(
        "q_hidden_stars",
        &["hidden stars", "high margin low sales", "strong margins low velocity"],
        "hidden stars",
    ),
    question(
        "q_profit_per_labor_minute",
        &["profit per labor", "labor minute", "efficiency by category"],
        "profit per labor minute",
    ),
    question(
        "q_average_check_influence",
        &["average check", "check size", "product mix influence"],
        "average check influence",
    ),
    // Pricing questions
    question(
        "q_undervalued_items",
        &["undervalued", "perceived value", "cost percentage"],
        "undervalued items",
    ),
    question(
        "q_price_increase_impact",
        &["price increase", "increase by", "profit gained", "what if"],
        "price increase impact",
    ),
    question(
        "q_price_elasticity",
        &["price elasticity", "sales don't drop", "ideal price range"],
        "price elasticity",
    ),
    question(
        "q_food_cost_vs_target",
        &["food cost percentage", "target margin", "compare to target"],
        "food cost vs target",
    ),
    question(
        "q_pricing_strategy",
        &["pricing strategy", "cost-plus", "competitive parity", "value-based"],
        "pricing strategy",
    ),
    question(
        "q_bundling_opportunities",
        &["bundling", "re-priced", "ticket size", "combo"],
        "bundling opportunities",
    ),
    question(
        "q_vendor_inflation_impact",
        &["inflation", "vendor price", "sysco", "cost changes"],
        "vendor inflation impact",
    ),
    // Design questions
    question(
        "q_visual_zone_performance",
        &["visual zones", "upper-right", "prime position", "menu positioning"],
        "visual zone performance",
    ),
    question(
        "q_callout_effectiveness",
        &["callouts", "icons", "chef recommendation", "selection rate"],
        "callout effectiveness",
    ),
    question(
        "q_category_sequencing",
        &["category sequencing", "sequencing", "order effect"],
        "category sequencing",
    ),
    question(
        "q_design_value_perception",
        &["design elements", "perceived value", "price sensitivity", "visual impact"],
        "design value perception",
    ),
    question(
        "q_limited_time_offers",
        &["limited time", "chef features", "lto", "short-term sales"],
        "limited time offers",
    ),
    KeywordIntent {
        name: HELP,
        keywords: &["help", "what can you do", "commands", "how to use"],
        endpoint: None,
        extract: None,
        question: None,
        category: "system",
    },
];

/// Best keyword intent for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub intent: &'static str,
    pub confidence: f64,
    pub endpoint: Option<&'static str>,
    /// Dotted path into the endpoint's result, when only part is wanted.
    pub extract: Option<&'static str>,
    pub category: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<&'static str>,
}

impl KeywordMatch {
    fn from_intent(intent: &KeywordIntent, confidence: f64) -> Self {
        Self {
            intent: intent.name,
            confidence,
            endpoint: intent.endpoint,
            extract: intent.extract,
            category: intent.category,
            question: intent.question,
        }
    }
}

/// Score every keyword intent against the query and return the best one.
///
/// Score is matched phrases over total phrases, or 1.0 when the whole
/// query equals one phrase. Earlier intents win ties. Without any match
/// the result is `help` with zero confidence.
pub fn classify_keywords(query: &str) -> KeywordMatch {
    let lower = query.trim().to_lowercase();
    let mut best: Option<(&KeywordIntent, f64)> = None;

    for intent in KEYWORD_INTENTS {
        let matches = intent.keywords.iter().filter(|k| lower.contains(*k)).count();
        if matches == 0 {
            continue;
        }
        let score = if intent.keywords.iter().any(|k| *k == lower) {
            1.0
        } else {
            matches as f64 / intent.keywords.len() as f64
        };
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((intent, score));
        }
    }

    match best {
        Some((intent, score)) => KeywordMatch::from_intent(intent, score),
        None => {
            let help = KEYWORD_INTENTS
                .iter()
                .find(|i| i.name == HELP)
                .unwrap_or(&KEYWORD_INTENTS[KEYWORD_INTENTS.len() - 1]);
            KeywordMatch::from_intent(help, 0.0)
        }
    }
}

const CATEGORY_WORDS: &[(&str, &str)] = &[
    ("appetizers", "Appetizers"),
    ("main course", "Main Course"),
    ("entrees", "Main Course"),
    ("desserts", "Desserts"),
    ("beverages", "Beverages"),
    ("drinks", "Beverages"),
];

static FOOD_COST_TARGET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)%?\s*food cost").unwrap());

/// Menu filter parameters mentioned in a query.
///
/// `category_filter` takes the last category word in list order;
/// `target_food_cost` comes from phrases like "30% food cost".
pub fn extract_parameters(query: &str) -> FieldMap {
    let lower = query.to_lowercase();
    let mut params = FieldMap::new();

    if let Some((_, category)) = CATEGORY_WORDS
        .iter()
        .filter(|(word, _)| lower.contains(word))
        .last()
    {
        params.insert_if_absent("category_filter", FieldValue::Text(category.to_string()));
    }

    if let Some(target) = FOOD_COST_TARGET
        .captures(&lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        params.insert_if_absent("target_food_cost", FieldValue::Number(target));
    }
    params
}

/// Up to three follow-up questions for a keyword intent.
pub fn suggest_follow_ups(intent: &str) -> Vec<&'static str> {
    let suggestions: &[&'static str] = match intent {
        "highest_selling" | "most_profitable" | "menu_analysis" => &[
            "Show me underpriced items",
            "What are my dog items?",
            "Show me menu design recommendations",
        ],
        "underpriced_items" | "overpriced_items" | "pricing_strategy" => {
            &["Show me my star items", "What's my menu analysis?"]
        }
        "golden_triangle" | "menu_design" => &[
            "Show me my most profitable items",
            "What items should I remove?",
        ],
        "stars" | "dogs" => &[
            "Show me pricing opportunities",
            "Where should I place these on my menu?",
        ],
        _ => &[],
    };
    suggestions.iter().take(3).copied().collect()
}
