//! Per-field label and unit vocabulary.
//!
//! Labels are regex fragments; a literal space in a label matches any run of
//! spaces, underscores or hyphens so `labor cost`, `labor_cost` and
//! `labor-cost` all hit the same rule.

use super::normalize::Normalizer;

/// Vocabulary for one canonical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub normalizer: Normalizer,
    /// Label phrases, most specific first.
    pub labels: &'static [&'static str],
    /// Trailing unit phrases for the value-first form (`$500 in sales`).
    pub units: &'static [&'static str],
}

const fn spec(
    name: &'static str,
    normalizer: Normalizer,
    labels: &'static [&'static str],
    units: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        name,
        normalizer,
        labels,
        units,
    }
}

use Normalizer::{Count, Money, Number, Percent};

/// Numeric fields and their phrasing.
pub static FIELD_SPECS: &[FieldSpec] = &[
    // KPI
    spec(
        "total_sales",
        Money,
        &[
            "total sales", "gross sales", "net sales", "total revenue", "gross revenue",
            "sales revenue", "monthly sales", "weekly sales", "annual sales", "monthly revenue",
        ],
        &["in sales", "in revenue", "of sales", "of revenue", "in total sales", "total sales"],
    ),
    spec(
        "labor_cost",
        Money,
        &["labor costs?", "labour costs?", "payroll costs?", "total labor", "payroll"],
        &["in labor", "on labor", "of labor", "for labor", "labor costs?", "in payroll"],
    ),
    spec(
        "food_cost",
        Money,
        &["food costs?", "cost of goods(?: sold)?", "cogs", "food spend", "food purchases"],
        &["in food", "on food", "of food", "for food", "food costs?"],
    ),
    spec(
        "hours_worked",
        Number,
        &["hours worked", "labor hours", "staff hours", "total hours", "hours"],
        &["hours worked", "labor hours", "hours", "hrs"],
    ),
    spec(
        "hourly_rate",
        Money,
        &["hourly rate", "hourly wage", "average wage", "avg wage", "rate per hour", "pay rate", "wage rate"],
        &["per hour", "an hour", "/hr", "/hour", "hourly"],
    ),
    spec(
        "previous_sales",
        Money,
        &["previous sales", "prior sales", "prior period sales", "last month(?:'s)? sales", "last week(?:'s)? sales"],
        &[],
    ),
    spec("prime_cost", Money, &["prime costs?", "total prime cost"], &[]),
    spec(
        "overtime_hours",
        Number,
        &["overtime hours", "ot hours", "overtime"],
        &["overtime hours", "hours of overtime", "ot hours"],
    ),
    spec(
        "covers",
        Count,
        &["covers", "guest count", "guests served", "customer count"],
        &["covers", "guests", "customers served"],
    ),
    spec("avg_check", Money, &["average check", "avg check", "check average"], &[]),
    spec("waste_cost", Money, &["waste costs?", "food waste"], &[]),
    spec(
        "target_labor_percent",
        Percent,
        &["target labor percent(?:age)?", "labor target", "target labor(?: cost)?(?: percentage)?"],
        &["labor target", "target labor"],
    ),
    spec(
        "target_food_percent",
        Percent,
        &["target food cost percent(?:age)?", "food cost target", "target food(?: cost)?(?: percentage)?"],
        &[],
    ),
    spec(
        "target_prime_percent",
        Percent,
        &["prime cost target", "target prime(?: cost)?(?: percentage)?"],
        &["prime target", "prime cost target"],
    ),
    // HR
    spec(
        "turnover_rate",
        Percent,
        &["turnover rate", "staff turnover", "employee turnover", "turnover"],
        &["turnover"],
    ),
    spec("industry_average", Percent, &["industry (?:average|avg)", "industry benchmark"], &[]),
    spec(
        "employee_count",
        Count,
        &["employee count", "employees", "staff count", "headcount", "team size"],
        &["employees", "staff members", "team members"],
    ),
    spec(
        "customer_satisfaction",
        Number,
        &["customer satisfaction(?: score)?", "guest satisfaction", "csat"],
        &[],
    ),
    spec("sales_performance", Percent, &["sales performance"], &[]),
    spec("efficiency_score", Number, &["efficiency score", "efficiency rating", "efficiency"], &[]),
    spec("attendance_rate", Percent, &["attendance rate", "attendance"], &["attendance"]),
    // Beverage
    spec(
        "expected_oz",
        Number,
        &["expected (?:oz|ounces)", "expected usage", "theoretical usage"],
        &["(?:oz|ounces) expected"],
    ),
    spec(
        "actual_oz",
        Number,
        &["actual (?:oz|ounces)", "actual usage", "ounces used", "oz used"],
        &["(?:oz|ounces) used"],
    ),
    spec("liquor_cost", Money, &["liquor costs?", "bar costs?", "beverage costs?", "pour cost"], &[]),
    spec(
        "current_stock",
        Number,
        &["current stock", "stock on hand", "current inventory", "on hand"],
        &["on hand", "in stock"],
    ),
    spec("reorder_point", Number, &["reorder point", "reorder level", "par level"], &[]),
    spec("monthly_usage", Number, &["monthly usage", "usage per month"], &["per month"]),
    spec("inventory_value", Money, &["inventory value", "value of inventory", "inventory worth"], &[]),
    spec("drink_price", Money, &["drink price", "price per drink", "cocktail price", "selling price"], &[]),
    spec("cost_per_drink", Money, &["cost per drink", "drink cost", "pour cost per drink"], &[]),
    spec(
        "sales_volume",
        Number,
        &["sales volume", "drinks sold", "units sold"],
        &["drinks sold", "units sold", "drinks per (?:week|month|night)"],
    ),
    spec(
        "competitor_price",
        Money,
        &["competitor(?:'s)? price", "competitor pricing", "competition price"],
        &[],
    ),
    // Menu
    spec("item_sales", Number, &["item sales"], &[]),
    spec("item_cost", Money, &["item cost", "cost per item", "plate cost"], &[]),
    spec("item_profit", Money, &["item profit", "profit per item"], &[]),
    spec("item_price", Money, &["item price", "menu price", "price per item"], &[]),
    spec(
        "menu_items",
        Count,
        &["menu items", "number of items", "item count"],
        &["menu items", "items on (?:the|my|our) menu"],
    ),
    spec("high_profit_items", Count, &["high profit items"], &["high profit items"]),
    spec("sales_distribution", Percent, &["sales distribution"], &[]),
    spec("visual_hierarchy", Number, &["visual hierarchy(?: score)?"], &[]),
    spec(
        "target_food_cost",
        Percent,
        &["target food cost", "food cost goal"],
        &["food cost(?: target| goal)?"],
    ),
    // Recipe
    spec(
        "servings",
        Count,
        &["servings", "portions", "yield", "serves"],
        &["servings", "portions"],
    ),
    spec(
        "ingredient_cost",
        Money,
        &["ingredient costs?", "cost of ingredients", "ingredients cost"],
        &["in ingredients", "of ingredients", "for ingredients"],
    ),
    spec("portion_cost", Money, &["portion costs?", "cost per portion", "cost per serving"], &["per portion", "per serving"]),
    spec(
        "recipe_price",
        Money,
        &["recipe price", "sells? for", "selling price of (?:the|this) (?:recipe|dish)"],
        &[],
    ),
    spec("current_cost", Money, &["current cost", "current supplier cost", "current price"], &[]),
    spec("supplier_cost", Money, &["supplier costs?", "new supplier (?:cost|price)", "vendor (?:cost|price)"], &[]),
    spec("waste_percentage", Percent, &["waste percentage", "waste rate", "waste"], &["waste"]),
    spec("quality_score", Number, &["quality score"], &[]),
    spec("current_batch", Number, &["current batch(?: size)?", "batch size", "original batch"], &[]),
    spec("target_batch", Number, &["target batch(?: size)?", "new batch(?: size)?", "scale (?:it |this |recipe )?to"], &[]),
    spec("yield_percentage", Percent, &["yield percentage", "yield rate"], &["yield"]),
    spec("consistency_score", Number, &["consistency score", "consistency"], &[]),
    // Strategic
    spec(
        "historical_sales",
        Money,
        &["historical sales", "past sales", "last year(?:'s)? sales"],
        &[],
    ),
    spec("current_sales", Money, &["current sales", "this year(?:'s)? sales", "current revenue"], &[]),
    spec("growth_rate", Percent, &["growth rate", "annual growth", "growth"], &["growth"]),
    spec("seasonal_factor", Number, &["seasonal factor", "seasonality(?: factor)?"], &[]),
    spec("market_size", Money, &["market size", "total addressable market", "tam"], &[]),
    spec("market_share", Percent, &["market share"], &["market share", "of the market"]),
    spec("competition_level", Number, &["competition level", "competitive intensity", "competition"], &[]),
    spec("investment_budget", Money, &["investment budget", "capital budget", "investment"], &[]),
    spec("expansion_cost", Money, &["expansion costs?", "cost of expansion", "build-?out cost"], &[]),
    spec(
        "projected_revenue",
        Money,
        &["projected revenue", "revenue projection", "expected revenue", "forecast revenue"],
        &["in projected revenue"],
    ),
    spec("process_time", Number, &["process time", "processing time", "ticket time", "cycle time"], &[]),
    spec("quality_rating", Number, &["quality rating"], &[]),
    spec(
        "revenue_target",
        Money,
        &["revenue target", "target revenue", "revenue goal", "sales target", "sales goal"],
        &["revenue target", "in target revenue"],
    ),
    spec(
        "budget_total",
        Money,
        &["total budget", "budget total", "overall budget", "annual budget", "(?:my|our) budget"],
        &["total budget", "budget total"],
    ),
    spec(
        "marketing_spend",
        Money,
        &["marketing spend", "marketing budget", "marketing costs?", "advertising(?: spend| budget)?", "marketing"],
        &["on marketing", "for marketing", "in marketing"],
    ),
    spec(
        "staffing_cost",
        Money,
        &["staffing costs?", "staffing budget", "staff costs?", "hiring costs?"],
        &["on staffing", "for staffing", "in staffing"],
    ),
    spec("timeline_months", Count, &["timeline", "time-?frame"], &["months?", "month timeline"]),
    // Dashboard
    spec("current_performance", Percent, &["current performance"], &[]),
    spec("target_performance", Percent, &["target performance", "performance target", "performance goal"], &[]),
    spec("optimization_potential", Percent, &["optimization potential", "improvement potential"], &[]),
];

/// Menu categories recognised in free text, with their canonical spelling.
pub static CATEGORY_FILTERS: &[(&str, &str)] = &[
    (r"\b(?:appetizers?|starters?)\b", "Appetizers"),
    (r"\b(?:main course|main courses|entrees?|entrées?|mains)\b", "Main Course"),
    (r"\bdesserts?\b", "Desserts"),
    (r"\b(?:beverages?|drinks)\b", "Beverages"),
];

/// Phrasings that carry a recipe name, applied to the original casing.
pub static RECIPE_NAME_PATTERNS: &[&str] = &[
    r#"(?i)recipe[\s_-]*name\s*[:=]\s*"?([^"\n,.;]{2,60})"#,
    r#"(?i)recipe\s+(?:for|called|named)\s+"?([A-Za-z][A-Za-z '&-]{1,59}?)"?\s*(?:[,.;:?!\n]|$|\bwith\b|\bthat\b|\bwhich\b|\bcosts?\b|\bserves?\b|\bfor\b)"#,
    r"(?i)(?:cost|costing|price|scale)\s+(?:out\s+)?(?:my|the|our)\s+([A-Za-z][A-Za-z '&-]{1,40}?)\s+recipe\b",
];

pub fn find_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|s| s.name == name)
}
