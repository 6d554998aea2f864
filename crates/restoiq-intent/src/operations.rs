//! Static catalogue of analysis operations.

use serde::Serialize;

/// One routable analysis operation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Operation {
    pub service: &'static str,
    pub subtask: &'static str,
    /// Human-readable title used in guidance text.
    pub title: &'static str,
    pub category: &'static str,
    /// Fields counted by field-presence scoring.
    pub required: &'static [&'static str],
    /// How many of `required` must be present and positive.
    pub minimum: usize,
    pub optional: &'static [&'static str],
    /// Lower-cased phrases; any one appearing in the query makes the operation eligible.
    pub keywords: &'static [&'static str],
    pub example: &'static str,
    /// Whether the operation needs numeric inputs at all.
    pub numeric: bool,
}

impl Operation {
    /// `"service.subtask"` registry key.
    pub fn key(&self) -> String {
        format!("{}.{}", self.service, self.subtask)
    }

    pub fn is(&self, service: &str, subtask: &str) -> bool {
        self.service == service && self.subtask == subtask
    }

    /// Whether any keyword phrase occurs in the lower-cased query.
    pub fn keyword_hit(&self, lower: &str) -> bool {
        self.keywords.iter().any(|k| lower.contains(k))
    }
}

/// Priority used to break scoring ties. Prime cost subsumes labor and food.
pub const TIE_BREAK_PRIORITY: &[(&str, &str)] = &[
    ("kpi", "prime_cost"),
    ("kpi", "sales_performance"),
    ("kpi", "labor_cost"),
    ("kpi", "food_cost"),
];

pub static OPERATIONS: &[Operation] = &[
    Operation {
        service: "kpi",
        subtask: "labor_cost",
        title: "Labor Cost Analysis",
        category: "financial",
        required: &["total_sales", "labor_cost", "hours_worked"],
        minimum: 2,
        optional: &["target_labor_percent", "overtime_hours", "covers"],
        keywords: &["labor cost", "labour cost", "labor percent", "labor %", "payroll"],
        example: "Analyze my labor cost. Total sales: $50,000, labor cost: $15,000, hours worked: 1,200",
        numeric: true,
    },
    Operation {
        service: "kpi",
        subtask: "food_cost",
        title: "Food Cost Analysis",
        category: "financial",
        required: &["total_sales", "food_cost"],
        minimum: 2,
        optional: &["target_food_percent", "waste_cost"],
        keywords: &["food cost", "food percent", "food %", "cogs", "cost of goods"],
        example: "Calculate my food cost. Total sales: $50,000, food cost: $14,000",
        numeric: true,
    },
    Operation {
        service: "kpi",
        subtask: "prime_cost",
        title: "Prime Cost Analysis",
        category: "financial",
        required: &["total_sales", "labor_cost", "food_cost"],
        minimum: 3,
        optional: &["target_prime_percent", "covers"],
        keywords: &["prime cost", "prime percent", "prime %"],
        example: "Analyze my prime cost. Total sales: $50,000, labor cost: $15,000, food cost: $14,000",
        numeric: true,
    },
    Operation {
        service: "kpi",
        subtask: "sales_performance",
        title: "Sales Performance Analysis",
        category: "financial",
        required: &["total_sales", "labor_cost", "food_cost", "hours_worked"],
        minimum: 2,
        optional: &["previous_sales", "covers", "avg_check"],
        keywords: &["sales performance", "sales analysis", "analyze my sales", "analyze sales", "sales report"],
        example: "Show me my sales performance. Total sales: $50,000, labor cost: $15,000, food cost: $14,000, 1,200 hours",
        numeric: true,
    },
    Operation {
        service: "hr",
        subtask: "staff_retention",
        title: "Staff Retention Analysis",
        category: "workforce",
        required: &["turnover_rate"],
        minimum: 1,
        optional: &["industry_average", "employee_count"],
        keywords: &["retention", "turnover", "retain staff", "keep my staff"],
        example: "Analyze my staff retention. Turnover rate: 65%, industry average: 70%",
        numeric: true,
    },
    Operation {
        service: "hr",
        subtask: "labor_scheduling",
        title: "Labor Scheduling Analysis",
        category: "workforce",
        required: &["total_sales", "hourly_rate", "hours_worked"],
        minimum: 2,
        optional: &["employee_count", "overtime_hours"],
        keywords: &["schedul", "shift plan", "staffing level"],
        example: "Help with labor scheduling. Total sales: $40,000, hourly rate: $16, hours worked: 900",
        numeric: true,
    },
    Operation {
        service: "hr",
        subtask: "performance_management",
        title: "Performance Management Analysis",
        category: "workforce",
        required: &["customer_satisfaction", "sales_performance", "efficiency_score", "attendance_rate"],
        minimum: 1,
        optional: &["employee_count"],
        keywords: &["performance management", "staff performance", "employee performance", "performance review"],
        example: "Review staff performance. Customer satisfaction: 4.2, efficiency score: 82, attendance rate: 95%",
        numeric: true,
    },
    Operation {
        service: "beverage",
        subtask: "liquor_cost",
        title: "Liquor Cost Analysis",
        category: "beverage",
        required: &["expected_oz", "actual_oz", "liquor_cost"],
        minimum: 1,
        optional: &["total_sales"],
        keywords: &["liquor", "pour cost", "bar cost", "beverage cost", "liquor variance"],
        example: "Check my liquor variance. Expected oz: 1,000, actual oz: 1,080",
        numeric: true,
    },
    Operation {
        service: "beverage",
        subtask: "inventory",
        title: "Bar Inventory Analysis",
        category: "beverage",
        required: &["current_stock", "reorder_point", "monthly_usage", "inventory_value"],
        minimum: 1,
        optional: &[],
        keywords: &["inventory", "stock level", "reorder", "par level", "on hand"],
        example: "Analyze my bar inventory. Current stock: 120, reorder point: 40, monthly usage: 300",
        numeric: true,
    },
    Operation {
        service: "beverage",
        subtask: "pricing",
        title: "Beverage Pricing Analysis",
        category: "beverage",
        required: &["drink_price", "cost_per_drink", "sales_volume", "competitor_price"],
        minimum: 1,
        optional: &[],
        keywords: &["drink pric", "beverage pric", "cocktail pric", "bar pric"],
        example: "Review my drink pricing. Drink price: $12, cost per drink: $2.50, competitor price: $13",
        numeric: true,
    },
    Operation {
        service: "menu",
        subtask: "product_mix",
        title: "Menu Product Mix Analysis",
        category: "menu",
        required: &[],
        minimum: 0,
        optional: &["item_sales", "item_cost", "item_profit", "category_filter"],
        keywords: &["product mix", "menu engineering", "menu analysis", "analyze menu", "menu mix"],
        example: "Run a product mix analysis on my menu",
        numeric: false,
    },
    Operation {
        service: "menu",
        subtask: "pricing",
        title: "Menu Pricing Analysis",
        category: "menu",
        required: &["item_price", "item_cost"],
        minimum: 1,
        optional: &["target_food_cost", "competitor_price"],
        keywords: &["menu pric", "pricing strategy", "underpriced", "overpriced", "price my menu"],
        example: "Review my menu pricing. Item price: $18, item cost: $5.40, 30% food cost target",
        numeric: true,
    },
    Operation {
        service: "menu",
        subtask: "design",
        title: "Menu Design Analysis",
        category: "menu",
        required: &[],
        minimum: 0,
        optional: &["menu_items", "high_profit_items", "visual_hierarchy"],
        keywords: &["menu design", "menu layout", "golden triangle", "visual hierarchy", "placement"],
        example: "Give me menu design recommendations for my 40 menu items",
        numeric: false,
    },
    Operation {
        service: "recipe",
        subtask: "costing",
        title: "Recipe Costing",
        category: "culinary",
        required: &["ingredient_cost", "portion_cost", "recipe_price"],
        minimum: 1,
        optional: &["recipe_name", "servings"],
        keywords: &["recipe cost", "cost out", "costing", "plate cost", "recipe"],
        example: "Cost out my Chicken Parmesan recipe. Ingredient cost: $24, servings: 6, recipe price: $18",
        numeric: true,
    },
    Operation {
        service: "recipe",
        subtask: "scaling",
        title: "Recipe Scaling",
        category: "culinary",
        required: &["current_batch", "target_batch", "yield_percentage", "consistency_score"],
        minimum: 1,
        optional: &["recipe_name", "servings"],
        keywords: &["scale", "scaling", "batch size"],
        example: "Scale my marinara recipe. Current batch: 10, target batch: 25",
        numeric: true,
    },
    Operation {
        service: "recipe",
        subtask: "ingredient_optimization",
        title: "Ingredient Optimization",
        category: "culinary",
        required: &["current_cost", "supplier_cost", "waste_percentage", "quality_score"],
        minimum: 1,
        optional: &["recipe_name"],
        keywords: &["ingredient optim", "supplier", "vendor", "ingredient waste", "sourcing"],
        example: "Optimize my ingredients. Current cost: $4.20, supplier cost: $3.80, waste: 8%",
        numeric: true,
    },
    Operation {
        service: "strategic",
        subtask: "sales_forecasting",
        title: "Sales Forecasting",
        category: "strategy",
        required: &["historical_sales", "current_sales", "growth_rate"],
        minimum: 1,
        optional: &["seasonal_factor"],
        keywords: &["forecast", "projection", "predict"],
        example: "Forecast my sales. Current sales: $60,000, growth rate: 5%",
        numeric: true,
    },
    Operation {
        service: "strategic",
        subtask: "growth_strategy",
        title: "Growth Strategy Analysis",
        category: "strategy",
        required: &["market_size", "market_share", "competition_level", "investment_budget"],
        minimum: 1,
        optional: &["expansion_cost", "projected_revenue"],
        keywords: &["growth", "expansion", "expand", "new location"],
        example: "Plan my growth strategy. Market size: $2,000,000, market share: 5%, investment budget: $150,000",
        numeric: true,
    },
    Operation {
        service: "strategic",
        subtask: "operational_excellence",
        title: "Operational Excellence Analysis",
        category: "strategy",
        required: &["efficiency_score", "process_time", "quality_rating", "customer_satisfaction"],
        minimum: 1,
        optional: &[],
        keywords: &["operational", "operations", "efficiency"],
        example: "Assess my operational excellence. Efficiency score: 78, ticket time: 14, quality rating: 4.5",
        numeric: true,
    },
    Operation {
        service: "strategic",
        subtask: "business_goals",
        title: "Business Goals Analysis",
        category: "strategy",
        required: &["revenue_target", "budget_total", "marketing_spend", "staffing_cost"],
        minimum: 1,
        optional: &["timeline_months"],
        keywords: &["business goal", "goals", "revenue target", "revenue goal", "budget"],
        example: "Review my business goals. Revenue target: $500,000, total budget: $120,000, timeline: 12 months",
        numeric: true,
    },
    Operation {
        service: "strategic",
        subtask: "planning_sequence",
        title: "Strategic Planning Sequence",
        category: "strategy",
        required: &[],
        minimum: 0,
        optional: &[],
        keywords: &["best way", "sequence", "roadmap", "step by step", "where do i start"],
        example: "What is the best way to grow my restaurant, step by step?",
        numeric: false,
    },
    Operation {
        service: "strategic",
        subtask: "swot",
        title: "SWOT Analysis",
        category: "strategy",
        required: &[],
        minimum: 0,
        optional: &[],
        keywords: &["swot", "strengths", "weaknesses", "opportunities", "threats"],
        example: "Run a SWOT analysis for my restaurant",
        numeric: false,
    },
    Operation {
        service: "kpi_dashboard",
        subtask: "comprehensive_analysis",
        title: "Comprehensive KPI Analysis",
        category: "dashboard",
        required: &["total_sales", "labor_cost", "food_cost"],
        minimum: 1,
        optional: &["hours_worked", "hourly_rate", "previous_sales", "covers", "avg_check"],
        keywords: &["comprehensive", "dashboard", "overall performance", "full analysis", "kpi"],
        example: "Give me a comprehensive KPI analysis. Total sales: $50,000, labor cost: $15,000, food cost: $14,000",
        numeric: true,
    },
    Operation {
        service: "kpi_dashboard",
        subtask: "performance_optimization",
        title: "Performance Optimization",
        category: "dashboard",
        required: &["current_performance", "target_performance", "optimization_potential"],
        minimum: 1,
        optional: &["efficiency_score"],
        keywords: &["performance optim", "optimize performance", "improve performance"],
        example: "Optimize performance. Current performance: 72%, target performance: 85%",
        numeric: true,
    },
];

/// Look up an operation by service and subtask.
pub fn find_operation(service: &str, subtask: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.is(service, subtask))
}

/// Tie-break rank; unlisted operations rank after listed ones in declaration order.
pub fn priority_rank(op: &Operation) -> usize {
    TIE_BREAK_PRIORITY
        .iter()
        .position(|(s, t)| op.is(s, t))
        .unwrap_or(TIE_BREAK_PRIORITY.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use restoiq_core::is_canonical;

    #[test]
    fn test_catalogue_size_and_keys() {
        assert_eq!(OPERATIONS.len(), 23);
        let mut keys: Vec<String> = OPERATIONS.iter().map(Operation::key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 23);
    }

    #[test]
    fn test_fields_are_canonical() {
        for op in OPERATIONS {
            for field in op.required.iter().chain(op.optional) {
                assert!(is_canonical(field), "{} uses unknown field {}", op.key(), field);
            }
            assert!(op.minimum <= op.required.len(), "{}", op.key());
            assert!(!op.keywords.is_empty(), "{}", op.key());
            assert!(op.keywords.iter().all(|k| *k == k.to_lowercase()));
        }
    }

    #[test]
    fn test_non_numeric_operations() {
        let non_numeric: Vec<String> = OPERATIONS
            .iter()
            .filter(|op| !op.numeric)
            .map(Operation::key)
            .collect();
        assert!(non_numeric.contains(&"strategic.planning_sequence".to_string()));
        assert!(non_numeric.contains(&"strategic.swot".to_string()));
    }

    #[test]
    fn test_priority_rank() {
        let prime = find_operation("kpi", "prime_cost").unwrap();
        let food = find_operation("kpi", "food_cost").unwrap();
        let swot = find_operation("strategic", "swot").unwrap();
        assert!(priority_rank(prime) < priority_rank(food));
        assert_eq!(priority_rank(swot), TIE_BREAK_PRIORITY.len());
    }
}
