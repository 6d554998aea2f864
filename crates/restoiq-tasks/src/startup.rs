//! Handler catalogue and the ordered startup registrations.

use restoiq_dispatch::{HandlerCatalog, TaskRegistry, TaskSpec, DEFAULT_ENTRYPOINT as RUN};
use tracing::{info, warn};

use crate::{beverage, dashboard, hr, kpi, menu, recipe, strategic};

/// Every handler this crate provides, keyed by location.
pub fn catalog() -> HandlerCatalog {
    HandlerCatalog::new()
        .with("tasks::kpi::labor_cost", RUN, kpi::labor_cost)
        .with("tasks::kpi::food_cost", RUN, kpi::food_cost)
        .with("tasks::kpi::prime_cost", RUN, kpi::prime_cost)
        .with("tasks::kpi::sales_performance", RUN, kpi::sales_performance)
        .with("tasks::hr::staff_retention", RUN, hr::staff_retention)
        .with("tasks::hr::labor_scheduling", RUN, hr::labor_scheduling)
        .with("tasks::hr::performance_management", RUN, hr::performance_management)
        .with("tasks::beverage::liquor_cost", RUN, beverage::liquor_cost)
        .with("tasks::beverage::inventory", RUN, beverage::inventory)
        .with("tasks::beverage::pricing", RUN, beverage::pricing)
        .with("tasks::menu::product_mix", RUN, menu::product_mix)
        .with("tasks::menu::pricing", RUN, menu::pricing)
        .with("tasks::menu::design", RUN, menu::design)
        .with("tasks::menu::questions", RUN, menu::questions)
        .with("tasks::recipe::costing", RUN, recipe::costing)
        .with("tasks::recipe::ingredient_optimization", RUN, recipe::ingredient_optimization)
        .with("tasks::recipe::scaling", RUN, recipe::scaling)
        .with("tasks::strategic::sales_forecasting", RUN, strategic::sales_forecasting)
        .with("tasks::strategic::growth", RUN, strategic::growth_strategy)
        .with("tasks::strategic::operational", RUN, strategic::operational_excellence)
        .with("tasks::strategic::business_goals", RUN, strategic::business_goals)
        .with("tasks::strategic::planning", RUN, strategic::planning_sequence)
        .with("tasks::strategic::swot", RUN, strategic::swot)
        .with("tasks::dashboard::comprehensive", RUN, dashboard::comprehensive_analysis)
        .with("tasks::dashboard::optimization", RUN, dashboard::performance_optimization)
}

/// Registration order at process start.
pub static STARTUP_TASKS: &[TaskSpec] = &[
    // KPI
    TaskSpec::new("kpi", "labor_cost", "tasks::kpi::labor_cost").entitled(),
    TaskSpec::new("kpi", "food_cost", "tasks::kpi::food_cost").entitled(),
    TaskSpec::new("kpi", "prime_cost", "tasks::kpi::prime_cost").entitled(),
    TaskSpec::new("kpi", "sales_performance", "tasks::kpi::sales_performance").entitled(),
    // HR
    TaskSpec::new("hr", "staff_retention", "tasks::hr::staff_retention"),
    TaskSpec::new("hr", "labor_scheduling", "tasks::hr::labor_scheduling"),
    TaskSpec::new("hr", "performance_management", "tasks::hr::performance_management"),
    // Beverage
    TaskSpec::new("beverage", "liquor_cost", "tasks::beverage::liquor_cost"),
    TaskSpec::new("beverage", "inventory", "tasks::beverage::inventory"),
    TaskSpec::new("beverage", "pricing", "tasks::beverage::pricing"),
    // Menu
    TaskSpec::new("menu", "product_mix", "tasks::menu::product_mix"),
    TaskSpec::new("menu", "pricing", "tasks::menu::pricing"),
    TaskSpec::new("menu", "design", "tasks::menu::design"),
    TaskSpec::new("menu", "questions", "tasks::menu::questions"),
    // Recipe
    TaskSpec::new("recipe", "costing", "tasks::recipe::costing"),
    TaskSpec::new("recipe", "ingredient_optimization", "tasks::recipe::ingredient_optimization"),
    TaskSpec::new("recipe", "scaling", "tasks::recipe::scaling"),
    // Strategic
    TaskSpec::new("strategic", "sales_forecasting", "tasks::strategic::sales_forecasting"),
    TaskSpec::new("strategic", "growth_strategy", "tasks::strategic::growth"),
    TaskSpec::new("strategic", "operational_excellence", "tasks::strategic::operational"),
    TaskSpec::new("strategic", "business_goals", "tasks::strategic::business_goals"),
    TaskSpec::new("strategic", "planning_sequence", "tasks::strategic::planning"),
    TaskSpec::new("strategic", "swot", "tasks::strategic::swot"),
    // Dashboard
    TaskSpec::new("kpi_dashboard", "comprehensive_analysis", "tasks::dashboard::comprehensive"),
    TaskSpec::new("kpi_dashboard", "performance_optimization", "tasks::dashboard::optimization"),
];

/// Register [`STARTUP_TASKS`]; failures are logged and skipped.
pub fn register_defaults(registry: &mut TaskRegistry) -> usize {
    let registered = registry.register_all(STARTUP_TASKS);
    if registered < STARTUP_TASKS.len() {
        warn!(
            "{} of {} startup tasks failed to register",
            STARTUP_TASKS.len() - registered,
            STARTUP_TASKS.len()
        );
    }
    info!("Registered {} startup tasks", registered);
    registered
}

/// Fresh registry over [`catalog`] with the startup tasks registered.
pub fn default_registry(lock: bool) -> TaskRegistry {
    let mut registry = TaskRegistry::new(catalog());
    register_defaults(&mut registry);
    if lock {
        registry.lock();
    }
    registry
}
