//! RestoIQ Tasks: analysis handlers and startup registration.

pub mod beverage;
pub mod common;
pub mod dashboard;
pub mod hr;
pub mod kpi;
pub mod menu;
pub mod recipe;
pub mod startup;
pub mod strategic;

pub use startup::{catalog, default_registry, register_defaults, STARTUP_TASKS};
