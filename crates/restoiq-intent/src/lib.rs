//! RestoIQ Intent: decides which analysis operation a query asks for.

pub mod classifier;
pub mod derived;
pub mod guidance;
pub mod intent;
pub mod operations;
pub mod resolver;

pub use classifier::{classify_keywords, extract_parameters, suggest_follow_ups, KeywordMatch};
pub use guidance::Guidance;
pub use intent::{Intent, Resolution, ResolutionLayer, ResolvedIntent};
pub use operations::{find_operation, Operation, OPERATIONS};
pub use resolver::IntentResolver;
