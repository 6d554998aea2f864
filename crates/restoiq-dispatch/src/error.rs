//! Handler failure types.

use thiserror::Error;

/// Failure raised inside a task handler.
///
/// Validation problems are normally turned into a 400 envelope by the
/// handler itself; anything that escapes as `Err` becomes a 500.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("At least one of {} is required", .0.join(", "))]
    NeedsOneOf(Vec<String>),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{0}")]
    Internal(String),
}

impl TaskError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Caller-side input problem, reported as 400 rather than 500.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }

    /// Fields the caller should supply, if the error names any.
    pub fn fields(&self) -> Vec<String> {
        match self {
            Self::MissingFields(f) | Self::NeedsOneOf(f) => f.clone(),
            Self::InvalidValue { field, .. } => vec![field.clone()],
            Self::Internal(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = TaskError::MissingFields(vec!["total_sales".into(), "labor_cost".into()]);
        assert_eq!(e.to_string(), "Missing required fields: total_sales, labor_cost");
        let e = TaskError::invalid("turnover_rate", "must be at most 200");
        assert_eq!(e.to_string(), "Invalid value for turnover_rate: must be at most 200");
        assert!(e.is_validation());
        assert_eq!(e.fields(), vec!["turnover_rate"]);
        let e = TaskError::NeedsOneOf(vec!["current_stock".into(), "monthly_usage".into()]);
        assert_eq!(e.to_string(), "At least one of current_stock, monthly_usage is required");
        assert!(!TaskError::Internal("boom".into()).is_validation());
    }
}
