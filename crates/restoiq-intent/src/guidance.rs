//! "Need more data" guidance for operations whose inputs are missing.

use restoiq_core::FieldMap;
use serde::Serialize;

use crate::operations::Operation;

/// Canonical guidance returned instead of dispatching.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Guidance {
    pub service: String,
    pub subtask: String,
    pub title: String,
    pub message: String,
    pub required_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    /// Required fields not present with a positive value.
    pub missing_fields: Vec<String>,
    pub example: String,
}

impl Guidance {
    pub fn for_operation(op: &Operation, fields: &FieldMap) -> Self {
        let missing: Vec<String> = op
            .required
            .iter()
            .filter(|f| !fields.is_positive(f))
            .map(|f| f.to_string())
            .collect();
        let need = op.minimum.max(1);
        let mut message = format!(
            "To run {} I need at least {} of: {}.",
            op.title,
            need,
            op.required.join(", ")
        );
        if !op.optional.is_empty() {
            message.push_str(&format!(" Optional: {}.", op.optional.join(", ")));
        }
        message.push_str(&format!(" For example: \"{}\"", op.example));

        Self {
            service: op.service.to_string(),
            subtask: op.subtask.to_string(),
            title: op.title.to_string(),
            message,
            required_fields: op.required.iter().map(|f| f.to_string()).collect(),
            optional_fields: op.optional.iter().map(|f| f.to_string()).collect(),
            missing_fields: missing,
            example: op.example.to_string(),
        }
    }
}

impl std::fmt::Display for Guidance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::find_operation;
    use restoiq_core::FieldValue;

    #[test]
    fn test_guidance_lists_missing_fields() {
        let op = find_operation("kpi", "prime_cost").unwrap();
        let mut fields = FieldMap::new();
        fields.insert_if_absent("total_sales", FieldValue::Number(50000.0));
        let g = Guidance::for_operation(op, &fields);
        assert_eq!(g.missing_fields, vec!["labor_cost", "food_cost"]);
        assert!(g.message.starts_with("To run Prime Cost Analysis I need at least 3 of"));
        assert!(g.message.contains("Optional: target_prime_percent, covers."));
        assert!(g.message.contains(op.example));
    }
}
