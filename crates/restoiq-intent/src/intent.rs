//! Resolved intents and the outcome of resolution.

use restoiq_core::FieldMap;
use serde::Serialize;

use crate::guidance::Guidance;
use crate::operations::Operation;

/// The operation a query resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub name: String,
    pub confidence: f64,
    pub service_category: String,
    pub target_service: String,
    pub target_subtask: String,
    pub required_fields: Vec<String>,
}

impl Intent {
    pub fn for_operation(op: &Operation, confidence: f64) -> Self {
        Self {
            name: format!("{}_analysis", op.subtask),
            confidence: confidence.clamp(0.0, 1.0),
            service_category: op.category.to_string(),
            target_service: op.service.to_string(),
            target_subtask: op.subtask.to_string(),
            required_fields: op.required.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn task_key(&self) -> String {
        format!("{}.{}", self.target_service, self.target_subtask)
    }
}

/// Precedence layer that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionLayer {
    Override,
    Marker,
    Scoring,
}

impl std::fmt::Display for ResolutionLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Override => write!(f, "override"),
            Self::Marker => write!(f, "marker"),
            Self::Scoring => write!(f, "scoring"),
        }
    }
}

/// A dispatchable decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedIntent {
    pub intent: Intent,
    pub layer: ResolutionLayer,
    /// Extracted fields handed to the handler.
    pub params: FieldMap,
    /// Metrics computed during resolution. Reported with the decision but
    /// never merged into `params`.
    pub derived: FieldMap,
}

/// Outcome of intent resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Dispatch(ResolvedIntent),
    /// An override named an operation whose inputs are missing.
    NeedMoreData(Guidance),
    NoMatch,
}

impl Resolution {
    pub fn resolved(&self) -> Option<&ResolvedIntent> {
        match self {
            Self::Dispatch(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::find_operation;

    #[test]
    fn test_intent_for_operation() {
        let op = find_operation("kpi", "prime_cost").unwrap();
        let intent = Intent::for_operation(op, 1.5);
        assert_eq!(intent.name, "prime_cost_analysis");
        assert_eq!(intent.confidence, 1.0);
        assert_eq!(intent.task_key(), "kpi.prime_cost");
        assert_eq!(intent.required_fields.len(), 3);

        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["targetService"], "kpi");
        assert_eq!(json["serviceCategory"], "financial");
    }
}
