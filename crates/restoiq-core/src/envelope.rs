//! Uniform result envelope returned by every dispatch.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Envelope schema version used when no configuration overrides it.
pub const DEFAULT_ENVELOPE_VERSION: &str = "1.0.0";

/// HTTP-equivalent status code attached to an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const INTERNAL_ERROR: StatusCode = StatusCode(500);

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub version: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
}

impl EnvelopeMeta {
    pub fn now(version: &str) -> Self {
        Self {
            version: version.to_string(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// `{service, subtask, status, data | error, meta}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub service: String,
    pub subtask: String,
    pub status: EnvelopeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Parameters the handler ran with (success only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insights: Vec<String>,
    /// Sorted registry keys, attached to not-found errors.
    #[serde(rename = "knownTasks", default, skip_serializing_if = "Option::is_none")]
    pub known_tasks: Option<Vec<String>>,
    /// Missing required fields, attached to validation errors.
    #[serde(rename = "missingFields", default, skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
    #[serde(rename = "correlationId", default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub meta: EnvelopeMeta,
}

impl ResultEnvelope {
    pub fn success(service: &str, subtask: &str, data: serde_json::Value, version: &str) -> Self {
        Self {
            service: service.to_string(),
            subtask: subtask.to_string(),
            status: EnvelopeStatus::Success,
            data: Some(data),
            error: None,
            params: None,
            insights: Vec::new(),
            known_tasks: None,
            missing_fields: None,
            correlation_id: None,
            meta: EnvelopeMeta::now(version),
        }
    }

    pub fn error(service: &str, subtask: &str, message: impl Into<String>, version: &str) -> Self {
        Self {
            service: service.to_string(),
            subtask: subtask.to_string(),
            status: EnvelopeStatus::Error,
            data: None,
            error: Some(message.into()),
            params: None,
            insights: Vec::new(),
            known_tasks: None,
            missing_fields: None,
            correlation_id: None,
            meta: EnvelopeMeta::now(version),
        }
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_insights(mut self, insights: Vec<String>) -> Self {
        self.insights = insights;
        self
    }

    pub fn with_known_tasks(mut self, keys: Vec<String>) -> Self {
        self.known_tasks = Some(keys);
        self
    }

    pub fn with_missing_fields(mut self, fields: Vec<String>) -> Self {
        self.missing_fields = Some(fields);
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == EnvelopeStatus::Success
    }

    /// `"service.subtask"` registry key this envelope belongs to.
    pub fn task_key(&self) -> String {
        format!("{}.{}", self.service, self.subtask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let env = ResultEnvelope::success(
            "kpi",
            "prime_cost",
            serde_json::json!({"prime_percent": 58.0}),
            DEFAULT_ENVELOPE_VERSION,
        );
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["service"], "kpi");
        assert_eq!(json["subtask"], "prime_cost");
        assert_eq!(json["status"], "success");
        assert!(json["data"].is_object());
        assert!(json.get("error").is_none());
        assert_eq!(json["meta"]["version"], "1.0.0");
        assert!(json["meta"]["generatedAt"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_error_shape() {
        let env = ResultEnvelope::error("kpi", "nonexistent", "Task kpi.nonexistent not found", "2.0.0")
            .with_known_tasks(vec!["kpi.food_cost".into(), "kpi.labor_cost".into()]);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json["error"].is_string());
        assert!(json.get("data").is_none());
        assert_eq!(json["knownTasks"].as_array().unwrap().len(), 2);
        assert_eq!(json["meta"]["version"], "2.0.0");
        assert_eq!(env.task_key(), "kpi.nonexistent");
    }

    #[test]
    fn test_status_codes() {
        assert!(StatusCode::OK.is_success());
        assert!(!StatusCode::NOT_FOUND.is_success());
        assert_eq!(StatusCode::INTERNAL_ERROR.as_u16(), 500);
    }
}
