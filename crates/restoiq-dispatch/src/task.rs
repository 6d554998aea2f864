//! Handler signature and the request a handler receives.

use std::collections::BTreeMap;

use restoiq_core::envelope::DEFAULT_ENVELOPE_VERSION;
use restoiq_core::{DefaultTargets, FieldMap, PipelineConfig, ResultEnvelope, StatusCode};

use crate::error::TaskError;

pub type TaskResult = Result<(ResultEnvelope, StatusCode), TaskError>;

/// A registered analysis entry point.
pub type HandlerFn = fn(&TaskRequest<'_>) -> TaskResult;

/// Request-level arguments that are not extracted fields, such as the menu
/// question being asked.
pub type RequestArgs = BTreeMap<String, String>;

pub(crate) static NO_ARGS: RequestArgs = BTreeMap::new();

/// Settings shared by every handler invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskContext {
    pub envelope_version: String,
    pub targets: DefaultTargets,
}

impl Default for TaskContext {
    fn default() -> Self {
        Self {
            envelope_version: DEFAULT_ENVELOPE_VERSION.to_string(),
            targets: DefaultTargets::default(),
        }
    }
}

impl TaskContext {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            envelope_version: config.envelope_version.clone(),
            targets: config.default_targets.clone(),
        }
    }
}

/// Everything a handler gets for one call.
pub struct TaskRequest<'a> {
    pub service: &'a str,
    pub subtask: &'a str,
    pub params: &'a FieldMap,
    pub args: &'a RequestArgs,
    /// Optional raw upload (CSV and the like); most handlers ignore it.
    pub bytes: Option<&'a [u8]>,
    pub context: &'a TaskContext,
}

impl<'a> TaskRequest<'a> {
    /// Success envelope echoing the params this call ran with.
    pub fn success(&self, data: serde_json::Value) -> ResultEnvelope {
        ResultEnvelope::success(self.service, self.subtask, data, &self.context.envelope_version)
            .with_params(self.params.to_json())
    }

    pub fn error(&self, message: impl Into<String>) -> ResultEnvelope {
        ResultEnvelope::error(self.service, self.subtask, message, &self.context.envelope_version)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.params.number(field)
    }

    /// Non-blank request argument.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}
