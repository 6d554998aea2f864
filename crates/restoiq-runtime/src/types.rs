//! Runtime types.

use restoiq_core::{ResultEnvelope, StatusCode};
use restoiq_intent::{Guidance, KeywordMatch, ResolvedIntent};
use serde::Serialize;

/// What a single pipeline run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// An operation was resolved and its handler ran.
    Dispatched {
        intent: ResolvedIntent,
        envelope: ResultEnvelope,
        status: StatusCode,
    },
    /// An override named an operation whose inputs are missing.
    NeedMoreData(Guidance),
    /// Nothing to dispatch; the keyword classifier's best guess for a
    /// conversational follow-up.
    NoIntent {
        suggestion: KeywordMatch,
        #[serde(rename = "followUps")]
        follow_ups: Vec<&'static str>,
    },
}

impl PipelineOutcome {
    pub fn envelope(&self) -> Option<&ResultEnvelope> {
        match self {
            Self::Dispatched { envelope, .. } => Some(envelope),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Dispatched { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `"service.subtask"` of the dispatched task, if any.
    pub fn task_key(&self) -> Option<String> {
        self.envelope().map(ResultEnvelope::task_key)
    }
}

/// Answer to a menu question routed through the keyword classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionAnswer {
    pub suggestion: KeywordMatch,
    pub envelope: ResultEnvelope,
    pub status: StatusCode,
    #[serde(rename = "followUps")]
    pub follow_ups: Vec<&'static str>,
}
