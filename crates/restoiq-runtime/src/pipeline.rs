//! Pipeline: extract → resolve → dispatch.

use restoiq_core::{FieldMap, PipelineConfig, ResultEnvelope, StatusCode};
use restoiq_dispatch::{Dispatcher, RequestArgs, TaskContext, TaskRegistry};
use restoiq_extract::FieldExtractor;
use restoiq_intent::{
    classify_keywords, extract_parameters, suggest_follow_ups, IntentResolver, Resolution,
};
use tracing::{debug, info, info_span};

use crate::types::{PipelineOutcome, QuestionAnswer};

const QUESTIONS_SERVICE: &str = "menu";
const QUESTIONS_SUBTASK: &str = "questions";

/// Owns one extractor, one resolver and one dispatcher.
///
/// Every stage is read-only after construction, so a shared `&Pipeline`
/// can serve concurrent queries.
pub struct Pipeline {
    config: PipelineConfig,
    extractor: FieldExtractor,
    resolver: IntentResolver,
    dispatcher: Dispatcher,
}

impl Pipeline {
    /// Build over an explicit registry, locking it when configured to.
    pub fn new(config: PipelineConfig, mut registry: TaskRegistry) -> Self {
        if config.lock_registry_after_startup && !registry.is_locked() {
            registry.lock();
        }
        info!(
            "Pipeline initialized: tasks={}, locked={}, envelope_version={}",
            registry.len(),
            registry.is_locked(),
            config.envelope_version
        );
        let context = TaskContext::from_config(&config);
        Self {
            extractor: FieldExtractor::new(config.max_query_len),
            resolver: IntentResolver::new(),
            dispatcher: Dispatcher::new(registry, context),
            config,
        }
    }

    /// Build over the startup registrations.
    pub fn with_defaults(config: PipelineConfig) -> Self {
        Self::new(config, restoiq_tasks::default_registry(false))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &TaskRegistry {
        self.dispatcher.registry()
    }

    /// Mutable registry access; registrations are refused once locked.
    pub fn registry_mut(&mut self) -> &mut TaskRegistry {
        self.dispatcher.registry_mut()
    }

    /// Run one query end to end.
    pub fn run(&self, query: &str, session_id: Option<&str>) -> PipelineOutcome {
        let span = info_span!("pipeline", session_id = session_id.unwrap_or("-"));
        let _guard = span.enter();

        let extraction = self.extractor.extract(query);
        debug!(
            "Extracted {} fields (marker={:?}, phrase={}, tabular={}, positional={})",
            extraction.fields.len(),
            extraction.marker,
            extraction.passes.phrase_fields,
            extraction.passes.tabular_fields,
            extraction.passes.positional_fields
        );

        match self
            .resolver
            .resolve(&extraction.text, &extraction.fields, extraction.marker)
        {
            Resolution::Dispatch(intent) => {
                let (envelope, status) = self.dispatcher.execute(
                    &intent.intent.target_service,
                    &intent.intent.target_subtask,
                    &intent.params,
                    None,
                );
                info!(
                    "Dispatched {} via {} -> {}",
                    intent.intent.task_key(),
                    intent.layer,
                    status
                );
                PipelineOutcome::Dispatched {
                    intent,
                    envelope,
                    status,
                }
            }
            Resolution::NeedMoreData(guidance) => {
                info!(
                    "Need more data for {}.{}: missing {:?}",
                    guidance.service, guidance.subtask, guidance.missing_fields
                );
                PipelineOutcome::NeedMoreData(guidance)
            }
            Resolution::NoMatch => {
                let suggestion = classify_keywords(&extraction.text);
                debug!(
                    "No intent; keyword suggestion {} ({:.2})",
                    suggestion.intent, suggestion.confidence
                );
                PipelineOutcome::NoIntent {
                    follow_ups: suggest_follow_ups(suggestion.intent),
                    suggestion,
                }
            }
        }
    }

    /// Dispatch a task directly, bypassing extraction and resolution.
    pub fn execute(
        &self,
        service: &str,
        subtask: &str,
        params: &FieldMap,
        bytes: Option<&[u8]>,
    ) -> (ResultEnvelope, StatusCode) {
        self.dispatcher.execute(service, subtask, params, bytes)
    }

    /// Route a conversational menu question to `menu.questions`.
    ///
    /// Returns `None` when the keyword classifier does not recognise one
    /// of the menu questions.
    pub fn ask(&self, query: &str, session_id: Option<&str>) -> Option<QuestionAnswer> {
        let span = info_span!("ask", session_id = session_id.unwrap_or("-"));
        let _guard = span.enter();

        let extraction = self.extractor.extract(query);
        let suggestion = classify_keywords(&extraction.text);
        let question = suggestion.question.filter(|_| suggestion.confidence > 0.0)?;

        let mut params = extraction.fields;
        params.merge_absent(extract_parameters(&extraction.text));
        let mut args = RequestArgs::new();
        args.insert("question".to_string(), question.to_string());

        let (envelope, status) = self.dispatcher.execute_with_args(
            QUESTIONS_SERVICE,
            QUESTIONS_SUBTASK,
            &params,
            &args,
            None,
        );
        debug!("Answered menu question {:?} -> {}", question, status);
        Some(QuestionAnswer {
            follow_ups: suggest_follow_ups(suggestion.intent),
            suggestion,
            envelope,
            status,
        })
    }
}
