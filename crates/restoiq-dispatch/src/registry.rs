//! Task registry with an open registration phase and a locked serving phase.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::catalog::{HandlerCatalog, DEFAULT_ENTRYPOINT};
use crate::task::HandlerFn;

/// Lifecycle of a [`TaskRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryState {
    Open,
    Locked,
}

/// One row of the startup registration list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub service: &'static str,
    pub subtask: &'static str,
    pub location: &'static str,
    pub entrypoint: &'static str,
    pub requires_entitlement: bool,
}

impl TaskSpec {
    pub const fn new(service: &'static str, subtask: &'static str, location: &'static str) -> Self {
        Self {
            service,
            subtask,
            location,
            entrypoint: DEFAULT_ENTRYPOINT,
            requires_entitlement: false,
        }
    }

    pub const fn entitled(mut self) -> Self {
        self.requires_entitlement = true;
        self
    }

    pub const fn entrypoint(mut self, entrypoint: &'static str) -> Self {
        self.entrypoint = entrypoint;
        self
    }
}

/// A registered, callable analysis.
#[derive(Clone, Serialize)]
pub struct AnalysisTask {
    pub service: String,
    pub subtask: String,
    pub location: String,
    pub entrypoint: String,
    /// Recorded for the transport layer; not enforced here.
    pub requires_entitlement: bool,
    #[serde(skip)]
    pub handler: HandlerFn,
}

impl AnalysisTask {
    pub fn key(&self) -> String {
        format!("{}.{}", self.service, self.subtask)
    }
}

impl std::fmt::Debug for AnalysisTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisTask")
            .field("key", &self.key())
            .field("location", &self.location)
            .field("entrypoint", &self.entrypoint)
            .field("requires_entitlement", &self.requires_entitlement)
            .finish()
    }
}

/// Keyed `"service.subtask"` → task, resolved against a [`HandlerCatalog`].
#[derive(Debug)]
pub struct TaskRegistry {
    catalog: HandlerCatalog,
    state: RegistryState,
    tasks: BTreeMap<String, AnalysisTask>,
}

impl TaskRegistry {
    pub fn new(catalog: HandlerCatalog) -> Self {
        Self {
            catalog,
            state: RegistryState::Open,
            tasks: BTreeMap::new(),
        }
    }

    /// Register `service.subtask` against `location`/`entrypoint`.
    ///
    /// Returns false, leaving the registry untouched, when the registry is
    /// locked or the handler does not resolve. Re-registering an existing
    /// key while open replaces it.
    pub fn register(
        &mut self,
        service: &str,
        subtask: &str,
        location: &str,
        entrypoint: Option<&str>,
    ) -> bool {
        self.insert(service, subtask, location, entrypoint.unwrap_or(DEFAULT_ENTRYPOINT), false)
    }

    pub fn register_spec(&mut self, spec: &TaskSpec) -> bool {
        self.insert(
            spec.service,
            spec.subtask,
            spec.location,
            spec.entrypoint,
            spec.requires_entitlement,
        )
    }

    /// Register every spec in order; returns how many succeeded.
    pub fn register_all(&mut self, specs: &[TaskSpec]) -> usize {
        specs.iter().filter(|spec| self.register_spec(spec)).count()
    }

    fn insert(
        &mut self,
        service: &str,
        subtask: &str,
        location: &str,
        entrypoint: &str,
        requires_entitlement: bool,
    ) -> bool {
        let key = format!("{}.{}", service, subtask);
        if self.state == RegistryState::Locked {
            warn!("Task registry is locked. Cannot register {}", key);
            return false;
        }
        if !self.catalog.has_location(location) {
            error!("Failed to register {}: unknown handler location {}", key, location);
            return false;
        }
        let Some(handler) = self.catalog.resolve(location, entrypoint) else {
            error!("Failed to register {}: entrypoint {} not found in {}", key, entrypoint, location);
            return false;
        };

        let task = AnalysisTask {
            service: service.to_string(),
            subtask: subtask.to_string(),
            location: location.to_string(),
            entrypoint: entrypoint.to_string(),
            requires_entitlement,
            handler,
        };
        if self.tasks.insert(key.clone(), task).is_some() {
            info!("Re-registered task: {}", key);
        } else {
            info!("Registered task: {}", key);
        }
        true
    }

    /// Reject all further registrations.
    pub fn lock(&mut self) {
        if self.state == RegistryState::Open {
            self.state = RegistryState::Locked;
            info!("Task registry locked with {} tasks", self.tasks.len());
        }
    }

    pub fn is_locked(&self) -> bool {
        self.state == RegistryState::Locked
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn get(&self, service: &str, subtask: &str) -> Option<&AnalysisTask> {
        self.tasks.get(&format!("{}.{}", service, subtask))
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.tasks.keys().cloned().collect()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &AnalysisTask> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
