//! Compile-time table from handler location to entry points.

use std::collections::BTreeMap;

use crate::task::HandlerFn;

/// Entry point name used when a registration does not name one.
pub const DEFAULT_ENTRYPOINT: &str = "run";

/// `location → entrypoint → handler`, e.g. `tasks::kpi::labor_cost` / `run`.
#[derive(Default, Clone)]
pub struct HandlerCatalog {
    locations: BTreeMap<&'static str, BTreeMap<&'static str, HandlerFn>>,
}

impl HandlerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, location: &'static str, entrypoint: &'static str, handler: HandlerFn) -> Self {
        self.insert(location, entrypoint, handler);
        self
    }

    pub fn insert(&mut self, location: &'static str, entrypoint: &'static str, handler: HandlerFn) {
        self.locations
            .entry(location)
            .or_default()
            .insert(entrypoint, handler);
    }

    pub fn has_location(&self, location: &str) -> bool {
        self.locations.contains_key(location)
    }

    /// Look up a handler; `None` if either the location or the entry point is unknown.
    pub fn resolve(&self, location: &str, entrypoint: &str) -> Option<HandlerFn> {
        self.locations.get(location)?.get(entrypoint).copied()
    }

    pub fn locations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.locations.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.locations.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl std::fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.locations
                    .iter()
                    .map(|(loc, entries)| (loc, entries.keys().collect::<Vec<_>>())),
            )
            .finish()
    }
}
