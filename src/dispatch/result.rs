use crate::hooks::{HookMetadata, SaveHook};
use std::fmt;
use std::sync::Arc;

/// A hook that handled at least one entry during a dispatch
#[derive(Clone)]
pub struct ProcessedHook {
    pub metadata: Arc<HookMetadata>,
    pub instance: Arc<dyn SaveHook>,
    /// Number of entries the hook handled
    pub entries: usize,
}

impl fmt::Debug for ProcessedHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessedHook")
            .field("implementation", &self.metadata.implementation)
            .field("entries", &self.entries)
            .finish()
    }
}

/// What a dispatch did.
///
/// `any_state_changed` is only ever set by the pre-save stage.
#[derive(Debug, Clone, Default)]
pub struct HookDispatchResult {
    pub processed_hooks: Vec<ProcessedHook>,
    pub any_state_changed: bool,
}

impl HookDispatchResult {
    pub fn is_empty(&self) -> bool {
        self.processed_hooks.is_empty()
    }

    pub fn contains(&self, implementation: &str) -> bool {
        self.processed_hooks
            .iter()
            .any(|hook| hook.metadata.implementation == implementation)
    }

    /// Implementations in the order they first handled an entry
    pub fn implementations(&self) -> Vec<&'static str> {
        self.processed_hooks
            .iter()
            .map(|hook| hook.metadata.implementation)
            .collect()
    }
}
