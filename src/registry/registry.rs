// ============================================================================
// Hook Registry
// ============================================================================
//
// Process-wide view of registered hooks. Answers "which hooks apply to this
// entity, in this state, at this stage" and remembers hooks that turned out
// to be void so they are never dispatched for that combination again.
//
// Both the selection cache and the void set live behind one reader-writer
// lock. Lookups take a shared lock; a miss escalates through an upgradable
// read so concurrent misses on the same key build the entry only once.
//
// ============================================================================

use super::{HookSelectionKey, VoidHookKey};
use crate::core::{EntityState, HookError, HookImportance, HookStage, Result, TypeInfo};
use crate::entry::HookedEntity;
use crate::hooks::HookMetadata;
use chrono::{DateTime, Utc};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

type Selection = Arc<[Arc<HookMetadata>]>;

#[derive(Default)]
struct RegistryState {
    selections: HashMap<HookSelectionKey, Selection>,
    void_hooks: HashMap<VoidHookKey, DateTime<Utc>>,
}

/// Point-in-time counters of the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub registered_hooks: usize,
    pub cached_selections: usize,
    pub void_hooks: usize,
}

/// A recorded void combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoidHookRecord {
    pub key: VoidHookKey,
    pub registered_at: DateTime<Utc>,
}

pub struct HookRegistry {
    /// Sorted by `order`; ties keep registration order
    hooks: Vec<Arc<HookMetadata>>,
    implementations: HashSet<&'static str>,
    state: RwLock<RegistryState>,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::from_unique(Vec::new())
    }
}

impl HookRegistry {
    /// Build a registry over `metadata`.
    ///
    /// Void records are keyed by implementation name, so each implementation
    /// may appear only once.
    pub fn new(metadata: impl IntoIterator<Item = HookMetadata>) -> Result<Self> {
        let metadata: Vec<HookMetadata> = metadata.into_iter().collect();
        let mut seen = HashSet::with_capacity(metadata.len());
        for meta in &metadata {
            if !seen.insert(meta.implementation) {
                return Err(HookError::ContractViolation(format!(
                    "Hook '{}' is registered more than once",
                    meta.implementation
                )));
            }
        }
        Ok(Self::from_unique(metadata))
    }

    /// Caller guarantees implementation names are unique
    pub(crate) fn from_unique(metadata: Vec<HookMetadata>) -> Self {
        let mut hooks: Vec<Arc<HookMetadata>> = metadata.into_iter().map(Arc::new).collect();
        hooks.sort_by_key(|meta| meta.order);
        let implementations = hooks.iter().map(|meta| meta.implementation).collect();

        Self {
            hooks,
            implementations,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// All registered metadata in dispatch order
    pub fn metadata(&self) -> &[Arc<HookMetadata>] {
        &self.hooks
    }

    /// Whether any hook at or above `min_importance` is registered.
    ///
    /// Callers use this to skip building change views altogether.
    pub fn has_hooks(&self, min_importance: HookImportance) -> bool {
        self.hooks
            .iter()
            .any(|meta| meta.importance >= min_importance)
    }

    /// Hooks applicable to an entity type, ordered ascending by `order`.
    ///
    /// Void combinations are never returned. Above the default floor only hooks
    /// with `importance >= min_importance` are kept.
    pub fn select_hooks(
        &self,
        entity_type: TypeInfo,
        context_type: TypeInfo,
        state: EntityState,
        stage: HookStage,
        min_importance: HookImportance,
    ) -> Vec<Arc<HookMetadata>> {
        let key = HookSelectionKey::new(entity_type, context_type, state, stage);

        let cached = self.state.read().selections.get(&key).cloned();
        let selection = match cached {
            Some(selection) => selection,
            None => self.populate(key),
        };

        if min_importance > HookImportance::Normal {
            selection
                .iter()
                .filter(|meta| meta.importance >= min_importance)
                .cloned()
                .collect()
        } else {
            selection.to_vec()
        }
    }

    /// Shorthand for selecting by a hooked entity's type, context and initial state
    pub fn select_for(
        &self,
        entry: &HookedEntity,
        stage: HookStage,
        min_importance: HookImportance,
    ) -> Vec<Arc<HookMetadata>> {
        self.select_hooks(
            entry.entity_type(),
            entry.context_type(),
            entry.initial_state(),
            stage,
            min_importance,
        )
    }

    fn populate(&self, key: HookSelectionKey) -> Selection {
        let state = self.state.upgradable_read();
        // Another caller may have built it while we waited
        if let Some(selection) = state.selections.get(&key) {
            return Arc::clone(selection);
        }

        let selection: Selection = self
            .hooks
            .iter()
            .filter(|meta| meta.applies_to(&key.entity_type, &key.context_type))
            .filter(|meta| {
                let void_key =
                    VoidHookKey::new(meta.implementation, key.entity_type, key.state, key.stage);
                !state.void_hooks.contains_key(&void_key)
            })
            .cloned()
            .collect();

        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        state.selections.insert(key, Arc::clone(&selection));
        selection
    }

    /// Record that `metadata` never applies to the entry's type in its initial
    /// state at `stage`.
    ///
    /// Returns `false` if the combination was already recorded.
    pub fn register_void_hook(
        &self,
        metadata: &HookMetadata,
        entry: &HookedEntity,
        stage: HookStage,
    ) -> Result<bool> {
        self.register_void(VoidHookKey::new(
            metadata.implementation,
            entry.entity_type(),
            entry.initial_state(),
            stage,
        ))
    }

    pub fn register_void(&self, key: VoidHookKey) -> Result<bool> {
        if !self.implementations.contains(key.implementation) {
            return Err(HookError::ContractViolation(format!(
                "Hook '{}' is not registered",
                key.implementation
            )));
        }

        let mut state = self.state.write();
        if state.void_hooks.contains_key(&key) {
            return Ok(false);
        }
        state.void_hooks.insert(key, Utc::now());

        for (selection_key, selection) in state.selections.iter_mut() {
            if !selection_key.covers(&key)
                || !selection
                    .iter()
                    .any(|meta| meta.implementation == key.implementation)
            {
                continue;
            }
            *selection = selection
                .iter()
                .filter(|meta| meta.implementation != key.implementation)
                .cloned()
                .collect();
        }

        Ok(true)
    }

    pub fn is_void(
        &self,
        implementation: &'static str,
        entity_type: TypeInfo,
        state: EntityState,
        stage: HookStage,
    ) -> bool {
        let key = VoidHookKey::new(implementation, entity_type, state, stage);
        self.state.read().void_hooks.contains_key(&key)
    }

    /// Recorded void combinations, oldest first
    pub fn void_hooks(&self) -> Vec<VoidHookRecord> {
        let mut records: Vec<VoidHookRecord> = self
            .state
            .read()
            .void_hooks
            .iter()
            .map(|(key, registered_at)| VoidHookRecord {
                key: *key,
                registered_at: *registered_at,
            })
            .collect();
        records.sort_by_key(|record| record.registered_at);
        records
    }

    pub fn stats(&self) -> RegistryStats {
        let state = self.state.read();
        RegistryStats {
            registered_hooks: self.hooks.len(),
            cached_selections: state.selections.len(),
            void_hooks: state.void_hooks.len(),
        }
    }
}
