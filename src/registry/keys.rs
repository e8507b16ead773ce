use crate::core::{EntityState, HookStage, TypeInfo};
use std::fmt;

/// Cache key for the ordered hook selection of one entity/context/state/stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookSelectionKey {
    pub entity_type: TypeInfo,
    pub context_type: TypeInfo,
    pub state: EntityState,
    pub stage: HookStage,
}

impl HookSelectionKey {
    pub fn new(
        entity_type: TypeInfo,
        context_type: TypeInfo,
        state: EntityState,
        stage: HookStage,
    ) -> Self {
        Self {
            entity_type,
            context_type,
            state,
            stage,
        }
    }

    /// Whether a void record for this combination affects this selection
    pub(crate) fn covers(&self, void_key: &VoidHookKey) -> bool {
        self.entity_type == void_key.entity_type
            && self.state == void_key.state
            && self.stage == void_key.stage
    }
}

/// A hook known never to apply to an entity type in a given state and stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoidHookKey {
    pub implementation: &'static str,
    pub entity_type: TypeInfo,
    pub state: EntityState,
    pub stage: HookStage,
}

impl VoidHookKey {
    pub fn new(
        implementation: &'static str,
        entity_type: TypeInfo,
        state: EntityState,
        stage: HookStage,
    ) -> Self {
        Self {
            implementation,
            entity_type,
            state,
            stage,
        }
    }
}

impl fmt::Display for VoidHookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}:{}@{}",
            self.implementation, self.entity_type, self.state, self.stage
        )
    }
}
