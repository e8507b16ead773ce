// ============================================================================
// Hooked Entity
// ============================================================================
//
// The view a hook gets of one changed entity. Created fresh for every commit
// attempt and discarded once the stage completes.
//
// ============================================================================

use super::{Entity, EntityKey, TrackedEntry};
use crate::core::{EntityState, Result, TypeInfo};
use serde_json::Value;
use std::fmt;

pub struct HookedEntity {
    context_type: TypeInfo,
    entry: Box<dyn TrackedEntry>,
    initial_state: EntityState,
}

impl HookedEntity {
    /// Wrap a tracked entry; its current state becomes the initial state
    pub fn new(context_type: TypeInfo, entry: impl TrackedEntry + 'static) -> Self {
        Self::from_boxed(context_type, Box::new(entry))
    }

    pub fn from_boxed(context_type: TypeInfo, entry: Box<dyn TrackedEntry>) -> Self {
        let initial_state = entry.state();
        Self {
            context_type,
            entry,
            initial_state,
        }
    }

    /// Unit-of-work implementation this change belongs to
    pub fn context_type(&self) -> TypeInfo {
        self.context_type
    }

    pub fn entity(&self) -> &dyn Entity {
        self.entry.entity()
    }

    /// Downcast the wrapped entity to its concrete type
    pub fn entity_as<T: Entity>(&self) -> Option<&T> {
        self.entity().as_any().downcast_ref::<T>()
    }

    pub fn entity_type(&self) -> TypeInfo {
        self.entity().entity_type()
    }

    pub fn key(&self) -> Option<EntityKey> {
        self.entity().key()
    }

    pub fn is_transient(&self) -> bool {
        self.key().is_none()
    }

    /// State observed when the current stage began
    pub fn initial_state(&self) -> EntityState {
        self.initial_state
    }

    pub fn state(&self) -> EntityState {
        self.entry.state()
    }

    pub fn set_state(&mut self, state: EntityState) {
        self.entry.set_state(state);
    }

    pub fn has_state_changed(&self) -> bool {
        self.state() != self.initial_state
    }

    pub(crate) fn sync_initial_state(&mut self) {
        self.initial_state = self.entry.state();
    }

    /// True only for `Modified` entries whose field differs from its original snapshot.
    ///
    /// Added entries have no meaningful original values, so every field would
    /// otherwise read as modified.
    pub fn is_field_modified(&self, field: &str) -> bool {
        if self.state() != EntityState::Modified {
            return false;
        }
        self.entry.original_value(field) != self.entry.current_value(field)
    }

    /// Names of all modified fields; empty unless the entry is `Modified`
    pub fn modified_fields(&self) -> Vec<String> {
        if self.state() != EntityState::Modified {
            return Vec::new();
        }
        let mut fields: Vec<String> = self
            .entry
            .field_names()
            .into_iter()
            .filter(|name| self.is_field_modified(name))
            .collect();
        fields.sort();
        fields
    }

    pub fn is_soft_deleted(&self) -> bool {
        let Some(flag) = self.entity().soft_delete_field() else {
            return false;
        };
        match self.state() {
            EntityState::Deleted => true,
            EntityState::Modified => {
                self.is_field_modified(flag)
                    && self.entry.current_value(flag) == Some(Value::Bool(true))
            }
            _ => false,
        }
    }

    pub fn current_value(&self, field: &str) -> Option<Value> {
        self.entry.current_value(field)
    }

    pub fn original_value(&self, field: &str) -> Option<Value> {
        self.entry.original_value(field)
    }

    pub fn set_current_value(&mut self, field: &str, value: Value) -> Result<()> {
        self.entry.set_current_value(field, value)
    }
}

impl fmt::Debug for HookedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookedEntity")
            .field("context_type", &self.context_type.name())
            .field("entity_type", &self.entity_type().name())
            .field("key", &self.key())
            .field("initial_state", &self.initial_state)
            .field("state", &self.state())
            .finish()
    }
}
