// ============================================================================
// Change Tracking Entries
// ============================================================================
//
// `TrackedEntry` is the seam to the host's change tracker: one entry per
// entity in a unit of work, exposing its state and field snapshots.
// `ChangeEntry` is a self-contained implementation for hosts that track
// changes themselves.
//
// ============================================================================

use super::Entity;
use crate::core::{EntityState, Result};
use serde_json::{Map, Value};

/// One entity as seen by the host's change tracker
pub trait TrackedEntry: Send + Sync {
    fn entity(&self) -> &dyn Entity;

    fn state(&self) -> EntityState;

    /// Writes must reach the host's tracker so the commit observes them
    fn set_state(&mut self, state: EntityState);

    fn current_value(&self, field: &str) -> Option<Value>;

    fn original_value(&self, field: &str) -> Option<Value>;

    fn field_names(&self) -> Vec<String>;

    fn set_current_value(&mut self, field: &str, value: Value) -> Result<()>;
}

/// In-memory change entry with original and current field snapshots
#[derive(Debug)]
pub struct ChangeEntry {
    entity: Box<dyn Entity>,
    state: EntityState,
    original: Map<String, Value>,
    current: Map<String, Value>,
}

impl ChangeEntry {
    pub fn new(
        entity: impl Entity,
        state: EntityState,
        original: Map<String, Value>,
        current: Map<String, Value>,
    ) -> Self {
        Self {
            entity: Box::new(entity),
            state,
            original,
            current,
        }
    }

    /// A newly added entity; it has no original snapshot
    pub fn added(entity: impl Entity, current: Map<String, Value>) -> Self {
        Self::new(entity, EntityState::Added, Map::new(), current)
    }

    pub fn modified(
        entity: impl Entity,
        original: Map<String, Value>,
        current: Map<String, Value>,
    ) -> Self {
        Self::new(entity, EntityState::Modified, original, current)
    }

    pub fn deleted(entity: impl Entity, original: Map<String, Value>) -> Self {
        let current = original.clone();
        Self::new(entity, EntityState::Deleted, original, current)
    }

    pub fn unchanged(entity: impl Entity, values: Map<String, Value>) -> Self {
        let current = values.clone();
        Self::new(entity, EntityState::Unchanged, values, current)
    }
}

impl TrackedEntry for ChangeEntry {
    fn entity(&self) -> &dyn Entity {
        self.entity.as_ref()
    }

    fn state(&self) -> EntityState {
        self.state
    }

    fn set_state(&mut self, state: EntityState) {
        self.state = state;
    }

    fn current_value(&self, field: &str) -> Option<Value> {
        self.current.get(field).cloned()
    }

    fn original_value(&self, field: &str) -> Option<Value> {
        self.original.get(field).cloned()
    }

    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.current.keys().cloned().collect();
        for name in self.original.keys() {
            if !self.current.contains_key(name) {
                names.push(name.clone());
            }
        }
        names
    }

    fn set_current_value(&mut self, field: &str, value: Value) -> Result<()> {
        self.current.insert(field.to_string(), value);
        Ok(())
    }
}
