use crate::core::{HookImportance, TypeFilter, TypeInfo};
use std::fmt;

/// Static description of a save hook implementation.
///
/// Assembled once when hooks are registered and shared for the lifetime of
/// the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HookMetadata {
    /// Name of the implementing type; identifies the hook in caches and logs
    pub implementation: &'static str,
    /// Entities the hook accepts
    pub hooked_type: TypeFilter,
    /// Unit-of-work implementations the hook is scoped to
    pub context_type: TypeFilter,
    /// Hooks run in ascending order within a stage
    pub order: i32,
    pub importance: HookImportance,
}

impl HookMetadata {
    pub fn new(implementation: &'static str, hooked_type: TypeFilter) -> Self {
        Self {
            implementation,
            hooked_type,
            context_type: TypeFilter::Any,
            order: 0,
            importance: HookImportance::Normal,
        }
    }

    /// Metadata named after the Rust type implementing the hook
    pub fn of<H: ?Sized + 'static>(hooked_type: TypeFilter) -> Self {
        Self::new(std::any::type_name::<H>(), hooked_type)
    }

    pub fn for_context(mut self, context_type: TypeFilter) -> Self {
        self.context_type = context_type;
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_importance(mut self, importance: HookImportance) -> Self {
        self.importance = importance;
        self
    }

    /// Whether the hook is structurally able to handle this entity in this context
    pub fn applies_to(&self, entity_type: &TypeInfo, context_type: &TypeInfo) -> bool {
        self.hooked_type.matches(entity_type) && self.context_type.matches(context_type)
    }
}

impl fmt::Display for HookMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} in {}, order {}, {})",
            self.implementation, self.hooked_type, self.context_type, self.order, self.importance
        )
    }
}
