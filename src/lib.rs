// ============================================================================
// SaveHook Library
// ============================================================================
//
// Dispatches entity changes of a unit of work to registered save hooks,
// before and after the commit.
//
// ============================================================================

pub mod config;
pub mod core;
pub mod dispatch;
pub mod entry;
pub mod hooks;
pub mod pipeline;
pub mod prelude;
pub mod registry;

pub use config::HookingConfig;
pub use crate::core::{
    EntityState, HookError, HookImportance, HookStage, Result, TypeFilter, TypeInfo,
};
pub use dispatch::{HookDispatchResult, HookDispatcher, ProcessedHook};
pub use entry::{ChangeEntry, Entity, EntityKey, HookedEntity, KeyPart, TrackedEntry};
pub use hooks::{
    HookActivator, HookContainer, HookFactory, HookMetadata, HookResult, HookScope, SaveHook,
};
pub use pipeline::{SaveChangesOperation, SaveChangesResult, UnitOfWork};
pub use registry::{HookRegistry, HookSelectionKey, RegistryStats, VoidHookKey, VoidHookRecord};

// Re-exported so hosts implement hooks against the same versions
pub use async_trait::async_trait;
pub use tokio_util::sync::CancellationToken;
