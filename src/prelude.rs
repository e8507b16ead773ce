//! Everything needed to write hooks and wire the engine into a host.
//!
//! `hooks` is the surface for hook authors; `host` adds the pieces a
//! composition root uses to register hooks and run hooked saves.

pub mod hooks {
    //! Writing save hooks.
    pub use crate::{
        CancellationToken, EntityState, HookError, HookResult, HookedEntity, Result, SaveHook,
        async_trait,
    };
}

pub mod host {
    //! Registering hooks and dispatching changes.
    pub use crate::{
        ChangeEntry, Entity, EntityKey, HookContainer, HookDispatcher, HookImportance,
        HookMetadata, HookRegistry, HookScope, HookingConfig, SaveChangesOperation, TrackedEntry,
        TypeFilter, TypeInfo, UnitOfWork,
    };
}
