// ============================================================================
// Save Hooks
// ============================================================================
//
// The hook contract, its static metadata and the activators that turn
// metadata into live instances.
//
// ============================================================================

pub mod activator;
pub mod hook;
pub mod metadata;

pub use activator::{HookActivator, HookContainer, HookFactory, HookScope};
pub use hook::{HookResult, SaveHook};
pub use metadata::HookMetadata;
