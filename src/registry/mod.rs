pub mod keys;
pub mod registry;

pub use keys::{HookSelectionKey, VoidHookKey};
pub use registry::{HookRegistry, RegistryStats, VoidHookRecord};
