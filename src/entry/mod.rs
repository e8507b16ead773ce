// ============================================================================
// Entity Change Views
// ============================================================================
//
// Adapters between the host's change tracker and the hook engine.
//
// ============================================================================

pub mod entity;
pub mod hooked;
pub mod tracked;

pub use entity::{Entity, EntityKey, KeyPart};
pub use hooked::HookedEntity;
pub use tracked::{ChangeEntry, TrackedEntry};
