pub mod error;
pub mod types;

pub use error::{HookError, Result};
pub use types::{EntityState, HookImportance, HookStage, TypeFilter, TypeInfo};
