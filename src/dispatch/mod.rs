pub mod dispatcher;
pub mod result;

pub use dispatcher::HookDispatcher;
pub use result::{HookDispatchResult, ProcessedHook};
