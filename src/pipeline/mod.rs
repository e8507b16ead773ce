// ============================================================================
// Save Pipeline
// ============================================================================
//
// Runs hooks around the commit of a host unit of work.
//
// ============================================================================

pub mod save;
pub mod unit_of_work;

pub use save::{SaveChangesOperation, SaveChangesResult};
pub use unit_of_work::UnitOfWork;
