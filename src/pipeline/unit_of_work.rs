use crate::core::{Result, TypeInfo};
use crate::entry::HookedEntity;
use async_trait::async_trait;

/// The host's persistence context, as seen by the save pipeline.
///
/// Implement this over your ORM session or change tracker to run hooks around
/// its commits.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Implementation type of this context; hooks may be scoped to it
    fn context_type(&self) -> TypeInfo;

    /// Entries with pending changes, wrapped for hooking
    fn changed_entries(&mut self) -> Vec<HookedEntity>;

    /// Persist the given entries and return how many were written
    async fn commit(&mut self, entries: &mut [HookedEntity]) -> Result<usize>;
}
