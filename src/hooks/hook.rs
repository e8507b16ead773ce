use crate::core::Result;
use crate::entry::HookedEntity;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Outcome of a single hook invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResult {
    /// The hook handled the entry
    Ok,
    /// The hook never applies to this entity type, state and stage.
    ///
    /// The combination is recorded and never dispatched again for the
    /// lifetime of the registry.
    Void,
}

/// Interceptor invoked around the commit of a unit of work.
///
/// Every method has a default, so a hook only implements the stages it cares
/// about; the defaults report [`HookResult::Void`] and the engine stops calling
/// them after the first attempt.
#[async_trait]
pub trait SaveHook: Send + Sync {
    /// Called for each matching entry before changes are persisted.
    ///
    /// Changing the entry state here (e.g. `Deleted` to `Unchanged`) is observed
    /// by the dispatcher and reported back to the commit.
    async fn on_before_save(
        &self,
        _entry: &mut HookedEntity,
        _cancel: &CancellationToken,
    ) -> Result<HookResult> {
        Ok(HookResult::Void)
    }

    /// Called for each matching entry after changes were persisted
    async fn on_after_save(
        &self,
        _entry: &mut HookedEntity,
        _cancel: &CancellationToken,
    ) -> Result<HookResult> {
        Ok(HookResult::Void)
    }

    /// Called once per batch with every entry this hook handled before saving
    async fn on_before_save_completed(
        &self,
        _entries: &[&HookedEntity],
        _cancel: &CancellationToken,
    ) -> Result<()> {
        Ok(())
    }

    /// Called once per batch with every entry this hook handled after saving
    async fn on_after_save_completed(
        &self,
        _entries: &[&HookedEntity],
        _cancel: &CancellationToken,
    ) -> Result<()> {
        Ok(())
    }
}
