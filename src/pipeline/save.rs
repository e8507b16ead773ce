// ============================================================================
// Save Changes Operation
// ============================================================================
//
// One hooked commit of a unit of work:
//
//   changed entries -> pre-save hooks -> drop entries hooks cancelled
//                   -> commit -> post-save hooks
//
// ============================================================================

use super::UnitOfWork;
use crate::core::{HookError, HookImportance, Result};
use crate::dispatch::{HookDispatchResult, HookDispatcher};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Level, event, info_span};

#[derive(Debug, Default)]
pub struct SaveChangesResult {
    /// Entries written by the unit of work
    pub committed: usize,
    pub pre_save: HookDispatchResult,
    pub post_save: HookDispatchResult,
}

pub struct SaveChangesOperation<'a> {
    dispatcher: &'a HookDispatcher,
    min_importance: HookImportance,
}

impl<'a> SaveChangesOperation<'a> {
    /// Uses the dispatcher's configured importance floor
    pub fn new(dispatcher: &'a HookDispatcher) -> Self {
        Self {
            dispatcher,
            min_importance: dispatcher.config().min_importance,
        }
    }

    /// Override the importance floor for this save, e.g. during a bulk import
    pub fn with_min_importance(mut self, min_importance: HookImportance) -> Self {
        self.min_importance = min_importance;
        self
    }

    pub async fn execute<U>(
        &self,
        uow: &mut U,
        cancel: &CancellationToken,
    ) -> Result<SaveChangesResult>
    where
        U: UnitOfWork + ?Sized,
    {
        let span = info_span!(
            "hooks.save_changes",
            context = %uow.context_type(),
            min_importance = %self.min_importance
        );

        async move {
            let mut entries = uow.changed_entries();

            let hooking = self.dispatcher.config().enabled
                && self.dispatcher.registry().has_hooks(self.min_importance);
            if !hooking {
                let committed = uow.commit(&mut entries).await?;
                return Ok(SaveChangesResult {
                    committed,
                    ..Default::default()
                });
            }

            let pre_save = self
                .dispatcher
                .dispatch_pre_save(&mut entries, self.min_importance, cancel)
                .await;

            if pre_save.any_state_changed {
                let before = entries.len();
                entries.retain(|entry| entry.state().is_pending());
                event!(
                    Level::DEBUG,
                    dropped = before - entries.len(),
                    "entries withdrawn by pre-save hooks"
                );
            }

            if cancel.is_cancelled() {
                event!(Level::DEBUG, "save cancelled before commit");
                return Err(HookError::Cancelled);
            }

            let committed = uow.commit(&mut entries).await?;

            let post_save = self
                .dispatcher
                .dispatch_post_save(&mut entries, self.min_importance, cancel)
                .await;

            Ok(SaveChangesResult {
                committed,
                pre_save,
                post_save,
            })
        }
        .instrument(span)
        .await
    }
}
