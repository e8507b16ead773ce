/// Save pipeline tests
///
/// Hooked commits over an in-memory unit of work
/// Run with: cargo test --test save_pipeline_tests
mod common;

use async_trait::async_trait;
use common::*;
use parking_lot::Mutex;
use savehook::{
    CancellationToken, EntityState, HookError, HookImportance, HookMetadata, HookResult,
    HookedEntity, HookingConfig, Result, SaveChangesOperation, TypeFilter, TypeInfo, UnitOfWork,
};
use std::sync::Arc;

struct MemoryUnitOfWork {
    pending: Vec<HookedEntity>,
    written: Arc<Mutex<Vec<String>>>,
    fail_commit: bool,
}

impl MemoryUnitOfWork {
    fn new(pending: Vec<HookedEntity>) -> Self {
        Self {
            pending,
            written: Arc::new(Mutex::new(Vec::new())),
            fail_commit: false,
        }
    }

    fn written(&self) -> Vec<String> {
        self.written.lock().clone()
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn context_type(&self) -> TypeInfo {
        SHOP
    }

    fn changed_entries(&mut self) -> Vec<HookedEntity> {
        std::mem::take(&mut self.pending)
    }

    async fn commit(&mut self, entries: &mut [HookedEntity]) -> Result<usize> {
        if self.fail_commit {
            return Err(HookError::Commit("disk full".into()));
        }
        let mut written = self.written.lock();
        for entry in entries.iter_mut() {
            written.push(format!("{}:{}", describe(entry), entry.state()));
            entry.set_state(EntityState::Unchanged);
        }
        Ok(entries.len())
    }
}

fn batch() -> Vec<HookedEntity> {
    vec![
        product(1, EntityState::Added),
        category(3, EntityState::Deleted),
    ]
}

#[tokio::test]
async fn test_hook_can_withdraw_entry_from_commit() {
    let mut harness = Harness::new();
    harness.add(
        HookMetadata::new("keep_categories", TypeFilter::Named("Category")),
        ScriptedHook::new("keep_categories", &harness.log).before(|entry| {
            entry.set_state(EntityState::Unchanged);
            Ok(HookResult::Ok)
        }),
    );
    let notifier = harness.add(
        HookMetadata::new("notifier", TypeFilter::Any),
        ScriptedHook::new("notifier", &harness.log).after(ok),
    );
    let dispatcher = harness.dispatcher();
    let mut uow = MemoryUnitOfWork::new(batch());

    let result = SaveChangesOperation::new(&dispatcher)
        .execute(&mut uow, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.committed, 1);
    assert!(result.pre_save.any_state_changed);
    assert_eq!(uow.written(), vec!["Product#1:ADDED"]);
    assert_eq!(result.post_save.implementations(), vec!["notifier"]);
    assert_eq!(*notifier.after_completed.lock(), vec![vec!["Product#1"]]);
}

#[tokio::test]
async fn test_post_save_selects_by_state_before_commit() {
    let mut harness = Harness::new();
    let added_only = harness.add(
        HookMetadata::new("added_only", TypeFilter::Any),
        ScriptedHook::new("added_only", &harness.log).after(|entry| {
            match entry.initial_state() {
                EntityState::Added => Ok(HookResult::Ok),
                _ => Ok(HookResult::Void),
            }
        }),
    );
    let dispatcher = harness.dispatcher();
    let mut uow = MemoryUnitOfWork::new(batch());

    let result = SaveChangesOperation::new(&dispatcher)
        .execute(&mut uow, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.committed, 2);
    assert_eq!(result.post_save.processed_hooks[0].entries, 1);
    // Two void pre-save calls, then one call per committed entry
    assert_eq!(added_only.invocations(), 4);
    assert_eq!(
        harness.calls(),
        vec!["added_only:Product#1", "added_only:Category#3"]
    );
}

#[tokio::test]
async fn test_disabled_hooking_commits_directly() {
    let mut harness = Harness::new();
    let hook = harness.add(
        HookMetadata::new("any", TypeFilter::Any),
        ScriptedHook::new("any", &harness.log).before(ok).after(ok),
    );
    let dispatcher = harness
        .dispatcher()
        .with_config(HookingConfig::new().enabled(false));
    let mut uow = MemoryUnitOfWork::new(batch());

    let result = SaveChangesOperation::new(&dispatcher)
        .execute(&mut uow, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.committed, 2);
    assert!(result.pre_save.is_empty());
    assert!(result.post_save.is_empty());
    assert_eq!(hook.invocations(), 0);
}

#[tokio::test]
async fn test_bulk_save_skips_normal_hooks() {
    let mut harness = Harness::new();
    let normal = harness.add(
        HookMetadata::new("normal", TypeFilter::Any),
        ScriptedHook::new("normal", &harness.log).before(ok),
    );
    harness.add(
        HookMetadata::new("essential", TypeFilter::Any)
            .with_importance(HookImportance::Essential),
        ScriptedHook::new("essential", &harness.log).before(ok),
    );
    let dispatcher = harness.dispatcher().with_config(HookingConfig::bulk());
    let cancel = CancellationToken::new();

    let mut uow = MemoryUnitOfWork::new(batch());
    let result = SaveChangesOperation::new(&dispatcher)
        .execute(&mut uow, &cancel)
        .await
        .unwrap();
    assert_eq!(result.pre_save.implementations(), vec!["essential"]);
    assert_eq!(normal.invocations(), 0);
    assert_eq!(
        harness.calls(),
        vec!["essential:Product#1", "essential:Category#3"]
    );

    let mut uow = MemoryUnitOfWork::new(batch());
    let result = SaveChangesOperation::new(&dispatcher)
        .with_min_importance(HookImportance::Normal)
        .execute(&mut uow, &cancel)
        .await
        .unwrap();
    assert_eq!(result.pre_save.implementations(), vec!["normal", "essential"]);
}

#[tokio::test]
async fn test_commit_failure_propagates_without_post_save() {
    let mut harness = Harness::new();
    let hook = harness.add(
        HookMetadata::new("any", TypeFilter::Any),
        ScriptedHook::new("any", &harness.log).before(ok).after(ok),
    );
    let dispatcher = harness.dispatcher();
    let mut uow = MemoryUnitOfWork::new(batch());
    uow.fail_commit = true;

    let err = SaveChangesOperation::new(&dispatcher)
        .execute(&mut uow, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, HookError::Commit(_)));
    // Pre-save ran for both entries, post-save never started
    assert_eq!(hook.invocations(), 2);
    assert!(hook.after_completed.lock().is_empty());
}

#[tokio::test]
async fn test_cancelled_save_does_not_commit() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let mut harness = Harness::new();
    harness.add(
        HookMetadata::new("stopper", TypeFilter::Any),
        ScriptedHook::new("stopper", &harness.log).before(move |_| {
            trigger.cancel();
            Ok(HookResult::Ok)
        }),
    );
    let dispatcher = harness.dispatcher();
    let mut uow = MemoryUnitOfWork::new(batch());

    let err = SaveChangesOperation::new(&dispatcher)
        .execute(&mut uow, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, HookError::Cancelled));
    assert!(uow.written().is_empty());
}
