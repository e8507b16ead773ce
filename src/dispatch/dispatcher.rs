// ============================================================================
// Hook Dispatcher
// ============================================================================
//
// Runs the hooks of one stage over a batch of changed entries:
//
//   for each entry (input order, deduplicated, until cancelled)
//     select hooks from the registry
//     activate and invoke each hook in order
//       Ok    -> remember (hook, entry)
//       Void  -> record in the registry, never dispatched again
//       Err   -> log and continue
//     pre-save: adopt a state changed by the hooks as the new initial state
//   call each processed hook's batch completion callback
//
// Hook failures never escape a dispatch.
//
// ============================================================================

use super::{HookDispatchResult, ProcessedHook};
use crate::config::HookingConfig;
use crate::core::{EntityState, HookImportance, HookStage, TypeInfo};
use crate::entry::{EntityKey, HookedEntity};
use crate::hooks::{HookActivator, HookMetadata, HookResult, SaveHook};
use crate::registry::HookRegistry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Level, event, info_span};

/// Identifies one logical change within a dispatch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupKey {
    context_type: TypeInfo,
    entity_type: TypeInfo,
    key: EntityKey,
    state: EntityState,
    stage: HookStage,
}

impl DedupKey {
    /// Transient entities have no stable key and are never deduplicated
    fn for_entry(entry: &HookedEntity, stage: HookStage) -> Option<Self> {
        entry.key().map(|key| Self {
            context_type: entry.context_type(),
            entity_type: entry.entity_type(),
            key,
            state: entry.initial_state(),
            stage,
        })
    }
}

struct Processed {
    metadata: Arc<HookMetadata>,
    instance: Arc<dyn SaveHook>,
    entries: Vec<usize>,
}

pub struct HookDispatcher {
    registry: Arc<HookRegistry>,
    activator: Arc<dyn HookActivator>,
    config: HookingConfig,
}

impl HookDispatcher {
    pub fn new(registry: Arc<HookRegistry>, activator: Arc<dyn HookActivator>) -> Self {
        Self {
            registry,
            activator,
            config: HookingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: HookingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &HookingConfig {
        &self.config
    }

    /// Run pre-save hooks.
    ///
    /// `any_state_changed` reports whether a hook moved any entry to another
    /// state; such entries already carry the new state as their initial state.
    ///
    /// # Examples
    ///
    /// ```
    /// use savehook::{CancellationToken, HookContainer, HookDispatcher, HookImportance, HookedEntity};
    /// use std::sync::Arc;
    ///
    /// # tokio_test::block_on(async {
    /// let container = HookContainer::new();
    /// let registry = Arc::new(container.build_registry());
    /// let dispatcher = HookDispatcher::new(registry, Arc::new(container));
    ///
    /// let mut entries: Vec<HookedEntity> = Vec::new();
    /// let result = dispatcher
    ///     .dispatch_pre_save(&mut entries, HookImportance::Normal, &CancellationToken::new())
    ///     .await;
    /// assert!(result.is_empty());
    /// # });
    /// ```
    pub async fn dispatch_pre_save(
        &self,
        entries: &mut [HookedEntity],
        min_importance: HookImportance,
        cancel: &CancellationToken,
    ) -> HookDispatchResult {
        self.dispatch(entries, HookStage::PreSave, min_importance, cancel)
            .await
    }

    /// Run post-save hooks
    pub async fn dispatch_post_save(
        &self,
        entries: &mut [HookedEntity],
        min_importance: HookImportance,
        cancel: &CancellationToken,
    ) -> HookDispatchResult {
        self.dispatch(entries, HookStage::PostSave, min_importance, cancel)
            .await
    }

    async fn dispatch(
        &self,
        entries: &mut [HookedEntity],
        stage: HookStage,
        min_importance: HookImportance,
        cancel: &CancellationToken,
    ) -> HookDispatchResult {
        if entries.is_empty() {
            return HookDispatchResult::default();
        }

        let span = info_span!(
            "hooks.dispatch",
            stage = %stage,
            entries = entries.len(),
            min_importance = %min_importance
        );

        async move {
            let mut seen: HashSet<DedupKey> = HashSet::new();
            let mut instances: HashMap<&'static str, Option<Arc<dyn SaveHook>>> =
                HashMap::new();
            let mut processed: Vec<Processed> = Vec::new();
            let mut positions: HashMap<&'static str, usize> = HashMap::new();
            let mut any_state_changed = false;
            let total = entries.len();

            for (index, entry) in entries.iter_mut().enumerate() {
                if cancel.is_cancelled() {
                    event!(
                        Level::DEBUG,
                        skipped = total - index,
                        "hook dispatch cancelled"
                    );
                    break;
                }

                if let Some(key) = DedupKey::for_entry(entry, stage) {
                    if !seen.insert(key) {
                        continue;
                    }
                }

                for metadata in self.registry.select_for(entry, stage, min_importance) {
                    let Some(instance) = self.instance_for(&metadata, entry, &mut instances)
                    else {
                        continue;
                    };

                    let outcome = match stage {
                        HookStage::PreSave => instance.on_before_save(entry, cancel).await,
                        HookStage::PostSave => instance.on_after_save(entry, cancel).await,
                    };

                    match outcome {
                        Ok(HookResult::Ok) => {
                            let position =
                                *positions.entry(metadata.implementation).or_insert_with(|| {
                                    processed.push(Processed {
                                        metadata: Arc::clone(&metadata),
                                        instance: Arc::clone(&instance),
                                        entries: Vec::new(),
                                    });
                                    processed.len() - 1
                                });
                            processed[position].entries.push(index);
                        }
                        Ok(HookResult::Void) => self.mark_void(&metadata, entry, stage),
                        Err(err) if err.is_void_signal() => {
                            self.mark_void(&metadata, entry, stage)
                        }
                        Err(err) => {
                            event!(
                                Level::ERROR,
                                hook = metadata.implementation,
                                entity_type = %entry.entity_type(),
                                state = %entry.state(),
                                error = %err,
                                "save hook failed"
                            );
                        }
                    }
                }

                if stage == HookStage::PreSave && entry.has_state_changed() {
                    entry.sync_initial_state();
                    any_state_changed = true;
                }
            }

            let mut result = HookDispatchResult {
                processed_hooks: Vec::with_capacity(processed.len()),
                any_state_changed,
            };

            for hook in processed {
                let touched: Vec<&HookedEntity> =
                    hook.entries.iter().map(|&index| &entries[index]).collect();
                let completed = match stage {
                    HookStage::PreSave => {
                        hook.instance.on_before_save_completed(&touched, cancel).await
                    }
                    HookStage::PostSave => {
                        hook.instance.on_after_save_completed(&touched, cancel).await
                    }
                };
                if let Err(err) = completed {
                    event!(
                        Level::ERROR,
                        hook = hook.metadata.implementation,
                        entries = touched.len(),
                        error = %err,
                        "save hook completion failed"
                    );
                }

                result.processed_hooks.push(ProcessedHook {
                    metadata: hook.metadata,
                    instance: hook.instance,
                    entries: hook.entries.len(),
                });
            }

            event!(
                Level::DEBUG,
                processed = result.processed_hooks.len(),
                any_state_changed = result.any_state_changed,
                "hook dispatch completed"
            );
            result
        }
        .instrument(span)
        .await
    }

    /// One instance per hook per dispatch. A failed activation is remembered
    /// too, so the hook is skipped for the rest of the batch and logged once.
    fn instance_for(
        &self,
        metadata: &HookMetadata,
        entry: &HookedEntity,
        instances: &mut HashMap<&'static str, Option<Arc<dyn SaveHook>>>,
    ) -> Option<Arc<dyn SaveHook>> {
        if let Some(cached) = instances.get(metadata.implementation) {
            return cached.clone();
        }
        let instance = match self.activator.activate(metadata) {
            Ok(instance) => Some(instance),
            Err(err) => {
                event!(
                    Level::ERROR,
                    hook = metadata.implementation,
                    entity_type = %entry.entity_type(),
                    state = %entry.state(),
                    error = %err,
                    "save hook activation failed"
                );
                None
            }
        };
        instances.insert(metadata.implementation, instance.clone());
        instance
    }

    fn mark_void(&self, metadata: &HookMetadata, entry: &HookedEntity, stage: HookStage) {
        if !self.config.detect_void_hooks {
            return;
        }
        match self.registry.register_void_hook(metadata, entry, stage) {
            Ok(true) => {
                event!(
                    Level::DEBUG,
                    hook = metadata.implementation,
                    entity_type = %entry.entity_type(),
                    state = %entry.initial_state(),
                    stage = %stage,
                    "save hook registered as void"
                );
            }
            Ok(false) => {}
            Err(err) => {
                event!(
                    Level::ERROR,
                    hook = metadata.implementation,
                    error = %err,
                    "void hook registration failed"
                );
            }
        }
    }
}
