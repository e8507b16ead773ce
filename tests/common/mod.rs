#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use savehook::{
    CancellationToken, ChangeEntry, Entity, EntityKey, EntityState, HookContainer, HookDispatcher,
    HookMetadata, HookResult, HookedEntity, Result, SaveHook, TypeInfo,
};
use serde_json::{Map, Value, json};
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const SHOP: TypeInfo = TypeInfo::with_bases("ShopContext", &["DbContext"]);
pub const LOGS: TypeInfo = TypeInfo::with_bases("LogContext", &["DbContext"]);

#[derive(Debug)]
pub struct Product {
    pub id: i64,
}

impl Entity for Product {
    fn entity_type(&self) -> TypeInfo {
        TypeInfo::with_bases("Product", &["BaseEntity"])
    }

    fn key(&self) -> Option<EntityKey> {
        (self.id != 0).then(|| EntityKey::int(self.id))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct Category {
    pub id: i64,
}

impl Entity for Category {
    fn entity_type(&self) -> TypeInfo {
        TypeInfo::with_bases("Category", &["BaseEntity", "SoftDeletable"])
    }

    fn key(&self) -> Option<EntityKey> {
        (self.id != 0).then(|| EntityKey::int(self.id))
    }

    fn soft_delete_field(&self) -> Option<&'static str> {
        Some("deleted")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

pub fn product(id: i64, state: EntityState) -> HookedEntity {
    entry(Product { id }, state)
}

pub fn category(id: i64, state: EntityState) -> HookedEntity {
    entry(Category { id }, state)
}

pub fn entry(entity: impl Entity, state: EntityState) -> HookedEntity {
    in_context(SHOP, entity, state)
}

pub fn in_context(context: TypeInfo, entity: impl Entity, state: EntityState) -> HookedEntity {
    let values = fields(json!({"name": "initial", "deleted": false}));
    HookedEntity::new(context, ChangeEntry::new(entity, state, values.clone(), values))
}

/// A modified product whose `name` changed
pub fn entry_with_changed_name(id: i64) -> HookedEntity {
    HookedEntity::new(
        SHOP,
        ChangeEntry::modified(
            Product { id },
            fields(json!({"name": "Pen", "deleted": false})),
            fields(json!({"name": "Fountain Pen", "deleted": false})),
        ),
    )
}

/// `Product#1`, or `Product#new` for transient entities
pub fn describe(entry: &HookedEntity) -> String {
    match entry.key() {
        Some(key) => format!("{}#{}", entry.entity_type(), key),
        None => format!("{}#new", entry.entity_type()),
    }
}

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub type Behavior = Box<dyn Fn(&mut HookedEntity) -> Result<HookResult> + Send + Sync>;

/// Hook whose per-stage behavior is supplied by the test
pub struct ScriptedHook {
    pub name: &'static str,
    log: CallLog,
    before: Option<Behavior>,
    after: Option<Behavior>,
    fail_completion: bool,
    pub invocations: AtomicUsize,
    pub before_completed: Mutex<Vec<Vec<String>>>,
    pub after_completed: Mutex<Vec<Vec<String>>>,
}

impl ScriptedHook {
    pub fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            before: None,
            after: None,
            fail_completion: false,
            invocations: AtomicUsize::new(0),
            before_completed: Mutex::new(Vec::new()),
            after_completed: Mutex::new(Vec::new()),
        }
    }

    pub fn before<F>(mut self, behavior: F) -> Self
    where
        F: Fn(&mut HookedEntity) -> Result<HookResult> + Send + Sync + 'static,
    {
        self.before = Some(Box::new(behavior));
        self
    }

    pub fn after<F>(mut self, behavior: F) -> Self
    where
        F: Fn(&mut HookedEntity) -> Result<HookResult> + Send + Sync + 'static,
    {
        self.after = Some(Box::new(behavior));
        self
    }

    /// Completion callbacks record the batch, then fail
    pub fn failing_completion(mut self) -> Self {
        self.fail_completion = true;
        self
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    fn completed(&self) -> Result<()> {
        if self.fail_completion {
            return Err(anyhow::anyhow!("{} completion failed", self.name).into());
        }
        Ok(())
    }

    fn run(&self, behavior: &Option<Behavior>, entry: &mut HookedEntity) -> Result<HookResult> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        match behavior {
            Some(behavior) => {
                self.log
                    .lock()
                    .push(format!("{}:{}", self.name, describe(entry)));
                behavior(entry)
            }
            None => Ok(HookResult::Void),
        }
    }
}

#[async_trait]
impl SaveHook for ScriptedHook {
    async fn on_before_save(
        &self,
        entry: &mut HookedEntity,
        _cancel: &CancellationToken,
    ) -> Result<HookResult> {
        self.run(&self.before, entry)
    }

    async fn on_after_save(
        &self,
        entry: &mut HookedEntity,
        _cancel: &CancellationToken,
    ) -> Result<HookResult> {
        self.run(&self.after, entry)
    }

    async fn on_before_save_completed(
        &self,
        entries: &[&HookedEntity],
        _cancel: &CancellationToken,
    ) -> Result<()> {
        let touched = entries.iter().map(|entry| describe(entry)).collect();
        self.before_completed.lock().push(touched);
        self.completed()
    }

    async fn on_after_save_completed(
        &self,
        entries: &[&HookedEntity],
        _cancel: &CancellationToken,
    ) -> Result<()> {
        let touched = entries.iter().map(|entry| describe(entry)).collect();
        self.after_completed.lock().push(touched);
        self.completed()
    }
}

pub fn ok(_: &mut HookedEntity) -> Result<HookResult> {
    Ok(HookResult::Ok)
}

/// Collects hooks and builds a dispatcher over them
pub struct Harness {
    pub container: HookContainer,
    pub log: CallLog,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            container: HookContainer::new(),
            log: call_log(),
        }
    }

    pub fn add(&mut self, metadata: HookMetadata, hook: ScriptedHook) -> Arc<ScriptedHook> {
        let hook = Arc::new(hook);
        self.container
            .register_instance(metadata, hook.clone())
            .unwrap();
        hook
    }

    /// Moves the registered hooks into a dispatcher
    pub fn dispatcher(&mut self) -> HookDispatcher {
        let container = std::mem::take(&mut self.container);
        let registry = Arc::new(container.build_registry());
        HookDispatcher::new(registry, Arc::new(container))
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}
