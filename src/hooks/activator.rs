// ============================================================================
// Hook Activation
// ============================================================================
//
// HookContainer: process-wide registration table (metadata + factory).
// HookScope: per unit-of-work activator, one instance per hook.
//
// ============================================================================

use super::{HookMetadata, SaveHook};
use crate::core::{HookError, Result};
use crate::registry::HookRegistry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a fresh hook instance
pub type HookFactory = Arc<dyn Fn() -> Arc<dyn SaveHook> + Send + Sync>;

/// Resolves a live hook from its metadata
pub trait HookActivator: Send + Sync {
    fn activate(&self, metadata: &HookMetadata) -> Result<Arc<dyn SaveHook>>;
}

struct Registration {
    metadata: HookMetadata,
    factory: HookFactory,
}

#[derive(Default)]
pub struct HookContainer {
    registrations: Vec<Registration>,
    index: HashMap<&'static str, usize>,
}

impl HookContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook implementation.
    ///
    /// Each implementation may be registered once.
    pub fn register(&mut self, metadata: HookMetadata, factory: HookFactory) -> Result<()> {
        if self.index.contains_key(metadata.implementation) {
            return Err(HookError::ContractViolation(format!(
                "Hook '{}' is already registered",
                metadata.implementation
            )));
        }
        self.index
            .insert(metadata.implementation, self.registrations.len());
        self.registrations.push(Registration { metadata, factory });
        Ok(())
    }

    /// Register a hook constructed through `Default` for every activation
    pub fn register_hook<H>(&mut self, metadata: HookMetadata) -> Result<()>
    where
        H: SaveHook + Default + 'static,
    {
        self.register(metadata, Arc::new(|| Arc::new(H::default()) as Arc<dyn SaveHook>))
    }

    /// Register a shared instance handed out on every activation
    pub fn register_instance(
        &mut self,
        metadata: HookMetadata,
        instance: Arc<dyn SaveHook>,
    ) -> Result<()> {
        self.register(metadata, Arc::new(move || Arc::clone(&instance)))
    }

    pub fn metadata(&self) -> Vec<HookMetadata> {
        self.registrations
            .iter()
            .map(|registration| registration.metadata.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Build a registry over everything registered so far
    pub fn build_registry(&self) -> HookRegistry {
        // Registration already rejects duplicate names
        HookRegistry::from_unique(self.metadata())
    }
}

impl HookActivator for HookContainer {
    fn activate(&self, metadata: &HookMetadata) -> Result<Arc<dyn SaveHook>> {
        let position = self.index.get(metadata.implementation).ok_or_else(|| {
            HookError::DependencyResolution(format!(
                "No implementation registered for hook '{}'",
                metadata.implementation
            ))
        })?;
        Ok((self.registrations[*position].factory)())
    }
}

/// Activator scoped to one unit of work.
///
/// Every hook is resolved at most once per scope; later activations return
/// the same instance.
pub struct HookScope {
    inner: Arc<dyn HookActivator>,
    instances: Mutex<HashMap<&'static str, Arc<dyn SaveHook>>>,
}

impl HookScope {
    pub fn new(inner: Arc<dyn HookActivator>) -> Self {
        Self {
            inner,
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Number of hooks resolved in this scope so far
    pub fn resolved_count(&self) -> usize {
        self.instances.lock().len()
    }
}

impl HookActivator for HookScope {
    fn activate(&self, metadata: &HookMetadata) -> Result<Arc<dyn SaveHook>> {
        let mut instances = self.instances.lock();
        if let Some(instance) = instances.get(metadata.implementation) {
            return Ok(Arc::clone(instance));
        }
        let instance = self.inner.activate(metadata)?;
        instances.insert(metadata.implementation, Arc::clone(&instance));
        Ok(instance)
    }
}
