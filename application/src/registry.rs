//! Adapter registry
//!
//! Lookup table from provider family to the adapter serving it, filled once
//! at startup.

use crate::ports::provider_adapter::ProviderAdapter;
use quorum_domain::{ProviderDescriptor, ProviderFamily};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<ProviderFamily, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own family, replacing any previous one.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.family(), adapter);
    }

    pub fn with(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.register(adapter);
        self
    }

    pub fn get(&self, family: ProviderFamily) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&family).cloned()
    }

    /// Adapter for the descriptor if it is registered and available.
    pub fn resolve(&self, descriptor: &ProviderDescriptor) -> Option<Arc<dyn ProviderAdapter>> {
        match self.adapters.get(&descriptor.family) {
            None => {
                debug!("Excluding {}: no adapter registered", descriptor);
                None
            }
            Some(adapter) if !adapter.is_available() => {
                debug!("Excluding {}: adapter unavailable", descriptor);
                None
            }
            Some(adapter) => Some(Arc::clone(adapter)),
        }
    }

    /// Registered families, sorted
    pub fn families(&self) -> Vec<ProviderFamily> {
        let mut families: Vec<_> = self.adapters.keys().copied().collect();
        families.sort();
        families
    }

    /// Registered families whose adapter is currently usable, sorted
    pub fn available_families(&self) -> Vec<ProviderFamily> {
        let mut families: Vec<_> = self
            .adapters
            .iter()
            .filter(|(_, a)| a.is_available())
            .map(|(f, _)| *f)
            .collect();
        families.sort();
        families
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("families", &self.families())
            .finish()
    }
}
