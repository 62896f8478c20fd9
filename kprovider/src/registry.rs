//! Backend registry for runtime lookup of generation backends.
//!
//! ```rust
//! use kprovider::BackendRegistry;
//!
//! let registry = BackendRegistry::new();
//! assert!(registry.is_empty());
//! assert_eq!(registry.len(), 0);
//! ```

use std::sync::Arc;

use kcommon::Registry;

use crate::{BackendId, GenerationCapability};

#[derive(Default)]
pub struct BackendRegistry {
    backends: Registry<BackendId, Arc<dyn GenerationCapability>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<B>(&mut self, backend: B)
    where
        B: GenerationCapability + 'static,
    {
        self.backends.insert(backend.id(), Arc::new(backend));
    }

    pub fn register_shared(&mut self, backend: Arc<dyn GenerationCapability>) {
        self.backends.insert(backend.id(), backend);
    }

    pub fn get(&self, backend_id: BackendId) -> Option<Arc<dyn GenerationCapability>> {
        self.backends.get(&backend_id).cloned()
    }

    pub fn remove(&mut self, backend_id: BackendId) -> Option<Arc<dyn GenerationCapability>> {
        self.backends.remove(&backend_id)
    }

    pub fn contains(&self, backend_id: BackendId) -> bool {
        self.backends.contains_key(&backend_id)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
