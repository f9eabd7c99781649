use std::sync::{Arc, Mutex};

use super::Registry;

/// A registry shared between threads behind one lock.
///
/// Every call holds the lock for the whole closure, so two-entity operations such as
/// [`Registry::assign_instructor`] are atomic to other holders of the handle.
#[derive(Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        let mut registry = self.inner.lock().expect("registry lock poisoned");
        f(&mut registry)
    }
}
