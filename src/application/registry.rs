//! Ordered, copy-on-write subscriber list shared by handlers and listeners

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Identifies one registration so it can be removed again. Unique per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub type Entries<T> = Arc<Vec<(RegistrationId, Arc<T>)>>;

/// Readers take an `Arc` snapshot and never hold the lock while running
/// what they read; writers replace the whole list.
pub struct Registry<T: ?Sized> {
    entries: RwLock<Entries<T>>,
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn register(&self, item: Arc<T>) -> RegistrationId {
        let id = RegistrationId(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push((id, item));
        *guard = Arc::new(next);
        id
    }

    /// Returns `false` if `id` was not (or no longer) registered.
    pub fn unregister(&self, id: RegistrationId) -> bool {
        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if !guard.iter().any(|(entry, _)| *entry == id) {
            return false;
        }
        let next: Vec<_> = guard
            .iter()
            .filter(|(entry, _)| *entry != id)
            .cloned()
            .collect();
        *guard = Arc::new(next);
        true
    }

    pub fn snapshot(&self) -> Entries<T> {
        Arc::clone(&self.entries.read().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
