// Typed cache over the fetched collections. Each collection has a named
// slot; a mutation invalidates exactly the slot it touched, and the next
// render refetches. Entries also age out so edits made from another session
// become visible without a local mutation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::{Foreman, Task, Technician};

/// Names of the cached collections. Mutation handlers invalidate by key,
/// which keeps the mutation-to-view dependency explicit and auditable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey {
    Foremen,
    Technicians,
    Tasks,
}

/// Fetch scope of the task collection. The foreman view caches the full
/// list; the technician view caches one technician's list. A read hits only
/// when the stored scope matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    All,
    Technician(i64),
}

#[derive(Debug)]
struct Entry<T> {
    data: Arc<Vec<T>>,
    stored_at: Instant,
}

impl<T> Entry<T> {
    fn new(data: Vec<T>) -> Self {
        Self {
            data: Arc::new(data),
            stored_at: Instant::now(),
        }
    }

    fn fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Shared cache of the three collections the interface renders from
#[derive(Debug)]
pub struct CollectionCache {
    ttl: Duration,
    foremen: RwLock<Option<Entry<Foreman>>>,
    technicians: RwLock<Option<Entry<Technician>>>,
    tasks: RwLock<Option<(TaskScope, Entry<Task>)>>,
}

impl CollectionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            foremen: RwLock::new(None),
            technicians: RwLock::new(None),
            tasks: RwLock::new(None),
        }
    }

    pub async fn foremen(&self) -> Option<Arc<Vec<Foreman>>> {
        let slot = self.foremen.read().await;
        slot.as_ref()
            .filter(|entry| entry.fresh(self.ttl))
            .map(|entry| Arc::clone(&entry.data))
    }

    pub async fn store_foremen(&self, data: Vec<Foreman>) -> Arc<Vec<Foreman>> {
        let entry = Entry::new(data);
        let shared = Arc::clone(&entry.data);
        *self.foremen.write().await = Some(entry);
        shared
    }

    pub async fn technicians(&self) -> Option<Arc<Vec<Technician>>> {
        let slot = self.technicians.read().await;
        slot.as_ref()
            .filter(|entry| entry.fresh(self.ttl))
            .map(|entry| Arc::clone(&entry.data))
    }

    pub async fn store_technicians(&self, data: Vec<Technician>) -> Arc<Vec<Technician>> {
        let entry = Entry::new(data);
        let shared = Arc::clone(&entry.data);
        *self.technicians.write().await = Some(entry);
        shared
    }

    pub async fn tasks(&self, scope: TaskScope) -> Option<Arc<Vec<Task>>> {
        let slot = self.tasks.read().await;
        slot.as_ref()
            .filter(|(stored_scope, entry)| *stored_scope == scope && entry.fresh(self.ttl))
            .map(|(_, entry)| Arc::clone(&entry.data))
    }

    pub async fn store_tasks(&self, scope: TaskScope, data: Vec<Task>) -> Arc<Vec<Task>> {
        let entry = Entry::new(data);
        let shared = Arc::clone(&entry.data);
        *self.tasks.write().await = Some((scope, entry));
        shared
    }

    /// Drop one collection. The task slot is cleared whole regardless of
    /// which scope it held.
    pub async fn invalidate(&self, key: CacheKey) {
        match key {
            CacheKey::Foremen => *self.foremen.write().await = None,
            CacheKey::Technicians => *self.technicians.write().await = None,
            CacheKey::Tasks => *self.tasks.write().await = None,
        }
        tracing::debug!(key = ?key, "Cache invalidated");
    }
}
