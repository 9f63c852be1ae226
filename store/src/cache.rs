use crate::{CacheConfig, QueryKey};
use common::Result;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

/// Slot per key. Holding its lock while fetching is what coalesces
/// concurrent requests for the same key.
type Slot<V> = Arc<Mutex<Option<CacheEntry<V>>>>;

/// In-memory response cache keyed by [`QueryKey`]
pub struct QueryCache<V> {
    ttl: Duration,
    slots: RwLock<HashMap<QueryKey, Slot<V>>>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            ttl: config.ttl,
            slots: RwLock::new(HashMap::new()),
        }
    }

    async fn slot(&self, key: &QueryKey) -> Slot<V> {
        if let Some(slot) = self.slots.read().await.get(key) {
            return slot.clone();
        }

        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|_, slot| self.is_retained(slot));
        if slots.len() < before {
            debug!("Swept {} expired cache slots", before - slots.len());
        }

        slots
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    fn is_fresh(&self, entry: &CacheEntry<V>) -> bool {
        entry.fetched_at.elapsed() < self.ttl
    }

    /// A slot stays in the map while someone else holds it or it has a
    /// fresh value. Called with the map write lock held.
    fn is_retained(&self, slot: &Slot<V>) -> bool {
        if Arc::strong_count(slot) > 1 {
            return true;
        }
        match slot.try_lock() {
            Ok(entry) => entry.as_ref().is_some_and(|e| self.is_fresh(e)),
            Err(_) => true,
        }
    }

    /// Drops the slot for `key` after a failed fetch unless another
    /// request is waiting on it or it has meanwhile been filled
    async fn release_failed(
        &self,
        key: &QueryKey,
        slot: &Slot<V>,
        entry: &Option<CacheEntry<V>>,
    ) {
        if entry.as_ref().is_some_and(|e| self.is_fresh(e)) {
            return;
        }

        let mut slots = self.slots.write().await;
        let ours = slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot));
        // the map and this request are the only holders
        if ours && Arc::strong_count(slot) == 2 {
            slots.remove(key);
            debug!("Released slot for {} after failed fetch", key);
        }
    }

    /// Returns the cached value for `key` if it is still fresh, otherwise
    /// runs `fetch` and caches its result. Errors are passed through and
    /// never cached.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let slot = self.slot(key).await;
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref().filter(|cached| self.is_fresh(cached)) {
            debug!("Cache hit for {}", key);
            return Ok(cached.value.clone());
        }

        debug!("Cache miss for {}", key);
        let value = match fetch().await {
            Ok(value) => value,
            Err(err) => {
                self.release_failed(key, &slot, &entry).await;
                return Err(err);
            }
        };
        *entry = Some(CacheEntry {
            value: value.clone(),
            fetched_at: Instant::now(),
        });

        Ok(value)
    }

    /// Fresh cached value without fetching
    pub async fn get(&self, key: &QueryKey) -> Option<V> {
        let slot = self.slots.read().await.get(key).cloned()?;
        let entry = slot.lock().await;
        entry
            .as_ref()
            .filter(|cached| self.is_fresh(cached))
            .map(|cached| cached.value.clone())
    }

    pub async fn invalidate(&self, key: &QueryKey) {
        if self.slots.write().await.remove(key).is_some() {
            debug!("Invalidated {}", key);
        }
    }

    pub async fn clear(&self) {
        self.slots.write().await.clear();
    }

    /// Number of keys holding a fresh value
    pub async fn len(&self) -> usize {
        let slots: Vec<Slot<V>> = self.slots.read().await.values().cloned().collect();
        let mut fresh = 0;
        for slot in slots {
            if slot.lock().await.as_ref().is_some_and(|e| self.is_fresh(e)) {
                fresh += 1;
            }
        }
        fresh
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
