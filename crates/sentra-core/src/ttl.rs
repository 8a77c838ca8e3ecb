//! Time-bounded key store capability.
//!
//! Anything that needs a short-lived "seen this key" marker (one-time
//! token consumption, cooldowns) takes this as an injected capability
//! instead of keeping module-level state, so a shared store can replace
//! the in-process one under multiple processes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::CoreResult;

pub trait TtlStore: Send + Sync {
    /// Record `key` for `ttl`; overwrites any existing entry.
    fn put(&self, key: String, ttl: Duration) -> impl Future<Output = CoreResult<()>> + Send;

    /// Whether `key` is present and not yet expired.
    fn exists(&self, key: &str) -> impl Future<Output = CoreResult<bool>> + Send;
}

/// In-process [`TtlStore`] backed by a mutex-guarded map.
///
/// Expired entries are purged opportunistically on writes.
#[derive(Debug, Default)]
pub struct MemoryTtlStore {
    entries: Mutex<HashMap<String, Instant>>,
}

impl MemoryTtlStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Instant>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TtlStore for MemoryTtlStore {
    async fn put(&self, key: String, ttl: Duration) -> CoreResult<()> {
        let now = Instant::now();
        let mut entries = self.lock();
        entries.retain(|_, deadline| *deadline > now);
        entries.insert(key, now + ttl);
        Ok(())
    }

    async fn exists(&self, key: &str) -> CoreResult<bool> {
        let now = Instant::now();
        Ok(self.lock().get(key).is_some_and(|deadline| *deadline > now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_exists() {
        let store = MemoryTtlStore::new();
        store
            .put("k".into(), Duration::from_secs(60))
            .await
            .unwrap();
        assert!(store.exists("k").await.unwrap());
        assert!(!store.exists("other").await.unwrap());
    }

    #[tokio::test]
    async fn expired_entry_is_gone() {
        let store = MemoryTtlStore::new();
        store.put("k".into(), Duration::ZERO).await.unwrap();
        assert!(!store.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn put_overwrites_deadline() {
        let store = MemoryTtlStore::new();
        store.put("k".into(), Duration::ZERO).await.unwrap();
        store
            .put("k".into(), Duration::from_secs(60))
            .await
            .unwrap();
        assert!(store.exists("k").await.unwrap());
    }
}
