//! In-memory response cache with per-entry TTL.
//!
//! Two expiry paths:
//! - lookup: exact check against the TTL the entry was stored with; a stale
//!   entry is removed on the spot
//! - sweep: coarse pass that drops everything older than one default TTL,
//!   whatever TTL the entry was stored with
//!
//! Entries with a long custom TTL can therefore be swept early, and entries
//! with a short TTL can outlive their expiry until a lookup or the next sweep.

use crate::cache::key::CacheKey;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default TTL for cacheable responses (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }
}

/// Shared cache handle; clones point at the same map.
#[derive(Clone, Default)]
pub struct CacheStore {
    map: Arc<DashMap<CacheKey, CacheEntry>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value if it is younger than its TTL.
    /// A stale entry is deleted, not just skipped.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let now = Instant::now();
        {
            let entry = self.map.get(key)?;
            if entry.is_fresh(now) {
                return Some(entry.value.clone());
            }
        }
        // re-check under the write lock: a concurrent put may have refreshed it
        self.map.remove_if(key, |_, e| !e.is_fresh(now));
        None
    }

    /// Store `value` under `key`, overwriting any previous entry.
    pub fn put(&self, key: CacheKey, value: Value, ttl: Duration) {
        let entry = CacheEntry { value, stored_at: Instant::now(), ttl };
        self.map.insert(key, entry);
    }

    /// Drop every entry older than `default_ttl`. Returns how many were removed.
    pub fn sweep(&self, default_ttl: Duration) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.map.retain(|_, e| {
            let keep = now.saturating_duration_since(e.stored_at) <= default_ttl;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Whether an entry exists, fresh or not. Does not expire anything.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
