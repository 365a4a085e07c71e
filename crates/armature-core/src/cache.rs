//! Cache contract consumed by action handlers.
//!
//! The core never prescribes a backend: handlers receive an
//! `Arc<dyn Cache>` through the [`ActionContext`](crate::context::ActionContext)
//! and only rely on the minimal key/value/TTL interface below. A backend must
//! be internally safe for concurrent access — the core imposes no locking
//! discipline on it.
//!
//! [`MemoryCache`] is the bundled in-process backend, suitable for tests and
//! single-process hosts.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::CacheResult;

// ─── Cache trait ──────────────────────────────────────────────────────────────

/// Minimal key/value/TTL cache interface.
///
/// `get` returns `None` as the absent marker; an expired entry is
/// indistinguishable from one that was never stored.
#[async_trait]
pub trait Cache: Send + Sync + 'static {
    /// Reads the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key` for at most `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;
}

// ─── MemoryCache ──────────────────────────────────────────────────────────────

/// In-process [`Cache`] backend with lazy TTL expiry.
///
/// Expired entries are dropped on the next `get` or `set` that touches them;
/// there is no background sweeper.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

struct Entry {
    value: String,
    deadline: Instant,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|e| e.deadline > now)
            .count()
    }

    /// Returns `true` when no live entries remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.deadline > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                deadline: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
