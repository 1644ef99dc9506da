//! Result page cache
//!
//! Keys are raw query strings; values are already ranked and paginated
//! result pages. The cache is never the source of truth: a miss, an expired
//! entry and a failed read all mean "recompute".

use async_trait::async_trait;
use deciframe_common::{Result, SimilarSong};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Key/value store for computed result pages
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Stored page for `key`, or `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<Vec<SimilarSong>>>;

    /// Store `page` under `key` for `ttl`
    async fn set(&self, key: &str, page: &[SimilarSong], ttl: Duration) -> Result<()>;
}

#[derive(Debug)]
struct CacheEntry {
    /// Serialized JSON page
    payload: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process cache holding serialized pages with a per-entry expiry
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every expired entry; returns how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<SimilarSong>>> {
        let now = Instant::now();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => {
                    return Ok(Some(serde_json::from_str(&entry.payload)?));
                }
                Some(_) => {}
            }
        }

        // Expired: remove unless a fresh value was stored meanwhile
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            debug!("Cache entry expired: {}", key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, page: &[SimilarSong], ttl: Duration) -> Result<()> {
        let payload = serde_json::to_string(page)?;
        let entry = CacheEntry {
            payload,
            expires_at: Instant::now() + ttl,
        };

        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }
}
