//! Cache-aside pagination
//!
//! Only the requested page is cached, under the raw query string (which
//! embeds the page number). Each page of a query is therefore computed and
//! cached on its own.

use deciframe_common::SimilarSong;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::ResultCache;
use crate::error::Result;
use crate::pagination::Page;

/// Page cache front for the similarity pipeline
#[derive(Clone)]
pub struct CachedPaginator {
    cache: Arc<dyn ResultCache>,
    ttl: Duration,
}

impl std::fmt::Debug for CachedPaginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedPaginator")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl CachedPaginator {
    pub fn new(cache: Arc<dyn ResultCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached page for `key`
    ///
    /// Read failures are logged and reported as a miss.
    pub async fn get(&self, key: &str) -> Option<Vec<SimilarSong>> {
        match self.cache.get(key).await {
            Ok(Some(page)) => {
                debug!("Cache hit: {}", key);
                Some(page)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Cache read failed for [{}], recomputing: {}", key, e);
                None
            }
        }
    }

    /// Compute the full ranked results, slice out page `page_number`, and
    /// cache that page when the full result set is non-empty
    ///
    /// Write failures are logged and never fail the request.
    pub async fn compute_and_cache<F, Fut>(
        &self,
        key: &str,
        page_number: u32,
        compute: F,
    ) -> Result<Vec<SimilarSong>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<SimilarSong>>>,
    {
        let ranked = compute().await?;
        let page = Page::new(page_number, ranked.len()).slice(&ranked);

        if !ranked.is_empty() {
            if let Err(e) = self.cache.set(key, &page, self.ttl).await {
                warn!("Cache write failed for [{}]: {}", key, e);
            }
        }

        Ok(page)
    }
}
