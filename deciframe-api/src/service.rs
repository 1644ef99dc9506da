//! Similarity search pipeline
//!
//! One entry point per request:
//! acquire governor slot → cache lookup → [miss] resolve → fetch → rank →
//! slice page → cache store. The slot is held for the whole run and is
//! released on every exit path when it goes out of scope.

use deciframe_common::SimilarSong;
use std::sync::Arc;
use tracing::debug;

use crate::db::SongStore;
use crate::error::Result;
use crate::governor::Governor;
use crate::pagination::parse_page_number;
use crate::paginator::CachedPaginator;
use crate::ranker;
use crate::resolver::{QueryResolver, Resolution, SimilarityParams};

/// Everything a similarity request needs, shared across requests
#[derive(Clone)]
pub struct SimilarityService {
    store: Arc<dyn SongStore>,
    resolver: QueryResolver,
    paginator: CachedPaginator,
    governor: Governor,
}

impl std::fmt::Debug for SimilarityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityService")
            .field("resolver", &self.resolver)
            .field("paginator", &self.paginator)
            .field("governor", &self.governor)
            .finish_non_exhaustive()
    }
}

impl SimilarityService {
    pub fn new(
        store: Arc<dyn SongStore>,
        resolver: QueryResolver,
        paginator: CachedPaginator,
        governor: Governor,
    ) -> Self {
        Self {
            store,
            resolver,
            paginator,
            governor,
        }
    }

    pub fn governor(&self) -> &Governor {
        &self.governor
    }

    /// Run one similarity request
    ///
    /// `raw_query` is the query string exactly as received; it is the cache
    /// key, so parameter order matters.
    pub async fn search(
        &self,
        raw_query: &str,
        params: &SimilarityParams,
    ) -> Result<Vec<SimilarSong>> {
        let _slot = self.governor.acquire().await?;

        let page_number = parse_page_number(params.page.as_deref())?;

        if let Some(page) = self.paginator.get(raw_query).await {
            return Ok(page);
        }

        self.paginator
            .compute_and_cache(raw_query, page_number, || self.ranked_results(params))
            .await
    }

    /// Full ranked result sequence for `params`, unpaginated
    async fn ranked_results(&self, params: &SimilarityParams) -> Result<Vec<SimilarSong>> {
        match self.resolver.resolve(params, self.store.as_ref()).await? {
            Resolution::Ranked(results) => Ok(results),
            Resolution::Chords(query) => {
                let candidates = self
                    .store
                    .fetch_by_chords(&query.chords.to_symbols(), &query.genres)
                    .await?;
                let candidate_count = candidates.len();

                let ranked = ranker::rank(&query, candidates);
                debug!(
                    "Ranked {} of {} candidates for {} query chords",
                    ranked.len(),
                    candidate_count,
                    query.chords.cardinality()
                );
                Ok(ranked)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryCache, ResultCache};
    use crate::error::SearchError;
    use crate::sequences::SequenceRegistry;
    use crate::test_support::{FailingCache, StaticStore};
    use deciframe_common::Song;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn service_with(store: Arc<StaticStore>, cache: Arc<dyn ResultCache>) -> SimilarityService {
        SimilarityService::new(
            store,
            QueryResolver::new(Arc::new(SequenceRegistry::built_in())),
            CachedPaginator::new(cache, Duration::from_secs(60)),
            Governor::new(5),
        )
    }

    fn catalog() -> Arc<StaticStore> {
        Arc::new(StaticStore::new(vec![
            Song::new("a", "s1", "A", "S1").with_chords(["A", "B"]),
            Song::new("a", "s2", "A", "S2").with_chords(["A"]),
        ]))
    }

    fn chords(list: &str) -> SimilarityParams {
        SimilarityParams {
            chords: Some(list.into()),
            ..SimilarityParams::default()
        }
    }

    #[tokio::test]
    async fn test_search_ranks_and_filters() {
        let service = service_with(catalog(), Arc::new(MemoryCache::new()));

        let page = service.search("acordes=A,B,C", &chords("A,B,C")).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].song.unique_id, "a_s1");
        assert_eq!(page[0].intersection, vec!["A", "B"]);
        assert!(page[0].difference.is_empty());
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let store = catalog();
        let service = service_with(store.clone(), Arc::new(MemoryCache::new()));

        let first = service.search("acordes=A,B,C", &chords("A,B,C")).await.unwrap();
        let calls = store.chord_lookups.load(Ordering::SeqCst);
        let second = service.search("acordes=A,B,C", &chords("A,B,C")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.chord_lookups.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_bad_page_releases_slot() {
        let service = service_with(catalog(), Arc::new(MemoryCache::new()));
        let params = SimilarityParams {
            page: Some("0".into()),
            ..chords("A,B")
        };

        for _ in 0..10 {
            let err = service.search("acordes=A,B&pagina=0", &params).await.unwrap_err();
            assert!(matches!(err, SearchError::BadRequest(_)));
        }
        assert_eq!(service.governor().available(), 5);
    }

    #[tokio::test]
    async fn test_storage_error_releases_slot() {
        let service = service_with(Arc::new(StaticStore::failing()), Arc::new(MemoryCache::new()));

        let err = service.search("acordes=A,B", &chords("A,B")).await.unwrap_err();
        assert!(matches!(err, SearchError::Internal(_)));
        assert_eq!(service.governor().available(), 5);
    }

    #[tokio::test]
    async fn test_slot_held_through_storage_phase() {
        let store = Arc::new(
            StaticStore::new(vec![Song::new("a", "s1", "A", "S1").with_chords(["A", "B"])])
                .with_delay(Duration::from_millis(20)),
        );
        let service = SimilarityService::new(
            store.clone(),
            QueryResolver::new(Arc::new(SequenceRegistry::built_in())),
            CachedPaginator::new(Arc::new(MemoryCache::new()), Duration::from_secs(60)),
            Governor::new(2),
        );

        let mut handles = Vec::new();
        for i in 0..20 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                // Distinct raw queries so every request misses the cache
                let raw = format!("acordes=A,B&n={}", i);
                service.search(&raw, &chords("A,B")).await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().len(), 1);
        }

        assert_eq!(store.chord_lookups.load(Ordering::SeqCst), 20);
        let peak = store.peak_in_flight.load(Ordering::SeqCst);
        assert!(peak >= 1 && peak <= 2, "peak in-flight lookups: {}", peak);
        assert_eq!(service.governor().available(), 2);
    }

    #[tokio::test]
    async fn test_cache_failure_still_answers() {
        let service = service_with(catalog(), Arc::new(FailingCache));

        let page = service.search("acordes=A,B,C", &chords("A,B,C")).await.unwrap();
        assert_eq!(page.len(), 1);
    }
}
