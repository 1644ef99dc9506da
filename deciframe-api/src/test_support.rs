//! In-memory stand-ins for storage and cache used by unit tests

use async_trait::async_trait;
use deciframe_common::{ChordSet, Error, Result, SimilarSong, Song};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::cache::ResultCache;
use crate::db::SongStore;

/// Fixed song list answering lookups by scanning; optionally always failing
#[derive(Debug, Default)]
pub struct StaticStore {
    songs: Vec<Song>,
    fail: bool,
    /// Time each chord lookup takes
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    pub chord_lookups: AtomicUsize,
    /// Most chord lookups ever running at the same time
    pub peak_in_flight: AtomicUsize,
}

impl StaticStore {
    pub fn new(songs: Vec<Song>) -> Self {
        Self {
            songs,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(Error::Internal("storage unavailable".to_string()));
        }
        Ok(())
    }

    fn genre_matches(song: &Song, genres: &[String]) -> bool {
        genres.is_empty() || genres.contains(&song.genre)
    }
}

#[async_trait]
impl SongStore for StaticStore {
    async fn fetch_by_unique_id(&self, unique_id: &str) -> Result<Option<Song>> {
        self.check()?;
        Ok(self.songs.iter().find(|s| s.unique_id == unique_id).cloned())
    }

    async fn fetch_by_chords(&self, chords: &[String], genres: &[String]) -> Result<Vec<Song>> {
        self.check()?;
        self.chord_lookups.fetch_add(1, Ordering::SeqCst);

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let query = ChordSet::from_symbols(chords);
        Ok(self
            .songs
            .iter()
            .filter(|s| !s.chord_set().intersection(&query).is_empty())
            .filter(|s| Self::genre_matches(s, genres))
            .cloned()
            .collect())
    }

    async fn fetch_by_sequences(
        &self,
        sequence_ids: &[String],
        genres: &[String],
    ) -> Result<Vec<Song>> {
        self.check()?;
        let mut songs: Vec<Song> = self
            .songs
            .iter()
            .filter(|s| s.famous_sequences.iter().any(|id| sequence_ids.contains(id)))
            .filter(|s| Self::genre_matches(s, genres))
            .cloned()
            .collect();
        songs.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        Ok(songs)
    }
}

/// Cache whose every operation fails
#[derive(Debug)]
pub struct FailingCache;

#[async_trait]
impl ResultCache for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<SimilarSong>>> {
        Err(Error::Internal("cache unreachable".to_string()))
    }

    async fn set(&self, _key: &str, _page: &[SimilarSong], _ttl: Duration) -> Result<()> {
        Err(Error::Internal("cache unreachable".to_string()))
    }
}
