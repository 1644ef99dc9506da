//! Catalog storage access
//!
//! The similarity pipeline only sees the [`SongStore`] trait. The SQLite
//! adapter in [`songs`] is what the binary wires in.

use async_trait::async_trait;
use deciframe_common::{Result, Song};

pub mod songs;

pub use songs::SqliteSongStore;

/// Indexed lookups over the song catalog
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Look up one song by its unique id; `None` when absent
    async fn fetch_by_unique_id(&self, unique_id: &str) -> Result<Option<Song>>;

    /// Songs containing at least one of `chords` (normalized symbols),
    /// optionally restricted to `genres`
    async fn fetch_by_chords(&self, chords: &[String], genres: &[String]) -> Result<Vec<Song>>;

    /// Songs tagged with any of `sequence_ids`, optionally restricted to
    /// `genres`, most popular first
    async fn fetch_by_sequences(
        &self,
        sequence_ids: &[String],
        genres: &[String],
    ) -> Result<Vec<Song>>;
}
