//! SQLite song catalog
//!
//! Chord-set lookups go through the `song_chords` index and alias lookups
//! through `song_sequences`; see `deciframe_common::db` for the schema.

use async_trait::async_trait;
use deciframe_common::{ChordSet, Result, Song};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use super::SongStore;

/// Song columns plus its famous sequences folded into one comma list
const SONG_COLUMNS: &str =
    "s.unique_id, s.artist_id, s.song_id, s.artist_name, s.title, s.genre, s.popularity, s.chords, \
     (SELECT group_concat(q.sequence_id, ',') FROM song_sequences q \
      WHERE q.unique_id = s.unique_id) AS famous_sequences";

/// Song catalog backed by a SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteSongStore {
    pool: SqlitePool,
}

impl SqliteSongStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert or replace a song together with its index rows
    pub async fn insert_song(&self, song: &Song) -> Result<()> {
        let chords_json = serde_json::to_string(&song.chords)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM song_chords WHERE unique_id = ?")
            .bind(&song.unique_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM song_sequences WHERE unique_id = ?")
            .bind(&song.unique_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT OR REPLACE INTO songs
             (unique_id, artist_id, song_id, artist_name, title, genre, popularity, chords)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&song.unique_id)
        .bind(&song.artist_id)
        .bind(&song.song_id)
        .bind(&song.artist_name)
        .bind(&song.title)
        .bind(&song.genre)
        .bind(song.popularity)
        .bind(&chords_json)
        .execute(&mut *tx)
        .await?;

        for chord in song.chord_set().iter() {
            sqlx::query("INSERT INTO song_chords (unique_id, chord) VALUES (?, ?)")
                .bind(&song.unique_id)
                .bind(chord.as_str())
                .execute(&mut *tx)
                .await?;
        }

        for sequence_id in &song.famous_sequences {
            sqlx::query(
                "INSERT OR IGNORE INTO song_sequences (unique_id, sequence_id) VALUES (?, ?)",
            )
            .bind(&song.unique_id)
            .bind(sequence_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

}

/// Append `AND s.genre IN (...)` when a genre filter is present
fn push_genre_filter(builder: &mut QueryBuilder<'_, Sqlite>, genres: &[String]) {
    if genres.is_empty() {
        return;
    }

    builder.push(" AND s.genre IN (");
    let mut list = builder.separated(", ");
    for genre in genres {
        list.push_bind(genre.clone());
    }
    list.push_unseparated(")");
}

fn song_from_row(row: &SqliteRow) -> Result<Song> {
    let chords_json: String = row.try_get("chords")?;
    let chords: Vec<String> = serde_json::from_str(&chords_json)?;

    let mut song = Song::new(
        row.try_get::<String, _>("artist_id")?,
        row.try_get::<String, _>("song_id")?,
        row.try_get::<String, _>("artist_name")?,
        row.try_get::<String, _>("title")?,
    )
    .with_genre(row.try_get::<String, _>("genre")?)
    .with_popularity(row.try_get::<i64, _>("popularity")?)
    .with_chords(chords);

    let sequences: Option<String> = row.try_get("famous_sequences")?;
    let mut sequences: Vec<String> = sequences
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    sequences.sort();
    song.famous_sequences = sequences;

    // Stored id wins over the derived one
    song.unique_id = row.try_get("unique_id")?;
    Ok(song)
}

#[async_trait]
impl SongStore for SqliteSongStore {
    async fn fetch_by_unique_id(&self, unique_id: &str) -> Result<Option<Song>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM songs s WHERE s.unique_id = ?",
            SONG_COLUMNS
        ))
        .bind(unique_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        song_from_row(&row).map(Some)
    }

    async fn fetch_by_chords(&self, chords: &[String], genres: &[String]) -> Result<Vec<Song>> {
        let chords = ChordSet::from_symbols(chords);
        if chords.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM songs s WHERE s.unique_id IN \
             (SELECT c.unique_id FROM song_chords c WHERE c.chord IN (",
            SONG_COLUMNS
        ));
        let mut list = builder.separated(", ");
        for chord in chords.iter() {
            list.push_bind(chord.as_str().to_string());
        }
        list.push_unseparated("))");
        push_genre_filter(&mut builder, genres);

        let rows = builder.build().fetch_all(&self.pool).await?;
        debug!(
            "Chord lookup: {} chords, {} genres → {} candidates",
            chords.cardinality(),
            genres.len(),
            rows.len()
        );

        rows.iter().map(song_from_row).collect()
    }

    async fn fetch_by_sequences(
        &self,
        sequence_ids: &[String],
        genres: &[String],
    ) -> Result<Vec<Song>> {
        if sequence_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM songs s WHERE s.unique_id IN \
             (SELECT q.unique_id FROM song_sequences q WHERE q.sequence_id IN (",
            SONG_COLUMNS
        ));
        let mut list = builder.separated(", ");
        for id in sequence_ids {
            list.push_bind(id.clone());
        }
        list.push_unseparated("))");
        push_genre_filter(&mut builder, genres);
        builder.push(" ORDER BY s.popularity DESC, s.unique_id ASC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        debug!(
            "Sequence lookup: {:?} → {} songs",
            sequence_ids,
            rows.len()
        );

        rows.iter().map(song_from_row).collect()
    }
}
