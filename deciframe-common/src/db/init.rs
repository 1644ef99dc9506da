//! Database initialization
//!
//! Opens (creating if needed) the SQLite catalog and ensures the schema
//! exists. All statements are idempotent, so this is safe on every startup.
//!
//! # Tables
//! - `songs`: one row per song, chords kept as a JSON array in sheet order
//! - `song_chords`: normalized chord → song index, backs chord-set lookups
//! - `song_sequences`: famous sequence id → song index, backs alias lookups

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Open the catalog database and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // Concurrent readers alongside an occasional writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create catalog tables and indexes on an existing pool
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_songs_table(pool).await?;
    create_song_chords_table(pool).await?;
    create_song_sequences_table(pool).await?;
    Ok(())
}

async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            unique_id TEXT PRIMARY KEY,
            artist_id TEXT NOT NULL,
            song_id TEXT NOT NULL,
            artist_name TEXT NOT NULL,
            title TEXT NOT NULL,
            genre TEXT NOT NULL DEFAULT '',
            popularity INTEGER NOT NULL DEFAULT 0,
            chords TEXT NOT NULL DEFAULT '[]'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_genre ON songs(genre)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_popularity ON songs(popularity DESC)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_song_chords_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS song_chords (
            unique_id TEXT NOT NULL REFERENCES songs(unique_id) ON DELETE CASCADE,
            chord TEXT NOT NULL,
            PRIMARY KEY (unique_id, chord)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_song_chords_chord ON song_chords(chord)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_song_sequences_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS song_sequences (
            unique_id TEXT NOT NULL REFERENCES songs(unique_id) ON DELETE CASCADE,
            sequence_id TEXT NOT NULL,
            PRIMARY KEY (unique_id, sequence_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_song_sequences_sequence ON song_sequences(sequence_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
