//! # Deciframe Common Library
//!
//! Shared code for the Deciframe services:
//! - Chord symbols and chord sets
//! - Song and similarity result models
//! - Bootstrap configuration loading
//! - SQLite schema initialization
//! - Common error type

pub mod chords;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use chords::{Chord, ChordSet};
pub use error::{Error, Result};
pub use models::{SimilarSong, Song};
