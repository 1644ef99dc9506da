//! Catalog models
//!
//! JSON field names follow the catalog's published wire format
//! (`id_unico_musica`, `nome_artista`, `acordes`, ...).

use serde::{Deserialize, Serialize};

use crate::chords::ChordSet;

/// Base URL of the chord sheet site the catalog was built from
pub const CHORD_SHEET_BASE_URL: &str = "http://www.cifraclub.com.br";

/// A song as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// `{artist_id}_{song_id}`
    #[serde(rename = "id_unico_musica")]
    pub unique_id: String,

    #[serde(rename = "id_artista")]
    pub artist_id: String,

    #[serde(rename = "id_musica")]
    pub song_id: String,

    #[serde(rename = "nome_artista")]
    pub artist_name: String,

    #[serde(rename = "nome_musica")]
    pub title: String,

    #[serde(rename = "genero")]
    pub genre: String,

    /// Higher is more popular
    #[serde(rename = "popularidade")]
    pub popularity: i64,

    /// Chord symbols in sheet order, as stored
    #[serde(rename = "acordes")]
    pub chords: Vec<String>,

    /// Named famous progressions this song contains
    #[serde(rename = "seq_famosas", default)]
    pub famous_sequences: Vec<String>,

    pub url: String,
}

impl Song {
    /// Create a song, deriving its unique id and canonical URL
    pub fn new(
        artist_id: impl Into<String>,
        song_id: impl Into<String>,
        artist_name: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let artist_id = artist_id.into();
        let song_id = song_id.into();

        Self {
            unique_id: Self::unique_id_for(&artist_id, &song_id),
            url: Self::canonical_url(&artist_id, &song_id),
            artist_id,
            song_id,
            artist_name: artist_name.into(),
            title: title.into(),
            genre: String::new(),
            popularity: 0,
            chords: Vec::new(),
            famous_sequences: Vec::new(),
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_popularity(mut self, popularity: i64) -> Self {
        self.popularity = popularity;
        self
    }

    pub fn with_chords<I, S>(mut self, chords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chords = chords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_famous_sequences<I, S>(mut self, sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.famous_sequences = sequences.into_iter().map(Into::into).collect();
        self
    }

    /// Catalog-wide identifier composed from artist and song ids
    pub fn unique_id_for(artist_id: &str, song_id: &str) -> String {
        format!("{}_{}", artist_id, song_id)
    }

    /// Public chord sheet URL for a song
    pub fn canonical_url(artist_id: &str, song_id: &str) -> String {
        format!("{}/{}/{}", CHORD_SHEET_BASE_URL, artist_id, song_id)
    }

    /// Normalized, deduplicated chords of this song
    pub fn chord_set(&self) -> ChordSet {
        ChordSet::from_symbols(&self.chords)
    }
}

/// A song returned by a similarity query
///
/// `difference` holds the song's chords missing from the query,
/// `intersection` the chords it shares with the query. Both are empty for
/// results of a sequence search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarSong {
    #[serde(flatten)]
    pub song: Song,

    #[serde(rename = "diferenca")]
    pub difference: Vec<String>,

    #[serde(rename = "intersecao")]
    pub intersection: Vec<String>,
}

impl SimilarSong {
    /// Compare a candidate against the query chords
    pub fn compare(song: Song, query: &ChordSet) -> Self {
        let chords = song.chord_set();
        Self {
            difference: chords.difference(query).to_symbols(),
            intersection: chords.intersection(query).to_symbols(),
            song,
        }
    }

    /// Wrap a song without chord comparison (sequence search)
    pub fn unranked(song: Song) -> Self {
        Self {
            song,
            difference: Vec::new(),
            intersection: Vec::new(),
        }
    }
}
