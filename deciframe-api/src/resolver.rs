//! Query resolution
//!
//! Turns request parameters into one of two query shapes:
//! - a chord query (explicit chord list, or the chords of a referenced song),
//!   which goes on to the similarity ranker;
//! - a sequence search (registered alias), whose results come back from
//!   storage already ordered by popularity and skip the ranker.
//!
//! Parameter precedence: `sequencia` (registered alias only) > `acordes` >
//! `id_unico_musica` > empty query.

use deciframe_common::{ChordSet, SimilarSong};
use std::sync::Arc;
use tracing::debug;

use crate::db::SongStore;
use crate::error::{Result, SearchError};
use crate::sequences::SequenceRegistry;

/// Raw `/similares` query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimilarityParams {
    /// `acordes`: comma-separated chord list
    pub chords: Option<String>,

    /// `id_unico_musica`: catalog song whose chords form the query
    pub song_id: Option<String>,

    /// `sequencia`: named sequence alias
    pub sequence: Option<String>,

    /// `generos`: comma-separated genre filter
    pub genres: Option<String>,

    /// `pagina`: 1-indexed page number
    pub page: Option<String>,
}

impl SimilarityParams {
    /// Collect parameters from decoded query pairs
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "acordes" => &mut params.chords,
                "id_unico_musica" => &mut params.song_id,
                "sequencia" => &mut params.sequence,
                "generos" => &mut params.genres,
                "pagina" => &mut params.page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Genre filter; empty means "any genre"
    pub fn genre_filter(&self) -> Vec<String> {
        self.genres
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Canonical chord query handed to the ranker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordQuery {
    pub chords: ChordSet,
    pub genres: Vec<String>,
    /// Song the chords were taken from; excluded from its own results
    pub source_id: Option<String>,
}

/// Outcome of resolving a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Compare candidates against these chords
    Chords(ChordQuery),
    /// Sequence search results, already ordered by descending popularity
    Ranked(Vec<SimilarSong>),
}

/// Resolves request parameters against the alias registry and storage
#[derive(Debug, Clone)]
pub struct QueryResolver {
    registry: Arc<SequenceRegistry>,
}

impl QueryResolver {
    pub fn new(registry: Arc<SequenceRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SequenceRegistry {
        &self.registry
    }

    pub async fn resolve(
        &self,
        params: &SimilarityParams,
        store: &dyn SongStore,
    ) -> Result<Resolution> {
        let genres = params.genre_filter();

        if let Some(sequence_ids) = non_empty(&params.sequence)
            .and_then(|alias| self.registry.lookup(alias))
        {
            debug!("Sequence search for {:?}", sequence_ids);
            let songs = store.fetch_by_sequences(sequence_ids, &genres).await?;
            return Ok(Resolution::Ranked(
                songs.into_iter().map(SimilarSong::unranked).collect(),
            ));
        }

        if let Some(list) = non_empty(&params.chords) {
            return Ok(Resolution::Chords(ChordQuery {
                chords: ChordSet::parse_list(list),
                genres,
                source_id: None,
            }));
        }

        if let Some(song_id) = non_empty(&params.song_id) {
            let song = store
                .fetch_by_unique_id(song_id)
                .await?
                .ok_or_else(|| SearchError::NotFound(format!("song {}", song_id)))?;

            return Ok(Resolution::Chords(ChordQuery {
                chords: song.chord_set(),
                genres,
                source_id: Some(song.unique_id),
            }));
        }

        Ok(Resolution::Chords(ChordQuery {
            genres,
            ..ChordQuery::default()
        }))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
