//! Similarity ranking
//!
//! A candidate is similar to the query when it shares more than one chord
//! with it. Similar songs are ordered by how many chords they add beyond the
//! query (fewest first), then by unique id so equal ranks come out in a
//! stable order.

use deciframe_common::{SimilarSong, Song};

use crate::resolver::ChordQuery;

/// Minimum shared chords for a candidate to count as similar (exclusive)
const MIN_SHARED_CHORDS: usize = 1;

/// Compare, filter and order candidates against `query`
///
/// Pure and synchronous; the full ranked sequence is returned unpaginated.
pub fn rank(query: &ChordQuery, candidates: Vec<Song>) -> Vec<SimilarSong> {
    let mut ranked: Vec<SimilarSong> = candidates
        .into_iter()
        .filter(|song| query.source_id.as_deref() != Some(song.unique_id.as_str()))
        .map(|song| SimilarSong::compare(song, &query.chords))
        .filter(|result| result.intersection.len() > MIN_SHARED_CHORDS)
        .collect();

    ranked.sort_by(|a, b| {
        a.difference
            .len()
            .cmp(&b.difference.len())
            .then_with(|| a.song.unique_id.cmp(&b.song.unique_id))
    });

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use deciframe_common::ChordSet;

    fn query(chords: &[&str]) -> ChordQuery {
        ChordQuery {
            chords: ChordSet::from_symbols(chords),
            ..ChordQuery::default()
        }
    }

    fn song(id: &str, chords: &[&str]) -> Song {
        Song::new("x", id, "X", id).with_chords(chords.iter().copied())
    }

    #[test]
    fn test_drops_songs_sharing_one_chord_or_less() {
        let ranked = rank(
            &query(&["A", "B", "C"]),
            vec![song("s1", &["A", "B"]), song("s2", &["A"]), song("s3", &["D", "E"])],
        );

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].song.unique_id, "x_s1");
        assert_eq!(ranked[0].intersection, vec!["A", "B"]);
        assert!(ranked[0].difference.is_empty());
    }

    #[test]
    fn test_intersection_not_song_size_decides() {
        // Many chords but only one in common
        let ranked = rank(&query(&["A", "B"]), vec![song("s1", &["A", "C", "D", "E"])]);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_orders_by_difference_size() {
        let ranked = rank(
            &query(&["G", "D", "Em", "C"]),
            vec![
                song("far", &["G", "D", "F", "Bb", "Eb"]),
                song("near", &["G", "D", "Em"]),
                song("mid", &["G", "C", "A7"]),
            ],
        );

        let ids: Vec<&str> = ranked.iter().map(|r| r.song.song_id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].difference.len() <= w[1].difference.len()));
    }

    #[test]
    fn test_ties_broken_by_unique_id() {
        let ranked = rank(
            &query(&["A", "B"]),
            vec![song("c", &["A", "B", "X"]), song("a", &["A", "B", "Y"]), song("b", &["A", "B", "Z"])],
        );

        let ids: Vec<&str> = ranked.iter().map(|r| r.song.song_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_excludes_source_song() {
        let q = ChordQuery {
            source_id: Some("x_self".into()),
            ..query(&["A", "B", "C"])
        };
        let ranked = rank(&q, vec![song("self", &["A", "B", "C"]), song("other", &["A", "B"])]);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].song.unique_id, "x_other");
    }

    #[test]
    fn test_empty_query_yields_nothing() {
        let ranked = rank(&query(&[]), vec![song("s1", &["A", "B", "C"])]);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_chords_compared_normalized() {
        let ranked = rank(&query(&["am", "G "]), vec![song("s1", &["Am", "G", "C"])]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].difference, vec!["C"]);
    }
}
