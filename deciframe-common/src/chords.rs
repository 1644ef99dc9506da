//! Chord symbols and chord sets
//!
//! A chord set is the harmonic fingerprint of a song or query: the distinct
//! chord symbols it uses, with order and repetition discarded.
//!
//! # Normalization
//!
//! Chord symbols are compared in normalized form:
//! - all whitespace is removed (`"A m"` → `"Am"`)
//! - the root letter is upper-cased (`"c#m7"` → `"C#m7"`)
//! - the quality suffix keeps its case (`"Am"` and `"AM"` are different chords)
//!
//! Symbols that are empty after normalization are dropped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single normalized chord symbol
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chord(String);

impl Chord {
    /// Normalize a raw chord symbol
    ///
    /// Returns `None` when nothing is left after stripping whitespace.
    ///
    /// # Examples
    /// ```
    /// use deciframe_common::Chord;
    ///
    /// assert_eq!(Chord::parse(" am ").unwrap().as_str(), "Am");
    /// assert_eq!(Chord::parse("c# m7").unwrap().as_str(), "C#m7");
    /// assert!(Chord::parse("   ").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.chars().filter(|c| !c.is_whitespace());
        let root = chars.next()?;

        let mut symbol = String::with_capacity(raw.len());
        symbol.push(root.to_ascii_uppercase());
        symbol.extend(chars);

        Some(Self(symbol))
    }

    /// Normalized symbol
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Chord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Duplicate-free collection of normalized chords
///
/// Iteration follows the lexical order of the normalized symbols. Callers
/// should only rely on membership and cardinality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordSet {
    chords: BTreeSet<Chord>,
}

impl ChordSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw chord symbols, normalizing and deduplicating
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        symbols
            .into_iter()
            .filter_map(|s| Chord::parse(s.as_ref()))
            .collect()
    }

    /// Build a set from a comma-separated list (`"A,B, C"`)
    pub fn parse_list(list: &str) -> Self {
        Self::from_symbols(list.split(','))
    }

    /// Chords in `self` that are absent from `other`
    pub fn difference(&self, other: &ChordSet) -> ChordSet {
        self.chords.difference(&other.chords).cloned().collect()
    }

    /// Chords present in both `self` and `other`
    pub fn intersection(&self, other: &ChordSet) -> ChordSet {
        self.chords.intersection(&other.chords).cloned().collect()
    }

    /// Number of distinct chords
    pub fn cardinality(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Membership test; `symbol` is normalized before lookup
    pub fn contains(&self, symbol: &str) -> bool {
        Chord::parse(symbol).is_some_and(|chord| self.chords.contains(&chord))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chord> {
        self.chords.iter()
    }

    /// Normalized symbols as owned strings
    pub fn to_symbols(&self) -> Vec<String> {
        self.chords.iter().map(|c| c.0.clone()).collect()
    }
}

impl FromIterator<Chord> for ChordSet {
    fn from_iter<T: IntoIterator<Item = Chord>>(iter: T) -> Self {
        Self {
            chords: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ChordSet {
    type Item = Chord;
    type IntoIter = std::collections::btree_set::IntoIter<Chord>;

    fn into_iter(self) -> Self::IntoIter {
        self.chords.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(symbols: &[&str]) -> ChordSet {
        ChordSet::from_symbols(symbols)
    }

    #[test]
    fn test_normalization() {
        assert_eq!(Chord::parse("am").unwrap().as_str(), "Am");
        assert_eq!(Chord::parse(" G7 ").unwrap().as_str(), "G7");
        assert_eq!(Chord::parse("F# m").unwrap().as_str(), "F#m");
        assert_eq!(Chord::parse("bb").unwrap().as_str(), "Bb");
        assert!(Chord::parse("").is_none());
        assert!(Chord::parse(" \t").is_none());
    }

    #[test]
    fn test_quality_case_is_preserved() {
        assert_ne!(Chord::parse("Am"), Chord::parse("AM"));
    }

    #[test]
    fn test_deduplicates_after_normalization() {
        let s = set(&["Am", "am", " A m", "C", "C"]);
        assert_eq!(s.cardinality(), 2);
        assert!(s.contains("Am"));
        assert!(s.contains("c"));
    }

    #[test]
    fn test_parse_list_skips_empty_items() {
        let s = ChordSet::parse_list("A, B ,,C,");
        assert_eq!(s.to_symbols(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_difference() {
        let a = set(&["A", "B", "C", "D"]);
        let b = set(&["b", "D", "E"]);
        assert_eq!(a.difference(&b).to_symbols(), vec!["A", "C"]);
        assert_eq!(b.difference(&a).to_symbols(), vec!["E"]);
    }

    #[test]
    fn test_intersection() {
        let a = set(&["A", "B", "C"]);
        let b = set(&["C", "a", "G"]);
        let i = a.intersection(&b);
        assert_eq!(i.cardinality(), 2);
        assert!(i.contains("A"));
        assert!(i.contains("C"));
    }

    #[test]
    fn test_subset_has_empty_difference() {
        let song = set(&["A", "B"]);
        let query = set(&["A", "B", "C"]);
        assert!(song.difference(&query).is_empty());
        assert_eq!(song.intersection(&query).cardinality(), 2);
    }

    #[test]
    fn test_empty_sets() {
        let empty = ChordSet::new();
        let a = set(&["A"]);
        assert!(empty.intersection(&a).is_empty());
        assert!(empty.difference(&a).is_empty());
        assert_eq!(a.difference(&empty), a);
    }
}
