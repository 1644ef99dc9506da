//! Registry of named chord-sequence aliases
//!
//! An alias such as `BmGDA` names a famous progression. Songs carry the
//! identifiers of the progressions they contain; the registry maps each
//! alias to the identifiers that count as a match.
//!
//! Built once at startup and shared read-only.

use std::collections::{BTreeMap, HashMap};

/// The I–V–vi–IV family in common keys, each alias mapping to itself
const BUILT_IN_ALIASES: &[&str] = &["BmGDA", "CGAmF", "GDEmC", "AmFCG", "DABmG", "EBC#mA"];

/// Immutable alias → sequence identifiers map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRegistry {
    aliases: HashMap<String, Vec<String>>,
}

impl SequenceRegistry {
    /// Registry from configured aliases
    pub fn new(aliases: HashMap<String, Vec<String>>) -> Self {
        Self { aliases }
    }

    /// Built-in registry used when the configuration defines no aliases
    pub fn built_in() -> Self {
        Self::new(
            BUILT_IN_ALIASES
                .iter()
                .map(|alias| (alias.to_string(), vec![alias.to_string()]))
                .collect(),
        )
    }

    /// Registry from the `[sequences]` config table, or the built-in one
    /// when the table is empty
    pub fn from_config(sequences: &BTreeMap<String, Vec<String>>) -> Self {
        if sequences.is_empty() {
            return Self::built_in();
        }
        Self::new(
            sequences
                .iter()
                .map(|(alias, ids)| (alias.clone(), ids.clone()))
                .collect(),
        )
    }

    /// Sequence identifiers for `alias` (exact match)
    pub fn lookup(&self, alias: &str) -> Option<&[String]> {
        self.aliases.get(alias).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for SequenceRegistry {
    fn default() -> Self {
        Self::built_in()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_aliases() {
        let registry = SequenceRegistry::built_in();
        assert_eq!(registry.len(), BUILT_IN_ALIASES.len());
        assert_eq!(registry.lookup("BmGDA"), Some(&["BmGDA".to_string()][..]));
        assert!(registry.lookup("bmgda").is_none());
        assert!(registry.lookup("XYZ").is_none());
    }

    #[test]
    fn test_from_config_replaces_built_ins() {
        let mut table = BTreeMap::new();
        table.insert("pop-punk".to_string(), vec!["CGAmF".to_string(), "GDEmC".to_string()]);

        let registry = SequenceRegistry::from_config(&table);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("pop-punk").unwrap().len(), 2);
        assert!(registry.lookup("BmGDA").is_none());
    }

    #[test]
    fn test_empty_config_falls_back() {
        let registry = SequenceRegistry::from_config(&BTreeMap::new());
        assert_eq!(registry, SequenceRegistry::built_in());
    }
}
