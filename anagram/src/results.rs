//! The result of an anagram search.
//!
//! Workers insert into a concurrent set while the pipeline runs; once every
//! worker has exited the session freezes that set into an [`AnagramSet`],
//! which the caller owns outright. Nothing in the crate keeps a handle to it.
use serde::Serialize;
use std::collections::hash_set;
use std::collections::HashSet;

/// Deduplicated, decoded dictionary words that are anagrams of the target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnagramSet {
    words: HashSet<String>,
}

impl AnagramSet {
    /// Creates a new empty result set
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of distinct matches
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Iterates the matches in no particular order
    pub fn iter(&self) -> hash_set::Iter<'_, String> {
        self.words.iter()
    }

    /// Returns the matches sorted, for stable output
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut words: Vec<String> = self.words.iter().cloned().collect();
        words.sort_unstable();
        words
    }
}

impl FromIterator<String> for AnagramSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AnagramSet {
    type Item = String;
    type IntoIter = hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.into_iter()
    }
}

impl<'a> IntoIterator for &'a AnagramSet {
    type Item = &'a String;
    type IntoIter = hash_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}
