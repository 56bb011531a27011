//! The result of a successful parse

use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Key/value pairs read from one input line
///
/// Iteration follows the order the keys first appeared in. Equality ignores
/// order: two results are equal when they hold the same pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parsed {
    entries: IndexMap<String, String>,
}

impl Parsed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored pairs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `value` under `key`, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes a key while keeping the order of the remaining pairs
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Borrows the underlying ordered map
    pub fn as_map(&self) -> &IndexMap<String, String> {
        &self.entries
    }

    pub fn into_map(self) -> IndexMap<String, String> {
        self.entries
    }
}

impl Index<&str> for Parsed {
    type Output = str;

    /// Panics if `key` is absent, like indexing a map
    fn index(&self, key: &str) -> &str {
        &self.entries[key]
    }
}

impl From<IndexMap<String, String>> for Parsed {
    fn from(entries: IndexMap<String, String>) -> Self {
        Self { entries }
    }
}

impl<K, V> FromIterator<(K, V)> for Parsed
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for Parsed
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries.extend(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
    }
}

impl IntoIterator for Parsed {
    type Item = (String, String);
    type IntoIter = IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Parsed {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
