//! Parsed assignments and the resolved environment map

use std::collections::{btree_map, BTreeMap, BTreeSet};

/// Quoting used for the value of an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteKind {
    #[default]
    None,
    Single,
    Double,
    Backtick,
}

impl QuoteKind {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '\'' => Some(QuoteKind::Single),
            '"' => Some(QuoteKind::Double),
            '`' => Some(QuoteKind::Backtick),
            _ => None,
        }
    }

    /// Single-quoted values are taken literally and never substituted
    pub fn is_literal(&self) -> bool {
        matches!(self, QuoteKind::Single)
    }
}

/// One logical `KEY=VALUE` assignment produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub key: String,
    pub value: String,
    pub quote: QuoteKind,
    /// 1-based line the assignment starts on
    pub line: usize,
}

/// Variable name to resolved value mapping.
///
/// Keys are kept sorted so that iteration, and therefore substitution order,
/// is deterministic. Keys stored from single-quoted values are remembered as
/// literals and are never substituted. Keys whose value has already been
/// through substitution are remembered too, so their text is final even when
/// it still contains `${`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMap {
    vars: BTreeMap<String, String>,
    literals: BTreeSet<String>,
    resolved: BTreeSet<String>,
}

impl EnvironmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Insert a value that still takes part in substitution
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.literals.remove(&key);
        self.resolved.remove(&key);
        self.vars.insert(key, value.into());
    }

    /// Insert a value that is stored as-is
    pub fn insert_literal(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.resolved.remove(&key);
        self.literals.insert(key.clone());
        self.vars.insert(key, value.into());
    }

    /// Store the substituted value of an existing key, keeping its literal flag
    pub fn update(&mut self, key: &str, value: String) {
        if let Some(slot) = self.vars.get_mut(key) {
            *slot = value;
            self.resolved.insert(key.to_string());
        }
    }

    pub fn is_literal(&self, key: &str) -> bool {
        self.literals.contains(key)
    }

    /// Whether the stored value is final: a literal, or already substituted
    pub fn is_resolved(&self, key: &str) -> bool {
        self.literals.contains(key) || self.resolved.contains(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.literals.remove(key);
        self.resolved.remove(key);
        self.vars.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvironmentMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = EnvironmentMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for EnvironmentMap {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.into_iter()
    }
}
