//! Terms: labels, descriptions and aliases keyed by language.
//!
//! A [`TermList`] holds at most one text per language and keeps languages in
//! a stable order so serializations are deterministic. [`AliasGroupList`]
//! holds an ordered, deduplicated list of aliases per language.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single label or description in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Language code, e.g. `en`.
    pub language: String,
    /// Trimmed, non-empty text.
    pub text: String,
}

impl Term {
    /// Build a term from its parts.
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

/// Labels or descriptions keyed by language, one text per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermList(BTreeMap<String, String>);

impl TermList {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text for a language, if present.
    #[must_use]
    pub fn text(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    /// Insert or replace the text for a language.
    pub fn set(&mut self, term: Term) {
        self.0.insert(term.language, term.text);
    }

    /// Remove the text for a language, returning it if present.
    pub fn remove(&mut self, language: &str) -> Option<String> {
        self.0.remove(language)
    }

    /// True when no language carries a text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of languages present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate languages and texts in language order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }
}

impl FromIterator<Term> for TermList {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut list = Self::new();
        for term in iter {
            list.set(term);
        }
        list
    }
}

/// Aliases in one language: an ordered list without duplicates or blanks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasGroup {
    /// Language code, e.g. `en`.
    pub language: String,
    /// Aliases in insertion order.
    pub aliases: Vec<String>,
}

impl AliasGroup {
    /// Build an alias group from its parts.
    pub fn new(language: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            language: language.into(),
            aliases,
        }
    }
}

/// Alias groups keyed by language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasGroupList(BTreeMap<String, Vec<String>>);

impl AliasGroupList {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Aliases for a language, if any.
    #[must_use]
    pub fn aliases(&self, language: &str) -> Option<&[String]> {
        self.0.get(language).map(Vec::as_slice)
    }

    /// Insert or replace the alias group for a language. Empty groups are
    /// dropped rather than stored.
    pub fn set(&mut self, group: AliasGroup) {
        if group.aliases.is_empty() {
            self.0.remove(&group.language);
        } else {
            self.0.insert(group.language, group.aliases);
        }
    }

    /// True when no language carries aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate groups in language order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(l, a)| (l.as_str(), a.as_slice()))
    }
}

impl FromIterator<AliasGroup> for AliasGroupList {
    fn from_iter<I: IntoIterator<Item = AliasGroup>>(iter: I) -> Self {
        let mut list = Self::new();
        for group in iter {
            list.set(group);
        }
        list
    }
}
