//! Sitelinks: links from an item to pages on external sites.
//!
//! Invariants documented on each type: one sitelink per site, trimmed
//! non-empty titles, ordered deduplicated badges, and a derived `url` that is
//! never taken from client input.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::ItemId;

/// Identifier of an external site, e.g. `enwiki`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SiteId(String);

/// Validation failure raised when constructing a [`SiteId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteIdParseError {
    /// The value is empty or contains characters outside `[a-z0-9_]`.
    #[error("not a valid site ID: {value}")]
    Malformed {
        /// The rejected value.
        value: String,
    },
}

impl SiteId {
    /// Parse a site identifier. Site ids are lowercase alphanumeric with
    /// underscores, matching wiki database naming.
    pub fn new(value: impl Into<String>) -> Result<Self, SiteIdParseError> {
        let value = value.into();
        let well_formed = !value.is_empty()
            && value
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if well_formed {
            Ok(Self(value))
        } else {
            Err(SiteIdParseError::Malformed { value })
        }
    }

    /// Borrow the serialized form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SiteId {
    type Error = SiteIdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SiteId> for String {
    fn from(value: SiteId) -> Self {
        value.0
    }
}

/// A link from an item to a page on an external site.
///
/// ## Invariants
/// - `title` is trimmed, non-empty and resolved against the target site.
/// - `badges` is ordered and free of duplicates.
/// - `url` is derived from the site registry and never client-settable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLink {
    site: SiteId,
    title: String,
    badges: Vec<ItemId>,
    url: String,
}

impl SiteLink {
    /// Assemble a sitelink from already-validated parts. Duplicate badges
    /// are dropped, keeping first occurrence order.
    pub fn new(
        site: SiteId,
        title: impl Into<String>,
        badges: Vec<ItemId>,
        url: impl Into<String>,
    ) -> Self {
        let mut deduped: Vec<ItemId> = Vec::with_capacity(badges.len());
        for badge in badges {
            if !deduped.contains(&badge) {
                deduped.push(badge);
            }
        }
        Self {
            site,
            title: title.into(),
            badges: deduped,
            url: url.into(),
        }
    }

    /// Target site.
    #[must_use]
    pub fn site(&self) -> &SiteId {
        &self.site
    }

    /// Resolved page title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Badge item ids in order.
    #[must_use]
    pub fn badges(&self) -> &[ItemId] {
        self.badges.as_slice()
    }

    /// Derived article URL.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

/// Sitelinks keyed by site, at most one per site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLinkList(BTreeMap<SiteId, SiteLink>);

impl SiteLinkList {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sitelink for a site, if present.
    #[must_use]
    pub fn sitelink(&self, site: &SiteId) -> Option<&SiteLink> {
        self.0.get(site)
    }

    /// Insert or replace the sitelink for its site, returning the previous
    /// entry when one existed.
    pub fn set(&mut self, sitelink: SiteLink) -> Option<SiteLink> {
        self.0.insert(sitelink.site.clone(), sitelink)
    }

    /// Remove the sitelink for a site, returning it if present.
    pub fn remove(&mut self, site: &SiteId) -> Option<SiteLink> {
        self.0.remove(site)
    }

    /// True when no site is linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of linked sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate sitelinks in site order.
    pub fn iter(&self) -> impl Iterator<Item = &SiteLink> {
        self.0.values()
    }
}

impl FromIterator<SiteLink> for SiteLinkList {
    fn from_iter<I: IntoIterator<Item = SiteLink>>(iter: I) -> Self {
        let mut list = Self::new();
        for sitelink in iter {
            list.set(sitelink);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn site(id: &str) -> SiteId {
        SiteId::new(id).expect("valid site id")
    }

    fn item(id: &str) -> ItemId {
        ItemId::new(id).expect("valid item id")
    }

    #[rstest]
    #[case("enwiki")]
    #[case("de_wikivoyage")]
    #[case("wiki2")]
    fn site_id_accepts_well_formed(#[case] value: &str) {
        assert_eq!(site(value).as_str(), value);
    }

    #[rstest]
    #[case("")]
    #[case("EnWiki")]
    #[case("en wiki")]
    #[case("en-wiki")]
    fn site_id_rejects_malformed(#[case] value: &str) {
        SiteId::new(value).expect_err("malformed site id");
    }

    #[test]
    fn sitelink_drops_duplicate_badges_keeping_order() {
        let link = SiteLink::new(
            site("enwiki"),
            "Potato",
            vec![item("Q17"), item("Q32"), item("Q17")],
            "https://en.wikipedia.org/wiki/Potato",
        );
        assert_eq!(link.badges(), [item("Q17"), item("Q32")]);
    }

    #[test]
    fn list_replaces_entry_for_same_site() {
        let mut list = SiteLinkList::new();
        let first = SiteLink::new(site("enwiki"), "Old", vec![], "https://x/Old");
        let second = SiteLink::new(site("enwiki"), "New", vec![], "https://x/New");
        assert!(list.set(first.clone()).is_none());
        assert_eq!(list.set(second), Some(first));
        assert_eq!(list.len(), 1);
    }
}
