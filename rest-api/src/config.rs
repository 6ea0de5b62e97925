//! Externally supplied configuration: known languages and sites, allowed
//! badges and term length limits.
//!
//! The composition root loads this once and hands shared references to the
//! validators. Nothing in the core mutates it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{ItemId, SiteId};

/// Term length limit applied to labels, descriptions and aliases.
const DEFAULT_MAX_TERM_LENGTH: usize = 250;

/// Per-site settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Article URL pattern with a `$1` placeholder for the title, e.g.
    /// `https://en.wikipedia.org/wiki/$1`.
    pub article_url_pattern: String,
}

/// The set of sites items may link to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRegistry {
    sites: BTreeMap<SiteId, SiteConfig>,
}

impl SiteRegistry {
    /// Build a registry from explicit entries.
    pub fn new(sites: impl IntoIterator<Item = (SiteId, SiteConfig)>) -> Self {
        Self {
            sites: sites.into_iter().collect(),
        }
    }

    /// True when the site is known.
    #[must_use]
    pub fn contains(&self, site: &SiteId) -> bool {
        self.sites.contains_key(site)
    }

    /// Derive the article URL for a title on a site. Titles use underscores
    /// in URLs where the display form uses spaces.
    #[must_use]
    pub fn article_url(&self, site: &SiteId, title: &str) -> Option<String> {
        let config = self.sites.get(site)?;
        Some(
            config
                .article_url_pattern
                .replace("$1", &title.replace(' ', "_")),
        )
    }
}

/// Badge configuration: which items may mark a sitelink, and which of those
/// declare the link as an intentional redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeConfig {
    allowed: BTreeSet<ItemId>,
    redirect_badges: BTreeSet<ItemId>,
}

impl BadgeConfig {
    /// Build a badge configuration. Redirect badges are implicitly allowed.
    pub fn new(
        allowed: impl IntoIterator<Item = ItemId>,
        redirect_badges: impl IntoIterator<Item = ItemId>,
    ) -> Self {
        let redirect_badges: BTreeSet<ItemId> = redirect_badges.into_iter().collect();
        let mut allowed: BTreeSet<ItemId> = allowed.into_iter().collect();
        allowed.extend(redirect_badges.iter().cloned());
        Self {
            allowed,
            redirect_badges,
        }
    }

    /// True when the item may be used as a badge.
    #[must_use]
    pub fn is_allowed(&self, badge: &ItemId) -> bool {
        self.allowed.contains(badge)
    }

    /// True when any badge in the slice marks the sitelink as an intentional
    /// redirect, in which case title resolution must not follow redirects.
    #[must_use]
    pub fn declares_redirect(&self, badges: &[ItemId]) -> bool {
        badges.iter().any(|b| self.redirect_badges.contains(b))
    }
}

/// Full validation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Language codes terms may use.
    pub languages: BTreeSet<String>,
    /// Sites items may link to.
    pub sites: SiteRegistry,
    /// Badge rules.
    pub badges: BadgeConfig,
    /// Maximum length of a label, description or alias, in characters.
    pub max_term_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::new(BTreeSet::new(), SiteRegistry::default(), BadgeConfig::default())
    }
}

impl ValidationConfig {
    /// Build a configuration from explicit parts.
    pub fn new(
        languages: impl IntoIterator<Item = String>,
        sites: SiteRegistry,
        badges: BadgeConfig,
    ) -> Self {
        Self {
            languages: languages.into_iter().collect(),
            sites,
            badges,
            max_term_length: DEFAULT_MAX_TERM_LENGTH,
        }
    }

    /// True when the language code is known.
    #[must_use]
    pub fn is_valid_language(&self, language: &str) -> bool {
        self.languages.contains(language)
    }
}
