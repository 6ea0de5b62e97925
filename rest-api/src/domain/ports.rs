//! Domain ports defining the edges of the core.
//!
//! Ports describe how the use cases expect to interact with driven
//! collaborators (entity storage, wiki page lookup). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants. Storage calls are all-or-nothing from the core's point of view;
//! nothing here is retried internally.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use super::edit::EditMetadata;
use super::ids::ItemId;
use super::item::Item;
use super::sitelink::SiteId;

/// Errors surfaced by read-side storage adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemReadError {
    /// Storage connectivity failure.
    #[error("item storage connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// Lookup failed during execution.
    #[error("item storage query failed: {message}")]
    Query {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl ItemReadError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors surfaced by write-side storage adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemWriteError {
    /// Storage connectivity failure.
    #[error("item storage connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// The write was rejected or could not complete.
    #[error("item write failed: {message}")]
    Write {
        /// Adapter-provided failure description.
        message: String,
    },
    /// The entity changed between read and write. The whole request fails;
    /// retrying is the caller's decision.
    #[error("item changed concurrently: {message}")]
    Conflict {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl ItemWriteError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for write failures.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }

    /// Helper for optimistic-concurrency conflicts.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the external site adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteAccessError {
    /// The target site could not be reached.
    #[error("site {site} is unreachable: {message}")]
    Unreachable {
        /// Site that failed to answer.
        site: String,
        /// Adapter-provided failure description.
        message: String,
    },
}

impl SiteAccessError {
    /// Helper for unreachable sites.
    pub fn unreachable(site: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unreachable {
            site: site.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a latest-revision metadata lookup.
///
/// Not-found and redirect are peers: a redirected item must never be
/// reported as missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestItemRevision {
    /// No item with this id has ever existed (or it was deleted).
    NotFound,
    /// The id has been merged into another item.
    Redirect(ItemId),
    /// A concrete latest revision.
    Concrete {
        /// Revision identifier.
        revision_id: u64,
        /// Revision timestamp.
        last_modified: DateTime<Utc>,
    },
}

/// A persisted item revision as returned by the write ports.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRevision {
    /// The item as stored.
    pub item: Item,
    /// New revision identifier.
    pub revision_id: u64,
    /// New revision timestamp.
    pub last_modified: DateTime<Utc>,
}

impl ItemRevision {
    /// Assemble a revision record.
    pub fn new(item: Item, revision_id: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            item,
            revision_id,
            last_modified,
        }
    }
}

/// Latest-revision metadata lookup.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ItemRevisionRetriever: Send + Sync {
    /// Fetch metadata for the latest revision of an item.
    async fn latest_revision(&self, id: &ItemId) -> Result<LatestItemRevision, ItemReadError>;
}

/// Full item retrieval.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ItemRetriever: Send + Sync {
    /// Fetch an item by id, `None` when it does not exist.
    async fn item(&self, id: &ItemId) -> Result<Option<Item>, ItemReadError>;
}

/// Creation of new items.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ItemCreator: Send + Sync {
    /// Persist a new item, assigning its id and first revision.
    async fn create(
        &self,
        item: Item,
        metadata: EditMetadata,
    ) -> Result<ItemRevision, ItemWriteError>;
}

/// Mutation of existing items.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ItemUpdater: Send + Sync {
    /// Persist a new revision of an existing item.
    async fn update(
        &self,
        item: Item,
        metadata: EditMetadata,
    ) -> Result<ItemRevision, ItemWriteError>;
}

/// Page title resolution on external sites.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SitelinkTargetResolver: Send + Sync {
    /// Resolve a raw title against the site's normalization rules.
    ///
    /// Returns the canonical title of an existing page, following redirects
    /// when `follow_redirects` is set, or `None` when no such page exists.
    async fn resolve_title(
        &self,
        site: &SiteId,
        title: &str,
        follow_redirects: bool,
    ) -> Result<Option<String>, SiteAccessError>;
}

/// Cross-item sitelink uniqueness lookup.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SitelinkConflictChecker: Send + Sync {
    /// Item already linking the given site and title, if any.
    async fn item_for_sitelink(
        &self,
        site: &SiteId,
        title: &str,
    ) -> Result<Option<ItemId>, ItemReadError>;
}

/// Cross-item label/description uniqueness lookup.
///
/// This check runs at validation time and can race with a concurrent item
/// creation; storage must enforce the uniqueness constraint on write.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TermDuplicateDetector: Send + Sync {
    /// Item already carrying the given label and description in a language,
    /// if any.
    async fn item_with_label_and_description(
        &self,
        language: &str,
        label: &str,
        description: &str,
    ) -> Result<Option<ItemId>, ItemReadError>;
}
