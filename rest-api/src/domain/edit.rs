//! Edit metadata and typed edit summaries.
//!
//! A use case describes the semantic change it made (`add` vs `replace` vs
//! `set-badges` vs `remove`) as data; turning that into the human-readable
//! log line is an external formatting concern.

use serde::{Deserialize, Serialize};

use super::ids::StatementId;
use super::sitelink::{SiteId, SiteLink};

/// Metadata attached to a persisted edit, passed through to storage
/// unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditMetadata {
    /// Change tags to record on the revision.
    pub tags: Vec<String>,
    /// Whether the edit was made by a bot account.
    pub is_bot: bool,
    /// Acting user, when authenticated.
    pub user: Option<String>,
    /// Typed description of the semantic change.
    pub summary: EditSummary,
}

impl EditMetadata {
    /// Assemble edit metadata.
    pub fn new(
        tags: Vec<String>,
        is_bot: bool,
        user: Option<String>,
        summary: EditSummary,
    ) -> Self {
        Self {
            tags,
            is_bot,
            user,
            summary,
        }
    }
}

/// Typed description of what an edit changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "edit", rename_all = "kebab-case")]
pub enum EditSummary {
    /// A whole item was created.
    CreateItem {
        /// Free-form client comment.
        comment: Option<String>,
    },
    /// A sitelink changed.
    Sitelink(SitelinkEditSummary),
    /// Aliases changed through a patch.
    PatchAliases {
        /// Free-form client comment.
        comment: Option<String>,
    },
    /// A statement was removed.
    RemoveStatement {
        /// Free-form client comment.
        comment: Option<String>,
        /// Identifier of the removed statement.
        statement_id: StatementId,
    },
}

/// Sitelink edit variants, matching the create-vs-replace semantics the
/// response layer exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum SitelinkEditSummary {
    /// A sitelink was added for a previously unlinked site.
    Add {
        /// Free-form client comment.
        comment: Option<String>,
        /// The new sitelink.
        sitelink: SiteLink,
    },
    /// An existing sitelink was replaced with a different title.
    Replace {
        /// Free-form client comment.
        comment: Option<String>,
        /// The new sitelink.
        sitelink: SiteLink,
    },
    /// Only the badge set of an existing sitelink changed.
    SetBadges {
        /// Free-form client comment.
        comment: Option<String>,
        /// The sitelink with its new badges.
        sitelink: SiteLink,
    },
    /// A sitelink was removed.
    Remove {
        /// Free-form client comment.
        comment: Option<String>,
        /// Site the removed link pointed at.
        site: SiteId,
    },
    /// Sitelinks changed through a patch.
    Patch {
        /// Free-form client comment.
        comment: Option<String>,
    },
}
