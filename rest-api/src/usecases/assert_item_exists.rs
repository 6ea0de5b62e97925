//! Shared precondition: the subject item must exist and not be a redirect.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::ports::{ItemRevisionRetriever, LatestItemRevision};
use crate::domain::ItemId;

use super::error::{ErrorCode, ExecutionError, UseCaseError};

/// Checks that an item exists, yielding its latest revision metadata.
#[derive(Clone)]
pub struct AssertItemExists {
    revisions: Arc<dyn ItemRevisionRetriever>,
}

impl AssertItemExists {
    /// Build the check over a revision retriever.
    #[must_use]
    pub fn new(revisions: Arc<dyn ItemRevisionRetriever>) -> Self {
        Self { revisions }
    }

    /// Return the latest revision id and timestamp, or fail with
    /// `item-not-found` or [`ExecutionError::ItemRedirect`].
    pub async fn execute(&self, id: &ItemId) -> Result<(u64, DateTime<Utc>), ExecutionError> {
        match self.revisions.latest_revision(id).await? {
            LatestItemRevision::NotFound => Err(item_not_found(id)),
            LatestItemRevision::Redirect(target) => Err(ExecutionError::ItemRedirect { target }),
            LatestItemRevision::Concrete {
                revision_id,
                last_modified,
            } => Ok((revision_id, last_modified)),
        }
    }
}

/// The standard `item-not-found` failure.
pub(crate) fn item_not_found(id: &ItemId) -> ExecutionError {
    UseCaseError::new(
        ErrorCode::ItemNotFound,
        format!("Could not find an item with the ID: {id}"),
    )
    .with_context(json!({ "item-id": id.as_str() }))
    .into()
}

/// Parse a raw item id or fail with `invalid-item-id`.
pub(crate) fn parse_item_id(raw: &str) -> Result<ItemId, ExecutionError> {
    ItemId::new(raw).map_err(|_| {
        UseCaseError::new(
            ErrorCode::InvalidItemId,
            format!("Not a valid item ID: {raw}"),
        )
        .with_context(json!({ "item-id": raw }))
        .into()
    })
}
