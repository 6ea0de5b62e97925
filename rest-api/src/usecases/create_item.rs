//! Item creation.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::domain::ports::{ItemCreator, ItemRevision};
use crate::domain::{EditMetadata, EditSummary};

use super::error::ExecutionError;
use super::request_validation::ItemSerializationDeserializer;

/// A create-item request as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct CreateItemRequest {
    /// The item serialization to create.
    pub item: Value,
    /// Change tags to record on the revision.
    pub tags: Vec<String>,
    /// Whether the edit was made by a bot account.
    pub is_bot: bool,
    /// Free-form client comment.
    pub comment: Option<String>,
    /// Acting user, when authenticated.
    pub username: Option<String>,
}

/// Creates a new item from an untyped serialization.
#[derive(Clone)]
pub struct CreateItem {
    deserializer: ItemSerializationDeserializer,
    creator: Arc<dyn ItemCreator>,
}

impl CreateItem {
    /// Wire the use case.
    #[must_use]
    pub fn new(deserializer: ItemSerializationDeserializer, creator: Arc<dyn ItemCreator>) -> Self {
        Self {
            deserializer,
            creator,
        }
    }

    /// Validate the payload and persist the new item, returning its first
    /// revision.
    pub async fn execute(&self, request: CreateItemRequest) -> Result<ItemRevision, ExecutionError> {
        let item = self.deserializer.deserialize(&request.item).await?;
        let metadata = EditMetadata::new(
            request.tags,
            request.is_bot,
            request.username,
            EditSummary::CreateItem {
                comment: request.comment,
            },
        );

        let revision = self.creator.create(item, metadata).await?;
        info!(
            item_id = revision.item.id.as_ref().map(|id| id.as_str()),
            revision_id = revision.revision_id,
            "created item"
        );
        Ok(revision)
    }
}
