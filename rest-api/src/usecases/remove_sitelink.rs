//! Removing a single sitelink.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::config::ValidationConfig;
use crate::domain::ports::{ItemRetriever, ItemUpdater};
use crate::domain::{EditMetadata, EditSummary, SitelinkEditSummary};

use super::assert_item_exists::{item_not_found, parse_item_id, AssertItemExists};
use super::error::{ErrorCode, ExecutionError, UseCaseError};
use super::set_sitelink::parse_site_id;

/// A remove-sitelink request as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct RemoveSitelinkRequest {
    /// Raw subject item id.
    pub item_id: String,
    /// Raw site id.
    pub site_id: String,
    /// Change tags to record on the revision.
    pub tags: Vec<String>,
    /// Whether the edit was made by a bot account.
    pub is_bot: bool,
    /// Free-form client comment.
    pub comment: Option<String>,
    /// Acting user, when authenticated.
    pub username: Option<String>,
}

/// Removes the sitelink of an item for one site.
#[derive(Clone)]
pub struct RemoveSitelink {
    config: Arc<ValidationConfig>,
    assert_item_exists: AssertItemExists,
    items: Arc<dyn ItemRetriever>,
    updater: Arc<dyn ItemUpdater>,
}

impl RemoveSitelink {
    /// Wire the use case.
    #[must_use]
    pub fn new(
        config: Arc<ValidationConfig>,
        assert_item_exists: AssertItemExists,
        items: Arc<dyn ItemRetriever>,
        updater: Arc<dyn ItemUpdater>,
    ) -> Self {
        Self {
            config,
            assert_item_exists,
            items,
            updater,
        }
    }

    /// Remove the sitelink, failing with `sitelink-not-defined` when the
    /// item has no link for the site.
    pub async fn execute(&self, request: RemoveSitelinkRequest) -> Result<(), ExecutionError> {
        let item_id = parse_item_id(&request.item_id)?;
        let site = parse_site_id(&self.config, &request.site_id)?;
        self.assert_item_exists.execute(&item_id).await?;

        let mut item = self
            .items
            .item(&item_id)
            .await?
            .ok_or_else(|| item_not_found(&item_id))?;

        if item.sitelinks.remove(&site).is_none() {
            return Err(UseCaseError::new(
                ErrorCode::SitelinkNotDefined,
                format!("No sitelink found for the ID: {item_id} for the site: {site}"),
            )
            .with_context(json!({
                "item-id": item_id.as_str(),
                "site-id": site.as_str(),
            }))
            .into());
        }

        let metadata = EditMetadata::new(
            request.tags,
            request.is_bot,
            request.username,
            EditSummary::Sitelink(SitelinkEditSummary::Remove {
                comment: request.comment,
                site: site.clone(),
            }),
        );
        let revision = self.updater.update(item, metadata).await?;
        info!(
            item_id = item_id.as_str(),
            site = site.as_str(),
            revision_id = revision.revision_id,
            "removed sitelink"
        );
        Ok(())
    }
}
