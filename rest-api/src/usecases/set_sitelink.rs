//! Setting a single sitelink.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use crate::config::ValidationConfig;
use crate::domain::ports::{ItemRetriever, ItemRevision, ItemUpdater};
use crate::domain::{EditMetadata, EditSummary, SiteId, SiteLink, SitelinkEditSummary};

use super::assert_item_exists::{item_not_found, parse_item_id, AssertItemExists};
use super::error::{ErrorCode, ExecutionError, UseCaseError};
use super::request_validation::SitelinkEditDeserializer;

/// A set-sitelink request as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct SetSitelinkRequest {
    /// Raw subject item id.
    pub item_id: String,
    /// Raw site id.
    pub site_id: String,
    /// The sitelink serialization to set.
    pub sitelink: Value,
    /// Change tags to record on the revision.
    pub tags: Vec<String>,
    /// Whether the edit was made by a bot account.
    pub is_bot: bool,
    /// Free-form client comment.
    pub comment: Option<String>,
    /// Acting user, when authenticated.
    pub username: Option<String>,
}

/// The persisted sitelink, with whether an existing link was replaced so
/// the HTTP layer can pick 200 over 201.
#[derive(Debug, Clone, PartialEq)]
pub struct SetSitelinkResponse {
    /// The sitelink as stored.
    pub sitelink: SiteLink,
    /// Whether the site already had a sitelink before this edit.
    pub was_replaced: bool,
    /// New revision id.
    pub revision_id: u64,
    /// New revision timestamp.
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

/// Creates or replaces the sitelink of an item for one site.
#[derive(Clone)]
pub struct SetSitelink {
    config: Arc<ValidationConfig>,
    assert_item_exists: AssertItemExists,
    deserializer: SitelinkEditDeserializer,
    items: Arc<dyn ItemRetriever>,
    updater: Arc<dyn ItemUpdater>,
}

impl SetSitelink {
    /// Wire the use case.
    #[must_use]
    pub fn new(
        config: Arc<ValidationConfig>,
        assert_item_exists: AssertItemExists,
        deserializer: SitelinkEditDeserializer,
        items: Arc<dyn ItemRetriever>,
        updater: Arc<dyn ItemUpdater>,
    ) -> Self {
        Self {
            config,
            assert_item_exists,
            deserializer,
            items,
            updater,
        }
    }

    /// Validate and persist the sitelink.
    ///
    /// The edit summary distinguishes adding a first link for the site,
    /// replacing the title, and changing only the badges.
    pub async fn execute(
        &self,
        request: SetSitelinkRequest,
    ) -> Result<SetSitelinkResponse, ExecutionError> {
        let item_id = parse_item_id(&request.item_id)?;
        let site = parse_site_id(&self.config, &request.site_id)?;
        self.assert_item_exists.execute(&item_id).await?;

        let sitelink = self
            .deserializer
            .deserialize(Some(&item_id), &site, &request.sitelink)
            .await?;

        let mut item = self
            .items
            .item(&item_id)
            .await?
            .ok_or_else(|| item_not_found(&item_id))?;

        let previous = item.sitelinks.set(sitelink.clone());
        let action = match &previous {
            None => SitelinkEditSummary::Add {
                comment: request.comment,
                sitelink: sitelink.clone(),
            },
            Some(previous) if previous.title() == sitelink.title() => {
                SitelinkEditSummary::SetBadges {
                    comment: request.comment,
                    sitelink: sitelink.clone(),
                }
            }
            Some(_) => SitelinkEditSummary::Replace {
                comment: request.comment,
                sitelink: sitelink.clone(),
            },
        };
        let was_replaced = previous.is_some();

        let metadata = EditMetadata::new(
            request.tags,
            request.is_bot,
            request.username,
            EditSummary::Sitelink(action),
        );
        let revision = self.updater.update(item, metadata).await?;
        info!(
            item_id = item_id.as_str(),
            site = site.as_str(),
            was_replaced,
            revision_id = revision.revision_id,
            "set sitelink"
        );

        let ItemRevision {
            item,
            revision_id,
            last_modified,
        } = revision;
        let sitelink = item
            .sitelinks
            .sitelink(&site)
            .cloned()
            .unwrap_or(sitelink);
        Ok(SetSitelinkResponse {
            sitelink,
            was_replaced,
            revision_id,
            last_modified,
        })
    }
}

/// Parse a raw site id against the registry or fail with `invalid-site-id`.
pub(crate) fn parse_site_id(
    config: &ValidationConfig,
    raw: &str,
) -> Result<SiteId, ExecutionError> {
    SiteId::new(raw)
        .ok()
        .filter(|site| config.sites.contains(site))
        .ok_or_else(|| {
            UseCaseError::new(
                ErrorCode::InvalidSiteId,
                format!("Not a valid site ID: {raw}"),
            )
            .with_context(json!({ "site-id": raw }))
            .into()
        })
}
