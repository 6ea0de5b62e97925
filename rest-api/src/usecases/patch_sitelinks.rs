//! Patching the sitelinks of an item.
//!
//! The stored sitelinks are serialized, the patch is applied to the JSON,
//! and the result is re-validated. Only sites the patch actually modified
//! go through the external title and conflict checks again; the derived
//! `url` field is read-only and a patch that changes it is rejected.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use crate::domain::ports::{ItemRetriever, ItemUpdater};
use crate::domain::{EditMetadata, EditSummary, SiteLinkList, SitelinkEditSummary};
use crate::patch::diff::modified_sitelink_sites;
use crate::serialization::sitelinks_to_value;
use crate::validation::{
    SitelinkValidationError, SitelinksValidationError, SitelinksValidator, ValidationFailure,
};

use super::assert_item_exists::{item_not_found, parse_item_id, AssertItemExists};
use super::error::{ErrorCode, ExecutionError, UseCaseError};

/// A patch-sitelinks request as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct PatchSitelinksRequest {
    /// Raw subject item id.
    pub item_id: String,
    /// The JSON Patch document.
    pub patch: Value,
    /// Change tags to record on the revision.
    pub tags: Vec<String>,
    /// Whether the edit was made by a bot account.
    pub is_bot: bool,
    /// Free-form client comment.
    pub comment: Option<String>,
    /// Acting user, when authenticated.
    pub username: Option<String>,
}

/// The full sitelink list after the patch, with revision metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchSitelinksResponse {
    /// The sitelinks as stored.
    pub sitelinks: SiteLinkList,
    /// New revision id.
    pub revision_id: u64,
    /// New revision timestamp.
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

/// Applies a JSON Patch to the sitelinks of an item.
#[derive(Clone)]
pub struct PatchSitelinks {
    assert_item_exists: AssertItemExists,
    validator: SitelinksValidator,
    items: Arc<dyn ItemRetriever>,
    updater: Arc<dyn ItemUpdater>,
}

impl PatchSitelinks {
    /// Wire the use case.
    #[must_use]
    pub fn new(
        assert_item_exists: AssertItemExists,
        validator: SitelinksValidator,
        items: Arc<dyn ItemRetriever>,
        updater: Arc<dyn ItemUpdater>,
    ) -> Self {
        Self {
            assert_item_exists,
            validator,
            items,
            updater,
        }
    }

    /// Apply the patch and persist the result.
    pub async fn execute(
        &self,
        request: PatchSitelinksRequest,
    ) -> Result<PatchSitelinksResponse, ExecutionError> {
        let item_id = parse_item_id(&request.item_id)?;
        self.assert_item_exists.execute(&item_id).await?;

        let mut item = self
            .items
            .item(&item_id)
            .await?
            .ok_or_else(|| item_not_found(&item_id))?;

        let original = sitelinks_to_value(&item.sitelinks);
        let patched = super::apply_json_patch(&original, &request.patch)?;

        let modified_sites = modified_sitelink_sites(&original, &patched);
        let sitelinks = match self
            .validator
            .validate(Some(&item_id), &patched, Some(&modified_sites))
            .await
        {
            Ok(sitelinks) => sitelinks,
            Err(ValidationFailure::Invalid(error)) => return Err(patched_error(error).into()),
            Err(ValidationFailure::Backend(error)) => return Err(error.into()),
        };
        check_urls_unmodified(&original, &patched)?;

        item.sitelinks = sitelinks;
        let metadata = EditMetadata::new(
            request.tags,
            request.is_bot,
            request.username,
            EditSummary::Sitelink(SitelinkEditSummary::Patch {
                comment: request.comment,
            }),
        );
        let revision = self.updater.update(item, metadata).await?;
        info!(
            item_id = item_id.as_str(),
            revision_id = revision.revision_id,
            modified_sites = modified_sites.len(),
            "patched sitelinks"
        );
        Ok(PatchSitelinksResponse {
            sitelinks: revision.item.sitelinks,
            revision_id: revision.revision_id,
            last_modified: revision.last_modified,
        })
    }
}

/// Reject any pre-existing entry whose `url` differs from the stored one.
/// The URL is derived from the site registry and never client-settable;
/// a `url` on an entry the patch introduced is ignored, so copying a
/// whole stored entry to a new site keeps working.
fn check_urls_unmodified(original: &Value, patched: &Value) -> Result<(), ExecutionError> {
    let Some(entries) = patched.as_object() else {
        return Ok(());
    };
    for (site, entry) in entries {
        let Some(url) = entry.get("url") else {
            continue;
        };
        let Some(before) = original.get(site) else {
            continue;
        };
        if before.get("url") != Some(url) {
            return Err(UseCaseError::new(
                ErrorCode::PatchedSitelinkUrlNotModifiable,
                "URL of sitelink cannot be modified",
            )
            .with_context(json!({ "site-id": site, "url": url }))
            .into());
        }
    }
    Ok(())
}

fn patched_error(error: SitelinksValidationError) -> UseCaseError {
    match error {
        SitelinksValidationError::NotAnObject { value } => UseCaseError::new(
            ErrorCode::PatchedSitelinksInvalid,
            "Patched sitelinks are not a valid sitelink mapping",
        )
        .with_context(json!({ "value": value })),
        SitelinksValidationError::InvalidSiteId { site_id } => UseCaseError::new(
            ErrorCode::PatchedSitelinkInvalidSiteId,
            format!("Not a valid site ID in patched sitelinks: {site_id}"),
        )
        .with_context(json!({ "site-id": site_id })),
        SitelinksValidationError::InvalidSitelinkType { site, value } => UseCaseError::new(
            ErrorCode::PatchedSitelinkInvalidType,
            format!("Not a valid sitelink type in patched sitelinks for site: {site}"),
        )
        .with_context(json!({ "site-id": site.as_str(), "value": value })),
        SitelinksValidationError::Sitelink { site, error } => {
            let site = site.as_str();
            match error {
                SitelinkValidationError::TitleMissing => UseCaseError::new(
                    ErrorCode::PatchedSitelinkMissingTitle,
                    format!("No sitelink title provided for site: {site}"),
                )
                .with_context(json!({ "site-id": site })),
                SitelinkValidationError::TitleEmpty => UseCaseError::new(
                    ErrorCode::PatchedSitelinkTitleEmpty,
                    format!("Sitelink cannot be empty for site: {site}"),
                )
                .with_context(json!({ "site-id": site })),
                SitelinkValidationError::InvalidTitleType { value } => UseCaseError::new(
                    ErrorCode::PatchedSitelinkInvalidTitle,
                    format!("Not a valid sitelink title for site: {site}"),
                )
                .with_context(json!({ "site-id": site, "title": value })),
                SitelinkValidationError::InvalidTitle { title } => UseCaseError::new(
                    ErrorCode::PatchedSitelinkInvalidTitle,
                    format!("Not a valid sitelink title for site: {site}"),
                )
                .with_context(json!({ "site-id": site, "title": title })),
                SitelinkValidationError::InvalidBadgesType { value } => UseCaseError::new(
                    ErrorCode::PatchedSitelinkBadgesFormat,
                    format!("Badges value for site '{site}' is not a list"),
                )
                .with_context(json!({ "site-id": site, "badges": value })),
                SitelinkValidationError::InvalidBadge { badge } => UseCaseError::new(
                    ErrorCode::PatchedSitelinkInvalidBadge,
                    format!("Incorrect patched sitelinks. Badge value for site '{site}' is not an item ID"),
                )
                .with_context(json!({ "site-id": site, "badge": badge })),
                SitelinkValidationError::BadgeNotAllowed { badge } => UseCaseError::new(
                    ErrorCode::PatchedSitelinkItemNotABadge,
                    format!("Item ID provided as badge for site '{site}' is not allowed as a badge"),
                )
                .with_context(json!({ "site-id": site, "badge": badge.as_str() })),
                SitelinkValidationError::TitleNotFound { title } => UseCaseError::new(
                    ErrorCode::PatchedSitelinkTitleDoesNotExist,
                    format!("Incorrect patched sitelinks. Page with title '{title}' does not exist on site '{site}'"),
                )
                .with_context(json!({ "site-id": site, "title": title })),
                SitelinkValidationError::Conflict { matching_item_id } => UseCaseError::new(
                    ErrorCode::PatchedSitelinkConflict,
                    format!("Site '{site}' is already being used on '{matching_item_id}'"),
                )
                .with_context(json!({
                    "site-id": site,
                    "matching-item-id": matching_item_id.as_str(),
                })),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BadgeConfig, SiteConfig, SiteRegistry, ValidationConfig};
    use crate::domain::ports::{
        ItemRevision, LatestItemRevision, MockItemRetriever, MockItemRevisionRetriever,
        MockItemUpdater, MockSitelinkConflictChecker, MockSitelinkTargetResolver,
    };
    use crate::domain::{Item, ItemId, SiteId, SiteLink};

    fn item_id(id: &str) -> ItemId {
        ItemId::new(id).expect("valid item id")
    }

    fn site(id: &str) -> SiteId {
        SiteId::new(id).expect("valid site id")
    }

    fn config() -> Arc<ValidationConfig> {
        let registry = SiteRegistry::new([
            (
                site("enwiki"),
                SiteConfig {
                    article_url_pattern: "https://en.wikipedia.org/wiki/$1".to_owned(),
                },
            ),
            (
                site("dewiki"),
                SiteConfig {
                    article_url_pattern: "https://de.wikipedia.org/wiki/$1".to_owned(),
                },
            ),
        ]);
        Arc::new(ValidationConfig::new(
            [],
            registry,
            BadgeConfig::new([item_id("Q567")], []),
        ))
    }

    fn revisions() -> AssertItemExists {
        let mut revisions = MockItemRevisionRetriever::new();
        revisions.expect_latest_revision().returning(|_| {
            Ok(LatestItemRevision::Concrete {
                revision_id: 7,
                last_modified: "2025-05-01T12:00:00Z".parse().expect("valid timestamp"),
            })
        });
        AssertItemExists::new(Arc::new(revisions))
    }

    fn stored_item() -> Item {
        let mut item = Item::default().with_id(item_id("Q1"));
        item.sitelinks.set(SiteLink::new(
            site("enwiki"),
            "Potato",
            Vec::new(),
            "https://en.wikipedia.org/wiki/Potato",
        ));
        item
    }

    fn items() -> Arc<dyn ItemRetriever> {
        let mut items = MockItemRetriever::new();
        items.expect_item().returning(|_| Ok(Some(stored_item())));
        Arc::new(items)
    }

    fn updater() -> Arc<dyn ItemUpdater> {
        let mut updater = MockItemUpdater::new();
        updater.expect_update().returning(|item, _| {
            Ok(ItemRevision::new(
                item,
                8,
                "2025-05-01T12:01:00Z".parse().expect("valid timestamp"),
            ))
        });
        Arc::new(updater)
    }

    fn validator() -> SitelinksValidator {
        let mut resolver = MockSitelinkTargetResolver::new();
        resolver
            .expect_resolve_title()
            .returning(|_, title, _| Ok(Some(title.to_owned())));
        let mut conflicts = MockSitelinkConflictChecker::new();
        conflicts
            .expect_item_for_sitelink()
            .returning(|_, _| Ok(None));
        SitelinksValidator::new(config(), Arc::new(resolver), Arc::new(conflicts))
    }

    fn request(patch: Value) -> PatchSitelinksRequest {
        PatchSitelinksRequest {
            item_id: "Q1".to_owned(),
            patch,
            tags: Vec::new(),
            is_bot: false,
            comment: None,
            username: None,
        }
    }

    fn expect_code(error: ExecutionError) -> ErrorCode {
        match error {
            ExecutionError::UseCase(error) => error.code(),
            ExecutionError::ItemRedirect { .. } => panic!("expected a use-case error"),
        }
    }

    #[tokio::test]
    async fn adding_a_sitelink_through_a_patch_persists_it() {
        let use_case = PatchSitelinks::new(revisions(), validator(), items(), updater());
        let response = use_case
            .execute(request(json!([
                { "op": "add", "path": "/dewiki", "value": { "title": "Kartoffel" } },
            ])))
            .await
            .expect("patch applies");
        assert_eq!(response.sitelinks.len(), 2);
        assert_eq!(
            response
                .sitelinks
                .sitelink(&site("dewiki"))
                .expect("entry present")
                .url(),
            "https://de.wikipedia.org/wiki/Kartoffel"
        );
        assert_eq!(response.revision_id, 8);
    }

    #[tokio::test]
    async fn unmodified_sitelinks_skip_external_checks() {
        let mut resolver = MockSitelinkTargetResolver::new();
        resolver
            .expect_resolve_title()
            .withf(|site, _, _| site.as_str() == "dewiki")
            .returning(|_, title, _| Ok(Some(title.to_owned())));
        let mut conflicts = MockSitelinkConflictChecker::new();
        conflicts
            .expect_item_for_sitelink()
            .withf(|site, _| site.as_str() == "dewiki")
            .returning(|_, _| Ok(None));
        let validator =
            SitelinksValidator::new(config(), Arc::new(resolver), Arc::new(conflicts));

        PatchSitelinks::new(revisions(), validator, items(), updater())
            .execute(request(json!([
                { "op": "add", "path": "/dewiki", "value": { "title": "Kartoffel" } },
            ])))
            .await
            .expect("only the new entry is checked");
    }

    #[tokio::test]
    async fn patched_url_is_rejected() {
        let error = PatchSitelinks::new(revisions(), validator(), items(), updater())
            .execute(request(json!([
                { "op": "replace", "path": "/enwiki/url", "value": "https://example.com" },
            ])))
            .await
            .expect_err("url is read only");
        assert_eq!(expect_code(error), ErrorCode::PatchedSitelinkUrlNotModifiable);
    }

    #[tokio::test]
    async fn copying_a_full_entry_to_a_new_site_succeeds() {
        let response = PatchSitelinks::new(revisions(), validator(), items(), updater())
            .execute(request(json!([
                { "op": "copy", "from": "/enwiki", "path": "/dewiki" },
            ])))
            .await
            .expect("url on a new entry is ignored");
        assert_eq!(
            response
                .sitelinks
                .sitelink(&site("dewiki"))
                .expect("entry present")
                .url(),
            "https://de.wikipedia.org/wiki/Potato"
        );
    }

    #[tokio::test]
    async fn replacing_a_url_with_the_identical_value_succeeds() {
        PatchSitelinks::new(revisions(), validator(), items(), updater())
            .execute(request(json!([
                {
                    "op": "replace",
                    "path": "/enwiki/url",
                    "value": "https://en.wikipedia.org/wiki/Potato",
                },
            ])))
            .await
            .expect("unchanged url passes");
    }

    #[tokio::test]
    async fn patch_producing_an_unknown_site_is_a_patched_sitelink_error() {
        let error = PatchSitelinks::new(revisions(), validator(), items(), updater())
            .execute(request(json!([
                { "op": "add", "path": "/xxwiki", "value": { "title": "Potato" } },
            ])))
            .await
            .expect_err("unknown site");
        assert_eq!(expect_code(error), ErrorCode::PatchedSitelinkInvalidSiteId);
    }

    #[tokio::test]
    async fn failed_test_operation_is_a_conflict() {
        let error = PatchSitelinks::new(revisions(), validator(), items(), updater())
            .execute(request(json!([
                { "op": "test", "path": "/enwiki/title", "value": "Tomato" },
            ])))
            .await
            .expect_err("test fails");
        assert_eq!(expect_code(error), ErrorCode::PatchTestFailed);
    }
}
