//! Patching the aliases of an item.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use crate::domain::ports::{ItemRetriever, ItemUpdater};
use crate::domain::{AliasGroupList, EditMetadata, EditSummary};
use crate::patch::diff::modified_alias_languages;
use crate::serialization::aliases_to_value;
use crate::validation::{AliasesValidationError, ItemAliasesValidator};

use super::assert_item_exists::{item_not_found, parse_item_id, AssertItemExists};
use super::error::{ErrorCode, ExecutionError, UseCaseError};

/// A patch-aliases request as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct PatchItemAliasesRequest {
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

/// The full alias listing after the patch, with revision metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchItemAliasesResponse {
    /// The aliases as stored.
    pub aliases: AliasGroupList,
    /// New revision id.
    pub revision_id: u64,
    /// New revision timestamp.
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

/// Applies a JSON Patch to the aliases of an item.
#[derive(Clone)]
pub struct PatchItemAliases {
    assert_item_exists: AssertItemExists,
    validator: ItemAliasesValidator,
    items: Arc<dyn ItemRetriever>,
    updater: Arc<dyn ItemUpdater>,
}

impl PatchItemAliases {
    /// Wire the use case.
    #[must_use]
    pub fn new(
        assert_item_exists: AssertItemExists,
        validator: ItemAliasesValidator,
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
        request: PatchItemAliasesRequest,
    ) -> Result<PatchItemAliasesResponse, ExecutionError> {
        let item_id = parse_item_id(&request.item_id)?;
        self.assert_item_exists.execute(&item_id).await?;

        let mut item = self
            .items
            .item(&item_id)
            .await?
            .ok_or_else(|| item_not_found(&item_id))?;

        let original = aliases_to_value(&item.aliases);
        let patched = super::apply_json_patch(&original, &request.patch)?;

        let Some(entries) = patched.as_object() else {
            return Err(UseCaseError::new(
                ErrorCode::PatchedAliasesInvalid,
                "Patched aliases are not a valid alias mapping",
            )
            .with_context(json!({ "value": patched }))
            .into());
        };
        let aliases = self
            .validator
            .validate(entries)
            .map_err(|error| ExecutionError::from(patched_error(error)))?;

        let modified_languages = modified_alias_languages(&original, &patched);
        item.aliases = aliases;
        let metadata = EditMetadata::new(
            request.tags,
            request.is_bot,
            request.username,
            EditSummary::PatchAliases {
                comment: request.comment,
            },
        );
        let revision = self.updater.update(item, metadata).await?;
        info!(
            item_id = item_id.as_str(),
            revision_id = revision.revision_id,
            modified_languages = modified_languages.len(),
            "patched aliases"
        );
        Ok(PatchItemAliasesResponse {
            aliases: revision.item.aliases,
            revision_id: revision.revision_id,
            last_modified: revision.last_modified,
        })
    }
}

fn patched_error(error: AliasesValidationError) -> UseCaseError {
    match error {
        AliasesValidationError::InvalidLanguageCode { language } => UseCaseError::new(
            ErrorCode::PatchedAliasesInvalidLanguageCode,
            format!("Not a valid language code '{language}' in changed aliases"),
        )
        .with_context(json!({ "language": language })),
        AliasesValidationError::InvalidAliasList { language, value } => UseCaseError::new(
            ErrorCode::PatchedAliasesInvalid,
            format!("Patched value for language '{language}' is invalid"),
        )
        .with_context(json!({ "language": language, "value": value })),
        AliasesValidationError::EmptyAliasList { language } => UseCaseError::new(
            ErrorCode::PatchedAliasesInvalid,
            format!("Patched value for language '{language}' is invalid"),
        )
        .with_context(json!({ "language": language, "value": [] })),
        AliasesValidationError::InvalidAlias { language, value } => UseCaseError::new(
            ErrorCode::PatchedAliasesInvalid,
            format!("Patched value for language '{language}' is invalid"),
        )
        .with_context(json!({ "language": language, "value": value })),
        AliasesValidationError::EmptyAlias { language } => UseCaseError::new(
            ErrorCode::PatchedAliasEmpty,
            "Changed alias cannot be empty",
        )
        .with_context(json!({ "language": language })),
        AliasesValidationError::DuplicateAlias { language, alias } => UseCaseError::new(
            ErrorCode::PatchedAliasDuplicate,
            format!("Aliases in language '{language}' contain duplicate alias: '{alias}'"),
        )
        .with_context(json!({ "language": language, "alias": alias })),
        AliasesValidationError::AliasTooLong { language, limit } => UseCaseError::new(
            ErrorCode::PatchedAliasTooLong,
            format!("Changed alias must not be more than {limit} characters long"),
        )
        .with_context(json!({ "language": language, "character-limit": limit })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BadgeConfig, SiteRegistry, ValidationConfig};
    use crate::domain::ports::{
        ItemRevision, LatestItemRevision, MockItemRetriever, MockItemRevisionRetriever,
        MockItemUpdater,
    };
    use crate::domain::{AliasGroup, Item, ItemId};

    fn item_id(id: &str) -> ItemId {
        ItemId::new(id).expect("valid item id")
    }

    fn validator() -> ItemAliasesValidator {
        ItemAliasesValidator::new(Arc::new(ValidationConfig::new(
            ["en".to_owned(), "de".to_owned()],
            SiteRegistry::new([]),
            BadgeConfig::new([], []),
        )))
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
        let aliases: AliasGroupList = [AliasGroup::new("en", vec!["spud".to_owned()])]
            .into_iter()
            .collect();
        Item {
            aliases,
            ..Item::default()
        }
        .with_id(item_id("Q1"))
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

    fn request(patch: Value) -> PatchItemAliasesRequest {
        PatchItemAliasesRequest {
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
    async fn adding_an_alias_through_a_patch_persists_it() {
        let response = PatchItemAliases::new(revisions(), validator(), items(), updater())
            .execute(request(json!([
                { "op": "add", "path": "/en/-", "value": "tater" },
                { "op": "add", "path": "/de", "value": ["Erdapfel"] },
            ])))
            .await
            .expect("patch applies");
        assert_eq!(
            response.aliases.aliases("en"),
            Some(&["spud".to_owned(), "tater".to_owned()][..])
        );
        assert_eq!(
            response.aliases.aliases("de"),
            Some(&["Erdapfel".to_owned()][..])
        );
        assert_eq!(response.revision_id, 8);
    }

    #[tokio::test]
    async fn patch_producing_a_duplicate_alias_is_rejected() {
        let error = PatchItemAliases::new(revisions(), validator(), items(), updater())
            .execute(request(json!([
                { "op": "add", "path": "/en/-", "value": "spud" },
            ])))
            .await
            .expect_err("duplicate alias");
        assert_eq!(expect_code(error), ErrorCode::PatchedAliasDuplicate);
    }

    #[tokio::test]
    async fn patch_producing_an_unknown_language_is_rejected() {
        let error = PatchItemAliases::new(revisions(), validator(), items(), updater())
            .execute(request(json!([
                { "op": "add", "path": "/xx", "value": ["patate"] },
            ])))
            .await
            .expect_err("unknown language");
        assert_eq!(
            expect_code(error),
            ErrorCode::PatchedAliasesInvalidLanguageCode
        );
    }

    #[tokio::test]
    async fn failed_test_operation_reports_the_actual_value() {
        let error = PatchItemAliases::new(revisions(), validator(), items(), updater())
            .execute(request(json!([
                { "op": "test", "path": "/en/0", "value": "English Alias" },
            ])))
            .await
            .expect_err("test fails");
        let ExecutionError::UseCase(error) = error else {
            panic!("expected a use-case error");
        };
        assert_eq!(error.code(), ErrorCode::PatchTestFailed);
        assert_eq!(
            error
                .context()
                .and_then(|context| context.get("actual-value")),
            Some(&json!("spud"))
        );
    }
}
