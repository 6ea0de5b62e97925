//! Aliases-in-language lookup.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::config::ValidationConfig;
use crate::domain::ports::ItemRetriever;
use crate::domain::AliasGroup;

use super::assert_item_exists::{item_not_found, parse_item_id, AssertItemExists};
use super::error::{ErrorCode, ExecutionError, UseCaseError};

/// A lookup request as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct GetItemAliasesInLanguageRequest {
    /// Raw subject item id.
    pub item_id: String,
    /// Raw language code.
    pub language: String,
}

/// The aliases found, with revision metadata for caching headers.
#[derive(Debug, Clone, PartialEq)]
pub struct GetItemAliasesInLanguageResponse {
    /// The requested alias group.
    pub aliases: AliasGroup,
    /// Latest revision id.
    pub revision_id: u64,
    /// Latest revision timestamp.
    pub last_modified: DateTime<Utc>,
}

/// Looks up an item's aliases in one language.
#[derive(Clone)]
pub struct GetItemAliasesInLanguage {
    config: Arc<ValidationConfig>,
    assert_item_exists: AssertItemExists,
    items: Arc<dyn ItemRetriever>,
}

impl GetItemAliasesInLanguage {
    /// Wire the use case.
    #[must_use]
    pub fn new(
        config: Arc<ValidationConfig>,
        assert_item_exists: AssertItemExists,
        items: Arc<dyn ItemRetriever>,
    ) -> Self {
        Self {
            config,
            assert_item_exists,
            items,
        }
    }

    /// Execute the lookup.
    ///
    /// Distinguishes three negative outcomes: an unknown item is
    /// `item-not-found`, a redirected item surfaces as
    /// [`ExecutionError::ItemRedirect`], and an existing item without
    /// aliases in the language is `aliases-not-defined`.
    pub async fn execute(
        &self,
        request: GetItemAliasesInLanguageRequest,
    ) -> Result<GetItemAliasesInLanguageResponse, ExecutionError> {
        let item_id = parse_item_id(&request.item_id)?;
        if !self.config.is_valid_language(&request.language) {
            return Err(UseCaseError::new(
                ErrorCode::InvalidLanguageCode,
                format!("Not a valid language code: {}", request.language),
            )
            .with_context(json!({ "language": request.language }))
            .into());
        }

        let (revision_id, last_modified) = self.assert_item_exists.execute(&item_id).await?;
        let item = self
            .items
            .item(&item_id)
            .await?
            .ok_or_else(|| item_not_found(&item_id))?;

        let Some(aliases) = item.aliases.aliases(&request.language) else {
            return Err(UseCaseError::new(
                ErrorCode::AliasesNotDefined,
                format!(
                    "Item with the ID {item_id} does not have aliases in the language: {}",
                    request.language
                ),
            )
            .with_context(json!({
                "item-id": item_id.as_str(),
                "language": request.language,
            }))
            .into());
        };

        Ok(GetItemAliasesInLanguageResponse {
            aliases: AliasGroup::new(request.language, aliases.to_vec()),
            revision_id,
            last_modified,
        })
    }
}
