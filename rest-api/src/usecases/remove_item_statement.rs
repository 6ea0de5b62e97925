//! Removing a single statement.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::ports::{ItemRetriever, ItemUpdater};
use crate::domain::{EditMetadata, EditSummary, StatementId};

use super::assert_item_exists::{item_not_found, parse_item_id, AssertItemExists};
use super::error::{ErrorCode, ExecutionError, UseCaseError};

/// A remove-statement request as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct RemoveItemStatementRequest {
    /// Raw subject item id.
    pub item_id: String,
    /// Raw statement id.
    pub statement_id: String,
    /// Change tags to record on the revision.
    pub tags: Vec<String>,
    /// Whether the edit was made by a bot account.
    pub is_bot: bool,
    /// Free-form client comment.
    pub comment: Option<String>,
    /// Acting user, when authenticated.
    pub username: Option<String>,
}

/// Removes one statement from an item.
#[derive(Clone)]
pub struct RemoveItemStatement {
    assert_item_exists: AssertItemExists,
    items: Arc<dyn ItemRetriever>,
    updater: Arc<dyn ItemUpdater>,
}

impl RemoveItemStatement {
    /// Wire the use case.
    #[must_use]
    pub fn new(
        assert_item_exists: AssertItemExists,
        items: Arc<dyn ItemRetriever>,
        updater: Arc<dyn ItemUpdater>,
    ) -> Self {
        Self {
            assert_item_exists,
            items,
            updater,
        }
    }

    /// Remove the statement.
    ///
    /// A statement id whose prefix names a different item is treated as not
    /// found rather than invalid: the id is well-formed, it just does not
    /// belong to the subject.
    pub async fn execute(&self, request: RemoveItemStatementRequest) -> Result<(), ExecutionError> {
        let item_id = parse_item_id(&request.item_id)?;
        let statement_id = parse_statement_id(&request.statement_id)?;
        self.assert_item_exists.execute(&item_id).await?;

        if statement_id.subject_item_id() != &item_id {
            return Err(statement_not_found(&statement_id));
        }

        let mut item = self
            .items
            .item(&item_id)
            .await?
            .ok_or_else(|| item_not_found(&item_id))?;

        if item.statements.remove(&statement_id).is_none() {
            return Err(statement_not_found(&statement_id));
        }

        let metadata = EditMetadata::new(
            request.tags,
            request.is_bot,
            request.username,
            EditSummary::RemoveStatement {
                comment: request.comment,
                statement_id: statement_id.clone(),
            },
        );
        let revision = self.updater.update(item, metadata).await?;
        info!(
            item_id = item_id.as_str(),
            statement_id = statement_id.as_str(),
            revision_id = revision.revision_id,
            "removed statement"
        );
        Ok(())
    }
}

fn parse_statement_id(raw: &str) -> Result<StatementId, ExecutionError> {
    StatementId::new(raw).map_err(|_| {
        UseCaseError::new(
            ErrorCode::InvalidStatementId,
            format!("Not a valid statement ID: {raw}"),
        )
        .with_context(json!({ "statement-id": raw }))
        .into()
    })
}

fn statement_not_found(id: &StatementId) -> ExecutionError {
    UseCaseError::new(
        ErrorCode::StatementNotFound,
        format!("Could not find a statement with the ID: {id}"),
    )
    .with_context(json!({ "statement-id": id.as_str() }))
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        ItemRevision, LatestItemRevision, MockItemRetriever, MockItemRevisionRetriever,
        MockItemUpdater,
    };
    use crate::domain::{Item, ItemId, PropertyId, Statement};
    use serde_json::json;

    const STATEMENT_ID: &str = "Q1$6cb74251-104e-4c39-ac76-f873c0e24c4e";

    fn item_id(id: &str) -> ItemId {
        ItemId::new(id).expect("valid item id")
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
        item.statements.add(
            Statement::new(
                PropertyId::new("P31").expect("valid property id"),
                json!({ "content": "Q5" }),
            )
            .with_id(StatementId::new(STATEMENT_ID).expect("valid statement id")),
        );
        item
    }

    fn request(statement_id: &str) -> RemoveItemStatementRequest {
        RemoveItemStatementRequest {
            item_id: "Q1".to_owned(),
            statement_id: statement_id.to_owned(),
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
    async fn removal_persists_the_item_without_the_statement() {
        let mut items = MockItemRetriever::new();
        items.expect_item().returning(|_| Ok(Some(stored_item())));
        let mut updater = MockItemUpdater::new();
        updater
            .expect_update()
            .withf(|item, metadata| {
                item.statements.is_empty()
                    && matches!(
                        &metadata.summary,
                        EditSummary::RemoveStatement { statement_id, .. }
                            if statement_id.as_str() == STATEMENT_ID
                    )
            })
            .returning(|item, _| {
                Ok(ItemRevision::new(
                    item,
                    8,
                    "2025-05-01T12:01:00Z".parse().expect("valid timestamp"),
                ))
            });

        RemoveItemStatement::new(revisions(), Arc::new(items), Arc::new(updater))
            .execute(request(STATEMENT_ID))
            .await
            .expect("statement removed");
    }

    #[tokio::test]
    async fn malformed_statement_id_is_invalid() {
        let error = RemoveItemStatement::new(
            revisions(),
            Arc::new(MockItemRetriever::new()),
            Arc::new(MockItemUpdater::new()),
        )
        .execute(request("not-a-statement-id"))
        .await
        .expect_err("malformed id");
        assert_eq!(expect_code(error), ErrorCode::InvalidStatementId);
    }

    #[tokio::test]
    async fn statement_belonging_to_another_item_is_not_found() {
        let mut items = MockItemRetriever::new();
        items.expect_item().times(0);

        let error = RemoveItemStatement::new(
            revisions(),
            Arc::new(items),
            Arc::new(MockItemUpdater::new()),
        )
        .execute(request("Q2$6cb74251-104e-4c39-ac76-f873c0e24c4e"))
        .await
        .expect_err("foreign statement");
        assert_eq!(expect_code(error), ErrorCode::StatementNotFound);
    }

    #[tokio::test]
    async fn unknown_statement_on_the_item_is_not_found() {
        let mut items = MockItemRetriever::new();
        items
            .expect_item()
            .returning(|_| Ok(Some(Item::default().with_id(item_id("Q1")))));

        let error = RemoveItemStatement::new(
            revisions(),
            Arc::new(items),
            Arc::new(MockItemUpdater::new()),
        )
        .execute(request(STATEMENT_ID))
        .await
        .expect_err("unknown statement");
        assert_eq!(expect_code(error), ErrorCode::StatementNotFound);
    }
}
