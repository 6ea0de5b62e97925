//! Use cases, one per REST operation.
//!
//! Each use case owns its request and response types, takes its
//! collaborators as trait objects at construction and exposes a single
//! `execute`. HTTP handlers deal with transport concerns only and delegate
//! everything else here.

pub mod assert_item_exists;
pub mod create_item;
pub mod error;
pub mod get_item_aliases_in_language;
pub mod patch_item_aliases;
pub mod patch_sitelinks;
pub mod remove_item_statement;
pub mod remove_sitelink;
pub mod request_validation;
pub mod set_sitelink;

use serde_json::{json, Value};

use crate::patch::{apply, PatchError, PatchErrorKind, PatchOperation};

pub use self::assert_item_exists::AssertItemExists;
pub use self::create_item::{CreateItem, CreateItemRequest};
pub use self::error::{ErrorCode, ExecutionError, UseCaseError};
pub use self::get_item_aliases_in_language::{
    GetItemAliasesInLanguage, GetItemAliasesInLanguageRequest, GetItemAliasesInLanguageResponse,
};
pub use self::patch_item_aliases::{
    PatchItemAliases, PatchItemAliasesRequest, PatchItemAliasesResponse,
};
pub use self::patch_sitelinks::{PatchSitelinks, PatchSitelinksRequest, PatchSitelinksResponse};
pub use self::remove_item_statement::{RemoveItemStatement, RemoveItemStatementRequest};
pub use self::remove_sitelink::{RemoveSitelink, RemoveSitelinkRequest};
pub use self::request_validation::{ItemSerializationDeserializer, SitelinkEditDeserializer};
pub use self::set_sitelink::{SetSitelink, SetSitelinkRequest, SetSitelinkResponse};

/// Deserialize and apply a JSON Patch, mapping failures into the taxonomy.
///
/// A patch that is not a valid operation list is `invalid-patch`; a patch
/// that applies but trips over the document state maps to the
/// conflict-class codes pointing at the failing operation.
pub(crate) fn apply_json_patch(
    document: &Value,
    patch: &Value,
) -> Result<Value, ExecutionError> {
    let operations: Vec<PatchOperation> =
        serde_json::from_value(patch.clone()).map_err(|error| {
            UseCaseError::new(
                ErrorCode::InvalidPatch,
                format!("The provided patch is invalid: {error}"),
            )
        })?;

    apply(document, &operations).map_err(|PatchError { operation, kind }| match kind {
        PatchErrorKind::TargetNotFound { path } => UseCaseError::new(
            ErrorCode::PatchTargetNotFound,
            format!("Target '{path}' not found on the resource"),
        )
        .with_context(json!({ "operation": operation, "path": path }))
        .into(),
        PatchErrorKind::TestFailed { path, actual } => UseCaseError::new(
            ErrorCode::PatchTestFailed,
            format!("Test operation in the provided patch failed at '{path}'"),
        )
        .with_context(json!({
            "operation": operation,
            "path": path,
            "actual-value": actual,
        }))
        .into(),
        PatchErrorKind::InvalidPointer { path } => UseCaseError::new(
            ErrorCode::InvalidPatch,
            format!("The provided patch contains an invalid pointer: {path}"),
        )
        .with_context(json!({ "operation": operation, "path": path }))
        .into(),
    })
}
