//! The public error taxonomy shared by every use case.
//!
//! [`ErrorCode`] is the closed set of machine-readable codes a use case can
//! emit; the HTTP layer maps each code to a status exhaustively, so adding a
//! code without deciding its status fails to compile. [`UseCaseError`]
//! pairs a code with a human-readable message and optional structured
//! context. [`ExecutionError`] adds the item-redirect outcome, which is not
//! an error in the taxonomy but still aborts a use case.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::ports::{ItemReadError, ItemWriteError, SiteAccessError};
use crate::domain::ItemId;
use crate::validation::BackendError;

/// Machine-readable error codes, serialized in kebab-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    // Malformed request data.
    InvalidItemId,
    InvalidStatementId,
    InvalidLanguageCode,
    InvalidSiteId,
    ItemDataInvalidField,
    ItemDataUnexpectedField,
    MissingLabelsAndDescriptions,
    LabelEmpty,
    InvalidLabel,
    LabelTooLong,
    DescriptionEmpty,
    InvalidDescription,
    DescriptionTooLong,
    LabelDescriptionSameValue,
    ItemLabelDescriptionDuplicate,
    AliasEmpty,
    InvalidAlias,
    InvalidAliasList,
    AliasDuplicate,
    AliasTooLong,
    StatementDataInvalidField,
    StatementDataMissingField,
    InvalidSitelinkType,
    SitelinkDataMissingTitle,
    TitleFieldEmpty,
    InvalidTitleField,
    InvalidSitelinkBadgesFormat,
    InvalidInputSitelinkBadge,
    ItemNotABadge,
    SitelinkTitleNotFound,
    InvalidPatch,
    // Missing resources.
    ItemNotFound,
    AliasesNotDefined,
    SitelinkNotDefined,
    StatementNotFound,
    // Conflicts with current state.
    RedirectedItem,
    SitelinkConflict,
    PatchTargetNotFound,
    PatchTestFailed,
    // Patches that applied but produced invalid state.
    PatchedSitelinksInvalid,
    PatchedSitelinkInvalidSiteId,
    PatchedSitelinkMissingTitle,
    PatchedSitelinkTitleEmpty,
    PatchedSitelinkInvalidTitle,
    PatchedSitelinkInvalidType,
    PatchedSitelinkBadgesFormat,
    PatchedSitelinkInvalidBadge,
    PatchedSitelinkItemNotABadge,
    PatchedSitelinkTitleDoesNotExist,
    PatchedSitelinkConflict,
    PatchedSitelinkUrlNotModifiable,
    PatchedAliasesInvalid,
    PatchedAliasesInvalidLanguageCode,
    PatchedAliasEmpty,
    PatchedAliasDuplicate,
    PatchedAliasTooLong,
    // Everything else.
    UnexpectedError,
}

impl ErrorCode {
    /// The wire form of the code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidItemId => "invalid-item-id",
            Self::InvalidStatementId => "invalid-statement-id",
            Self::InvalidLanguageCode => "invalid-language-code",
            Self::InvalidSiteId => "invalid-site-id",
            Self::ItemDataInvalidField => "item-data-invalid-field",
            Self::ItemDataUnexpectedField => "item-data-unexpected-field",
            Self::MissingLabelsAndDescriptions => "missing-labels-and-descriptions",
            Self::LabelEmpty => "label-empty",
            Self::InvalidLabel => "invalid-label",
            Self::LabelTooLong => "label-too-long",
            Self::DescriptionEmpty => "description-empty",
            Self::InvalidDescription => "invalid-description",
            Self::DescriptionTooLong => "description-too-long",
            Self::LabelDescriptionSameValue => "label-description-same-value",
            Self::ItemLabelDescriptionDuplicate => "item-label-description-duplicate",
            Self::AliasEmpty => "alias-empty",
            Self::InvalidAlias => "invalid-alias",
            Self::InvalidAliasList => "invalid-alias-list",
            Self::AliasDuplicate => "alias-duplicate",
            Self::AliasTooLong => "alias-too-long",
            Self::StatementDataInvalidField => "statement-data-invalid-field",
            Self::StatementDataMissingField => "statement-data-missing-field",
            Self::InvalidSitelinkType => "invalid-sitelink-type",
            Self::SitelinkDataMissingTitle => "sitelink-data-missing-title",
            Self::TitleFieldEmpty => "title-field-empty",
            Self::InvalidTitleField => "invalid-title-field",
            Self::InvalidSitelinkBadgesFormat => "invalid-sitelink-badges-format",
            Self::InvalidInputSitelinkBadge => "invalid-input-sitelink-badge",
            Self::ItemNotABadge => "item-not-a-badge",
            Self::SitelinkTitleNotFound => "sitelink-title-not-found",
            Self::InvalidPatch => "invalid-patch",
            Self::ItemNotFound => "item-not-found",
            Self::AliasesNotDefined => "aliases-not-defined",
            Self::SitelinkNotDefined => "sitelink-not-defined",
            Self::StatementNotFound => "statement-not-found",
            Self::RedirectedItem => "redirected-item",
            Self::SitelinkConflict => "sitelink-conflict",
            Self::PatchTargetNotFound => "patch-target-not-found",
            Self::PatchTestFailed => "patch-test-failed",
            Self::PatchedSitelinksInvalid => "patched-sitelinks-invalid",
            Self::PatchedSitelinkInvalidSiteId => "patched-sitelink-invalid-site-id",
            Self::PatchedSitelinkMissingTitle => "patched-sitelink-missing-title",
            Self::PatchedSitelinkTitleEmpty => "patched-sitelink-title-empty",
            Self::PatchedSitelinkInvalidTitle => "patched-sitelink-invalid-title",
            Self::PatchedSitelinkInvalidType => "patched-sitelink-invalid-type",
            Self::PatchedSitelinkBadgesFormat => "patched-sitelink-badges-format",
            Self::PatchedSitelinkInvalidBadge => "patched-sitelink-invalid-badge",
            Self::PatchedSitelinkItemNotABadge => "patched-sitelink-item-not-a-badge",
            Self::PatchedSitelinkTitleDoesNotExist => "patched-sitelink-title-does-not-exist",
            Self::PatchedSitelinkConflict => "patched-sitelink-conflict",
            Self::PatchedSitelinkUrlNotModifiable => "patched-sitelink-url-not-modifiable",
            Self::PatchedAliasesInvalid => "patched-aliases-invalid",
            Self::PatchedAliasesInvalidLanguageCode => "patched-aliases-invalid-language-code",
            Self::PatchedAliasEmpty => "patched-alias-empty",
            Self::PatchedAliasDuplicate => "patched-alias-duplicate",
            Self::PatchedAliasTooLong => "patched-alias-too-long",
            Self::UnexpectedError => "unexpected-error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client-facing use-case failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct UseCaseError {
    code: ErrorCode,
    message: String,
    context: Option<Value>,
}

impl UseCaseError {
    /// Build an error without context.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Attach structured context.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// The machine-readable code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured context, if any.
    #[must_use]
    pub fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }
}

/// Why a use case stopped before producing its response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    /// A failure from the taxonomy.
    #[error(transparent)]
    UseCase(#[from] UseCaseError),
    /// The subject item is a redirect; callers turn this into a redirect
    /// response or a `redirected-item` error depending on the operation.
    #[error("item redirected to {target}")]
    ItemRedirect {
        /// The redirect target.
        target: ItemId,
    },
}

fn unexpected(message: String) -> ExecutionError {
    ExecutionError::UseCase(UseCaseError::new(ErrorCode::UnexpectedError, message))
}

impl From<ItemReadError> for ExecutionError {
    fn from(value: ItemReadError) -> Self {
        unexpected(value.to_string())
    }
}

impl From<ItemWriteError> for ExecutionError {
    fn from(value: ItemWriteError) -> Self {
        unexpected(value.to_string())
    }
}

impl From<SiteAccessError> for ExecutionError {
    fn from(value: SiteAccessError) -> Self {
        unexpected(value.to_string())
    }
}

impl From<BackendError> for ExecutionError {
    fn from(value: BackendError) -> Self {
        unexpected(value.to_string())
    }
}
