//! HTTP error payloads and mapping from use-case errors.
//!
//! Keep the use cases free of transport concerns by translating
//! [`ExecutionError`] into Actix responses here. The status mapping is an
//! exhaustive match over [`ErrorCode`], so a new code without a status
//! fails to compile.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::usecases::{ErrorCode, ExecutionError, UseCaseError};

/// Standard error envelope returned by HTTP handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<Value>,
}

impl ApiError {
    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error context for clients.
    #[must_use]
    pub fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    fn to_status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidItemId
            | ErrorCode::InvalidStatementId
            | ErrorCode::InvalidLanguageCode
            | ErrorCode::InvalidSiteId
            | ErrorCode::ItemDataInvalidField
            | ErrorCode::ItemDataUnexpectedField
            | ErrorCode::MissingLabelsAndDescriptions
            | ErrorCode::LabelEmpty
            | ErrorCode::InvalidLabel
            | ErrorCode::LabelTooLong
            | ErrorCode::DescriptionEmpty
            | ErrorCode::InvalidDescription
            | ErrorCode::DescriptionTooLong
            | ErrorCode::LabelDescriptionSameValue
            | ErrorCode::ItemLabelDescriptionDuplicate
            | ErrorCode::AliasEmpty
            | ErrorCode::InvalidAlias
            | ErrorCode::InvalidAliasList
            | ErrorCode::AliasDuplicate
            | ErrorCode::AliasTooLong
            | ErrorCode::StatementDataInvalidField
            | ErrorCode::StatementDataMissingField
            | ErrorCode::InvalidSitelinkType
            | ErrorCode::SitelinkDataMissingTitle
            | ErrorCode::TitleFieldEmpty
            | ErrorCode::InvalidTitleField
            | ErrorCode::InvalidSitelinkBadgesFormat
            | ErrorCode::InvalidInputSitelinkBadge
            | ErrorCode::ItemNotABadge
            | ErrorCode::SitelinkTitleNotFound
            | ErrorCode::InvalidPatch => StatusCode::BAD_REQUEST,
            ErrorCode::ItemNotFound
            | ErrorCode::AliasesNotDefined
            | ErrorCode::SitelinkNotDefined
            | ErrorCode::StatementNotFound => StatusCode::NOT_FOUND,
            ErrorCode::RedirectedItem
            | ErrorCode::SitelinkConflict
            | ErrorCode::PatchTargetNotFound
            | ErrorCode::PatchTestFailed => StatusCode::CONFLICT,
            ErrorCode::PatchedSitelinksInvalid
            | ErrorCode::PatchedSitelinkInvalidSiteId
            | ErrorCode::PatchedSitelinkMissingTitle
            | ErrorCode::PatchedSitelinkTitleEmpty
            | ErrorCode::PatchedSitelinkInvalidTitle
            | ErrorCode::PatchedSitelinkInvalidType
            | ErrorCode::PatchedSitelinkBadgesFormat
            | ErrorCode::PatchedSitelinkInvalidBadge
            | ErrorCode::PatchedSitelinkItemNotABadge
            | ErrorCode::PatchedSitelinkTitleDoesNotExist
            | ErrorCode::PatchedSitelinkConflict
            | ErrorCode::PatchedSitelinkUrlNotModifiable
            | ErrorCode::PatchedAliasesInvalid
            | ErrorCode::PatchedAliasesInvalidLanguageCode
            | ErrorCode::PatchedAliasEmpty
            | ErrorCode::PatchedAliasDuplicate
            | ErrorCode::PatchedAliasTooLong => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::UnexpectedError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UseCaseError> for ApiError {
    fn from(value: UseCaseError) -> Self {
        Self {
            code: value.code(),
            message: value.message().to_owned(),
            context: value.context().cloned(),
        }
    }
}

impl From<ExecutionError> for ApiError {
    fn from(value: ExecutionError) -> Self {
        match value {
            ExecutionError::UseCase(error) => error.into(),
            ExecutionError::ItemRedirect { target } => Self {
                code: ErrorCode::RedirectedItem,
                message: format!("Item {target} has been merged into another item"),
                context: Some(json!({ "redirect-target": target.as_str() })),
            },
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.to_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code, ErrorCode::UnexpectedError) {
            error!(message = %self.message, "request failed unexpectedly");
            let redacted = ApiError {
                code: self.code,
                message: "Unexpected error".to_owned(),
                context: None,
            };
            return HttpResponse::build(self.status_code()).json(redacted);
        }
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
