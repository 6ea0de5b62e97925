//! Validating deserializers for request payloads.
//!
//! These wrap the validators and translate their closed error enums into
//! the public taxonomy, exhaustively. Every match below is total over its
//! enum, so a new validator variant without a mapping is a compile error
//! rather than a request-time surprise.

use serde_json::{json, Value};

use crate::domain::{Item, ItemId, SiteId, SiteLink};
use crate::validation::{
    AliasesValidationError, ItemValidationError, ItemValidator, SitelinkValidationError,
    SitelinkValidator, SitelinksValidationError, StatementsValidationError, TermsValidationError,
    ValidationFailure,
};

use super::error::{ErrorCode, ExecutionError, UseCaseError};

/// Deserializes and validates a whole item payload.
#[derive(Clone)]
pub struct ItemSerializationDeserializer {
    validator: ItemValidator,
}

impl ItemSerializationDeserializer {
    /// Wrap an item validator.
    #[must_use]
    pub fn new(validator: ItemValidator) -> Self {
        Self { validator }
    }

    /// Validate the payload, returning the deserialized item.
    pub async fn deserialize(&self, serialization: &Value) -> Result<Item, ExecutionError> {
        match self.validator.validate(serialization).await {
            Ok(item) => Ok(item),
            Err(ValidationFailure::Invalid(error)) => Err(item_error(error).into()),
            Err(ValidationFailure::Backend(error)) => Err(error.into()),
        }
    }
}

fn item_error(error: ItemValidationError) -> UseCaseError {
    match error {
        ItemValidationError::NotAnObject { value } => {
            UseCaseError::new(ErrorCode::ItemDataInvalidField, "Invalid input for item")
                .with_context(json!({ "path": "/item", "value": value }))
        }
        ItemValidationError::InvalidField { field, value } => UseCaseError::new(
            ErrorCode::ItemDataInvalidField,
            format!("Invalid input for item field '{field}'"),
        )
        .with_context(json!({ "path": format!("/item/{field}"), "value": value })),
        ItemValidationError::UnexpectedField { field } => UseCaseError::new(
            ErrorCode::ItemDataUnexpectedField,
            format!("The request body contains an unexpected field '{field}'"),
        )
        .with_context(json!({ "path": format!("/item/{field}") })),
        ItemValidationError::MissingLabelsAndDescriptions => UseCaseError::new(
            ErrorCode::MissingLabelsAndDescriptions,
            "Item requires at least a label or a description in one language",
        ),
        ItemValidationError::Terms(error) => terms_error(error),
        ItemValidationError::Aliases(error) => aliases_error(error),
        ItemValidationError::Statements(error) => statements_error(error),
        ItemValidationError::Sitelinks(error) => sitelinks_error(error),
    }
}

fn terms_error(error: TermsValidationError) -> UseCaseError {
    match error {
        TermsValidationError::InvalidLanguageCode { field, language } => UseCaseError::new(
            ErrorCode::InvalidLanguageCode,
            format!("Not a valid language code: {language}"),
        )
        .with_context(json!({ "path": format!("/item/{field}"), "language": language })),
        TermsValidationError::LabelEmpty { language } => UseCaseError::new(
            ErrorCode::LabelEmpty,
            "Label must not be empty",
        )
        .with_context(json!({ "language": language })),
        TermsValidationError::InvalidLabel { language, value } => UseCaseError::new(
            ErrorCode::InvalidLabel,
            format!("Not a valid label: {value}"),
        )
        .with_context(json!({ "language": language, "value": value })),
        TermsValidationError::LabelTooLong { language, limit } => UseCaseError::new(
            ErrorCode::LabelTooLong,
            format!("Label must be no more than {limit} characters long"),
        )
        .with_context(json!({ "language": language, "character-limit": limit })),
        TermsValidationError::DescriptionEmpty { language } => UseCaseError::new(
            ErrorCode::DescriptionEmpty,
            "Description must not be empty",
        )
        .with_context(json!({ "language": language })),
        TermsValidationError::InvalidDescription { language, value } => UseCaseError::new(
            ErrorCode::InvalidDescription,
            format!("Not a valid description: {value}"),
        )
        .with_context(json!({ "language": language, "value": value })),
        TermsValidationError::DescriptionTooLong { language, limit } => UseCaseError::new(
            ErrorCode::DescriptionTooLong,
            format!("Description must be no more than {limit} characters long"),
        )
        .with_context(json!({ "language": language, "character-limit": limit })),
        TermsValidationError::LabelEqualsDescription { language } => UseCaseError::new(
            ErrorCode::LabelDescriptionSameValue,
            format!("Label and description for language '{language}' can not have the same value"),
        )
        .with_context(json!({ "language": language })),
        TermsValidationError::DuplicateLabelDescription {
            language,
            label,
            description,
            matching_item_id,
        } => UseCaseError::new(
            ErrorCode::ItemLabelDescriptionDuplicate,
            format!(
                "Item '{matching_item_id}' already has label '{label}' associated with language \
                 code '{language}', using the same description text"
            ),
        )
        .with_context(json!({
            "language": language,
            "label": label,
            "description": description,
            "matching-item-id": matching_item_id.as_str(),
        })),
    }
}

fn aliases_error(error: AliasesValidationError) -> UseCaseError {
    match error {
        AliasesValidationError::InvalidLanguageCode { language } => UseCaseError::new(
            ErrorCode::InvalidLanguageCode,
            format!("Not a valid language code: {language}"),
        )
        .with_context(json!({ "path": "/item/aliases", "language": language })),
        AliasesValidationError::InvalidAliasList { language, value } => UseCaseError::new(
            ErrorCode::InvalidAliasList,
            "Not a valid alias list",
        )
        .with_context(json!({ "language": language, "value": value })),
        AliasesValidationError::EmptyAliasList { language } => UseCaseError::new(
            ErrorCode::InvalidAliasList,
            "Alias list must not be empty",
        )
        .with_context(json!({ "language": language, "value": [] })),
        AliasesValidationError::InvalidAlias { language, value } => UseCaseError::new(
            ErrorCode::InvalidAlias,
            format!("Not a valid alias: {value}"),
        )
        .with_context(json!({ "language": language, "value": value })),
        AliasesValidationError::EmptyAlias { language } => UseCaseError::new(
            ErrorCode::AliasEmpty,
            "Alias must not be empty",
        )
        .with_context(json!({ "language": language })),
        AliasesValidationError::DuplicateAlias { language, alias } => UseCaseError::new(
            ErrorCode::AliasDuplicate,
            format!("Alias list contains a duplicate alias: '{alias}'"),
        )
        .with_context(json!({ "language": language, "alias": alias })),
        AliasesValidationError::AliasTooLong { language, limit } => UseCaseError::new(
            ErrorCode::AliasTooLong,
            format!("Alias must be no more than {limit} characters long"),
        )
        .with_context(json!({ "language": language, "character-limit": limit })),
    }
}

fn statements_error(error: StatementsValidationError) -> UseCaseError {
    let invalid = |path: String, value: Value| {
        UseCaseError::new(
            ErrorCode::StatementDataInvalidField,
            "Invalid input for statement data",
        )
        .with_context(json!({ "path": format!("/item/statements/{path}"), "value": value }))
    };
    match error {
        StatementsValidationError::InvalidPropertyId { property } => {
            invalid(property.clone(), json!(property))
        }
        StatementsValidationError::InvalidStatementGroup { path, value }
        | StatementsValidationError::InvalidStatementType { path, value } => invalid(path, value),
        StatementsValidationError::MissingField { path, field } => UseCaseError::new(
            ErrorCode::StatementDataMissingField,
            format!("Mandatory field missing in the statement data: {field}"),
        )
        .with_context(json!({
            "path": format!("/item/statements/{path}"),
            "field": field,
        })),
        StatementsValidationError::InvalidField { path, field, value } => {
            invalid(format!("{path}/{field}"), value)
        }
        StatementsValidationError::PropertyMismatch {
            path,
            expected,
            declared,
        } => UseCaseError::new(
            ErrorCode::StatementDataInvalidField,
            format!("Statement declares property '{declared}', expected '{expected}'"),
        )
        .with_context(json!({
            "path": format!("/item/statements/{path}/property/id"),
            "value": declared,
        })),
    }
}

fn sitelinks_error(error: SitelinksValidationError) -> UseCaseError {
    match error {
        SitelinksValidationError::NotAnObject { value } => UseCaseError::new(
            ErrorCode::ItemDataInvalidField,
            "Invalid input for item field 'sitelinks'",
        )
        .with_context(json!({ "path": "/item/sitelinks", "value": value })),
        SitelinksValidationError::InvalidSiteId { site_id } => UseCaseError::new(
            ErrorCode::InvalidSiteId,
            format!("Not a valid site ID: {site_id}"),
        )
        .with_context(json!({ "site-id": site_id })),
        SitelinksValidationError::InvalidSitelinkType { site, value } => UseCaseError::new(
            ErrorCode::InvalidSitelinkType,
            "Not a valid sitelink type",
        )
        .with_context(json!({ "site-id": site.as_str(), "value": value })),
        SitelinksValidationError::Sitelink { site, error } => {
            sitelink_error(&site, error, &format!("/item/sitelinks/{}", site.as_str()))
        }
    }
}

/// Translate a single-sitelink rejection, with context paths rooted at
/// `root`.
fn sitelink_error(site: &SiteId, error: SitelinkValidationError, root: &str) -> UseCaseError {
    let site = site.as_str();
    match error {
        SitelinkValidationError::TitleMissing => UseCaseError::new(
            ErrorCode::SitelinkDataMissingTitle,
            "Mandatory sitelink field 'title' is missing",
        )
        .with_context(json!({ "path": format!("{root}/title"), "site-id": site })),
        SitelinkValidationError::TitleEmpty => UseCaseError::new(
            ErrorCode::TitleFieldEmpty,
            "Title must not be empty",
        )
        .with_context(json!({ "path": format!("{root}/title"), "site-id": site })),
        SitelinkValidationError::InvalidTitleType { value } => UseCaseError::new(
            ErrorCode::InvalidTitleField,
            "Not a valid input for title field",
        )
        .with_context(json!({
            "path": format!("{root}/title"),
            "site-id": site,
            "value": value,
        })),
        SitelinkValidationError::InvalidTitle { title } => UseCaseError::new(
            ErrorCode::InvalidTitleField,
            format!("Not a valid input for title field: {title}"),
        )
        .with_context(json!({
            "path": format!("{root}/title"),
            "site-id": site,
            "value": title,
        })),
        SitelinkValidationError::InvalidBadgesType { value } => UseCaseError::new(
            ErrorCode::InvalidSitelinkBadgesFormat,
            "Value of 'badges' field is not a list",
        )
        .with_context(json!({
            "path": format!("{root}/badges"),
            "site-id": site,
            "value": value,
        })),
        SitelinkValidationError::InvalidBadge { badge } => UseCaseError::new(
            ErrorCode::InvalidInputSitelinkBadge,
            format!("Badge input is not an item ID: {badge}"),
        )
        .with_context(json!({ "site-id": site, "badge": badge })),
        SitelinkValidationError::BadgeNotAllowed { badge } => UseCaseError::new(
            ErrorCode::ItemNotABadge,
            format!("Item ID provided as badge is not allowed as a badge: {badge}"),
        )
        .with_context(json!({ "site-id": site, "badge": badge.as_str() })),
        SitelinkValidationError::TitleNotFound { title } => UseCaseError::new(
            ErrorCode::SitelinkTitleNotFound,
            format!("Page with title {title} does not exist on the given site"),
        )
        .with_context(json!({ "site-id": site, "title": title })),
        SitelinkValidationError::Conflict { matching_item_id } => UseCaseError::new(
            ErrorCode::SitelinkConflict,
            format!("Sitelink is already being used on {matching_item_id}"),
        )
        .with_context(json!({
            "site-id": site,
            "matching-item-id": matching_item_id.as_str(),
        })),
    }
}

/// Deserializes and validates the payload of a single-sitelink edit.
#[derive(Clone)]
pub struct SitelinkEditDeserializer {
    validator: SitelinkValidator,
}

impl SitelinkEditDeserializer {
    /// Wrap a sitelink validator.
    #[must_use]
    pub fn new(validator: SitelinkValidator) -> Self {
        Self { validator }
    }

    /// Validate the payload for the given site, returning the deserialized
    /// sitelink with resolved title, badges and URL.
    pub async fn deserialize(
        &self,
        subject: Option<&ItemId>,
        site: &SiteId,
        serialization: &Value,
    ) -> Result<SiteLink, ExecutionError> {
        let Some(fields) = serialization.as_object() else {
            return Err(UseCaseError::new(
                ErrorCode::InvalidSitelinkType,
                "Not a valid sitelink type",
            )
            .with_context(json!({ "site-id": site.as_str(), "value": serialization }))
            .into());
        };
        match self.validator.validate(subject, site, fields, true).await {
            Ok(sitelink) => Ok(sitelink),
            Err(ValidationFailure::Invalid(error)) => {
                Err(sitelink_error(site, error, "/sitelink").into())
            }
            Err(ValidationFailure::Backend(error)) => Err(error.into()),
        }
    }
}
