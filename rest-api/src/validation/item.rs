//! Whole-item validation.
//!
//! [`ItemValidator`] composes the field validators into one deserializing
//! pass over an item serialization. The checks run in a fixed order so the
//! first problem reported is deterministic: field shapes, unexpected keys,
//! the labels-or-descriptions requirement, then labels and descriptions,
//! aliases, statements and finally sitelinks.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::ValidationConfig;
use crate::domain::ports::{
    SitelinkConflictChecker, SitelinkTargetResolver, TermDuplicateDetector,
};
use crate::domain::Item;

use super::aliases::{AliasesValidationError, ItemAliasesValidator};
use super::sitelinks::{SitelinksValidationError, SitelinksValidator};
use super::statements::{ItemStatementsValidator, StatementsValidationError};
use super::terms::{ItemTermsValidator, TermsValidationError};
use super::ValidationFailure;

/// Top-level item fields a serialization may carry.
const ITEM_FIELDS: [&str; 5] = [
    "labels",
    "descriptions",
    "aliases",
    "sitelinks",
    "statements",
];

/// Keys tolerated in a serialization without being validated. Clients often
/// round-trip item output back in, so the read-only `id` and `type` keys
/// pass silently.
const IGNORED_KEYS: [&str; 2] = ["id", "type"];

/// Rejections raised while validating a whole item serialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItemValidationError {
    /// The serialization is not an object.
    #[error("item serialization is not an object")]
    NotAnObject {
        /// The rejected value.
        value: Value,
    },
    /// One of the known fields has the wrong shape.
    #[error("invalid item field: {field}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: Value,
    },
    /// The serialization carries a key that is not an item field.
    #[error("unexpected item field: {field}")]
    UnexpectedField {
        /// The offending key.
        field: String,
    },
    /// Neither labels nor descriptions were provided.
    #[error("item without labels or descriptions")]
    MissingLabelsAndDescriptions,
    /// Labels or descriptions failed validation.
    #[error(transparent)]
    Terms(TermsValidationError),
    /// Aliases failed validation.
    #[error(transparent)]
    Aliases(AliasesValidationError),
    /// Statements failed validation.
    #[error(transparent)]
    Statements(StatementsValidationError),
    /// Sitelinks failed validation.
    #[error(transparent)]
    Sitelinks(SitelinksValidationError),
}

/// Validates a full item serialization into a domain [`Item`].
#[derive(Clone)]
pub struct ItemValidator {
    terms: ItemTermsValidator,
    aliases: ItemAliasesValidator,
    statements: ItemStatementsValidator,
    sitelinks: SitelinksValidator,
}

impl ItemValidator {
    /// Build a validator over the given configuration and collaborators.
    pub fn new(
        config: Arc<ValidationConfig>,
        duplicate_detector: Arc<dyn TermDuplicateDetector>,
        target_resolver: Arc<dyn SitelinkTargetResolver>,
        conflict_checker: Arc<dyn SitelinkConflictChecker>,
    ) -> Self {
        Self {
            terms: ItemTermsValidator::new(Arc::clone(&config), duplicate_detector),
            aliases: ItemAliasesValidator::new(Arc::clone(&config)),
            statements: ItemStatementsValidator::new(),
            sitelinks: SitelinksValidator::new(config, target_resolver, conflict_checker),
        }
    }

    /// Validate an item serialization, returning the deserialized item.
    pub async fn validate(
        &self,
        serialization: &Value,
    ) -> Result<Item, ValidationFailure<ItemValidationError>> {
        let Some(fields) = serialization.as_object() else {
            return Err(ValidationFailure::Invalid(ItemValidationError::NotAnObject {
                value: serialization.clone(),
            }));
        };

        let mut objects: [Map<String, Value>; 5] = Default::default();
        for (slot, field) in objects.iter_mut().zip(ITEM_FIELDS) {
            match fields.get(field) {
                None => {}
                Some(Value::Object(entries)) => slot.clone_from(entries),
                // Clients serialize an empty mapping as [].
                Some(Value::Array(entries)) if entries.is_empty() => {}
                Some(other) => {
                    return Err(ValidationFailure::Invalid(
                        ItemValidationError::InvalidField {
                            field,
                            value: other.clone(),
                        },
                    ));
                }
            }
        }
        let [labels, descriptions, aliases, sitelinks, statements] = objects;

        for key in fields.keys() {
            if !ITEM_FIELDS.contains(&key.as_str()) && !IGNORED_KEYS.contains(&key.as_str()) {
                return Err(ValidationFailure::Invalid(
                    ItemValidationError::UnexpectedField { field: key.clone() },
                ));
            }
        }

        if labels.is_empty() && descriptions.is_empty() {
            return Err(ValidationFailure::Invalid(
                ItemValidationError::MissingLabelsAndDescriptions,
            ));
        }

        let (labels, descriptions) = self
            .terms
            .validate(&labels, &descriptions, None)
            .await
            .map_err(|failure| failure.map_invalid(ItemValidationError::Terms))?;
        let aliases = self
            .aliases
            .validate(&aliases)
            .map_err(|error| ValidationFailure::Invalid(ItemValidationError::Aliases(error)))?;
        let statements = self.statements.validate(&statements).map_err(|error| {
            ValidationFailure::Invalid(ItemValidationError::Statements(error))
        })?;
        let sitelinks = self
            .sitelinks
            .validate(None, &Value::Object(sitelinks), None)
            .await
            .map_err(|failure| failure.map_invalid(ItemValidationError::Sitelinks))?;

        Ok(Item::new(labels, descriptions, aliases, sitelinks, statements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BadgeConfig, SiteConfig, SiteRegistry};
    use crate::domain::ports::{
        MockSitelinkConflictChecker, MockSitelinkTargetResolver, MockTermDuplicateDetector,
    };
    use crate::domain::{ItemId, SiteId};
    use serde_json::json;

    fn config() -> Arc<ValidationConfig> {
        let registry = SiteRegistry::new([(
            SiteId::new("enwiki").expect("valid site id"),
            SiteConfig {
                article_url_pattern: "https://en.wikipedia.org/wiki/$1".to_owned(),
            },
        )]);
        Arc::new(ValidationConfig::new(
            ["en".to_owned(), "de".to_owned()],
            registry,
            BadgeConfig::new([ItemId::new("Q567").expect("valid item id")], []),
        ))
    }

    fn validator() -> ItemValidator {
        let mut duplicates = MockTermDuplicateDetector::new();
        duplicates
            .expect_item_with_label_and_description()
            .returning(|_, _, _| Ok(None));
        let mut resolver = MockSitelinkTargetResolver::new();
        resolver
            .expect_resolve_title()
            .returning(|_, title, _| Ok(Some(title.to_owned())));
        let mut conflicts = MockSitelinkConflictChecker::new();
        conflicts
            .expect_item_for_sitelink()
            .returning(|_, _| Ok(None));
        ItemValidator::new(
            config(),
            Arc::new(duplicates),
            Arc::new(resolver),
            Arc::new(conflicts),
        )
    }

    #[tokio::test]
    async fn full_item_deserializes() {
        let item = validator()
            .validate(&json!({
                "labels": { "en": "potato" },
                "descriptions": { "en": "staple food" },
                "aliases": { "en": ["spud"] },
                "sitelinks": { "enwiki": { "title": "Potato", "badges": ["Q567"] } },
                "statements": {
                    "P31": [{ "property": { "id": "P31" }, "value": { "content": "Q5" } }]
                }
            }))
            .await
            .expect("valid item");
        assert_eq!(item.labels.text("en"), Some("potato"));
        assert_eq!(item.aliases.aliases("en"), Some(&["spud".to_owned()][..]));
        assert_eq!(item.statements.len(), 1);
        assert_eq!(item.sitelinks.len(), 1);
    }

    #[tokio::test]
    async fn deserialization_normalizes_text_and_badges() {
        let item = validator()
            .validate(&json!({
                "labels": { "en": "  potato  " },
                "sitelinks": { "enwiki": { "title": " Potato ", "badges": ["Q567", "Q567"] } }
            }))
            .await
            .expect("valid item");
        assert_eq!(item.labels.text("en"), Some("potato"));
        let sitelink = item
            .sitelinks
            .sitelink(&SiteId::new("enwiki").expect("valid site id"))
            .expect("sitelink present");
        assert_eq!(sitelink.title(), "Potato");
        assert_eq!(
            sitelink.badges(),
            [ItemId::new("Q567").expect("valid item id")]
        );
    }

    #[tokio::test]
    async fn empty_array_fields_count_as_empty_mappings() {
        let item = validator()
            .validate(&json!({
                "labels": { "en": "potato" },
                "aliases": [],
                "sitelinks": [],
                "statements": []
            }))
            .await
            .expect("empty arrays are empty collections");
        assert!(item.aliases.is_empty());
        assert!(item.sitelinks.is_empty());
        assert!(item.statements.is_empty());

        let failure = validator()
            .validate(&json!({ "labels": { "en": "potato" }, "statements": [1] }))
            .await
            .expect_err("non-empty array is not a mapping");
        assert_eq!(
            failure,
            ValidationFailure::Invalid(ItemValidationError::InvalidField {
                field: "statements",
                value: json!([1]),
            })
        );
    }

    #[tokio::test]
    async fn non_object_serialization_is_rejected() {
        let failure = validator()
            .validate(&json!([]))
            .await
            .expect_err("not an object");
        assert_eq!(
            failure,
            ValidationFailure::Invalid(ItemValidationError::NotAnObject { value: json!([]) })
        );
    }

    #[tokio::test]
    async fn field_with_wrong_shape_is_rejected_before_unexpected_keys() {
        let failure = validator()
            .validate(&json!({ "labels": "potato", "banana": {} }))
            .await
            .expect_err("labels must be an object");
        assert_eq!(
            failure,
            ValidationFailure::Invalid(ItemValidationError::InvalidField {
                field: "labels",
                value: json!("potato"),
            })
        );
    }

    #[tokio::test]
    async fn unexpected_key_is_rejected() {
        let failure = validator()
            .validate(&json!({ "labels": { "en": "potato" }, "banana": {} }))
            .await
            .expect_err("unexpected key");
        assert_eq!(
            failure,
            ValidationFailure::Invalid(ItemValidationError::UnexpectedField {
                field: "banana".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn round_tripped_id_and_type_keys_pass() {
        validator()
            .validate(&json!({
                "id": "Q123",
                "type": "item",
                "labels": { "en": "potato" }
            }))
            .await
            .expect("id and type are tolerated");
    }

    #[tokio::test]
    async fn item_without_labels_and_descriptions_is_rejected() {
        let failure = validator()
            .validate(&json!({ "aliases": { "en": ["spud"] } }))
            .await
            .expect_err("no labels or descriptions");
        assert_eq!(
            failure,
            ValidationFailure::Invalid(ItemValidationError::MissingLabelsAndDescriptions)
        );
    }

    #[tokio::test]
    async fn term_problems_surface_before_alias_problems() {
        let failure = validator()
            .validate(&json!({
                "labels": { "en": "" },
                "aliases": { "en": [""] }
            }))
            .await
            .expect_err("empty label");
        assert_eq!(
            failure,
            ValidationFailure::Invalid(ItemValidationError::Terms(
                TermsValidationError::LabelEmpty {
                    language: "en".to_owned()
                }
            ))
        );
    }
}
