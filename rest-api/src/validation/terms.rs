//! Label and description validation.
//!
//! Validated together because the fingerprint invariants span both: a label
//! and description in the same language must differ, and no other item may
//! carry the identical (label, description) pair for a language. The latter
//! check is delegated to storage at validation time and can race with a
//! concurrent creation; storage enforces the constraint on write.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::ValidationConfig;
use crate::domain::ports::TermDuplicateDetector;
use crate::domain::{ItemId, Term, TermList};

use super::language::{LanguageCodeError, LanguageCodeValidator};
use super::ValidationFailure;

/// Which term field a language-level rejection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermField {
    /// The `labels` field.
    Labels,
    /// The `descriptions` field.
    Descriptions,
}

impl fmt::Display for TermField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Labels => "labels",
            Self::Descriptions => "descriptions",
        })
    }
}

/// Rejections raised while validating labels and descriptions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TermsValidationError {
    /// A language key is not a known language code.
    #[error("not a valid language code in {field}: {language}")]
    InvalidLanguageCode {
        /// Field carrying the bad key.
        field: TermField,
        /// The rejected code.
        language: String,
    },
    /// A label is empty after trimming.
    #[error("label for language {language} is empty")]
    LabelEmpty {
        /// Language of the offending label.
        language: String,
    },
    /// A label is not a string or contains control characters.
    #[error("not a valid label for language {language}")]
    InvalidLabel {
        /// Language of the offending label.
        language: String,
        /// The rejected value.
        value: Value,
    },
    /// A label exceeds the configured length limit.
    #[error("label for language {language} exceeds {limit} characters")]
    LabelTooLong {
        /// Language of the offending label.
        language: String,
        /// Configured limit.
        limit: usize,
    },
    /// A description is empty after trimming.
    #[error("description for language {language} is empty")]
    DescriptionEmpty {
        /// Language of the offending description.
        language: String,
    },
    /// A description is not a string or contains control characters.
    #[error("not a valid description for language {language}")]
    InvalidDescription {
        /// Language of the offending description.
        language: String,
        /// The rejected value.
        value: Value,
    },
    /// A description exceeds the configured length limit.
    #[error("description for language {language} exceeds {limit} characters")]
    DescriptionTooLong {
        /// Language of the offending description.
        language: String,
        /// Configured limit.
        limit: usize,
    },
    /// Label and description carry the same text for a language.
    #[error("label and description for language {language} have the same value")]
    LabelEqualsDescription {
        /// The offending language.
        language: String,
    },
    /// Another item already carries this (label, description) pair.
    #[error("item {matching_item_id} already uses this label and description for {language}")]
    DuplicateLabelDescription {
        /// The offending language.
        language: String,
        /// The duplicated label.
        label: String,
        /// The duplicated description.
        description: String,
        /// Item already carrying the pair.
        matching_item_id: ItemId,
    },
}

/// Validates the `labels` and `descriptions` serializations of an item.
#[derive(Clone)]
pub struct ItemTermsValidator {
    config: Arc<ValidationConfig>,
    language_codes: LanguageCodeValidator,
    duplicate_detector: Arc<dyn TermDuplicateDetector>,
}

impl ItemTermsValidator {
    /// Build a validator over the given configuration and duplicate lookup.
    pub fn new(
        config: Arc<ValidationConfig>,
        duplicate_detector: Arc<dyn TermDuplicateDetector>,
    ) -> Self {
        let language_codes = LanguageCodeValidator::new(Arc::clone(&config));
        Self {
            config,
            language_codes,
            duplicate_detector,
        }
    }

    /// Validate both serializations, returning the deserialized term lists.
    ///
    /// `subject` is the item being edited, so it does not conflict with its
    /// own stored terms.
    pub async fn validate(
        &self,
        labels: &Map<String, Value>,
        descriptions: &Map<String, Value>,
        subject: Option<&ItemId>,
    ) -> Result<(TermList, TermList), ValidationFailure<TermsValidationError>> {
        let labels = self
            .validate_term_list(labels, TermField::Labels)
            .map_err(ValidationFailure::Invalid)?;
        let descriptions = self
            .validate_term_list(descriptions, TermField::Descriptions)
            .map_err(ValidationFailure::Invalid)?;

        for (language, label) in labels.iter() {
            if descriptions.text(language) == Some(label) {
                return Err(ValidationFailure::Invalid(
                    TermsValidationError::LabelEqualsDescription {
                        language: language.to_owned(),
                    },
                ));
            }
        }

        for (language, label) in labels.iter() {
            let Some(description) = descriptions.text(language) else {
                continue;
            };
            let matching = self
                .duplicate_detector
                .item_with_label_and_description(language, label, description)
                .await?;
            if let Some(matching_item_id) = matching {
                if subject != Some(&matching_item_id) {
                    return Err(ValidationFailure::Invalid(
                        TermsValidationError::DuplicateLabelDescription {
                            language: language.to_owned(),
                            label: label.to_owned(),
                            description: description.to_owned(),
                            matching_item_id,
                        },
                    ));
                }
            }
        }

        Ok((labels, descriptions))
    }

    fn validate_term_list(
        &self,
        serialization: &Map<String, Value>,
        field: TermField,
    ) -> Result<TermList, TermsValidationError> {
        let mut terms = TermList::new();
        for (language, value) in serialization {
            self.language_codes.validate(language).map_err(
                |LanguageCodeError::Invalid { language }| {
                    TermsValidationError::InvalidLanguageCode { field, language }
                },
            )?;
            let text = self.validate_text(language, value, field)?;
            terms.set(Term::new(language.clone(), text));
        }
        Ok(terms)
    }

    fn validate_text(
        &self,
        language: &str,
        value: &Value,
        field: TermField,
    ) -> Result<String, TermsValidationError> {
        let invalid = || match field {
            TermField::Labels => TermsValidationError::InvalidLabel {
                language: language.to_owned(),
                value: value.clone(),
            },
            TermField::Descriptions => TermsValidationError::InvalidDescription {
                language: language.to_owned(),
                value: value.clone(),
            },
        };
        let Some(text) = value.as_str() else {
            return Err(invalid());
        };
        let text = text.trim();
        if text.chars().any(char::is_control) {
            return Err(invalid());
        }
        if text.is_empty() {
            return Err(match field {
                TermField::Labels => TermsValidationError::LabelEmpty {
                    language: language.to_owned(),
                },
                TermField::Descriptions => TermsValidationError::DescriptionEmpty {
                    language: language.to_owned(),
                },
            });
        }
        let limit = self.config.max_term_length;
        if text.chars().count() > limit {
            return Err(match field {
                TermField::Labels => TermsValidationError::LabelTooLong {
                    language: language.to_owned(),
                    limit,
                },
                TermField::Descriptions => TermsValidationError::DescriptionTooLong {
                    language: language.to_owned(),
                    limit,
                },
            });
        }
        Ok(text.to_owned())
    }
}
