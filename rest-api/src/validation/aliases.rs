//! Alias validation.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::ValidationConfig;
use crate::domain::{AliasGroup, AliasGroupList};

use super::language::{LanguageCodeError, LanguageCodeValidator};

/// Rejections raised while validating the `aliases` serialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AliasesValidationError {
    /// A language key is not a known language code.
    #[error("not a valid language code in aliases: {language}")]
    InvalidLanguageCode {
        /// The rejected code.
        language: String,
    },
    /// The value for a language is not a list.
    #[error("aliases for language {language} are not a list")]
    InvalidAliasList {
        /// Language carrying the bad value.
        language: String,
        /// The rejected value.
        value: Value,
    },
    /// The list for a language is empty.
    #[error("alias list for language {language} is empty")]
    EmptyAliasList {
        /// Language carrying the empty list.
        language: String,
    },
    /// An alias is not a string or contains control characters.
    #[error("not a valid alias for language {language}")]
    InvalidAlias {
        /// Language of the offending alias.
        language: String,
        /// The rejected value.
        value: Value,
    },
    /// An alias is empty after trimming.
    #[error("alias for language {language} is empty")]
    EmptyAlias {
        /// Language of the offending alias.
        language: String,
    },
    /// The same alias appears twice in one language.
    #[error("alias list for language {language} contains duplicate: {alias}")]
    DuplicateAlias {
        /// Language of the offending alias.
        language: String,
        /// The duplicated alias.
        alias: String,
    },
    /// An alias exceeds the configured length limit.
    #[error("alias for language {language} exceeds {limit} characters")]
    AliasTooLong {
        /// Language of the offending alias.
        language: String,
        /// Configured limit.
        limit: usize,
    },
}

/// Validates the `aliases` serialization of an item.
#[derive(Clone)]
pub struct ItemAliasesValidator {
    config: Arc<ValidationConfig>,
    language_codes: LanguageCodeValidator,
}

impl ItemAliasesValidator {
    /// Build a validator over the given configuration.
    pub fn new(config: Arc<ValidationConfig>) -> Self {
        let language_codes = LanguageCodeValidator::new(Arc::clone(&config));
        Self {
            config,
            language_codes,
        }
    }

    /// Validate the serialization, returning the deserialized alias groups
    /// with trimmed texts.
    pub fn validate(
        &self,
        serialization: &Map<String, Value>,
    ) -> Result<AliasGroupList, AliasesValidationError> {
        let mut groups = AliasGroupList::new();
        for (language, value) in serialization {
            self.language_codes.validate(language).map_err(
                |LanguageCodeError::Invalid { language }| {
                    AliasesValidationError::InvalidLanguageCode { language }
                },
            )?;
            let aliases = self.validate_group(language, value)?;
            groups.set(AliasGroup::new(language.clone(), aliases));
        }
        Ok(groups)
    }

    fn validate_group(
        &self,
        language: &str,
        value: &Value,
    ) -> Result<Vec<String>, AliasesValidationError> {
        let Some(entries) = value.as_array() else {
            return Err(AliasesValidationError::InvalidAliasList {
                language: language.to_owned(),
                value: value.clone(),
            });
        };
        if entries.is_empty() {
            return Err(AliasesValidationError::EmptyAliasList {
                language: language.to_owned(),
            });
        }

        let limit = self.config.max_term_length;
        let mut aliases: Vec<String> = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(text) = entry.as_str() else {
                return Err(AliasesValidationError::InvalidAlias {
                    language: language.to_owned(),
                    value: entry.clone(),
                });
            };
            if text.chars().any(char::is_control) {
                return Err(AliasesValidationError::InvalidAlias {
                    language: language.to_owned(),
                    value: entry.clone(),
                });
            }
            let text = text.trim();
            if text.is_empty() {
                return Err(AliasesValidationError::EmptyAlias {
                    language: language.to_owned(),
                });
            }
            if text.chars().count() > limit {
                return Err(AliasesValidationError::AliasTooLong {
                    language: language.to_owned(),
                    limit,
                });
            }
            if aliases.iter().any(|existing| existing == text) {
                return Err(AliasesValidationError::DuplicateAlias {
                    language: language.to_owned(),
                    alias: text.to_owned(),
                });
            }
            aliases.push(text.to_owned());
        }
        Ok(aliases)
    }
}
