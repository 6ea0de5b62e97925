//! Language code validation against the configured language set.

use std::sync::Arc;

use thiserror::Error;

use crate::config::ValidationConfig;

/// Rejection raised for an unknown language code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageCodeError {
    /// The code is not in the configured language set.
    #[error("not a valid language code: {language}")]
    Invalid {
        /// The rejected code.
        language: String,
    },
}

/// Checks language codes against the configured set.
#[derive(Clone)]
pub struct LanguageCodeValidator {
    config: Arc<ValidationConfig>,
}

impl LanguageCodeValidator {
    /// Build a validator over the given configuration.
    pub fn new(config: Arc<ValidationConfig>) -> Self {
        Self { config }
    }

    /// Accept a known language code, reject anything else.
    pub fn validate(&self, language: &str) -> Result<(), LanguageCodeError> {
        if self.config.is_valid_language(language) {
            Ok(())
        } else {
            Err(LanguageCodeError::Invalid {
                language: language.to_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BadgeConfig, SiteRegistry};

    fn validator() -> LanguageCodeValidator {
        LanguageCodeValidator::new(Arc::new(ValidationConfig::new(
            ["en".to_owned(), "de".to_owned()],
            SiteRegistry::default(),
            BadgeConfig::default(),
        )))
    }

    #[test]
    fn known_code_passes() {
        validator().validate("en").expect("known language");
    }

    #[test]
    fn unknown_code_is_rejected_with_the_code_in_the_error() {
        let err = validator().validate("xx").expect_err("unknown language");
        assert_eq!(
            err,
            LanguageCodeError::Invalid {
                language: "xx".to_owned()
            }
        );
    }
}
