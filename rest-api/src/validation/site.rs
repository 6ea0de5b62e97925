//! Site id validation against the configured site registry.

use std::sync::Arc;

use thiserror::Error;

use crate::config::ValidationConfig;
use crate::domain::SiteId;

/// Rejection raised for a malformed or unknown site id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteIdError {
    /// The value is malformed or not a registered site.
    #[error("not a valid site ID: {value}")]
    Invalid {
        /// The rejected value.
        value: String,
    },
}

/// Checks site ids for well-formedness and registry membership.
#[derive(Clone)]
pub struct SiteIdValidator {
    config: Arc<ValidationConfig>,
}

impl SiteIdValidator {
    /// Build a validator over the given configuration.
    pub fn new(config: Arc<ValidationConfig>) -> Self {
        Self { config }
    }

    /// Parse and accept a registered site id.
    pub fn validate(&self, value: &str) -> Result<SiteId, SiteIdError> {
        let invalid = || SiteIdError::Invalid {
            value: value.to_owned(),
        };
        let site = SiteId::new(value).map_err(|_| invalid())?;
        if self.config.sites.contains(&site) {
            Ok(site)
        } else {
            Err(invalid())
        }
    }
}
