//! Sitelink validation.
//!
//! [`SitelinkValidator`] checks a single sitelink serialization; the
//! aggregate [`SitelinksValidator`] checks a whole sitelinks mapping. The
//! aggregate takes an optional set of sites whose entries should be checked
//! against the external collaborators (title existence, cross-item
//! conflicts); the patch path passes only the modified sites so untouched
//! entries are not re-resolved.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::ValidationConfig;
use crate::domain::ports::{SitelinkConflictChecker, SitelinkTargetResolver};
use crate::domain::{ItemId, SiteId, SiteLink, SiteLinkList};

use super::site::{SiteIdError, SiteIdValidator};
use super::ValidationFailure;

/// Characters a page title may never contain.
const FORBIDDEN_TITLE_CHARS: [char; 8] = ['#', '<', '>', '[', ']', '|', '{', '}'];

/// Rejections raised while validating a single sitelink.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SitelinkValidationError {
    /// The mandatory `title` field is absent.
    #[error("sitelink title missing")]
    TitleMissing,
    /// The title is empty after trimming.
    #[error("sitelink title is empty")]
    TitleEmpty,
    /// The title is not a string.
    #[error("sitelink title is not a string")]
    InvalidTitleType {
        /// The rejected value.
        value: Value,
    },
    /// The title contains forbidden characters.
    #[error("not a valid sitelink title: {title}")]
    InvalidTitle {
        /// The rejected title.
        title: String,
    },
    /// The `badges` field is not a list.
    #[error("sitelink badges are not a list")]
    InvalidBadgesType {
        /// The rejected value.
        value: Value,
    },
    /// A badge is not a well-formed item id.
    #[error("badge is not an item id: {badge}")]
    InvalidBadge {
        /// The rejected value.
        badge: Value,
    },
    /// A badge is a well-formed item id outside the allowed badge set.
    #[error("item is not allowed as a badge: {badge}")]
    BadgeNotAllowed {
        /// The rejected badge.
        badge: ItemId,
    },
    /// No page with this title exists on the target site.
    #[error("page title not found: {title}")]
    TitleNotFound {
        /// The unresolvable title.
        title: String,
    },
    /// Another item already links the same site and title.
    #[error("sitelink already used on {matching_item_id}")]
    Conflict {
        /// Item already carrying the sitelink.
        matching_item_id: ItemId,
    },
}

/// Rejections raised while validating the whole sitelinks mapping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SitelinksValidationError {
    /// The serialization is not a mapping keyed by site id.
    #[error("sitelinks serialization is not an object")]
    NotAnObject {
        /// The rejected value.
        value: Value,
    },
    /// A key is not a valid site id.
    #[error("not a valid site id: {site_id}")]
    InvalidSiteId {
        /// The rejected key.
        site_id: String,
    },
    /// The entry for a site is not an object.
    #[error("sitelink for {site} is not an object")]
    InvalidSitelinkType {
        /// Site carrying the bad entry.
        site: SiteId,
        /// The rejected value.
        value: Value,
    },
    /// A single sitelink failed validation.
    #[error("invalid sitelink for {site}: {error}")]
    Sitelink {
        /// Site carrying the bad entry.
        site: SiteId,
        /// The underlying rejection.
        error: SitelinkValidationError,
    },
}

/// Validates one sitelink serialization for a known site.
#[derive(Clone)]
pub struct SitelinkValidator {
    config: Arc<ValidationConfig>,
    target_resolver: Arc<dyn SitelinkTargetResolver>,
    conflict_checker: Arc<dyn SitelinkConflictChecker>,
}

impl SitelinkValidator {
    /// Build a validator over the given configuration and collaborators.
    pub fn new(
        config: Arc<ValidationConfig>,
        target_resolver: Arc<dyn SitelinkTargetResolver>,
        conflict_checker: Arc<dyn SitelinkConflictChecker>,
    ) -> Self {
        Self {
            config,
            target_resolver,
            conflict_checker,
        }
    }

    /// Validate a sitelink serialization, returning the domain sitelink with
    /// its resolved title, deduplicated badges and derived URL.
    ///
    /// `subject` is the item being edited, so it does not conflict with its
    /// own sitelink. With `check_external` unset the title is taken as-is
    /// and no conflict lookup runs; the patch path uses this for entries the
    /// patch did not touch.
    pub async fn validate(
        &self,
        subject: Option<&ItemId>,
        site: &SiteId,
        serialization: &Map<String, Value>,
        check_external: bool,
    ) -> Result<SiteLink, ValidationFailure<SitelinkValidationError>> {
        let title = Self::validate_title(serialization).map_err(ValidationFailure::Invalid)?;
        let badges = self
            .validate_badges(serialization)
            .map_err(ValidationFailure::Invalid)?;

        let title = if check_external {
            let follow_redirects = !self.config.badges.declares_redirect(&badges);
            let resolved = self
                .target_resolver
                .resolve_title(site, &title, follow_redirects)
                .await?;
            let Some(resolved) = resolved else {
                return Err(ValidationFailure::Invalid(
                    SitelinkValidationError::TitleNotFound { title },
                ));
            };

            let matching = self.conflict_checker.item_for_sitelink(site, &resolved).await?;
            if let Some(matching_item_id) = matching {
                if subject != Some(&matching_item_id) {
                    return Err(ValidationFailure::Invalid(
                        SitelinkValidationError::Conflict { matching_item_id },
                    ));
                }
            }
            resolved
        } else {
            title
        };

        // Site validity is checked upstream; an unknown site cannot reach
        // this point.
        let url = self
            .config
            .sites
            .article_url(site, &title)
            .unwrap_or_default();
        Ok(SiteLink::new(site.clone(), title, badges, url))
    }

    fn validate_title(
        serialization: &Map<String, Value>,
    ) -> Result<String, SitelinkValidationError> {
        let value = serialization
            .get("title")
            .ok_or(SitelinkValidationError::TitleMissing)?;
        let Some(title) = value.as_str() else {
            return Err(SitelinkValidationError::InvalidTitleType {
                value: value.clone(),
            });
        };
        let title = title.trim();
        if title.is_empty() {
            return Err(SitelinkValidationError::TitleEmpty);
        }
        if title
            .chars()
            .any(|c| c.is_control() || FORBIDDEN_TITLE_CHARS.contains(&c))
        {
            return Err(SitelinkValidationError::InvalidTitle {
                title: title.to_owned(),
            });
        }
        Ok(title.to_owned())
    }

    fn validate_badges(
        &self,
        serialization: &Map<String, Value>,
    ) -> Result<Vec<ItemId>, SitelinkValidationError> {
        let Some(value) = serialization.get("badges") else {
            return Ok(Vec::new());
        };
        let Some(entries) = value.as_array() else {
            return Err(SitelinkValidationError::InvalidBadgesType {
                value: value.clone(),
            });
        };

        let mut badges: Vec<ItemId> = Vec::with_capacity(entries.len());
        for entry in entries {
            let badge = entry
                .as_str()
                .and_then(|raw| ItemId::new(raw).ok())
                .ok_or_else(|| SitelinkValidationError::InvalidBadge {
                    badge: entry.clone(),
                })?;
            if !self.config.badges.is_allowed(&badge) {
                return Err(SitelinkValidationError::BadgeNotAllowed { badge });
            }
            if !badges.contains(&badge) {
                badges.push(badge);
            }
        }
        Ok(badges)
    }
}

/// Validates a whole sitelinks mapping.
#[derive(Clone)]
pub struct SitelinksValidator {
    site_ids: SiteIdValidator,
    sitelink_validator: SitelinkValidator,
}

impl SitelinksValidator {
    /// Build a validator over the given configuration and collaborators.
    pub fn new(
        config: Arc<ValidationConfig>,
        target_resolver: Arc<dyn SitelinkTargetResolver>,
        conflict_checker: Arc<dyn SitelinkConflictChecker>,
    ) -> Self {
        Self {
            site_ids: SiteIdValidator::new(Arc::clone(&config)),
            sitelink_validator: SitelinkValidator::new(config, target_resolver, conflict_checker),
        }
    }

    /// Access the per-sitelink validator.
    #[must_use]
    pub fn sitelink_validator(&self) -> &SitelinkValidator {
        &self.sitelink_validator
    }

    /// Validate a sitelinks serialization, returning the deserialized list.
    ///
    /// When `sites_to_check` is given, only those sites go through the
    /// external title and conflict lookups; all entries still get their
    /// structural checks.
    pub async fn validate(
        &self,
        subject: Option<&ItemId>,
        serialization: &Value,
        sites_to_check: Option<&[SiteId]>,
    ) -> Result<SiteLinkList, ValidationFailure<SitelinksValidationError>> {
        let Some(entries) = serialization.as_object() else {
            return Err(ValidationFailure::Invalid(
                SitelinksValidationError::NotAnObject {
                    value: serialization.clone(),
                },
            ));
        };

        let mut sitelinks = SiteLinkList::new();
        for (raw_site, entry) in entries {
            let site = self.site_ids.validate(raw_site).map_err(
                |SiteIdError::Invalid { value }| {
                    ValidationFailure::Invalid(SitelinksValidationError::InvalidSiteId {
                        site_id: value,
                    })
                },
            )?;
            let Some(fields) = entry.as_object() else {
                return Err(ValidationFailure::Invalid(
                    SitelinksValidationError::InvalidSitelinkType {
                        site,
                        value: entry.clone(),
                    },
                ));
            };
            let check_external =
                sites_to_check.is_none_or(|sites| sites.contains(&site));
            let sitelink = self
                .sitelink_validator
                .validate(subject, &site, fields, check_external)
                .await
                .map_err(|failure| {
                    failure.map_invalid(|error| SitelinksValidationError::Sitelink {
                        site: site.clone(),
                        error,
                    })
                })?;
            sitelinks.set(sitelink);
        }
        Ok(sitelinks)
    }
}
