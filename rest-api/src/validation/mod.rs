//! Field and aggregate validators over untyped JSON serializations.
//!
//! Each validator owns a closed error enum with structured payloads; the
//! validating deserializers in the use-case layer map those enums
//! exhaustively into the public error taxonomy, so a new validator variant
//! that is not handled anywhere fails to compile instead of failing at
//! runtime.
//!
//! Validators that consult storage or external sites separate "the input is
//! invalid" from "a collaborator failed": the latter travels as
//! [`BackendError`] and is never presented as a client mistake.

pub mod aliases;
pub mod item;
pub mod language;
pub mod site;
pub mod sitelinks;
pub mod statements;
pub mod terms;

use thiserror::Error;

use crate::domain::ports::{ItemReadError, SiteAccessError};

pub use self::aliases::{AliasesValidationError, ItemAliasesValidator};
pub use self::item::{ItemValidationError, ItemValidator};
pub use self::language::{LanguageCodeError, LanguageCodeValidator};
pub use self::site::{SiteIdError, SiteIdValidator};
pub use self::sitelinks::{
    SitelinkValidationError, SitelinkValidator, SitelinksValidationError, SitelinksValidator,
};
pub use self::statements::{ItemStatementsValidator, StatementsValidationError};
pub use self::terms::{ItemTermsValidator, TermField, TermsValidationError};

/// Infrastructure failure raised while validating, as opposed to a problem
/// with the input itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Item storage failed.
    #[error(transparent)]
    Store(#[from] ItemReadError),
    /// An external site could not be consulted.
    #[error(transparent)]
    Site(#[from] SiteAccessError),
}

/// Outcome of a validator that consults collaborators: either the input was
/// rejected with a validator-local error, or a collaborator failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure<E> {
    /// The input is invalid.
    Invalid(E),
    /// A collaborator failed; not the client's fault.
    Backend(BackendError),
}

impl<E> ValidationFailure<E> {
    /// Wrap the invalid branch in an outer error enum, keeping backend
    /// failures as they are.
    pub fn map_invalid<F>(self, f: impl FnOnce(E) -> F) -> ValidationFailure<F> {
        match self {
            Self::Invalid(e) => ValidationFailure::Invalid(f(e)),
            Self::Backend(b) => ValidationFailure::Backend(b),
        }
    }
}

impl<E> From<ItemReadError> for ValidationFailure<E> {
    fn from(value: ItemReadError) -> Self {
        Self::Backend(BackendError::Store(value))
    }
}

impl<E> From<SiteAccessError> for ValidationFailure<E> {
    fn from(value: SiteAccessError) -> Self {
        Self::Backend(BackendError::Site(value))
    }
}
