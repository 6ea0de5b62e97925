//! Entity identifier primitives.
//!
//! Identifiers are validated newtypes: constructing one from client input is
//! fallible, and everything past the validation boundary can rely on the
//! serialized form being well-formed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failure raised when parsing an entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    /// The serialization does not match the identifier pattern.
    #[error("not a valid {kind} ID: {value}")]
    Malformed {
        /// Identifier kind, e.g. `item`.
        kind: &'static str,
        /// The rejected serialization.
        value: String,
    },
}

impl IdParseError {
    fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            value: value.into(),
        }
    }
}

fn is_prefixed_numeric(value: &str, prefix: char) -> bool {
    let mut chars = value.chars();
    if chars.next() != Some(prefix) {
        return false;
    }
    let digits = chars.as_str();
    !digits.is_empty() && digits.len() <= 10 && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Identifier of an item, e.g. `Q42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Parse an item identifier from its serialization.
    pub fn new(value: impl Into<String>) -> Result<Self, IdParseError> {
        let value = value.into();
        if is_prefixed_numeric(&value, 'Q') {
            Ok(Self(value))
        } else {
            Err(IdParseError::new("item", value))
        }
    }

    /// Borrow the serialized form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

/// Identifier of a property, e.g. `P31`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyId(String);

impl PropertyId {
    /// Parse a property identifier from its serialization.
    pub fn new(value: impl Into<String>) -> Result<Self, IdParseError> {
        let value = value.into();
        if is_prefixed_numeric(&value, 'P') {
            Ok(Self(value))
        } else {
            Err(IdParseError::new("property", value))
        }
    }

    /// Borrow the serialized form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PropertyId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PropertyId> for String {
    fn from(value: PropertyId) -> Self {
        value.0
    }
}

/// Identifier of a statement, `<item-id>$<guid>`, e.g.
/// `Q42$AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatementId {
    subject: ItemId,
    serialization: String,
}

impl StatementId {
    /// Parse a statement identifier from its serialization.
    pub fn new(value: impl Into<String>) -> Result<Self, IdParseError> {
        let value = value.into();
        let malformed = || IdParseError::new("statement", value.clone());
        let (subject, suffix) = value.split_once('$').ok_or_else(malformed)?;
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(malformed());
        }
        let subject = ItemId::new(subject).map_err(|_| malformed())?;
        Ok(Self {
            subject,
            serialization: value,
        })
    }

    /// Item the statement belongs to, derived from the identifier prefix.
    #[must_use]
    pub fn subject_item_id(&self) -> &ItemId {
        &self.subject
    }

    /// Borrow the serialized form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.serialization.as_str()
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for StatementId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StatementId> for String {
    fn from(value: StatementId) -> Self {
        value.serialization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Q42")]
    #[case("Q1")]
    #[case("Q1234567890")]
    fn item_id_accepts_well_formed(#[case] value: &str) {
        let id = ItemId::new(value).expect("valid item id");
        assert_eq!(id.as_str(), value);
    }

    #[rstest]
    #[case("")]
    #[case("Q")]
    #[case("P31")]
    #[case("q42")]
    #[case("Q42x")]
    #[case("Q12345678901")]
    fn item_id_rejects_malformed(#[case] value: &str) {
        ItemId::new(value).expect_err("malformed item id");
    }

    #[rstest]
    #[case("P31")]
    #[case("P1")]
    fn property_id_accepts_well_formed(#[case] value: &str) {
        let id = PropertyId::new(value).expect("valid property id");
        assert_eq!(id.as_str(), value);
    }

    #[rstest]
    #[case("Q31")]
    #[case("P")]
    #[case("p3")]
    fn property_id_rejects_malformed(#[case] value: &str) {
        PropertyId::new(value).expect_err("malformed property id");
    }

    #[test]
    fn statement_id_exposes_subject_item() {
        let id = StatementId::new("Q42$AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE")
            .expect("valid statement id");
        assert_eq!(id.subject_item_id().as_str(), "Q42");
    }

    #[rstest]
    #[case("Q42")]
    #[case("Q42$")]
    #[case("P31$AAAA")]
    #[case("Q42$white space")]
    fn statement_id_rejects_malformed(#[case] value: &str) {
        StatementId::new(value).expect_err("malformed statement id");
    }

    #[test]
    fn item_id_round_trips_through_serde() {
        let id: ItemId = serde_json::from_str("\"Q7\"").expect("deserializes");
        assert_eq!(serde_json::to_string(&id).expect("serializes"), "\"Q7\"");
    }
}
