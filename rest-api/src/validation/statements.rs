//! Statement validation.
//!
//! Statements are serialized as a mapping from property id to a list of
//! statement objects. Only the structural shape is checked here; data values
//! stay opaque JSON, interpreted downstream by the property's datatype.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{PropertyId, Statement, StatementId, StatementList};

/// Rejections raised while validating the `statements` serialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatementsValidationError {
    /// A group key is not a well-formed property id.
    #[error("not a valid property id in statements: {property}")]
    InvalidPropertyId {
        /// The rejected key.
        property: String,
    },
    /// The value for a property is not a list.
    #[error("statement group at {path} is not a list")]
    InvalidStatementGroup {
        /// Path of the offending group, e.g. `P31`.
        path: String,
        /// The rejected value.
        value: Value,
    },
    /// A statement entry is not an object.
    #[error("statement at {path} is not an object")]
    InvalidStatementType {
        /// Path of the offending entry, e.g. `P31/0`.
        path: String,
        /// The rejected value.
        value: Value,
    },
    /// A mandatory statement field is missing.
    #[error("mandatory field {field} missing at {path}")]
    MissingField {
        /// Path of the offending entry.
        path: String,
        /// The missing field.
        field: &'static str,
    },
    /// A statement field has the wrong shape.
    #[error("invalid {field} at {path}")]
    InvalidField {
        /// Path of the offending field.
        path: String,
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: Value,
    },
    /// A statement declares a property other than its group key.
    #[error("statement at {path} declares property {declared}, expected {expected}")]
    PropertyMismatch {
        /// Path of the offending entry.
        path: String,
        /// Property id from the group key.
        expected: String,
        /// Property id declared inside the statement.
        declared: String,
    },
}

/// Validates the `statements` serialization of an item.
#[derive(Debug, Clone, Default)]
pub struct ItemStatementsValidator;

impl ItemStatementsValidator {
    /// Build the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate the serialization, returning the deserialized statements.
    pub fn validate(
        &self,
        serialization: &Map<String, Value>,
    ) -> Result<StatementList, StatementsValidationError> {
        let mut statements = StatementList::new();
        for (property, group) in serialization {
            let property_id = PropertyId::new(property.as_str()).map_err(|_| {
                StatementsValidationError::InvalidPropertyId {
                    property: property.clone(),
                }
            })?;
            let Some(entries) = group.as_array() else {
                return Err(StatementsValidationError::InvalidStatementGroup {
                    path: property.clone(),
                    value: group.clone(),
                });
            };
            for (index, entry) in entries.iter().enumerate() {
                let path = format!("{property}/{index}");
                statements.add(Self::validate_statement(&property_id, &path, entry)?);
            }
        }
        Ok(statements)
    }

    fn validate_statement(
        property_id: &PropertyId,
        path: &str,
        entry: &Value,
    ) -> Result<Statement, StatementsValidationError> {
        let Some(fields) = entry.as_object() else {
            return Err(StatementsValidationError::InvalidStatementType {
                path: path.to_owned(),
                value: entry.clone(),
            });
        };

        let property = fields
            .get("property")
            .ok_or(StatementsValidationError::MissingField {
                path: path.to_owned(),
                field: "property",
            })?;
        let declared = property
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| StatementsValidationError::InvalidField {
                path: format!("{path}/property"),
                field: "property",
                value: property.clone(),
            })?;
        if declared != property_id.as_str() {
            return Err(StatementsValidationError::PropertyMismatch {
                path: path.to_owned(),
                expected: property_id.as_str().to_owned(),
                declared: declared.to_owned(),
            });
        }

        let value = fields
            .get("value")
            .ok_or(StatementsValidationError::MissingField {
                path: path.to_owned(),
                field: "value",
            })?;

        let mut statement = Statement::new(property_id.clone(), value.clone());
        if let Some(id) = fields.get("id") {
            let id = id
                .as_str()
                .and_then(|raw| StatementId::new(raw).ok())
                .ok_or_else(|| StatementsValidationError::InvalidField {
                    path: format!("{path}/id"),
                    field: "id",
                    value: id.clone(),
                })?;
            statement = statement.with_id(id);
        }
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().expect("object literal").clone()
    }

    #[test]
    fn valid_statements_deserialize_in_order() {
        let statements = ItemStatementsValidator::new()
            .validate(&object(json!({
                "P31": [
                    { "property": { "id": "P31" }, "value": "banana" },
                    { "property": { "id": "P31" }, "value": 7 },
                ]
            })))
            .expect("valid statements");
        assert_eq!(statements.len(), 2);
        let values: Vec<&Value> = statements.iter().map(|s| &s.value).collect();
        assert_eq!(values, [&json!("banana"), &json!(7)]);
    }

    #[test]
    fn malformed_property_key_is_rejected() {
        let err = ItemStatementsValidator::new()
            .validate(&object(json!({ "Q31": [] })))
            .expect_err("not a property id");
        assert_eq!(
            err,
            StatementsValidationError::InvalidPropertyId {
                property: "Q31".to_owned()
            }
        );
    }

    #[test]
    fn missing_value_is_rejected_with_its_path() {
        let err = ItemStatementsValidator::new()
            .validate(&object(json!({
                "P31": [ { "property": { "id": "P31" } } ]
            })))
            .expect_err("missing value");
        assert_eq!(
            err,
            StatementsValidationError::MissingField {
                path: "P31/0".to_owned(),
                field: "value"
            }
        );
    }

    #[test]
    fn property_mismatch_is_rejected() {
        let err = ItemStatementsValidator::new()
            .validate(&object(json!({
                "P31": [ { "property": { "id": "P21" }, "value": 1 } ]
            })))
            .expect_err("property mismatch");
        assert_eq!(
            err,
            StatementsValidationError::PropertyMismatch {
                path: "P31/0".to_owned(),
                expected: "P31".to_owned(),
                declared: "P21".to_owned()
            }
        );
    }

    #[test]
    fn group_that_is_not_a_list_is_rejected() {
        let err = ItemStatementsValidator::new()
            .validate(&object(json!({ "P31": {} })))
            .expect_err("group not a list");
        assert_eq!(
            err,
            StatementsValidationError::InvalidStatementGroup {
                path: "P31".to_owned(),
                value: json!({})
            }
        );
    }
}
