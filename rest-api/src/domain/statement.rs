//! Statements: property-value claims attached to an item.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::{PropertyId, StatementId};

/// A single property-value claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Identifier, absent until the statement has been persisted once.
    pub id: Option<StatementId>,
    /// Property the claim is about.
    pub property: PropertyId,
    /// Claim value, kept as its JSON serialization. Interpreting data values
    /// is a concern of the property's datatype, not of this core.
    pub value: Value,
}

impl Statement {
    /// Build an unpersisted statement.
    pub fn new(property: PropertyId, value: Value) -> Self {
        Self {
            id: None,
            property,
            value,
        }
    }

    /// Attach a persisted identifier.
    #[must_use]
    pub fn with_id(mut self, id: StatementId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Statements grouped in property order, preserving insertion order within
/// a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementList(Vec<Statement>);

impl StatementList {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement.
    pub fn add(&mut self, statement: Statement) {
        self.0.push(statement);
    }

    /// Find a statement by its persisted identifier.
    #[must_use]
    pub fn statement(&self, id: &StatementId) -> Option<&Statement> {
        self.0.iter().find(|s| s.id.as_ref() == Some(id))
    }

    /// Remove a statement by identifier, returning it if present.
    pub fn remove(&mut self, id: &StatementId) -> Option<Statement> {
        let index = self.0.iter().position(|s| s.id.as_ref() == Some(id))?;
        Some(self.0.remove(index))
    }

    /// True when the item carries no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate statements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.0.iter()
    }
}

impl FromIterator<Statement> for StatementList {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
