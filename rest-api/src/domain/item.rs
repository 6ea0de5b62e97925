//! The item aggregate.

use serde::{Deserialize, Serialize};

use super::ids::ItemId;
use super::sitelink::SiteLinkList;
use super::statement::StatementList;
use super::term::{AliasGroupList, TermList};

/// A knowledge-base item: labels, descriptions, aliases, sitelinks and
/// statements.
///
/// Items reach the rest of the system only through a successful aggregate
/// validation, so code holding an `Item` can rely on every part having
/// passed its field validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier, absent until the item has been persisted once.
    pub id: Option<ItemId>,
    /// Labels by language.
    pub labels: TermList,
    /// Descriptions by language.
    pub descriptions: TermList,
    /// Aliases by language.
    pub aliases: AliasGroupList,
    /// Sitelinks by site.
    pub sitelinks: SiteLinkList,
    /// Statements.
    pub statements: StatementList,
}

impl Item {
    /// Build an unpersisted item from validated parts.
    #[must_use]
    pub fn new(
        labels: TermList,
        descriptions: TermList,
        aliases: AliasGroupList,
        sitelinks: SiteLinkList,
        statements: StatementList,
    ) -> Self {
        Self {
            id: None,
            labels,
            descriptions,
            aliases,
            sitelinks,
            statements,
        }
    }

    /// Attach a persisted identifier.
    #[must_use]
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }
}
