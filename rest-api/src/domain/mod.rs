//! Domain primitives and aggregates.
//!
//! Strongly typed entities shared by the validators, use cases and the
//! storage ports. Types are immutable from the caller's point of view and
//! constructed only through validating paths; invariants live in each
//! type's Rustdoc.

pub mod edit;
pub mod ids;
pub mod item;
pub mod ports;
pub mod sitelink;
pub mod statement;
pub mod term;

pub use self::edit::{EditMetadata, EditSummary, SitelinkEditSummary};
pub use self::ids::{IdParseError, ItemId, PropertyId, StatementId};
pub use self::item::Item;
pub use self::sitelink::{SiteId, SiteIdParseError, SiteLink, SiteLinkList};
pub use self::statement::{Statement, StatementList};
pub use self::term::{AliasGroup, AliasGroupList, Term, TermList};
