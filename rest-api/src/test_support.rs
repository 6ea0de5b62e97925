//! In-memory fakes for integration tests.
//!
//! [`InMemoryItemRepository`] implements every storage port over a mutex so
//! a whole use case can run against realistic state without mocks.
//! [`AcceptingTitleResolver`] resolves any title to itself.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ItemCreator, ItemReadError, ItemRetriever, ItemRevision, ItemRevisionRetriever,
    ItemUpdater, ItemWriteError, LatestItemRevision, SiteAccessError, SitelinkConflictChecker,
    SitelinkTargetResolver, TermDuplicateDetector,
};
use crate::domain::{EditMetadata, Item, ItemId, SiteId};

#[derive(Debug, Default)]
struct State {
    items: BTreeMap<ItemId, (Item, u64, DateTime<Utc>)>,
    redirects: BTreeMap<ItemId, ItemId>,
    next_numeric_id: u64,
    next_revision_id: u64,
    edits: Vec<EditMetadata>,
}

/// Shared in-memory item storage.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    state: Mutex<State>,
}

impl InMemoryItemRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an item under a fixed id.
    pub fn add_item(&self, item: Item) {
        let id = item.id.clone().expect("seeded items need an id");
        let mut state = self.state.lock().expect("repository lock poisoned");
        state.next_revision_id += 1;
        let revision_id = state.next_revision_id;
        state.items.insert(id, (item, revision_id, Utc::now()));
    }

    /// Seed a redirect from one id to another.
    pub fn add_redirect(&self, from: ItemId, to: ItemId) {
        let mut state = self.state.lock().expect("repository lock poisoned");
        state.redirects.insert(from, to);
    }

    /// The stored item, if any.
    #[must_use]
    pub fn stored_item(&self, id: &ItemId) -> Option<Item> {
        let state = self.state.lock().expect("repository lock poisoned");
        state.items.get(id).map(|(item, _, _)| item.clone())
    }

    /// Metadata of the most recent edit.
    #[must_use]
    pub fn last_edit(&self) -> Option<EditMetadata> {
        let state = self.state.lock().expect("repository lock poisoned");
        state.edits.last().cloned()
    }
}

#[async_trait]
impl ItemRevisionRetriever for InMemoryItemRepository {
    async fn latest_revision(&self, id: &ItemId) -> Result<LatestItemRevision, ItemReadError> {
        let state = self.state.lock().expect("repository lock poisoned");
        if let Some(target) = state.redirects.get(id) {
            return Ok(LatestItemRevision::Redirect(target.clone()));
        }
        Ok(state.items.get(id).map_or(
            LatestItemRevision::NotFound,
            |(_, revision_id, last_modified)| LatestItemRevision::Concrete {
                revision_id: *revision_id,
                last_modified: *last_modified,
            },
        ))
    }
}

#[async_trait]
impl ItemRetriever for InMemoryItemRepository {
    async fn item(&self, id: &ItemId) -> Result<Option<Item>, ItemReadError> {
        let state = self.state.lock().expect("repository lock poisoned");
        Ok(state.items.get(id).map(|(item, _, _)| item.clone()))
    }
}

#[async_trait]
impl ItemCreator for InMemoryItemRepository {
    async fn create(
        &self,
        item: Item,
        metadata: EditMetadata,
    ) -> Result<ItemRevision, ItemWriteError> {
        let mut state = self.state.lock().expect("repository lock poisoned");
        state.next_numeric_id += 1;
        let id = ItemId::new(format!("Q{}", state.next_numeric_id))
            .map_err(|error| ItemWriteError::write(error.to_string()))?;
        state.next_revision_id += 1;
        let revision_id = state.next_revision_id;
        let last_modified = Utc::now();
        let item = item.with_id(id.clone());
        state
            .items
            .insert(id, (item.clone(), revision_id, last_modified));
        state.edits.push(metadata);
        Ok(ItemRevision::new(item, revision_id, last_modified))
    }
}

#[async_trait]
impl ItemUpdater for InMemoryItemRepository {
    async fn update(
        &self,
        item: Item,
        metadata: EditMetadata,
    ) -> Result<ItemRevision, ItemWriteError> {
        let id = item
            .id
            .clone()
            .ok_or_else(|| ItemWriteError::write("cannot update an item without an id"))?;
        let mut state = self.state.lock().expect("repository lock poisoned");
        if !state.items.contains_key(&id) {
            return Err(ItemWriteError::conflict(format!("no such item: {id}")));
        }
        state.next_revision_id += 1;
        let revision_id = state.next_revision_id;
        let last_modified = Utc::now();
        state
            .items
            .insert(id, (item.clone(), revision_id, last_modified));
        state.edits.push(metadata);
        Ok(ItemRevision::new(item, revision_id, last_modified))
    }
}

#[async_trait]
impl SitelinkConflictChecker for InMemoryItemRepository {
    async fn item_for_sitelink(
        &self,
        site: &SiteId,
        title: &str,
    ) -> Result<Option<ItemId>, ItemReadError> {
        let state = self.state.lock().expect("repository lock poisoned");
        Ok(state.items.iter().find_map(|(id, (item, _, _))| {
            item.sitelinks
                .sitelink(site)
                .filter(|sitelink| sitelink.title() == title)
                .map(|_| id.clone())
        }))
    }
}

#[async_trait]
impl TermDuplicateDetector for InMemoryItemRepository {
    async fn item_with_label_and_description(
        &self,
        language: &str,
        label: &str,
        description: &str,
    ) -> Result<Option<ItemId>, ItemReadError> {
        let state = self.state.lock().expect("repository lock poisoned");
        Ok(state.items.iter().find_map(|(id, (item, _, _))| {
            (item.labels.text(language) == Some(label)
                && item.descriptions.text(language) == Some(description))
            .then(|| id.clone())
        }))
    }
}

/// Title resolver that accepts every title unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptingTitleResolver;

#[async_trait]
impl SitelinkTargetResolver for AcceptingTitleResolver {
    async fn resolve_title(
        &self,
        _site: &SiteId,
        title: &str,
        _follow_redirects: bool,
    ) -> Result<Option<String>, SiteAccessError> {
        Ok(Some(title.to_owned()))
    }
}
