use crate::collection::{apply_update, Document, Patch};
use crate::common::{Value, DOC_ID};
use crate::docbase_config::DocbaseConfig;
use crate::errors::{DocbaseError, DocbaseResult, ErrorKind};
use crate::filter::Condition;
use indexmap::IndexMap;
use itertools::Itertools;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type DocumentMap = IndexMap<String, Document>;

/// The process-wide state of one docbase instance: named collections, the
/// blob namespace and the id counter shared by both.
struct StoreState {
    collections: HashMap<String, DocumentMap>,
    files: HashMap<String, Vec<u8>>,
    next_id: u64,
}

impl StoreState {
    fn new() -> Self {
        StoreState {
            collections: HashMap::new(),
            files: HashMap::new(),
            next_id: 1,
        }
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// In-memory document and blob store.
///
/// A single `parking_lot::RwLock` guards all state. Every public operation
/// takes the lock once for its full duration, so callers on other threads
/// observe either none or all of an operation's effects. Documents are cloned
/// on the way in and on the way out; no caller ever holds a reference into
/// the store.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
    config: DocbaseConfig,
}

impl MemoryStore {
    pub fn new(config: DocbaseConfig) -> Self {
        MemoryStore {
            state: Arc::new(RwLock::new(StoreState::new())),
            config,
        }
    }

    pub fn config(&self) -> &DocbaseConfig {
        &self.config
    }

    /// Creates the collection if it does not exist. Returns `true` if it was
    /// created by this call.
    pub fn ensure_collection(&self, name: &str) -> bool {
        if self.state.read().collections.contains_key(name) {
            return false;
        }

        let mut state = self.state.write();
        if state.collections.contains_key(name) {
            return false;
        }
        state.collections.insert(name.to_string(), DocumentMap::new());
        log::debug!("Created collection '{}'", name);
        true
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.state.read().collections.contains_key(name)
    }

    /// Names of all collections, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        self.state.read().collections.keys().cloned().sorted().collect()
    }

    /// Stores a new document and returns its id.
    ///
    /// An explicit string `_id` is kept, and fails with `DUPLICATE_KEY` if the
    /// id is taken. Otherwise an id is drawn from the store-wide counter,
    /// skipping ids already present in the collection.
    pub fn insert(&self, collection: &str, mut doc: Document) -> DocbaseResult<String> {
        let mut state = self.state.write();

        let explicit = match doc.get(DOC_ID) {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id.clone()),
            Some(other) => {
                log::error!("Document id must be a string, found {}", other);
                return Err(DocbaseError::new(
                    "Document id must be a string",
                    ErrorKind::InvalidParameter,
                ));
            }
        };

        let id = match explicit {
            Some(id) => {
                let taken = state
                    .collections
                    .get(collection)
                    .map(|docs| docs.contains_key(&id))
                    .unwrap_or(false);
                if taken {
                    log::error!("Document '{}' already exists in '{}'", id, collection);
                    return Err(DocbaseError::new(
                        &format!("Document '{}' already exists", id),
                        ErrorKind::DuplicateKey,
                    ));
                }
                id
            }
            None => loop {
                let candidate = format!("{}{}", self.config.id_prefix(), state.take_id());
                let taken = state
                    .collections
                    .get(collection)
                    .map(|docs| docs.contains_key(&candidate))
                    .unwrap_or(false);
                if !taken {
                    break candidate;
                }
            },
        };

        doc.insert(DOC_ID, id.as_str());
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), doc);
        Ok(id)
    }

    /// Returns a copy of the stored document, if any.
    pub fn get(&self, collection: &str, id: &str) -> Option<Document> {
        self.state
            .read()
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    /// Creates or replaces the document stored under `id`. The stored `_id`
    /// always equals `id`. Returns `true` if a document was replaced.
    pub fn put(&self, collection: &str, id: &str, mut doc: Document) -> bool {
        doc.insert(DOC_ID, id);
        let mut state = self.state.write();
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc)
            .is_some()
    }

    /// Applies `patch` to the stored document under one write lock.
    pub fn update(&self, collection: &str, id: &str, patch: &Patch) -> DocbaseResult<Document> {
        let mut state = self.state.write();
        let existing = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id));

        match existing {
            Some(existing) => {
                let mut updated = apply_update(existing, patch)?;
                updated.insert(DOC_ID, id);
                *existing = updated.clone();
                Ok(updated)
            }
            None => {
                log::error!("Cannot update missing document '{}' in '{}'", id, collection);
                Err(DocbaseError::new(
                    "document not found",
                    ErrorKind::DocumentNotFound,
                ))
            }
        }
    }

    /// Deletes a document. Missing ids are a no-op; returns whether anything
    /// was removed.
    pub fn remove(&self, collection: &str, id: &str) -> bool {
        self.state
            .write()
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.shift_remove(id))
            .is_some()
    }

    /// Copies every document matching `condition`, in insertion order.
    pub fn find(&self, collection: &str, condition: Option<&Condition>) -> Vec<Document> {
        let policy = self.config.unknown_operator_policy();
        let state = self.state.read();
        match state.collections.get(collection) {
            Some(docs) => docs
                .values()
                .filter(|doc| condition.map(|c| c.matches(doc, policy)).unwrap_or(true))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn count(&self, collection: &str, condition: Option<&Condition>) -> usize {
        let policy = self.config.unknown_operator_policy();
        let state = self.state.read();
        match state.collections.get(collection) {
            Some(docs) => docs
                .values()
                .filter(|doc| condition.map(|c| c.matches(doc, policy)).unwrap_or(true))
                .count(),
            None => 0,
        }
    }

    /// Deletes every document matching `condition` under one write lock and
    /// returns how many were removed.
    pub fn remove_matching(&self, collection: &str, condition: Option<&Condition>) -> usize {
        let policy = self.config.unknown_operator_policy();
        let mut state = self.state.write();
        match state.collections.get_mut(collection) {
            Some(docs) => {
                let before = docs.len();
                docs.retain(|_, doc| !condition.map(|c| c.matches(doc, policy)).unwrap_or(true));
                before - docs.len()
            }
            None => 0,
        }
    }

    /// Applies `patch` to every document matching `condition` under one write
    /// lock and returns how many were updated. Either every match is updated
    /// or, on error, none is.
    pub fn update_matching(
        &self,
        collection: &str,
        condition: Option<&Condition>,
        patch: &Patch,
    ) -> DocbaseResult<usize> {
        patch.validate()?;

        let policy = self.config.unknown_operator_policy();
        let mut state = self.state.write();
        let docs = match state.collections.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(0),
        };

        let mut updates = Vec::new();
        for (id, doc) in docs.iter() {
            if condition.map(|c| c.matches(doc, policy)).unwrap_or(true) {
                let mut updated = apply_update(doc, patch)?;
                updated.insert(DOC_ID, id.as_str());
                updates.push((id.clone(), updated));
            }
        }

        let count = updates.len();
        for (id, updated) in updates {
            docs.insert(id, updated);
        }
        Ok(count)
    }

    /// Draws the next value of the store-wide counter.
    pub fn next_sequence(&self) -> u64 {
        self.state.write().take_id()
    }

    pub fn put_file(&self, file_id: &str, content: Vec<u8>) {
        self.state.write().files.insert(file_id.to_string(), content);
    }

    pub fn get_file(&self, file_id: &str) -> Option<Vec<u8>> {
        self.state.read().files.get(file_id).cloned()
    }

    pub fn file_size(&self, file_id: &str) -> Option<usize> {
        self.state.read().files.get(file_id).map(Vec::len)
    }

    pub fn remove_file(&self, file_id: &str) -> bool {
        self.state.write().files.remove(file_id).is_some()
    }

    /// Drops every collection and file and restarts the id counter at 1.
    pub fn reset(&self) {
        let mut state = self.state.write();
        *state = StoreState::new();
        log::debug!("Store reset");
    }
}
