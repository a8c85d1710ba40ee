use crate::collection::{Document, GetResult, Patch, RemoveResult, UpdateResult};
use crate::errors::{DocbaseError, DocbaseResult, ErrorKind};
use crate::store::MemoryStore;
use std::sync::Arc;

/// A reference to one document id in a collection, as returned by
/// `collection.doc(id)`. The document need not exist.
#[derive(Clone)]
pub struct DocumentRef {
    store: MemoryStore,
    collection: Arc<str>,
    id: String,
}

impl DocumentRef {
    pub(crate) fn new(store: MemoryStore, collection: Arc<str>, id: &str) -> Self {
        DocumentRef {
            store,
            collection,
            id: id.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a copy of the document, or `DOCUMENT_NOT_FOUND`.
    pub fn get(&self) -> DocbaseResult<GetResult> {
        match self.store.get(&self.collection, &self.id) {
            Some(data) => Ok(GetResult { data }),
            None => {
                log::error!("Document '{}' not found in '{}'", self.id, self.collection);
                Err(DocbaseError::new(
                    "document not found",
                    ErrorKind::DocumentNotFound,
                ))
            }
        }
    }

    /// Creates or replaces the whole document. Any `_id` in `data` is
    /// replaced by this reference's id.
    pub fn set(&self, data: Document) -> DocbaseResult<UpdateResult> {
        let replaced = self.store.put(&self.collection, &self.id, data);
        Ok(UpdateResult::upserted(replaced))
    }

    /// Applies a patch to the existing document, or fails with
    /// `DOCUMENT_NOT_FOUND`.
    ///
    /// Plain values replace the value at their path, so a nested document
    /// replaces the whole subtree. Use dotted keys to change a single nested
    /// field:
    ///
    /// ```rust
    /// use docbase::docbase::Docbase;
    /// use docbase::doc;
    ///
    /// let db = Docbase::new().database();
    /// let users = db.collection("users");
    /// let id = users.add(doc! { profile: { phone: "1", city: "X" } }).unwrap().id;
    ///
    /// users.doc(&id).update(doc! { "profile.phone": "2" }).unwrap();
    /// let stored = users.doc(&id).get().unwrap().data;
    /// assert_eq!(stored.get("profile.city").and_then(|v| v.as_str()), Some("X"));
    ///
    /// users.doc(&id).update(doc! { profile: { phone: "3" } }).unwrap();
    /// let stored = users.doc(&id).get().unwrap().data;
    /// assert!(stored.get("profile.city").is_none());
    /// ```
    pub fn update<P: Into<Patch>>(&self, patch: P) -> DocbaseResult<UpdateResult> {
        let patch = patch.into();
        self.store.update(&self.collection, &self.id, &patch)?;
        Ok(UpdateResult::updated(1))
    }

    /// Deletes the document. Missing documents are not an error.
    pub fn remove(&self) -> DocbaseResult<RemoveResult> {
        let removed = self.store.remove(&self.collection, &self.id);
        Ok(RemoveResult::new(usize::from(removed)))
    }
}
