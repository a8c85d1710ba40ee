use crate::collection::{
    AddResult, CountResult, Document, DocumentRef, Patch, Projection, Query, QueryResult,
    RemoveResult, UpdateResult,
};
use crate::errors::DocbaseResult;
use crate::filter::Condition;
use crate::store::MemoryStore;
use std::sync::Arc;

/// A named collection.
///
/// Obtaining a collection creates it if it does not exist yet. Besides
/// `add` and `doc`, a collection offers the query builder methods of an
/// unfiltered [Query], so `collection.where_(..)` and `collection.get()`
/// work directly.
#[derive(Clone)]
pub struct CollectionRef {
    store: MemoryStore,
    name: Arc<str>,
}

impl CollectionRef {
    pub(crate) fn new(store: MemoryStore, name: &str) -> Self {
        store.ensure_collection(name);
        CollectionRef {
            store,
            name: Arc::from(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores a copy of `data` under a new id, or under its own string `_id`
    /// if it carries one.
    pub fn add(&self, data: Document) -> DocbaseResult<AddResult> {
        let id = self.store.insert(&self.name, data)?;
        Ok(AddResult::new(id))
    }

    pub fn doc(&self, id: &str) -> DocumentRef {
        DocumentRef::new(self.store.clone(), self.name.clone(), id)
    }

    /// An unfiltered query over this collection.
    pub fn query(&self) -> Query {
        Query::new(self.store.clone(), self.name.clone())
    }

    pub fn where_<C: Into<Condition>>(&self, condition: C) -> Query {
        self.query().where_(condition)
    }

    pub fn order_by(&self, field: &str, direction: &str) -> Query {
        self.query().order_by(field, direction)
    }

    pub fn skip(&self, skip: usize) -> Query {
        self.query().skip(skip)
    }

    pub fn limit(&self, limit: usize) -> Query {
        self.query().limit(limit)
    }

    pub fn field<P: Into<Projection>>(&self, projection: P) -> Query {
        self.query().field(projection)
    }

    pub fn get(&self) -> DocbaseResult<QueryResult> {
        self.query().get()
    }

    pub fn count(&self) -> DocbaseResult<CountResult> {
        self.query().count()
    }

    /// Applies `patch` to every document in the collection.
    pub fn update<P: Into<Patch>>(&self, patch: P) -> DocbaseResult<UpdateResult> {
        self.query().update(patch)
    }

    /// Removes every document in the collection.
    pub fn remove(&self) -> DocbaseResult<RemoveResult> {
        self.query().remove()
    }
}
