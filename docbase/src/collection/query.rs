use crate::collection::{
    CountResult, Document, Patch, Projection, QueryResult, RemoveResult, UpdateResult,
};
use crate::common::{FieldPath, SortOrder, SortSpec};
use crate::errors::{DocbaseError, DocbaseResult};
use crate::filter::Condition;
use crate::store::MemoryStore;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Clone, Default)]
struct QueryState {
    condition: Option<Condition>,
    sort: SortSpec,
    skip: usize,
    limit: Option<usize>,
    projection: Option<Projection>,
    // first builder error, reported by the terminal operation
    error: Option<DocbaseError>,
}

/// An immutable, chainable description of a query over one collection.
///
/// Every builder method returns a new `Query` and leaves the receiver
/// untouched, so a base query can be reused for several derived ones.
/// Nothing runs until a terminal operation (`get`, `count`, `update`,
/// `remove`) is called. `get` always filters, then sorts, then skips, then limits, and
/// projects last.
///
/// ```rust
/// use docbase::docbase::Docbase;
/// use docbase::doc;
///
/// let db = Docbase::new().database();
/// let users = db.collection("users");
/// for age in [30, 17, 65] {
///     users.add(doc! { age: age }).unwrap();
/// }
///
/// let adults = users.where_(doc! { age: (db.command().gte(18)) });
/// let oldest = adults.order_by("age", "desc").limit(1);
///
/// assert_eq!(adults.count().unwrap().total, 2);
/// assert_eq!(oldest.get().unwrap().data[0].get("age").and_then(|v| v.as_i64()), Some(65));
/// ```
#[derive(Clone)]
pub struct Query {
    store: MemoryStore,
    collection: Arc<str>,
    state: Arc<QueryState>,
}

impl Query {
    pub(crate) fn new(store: MemoryStore, collection: Arc<str>) -> Self {
        Query {
            store,
            collection,
            state: Arc::new(QueryState::default()),
        }
    }

    fn derive<F: FnOnce(&mut QueryState)>(&self, change: F) -> Query {
        let mut state = (*self.state).clone();
        change(&mut state);
        Query {
            store: self.store.clone(),
            collection: self.collection.clone(),
            state: Arc::new(state),
        }
    }

    /// Replaces the filter.
    pub fn where_<C: Into<Condition>>(&self, condition: C) -> Query {
        let condition = condition.into();
        self.derive(|state| state.condition = Some(condition))
    }

    /// Adds a sort key after the existing ones. `direction` is `"asc"` or
    /// `"desc"`; anything else makes the terminal operation fail with
    /// `INVALID_PARAM`.
    pub fn order_by(&self, field: &str, direction: &str) -> Query {
        let path = FieldPath::parse(field);
        match SortOrder::from_str(direction) {
            Ok(order) => self.derive(|state| state.sort = state.sort.then_by(path, order)),
            Err(e) => self.derive(|state| {
                if state.error.is_none() {
                    state.error = Some(e);
                }
            }),
        }
    }

    pub fn skip(&self, skip: usize) -> Query {
        self.derive(|state| state.skip = skip)
    }

    pub fn limit(&self, limit: usize) -> Query {
        self.derive(|state| state.limit = Some(limit))
    }

    /// Sets the field projection, e.g. `doc! { name: 1 }`.
    pub fn field<P: Into<Projection>>(&self, projection: P) -> Query {
        let projection = projection.into();
        self.derive(|state| state.projection = Some(projection))
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.state.condition.as_ref()
    }

    fn check(&self) -> DocbaseResult<()> {
        if let Some(e) = &self.state.error {
            return Err(e.clone());
        }
        match &self.state.condition {
            Some(condition) => condition.validate(),
            None => Ok(()),
        }
    }

    fn effective_limit(&self) -> Option<usize> {
        match (self.state.limit, self.store.config().max_limit()) {
            (Some(limit), Some(max)) => Some(limit.min(max)),
            (limit, max) => limit.or(max),
        }
    }

    /// Runs the query and returns copies of the matching documents.
    pub fn get(&self) -> DocbaseResult<QueryResult> {
        self.check()?;

        let mut documents = self
            .store
            .find(&self.collection, self.state.condition.as_ref());
        self.state.sort.sort(&mut documents);

        let page = documents.into_iter().skip(self.state.skip);
        let page: Vec<Document> = match self.effective_limit() {
            Some(limit) => page.take(limit).collect(),
            None => page.collect(),
        };

        let data = match &self.state.projection {
            Some(projection) => page.iter().map(|doc| projection.apply(doc)).collect(),
            None => page,
        };
        Ok(QueryResult { data })
    }

    /// Counts matching documents. Sort keys, skip and limit are ignored.
    pub fn count(&self) -> DocbaseResult<CountResult> {
        self.check()?;
        let total = self
            .store
            .count(&self.collection, self.state.condition.as_ref());
        Ok(CountResult { total })
    }

    /// Deletes every matching document. Sort keys, skip and limit are
    /// ignored.
    pub fn remove(&self) -> DocbaseResult<RemoveResult> {
        self.check()?;
        let removed = self
            .store
            .remove_matching(&self.collection, self.state.condition.as_ref());
        log::debug!("Removed {} documents from '{}'", removed, self.collection);
        Ok(RemoveResult::new(removed))
    }

    /// Applies `patch` to every matching document. Sort keys, skip and limit
    /// are ignored. A patch that fails on any document updates none.
    pub fn update<P: Into<Patch>>(&self, patch: P) -> DocbaseResult<UpdateResult> {
        self.check()?;
        let patch = patch.into();
        let updated =
            self.store
                .update_matching(&self.collection, self.state.condition.as_ref(), &patch)?;
        log::debug!("Updated {} documents in '{}'", updated, self.collection);
        Ok(UpdateResult::updated(updated))
    }
}
