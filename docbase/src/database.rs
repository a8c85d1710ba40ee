use crate::collection::CollectionRef;
use crate::errors::DocbaseResult;
use crate::filter::{reg_exp, Command, Condition};
use crate::store::MemoryStore;
use crate::transaction::{run_transaction, DocbaseTransaction};

/// The database surface handed to business code: collections, operator
/// builders and transactions.
///
/// ```rust
/// use docbase::docbase::Docbase;
/// use docbase::doc;
///
/// let db = Docbase::new().database();
///
/// let total = db
///     .run_transaction(|txn| {
///         let users = txn.collection("users");
///         users.add(doc! { name: "A" })?;
///         users.add(doc! { name: "B" })?;
///         Ok(users.count()?.total)
///     })
///     .unwrap();
/// assert_eq!(total, 2);
/// ```
#[derive(Clone)]
pub struct Database {
    store: MemoryStore,
}

impl Database {
    pub(crate) fn new(store: MemoryStore) -> Self {
        Database { store }
    }

    /// Returns the named collection, creating it on first reference.
    pub fn collection(&self, name: &str) -> CollectionRef {
        CollectionRef::new(self.store.clone(), name)
    }

    /// Creates the collection if absent. Returns `true` if it was created.
    pub fn create_collection(&self, name: &str) -> bool {
        self.store.ensure_collection(name)
    }

    pub fn command(&self) -> Command {
        Command
    }

    /// A regular expression condition; see [reg_exp].
    pub fn reg_exp(&self, pattern: &str, options: &str) -> Condition {
        reg_exp(pattern, options)
    }

    /// Runs `handler` with a transaction handle and returns its result.
    /// Writes are applied immediately and are not rolled back on failure.
    pub fn run_transaction<T, F>(&self, handler: F) -> DocbaseResult<T>
    where
        F: FnOnce(&DocbaseTransaction) -> DocbaseResult<T>,
    {
        run_transaction(&self.store, handler)
    }
}
