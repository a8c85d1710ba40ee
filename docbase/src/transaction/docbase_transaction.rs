use crate::collection::CollectionRef;
use crate::errors::DocbaseResult;
use crate::store::MemoryStore;

/// The handle passed to a transaction handler. It exposes the same
/// `collection(name)` surface as the database.
#[derive(Clone)]
pub struct DocbaseTransaction {
    store: MemoryStore,
}

impl DocbaseTransaction {
    pub(crate) fn new(store: MemoryStore) -> Self {
        DocbaseTransaction { store }
    }

    pub fn collection(&self, name: &str) -> CollectionRef {
        CollectionRef::new(self.store.clone(), name)
    }
}

/// Runs `handler` synchronously and returns its result.
///
/// Writes made by the handler are visible to everyone as soon as each call
/// returns. If the handler fails, the writes it already made are kept.
pub(crate) fn run_transaction<T, F>(store: &MemoryStore, handler: F) -> DocbaseResult<T>
where
    F: FnOnce(&DocbaseTransaction) -> DocbaseResult<T>,
{
    log::debug!("Transaction started");
    let transaction = DocbaseTransaction::new(store.clone());
    let result = handler(&transaction);
    match &result {
        Ok(_) => log::debug!("Transaction finished"),
        Err(e) => log::warn!("Transaction failed, earlier writes are kept: {}", e),
    }
    result
}
