//! Transaction support.
//!
//! Transactions are a facade over the shared store: every write inside the
//! handler applies immediately and stays applied even if the handler fails.
//! There is no isolation and no rollback.

mod docbase_transaction;

pub use docbase_transaction::*;
