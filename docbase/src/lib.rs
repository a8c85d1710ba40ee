//! # Docbase - In-Process Document Collections
//!
//! Docbase is an in-memory document database that reproduces the observable
//! contract of a cloud document database client, so business logic written
//! against that client runs unchanged in tests and local tools.
//!
//! ## Key Features
//!
//! - **Collections**: named, lazily created maps of id to document
//! - **Conditions**: `or`/`and`, `in`/`nin`, `exists`, `eq`/`neq`, range
//!   comparisons and regular expressions over dot-notation paths
//! - **Updates**: path-addressed patches with `inc`, `push` and `remove`
//! - **Query Cursor**: immutable `where`/`order_by`/`skip`/`limit`/`field`
//!   chains ending in `get`, `count` or `remove`
//! - **Transactions**: a synchronous facade over the same collections
//! - **Blob Storage**: upload, download, delete and temporary URLs
//!
//! ## Quick Start
//!
//! ```rust
//! use docbase::docbase::Docbase;
//! use docbase::doc;
//!
//! let docbase = Docbase::new();
//! let db = docbase.database();
//! let users = db.collection("users");
//!
//! let id = users.add(doc! { name: "A", age: 5 }).unwrap().id;
//! users.doc(&id).update(doc! { age: (db.command().inc(1)) }).unwrap();
//!
//! let found = users.where_(doc! { age: 6 }).get().unwrap();
//! assert_eq!(found.data.len(), 1);
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents, collection and document handles, query cursor, updates
//! - [`common`] - Values, paths, sort order and constants
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Conditions and operator builders
//! - [`storage`] - Blob storage
//! - [`store`] - The locked in-memory store
//! - [`transaction`] - Transaction support
//! - [`database`] - The database surface
//! - [`docbase`] - The instance handle and test administration
//! - [`docbase_builder`] - Instance builder
//! - [`docbase_config`] - Instance configuration

pub mod collection;
pub mod common;
pub mod database;
pub mod docbase;
pub mod docbase_builder;
pub mod docbase_config;
pub mod errors;
pub mod filter;
pub mod storage;
pub mod store;
pub mod transaction;
