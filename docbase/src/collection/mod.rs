//! Documents, collections and the operations over them.
//!
//! - [Document] and the [doc!](crate::doc) macro
//! - [CollectionRef] and [DocumentRef], the handles returned by a database
//! - [Query], the immutable query cursor
//! - [Patch] and [apply_update], the update applier
//! - [Projection] and the result shapes returned by every operation

mod collection_ref;
mod document;
mod document_ref;
mod projection;
mod query;
mod results;
mod update;

pub use collection_ref::*;
pub use document::*;
pub use document_ref::*;
pub use projection::*;
pub use query::*;
pub use results::*;
pub use update::*;
