//! Blob storage for file attachments, addressed by file id.

mod blob_store;
mod uri;

pub use blob_store::*;
pub use uri::encode_uri_component;
