use crate::collection::Document;
use crate::database::Database;
use crate::docbase_builder::DocbaseBuilder;
use crate::docbase_config::DocbaseConfig;
use crate::errors::DocbaseResult;
use crate::storage::{BlobStore, DeleteFileResult, DownloadResult, TempUrlResult, UploadResult};
use crate::store::MemoryStore;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// An in-process document database instance.
///
/// `Docbase` owns one store holding every collection, every blob and the id
/// counter. Clones share that store, so a handle can be passed to any number
/// of callers or threads. Besides the database and blob surfaces it offers
/// administration methods for tests: seeding and inspecting documents and
/// files, and resetting the whole store.
///
/// ```rust
/// use docbase::docbase::Docbase;
/// use docbase::doc;
///
/// let docbase = Docbase::new();
/// docbase.seed_document("users", "u1", doc! { name: "A" });
///
/// let db = docbase.database();
/// assert_eq!(db.collection("users").doc("u1").get().unwrap().data.get("name").and_then(|v| v.as_str()), Some("A"));
///
/// docbase.reset();
/// assert!(docbase.peek_document("users", "u1").is_none());
/// ```
#[derive(Clone)]
pub struct Docbase {
    inner: Arc<DocbaseInner>,
}

struct DocbaseInner {
    config: DocbaseConfig,
    store: MemoryStore,
    blobs: BlobStore,
}

impl Debug for Docbase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Docbase")
            .field("config", &self.inner.config)
            .field("collections", &self.inner.store.collection_names())
            .finish()
    }
}

impl Default for Docbase {
    fn default() -> Self {
        Docbase::new()
    }
}

impl Docbase {
    /// Opens an instance with the default configuration.
    pub fn new() -> Self {
        Docbase::with_config(DocbaseConfig::new())
    }

    pub fn builder() -> DocbaseBuilder {
        DocbaseBuilder::new()
    }

    pub(crate) fn with_config(config: DocbaseConfig) -> Self {
        let store = MemoryStore::new(config.clone());
        let blobs = BlobStore::new(store.clone());
        log::debug!("Opened docbase with id prefix '{}'", config.id_prefix());
        Docbase {
            inner: Arc::new(DocbaseInner {
                config,
                store,
                blobs,
            }),
        }
    }

    pub fn config(&self) -> &DocbaseConfig {
        &self.inner.config
    }

    pub fn database(&self) -> Database {
        Database::new(self.inner.store.clone())
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.inner.blobs
    }

    pub fn upload_file<C: AsRef<[u8]>>(&self, cloud_path: &str, content: C) -> UploadResult {
        self.inner.blobs.upload_file(cloud_path, content)
    }

    pub fn get_temp_file_url<I, S>(&self, file_list: I) -> TempUrlResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.blobs.get_temp_file_url(file_list)
    }

    pub fn download_file(&self, file_id: &str) -> DocbaseResult<DownloadResult> {
        self.inner.blobs.download_file(file_id)
    }

    pub fn delete_file<I, S>(&self, file_list: I) -> DeleteFileResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.blobs.delete_file(file_list)
    }

    /// Drops every collection and file and restarts id generation.
    pub fn reset(&self) {
        self.inner.store.reset();
    }

    /// Stores `doc` under a fixed id, replacing any existing document.
    pub fn seed_document(&self, collection: &str, id: &str, doc: Document) {
        self.inner.store.put(collection, id, doc);
    }

    /// A copy of the stored document, if any.
    pub fn peek_document(&self, collection: &str, id: &str) -> Option<Document> {
        self.inner.store.get(collection, id)
    }

    pub fn delete_document(&self, collection: &str, id: &str) -> bool {
        self.inner.store.remove(collection, id)
    }

    /// Stores bytes under an exact file id.
    pub fn seed_file<C: AsRef<[u8]>>(&self, file_id: &str, content: C) {
        self.inner.store.put_file(file_id, content.as_ref().to_vec());
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.inner.store.collection_names()
    }
}
