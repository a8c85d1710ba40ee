use crate::common::{FILE_KEY_PREFIX, STATUS_NOT_FOUND, STATUS_OK};
use crate::errors::{DocbaseError, DocbaseResult, ErrorKind};
use crate::storage::encode_uri_component;
use crate::store::MemoryStore;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadResult {
    #[serde(rename = "fileID")]
    pub file_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TempFileUrl {
    #[serde(rename = "fileID")]
    pub file_id: String,
    /// `0` if the file exists, `-1` otherwise.
    pub status: i64,
    #[serde(rename = "tempFileURL", skip_serializing_if = "Option::is_none")]
    pub temp_file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TempUrlResult {
    #[serde(rename = "fileList")]
    pub file_list: Vec<TempFileUrl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadResult {
    #[serde(rename = "fileContent")]
    pub file_content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedFile {
    #[serde(rename = "fileID")]
    pub file_id: String,
    /// `0` if the file was deleted, `-1` if it did not exist.
    pub status: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteFileResult {
    #[serde(rename = "fileList")]
    pub file_list: Vec<DeletedFile>,
}

/// Key to byte-buffer storage standing in for a cloud file service.
///
/// File ids are the configured scheme followed by the cloud path
/// (`mock://avatars/a.png`). Temporary URLs are derived from the file id and
/// never expire.
#[derive(Clone)]
pub struct BlobStore {
    store: MemoryStore,
}

impl BlobStore {
    pub(crate) fn new(store: MemoryStore) -> Self {
        BlobStore { store }
    }

    /// Stores a copy of `content` and returns its file id. An empty
    /// `cloud_path` is replaced by a generated `file-<n>` name.
    pub fn upload_file<C: AsRef<[u8]>>(&self, cloud_path: &str, content: C) -> UploadResult {
        let path = if cloud_path.is_empty() {
            format!("{}{}", FILE_KEY_PREFIX, self.store.next_sequence())
        } else {
            cloud_path.to_string()
        };
        let file_id = format!("{}{}", self.store.config().file_id_scheme(), path);
        self.store.put_file(&file_id, content.as_ref().to_vec());
        log::debug!("Uploaded {} bytes to '{}'", content.as_ref().len(), file_id);
        UploadResult { file_id }
    }

    /// The temporary URL of `file_id`, whether or not it exists.
    pub fn temp_url(&self, file_id: &str) -> String {
        format!(
            "{}{}",
            self.store.config().temp_url_base(),
            encode_uri_component(file_id)
        )
    }

    pub fn get_temp_file_url<I, S>(&self, file_list: I) -> TempUrlResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let file_list = file_list
            .into_iter()
            .map(|file_id| {
                let file_id = file_id.as_ref();
                match self.store.file_size(file_id) {
                    Some(size) => TempFileUrl {
                        file_id: file_id.to_string(),
                        status: STATUS_OK,
                        temp_file_url: Some(self.temp_url(file_id)),
                        size: Some(size),
                    },
                    None => TempFileUrl {
                        file_id: file_id.to_string(),
                        status: STATUS_NOT_FOUND,
                        temp_file_url: None,
                        size: None,
                    },
                }
            })
            .collect();
        TempUrlResult { file_list }
    }

    /// Returns a copy of the stored bytes, or `FILE_NOT_FOUND`.
    pub fn download_file(&self, file_id: &str) -> DocbaseResult<DownloadResult> {
        match self.store.get_file(file_id) {
            Some(file_content) => Ok(DownloadResult { file_content }),
            None => {
                log::error!("File '{}' not found", file_id);
                Err(DocbaseError::new("file not found", ErrorKind::FileNotFound))
            }
        }
    }

    /// Deletes each listed file. Missing files are reported, never an error.
    pub fn delete_file<I, S>(&self, file_list: I) -> DeleteFileResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let file_list = file_list
            .into_iter()
            .map(|file_id| {
                let file_id = file_id.as_ref();
                let status = if self.store.remove_file(file_id) {
                    STATUS_OK
                } else {
                    STATUS_NOT_FOUND
                };
                DeletedFile {
                    file_id: file_id.to_string(),
                    status,
                }
            })
            .collect();
        DeleteFileResult { file_list }
    }
}
