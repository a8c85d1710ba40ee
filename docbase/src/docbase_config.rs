//! Configuration for a docbase instance.

use crate::common::{DEFAULT_FILE_ID_SCHEME, DEFAULT_ID_PREFIX, DEFAULT_TEMP_URL_BASE};
use crate::errors::{DocbaseError, DocbaseResult, ErrorKind};
use crate::filter::UnknownOperatorPolicy;
use std::sync::Arc;

/// Engine tunables, fixed once the instance is opened.
///
/// `DocbaseConfig` is a cheap handle; clones share the same settings.
///
/// ```rust
/// use docbase::docbase_config::DocbaseConfig;
///
/// let config = DocbaseConfig::default();
/// assert_eq!(config.id_prefix(), "mock-");
/// assert_eq!(config.max_limit(), None);
/// ```
#[derive(Clone, Debug)]
pub struct DocbaseConfig {
    inner: Arc<DocbaseConfigInner>,
}

#[derive(Clone, Debug)]
struct DocbaseConfigInner {
    id_prefix: String,
    file_id_scheme: String,
    temp_url_base: String,
    unknown_operator_policy: UnknownOperatorPolicy,
    max_limit: Option<usize>,
}

impl Default for DocbaseConfig {
    fn default() -> Self {
        DocbaseConfig::new()
    }
}

impl DocbaseConfig {
    pub fn new() -> Self {
        DocbaseConfig {
            inner: Arc::new(DocbaseConfigInner {
                id_prefix: DEFAULT_ID_PREFIX.to_string(),
                file_id_scheme: DEFAULT_FILE_ID_SCHEME.to_string(),
                temp_url_base: DEFAULT_TEMP_URL_BASE.to_string(),
                unknown_operator_policy: UnknownOperatorPolicy::default(),
                max_limit: None,
            }),
        }
    }

    /// Prefix of generated document ids.
    pub fn id_prefix(&self) -> &str {
        &self.inner.id_prefix
    }

    /// Prefix prepended to a cloud path to form a file id.
    pub fn file_id_scheme(&self) -> &str {
        &self.inner.file_id_scheme
    }

    pub fn temp_url_base(&self) -> &str {
        &self.inner.temp_url_base
    }

    pub fn unknown_operator_policy(&self) -> UnknownOperatorPolicy {
        self.inner.unknown_operator_policy
    }

    /// Upper bound applied to every cursor `limit`.
    pub fn max_limit(&self) -> Option<usize> {
        self.inner.max_limit
    }

    pub(crate) fn set_id_prefix(&mut self, prefix: &str) -> DocbaseResult<()> {
        self.inner_mut().id_prefix = non_empty("id prefix", prefix)?;
        Ok(())
    }

    pub(crate) fn set_file_id_scheme(&mut self, scheme: &str) -> DocbaseResult<()> {
        self.inner_mut().file_id_scheme = non_empty("file id scheme", scheme)?;
        Ok(())
    }

    pub(crate) fn set_temp_url_base(&mut self, base: &str) -> DocbaseResult<()> {
        self.inner_mut().temp_url_base = non_empty("temporary url base", base)?;
        Ok(())
    }

    pub(crate) fn set_unknown_operator_policy(&mut self, policy: UnknownOperatorPolicy) {
        self.inner_mut().unknown_operator_policy = policy;
    }

    pub(crate) fn set_max_limit(&mut self, max_limit: usize) -> DocbaseResult<()> {
        if max_limit == 0 {
            log::error!("Max limit must be greater than zero");
            return Err(DocbaseError::new(
                "Max limit must be greater than zero",
                ErrorKind::InvalidParameter,
            ));
        }
        self.inner_mut().max_limit = Some(max_limit);
        Ok(())
    }

    fn inner_mut(&mut self) -> &mut DocbaseConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

fn non_empty(name: &str, value: &str) -> DocbaseResult<String> {
    if value.is_empty() {
        log::error!("The {} cannot be empty", name);
        return Err(DocbaseError::new(
            &format!("The {} cannot be empty", name),
            ErrorKind::InvalidParameter,
        ));
    }
    Ok(value.to_string())
}
