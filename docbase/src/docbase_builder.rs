use crate::docbase::Docbase;
use crate::docbase_config::DocbaseConfig;
use crate::errors::{DocbaseError, DocbaseResult};
use crate::filter::UnknownOperatorPolicy;

/// Builder for a [Docbase] instance.
///
/// The first invalid setting is remembered and reported by [DocbaseBuilder::open];
/// later settings are ignored once an error has been captured.
///
/// ```rust
/// use docbase::docbase::Docbase;
/// use docbase::filter::UnknownOperatorPolicy;
///
/// let db = Docbase::builder()
///     .id_prefix("doc-")
///     .unknown_operator_policy(UnknownOperatorPolicy::MatchNone)
///     .max_limit(100)
///     .open()
///     .unwrap();
/// assert_eq!(db.config().id_prefix(), "doc-");
///
/// assert!(Docbase::builder().id_prefix("").open().is_err());
/// ```
#[derive(Default)]
pub struct DocbaseBuilder {
    error: Option<DocbaseError>,
    config: DocbaseConfig,
}

impl DocbaseBuilder {
    pub fn new() -> Self {
        DocbaseBuilder {
            error: None,
            config: DocbaseConfig::new(),
        }
    }

    pub fn id_prefix(mut self, prefix: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_id_prefix(prefix) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn file_id_scheme(mut self, scheme: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_file_id_scheme(scheme) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn temp_url_base(mut self, base: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_temp_url_base(base) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn unknown_operator_policy(mut self, policy: UnknownOperatorPolicy) -> Self {
        self.config.set_unknown_operator_policy(policy);
        self
    }

    pub fn max_limit(mut self, max_limit: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_max_limit(max_limit) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Opens a new, empty instance with the collected settings.
    pub fn open(self) -> DocbaseResult<Docbase> {
        if let Some(e) = self.error {
            log::error!("Cannot open docbase: {}", e);
            return Err(e);
        }
        Ok(Docbase::with_config(self.config))
    }
}
