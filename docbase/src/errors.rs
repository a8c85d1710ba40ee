use backtrace::Backtrace;
use serde::{de, ser};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for docbase operations.
///
/// Every kind carries a stable, machine-readable code (see [ErrorKind::code])
/// which callers match on instead of the human readable message.
///
/// # Examples
///
/// ```rust
/// use docbase::errors::{DocbaseError, DocbaseResult, ErrorKind};
///
/// fn example() -> DocbaseResult<()> {
///     Err(DocbaseError::new("document not found", ErrorKind::DocumentNotFound))
/// }
///
/// assert_eq!(example().unwrap_err().code(), "DOCUMENT_NOT_FOUND");
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A document reference points to an id that is not stored.
    DocumentNotFound,
    /// A blob key is not stored.
    FileNotFound,
    /// An explicit `_id` collides with a stored document.
    DuplicateKey,
    /// A caller supplied argument is malformed.
    InvalidParameter,
    /// Conversion to or from serde data failed.
    ObjectMappingError,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl ErrorKind {
    /// Returns the machine-readable error code surfaced to callers.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::DocumentNotFound => "DOCUMENT_NOT_FOUND",
            ErrorKind::FileNotFound => "FILE_NOT_FOUND",
            ErrorKind::DuplicateKey => "DUPLICATE_KEY",
            ErrorKind::InvalidParameter => "INVALID_PARAM",
            ErrorKind::ObjectMappingError => "OBJECT_MAPPING_ERROR",
            ErrorKind::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::DocumentNotFound => write!(f, "Document not found"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::DuplicateKey => write!(f, "Duplicate key"),
            ErrorKind::InvalidParameter => write!(f, "Invalid parameter"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom docbase error type.
///
/// `DocbaseError` carries the error message, its kind, an optional cause and
/// the backtrace captured where the error was raised.
///
/// # Examples
///
/// ```rust
/// use docbase::errors::{DocbaseError, ErrorKind};
///
/// let cause = DocbaseError::new("file not found", ErrorKind::FileNotFound);
/// let err = DocbaseError::new_with_cause("attachment unavailable", ErrorKind::InternalError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct DocbaseError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<DocbaseError>>,
    backtrace: Arc<Backtrace>,
}

impl DocbaseError {
    /// Creates a new `DocbaseError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        DocbaseError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `DocbaseError` with a cause error attached.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: DocbaseError) -> Self {
        DocbaseError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    /// Shorthand for `self.kind().code()`.
    pub fn code(&self) -> &'static str {
        self.error_kind.code()
    }

    pub fn cause(&self) -> Option<&DocbaseError> {
        self.cause.as_deref()
    }
}

impl Display for DocbaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for DocbaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "[{}] {}\nCaused by: {:?}", self.code(), self.message, cause),
            None => write!(f, "[{}] {}\n{:?}", self.code(), self.message, self.backtrace),
        }
    }
}

impl Error for DocbaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for docbase operations.
pub type DocbaseResult<T> = Result<T, DocbaseError>;

impl de::Error for DocbaseError {
    fn custom<T: Display>(msg: T) -> Self {
        DocbaseError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

impl ser::Error for DocbaseError {
    fn custom<T: Display>(msg: T) -> Self {
        DocbaseError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

impl From<serde_json::Error> for DocbaseError {
    fn from(err: serde_json::Error) -> Self {
        DocbaseError::new(
            &format!("JSON mapping error: {}", err),
            ErrorKind::ObjectMappingError,
        )
    }
}

impl From<String> for DocbaseError {
    fn from(msg: String) -> Self {
        DocbaseError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<std::convert::Infallible> for DocbaseError {
    fn from(err: std::convert::Infallible) -> Self {
        match err {}
    }
}

impl From<&str> for DocbaseError {
    fn from(msg: &str) -> Self {
        DocbaseError::new(msg, ErrorKind::InternalError)
    }
}
