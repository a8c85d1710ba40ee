use crate::common::{FieldPath, Value, DOC_ID, FIELD_SEPARATOR};
use crate::errors::{DocbaseError, DocbaseResult, ErrorKind};
use indexmap::IndexMap;
use std::fmt::{Debug, Display, Formatter};

/// Represents a stored document: an insertion-ordered mapping from field name
/// to [Value].
///
/// Documents may nest. Keys passed to [Document::put], [Document::get] and
/// [Document::remove] are dot-separated paths, so `doc.get("a.b")` reads
/// field `b` of the embedded document stored under `a`, and numeric segments
/// index into lists (`"tags.0"`).
///
/// The reserved field `_id` holds the document identifier once stored in a
/// collection.
///
/// Equality ignores field order, the way two JSON objects with the same
/// members are considered the same document.
#[derive(Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of top-level fields.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with the path `key`, creating intermediate documents
    /// as needed.
    ///
    /// ```rust
    /// use docbase::collection::Document;
    ///
    /// let mut doc = Document::new();
    /// doc.put("user.name", "Alice");
    /// assert_eq!(doc.get("user.name").and_then(|v| v.as_str()), Some("Alice"));
    /// ```
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) {
        let value = value.into();
        if key.contains(FIELD_SEPARATOR) {
            FieldPath::parse(key).assign(self, value);
        } else {
            self.data.insert(key.to_string(), value);
        }
    }

    /// Inserts `value` under the literal field name `key`, without splitting
    /// it into path segments.
    pub fn insert<K: Into<String>, T: Into<Value>>(&mut self, key: K, value: T) {
        self.data.insert(key.into(), value.into());
    }

    /// Returns the value at the path `key`, or `None` if it is absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if key.contains(FIELD_SEPARATOR) {
            FieldPath::parse(key).resolve(self)
        } else {
            self.data.get(key)
        }
    }

    /// Removes the value at the path `key`. Remaining fields keep their
    /// relative order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if key.contains(FIELD_SEPARATOR) {
            FieldPath::parse(key).remove(self)
        } else {
            self.data.shift_remove(key)
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The `_id` of this document, if it is a string.
    pub fn id(&self) -> Option<&str> {
        self.data.get(DOC_ID).and_then(Value::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.data.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub(crate) fn get_top(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub(crate) fn get_top_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    pub(crate) fn put_top(&mut self, key: String, value: Value) {
        self.data.insert(key, value);
    }

    pub(crate) fn remove_top(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    /// Returns the slot for `key`, inserting `null` if it is missing.
    pub(crate) fn slot_mut(&mut self, key: String) -> &mut Value {
        self.data.entry(key).or_insert(Value::Null)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .data
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<serde_json::Map<String, serde_json::Value>>();
        serde_json::Value::Object(map)
    }

    pub fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Document {
        Document {
            data: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }

    /// Parses a JSON object into a document.
    pub fn from_json(json: &str) -> DocbaseResult<Document> {
        match serde_json::from_str::<serde_json::Value>(json)? {
            serde_json::Value::Object(map) => Ok(Document::from_json_map(map)),
            other => {
                log::error!("Expected a JSON object but found {}", other);
                Err(DocbaseError::new(
                    "Expected a JSON object",
                    ErrorKind::ObjectMappingError,
                ))
            }
        }
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Document {
            data: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl TryFrom<serde_json::Value> for Document {
    type Error = DocbaseError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(Document::from_json_map(map)),
            other => {
                log::error!("Cannot convert {} into a document", other);
                Err(DocbaseError::new(
                    "Only JSON objects convert into documents",
                    ErrorKind::ObjectMappingError,
                ))
            }
        }
    }
}

#[doc(hidden)]
pub fn normalize(key: &str) -> String {
    key.trim_matches('"').to_string()
}

/// Creates a [Document] from a JSON-like literal.
///
/// Keys may be bare identifiers or string literals and are inserted
/// literally, so a dotted key such as `"profile.phone"` stays a single field
/// name (which patches and conditions read as a path). Values
/// may be nested documents `{ .. }`, lists `[ .. ]` or any expression that
/// converts into a [Value]. Wrap multi-token expressions such as negative
/// numbers in parentheses.
///
/// ```rust
/// use docbase::doc;
///
/// let doc = doc! {
///     name: "Alice",
///     "profile.phone": "123",
///     tags: ["a", "b"],
///     score: (-1),
///     missing: (()),
/// };
/// assert_eq!(doc.keys().nth(1).map(|k| k.as_str()), Some("profile.phone"));
/// assert!(doc.get("missing").map(|v| v.is_null()).unwrap_or(false));
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::collection::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.insert($crate::collection::normalize(stringify!($key)), $crate::doc_value!($value));
            )*
            doc
        }
    };
}

/// Helper macro converting a single `doc!` value.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
