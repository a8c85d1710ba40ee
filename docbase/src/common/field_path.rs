use crate::collection::Document;
use crate::common::{Value, FIELD_SEPARATOR};
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};

type Segments = SmallVec<[String; 4]>;

/// A dot-notation address into a document tree, split once at the API
/// boundary.
///
/// Resolution never fails: a missing segment, or a segment that walks into a
/// scalar, yields `None` ("absent"). Numeric segments index into lists.
/// Assignment auto-vivifies: every missing or non-document intermediate is
/// replaced with an empty document, except that an in-range numeric segment
/// descends into an existing list element.
///
/// ```rust
/// use docbase::common::{FieldPath, Value};
/// use docbase::doc;
///
/// let mut doc = doc! { name: "A" };
/// let path = FieldPath::parse("profile.phone");
/// assert!(path.resolve(&doc).is_none());
///
/// path.assign(&mut doc, Value::from("123"));
/// assert_eq!(path.resolve(&doc), Some(&Value::from("123")));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Segments,
}

impl FieldPath {
    pub fn parse(path: &str) -> FieldPath {
        let segments = if path.contains(FIELD_SEPARATOR) {
            path.split(FIELD_SEPARATOR).map(str::to_string).collect()
        } else {
            let mut single = Segments::new();
            single.push(path.to_string());
            single
        };
        FieldPath { segments }
    }

    /// The empty path addresses the document itself.
    pub fn root() -> FieldPath {
        FieldPath {
            segments: Segments::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_top_level(&self) -> bool {
        self.segments.len() == 1
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns `self` followed by `child`.
    pub fn join(&self, child: &FieldPath) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.extend(child.segments.iter().cloned());
        FieldPath { segments }
    }

    /// Resolves the value at this path, or `None` if any segment is absent.
    pub fn resolve<'a>(&self, doc: &'a Document) -> Option<&'a Value> {
        match self.segments.as_slice() {
            [] => None,
            [key] => doc.get_top(key),
            [first, rest @ ..] => {
                let mut current = doc.get_top(first)?;
                for segment in rest {
                    current = match current {
                        Value::Document(inner) => inner.get_top(segment)?,
                        Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                        _ => return None,
                    };
                }
                Some(current)
            }
        }
    }

    /// Assigns `value` at this path, creating intermediate documents as needed.
    pub fn assign(&self, doc: &mut Document, value: Value) {
        if self.segments.is_empty() {
            return;
        }
        assign_in_document(doc, &self.segments, value);
    }

    /// Removes and returns the value at this path. Missing paths are a no-op.
    pub fn remove(&self, doc: &mut Document) -> Option<Value> {
        let (last, parents) = self.segments.split_last()?;
        let mut current = doc;
        for segment in parents {
            current = current.get_top_mut(segment)?.as_document_mut()?;
        }
        current.remove_top(last)
    }
}

fn assign_in_document(doc: &mut Document, segments: &[String], value: Value) {
    match segments {
        [] => {}
        [key] => doc.put_top(key.clone(), value),
        [key, rest @ ..] => {
            let slot = doc.slot_mut(key.clone());
            assign_in_value(slot, rest, value);
        }
    }
}

fn assign_in_value(slot: &mut Value, segments: &[String], value: Value) {
    if let Value::Array(items) = slot {
        let index = segments.first().and_then(|s| s.parse::<usize>().ok());
        if let Some(item) = index.and_then(|i| items.get_mut(i)) {
            if segments.len() == 1 {
                *item = value;
            } else {
                assign_in_value(item, &segments[1..], value);
            }
            return;
        }
    }

    match slot {
        Value::Document(inner) => assign_in_document(inner, segments, value),
        _ => {
            let mut inner = Document::new();
            assign_in_document(&mut inner, segments, value);
            *slot = Value::Document(inner);
        }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.iter().join(FIELD_SEPARATOR))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        FieldPath::parse(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        FieldPath::parse(&path)
    }
}
