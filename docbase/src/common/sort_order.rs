use crate::collection::Document;
use crate::common::{FieldPath, Value};
use crate::errors::{DocbaseError, DocbaseResult, ErrorKind};
use std::cmp::Ordering;
use std::str::FromStr;

/// Specifies the direction for sorting documents.
///
/// Parsed from the wire strings `"asc"` and `"desc"`; anything else is an
/// `INVALID_PARAM` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in ascending order (smallest to largest, A-Z)
    Ascending,
    /// Sort in descending order (largest to smallest, Z-A)
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = DocbaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            other => {
                log::error!("Invalid sort direction '{}', expected 'asc' or 'desc'", other);
                Err(DocbaseError::new(
                    &format!("Invalid sort direction '{}'", other),
                    ErrorKind::InvalidParameter,
                ))
            }
        }
    }
}

impl TryFrom<&str> for SortOrder {
    type Error = DocbaseError;

    fn try_from(value: &str) -> DocbaseResult<Self> {
        SortOrder::from_str(value)
    }
}

/// An ordered list of sort keys. Keys are compared in the order they were
/// added; later keys only break ties left by earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortSpec {
    keys: Vec<(FieldPath, SortOrder)>,
}

impl SortSpec {
    pub fn new() -> Self {
        SortSpec { keys: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[(FieldPath, SortOrder)] {
        &self.keys
    }

    /// Returns a copy of this spec with one more key appended.
    pub fn then_by(&self, path: FieldPath, order: SortOrder) -> SortSpec {
        let mut keys = self.keys.clone();
        keys.push((path, order));
        SortSpec { keys }
    }

    /// Compares two documents key by key. Missing and null values sort as `0`.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        for (path, order) in &self.keys {
            let left = sort_key(path, a);
            let right = sort_key(path, b);
            let ordering = match order {
                SortOrder::Ascending => left.sort_cmp(&right),
                SortOrder::Descending => right.sort_cmp(&left),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Stable in-place sort; documents tied on every key keep their relative
    /// order.
    pub fn sort(&self, documents: &mut [Document]) {
        if self.keys.is_empty() {
            return;
        }
        documents.sort_by(|a, b| self.compare(a, b));
    }
}

fn sort_key(path: &FieldPath, doc: &Document) -> Value {
    match path.resolve(doc) {
        None | Some(Value::Null) => Value::I64(0),
        Some(value) => value.clone(),
    }
}
