use crate::collection::Document;
use crate::common::{FieldPath, Value, CMD_TAG, CMD_VALUE, CMD_VALUES, DOC_ID};
use crate::errors::{DocbaseError, DocbaseResult, ErrorKind};
use std::fmt::{Display, Formatter};

/// An update applied to a single path of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOperator {
    /// Replaces the value at the path. Nested documents replace the whole
    /// subtree; they are never merged.
    Set(Value),
    /// Adds a number to the value at the path. Absent or non-numeric values
    /// count as `0`.
    Inc(Value),
    /// Appends values to the list at the path, creating it if needed.
    Push(Vec<Value>),
    /// Deletes the value at the path.
    Remove,
    /// A malformed operator payload; applying it fails with `INVALID_PARAM`.
    Invalid(String),
}

impl UpdateOperator {
    /// Converts this operator into its `__cmd`-tagged wire form. `Set`
    /// converts to the plain value.
    pub fn to_value(&self) -> Value {
        let mut doc = Document::new();
        match self {
            UpdateOperator::Set(value) => return value.clone(),
            UpdateOperator::Inc(value) => {
                doc.put(CMD_TAG, "inc");
                doc.put(CMD_VALUE, value.clone());
            }
            UpdateOperator::Push(values) => {
                doc.put(CMD_TAG, "push");
                doc.put(CMD_VALUES, values.clone());
            }
            UpdateOperator::Remove => doc.put(CMD_TAG, "remove"),
            UpdateOperator::Invalid(message) => {
                doc.put(CMD_TAG, "invalid");
                doc.put(CMD_VALUE, message.as_str());
            }
        }
        Value::Document(doc)
    }

    fn from_value(value: Value) -> UpdateOperator {
        let mut doc = match value {
            Value::Document(doc) => doc,
            other => return UpdateOperator::Set(other),
        };

        let tag = match doc.get(CMD_TAG).and_then(Value::as_str) {
            Some(tag) => tag.to_string(),
            None => return UpdateOperator::Set(Value::Document(doc)),
        };

        match tag.as_str() {
            "inc" => match doc.remove(CMD_VALUE) {
                Some(value) if value.is_number() => UpdateOperator::Inc(value),
                _ => UpdateOperator::Invalid("Operator 'inc' requires a numeric 'value'".to_string()),
            },
            "push" => match doc.remove(CMD_VALUES) {
                Some(Value::Array(values)) => UpdateOperator::Push(values),
                Some(value) => UpdateOperator::Push(vec![value]),
                None => UpdateOperator::Invalid("Operator 'push' requires 'values'".to_string()),
            },
            "set" => UpdateOperator::Set(doc.remove(CMD_VALUE).unwrap_or_default()),
            "remove" => UpdateOperator::Remove,
            "invalid" => UpdateOperator::Invalid(
                doc.get(CMD_VALUE)
                    .and_then(Value::as_str)
                    .unwrap_or("invalid update operator")
                    .to_string(),
            ),
            other => UpdateOperator::Invalid(format!("'{}' is not an update operator", other)),
        }
    }
}

impl From<UpdateOperator> for Value {
    fn from(operator: UpdateOperator) -> Self {
        operator.to_value()
    }
}

impl Display for UpdateOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// An ordered list of path updates.
///
/// Build one fluently, or convert a document whose values are plain values
/// (replace) or `__cmd`-tagged operators:
///
/// ```rust
/// use docbase::collection::Patch;
/// use docbase::doc;
/// use docbase::filter::Command;
///
/// let fluent = Patch::new().set("profile.phone", "123").inc("visits", 1);
/// let from_doc: Patch = doc! { "profile.phone": "123", visits: (Command.inc(1)) }.into();
/// assert_eq!(fluent, from_doc);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    entries: Vec<(FieldPath, UpdateOperator)>,
}

impl Patch {
    pub fn new() -> Self {
        Patch {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(FieldPath, UpdateOperator)] {
        &self.entries
    }

    pub fn with(mut self, path: &str, operator: UpdateOperator) -> Self {
        self.entries.push((FieldPath::parse(path), operator));
        self
    }

    pub fn set<T: Into<Value>>(self, path: &str, value: T) -> Self {
        self.with(path, UpdateOperator::Set(value.into()))
    }

    pub fn inc<T: Into<Value>>(self, path: &str, amount: T) -> Self {
        self.with(path, UpdateOperator::Inc(amount.into()))
    }

    pub fn push<T: Into<Value>>(self, path: &str, value: T) -> Self {
        let values = match value.into() {
            Value::Array(values) => values,
            value => vec![value],
        };
        self.with(path, UpdateOperator::Push(values))
    }

    pub fn remove(self, path: &str) -> Self {
        self.with(path, UpdateOperator::Remove)
    }

    /// Fails with `INVALID_PARAM` if any operator is malformed.
    pub fn validate(&self) -> DocbaseResult<()> {
        for (path, operator) in &self.entries {
            match operator {
                UpdateOperator::Invalid(message) => {
                    log::error!("Invalid update operator at '{}': {}", path, message);
                    return Err(DocbaseError::new(message, ErrorKind::InvalidParameter));
                }
                UpdateOperator::Inc(amount) if !amount.is_number() => {
                    log::error!("Cannot increment '{}' by non-numeric {}", path, amount);
                    return Err(DocbaseError::new(
                        &format!("Cannot increment '{}' by a non-numeric value", path),
                        ErrorKind::InvalidParameter,
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl From<Document> for Patch {
    fn from(doc: Document) -> Self {
        Patch {
            entries: doc
                .into_iter()
                .map(|(key, value)| (FieldPath::parse(&key), UpdateOperator::from_value(value)))
                .collect(),
        }
    }
}

/// Applies `patch` to a copy of `existing` and returns the new document.
///
/// Entries apply in order. Plain values replace whatever is at their path,
/// including whole nested documents. Values are cloned out of the patch, so
/// the result never shares structure with it. `_id` entries are ignored.
pub fn apply_update(existing: &Document, patch: &Patch) -> DocbaseResult<Document> {
    patch.validate()?;

    let mut updated = existing.clone();
    for (path, operator) in patch.entries() {
        if path.is_top_level() && path.segments()[0] == DOC_ID {
            log::debug!("Ignoring update of reserved field '{}'", DOC_ID);
            continue;
        }

        match operator {
            UpdateOperator::Set(value) => path.assign(&mut updated, value.clone()),
            UpdateOperator::Inc(amount) => {
                let current = path
                    .resolve(&updated)
                    .filter(|v| v.is_number())
                    .cloned()
                    .unwrap_or(Value::I64(0));
                let sum = current.add_numeric(amount).ok_or_else(|| {
                    log::error!("Cannot increment '{}' by {}", path, amount);
                    DocbaseError::new(
                        &format!("Cannot increment '{}'", path),
                        ErrorKind::InvalidParameter,
                    )
                })?;
                path.assign(&mut updated, sum);
            }
            UpdateOperator::Push(values) => {
                let mut list = match path.resolve(&updated) {
                    Some(Value::Array(items)) => items.clone(),
                    _ => Vec::new(),
                };
                list.extend(values.iter().cloned());
                path.assign(&mut updated, Value::Array(list));
            }
            UpdateOperator::Remove => {
                path.remove(&mut updated);
            }
            UpdateOperator::Invalid(_) => {}
        }
    }
    Ok(updated)
}
