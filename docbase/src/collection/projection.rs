use crate::collection::Document;
use crate::common::{FieldPath, DOC_ID};

/// A field projection, as accepted by a cursor's `field()`.
///
/// Truthy flags select include mode: only the listed paths are returned, plus
/// `_id` unless it is explicitly excluded. If every flag is falsy the listed
/// paths are removed instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    include: Vec<FieldPath>,
    exclude: Vec<FieldPath>,
    exclude_id: bool,
}

impl Projection {
    pub fn is_include_mode(&self) -> bool {
        !self.include.is_empty()
    }

    /// Returns the projected copy of `doc`.
    pub fn apply(&self, doc: &Document) -> Document {
        if self.is_include_mode() {
            let mut projected = Document::new();
            if !self.exclude_id {
                if let Some(id) = doc.get(DOC_ID) {
                    projected.insert(DOC_ID, id.clone());
                }
            }
            for path in &self.include {
                if let Some(value) = path.resolve(doc) {
                    path.assign(&mut projected, value.clone());
                }
            }
            projected
        } else {
            let mut projected = doc.clone();
            for path in &self.exclude {
                path.remove(&mut projected);
            }
            projected
        }
    }
}

impl From<Document> for Projection {
    fn from(spec: Document) -> Self {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        let mut exclude_id = false;

        for (key, flag) in spec {
            let path = FieldPath::parse(&key);
            if flag.is_truthy() {
                include.push(path);
            } else {
                if key == DOC_ID {
                    exclude_id = true;
                }
                exclude.push(path);
            }
        }

        Projection {
            include,
            exclude,
            exclude_id,
        }
    }
}
