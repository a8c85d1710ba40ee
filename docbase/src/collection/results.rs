//! Result shapes of collection operations. Each serializes to the JSON form a
//! cloud database client returns.

use crate::collection::Document;
use serde::Serialize;

/// Result of `add`: the new id, reported twice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddResult {
    pub _id: String,
    pub id: String,
}

impl AddResult {
    pub(crate) fn new(id: String) -> Self {
        AddResult {
            _id: id.clone(),
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetResult {
    pub data: Document,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub data: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountResult {
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoveStats {
    pub removed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoveResult {
    pub stats: RemoveStats,
}

impl RemoveResult {
    pub(crate) fn new(removed: usize) -> Self {
        RemoveResult {
            stats: RemoveStats { removed },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStats {
    pub updated: usize,
    /// Only reported by `set`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateResult {
    pub stats: UpdateStats,
}

impl UpdateResult {
    pub(crate) fn updated(updated: usize) -> Self {
        UpdateResult {
            stats: UpdateStats {
                updated,
                created: None,
            },
        }
    }

    pub(crate) fn upserted(replaced: bool) -> Self {
        UpdateResult {
            stats: UpdateStats {
                updated: usize::from(replaced),
                created: Some(usize::from(!replaced)),
            },
        }
    }
}
