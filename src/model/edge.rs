//! Link (edge) in a graph document.

use serde::{Deserialize, Serialize};

/// A link between two node ids of the same document.
///
/// Endpoints are not checked against the document's nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: i64,
    pub target: i64,
}

impl Edge {
    pub fn new(source: i64, target: i64) -> Self {
        Self { source, target }
    }
}
