//! Node in a graph document.

use serde::{Deserialize, Serialize};

/// One simulated node, as the visualization consumes it.
///
/// Field order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    /// Text form of the id, as spelled in the nodes table.
    pub name: String,
    /// `1` for members of the minority group.
    pub minority: i64,
    pub pagerank: f64,
    pub order_rank: i64,
    pub order_node: i64,
}

impl Node {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: id.to_string(),
            minority: 0,
            pagerank: 0.0,
            order_rank: 0,
            order_node: 0,
        }
    }

    pub fn with_minority(mut self, minority: i64) -> Self {
        self.minority = minority;
        self
    }

    pub fn with_pagerank(mut self, pagerank: f64) -> Self {
        self.pagerank = pagerank;
        self
    }

    pub fn with_order(mut self, order_rank: i64, order_node: i64) -> Self {
        self.order_rank = order_rank;
        self.order_node = order_node;
        self
    }

    pub fn is_minority(&self) -> bool {
        self.minority != 0
    }
}
