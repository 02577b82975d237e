//! Graph documents: the unit of export.

use serde::{Deserialize, Serialize};

use super::{Edge, NetworkAttributes, NetworkId, Node};

/// One network, ready for a force-directed layout.
///
/// Nodes and links keep table row order. `network_attributes` is left out of
/// the JSON entirely when no attributes were joined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub links: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_attributes: Option<NetworkAttributes>,
}

impl GraphDocument {
    pub fn new(nodes: Vec<Node>, links: Vec<Edge>) -> Self {
        Self { nodes, links, network_attributes: None }
    }

    pub fn with_attributes(mut self, attributes: Option<NetworkAttributes>) -> Self {
        self.network_attributes = attributes;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Links with an endpoint that is not one of this document's nodes.
    ///
    /// These pass through export untouched; callers may only report them.
    pub fn dangling_links(&self) -> impl Iterator<Item = &Edge> {
        let ids: hashbrown::HashSet<i64> = self.nodes.iter().map(|n| n.id).collect();
        self.links
            .iter()
            .filter(move |e| !ids.contains(&e.source) || !ids.contains(&e.target))
    }
}

/// A network inside a bundle file: id, parameters and graph together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEntry {
    pub id: NetworkId,
    pub attributes: NetworkAttributes,
    pub network: GraphDocument,
}
