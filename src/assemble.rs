//! # Graph Assembler
//!
//! [`assemble`] is pure composition: typed nodes, links and optional
//! attributes in, one [`GraphDocument`] out. [`Converter`] runs the stages
//! before it (load, filter, project, join) for a single network id.
//!
//! ```text
//! nodes.csv ──filter──project──┐
//! edges.csv ──filter──project──┼──> assemble ──> GraphDocument
//! ranking.csv ──join (soft)────┘
//! ```

use crate::config::ExportConfig;
use crate::join::join_attributes;
use crate::model::{Edge, GraphDocument, NetworkAttributes, NetworkEntry, NetworkId, Node};
use crate::params::ParameterRow;
use crate::project::{load_edges, load_nodes};
use crate::Result;

/// Compose one document. No parsing, no filtering.
pub fn assemble(
    nodes: Vec<Node>,
    links: Vec<Edge>,
    attributes: Option<NetworkAttributes>,
) -> GraphDocument {
    GraphDocument::new(nodes, links).with_attributes(attributes)
}

/// Converts networks according to one [`ExportConfig`].
#[derive(Debug, Clone)]
pub struct Converter {
    config: ExportConfig,
}

impl Converter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Build the document for `id`, enriched from the ranking source if one
    /// is configured and has a row for it.
    pub fn convert(&self, id: &NetworkId) -> Result<GraphDocument> {
        let (nodes, links) = self.graph_parts(id)?;
        let ranking = self.config.ranking_path();
        let attributes = join_attributes(ranking.as_deref(), id, self.config.duplicates)?;
        Ok(assemble(nodes, links, attributes))
    }

    /// Build a bundle entry: the bare graph plus the parameters row.
    pub fn convert_entry(&self, params: &ParameterRow) -> Result<NetworkEntry> {
        let (nodes, links) = self.graph_parts(&params.id)?;
        Ok(NetworkEntry {
            id: params.id.clone(),
            attributes: params.attributes.clone(),
            network: assemble(nodes, links, None),
        })
    }

    fn graph_parts(&self, id: &NetworkId) -> Result<(Vec<Node>, Vec<Edge>)> {
        let nodes = load_nodes(&self.config.nodes, id)?;
        let links = load_edges(&self.config.edges, id)?;

        if nodes.is_empty() && links.is_empty() {
            tracing::warn!(network = %id, "no node or edge rows for network");
        }
        let doc = GraphDocument::new(nodes, links);
        let dangling = doc.dangling_links().count();
        if dangling > 0 {
            tracing::debug!(network = %id, dangling, "links reference nodes outside the document");
        }
        tracing::debug!(
            network = %id,
            nodes = doc.nodes.len(),
            minority = doc.nodes.iter().filter(|n| n.is_minority()).count(),
            links = doc.links.len(),
            "projected network"
        );
        Ok((doc.nodes, doc.links))
    }
}
