//! # Node/Edge Projector
//!
//! Filtered rows → typed [`Node`]s and [`Edge`]s. Coercion is fail-fast: a
//! cell that does not parse aborts the network with
//! [`Error::FieldCoercion`] naming the column and line. A half-typed node is
//! never emitted.

use std::io::Read;
use std::path::Path;

use crate::model::{Edge, NetworkId, Node};
use crate::table::{filter_network, Row, Table};
use crate::{Error, Result};

/// Columns the nodes table must carry.
pub const NODE_COLUMNS: [&str; 6] =
    ["id", "node", "minority", "pagerank", "order_rank", "order_node"];

/// Columns the edges table must carry.
pub const EDGE_COLUMNS: [&str; 3] = ["id", "source", "target"];

// ============================================================================
// Single rows
// ============================================================================

/// Project one nodes-table row.
pub fn project_node(row: &Row, network: &NetworkId) -> Result<Node> {
    let name = row.require("node")?;
    Ok(Node {
        id: int_field(row, "node", network)?,
        name: name.to_owned(),
        minority: int_field(row, "minority", network)?,
        pagerank: float_field(row, "pagerank", network)?,
        order_rank: int_field(row, "order_rank", network)?,
        order_node: int_field(row, "order_node", network)?,
    })
}

/// Project one edges-table row. Endpoints are not checked against any node list.
pub fn project_edge(row: &Row, network: &NetworkId) -> Result<Edge> {
    Ok(Edge {
        source: int_field(row, "source", network)?,
        target: int_field(row, "target", network)?,
    })
}

pub(crate) fn int_field(row: &Row, column: &str, network: &NetworkId) -> Result<i64> {
    let raw = row.require(column)?;
    raw.parse().map_err(|_| coercion(row, column, raw, network, "an integer"))
}

pub(crate) fn float_field(row: &Row, column: &str, network: &NetworkId) -> Result<f64> {
    let raw = row.require(column)?;
    match raw.parse::<f64>() {
        // NaN and infinities have no JSON form.
        Ok(f) if f.is_finite() => Ok(f),
        _ => Err(coercion(row, column, raw, network, "a finite float")),
    }
}

fn coercion(
    row: &Row,
    column: &str,
    raw: &str,
    network: &NetworkId,
    expected: &'static str,
) -> Error {
    Error::FieldCoercion {
        network: network.clone(),
        column: column.to_owned(),
        line: row.line(),
        value: raw.to_owned(),
        expected,
    }
}

// ============================================================================
// Whole tables
// ============================================================================

/// All nodes of `network` from an opened nodes table, in row order.
pub fn nodes_from<R: Read>(table: Table<R>, network: &NetworkId) -> Result<Vec<Node>> {
    table.require_columns(&NODE_COLUMNS)?;
    filter_network(table.rows(), network)
        .map(|row| project_node(&row?, network))
        .collect()
}

/// All links of `network` from an opened edges table, in row order.
pub fn edges_from<R: Read>(table: Table<R>, network: &NetworkId) -> Result<Vec<Edge>> {
    table.require_columns(&EDGE_COLUMNS)?;
    filter_network(table.rows(), network)
        .map(|row| project_edge(&row?, network))
        .collect()
}

pub fn load_nodes(path: &Path, network: &NetworkId) -> Result<Vec<Node>> {
    nodes_from(Table::open(path)?, network)
}

pub fn load_edges(path: &Path, network: &NetworkId) -> Result<Vec<Edge>> {
    edges_from(Table::open(path)?, network)
}
