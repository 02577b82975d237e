//! # Graph Document Model
//!
//! Typed DTOs for everything the exporter emits. Rows read from CSV become
//! these types right away; every later stage works on checked fields.
//!
//! Design rule: no I/O and no CSV types here. This module is pure data.

pub mod network_id;
pub mod node;
pub mod edge;
pub mod attributes;
pub mod document;

pub use network_id::NetworkId;
pub use node::Node;
pub use edge::Edge;
pub use attributes::{AttributeValue, NetworkAttributes};
pub use document::{GraphDocument, NetworkEntry};
