//! # synthnet — Synthetic Network Graph Exporter
//!
//! Turns the tabular output of synthetic network simulations into
//! self-contained graph documents for D3-style visualization.
//!
//! ## Design Principles
//!
//! 1. **Typed rows early**: a CSV row becomes a `Node`, `Edge` or
//!    `ParameterRow` right after it is read; nothing downstream touches raw text
//! 2. **Ids compare as text**: `NetworkId` normalizes `3`, `3.0` and ` 3 ` to
//!    the same key across every table
//! 3. **Assembly is pure**: the assembler only composes already-typed parts
//! 4. **Batches return values**: drivers hand back a `BatchReport` instead of
//!    mutating shared state
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use synthnet::{Converter, ExportConfig, NetworkId};
//!
//! # fn example() -> synthnet::Result<()> {
//! let config = ExportConfig::new("data/nodes_pg.csv", "data/edges.csv");
//! let converter = Converter::new(config);
//!
//! let doc = converter.convert(&NetworkId::from(3))?;
//! synthnet::export::write_document(&doc, &mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Load | `table` | Lazy CSV rows keyed by header |
//! | Filter | `table::filter` | Rows of one network id |
//! | Project | `project` | Rows → `Node` / `Edge` |
//! | Join | `join` | Optional network-level attributes |
//! | Assemble | `assemble` | One `GraphDocument` per id |
//! | Name | `params` | Filenames from scaled parameters |
//! | Drive | `batch` | Parameter-table, range and bundle runs |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod table;
pub mod project;
pub mod join;
pub mod assemble;
pub mod params;
pub mod config;
pub mod batch;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    AttributeValue, Edge, GraphDocument, NetworkAttributes, NetworkEntry,
    NetworkId, Node,
};

// ============================================================================
// Re-exports: Pipeline
// ============================================================================

pub use assemble::{assemble, Converter};
pub use batch::{BatchDriver, BatchReport, Bundle, Skipped, Written};
pub use config::{DuplicatePolicy, ExportConfig, FailurePolicy, RankingSource};
pub use params::{ParameterRow, ParameterTable};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot open {}: {}", .path.display(), .source)]
    SourceUnavailable {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed row in {} at line {}: {}", .path.display(), .line, .message)]
    MalformedRow {
        path: std::path::PathBuf,
        line: u64,
        message: String,
    },

    #[error("missing column '{}' in {} at line {}", .column, .path.display(), .line)]
    MissingColumn {
        path: std::path::PathBuf,
        line: u64,
        column: String,
    },

    #[error("network {network}: column '{column}' at line {line} is not {expected}: {value:?}")]
    FieldCoercion {
        network: NetworkId,
        column: String,
        line: u64,
        value: String,
        expected: &'static str,
    },

    #[error("no parameters found for network {0}")]
    ParametersNotFound(NetworkId),

    #[error("network {} has more than one row in {}", .network, .path.display())]
    DuplicateAttributes {
        network: NetworkId,
        path: std::path::PathBuf,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The network id this error is about, when there is one.
    pub fn network(&self) -> Option<&NetworkId> {
        match self {
            Error::FieldCoercion { network, .. }
            | Error::DuplicateAttributes { network, .. }
            | Error::ParametersNotFound(network) => Some(network),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
