//! JSON export — serialize graph documents for the D3 front-end.
//!
//! Output is UTF-8 JSON with 2-space indentation, one document per file.
//!
//! ```text
//! GraphDocument → write_document_file() → out/graph_fm1_hMM2_hmm8.json
//!   → d3.json(...) in the browser
//! ```
//!
//! Writes go straight to the target path. A crash mid-write can leave a
//! truncated file; the output is derived data and can be regenerated.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::model::{GraphDocument, NetworkEntry};
use crate::{Error, Result};

/// Write any serializable value as pretty JSON plus a trailing newline.
fn write_json<T: Serialize + ?Sized>(value: &T, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

fn write_json_file<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_json(value, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Write one document.
pub fn write_document(doc: &GraphDocument, writer: &mut dyn Write) -> Result<()> {
    write_json(doc, writer)
}

/// Write one document to `path`, replacing any existing file.
pub fn write_document_file(doc: &GraphDocument, path: &Path) -> Result<()> {
    write_json_file(doc, path)?;
    tracing::info!(
        path = %path.display(),
        nodes = doc.nodes.len(),
        links = doc.links.len(),
        enriched = doc.network_attributes.is_some(),
        "wrote graph document"
    );
    Ok(())
}

/// Write a bundle: a JSON array of `{id, attributes, network}` entries.
pub fn write_bundle(entries: &[NetworkEntry], writer: &mut dyn Write) -> Result<()> {
    write_json(entries, writer)
}

pub fn write_bundle_file(entries: &[NetworkEntry], path: &Path) -> Result<()> {
    write_json_file(entries, path)?;
    tracing::info!(path = %path.display(), networks = entries.len(), "wrote bundle");
    Ok(())
}

/// Read a document back, e.g. to check an earlier export.
pub fn read_document(path: &Path) -> Result<GraphDocument> {
    let file = File::open(path).map_err(|source| Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Create the output directory if it is missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}
