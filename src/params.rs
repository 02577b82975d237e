//! # Parameters Table and Filename Deriver
//!
//! The parameters table drives batch runs and names their output files. Each
//! of `fm`, `h_MM` and `h_mm` is scaled by ten and truncated to an integer:
//!
//! ```text
//! fm=0.1, h_MM=0.2, h_mm=0.8  →  graph_fm1_hMM2_hmm8.json
//! ```
//!
//! The encoding is lossy on purpose. Parameter sets that agree after scaling
//! share a filename, and the later write replaces the earlier one.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::join::row_attributes;
use crate::model::network_id::normalize;
use crate::model::{NetworkAttributes, NetworkId};
use crate::project::float_field;
use crate::table::{filter_network, Row, Table, ID_COLUMN};
use crate::{Error, Result};

/// Columns the parameters table must carry.
pub const PARAMETER_COLUMNS: [&str; 4] = ["id", "fm", "h_MM", "h_mm"];

/// Scale a parameter for filename encoding: `trunc(value * 10)`.
pub fn scale(value: f64) -> i64 {
    // `as` truncates toward zero and saturates on overflow.
    (value * 10.0) as i64
}

/// Output filename for a parameter triple.
pub fn derive_filename(fm: f64, h_majority: f64, h_minority: f64) -> String {
    format!(
        "graph_fm{}_hMM{}_hmm{}.json",
        scale(fm),
        scale(h_majority),
        scale(h_minority)
    )
}

/// Output filename when no parameters are involved.
pub fn id_filename(id: &NetworkId) -> String {
    format!("graph_{id}.json")
}

// ============================================================================
// ParameterRow
// ============================================================================

/// Typed view of one parameters-table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRow {
    pub id: NetworkId,
    /// Minority fraction.
    pub fm: f64,
    /// Majority homophily (`h_MM`).
    pub h_majority: f64,
    /// Minority homophily (`h_mm`).
    pub h_minority: f64,
    /// The full row, coerced the same way as joined attributes.
    pub attributes: NetworkAttributes,
}

impl ParameterRow {
    pub fn new(id: NetworkId, fm: f64, h_majority: f64, h_minority: f64) -> Self {
        Self { id, fm, h_majority, h_minority, attributes: NetworkAttributes::new() }
    }

    pub fn from_row(row: &Row) -> Result<Self> {
        let id = row.network_id()?;
        Ok(Self {
            fm: float_field(row, "fm", &id)?,
            h_majority: float_field(row, "h_MM", &id)?,
            h_minority: float_field(row, "h_mm", &id)?,
            attributes: row_attributes(row),
            id,
        })
    }

    pub fn filename(&self) -> String {
        derive_filename(self.fm, self.h_majority, self.h_minority)
    }
}

// ============================================================================
// ParameterTable
// ============================================================================

/// A parameters table on disk, re-read on every pass.
#[derive(Debug, Clone)]
pub struct ParameterTable {
    path: PathBuf,
}

impl ParameterTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Table> {
        let table = Table::open(&self.path)?;
        table.require_columns(&PARAMETER_COLUMNS)?;
        Ok(table)
    }

    /// Every row, in table order.
    pub fn rows(&self) -> Result<impl Iterator<Item = Result<ParameterRow>>> {
        Ok(self.open()?.rows().map(|row| ParameterRow::from_row(&row?)))
    }

    /// The first row for `id`.
    ///
    /// No row is an explicit [`Error::ParametersNotFound`]; a filename is never
    /// made up from another network's values.
    pub fn lookup(&self, id: &NetworkId) -> Result<ParameterRow> {
        match filter_network(self.open()?.rows(), id).next() {
            Some(row) => ParameterRow::from_row(&row?),
            None => Err(Error::ParametersNotFound(id.clone())),
        }
    }

    pub fn filename_for(&self, id: &NetworkId) -> Result<String> {
        self.lookup(id).map(|row| row.filename())
    }
}

// ============================================================================
// Deriving a parameters table from a ranking table
// ============================================================================

/// Copy the ranking rows whose `k` equals `k` into a parameters CSV, and
/// optionally into JSON lines. Returns the number of rows kept.
pub fn derive_parameter_table(
    ranking: &Path,
    k: &str,
    csv_out: &Path,
    jsonl_out: Option<&Path>,
) -> Result<usize> {
    let table = Table::open(ranking)?;
    table.require_columns(&[ID_COLUMN, "k"])?;
    let wanted = normalize(k);

    let mut csv_writer = csv::Writer::from_writer(create(csv_out)?);
    csv_writer.write_record(table.headers()).map_err(csv_write_error)?;
    let mut jsonl = jsonl_out.map(create).transpose()?;

    let mut kept = 0;
    for row in table.rows() {
        let row = row?;
        if normalize(row.require("k")?) != wanted {
            continue;
        }
        csv_writer
            .write_record(row.iter().map(|(_, v)| v))
            .map_err(csv_write_error)?;
        if let Some(out) = jsonl.as_mut() {
            serde_json::to_writer(&mut *out, &row_attributes(&row))?;
            out.write_all(b"\n")?;
        }
        kept += 1;
    }

    csv_writer.flush()?;
    if let Some(mut out) = jsonl {
        out.flush()?;
    }
    tracing::info!(
        ranking = %ranking.display(),
        k,
        kept,
        out = %csv_out.display(),
        "derived parameters table"
    );
    Ok(kept)
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

fn csv_write_error(err: csv::Error) -> Error {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => Error::Io(e),
        other => Error::Io(std::io::Error::other(format!("{other:?}"))),
    }
}
