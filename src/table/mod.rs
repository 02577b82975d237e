//! # Record Loader
//!
//! Lazy, header-keyed CSV rows. A [`Table`] owns the reader; [`Table::rows`]
//! streams [`Row`]s one at a time so a batch never holds a whole table.
//!
//! Cells are whitespace-trimmed. A row whose width disagrees with the header
//! fails with [`Error::MalformedRow`]; the reader is not flexible.

pub mod filter;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::HashMap;

use crate::model::NetworkId;
use crate::{Error, Result};

pub use filter::{filter_network, NetworkRows};

/// Column every input table keys on.
pub const ID_COLUMN: &str = "id";

// ============================================================================
// Headers
// ============================================================================

/// Header names of one table plus a name → position index.
#[derive(Debug)]
pub struct Headers {
    path: PathBuf,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Headers {
    fn new(path: PathBuf, record: &csv::StringRecord) -> Self {
        let names: Vec<String> = record.iter().map(str::to_owned).collect();
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            // Duplicate header names resolve to the first occurrence.
            index.entry(name.clone()).or_insert(i);
        }
        Self { path, names, index }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }
}

// ============================================================================
// Row
// ============================================================================

/// One data row, readable by column name.
#[derive(Debug, Clone)]
pub struct Row {
    headers: Arc<Headers>,
    values: csv::StringRecord,
    line: u64,
}

impl Row {
    /// 1-based line in the source file.
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn path(&self) -> &Path {
        &self.headers.path
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers.position(column).and_then(|i| self.values.get(i))
    }

    /// Like [`Row::get`], but a missing column is an error.
    pub fn require(&self, column: &str) -> Result<&str> {
        self.get(column).ok_or_else(|| Error::MissingColumn {
            path: self.headers.path.clone(),
            line: self.line,
            column: column.to_owned(),
        })
    }

    /// The row's network id, normalized.
    pub fn network_id(&self) -> Result<NetworkId> {
        self.require(ID_COLUMN).map(NetworkId::new)
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.names.iter().map(String::as_str).zip(self.values.iter())
    }
}

// ============================================================================
// Table
// ============================================================================

/// An opened CSV table with its header already read.
pub struct Table<R = File> {
    headers: Arc<Headers>,
    reader: csv::Reader<R>,
}

impl Table<File> {
    /// Open a table from disk.
    ///
    /// Fails with [`Error::SourceUnavailable`] when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened table");
        Self::from_reader(path, file)
    }
}

impl<R: Read> Table<R> {
    /// Read a table from any reader. `label` stands in for the path in errors.
    pub fn from_reader(label: impl Into<PathBuf>, reader: R) -> Result<Self> {
        let path = label.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let record = reader.headers().map_err(|e| csv_error(&path, e))?.clone();
        Ok(Self { headers: Arc::new(Headers::new(path, &record)), reader })
    }

    pub fn path(&self) -> &Path {
        &self.headers.path
    }

    pub fn headers(&self) -> &[String] {
        self.headers.names()
    }

    /// Fail with [`Error::MissingColumn`] unless every column is in the header.
    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        match columns.iter().find(|c| self.headers.position(c).is_none()) {
            Some(missing) => Err(Error::MissingColumn {
                path: self.headers.path.clone(),
                line: 1,
                column: (*missing).to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Stream the data rows.
    pub fn rows(self) -> Rows<R> {
        Rows { headers: self.headers, records: self.reader.into_records() }
    }
}

/// Iterator over a table's rows. See [`Table::rows`].
pub struct Rows<R> {
    headers: Arc<Headers>,
    records: csv::StringRecordsIntoIter<R>,
}

impl<R: Read> Iterator for Rows<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(csv_error(&self.headers.path, e))),
        };
        let line = record.position().map_or(0, |p| p.line());
        Some(Ok(Row { headers: Arc::clone(&self.headers), values: record, line }))
    }
}

fn csv_error(path: &Path, err: csv::Error) -> Error {
    let line = err.position().map_or(0, |p| p.line());
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => Error::Io(source),
        _ => Error::MalformedRow { path: path.to_path_buf(), line, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> Table<&[u8]> {
        Table::from_reader("mem.csv", text.as_bytes()).unwrap()
    }

    #[test]
    fn test_rows_are_keyed_by_header() {
        let rows: Vec<Row> = table("id,source,target\n1, 5 ,6\n")
            .rows()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("source"), Some("5"));
        assert_eq!(rows[0].get("weight"), None);
        assert_eq!(rows[0].line(), 2);
        assert_eq!(
            rows[0].iter().collect::<Vec<_>>(),
            vec![("id", "1"), ("source", "5"), ("target", "6")]
        );
    }

    #[test]
    fn test_width_mismatch_is_malformed() {
        let mut rows = table("id,source,target\n1,2\n").rows();
        match rows.next() {
            Some(Err(Error::MalformedRow { line, .. })) => assert_eq!(line, 2),
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = Table::open("/definitely/not/here.csv").err().unwrap();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }

    #[test]
    fn test_require_columns_names_the_gap() {
        let err = table("id,node\n").require_columns(&["id", "node", "pagerank"]).unwrap_err();
        match err {
            Error::MissingColumn { column, .. } => assert_eq!(column, "pagerank"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_require_reports_line() {
        let row = table("id\n7\n").rows().next().unwrap().unwrap();
        match row.require("node").unwrap_err() {
            Error::MissingColumn { line, .. } => assert_eq!(line, 2),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }
}
