//! # Batch Driver
//!
//! Runs the [`Converter`] over many networks and writes one file each.
//!
//! | Mode | Ids from | Filename |
//! |------|----------|----------|
//! | [`BatchDriver::by_parameters`] | every parameters row | `graph_fm{fm}_hMM{h_MM}_hmm{h_mm}.json` |
//! | [`BatchDriver::by_range`] | inclusive `start..=end` | `graph_{id}.json` |
//! | [`bundle`] | every parameters row | returned, not written |
//!
//! The output directory is created when missing. Same-named files are
//! replaced without warning: last write wins, including between parameter
//! sets that collide after scaling.
//!
//! Results come back as a [`BatchReport`] value built by the driver; nothing
//! accumulates in shared state between ids.

use std::path::{Path, PathBuf};

use crate::assemble::Converter;
use crate::config::FailurePolicy;
use crate::export::{ensure_dir, write_document_file};
use crate::model::{NetworkEntry, NetworkId};
use crate::params::{id_filename, ParameterTable};
use crate::{Error, Result};

// ============================================================================
// Reports
// ============================================================================

/// A document that made it to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Written {
    pub id: NetworkId,
    pub path: PathBuf,
    pub nodes: usize,
    pub links: usize,
}

/// A network left out under [`FailurePolicy::Skip`].
#[derive(Debug)]
pub struct Skipped {
    pub id: NetworkId,
    pub error: Error,
}

/// Outcome of a batch run, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<Written>,
    pub skipped: Vec<Skipped>,
}

impl BatchReport {
    /// Paths written more than once in this run; only the last write survives.
    pub fn overwritten(&self) -> Vec<&Path> {
        let mut counts: hashbrown::HashMap<&Path, usize> = hashbrown::HashMap::new();
        let mut order = Vec::new();
        for w in &self.written {
            let n = counts.entry(w.path.as_path()).or_insert(0);
            *n += 1;
            if *n == 2 {
                order.push(w.path.as_path());
            }
        }
        order
    }
}

/// Bundle entries plus the networks skipped while building them.
#[derive(Debug, Default)]
pub struct Bundle {
    pub entries: Vec<NetworkEntry>,
    pub skipped: Vec<Skipped>,
}

// ============================================================================
// Driver
// ============================================================================

/// Drives conversions into one output directory.
#[derive(Debug, Clone)]
pub struct BatchDriver {
    converter: Converter,
    output_dir: PathBuf,
}

impl BatchDriver {
    pub fn new(converter: Converter, output_dir: impl Into<PathBuf>) -> Self {
        Self { converter, output_dir: output_dir.into() }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn policy(&self) -> FailurePolicy {
        self.converter.config().on_error
    }

    /// One document per parameters row, named from its scaled parameters.
    pub fn by_parameters(&self, params: &ParameterTable) -> Result<BatchReport> {
        ensure_dir(&self.output_dir)?;
        let mut report = BatchReport::default();
        for row in params.rows()? {
            let outcome = row.and_then(|row| {
                let path = self.output_dir.join(row.filename());
                self.write_one(&row.id, path)
            });
            self.record(outcome, &mut report)?;
        }
        self.finish(&report);
        Ok(report)
    }

    /// One document per integer id in `start..=end`, named `graph_{id}.json`.
    ///
    /// `start > end` is an empty run.
    pub fn by_range(&self, start: i64, end: i64) -> Result<BatchReport> {
        ensure_dir(&self.output_dir)?;
        let mut report = BatchReport::default();
        for raw in start..=end {
            let id = NetworkId::from(raw);
            let path = self.output_dir.join(id_filename(&id));
            let outcome = self.write_one(&id, path);
            self.record(outcome, &mut report)?;
        }
        self.finish(&report);
        Ok(report)
    }

    /// Convert a single id into the output directory, named from its
    /// parameters row.
    ///
    /// A missing row fails with [`Error::ParametersNotFound`] before anything
    /// is written.
    pub fn single_named(&self, id: &NetworkId, params: &ParameterTable) -> Result<Written> {
        let filename = params.filename_for(id)?;
        ensure_dir(&self.output_dir)?;
        self.write_one(id, self.output_dir.join(filename))
    }

    fn write_one(&self, id: &NetworkId, path: PathBuf) -> Result<Written> {
        let doc = self.converter.convert(id)?;
        write_document_file(&doc, &path)?;
        Ok(Written {
            id: id.clone(),
            path,
            nodes: doc.nodes.len(),
            links: doc.links.len(),
        })
    }

    fn record(&self, outcome: Result<Written>, report: &mut BatchReport) -> Result<()> {
        match outcome {
            Ok(written) => report.written.push(written),
            Err(e) => report.skipped.push(skip_or_abort(self.policy(), e)?),
        }
        Ok(())
    }

    fn finish(&self, report: &BatchReport) {
        for path in report.overwritten() {
            tracing::debug!(
                path = %path.display(),
                "file written more than once, last write kept"
            );
        }
        tracing::info!(
            dir = %self.output_dir.display(),
            written = report.written.len(),
            skipped = report.skipped.len(),
            "batch finished"
        );
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// Every parameters row as a bundle entry, in table order.
///
/// Nothing is written; the caller decides where the bundle goes.
pub fn bundle(converter: &Converter, params: &ParameterTable) -> Result<Bundle> {
    let policy = converter.config().on_error;
    let mut bundle = Bundle::default();
    for row in params.rows()? {
        match row.and_then(|row| converter.convert_entry(&row)) {
            Ok(entry) => bundle.entries.push(entry),
            Err(e) => bundle.skipped.push(skip_or_abort(policy, e)?),
        }
    }
    Ok(bundle)
}

/// Only failures tied to one network can be skipped. Missing or broken
/// tables stop the run under either policy.
fn skip_or_abort(policy: FailurePolicy, error: Error) -> Result<Skipped> {
    match (policy, error.network().cloned()) {
        (FailurePolicy::Skip, Some(id)) => {
            tracing::warn!(network = %id, %error, "skipping network");
            Ok(Skipped { id, error })
        }
        _ => Err(error),
    }
}
