//! # Attribute Joiner
//!
//! Looks up one network's row in the ranking (or parameters) table and turns
//! it into [`NetworkAttributes`]. `id` and `k` stay text; every other column
//! becomes a float.
//!
//! Enrichment is a soft dependency. A missing or unreadable table, or no
//! matching row, means "no attributes", never a failed export. The one hard
//! failure is [`Error::DuplicateAttributes`] under [`DuplicatePolicy::Reject`],
//! because the caller asked for it.

use std::io::Read;
use std::path::Path;

use crate::config::DuplicatePolicy;
use crate::model::attributes::TEXT_COLUMNS;
use crate::model::{AttributeValue, NetworkAttributes, NetworkId};
use crate::table::{filter_network, Row, Table, ID_COLUMN};
use crate::{Error, Result};

/// Coerce a whole row into attributes, in column order.
///
/// A cell that is not a number stays text and is logged; the joiner never
/// fails on cell contents.
pub fn row_attributes(row: &Row) -> NetworkAttributes {
    let mut attrs = NetworkAttributes::new();
    for (column, raw) in row.iter() {
        let value = if TEXT_COLUMNS.contains(&column) {
            AttributeValue::Text(raw.to_owned())
        } else {
            match raw.parse::<f64>() {
                Ok(f) if f.is_finite() => AttributeValue::Float(f),
                _ => {
                    tracing::warn!(
                        path = %row.path().display(),
                        line = row.line(),
                        column,
                        value = raw,
                        "attribute is not a finite number, keeping text"
                    );
                    AttributeValue::Text(raw.to_owned())
                }
            }
        };
        attrs.insert(column, value);
    }
    attrs
}

/// Find `network`'s row in an opened table.
pub fn find_attributes<R: Read>(
    table: Table<R>,
    network: &NetworkId,
    policy: DuplicatePolicy,
) -> Result<Option<NetworkAttributes>> {
    table.require_columns(&[ID_COLUMN])?;
    let path = table.path().to_path_buf();
    let mut matches = filter_network(table.rows(), network);

    let Some(first) = matches.next().transpose()? else {
        return Ok(None);
    };
    if policy == DuplicatePolicy::Reject && matches.next().transpose()?.is_some() {
        return Err(Error::DuplicateAttributes { network: network.clone(), path });
    }
    Ok(Some(row_attributes(&first)))
}

/// Join attributes from the table at `path`, degrading to `None` on any
/// trouble reading it.
pub fn join_attributes(
    path: Option<&Path>,
    network: &NetworkId,
    policy: DuplicatePolicy,
) -> Result<Option<NetworkAttributes>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let found = Table::open(path).and_then(|table| find_attributes(table, network, policy));
    match found {
        Ok(Some(attrs)) => Ok(Some(attrs)),
        Ok(None) => {
            tracing::debug!(%network, path = %path.display(), "no attributes row");
            Ok(None)
        }
        Err(e @ Error::DuplicateAttributes { .. }) => Err(e),
        Err(Error::SourceUnavailable { .. }) => {
            tracing::debug!(%network, path = %path.display(), "attributes table unavailable");
            Ok(None)
        }
        Err(e) => {
            tracing::warn!(%network, error = %e, "skipping attributes");
            Ok(None)
        }
    }
}
