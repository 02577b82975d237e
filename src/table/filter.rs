//! Network Row Filter: the rows of one network, in table order.

use crate::model::NetworkId;
use crate::Result;

use super::{Row, ID_COLUMN};

/// Rows whose `id` cell names `target`. See [`filter_network`].
pub struct NetworkRows<I> {
    rows: I,
    target: NetworkId,
}

/// Keep only the rows belonging to `target`, compared by normalized id text.
///
/// Read errors pass through so the caller sees them in order. No match is
/// simply an empty sequence.
pub fn filter_network<I>(rows: I, target: &NetworkId) -> NetworkRows<I>
where
    I: Iterator<Item = Result<Row>>,
{
    NetworkRows { rows, target: target.clone() }
}

impl<I> Iterator for NetworkRows<I>
where
    I: Iterator<Item = Result<Row>>,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.rows.next()? {
                Ok(row) => row,
                Err(e) => return Some(Err(e)),
            };
            match row.require(ID_COLUMN) {
                Ok(raw) if self.target.matches(raw) => return Some(Ok(row)),
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
