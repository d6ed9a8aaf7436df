//! Sparse, incrementally built time-series table: a dense numeric matrix with
//! rows indexed by sample instant and columns by series name.

use crate::indexer::Indexer;
use crate::types::{Timestamp, Value};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A time-indexed, column-indexed numeric table.
///
/// Rows are addressed through an `Indexer<Timestamp>`, columns through an
/// `Indexer<String>`; both issue stable indices into the row-major `data`
/// matrix, so the matrix never needs reshuffling when the ordered views are
/// lazily sorted.
///
/// A `Dataset` is built by a single generator call and afterwards only
/// mutated by its owner; the report cache hands out independent clones, so
/// none of these methods need to be safe for concurrent use on one instance.
/// The getters take `&mut self` because producing the ordered view may sort
/// the underlying key vectors in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    timestamps: Indexer<Timestamp>,
    columns: Indexer<String>,
    /// Row-major values; `data[row][col]` with stable indexer indices.
    data: Vec<Vec<Value>>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Dataset::default()
    }

    /// Adds `value` into the cell at (`timestamp`, `column`), creating the
    /// row and/or column as needed.
    ///
    /// A new column is backfilled with zeroes for every existing row; a new
    /// row starts with a zero for every existing column. Addition is
    /// accumulative: repeated contributions at the same coordinates sum up,
    /// they never overwrite.
    pub fn add(&mut self, timestamp: Timestamp, column: &str, value: Value) {
        let (row, new_row) = self.timestamps.add(timestamp);
        if new_row {
            self.data.push(vec![0.0; self.columns.count()]);
        }
        let (col, new_col) = self.columns.add(column.to_string());
        if new_col {
            for r in self.data.iter_mut() {
                r.push(0.0);
            }
        }
        self.data[row][col] += value;
    }

    /// Appends a derived column computed per row from the current columns.
    ///
    /// For every row, `derive` receives a map of column name to the row's
    /// current value and returns the new column's value for that row. Rows
    /// are evaluated in parallel. If `name` already exists its cells are
    /// replaced by the derived values.
    pub fn add_column<F>(&mut self, name: &str, derive: F)
    where
        F: Fn(&HashMap<String, Value>) -> Value + Sync,
    {
        let columns = &self.columns;
        let derived: Vec<Value> = self
            .data
            .par_iter()
            .map(|row| {
                let mut by_name = HashMap::with_capacity(columns.count());
                for (col, ci) in columns.entries() {
                    by_name.insert(col.clone(), row[ci]);
                }
                derive(&by_name)
            })
            .collect();

        let (ci, inserted) = self.columns.add(name.to_string());
        for (row, value) in self.data.iter_mut().zip(derived) {
            if inserted {
                row.push(value);
            } else {
                row[ci] = value;
            }
        }
    }

    /// All sample instants, ascending.
    pub fn get_timestamps(&mut self) -> Vec<Timestamp> {
        self.timestamps.list().to_vec()
    }

    /// All column names, ascending lexicographically.
    pub fn get_columns(&mut self) -> Vec<String> {
        self.columns.list().to_vec()
    }

    /// The column's values ordered to match [`Dataset::get_timestamps`], or
    /// `None` if the column does not exist.
    pub fn get_values(&mut self, column: &str) -> Option<Vec<Value>> {
        let ci = self.columns.get_index(column)?;
        let order = self.row_order();
        Some(order.into_iter().map(|ri| self.data[ri][ci]).collect())
    }

    /// Drops all rows outside `[from, to]`. A zero bound is unbounded on that
    /// side, so `filter_by_range(0, 0)` is a no-op. The timestamp index and
    /// row matrix are rebuilt only if at least one row is removed.
    pub fn filter_by_range(&mut self, from: Timestamp, to: Timestamp) {
        if from == 0 && to == 0 {
            return;
        }
        let keep = |ts: Timestamp| (from == 0 || ts >= from) && (to == 0 || ts <= to);

        let mut rows: Vec<(Timestamp, usize)> =
            self.timestamps.entries().map(|(ts, ri)| (*ts, ri)).collect();
        if rows.iter().all(|&(ts, _)| keep(ts)) {
            return;
        }
        // Rebuild in stable-index order so surviving rows keep their relative
        // insertion order.
        rows.sort_unstable_by_key(|&(_, ri)| ri);

        let mut timestamps = Indexer::new();
        let mut data = Vec::new();
        for (ts, ri) in rows {
            if keep(ts) {
                timestamps.add(ts);
                data.push(std::mem::take(&mut self.data[ri]));
            }
        }
        self.timestamps = timestamps;
        self.data = data;
    }

    /// Replaces each column's values with the running sum across ascending
    /// timestamp order, in place.
    pub fn accumulate(&mut self) {
        let order = self.row_order();
        for ci in 0..self.columns.count() {
            let mut sum = 0.0;
            for &ri in &order {
                sum += self.data[ri][ci];
                self.data[ri][ci] = sum;
            }
        }
    }

    /// Number of distinct sample instants (rows).
    pub fn size(&self) -> usize {
        self.timestamps.count()
    }

    /// Snapshots the table into the wire-facing shape consumed by dashboard
    /// adapters: ascending timestamps, lexicographic column names, and one
    /// value series per column aligned to the timestamp axis.
    pub fn to_table(&mut self) -> ReportTable {
        let timestamps = self.get_timestamps();
        let columns = self.get_columns();
        let series = columns
            .iter()
            .map(|c| self.get_values(c).unwrap_or_default())
            .collect();
        ReportTable {
            timestamps,
            columns,
            series,
        }
    }

    /// Stable row indices in ascending timestamp order.
    fn row_order(&mut self) -> Vec<usize> {
        let ordered = self.timestamps.list().to_vec();
        ordered
            .iter()
            .filter_map(|ts| self.timestamps.get_index(ts))
            .collect()
    }
}

/// Serializable snapshot of a [`Dataset`], one value series per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub timestamps: Vec<Timestamp>,
    pub columns: Vec<String>,
    /// `series[i]` holds the values of `columns[i]`, aligned to `timestamps`.
    pub series: Vec<Vec<Value>>,
}
