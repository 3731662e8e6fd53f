//! Dense count tables.
//!
//! A `PivotTable` counts `(row, column)` pairs and answers zero for any combination that never
//! occurred. Rows and columns are kept in ascending order.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotTable<R: Ord, C: Ord> {
    columns: BTreeSet<C>,
    counts: BTreeMap<R, BTreeMap<C, u64>>,
}

impl<R: Ord, C: Ord> Default for PivotTable<R, C> {
    fn default() -> Self {
        Self {
            columns: BTreeSet::new(),
            counts: BTreeMap::new(),
        }
    }
}

impl<R: Ord + Clone, C: Ord + Clone> PivotTable<R, C> {
    /// Count occurrences of each `(row, column)` pair
    pub fn count<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
    {
        let mut table = Self::default();
        for (row, column) in pairs {
            table.columns.insert(column.clone());
            *table.counts.entry(row).or_default().entry(column).or_insert(0) += 1;
        }
        table
    }

    /// Ensure the given columns appear even when nothing was counted in them
    pub fn with_columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
    {
        self.columns.extend(columns);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.counts.keys()
    }

    pub fn columns(&self) -> impl Iterator<Item = &C> {
        self.columns.iter()
    }

    pub fn row_count(&self) -> usize {
        self.counts.len()
    }

    /// Count for one cell, zero when the pair never occurred
    pub fn get(&self, row: &R, column: &C) -> u64 {
        self.counts
            .get(row)
            .and_then(|cells| cells.get(column))
            .copied()
            .unwrap_or(0)
    }

    /// One row's counts in column order
    pub fn row_values(&self, row: &R) -> Vec<u64> {
        self.columns.iter().map(|c| self.get(row, c)).collect()
    }

    /// One column's counts in row order
    pub fn column_values(&self, column: &C) -> Vec<u64> {
        self.counts.keys().map(|r| self.get(r, column)).collect()
    }

    pub fn row_total(&self, row: &R) -> u64 {
        self.counts.get(row).map(|cells| cells.values().sum()).unwrap_or(0)
    }

    pub fn column_total(&self, column: &C) -> u64 {
        self.counts.values().filter_map(|cells| cells.get(column)).sum()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().flat_map(|cells| cells.values()).sum()
    }
}

/// Serialized form: `{"columns": [...], "rows": [{"key": .., "values": [..]}]}`
#[derive(Serialize)]
struct PivotRow<'a, R> {
    key: &'a R,
    values: Vec<u64>,
}

impl<R, C> Serialize for PivotTable<R, C>
where
    R: Ord + Clone + Serialize,
    C: Ord + Clone + Serialize,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let rows: Vec<PivotRow<'_, R>> = self
            .counts
            .keys()
            .map(|key| PivotRow {
                key,
                values: self.row_values(key),
            })
            .collect();

        let mut state = serializer.serialize_struct("PivotTable", 2)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}
