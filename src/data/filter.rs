use std::collections::{BTreeMap, BTreeSet};

use super::error::SchemaError;
use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Filter predicate: which values are accepted per column
// ---------------------------------------------------------------------------

/// Per-column acceptance sets: maps column_name → set of accepted values.
/// A column absent from the map is unconstrained.
pub type RowFilter = BTreeMap<String, BTreeSet<CellValue>>;

/// Filter accepting rows whose `column` equals `value`.
pub fn equals(column: &str, value: CellValue) -> RowFilter {
    let mut filter = RowFilter::new();
    filter.insert(column.to_string(), BTreeSet::from([value]));
    filter
}

/// Return indices of rows that pass all filters, in table order.
///
/// A row passes a column filter when:
/// * The filter set for that column is empty → nothing accepted → fails
/// * The row's value for that column is in the accepted set → passes
///
/// Filtering on a column the table does not have is a schema error.
pub fn filtered_indices(table: &Table, filters: &RowFilter) -> Result<Vec<usize>, SchemaError> {
    let mut resolved = Vec::with_capacity(filters.len());
    let mut missing = Vec::new();
    for (col, accepted) in filters {
        match table.column_index(col) {
            Some(idx) => resolved.push((idx, accepted)),
            None => missing.push(col.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns(missing));
    }

    Ok(table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            resolved
                .iter()
                .all(|(idx, accepted)| accepted.contains(&row[*idx]))
        })
        .map(|(i, _)| i)
        .collect())
}

/// Apply a filter and return the surviving rows as a new table.
pub fn filter_table(table: &Table, filters: &RowFilter) -> Result<Table, SchemaError> {
    let indices = filtered_indices(table, filters)?;
    Ok(table.select_rows(&indices))
}
