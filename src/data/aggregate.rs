use std::collections::{BTreeMap, BTreeSet};

use super::error::AggregateError;
use super::filter::{RowFilter, filter_table};
use super::model::{CellValue, Table, compare_for_sort};
use super::select::named;

/// Numeric reading of a value cell. Missing cells yield `None`; text that
/// only differs from a number by thousands separators is accepted.
fn numeric(table: &Table, col: usize, row: usize) -> Result<Option<f64>, AggregateError> {
    let value = &table.rows[row][col];
    if value.is_missing() {
        return Ok(None);
    }
    if let Some(v) = value.as_f64() {
        return Ok(Some(v));
    }
    if let CellValue::String(s) = value {
        if let Ok(v) = s.trim().replace(',', "").parse::<f64>() {
            return Ok(Some(v));
        }
    }
    Err(AggregateError::NonNumeric {
        column: table.columns[col].clone(),
        row,
        value: value.to_string(),
    })
}

/// Sum of a value column; missing cells are skipped, no rows sum to zero.
pub fn sum_column(table: &Table, value_col: &str) -> Result<f64, AggregateError> {
    let col = named(table, value_col)?;
    let mut total = 0.0;
    for row in 0..table.len() {
        total += numeric(table, col, row)?.unwrap_or(0.0);
    }
    Ok(total)
}

/// Arithmetic mean over the non-missing cells of a column.
pub fn mean_column(table: &Table, value_col: &str) -> Result<f64, AggregateError> {
    let col = named(table, value_col)?;
    let mut total = 0.0;
    let mut count = 0usize;
    for row in 0..table.len() {
        if let Some(v) = numeric(table, col, row)? {
            total += v;
            count += 1;
        }
    }
    if count == 0 {
        return Err(AggregateError::Empty(value_col.to_string()));
    }
    Ok(total / count as f64)
}

/// Value of a column in the last row.
pub fn last_value(table: &Table, value_col: &str) -> Result<f64, AggregateError> {
    let col = named(table, value_col)?;
    let last = table
        .len()
        .checked_sub(1)
        .ok_or_else(|| AggregateError::Empty(value_col.to_string()))?;
    numeric(table, col, last)?.ok_or_else(|| AggregateError::Empty(value_col.to_string()))
}

/// One `(group, total)` pair per distinct group value, ascending by group key.
///
/// Numerically equal keys (`2022` and `2022.0`) form one group, and numeric
/// keys are ordered by value. Rows with a missing group key are left out;
/// missing values count as zero.
pub fn sum_by_group(
    table: &Table,
    group_col: &str,
    value_col: &str,
) -> Result<Vec<(CellValue, f64)>, AggregateError> {
    let group = named(table, group_col)?;
    let value = named(table, value_col)?;

    let mut totals: BTreeMap<CellValue, f64> = BTreeMap::new();
    for (row, cells) in table.rows.iter().enumerate() {
        let key = &cells[group];
        if key.is_missing() {
            continue;
        }
        let v = numeric(table, value, row)?.unwrap_or(0.0);
        *totals.entry(key.group_key()).or_insert(0.0) += v;
    }
    let mut groups: Vec<(CellValue, f64)> = totals.into_iter().collect();
    groups.sort_by(|a, b| compare_for_sort(&a.0, &b.0));
    Ok(groups)
}

/// The group with the largest total. Ties go to the group that comes first
/// in key order.
pub fn argmax_group(
    table: &Table,
    group_col: &str,
    value_col: &str,
) -> Result<CellValue, AggregateError> {
    let mut best: Option<(CellValue, f64)> = None;
    for (key, total) in sum_by_group(table, group_col, value_col)? {
        match &best {
            Some((_, top)) if total <= *top => {}
            _ => best = Some((key, total)),
        }
    }
    best.map(|(key, _)| key)
        .ok_or_else(|| AggregateError::Empty(group_col.to_string()))
}

/// Keys of the `n` groups with the largest totals, largest first.
/// Equal totals keep key order. Fewer than `n` groups returns them all.
pub fn top_n_groups(
    table: &Table,
    group_col: &str,
    value_col: &str,
    n: usize,
) -> Result<Vec<CellValue>, AggregateError> {
    let mut totals = sum_by_group(table, group_col, value_col)?;
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(totals.into_iter().take(n).map(|(key, _)| key).collect())
}

/// Rows of the original table that belong to the `n` largest groups.
/// Per-row granularity and row order are preserved.
pub fn top_n_filter(
    table: &Table,
    group_col: &str,
    value_col: &str,
    n: usize,
) -> Result<Table, AggregateError> {
    let top: BTreeSet<CellValue> = top_n_groups(table, group_col, value_col, n)?
        .into_iter()
        .collect();
    // The filter matches raw cells, so admit every spelling of a kept key.
    let col = named(table, group_col)?;
    let keys: BTreeSet<CellValue> = table
        .column(col)
        .filter(|v| top.contains(&v.group_key()))
        .cloned()
        .collect();
    let mut filter = RowFilter::new();
    filter.insert(group_col.to_string(), keys);
    Ok(filter_table(table, &filter)?)
}
