//! Table → chart-ready series. Every pipeline is a pure function of one
//! table; none depends on another's output.

use crate::data::dates::normalize_months;
use crate::data::error::{PipelineError, SchemaError};
use crate::data::model::{CellValue, Table};
use crate::data::select::{ColumnRef, first_two, select_columns};

use super::pareto::pareto;
use super::series::ChartSeries;

/// A series plus the x / y axis titles taken from the source headers.
pub type Labeled = (ChartSeries, String, String);

fn column_values(table: &Table, idx: usize) -> Vec<CellValue> {
    table.column(idx).cloned().collect()
}

fn labeled(table: &Table, x: usize, y: usize, series: ChartSeries) -> Labeled {
    (series, table.columns[x].clone(), table.columns[y].clone())
}

/// Bar chart over named month / value columns. The month column is
/// normalised to `YYYY-MM` when it parses as dates; values pass through.
pub fn bar_series(table: &Table, month_col: &str, value_col: &str) -> Result<Labeled, SchemaError> {
    let idx = select_columns(table, &[ColumnRef::named(month_col), ColumnRef::named(value_col)])?;
    let x = normalize_months(&column_values(table, idx[0]));
    let series = ChartSeries::new(x, column_values(table, idx[1]))?;
    Ok(labeled(table, idx[0], idx[1], series))
}

/// Time series over the first two columns; the first is normalised to months.
pub fn time_series(table: &Table) -> Result<Labeled, SchemaError> {
    let (x, y) = first_two(table)?;
    let series = ChartSeries::new(
        normalize_months(&column_values(table, x)),
        column_values(table, y),
    )?;
    Ok(labeled(table, x, y, series))
}

/// Pie chart: first column is the slice label, second the slice value.
pub fn pie_series(table: &Table) -> Result<Labeled, SchemaError> {
    positional_passthrough(table)
}

/// Scatter plot: first two columns as (x, y), every row kept.
pub fn scatter_series(table: &Table) -> Result<Labeled, SchemaError> {
    positional_passthrough(table)
}

fn positional_passthrough(table: &Table) -> Result<Labeled, SchemaError> {
    let (x, y) = first_two(table)?;
    let series = ChartSeries::new(column_values(table, x), column_values(table, y))?;
    Ok(labeled(table, x, y, series))
}

/// Pareto chart over the first two columns: values sorted descending with the
/// cumulative percentage as the secondary series.
pub fn pareto_series(table: &Table) -> Result<Labeled, PipelineError> {
    let (x, y) = first_two(table)?;
    let pairs: Vec<(CellValue, CellValue)> = table
        .rows
        .iter()
        .map(|row| (row[x].clone(), row[y].clone()))
        .collect();
    let rows = pareto(&pairs)?;

    let mut labels = Vec::with_capacity(rows.len());
    let mut values = Vec::with_capacity(rows.len());
    let mut shares = Vec::with_capacity(rows.len());
    for row in rows {
        labels.push(row.label);
        values.push(CellValue::Float(row.value));
        shares.push(row.cumulative_pct);
    }
    let series = ChartSeries::new(labels, values)?.with_secondary(shares)?;
    Ok(labeled(table, x, y, series))
}

/// Named x / y columns, optionally split into one line per `group` value.
pub fn named_series(
    table: &Table,
    x_col: &str,
    y_col: &str,
    group_col: Option<&str>,
) -> Result<Labeled, SchemaError> {
    let mut refs = vec![ColumnRef::named(x_col), ColumnRef::named(y_col)];
    if let Some(g) = group_col {
        refs.push(ColumnRef::named(g));
    }
    let idx = select_columns(table, &refs)?;
    let mut series = ChartSeries::new(column_values(table, idx[0]), column_values(table, idx[1]))?;
    if let Some(&g) = idx.get(2) {
        series = series.with_group(column_values(table, g))?;
    }
    Ok(labeled(table, idx[0], idx[1], series))
}

/// Several value columns against one x column, one group per value column.
pub fn wide_series(table: &Table, x_col: &str, y_cols: &[&str]) -> Result<Labeled, SchemaError> {
    let mut refs = vec![ColumnRef::named(x_col)];
    refs.extend(y_cols.iter().map(|c| ColumnRef::named(c)));
    let idx = select_columns(table, &refs)?;

    let mut x = Vec::with_capacity(table.len() * y_cols.len());
    let mut y = Vec::with_capacity(x.capacity());
    let mut group = Vec::with_capacity(x.capacity());
    for (col, &y_idx) in y_cols.iter().zip(&idx[1..]) {
        for row in &table.rows {
            x.push(row[idx[0]].clone());
            y.push(row[y_idx].clone());
            group.push(CellValue::from(*col));
        }
    }
    let series = ChartSeries::new(x, y)?.with_group(group)?;
    Ok((series, x_col.to_string(), "value".to_string()))
}
