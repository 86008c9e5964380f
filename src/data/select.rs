use super::error::SchemaError;
use super::model::Table;

/// How a pipeline refers to one of its input columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    /// Exact header name.
    Named(String),
    /// Zero-based position, whatever the header says.
    Position(usize),
}

impl ColumnRef {
    pub fn named(name: &str) -> Self {
        ColumnRef::Named(name.to_string())
    }
}

/// Resolve column references to indices.
///
/// Named references that do not exist are reported together. Positional
/// references require the table to be at least as wide as the largest position.
pub fn select_columns(table: &Table, refs: &[ColumnRef]) -> Result<Vec<usize>, SchemaError> {
    let needed = refs
        .iter()
        .filter_map(|r| match r {
            ColumnRef::Position(p) => Some(p + 1),
            ColumnRef::Named(_) => None,
        })
        .max()
        .unwrap_or(0);
    if table.width() < needed {
        return Err(SchemaError::TooFewColumns {
            needed,
            found: table.width(),
        });
    }

    let missing: Vec<String> = refs
        .iter()
        .filter_map(|r| match r {
            ColumnRef::Named(name) if table.column_index(name).is_none() => Some(name.clone()),
            _ => None,
        })
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns(missing));
    }

    Ok(refs
        .iter()
        .map(|r| match r {
            ColumnRef::Position(p) => *p,
            ColumnRef::Named(name) => table.column_index(name).unwrap_or_default(),
        })
        .collect())
}

/// The first two columns, for pipelines that ignore header names.
pub fn first_two(table: &Table) -> Result<(usize, usize), SchemaError> {
    let idx = select_columns(table, &[ColumnRef::Position(0), ColumnRef::Position(1)])?;
    Ok((idx[0], idx[1]))
}

/// One column by exact name.
pub fn named(table: &Table, name: &str) -> Result<usize, SchemaError> {
    table
        .column_index(name)
        .ok_or_else(|| SchemaError::MissingColumns(vec![name.to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn table(columns: &[&str]) -> Table {
        Table::new(
            "t",
            columns.iter().map(|c| c.to_string()).collect(),
            vec![columns.iter().map(|_| CellValue::Integer(1)).collect()],
        )
    }

    #[test]
    fn named_columns_resolve_to_indices() {
        let t = table(&["월", "총 매출", "비고"]);
        let idx = select_columns(&t, &[ColumnRef::named("총 매출"), ColumnRef::named("월")]);
        assert_eq!(idx, Ok(vec![1, 0]));
    }

    #[test]
    fn all_missing_names_are_reported_together() {
        let t = table(&["a"]);
        let err = select_columns(&t, &[ColumnRef::named("월"), ColumnRef::named("총 매출")]);
        assert_eq!(
            err,
            Err(SchemaError::MissingColumns(vec!["월".into(), "총 매출".into()]))
        );
    }

    #[test]
    fn positional_needs_enough_columns() {
        let t = table(&["only"]);
        assert_eq!(
            first_two(&t),
            Err(SchemaError::TooFewColumns { needed: 2, found: 1 })
        );
        assert_eq!(first_two(&table(&["x", "y", "z"])), Ok((0, 1)));
    }
}
