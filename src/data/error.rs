use thiserror::Error;

/// Why a table could not be produced from a source.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The requested table or file does not exist.
    #[error("'{0}' not found")]
    Missing(String),

    /// The source exists but has no bytes or no header row.
    #[error("'{0}' is empty")]
    Empty(String),

    #[error("unsupported file extension: .{0}")]
    Unsupported(String),

    /// The source exists but could not be parsed.
    #[error("'{name}' could not be read: {source:#}")]
    Malformed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A table does not have the shape a pipeline expects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("missing column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("at least {needed} columns are required, found {found}")]
    TooFewColumns { needed: usize, found: usize },

    #[error("series lengths differ: x has {x}, y has {y}")]
    LengthMismatch { x: usize, y: usize },
}

/// An aggregate has no well-defined result for its input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("no values to aggregate in '{0}'")]
    Empty(String),

    #[error("'{column}' row {row}: '{value}' is not a number")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Inputs the Pareto computation refuses.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParetoError {
    #[error("negative value {value} for '{label}'")]
    NegativeValue { label: String, value: f64 },

    #[error("all values are zero, cumulative share is undefined")]
    ZeroTotal,
}

/// Why a chart or KPI could not be produced; shown in its place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("'{0}' sheet missing")]
    MissingTable(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Pareto(#[from] ParetoError),
}
