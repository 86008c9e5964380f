/// Chart layer: turns tables into chart-ready series.
///
/// ```text
///   Table ──► pipelines ──► ChartSeries ──► Chart { title, kind, body }
///                │                              │
///                └── pareto (sort + cumulative) └── Series | Placeholder
/// ```

pub mod pareto;
pub mod pipelines;
pub mod series;

pub use series::{Chart, ChartKind, ChartSeries};
