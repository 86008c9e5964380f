/// Data layer: core types, loading, selection, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse source → Workbook (cached by content hash)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named columns, rows of CellValue
///   └──────────┘
///        │
///        ├──────────────┬───────────────┐
///        ▼              ▼               ▼
///   ┌──────────┐  ┌───────────┐  ┌────────────┐
///   │  select   │  │  filter    │  │ aggregate   │
///   └──────────┘  └───────────┘  └────────────┘
///     columns by     rows by         sums, arg-max,
///     name/position  value sets      top-N
/// ```

pub mod aggregate;
pub mod dates;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod select;
