use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    TimeUnit, TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, Table, Workbook};

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Identity of a loaded source: where it came from and what it contained.
/// Two loads of an unchanged file produce equal fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    pub len: usize,
    pub content_hash: u64,
}

impl SourceFingerprint {
    pub fn of(path: &Path, bytes: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        SourceFingerprint {
            path: path.to_path_buf(),
            len: bytes.len(),
            content_hash: hasher.finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Names from `required` that the workbook does not contain, all at once.
pub fn missing_tables(workbook: &Workbook, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| workbook.get(name).is_none())
        .map(|name| name.to_string())
        .collect()
}

/// Outcome of loading a fixed set of named files.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Tables that loaded, in request order, renamed to their logical names.
    pub workbook: Workbook,
    /// Logical names whose file does not exist.
    pub missing: Vec<String>,
    /// Logical names whose file exists but could not be read.
    pub failed: Vec<(String, LoadError)>,
}

impl LoadReport {
    /// Nothing loaded at all: the session cannot render anything.
    pub fn is_fatal(&self) -> bool {
        self.workbook.is_empty()
    }

    /// One line per problem, missing names batched together.
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.missing.is_empty() {
            out.push(format!("Missing: {}", self.missing.join(", ")));
        }
        for (name, err) in &self.failed {
            match err {
                LoadError::Io(_) | LoadError::Unsupported(_) => out.push(format!("'{name}': {err}")),
                _ => out.push(err.to_string()),
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// The last parse of each source path, tagged with the fingerprint it was
/// parsed from. Tables are immutable once loaded, so a hit can be shared
/// freely; a changed file replaces its entry.
#[derive(Debug, Default)]
pub struct LoaderCache {
    entries: HashMap<PathBuf, (SourceFingerprint, Arc<Workbook>)>,
}

impl LoaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a file, parsing it only if its content changed since the last load.
    ///
    /// Supported formats:
    /// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – one table per sheet
    /// * `.csv`     – one table named after the file stem
    /// * `.json`    – `[{ "col": value, ... }, ...]`, one table
    /// * `.parquet` – flat scalar columns, one table
    pub fn load(&mut self, path: &Path) -> Result<(SourceFingerprint, Arc<Workbook>), LoadError> {
        let bytes = read_source(path)?;
        let fingerprint = SourceFingerprint::of(path, &bytes);
        if let Some((cached, hit)) = self.entries.get(path) {
            if *cached == fingerprint {
                log::debug!("cache hit for {}", path.display());
                return Ok((fingerprint, Arc::clone(hit)));
            }
        }
        let workbook = Arc::new(parse_source(path, &bytes)?);
        log::info!(
            "loaded {} ({} table(s))",
            path.display(),
            workbook.len()
        );
        if self
            .entries
            .insert(path.to_path_buf(), (fingerprint.clone(), Arc::clone(&workbook)))
            .is_some()
        {
            log::debug!("replaced stale cache entry for {}", path.display());
        }
        Ok((fingerprint, workbook))
    }

    /// Load a fixed `logical name → file name` map from one directory.
    ///
    /// Each file contributes its first table under the logical name. Problems
    /// are collected per file; a bad file never stops the others.
    pub fn load_directory(
        &mut self,
        dir: &Path,
        files: &[(String, String)],
    ) -> (Vec<SourceFingerprint>, LoadReport) {
        let mut fingerprints = Vec::with_capacity(files.len());
        let mut report = LoadReport::default();

        for (name, file) in files {
            let path = dir.join(file);
            match self.load(&path) {
                Ok((fp, workbook)) => {
                    fingerprints.push(fp);
                    match workbook.tables.first() {
                        Some(table) => {
                            let mut table = table.clone();
                            table.name = name.clone();
                            report.workbook.tables.push(table);
                        }
                        None => report.failed.push((name.clone(), LoadError::Empty(name.clone()))),
                    }
                }
                Err(LoadError::Missing(_)) => {
                    log::warn!("'{name}' not found at {}", path.display());
                    report.missing.push(name.clone());
                }
                Err(err) => {
                    log::warn!("'{name}' failed to load: {err}");
                    report.failed.push((name.clone(), relabel(err, name)));
                }
            }
        }
        (fingerprints, report)
    }
}

/// Report a file-level failure under the table's logical name.
fn relabel(err: LoadError, name: &str) -> LoadError {
    match err {
        LoadError::Empty(_) => LoadError::Empty(name.to_string()),
        LoadError::Malformed { source, .. } => LoadError::Malformed {
            name: name.to_string(),
            source,
        },
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Reading and dispatch
// ---------------------------------------------------------------------------

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string()
}

fn read_source(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => LoadError::Missing(display_name(path)),
        _ => LoadError::Io(err),
    })
}

fn parse_source(path: &Path, bytes: &[u8]) -> Result<Workbook, LoadError> {
    let name = display_name(path);
    if bytes.is_empty() {
        return Err(LoadError::Empty(name));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string();

    let parsed = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => parse_spreadsheet(bytes),
        "csv" => parse_csv(&stem, bytes).map(|t| vec![t]),
        "json" => parse_json(&stem, bytes).map(|t| vec![t]),
        "parquet" | "pq" => parse_parquet(&stem, path).map(|t| vec![t]),
        other => return Err(LoadError::Unsupported(other.to_string())),
    };

    match parsed {
        Ok(tables) if tables.iter().all(|t| t.columns.is_empty()) => Err(LoadError::Empty(name)),
        Ok(tables) => Ok(Workbook::new(tables)),
        Err(source) => Err(LoadError::Malformed { name, source }),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Every sheet becomes a table; the first row of a sheet is its header.
fn parse_spreadsheet(bytes: &[u8]) -> Result<Vec<Table>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).context("opening workbook")?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut tables = Vec::with_capacity(sheet_names.len());
    for sheet_name in &sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .with_context(|| format!("reading sheet '{sheet_name}'"))?;
        tables.push(range_to_table(sheet_name, &range));
    }
    Ok(tables)
}

fn range_to_table(name: &str, range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Data::Empty => format!("Unnamed: {i}"),
                other => other.to_string(),
            })
            .collect(),
        None => Vec::new(),
    };
    let body = rows
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();
    Table::new(name, columns, body)
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => whole_float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => CellValue::Date(iso_datetime(dt)),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::Date(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

/// Spreadsheets store every number as a float; whole ones read back as integers.
fn whole_float(f: f64) -> CellValue {
    CellValue::Float(f).group_key()
}

fn iso_datetime(dt: NaiveDateTime) -> String {
    if dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 {
        dt.date().format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row.
fn parse_csv(name: &str, bytes: &[u8]) -> Result<Table> {
    // Excel-exported CSV files often start with a UTF-8 byte order mark.
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Ok(Table::new(name, Vec::new(), Vec::new()));
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|v| CellValue::guess(v.trim())).collect());
    }
    Ok(Table::new(name, columns, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "월": "2023-01", "총 매출": 100 },
///   { "월": "2023-02", "총 매출": 150 }
/// ]
/// ```
///
/// Columns appear in first-seen key order.
fn parse_json(name: &str, bytes: &[u8]) -> Result<Table> {
    let root: JsonValue = serde_json::from_slice(bytes).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();
    Ok(Table::new(name, columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn parse_parquet(name: &str, path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| arrow_cell(col.as_ref(), row))
                    .collect(),
            );
        }
    }
    Ok(Table::new(name, columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &dyn Array, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => CellValue::Integer(col.as_primitive::<UInt64Type>().value(row) as i64),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Date32 => date_cell(col.as_primitive::<Date32Type>().value_as_date(row)),
        DataType::Timestamp(unit, _) => {
            let dt = match unit {
                TimeUnit::Second => col.as_primitive::<TimestampSecondType>().value_as_datetime(row),
                TimeUnit::Millisecond => col
                    .as_primitive::<TimestampMillisecondType>()
                    .value_as_datetime(row),
                TimeUnit::Microsecond => col
                    .as_primitive::<TimestampMicrosecondType>()
                    .value_as_datetime(row),
                TimeUnit::Nanosecond => col
                    .as_primitive::<TimestampNanosecondType>()
                    .value_as_datetime(row),
            };
            dt.map(|dt| CellValue::Date(iso_datetime(dt)))
                .unwrap_or(CellValue::Null)
        }
        other => CellValue::String(format!("{other:?}")),
    }
}

fn date_cell(date: Option<NaiveDate>) -> CellValue {
    date.map(|d| CellValue::Date(d.format("%Y-%m-%d").to_string()))
        .unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_workbook(path: &Path) -> Result<Workbook, LoadError> {
        LoaderCache::new().load(path).map(|(_, wb)| (*wb).clone())
    }

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents).unwrap();
        path
    }

    #[test]
    fn csv_becomes_one_table_named_after_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "sales.csv", "월,총 매출\n2023-01,100\n2023-02,150.5\n".as_bytes());
        let wb = load_workbook(&path).unwrap();
        let t = wb.get("sales").unwrap();
        assert_eq!(t.columns, vec!["월", "총 매출"]);
        assert_eq!(t.rows[0], vec![CellValue::from("2023-01"), CellValue::Integer(100)]);
        assert_eq!(t.rows[1][1], CellValue::Float(150.5));
    }

    #[test]
    fn csv_with_bom_keeps_first_header_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.csv", b"\xEF\xBB\xBFname,value\nx,1\n");
        let wb = load_workbook(&path).unwrap();
        assert_eq!(wb.tables[0].columns[0], "name");
    }

    #[test]
    fn json_records_keep_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "pie.json",
            br#"[{"zone":"A","share":1.5},{"zone":"B","share":2,"note":null}]"#,
        );
        let t = load_workbook(&path).unwrap().tables.remove(0);
        assert_eq!(t.columns, vec!["zone", "share", "note"]);
        assert_eq!(t.rows[0][2], CellValue::Null);
        assert_eq!(t.rows[1][1], CellValue::Integer(2));
    }

    #[test]
    fn spreadsheet_sheets_become_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let mut book = rust_xlsxwriter::Workbook::new();
        let sheet = book.add_worksheet();
        sheet.set_name("파이차트").unwrap();
        sheet.write_string(0, 0, "항목").unwrap();
        sheet.write_string(0, 1, "값").unwrap();
        sheet.write_string(1, 0, "A").unwrap();
        sheet.write_number(1, 1, 30.0).unwrap();
        sheet.write_string(2, 0, "B").unwrap();
        sheet.write_number(2, 1, 12.5).unwrap();
        let second = book.add_worksheet();
        second.set_name("산점도").unwrap();
        second.write_string(0, 0, "x").unwrap();
        book.save(&path).unwrap();

        let wb = load_workbook(&path).unwrap();
        assert_eq!(wb.table_names(), vec!["파이차트", "산점도"]);
        let pie = wb.get("파이차트").unwrap();
        assert_eq!(pie.columns, vec!["항목", "값"]);
        assert_eq!(pie.rows[0][1], CellValue::Integer(30));
        assert_eq!(pie.rows[1][1], CellValue::Float(12.5));
        assert!(wb.get("산점도").unwrap().is_empty());
    }

    #[test]
    fn parquet_scalar_columns_load() {
        use arrow::array::{Float64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scatter.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("label", DataType::Utf8, true),
            Field::new("y", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("a"), None])),
                Arc::new(Float64Array::from(vec![1.0, 2.5])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let t = load_workbook(&path).unwrap().tables.remove(0);
        assert_eq!(t.columns, vec!["label", "y"]);
        assert_eq!(t.rows[1], vec![CellValue::Null, CellValue::Float(2.5)]);
    }

    #[test]
    fn missing_empty_and_unsupported_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_workbook(&dir.path().join("nope.csv")),
            Err(LoadError::Missing(_))
        ));
        let empty = write_file(dir.path(), "empty.csv", b"");
        assert!(matches!(load_workbook(&empty), Err(LoadError::Empty(_))));
        let txt = write_file(dir.path(), "notes.txt", b"hello");
        assert!(matches!(load_workbook(&txt), Err(LoadError::Unsupported(ext)) if ext == "txt"));
        let bad = write_file(dir.path(), "bad.json", b"{not json");
        assert!(matches!(load_workbook(&bad), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn missing_tables_are_batched() {
        let wb = Workbook::new(vec![Table::new("파이차트", vec!["a".into()], vec![])]);
        assert_eq!(
            missing_tables(&wb, &["바차트_히스토그램", "파이차트", "산점도"]),
            vec!["바차트_히스토그램", "산점도"]
        );
    }

    #[test]
    fn cache_reuses_unchanged_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "t.csv", b"a,b\n1,2\n");
        let mut cache = LoaderCache::new();
        let (fp1, wb1) = cache.load(&path).unwrap();
        let (fp2, wb2) = cache.load(&path).unwrap();
        assert_eq!(fp1, fp2);
        assert!(Arc::ptr_eq(&wb1, &wb2));
        assert_eq!(cache.entries.len(), 1);

        write_file(dir.path(), "t.csv", b"a,b\n1,3\n");
        let (fp3, wb3) = cache.load(&path).unwrap();
        assert_ne!(fp1, fp3);
        assert!(!Arc::ptr_eq(&wb1, &wb3));
        assert_eq!(cache.entries.len(), 1);
    }

    #[test]
    fn cache_holds_one_entry_per_edited_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = LoaderCache::new();
        let mut last = None;
        for i in 0..5 {
            let path = write_file(dir.path(), "t.csv", format!("a,b\n1,{i}\n").as_bytes());
            let (_, wb) = cache.load(&path).unwrap();
            assert_eq!(wb.tables[0].rows[0][1], CellValue::Integer(i));
            last = Some(wb);
        }
        assert_eq!(cache.entries.len(), 1);
        let (_, again) = cache.load(&dir.path().join("t.csv")).unwrap();
        assert!(Arc::ptr_eq(&again, &last.unwrap()));
    }

    #[test]
    fn failed_tables_are_named_in_messages() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "budget.csv", b"year,share\n2022,1.5\n");
        write_file(dir.path(), "notes.txt", b"hello");
        write_file(dir.path(), "broken.csv", b"");
        let files = vec![
            ("예산".to_string(), "budget.csv".to_string()),
            ("주관적건강".to_string(), "notes.txt".to_string()),
            ("기관현황".to_string(), "broken.csv".to_string()),
        ];
        let (_, report) = LoaderCache::new().load_directory(dir.path(), &files);
        let messages = report.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "'주관적건강': unsupported file extension: .txt");
        assert_eq!(messages[1], "'기관현황' is empty");
    }

    #[test]
    fn spreadsheet_dates_become_month_labels() {
        use rust_xlsxwriter::{ExcelDateTime, Format};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let mut book = rust_xlsxwriter::Workbook::new();
        let sheet = book.add_worksheet();
        sheet.set_name("바차트_히스토그램").unwrap();
        sheet.write_string(0, 0, "월").unwrap();
        sheet.write_string(0, 1, "총 매출").unwrap();
        let date = ExcelDateTime::from_ymd(2024, 3, 15).unwrap();
        let format = Format::new().set_num_format("yyyy-mm-dd");
        sheet.write_datetime_with_format(1, 0, &date, &format).unwrap();
        sheet.write_number(1, 1, 1200.0).unwrap();
        book.save(&path).unwrap();

        let wb = load_workbook(&path).unwrap();
        let table = wb.get("바차트_히스토그램").unwrap();
        assert_eq!(table.rows[0][0], CellValue::Date("2024-03-15".into()));

        let (series, x_label, _) =
            crate::chart::pipelines::bar_series(table, "월", "총 매출").unwrap();
        assert_eq!(x_label, "월");
        assert_eq!(series.x, vec![CellValue::from("2024-03")]);
        assert_eq!(series.y, vec![CellValue::Integer(1200)]);
    }

    #[test]
    fn directory_report_separates_missing_and_failed() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "budget.csv", b"year,share\n2022,1.5\n");
        write_file(dir.path(), "broken.csv", b"");
        let files = vec![
            ("예산".to_string(), "budget.csv".to_string()),
            ("기관현황".to_string(), "broken.csv".to_string()),
            ("진료정보".to_string(), "absent.csv".to_string()),
            ("상병그룹".to_string(), "absent2.csv".to_string()),
        ];
        let (_, report) = LoaderCache::new().load_directory(dir.path(), &files);
        assert_eq!(report.workbook.table_names(), vec!["예산"]);
        assert_eq!(report.missing, vec!["진료정보", "상병그룹"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "기관현황");
        assert!(!report.is_fatal());
        assert_eq!(report.messages()[0], "Missing: 진료정보, 상병그룹");
    }

    #[test]
    fn nothing_loaded_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![("예산".to_string(), "budget.csv".to_string())];
        let (_, report) = LoaderCache::new().load_directory(dir.path(), &files);
        assert!(report.is_fatal());
    }
}
