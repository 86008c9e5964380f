use chrono::{NaiveDate, NaiveDateTime};

use super::model::CellValue;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Parse one cell as a calendar date.
///
/// Accepts `Date` and `String` cells holding an ISO date, a date-time, or a
/// bare year-month such as `2023-01`. Numbers are never dates.
pub fn parse_date(value: &CellValue) -> Option<NaiveDate> {
    let text = match value {
        CellValue::Date(s) | CellValue::String(s) => s.trim(),
        _ => return None,
    };
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d);
        }
    }
    // Bare year-month: pin the day to the first.
    for (sep, fmt) in [("-", "%Y-%m-%d"), ("/", "%Y/%m/%d"), (".", "%Y.%m.%d")] {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{text}{sep}01"), fmt) {
            return Some(d);
        }
    }
    None
}

/// Render a date as its `YYYY-MM` month label.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Best-effort month normalisation of a whole column.
///
/// When every non-missing cell parses as a date, each becomes a `YYYY-MM`
/// string and missing cells stay `Null`. If any cell fails to parse the
/// column is returned unchanged and the caller proceeds with raw values.
pub fn normalize_months(values: &[CellValue]) -> Vec<CellValue> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        if value.is_missing() {
            out.push(CellValue::Null);
            continue;
        }
        match parse_date(value) {
            Some(date) => out.push(CellValue::String(month_label(date))),
            None => {
                log::debug!("'{value}' is not a date, keeping month column as-is");
                return values.to_vec();
            }
        }
    }
    out
}
