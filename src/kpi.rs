use crate::data::error::PipelineError;

// ---------------------------------------------------------------------------
// KPI scalars
// ---------------------------------------------------------------------------

/// One headline figure, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub label: String,
    /// Formatted value, or the reason it could not be computed.
    pub value: Result<String, String>,
}

impl Kpi {
    /// Compute and format a figure; failures are kept as their message.
    pub fn compute<T>(
        label: &str,
        compute: impl FnOnce() -> Result<T, PipelineError>,
        format: impl FnOnce(T) -> String,
    ) -> Self {
        let value = compute().map(format).map_err(|err| {
            log::warn!("KPI '{label}': {err}");
            err.to_string()
        });
        Kpi {
            label: label.to_string(),
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Insert `,` every three digits of the integer part.
pub fn add_thousands_separator(s: &str) -> String {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int_part, frac_part) = match digits.find('.') {
        Some(pos) => digits.split_at(pos),
        None => (digits, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}{frac_part}")
}

/// Whole-number count with thousands separators: `1234567.4` → `1,234,567`.
pub fn format_count(value: f64) -> String {
    add_thousands_separator(&format!("{:.0}", value))
}

/// Percentage with a fixed number of decimals: `(12.345, 1)` → `12.3%`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::AggregateError;

    #[test]
    fn test_thousands_separator() {
        assert_eq!(add_thousands_separator("1234567"), "1,234,567");
        assert_eq!(add_thousands_separator("123"), "123");
        assert_eq!(add_thousands_separator("-1234.56"), "-1,234.56");
        assert_eq!(add_thousands_separator("100000"), "100,000");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1234567.4), "1,234,567");
        assert_eq!(format_count(999.6), "1,000");
        assert_eq!(format_count(0.0), "0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(42.46, 1), "42.5%");
        assert_eq!(format_percent(7.0, 2), "7.00%");
    }

    #[test]
    fn failed_kpi_keeps_message() {
        let kpi = Kpi::compute(
            "Top disease",
            || -> Result<String, PipelineError> {
                Err(AggregateError::Empty("주상병명".into()).into())
            },
            |v| v,
        );
        assert_eq!(kpi.value, Err("no values to aggregate in '주상병명'".to_string()));
    }

    #[test]
    fn successful_kpi_is_formatted() {
        let kpi = Kpi::compute("Patients", || Ok(12345.0), format_count);
        assert_eq!(kpi.value, Ok("12,345".to_string()));
    }
}
