use crate::data::error::ParetoError;
use crate::data::model::CellValue;

/// One bar of a Pareto chart with its running share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct ParetoRow {
    pub label: CellValue,
    pub value: f64,
    /// Cumulative share in percent, rounded to two decimals.
    pub cumulative_pct: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Sort `(label, value)` pairs descending by value and attach cumulative
/// percentages.
///
/// Pairs whose value is missing or not a number are dropped. The sort is
/// stable, so equal values keep their input order. Negative values and an
/// all-zero total are rejected rather than producing a meaningless curve.
pub fn pareto(pairs: &[(CellValue, CellValue)]) -> Result<Vec<ParetoRow>, ParetoError> {
    let mut rows: Vec<(CellValue, f64)> = pairs
        .iter()
        .filter(|(label, _)| !label.is_missing())
        .filter_map(|(label, value)| {
            value
                .as_f64()
                .filter(|v| !v.is_nan())
                .map(|v| (label.clone(), v))
        })
        .collect();

    if let Some((label, value)) = rows.iter().find(|(_, v)| *v < 0.0) {
        return Err(ParetoError::NegativeValue {
            label: label.to_string(),
            value: *value,
        });
    }
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    let total: f64 = rows.iter().map(|(_, v)| v).sum();
    if total == 0.0 {
        return Err(ParetoError::ZeroTotal);
    }

    let mut running = 0.0;
    Ok(rows
        .into_iter()
        .map(|(label, value)| {
            running += value;
            ParetoRow {
                label,
                value,
                cumulative_pct: round2(running / total * 100.0),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, f64)]) -> Vec<(CellValue, CellValue)> {
        items
            .iter()
            .map(|(l, v)| (CellValue::from(*l), CellValue::Float(*v)))
            .collect()
    }

    #[test]
    fn sorts_descending_with_cumulative_share() {
        let out = pareto(&pairs(&[("A", 10.0), ("B", 30.0), ("C", 20.0)])).unwrap();
        let labels: Vec<String> = out.iter().map(|r| r.label.to_string()).collect();
        let pct: Vec<f64> = out.iter().map(|r| r.cumulative_pct).collect();
        assert_eq!(labels, vec!["B", "C", "A"]);
        assert_eq!(pct, vec![50.0, 83.33, 100.0]);
    }

    #[test]
    fn equal_values_keep_input_order() {
        let out = pareto(&pairs(&[("x", 5.0), ("y", 9.0), ("z", 5.0)])).unwrap();
        let labels: Vec<String> = out.iter().map(|r| r.label.to_string()).collect();
        assert_eq!(labels, vec!["y", "x", "z"]);
    }

    #[test]
    fn missing_values_are_dropped() {
        let input = vec![
            (CellValue::from("a"), CellValue::Integer(4)),
            (CellValue::from("b"), CellValue::Null),
            (CellValue::from("c"), CellValue::Float(f64::NAN)),
            (CellValue::from("d"), CellValue::from("n/a")),
            (CellValue::Null, CellValue::Integer(3)),
        ];
        let out = pareto(&input).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].cumulative_pct, 100.0);
    }

    #[test]
    fn shares_end_at_100_and_never_decrease() {
        let values = [3.0, 7.0, 1.0, 13.0, 0.5, 2.25, 11.0, 7.0];
        let input: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (CellValue::Integer(i as i64), CellValue::Float(*v)))
            .collect();
        let out = pareto(&input).unwrap();
        assert!(out.windows(2).all(|w| w[0].cumulative_pct <= w[1].cumulative_pct));
        assert!((out.last().unwrap().cumulative_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(pareto(&[]), Ok(vec![]));
    }

    #[test]
    fn negative_and_zero_totals_are_rejected() {
        assert_eq!(
            pareto(&pairs(&[("a", 4.0), ("b", -1.0)])),
            Err(ParetoError::NegativeValue {
                label: "b".into(),
                value: -1.0
            })
        );
        assert_eq!(pareto(&pairs(&[("a", 0.0)])), Err(ParetoError::ZeroTotal));
    }
}
