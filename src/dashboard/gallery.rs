use crate::chart::pipelines::{bar_series, pareto_series, pie_series, scatter_series, time_series};
use crate::chart::{Chart, ChartKind};
use crate::data::loader::missing_tables;
use crate::data::model::Workbook;

use super::{DashboardKind, DashboardView, Section, table};

pub const BAR_SHEET: &str = "바차트_히스토그램";
pub const LINE_SHEET: &str = "시계열차트";
pub const PIE_SHEET: &str = "파이차트";
pub const SCATTER_SHEET: &str = "산점도";
pub const PARETO_SHEET: &str = "파레토차트";

/// Every sheet the gallery reads, in display order.
pub const SHEETS: [&str; 5] = [BAR_SHEET, LINE_SHEET, PIE_SHEET, SCATTER_SHEET, PARETO_SHEET];

/// Bar sheet columns: month and total sales.
pub const MONTH_COLUMN: &str = "월";
pub const SALES_COLUMN: &str = "총 매출";

/// Five independent charts; a missing or malformed sheet only affects its own.
pub fn build(workbook: &Workbook) -> DashboardView {
    let mut warnings = Vec::new();
    let missing = missing_tables(workbook, &SHEETS);
    if !missing.is_empty() {
        warnings.push(format!(
            "Missing sheets: {}. Showing the sheets that are present.",
            missing.join(", ")
        ));
    }

    let bar = Chart::from_result(
        ChartKind::Bar,
        "Monthly total sales",
        table(workbook, BAR_SHEET)
            .and_then(|t| Ok(bar_series(t, MONTH_COLUMN, SALES_COLUMN)?)),
    );
    let line = Chart::from_result(
        ChartKind::Line,
        "Trend over time",
        table(workbook, LINE_SHEET).and_then(|t| Ok(time_series(t)?)),
    );
    let pie = Chart::from_result(
        ChartKind::Pie,
        "Share breakdown",
        table(workbook, PIE_SHEET).and_then(|t| Ok(pie_series(t)?)),
    );
    let scatter = Chart::from_result(
        ChartKind::Scatter,
        "Scatter analysis",
        table(workbook, SCATTER_SHEET).and_then(|t| Ok(scatter_series(t)?)),
    );
    let pareto = Chart::from_result(
        ChartKind::Pareto,
        "Pareto chart",
        table(workbook, PARETO_SHEET).and_then(pareto_series),
    )
    .with_secondary_label("Cumulative share (%)");

    let mut top = Section::new("Sales");
    top.charts = vec![bar, line];
    let mut middle = Section::new("Composition");
    middle.charts = vec![pie, scatter];
    let mut bottom = Section::new("Pareto");
    bottom.charts = vec![pareto];

    DashboardView {
        kind: DashboardKind::Gallery,
        warnings,
        sections: vec![top, middle, bottom],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::series::ChartBody;
    use crate::data::model::{CellValue, Table};

    fn sheet(name: &str, columns: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
        Table::new(name, columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn charts(view: &DashboardView) -> Vec<&Chart> {
        view.sections.iter().flat_map(|s| s.charts.iter()).collect()
    }

    #[test]
    fn complete_workbook_yields_five_series() {
        let wb = Workbook::new(vec![
            sheet(BAR_SHEET, &["월", "총 매출"], vec![vec!["2023-01-01".into(), 100i64.into()]]),
            sheet(LINE_SHEET, &["날짜", "값"], vec![vec!["2023-01-01".into(), 1i64.into()]]),
            sheet(PIE_SHEET, &["항목", "값"], vec![vec!["A".into(), 1i64.into()]]),
            sheet(SCATTER_SHEET, &["x", "y"], vec![vec![1i64.into(), 2i64.into()]]),
            sheet(PARETO_SHEET, &["원인", "건수"], vec![vec!["A".into(), 3i64.into()]]),
        ]);
        let view = build(&wb);
        assert!(view.warnings.is_empty());
        let all = charts(&view);
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(|c| matches!(c.body, ChartBody::Series(_))));
        assert_eq!(all[0].series().unwrap().x, vec![CellValue::from("2023-01")]);
        assert_eq!(all[4].y2_label.as_deref(), Some("Cumulative share (%)"));
    }

    #[test]
    fn missing_sheets_are_listed_once_and_others_still_render() {
        let wb = Workbook::new(vec![sheet(
            PIE_SHEET,
            &["항목", "값"],
            vec![vec!["A".into(), 1i64.into()]],
        )]);
        let view = build(&wb);
        assert_eq!(view.warnings.len(), 1);
        assert!(view.warnings[0].contains(BAR_SHEET));
        assert!(view.warnings[0].contains(PARETO_SHEET));

        let all = charts(&view);
        assert!(all[2].series().is_some());
        assert_eq!(all[0].placeholder(), Some("'바차트_히스토그램' sheet missing"));
    }

    #[test]
    fn schema_mismatch_becomes_placeholder() {
        let wb = Workbook::new(vec![
            sheet(BAR_SHEET, &["month", "sales"], vec![]),
            sheet(SCATTER_SHEET, &["x"], vec![vec![1i64.into()]]),
        ]);
        let view = build(&wb);
        let all = charts(&view);
        let bar = all[0].placeholder().unwrap();
        assert!(bar.contains("월") && bar.contains("총 매출"));
        assert!(!all[3].placeholder().unwrap().is_empty());
    }
}
