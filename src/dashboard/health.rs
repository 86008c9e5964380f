use crate::chart::pipelines::{Labeled, named_series, wide_series};
use crate::chart::{Chart, ChartKind, ChartSeries};
use crate::data::aggregate::{
    argmax_group, last_value, mean_column, sum_by_group, sum_column, top_n_filter,
};
use crate::data::error::PipelineError;
use crate::data::filter::{equals, filter_table};
use crate::data::model::{CellValue, Workbook};
use crate::data::select::{ColumnRef, select_columns};
use crate::kpi::{Kpi, format_count, format_percent};

use super::{DashboardKind, DashboardView, Section, table};

pub const REGISTRATION: &str = "등록관리율";
pub const INSTITUTIONS: &str = "기관현황";
pub const BUDGET: &str = "예산";
pub const VISITS: &str = "진료정보";
pub const DISEASE_GROUPS: &str = "상병그룹";
pub const SELF_RATED: &str = "주관적건강";
pub const ALCOHOL: &str = "알코올사망";

/// Logical table names, each read from `<name>.csv` in the data folder.
pub const TABLES: [&str; 7] = [
    REGISTRATION,
    INSTITUTIONS,
    BUDGET,
    VISITS,
    DISEASE_GROUPS,
    SELF_RATED,
    ALCOHOL,
];

const REGION: &str = "지역명";
const REGISTRATION_RATE: &str =
    "추계중증정신질환자수 대비 정신건강복지센터 등록 중증정신질환자";
const INSTITUTION_TOTAL: &str = "합계";
const BUDGET_SHARE: &str = "보건 예산 대비 정신건강증진 예산 비중";
const DISEASE: &str = "주상병명";
const PATIENTS: &str = "진료인원(명)";
const VISIT_MONTH: &str = "진료년월";
const TREATMENT_YEAR: &str = "진료년도";
const GROUP_PATIENTS: &str = "진료실인원(명)";
const YEAR: &str = "연도";
const CATEGORY: &str = "구분";
const DEATHS: &str = "사망자수";
const TOTAL: &str = "계";
const SELF_RATED_LEVELS: [&str; 3] = ["좋은편", "보통", "좋지않은편"];

/// The `name → file` map handed to the directory loader.
pub fn table_files() -> Vec<(String, String)> {
    TABLES
        .iter()
        .map(|name| (name.to_string(), format!("{name}.csv")))
        .collect()
}

/// Four tabs. Each KPI and chart degrades on its own when its table or
/// column is absent.
pub fn build(workbook: &Workbook, top_n: usize) -> DashboardView {
    DashboardView {
        kind: DashboardKind::Health,
        warnings: Vec::new(),
        sections: vec![
            overview(workbook),
            regional_gaps(workbook, top_n),
            disease_trends(workbook, top_n),
            risk_factors(workbook),
        ],
    }
}

fn overview(wb: &Workbook) -> Section {
    let mut section = Section::new("Overview");
    section.kpis = vec![
        Kpi::compute(
            "Total patients treated",
            || Ok(sum_column(table(wb, VISITS)?, PATIENTS)?),
            format_count,
        ),
        Kpi::compute(
            "Most treated condition",
            || Ok(argmax_group(table(wb, VISITS)?, DISEASE, PATIENTS)?),
            |v: CellValue| v.to_string(),
        ),
        Kpi::compute(
            "Mean registration rate",
            || Ok(mean_column(table(wb, REGISTRATION)?, REGISTRATION_RATE)?),
            |v| format_percent(v, 1),
        ),
        Kpi::compute(
            "Mental health budget share",
            || Ok(last_value(table(wb, BUDGET)?, BUDGET_SHARE)?),
            |v| format_percent(v, 1),
        ),
    ];
    section.charts = vec![Chart::from_result(
        ChartKind::Line,
        "Patients treated per year",
        yearly_patients(wb),
    )];
    section
}

/// Patients summed per treatment year, in year order.
fn yearly_patients(wb: &Workbook) -> Result<Labeled, PipelineError> {
    let totals = sum_by_group(table(wb, DISEASE_GROUPS)?, TREATMENT_YEAR, GROUP_PATIENTS)?;
    let (years, sums): (Vec<CellValue>, Vec<CellValue>) = totals
        .into_iter()
        .map(|(year, total)| (year, CellValue::Float(total)))
        .unzip();
    Ok((
        ChartSeries::new(years, sums)?,
        TREATMENT_YEAR.to_string(),
        GROUP_PATIENTS.to_string(),
    ))
}

fn regional_gaps(wb: &Workbook, top_n: usize) -> Section {
    let mut section = Section::new("Regional service gaps");
    section.charts = vec![
        Chart::from_result(
            ChartKind::Bar,
            &format!("Registration rate: top and bottom {top_n} regions"),
            registration_extremes(wb, top_n),
        ),
        Chart::from_result(
            ChartKind::Bar,
            "Mental health institutions per district",
            table(wb, INSTITUTIONS).and_then(|t| {
                let idx = select_columns(t, &[ColumnRef::named(INSTITUTION_TOTAL)])?;
                let sorted = t.sorted_by(idx[0], true);
                Ok(named_series(&sorted, REGION, INSTITUTION_TOTAL, None)?)
            }),
        ),
    ];
    section
}

/// Highest `n` rates followed by lowest `n`; a region can appear in both.
fn registration_extremes(wb: &Workbook, n: usize) -> Result<Labeled, PipelineError> {
    let t = table(wb, REGISTRATION)?;
    let idx = select_columns(
        t,
        &[ColumnRef::named(REGION), ColumnRef::named(REGISTRATION_RATE)],
    )?;
    let top = t.sorted_by(idx[1], true).head(n);
    let bottom = t.sorted_by(idx[1], false).head(n);
    Ok(named_series(&top.concat(&bottom), REGION, REGISTRATION_RATE, None)?)
}

fn disease_trends(wb: &Workbook, top_n: usize) -> Section {
    let mut section = Section::new("Disease trends");
    section.charts = vec![Chart::from_result(
        ChartKind::Line,
        &format!("Patients per month, top {top_n} conditions"),
        table(wb, VISITS).and_then(|t| {
            let top = top_n_filter(t, DISEASE, PATIENTS, top_n)?;
            Ok(named_series(&top, VISIT_MONTH, PATIENTS, Some(DISEASE))?)
        }),
    )];
    section
}

fn risk_factors(wb: &Workbook) -> Section {
    let mut section = Section::new("Risk factors and perception");
    section.charts = vec![
        Chart::from_result(
            ChartKind::Line,
            "Alcohol-related deaths per year",
            table(wb, ALCOHOL).and_then(|t| {
                let deaths = filter_table(t, &equals(CATEGORY, CellValue::from(DEATHS)))?;
                Ok(named_series(&deaths, YEAR, TOTAL, None)?)
            }),
        ),
        Chart::from_result(
            ChartKind::Line,
            "Self-rated mental health",
            table(wb, SELF_RATED).and_then(|t| Ok(wide_series(t, YEAR, &SELF_RATED_LEVELS)?)),
        ),
    ];
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Table;

    fn sheet(name: &str, columns: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
        Table::new(name, columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn visits() -> Table {
        sheet(
            VISITS,
            &[VISIT_MONTH, DISEASE, PATIENTS],
            vec![
                vec!["2023-01".into(), "우울증".into(), 1200i64.into()],
                vec!["2023-01".into(), "불안장애".into(), 800i64.into()],
                vec!["2023-02".into(), "우울증".into(), 1300i64.into()],
                vec!["2023-02".into(), "불안장애".into(), 900i64.into()],
            ],
        )
    }

    fn registration() -> Table {
        let rows = [("종로구", 30.0), ("중구", 42.5), ("용산구", 18.0)]
            .iter()
            .map(|(r, v)| vec![CellValue::from(*r), CellValue::Float(*v)])
            .collect();
        sheet(REGISTRATION, &[REGION, REGISTRATION_RATE], rows)
    }

    fn kpi_values(view: &DashboardView) -> Vec<Result<String, String>> {
        view.sections[0].kpis.iter().map(|k| k.value.clone()).collect()
    }

    #[test]
    fn overview_kpis_are_formatted() {
        let budget = sheet(
            BUDGET,
            &["연도", BUDGET_SHARE],
            vec![vec![2022i64.into(), 1.74f64.into()], vec![2023i64.into(), 1.86f64.into()]],
        );
        let wb = Workbook::new(vec![visits(), registration(), budget]);
        let view = build(&wb, 5);
        assert_eq!(
            kpi_values(&view),
            vec![
                Ok("4,200".to_string()),
                Ok("우울증".to_string()),
                Ok("30.2%".to_string()),
                Ok("1.9%".to_string()),
            ]
        );
    }

    #[test]
    fn missing_tables_only_affect_their_own_outputs() {
        let wb = Workbook::new(vec![visits()]);
        let view = build(&wb, 5);
        let kpis = kpi_values(&view);
        assert!(kpis[0].is_ok());
        assert_eq!(kpis[2], Err(format!("'{REGISTRATION}' sheet missing")));
        assert!(view.sections[0].charts[0].placeholder().is_some());
        assert!(view.sections[2].charts[0].series().is_some());
    }

    #[test]
    fn yearly_trend_is_chronological() {
        let groups = sheet(
            DISEASE_GROUPS,
            &[TREATMENT_YEAR, GROUP_PATIENTS],
            vec![
                vec![2021i64.into(), 10i64.into()],
                vec![2019i64.into(), 4i64.into()],
                vec![2021i64.into(), 5i64.into()],
            ],
        );
        let view = build(&Workbook::new(vec![groups]), 5);
        let s = view.sections[0].charts[0].series().unwrap();
        assert_eq!(s.x, vec![CellValue::Integer(2019), CellValue::Integer(2021)]);
        assert_eq!(s.y_f64(), vec![Some(4.0), Some(15.0)]);
    }

    #[test]
    fn registration_extremes_concatenate_top_and_bottom() {
        let view = build(&Workbook::new(vec![registration()]), 2);
        let s = view.sections[1].charts[0].series().unwrap();
        let regions: Vec<String> = s.x.iter().map(|v| v.to_string()).collect();
        assert_eq!(regions, vec!["중구", "종로구", "용산구", "종로구"]);
    }

    #[test]
    fn regions_without_a_rate_are_not_the_lowest() {
        let mut t = registration();
        t.rows.push(vec![CellValue::from("성동구"), CellValue::Null]);
        let view = build(&Workbook::new(vec![t]), 1);
        let s = view.sections[1].charts[0].series().unwrap();
        let regions: Vec<String> = s.x.iter().map(|v| v.to_string()).collect();
        assert_eq!(regions, vec!["중구", "용산구"]);
    }

    #[test]
    fn disease_trend_keeps_top_n_with_groups() {
        let view = build(&Workbook::new(vec![visits()]), 1);
        let s = view.sections[2].charts[0].series().unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.groups().len(), 1);
        assert_eq!(s.groups()[0].0, Some(CellValue::from("우울증")));
    }

    #[test]
    fn alcohol_chart_keeps_death_counts_only() {
        let alcohol = sheet(
            ALCOHOL,
            &[YEAR, CATEGORY, TOTAL],
            vec![
                vec![2021i64.into(), DEATHS.into(), 310i64.into()],
                vec![2021i64.into(), "사망률".into(), 3.2f64.into()],
                vec![2022i64.into(), DEATHS.into(), 298i64.into()],
            ],
        );
        let view = build(&Workbook::new(vec![alcohol]), 5);
        let s = view.sections[3].charts[0].series().unwrap();
        assert_eq!(s.y, vec![CellValue::Integer(310), CellValue::Integer(298)]);
    }

    #[test]
    fn table_files_map_names_to_csv() {
        let files = table_files();
        assert_eq!(files.len(), 7);
        assert_eq!(files[3], (VISITS.to_string(), "진료정보.csv".to_string()));
    }
}
