/// Dashboards: fixed arrangements of charts and KPIs over a workbook.
///
/// Building a view is a pure function of `(workbook, ViewParams)`; the
/// session memoizes it per source version.

pub mod gallery;
pub mod health;

use crate::chart::Chart;
use crate::data::error::PipelineError;
use crate::data::model::{Table, Workbook};
use crate::kpi::Kpi;

/// Which dashboard to build from the loaded source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardKind {
    /// Five charts from a five-sheet workbook.
    Gallery,
    /// Four tabs over a folder of public-health CSV files.
    Health,
}

impl DashboardKind {
    pub fn title(self) -> &'static str {
        match self {
            DashboardKind::Gallery => "Chart gallery",
            DashboardKind::Health => "Mental health overview",
        }
    }
}

/// Inputs of a view besides the data itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewParams {
    pub kind: DashboardKind,
    /// Categories kept by Top-N charts.
    pub top_n: usize,
}

/// A group of charts shown together (a tab, or a row of the gallery).
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub kpis: Vec<Kpi>,
    pub charts: Vec<Chart>,
}

impl Section {
    pub fn new(title: &str) -> Self {
        Section {
            title: title.to_string(),
            kpis: Vec::new(),
            charts: Vec::new(),
        }
    }
}

/// Everything the renderer needs for one dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub kind: DashboardKind,
    /// Source-level problems, shown above the charts.
    pub warnings: Vec<String>,
    pub sections: Vec<Section>,
}

/// Build the selected dashboard.
pub fn build_view(workbook: &Workbook, params: &ViewParams) -> DashboardView {
    match params.kind {
        DashboardKind::Gallery => gallery::build(workbook),
        DashboardKind::Health => health::build(workbook, params.top_n),
    }
}

/// Look a table up by name, turning absence into a pipeline error.
fn table<'a>(workbook: &'a Workbook, name: &str) -> Result<&'a Table, PipelineError> {
    workbook
        .get(name)
        .ok_or_else(|| PipelineError::MissingTable(name.to_string()))
}
