use crate::data::error::{PipelineError, SchemaError};
use crate::data::model::CellValue;

/// How a prepared series is meant to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Scatter,
    /// Bars plus a cumulative-percentage line on a secondary axis.
    Pareto,
}

/// Chart-ready data: parallel x / y columns, optionally split into groups,
/// optionally with a secondary y series sharing the x order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub x: Vec<CellValue>,
    pub y: Vec<CellValue>,
    pub group: Option<Vec<CellValue>>,
    pub secondary: Option<Vec<f64>>,
}

impl ChartSeries {
    pub fn new(x: Vec<CellValue>, y: Vec<CellValue>) -> Result<Self, SchemaError> {
        if x.len() != y.len() {
            return Err(SchemaError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        Ok(ChartSeries {
            x,
            y,
            group: None,
            secondary: None,
        })
    }

    pub fn with_group(mut self, group: Vec<CellValue>) -> Result<Self, SchemaError> {
        if group.len() != self.x.len() {
            return Err(SchemaError::LengthMismatch {
                x: self.x.len(),
                y: group.len(),
            });
        }
        self.group = Some(group);
        Ok(self)
    }

    pub fn with_secondary(mut self, secondary: Vec<f64>) -> Result<Self, SchemaError> {
        if secondary.len() != self.x.len() {
            return Err(SchemaError::LengthMismatch {
                x: self.x.len(),
                y: secondary.len(),
            });
        }
        self.secondary = Some(secondary);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Numeric y values; non-numeric cells read as `None`.
    pub fn y_f64(&self) -> Vec<Option<f64>> {
        self.y.iter().map(CellValue::as_f64).collect()
    }

    /// Row indices per group, groups in first-seen order. An ungrouped series
    /// is a single unnamed group.
    pub fn groups(&self) -> Vec<(Option<CellValue>, Vec<usize>)> {
        let Some(group) = &self.group else {
            return vec![(None, (0..self.len()).collect())];
        };
        let mut out: Vec<(Option<CellValue>, Vec<usize>)> = Vec::new();
        for (i, key) in group.iter().enumerate() {
            match out.iter_mut().find(|(k, _)| k.as_ref() == Some(key)) {
                Some((_, rows)) => rows.push(i),
                None => out.push((Some(key.clone()), vec![i])),
            }
        }
        out
    }
}

/// Either data to draw or the reason there is none.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Series(ChartSeries),
    Placeholder(String),
}

/// A titled chart as handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    /// Label of the secondary axis, for Pareto charts.
    pub y2_label: Option<String>,
    pub body: ChartBody,
}

impl Chart {
    /// Wrap a pipeline outcome; failures become a placeholder with the error text.
    pub fn from_result(
        kind: ChartKind,
        title: &str,
        result: Result<(ChartSeries, String, String), PipelineError>,
    ) -> Self {
        let (body, x_label, y_label) = match result {
            Ok((series, x, y)) => (ChartBody::Series(series), x, y),
            Err(err) => {
                log::warn!("{title}: {err}");
                (ChartBody::Placeholder(err.to_string()), String::new(), String::new())
            }
        };
        Chart {
            title: title.to_string(),
            kind,
            x_label,
            y_label,
            y2_label: None,
            body,
        }
    }

    pub fn with_secondary_label(mut self, label: &str) -> Self {
        self.y2_label = Some(label.to_string());
        self
    }

    pub fn series(&self) -> Option<&ChartSeries> {
        match &self.body {
            ChartBody::Series(s) => Some(s),
            ChartBody::Placeholder(_) => None,
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match &self.body {
            ChartBody::Series(_) => None,
            ChartBody::Placeholder(msg) => Some(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unequal_lengths_are_rejected() {
        let err = ChartSeries::new(vec![1i64.into()], vec![]);
        assert_eq!(err, Err(SchemaError::LengthMismatch { x: 1, y: 0 }));
    }

    #[test]
    fn groups_follow_first_appearance() {
        let s = ChartSeries::new(
            vec![1i64.into(), 1i64.into(), 2i64.into()],
            vec![5i64.into(), 6i64.into(), 7i64.into()],
        )
        .unwrap()
        .with_group(vec!["b".into(), "a".into(), "b".into()])
        .unwrap();
        assert_eq!(
            s.groups(),
            vec![(Some("b".into()), vec![0, 2]), (Some("a".into()), vec![1])]
        );
    }

    #[test]
    fn failed_pipeline_becomes_placeholder() {
        let chart = Chart::from_result(
            ChartKind::Pie,
            "Share",
            Err(PipelineError::MissingTable("파이차트".into())),
        );
        assert_eq!(chart.placeholder(), Some("'파이차트' sheet missing"));
        assert!(chart.series().is_none());
    }
}
