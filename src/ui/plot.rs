use std::collections::BTreeSet;
use std::f32::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui, vec2};
use egui_plot::{AxisHints, Bar, BarChart, HPlacement, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::chart::{Chart, ChartKind, ChartSeries};
use crate::color::{ChartColors, ColorMap};
use crate::data::model::CellValue;

const PLOT_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Render one prepared chart: its title, then the plot or its placeholder.
pub fn chart(ui: &mut Ui, id: &str, chart: &Chart, colors: &ChartColors) {
    ui.heading(&chart.title);
    let series = match chart.series() {
        Some(s) => s,
        None => {
            placeholder(ui, chart.placeholder().unwrap_or_default());
            return;
        }
    };
    match chart.kind {
        ChartKind::Bar => bar_plot(ui, id, chart, series, colors.bar),
        ChartKind::Line => line_plot(ui, id, chart, series, colors.line),
        ChartKind::Scatter => scatter_plot(ui, id, chart, series, colors.scatter),
        ChartKind::Pie => pie(ui, series, colors),
        ChartKind::Pareto => pareto_plot(ui, id, chart, series, colors),
    }
}

fn placeholder(ui: &mut Ui, message: &str) {
    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), PLOT_HEIGHT), Sense::hover());
    ui.painter().rect_stroke(
        rect,
        4.0,
        Stroke::new(1.0, Color32::DARK_GRAY),
        egui::StrokeKind::Inside,
    );
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        message,
        FontId::proportional(14.0),
        ui.visuals().weak_text_color(),
    );
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Plot positions for x values. Numeric columns keep their values; anything
/// else becomes evenly spaced categories in canonical (chronological for
/// `YYYY-MM`) order, returned alongside.
fn x_positions(xs: &[CellValue]) -> (Vec<f64>, Option<Vec<String>>) {
    if xs.iter().all(|x| x.as_f64().is_some()) {
        return (xs.iter().filter_map(CellValue::as_f64).collect(), None);
    }
    let categories: Vec<&CellValue> = xs.iter().collect::<BTreeSet<_>>().into_iter().collect();
    let positions = xs
        .iter()
        .map(|x| categories.iter().position(|c| *c == x).unwrap_or(0) as f64)
        .collect();
    let labels = categories.iter().map(|c| c.to_string()).collect();
    (positions, Some(labels))
}

/// Label whole-number grid marks with category names; others stay blank.
fn category_formatter(labels: Vec<String>) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if v.fract().abs() > f64::EPSILON || v < 0.0 {
            return String::new();
        }
        labels.get(v as usize).cloned().unwrap_or_default()
    }
}

fn base_plot<'a>(id: &str, chart: &Chart) -> Plot<'a> {
    Plot::new(id.to_string())
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
}

fn bars(series: &ChartSeries, color: Color32) -> Vec<Bar> {
    series
        .y_f64()
        .into_iter()
        .enumerate()
        .map(|(i, y)| {
            Bar::new(i as f64, y.unwrap_or(0.0))
                .name(series.x[i].to_string())
                .fill(color)
                .width(0.7)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Bar / line / scatter
// ---------------------------------------------------------------------------

/// Bars in input order, one per row.
fn bar_plot(ui: &mut Ui, id: &str, chart: &Chart, series: &ChartSeries, color: Color32) {
    let labels: Vec<String> = series.x.iter().map(|x| x.to_string()).collect();
    let bar_chart = BarChart::new(bars(series, color)).color(color).name(&chart.y_label);
    base_plot(id, chart)
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(bar_chart);
        });
}

/// One line with markers per group.
fn line_plot(ui: &mut Ui, id: &str, chart: &Chart, series: &ChartSeries, color: Color32) {
    let (xs, categories) = x_positions(&series.x);
    let ys = series.y_f64();
    let groups = series.groups();
    let color_map = ColorMap::new(groups.iter().filter_map(|(k, _)| k.as_ref()));

    let mut plot = base_plot(id, chart);
    if let Some(labels) = categories {
        plot = plot.x_axis_formatter(category_formatter(labels));
    }
    plot.show(ui, |plot_ui| {
        for (key, rows) in &groups {
            let mut points: Vec<[f64; 2]> = rows
                .iter()
                .filter_map(|&i| ys[i].map(|y| [xs[i], y]))
                .collect();
            points.sort_by(|a, b| a[0].total_cmp(&b[0]));

            let (name, line_color) = match key {
                Some(k) => (k.to_string(), color_map.color_for(k)),
                None => (chart.y_label.clone(), color),
            };
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name(&name)
                    .color(line_color)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .name(&name)
                    .color(line_color)
                    .radius(3.0),
            );
        }
    });
}

fn scatter_plot(ui: &mut Ui, id: &str, chart: &Chart, series: &ChartSeries, color: Color32) {
    let (xs, categories) = x_positions(&series.x);
    let points: Vec<[f64; 2]> = series
        .y_f64()
        .into_iter()
        .enumerate()
        .filter_map(|(i, y)| y.map(|y| [xs[i], y]))
        .collect();

    let mut plot = base_plot(id, chart);
    if let Some(labels) = categories {
        plot = plot.x_axis_formatter(category_formatter(labels));
    }
    plot.show(ui, |plot_ui| {
        plot_ui.points(
            Points::new(PlotPoints::from(points))
                .name(&chart.y_label)
                .shape(MarkerShape::Circle)
                .filled(true)
                .radius(5.0)
                .color(color),
        );
    });
}

// ---------------------------------------------------------------------------
// Pareto
// ---------------------------------------------------------------------------

/// Bars on the left axis; the cumulative percentage is drawn on the same
/// canvas, scaled so that 100 % meets the tallest bar, and read off the
/// right-hand axis.
fn pareto_plot(ui: &mut Ui, id: &str, chart: &Chart, series: &ChartSeries, colors: &ChartColors) {
    let labels: Vec<String> = series.x.iter().map(|x| x.to_string()).collect();
    let max = series
        .y_f64()
        .into_iter()
        .flatten()
        .fold(0.0_f64, f64::max);
    let scale = if max > 0.0 { max / 100.0 } else { 1.0 };

    let cumulative: Vec<[f64; 2]> = series
        .secondary
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, pct)| [i as f64, pct * scale])
        .collect();
    let y2_label = chart.y2_label.clone().unwrap_or_default();

    let bar_chart = BarChart::new(bars(series, colors.pareto_bar))
        .color(colors.pareto_bar)
        .name(&chart.y_label);

    base_plot(id, chart)
        .x_axis_formatter(category_formatter(labels))
        .custom_y_axes(vec![
            AxisHints::new_y().label(chart.y_label.clone()),
            AxisHints::new_y()
                .label(y2_label.clone())
                .placement(HPlacement::Right)
                .formatter(move |mark, _range| format!("{:.0}%", mark.value / scale)),
        ])
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(bar_chart);
            plot_ui.line(
                Line::new(PlotPoints::from(cumulative.clone()))
                    .name(&y2_label)
                    .color(colors.pareto_line)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(cumulative))
                    .name(&y2_label)
                    .color(colors.pareto_line)
                    .radius(3.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

/// Slice shares of the positive values, in input order.
fn pie_shares(series: &ChartSeries) -> Vec<(String, f32)> {
    let values: Vec<f64> = series
        .y_f64()
        .into_iter()
        .map(|v| v.filter(|v| *v > 0.0).unwrap_or(0.0))
        .collect();
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }
    series
        .x
        .iter()
        .zip(values)
        .filter(|(_, v)| *v > 0.0)
        .map(|(label, v)| (label.to_string(), (v / total) as f32))
        .collect()
}

/// Pie drawn with the painter; each slice is a fan of thin triangles so
/// slices wider than half the circle stay convex.
fn pie(ui: &mut Ui, series: &ChartSeries, colors: &ChartColors) {
    let shares = pie_shares(series);
    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), PLOT_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    if shares.is_empty() {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No positive values",
            FontId::proportional(14.0),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    let center = rect.center();
    let radius = rect.height().min(rect.width()) * 0.45;
    let point = |angle: f32, r: f32| Pos2::new(center.x + r * angle.cos(), center.y + r * angle.sin());

    let mut start = -TAU / 4.0;
    for (i, (label, share)) in shares.iter().enumerate() {
        let sweep = share * TAU;
        let color = colors.pie_slice(i);
        let steps = ((sweep / 0.05).ceil() as usize).max(1);
        for s in 0..steps {
            let a0 = start + sweep * s as f32 / steps as f32;
            let a1 = start + sweep * (s + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![center, point(a0, radius), point(a1, radius)],
                color,
                Stroke::NONE,
            ));
        }

        let mid = start + sweep / 2.0;
        painter.text(
            point(mid, radius * 0.65),
            Align2::CENTER_CENTER,
            format!("{label}\n{:.1}%", share * 100.0),
            FontId::proportional(12.0),
            Color32::BLACK,
        );
        start += sweep;
    }
}

/// Small caption under a chart with its row count.
pub fn caption(ui: &mut Ui, chart: &Chart) {
    if let Some(series) = chart.series() {
        let text = if series.is_empty() {
            "No rows".to_string()
        } else {
            format!("{} rows", series.len())
        };
        ui.label(RichText::new(text).small().weak());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_x_keeps_values() {
        let (xs, labels) = x_positions(&[CellValue::Integer(2019), CellValue::Float(2020.5)]);
        assert_eq!(xs, vec![2019.0, 2020.5]);
        assert!(labels.is_none());
    }

    #[test]
    fn text_x_becomes_sorted_categories() {
        let xs = [CellValue::from("2023-02"), CellValue::from("2023-01"), CellValue::from("2023-02")];
        let (pos, labels) = x_positions(&xs);
        assert_eq!(pos, vec![1.0, 0.0, 1.0]);
        assert_eq!(labels, Some(vec!["2023-01".to_string(), "2023-02".to_string()]));
    }

    #[test]
    fn pie_shares_ignore_non_positive_values() {
        let s = ChartSeries::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![3i64.into(), CellValue::Null, 1i64.into()],
        )
        .unwrap();
        let shares = pie_shares(&s);
        assert_eq!(shares, vec![("a".to_string(), 0.75), ("c".to_string(), 0.25)]);
    }
}
