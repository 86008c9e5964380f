use std::collections::BTreeMap;
use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::config::PaletteConfig;
use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Parse `#rrggbb`, falling back to grey for anything else.
pub fn parse_hex(hex: &str) -> Color32 {
    match Srgb::<u8>::from_str(hex.trim()) {
        Ok(c) => Color32::from_rgb(c.red, c.green, c.blue),
        Err(_) => {
            log::warn!("invalid colour '{hex}', using grey");
            Color32::GRAY
        }
    }
}

// ---------------------------------------------------------------------------
// Configured chart colours
// ---------------------------------------------------------------------------

/// Resolved colours for each chart role.
#[derive(Debug, Clone)]
pub struct ChartColors {
    pub bar: Color32,
    pub line: Color32,
    pub scatter: Color32,
    pub pareto_bar: Color32,
    pub pareto_line: Color32,
    pub pie: Vec<Color32>,
}

impl ChartColors {
    pub fn from_config(config: &PaletteConfig) -> Self {
        let pie: Vec<Color32> = config.pie.iter().map(|h| parse_hex(h)).collect();
        ChartColors {
            bar: parse_hex(&config.bar),
            line: parse_hex(&config.line),
            scatter: parse_hex(&config.scatter),
            pareto_bar: parse_hex(&config.pareto_bar),
            pareto_line: parse_hex(&config.pareto_line),
            pie,
        }
    }

    /// Colour of the `i`-th pie slice; configured colours repeat.
    pub fn pie_slice(&self, i: usize) -> Color32 {
        if self.pie.is_empty() {
            return Color32::GRAY;
        }
        self.pie[i % self.pie.len()]
    }
}

// ---------------------------------------------------------------------------
// Color mapping: group key → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct group keys of a grouped series to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the group keys, in canonical order.
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let keys: std::collections::BTreeSet<&CellValue> = keys.into_iter().collect();
        let palette = generate_palette(keys.len());
        let mapping: BTreeMap<CellValue, Color32> = keys
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given group key.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
