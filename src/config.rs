use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RUSTY_DASHBOARD_CONFIG";

/// Config file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

/// Light or dark egui visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

/// Chart colours as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub bar: String,
    pub line: String,
    pub scatter: String,
    pub pareto_bar: String,
    pub pareto_line: String,
    /// Slice colours for pie charts, cycled.
    pub pie: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            bar: "#FFCE56".into(),
            line: "#4BC0C0".into(),
            scatter: "#99FF33".into(),
            pareto_bar: "#FF9F40".into(),
            pareto_line: "#4BC0C0".into(),
            pie: vec![
                "#FFCE56".into(),
                "#4BC0C0".into(),
                "#FF9F40".into(),
                "#36A2EB".into(),
                "#99FF33".into(),
            ],
        }
    }
}

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub theme: Theme,
    pub palette: PaletteConfig,
    /// Number of categories kept by Top-N charts.
    pub top_n: usize,
    /// Folder holding the health overview CSV files.
    pub health_data_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            palette: PaletteConfig::default(),
            top_n: 5,
            health_data_dir: PathBuf::from("cleaned"),
        }
    }
}

impl DashboardConfig {
    /// Read a config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Config from `$RUSTY_DASHBOARD_CONFIG`, else `./dashboard.json`, else
    /// defaults. A broken file is logged and ignored.
    pub fn load() -> Self {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = match explicit {
            Some(p) => p,
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !local.exists() {
                    log::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                    return Self::default();
                }
                local
            }
        };
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("config loaded from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("{err:#}; using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r##"{ "theme": "light", "palette": { "bar": "#000000" } }"##).unwrap();
        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.palette.bar, "#000000");
        assert_eq!(config.palette.pie.len(), 5);
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, "{ top_n: }").unwrap();
        assert!(DashboardConfig::from_file(&path).is_err());
    }
}
