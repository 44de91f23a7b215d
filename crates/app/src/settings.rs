//! Settings of the `daybook` host, read from an optional TOML file and
//! `DAYBOOK_*` environment variables (`DAYBOOK_REPORT__TITLE=...`).
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use engine::ReportOptions;
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config/daybook.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub store: Store,
    pub report: Report,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level of the daybook and engine targets.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Directory holding one CSV per category. Without it nothing is persisted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Store {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Report {
    pub title: String,
    pub currency: String,
    pub truncate_at: usize,
}

impl Default for Report {
    fn default() -> Self {
        let options = ReportOptions::default();
        Self {
            title: options.title,
            currency: options.currency,
            truncate_at: options.truncate_at,
        }
    }
}

impl From<Report> for ReportOptions {
    fn from(report: Report) -> Self {
        Self {
            title: report.title,
            currency: report.currency,
            truncate_at: report.truncate_at,
        }
    }
}

impl Settings {
    /// Loads `path` (or the default file, when present) layered under the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("DAYBOOK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
