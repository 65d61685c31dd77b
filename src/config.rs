//! Run configuration.
//!
//! A [`PipelineConfig`] can be built in code, deserialized from TOML, or both: the CLI loads an
//! optional file first and then applies its own flags on top.
//!
//! ```toml
//! input_path = "data/transactions.csv"
//! output_dir = "output"
//! preview_rows = 5
//!
//! [show_limits]
//! top_accounts = 10
//! monthly_trends = 12
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PipelineError, PipelineResult};

/// How many rows of each view are rendered in the run report.
///
/// `None` renders the whole view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowLimits {
    pub summary: Option<usize>,
    pub top_accounts: Option<usize>,
    pub by_type: Option<usize>,
    pub monthly_trends: Option<usize>,
}

impl Default for ShowLimits {
    fn default() -> Self {
        Self {
            summary: None,
            top_accounts: Some(10),
            by_type: None,
            monthly_trends: Some(12),
        }
    }
}

/// Paths and report settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Transactions CSV to load.
    pub input_path: PathBuf,
    /// Existing directory that receives the exported views.
    pub output_dir: PathBuf,
    /// Rows of the loaded input shown in the preview.
    pub preview_rows: usize,
    pub show_limits: ShowLimits,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("transactions.csv"),
            output_dir: PathBuf::from("output"),
            preview_rows: 5,
            show_limits: ShowLimits::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        toml::from_str(text).map_err(|e| PipelineError::Config {
            message: e.to_string(),
        })
    }

    /// Read and parse a TOML config file.
    ///
    /// Relative `input_path`/`output_dir` values are kept as written (resolved against the
    /// working directory, not the file's location).
    pub fn from_toml_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PipelineError::file_access(path, e))?;
        Self::from_toml_str(&text)
    }
}
