//! Analysis configuration.
//!
//! Defaults reproduce the fixed constants of the analysis: the `Sales Data.csv`
//! input, `SALES`/`QUANTITYORDERED` targets and the `ORDERDATE`/`PRODUCTCODE`
//! guard columns. A JSON file and command-line flags may override them.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_INPUT: &str = "Sales Data.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "charts";
pub const DEFAULT_TARGETS: [&str; 2] = ["SALES", "QUANTITYORDERED"];
pub const DATE_COLUMN: &str = "ORDERDATE";
pub const SALES_COLUMN: &str = "SALES";
pub const PRODUCT_COLUMN: &str = "PRODUCTCODE";
pub const TOP_PRODUCTS: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("top_n must be at least 1")]
    ZeroTopN,
}

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    pub target_columns: Vec<String>,
    pub date_column: String,
    pub sales_column: String,
    pub product_column: String,
    pub top_n: usize,
    pub output_dir: PathBuf,
    /// Open each rendered chart in the system viewer.
    pub show: bool,
    /// Where to write the statistics as JSON, if anywhere.
    pub summary: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            target_columns: DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect(),
            date_column: DATE_COLUMN.to_string(),
            sales_column: SALES_COLUMN.to_string(),
            product_column: PRODUCT_COLUMN.to_string(),
            top_n: TOP_PRODUCTS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            show: false,
            summary: None,
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::ZeroTopN);
        }
        Ok(())
    }

    /// Apply command-line overrides on top of this config.
    pub fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(input) = &args.input {
            self.input = input.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(summary) = &args.summary {
            self.summary = Some(summary.clone());
        }
        if args.show {
            self.show = true;
        }
        self
    }
}

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "sales_insights")]
#[command(about = "Clean a sales CSV, summarise it and chart its trends")]
pub struct Args {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sales CSV file (ISO-8859-1)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory the chart PNGs are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Also write the statistics as JSON to this file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Open each chart in the default image viewer
    #[arg(long)]
    pub show: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Resolve the effective config: defaults, then config file, then flags.
    pub fn resolve(&self) -> Result<AnalysisConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };
        Ok(base.with_overrides(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_constants() {
        let config = AnalysisConfig::default();
        assert_eq!(config.input, PathBuf::from("Sales Data.csv"));
        assert_eq!(config.target_columns, vec!["SALES", "QUANTITYORDERED"]);
        assert_eq!(config.top_n, 10);
        assert!(!config.show);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "top_n": 5, "target_columns": ["SALES"] }"#).unwrap();

        let config = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.target_columns, vec!["SALES"]);
        assert_eq!(config.date_column, "ORDERDATE");
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "top_n": 0 }"#).unwrap();
        assert!(matches!(
            AnalysisConfig::from_file(&path),
            Err(ConfigError::ZeroTopN)
        ));
    }

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "sales_insights",
            "--input",
            "other.csv",
            "--show",
            "--output-dir",
            "out",
        ]);
        let config = args.resolve().unwrap();
        assert_eq!(config.input, PathBuf::from("other.csv"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.show);
        assert_eq!(config.summary, None);
    }
}
