//! Sales Insights - Sales CSV cleaning, statistics & exploratory charts
//!
//! Loads a sales CSV, imputes numeric nulls with column medians, reports
//! descriptive statistics and renders trend, seasonality and top-product charts.

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use config::{AnalysisConfig, Args};
pub use pipeline::{AnalysisError, AnalysisOutcome, ChartSeries, SalesAnalysis};
