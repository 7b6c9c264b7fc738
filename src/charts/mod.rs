//! Charts module - Sales aggregation and chart rendering

mod aggregate;
mod renderer;

use crate::data::ProcessorError;
use polars::prelude::PolarsError;
use thiserror::Error;

pub use aggregate::{sales_amounts, SalesAggregator, YearMonth};
pub use renderer::{StaticChartRenderer, MONTHLY_FILE, TOP_PRODUCTS_FILE, TREND_FILE};

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error("No data to plot for {0}")]
    EmptySeries(&'static str),
    #[error("Chart drawing failed: {0}")]
    Drawing(String),
    #[error("Failed to open chart {path}: {source}")]
    Viewer {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
