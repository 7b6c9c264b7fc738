//! Sales Analysis Pipeline
//! Runs load, clean, statistics and charts once, in order.

use crate::charts::{ChartError, SalesAggregator, StaticChartRenderer, YearMonth};
use crate::config::AnalysisConfig;
use crate::data::{DataLoader, DataProcessor, DatedSales, LoaderError, ProcessorError};
use crate::report;
use crate::stats::{StatisticsReport, StatsCalculator, StatsError};
use polars::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode summary: {0}")]
    Summary(#[from] serde_json::Error),
}

/// Aggregated series behind the three charts. `None` means the guard column was absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub trend: Option<Vec<(YearMonth, f64)>>,
    pub monthly: Option<Vec<(u32, f64)>>,
    pub top_products: Option<Vec<(String, f64)>>,
}

/// Result of a full run.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub statistics: StatisticsReport,
    pub series: ChartSeries,
    pub charts: Vec<PathBuf>,
}

pub struct SalesAnalysis {
    config: AnalysisConfig,
}

impl SalesAnalysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load the CSV, print diagnostics, impute numeric medians, drop null rows.
    pub fn load_and_clean<W: Write>(&self, out: &mut W) -> Result<DataFrame, AnalysisError> {
        writeln!(out, "Loading dataset...")?;
        let mut loader = DataLoader::new();
        loader.load_csv(&self.config.input)?;
        debug!(
            "{} rows, columns: {}",
            loader.row_count(),
            loader.column_names().join(", ")
        );
        let raw = loader.take_dataframe()?;

        report::print_shape(out, "Dataset", &raw)?;
        report::print_preview(out, "First 5 rows of the dataset:", &raw)?;
        report::print_null_counts(
            out,
            "Missing Values in Columns:",
            &DataProcessor::null_counts(&raw),
        )?;

        let cleaned = DataProcessor::clean(raw)?;

        report::print_preview(out, "Dataset after cleaning:", &cleaned)?;
        report::print_null_counts(
            out,
            "Missing Values after cleaning:",
            &DataProcessor::null_counts(&cleaned),
        )?;
        report::print_shape(out, "Cleaned dataset", &cleaned)?;

        info!("Cleaned dataset has {} rows", cleaned.height());
        Ok(cleaned)
    }

    /// Statistics for the configured target columns.
    pub fn compute_statistics(&self, df: &DataFrame) -> Result<StatisticsReport, AnalysisError> {
        let statistics =
            StatsCalculator::compute_statistics(df, self.config.target_columns.as_slice())?;
        debug!("Computed statistics for {} columns", statistics.len());
        Ok(statistics)
    }

    /// Aggregate the chart series.
    ///
    /// The order dates are parsed once and the dated rows feed all three series,
    /// so rows with unparsable dates are absent from the top products too.
    pub fn build_series(&self, df: &DataFrame) -> Result<ChartSeries, AnalysisError> {
        let cfg = &self.config;
        let dated = DatedSales::parse(df, &cfg.date_column)?;

        let (trend, monthly) = match &dated {
            Some(dated) => (
                Some(SalesAggregator::monthly_trend(dated, &cfg.sales_column)?),
                Some(SalesAggregator::monthly_seasonality(dated, &cfg.sales_column)?),
            ),
            None => (None, None),
        };

        let product_source = dated.as_ref().map(DatedSales::frame).unwrap_or(df);
        let top_products = SalesAggregator::top_products(
            product_source,
            &cfg.product_column,
            &cfg.sales_column,
            cfg.top_n,
        )?;

        Ok(ChartSeries {
            trend,
            monthly,
            top_products,
        })
    }

    /// Render every available series to PNG, opening each one when `show` is set.
    pub fn render_charts(&self, series: &ChartSeries) -> Result<Vec<PathBuf>, AnalysisError> {
        std::fs::create_dir_all(&self.config.output_dir)?;
        let [trend_path, monthly_path, top_path] =
            StaticChartRenderer::chart_paths(&self.config.output_dir);

        let mut charts = Vec::new();
        if let Some(trend) = &series.trend {
            StaticChartRenderer::render_trend(trend, &trend_path)?;
            charts.push(trend_path);
        }
        if let Some(monthly) = &series.monthly {
            StaticChartRenderer::render_monthly(monthly, &monthly_path)?;
            charts.push(monthly_path);
        }
        if let Some(top) = &series.top_products {
            StaticChartRenderer::render_top_products(top, &top_path)?;
            charts.push(top_path);
        }

        if self.config.show {
            for path in &charts {
                open::that(path).map_err(|source| ChartError::Viewer {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        Ok(charts)
    }

    /// Write the statistics as pretty JSON when a summary path is configured.
    pub fn write_summary(&self, statistics: &StatisticsReport) -> Result<(), AnalysisError> {
        if let Some(path) = &self.config.summary {
            let json = serde_json::to_string_pretty(statistics)?;
            std::fs::write(path, json)?;
            info!("Statistics summary written to {}", path.display());
        }
        Ok(())
    }

    /// Run every stage once.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<AnalysisOutcome, AnalysisError> {
        let cleaned = self.load_and_clean(out)?;

        let statistics = self.compute_statistics(&cleaned)?;
        report::print_statistics(out, &statistics)?;
        self.write_summary(&statistics)?;

        let series = self.build_series(&cleaned)?;
        let charts = self.render_charts(&series)?;

        Ok(AnalysisOutcome {
            statistics,
            series,
            charts,
        })
    }
}
