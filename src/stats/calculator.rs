//! Statistics Calculator Module
//! Handles descriptive statistics (mean, median, std dev, mode) for target columns.

use crate::data::{is_numeric_dtype, numeric_values, ProcessorError};
use polars::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use statrs::statistics::{Data, Median, Statistics};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::debug;

/// Decimal places kept in reported statistics.
pub const ROUND_DECIMALS: i32 = 2;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error("Column {column} is not numeric ({dtype})")]
    NonNumeric { column: String, dtype: String },
    #[error("Column {0} has no values")]
    EmptyColumn(String),
}

/// Round to [`ROUND_DECIMALS`] places, halves to the even neighbour.
pub fn round2(value: f64) -> f64 {
    let factor = 10f64.powi(ROUND_DECIMALS);
    (value * factor).round_ties_even() / factor
}

/// Statistics for a single column.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ColumnStats {
    #[serde(skip)]
    pub column: String,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub mode: f64,
}

impl ColumnStats {
    /// Statistic name/value pairs in display order.
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("Mean", self.mean),
            ("Median", self.median),
            ("Std. Dev", self.std_dev),
            ("Mode", self.mode),
        ]
    }

    /// Look up a statistic by its display name.
    pub fn get(&self, stat_name: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(name, _)| *name == stat_name)
            .map(|(_, value)| value)
    }
}

/// Statistics per column, in the order the columns were requested.
///
/// Serializes as a map from column name to its statistics, keys in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsReport {
    columns: Vec<ColumnStats>,
}

impl Serialize for StatisticsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for stats in &self.columns {
            map.serialize_entry(&stats.column, stats)?;
        }
        map.end()
    }
}

impl StatisticsReport {
    pub fn get(&self, column: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|s| s.column == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnStats> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute rounded descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(
        column: &str,
        values: &[f64],
    ) -> Result<ColumnStats, StatsError> {
        let mode = Self::mode(values).ok_or_else(|| StatsError::EmptyColumn(column.to_string()))?;

        // statrs std_dev uses the n-1 denominator
        let mean = values.iter().mean();
        let std_dev = values.iter().std_dev();
        let median = Data::new(values.to_vec()).median();

        Ok(ColumnStats {
            column: column.to_string(),
            mean: round2(mean),
            median: round2(median),
            std_dev: round2(std_dev),
            mode: round2(mode),
        })
    }

    /// Most frequent value; the smallest one when several tie.
    pub fn mode(values: &[f64]) -> Option<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut best: Option<(f64, usize)> = None;
        let mut i = 0;
        while i < sorted.len() {
            let value = sorted[i];
            let run = sorted[i..].iter().take_while(|&&v| v == value).count().max(1);
            if best.map_or(true, |(_, count)| run > count) {
                best = Some((value, run));
            }
            i += run;
        }

        best.map(|(value, _)| value)
    }

    /// Compute statistics for each target column present in the table.
    ///
    /// Target columns missing from the table are skipped without error.
    pub fn compute_statistics<S: AsRef<str>>(
        df: &DataFrame,
        target_columns: &[S],
    ) -> Result<StatisticsReport, StatsError> {
        let mut columns = Vec::new();

        for target in target_columns {
            let name = target.as_ref();
            let Ok(column) = df.column(name) else {
                debug!("Column {} not in table, skipping statistics", name);
                continue;
            };

            if !is_numeric_dtype(column.dtype()) {
                return Err(StatsError::NonNumeric {
                    column: name.to_string(),
                    dtype: column.dtype().to_string(),
                });
            }

            let values: Vec<f64> = numeric_values(column)?.into_iter().flatten().collect();
            columns.push(Self::compute_descriptive_stats(name, &values)?);
        }

        Ok(StatisticsReport { columns })
    }
}
