//! Sales Aggregation Module
//! Buckets sales by year-month, calendar month and product code.

use super::ChartError;
use crate::data::{numeric_values, DatedSales};
use chrono::Datelike;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Calendar month bucket, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Sales amounts of `df` as f64, with missing entries counted as zero.
pub fn sales_amounts(df: &DataFrame, sales_col: &str) -> Result<Vec<f64>, ChartError> {
    let column = df.column(sales_col)?;
    Ok(numeric_values(column)?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect())
}

/// Handles group-by-and-sum operations feeding the charts.
pub struct SalesAggregator;

impl SalesAggregator {
    fn sum_by<K: Ord>(
        dated: &DatedSales,
        sales_col: &str,
        key: impl Fn(&chrono::NaiveDateTime) -> K,
    ) -> Result<Vec<(K, f64)>, ChartError> {
        let sales = sales_amounts(dated.frame(), sales_col)?;

        let mut buckets: BTreeMap<K, f64> = BTreeMap::new();
        for (date, amount) in dated.dates().iter().zip(sales) {
            *buckets.entry(key(date)).or_insert(0.0) += amount;
        }

        Ok(buckets.into_iter().collect())
    }

    /// Total sales per year-month, oldest first.
    pub fn monthly_trend(
        dated: &DatedSales,
        sales_col: &str,
    ) -> Result<Vec<(YearMonth, f64)>, ChartError> {
        let trend = Self::sum_by(dated, sales_col, |d| YearMonth::new(d.year(), d.month()))?;
        debug!("Trend has {} year-month buckets", trend.len());
        Ok(trend)
    }

    /// Total sales per calendar month number (1-12), ascending.
    pub fn monthly_seasonality(
        dated: &DatedSales,
        sales_col: &str,
    ) -> Result<Vec<(u32, f64)>, ChartError> {
        let seasonality = Self::sum_by(dated, sales_col, |d| d.month())?;
        debug!("Seasonality has {} month buckets", seasonality.len());
        Ok(seasonality)
    }

    /// The `limit` product codes with the highest total sales.
    ///
    /// Returns `Ok(None)` when the table has no product column. Groups are sorted
    /// by the product column's own dtype, so numeric codes order numerically, and
    /// the ranking sort is stable so ties keep that order.
    pub fn top_products(
        df: &DataFrame,
        product_col: &str,
        sales_col: &str,
        limit: usize,
    ) -> Result<Option<Vec<(String, f64)>>, ChartError> {
        let Ok(products) = df.column(product_col) else {
            debug!("No {} column, skipping top products", product_col);
            return Ok(None);
        };

        let amounts = Column::new(sales_col.into(), sales_amounts(df, sales_col)?);
        let grouped = DataFrame::new(vec![products.clone(), amounts])?
            .lazy()
            .filter(col(product_col).is_not_null())
            .group_by([col(product_col)])
            .agg([col(sales_col).sum()])
            .sort([product_col], SortMultipleOptions::default())
            .collect()?;

        let codes = grouped.column(product_col)?.cast(&DataType::String)?;
        let totals = grouped.column(sales_col)?;

        let mut ranked: Vec<(String, f64)> = codes
            .str()?
            .into_iter()
            .zip(totals.f64()?)
            .filter_map(|(code, total)| code.map(|c| (c.to_string(), total.unwrap_or(0.0))))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(limit);

        debug!("Ranked {} of {} product groups", ranked.len(), grouped.height());
        Ok(Some(ranked))
    }
}
