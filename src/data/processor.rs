//! Data Processor Module
//! Handles null diagnostics, median imputation and null-row removal.

use polars::prelude::*;
use statrs::statistics::{Data, Median};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Whether a dtype takes part in median imputation and statistics.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Present values of a numeric column as f64. Float NaN counts as missing.
pub fn numeric_values(column: &Column) -> Result<Vec<Option<f64>>, ProcessorError> {
    let cast = column.cast(&DataType::Float64)?;
    let values = cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Handles data cleaning operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Null count per column, in column order.
    pub fn null_counts(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }

    /// Get list of numeric column names.
    pub fn get_numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Replace missing entries of every numeric column with that column's median.
    ///
    /// Returns the columns that were imputed together with the median used.
    /// Columns without missing entries keep their dtype; imputed ones become Float64.
    pub fn impute_numeric_medians(
        df: &mut DataFrame,
    ) -> Result<Vec<(String, f64)>, ProcessorError> {
        let mut imputed = Vec::new();

        for name in Self::get_numeric_columns(df) {
            let column = df.column(&name)?;
            let values = numeric_values(column)?;
            if values.iter().all(Option::is_some) {
                continue;
            }

            let present: Vec<f64> = values.iter().flatten().copied().collect();
            if present.is_empty() {
                debug!("Column {} has no values to take a median from", name);
                continue;
            }
            let median = Data::new(present).median();

            let filled: Vec<f64> = values.iter().map(|v| v.unwrap_or(median)).collect();
            df.with_column(Column::new(name.as_str().into(), filled))?;
            debug!("Imputed {} with median {}", name, median);
            imputed.push((name, median));
        }

        Ok(imputed)
    }

    /// Drop every row that still has a null in any column.
    pub fn drop_null_rows(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let cleaned = df.drop_nulls::<String>(None)?;
        debug!("Dropped {} rows with nulls", df.height() - cleaned.height());
        Ok(cleaned)
    }

    /// Impute numeric medians, then drop remaining rows with nulls.
    pub fn clean(mut df: DataFrame) -> Result<DataFrame, ProcessorError> {
        Self::impute_numeric_medians(&mut df)?;
        Self::drop_null_rows(&df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "SALES" => [Some(100.0), None, Some(300.0), Some(200.0), None],
            "QUANTITYORDERED" => [Some(1i64), Some(5), None, Some(3), Some(2)],
            "STATUS" => [Some("Shipped"), Some("Shipped"), None, Some("Cancelled"), Some("Shipped")],
        )
        .unwrap()
    }

    #[test]
    fn imputed_entries_equal_pre_imputation_median() {
        let mut df = sample();
        let imputed = DataProcessor::impute_numeric_medians(&mut df).unwrap();

        assert_eq!(
            imputed,
            vec![
                ("SALES".to_string(), 200.0),
                ("QUANTITYORDERED".to_string(), 2.5)
            ]
        );

        let sales = df.column("SALES").unwrap();
        assert_eq!(sales.null_count(), 0);
        let sales: Vec<f64> = sales.f64().unwrap().into_no_null_iter().collect();
        assert_eq!(sales, vec![100.0, 200.0, 300.0, 200.0, 200.0]);

        let qty = df.column("QUANTITYORDERED").unwrap();
        assert_eq!(qty.f64().unwrap().get(2), Some(2.5));
    }

    #[test]
    fn non_numeric_nulls_drop_the_row() {
        let cleaned = DataProcessor::clean(sample()).unwrap();

        assert_eq!(cleaned.height(), 4);
        assert!(DataProcessor::null_counts(&cleaned)
            .iter()
            .all(|(_, nulls)| *nulls == 0));
        let status: Vec<&str> = cleaned
            .column("STATUS")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(status, vec!["Shipped", "Shipped", "Cancelled", "Shipped"]);
    }

    #[test]
    fn complete_numeric_columns_keep_their_dtype() {
        let mut df = df!(
            "QUANTITYORDERED" => [1i64, 2, 3],
            "SALES" => [Some(1.0), None, Some(3.0)],
        )
        .unwrap();
        DataProcessor::impute_numeric_medians(&mut df).unwrap();
        assert_eq!(df.column("QUANTITYORDERED").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("SALES").unwrap().f64().unwrap().get(1), Some(2.0));
    }

    #[test]
    fn all_null_numeric_column_drops_every_row() {
        let df = df!(
            "SALES" => [None::<f64>, None],
            "PRODUCTCODE" => ["S10_1678", "S10_1949"],
        )
        .unwrap();
        let cleaned = DataProcessor::clean(df).unwrap();
        assert_eq!(cleaned.height(), 0);
    }

    #[test]
    fn null_counts_follow_column_order() {
        let counts = DataProcessor::null_counts(&sample());
        assert_eq!(
            counts,
            vec![
                ("SALES".to_string(), 2),
                ("QUANTITYORDERED".to_string(), 1),
                ("STATUS".to_string(), 1)
            ]
        );
    }
}
