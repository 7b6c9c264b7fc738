//! Order date parsing.
//!
//! Dates are parsed once into a [`DatedSales`] value that the trend,
//! seasonality and top-products stages all consume.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::{debug, warn};

use super::processor::ProcessorError;

/// Date-time layouts tried in order.
const DATETIME_FORMATS: [&str; 8] = [
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%m-%d-%Y %H:%M",
];

/// Date-only layouts tried after the date-time ones.
const DATE_FORMATS: [&str; 7] = [
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%d-%b-%Y",
];

/// Parse a date or date-time string. Returns `None` when no layout matches.
pub fn parse_order_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Sales rows whose order date parsed, with the parsed date of each row.
#[derive(Debug, Clone)]
pub struct DatedSales {
    frame: DataFrame,
    dates: Vec<NaiveDateTime>,
    dropped: usize,
}

impl DatedSales {
    /// Parse `date_col` of `df`.
    ///
    /// Returns `Ok(None)` when the table has no such column. Rows whose date
    /// cannot be parsed are dropped from the returned frame.
    pub fn parse(df: &DataFrame, date_col: &str) -> Result<Option<Self>, ProcessorError> {
        let Ok(column) = df.column(date_col) else {
            debug!("No {} column, skipping date parsing", date_col);
            return Ok(None);
        };

        let as_text = column.cast(&DataType::String)?;
        let parsed: Vec<Option<NaiveDateTime>> = as_text
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_order_date))
            .collect();

        let mask: BooleanChunked = parsed.iter().map(Option::is_some).collect();
        let frame = df.filter(&mask)?;
        let dates: Vec<NaiveDateTime> = parsed.into_iter().flatten().collect();
        let dropped = df.height() - frame.height();

        if dropped > 0 {
            warn!("Dropped {} rows with unparsable {}", dropped, date_col);
        }

        Ok(Some(Self {
            frame,
            dates,
            dropped,
        }))
    }

    /// Rows whose date parsed.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Parsed dates, aligned with the rows of [`Self::frame`].
    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    /// Number of rows removed because their date did not parse.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_common_layouts() {
        let dt = parse_order_date("2/24/2003 0:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2003, 2, 24));

        let dt = parse_order_date("2004-11-05 13:45:00").unwrap();
        assert_eq!((dt.month(), dt.hour(), dt.minute()), (11, 13, 45));

        let dt = parse_order_date("2005-05-31").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2005, 5, 31));

        let dt = parse_order_date("2003-07-01T08:00:00Z").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.hour()), (2003, 7, 8));
    }

    #[test]
    fn offset_timestamps_keep_their_wall_clock() {
        let dt = parse_order_date("2003-01-31T23:00:00-05:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2003, 1, 31, 23));

        let dt = parse_order_date("2004-12-01T00:30:00+02:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2004, 12, 1));
    }

    #[test]
    fn garbage_is_not_a_date() {
        assert_eq!(parse_order_date("not a date"), None);
        assert_eq!(parse_order_date("   "), None);
        assert_eq!(parse_order_date("13/45/2003"), None);
    }

    #[test]
    fn unparsable_rows_are_dropped() {
        let df = df!(
            "ORDERDATE" => ["1/6/2003 0:00", "garbage", "2/24/2003 0:00"],
            "SALES" => [100.0, 50.0, 200.0],
        )
        .unwrap();

        let dated = DatedSales::parse(&df, "ORDERDATE").unwrap().unwrap();
        assert_eq!(dated.dropped(), 1);
        assert_eq!(dated.frame().height(), 2);
        assert_eq!(dated.dates().len(), 2);
        assert_eq!(dated.dates()[1].month(), 2);

        let sales: Vec<f64> = dated
            .frame()
            .column("SALES")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(sales, vec![100.0, 200.0]);
    }

    #[test]
    fn absent_date_column_is_skipped() {
        let df = df!("SALES" => [1.0, 2.0]).unwrap();
        assert!(DatedSales::parse(&df, "ORDERDATE").unwrap().is_none());
    }
}
