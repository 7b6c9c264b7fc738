//! Console diagnostics and statistics output.

use crate::stats::StatisticsReport;
use polars::prelude::*;
use std::io::{self, Write};

/// Rows shown in table previews.
pub const PREVIEW_ROWS: usize = 5;

/// Format a statistic the way it reads in the console: `35.0`, `3553.89`, `NaN`.
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

pub fn print_shape<W: Write>(out: &mut W, label: &str, df: &DataFrame) -> io::Result<()> {
    writeln!(out, "\n{} shape: ({}, {})", label, df.height(), df.width())
}

pub fn print_preview<W: Write>(out: &mut W, heading: &str, df: &DataFrame) -> io::Result<()> {
    writeln!(out, "\n{}", heading)?;
    writeln!(out, "{}", df.head(Some(PREVIEW_ROWS)))
}

pub fn print_null_counts<W: Write>(
    out: &mut W,
    heading: &str,
    counts: &[(String, usize)],
) -> io::Result<()> {
    writeln!(out, "\n{}", heading)?;
    let width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, nulls) in counts {
        writeln!(out, "{:<width$}  {}", name, nulls, width = width)?;
    }
    Ok(())
}

pub fn print_statistics<W: Write>(out: &mut W, report: &StatisticsReport) -> io::Result<()> {
    writeln!(out, "\nSummary Statistics:")?;
    for stats in report.iter() {
        writeln!(out, "\nStatistics for {}:", stats.column)?;
        for (name, value) in stats.entries() {
            writeln!(out, "{}: {}", name, format_value(value))?;
        }
    }
    Ok(())
}
