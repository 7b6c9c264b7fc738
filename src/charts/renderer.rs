//! Static Chart Renderer
//! Draws the three sales charts to PNG files with plotters.
//!
//! Charts:
//! 1. Sales Trend Over Time: line with markers, one point per year-month
//! 2. Seasonal Sales Patterns: vertical bars indexed by month number
//! 3. Top 10 Performing Products: horizontal bars, best seller on top

use super::{ChartError, YearMonth};
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::info;

pub const TREND_FILE: &str = "sales_trend.png";
pub const MONTHLY_FILE: &str = "monthly_sales.png";
pub const TOP_PRODUCTS_FILE: &str = "top_products.png";

const TREND_SIZE: (u32, u32) = (1200, 600);
const BAR_SIZE: (u32, u32) = (1000, 600);

const LINE_BLUE: RGBColor = RGBColor(31, 119, 180);
const GRID_GRAY: RGBColor = RGBColor(220, 220, 220);

/// Viridis samples, dark to light.
const VIRIDIS: [RGBColor; 12] = [
    RGBColor(68, 1, 84),
    RGBColor(72, 26, 108),
    RGBColor(71, 47, 125),
    RGBColor(65, 68, 135),
    RGBColor(57, 86, 140),
    RGBColor(49, 104, 142),
    RGBColor(42, 120, 142),
    RGBColor(35, 137, 142),
    RGBColor(31, 154, 138),
    RGBColor(53, 183, 121),
    RGBColor(110, 206, 88),
    RGBColor(181, 222, 43),
];

/// Coolwarm samples, blue to red.
const COOLWARM: [RGBColor; 10] = [
    RGBColor(59, 76, 192),
    RGBColor(88, 118, 226),
    RGBColor(121, 157, 251),
    RGBColor(155, 188, 255),
    RGBColor(189, 210, 246),
    RGBColor(220, 221, 221),
    RGBColor(242, 203, 183),
    RGBColor(246, 167, 137),
    RGBColor(231, 117, 91),
    RGBColor(180, 4, 38),
];

/// Pick `count` palette entries spread evenly across `palette`.
fn spread_colors(palette: &[RGBColor], count: usize) -> Vec<RGBColor> {
    if count <= 1 {
        return palette.iter().take(count).copied().collect();
    }
    (0..count)
        .map(|i| palette[i * (palette.len() - 1) / (count - 1)])
        .collect()
}

/// Upper axis bound with headroom above the largest value.
fn value_ceiling(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn drawing_error(e: Box<dyn Error>) -> ChartError {
    ChartError::Drawing(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Chart paths inside `output_dir`, in render order.
    pub fn chart_paths(output_dir: &Path) -> [PathBuf; 3] {
        [
            output_dir.join(TREND_FILE),
            output_dir.join(MONTHLY_FILE),
            output_dir.join(TOP_PRODUCTS_FILE),
        ]
    }

    /// Render the year-month trend line chart.
    pub fn render_trend(trend: &[(YearMonth, f64)], path: &Path) -> Result<(), ChartError> {
        if trend.is_empty() {
            return Err(ChartError::EmptySeries("sales trend"));
        }
        Self::draw_trend(trend, path).map_err(drawing_error)?;
        info!("Sales trend chart written to {}", path.display());
        Ok(())
    }

    /// Render the month-number seasonality bar chart.
    pub fn render_monthly(monthly: &[(u32, f64)], path: &Path) -> Result<(), ChartError> {
        if monthly.is_empty() {
            return Err(ChartError::EmptySeries("monthly sales"));
        }
        Self::draw_monthly(monthly, path).map_err(drawing_error)?;
        info!("Monthly sales chart written to {}", path.display());
        Ok(())
    }

    /// Render the top-products horizontal bar chart.
    pub fn render_top_products(top: &[(String, f64)], path: &Path) -> Result<(), ChartError> {
        if top.is_empty() {
            return Err(ChartError::EmptySeries("top products"));
        }
        Self::draw_top_products(top, path).map_err(drawing_error)?;
        info!("Top products chart written to {}", path.display());
        Ok(())
    }

    fn draw_trend(trend: &[(YearMonth, f64)], path: &Path) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(path, TREND_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let labels: Vec<String> = trend.iter().map(|(ym, _)| ym.to_string()).collect();
        let n = trend.len();
        let y_max = value_ceiling(trend.iter().map(|(_, v)| *v));

        let mut chart = ChartBuilder::on(&root)
            .caption("Sales Trend Over Time", ("sans-serif", 32).into_font())
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        chart
            .configure_mesh()
            .light_line_style(GRID_GRAY)
            .x_labels(n.min(40))
            .x_label_formatter(&|x: &f64| {
                let idx = x.round();
                if idx >= 0.0 && (x - idx).abs() < 1e-6 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .y_label_formatter(&|y: &f64| format!("{:.0}", y))
            .x_desc("Year-Month")
            .y_desc("Total Sales")
            .axis_desc_style(("sans-serif", 18))
            .draw()?;

        let points: Vec<(f64, f64)> = trend
            .iter()
            .enumerate()
            .map(|(i, (_, v))| (i as f64, *v))
            .collect();

        chart.draw_series(LineSeries::new(points.iter().copied(), LINE_BLUE.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 5, LINE_BLUE.filled())),
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_monthly(monthly: &[(u32, f64)], path: &Path) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(path, BAR_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let first = monthly.first().map(|(m, _)| *m).unwrap_or(1);
        let last = monthly.last().map(|(m, _)| *m).unwrap_or(12);
        let y_max = value_ceiling(monthly.iter().map(|(_, v)| *v));

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Seasonal Sales Patterns (Monthly Sales)",
                ("sans-serif", 30).into_font(),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d((first as f64 - 0.5)..(last as f64 + 0.5), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(GRID_GRAY)
            .x_labels((last - first + 1) as usize)
            .x_label_formatter(&|x: &f64| {
                let month = x.round();
                if (x - month).abs() < 1e-6 && monthly.iter().any(|(m, _)| *m as f64 == month) {
                    format!("{}", month as u32)
                } else {
                    String::new()
                }
            })
            .y_label_formatter(&|y: &f64| format!("{:.0}", y))
            .x_desc("Month")
            .y_desc("Total Sales")
            .axis_desc_style(("sans-serif", 18))
            .draw()?;

        let colors = spread_colors(&VIRIDIS, monthly.len());
        chart.draw_series(monthly.iter().zip(colors).map(|(&(month, total), color)| {
            let x = month as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, total)], color.filled())
        }))?;

        root.present()?;
        Ok(())
    }

    fn draw_top_products(top: &[(String, f64)], path: &Path) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(path, BAR_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let n = top.len();
        let x_max = value_ceiling(top.iter().map(|(_, v)| *v));

        // Row 0 is drawn at the top of the chart
        let row_y = |rank: usize| (n - 1 - rank) as f64;

        let mut chart = ChartBuilder::on(&root)
            .caption("Top 10 Performing Products", ("sans-serif", 30).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(110)
            .build_cartesian_2d(0f64..x_max, -0.5f64..(n as f64 - 0.5))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .light_line_style(GRID_GRAY)
            .y_labels(n)
            .y_label_formatter(&|y: &f64| {
                let row = y.round();
                if row >= 0.0 && (y - row).abs() < 1e-6 && (row as usize) < n {
                    top[n - 1 - row as usize].0.clone()
                } else {
                    String::new()
                }
            })
            .x_label_formatter(&|x: &f64| format!("{:.0}", x))
            .x_desc("Total Sales")
            .y_desc("Product Code")
            .axis_desc_style(("sans-serif", 18))
            .draw()?;

        let colors = spread_colors(&COOLWARM, n);
        chart.draw_series(top.iter().enumerate().zip(colors).map(
            |((rank, (_, total)), color)| {
                let y = row_y(rank);
                Rectangle::new([(0.0, y - 0.4), (*total, y + 0.4)], color.filled())
            },
        ))?;

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_colors_covers_palette_ends() {
        let colors = spread_colors(&VIRIDIS, 3);
        assert_eq!(colors, vec![VIRIDIS[0], VIRIDIS[5], VIRIDIS[11]]);
        assert_eq!(spread_colors(&COOLWARM, 10), COOLWARM.to_vec());
        assert_eq!(spread_colors(&COOLWARM, 1), vec![COOLWARM[0]]);
        assert!(spread_colors(&COOLWARM, 0).is_empty());
    }

    #[test]
    fn ceiling_leaves_headroom() {
        assert!((value_ceiling([100.0, 50.0].into_iter()) - 110.0).abs() < 1e-9);
        assert_eq!(value_ceiling(std::iter::empty()), 1.0);
    }

    #[test]
    fn empty_series_are_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let [trend, monthly, top] = StaticChartRenderer::chart_paths(dir.path());

        assert!(matches!(
            StaticChartRenderer::render_trend(&[], &trend),
            Err(ChartError::EmptySeries(_))
        ));
        assert!(matches!(
            StaticChartRenderer::render_monthly(&[], &monthly),
            Err(ChartError::EmptySeries(_))
        ));
        assert!(matches!(
            StaticChartRenderer::render_top_products(&[], &top),
            Err(ChartError::EmptySeries(_))
        ));
        assert!(!trend.exists());
    }
}
