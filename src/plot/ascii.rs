//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - aggregated points: `o`
//! - linear interpolation between points: `-`

use chrono::{Datelike, NaiveDate};

use crate::domain::AggregatedSeries;

/// Render an aggregated sales series as a fixed-grid line plot.
///
/// An empty series renders a one-line "no data" notice rather than erroring.
pub fn render_ascii_plot(series: &AggregatedSeries, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some(date_min), Some(date_max)) = (series.date_min, series.date_max) else {
        return "Plot: (no data)\n".to_string();
    };

    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .map(|p| (epoch_days(p.date), p.sales))
        .collect();

    let x_min = epoch_days(date_min);
    // A single-date series still needs a non-degenerate x range.
    let x_max = epoch_days(date_max).max(x_min + 1.0);

    let (y_min, y_max) = sales_range(&points);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Interpolated line first, so the point markers overlay it.
    for col in 0..width {
        let x = x_min + (x_max - x_min) * col as f64 / (width - 1) as f64;
        if let Some(y) = interpolate(&points, x) {
            let row = map_y(y, y_min, y_max, height);
            grid[row][col] = '-';
        }
    }

    for &(x, y) in &points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dates=[{date_min}, {date_max}] | sales=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn epoch_days(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn sales_range(points: &[(f64, f64)]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &(_, y) in points {
        min = min.min(y);
        max = max.max(y);
    }
    if !min.is_finite() || !max.is_finite() {
        (0.0, 1.0)
    } else {
        (min, max)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let pad = ((max - min).abs() * frac).max(1e-9);
    (min - pad, max + pad)
}

/// Linear interpolation along the series; `None` outside the data range.
fn interpolate(points: &[(f64, f64)], x: f64) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;
    if x < first.0 || x > last.0 {
        return None;
    }

    let mut prev = *first;
    for &point in points {
        if point.0 >= x {
            if (point.0 - prev.0).abs() < 1e-12 {
                return Some(point.1);
            }
            let u = (x - prev.0) / (point.0 - prev.0);
            return Some(prev.1 + u * (point.1 - prev.1));
        }
        prev = point;
    }
    Some(last.1)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    ((width - 1) as f64 * u).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the grid.
    (height - 1) - ((height - 1) as f64 * u).round() as usize
}
