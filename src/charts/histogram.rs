//! Static Histogram Renderer
//! Bins per-student totals and draws them to PNG with plotters.
//!
//! Layout:
//! 1. Title centered above the plot
//! 2. Bars over equal-width bins spanning [min, max]
//! 3. X axis labelled by the caller, Y axis counts students

use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const WIDTH: u32 = 900;
const HEIGHT: u32 = 540;
const BAR_COLOR: RGBColor = RGBColor(91, 155, 213);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No values to plot")]
    NoData,
    #[error("Bin count must be positive")]
    NoBins,
    #[error("Failed to render chart: {0}")]
    Render(String),
}

/// One histogram bar. `upper` is exclusive except on the last bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

/// Caller-supplied labelling for one histogram.
#[derive(Debug, Clone)]
pub struct HistogramSpec {
    pub title: String,
    pub x_label: String,
    pub bins: usize,
}

/// Equal-width bins over `[min, max]`, the last bin closed on the right.
/// A single distinct value is widened to `[v - 0.5, v + 0.5]`.
pub fn compute_bins(values: &[f64], bins: usize) -> Result<Vec<Bin>, ChartError> {
    if bins == 0 {
        return Err(ChartError::NoBins);
    }
    if values.is_empty() {
        return Err(ChartError::NoData);
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0u32; bins];
    for &v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lower: min + i as f64 * width,
            upper: if i + 1 == bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count,
        })
        .collect())
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

pub struct HistogramRenderer;

impl HistogramRenderer {
    /// Draw a histogram of `values` to a PNG file at `path`.
    pub fn render(path: &Path, spec: &HistogramSpec, values: &[f64]) -> Result<(), ChartError> {
        let bins = compute_bins(values, spec.bins)?;
        let x_min = bins.first().map(|b| b.lower).unwrap_or(0.0);
        let x_max = bins.last().map(|b| b.upper).unwrap_or(1.0);
        let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) + 1;

        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 18))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x_min..x_max, 0u32..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc("Students")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.lower, 0), (b.upper, b.count)], BAR_COLOR.filled())
            }))
            .map_err(render_err)?;
        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.lower, 0), (b.upper, b.count)], BLACK.stroke_width(1))
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }
}
