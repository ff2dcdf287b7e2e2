//! Charts module - Histogram rendering

mod histogram;

pub use histogram::{compute_bins, Bin, ChartError, HistogramRenderer, HistogramSpec};
