//! Stats module - Descriptive statistics and cohort comparison

mod calculator;
mod metric;

pub use calculator::{CohortComparison, StatsCalculator, Summary, SIGNIFICANCE_THRESHOLD};
pub use metric::Metric;
