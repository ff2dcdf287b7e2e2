//! Statistics Calculator Module
//! Handles descriptive stats and the Welch t-test between cohorts.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance threshold for t-test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Descriptive statistics for one collection of per-student totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Passing cohort measured against the non-passing cohort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CohortComparison {
    pub mean_difference: f64,
    pub p_value: Option<f64>,
    pub is_significant: bool,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Mean, population std, min and max. `None` for an empty collection.
    pub fn describe(values: &[f64]) -> Option<Summary> {
        let n = values.len();
        if n == 0 {
            return None;
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Summary {
            count: n,
            mean,
            std: variance.sqrt(),
            min,
            max,
        })
    }

    /// Two-sided p-value of Welch's unequal-variance t-test.
    ///
    /// `None` when either side has fewer than two values, since the sample
    /// variance is undefined. Two constant samples give `Some(1.0)`.
    pub fn welch_p_value(a: &[f64], b: &[f64]) -> Option<f64> {
        let a = SampleMoments::of(a)?;
        let b = SampleMoments::of(b)?;

        let (wa, wb) = (a.weighted_variance(), b.weighted_variance());
        let pooled = wa + wb;
        if pooled == 0.0 {
            return Some(1.0);
        }

        let t = (a.mean - b.mean) / pooled.sqrt();
        let df = pooled.powi(2) / (wa.powi(2) / (a.n - 1.0) + wb.powi(2) / (b.n - 1.0));

        let dist = StudentsT::new(0.0, 1.0, df).ok()?;
        Some(2.0 * dist.sf(t.abs()))
    }

    /// Compare passing totals with non-passing totals. `None` if either side is empty.
    pub fn compare(passing: &[f64], non_passing: &[f64]) -> Option<CohortComparison> {
        let passing_stats = Self::describe(passing)?;
        let non_passing_stats = Self::describe(non_passing)?;

        let p_value = Self::welch_p_value(passing, non_passing);

        Some(CohortComparison {
            mean_difference: passing_stats.mean - non_passing_stats.mean,
            p_value,
            is_significant: p_value.is_some_and(|p| p <= SIGNIFICANCE_THRESHOLD),
        })
    }
}

/// Sample size, mean and unbiased (n - 1) variance.
struct SampleMoments {
    n: f64,
    mean: f64,
    variance: f64,
}

impl SampleMoments {
    fn of(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(Self { n, mean, variance })
    }

    /// Variance of the sample mean.
    fn weighted_variance(&self) -> f64 {
        self.variance / self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_uses_population_std() {
        let summary = StatsCalculator::describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(summary.count, 8);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.std, 2.0);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
    }

    #[test]
    fn test_describe_single_value() {
        let summary = StatsCalculator::describe(&[3.5]).unwrap();
        assert_eq!(summary.mean, 3.5);
        assert_eq!(summary.std, 0.0);
        assert_eq!(summary.min, 3.5);
        assert_eq!(summary.max, 3.5);
    }

    #[test]
    fn test_describe_empty() {
        assert!(StatsCalculator::describe(&[]).is_none());
    }

    #[test]
    fn test_welch_constant_samples() {
        assert_eq!(StatsCalculator::welch_p_value(&[1.0, 1.0, 1.0], &[1.0, 1.0]), Some(1.0));
    }

    #[test]
    fn test_welch_needs_two_values_per_side() {
        assert_eq!(StatsCalculator::welch_p_value(&[1.0], &[1.0, 2.0]), None);
        assert_eq!(StatsCalculator::welch_p_value(&[1.0, 2.0], &[]), None);
    }

    #[test]
    fn test_welch_matches_reference_value() {
        // t = -sqrt(3), df = 75/17
        let p = StatsCalculator::welch_p_value(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!((p - 0.1516).abs() < 1e-3, "p = {p}");
    }

    #[test]
    fn test_compare_separated_cohorts_are_significant() {
        let passing = [100.0, 102.0, 98.0, 101.0, 99.0, 100.5];
        let non_passing = [10.0, 12.0, 8.0, 11.0, 9.0, 10.5];
        let comparison = StatsCalculator::compare(&passing, &non_passing).unwrap();
        assert!(comparison.p_value.unwrap() < 0.001);
        assert!(comparison.is_significant);
    }

    #[test]
    fn test_compare_small_cohort_has_no_p_value() {
        let comparison = StatsCalculator::compare(&[30.5], &[5.0, 75.25]).unwrap();
        assert_eq!(comparison.mean_difference, 30.5 - 40.125);
        assert_eq!(comparison.p_value, None);
        assert!(!comparison.is_significant);

        assert!(StatsCalculator::compare(&[], &[1.0]).is_none());
    }
}
