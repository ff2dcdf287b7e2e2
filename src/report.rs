//! Report Module
//! Turns pipeline output into per-metric cohort statistics, console text,
//! a JSON summary and histogram images.

use crate::charts::{HistogramRenderer, HistogramSpec};
use crate::data::EngagementRecord;
use crate::pipeline::{audit, Milestone, PipelineOutput};
use crate::stats::{CohortComparison, Metric, StatsCalculator, Summary};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which slice of the first-week data a set of totals belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    All,
    Passing,
    NonPassing,
}

impl Cohort {
    pub fn name(self) -> &'static str {
        match self {
            Cohort::All => "all",
            Cohort::Passing => "passing",
            Cohort::NonPassing => "non_passing",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Cohort::All => "all paid students",
            Cohort::Passing => "students who pass the project",
            Cohort::NonPassing => "students who do not pass the project",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub enrollments: usize,
    pub engagement: usize,
    pub submissions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopStudent {
    pub account_key: String,
    pub total_minutes_visited: f64,
    pub first_week_records: usize,
}

/// Per-student totals of one metric, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortValues {
    pub all: Vec<f64>,
    pub passing: Vec<f64>,
    pub non_passing: Vec<f64>,
}

impl CohortValues {
    pub fn get(&self, cohort: Cohort) -> &[f64] {
        match cohort {
            Cohort::All => &self.all,
            Cohort::Passing => &self.passing,
            Cohort::NonPassing => &self.non_passing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReport {
    pub metric: Metric,
    pub all: Option<Summary>,
    pub passing: Option<Summary>,
    pub non_passing: Option<Summary>,
    pub comparison: Option<CohortComparison>,
    #[serde(skip)]
    pub values: CohortValues,
}

impl MetricReport {
    pub fn summary(&self, cohort: Cohort) -> Option<&Summary> {
        match cohort {
            Cohort::All => self.all.as_ref(),
            Cohort::Passing => self.passing.as_ref(),
            Cohort::NonPassing => self.non_passing.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub lesson_keys: Vec<String>,
    pub passing_ratings: Vec<String>,
    pub rows: TableCounts,
    pub unique_students: TableCounts,
    pub enrollments_missing_engagement: usize,
    pub test_accounts: usize,
    pub paid_students: usize,
    pub paid_rows: TableCounts,
    pub first_week_records: usize,
    pub passing_students: usize,
    pub top_student: Option<TopStudent>,
    pub metrics: Vec<MetricReport>,
}

fn sorted_values(engagement: &[EngagementRecord], metric: Metric) -> Vec<f64> {
    let mut values: Vec<f64> = metric.totals(engagement).into_values().collect();
    values.sort_by(f64::total_cmp);
    values
}

fn sorted_strings<'a>(items: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = items.into_iter().cloned().collect();
    out.sort();
    out
}

fn metric_report(output: &PipelineOutput, metric: Metric) -> MetricReport {
    let values = CohortValues {
        all: sorted_values(&output.first_week, metric),
        passing: sorted_values(&output.cohorts.passing, metric),
        non_passing: sorted_values(&output.cohorts.non_passing, metric),
    };

    MetricReport {
        metric,
        all: StatsCalculator::describe(&values.all),
        passing: StatsCalculator::describe(&values.passing),
        non_passing: StatsCalculator::describe(&values.non_passing),
        comparison: StatsCalculator::compare(&values.passing, &values.non_passing),
        values,
    }
}

/// Compute every figure the report shows.
pub fn build_report(output: &PipelineOutput, milestone: &Milestone, metrics: &[Metric]) -> Report {
    let tables = &output.tables;
    let engaged = audit::unique_students(&tables.engagement);

    let minutes = Metric::TotalMinutesVisited.totals(&output.first_week);
    let top_student = audit::top_student(&minutes).map(|(key, total)| TopStudent {
        account_key: key.to_string(),
        total_minutes_visited: total,
        first_week_records: audit::records_for(&output.first_week, key).len(),
    });

    Report {
        lesson_keys: sorted_strings(&milestone.lesson_keys),
        passing_ratings: sorted_strings(&milestone.passing_ratings),
        rows: TableCounts {
            enrollments: tables.enrollments.len(),
            engagement: tables.engagement.len(),
            submissions: tables.submissions.len(),
        },
        unique_students: TableCounts {
            enrollments: audit::unique_students(&tables.enrollments).len(),
            engagement: engaged.len(),
            submissions: audit::unique_students(&tables.submissions).len(),
        },
        enrollments_missing_engagement: audit::enrollments_missing_engagement(
            &tables.enrollments,
            &engaged,
        )
        .len(),
        test_accounts: output.test_accounts.len(),
        paid_students: output.paid_students.len(),
        paid_rows: TableCounts {
            enrollments: output.paid_enrollments.len(),
            engagement: output.paid_engagement.len(),
            submissions: output.paid_submissions.len(),
        },
        first_week_records: output.first_week.len(),
        passing_students: output.pass_set.len(),
        top_student,
        metrics: metrics.iter().map(|&m| metric_report(output, m)).collect(),
    }
}

fn write_summary(out: &mut impl Write, label: &str, summary: Option<&Summary>) -> std::io::Result<()> {
    writeln!(out, "{label}:")?;
    match summary {
        Some(s) => {
            writeln!(out, "  Students:           {}", s.count)?;
            writeln!(out, "  Mean:               {:.3}", s.mean)?;
            writeln!(out, "  Standard deviation: {:.3}", s.std)?;
            writeln!(out, "  Minimum:            {:.3}", s.min)?;
            writeln!(out, "  Maximum:            {:.3}", s.max)?;
        }
        None => writeln!(out, "  (no students)")?,
    }
    Ok(())
}

/// Human-readable report.
pub fn write_text(out: &mut impl Write, report: &Report) -> std::io::Result<()> {
    writeln!(
        out,
        "Rows (enrollments / engagement / submissions): {} / {} / {}",
        report.rows.enrollments, report.rows.engagement, report.rows.submissions
    )?;
    writeln!(
        out,
        "Unique students: {} / {} / {}",
        report.unique_students.enrollments,
        report.unique_students.engagement,
        report.unique_students.submissions
    )?;
    writeln!(
        out,
        "Enrollments missing engagement: {}",
        report.enrollments_missing_engagement
    )?;
    writeln!(out, "Test accounts: {}", report.test_accounts)?;
    writeln!(
        out,
        "Paid students: {} (rows {} / {} / {})",
        report.paid_students,
        report.paid_rows.enrollments,
        report.paid_rows.engagement,
        report.paid_rows.submissions
    )?;
    writeln!(out, "First-week engagement records: {}", report.first_week_records)?;
    writeln!(
        out,
        "Students passing lessons [{}] with [{}]: {}",
        report.lesson_keys.join(", "),
        report.passing_ratings.join(", "),
        report.passing_students
    )?;
    if let Some(top) = &report.top_student {
        writeln!(
            out,
            "Most first-week minutes: account {} with {:.3} over {} records",
            top.account_key, top.total_minutes_visited, top.first_week_records
        )?;
    }

    for metric in &report.metrics {
        writeln!(out)?;
        writeln!(out, "== {} ==", metric.metric.title())?;
        write_summary(out, Cohort::All.description(), metric.all.as_ref())?;
        write_summary(out, Cohort::NonPassing.description(), metric.non_passing.as_ref())?;
        write_summary(out, Cohort::Passing.description(), metric.passing.as_ref())?;
        if let Some(cmp) = &metric.comparison {
            let p = cmp
                .p_value
                .map(|p| format!("{p:.4}"))
                .unwrap_or_else(|| "-".into());
            writeln!(
                out,
                "Passing minus non-passing mean: {:.3} (p = {}{})",
                cmp.mean_difference,
                p,
                if cmp.is_significant { ", significant" } else { "" }
            )?;
        }
    }
    Ok(())
}

/// Print the report to stdout.
pub fn print_report(report: &Report) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_text(&mut out, report)
}

/// Store the report as pretty JSON.
pub fn write_json(report: &Report, path: &Path) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Histogram of one metric for the passing and non-passing cohorts.
///
/// Rendering failures are logged and skipped; the numbers in `report` are
/// never affected. Returns the files actually written.
pub fn render_charts(report: &Report, dir: &Path, default_bins: usize) -> Vec<PathBuf> {
    let mut written = Vec::new();

    for metric in &report.metrics {
        for cohort in [Cohort::NonPassing, Cohort::Passing] {
            let values = metric.values.get(cohort);
            if values.is_empty() {
                tracing::debug!(
                    metric = metric.metric.name(),
                    cohort = cohort.name(),
                    "No students; skipping histogram"
                );
                continue;
            }

            let path = dir.join(format!("{}_{}.png", metric.metric.name(), cohort.name()));
            let spec = HistogramSpec {
                title: format!(
                    "{} in the first week for {}",
                    metric.metric.title(),
                    cohort.description()
                ),
                x_label: metric.metric.axis_label().to_string(),
                bins: metric.metric.bins(default_bins),
            };

            match HistogramRenderer::render(&path, &spec, values) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "Wrote histogram");
                    written.push(path);
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Histogram not rendered"),
            }
        }
    }

    written
}
