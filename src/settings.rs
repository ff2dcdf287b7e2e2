use crate::pipeline::{DataSources, Milestone};
use crate::stats::Metric;
use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Compare first-week engagement of students who pass a project with those who don't
#[derive(Parser, Debug, Clone)]
#[command(
    name = "engagement-study",
    about = "Compare first-week engagement of students who pass a project with those who don't",
    version
)]
pub struct Settings {
    /// Enrollments CSV
    #[arg(long, env = "ENGAGEMENT_STUDY_ENROLLMENTS", default_value = "enrollments.csv")]
    pub enrollments: PathBuf,

    /// Daily engagement CSV
    #[arg(long, env = "ENGAGEMENT_STUDY_ENGAGEMENT", default_value = "daily_engagement.csv")]
    pub engagement: PathBuf,

    /// Project submissions CSV
    #[arg(long, env = "ENGAGEMENT_STUDY_SUBMISSIONS", default_value = "project_submissions.csv")]
    pub submissions: PathBuf,

    /// Student id column in the engagement CSV (renamed to account_key)
    #[arg(long, default_value = "acct")]
    pub engagement_account_column: String,

    /// Lesson keys identifying the milestone project (repeatable)
    #[arg(long = "lesson-key", default_values_t = ["746169184".to_string(), "3176718735".to_string()])]
    pub lesson_keys: Vec<String>,

    /// Ratings that count as passing (repeatable)
    #[arg(long = "passing-rating", default_values_t = ["PASSED".to_string(), "DISTINCTION".to_string()])]
    pub passing_ratings: Vec<String>,

    /// Metrics to report (repeatable)
    #[arg(long = "metric", value_enum, default_values_t = Metric::DEFAULTS)]
    pub metrics: Vec<Metric>,

    /// Histogram bin count
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u16).range(1..=200))]
    pub bins: u16,

    /// Directory for histograms and summary.json
    #[arg(long, env = "ENGAGEMENT_STUDY_OUTPUT_DIR", default_value = "report")]
    pub output_dir: PathBuf,

    /// Skip histogram rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Logging filter (e.g. info, debug, engagement_study=trace)
    #[arg(long, env = "ENGAGEMENT_STUDY_LOG", default_value = "info")]
    pub log_level: String,
}

impl Settings {
    pub fn sources(&self) -> DataSources {
        DataSources {
            enrollments: self.enrollments.clone(),
            engagement: self.engagement.clone(),
            submissions: self.submissions.clone(),
        }
    }

    pub fn milestone(&self) -> Milestone {
        Milestone::new(self.lesson_keys.clone(), self.passing_ratings.clone())
    }
}
