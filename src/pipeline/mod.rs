//! Pipeline module - filtering, windowing, grouping and cohort splitting

pub mod aggregate;
pub mod audit;
mod cohort;
mod filters;
mod window;

pub use aggregate::{group_data, sum_grouped_items};
pub use cohort::{split_cohorts, Cohorts, Milestone};
pub use filters::{PaidStudents, TestAccounts};
pub use window::{first_week_engagement, within_one_week, FIRST_WEEK_DAYS};

use crate::data::{
    DataLoader, EngagementRecord, EnrollmentRecord, LoaderError, NormalizeError, Normalizer,
    SubmissionRecord,
};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Locations of the three source CSV files.
#[derive(Debug, Clone)]
pub struct DataSources {
    pub enrollments: PathBuf,
    pub engagement: PathBuf,
    pub submissions: PathBuf,
}

/// The three normalized tables.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub enrollments: Vec<EnrollmentRecord>,
    pub engagement: Vec<EngagementRecord>,
    pub submissions: Vec<SubmissionRecord>,
}

impl Tables {
    /// Load and normalize all three sources, failing on the first error.
    pub fn load(sources: &DataSources, account_column: &str) -> Result<Self, PipelineError> {
        let enrollments = Normalizer::enrollments(&DataLoader::load_csv(&sources.enrollments)?)?;
        let engagement = Normalizer::engagement(
            &DataLoader::load_csv(&sources.engagement)?,
            account_column,
        )?;
        let submissions = Normalizer::submissions(&DataLoader::load_csv(&sources.submissions)?)?;

        tracing::info!(
            enrollments = enrollments.len(),
            engagement = engagement.len(),
            submissions = submissions.len(),
            "Loaded source tables"
        );

        Ok(Self {
            enrollments,
            engagement,
            submissions,
        })
    }
}

/// Every intermediate structure produced by one run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub tables: Tables,
    pub test_accounts: TestAccounts,
    pub paid_students: PaidStudents,
    pub paid_enrollments: Vec<EnrollmentRecord>,
    pub paid_engagement: Vec<EngagementRecord>,
    pub paid_submissions: Vec<SubmissionRecord>,
    pub first_week: Vec<EngagementRecord>,
    pub pass_set: HashSet<String>,
    pub cohorts: Cohorts,
}

/// Run the filter, window and cohort stages in order.
///
/// Test accounts are removed before paid students are computed, so they
/// never claim a join date.
pub fn run(tables: Tables, milestone: &Milestone) -> PipelineOutput {
    let test_accounts = TestAccounts::from_enrollments(&tables.enrollments);
    let non_udacity_enrollments = test_accounts.remove_from(&tables.enrollments);
    let non_udacity_engagement = test_accounts.remove_from(&tables.engagement);
    let non_udacity_submissions = test_accounts.remove_from(&tables.submissions);
    tracing::info!(
        test_accounts = test_accounts.len(),
        enrollments = non_udacity_enrollments.len(),
        engagement = non_udacity_engagement.len(),
        submissions = non_udacity_submissions.len(),
        "Removed test accounts"
    );

    let paid_students = PaidStudents::from_enrollments(&non_udacity_enrollments);
    let paid_enrollments = paid_students.remove_free_trial_cancels(&non_udacity_enrollments);
    let paid_engagement = paid_students.remove_free_trial_cancels(&non_udacity_engagement);
    let paid_submissions = paid_students.remove_free_trial_cancels(&non_udacity_submissions);
    tracing::info!(
        paid_students = paid_students.len(),
        enrollments = paid_enrollments.len(),
        engagement = paid_engagement.len(),
        submissions = paid_submissions.len(),
        "Removed free-trial cancels"
    );

    let first_week = first_week_engagement(&paid_engagement, &paid_students);
    tracing::info!(records = first_week.len(), "Selected first-week engagement");

    let pass_set = milestone.pass_set(&paid_submissions);
    let cohorts = split_cohorts(&first_week, &pass_set);
    tracing::info!(
        passing_students = pass_set.len(),
        passing_records = cohorts.passing.len(),
        non_passing_records = cohorts.non_passing.len(),
        "Split cohorts"
    );

    PipelineOutput {
        tables,
        test_accounts,
        paid_students,
        paid_enrollments,
        paid_engagement,
        paid_submissions,
        first_week,
        pass_set,
        cohorts,
    }
}

/// Load, normalize and run the whole pipeline.
pub fn run_from_sources(
    sources: &DataSources,
    account_column: &str,
    milestone: &Milestone,
) -> Result<PipelineOutput, PipelineError> {
    let tables = Tables::load(sources, account_column)?;
    Ok(run(tables, milestone))
}
