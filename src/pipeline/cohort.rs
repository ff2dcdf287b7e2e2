//! Splitting first-week engagement by milestone outcome.

use crate::data::{EngagementRecord, SubmissionRecord};
use serde::Serialize;
use std::collections::HashSet;

/// A project identified by one or more equivalent lesson keys, and the
/// ratings that count as passing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub lesson_keys: HashSet<String>,
    pub passing_ratings: HashSet<String>,
}

impl Milestone {
    pub fn new<L, R>(lesson_keys: L, passing_ratings: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            lesson_keys: lesson_keys.into_iter().map(Into::into).collect(),
            passing_ratings: passing_ratings.into_iter().map(Into::into).collect(),
        }
    }

    /// The subway project: two historical lesson keys, PASSED or DISTINCTION.
    pub fn subway_project() -> Self {
        Self::new(["746169184", "3176718735"], ["PASSED", "DISTINCTION"])
    }

    pub fn is_passed_by(&self, submission: &SubmissionRecord) -> bool {
        self.lesson_keys.contains(&submission.lesson_key)
            && self.passing_ratings.contains(&submission.assigned_rating)
    }

    /// Accounts with at least one passing submission for this milestone.
    pub fn pass_set(&self, submissions: &[SubmissionRecord]) -> HashSet<String> {
        submissions
            .iter()
            .filter(|s| self.is_passed_by(s))
            .map(|s| s.account_key.clone())
            .collect()
    }
}

/// First-week engagement split by whether the student passed the milestone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cohorts {
    pub passing: Vec<EngagementRecord>,
    pub non_passing: Vec<EngagementRecord>,
}

/// Stable partition of `engagement` on membership in `pass_set`.
pub fn split_cohorts(engagement: &[EngagementRecord], pass_set: &HashSet<String>) -> Cohorts {
    let (passing, non_passing): (Vec<_>, Vec<_>) = engagement
        .iter()
        .cloned()
        .partition(|record| pass_set.contains(&record.account_key));

    Cohorts {
        passing,
        non_passing,
    }
}
