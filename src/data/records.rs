//! Typed rows of the three source tables.

use chrono::NaiveDate;

/// Anything that belongs to a student through an `account_key`.
pub trait AccountKeyed {
    fn account_key(&self) -> &str;
}

/// One enrollment of a student in the course.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRecord {
    pub account_key: String,
    pub status: String,
    pub join_date: Option<NaiveDate>,
    pub cancel_date: Option<NaiveDate>,
    pub days_to_cancel: Option<i64>,
    pub is_canceled: bool,
    /// Internal test account.
    pub is_udacity: bool,
}

impl EnrollmentRecord {
    /// Still enrolled, or canceled after more than seven days.
    ///
    /// An absent `days_to_cancel` never exceeds seven, so a cancellation
    /// without a recorded delay does not qualify.
    pub fn is_paid(&self) -> bool {
        !self.is_canceled || self.days_to_cancel.is_some_and(|days| days > 7)
    }
}

/// One day of classroom activity for a student.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementRecord {
    pub account_key: String,
    pub utc_date: NaiveDate,
    pub num_courses_visited: i64,
    pub total_minutes_visited: f64,
    pub lessons_completed: i64,
    pub projects_completed: i64,
}

impl EngagementRecord {
    /// 1 if any course was visited that day, 0 otherwise.
    pub fn has_visited(&self) -> i64 {
        i64::from(self.num_courses_visited > 0)
    }
}

/// One project submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub account_key: String,
    pub lesson_key: String,
    pub processing_state: String,
    pub assigned_rating: String,
    pub creation_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
}

impl AccountKeyed for EnrollmentRecord {
    fn account_key(&self) -> &str {
        &self.account_key
    }
}

impl AccountKeyed for EngagementRecord {
    fn account_key(&self) -> &str {
        &self.account_key
    }
}

impl AccountKeyed for SubmissionRecord {
    fn account_key(&self) -> &str {
        &self.account_key
    }
}
