//! Type Normalizer Module
//! Coerces raw string records into typed rows.

use super::loader::{LoaderError, RawRecord, RawTable};
use super::records::{EngagementRecord, EnrollmentRecord, SubmissionRecord};
use chrono::NaiveDate;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column name every normalized table uses for the student id.
pub const ACCOUNT_KEY: &str = "account_key";

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error(transparent)]
    Structure(#[from] LoaderError),
    #[error("{table} row {row}: invalid {field} `{value}`: {reason}")]
    Field {
        table: String,
        row: usize,
        field: String,
        value: String,
        reason: String,
    },
}

/// Field accessor for one raw row, carrying enough context for error messages.
struct Row<'a> {
    table: &'a str,
    /// 1-based data row, header excluded.
    row: usize,
    record: &'a RawRecord,
}

impl<'a> Row<'a> {
    fn raw(&self, field: &str) -> &'a str {
        self.record.get(field).map(String::as_str).unwrap_or_default()
    }

    fn invalid(&self, field: &str, reason: impl ToString) -> NormalizeError {
        NormalizeError::Field {
            table: self.table.to_string(),
            row: self.row,
            field: field.to_string(),
            value: self.raw(field).to_string(),
            reason: reason.to_string(),
        }
    }

    fn text(&self, field: &str) -> String {
        self.raw(field).to_string()
    }

    /// Empty string is absent; anything else must be `YYYY-MM-DD`.
    fn maybe_date(&self, field: &str) -> Result<Option<NaiveDate>, NormalizeError> {
        match self.raw(field) {
            "" => Ok(None),
            raw => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(Some)
                .map_err(|e| self.invalid(field, e)),
        }
    }

    fn date(&self, field: &str) -> Result<NaiveDate, NormalizeError> {
        self.maybe_date(field)?
            .ok_or_else(|| self.invalid(field, "value is required"))
    }

    fn maybe_int(&self, field: &str) -> Result<Option<i64>, NormalizeError> {
        match self.raw(field) {
            "" => Ok(None),
            raw => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|e| self.invalid(field, e)),
        }
    }

    /// Only the literal `True` is true.
    fn flag(&self, field: &str) -> bool {
        self.raw(field) == "True"
    }

    fn float(&self, field: &str) -> Result<f64, NormalizeError> {
        let value = self
            .raw(field)
            .parse::<f64>()
            .map_err(|e| self.invalid(field, e))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(self.invalid(field, "value is not finite"))
        }
    }

    /// Counts exported as floats (`"3.0"`): parse as float, then truncate.
    fn truncated_int(&self, field: &str) -> Result<i64, NormalizeError> {
        self.float(field).map(|value| value.trunc() as i64)
    }
}

fn rows<'a>(table: &'a RawTable) -> impl Iterator<Item = Row<'a>> {
    table.records.iter().enumerate().map(|(i, record)| Row {
        table: &table.name,
        row: i + 1,
        record,
    })
}

/// Handles schema-driven conversion of each source table.
pub struct Normalizer;

impl Normalizer {
    pub const ENROLLMENT_COLUMNS: [&'static str; 7] = [
        "account_key",
        "status",
        "join_date",
        "cancel_date",
        "days_to_cancel",
        "is_udacity",
        "is_canceled",
    ];

    pub const ENGAGEMENT_COLUMNS: [&'static str; 5] = [
        "utc_date",
        "num_courses_visited",
        "total_minutes_visited",
        "lessons_completed",
        "projects_completed",
    ];

    pub const SUBMISSION_COLUMNS: [&'static str; 6] = [
        "creation_date",
        "completion_date",
        "account_key",
        "lesson_key",
        "processing_state",
        "assigned_rating",
    ];

    pub fn enrollments(table: &RawTable) -> Result<Vec<EnrollmentRecord>, NormalizeError> {
        table.require_columns(&Self::ENROLLMENT_COLUMNS)?;

        rows(table)
            .map(|row| {
                Ok(EnrollmentRecord {
                    account_key: row.text(ACCOUNT_KEY),
                    status: row.text("status"),
                    join_date: row.maybe_date("join_date")?,
                    cancel_date: row.maybe_date("cancel_date")?,
                    days_to_cancel: row.maybe_int("days_to_cancel")?,
                    is_canceled: row.flag("is_canceled"),
                    is_udacity: row.flag("is_udacity"),
                })
            })
            .collect()
    }

    /// `account_column` is the raw header of the student id; it becomes
    /// `account_key` on the typed record.
    pub fn engagement(
        table: &RawTable,
        account_column: &str,
    ) -> Result<Vec<EngagementRecord>, NormalizeError> {
        table.require_columns(&[account_column])?;
        table.require_columns(&Self::ENGAGEMENT_COLUMNS)?;

        rows(table)
            .map(|row| {
                Ok(EngagementRecord {
                    account_key: row.text(account_column),
                    utc_date: row.date("utc_date")?,
                    num_courses_visited: row.truncated_int("num_courses_visited")?,
                    total_minutes_visited: row.float("total_minutes_visited")?,
                    lessons_completed: row.truncated_int("lessons_completed")?,
                    projects_completed: row.truncated_int("projects_completed")?,
                })
            })
            .collect()
    }

    pub fn submissions(table: &RawTable) -> Result<Vec<SubmissionRecord>, NormalizeError> {
        table.require_columns(&Self::SUBMISSION_COLUMNS)?;

        rows(table)
            .map(|row| {
                Ok(SubmissionRecord {
                    account_key: row.text(ACCOUNT_KEY),
                    lesson_key: row.text("lesson_key"),
                    processing_state: row.text("processing_state"),
                    assigned_rating: row.text("assigned_rating"),
                    creation_date: row.maybe_date("creation_date")?,
                    completion_date: row.maybe_date("completion_date")?,
                })
            })
            .collect()
    }
}
