//! Test-account exclusion and paid-student selection.

use crate::data::{AccountKeyed, EnrollmentRecord};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Account keys flagged as internal test accounts in the enrollments table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestAccounts(HashSet<String>);

impl TestAccounts {
    /// Single scan of the enrollments table.
    pub fn from_enrollments(enrollments: &[EnrollmentRecord]) -> Self {
        Self(
            enrollments
                .iter()
                .filter(|e| e.is_udacity)
                .map(|e| e.account_key.clone())
                .collect(),
        )
    }

    pub fn contains(&self, account_key: &str) -> bool {
        self.0.contains(account_key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Order-preserving copy of `data` without any test-account rows.
    pub fn remove_from<T: AccountKeyed + Clone>(&self, data: &[T]) -> Vec<T> {
        data.iter()
            .filter(|record| !self.contains(record.account_key()))
            .cloned()
            .collect()
    }
}

/// Each paid student mapped to the join date of their most recent qualifying enrollment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaidStudents(HashMap<String, NaiveDate>);

impl PaidStudents {
    /// Qualifying enrollments are those that were never canceled or were
    /// canceled after more than seven days. Non-qualifying enrollments are
    /// ignored, as are qualifying ones without a join date.
    pub fn from_enrollments(enrollments: &[EnrollmentRecord]) -> Self {
        let mut paid: HashMap<String, NaiveDate> = HashMap::new();

        for enrollment in enrollments.iter().filter(|e| e.is_paid()) {
            let Some(join_date) = enrollment.join_date else {
                tracing::debug!(
                    account_key = %enrollment.account_key,
                    "Skipping paid enrollment without a join date"
                );
                continue;
            };

            paid.entry(enrollment.account_key.clone())
                .and_modify(|stored| {
                    if join_date > *stored {
                        *stored = join_date;
                    }
                })
                .or_insert(join_date);
        }

        Self(paid)
    }

    pub fn join_date(&self, account_key: &str) -> Option<NaiveDate> {
        self.0.get(account_key).copied()
    }

    pub fn contains(&self, account_key: &str) -> bool {
        self.0.contains_key(account_key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Order-preserving copy of `data` restricted to paid students.
    pub fn remove_free_trial_cancels<T: AccountKeyed + Clone>(&self, data: &[T]) -> Vec<T> {
        data.iter()
            .filter(|record| self.contains(record.account_key()))
            .cloned()
            .collect()
    }
}
