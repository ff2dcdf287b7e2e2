//! Data-quality checks used while exploring the tables.

use crate::data::{AccountKeyed, EnrollmentRecord};
use std::collections::{HashMap, HashSet};

/// Distinct account keys appearing in a table.
pub fn unique_students<T: AccountKeyed>(data: &[T]) -> HashSet<String> {
    data.iter().map(|r| r.account_key().to_string()).collect()
}

/// Enrollments of students with no engagement data who stayed at least a day
/// (join date differs from cancel date).
pub fn enrollments_missing_engagement<'a>(
    enrollments: &'a [EnrollmentRecord],
    engaged_students: &HashSet<String>,
) -> Vec<&'a EnrollmentRecord> {
    enrollments
        .iter()
        .filter(|e| !engaged_students.contains(&e.account_key) && e.join_date != e.cancel_date)
        .collect()
}

/// Account with the largest positive total. Ties go to the smallest key so
/// the answer is stable; nobody qualifies when every total is zero.
pub fn top_student<'a>(totals: &'a HashMap<String, f64>) -> Option<(&'a str, f64)> {
    totals
        .iter()
        .filter(|(_, value)| **value > 0.0)
        .max_by(|(ka, va), (kb, vb)| va.total_cmp(vb).then_with(|| kb.cmp(ka)))
        .map(|(key, value)| (key.as_str(), *value))
}

/// Every record belonging to one account, in original order.
pub fn records_for<'a, T: AccountKeyed>(data: &'a [T], account_key: &str) -> Vec<&'a T> {
    data.iter()
        .filter(|r| r.account_key() == account_key)
        .collect()
}
