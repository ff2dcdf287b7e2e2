//! First-week windowing of engagement records.

use super::filters::PaidStudents;
use crate::data::EngagementRecord;
use chrono::NaiveDate;

pub const FIRST_WEEK_DAYS: i64 = 7;

/// True iff the engagement happened on the join day or within the six days after.
pub fn within_one_week(join_date: NaiveDate, engagement_date: NaiveDate) -> bool {
    let days = (engagement_date - join_date).num_days();
    (0..FIRST_WEEK_DAYS).contains(&days)
}

/// Engagement records falling in the first week after each student's
/// canonical paid join date, in original order. Records of students with no
/// paid join date are dropped.
pub fn first_week_engagement(
    engagement: &[EngagementRecord],
    paid_students: &PaidStudents,
) -> Vec<EngagementRecord> {
    engagement
        .iter()
        .filter(|record| {
            paid_students
                .join_date(&record.account_key)
                .is_some_and(|join_date| within_one_week(join_date, record.utc_date))
        })
        .cloned()
        .collect()
}
