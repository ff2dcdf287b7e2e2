use engagement_study::data::LoaderError;
use engagement_study::pipeline::{self, DataSources, Milestone, PipelineError};
use engagement_study::report;
use engagement_study::stats::Metric;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

const ENROLLMENTS: &str = "\
account_key,status,join_date,cancel_date,days_to_cancel,is_udacity,is_canceled
A,current,2015-01-01,,,True,False
B,canceled,2015-01-05,2015-01-08,3,False,True
C,current,2015-01-10,,,False,False
D,canceled,2015-01-02,2015-02-01,30,False,True
E,current,2015-01-03,,,False,False
";

const ENGAGEMENT: &str = "\
acct,utc_date,num_courses_visited,total_minutes_visited,lessons_completed,projects_completed
A,2015-01-01,1.0,50.0,1.0,0.0
A,2015-01-02,1.0,40.0,0.0,0.0
C,2015-01-10,2.0,10.5,1.0,0.0
C,2015-01-16,1.0,20.0,2.0,0.0
C,2015-01-17,1.0,99.0,3.0,0.0
D,2015-01-01,1.0,77.0,1.0,0.0
D,2015-01-02,1.0,5.0,0.0,0.0
D,2015-01-05,0.0,0.0,0.0,0.0
E,2015-01-03,3.0,60.0,2.0,1.0
E,2015-01-09,1.0,15.25,0.0,0.0
";

const SUBMISSIONS: &str = "\
creation_date,completion_date,account_key,lesson_key,processing_state,assigned_rating
2015-01-14,2015-01-16,C,746169184,EVALUATED,PASSED
2015-01-20,2015-01-21,D,3176718735,EVALUATED,INCOMPLETE
2015-01-08,,E,999,EVALUATED,PASSED
";

fn write_sources(dir: &Path, enrollments: &str, engagement: &str, submissions: &str) -> DataSources {
    let sources = DataSources {
        enrollments: dir.join("enrollments.csv"),
        engagement: dir.join("daily_engagement.csv"),
        submissions: dir.join("project_submissions.csv"),
    };
    std::fs::write(&sources.enrollments, enrollments).unwrap();
    std::fs::write(&sources.engagement, engagement).unwrap();
    std::fs::write(&sources.submissions, submissions).unwrap();
    sources
}

fn totals(metric: Metric, records: &[engagement_study::data::EngagementRecord]) -> HashMap<String, f64> {
    metric.totals(records)
}

#[test]
fn test_fixture_scenario() {
    let dir = TempDir::new().unwrap();
    let sources = write_sources(dir.path(), ENROLLMENTS, ENGAGEMENT, SUBMISSIONS);
    let milestone = Milestone::subway_project();

    let output = pipeline::run_from_sources(&sources, "acct", &milestone).unwrap();

    assert_eq!(output.tables.enrollments.len(), 5);
    assert_eq!(output.tables.engagement.len(), 10);
    assert_eq!(output.tables.submissions.len(), 3);

    assert_eq!(output.test_accounts.len(), 1);
    assert!(output.test_accounts.contains("A"));

    assert_eq!(output.paid_students.len(), 3);
    for key in ["C", "D", "E"] {
        assert!(output.paid_students.contains(key), "{key} should be paid");
    }
    assert!(!output.paid_students.contains("B"));

    assert_eq!(output.first_week.len(), 6);
    assert!(output.first_week.iter().all(|r| r.account_key != "A"));

    assert_eq!(output.pass_set.len(), 1);
    assert!(output.pass_set.contains("C"));

    assert_eq!(output.cohorts.passing.len(), 2);
    assert_eq!(output.cohorts.non_passing.len(), 4);

    let passing_minutes = totals(Metric::TotalMinutesVisited, &output.cohorts.passing);
    let non_passing_minutes = totals(Metric::TotalMinutesVisited, &output.cohorts.non_passing);
    assert_eq!(passing_minutes.len(), 1);
    assert_eq!(passing_minutes["C"], 30.5);
    assert_eq!(non_passing_minutes.len(), 2);
    assert_eq!(non_passing_minutes["D"], 5.0);
    assert_eq!(non_passing_minutes["E"], 75.25);

    let passing_lessons = totals(Metric::LessonsCompleted, &output.cohorts.passing);
    let non_passing_lessons = totals(Metric::LessonsCompleted, &output.cohorts.non_passing);
    assert_eq!(passing_lessons["C"], 3.0);
    assert_eq!(non_passing_lessons["D"], 0.0);
    assert_eq!(non_passing_lessons["E"], 2.0);

    let non_passing_days = totals(Metric::DaysVisited, &output.cohorts.non_passing);
    assert_eq!(non_passing_days["D"], 1.0);
    assert_eq!(non_passing_days["E"], 2.0);
}

#[test]
fn test_report_from_fixture() {
    let dir = TempDir::new().unwrap();
    let sources = write_sources(dir.path(), ENROLLMENTS, ENGAGEMENT, SUBMISSIONS);
    let milestone = Milestone::subway_project();
    let output = pipeline::run_from_sources(&sources, "acct", &milestone).unwrap();

    let report = report::build_report(&output, &milestone, &[Metric::TotalMinutesVisited]);
    let minutes = &report.metrics[0];

    let non_passing = minutes.non_passing.unwrap();
    assert_eq!(non_passing.count, 2);
    assert_eq!(non_passing.mean, 40.125);
    assert_eq!(non_passing.std, 35.125);
    assert_eq!(non_passing.min, 5.0);
    assert_eq!(non_passing.max, 75.25);

    let passing = minutes.passing.unwrap();
    assert_eq!(passing.mean, 30.5);
    assert_eq!(passing.std, 0.0);

    let top = report.top_student.unwrap();
    assert_eq!(top.account_key, "E");
    assert_eq!(top.first_week_records, 2);

    // B enrolled, has no engagement and stayed past the join day.
    assert_eq!(report.enrollments_missing_engagement, 1);
}

#[test]
fn test_missing_source_aborts_with_io_error() {
    let dir = TempDir::new().unwrap();
    let mut sources = write_sources(dir.path(), ENROLLMENTS, ENGAGEMENT, SUBMISSIONS);
    sources.submissions = dir.path().join("missing.csv");

    let err = pipeline::run_from_sources(&sources, "acct", &Milestone::subway_project()).unwrap_err();
    assert!(matches!(err, PipelineError::Load(LoaderError::Io { .. })));
}

#[test]
fn test_bad_field_aborts_with_value_error() {
    let dir = TempDir::new().unwrap();
    let engagement = ENGAGEMENT.replace("2015-01-09", "2015-13-09");
    let sources = write_sources(dir.path(), ENROLLMENTS, &engagement, SUBMISSIONS);

    let err = pipeline::run_from_sources(&sources, "acct", &Milestone::subway_project()).unwrap_err();
    assert!(matches!(err, PipelineError::Normalize(_)));
    assert!(err.to_string().contains("utc_date"));
}

#[test]
fn test_wrong_account_column_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let sources = write_sources(dir.path(), ENROLLMENTS, ENGAGEMENT, SUBMISSIONS);

    let err = pipeline::run_from_sources(&sources, "account_key", &Milestone::subway_project()).unwrap_err();
    assert!(err.to_string().contains("account_key"));
}

#[test]
fn test_short_row_aborts_with_parse_error() {
    let dir = TempDir::new().unwrap();
    let engagement = ENGAGEMENT.replace("E,2015-01-09,1.0,15.25,0.0,0.0", "E,2015-01-09,1.0");
    let sources = write_sources(dir.path(), ENROLLMENTS, &engagement, SUBMISSIONS);

    let err = pipeline::run_from_sources(&sources, "acct", &Milestone::subway_project()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Load(LoaderError::RaggedRow { row: 10, expected: 6, found: 3, .. })
    ));
}
