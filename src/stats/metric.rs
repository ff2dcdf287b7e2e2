//! Per-student engagement metrics.

use crate::data::EngagementRecord;
use crate::pipeline::{group_data, sum_grouped_items};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::HashMap;

/// An engagement field summed over each student's first week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalMinutesVisited,
    LessonsCompleted,
    /// Days with at least one course visited.
    DaysVisited,
    NumCoursesVisited,
    ProjectsCompleted,
}

impl Metric {
    pub const DEFAULTS: [Metric; 3] = [
        Metric::TotalMinutesVisited,
        Metric::LessonsCompleted,
        Metric::DaysVisited,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::TotalMinutesVisited => "total_minutes_visited",
            Metric::LessonsCompleted => "lessons_completed",
            Metric::DaysVisited => "days_visited",
            Metric::NumCoursesVisited => "num_courses_visited",
            Metric::ProjectsCompleted => "projects_completed",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::TotalMinutesVisited => "Minutes spent in the classroom",
            Metric::LessonsCompleted => "Lessons completed",
            Metric::DaysVisited => "Classroom visits",
            Metric::NumCoursesVisited => "Courses visited",
            Metric::ProjectsCompleted => "Projects completed",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Metric::TotalMinutesVisited => "Minutes",
            Metric::LessonsCompleted => "Number of lessons",
            Metric::DaysVisited => "Number of days",
            Metric::NumCoursesVisited => "Number of course visits",
            Metric::ProjectsCompleted => "Number of projects",
        }
    }

    /// Days visited takes exactly eight values (0 through 7), one bin each.
    pub fn bins(self, default_bins: usize) -> usize {
        match self {
            Metric::DaysVisited => 8,
            _ => default_bins,
        }
    }

    /// Sum this metric per student. Integer fields are summed as integers
    /// and only widened for reporting.
    pub fn totals(self, engagement: &[EngagementRecord]) -> HashMap<String, f64> {
        let grouped = group_data(engagement, |r| r.account_key.as_str());

        let widen = |sums: HashMap<&str, i64>| -> HashMap<String, f64> {
            sums.into_iter()
                .map(|(key, total)| (key.to_string(), total as f64))
                .collect()
        };

        match self {
            Metric::TotalMinutesVisited => {
                sum_grouped_items(&grouped, |r: &EngagementRecord| r.total_minutes_visited)
                    .into_iter()
                    .map(|(key, total)| (key.to_string(), total))
                    .collect()
            }
            Metric::LessonsCompleted => {
                widen(sum_grouped_items(&grouped, |r: &EngagementRecord| r.lessons_completed))
            }
            Metric::DaysVisited => widen(sum_grouped_items(&grouped, EngagementRecord::has_visited)),
            Metric::NumCoursesVisited => {
                widen(sum_grouped_items(&grouped, |r: &EngagementRecord| r.num_courses_visited))
            }
            Metric::ProjectsCompleted => {
                widen(sum_grouped_items(&grouped, |r: &EngagementRecord| r.projects_completed))
            }
        }
    }
}
