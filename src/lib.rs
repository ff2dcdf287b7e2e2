//! Engagement Study - first-week engagement of paid students, split by
//! whether they pass a milestone project.
//!
//! Stages run strictly in order: load and normalize the three CSV tables,
//! drop test accounts and free-trial cancels, keep each student's first week,
//! then compare per-student totals of the passing and non-passing cohorts.

pub mod bootstrap;
pub mod charts;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod settings;
pub mod stats;
