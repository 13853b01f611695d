//! Domain layer: grading events and their aggregation.
//!
//! This module holds the event record stored in the log, its per-student
//! projection, and the pure reductions (grouping, ordering, best-score
//! folding) every read view is built from.

pub mod aggregate;
pub mod grade_event;

pub use aggregate::{ScoreTable, StudentEvents, StudentLabs};
pub use grade_event::{EventSummary, GradeEvent};
