//! Service layer: the query facade over the gradebook files.
//!
//! [`GradebookService`] reads the roster and event log, feeds the pure
//! reductions in [`crate::domain::aggregate`], and appends new events.

pub mod gradebook_service;

pub use gradebook_service::GradebookService;
