//! # lab-gradebook
//!
//! Lab grading event log with per-student best-score aggregation.
//!
//! An administrator records scored lab submissions; students and the
//! public read aggregated per-lab scores. Every submission is one line in
//! an append-only JSON-lines log, and every view is recomputed from a full
//! scan of that log on demand.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── Handlers + basic-auth guard (api/)
//!     │
//!     ├── GradebookService (service/)
//!     │
//!     ├── Aggregation: group, order, best-score fold (domain/)
//!     │
//!     └── EventLog (db.json) + RosterFile (students.txt) (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
