//! Persistence layer: the JSON-lines event log and the roster file.
//!
//! Both live as plain UTF-8 files in the data directory. Neither is ever
//! rewritten: the roster is read-only and the log is append-only.

pub mod event_log;
pub mod roster;

pub use event_log::{EventLog, EventScan};
pub use roster::RosterFile;
