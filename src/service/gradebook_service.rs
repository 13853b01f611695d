//! Gradebook service: the read/write surface over the event log.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::domain::aggregate;
use crate::domain::{GradeEvent, ScoreTable, StudentEvents, StudentLabs};
use crate::error::{GradebookError, StoreError};
use crate::persistence::{EventLog, RosterFile};

/// Roster file name inside the data directory.
pub const ROSTER_FILE_NAME: &str = "students.txt";

/// Event log file name inside the data directory.
pub const EVENT_LOG_FILE_NAME: &str = "db.json";

/// Explicit store handle shared by all request handlers.
///
/// Holds no cached state: every read re-scans the log (and re-reads the
/// roster), so results always reflect the files as they are now.
#[derive(Debug)]
pub struct GradebookService {
    roster: RosterFile,
    log: EventLog,
}

impl GradebookService {
    /// Creates a service over explicit roster and log handles.
    #[must_use]
    pub fn new(roster: RosterFile, log: EventLog) -> Self {
        Self { roster, log }
    }

    /// Creates a service over `students.txt` and `db.json` in `data_dir`.
    #[must_use]
    pub fn open(data_dir: &Path) -> Self {
        Self::new(
            RosterFile::new(data_dir.join(ROSTER_FILE_NAME)),
            EventLog::new(data_dir.join(EVENT_LOG_FILE_NAME)),
        )
    }

    /// Returns the roster in file order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the roster exists but cannot be read.
    pub fn roster(&self) -> Result<Vec<String>, StoreError> {
        self.roster.load()
    }

    /// Returns `true` if `name` is on the roster.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the roster exists but cannot be read.
    pub fn validate_student(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.roster.load()?.iter().any(|known| known == name))
    }

    /// Appends a grading event stamped with the current UTC time.
    ///
    /// The roster is not consulted; callers wanting that guarantee call
    /// [`Self::validate_student`] first.
    ///
    /// # Errors
    ///
    /// Returns [`GradebookError::InvalidRequest`] for an empty name or a
    /// lab below 1, and [`GradebookError::Store`] if the append fails.
    pub fn record_event(
        &self,
        name: &str,
        lab: u32,
        bonus_points: i64,
        comment_lines: &[String],
    ) -> Result<GradeEvent, GradebookError> {
        self.record_event_at(name, lab, bonus_points, comment_lines, Utc::now())
    }

    /// Like [`Self::record_event`], with an explicit submission time.
    ///
    /// # Errors
    ///
    /// Same as [`Self::record_event`].
    pub fn record_event_at(
        &self,
        name: &str,
        lab: u32,
        bonus_points: i64,
        comment_lines: &[String],
        at: DateTime<Utc>,
    ) -> Result<GradeEvent, GradebookError> {
        if name.trim().is_empty() {
            return Err(GradebookError::InvalidRequest(
                "student name must not be empty".to_string(),
            ));
        }
        if lab < 1 {
            return Err(GradebookError::InvalidRequest(
                "lab must be at least 1".to_string(),
            ));
        }

        let event = GradeEvent::new(name, lab, bonus_points, comment_lines, at);
        self.log.append(&event)?;

        tracing::info!(student = %event.name, lab, bonus_points, "grade recorded");
        Ok(event)
    }

    /// Returns one student's raw events in append order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on I/O failure or a malformed record.
    pub fn history(&self, name: &str) -> Result<Vec<GradeEvent>, StoreError> {
        self.log.scan(Some(name))?.collect()
    }

    /// Returns the highest lab number in the log, or 0 if it is empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on I/O failure or a malformed record.
    pub fn total_labs(&self) -> Result<u32, StoreError> {
        self.log
            .scan(None)?
            .try_fold(0, |best, event| event.map(|event| best.max(event.lab)))
    }

    /// Returns roster students with their events, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on I/O failure, a malformed record, or an
    /// unparseable `datetime`.
    pub fn grouped_events(&self) -> Result<Vec<StudentEvents>, StoreError> {
        let events = self.scan_all()?;
        let roster = self.roster.load()?;
        Ok(aggregate::retain_roster(
            aggregate::group_by_student(events)?,
            &roster,
        ))
    }

    /// Returns each roster student's best score per lab.
    ///
    /// # Errors
    ///
    /// Same as [`Self::grouped_events`].
    pub fn students_labs(&self) -> Result<Vec<StudentLabs>, StoreError> {
        Ok(aggregate::best_scores(&self.grouped_events()?))
    }

    /// Returns total labs and best scores computed from one scan.
    ///
    /// # Errors
    ///
    /// Same as [`Self::grouped_events`].
    pub fn score_table(&self) -> Result<ScoreTable, StoreError> {
        let events = self.scan_all()?;
        let roster = self.roster.load()?;
        let table = aggregate::score_table(events, &roster)?;
        tracing::debug!(
            total_labs = table.total_labs,
            students = table.students.len(),
            "score table computed"
        );
        Ok(table)
    }

    fn scan_all(&self) -> Result<Vec<GradeEvent>, StoreError> {
        self.log.scan(None)?.collect()
    }
}
