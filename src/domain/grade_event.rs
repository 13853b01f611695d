//! Grading events as they are stored in the event log.
//!
//! A [`GradeEvent`] is one scored lab submission for one student. Events
//! are immutable once appended; the log is the only source of truth and
//! every view is recomputed from it.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed, human-readable submission time format (always UTC).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One grading submission for a (student, lab) pair.
///
/// Field order matches the on-disk key order of existing logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GradeEvent {
    /// Student identifier, expected to match a roster entry.
    pub name: String,
    /// Lab number, starting at 1.
    pub lab: u32,
    /// Points awarded for this submission.
    #[serde(rename = "bonus-points")]
    pub bonus_points: i64,
    /// Comment lines; never empty strings.
    pub comment: Vec<String>,
    /// Submission time formatted with [`DATETIME_FORMAT`].
    pub datetime: String,
    /// Submission time as UTC epoch seconds. Absent in older records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl GradeEvent {
    /// Builds an event stamped with `at`.
    ///
    /// Comment lines are normalised with [`normalize_comment_lines`].
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        lab: u32,
        bonus_points: i64,
        comment: impl IntoIterator<Item = impl AsRef<str>>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            lab,
            bonus_points,
            comment: normalize_comment_lines(comment),
            datetime: format_datetime(&at),
            timestamp: Some(at.timestamp()),
        }
    }

    /// Parses the formatted `datetime` field.
    ///
    /// # Errors
    ///
    /// Returns [`chrono::ParseError`] if the field does not follow
    /// [`DATETIME_FORMAT`].
    pub fn submitted_at(&self) -> Result<NaiveDateTime, chrono::ParseError> {
        parse_datetime(&self.datetime)
    }

    /// Drops the grouping keys, keeping what a per-student listing shows.
    #[must_use]
    pub fn summary(&self) -> EventSummary {
        EventSummary {
            datetime: self.datetime.clone(),
            comment: self.comment.clone(),
            lab: self.lab,
            bonus_points: self.bonus_points,
        }
    }
}

/// Projection of a [`GradeEvent`] inside a per-student group.
///
/// `name` and `timestamp` are omitted: they are the group and sort keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventSummary {
    /// Submission time formatted with [`DATETIME_FORMAT`].
    pub datetime: String,
    /// Comment lines.
    pub comment: Vec<String>,
    /// Lab number.
    pub lab: u32,
    /// Points awarded.
    #[serde(rename = "bonus-points")]
    pub bonus_points: i64,
}

/// Formats a UTC instant with [`DATETIME_FORMAT`].
#[must_use]
pub fn format_datetime(at: &DateTime<Utc>) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

/// Parses a string produced by [`format_datetime`].
///
/// # Errors
///
/// Returns [`chrono::ParseError`] on any format mismatch.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
}

/// Trims every line and drops the ones left empty.
pub fn normalize_comment_lines(
    lines: impl IntoIterator<Item = impl AsRef<str>>,
) -> Vec<String> {
    lines
        .into_iter()
        .filter_map(|line| {
            let trimmed = line.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

/// Splits free-form comment text on `\n` and normalises the lines.
#[must_use]
pub fn split_comment(text: &str) -> Vec<String> {
    normalize_comment_lines(text.split('\n'))
}
