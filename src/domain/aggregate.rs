//! Reduction of the raw event stream into per-student views.
//!
//! These functions are pure: they take a snapshot of events (and the
//! roster) and never touch storage. [`crate::service::GradebookService`]
//! feeds them a fresh scan on every call.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use super::grade_event::{EventSummary, GradeEvent};
use crate::error::StoreError;

/// One student's events, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StudentEvents {
    /// Student identifier.
    pub name: String,
    /// Chronologically ordered event projections.
    pub events: Vec<EventSummary>,
}

/// One student's best score per lab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StudentLabs {
    /// Student identifier.
    pub name: String,
    /// Lab number to best bonus points.
    pub labs: BTreeMap<u32, i64>,
}

/// The pair every tabular view is rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScoreTable {
    /// Highest lab number seen anywhere in the log.
    pub total_labs: u32,
    /// Best scores per roster student, in roster order.
    pub students: Vec<StudentLabs>,
}

/// Secondary sort key. Every event in one sort uses the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ChronoKey {
    Epoch(i64),
    Datetime(NaiveDateTime),
}

/// Highest lab number among `events`, or 0 for none.
pub fn total_labs<'a>(events: impl IntoIterator<Item = &'a GradeEvent>) -> u32 {
    events.into_iter().fold(0, |best, event| best.max(event.lab))
}

/// Sorts by (name, time) and groups consecutive events per student.
///
/// Time is the epoch `timestamp` when every event carries one, otherwise
/// the parsed `datetime`. The sort is stable, so equal keys keep log order.
/// Groups come out in ascending name order.
///
/// # Errors
///
/// Returns [`StoreError::InvalidDatetime`] when `datetime` must be used
/// and does not parse.
pub fn group_by_student(events: Vec<GradeEvent>) -> Result<Vec<StudentEvents>, StoreError> {
    let by_epoch = events.iter().all(|event| event.timestamp.is_some());

    let mut keyed = events
        .into_iter()
        .map(|event| -> Result<(ChronoKey, GradeEvent), StoreError> {
            let key = match (by_epoch, event.timestamp) {
                (true, Some(ts)) => ChronoKey::Epoch(ts),
                _ => ChronoKey::Datetime(event.submitted_at().map_err(|source| {
                    StoreError::InvalidDatetime {
                        name: event.name.clone(),
                        value: event.datetime.clone(),
                        source,
                    }
                })?),
            };
            Ok((key, event))
        })
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by(|(key_a, a), (key_b, b)| a.name.cmp(&b.name).then_with(|| key_a.cmp(key_b)));

    let groups = keyed
        .chunk_by(|(_, a), (_, b)| a.name == b.name)
        .filter_map(|chunk| {
            let (_, first) = chunk.first()?;
            Some(StudentEvents {
                name: first.name.clone(),
                events: chunk.iter().map(|(_, event)| event.summary()).collect(),
            })
        })
        .collect();

    Ok(groups)
}

/// Keeps only groups whose student is on the roster, in roster order.
///
/// Roster students without events are omitted. A name listed twice on the
/// roster is emitted once, at its first position.
pub fn retain_roster(groups: Vec<StudentEvents>, roster: &[String]) -> Vec<StudentEvents> {
    let mut by_name: HashMap<String, StudentEvents> = groups
        .into_iter()
        .map(|group| (group.name.clone(), group))
        .collect();

    roster
        .iter()
        .filter_map(|name| by_name.remove(name))
        .collect()
}

/// Folds each student's events into a best-score-per-lab mapping.
///
/// Each lab starts at 0 and only ever grows, so a later lower score never
/// replaces an earlier higher one.
pub fn best_scores(groups: &[StudentEvents]) -> Vec<StudentLabs> {
    groups
        .iter()
        .map(|group| {
            let mut labs = BTreeMap::new();
            for event in &group.events {
                let best = labs.entry(event.lab).or_insert(0_i64);
                *best = (*best).max(event.bonus_points);
            }
            StudentLabs {
                name: group.name.clone(),
                labs,
            }
        })
        .collect()
}

/// Builds the full score table from a single event snapshot.
///
/// # Errors
///
/// Propagates [`group_by_student`] failures.
pub fn score_table(events: Vec<GradeEvent>, roster: &[String]) -> Result<ScoreTable, StoreError> {
    let total_labs = total_labs(&events);
    let groups = retain_roster(group_by_student(events)?, roster);
    Ok(ScoreTable {
        total_labs,
        students: best_scores(&groups),
    })
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn event(name: &str, lab: u32, points: i64, ts: Option<i64>, datetime: &str) -> GradeEvent {
        GradeEvent {
            name: name.to_string(),
            lab,
            bonus_points: points,
            comment: vec![format!("{name}-{lab}-{points}")],
            datetime: datetime.to_string(),
            timestamp: ts,
        }
    }

    fn stamped(name: &str, lab: u32, points: i64, ts: i64) -> GradeEvent {
        event(name, lab, points, Some(ts), "2020-01-01 00:00:00")
    }

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn total_labs_of_nothing_is_zero() {
        assert_eq!(total_labs(&Vec::<GradeEvent>::new()), 0);
    }

    #[test]
    fn total_labs_is_max_not_last() {
        let events = vec![stamped("a", 4, 1, 1), stamped("b", 2, 1, 2)];
        assert_eq!(total_labs(&events), 4);
    }

    #[test]
    fn groups_interleaved_events_by_name() {
        let events = vec![stamped("A", 1, 5, 10), stamped("B", 1, 2, 5), stamped("A", 1, 9, 20)];
        let Ok(groups) = group_by_student(events) else {
            panic!("grouping failed");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "A");
        assert_eq!(groups[0].events.len(), 2);
        assert_eq!(groups[1].name, "B");
    }

    #[test]
    fn orders_within_group_by_timestamp() {
        let events = vec![stamped("A", 2, 1, 30), stamped("A", 1, 1, 10), stamped("A", 3, 1, 20)];
        let Ok(groups) = group_by_student(events) else {
            panic!("grouping failed");
        };
        let labs: Vec<u32> = groups[0].events.iter().map(|e| e.lab).collect();
        assert_eq!(labs, vec![1, 3, 2]);
    }

    #[test]
    fn falls_back_to_datetime_when_any_timestamp_missing() {
        let events = vec![
            event("A", 1, 1, Some(999), "2020-01-03 00:00:00"),
            event("A", 2, 1, None, "2020-01-01 00:00:00"),
            event("A", 3, 1, Some(1), "2020-01-02 00:00:00"),
        ];
        let Ok(groups) = group_by_student(events) else {
            panic!("grouping failed");
        };
        let labs: Vec<u32> = groups[0].events.iter().map(|e| e.lab).collect();
        assert_eq!(labs, vec![2, 3, 1]);
    }

    #[test]
    fn equal_times_keep_log_order() {
        let events = vec![
            event("A", 1, 1, None, "2020-01-01 00:00:00"),
            event("A", 1, 2, None, "2020-01-01 00:00:00"),
            event("A", 1, 3, None, "2020-01-01 00:00:00"),
        ];
        let Ok(groups) = group_by_student(events) else {
            panic!("grouping failed");
        };
        let points: Vec<i64> = groups[0].events.iter().map(|e| e.bonus_points).collect();
        assert_eq!(points, vec![1, 2, 3]);
    }

    #[test]
    fn unparseable_datetime_is_an_error() {
        let events = vec![event("A", 1, 1, None, "yesterday")];
        assert!(matches!(
            group_by_student(events),
            Err(StoreError::InvalidDatetime { .. })
        ));
    }

    #[test]
    fn roster_filter_drops_unlisted_and_eventless() {
        let events = vec![stamped("A", 1, 1, 1), stamped("B", 1, 1, 2)];
        let Ok(groups) = group_by_student(events) else {
            panic!("grouping failed");
        };
        let kept = retain_roster(groups, &roster(&["A", "C"]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "A");
    }

    #[test]
    fn roster_filter_follows_roster_order_once() {
        let events = vec![stamped("A", 1, 1, 1), stamped("B", 1, 1, 2)];
        let Ok(groups) = group_by_student(events) else {
            panic!("grouping failed");
        };
        let kept = retain_roster(groups, &roster(&["B", "A", "B"]));
        let names: Vec<&str> = kept.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn best_score_is_maximum_in_any_order() {
        for order in [[3, 7, 5], [7, 5, 3], [5, 3, 7]] {
            let events = order
                .iter()
                .enumerate()
                .map(|(i, p)| stamped("A", 1, *p, i64::try_from(i).unwrap_or_default()))
                .collect();
            let Ok(table) = score_table(events, &roster(&["A"])) else {
                panic!("aggregation failed");
            };
            assert_eq!(table.students[0].labs.get(&1), Some(&7));
        }
    }

    #[test]
    fn negative_only_scores_floor_at_zero() {
        let events = vec![stamped("A", 2, -3, 1)];
        let Ok(table) = score_table(events, &roster(&["A"])) else {
            panic!("aggregation failed");
        };
        assert_eq!(table.students[0].labs.get(&2), Some(&0));
    }

    #[test]
    fn score_table_matches_worked_example() {
        let events = vec![stamped("A", 1, 5, 10), stamped("B", 1, 2, 5), stamped("A", 1, 9, 20)];
        let Ok(table) = score_table(events, &roster(&["A", "B"])) else {
            panic!("aggregation failed");
        };
        assert_eq!(table.total_labs, 1);
        assert_eq!(table.students.len(), 2);
        assert_eq!(table.students[0].labs, BTreeMap::from([(1, 9)]));
        assert_eq!(table.students[1].labs, BTreeMap::from([(1, 2)]));
    }

    #[test]
    fn total_labs_counts_students_off_roster() {
        let events = vec![stamped("ghost", 6, 1, 1), stamped("A", 2, 1, 2)];
        let Ok(table) = score_table(events, &roster(&["A"])) else {
            panic!("aggregation failed");
        };
        assert_eq!(table.total_labs, 6);
        assert_eq!(table.students.len(), 1);
    }
}
