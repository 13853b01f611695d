//! CSV rendering of the score table.
//!
//! The layout is what spreadsheet imports of the course journal expect:
//! a header row, one row per student, an empty cell for each lab without
//! a recorded score, and a trailing newline.

use crate::domain::ScoreTable;

const STUDENT_COLUMN: &str = "Студент";
const LAB_COLUMN_PREFIX: &str = "Лаба №";

/// Renders `table` as CSV, one column per lab `1..=total_labs`.
#[must_use]
pub fn score_table_csv(table: &ScoreTable) -> String {
    let mut out = String::new();

    out.push_str(STUDENT_COLUMN);
    out.push(',');
    let header: Vec<String> = (1..=table.total_labs)
        .map(|lab| format!("{LAB_COLUMN_PREFIX}{lab}"))
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');

    let rows: Vec<String> = table
        .students
        .iter()
        .map(|student| {
            let mut row = student.name.clone();
            row.push(',');
            let cells: Vec<String> = (1..=table.total_labs)
                .map(|lab| {
                    student
                        .labs
                        .get(&lab)
                        .map(ToString::to_string)
                        .unwrap_or_default()
                })
                .collect();
            row.push_str(&cells.join(","));
            row
        })
        .collect();
    out.push_str(&rows.join("\n"));
    out.push('\n');

    out
}
