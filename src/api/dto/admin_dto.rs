//! Admin form and overview DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Form body for `POST /submit`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitForm {
    /// Student identifier.
    pub name: String,
    /// Lab number, starting at 1.
    pub lab: u32,
    /// Points awarded.
    #[serde(rename = "bonus-points")]
    pub bonus_points: i64,
    /// Free-form comment; one line per comment entry, blank lines dropped.
    #[serde(default)]
    pub comment: String,
}

/// Response body for `GET /admin`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminOverview {
    /// Roster in file order, for the submission form.
    pub students: Vec<String>,
    /// Highest lab number recorded so far.
    pub total_labs: u32,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn submit_form_uses_dashed_points_field() {
        let Ok(form) = serde_json::from_str::<SubmitForm>(
            r#"{"name": "alice", "lab": 2, "bonus-points": -1}"#,
        ) else {
            panic!("form should parse");
        };
        assert_eq!(form.bonus_points, -1);
        assert!(form.comment.is_empty());
    }
}
