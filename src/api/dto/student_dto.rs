//! Student lookup DTOs.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for `GET /api/validation`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ValidationParams {
    /// Student identifier to look up.
    pub name: String,
}
