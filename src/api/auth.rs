//! HTTP basic-auth guard for admin routes.
//!
//! The guard runs as axum middleware in front of the admin router and
//! short-circuits with [`GradebookError::Unauthorized`]; handlers behind
//! it never see credentials.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::app_state::AppState;
use crate::error::GradebookError;

/// Admin username and password.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminCredentials {
    /// Creates the credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns `true` if `headers` carry matching basic-auth credentials.
    #[must_use]
    pub fn verify(&self, headers: &HeaderMap) -> bool {
        parse_basic(headers)
            .is_some_and(|(user, pass)| user == self.username && pass == self.password)
    }
}

/// Extracts `(username, password)` from an `Authorization: Basic` header.
fn parse_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Middleware rejecting requests without valid admin credentials.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.admin.verify(request.headers()) {
        next.run(request).await
    } else {
        tracing::warn!(uri = %request.uri(), "rejected admin request");
        GradebookError::Unauthorized.into_response()
    }
}
