// =============================================================================
// Bearer Token Authentication for admin routes
// =============================================================================
//
// Admin routes (config reload) require `Authorization: Bearer <token>` where
// the token matches the `TECHNICALS_ADMIN_TOKEN` environment variable. The
// comparison is constant-time. Analysis routes are public and do not use this
// extractor.
//
//   async fn handler(_auth: AdminBearer, ...) { ... }
//
// A missing, malformed or wrong token short-circuits with 403 before the
// handler body runs. An unset token disables admin routes entirely.
// =============================================================================

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

pub const ADMIN_TOKEN_ENV: &str = "TECHNICALS_ADMIN_TOKEN";

/// Compare two byte slices in constant time (for equal lengths).
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Check `header` (the raw `Authorization` value) against `expected`.
fn check_bearer(header: Option<&str>, expected: &str) -> Result<(), &'static str> {
    if expected.is_empty() {
        return Err("Server authentication not configured");
    }
    let token = header
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or("Missing or invalid authorization token")?;
    if !constant_time_eq(token.as_bytes(), expected.as_bytes()) {
        return Err("Invalid authorization token");
    }
    Ok(())
}

/// Axum extractor guarding admin routes.
pub struct AdminBearer;

pub struct AuthRejection {
    message: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "status": "error",
            "error_message": self.message,
        });
        (StatusCode::FORBIDDEN, axum::Json(body)).into_response()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminBearer
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Read on every request so rotation does not need a restart.
        let expected = std::env::var(ADMIN_TOKEN_ENV).unwrap_or_default();
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        check_bearer(header, &expected).map_err(|message| {
            warn!(reason = message, "admin request rejected");
            AuthRejection { message }
        })?;
        Ok(AdminBearer)
    }
}

// =============================================================================
// Tests
// =============================================================================
