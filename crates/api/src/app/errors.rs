use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use gatekeeper_auth::AuthError;
use gatekeeper_core::DomainError;

/// HTTP status for an authentication/authorization failure.
///
/// A missing credential and an insufficient privilege are both 403; anything
/// wrong with a presented token is 401.
pub fn auth_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Unauthenticated | AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
        AuthError::InvalidToken | AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
    }
}

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    json_error(auth_status(&err), err.code(), err.message())
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "User not Found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
