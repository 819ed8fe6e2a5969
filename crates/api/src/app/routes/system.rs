use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use gatekeeper_auth::RequestContext;

use crate::app::errors;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The identity resolved for this request, as the guards see it.
pub async fn whoami(Extension(ctx): Extension<RequestContext>) -> axum::response::Response {
    match ctx.require_identity() {
        Ok(identity) => Json(identity.clone()).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
