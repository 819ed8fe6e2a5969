use std::sync::Arc;

use axum::{extract::State, middleware::Next, response::Response};

use gatekeeper_auth::{BearerAuthenticator, RequestContext};

use crate::app::errors;
use crate::context::HeaderParts;

#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<BearerAuthenticator>,
}

/// Authenticate the request and hand a populated [`RequestContext`] to the
/// handler. Failures are answered here and never reach a handler.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let mut ctx = RequestContext::new();

    let parts = HeaderParts::new(req.headers());
    if let Err(e) = state.authenticator.authenticate(&parts, &mut ctx).await {
        return errors::auth_error_to_response(e);
    }

    req.extensions_mut().insert(ctx);
    next.run(req).await
}
