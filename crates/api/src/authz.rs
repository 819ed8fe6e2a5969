//! Route-side guard chains.
//!
//! Handlers list the rules they need; the first failing rule becomes the
//! response.

use axum::response::Response;

use gatekeeper_auth::{AuthenticatedIdentity, Guard, RequestContext, enforce};

use crate::app::errors;

/// Run `guards` against the request context, mapping failures to responses.
pub fn guard<'a>(
    ctx: &'a RequestContext,
    guards: &[Guard],
) -> Result<&'a AuthenticatedIdentity, Response> {
    enforce(ctx, guards).map_err(errors::auth_error_to_response)
}
