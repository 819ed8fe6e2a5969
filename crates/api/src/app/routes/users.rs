//! User administration routes.
//!
//! Every route sits behind the bearer middleware; each handler states its own
//! guard chain before touching the store.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use gatekeeper_auth::{Guard, RequestContext, Role};
use gatekeeper_core::{DomainError, UserId};

use crate::app::dto::{ListUsersQuery, UserResponse};
use crate::app::errors;
use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::services::{AppServices, UserEdit};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(me))
        .route("/:user_id", put(edit_user).delete(delete_user))
        .route("/:user_id/make-admin", put(make_admin))
        .route("/:user_id/ban", post(ban_user))
        .route("/:user_id/unban", post(unban_user))
}

/// GET /users - all users, or one with `?user_id=`
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::guard(&ctx, &[Guard::Admin]) {
        return resp;
    }

    match query.user_id {
        Some(id) => match services.users.get(id) {
            Some(user) => Json(UserResponse::from(user)).into_response(),
            None => errors::domain_error_to_response(DomainError::NotFound),
        },
        None => {
            let users: Vec<UserResponse> = services.users.list().into_iter().map(Into::into).collect();
            Json(users).into_response()
        }
    }
}

/// GET /users/me - the caller's own record
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
) -> axum::response::Response {
    let identity = match authz::guard(&ctx, &[Guard::NotBanned]) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    match services.users.get(identity.id) {
        Some(user) => Json(UserResponse::from(user)).into_response(),
        None => errors::domain_error_to_response(DomainError::NotFound),
    }
}

/// PUT /users/:user_id - edit a profile (owner or admin)
pub async fn edit_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    ApiPath(user_id): ApiPath<UserId>,
    ApiJson(body): ApiJson<UserEdit>,
) -> axum::response::Response {
    if let Err(resp) = authz::guard(&ctx, &[Guard::NotBanned, Guard::OwnerOrAdmin(user_id)]) {
        return resp;
    }

    match services.users.update(user_id, body) {
        Ok(user) => Json(UserResponse::from(user)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// PUT /users/:user_id/make-admin
pub async fn make_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    ApiPath(user_id): ApiPath<UserId>,
) -> axum::response::Response {
    let actor = match authz::guard(&ctx, &[Guard::Admin]) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    match services.users.set_role(user_id, Role::Admin) {
        Ok(()) => {
            tracing::info!(actor = %actor.id, %user_id, "role changed to admin");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// DELETE /users/:user_id
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    ApiPath(user_id): ApiPath<UserId>,
) -> axum::response::Response {
    let actor = match authz::guard(&ctx, &[Guard::Admin]) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    match services.users.delete(user_id) {
        Ok(()) => {
            tracing::info!(actor = %actor.id, %user_id, "user deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// POST /users/:user_id/ban
pub async fn ban_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    ApiPath(user_id): ApiPath<UserId>,
) -> axum::response::Response {
    set_ban_status(&services, &ctx, user_id, true)
}

/// POST /users/:user_id/unban
pub async fn unban_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    ApiPath(user_id): ApiPath<UserId>,
) -> axum::response::Response {
    set_ban_status(&services, &ctx, user_id, false)
}

fn set_ban_status(
    services: &AppServices,
    ctx: &RequestContext,
    user_id: UserId,
    banned: bool,
) -> axum::response::Response {
    let actor = match authz::guard(ctx, &[Guard::Admin]) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    if actor.id == user_id {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "cannot_ban_self",
            "You cannot ban/unban yourself!",
        );
    }

    match services.users.set_banned(user_id, banned) {
        Ok(()) => {
            tracing::info!(actor = %actor.id, %user_id, banned, "ban status changed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
