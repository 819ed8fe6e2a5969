//! Authorization predicates evaluated after authentication.
//!
//! - No IO
//! - No panics
//! - A context without an identity fails with `Unauthenticated` before any
//!   rule is looked at.

use gatekeeper_core::UserId;

use crate::context::RequestContext;
use crate::error::{AuthError, ForbiddenReason};
use crate::identity::AuthenticatedIdentity;

/// Passes silently for admins.
pub fn require_admin(ctx: &RequestContext) -> Result<(), AuthError> {
    check(ctx.require_identity()?, Guard::Admin)
}

/// Passes silently unless the identity is banned.
///
/// Banned users are already refused during authentication; this guard still
/// holds on its own for contexts built elsewhere.
pub fn require_not_banned(ctx: &RequestContext) -> Result<(), AuthError> {
    check(ctx.require_identity()?, Guard::NotBanned)
}

/// Passes for admins and for the owner of `target`.
pub fn require_owner_or_admin(ctx: &RequestContext, target: UserId) -> Result<(), AuthError> {
    check(ctx.require_identity()?, Guard::OwnerOrAdmin(target))
}

/// A single authorization rule, for building explicit guard chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Admin,
    NotBanned,
    OwnerOrAdmin(UserId),
}

/// Evaluate `guards` in order; the first failure wins.
pub fn enforce<'a>(
    ctx: &'a RequestContext,
    guards: &[Guard],
) -> Result<&'a AuthenticatedIdentity, AuthError> {
    let identity = ctx.require_identity()?;
    for guard in guards {
        check(identity, *guard)?;
    }
    Ok(identity)
}

fn check(identity: &AuthenticatedIdentity, guard: Guard) -> Result<(), AuthError> {
    let allowed = match guard {
        Guard::Admin => identity.is_admin(),
        Guard::NotBanned => !identity.banned,
        Guard::OwnerOrAdmin(target) => identity.is_admin() || identity.id == target,
    };

    if allowed {
        Ok(())
    } else {
        let reason = match guard {
            Guard::Admin => ForbiddenReason::Role,
            Guard::NotBanned => ForbiddenReason::Banned,
            Guard::OwnerOrAdmin(_) => ForbiddenReason::NotOwner,
        };
        tracing::debug!(user_id = %identity.id, ?guard, "authorization denied");
        Err(AuthError::Forbidden(reason))
    }
}
