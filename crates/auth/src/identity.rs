//! Mapping a token subject to a live user identity.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatekeeper_core::UserId;

use crate::error::AuthError;
use crate::roles::Role;

/// User record as returned by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub banned: bool,
    pub verified: bool,
}

/// Identity of the caller for the duration of one request.
///
/// Always built from a fresh storage read; never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedIdentity {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub banned: bool,
    pub verified: bool,
}

impl AuthenticatedIdentity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<UserRecord> for AuthenticatedIdentity {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            role: record.role,
            banned: record.banned,
            verified: record.verified,
        }
    }
}

/// Storage collaborator: look a user up by id.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_user_by_id(&self, id: UserId) -> Option<UserRecord>;
}

#[async_trait]
impl<S> UserLookup for Arc<S>
where
    S: UserLookup + ?Sized,
{
    async fn find_user_by_id(&self, id: UserId) -> Option<UserRecord> {
        (**self).find_user_by_id(id).await
    }
}

/// Why a subject could not be resolved.
///
/// Both variants collapse into [`AuthError::InvalidToken`] so account state is
/// never revealed to an unauthenticated caller.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    #[error("user not found")]
    NotFound,

    #[error("user is banned")]
    Banned,
}

impl From<ResolveError> for AuthError {
    fn from(_: ResolveError) -> Self {
        AuthError::InvalidToken
    }
}

#[derive(Clone)]
pub struct IdentityResolver {
    lookup: Arc<dyn UserLookup>,
}

impl core::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}

impl IdentityResolver {
    pub fn new(lookup: Arc<dyn UserLookup>) -> Self {
        Self { lookup }
    }

    pub async fn resolve(&self, subject: UserId) -> Result<AuthenticatedIdentity, ResolveError> {
        let record = self
            .lookup
            .find_user_by_id(subject)
            .await
            .ok_or(ResolveError::NotFound)?;

        if record.banned {
            return Err(ResolveError::Banned);
        }

        Ok(record.into())
    }
}
