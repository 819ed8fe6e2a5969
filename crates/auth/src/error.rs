//! Failure taxonomy for authentication and authorization.
//!
//! Every failure is terminal: nothing here is retried or recovered. The
//! `Display` output of [`AuthError`] is the exact client-facing message.

use thiserror::Error;

/// Client-facing messages. Clients match on these strings, keep them stable.
pub mod messages {
    pub const NOT_AUTHENTICATED: &str = "Not authenticated";
    pub const INVALID_TOKEN: &str = "That token is Invalid";
    pub const EXPIRED_TOKEN: &str = "That token has Expired";
    pub const FORBIDDEN: &str = "Forbidden";
    pub const BANNED: &str = "Banned!";
}

/// Why an authenticated identity was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    /// Admin role required.
    Role,
    /// The identity is banned.
    Banned,
    /// Neither the owner of the target resource nor an admin.
    NotOwner,
}

impl ForbiddenReason {
    pub fn message(&self) -> &'static str {
        match self {
            ForbiddenReason::Role | ForbiddenReason::NotOwner => messages::FORBIDDEN,
            ForbiddenReason::Banned => messages::BANNED,
        }
    }
}

impl core::fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No usable bearer credential was presented.
    #[error("{}", messages::NOT_AUTHENTICATED)]
    Unauthenticated,

    /// Credential present but unverifiable, or its subject is unknown or banned.
    #[error("{}", messages::INVALID_TOKEN)]
    InvalidToken,

    /// Credential verifiable but past its validity window.
    #[error("{}", messages::EXPIRED_TOKEN)]
    ExpiredToken,

    /// Authenticated, but not allowed to do this.
    #[error("{0}")]
    Forbidden(ForbiddenReason),
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated => messages::NOT_AUTHENTICATED,
            AuthError::InvalidToken => messages::INVALID_TOKEN,
            AuthError::ExpiredToken => messages::EXPIRED_TOKEN,
            AuthError::Forbidden(reason) => reason.message(),
        }
    }

    /// Stable machine-readable code for the failure class.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated => "not_authenticated",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::Forbidden(_) => "forbidden",
        }
    }
}

/// Token codec failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed or its signature does not verify")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_client_message() {
        assert_eq!(AuthError::Unauthenticated.to_string(), "Not authenticated");
        assert_eq!(AuthError::InvalidToken.to_string(), messages::INVALID_TOKEN);
        assert_eq!(AuthError::ExpiredToken.to_string(), messages::EXPIRED_TOKEN);
        assert_eq!(AuthError::Forbidden(ForbiddenReason::Role).to_string(), "Forbidden");
        assert_eq!(AuthError::Forbidden(ForbiddenReason::NotOwner).to_string(), "Forbidden");
        assert_eq!(AuthError::Forbidden(ForbiddenReason::Banned).to_string(), "Banned!");
    }

    #[test]
    fn invalid_and_expired_are_distinct() {
        assert_ne!(AuthError::InvalidToken.message(), AuthError::ExpiredToken.message());
        assert_ne!(AuthError::InvalidToken.code(), AuthError::ExpiredToken.code());
    }
}
