//! `gatekeeper-auth`: bearer-token authentication and authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: requests are
//! seen through [`RequestParts`], users through [`UserLookup`], and time
//! through [`Clock`].

pub mod authorize;
pub mod bearer;
pub mod claims;
pub mod clock;
pub mod context;
pub mod error;
pub mod identity;
pub mod roles;
pub mod token;

pub use authorize::{Guard, enforce, require_admin, require_not_banned, require_owner_or_admin};
pub use bearer::{BearerAuthenticator, RequestParts};
pub use claims::{TokenClaims, TokenType, validate_claims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::RequestContext;
pub use error::{AuthError, ForbiddenReason, TokenError, messages};
pub use identity::{AuthenticatedIdentity, IdentityResolver, ResolveError, UserLookup, UserRecord};
pub use roles::Role;
pub use token::TokenCodec;
