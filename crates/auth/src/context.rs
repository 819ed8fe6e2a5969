use crate::error::AuthError;
use crate::identity::AuthenticatedIdentity;

/// Per-request authentication state.
///
/// Holds an identity if and only if authentication succeeded. Only
/// [`BearerAuthenticator`](crate::BearerAuthenticator) attaches one outside of
/// tests and fixtures built with [`RequestContext::with_identity`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    identity: Option<AuthenticatedIdentity>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(identity: AuthenticatedIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub(crate) fn attach(&mut self, identity: AuthenticatedIdentity) {
        self.identity = Some(identity);
    }

    pub fn identity(&self) -> Option<&AuthenticatedIdentity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The attached identity, or `Unauthenticated` when there is none.
    pub fn require_identity(&self) -> Result<&AuthenticatedIdentity, AuthError> {
        self.identity.as_ref().ok_or(AuthError::Unauthenticated)
    }
}
