//! Per-request bearer authentication.

use crate::context::RequestContext;
use crate::error::{AuthError, TokenError};
use crate::identity::{AuthenticatedIdentity, IdentityResolver};
use crate::token::TokenCodec;

/// The slice of an inbound request the authenticator needs.
///
/// Implementations must look header names up case-insensitively.
pub trait RequestParts {
    fn header(&self, name: &str) -> Option<&str>;
}

pub const AUTHORIZATION: &str = "authorization";

/// Drives extraction → decode → identity resolution for one request.
#[derive(Debug, Clone)]
pub struct BearerAuthenticator {
    codec: TokenCodec,
    resolver: IdentityResolver,
}

impl BearerAuthenticator {
    pub fn new(codec: TokenCodec, resolver: IdentityResolver) -> Self {
        Self { codec, resolver }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Authenticate `request` and attach the identity to `ctx`.
    ///
    /// Steps short-circuit in order: a missing header is never reported as an
    /// invalid token, and an expired token never reaches storage. `ctx` is
    /// only written once every step has succeeded.
    pub async fn authenticate<R>(
        &self,
        request: &R,
        ctx: &mut RequestContext,
    ) -> Result<AuthenticatedIdentity, AuthError>
    where
        R: RequestParts + Sync + ?Sized,
    {
        let token = extract_bearer(request)?;

        let claims = self.codec.decode(token).map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            match e {
                TokenError::Expired => AuthError::ExpiredToken,
                TokenError::Malformed | TokenError::Encode(_) => AuthError::InvalidToken,
            }
        })?;

        let identity = self.resolver.resolve(claims.sub).await.map_err(|e| {
            tracing::debug!(user_id = %claims.sub, reason = %e, "token subject rejected");
            AuthError::from(e)
        })?;

        tracing::debug!(user_id = %identity.id, role = %identity.role, "authenticated");
        ctx.attach(identity.clone());
        Ok(identity)
    }
}

/// `Authorization: <scheme> <credentials>`, scheme `bearer` in any case.
fn extract_bearer<R>(request: &R) -> Result<&str, AuthError>
where
    R: RequestParts + ?Sized,
{
    let header = request
        .header(AUTHORIZATION)
        .ok_or(AuthError::Unauthenticated)?;

    let (scheme, credentials) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::Unauthenticated)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::Unauthenticated);
    }

    let token = credentials.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthenticated);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use jsonwebtoken::{Algorithm, EncodingKey, Header};

    use gatekeeper_core::UserId;

    use super::*;
    use crate::authorize::require_admin;
    use crate::claims::TokenType;
    use crate::clock::ManualClock;
    use crate::error::{ForbiddenReason, messages};
    use crate::identity::{UserLookup, UserRecord};
    use crate::roles::Role;

    const SECRET: &str = "test-secret";
    const NOW: i64 = 1_700_000_000;

    #[derive(Default)]
    struct FakeRequest {
        headers: Vec<(String, String)>,
    }

    impl FakeRequest {
        fn bearer(token: &str) -> Self {
            Self::with_header("Authorization", &format!("Bearer {token}"))
        }

        fn with_header(name: &str, value: &str) -> Self {
            Self {
                headers: vec![(name.to_string(), value.to_string())],
            }
        }
    }

    impl RequestParts for FakeRequest {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    #[derive(Default)]
    struct Users {
        inner: RwLock<HashMap<UserId, UserRecord>>,
    }

    impl Users {
        fn register(&self, id: i64, email: &str, role: Role) {
            self.inner.write().unwrap().insert(
                UserId::new(id),
                UserRecord {
                    id: UserId::new(id),
                    email: email.to_string(),
                    first_name: "Test".to_string(),
                    last_name: "User".to_string(),
                    role,
                    banned: false,
                    verified: false,
                },
            );
        }

        fn ban(&self, id: i64) {
            if let Some(r) = self.inner.write().unwrap().get_mut(&UserId::new(id)) {
                r.banned = true;
            }
        }
    }

    #[async_trait]
    impl UserLookup for Users {
        async fn find_user_by_id(&self, id: UserId) -> Option<UserRecord> {
            self.inner.read().unwrap().get(&id).cloned()
        }
    }

    struct Harness {
        users: Arc<Users>,
        auth: BearerAuthenticator,
    }

    impl Harness {
        fn new() -> Self {
            let users = Arc::new(Users::default());
            let clock = Arc::new(ManualClock::at_timestamp(NOW));
            let codec = TokenCodec::new(SECRET, clock);
            let resolver = IdentityResolver::new(users.clone());
            Self {
                users,
                auth: BearerAuthenticator::new(codec, resolver),
            }
        }

        fn token_for(&self, id: i64) -> String {
            self.auth
                .codec()
                .issue(UserId::new(id), TokenType::Access, Duration::minutes(120))
                .unwrap()
        }

        async fn run(&self, req: &FakeRequest) -> (Result<AuthenticatedIdentity, AuthError>, RequestContext) {
            let mut ctx = RequestContext::new();
            let result = self.auth.authenticate(req, &mut ctx).await;
            (result, ctx)
        }
    }

    #[tokio::test]
    async fn valid_token_resolves_identity_and_fills_context() {
        let h = Harness::new();
        h.users.register(1, "testuser@usertest.com", Role::User);

        let (result, ctx) = h.run(&FakeRequest::bearer(&h.token_for(1))).await;

        let identity = result.unwrap();
        assert_eq!(identity.id, UserId::new(1));
        assert_eq!(identity.email, "testuser@usertest.com");
        assert_eq!(ctx.identity(), Some(&identity));
    }

    #[tokio::test]
    async fn missing_or_malformed_header_is_unauthenticated() {
        let h = Harness::new();
        h.users.register(1, "a@example.com", Role::User);
        let token = h.token_for(1);

        let cases = vec![
            FakeRequest::default(),
            FakeRequest::with_header("Authorization", ""),
            FakeRequest::with_header("Authorization", "Bearer"),
            FakeRequest::with_header("Authorization", "Bearer    "),
            FakeRequest::with_header("Authorization", &format!("Basic {token}")),
            FakeRequest::with_header("Authorization", &token),
        ];

        for req in cases {
            let (result, ctx) = h.run(&req).await;
            assert_eq!(result, Err(AuthError::Unauthenticated));
            assert_eq!(result.unwrap_err().to_string(), "Not authenticated");
            assert!(!ctx.is_authenticated());
        }
    }

    #[tokio::test]
    async fn scheme_and_header_name_are_case_insensitive() {
        let h = Harness::new();
        h.users.register(1, "a@example.com", Role::User);

        let req = FakeRequest::with_header("AUTHORIZATION", &format!("bearer {}", h.token_for(1)));
        let (result, _) = h.run(&req).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn bad_token_is_invalid() {
        let h = Harness::new();
        let (result, ctx) = h.run(&FakeRequest::bearer("badtoken")).await;

        assert_eq!(result, Err(AuthError::InvalidToken));
        assert_eq!(result.unwrap_err().to_string(), messages::INVALID_TOKEN);
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_invalid() {
        let h = Harness::new();
        h.users.register(1, "a@example.com", Role::User);

        let other = TokenCodec::new("not-the-secret", Arc::new(ManualClock::at_timestamp(NOW)));
        let token = other
            .issue(UserId::new(1), TokenType::Access, Duration::minutes(5))
            .unwrap();

        let (result, _) = h.run(&FakeRequest::bearer(&token)).await;
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_token_is_expired_even_for_unknown_user() {
        let h = Harness::new();

        // Minted outside the codec, the way a foreign issuer would.
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({"sub": 1, "exp": (NOW - 1) as f64 + 0.5, "typ": "verify"}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let (result, _) = h.run(&FakeRequest::bearer(&token)).await;
        assert_eq!(result, Err(AuthError::ExpiredToken));
        assert_eq!(result.unwrap_err().to_string(), messages::EXPIRED_TOKEN);
    }

    #[tokio::test]
    async fn banned_or_missing_user_is_invalid_token() {
        let h = Harness::new();
        h.users.register(1, "a@example.com", Role::User);
        let token = h.token_for(1);
        h.users.ban(1);

        let (banned, ctx) = h.run(&FakeRequest::bearer(&token)).await;
        assert_eq!(banned, Err(AuthError::InvalidToken));
        assert!(!ctx.is_authenticated());

        let (missing, _) = h.run(&FakeRequest::bearer(&h.token_for(99))).await;
        assert_eq!(missing, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn authentication_is_repeatable() {
        let h = Harness::new();
        h.users.register(1, "a@example.com", Role::User);
        let req = FakeRequest::bearer(&h.token_for(1));

        let (first, _) = h.run(&req).await;
        let (second, _) = h.run(&req).await;
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[tokio::test]
    async fn non_admin_is_forbidden_from_admin_routes() {
        let h = Harness::new();
        h.users.register(1, "user@example.com", Role::User);

        let (result, ctx) = h.run(&FakeRequest::bearer(&h.token_for(1))).await;
        assert!(result.is_ok());

        let err = require_admin(&ctx).unwrap_err();
        assert_eq!(err, AuthError::Forbidden(ForbiddenReason::Role));
        assert_eq!(err.to_string(), "Forbidden");
    }

    #[tokio::test]
    async fn admin_passes_admin_guard() {
        let h = Harness::new();
        h.users.register(2, "admin@example.com", Role::Admin);

        let (result, ctx) = h.run(&FakeRequest::bearer(&h.token_for(2))).await;
        assert!(result.unwrap().is_admin());
        assert_eq!(require_admin(&ctx), Ok(()));
    }

    #[test]
    fn expiry_uses_injected_clock() {
        let clock = Arc::new(ManualClock::at_timestamp(NOW));
        let codec = TokenCodec::new(SECRET, clock.clone());
        let token = codec
            .encode(
                UserId::new(1),
                DateTime::<Utc>::from_timestamp(NOW + 1, 0).unwrap(),
                TokenType::Access,
            )
            .unwrap();

        assert!(codec.decode(&token).is_ok());
        clock.advance(Duration::seconds(1));
        assert_eq!(codec.decode(&token), Err(TokenError::Expired));
    }
}
