//! HS256 token encoding/decoding.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use gatekeeper_core::UserId;

use crate::claims::{TokenClaims, TokenType, validate_claims};
use crate::clock::{Clock, SystemClock};
use crate::error::TokenError;

/// Signs and verifies time-bound tokens with a shared secret.
///
/// Signature checks are delegated to `jsonwebtoken`; expiry is evaluated here
/// against the injected [`Clock`] so tests can control time exactly.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: impl AsRef<[u8]>, clock: Arc<dyn Clock>) -> Self {
        let secret = secret.as_ref();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }

    pub fn with_system_clock(secret: impl AsRef<[u8]>) -> Self {
        Self::new(secret, Arc::new(SystemClock))
    }

    pub fn encode(
        &self,
        subject: UserId,
        expires_at: DateTime<Utc>,
        typ: TokenType,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims::new(subject, expires_at, typ);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Encode a token that expires `ttl` from the codec's current time.
    pub fn issue(&self, subject: UserId, typ: TokenType, ttl: Duration) -> Result<String, TokenError> {
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Encode("expiry out of range".into()))?;
        self.encode(subject, expires_at, typ)
    }

    /// Verify the signature first, then the expiry.
    ///
    /// A token that is both tampered and expired is reported as malformed.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::trace!(error = %e, "token rejected");
                TokenError::Malformed
            })?;

        validate_claims(&data.claims, self.clock.now())?;
        Ok(data.claims)
    }
}
