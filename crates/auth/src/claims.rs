use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use gatekeeper_core::UserId;

use crate::error::TokenError;

/// Purpose a token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
    Verify,
    Reset,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
            TokenType::Verify => "verify",
            TokenType::Reset => "reset",
        }
    }
}

impl core::fmt::Display for TokenType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed token payload.
///
/// Issuers in other stacks write `sub` as either a number or a numeric string
/// and `exp` as either an integer or a float; both forms are accepted here.
/// A fractional `exp` keeps its sub-second part. Whole-second expiries are
/// written as integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user the token was issued to.
    #[serde(deserialize_with = "de_subject")]
    pub sub: UserId,

    /// Expiry, as seconds since the Unix epoch on the wire.
    #[serde(with = "numeric_date")]
    pub exp: DateTime<Utc>,

    pub typ: TokenType,
}

impl TokenClaims {
    pub fn new(sub: UserId, expires_at: DateTime<Utc>, typ: TokenType) -> Self {
        Self {
            sub,
            exp: expires_at,
            typ,
        }
    }

    /// `now == exp` already counts as expired; there is no skew allowance.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.exp
    }
}

/// Check the time window of already signature-verified claims.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.is_expired_at(now) {
        return Err(TokenError::Expired);
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SubjectRepr {
    Int(i64),
    Text(String),
}

fn de_subject<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: Deserializer<'de>,
{
    match SubjectRepr::deserialize(deserializer)? {
        SubjectRepr::Int(v) => Ok(UserId::new(v)),
        SubjectRepr::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

mod numeric_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const NANOS_PER_SEC: f64 = 1_000_000_000.0;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TimestampRepr {
        Int(i64),
        Float(f64),
    }

    pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match at.timestamp_subsec_nanos() {
            0 => serializer.serialize_i64(at.timestamp()),
            nanos => serializer.serialize_f64(at.timestamp() as f64 + f64::from(nanos) / NANOS_PER_SEC),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let at = match TimestampRepr::deserialize(deserializer)? {
            TimestampRepr::Int(secs) => DateTime::<Utc>::from_timestamp(secs, 0),
            TimestampRepr::Float(v) if v.is_finite() => {
                let secs = v.floor();
                let nanos = ((v - secs) * NANOS_PER_SEC).round().min(999_999_999.0) as u32;
                DateTime::<Utc>::from_timestamp(secs as i64, nanos)
            }
            TimestampRepr::Float(_) => None,
        };
        at.ok_or_else(|| de::Error::custom("exp is not a representable timestamp"))
    }
}
