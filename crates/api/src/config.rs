//! Process configuration, loaded once at startup and passed down explicitly.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

/// Signing secret used when `SECRET_KEY` is unset. Never use outside dev.
pub const DEV_SECRET_KEY: &str = "dev-secret";

#[derive(Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub secret_key: String,
    /// Upper bound for a whole request, including the user lookup.
    pub request_timeout: Duration,
    /// Seeded as an admin account on startup when set.
    pub admin_email: Option<String>,
}

impl core::fmt::Debug for Settings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Settings")
            .field("bind_addr", &self.bind_addr)
            .field("secret_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("admin_email", &self.admin_email)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source.
    ///
    /// Keys: `SECRET_KEY`, `BIND_ADDR`, `REQUEST_TIMEOUT_SECS`, `ADMIN_EMAIL`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = match lookup("SECRET_KEY").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("SECRET_KEY not set; using insecure dev default");
                DEV_SECRET_KEY.to_string()
            }
        };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => Duration::from_secs(30),
        };

        let admin_email = lookup("ADMIN_EMAIL").filter(|s| !s.trim().is_empty());

        Ok(Self {
            bind_addr,
            secret_key,
            request_timeout,
            admin_email,
        })
    }

    /// Settings for in-process servers (tests, local tooling).
    pub fn with_secret(secret_key: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            secret_key: secret_key.into(),
            request_timeout: Duration::from_secs(30),
            admin_email: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.secret_key, DEV_SECRET_KEY);
        assert_eq!(settings.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.admin_email, None);
    }

    #[test]
    fn explicit_values_win() {
        let settings = Settings::from_lookup(lookup(&[
            ("SECRET_KEY", "s3cret"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("ADMIN_EMAIL", "root@example.com"),
        ]))
        .unwrap();

        assert_eq!(settings.secret_key, "s3cret");
        assert_eq!(settings.bind_addr.port(), 9000);
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.admin_email.as_deref(), Some("root@example.com"));
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(Settings::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("REQUEST_TIMEOUT_SECS", "soon")])).is_err());
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", Settings::with_secret("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
