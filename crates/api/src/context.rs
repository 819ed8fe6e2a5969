use axum::http::HeaderMap;

use gatekeeper_auth::RequestParts;

/// Exposes axum request headers to the authenticator.
///
/// `HeaderMap` lookups are already case-insensitive; values that are not
/// visible ASCII are treated as absent.
#[derive(Debug, Clone, Copy)]
pub struct HeaderParts<'a> {
    headers: &'a HeaderMap,
}

impl<'a> HeaderParts<'a> {
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self { headers }
    }
}

impl RequestParts for HeaderParts<'_> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}
