use std::fmt;

use http::Request;
use sha2::{Digest, Sha256};

/// Separator between method and URI. Neither a method token nor a request
/// target may contain it unescaped.
const KEY_SEPARATOR: char = '|';

/// Identifies a cached response: request method plus the full request target
/// (path and query), verbatim. No normalization is applied, so `/a?x=1&y=2`
/// and `/a?y=2&x=1` are different keys.
#[derive(Clone, Hash, Eq, PartialEq, Debug)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(method: &str, uri: &str) -> Self {
        Self(format!("{method}{KEY_SEPARATOR}{uri}"))
    }

    pub fn from_request<B>(req: &Request<B>) -> Self {
        let uri = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        Self::new(req.method().as_str(), uri)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase hex SHA-256 of the key. Fixed length and filesystem safe.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
