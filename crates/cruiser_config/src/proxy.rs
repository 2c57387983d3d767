use serde::Deserialize;

// =======================================================
// PROXY CONFIG + DEFAULTS
// =======================================================
/// `port` and `origin` have no usable defaults; validation rejects the zero
/// values unless the process only clears the cache.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub port: u16,
    pub origin: String,
}

impl ProxyConfig {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}
