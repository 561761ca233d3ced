// Credential providers for the upstream API key
// Author: kelexine (https://github.com/kelexine)

use zeroize::Zeroizing;

/// A Gemini API key.
///
/// The backing buffer is wiped on drop and `Debug` never prints the value.
#[derive(Clone)]
pub struct ApiKey(Zeroizing<String>);

impl ApiKey {
    /// Wraps a raw key. Empty keys are treated as absent.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Source of the API key, consulted once per invocation.
pub trait CredentialProvider: Send + Sync {
    /// Returns the key, or `None` when it is not configured.
    fn api_key(&self) -> Option<ApiKey>;

    /// Human-readable name of where the key comes from, for diagnostics.
    fn source(&self) -> String;
}

/// Reads the key from a process environment variable at call time.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Option<ApiKey> {
        std::env::var(&self.var).ok().and_then(ApiKey::new)
    }

    fn source(&self) -> String {
        format!("environment variable {}", self.var)
    }
}

/// Fixed key supplied up front. Used by tests and embedders that resolve
/// secrets elsewhere.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    key: Option<ApiKey>,
}

impl StaticCredentials {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            key: ApiKey::new(raw),
        }
    }

    /// A provider that never has a key.
    pub fn absent() -> Self {
        Self { key: None }
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Option<ApiKey> {
        self.key.clone()
    }

    fn source(&self) -> String {
        "static credentials".to_string()
    }
}
