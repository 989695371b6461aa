//! TMDB key lookup.
//!
//! A v3 API key and a v4 read-access token are both opaque strings; the
//! configured [`AuthScheme`] decides how one travels. The key itself comes
//! from `api.api_key` or, failing that, from the environment variable named
//! by `api.api_key_env`.

use serde::{Deserialize, Serialize};

use super::types::ApiConfig;

/// How the TMDB credential is attached to requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// v3 key as the `api_key` query parameter.
    #[default]
    #[serde(alias = "v3")]
    ApiKey,
    /// v4 read-access token as `Authorization: Bearer`.
    #[serde(alias = "v4")]
    Bearer,
}

/// A TMDB key or token. Debug output is redacted and there is no Display.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecret(String);

impl ApiSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value, for putting on the wire.
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiSecret(<{} chars>)", self.0.chars().count())
    }
}

/// Where a resolved key was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    ConfigFile,
    /// Named environment variable.
    Env(String),
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::ConfigFile => write!(f, "config file"),
            KeySource::Env(var) => write!(f, "${}", var),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedKey {
    pub secret: ApiSecret,
    pub source: KeySource,
}

impl ApiConfig {
    /// Look the key up now. Not cached, so a variable exported after
    /// startup is seen by the next client built.
    pub fn resolve_key(&self) -> Option<ResolvedKey> {
        if let Some(key) = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            return Some(ResolvedKey {
                secret: ApiSecret::new(key),
                source: KeySource::ConfigFile,
            });
        }
        let from_env = std::env::var(&self.api_key_env).ok()?;
        let key = from_env.trim();
        if key.is_empty() {
            return None;
        }
        Some(ResolvedKey {
            secret: ApiSecret::new(key),
            source: KeySource::Env(self.api_key_env.clone()),
        })
    }
}
