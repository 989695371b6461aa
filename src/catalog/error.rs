//! Error types for catalog requests.

use thiserror::Error;

/// Failures surfaced by a [`CatalogSource`](super::CatalogSource).
///
/// Listings collapse both variants into `ListingStatus::Error`; the
/// distinction only matters for logging and the retry affordance text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No connectivity, connect failure, or timeout.
    #[error("Network error: {message}")]
    Network { message: String },

    /// API reachable but returned an error status or a malformed body.
    #[error("Upstream error: {status} - {message}")]
    Upstream { status: u16, message: String },

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

impl CatalogError {
    pub fn network(message: impl Into<String>) -> Self {
        CatalogError::Network {
            message: message.into(),
        }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        CatalogError::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Error type string for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            CatalogError::Network { .. } => "network_error",
            CatalogError::Upstream { .. } => "upstream_error",
            CatalogError::Setup(_) => "setup_error",
        }
    }

    /// Short user-facing message for the retry affordance.
    pub fn user_message(&self) -> &'static str {
        match self {
            CatalogError::Network { .. } => "Check your connection and try again",
            CatalogError::Upstream { .. } => "The movie service is unavailable",
            CatalogError::Setup(_) => "The movie service is not configured",
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            let status = err.status().map(|s| s.as_u16()).unwrap_or(200);
            return CatalogError::upstream(status, format!("malformed body: {}", err));
        }
        if let Some(status) = err.status() {
            return CatalogError::upstream(status.as_u16(), err.to_string());
        }
        CatalogError::network(err.to_string())
    }
}
