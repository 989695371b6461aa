//! Authentication parameters for catalog requests.
//!
//! TMDB accepts either a v3 key as a query parameter or a v4 token as a
//! bearer header; this maps the resolved credential onto one of them.

use super::credentials::AuthScheme;
use super::types::ApiConfig;

/// Where the credential travels on each request.
#[derive(Debug, Clone)]
pub enum RequestAuth {
    /// `?api_key=<key>`
    Query(String, String),
    /// `<name>: <value>` header.
    Header(String, String),
    None,
}

/// Build the authentication parameters for the configured API.
///
/// Missing credentials yield `RequestAuth::None`; the upstream then answers
/// 401, which surfaces as an upstream error on the affected listing.
pub fn build_request_auth(api: &ApiConfig) -> RequestAuth {
    let Some(key) = api.resolve_key() else {
        return RequestAuth::None;
    };
    match api.auth {
        AuthScheme::ApiKey => RequestAuth::Query("api_key".to_string(), key.secret.reveal().to_string()),
        AuthScheme::Bearer => RequestAuth::Header(
            "Authorization".to_string(),
            format!("Bearer {}", key.secret.reveal()),
        ),
    }
}
