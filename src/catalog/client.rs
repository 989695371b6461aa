//! HTTP client for TMDB-compatible catalog APIs.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::config::{build_request_auth, ApiConfig, RequestAuth};

use super::error::CatalogError;
use super::models::{MovieDetail, Page, PageResponse};
use super::source::CatalogSource;

/// Upper bound on error bodies echoed into logs and error messages.
const MAX_ERROR_BODY: usize = 512;

pub struct TmdbClient {
    client: Client,
    base_url: String,
    auth: RequestAuth,
    language: Option<String>,
}

impl TmdbClient {
    /// Build a client from the `[api]` config section.
    ///
    /// Credentials are resolved once here; a missing key is not an error
    /// (the upstream will reject requests with 401).
    pub fn new(api: &ApiConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds as u64))
            .connect_timeout(Duration::from_secs(api.connect_timeout_seconds as u64))
            .build()
            .map_err(|e| CatalogError::Setup(e.to_string()))?;

        match api.resolve_key() {
            Some(key) => tracing::debug!(source = %key.source, auth = ?api.auth, "Catalog key resolved"),
            None => tracing::warn!(
                api_key_env = %api.api_key_env,
                "No catalog credentials configured; requests will likely be rejected"
            ),
        }

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            auth: build_request_auth(api),
            language: api.language.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, CatalogError> {
        let mut query: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        if let RequestAuth::Query(name, value) = &self.auth {
            query.push((name.as_str(), value.as_str()));
        }
        if let Some(language) = &self.language {
            query.push(("language", language.as_str()));
        }

        let raw = format!("{}{}", self.base_url, path);
        Url::parse_with_params(&raw, &query)
            .map_err(|e| CatalogError::Setup(format!("invalid URL '{}': {}", raw, e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = self.build_url(path, params)?;
        let mut builder = self.client.get(url);
        if let RequestAuth::Header(name, value) = &self.auth {
            builder = builder.header(name.as_str(), value.as_str());
        }

        tracing::debug!(path = %path, "Sending catalog request");

        let start = Instant::now();
        let response = builder.send().await?;

        let status = response.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            let error_text = truncate(&error_text, MAX_ERROR_BODY);

            tracing::warn!(
                path = %path,
                status = %status,
                latency_ms,
                error = %error_text,
                "Catalog API error"
            );

            return Err(CatalogError::upstream(status.as_u16(), error_text));
        }

        let bytes = response.bytes().await?;

        tracing::debug!(path = %path, status = %status, latency_ms, bytes = bytes.len(), "Catalog response");

        serde_json::from_slice(&bytes).map_err(|e| {
            CatalogError::upstream(status.as_u16(), format!("malformed body: {}", e))
        })
    }

    async fn get_page(&self, path: &str, params: &[(&str, String)]) -> Result<Page, CatalogError> {
        let wire: PageResponse = self.get_json(path, params).await?;
        Ok(wire.into())
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    async fn fetch_popular(&self, page: u32) -> Result<Page, CatalogError> {
        self.get_page("/movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn search_by_title(&self, query: &str, page: u32) -> Result<Page, CatalogError> {
        self.get_page(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn fetch_details(&self, id: u64) -> Result<MovieDetail, CatalogError> {
        self.get_json(
            &format!("/movie/{}", id),
            &[("append_to_response", "credits".to_string())],
        )
        .await
    }

    async fn fetch_similar(&self, id: u64, page: u32) -> Result<Page, CatalogError> {
        self.get_page(&format!("/movie/{}/similar", id), &[("page", page.to_string())])
            .await
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}
