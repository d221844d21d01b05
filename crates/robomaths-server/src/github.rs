//! GitHub contents API client
//!
//! Performs the authenticated content write on behalf of the browser so
//! the token never leaves the server. The upstream response is handed back
//! untouched.

use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};

use crate::error::ApiError;

const GITHUB_API: &str = "https://api.github.com";

/// Commit message used when the request does not carry one.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Upload via Robot Maths API";

/// Minimal client for the repository contents endpoint.
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GithubClient {
    pub fn new(token: &str) -> Result<Self, ApiError> {
        Self::with_base_url(token, GITHUB_API)
    }

    /// Base URL override (useful for testing)
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&format!("token {token}"))
                .map_err(|_| ApiError::Config("Invalid characters in GitHub token".to_string()))?,
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let http = reqwest::Client::builder()
            .user_agent(concat!("robomaths-server/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create or update a file in a repository.
    ///
    /// Returns the upstream HTTP status and JSON body verbatim; transport
    /// failures surface as [`ApiError::Upstream`].
    pub async fn save_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
        message: Option<&str>,
    ) -> Result<(StatusCode, Value), ApiError> {
        let url = format!("{}/repos/{}/{}/contents/{}", self.base_url, owner, repo, path);
        let payload = json!({
            "message": message.unwrap_or(DEFAULT_COMMIT_MESSAGE),
            "content": BASE64.encode(content),
        });

        let resp = self
            .http
            .put(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        let status = resp.status();
        let body: Value = resp.json().await.map_err(|e| ApiError::Upstream(e.to_string()))?;

        Ok((status, body))
    }
}
