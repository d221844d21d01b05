//! Server configuration management

use crate::error::{ApiError, Result};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Secret credential for the GitHub proxy. Server-side only: never
    /// serialized and never served by `/api/env`.
    pub github_token: Option<String>,

    /// Publishable storage endpoint served by `/api/env`.
    pub supabase_url: Option<String>,

    /// Publishable storage key served by `/api/env`.
    pub supabase_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid PORT value".to_string()))?,
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|v| !v.is_empty()),
            supabase_url: std::env::var("SUPABASE_URL").ok(),
            supabase_key: std::env::var("SUPABASE_KEY").ok(),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            github_token: None,
            supabase_url: None,
            supabase_key: None,
        }
    }
}
