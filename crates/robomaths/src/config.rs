//! Public runtime configuration
//!
//! Only publishable values live here: the storage endpoint and the
//! publishable key. The GitHub token is server-side only and must never
//! transit through this type.

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

static GLOBAL: OnceCell<PublicConfig> = OnceCell::const_new();

/// Publishable storage endpoint and key pair.
///
/// Serializes with the wire field names served by `/api/env`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicConfig {
    #[serde(rename = "SUPABASE_URL")]
    pub supabase_url: String,
    #[serde(rename = "SUPABASE_KEY")]
    pub supabase_key: String,
}

/// Which source a resolved configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Fetched from the local configuration endpoint.
    Endpoint,
    /// Read from `SUPABASE_URL` / `SUPABASE_KEY`.
    Environment,
    /// Built-in fallback pair.
    Default,
}

impl PublicConfig {
    pub const DEFAULT_URL: &'static str = "https://fhpfpnlkcvhxotbblzps.supabase.co";
    pub const DEFAULT_KEY: &'static str = "sb_publishable_xxx";

    fn defaults() -> Self {
        Self {
            supabase_url: Self::DEFAULT_URL.to_string(),
            supabase_key: Self::DEFAULT_KEY.to_string(),
        }
    }

    fn from_env() -> Option<Self> {
        let supabase_url = std::env::var("SUPABASE_URL").ok().filter(|v| !v.is_empty())?;
        let supabase_key = std::env::var("SUPABASE_KEY").ok().filter(|v| !v.is_empty())?;
        Some(Self { supabase_url, supabase_key })
    }

    /// Replace empty fields with the built-in defaults. The endpoint serves
    /// empty strings for unset values, field by field.
    fn or_defaults(mut self) -> Self {
        if self.supabase_url.is_empty() {
            self.supabase_url = Self::DEFAULT_URL.to_string();
        }
        if self.supabase_key.is_empty() {
            self.supabase_key = Self::DEFAULT_KEY.to_string();
        }
        self
    }

    async fn fetch(endpoint: &str) -> Result<Self, reqwest::Error> {
        let fetched: PublicConfig = reqwest::get(endpoint)
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(fetched.or_defaults())
    }

    /// Resolve configuration from the first available source: the local
    /// endpoint when given, then the environment, then the built-in
    /// defaults.
    ///
    /// A failed fetch is recovered locally and logged, never surfaced as an
    /// error; the returned [`ConfigSource`] tells fallback apart from
    /// fetched values.
    pub async fn resolve(endpoint: Option<&str>) -> (Self, ConfigSource) {
        if let Some(endpoint) = endpoint {
            match Self::fetch(endpoint).await {
                Ok(config) => {
                    debug!(endpoint, "configuration fetched");
                    return (config, ConfigSource::Endpoint);
                }
                Err(e) => warn!(endpoint, error = %e, "config fetch failed, falling back"),
            }
        }

        if let Some(config) = Self::from_env() {
            return (config, ConfigSource::Environment);
        }

        (Self::defaults(), ConfigSource::Default)
    }

    /// Process-wide configuration, established exactly once.
    ///
    /// The first call resolves and stores the value; every later call
    /// returns the already-established value without re-resolving, and
    /// concurrent first calls settle on a single winner.
    pub async fn global(endpoint: Option<&str>) -> &'static PublicConfig {
        GLOBAL
            .get_or_init(move || async move { Self::resolve(endpoint).await.0 })
            .await
    }
}
