//! Supabase Storage backend
//!
//! Implements [`ObjectStorage`] against the Supabase Storage v1 REST API
//! using the project's publishable key. The key is sent both as `apikey`
//! and as a bearer credential, matching what the hosted API expects.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, HeaderMap, HeaderValue};
use serde_json::json;

use super::{ObjectEntry, ObjectStorage, StorageError, UploadOptions};
use crate::config::PublicConfig;

/// Page size for listings, the hosted API's default.
const LIST_LIMIT: u32 = 100;

/// Supabase Storage implementation of [`ObjectStorage`].
pub struct SupabaseStorage {
    http: reqwest::Client,
    base_url: String,
}

impl SupabaseStorage {
    /// Create a storage client for a Supabase project.
    pub fn new(supabase_url: impl Into<String>, supabase_key: &str) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(supabase_key)
                .map_err(|_| StorageError::Backend("Invalid characters in storage key".into()))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {supabase_key}"))
                .map_err(|_| StorageError::Backend("Invalid characters in storage key".into()))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StorageError::Backend(format!("Failed to build HTTP client: {e}")))?;

        let base_url = supabase_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Create a storage client from resolved public configuration.
    pub fn from_config(config: &PublicConfig) -> Result<Self, StorageError> {
        Self::new(config.supabase_url.clone(), &config.supabase_key)
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path)
    }

    fn validate_path(path: &str) -> Result<(), StorageError> {
        if path.is_empty() || path.len() > 1024 {
            return Err(StorageError::InvalidPath(
                "Path must be between 1 and 1024 characters".into(),
            ));
        }
        if path.starts_with('/') || path.ends_with('/') {
            return Err(StorageError::InvalidPath(
                "Path cannot start or end with '/'".into(),
            ));
        }
        Ok(())
    }

    /// Extract the backend's error message from a failed response.
    async fn error_message(resp: reqwest::Response) -> String {
        let status = resp.status();
        match resp.text().await {
            Ok(body) => serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {status}: {body}")),
            Err(_) => format!("HTTP {status}"),
        }
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<String, StorageError> {
        Self::validate_path(path)?;

        let mut request = self
            .http
            .post(self.object_url(bucket, path))
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(data);
        if let Some(seconds) = &options.cache_control {
            request = request.header(CACHE_CONTROL, format!("max-age={seconds}"));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to upload '{path}': {e}")))?;

        let status = resp.status();
        if status.is_success() {
            Ok(path.to_string())
        } else if status == StatusCode::CONFLICT {
            Err(StorageError::AlreadyExists(path.to_string()))
        } else {
            Err(StorageError::Backend(Self::error_message(resp).await))
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, bucket, path)
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>, StorageError> {
        let resp = self
            .http
            .post(format!("{}/storage/v1/object/list/{}", self.base_url, bucket))
            .json(&json!({ "prefix": prefix, "limit": LIST_LIMIT, "offset": 0 }))
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to list '{prefix}': {e}")))?;

        if !resp.status().is_success() {
            return Err(StorageError::Backend(Self::error_message(resp).await));
        }

        resp.json::<Vec<ObjectEntry>>()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to decode listing for '{prefix}': {e}")))
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        for path in paths {
            Self::validate_path(path)?;
        }

        let resp = self
            .http
            .delete(format!("{}/storage/v1/object/{}", self.base_url, bucket))
            .json(&json!({ "prefixes": paths }))
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to delete objects: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::NOT_FOUND {
            Err(StorageError::NotFound(paths.join(", ")))
        } else {
            Err(StorageError::Backend(Self::error_message(resp).await))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SupabaseStorage {
        SupabaseStorage::new("https://project.supabase.co", "sb_publishable_test").unwrap()
    }

    #[test]
    fn test_public_url_derivation() {
        assert_eq!(
            storage().public_url("ressources-lycee", "seconde/vecteurs/cours/vecteurs_cours.pdf"),
            "https://project.supabase.co/storage/v1/object/public/ressources-lycee/seconde/vecteurs/cours/vecteurs_cours.pdf"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed_from_base_url() {
        let storage = SupabaseStorage::new("https://project.supabase.co/", "key").unwrap();
        assert_eq!(
            storage.public_url("bucket", "a.pdf"),
            "https://project.supabase.co/storage/v1/object/public/bucket/a.pdf"
        );
    }

    #[test]
    fn test_object_url() {
        assert_eq!(
            storage().object_url("bucket", "premiere/suites/cours/f.tex"),
            "https://project.supabase.co/storage/v1/object/bucket/premiere/suites/cours/f.tex"
        );
    }

    #[test]
    fn test_path_validation() {
        assert!(SupabaseStorage::validate_path("seconde/vecteurs/cours/f.pdf").is_ok());

        assert!(SupabaseStorage::validate_path("").is_err());
        assert!(SupabaseStorage::validate_path("/leading").is_err());
        assert!(SupabaseStorage::validate_path("trailing/").is_err());
        assert!(SupabaseStorage::validate_path(&"x".repeat(1025)).is_err());
    }

    #[test]
    fn test_invalid_key_rejected() {
        let result = SupabaseStorage::new("https://project.supabase.co", "clé\navec\nretours");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_config() {
        let config = PublicConfig {
            supabase_url: "https://other.supabase.co".to_string(),
            supabase_key: "sb_publishable_other".to_string(),
        };
        let storage = SupabaseStorage::from_config(&config).unwrap();
        assert_eq!(
            storage.public_url("bucket", "a.pdf"),
            "https://other.supabase.co/storage/v1/object/public/bucket/a.pdf"
        );
    }
}
