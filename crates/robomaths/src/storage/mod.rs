//! Object storage abstraction for the resource bucket
//!
//! This module provides the storage trait, the in-memory implementation
//! for testing, and the Supabase Storage backend used in production.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod memory;
pub mod supabase;

pub use memory::MemoryStorage;
pub use supabase::SupabaseStorage;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("No file content provided")]
    EmptyFile,

    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Entry returned by a bucket listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Upload behavior, mirroring the storage API's options object.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Cache lifetime requested for the object, in seconds.
    pub cache_control: Option<String>,
    /// Overwrite an existing object instead of rejecting the upload.
    pub upsert: bool,
}

/// Abstraction over the remote object store.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` at `path`, returning the stored path.
    ///
    /// Without `options.upsert`, uploading over an existing object fails
    /// with [`StorageError::AlreadyExists`].
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<String, StorageError>;

    /// Publicly reachable URL for `path`.
    ///
    /// Pure derivation with no existence check: the returned URL may point
    /// to an object that was never uploaded.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// List entries under `prefix`.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>, StorageError>;

    /// Delete the objects at `paths`.
    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError>;
}
