//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ObjectEntry, ObjectStorage, StorageError, UploadOptions};

/// In-memory object store keyed by `bucket/path`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    failure: Mutex<Option<String>>,
}

fn object_key(bucket: &str, path: &str) -> String {
    format!("{bucket}/{path}")
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all stored keys (useful for testing)
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Get the stored bytes for an object (useful for testing)
    pub fn get(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(&object_key(bucket, path)).cloned()
    }

    /// Get number of stored objects
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.objects.lock().unwrap().clear();
    }

    /// Make every subsequent call fail with the given backend message
    /// (useful for testing error aggregation)
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Clear an injected failure
    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap() = None;
    }

    fn check_failure(&self) -> Result<(), StorageError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(StorageError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<String, StorageError> {
        self.check_failure()?;

        let key = object_key(bucket, path);
        let mut objects = self.objects.lock().unwrap();
        if !options.upsert && objects.contains_key(&key) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }

        objects.insert(key, data);
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{bucket}/{path}")
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>, StorageError> {
        self.check_failure()?;

        let bucket_prefix = format!("{bucket}/");
        let objects = self.objects.lock().unwrap();
        let mut entries: Vec<ObjectEntry> = objects
            .keys()
            .filter_map(|key| key.strip_prefix(&bucket_prefix))
            .filter(|path| path.starts_with(prefix))
            .map(|path| ObjectEntry {
                name: path.to_string(),
                id: None,
                updated_at: None,
            })
            .collect();

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        self.check_failure()?;

        let mut objects = self.objects.lock().unwrap();
        for path in paths {
            objects.remove(&object_key(bucket, path));
        }
        Ok(())
    }
}
