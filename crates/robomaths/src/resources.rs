//! Resource store client
//!
//! Stateless façade over the object store for the site's chapter material.
//! All path derivation goes through [`crate::path`]; the remote store is
//! the sole owner of the stored objects.

use serde::Serialize;
use tracing::{debug, error};

use crate::path::{self, Format, Level, ResourceKind};
use crate::storage::{ObjectEntry, ObjectStorage, StorageError, UploadOptions};

/// Bucket holding every lycee resource.
pub const BUCKET_NAME: &str = "ressources-lycee";

/// Cache lifetime requested for uploaded objects, in seconds.
const CACHE_CONTROL_SECS: &str = "3600";

/// Files submitted together for one chapter resource.
///
/// Each present format becomes an independent object; absent formats are
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct BatchFiles {
    pub tex: Option<Vec<u8>>,
    pub docx: Option<Vec<u8>>,
    pub pdf: Option<Vec<u8>>,
}

impl BatchFiles {
    pub fn is_empty(&self) -> bool {
        self.tex.is_none() && self.docx.is_none() && self.pdf.is_none()
    }

    fn take(&mut self, format: Format) -> Option<Vec<u8>> {
        match format {
            Format::Tex => self.tex.take(),
            Format::Docx => self.docx.take(),
            Format::Pdf => self.pdf.take(),
        }
    }
}

/// One successfully uploaded batch member.
#[derive(Debug, Clone, Serialize)]
pub struct BatchUpload {
    pub format: &'static str,
    pub path: String,
}

/// One failed batch member.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub format: &'static str,
    pub error: String,
}

/// Outcome of a batch upload. `success` holds iff `errors` is empty.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub success: bool,
    pub results: Vec<BatchUpload>,
    pub errors: Vec<BatchFailure>,
}

/// Public URLs for every format of one resource kind.
#[derive(Debug, Clone, Serialize)]
pub struct FormatUrls {
    pub tex: String,
    pub docx: String,
    pub pdf: String,
}

/// Public URLs for a whole chapter, cours and exercices alike.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterUrls {
    pub cours: FormatUrls,
    pub exercices: FormatUrls,
}

/// Client for chapter resources stored in the [`BUCKET_NAME`] bucket.
pub struct ResourceStore<S> {
    storage: S,
}

impl<S: ObjectStorage> ResourceStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Access to the underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Upload one resource file, overwriting any previous object at the
    /// same path.
    ///
    /// The object path is derived from the inputs:
    /// `{level}/{chapter-slug}/{kind}/{chapter-slug}_{kind}.{ext}`.
    pub async fn upload(
        &self,
        data: Vec<u8>,
        level: Level,
        chapter: &str,
        kind: ResourceKind,
        format: Format,
    ) -> Result<String, StorageError> {
        if data.is_empty() {
            return Err(StorageError::EmptyFile);
        }

        let file_name = path::file_name(chapter, kind, format);
        let object_path = path::build_path(level, chapter, kind, &file_name);
        let options = UploadOptions {
            cache_control: Some(CACHE_CONTROL_SECS.to_string()),
            upsert: true,
        };

        let stored = self.storage.upload(BUCKET_NAME, &object_path, data, &options).await?;
        debug!(path = %stored, "resource uploaded");
        Ok(stored)
    }

    /// Upload up to three formats of the same resource, in the fixed order
    /// tex, docx, pdf.
    ///
    /// A failing member never aborts its siblings; successes and failures
    /// are reported separately, keyed by format.
    pub async fn upload_batch(
        &self,
        mut files: BatchFiles,
        level: Level,
        chapter: &str,
        kind: ResourceKind,
    ) -> BatchReport {
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for format in Format::ALL {
            let Some(data) = files.take(format) else {
                continue;
            };

            match self.upload(data, level, chapter, kind, format).await {
                Ok(path) => results.push(BatchUpload { format: format.ext(), path }),
                Err(e) => {
                    error!(format = format.ext(), error = %e, "batch member failed");
                    errors.push(BatchFailure {
                        format: format.ext(),
                        error: e.to_string(),
                    });
                }
            }
        }

        BatchReport {
            success: errors.is_empty(),
            results,
            errors,
        }
    }

    /// Public URL of one resource file. No existence check: the URL may
    /// point to an object that was never uploaded.
    pub fn public_url(
        &self,
        level: Level,
        chapter: &str,
        kind: ResourceKind,
        format: Format,
    ) -> String {
        let file_name = path::file_name(chapter, kind, format);
        let object_path = path::build_path(level, chapter, kind, &file_name);
        self.storage.public_url(BUCKET_NAME, &object_path)
    }

    /// Public URLs for every kind × format combination of a chapter,
    /// always fully populated.
    pub fn all_urls(&self, level: Level, chapter: &str) -> ChapterUrls {
        let urls_for = |kind| FormatUrls {
            tex: self.public_url(level, chapter, kind, Format::Tex),
            docx: self.public_url(level, chapter, kind, Format::Docx),
            pdf: self.public_url(level, chapter, kind, Format::Pdf),
        };

        ChapterUrls {
            cours: urls_for(ResourceKind::Cours),
            exercices: urls_for(ResourceKind::Exercices),
        }
    }

    /// List stored objects under `level[/chapter[/kind]]`.
    ///
    /// Backend failures are logged and collapse to an empty list; callers
    /// needing the typed error can use [`ObjectStorage::list`] directly.
    pub async fn list(
        &self,
        level: Level,
        chapter: Option<&str>,
        kind: Option<ResourceKind>,
    ) -> Vec<ObjectEntry> {
        let prefix = path::prefix(level, chapter, kind);
        match self.storage.list(BUCKET_NAME, &prefix).await {
            Ok(entries) => entries,
            Err(e) => {
                error!(prefix = %prefix, error = %e, "listing failed");
                Vec::new()
            }
        }
    }

    /// Delete the single object at the derived path.
    pub async fn remove(
        &self,
        level: Level,
        chapter: &str,
        kind: ResourceKind,
        format: Format,
    ) -> Result<(), StorageError> {
        let file_name = path::file_name(chapter, kind, format);
        let object_path = path::build_path(level, chapter, kind, &file_name);
        self.storage.remove(BUCKET_NAME, &[object_path]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> ResourceStore<MemoryStorage> {
        ResourceStore::new(MemoryStorage::new())
    }

    #[tokio::test]
    async fn test_upload_derives_path() {
        let store = store();
        let path = store
            .upload(
                b"%PDF-1.4".to_vec(),
                Level::Seconde,
                "Suites Numériques",
                ResourceKind::Cours,
                Format::Pdf,
            )
            .await
            .unwrap();

        assert_eq!(path, "seconde/suites-numeriques/cours/suites-numeriques_cours.pdf");
        assert_eq!(
            store.storage().get(BUCKET_NAME, &path),
            Some(b"%PDF-1.4".to_vec())
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file() {
        let store = store();
        let result = store
            .upload(Vec::new(), Level::Seconde, "Vecteurs", ResourceKind::Cours, Format::Pdf)
            .await;
        assert!(matches!(result, Err(StorageError::EmptyFile)));
        assert!(store.storage().is_empty());
    }

    #[tokio::test]
    async fn test_repeat_upload_overwrites() {
        let store = store();
        for payload in [b"v1".to_vec(), b"v2".to_vec()] {
            store
                .upload(payload, Level::Premiere, "Dérivation", ResourceKind::Cours, Format::Tex)
                .await
                .unwrap();
        }

        // Upsert semantics: one logical object, second payload wins
        assert_eq!(store.storage().len(), 1);
        assert_eq!(
            store
                .storage()
                .get(BUCKET_NAME, "premiere/derivation/cours/derivation_cours.tex"),
            Some(b"v2".to_vec())
        );
    }

    #[tokio::test]
    async fn test_batch_single_pdf() {
        let store = store();
        let files = BatchFiles {
            pdf: Some(b"%PDF-1.4".to_vec()),
            ..Default::default()
        };

        let report = store
            .upload_batch(files, Level::Terminale, "Probabilités", ResourceKind::Exercices)
            .await;

        assert!(report.success);
        assert!(report.errors.is_empty());
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].format, "pdf");
        assert_eq!(
            report.results[0].path,
            "terminale/probabilites/exercices/probabilites_exercices.pdf"
        );
    }

    #[tokio::test]
    async fn test_batch_reports_failures_without_aborting() {
        let store = store();
        // The empty docx member fails; tex and pdf still go through
        let files = BatchFiles {
            tex: Some(b"\\documentclass{article}".to_vec()),
            docx: Some(Vec::new()),
            pdf: Some(b"%PDF-1.4".to_vec()),
        };

        let report = store
            .upload_batch(files, Level::Seconde, "Fonctions", ResourceKind::Cours)
            .await;

        assert!(!report.success);
        let formats: Vec<_> = report.results.iter().map(|r| r.format).collect();
        assert_eq!(formats, ["tex", "pdf"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].format, "docx");
    }

    #[tokio::test]
    async fn test_batch_backend_rejection() {
        let store = store();
        store.storage().fail_with("service unavailable");

        let files = BatchFiles {
            pdf: Some(b"%PDF-1.4".to_vec()),
            ..Default::default()
        };
        let report = store
            .upload_batch(files, Level::Seconde, "Fonctions", ResourceKind::Cours)
            .await;

        assert!(!report.success);
        assert!(report.results.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].format, "pdf");
        assert!(report.errors[0].error.contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_batch_empty_is_vacuous_success() {
        let store = store();
        let report = store
            .upload_batch(BatchFiles::default(), Level::Seconde, "Fonctions", ResourceKind::Cours)
            .await;

        assert!(report.success);
        assert!(report.results.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_all_urls_fully_populated() {
        let store = store();
        let urls = store.all_urls(Level::Terminale, "Probabilités");

        for url in [
            &urls.cours.tex,
            &urls.cours.docx,
            &urls.cours.pdf,
            &urls.exercices.tex,
            &urls.exercices.docx,
            &urls.exercices.pdf,
        ] {
            assert!(!url.is_empty());
            assert!(url.contains("terminale/probabilites/"));
        }
        assert!(urls.cours.pdf.ends_with("probabilites_cours.pdf"));
        assert!(urls.exercices.docx.ends_with("probabilites_exercices.docx"));
    }

    #[test]
    fn test_all_urls_serializes_by_kind_and_format() {
        let store = store();
        let urls = store.all_urls(Level::Seconde, "Vecteurs");
        let value = serde_json::to_value(&urls).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        for kind in ["cours", "exercices"] {
            let formats = value[kind].as_object().unwrap();
            assert_eq!(formats.len(), 3);
            for ext in ["tex", "docx", "pdf"] {
                assert!(formats[ext].as_str().is_some_and(|u| !u.is_empty()));
            }
        }
    }

    #[tokio::test]
    async fn test_list_progressive_prefixes() {
        let store = store();
        for (level, chapter, kind, format) in [
            (Level::Seconde, "Vecteurs", ResourceKind::Cours, Format::Pdf),
            (Level::Seconde, "Vecteurs", ResourceKind::Exercices, Format::Pdf),
            (Level::Seconde, "Fonctions", ResourceKind::Cours, Format::Pdf),
        ] {
            store
                .upload(b"%PDF-1.4".to_vec(), level, chapter, kind, format)
                .await
                .unwrap();
        }

        assert_eq!(store.list(Level::Seconde, None, None).await.len(), 3);
        assert_eq!(store.list(Level::Seconde, Some("Vecteurs"), None).await.len(), 2);
        assert_eq!(
            store
                .list(Level::Seconde, Some("Vecteurs"), Some(ResourceKind::Cours))
                .await
                .len(),
            1
        );
        assert!(store.list(Level::Terminale, None, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_collapses_backend_errors() {
        let store = store();
        store.storage().fail_with("unreachable");

        // The façade never surfaces the listing failure
        assert!(store.list(Level::Seconde, None, None).await.is_empty());

        // The typed error stays visible one layer down
        assert!(store.storage().list(BUCKET_NAME, "seconde").await.is_err());
    }

    #[tokio::test]
    async fn test_remove_deletes_derived_path() {
        let store = store();
        store
            .upload(b"%PDF-1.4".to_vec(), Level::Seconde, "Vecteurs", ResourceKind::Cours, Format::Pdf)
            .await
            .unwrap();

        store
            .remove(Level::Seconde, "Vecteurs", ResourceKind::Cours, Format::Pdf)
            .await
            .unwrap();
        assert!(store.storage().is_empty());
    }

    #[tokio::test]
    async fn test_remove_backend_rejection() {
        let store = store();
        store.storage().fail_with("forbidden");

        let result = store
            .remove(Level::Seconde, "Vecteurs", ResourceKind::Cours, Format::Pdf)
            .await;
        assert!(matches!(result, Err(StorageError::Backend(_))));
    }
}
