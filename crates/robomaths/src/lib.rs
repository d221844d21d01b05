//! # Robot Maths resource layer
//!
//! Storage client for the per-chapter teaching material of the Robot Maths
//! lycee site:
//! - Deterministic storage paths of the form
//!   `{level}/{chapter-slug}/{kind}/{chapter-slug}_{kind}.{ext}`
//! - Upload, public-URL derivation, listing and deletion against the
//!   `ressources-lycee` bucket
//! - Public runtime configuration with a built-in fallback
//!
//! ## Example
//!
//! ```rust,no_run
//! use robomaths::{Format, Level, PublicConfig, ResourceKind, ResourceStore, SupabaseStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (config, _source) = PublicConfig::resolve(None).await;
//! let store = ResourceStore::new(SupabaseStorage::from_config(&config)?);
//!
//! let path = store
//!     .upload(
//!         std::fs::read("suites.pdf")?,
//!         Level::Premiere,
//!         "Suites Numériques",
//!         ResourceKind::Cours,
//!         Format::Pdf,
//!     )
//!     .await?;
//!
//! println!("stored at {path}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod path;
pub mod resources;
pub mod slug;
pub mod storage;

pub use config::{ConfigSource, PublicConfig};
pub use path::{Format, Level, ResourceKind};
pub use resources::{BatchFiles, BatchReport, ResourceStore, BUCKET_NAME};
pub use slug::slugify;
pub use storage::{MemoryStorage, ObjectStorage, StorageError, SupabaseStorage};
