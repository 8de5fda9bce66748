//! Reelstore Storage Library
//!
//! Object storage abstraction plus the S3 and local filesystem backends.
//!
//! # Storage key format
//!
//! - **Videos**: `{orientation}/{random_id}.{ext}` (e.g. `landscape/3q2-….mp4`)
//! - **Thumbnails**: `{random_id}.{ext}` at the root of the assets directory
//!
//! `random_id` is 32 bytes from the OS CSPRNG, base64url encoded without
//! padding (43 characters). Key generation lives in the `keys` module so all
//! callers produce the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use factory::create_thumbnail_storage;
pub use factory::create_storage;
pub use keys::{generate_storage_key, KeyNamespace, StorageKey};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use reelstore_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
