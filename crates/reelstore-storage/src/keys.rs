//! Storage key generation.
//!
//! Keys are `{namespace}/{random_id}.{ext}` for videos and `{random_id}.{ext}`
//! for thumbnails. The random id carries 256 bits from the OS CSPRNG and says
//! nothing about the uploaded content.

use crate::traits::{StorageError, StorageResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::TryRngCore;
use reelstore_core::models::Orientation;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Number of random bytes in every key.
pub const RANDOM_ID_BYTES: usize = 32;

/// Length of the base64url (unpadded) encoding of [`RANDOM_ID_BYTES`].
pub const RANDOM_ID_LEN: usize = 43;

/// Where in the bucket a key lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyNamespace {
    /// Flat root, used for thumbnails.
    Root,
    /// Orientation partition, used for videos.
    Orientation(Orientation),
}

impl KeyNamespace {
    fn prefix(&self) -> Option<&'static str> {
        match self {
            KeyNamespace::Root => None,
            KeyNamespace::Orientation(o) => Some(o.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey {
    pub namespace: KeyNamespace,
    pub id: String,
    pub extension: String,
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.namespace.prefix() {
            Some(prefix) => write!(f, "{}/{}.{}", prefix, self.id, self.extension),
            None => write!(f, "{}.{}", self.id, self.extension),
        }
    }
}

/// Generate a fresh storage key from the operating system's random source.
///
/// Fails with `EntropyUnavailable` if the OS cannot supply randomness; there is
/// no fallback to a weaker generator.
pub fn generate_storage_key(namespace: KeyNamespace, extension: &str) -> StorageResult<StorageKey> {
    generate_storage_key_with(&mut OsRng, namespace, extension)
}

/// Same as [`generate_storage_key`] with an explicit random source.
pub fn generate_storage_key_with<R: TryRngCore + ?Sized>(
    rng: &mut R,
    namespace: KeyNamespace,
    extension: &str,
) -> StorageResult<StorageKey> {
    let mut bytes = [0u8; RANDOM_ID_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| StorageError::EntropyUnavailable(e.to_string()))?;

    Ok(StorageKey {
        namespace,
        id: URL_SAFE_NO_PAD.encode(bytes),
        extension: extension.to_string(),
    })
}
