//! Backing store abstraction
//!
//! A backing store holds cached artifacts under their fingerprint:
//! - [`HostFileStore`](super::HostFileStore): a directory on the host
//! - [`DeviceFileStore`](super::DeviceFileStore): a directory on the device

use crate::cache::fingerprint::Fingerprint;
use crate::error::KilnResult;
use async_trait::async_trait;
use std::path::Path;

/// Storage medium for cached artifacts
///
/// Writing a key that already exists overwrites it. Entries for the same
/// key always hold identical content, so a lost race is harmless.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Whether an entry exists for the key
    async fn has(&self, key: &Fingerprint) -> KilnResult<bool>;

    /// Materialize the entry for the key at `destination`
    async fn fetch(&self, key: &Fingerprint, destination: &Path) -> KilnResult<()>;

    /// Store `source` under the key
    async fn store(&self, key: &Fingerprint, source: &Path) -> KilnResult<()>;

    /// Get the human-readable store name for logs
    fn store_name(&self) -> &'static str;
}
