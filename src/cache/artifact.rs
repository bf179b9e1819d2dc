//! Content-addressed artifact cache
//!
//! Skips expensive deterministic operations (dexing a classpath, pushing a
//! file to the device) when their output for the same inputs is already in
//! a backing store. Caching is best-effort: an uncacheable input or a store
//! failure degrades to a miss, never to an error.

use crate::cache::fingerprint::{fingerprint, CacheKind, Fingerprint};
use crate::cache::store::BackingStore;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Outcome of a cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    /// The artifact was materialized at the destination
    Hit,
    /// The caller must produce the artifact and insert it
    Miss,
}

impl CacheLookup {
    /// Whether the lookup was a hit
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit)
    }
}

impl fmt::Display for CacheLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit => write!(f, "hit"),
            Self::Miss => write!(f, "miss"),
        }
    }
}

/// Cache mapping input fingerprints to stored artifacts
pub struct ContentAddressedCache<S> {
    kind: CacheKind,
    store: S,
    enabled: bool,
}

impl<S: BackingStore> ContentAddressedCache<S> {
    /// Create an enabled cache for the namespace over `store`
    pub fn new(kind: CacheKind, store: S) -> Self {
        Self {
            kind,
            store,
            enabled: true,
        }
    }

    /// Enable or disable the cache; a disabled cache never produces keys
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Namespace of this cache
    pub fn kind(&self) -> CacheKind {
        self.kind
    }

    /// Backing store of this cache
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fingerprint the inputs, or `None` if they cannot be cached
    pub fn make_key<P: AsRef<Path>>(&self, inputs: &[P]) -> Option<Fingerprint> {
        if !self.enabled {
            return None;
        }
        fingerprint(self.kind, inputs)
    }

    /// Materialize the artifact for `key` at `destination` if it is cached.
    ///
    /// A `None` key is always a miss. On a miss `destination` is untouched.
    pub async fn get_from_cache(
        &self,
        destination: &Path,
        key: Option<&Fingerprint>,
    ) -> CacheLookup {
        let Some(key) = key else {
            return CacheLookup::Miss;
        };

        match self.store.has(key).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("{} cache miss: {}", self.kind, key);
                return CacheLookup::Miss;
            }
            Err(e) => {
                warn!(
                    "Checking {} cache ({}) failed, treating as miss: {}",
                    self.kind,
                    self.store.store_name(),
                    e
                );
                return CacheLookup::Miss;
            }
        }

        match self.store.fetch(key, destination).await {
            Ok(()) => {
                debug!(
                    "{} cache hit: {} -> {}",
                    self.kind,
                    key,
                    destination.display()
                );
                CacheLookup::Hit
            }
            Err(e) => {
                warn!(
                    "Fetching {} from {} cache failed, treating as miss: {}",
                    key, self.kind, e
                );
                CacheLookup::Miss
            }
        }
    }

    /// Store `source` under `key`. A `None` key is a no-op and store
    /// failures are only logged.
    pub async fn insert(&self, key: Option<&Fingerprint>, source: &Path) {
        let Some(key) = key else {
            return;
        };

        match self.store.store(key, source).await {
            Ok(()) => debug!("{} cache insert: {}", self.kind, key),
            Err(e) => warn!(
                "Storing {} in {} cache ({}) failed: {}",
                source.display(),
                self.kind,
                self.store.store_name(),
                e
            ),
        }
    }
}
