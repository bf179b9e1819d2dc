//! Content-addressed artifact caching
//!
//! Expensive deterministic operations are keyed by a SHA256 fingerprint of
//! their inputs and their outputs kept in a backing store.
//!
//! # Cache Instances
//!
//! | Kind | Store | Caches |
//! |------|-------|--------|
//! | `dex` | host directory | dexed classpaths |
//! | `pushed` | device directory | files pushed to the device |
//!
//! # Failure Model
//!
//! Caching is fail-open: inputs that cannot be fingerprinted skip the cache,
//! and store errors are logged and treated as misses.

pub mod artifact;
pub mod device;
pub mod fingerprint;
pub mod host;
pub mod store;

pub use artifact::{CacheLookup, ContentAddressedCache};
pub use device::DeviceFileStore;
pub use fingerprint::{fingerprint, hash_file_contents, CacheKind, Fingerprint};
pub use host::{format_bytes, HostCacheEntry, HostFileStore};
pub use store::BackingStore;

/// Cache of dexed classpaths on the host
pub type DexCache = ContentAddressedCache<HostFileStore>;

/// Cache of files already pushed to the device
pub type PushCache = ContentAddressedCache<DeviceFileStore>;
