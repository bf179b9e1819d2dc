//! Content fingerprinting for cache keys
//!
//! Hashes the contents of an ordered list of input files into a single
//! key. Same inputs in the same order = same key; the order is significant,
//! so a reordered classpath is a different key.

use crate::error::{KilnError, KilnResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Cache namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    /// Dexed classpaths, stored on the host
    Dex,
    /// Files pushed to the device, stored on the device
    Pushed,
}

impl CacheKind {
    /// Namespace prefix used in keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dex => "dex",
            Self::Pushed => "pushed",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deterministic digest of a set of build inputs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Parse a stored key, accepting only `<dex|pushed>-<64 lowercase hex>`
    pub fn parse(key: &str) -> Option<Self> {
        let (kind, digest) = key.split_once('-')?;
        if kind != CacheKind::Dex.as_str() && kind != CacheKind::Pushed.as_str() {
            return None;
        }
        let is_digest = digest.len() == 64
            && digest
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        is_digest.then(|| Self(key.to_string()))
    }

    /// The key as stored in a backing store
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read a single input, rejecting anything that is not a regular file
fn read_input(path: &Path) -> KilnResult<Vec<u8>> {
    let metadata = fs::metadata(path).map_err(|e| KilnError::Io {
        context: format!("reading metadata of {}", path.display()),
        source: e,
    })?;
    if !metadata.is_file() {
        return Err(KilnError::PathNotFound(path.to_path_buf()));
    }

    fs::read(path).map_err(|e| KilnError::Io {
        context: format!("reading cache input {}", path.display()),
        source: e,
    })
}

/// SHA256 of a file's contents as lowercase hex
pub fn hash_file_contents(path: &Path) -> KilnResult<String> {
    let contents = read_input(path)?;
    Ok(hex::encode(Sha256::digest(&contents)))
}

/// Fingerprint an ordered list of inputs under a namespace.
///
/// Returns `None` when the list is empty or any input is missing, unreadable
/// or not a regular file. Callers treat `None` as "do not cache".
pub fn fingerprint<P: AsRef<Path>>(kind: CacheKind, inputs: &[P]) -> Option<Fingerprint> {
    if inputs.is_empty() {
        return None;
    }

    let mut hasher = Sha256::new();
    for input in inputs {
        let path = input.as_ref();
        let contents = match read_input(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("Not fingerprinting {}: {}", path.display(), e);
                return None;
            }
        };

        // Length prefix keeps input boundaries unambiguous
        hasher.update((contents.len() as u64).to_le_bytes());
        hasher.update(Sha256::digest(&contents));
    }

    Some(Fingerprint(format!(
        "{}-{}",
        kind,
        hex::encode(hasher.finalize())
    )))
}
