//! Host directory backing store

use crate::cache::fingerprint::Fingerprint;
use crate::cache::store::BackingStore;
use crate::error::{KilnError, KilnResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Format bytes as human-readable size (e.g., "1.5 MB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// An artifact stored in a host cache directory
#[derive(Debug, Clone, Serialize)]
pub struct HostCacheEntry {
    /// Fingerprint the entry is stored under
    pub key: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// Last modification time
    pub modified_at: DateTime<Utc>,
}

/// Cache entries stored as files named by their fingerprint
#[derive(Debug, Clone)]
pub struct HostFileStore {
    root: PathBuf,
}

impl HostFileStore {
    /// Create a store rooted at `root` (created lazily on first insert)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &Fingerprint) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// List stored entries, newest first.
    ///
    /// Only files named by a fingerprint count; in-flight temp files and
    /// anything else sharing the directory are skipped.
    pub async fn entries(&self) -> KilnResult<Vec<HostCacheEntry>> {
        if !fs::try_exists(&self.root).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let mut dir = fs::read_dir(&self.root)
            .await
            .map_err(|e| KilnError::io(format!("listing {}", self.root.display()), e))?;

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| KilnError::io(format!("listing {}", self.root.display()), e))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            let Some(key) = Fingerprint::parse(&name) else {
                continue;
            };
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| KilnError::io(format!("reading metadata of {}", name), e))?;
            if !metadata.is_file() {
                continue;
            }
            let modified_at = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            entries.push(HostCacheEntry {
                key: key.to_string(),
                size_bytes: metadata.len(),
                modified_at,
            });
        }

        entries.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(entries)
    }

    /// Remove every stored entry, returning how many were removed
    pub async fn clear(&self) -> KilnResult<usize> {
        let entries = self.entries().await?;
        for entry in &entries {
            let path = self.root.join(&entry.key);
            debug!("Removing cache entry: {}", path.display());
            fs::remove_file(&path)
                .await
                .map_err(|e| KilnError::io(format!("removing {}", path.display()), e))?;
        }
        Ok(entries.len())
    }
}

#[async_trait]
impl BackingStore for HostFileStore {
    async fn has(&self, key: &Fingerprint) -> KilnResult<bool> {
        match fs::metadata(self.entry_path(key)).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(KilnError::cache_store(key.as_str(), e)),
        }
    }

    async fn fetch(&self, key: &Fingerprint, destination: &Path) -> KilnResult<()> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| KilnError::cache_store(key.as_str(), e))?;
        }

        fs::copy(self.entry_path(key), destination)
            .await
            .map_err(|e| KilnError::cache_store(key.as_str(), e))?;
        Ok(())
    }

    async fn store(&self, key: &Fingerprint, source: &Path) -> KilnResult<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| KilnError::cache_store(key.as_str(), e))?;

        // Copy next to the entry, then rename over it
        let temp = self
            .root
            .join(format!(".{}.{}.tmp", key.as_str(), Uuid::new_v4()));
        if let Err(e) = fs::copy(source, &temp).await {
            let _ = fs::remove_file(&temp).await;
            return Err(KilnError::cache_store(key.as_str(), e));
        }

        if let Err(e) = fs::rename(&temp, self.entry_path(key)).await {
            let _ = fs::remove_file(&temp).await;
            return Err(KilnError::cache_store(key.as_str(), e));
        }
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "host"
    }
}
