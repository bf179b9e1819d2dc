//! Device directory backing store

use crate::cache::fingerprint::Fingerprint;
use crate::cache::store::BackingStore;
use crate::device::Adb;
use crate::error::KilnResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Cache entries stored as files in a directory on the device
pub struct DeviceFileStore {
    adb: Adb,
    root: PathBuf,
    root_created: AtomicBool,
}

impl DeviceFileStore {
    /// Create a store rooted at the device directory `root`
    pub fn new(adb: Adb, root: impl Into<PathBuf>) -> Self {
        Self {
            adb,
            root: root.into(),
            root_created: AtomicBool::new(false),
        }
    }

    /// Device directory holding the entries
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &Fingerprint) -> PathBuf {
        self.root.join(key.as_str())
    }

    async fn ensure_root(&self) -> KilnResult<()> {
        if !self.root_created.load(Ordering::Relaxed) {
            self.adb.mkdirs(&self.root).await?;
            self.root_created.store(true, Ordering::Relaxed);
        }
        Ok(())
    }
}

#[async_trait]
impl BackingStore for DeviceFileStore {
    async fn has(&self, key: &Fingerprint) -> KilnResult<bool> {
        let entry = self.entry_path(key);
        let entry = entry.to_string_lossy();
        let output = self.adb.ls(&entry, None).await?;
        // `ls` of an existing file echoes its path; anything else is an error message
        Ok(output.first_line() == Some(&*entry))
    }

    async fn fetch(&self, key: &Fingerprint, destination: &Path) -> KilnResult<()> {
        self.adb.cp(&self.entry_path(key), destination).await
    }

    async fn store(&self, key: &Fingerprint, source: &Path) -> KilnResult<()> {
        self.ensure_root().await?;
        self.adb.cp(source, &self.entry_path(key)).await
    }

    fn store_name(&self) -> &'static str {
        "device"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::fingerprint::{fingerprint, CacheKind};
    use crate::device::fake::fake_device;
    use tempfile::TempDir;

    fn key(dir: &TempDir) -> Fingerprint {
        let input = dir.path().join("lib.jar");
        std::fs::write(&input, b"jar bytes").unwrap();
        fingerprint(CacheKind::Pushed, &[&input]).unwrap()
    }

    #[tokio::test]
    async fn store_then_fetch_on_device() {
        let dir = TempDir::new().unwrap();
        let key = key(&dir);
        let (executor, files) = fake_device();
        files
            .lock()
            .unwrap()
            .insert("/data/local/tmp/lib.jar".to_string(), b"jar bytes".to_vec());

        let store = DeviceFileStore::new(Adb::new(executor.clone(), "adb"), "/data/kiln/cache");

        assert!(!store.has(&key).await.unwrap());
        store
            .store(&key, Path::new("/data/local/tmp/lib.jar"))
            .await
            .unwrap();
        assert!(store.has(&key).await.unwrap());

        store
            .fetch(&key, Path::new("/data/local/tmp/other/lib.jar"))
            .await
            .unwrap();
        assert_eq!(
            files.lock().unwrap().get("/data/local/tmp/other/lib.jar"),
            Some(&b"jar bytes".to_vec())
        );
    }

    #[tokio::test]
    async fn root_created_once() {
        let dir = TempDir::new().unwrap();
        let key = key(&dir);
        let (executor, files) = fake_device();
        files
            .lock()
            .unwrap()
            .insert("/data/a".to_string(), b"a".to_vec());

        let store = DeviceFileStore::new(Adb::new(executor.clone(), "adb"), "/data/kiln/cache");
        store.store(&key, Path::new("/data/a")).await.unwrap();
        store.store(&key, Path::new("/data/a")).await.unwrap();

        let mkdirs = executor
            .command_lines()
            .into_iter()
            .filter(|c| c.contains("mkdir"))
            .count();
        assert_eq!(mkdirs, 1);
    }

    #[tokio::test]
    async fn fetch_missing_entry_fails() {
        let dir = TempDir::new().unwrap();
        let key = key(&dir);
        let (executor, _files) = fake_device();

        let store = DeviceFileStore::new(Adb::new(executor, "adb"), "/data/kiln/cache");
        assert!(store.fetch(&key, Path::new("/data/out")).await.is_err());
    }
}
