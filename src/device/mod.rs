//! Attached device operations
//!
//! - [`Adb`]: thin device bridge wrappers
//! - [`ReadinessPoller`]: waits for mount points to become usable
//! - [`Device`]: directory checks and cached pushes on top of both

mod adb;
#[cfg(test)]
pub(crate) mod fake;
mod poll;

pub use adb::Adb;
pub use poll::{PollState, ReadinessPoller, MIN_POLL_INTERVAL};

use crate::cache::{CacheKind, DeviceFileStore, PushCache};
use crate::command::CommandExecutor;
use crate::config::Config;
use crate::error::{KilnError, KilnResult};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Render a device directory as the `ls` argument used for checks: the path
/// with exactly one trailing slash.
pub fn directory_argument(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}

/// An attached device
pub struct Device {
    adb: Adb,
    poller: ReadinessPoller,
    mount_points: Vec<String>,
    push_cache: PushCache,
}

impl Device {
    /// Create a device handle with its push cache from configuration
    pub fn from_config(config: &Config, executor: Arc<dyn CommandExecutor>) -> Self {
        let adb = Adb::new(executor, &config.tools.adb);
        let poller = ReadinessPoller::new(
            adb.clone(),
            Duration::from_secs(config.device.mount_timeout_secs),
            Duration::from_millis(config.device.poll_interval_ms),
        );
        let push_cache = PushCache::new(
            CacheKind::Pushed,
            DeviceFileStore::new(adb.clone(), &config.cache.device_dir),
        )
        .with_enabled(config.cache.enabled);

        Self {
            adb,
            poller,
            mount_points: config
                .device
                .mount_points
                .iter()
                .map(|p| directory_argument(p))
                .collect(),
            push_cache,
        }
    }

    /// Device bridge used by this device
    pub fn adb(&self) -> &Adb {
        &self.adb
    }

    /// Cache of pushed files
    pub fn push_cache(&self) -> &PushCache {
        &self.push_cache
    }

    /// Whether `path` is a configured mount point
    pub fn is_mount_point(&self, path: &Path) -> bool {
        let argument = directory_argument(&path.to_string_lossy());
        self.mount_points.contains(&argument)
    }

    /// Make sure a device directory exists.
    ///
    /// Mount points are waited on until they list non-empty output. Other
    /// directories are checked once; the caller is expected to have created
    /// them, so a missing directory is an error, not a transient state.
    pub async fn ensure_directory(&self, path: &Path) -> KilnResult<()> {
        let argument = directory_argument(&path.to_string_lossy());
        if self.mount_points.contains(&argument) {
            return self.poller.wait_for_non_empty_directory(&argument).await;
        }

        let output = self.adb.ls(&argument, None).await?;
        // TODO: rely on the shell exit status once the bridge reports it on all supported devices
        let missing = format!("{}: No such file or directory", argument);
        if output.first_line() == Some(missing.as_str()) {
            return Err(KilnError::MissingDirectory(argument));
        }

        debug!("Device directory exists: {}", argument);
        Ok(())
    }

    /// Wait for a mount point, optionally overriding the configured timeout
    pub async fn wait_for_mount(&self, path: &Path, timeout: Option<Duration>) -> KilnResult<()> {
        let argument = directory_argument(&path.to_string_lossy());
        match timeout {
            Some(timeout) => {
                self.poller
                    .clone()
                    .with_timeout(timeout)
                    .wait_for_non_empty_directory(&argument)
                    .await
            }
            None => self.poller.wait_for_non_empty_directory(&argument).await,
        }
    }

    /// Push a host file to the device, skipping the transfer when the same
    /// content was pushed before. Directories are always pushed.
    pub async fn push(&self, local: &Path, remote: &Path) -> KilnResult<()> {
        if let Some(parent) = remote.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.adb.mkdirs(parent).await?;
        }

        if !local.is_file() {
            return self.adb.push(local, remote).await;
        }

        let key = self.push_cache.make_key(&[local]);
        if self.push_cache.get_from_cache(remote, key.as_ref()).await.is_hit() {
            debug!("Device cache hit for {}", local.display());
            return Ok(());
        }

        self.adb.push(local, remote).await?;
        self.push_cache.insert(key.as_ref(), remote).await;
        Ok(())
    }
}
