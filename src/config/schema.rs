//! Configuration schema for Kiln
//!
//! Configuration is stored at `~/.config/kiln/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External SDK tools
    pub tools: ToolsConfig,

    /// Artifact cache settings
    pub cache: CacheConfig,

    /// Attached device settings
    pub device: DeviceConfig,
}

/// External tool locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Dexer
    pub dx: String,

    /// Package tool
    pub aapt: String,

    /// Device bridge
    pub adb: String,

    /// Platform jar passed to the package tool
    pub android_jar: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            dx: "dx".to_string(),
            aapt: "aapt".to_string(),
            adb: "adb".to_string(),
            android_jar: PathBuf::from("prebuilts/sdk/current/android.jar"),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable artifact caching (default: true)
    pub enabled: bool,

    /// Host directory for the dex cache
    pub host_dir: PathBuf,

    /// Device directory for the push cache
    pub device_dir: PathBuf,
}

impl CacheConfig {
    /// Default host cache directory
    pub fn default_host_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("kiln")
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host_dir: Self::default_host_dir(),
            device_dir: PathBuf::from("/data/local/tmp/kiln/cache"),
        }
    }
}

/// Device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// How long to wait for a mount point to become usable
    pub mount_timeout_secs: u64,

    /// Delay between mount point checks
    pub poll_interval_ms: u64,

    /// Directories that exist before they are usable and must be non-empty
    pub mount_points: Vec<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mount_timeout_secs: 5 * 60,
            poll_interval_ms: 1000,
            mount_points: vec!["/sdcard".to_string()],
        }
    }
}
