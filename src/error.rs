//! Error types for Kiln
//!
//! All modules use `KilnResult<T>` as their return type.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for Kiln operations
pub type KilnResult<T> = Result<T, KilnError>;

/// All errors that can occur in Kiln
#[derive(Error, Debug)]
pub enum KilnError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Device errors
    #[error("Timed out after {timeout:?} waiting for {path}")]
    DeviceTimeout { path: String, timeout: Duration },

    #[error("'{0}' does not exist on device")]
    MissingDirectory(String),

    // Cache errors
    #[error("Cache store error for {key}: {reason}")]
    CacheStore { key: String, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command exited with status {code}: {command}\n{output}")]
    CommandExit {
        command: String,
        code: i32,
        output: String,
    },

    #[error("Command timed out after {timeout:?}: {command}")]
    CommandTimeout { command: String, timeout: Duration },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl KilnError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a cache store error
    pub fn cache_store(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::CacheStore {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::DeviceTimeout { .. } => {
                Some("Check that the device has finished booting: adb wait-for-device")
            }
            Self::MissingDirectory(_) => Some("Create it first with: adb shell mkdir -p <path>"),
            Self::CommandFailed { .. } => {
                Some("Check the [tools] section of your config or your PATH")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = KilnError::MissingDirectory("/data/local/tmp/".to_string());
        assert_eq!(err.to_string(), "'/data/local/tmp/' does not exist on device");
    }

    #[test]
    fn device_timeout_display() {
        let err = KilnError::DeviceTimeout {
            path: "/sdcard/".to_string(),
            timeout: Duration::from_secs(300),
        };
        assert_eq!(err.to_string(), "Timed out after 300s waiting for /sdcard/");

        let err = KilnError::CommandTimeout {
            command: "adb shell ls /sdcard/".to_string(),
            timeout: Duration::from_millis(250),
        };
        assert_eq!(
            err.to_string(),
            "Command timed out after 250ms: adb shell ls /sdcard/"
        );
    }

    #[test]
    fn error_hint() {
        let err = KilnError::MissingDirectory("/x/".to_string());
        assert!(err.hint().unwrap().contains("mkdir -p"));
        assert_eq!(KilnError::PathNotFound("a.jar".into()).hint(), None);
    }
}
