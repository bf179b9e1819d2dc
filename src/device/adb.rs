//! Device bridge commands
//!
//! Thin wrappers over the `adb` tool. Device paths are passed as
//! [`Path`]s but always refer to the device filesystem.

use crate::command::{CommandExecutor, CommandOutput, CommandSpec};
use crate::error::KilnResult;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Device bridge wrapper
#[derive(Clone)]
pub struct Adb {
    executor: Arc<dyn CommandExecutor>,
    program: String,
}

impl Adb {
    /// Create a device bridge that runs `program` through `executor`
    pub fn new(executor: Arc<dyn CommandExecutor>, program: impl Into<String>) -> Self {
        Self {
            executor,
            program: program.into(),
        }
    }

    fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.program)
    }

    fn shell(&self) -> CommandSpec {
        self.command().arg("shell")
    }

    /// List a device path, tolerating a non-zero exit status.
    ///
    /// A missing path is reported through the output, not as an error.
    pub async fn ls(&self, path_arg: &str, timeout: Option<Duration>) -> KilnResult<CommandOutput> {
        let mut spec = self
            .shell()
            .args(["ls", path_arg])
            .permit_non_zero_exit(true);
        if let Some(timeout) = timeout {
            spec = spec.timeout(timeout);
        }
        self.executor.execute(&spec).await
    }

    /// Create a directory and any missing parents
    pub async fn mkdirs(&self, path: &Path) -> KilnResult<()> {
        debug!("Creating device directory: {}", path.display());
        let spec = self.shell().args(["mkdir", "-p"]).path_arg(path);
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Copy a file on the device (the bridge has no `cp`)
    pub async fn cp(&self, source: &Path, destination: &Path) -> KilnResult<()> {
        let spec = self
            .shell()
            .arg("cat")
            .path_arg(source)
            .arg(">")
            .path_arg(destination);
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Move a file on the device
    pub async fn mv(&self, source: &Path, destination: &Path) -> KilnResult<()> {
        let spec = self
            .shell()
            .arg("mv")
            .path_arg(source)
            .path_arg(destination);
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Remove a path recursively.
    ///
    /// The bridge does not reliably report shell exit codes, so failures are
    /// ignored.
    pub async fn rm(&self, path: &Path) -> KilnResult<()> {
        let spec = self
            .shell()
            .args(["rm", "-r"])
            .path_arg(path)
            .permit_non_zero_exit(true);
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Copy a host file or directory to the device
    pub async fn push(&self, local: &Path, remote: &Path) -> KilnResult<()> {
        info!("Pushing {} to {}", local.display(), remote.display());
        let spec = self.command().arg("push").path_arg(local).path_arg(remote);
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Copy a device file to the host
    pub async fn pull(&self, remote: &Path, local: &Path) -> KilnResult<()> {
        let spec = self.command().arg("pull").path_arg(remote).path_arg(local);
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Install (or reinstall) an APK
    pub async fn install(&self, apk: &Path) -> KilnResult<()> {
        info!("Installing {}", apk.display());
        let spec = self.command().args(["install", "-r"]).path_arg(apk);
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Uninstall a package; a package that is not installed is not an error
    pub async fn uninstall(&self, package: &str) -> KilnResult<()> {
        let spec = self
            .command()
            .args(["uninstall", package])
            .permit_non_zero_exit(true);
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Forward a host TCP port to the same port on the device
    pub async fn forward_tcp(&self, port: u16) -> KilnResult<()> {
        let spec = self
            .command()
            .arg("forward")
            .arg(format!("tcp:{}", port))
            .arg(format!("tcp:{}", port));
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Remount the system partition read-write
    pub async fn remount(&self) -> KilnResult<()> {
        self.executor.execute(&self.command().arg("remount")).await?;
        Ok(())
    }

    /// Block until a device is attached
    pub async fn wait_for_device(&self) -> KilnResult<()> {
        info!("Waiting for device...");
        let spec = self
            .command()
            .arg("wait-for-device")
            .permit_non_zero_exit(true);
        self.executor.execute(&spec).await?;
        Ok(())
    }
}
