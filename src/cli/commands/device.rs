//! Device directory commands - ensure-dir and wait-mount

use crate::cli::args::{EnsureDirArgs, WaitMountArgs};
use crate::command::ProcessExecutor;
use crate::config::Config;
use crate::device::{directory_argument, Device};
use crate::error::KilnResult;
use console::style;
use std::sync::Arc;
use std::time::Duration;

fn device(config: &Config) -> Device {
    Device::from_config(config, Arc::new(ProcessExecutor::new()))
}

/// Execute the ensure-dir command
pub async fn ensure_dir(args: EnsureDirArgs, config: &Config) -> KilnResult<()> {
    let device = device(config);
    if device.is_mount_point(&args.path) {
        println!(
            "Waiting for mount point {}...",
            style(args.path.display()).cyan()
        );
    }

    device.ensure_directory(&args.path).await?;

    println!(
        "{} {}",
        style("✓").green(),
        directory_argument(&args.path.to_string_lossy())
    );
    Ok(())
}

/// Execute the wait-mount command
pub async fn wait_mount(args: WaitMountArgs, config: &Config) -> KilnResult<()> {
    let device = device(config);
    let timeout = args.timeout.map(Duration::from_secs);

    device.wait_for_mount(&args.path, timeout).await?;

    println!(
        "{} {} is mounted",
        style("✓").green(),
        directory_argument(&args.path.to_string_lossy())
    );
    Ok(())
}
