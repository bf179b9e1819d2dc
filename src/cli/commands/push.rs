//! Push command - copy a host file to the device

use crate::cli::args::PushArgs;
use crate::command::ProcessExecutor;
use crate::config::Config;
use crate::device::Device;
use crate::error::{KilnError, KilnResult};
use console::style;
use std::sync::Arc;

/// Execute the push command
pub async fn execute(args: PushArgs, config: &Config) -> KilnResult<()> {
    if !args.local.exists() {
        return Err(KilnError::PathNotFound(args.local));
    }

    let device = Device::from_config(config, Arc::new(ProcessExecutor::new()));
    device.push(&args.local, &args.remote).await?;

    println!(
        "{} {} -> {}",
        style("✓").green(),
        args.local.display(),
        style(args.remote.display()).bold()
    );
    Ok(())
}
