//! Dex command - convert a classpath to a dex file

use crate::cli::args::DexArgs;
use crate::command::ProcessExecutor;
use crate::config::Config;
use crate::error::KilnResult;
use crate::sdk::AndroidSdk;
use console::style;
use std::sync::Arc;

/// Execute the dex command
pub async fn execute(args: DexArgs, config: &Config) -> KilnResult<()> {
    let sdk = AndroidSdk::from_config(config, Arc::new(ProcessExecutor::new()));
    sdk.dex(&args.output, &args.classpath).await?;

    println!(
        "{} {}",
        style("✓").green(),
        style(args.output.display()).bold()
    );
    Ok(())
}
