//! Kiln - Android SDK test-harness helper
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use kiln::cli::args::{ConfigAction, ConfigArgs};
use kiln::cli::{commands, Cli, Commands};
use kiln::config::ConfigManager;
use kiln::error::KilnResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> KilnResult<()> {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("kiln=warn"),
        1 => EnvFilter::new("kiln=info"),
        _ => EnvFilter::new("kiln=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    debug!("Config path: {}", config_manager.path().display());

    // Init writes a fresh file, so it must not require the current one to parse
    if let Commands::Config(ConfigArgs {
        action: Some(ConfigAction::Init { force }),
    }) = cli.command
    {
        return commands::config_init(&config_manager, force).await;
    }

    let config = config_manager.load().await?;

    match cli.command {
        Commands::Dex(args) => commands::dex(args, &config).await,
        Commands::Push(args) => commands::push(args, &config).await,
        Commands::EnsureDir(args) => commands::ensure_dir(args, &config).await,
        Commands::WaitMount(args) => commands::wait_mount(args, &config).await,
        Commands::Cache(args) => commands::cache(args, &config).await,
        Commands::Config(args) => commands::config(args, &config, &config_manager).await,
    }
}
