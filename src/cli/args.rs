//! CLI argument definitions using clap derive

use crate::cache::CacheKind;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Kiln - Android SDK test-harness helper
///
/// Runs the dexer and device bridge with content-addressed caching of
/// dexed classpaths and pushed files.
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "KILN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dex a classpath, reusing a cached result when inputs are unchanged
    Dex(DexArgs),

    /// Push a file to the device, skipping content it already has
    Push(PushArgs),

    /// Check that a device directory exists (waits on mount points)
    EnsureDir(EnsureDirArgs),

    /// Wait for a device mount point to become non-empty
    WaitMount(WaitMountArgs),

    /// Inspect and manage the artifact cache
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the dex command
#[derive(Parser, Debug)]
pub struct DexArgs {
    /// Dex file to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Classpath elements, in order
    #[arg(required = true)]
    pub classpath: Vec<PathBuf>,
}

/// Arguments for the push command
#[derive(Parser, Debug)]
pub struct PushArgs {
    /// Host file or directory
    pub local: PathBuf,

    /// Destination path on the device
    pub remote: PathBuf,
}

/// Arguments for the ensure-dir command
#[derive(Parser, Debug)]
pub struct EnsureDirArgs {
    /// Device directory
    pub path: PathBuf,
}

/// Arguments for the wait-mount command
#[derive(Parser, Debug)]
pub struct WaitMountArgs {
    /// Device mount point
    pub path: PathBuf,

    /// Seconds to wait (default: from config)
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache namespace selector
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// Dexed classpaths
    Dex,
    /// Pushed files
    Pushed,
}

impl From<KindArg> for CacheKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Dex => CacheKind::Dex,
            KindArg::Pushed => CacheKind::Pushed,
        }
    }
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Print the cache key for a list of inputs
    Key {
        /// Input files, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Cache namespace
        #[arg(short, long, default_value = "dex")]
        kind: KindArg,

        /// Output format
        #[arg(short, long, default_value = "plain")]
        format: OutputFormat,
    },

    /// List host cache entries
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove all host cache entries
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
