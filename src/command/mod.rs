//! External command execution
//!
//! Every SDK tool (dexer, package tool, device bridge) is driven as a
//! subprocess through the [`CommandExecutor`] trait:
//! - [`ProcessExecutor`]: spawns real processes with tokio
//! - scripted executors in tests stand in for tools that are not installed

mod executor;
#[cfg(test)]
pub(crate) mod fake;
mod process;

pub use executor::{Capture, CommandExecutor, CommandOutput, CommandSpec};
pub use process::ProcessExecutor;

/// Max number of output lines to include in command error messages.
const ERROR_TAIL_LINES: usize = 50;

/// Extract the useful tail of command output for error diagnostics.
pub(crate) fn error_output_tail(lines: &[String]) -> String {
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].join("\n")
}
