//! Command executor abstraction
//!
//! One contract covers both output-capturing and fire-and-forget
//! invocations; [`Capture`] selects between them.

use crate::error::KilnResult;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// What to do with a command's stdout and stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capture {
    /// Collect stdout and stderr as lines, in arrival order
    #[default]
    Lines,
    /// Let output go straight to the terminal; no lines are returned
    Inherit,
}

/// A single external program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
    /// Return output instead of failing when the exit status is non-zero
    pub permit_non_zero_exit: bool,
    /// Kill the process and fail if it runs longer than this
    pub timeout: Option<Duration>,
    /// Output handling
    pub capture: Capture,
}

impl CommandSpec {
    /// Create a spec for `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            permit_non_zero_exit: false,
            timeout: None,
            capture: Capture::Lines,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Tolerate a non-zero exit status
    pub fn permit_non_zero_exit(mut self, permit: bool) -> Self {
        self.permit_non_zero_exit = permit;
        self
    }

    /// Enforce a timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Pass output through to the terminal instead of capturing it
    pub fn inherit_output(mut self) -> Self {
        self.capture = Capture::Inherit;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Output lines (empty for [`Capture::Inherit`])
    pub lines: Vec<String>,
    /// Exit code, -1 when the process was terminated by a signal
    pub code: i32,
}

impl CommandOutput {
    /// Output with a zero exit code
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            code: 0,
        }
    }

    /// Whether the command exited with status zero
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// First output line, if any
    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }
}

/// Runs external programs
///
/// Implementations fail with `CommandFailed` when the program cannot be
/// launched, `CommandTimeout` when a timeout was set and exceeded, and
/// `CommandExit` on a non-zero exit unless the `CommandSpec` permits it.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion
    async fn execute(&self, spec: &CommandSpec) -> KilnResult<CommandOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn builder_collects_arguments() {
        let spec = CommandSpec::new("adb")
            .args(["shell", "ls"])
            .path_arg(&PathBuf::from("/sdcard/"))
            .permit_non_zero_exit(true)
            .timeout(Duration::from_secs(5));

        assert_eq!(spec.program, "adb");
        assert_eq!(spec.args, vec!["shell", "ls", "/sdcard/"]);
        assert!(spec.permit_non_zero_exit);
        assert_eq!(spec.timeout, Some(Duration::from_secs(5)));
        assert_eq!(spec.capture, Capture::Lines);
    }

    #[test]
    fn display_joins_program_and_args() {
        let spec = CommandSpec::new("adb").args(["push", "a.jar", "/data/local/tmp/a.jar"]);
        assert_eq!(spec.to_string(), "adb push a.jar /data/local/tmp/a.jar");
    }

    #[test]
    fn inherit_output_switches_capture() {
        let spec = CommandSpec::new("dx").inherit_output();
        assert_eq!(spec.capture, Capture::Inherit);
    }

    #[test]
    fn output_helpers() {
        let output = CommandOutput::from_lines(["first", "second"]);
        assert!(output.success());
        assert_eq!(output.first_line(), Some("first"));
        assert_eq!(CommandOutput::default().first_line(), None);
    }
}
