//! Subprocess-backed command executor

use crate::command::error_output_tail;
use crate::command::executor::{Capture, CommandExecutor, CommandOutput, CommandSpec};
use crate::error::{KilnError, KilnResult};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, trace};

/// Executor that spawns real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    /// Create a new process executor
    pub fn new() -> Self {
        Self
    }
}

/// Decode one raw output line, dropping the line terminator.
///
/// Device listings can contain file names that are not valid UTF-8; those
/// bytes become replacement characters instead of failing the read.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Read stdout+stderr of a child process until both are closed.
///
/// Lines are returned in the order they arrived. Both pipes are drained to
/// EOF so the child never blocks on a full pipe.
async fn collect_output(child: &mut Child) -> Vec<String> {
    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Vec::new();
    };

    let mut stdout_reader = BufReader::new(stdout);
    let mut stderr_reader = BufReader::new(stderr);
    // Partial reads stay in these buffers when the other branch wins
    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();

    let mut all_output = Vec::new();
    let mut stdout_done = false;
    let mut stderr_done = false;

    while !stdout_done || !stderr_done {
        tokio::select! {
            read = stdout_reader.read_until(b'\n', &mut stdout_buf), if !stdout_done => {
                match read {
                    Ok(0) => {
                        if !stdout_buf.is_empty() {
                            all_output.push(decode_line(&stdout_buf));
                        }
                        stdout_done = true;
                    }
                    Ok(_) => {
                        let line = decode_line(&stdout_buf);
                        stdout_buf.clear();
                        trace!("stdout: {}", line);
                        all_output.push(line);
                    }
                    Err(e) => {
                        debug!("Reading stdout failed: {}", e);
                        stdout_done = true;
                    }
                }
            }
            read = stderr_reader.read_until(b'\n', &mut stderr_buf), if !stderr_done => {
                match read {
                    Ok(0) => {
                        if !stderr_buf.is_empty() {
                            all_output.push(decode_line(&stderr_buf));
                        }
                        stderr_done = true;
                    }
                    Ok(_) => {
                        let line = decode_line(&stderr_buf);
                        stderr_buf.clear();
                        trace!("stderr: {}", line);
                        all_output.push(line);
                    }
                    Err(e) => {
                        debug!("Reading stderr failed: {}", e);
                        stderr_done = true;
                    }
                }
            }
        }
    }

    all_output
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, spec: &CommandSpec) -> KilnResult<CommandOutput> {
        debug!("Executing: {}", spec);

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).stdin(Stdio::null()).kill_on_drop(true);
        match spec.capture {
            Capture::Lines => cmd.stdout(Stdio::piped()).stderr(Stdio::piped()),
            Capture::Inherit => cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit()),
        };

        let mut child = cmd
            .spawn()
            .map_err(|e| KilnError::command_failed(spec.to_string(), e))?;

        let run = async {
            let lines = match spec.capture {
                Capture::Lines => collect_output(&mut child).await,
                Capture::Inherit => Vec::new(),
            };
            let status = child
                .wait()
                .await
                .map_err(|e| KilnError::command_failed(spec.to_string(), e))?;
            Ok::<_, KilnError>((lines, status))
        };

        let (lines, status) = match spec.timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(result) => result?,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(KilnError::CommandTimeout {
                        command: spec.to_string(),
                        timeout: limit,
                    });
                }
            },
            None => run.await?,
        };

        let code = status.code().unwrap_or(-1);
        if code != 0 && !spec.permit_non_zero_exit {
            return Err(KilnError::CommandExit {
                command: spec.to_string(),
                code,
                output: error_output_tail(&lines),
            });
        }

        Ok(CommandOutput { lines, code })
    }
}
