//! Scripted executor for tests

use crate::command::error_output_tail;
use crate::command::executor::{CommandExecutor, CommandOutput, CommandSpec};
use crate::error::{KilnError, KilnResult};
use async_trait::async_trait;
use std::sync::Mutex;

type Handler = Box<dyn Fn(&CommandSpec) -> KilnResult<CommandOutput> + Send + Sync>;

/// Executor that answers every command with a handler and records the specs.
///
/// Non-zero exit codes are rejected unless the `CommandSpec` permits them, like
/// [`ProcessExecutor`](crate::command::ProcessExecutor) does.
pub(crate) struct ScriptedExecutor {
    handler: Handler,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedExecutor {
    pub(crate) fn new(
        handler: impl Fn(&CommandSpec) -> KilnResult<CommandOutput> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every command succeeds with no output
    pub(crate) fn silent() -> Self {
        Self::new(|_| Ok(CommandOutput::default()))
    }

    pub(crate) fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Commands rendered as strings, for compact assertions
    pub(crate) fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(&self, spec: &CommandSpec) -> KilnResult<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());
        let output = (self.handler)(spec)?;
        if output.code != 0 && !spec.permit_non_zero_exit {
            return Err(KilnError::CommandExit {
                command: spec.to_string(),
                code: output.code,
                output: error_output_tail(&output.lines),
            });
        }
        Ok(output)
    }
}
