use super::ExecutionResult;
use crate::command::Streams;
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::external::{command_for, exit_code, spawn_error};
use crate::tokenize::tokenize;

/// Run a single foreground command and wait for it.
///
/// A non-zero exit is reported as [`ShellError::ExecutionError`].
pub(super) fn run(command: &str, env: &Environment, streams: Streams) -> Result<ExecutionResult> {
    let argv = tokenize(command)?;
    if argv.is_empty() {
        return Ok(ExecutionResult::Completed(0));
    }

    let mut child = command_for(&argv, env)?
        .stdin(streams.stdin.stdio())
        .stdout(streams.stdout.stdio())
        .spawn()
        .map_err(|e| spawn_error(&argv[0], e))?;
    let status = child.wait().map_err(|source| ShellError::Wait {
        command: argv[0].clone(),
        source,
    })?;

    match exit_code(status) {
        0 => Ok(ExecutionResult::Completed(0)),
        code => Err(ShellError::ExecutionError {
            command: command.trim().to_string(),
            code,
        }),
    }
}
