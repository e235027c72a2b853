use super::ExecutionResult;
use super::registry::ProcessRegistry;
use crate::command::Streams;
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::external::{command_for, exit_code, spawn_error};
use crate::tokenize::tokenize;
use std::mem;
use std::process::{Child, Stdio};
use tracing::{debug, warn};

/// Split a pipeline into the argument vectors of its stages.
pub(crate) fn parse_stages(command: &str) -> Result<Vec<Vec<String>>> {
    command
        .split('|')
        .map(|segment| {
            let argv = tokenize(segment)?;
            if argv.is_empty() {
                return Err(ShellError::Syntax("empty command in pipeline".to_string()));
            }
            Ok(argv)
        })
        .collect()
}

/// Run every stage of a pipeline, stage `i` reading what stage `i - 1` writes.
///
/// Only the last stage is waited on; earlier stages are handed to `registry`.
/// If a stage fails to start, the stages already running are left to finish on
/// their own and the error is returned.
pub(super) fn run(
    command: &str,
    env: &Environment,
    streams: Streams,
    registry: &mut ProcessRegistry,
) -> Result<ExecutionResult> {
    let stages = parse_stages(command)?;
    let last = stages.len() - 1;

    let mut next_stdin = streams.stdin.stdio();
    let mut final_stdout = Some(streams.stdout.stdio());
    let mut running: Vec<(String, Child)> = Vec::with_capacity(stages.len());

    for (i, argv) in stages.iter().enumerate() {
        let stdin = mem::replace(&mut next_stdin, Stdio::null());
        let stdout = if i == last {
            final_stdout.take().unwrap_or_else(Stdio::inherit)
        } else {
            Stdio::piped()
        };

        let spawned = command_for(argv, env).and_then(|mut cmd| {
            cmd.stdin(stdin)
                .stdout(stdout)
                .spawn()
                .map_err(|e| spawn_error(&argv[0], e))
        });
        let mut child = match spawned {
            Ok(child) => child,
            Err(err) => {
                warn!(stage = i, started = running.len(), error = %err, "pipeline aborted");
                for (text, child) in running {
                    registry.track_stage(child, text);
                }
                return Err(err);
            }
        };

        debug!(stage = i, pid = child.id(), "spawned pipeline stage");
        if let Some(out) = child.stdout.take() {
            next_stdin = Stdio::from(out);
        }
        running.push((argv.join(" "), child));
    }

    let (text, mut child) = running
        .pop()
        .ok_or_else(|| ShellError::Syntax("empty pipeline".to_string()))?;
    let status = child
        .wait()
        .map_err(|source| ShellError::Wait { command: text, source })?;
    for (text, child) in running {
        registry.track_stage(child, text);
    }
    Ok(ExecutionResult::Completed(exit_code(status)))
}
