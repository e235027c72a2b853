use super::ExecutionResult;
use super::registry::ProcessRegistry;
use crate::command::Streams;
use crate::env::Environment;
use crate::error::Result;
use crate::external::{command_for, spawn_error};
use crate::tokenize::tokenize;
use std::process::Stdio;
use tracing::debug;

/// Start `command` (with its trailing `&`) and return without waiting.
///
/// The child reads from `/dev/null` so it never competes with the prompt for input.
/// It keeps writing to the interpreter's output. Its exit status is only collected
/// through the registry.
pub(super) fn run(
    command: &str,
    env: &Environment,
    streams: Streams,
    registry: &mut ProcessRegistry,
) -> Result<ExecutionResult> {
    let trimmed = command.trim_end();
    let command = trimmed.strip_suffix('&').unwrap_or(trimmed).trim();
    let argv = tokenize(command)?;

    let child = command_for(&argv, env)?
        .stdin(Stdio::null())
        .stdout(streams.stdout.stdio())
        .spawn()
        .map_err(|e| spawn_error(&argv[0], e))?;
    let pid = child.id();
    let job = registry.track_background(child, command);
    debug!(job, pid, "started background job");
    Ok(ExecutionResult::Background { job, pid })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::engine::test_support::{captured, env_in, read_back};
    use crate::error::ShellError;
    use std::time::{Duration, Instant};

    #[test]
    fn test_returns_without_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let (streams, _) = captured();
        let mut registry = ProcessRegistry::new();

        let started = Instant::now();
        let result = run("sleep 5 &", &env_in(dir.path()), streams, &mut registry).unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(matches!(result, ExecutionResult::Background { job: 1, .. }));
        assert_eq!(
            registry.background_jobs().map(|(_, _, cmd)| cmd).collect::<Vec<_>>(),
            vec!["sleep 5"]
        );
    }

    #[test]
    fn test_finished_job_is_reaped_with_status() {
        let dir = tempfile::tempdir().unwrap();
        let (streams, out) = captured();
        let mut registry = ProcessRegistry::new();

        run("sh -c 'echo done; exit 2' &", &env_in(dir.path()), streams, &mut registry).unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut finished = Vec::new();
        while finished.is_empty() && Instant::now() < deadline {
            finished = registry.reap();
            std::thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].code, Some(2));
        assert_eq!(read_back(out), "done\n");
    }

    #[test]
    fn test_lone_ampersand_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (streams, _) = captured();
        let mut registry = ProcessRegistry::new();

        let err = run("  &", &env_in(dir.path()), streams, &mut registry).unwrap_err();

        assert!(matches!(err, ShellError::Syntax(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_command_is_not_tracked() {
        let dir = tempfile::tempdir().unwrap();
        let (streams, _) = captured();
        let mut registry = ProcessRegistry::new();

        let err = run("definitely_not_a_real_cmd &", &env_in(dir.path()), streams, &mut registry)
            .unwrap_err();

        assert!(matches!(err, ShellError::CommandNotFound(_)));
        assert!(registry.is_empty());
    }
}
