//! Execution of command lines that are not built-ins.
//!
//! A line is run in exactly one of four modes, chosen by [`Mode::select`]:
//! a pipeline, a single command with file redirection, a background command,
//! or a plain foreground command.

mod background;
mod pipeline;
mod redirect;
pub mod registry;
mod simple;

use crate::command::{ExitCode, Streams};
use crate::env::Environment;
use crate::error::{Result, ShellError};
use registry::{FinishedChild, JobId, ProcessRegistry};
use tracing::debug;

pub use redirect::RedirectionSpec;

/// How a command line is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Pipeline,
    Redirection,
    Background,
    Simple,
}

impl Mode {
    /// Pick the execution mode for `command`.
    ///
    /// The first matching rule wins: a `|` anywhere, then `<` or `>` anywhere, then a
    /// trailing `&`. Lines that would match more than one of these are rejected.
    pub fn select(command: &str) -> Result<Mode> {
        let piped = command.contains('|');
        let redirected = command.contains(['<', '>']);
        let background = command.trim_end().ends_with('&');

        if piped {
            if redirected {
                return Err(syntax("redirection cannot be combined with a pipeline"));
            }
            if background {
                return Err(syntax("background pipelines are not supported"));
            }
            Ok(Mode::Pipeline)
        } else if redirected {
            if background {
                return Err(syntax("background redirection is not supported"));
            }
            Ok(Mode::Redirection)
        } else if background {
            Ok(Mode::Background)
        } else {
            Ok(Mode::Simple)
        }
    }
}

fn syntax(message: &str) -> ShellError {
    ShellError::Syntax(message.to_string())
}

/// Result of running one command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    /// The foreground command (or the last stage of a pipeline) exited with this code.
    Completed(ExitCode),
    /// The command was started in the background and is not waited on.
    Background { job: JobId, pid: u32 },
}

/// Runs external command lines and keeps track of the children it does not wait for.
#[derive(Debug, Default)]
pub struct Engine {
    registry: ProcessRegistry,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `command` in the context `env`, attached to `streams`.
    ///
    /// Blocks until the command finishes, except in background mode. Pipelines are
    /// finished once their last stage is.
    pub fn execute(
        &mut self,
        command: &str,
        env: &Environment,
        streams: Streams,
    ) -> Result<ExecutionResult> {
        let mode = Mode::select(command)?;
        debug!(?mode, command = %command.trim(), "executing");
        match mode {
            Mode::Pipeline => pipeline::run(command, env, streams, &mut self.registry),
            Mode::Redirection => redirect::run(command, env, streams),
            Mode::Background => background::run(command, env, streams, &mut self.registry),
            Mode::Simple => simple::run(command, env, streams),
        }
    }

    /// Collect background jobs and pipeline stages that have exited since the last call.
    pub fn reap(&mut self) -> Vec<FinishedChild> {
        self.registry.reap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection_order() {
        assert_eq!(Mode::select("ls | wc -l").unwrap(), Mode::Pipeline);
        assert_eq!(Mode::select("sort < in.txt").unwrap(), Mode::Redirection);
        assert_eq!(Mode::select("ls > out.txt").unwrap(), Mode::Redirection);
        assert_eq!(Mode::select("ls >> out.txt").unwrap(), Mode::Redirection);
        assert_eq!(Mode::select("sleep 5 &").unwrap(), Mode::Background);
        assert_eq!(Mode::select("sleep 5&   ").unwrap(), Mode::Background);
        assert_eq!(Mode::select("ls -l").unwrap(), Mode::Simple);
    }

    #[test]
    fn test_ampersand_must_be_trailing() {
        assert_eq!(Mode::select("echo a&b").unwrap(), Mode::Simple);
    }

    #[test]
    fn test_composite_syntax_is_rejected() {
        for line in ["ls | wc > out.txt", "cat < in | wc", "ls | wc &", "ls > out &"] {
            assert!(
                matches!(Mode::select(line), Err(ShellError::Syntax(_))),
                "expected syntax error for {line:?}"
            );
        }
    }
}
