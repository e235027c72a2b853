use crate::command::ExitCode;
use std::path::PathBuf;

/// Errors reported for a single line of input.
///
/// None of these end the interactive loop: the REPL prints the message and reads
/// the next line.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("{command}: exited with status {code}")]
    ExecutionError { command: String, code: ExitCode },

    #[error("{}: No such file or directory", .0.display())]
    FileNotFound(PathBuf),

    #[error("{}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{command}: failed to start: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command}: failed to wait for process: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error(transparent)]
    Builtin(#[from] anyhow::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Status a non-interactive caller should exit with, following shell conventions.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ShellError::CommandNotFound(_) => 127,
            ShellError::ExecutionError { code, .. } => *code,
            ShellError::Syntax(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T, E = ShellError> = std::result::Result<T, E>;
