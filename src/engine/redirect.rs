use super::ExecutionResult;
use crate::command::Streams;
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::external::{command_for, exit_code, spawn_error};
use crate::tokenize::tokenize;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::debug;

/// A command with its `<`, `>` and `>>` redirections pulled out.
///
/// The operators and their paths never appear in `argv`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectionSpec {
    pub argv: Vec<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    /// `>>` rather than `>`.
    pub append: bool,
}

impl RedirectionSpec {
    /// Recognise the redirection operators in a token sequence.
    ///
    /// Operators are whole tokens; `a>b` is an ordinary argument. Each operator consumes
    /// the following token as its path. A command may redirect its input and its output
    /// at most once each.
    pub fn parse(tokens: Vec<String>) -> Result<Self> {
        let mut spec = RedirectionSpec::default();
        let mut tokens = tokens.into_iter();
        while let Some(token) = tokens.next() {
            let append = match token.as_str() {
                "<" => {
                    let path = operand(&token, tokens.next())?;
                    if spec.input.replace(path).is_some() {
                        return Err(syntax("more than one input redirection"));
                    }
                    continue;
                }
                ">" => false,
                ">>" => true,
                _ => {
                    spec.argv.push(token);
                    continue;
                }
            };
            let path = operand(&token, tokens.next())?;
            if spec.output.replace(path).is_some() {
                return Err(syntax("more than one output redirection"));
            }
            spec.append = append;
        }
        if spec.argv.is_empty() {
            return Err(syntax("missing command before redirection"));
        }
        Ok(spec)
    }
}

fn operand(operator: &str, next: Option<String>) -> Result<String> {
    next.ok_or_else(|| ShellError::Syntax(format!("expected a path after `{operator}`")))
}

fn syntax(message: &str) -> ShellError {
    ShellError::Syntax(message.to_string())
}

fn open_input(path: &Path, shown: &str) -> Result<File> {
    File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ShellError::FileNotFound(PathBuf::from(shown)),
        _ => ShellError::FileAccess {
            path: PathBuf::from(shown),
            source,
        },
    })
}

fn open_output(path: &Path, shown: &str, append: bool) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(|source| ShellError::FileAccess {
            path: PathBuf::from(shown),
            source,
        })
}

/// Run one command with its standard streams bound to files, and wait for it.
///
/// The files are owned by the spawned command's setup and closed as soon as it is
/// dropped, whether or not the spawn or the wait succeeds.
pub(super) fn run(command: &str, env: &Environment, streams: Streams) -> Result<ExecutionResult> {
    let spec = RedirectionSpec::parse(tokenize(command)?)?;
    debug!(?spec, "redirecting");

    let stdin = match &spec.input {
        Some(path) => Stdio::from(open_input(&env.resolve(path), path)?),
        None => streams.stdin.stdio(),
    };
    let stdout = match &spec.output {
        Some(path) => Stdio::from(open_output(&env.resolve(path), path, spec.append)?),
        None => streams.stdout.stdio(),
    };

    let mut child = command_for(&spec.argv, env)?
        .stdin(stdin)
        .stdout(stdout)
        .spawn()
        .map_err(|e| spawn_error(&spec.argv[0], e))?;
    let status = child.wait().map_err(|source| ShellError::Wait {
        command: spec.argv[0].clone(),
        source,
    })?;
    Ok(ExecutionResult::Completed(exit_code(status)))
}
