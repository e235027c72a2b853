use crate::command::ExitCode;
use crate::env::Environment;
use crate::error::{Result, ShellError};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Build a [`Command`] for `argv` that runs inside the interpreter's context.
///
/// The executable is resolved against the context's `PATH` and working directory;
/// the child gets exactly the context's variables and starts in its directory.
pub(crate) fn command_for(argv: &[String], env: &Environment) -> Result<Command> {
    let (name, args) = argv
        .split_first()
        .ok_or_else(|| ShellError::Syntax("missing command".to_string()))?;
    let search_paths = env.get_var("PATH").unwrap_or_default();
    let executable = find_command_path(OsStr::new(search_paths), &env.current_dir, Path::new(name))
        .ok_or_else(|| ShellError::CommandNotFound(name.clone()))?;

    let mut cmd = Command::new(&*executable);
    cmd.args(args)
        .env_clear()
        .envs(env.vars.iter())
        .current_dir(&env.current_dir);
    Ok(cmd)
}

/// Map a spawn failure to the error the user should see.
pub(crate) fn spawn_error(command: &str, source: std::io::Error) -> ShellError {
    if source.kind() == std::io::ErrorKind::NotFound {
        ShellError::CommandNotFound(command.to_string())
    } else {
        ShellError::Spawn {
            command: command.to_string(),
            source,
        }
    }
}

/// Exit code of a finished child, following shell conventions for signals.
pub fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - `./foo`, or any relative path with several components (e.g. `bin/sh`): resolved
///   against `current_dir`, returned if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first existing match. Relative PATH entries resolve against `current_dir`.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(
    search_paths: &OsStr,
    current_dir: &Path,
    path: &'a Path,
) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        // Empty path -> not found
        (None, None) => None,
        (Some(x), None) if x.as_os_str() != "." => {
            find_in_path(search_paths, current_dir, x.as_os_str()).map(Cow::Owned)
        }
        _ => {
            let candidate = current_dir.join(path);
            candidate.is_file().then_some(Cow::Owned(candidate))
        }
    }
}

fn find_in_path(search_paths: &OsStr, current_dir: &Path, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| current_dir.join(dir).join(cmd))
        .find(|path| find_by_path(path).is_some())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.is_file() { Some(path) } else { None }
}
