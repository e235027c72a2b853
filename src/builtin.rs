use crate::command::ExitCode;
use crate::env::Environment;
use anyhow::{Context, Result, bail};
use argh::{EarlyExit, FromArgs};
use std::fs;
use std::io::Write;

/// Built-in commands that take arguments.
///
/// Arguments are parsed with the [`argh`] crate (`FromArgs`) and the command runs
/// in-process against the interpreter's [`Environment`].
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "set" or "cd".
    fn name() -> &'static str;

    /// One-line usage message printed when the arguments are malformed.
    fn usage() -> &'static str;

    /// Executes the command.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

/// Parse `args` for `T` and run it.
///
/// Malformed arguments are not an error: the usage line is written to `stdout`
/// and the exit code is 1. `--help` prints argh's generated help.
pub(crate) fn run<T: BuiltinCommand>(
    args: &[String],
    stdout: &mut dyn Write,
    env: &mut Environment,
) -> Result<ExitCode> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match T::from_args(&[T::name()], &args) {
        Ok(cmd) => cmd.execute(stdout, env),
        Err(EarlyExit {
            output,
            status: Ok(()),
        }) => {
            stdout.write_all(output.as_bytes())?;
            Ok(0)
        }
        Err(EarlyExit { status: Err(()), .. }) => usage_error::<T>(stdout),
    }
}

fn usage_error<T: BuiltinCommand>(stdout: &mut dyn Write) -> Result<ExitCode> {
    writeln!(stdout, "{}", T::usage())?;
    Ok(1)
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn usage() -> &'static str {
        "Usage: pwd"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        writeln!(stdout, "{}", env.current_dir.to_string_lossy())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: String,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn usage() -> &'static str {
        "Usage: cd <directory>"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let new_dir = env.resolve(&self.target);
        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("cd: No such file or directory: {}", self.target))?;
        if !canonical.is_dir() {
            bail!("cd: Not a directory: {}", self.target);
        }
        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Set an environment variable for this shell and the commands it starts.
pub struct Set {
    #[argh(positional)]
    /// name of the variable.
    pub name: String,

    #[argh(positional, greedy)]
    /// value to assign; several words are joined by a single space.
    pub value: Vec<String>,
}

impl BuiltinCommand for Set {
    fn name() -> &'static str {
        "set"
    }

    fn usage() -> &'static str {
        "Usage: set <variable> <value>"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        if self.value.is_empty() {
            return usage_error::<Self>(stdout);
        }
        env.set_var(self.name, self.value.join(" "));
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Remove environment variables.
pub struct Unset {
    #[argh(positional, greedy)]
    /// names of the variables to remove.
    pub names: Vec<String>,
}

impl BuiltinCommand for Unset {
    fn name() -> &'static str {
        "unset"
    }

    fn usage() -> &'static str {
        "Usage: unset <variable>"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        if self.names.is_empty() {
            return usage_error::<Self>(stdout);
        }
        for name in &self.names {
            env.remove_var(name);
        }
        Ok(0)
    }
}

/// Write `text` followed by a newline. The text is printed verbatim, spacing included.
pub(crate) fn echo(text: &str, stdout: &mut dyn Write) -> Result<ExitCode> {
    writeln!(stdout, "{text}")?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn test_env(current_dir: impl Into<PathBuf>) -> Environment {
        Environment::with_vars(HashMap::new(), current_dir)
    }

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pwd_prints_current_dir() {
        let mut env = test_env("/some/where");
        let mut out = Vec::new();

        let code = run::<Pwd>(&[], &mut out, &mut env).unwrap();

        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "/some/where\n");
    }

    #[test]
    fn test_echo_keeps_spacing() {
        let mut out = Vec::new();
        let code = echo("hello   world", &mut out).unwrap();
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "hello   world\n");
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let temp = tempfile::tempdir().unwrap();
        let canonical_temp = fs::canonicalize(temp.path()).unwrap();
        let mut env = test_env("/");

        let target = canonical_temp.to_string_lossy().to_string();
        let code = run::<Cd>(&[target], &mut Vec::new(), &mut env).unwrap();

        assert_eq!(code, 0);
        assert_eq!(env.current_dir, canonical_temp);
    }

    #[test]
    fn test_cd_relative_to_context_dir() {
        let temp = tempfile::tempdir().unwrap();
        let canonical_temp = fs::canonicalize(temp.path()).unwrap();
        fs::create_dir(canonical_temp.join("sub")).unwrap();
        let mut env = test_env(&canonical_temp);

        run::<Cd>(&args(&["sub"]), &mut Vec::new(), &mut env).unwrap();
        assert_eq!(env.current_dir, canonical_temp.join("sub"));

        run::<Cd>(&args(&[".."]), &mut Vec::new(), &mut env).unwrap();
        assert_eq!(env.current_dir, canonical_temp);
    }

    #[test]
    fn test_cd_nonexistent_path_errors() {
        let temp = tempfile::tempdir().unwrap();
        let mut env = test_env(temp.path());

        let err = run::<Cd>(&args(&["missing"]), &mut Vec::new(), &mut env).unwrap_err();

        assert_eq!(err.to_string(), "cd: No such file or directory: missing");
        assert_eq!(env.current_dir, temp.path());
    }

    #[test]
    fn test_cd_to_file_errors() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("plain"), "x").unwrap();
        let mut env = test_env(temp.path());

        let err = run::<Cd>(&args(&["plain"]), &mut Vec::new(), &mut env).unwrap_err();

        assert_eq!(err.to_string(), "cd: Not a directory: plain");
        assert_eq!(env.current_dir, temp.path());
    }

    #[test]
    fn test_set_joins_value_words() {
        let mut env = test_env("/");
        let code = run::<Set>(&args(&["GREETING", "hello", "world"]), &mut Vec::new(), &mut env)
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(env.get_var("GREETING"), Some("hello world"));
    }

    #[test]
    fn test_set_without_value_prints_usage() {
        let mut env = test_env("/");
        let mut out = Vec::new();

        let code = run::<Set>(&args(&["ONLY_NAME"]), &mut out, &mut env).unwrap();

        assert_eq!(code, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "Usage: set <variable> <value>\n");
        assert_eq!(env.get_var("ONLY_NAME"), None);
    }

    #[test]
    fn test_set_without_arguments_prints_usage() {
        let mut env = test_env("/");
        let mut out = Vec::new();

        let code = run::<Set>(&[], &mut out, &mut env).unwrap();

        assert_eq!(code, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "Usage: set <variable> <value>\n");
    }

    #[test]
    fn test_unset_removes_every_name() {
        let mut env = test_env("/");
        env.set_var("A", "1");
        env.set_var("B", "2");

        run::<Unset>(&args(&["A", "B", "NEVER_SET"]), &mut Vec::new(), &mut env).unwrap();

        assert_eq!(env.get_var("A"), None);
        assert_eq!(env.get_var("B"), None);
    }

    #[test]
    fn test_unset_without_arguments_prints_usage() {
        let mut env = test_env("/");
        let mut out = Vec::new();

        let code = run::<Unset>(&[], &mut out, &mut env).unwrap();

        assert_eq!(code, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "Usage: unset <variable>\n");
    }

    #[test]
    fn test_help_is_not_an_error() {
        let mut env = test_env("/");
        let mut out = Vec::new();

        let code = run::<Set>(&args(&["--help"]), &mut out, &mut env).unwrap();

        assert_eq!(code, 0);
        assert!(String::from_utf8(out).unwrap().contains("Usage: set"));
    }
}
