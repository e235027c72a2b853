use std::collections::HashMap;
use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Process context shared by the classifier, the built-ins and the execution engine.
///
/// The environment contains:
/// - `vars`: environment variables; read by `$NAME` substitution and handed to every child.
/// - `current_dir`: the working directory children start in and relative paths resolve against.
/// - `should_exit`: set by `exit`/`quit` so the interactive loop knows when to stop.
///
/// The real process state is copied once by [`Environment::new`]. Afterwards only this
/// object is mutated, which lets tests run against a hand-built context.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that an interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// This copies variables from `std::env::vars()` and initializes `current_dir`
    /// from `std::env::current_dir()`. The `should_exit` flag is initialized to `false`.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_vars(vars, current_dir)
    }

    /// Build a context from explicit parts without looking at the real process.
    pub fn with_vars(vars: HashMap<String, String>, current_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars,
            current_dir: current_dir.into(),
            should_exit: false,
        }
    }

    /// Get the value of a variable, `None` when it is unset.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Remove a variable. Removing an unset variable is not an error.
    pub fn remove_var(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    /// Resolve `path` against the context's working directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir.join(path)
        }
    }
}
