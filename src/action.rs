//! Classification of a raw input line into the action the interpreter takes.

use crate::env::Environment;
use crate::substitute::substitute_vars;

/// What a single line of input asks the interpreter to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Blank line.
    Empty,
    /// `exit` or `quit`.
    Exit,
    /// `cd <path>`; the path is the rest of the line, spaces included.
    ChangeDirectory(Vec<String>),
    /// `pwd`.
    PrintWorkingDirectory,
    /// `set <args>`.
    SetVariable(Vec<String>),
    /// `unset <args>`.
    UnsetVariable(Vec<String>),
    /// `echo <text>`, with the text kept verbatim.
    Echo(String),
    /// Anything else; handed to the execution engine.
    ExternalCommand(String),
}

/// Substitute `$NAME` references and classify the result.
///
/// Substitution runs first so built-ins receive already-expanded arguments.
pub fn classify_and_substitute(line: &str, env: &Environment) -> Action {
    classify(&substitute_vars(line, env))
}

/// Classify an already-substituted line.
///
/// Prefixes are tested in a fixed order: `cd `, `pwd`, `set `, `unset `, `echo `.
/// The prefix keeps its space even when substitution left nothing after it, so
/// `set $UNSET` still reaches `set` and gets its usage message.
/// An `echo` line carrying pipe, redirection or background syntax is left to the
/// engine so the operators take effect.
pub fn classify(line: &str) -> Action {
    let line = line.trim_start();
    let whole = line.trim_end();
    if whole.is_empty() {
        return Action::Empty;
    }
    if whole == "exit" || whole == "quit" {
        return Action::Exit;
    }

    if let Some(rest) = line.strip_prefix("cd ") {
        Action::ChangeDirectory(path_arg(rest))
    } else if whole == "pwd" {
        Action::PrintWorkingDirectory
    } else if let Some(rest) = line.strip_prefix("set ") {
        Action::SetVariable(split_args(rest))
    } else if let Some(rest) = line.strip_prefix("unset ") {
        Action::UnsetVariable(split_args(rest))
    } else {
        match line.strip_prefix("echo ") {
            Some(rest) if !has_engine_syntax(whole) => {
                Action::Echo(rest.trim_start().to_string())
            }
            _ => Action::ExternalCommand(whole.to_string()),
        }
    }
}

fn split_args(rest: &str) -> Vec<String> {
    rest.split_whitespace().map(str::to_string).collect()
}

/// The whole remainder is one path, inner spaces included.
fn path_arg(rest: &str) -> Vec<String> {
    match rest.trim() {
        "" => Vec::new(),
        path => vec![path.to_string()],
    }
}

fn has_engine_syntax(line: &str) -> bool {
    line.contains(['|', '<', '>']) || line.ends_with('&')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_builtins_by_prefix() {
        assert_eq!(classify("cd /tmp"), Action::ChangeDirectory(args(&["/tmp"])));
        assert_eq!(classify("pwd"), Action::PrintWorkingDirectory);
        assert_eq!(
            classify("set GREETING hello world"),
            Action::SetVariable(args(&["GREETING", "hello", "world"]))
        );
        assert_eq!(classify("unset GREETING"), Action::UnsetVariable(args(&["GREETING"])));
        assert_eq!(classify("echo a   b"), Action::Echo("a   b".to_string()));
    }

    #[test]
    fn test_prefix_requires_the_space() {
        assert_eq!(classify("cdrom"), Action::ExternalCommand("cdrom".into()));
        assert_eq!(classify("settle"), Action::ExternalCommand("settle".into()));
        assert_eq!(classify("echo"), Action::ExternalCommand("echo".into()));
    }

    #[test]
    fn test_pwd_is_exact_match() {
        assert_eq!(classify("pwd -P"), Action::ExternalCommand("pwd -P".into()));
        assert_eq!(classify("pwd | cat"), Action::ExternalCommand("pwd | cat".into()));
    }

    #[test]
    fn test_echo_with_operators_goes_to_engine() {
        assert_eq!(
            classify("echo hi > f.txt"),
            Action::ExternalCommand("echo hi > f.txt".into())
        );
        assert_eq!(
            classify("echo hello | tr a-z A-Z"),
            Action::ExternalCommand("echo hello | tr a-z A-Z".into())
        );
        assert_eq!(classify("echo x &"), Action::ExternalCommand("echo x &".into()));
    }

    #[test]
    fn test_empty_and_exit() {
        assert_eq!(classify("   "), Action::Empty);
        assert_eq!(classify("exit"), Action::Exit);
        assert_eq!(classify("quit"), Action::Exit);
        assert_eq!(classify("exit now"), Action::ExternalCommand("exit now".into()));
    }

    #[test]
    fn test_cd_takes_the_rest_of_the_line_as_one_path() {
        assert_eq!(
            classify("cd  My Documents "),
            Action::ChangeDirectory(args(&["My Documents"]))
        );
    }

    #[test]
    fn test_builtin_with_emptied_argument_keeps_its_class() {
        let env = Environment::with_vars(HashMap::new(), "/");
        assert_eq!(classify_and_substitute("set $NOPE", &env), Action::SetVariable(vec![]));
        assert_eq!(classify_and_substitute("unset $NOPE", &env), Action::UnsetVariable(vec![]));
        assert_eq!(classify_and_substitute("cd $NOPE", &env), Action::ChangeDirectory(vec![]));
        assert_eq!(classify_and_substitute("echo $NOPE", &env), Action::Echo(String::new()));
    }

    #[test]
    fn test_substitution_happens_before_classification() {
        let mut vars = HashMap::new();
        vars.insert("DIR".to_string(), "/var/log".to_string());
        vars.insert("CMD".to_string(), "pwd".to_string());
        let env = Environment::with_vars(vars, "/");

        assert_eq!(
            classify_and_substitute("cd $DIR", &env),
            Action::ChangeDirectory(args(&["/var/log"]))
        );
        assert_eq!(classify_and_substitute("$CMD", &env), Action::PrintWorkingDirectory);
        assert_eq!(
            classify_and_substitute("ls $DIR", &env),
            Action::ExternalCommand("ls /var/log".into())
        );
    }
}
