use crate::error::{Result, ShellError};

/// Split a command into words the way a POSIX shell would, honouring quotes and
/// backslash escapes. An unbalanced quote is a syntax error.
pub fn tokenize(command: &str) -> Result<Vec<String>> {
    shlex::split(command)
        .ok_or_else(|| ShellError::Syntax(format!("unterminated quote in `{}`", command.trim())))
}
