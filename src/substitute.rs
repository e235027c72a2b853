//! `$NAME` substitution performed on every line before it is classified.

use crate::env::Environment;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$(\w+)").expect("variable pattern is valid"))
}

/// Replace every `$NAME` with the value of `NAME`, or with nothing when it is unset.
///
/// The scan is a single left-to-right pass over the original text: substituted values
/// are never scanned again, so `A=$B` expands `$A` to the literal `$B`.
pub fn substitute_vars<'a>(line: &'a str, env: &Environment) -> Cow<'a, str> {
    variable_pattern().replace_all(line, |caps: &Captures| {
        env.get_var(&caps[1]).unwrap_or_default().to_string()
    })
}
