//! A minimal interactive command interpreter.
//!
//! Every line typed at the prompt goes through the same steps: `$NAME` references are
//! substituted, the line is classified as a built-in (`cd`, `pwd`, `set`, `unset`,
//! `echo`) or an external command, and external commands are run by the [`Engine`]
//! as a pipeline, a redirected command, a background job or a plain foreground command.
//!
//! The main entry point is [`Interpreter`]. It owns an [`Environment`], the process
//! context (variables and working directory) that built-ins mutate and children inherit.

pub mod action;
mod builtin;
pub mod command;
pub mod engine;
pub mod env;
pub mod error;
pub mod external;
mod interpreter;
pub mod substitute;
pub mod tokenize;

pub use action::{Action, classify, classify_and_substitute};
pub use command::{ExitCode, Streams};
pub use engine::{Engine, ExecutionResult, Mode};
pub use env::Environment;
pub use error::ShellError;
pub use interpreter::{Interpreter, Outcome, ReplOptions};
