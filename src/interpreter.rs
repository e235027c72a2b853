use crate::action::{Action, classify_and_substitute};
use crate::builtin::{self, Cd, Pwd, Set, Unset};
use crate::command::{ExitCode, Streams};
use crate::engine::registry::ChildKind;
use crate::engine::{Engine, ExecutionResult};
use crate::env::Environment;
use crate::error::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use tracing::{debug, info};

/// What happened to one line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do.
    Empty,
    /// `exit` or `quit`; the loop should stop.
    Exit,
    /// A built-in ran and returned this code.
    Handled(ExitCode),
    /// The line went to the execution engine.
    Executed(ExecutionResult),
}

impl Outcome {
    /// Status a non-interactive caller should exit with.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Outcome::Empty | Outcome::Exit => 0,
            Outcome::Handled(code) => *code,
            Outcome::Executed(ExecutionResult::Completed(code)) => *code,
            Outcome::Executed(ExecutionResult::Background { .. }) => 0,
        }
    }
}

/// Settings of the interactive loop.
#[derive(Debug, Clone)]
pub struct ReplOptions {
    pub prompt: String,
    /// Record entered lines in the line editor's history.
    pub history: bool,
}

impl Default for ReplOptions {
    fn default() -> Self {
        Self {
            prompt: "xsh# ".to_string(),
            history: true,
        }
    }
}

/// A minimal interactive command interpreter.
///
/// Each line is substituted, classified, and then either handled by a built-in or
/// passed to the [`Engine`]. All state that outlives a line (variables, working
/// directory, unfinished children) lives here.
///
/// Example
/// ```
/// use xsh::{Environment, Interpreter, Outcome};
/// let mut sh = Interpreter::new(Environment::new());
/// let outcome = sh.execute_line("set GREETING hello").unwrap();
/// assert_eq!(outcome, Outcome::Handled(0));
/// assert_eq!(sh.env().get_var("GREETING"), Some("hello"));
/// ```
pub struct Interpreter {
    env: Environment,
    engine: Engine,
}

impl Interpreter {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            engine: Engine::new(),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Execute one line against the interpreter's own standard streams.
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome> {
        self.execute_line_with(line, Streams::inherited())
    }

    /// Execute one line with explicit standard streams.
    ///
    /// Built-ins write to `streams.stdout`; external commands are attached to both.
    pub fn execute_line_with(&mut self, line: &str, streams: Streams) -> Result<Outcome> {
        self.reap_finished();

        let action = classify_and_substitute(line, &self.env);
        debug!(?action, "classified");

        let Streams { stdin, mut stdout } = streams;
        let code = match action {
            Action::Empty => return Ok(Outcome::Empty),
            Action::Exit => {
                writeln!(stdout, "Exiting xsh...")?;
                self.env.should_exit = true;
                return Ok(Outcome::Exit);
            }
            Action::ExternalCommand(command) => {
                let streams = Streams::new(stdin, stdout);
                return self
                    .engine
                    .execute(&command, &self.env, streams)
                    .map(Outcome::Executed);
            }
            Action::ChangeDirectory(args) => builtin::run::<Cd>(&args, &mut stdout, &mut self.env)?,
            Action::PrintWorkingDirectory => builtin::run::<Pwd>(&[], &mut stdout, &mut self.env)?,
            Action::SetVariable(args) => builtin::run::<Set>(&args, &mut stdout, &mut self.env)?,
            Action::UnsetVariable(args) => {
                builtin::run::<Unset>(&args, &mut stdout, &mut self.env)?
            }
            Action::Echo(text) => builtin::echo(&text, &mut stdout)?,
        };
        stdout.flush()?;
        Ok(Outcome::Handled(code))
    }

    fn reap_finished(&mut self) {
        for finished in self.engine.reap() {
            match finished.kind {
                ChildKind::Background => info!(
                    job = finished.id,
                    pid = finished.pid,
                    code = ?finished.code,
                    command = %finished.command,
                    "background job finished"
                ),
                ChildKind::PipelineStage => debug!(
                    pid = finished.pid,
                    code = ?finished.code,
                    command = %finished.command,
                    "reaped pipeline stage"
                ),
            }
        }
    }

    /// Read-eval-print loop on the terminal.
    ///
    /// Errors of a single line are printed and the loop goes on. It ends on `exit`,
    /// end of input or Ctrl-C.
    pub fn repl(&mut self, options: &ReplOptions) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;

        while !self.env.should_exit {
            match rl.readline(&options.prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if options.history {
                        rl.add_history_entry(line)?;
                    }
                    if let Err(e) = self.execute_line(line) {
                        eprintln!("{e}");
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}
