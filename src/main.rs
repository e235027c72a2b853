use argh::FromArgs;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use xsh::{Environment, Interpreter, ReplOptions};

#[derive(FromArgs)]
/// A minimal interactive shell: built-ins, pipelines, redirection and background jobs.
struct Options {
    #[argh(option, short = 'c')]
    /// run a single command line and exit with its status.
    command: Option<String>,

    #[argh(option, short = 'p', default = "String::from(\"xsh# \")")]
    /// prompt shown before each line (default "xsh# ").
    prompt: String,

    #[argh(switch)]
    /// do not record entered lines in the history.
    no_history: bool,
}

fn main() -> ExitCode {
    // Logs go to stderr so they never mix with command output; RUST_LOG overrides.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let options: Options = argh::from_env();
    let mut sh = Interpreter::new(Environment::new());

    if let Some(line) = options.command {
        return match sh.execute_line(line.trim()) {
            Ok(outcome) => status(outcome.exit_code()),
            Err(e) => {
                eprintln!("{e}");
                status(e.exit_code())
            }
        };
    }

    let repl = ReplOptions {
        prompt: options.prompt,
        history: !options.no_history,
    };
    match sh.repl(&repl) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn status(code: xsh::ExitCode) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
