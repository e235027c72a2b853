use std::io::{Read, Write};
use std::process::Stdio;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Input stream that can be handed to a spawned process as its stdin.
///
/// A blanket implementation exists for any type that implements `Read` and
/// `Into<Stdio>` (e.g. `File` or `ChildStdout`).
pub trait Stdin {
    /// Convert this input into a [`Stdio`] handle suitable for `std::process::Command`.
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Read + Into<Stdio>> Stdin for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

/// Abstraction over a writable output stream that can also be converted into
/// a [`Stdio`] handle for spawning external processes.
///
/// Built-ins write into it directly; external commands receive it as their stdout.
pub trait Stdout: Write {
    /// Convert this output into a [`Stdio`] handle suitable for `std::process::Command`.
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Write + Into<Stdio>> Stdout for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

/// The interpreter's own standard input, handed to children as-is.
pub struct InheritedStdin;

impl Stdin for InheritedStdin {
    fn stdio(self: Box<Self>) -> Stdio {
        Stdio::inherit()
    }
}

/// The interpreter's own standard output, handed to children as-is.
pub struct InheritedStdout(std::io::Stdout);

impl Write for InheritedStdout {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }
}

impl Stdout for InheritedStdout {
    fn stdio(self: Box<Self>) -> Stdio {
        // Anything a built-in printed must land before the child writes.
        let _ = self.0.lock().flush();
        Stdio::inherit()
    }
}

/// Standard streams one line of input is executed against.
pub struct Streams {
    pub stdin: Box<dyn Stdin>,
    pub stdout: Box<dyn Stdout>,
}

impl Streams {
    pub fn new(stdin: Box<dyn Stdin>, stdout: Box<dyn Stdout>) -> Self {
        Self { stdin, stdout }
    }

    /// Streams inherited from the interpreter process.
    pub fn inherited() -> Self {
        Self::new(
            Box::new(InheritedStdin),
            Box::new(InheritedStdout(std::io::stdout())),
        )
    }
}
