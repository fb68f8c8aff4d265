//! Child interpreter process
//!
//! Spawns the interpreter with piped stdio and owns the write side of the
//! conversation. The read side is handed to the message framer at spawn
//! time; stderr is inherited so interpreter diagnostics stay visible on
//! the operator's terminal.

use std::io::{self, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChildError {
    #[error("failed to spawn interpreter: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to write to interpreter: {0}")]
    Write(#[source] io::Error),

    #[error("interpreter pipe is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, ChildError>;

/// Handle to a spawned interpreter process.
pub struct Interpreter {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl Interpreter {
    /// Spawn the interpreter and take ownership of its pipes.
    pub fn spawn(program: &str, args: &[String]) -> Result<(Self, ChildStdout)> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(ChildError::Spawn)?;

        let stdin = child.stdin.take().ok_or(ChildError::Closed)?;
        let stdout = child.stdout.take().ok_or(ChildError::Closed)?;

        Ok((
            Self {
                child,
                stdin: Some(stdin),
            },
            stdout,
        ))
    }

    /// Write one JSON document, newline-terminated, and flush.
    pub fn write_message(&mut self, json: &str) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or(ChildError::Closed)?;
        writeln!(stdin, "{}", json).map_err(ChildError::Write)?;
        stdin.flush().map_err(ChildError::Write)
    }

    /// Check if the process is still running.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        // Closing stdin first gives a well-behaved interpreter the chance
        // to exit on its own.
        self.stdin.take();
        if matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}
