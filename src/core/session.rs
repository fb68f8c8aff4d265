//! Protocol session
//!
//! Owns one interpreter conversation: the child process pipes, the
//! message framer over its output, window state, and pending input. The
//! conversation is strictly half-duplex: read one framed message, render,
//! wait for the user, respond, repeat. Any protocol error is fatal for
//! the session; there is no well-defined way to retry mid-turn.

use std::io::{BufReader, Write};
use std::process::ChildStdout;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::input::InputResolver;
use crate::ui::WindowStore;

use super::child::{ChildError, Interpreter};
use super::frame::MessageFramer;
use super::proto::{Init, Metrics, ProtocolError, Update};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("protocol failure: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("interpreter process failure: {0}")]
    Child(#[from] ChildError),

    #[error("failed to write output: {0}")]
    Sink(#[from] std::io::Error),
}

/// Outcome of reading messages until the interpreter wants something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// An update was applied; input is now pending.
    AwaitingInput,
    /// The interpreter's output stream ended.
    Exited,
}

/// A conversation with one interpreter process.
pub struct Session {
    metrics: Metrics,
    child: Option<Interpreter>,
    framer: Option<MessageFramer<BufReader<ChildStdout>>>,
    windows: WindowStore,
    input: InputResolver,
}

impl Session {
    /// Create a session with no interpreter attached yet.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            metrics,
            child: None,
            framer: None,
            windows: WindowStore::new(),
            input: InputResolver::new(),
        }
    }

    /// Spawn the interpreter and perform the init handshake.
    pub fn start(&mut self, program: &str, args: &[String]) -> Result<(), SessionError> {
        let (mut child, stdout) = Interpreter::spawn(program, args)?;
        let init = serde_json::to_string(&Init::new(self.metrics)).map_err(ProtocolError::Framing)?;
        child.write_message(&init)?;
        info!("interpreter started, init sent");

        self.child = Some(child);
        self.framer = Some(MessageFramer::new(BufReader::new(stdout)));
        Ok(())
    }

    /// Check if the interpreter is still running.
    pub fn is_running(&mut self) -> bool {
        match &mut self.child {
            Some(child) => child.is_running(),
            None => false,
        }
    }

    /// Read framed messages until the interpreter requests input or its
    /// output stream ends. All rendering for the turn lands on `out`.
    pub fn advance(&mut self, out: &mut impl Write) -> Result<Turn, SessionError> {
        loop {
            let framer = self.framer.as_mut().ok_or(ChildError::Closed)?;
            let message = match framer.next_message()? {
                Some(message) => message,
                None => {
                    info!("interpreter output ended");
                    return Ok(Turn::Exited);
                }
            };

            let kind = message
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            match kind.as_str() {
                "pass" => continue,
                "error" => {
                    let detail = message
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("unspecified error")
                        .to_string();
                    return Err(ProtocolError::Interpreter(detail).into());
                }
                "update" => {
                    let update: Update =
                        serde_json::from_value(message).map_err(ProtocolError::Framing)?;
                    self.apply_update(update, out)?;
                    return Ok(Turn::AwaitingInput);
                }
                other => {
                    return Err(ProtocolError::UnknownEventType(other.to_string()).into());
                }
            }
        }
    }

    /// Resolve raw user input and send the response message.
    pub fn submit(&mut self, raw: &str) -> Result<(), SessionError> {
        let response = self.input.resolve(raw)?;
        let json = serde_json::to_string(&response).map_err(ProtocolError::Framing)?;
        debug!("response: {}", json);
        let child = self.child.as_mut().ok_or(ChildError::Closed)?;
        child.write_message(&json)?;
        Ok(())
    }

    /// Apply one update: adopt the generation, rebuild declared windows,
    /// render content, and replace the pending input set.
    fn apply_update(&mut self, update: Update, out: &mut impl Write) -> Result<(), SessionError> {
        if let Some(gen) = update.gen {
            debug!("generation {}", gen);
            self.input.set_generation(gen);
        }

        if let Some(windows) = &update.windows {
            self.windows.declare(windows);
        }

        if let Some(content) = &update.content {
            for item in content {
                for line in self.windows.apply(item)? {
                    writeln!(out, "{}", line)?;
                }
            }
        }

        if let Some(special) = &update.specialinput {
            let prompt = self.input.set_special(special);
            writeln!(out, "{}", prompt)?;
        } else if let Some(requests) = &update.input {
            self.input.set_pending(requests);
        } else {
            return Err(ProtocolError::NoInputRequested.into());
        }

        Ok(())
    }
}
