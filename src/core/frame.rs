//! Message framing
//!
//! Groups the interpreter's raw line output into discrete JSON documents.
//! RemGlk emits newline-terminated JSON and marks the end of each document
//! with a blank line.

use std::io::BufRead;

use serde_json::Value;

use super::proto::ProtocolError;

/// Incremental framer over the interpreter's output stream.
pub struct MessageFramer<R> {
    reader: R,
    buffer: String,
}

impl<R: BufRead> MessageFramer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
        }
    }

    /// Read lines until a blank line completes a document, then parse it.
    ///
    /// Returns `Ok(None)` once the stream ends. A partially accumulated
    /// document at that point is discarded: the process is gone and no
    /// terminator is coming. Whitespace-only lines between documents are
    /// skipped; a malformed document is fatal.
    pub fn next_message(&mut self) -> Result<Option<Value>, ProtocolError> {
        self.buffer.clear();
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            if line.trim().is_empty() {
                if self.buffer.is_empty() {
                    continue;
                }
                return Ok(Some(serde_json::from_str(&self.buffer)?));
            }
            // Lines are accumulated verbatim, newline included, so a
            // document may span any number of lines.
            self.buffer.push_str(&line);
        }
    }
}
