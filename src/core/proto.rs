//! Wire message types
//!
//! Serde types for the RemGlk JSON protocol: the init handshake, the
//! update/content/input shapes received from the interpreter, and the
//! response messages sent back. Unknown fields on incoming messages are
//! ignored; unknown window types are a deserialization error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("malformed message at a document boundary: {0}")]
    Framing(#[from] serde_json::Error),

    #[error("failed to read from interpreter: {0}")]
    Read(#[from] std::io::Error),

    #[error("interpreter error: {0}")]
    Interpreter(String),

    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    #[error("update requested no input")]
    NoInputRequested,

    #[error("no pending request accepts input: {0}")]
    UnresolvableInput(String),

    #[error("content update for unknown window {0}")]
    UnknownWindow(u32),

    #[error("grid line {line} out of range for window {window} (height {height})")]
    LineOutOfRange {
        window: u32,
        line: usize,
        height: usize,
    },
}

/// Display metrics advertised to the interpreter.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Metrics {
    pub width: u32,
    pub height: u32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            width: 70,
            height: 24,
        }
    }
}

/// The handshake sent once, before any update arrives.
#[derive(Debug, Serialize)]
pub struct Init {
    #[serde(rename = "type")]
    kind: &'static str,
    gen: u64,
    metrics: Metrics,
}

impl Init {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            kind: "init",
            gen: 0,
            metrics,
        }
    }
}

/// An `update` event: every field is optional on the wire.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub gen: Option<u64>,
    pub windows: Option<Vec<WindowDecl>>,
    pub content: Option<Vec<ContentUpdate>>,
    pub input: Option<Vec<InputRequest>>,
    pub specialinput: Option<SpecialInput>,
}

/// Window kinds are a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Grid,
    Buffer,
}

/// One entry of a `windows` declaration.
#[derive(Debug, Deserialize)]
pub struct WindowDecl {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: WindowKind,
    #[serde(default)]
    pub width: usize,
    #[serde(default)]
    pub height: usize,
}

/// One entry of a `content` list. Grid updates carry `lines`, buffer
/// updates carry `clear`/`text`; the window's declared kind decides which
/// set applies.
#[derive(Debug, Deserialize)]
pub struct ContentUpdate {
    pub id: u32,
    #[serde(default)]
    pub clear: bool,
    #[serde(default)]
    pub lines: Vec<GridLine>,
    #[serde(default)]
    pub text: Vec<TextItem>,
}

#[derive(Debug, Deserialize)]
pub struct GridLine {
    pub line: usize,
    #[serde(default)]
    pub content: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
pub struct TextItem {
    #[serde(default)]
    pub append: bool,
    #[serde(default)]
    pub content: Vec<TextRun>,
}

/// A span of text tagged with a single style.
#[derive(Debug, Clone, Deserialize)]
pub struct TextRun {
    pub style: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Line,
    Char,
    FilerefPrompt,
}

/// A pending input request from an update's `input` list.
#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub id: Option<u32>,
    pub gen: u64,
    #[serde(rename = "type")]
    pub kind: InputKind,
}

/// A `specialinput` request. Carries no window id and no generation of
/// its own; the resolver tags it with the current generation.
#[derive(Debug, Deserialize)]
pub struct SpecialInput {
    #[serde(rename = "type")]
    pub kind: InputKind,
    pub filetype: String,
    pub filemode: String,
}

/// A response message closing the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Response {
    Line {
        gen: u64,
        window: u32,
        value: String,
    },
    Char {
        gen: u64,
        window: u32,
        value: String,
    },
    #[serde(rename = "specialresponse")]
    Special {
        gen: u64,
        response: String,
        value: String,
    },
}
