//! Core protocol components.
//!
//! This module contains the interpreter-facing machinery:
//!
//! - **child**: spawning the interpreter and feeding its stdin
//! - **proto**: wire message types and the protocol error taxonomy
//! - **frame**: grouping raw output lines into JSON documents
//! - **session**: one full conversation over the child's pipes
//!
//! # Architecture
//!
//! ```text
//! Session
//! ├── Interpreter (child process, owns the pipes)
//! ├── MessageFramer (lines → JSON documents)
//! ├── WindowStore (grid/buffer state + rendering)
//! └── InputResolver (pending requests + generation)
//! ```

pub mod child;
pub mod frame;
pub mod proto;
pub mod session;
