//! Rendering components.
//!
//! - **style**: styled text runs → markup strings
//! - **windows**: grid/buffer window state and per-turn rendered output

pub mod style;
pub mod windows;

pub use windows::WindowStore;
