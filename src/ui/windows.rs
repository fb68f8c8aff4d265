//! Window state
//!
//! Owns grid and buffer window contents across turns and turns content
//! updates into rendered output lines. Grids are fixed-size and redrawn
//! in full on every update; buffers are append-only logs whose rendered
//! history is emitted once and then trimmed to the final entry, since the
//! interpreter may continue that entry on a later turn.

use std::collections::HashMap;

use crate::core::proto::{ContentUpdate, ProtocolError, WindowDecl, WindowKind};

use super::style;

/// Marker prefixed to every grid line in the output stream.
const GRID_PREFIX: &str = "] ";

#[derive(Debug)]
enum Window {
    Grid { height: usize, lines: Vec<String> },
    Buffer { entries: Vec<String> },
}

/// Owns all window state, keyed by window id.
#[derive(Debug, Default)]
pub struct WindowStore {
    windows: HashMap<u32, Window>,
}

impl WindowStore {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
        }
    }

    /// Apply a `windows` declaration, (re)creating each named window.
    ///
    /// Redeclaring an id always resets its content: grids start as
    /// `height` lines of `width` spaces, buffers start empty.
    pub fn declare(&mut self, decls: &[WindowDecl]) {
        for decl in decls {
            let window = match decl.kind {
                WindowKind::Grid => Window::Grid {
                    height: decl.height,
                    lines: vec![" ".repeat(decl.width); decl.height],
                },
                WindowKind::Buffer => Window::Buffer {
                    entries: Vec::new(),
                },
            };
            self.windows.insert(decl.id, window);
        }
    }

    /// Apply one content update and return the lines to emit for it.
    pub fn apply(&mut self, update: &ContentUpdate) -> Result<Vec<String>, ProtocolError> {
        let window = self
            .windows
            .get_mut(&update.id)
            .ok_or(ProtocolError::UnknownWindow(update.id))?;

        match window {
            Window::Grid { height, lines } => {
                for grid_line in &update.lines {
                    if grid_line.line >= *height {
                        return Err(ProtocolError::LineOutOfRange {
                            window: update.id,
                            line: grid_line.line,
                            height: *height,
                        });
                    }
                    lines[grid_line.line] = style::render_all(&grid_line.content);
                }
                Ok(lines
                    .iter()
                    .map(|line| format!("{}{}", GRID_PREFIX, line))
                    .collect())
            }
            Window::Buffer { entries } => {
                if update.clear {
                    entries.clear();
                }
                for item in &update.text {
                    let rendered = style::render_all(&item.content);
                    if item.append {
                        // A continuation still becomes its own entry; it
                        // never extends the previous one.
                        entries.push(String::new());
                        if let Some(last) = entries.last_mut() {
                            last.push_str(&rendered);
                        }
                    } else {
                        entries.push(rendered);
                    }
                }
                let output = entries.clone();
                // Everything above the final entry has now been emitted
                // and is dropped from state.
                if entries.len() > 1 {
                    let keep_from = entries.len() - 1;
                    entries.drain(..keep_from);
                }
                Ok(output)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decls(value: serde_json::Value) -> Vec<WindowDecl> {
        serde_json::from_value(value).unwrap()
    }

    fn content(value: serde_json::Value) -> ContentUpdate {
        serde_json::from_value(value).unwrap()
    }

    fn grid_store() -> WindowStore {
        let mut store = WindowStore::new();
        store.declare(&decls(
            json!([{"id": 1, "type": "grid", "width": 5, "height": 3}]),
        ));
        store
    }

    fn buffer_store() -> WindowStore {
        let mut store = WindowStore::new();
        store.declare(&decls(json!([{"id": 2, "type": "buffer"}])));
        store
    }

    #[test]
    fn test_grid_renders_exactly_height_lines() {
        let mut store = grid_store();
        let lines = store
            .apply(&content(json!({
                "id": 1,
                "lines": [{"line": 1, "content": [{"style": "normal", "text": "hello"}]}]
            })))
            .unwrap();
        assert_eq!(lines, vec!["]      ", "] hello", "]      "]);
    }

    #[test]
    fn test_grid_keeps_unmentioned_lines() {
        let mut store = grid_store();
        store
            .apply(&content(json!({
                "id": 1,
                "lines": [{"line": 1, "content": [{"style": "normal", "text": "hello"}]}]
            })))
            .unwrap();
        let lines = store
            .apply(&content(json!({
                "id": 1,
                "lines": [{"line": 0, "content": [{"style": "normal", "text": "top"}]}]
            })))
            .unwrap();
        assert_eq!(lines, vec!["] top", "] hello", "]      "]);
    }

    #[test]
    fn test_grid_line_out_of_range() {
        let mut store = grid_store();
        let err = store
            .apply(&content(json!({
                "id": 1,
                "lines": [{"line": 3, "content": []}]
            })))
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::LineOutOfRange {
                window: 1,
                line: 3,
                height: 3
            }
        ));
    }

    #[test]
    fn test_unknown_window() {
        let mut store = grid_store();
        let err = store.apply(&content(json!({"id": 9}))).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownWindow(9)));
    }

    #[test]
    fn test_buffer_renders_all_entries_then_keeps_last() {
        let mut store = buffer_store();
        let lines = store
            .apply(&content(json!({
                "id": 2,
                "text": [
                    {"content": [{"style": "normal", "text": "one"}]},
                    {"content": [{"style": "normal", "text": "two"}]}
                ]
            })))
            .unwrap();
        assert_eq!(lines, vec!["one", "two"]);

        // Only the final entry survives in state; a later update with no
        // new text re-emits just that entry.
        let lines = store.apply(&content(json!({"id": 2}))).unwrap();
        assert_eq!(lines, vec!["two"]);
    }

    #[test]
    fn test_buffer_clear_empties_before_items() {
        let mut store = buffer_store();
        store
            .apply(&content(json!({
                "id": 2,
                "text": [{"content": [{"style": "normal", "text": "stale"}]}]
            })))
            .unwrap();
        let lines = store
            .apply(&content(json!({
                "id": 2,
                "clear": true,
                "text": [{"content": [{"style": "normal", "text": "fresh"}]}]
            })))
            .unwrap();
        assert_eq!(lines, vec!["fresh"]);
    }

    #[test]
    fn test_buffer_append_starts_its_own_entry() {
        let mut store = buffer_store();
        store
            .apply(&content(json!({
                "id": 2,
                "text": [{"content": [{"style": "normal", "text": "first"}]}]
            })))
            .unwrap();
        let lines = store
            .apply(&content(json!({
                "id": 2,
                "text": [{"append": true, "content": [{"style": "normal", "text": "more"}]}]
            })))
            .unwrap();
        assert_eq!(lines, vec!["first", "more"]);
    }

    #[test]
    fn test_buffer_item_without_content_is_empty_entry() {
        let mut store = buffer_store();
        let lines = store
            .apply(&content(json!({"id": 2, "text": [{}]})))
            .unwrap();
        assert_eq!(lines, vec![""]);
    }

    #[test]
    fn test_redeclaring_resets_content() {
        let mut store = grid_store();
        store
            .apply(&content(json!({
                "id": 1,
                "lines": [{"line": 0, "content": [{"style": "normal", "text": "old"}]}]
            })))
            .unwrap();
        store.declare(&decls(
            json!([{"id": 1, "type": "grid", "width": 2, "height": 1}]),
        ));
        let lines = store.apply(&content(json!({"id": 1}))).unwrap();
        assert_eq!(lines, vec!["]   "]);
    }
}
