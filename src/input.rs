//! Input resolution
//!
//! Tracks the pending input requests and the protocol generation, and
//! translates a raw user line into the typed response the interpreter
//! expects. The pending set is replaced wholesale on every update, never
//! merged.

use crate::core::proto::{InputKind, InputRequest, ProtocolError, Response, SpecialInput};

/// One pending request, normalized from either wire shape.
#[derive(Debug, Clone)]
struct PendingRequest {
    kind: InputKind,
    window: Option<u32>,
    gen: u64,
}

/// Owns the pending-request set and the current generation.
#[derive(Debug, Default)]
pub struct InputResolver {
    pending: Vec<PendingRequest>,
    generation: u64,
}

impl InputResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt the generation carried by an update. It is echoed verbatim
    /// in every subsequent response.
    pub fn set_generation(&mut self, gen: u64) {
        self.generation = gen;
    }

    /// Replace the pending set from an update's `input` list.
    pub fn set_pending(&mut self, requests: &[InputRequest]) {
        self.pending = requests
            .iter()
            .map(|request| PendingRequest {
                kind: request.kind,
                window: request.id,
                gen: request.gen,
            })
            .collect();
    }

    /// Replace the pending set with a single special request, tagged with
    /// the current generation. Returns the prompt to show the user.
    pub fn set_special(&mut self, special: &SpecialInput) -> String {
        self.pending = vec![PendingRequest {
            kind: special.kind,
            window: None,
            gen: self.generation,
        }];
        format!(
            "Enter a {} filename to {}:",
            special.filetype, special.filemode
        )
    }

    /// Resolve a raw user line into a response message.
    ///
    /// The first pending `line` or `char` request wins; a file reference
    /// prompt anywhere in the set is the fallback. With no match the
    /// input cannot be delivered and the session is desynchronized.
    pub fn resolve(&self, raw: &str) -> Result<Response, ProtocolError> {
        let mut special_gen = None;
        for request in &self.pending {
            match (request.kind, request.window) {
                (InputKind::Line, Some(window)) => {
                    return Ok(Response::Line {
                        gen: request.gen,
                        window,
                        value: raw.to_string(),
                    });
                }
                (InputKind::Char, Some(window)) => {
                    return Ok(Response::Char {
                        gen: request.gen,
                        window,
                        value: char_value(raw),
                    });
                }
                (InputKind::FilerefPrompt, _) => special_gen = Some(request.gen),
                _ => {}
            }
        }
        if let Some(gen) = special_gen {
            return Ok(Response::Special {
                gen,
                response: "fileref_prompt".to_string(),
                value: raw.to_string(),
            });
        }
        Err(ProtocolError::UnresolvableInput(raw.to_string()))
    }
}

/// Derive the single-character-or-keyword value for a char request.
///
/// An empty line means Return. A leading slash escapes non-printable
/// keys: a single token sends the token minus the slash, two tokens send
/// the second one, and the token `space` maps to a literal space. Any
/// other input sends its first character.
fn char_value(raw: &str) -> String {
    if raw.is_empty() {
        return "return".to_string();
    }
    if let Some(stripped) = raw.strip_prefix('/') {
        let mut tokens = raw.split(' ');
        tokens.next();
        let value = tokens.next().unwrap_or(stripped);
        return if value == "space" {
            " ".to_string()
        } else {
            value.to_string()
        };
    }
    raw.chars().next().map(String::from).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_request(id: u32, gen: u64) -> InputRequest {
        InputRequest {
            id: Some(id),
            gen,
            kind: InputKind::Char,
        }
    }

    fn line_request(id: u32, gen: u64) -> InputRequest {
        InputRequest {
            id: Some(id),
            gen,
            kind: InputKind::Line,
        }
    }

    #[test]
    fn test_line_input_passes_through() {
        let mut resolver = InputResolver::new();
        resolver.set_pending(&[line_request(2, 5)]);
        assert_eq!(
            resolver.resolve("go north").unwrap(),
            Response::Line {
                gen: 5,
                window: 2,
                value: "go north".to_string(),
            }
        );
    }

    #[test]
    fn test_char_empty_input_is_return() {
        let mut resolver = InputResolver::new();
        resolver.set_pending(&[char_request(7, 3)]);
        assert_eq!(
            resolver.resolve("").unwrap(),
            Response::Char {
                gen: 3,
                window: 7,
                value: "return".to_string(),
            }
        );
    }

    #[test]
    fn test_char_slash_escapes() {
        let mut resolver = InputResolver::new();
        resolver.set_pending(&[char_request(7, 3)]);

        let value = |raw: &str| match resolver.resolve(raw).unwrap() {
            Response::Char { value, .. } => value,
            other => panic!("unexpected response: {:?}", other),
        };

        assert_eq!(value("/space"), " ");
        assert_eq!(value("/up"), "up");
        assert_eq!(value("/x enter"), "enter");
        assert_eq!(value("/x space"), " ");
    }

    #[test]
    fn test_char_takes_first_character_only() {
        let mut resolver = InputResolver::new();
        resolver.set_pending(&[char_request(7, 3)]);
        assert_eq!(
            resolver.resolve("hello").unwrap(),
            Response::Char {
                gen: 3,
                window: 7,
                value: "h".to_string(),
            }
        );
    }

    #[test]
    fn test_first_line_or_char_request_wins() {
        let mut resolver = InputResolver::new();
        resolver.set_pending(&[char_request(1, 4), line_request(2, 4)]);
        assert!(matches!(
            resolver.resolve("x").unwrap(),
            Response::Char { window: 1, .. }
        ));
    }

    #[test]
    fn test_special_request_resolves_as_fileref() {
        let mut resolver = InputResolver::new();
        resolver.set_generation(7);
        let prompt = resolver.set_special(&SpecialInput {
            kind: InputKind::FilerefPrompt,
            filetype: "save".to_string(),
            filemode: "write".to_string(),
        });
        assert_eq!(prompt, "Enter a save filename to write:");
        assert_eq!(
            resolver.resolve("story.sav").unwrap(),
            Response::Special {
                gen: 7,
                response: "fileref_prompt".to_string(),
                value: "story.sav".to_string(),
            }
        );
    }

    #[test]
    fn test_pending_set_is_replaced_wholesale() {
        let mut resolver = InputResolver::new();
        resolver.set_pending(&[line_request(2, 5)]);
        resolver.set_pending(&[char_request(9, 6)]);
        assert!(matches!(
            resolver.resolve("x").unwrap(),
            Response::Char { window: 9, gen: 6, .. }
        ));
    }

    #[test]
    fn test_no_pending_request_is_an_error() {
        let resolver = InputResolver::new();
        assert!(matches!(
            resolver.resolve("look"),
            Err(ProtocolError::UnresolvableInput(_))
        ));
    }
}
