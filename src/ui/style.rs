//! Style rendering
//!
//! Maps styled text runs to markup. This is a pure dispatch table: no
//! state, no side effects.

use crate::core::proto::TextRun;

/// Render one styled run.
///
/// `input` echoes are never rendered. Styles outside the known set are
/// wrapped in a generic tag named after the style.
pub fn render(run: &TextRun) -> String {
    match run.style.as_str() {
        "header" | "subheader" | "alert" => format!("**{}**", run.text),
        "input" => String::new(),
        "normal" | "preformatted" => run.text.clone(),
        "emphasized" => format!("*{}*", run.text),
        "user1" => format!("_{}_", run.text),
        "user2" => format!("[{}]", run.text),
        other => format!("<{}>{}</{}>", other, run.text, other),
    }
}

/// Concatenate rendered runs in declared order.
pub fn render_all(runs: &[TextRun]) -> String {
    runs.iter().map(render).collect()
}
