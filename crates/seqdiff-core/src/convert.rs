//! Output converters for edit scripts

use crate::change::{ChangeKind, Component};

/// Render a script as inline markup: insertions in `<ins>`, deletions in
/// `<del>` (escaped), unchanged text passed through as-is.
pub fn changes_to_html(changes: &[Component]) -> String {
    let mut out = String::new();
    for change in changes {
        match change.kind {
            ChangeKind::Insert => {
                out.push_str("<ins>");
                out.push_str(&escape_html(&change.value));
                out.push_str("</ins>");
            }
            ChangeKind::Delete => {
                out.push_str("<del>");
                out.push_str(&escape_html(&change.value));
                out.push_str("</del>");
            }
            ChangeKind::Equal => out.push_str(&change.value),
        }
    }
    out
}

/// Flatten a script into `(kind, value)` pairs: `1` added, `-1` removed, `0` unchanged
pub fn changes_to_tuples(changes: &[Component]) -> Vec<(i8, String)> {
    changes
        .iter()
        .map(|c| (c.kind.sign(), c.value.clone()))
        .collect()
}

fn escape_html(text: &str) -> String {
    // '&' first, or the entities below would be escaped twice
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
