//! Seqdiff Core - token diffs and unified patches
//!
//! This library computes minimal edit scripts between two texts at
//! character, word, line or CSS-token granularity, renders line-level
//! changes as unified diffs, and applies such diffs back onto text.

pub mod apply;
pub mod change;
pub mod convert;
pub mod diff;
pub mod format;
pub mod patch;
pub mod tokenize;

pub use apply::{apply_document, apply_patch, ApplyError};
pub use change::{ChangeKind, Component, ComponentError, DiffStats, EditScript};
pub use convert::{changes_to_html, changes_to_tuples};
pub use diff::{diff_sequences, push_component, DiffEngine, Edit};
pub use format::{create_patch, structured_patch};
pub use patch::{Hunk, HunkLine, LineTag, PatchDocument, NO_NEWLINE_MARKER};
pub use tokenize::{Strategy, Tokenizer};

/// Diff two texts with the given strategy
pub fn diff_with(strategy: Strategy, old: &str, new: &str) -> EditScript {
    DiffEngine::new()
        .with_strategy(strategy)
        .diff_strings(old, new)
}

/// Character-level diff
pub fn diff_chars(old: &str, new: &str) -> EditScript {
    diff_with(Strategy::Char, old, new)
}

/// Word-level diff; differences in whitespace alone are not changes
pub fn diff_words(old: &str, new: &str) -> EditScript {
    diff_with(Strategy::WORDS, old, new)
}

/// Word-level diff that compares whitespace literally
pub fn diff_words_with_space(old: &str, new: &str) -> EditScript {
    diff_with(Strategy::WORDS_WITH_SPACE, old, new)
}

/// Line-level diff, terminators included in each token
pub fn diff_lines(old: &str, new: &str) -> EditScript {
    diff_with(Strategy::Line, old, new)
}

/// CSS-token diff, whitespace-insensitive
pub fn diff_css(old: &str, new: &str) -> EditScript {
    diff_with(Strategy::Css, old, new)
}

/// Line insertions and deletions between two texts
pub fn line_stats(old: &str, new: &str) -> DiffStats {
    DiffEngine::new()
        .with_strategy(Strategy::Line)
        .stats(old, new)
}
