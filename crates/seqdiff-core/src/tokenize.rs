//! Tokenizer strategies: how raw text is cut into comparable units

use regex::Regex;
use std::sync::LazyLock;

/// Whitespace runs and word boundaries; separators are kept as tokens.
static WORD_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+|\b").expect("word split pattern is valid"));

/// CSS punctuation and whitespace runs; separators are kept as tokens.
static CSS_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[{}:;,]|\s+").expect("css split pattern is valid"));

/// Capability shared by every strategy: cut, compare, glue.
pub trait Tokenizer {
    /// Split `text` into an ordered token sequence borrowing from it
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str>;

    /// Token equality used by the diff search
    fn equals(&self, left: &str, right: &str) -> bool {
        left == right
    }

    /// Append `token` to an accumulated component value
    fn join(&self, acc: &mut String, token: &str) {
        acc.push_str(token);
    }
}

/// The closed set of tokenization strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One token per character
    Char,
    /// Words, whitespace runs and punctuation. With `ignore_whitespace`,
    /// any two whitespace-only tokens compare equal.
    Word { ignore_whitespace: bool },
    /// One token per line, terminator included
    Line,
    /// CSS-like tokens split on `{ } : ; ,` and whitespace; whitespace-insensitive
    Css,
}

impl Strategy {
    pub const WORDS: Strategy = Strategy::Word {
        ignore_whitespace: true,
    };
    pub const WORDS_WITH_SPACE: Strategy = Strategy::Word {
        ignore_whitespace: false,
    };

    fn ignores_whitespace(self) -> bool {
        match self {
            Strategy::Word { ignore_whitespace } => ignore_whitespace,
            Strategy::Css => true,
            Strategy::Char | Strategy::Line => false,
        }
    }
}

impl Tokenizer for Strategy {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self {
            Strategy::Char => text
                .char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect(),
            Strategy::Word { .. } => split_keeping(&WORD_SPLIT, text),
            // Lines end at '\n' only, so a CRLF pair always stays in one token
            Strategy::Line => text.split_inclusive('\n').collect(),
            Strategy::Css => split_keeping(&CSS_SPLIT, text),
        }
    }

    fn equals(&self, left: &str, right: &str) -> bool {
        if self.ignores_whitespace() && is_blank(left) && is_blank(right) {
            return true;
        }
        left == right
    }
}

fn is_blank(token: &str) -> bool {
    token.chars().all(char::is_whitespace)
}

/// Split on `pattern`, keeping both the separators and the text between them,
/// and drop empty pieces.
fn split_keeping<'a>(pattern: &Regex, text: &'a str) -> Vec<&'a str> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(text) {
        tokens.push(&text[last..m.start()]);
        tokens.push(m.as_str());
        last = m.end();
    }
    tokens.push(&text[last..]);
    tokens.retain(|t| !t.is_empty());
    tokens
}
