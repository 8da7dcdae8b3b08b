//! Property-based tests for the diff engine and the patch round trip.
//!
//! Inputs come from small alphabets so that random pairs share plenty of
//! structure and exercise matching, insertion and deletion together.

use proptest::prelude::*;
use seqdiff_core::change::{new_text, old_text};
use seqdiff_core::Strategy as TokenStrategy;
use seqdiff_core::{apply_patch, create_patch, diff_with, DiffEngine, Tokenizer};
use similar::{capture_diff_slices, Algorithm, DiffTag};

/// Line-oriented text: short lines, optional CRLF, optional final terminator
fn text_strategy() -> impl Strategy<Value = String> {
    "([ab]{0,3}(\n|\r\n)){0,12}[ab]{0,2}"
}

/// Prose-like text for the word and character strategies
fn prose_strategy() -> impl Strategy<Value = String> {
    "[ab ,.\n]{0,30}"
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

proptest! {
    /// Property: applying the patch created for (old, new) to old yields new.
    #[test]
    fn patch_round_trips(old in text_strategy(), new in text_strategy()) {
        let patch = create_patch("file.txt", &old, &new, None, None);
        prop_assert_eq!(apply_patch(&old, &patch), Ok(new));
    }

    /// Property: with exact token equality both texts can be read back out.
    #[test]
    fn exact_strategies_cover_both_sides(old in prose_strategy(), new in prose_strategy()) {
        for strategy in [
            TokenStrategy::Char,
            TokenStrategy::Line,
            TokenStrategy::WORDS_WITH_SPACE,
        ] {
            let script = diff_with(strategy, &old, &new);
            prop_assert_eq!(new_text(&script), new.clone());
            prop_assert_eq!(old_text(&script), old.clone());
        }
    }

    /// Property: whitespace-insensitive strategies keep the new text exactly and
    /// the old text up to whitespace.
    #[test]
    fn whitespace_insensitive_strategies_cover(old in prose_strategy(), new in prose_strategy()) {
        for strategy in [TokenStrategy::WORDS, TokenStrategy::Css] {
            let script = diff_with(strategy, &old, &new);
            prop_assert_eq!(new_text(&script), new.clone());
            prop_assert_eq!(strip_whitespace(&old_text(&script)), strip_whitespace(&old));
        }
    }

    /// Property: neighbouring components never share a change kind.
    #[test]
    fn no_adjacent_components_share_a_kind(old in prose_strategy(), new in prose_strategy()) {
        for strategy in [
            TokenStrategy::Char,
            TokenStrategy::WORDS,
            TokenStrategy::WORDS_WITH_SPACE,
            TokenStrategy::Line,
            TokenStrategy::Css,
        ] {
            let script = diff_with(strategy, &old, &new);
            for pair in script.windows(2) {
                prop_assert_ne!(pair[0].kind, pair[1].kind);
            }
        }
    }

    /// Property: the edit script is never longer than the one `similar` finds.
    #[test]
    fn edit_length_is_minimal(old in prose_strategy(), new in prose_strategy()) {
        let engine = DiffEngine::new().with_strategy(TokenStrategy::Char);
        let stats = engine.stats(&old, &new);

        let old_tokens = TokenStrategy::Char.tokenize(&old);
        let new_tokens = TokenStrategy::Char.tokenize(&new);
        let reference: usize = capture_diff_slices(Algorithm::Myers, &old_tokens, &new_tokens)
            .iter()
            .map(|op| {
                let (tag, old_range, new_range) = op.as_tag_tuple();
                match tag {
                    DiffTag::Equal => 0,
                    DiffTag::Delete => old_range.len(),
                    DiffTag::Insert => new_range.len(),
                    DiffTag::Replace => old_range.len() + new_range.len(),
                }
            })
            .sum();

        prop_assert!(stats.insertions + stats.deletions <= reference);
    }
}
