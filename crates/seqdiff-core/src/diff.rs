//! Diff computation engine
//!
//! A greedy Myers search over token sequences. For every edit length `d` the
//! furthest-reaching path on each diagonal `k = new_pos - old_pos` is kept;
//! paths share their history through a persistent trail, so branching onto a
//! new diagonal is a pointer copy rather than a list copy.

use crate::change::{ChangeKind, Component, DiffStats, EditScript};
use crate::tokenize::{Strategy, Tokenizer};
use std::rc::Rc;
use tracing::trace;

/// A run of `len` consecutive tokens sharing one change kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub kind: ChangeKind,
    pub len: usize,
}

struct Step {
    edit: Edit,
    prev: Option<Rc<Step>>,
}

/// Persistent, append-only history of a search path
#[derive(Clone, Default)]
struct Trail {
    head: Option<Rc<Step>>,
}

impl Trail {
    fn push(&mut self, kind: ChangeKind, len: usize) {
        if len == 0 {
            return;
        }
        let prev = self.head.take();
        self.head = Some(Rc::new(Step {
            edit: Edit { kind, len },
            prev,
        }));
    }

    /// Runs in order, adjacent runs of the same kind coalesced
    fn edits(&self) -> Vec<Edit> {
        let mut steps = Vec::new();
        let mut cursor = self.head.as_deref();
        while let Some(step) = cursor {
            steps.push(step.edit);
            cursor = step.prev.as_deref();
        }

        let mut edits: Vec<Edit> = Vec::with_capacity(steps.len());
        for edit in steps.into_iter().rev() {
            match edits.last_mut() {
                Some(last) if last.kind == edit.kind => last.len += edit.len,
                _ => edits.push(edit),
            }
        }
        edits
    }
}

impl Drop for Trail {
    // Unlink iteratively; long unshared chains would otherwise drop recursively
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(step) = next {
            match Rc::try_unwrap(step) {
                Ok(mut step) => next = step.prev.take(),
                Err(_) => break,
            }
        }
    }
}

#[derive(Clone)]
struct Path {
    /// Index of the last consumed token of the new sequence (-1 before any)
    new_pos: isize,
    trail: Trail,
}

/// Compute the shortest edit script between two token sequences.
///
/// Runs are returned in search order: within a block of changes an insertion
/// may precede the deletion it pairs with. Text-level callers normalise this
/// through the component merger.
pub fn diff_sequences<T, F>(old: &[T], new: &[T], eq: F) -> Vec<Edit>
where
    F: Fn(&T, &T) -> bool,
{
    let old_len = old.len() as isize;
    let new_len = new.len() as isize;
    let max_edit_length = old_len + new_len;

    // Diagonals k-1 and k+1 are read for every k in [-d, d]
    let offset = max_edit_length + 1;
    let slot = |diagonal: isize| (diagonal + offset) as usize;
    let mut best_path: Vec<Option<Path>> = (0..2 * offset + 1).map(|_| None).collect();

    let mut seed = Path {
        new_pos: -1,
        trail: Trail::default(),
    };
    let old_pos = extract_common(&mut seed, old, new, 0, &eq);
    if seed.new_pos + 1 >= new_len && old_pos + 1 >= old_len {
        trace!(edit_length = 0, "sequences are equal");
        return seed.trail.edits();
    }
    best_path[slot(0)] = Some(seed);

    for edit_length in 1..=max_edit_length {
        for diagonal in (-edit_length..=edit_length).step_by(2) {
            // Nothing reads diagonal k-1 again this round
            let add_path = best_path[slot(diagonal - 1)].take();
            let remove_reach = best_path[slot(diagonal + 1)].as_ref().map(|p| p.new_pos);
            let old_pos = remove_reach.unwrap_or(0) - diagonal;

            let can_add = add_path.as_ref().is_some_and(|p| p.new_pos + 1 < new_len);
            let can_remove = remove_reach.is_some() && 0 <= old_pos && old_pos < old_len;
            if !can_add && !can_remove {
                best_path[slot(diagonal)] = None;
                continue;
            }

            // Branch from the insertion side unless the deletion side reaches
            // strictly further into the new sequence
            let base = match add_path {
                Some(mut path)
                    if can_add
                        && !(can_remove && remove_reach.is_some_and(|r| path.new_pos < r)) =>
                {
                    path.new_pos += 1;
                    path.trail.push(ChangeKind::Insert, 1);
                    Some(path)
                }
                _ => best_path[slot(diagonal + 1)].clone().map(|mut path| {
                    path.trail.push(ChangeKind::Delete, 1);
                    path
                }),
            };
            let Some(mut base) = base else {
                continue;
            };

            let old_pos = extract_common(&mut base, old, new, diagonal, &eq);
            if base.new_pos + 1 >= new_len && old_pos + 1 >= old_len {
                trace!(edit_length, "shortest edit script found");
                return base.trail.edits();
            }
            best_path[slot(diagonal)] = Some(base);
        }
    }

    // Every pair of sequences is reached by d = old_len + new_len
    [
        Edit {
            kind: ChangeKind::Delete,
            len: old.len(),
        },
        Edit {
            kind: ChangeKind::Insert,
            len: new.len(),
        },
    ]
    .into_iter()
    .filter(|e| e.len > 0)
    .collect()
}

/// Follow the diagonal while tokens match; returns the resulting old position.
fn extract_common<T, F>(path: &mut Path, old: &[T], new: &[T], diagonal: isize, eq: &F) -> isize
where
    F: Fn(&T, &T) -> bool,
{
    let old_len = old.len() as isize;
    let new_len = new.len() as isize;
    let mut new_pos = path.new_pos;
    let mut old_pos = new_pos - diagonal;
    let mut common = 0;

    while new_pos + 1 < new_len
        && old_pos + 1 < old_len
        && eq(&old[(old_pos + 1) as usize], &new[(new_pos + 1) as usize])
    {
        new_pos += 1;
        old_pos += 1;
        common += 1;
    }

    path.trail.push(ChangeKind::Equal, common);
    path.new_pos = new_pos;
    old_pos
}

/// Append one token to a component list, coalescing with the last component
/// when it has the same kind.
///
/// A deletion arriving right after an insertion is placed ahead of it (joining
/// an earlier deletion if there is one), so change blocks always read removed
/// content first and no two neighbours share a kind.
pub fn push_component<T>(
    components: &mut Vec<Component>,
    tokenizer: &T,
    kind: ChangeKind,
    token: &str,
) where
    T: Tokenizer + ?Sized,
{
    if let Some(last) = components.last_mut() {
        if last.kind == kind {
            tokenizer.join(&mut last.value, token);
            return;
        }
    }

    let len = components.len();
    if kind == ChangeKind::Delete && len > 0 && components[len - 1].kind == ChangeKind::Insert {
        if len > 1 && components[len - 2].kind == ChangeKind::Delete {
            tokenizer.join(&mut components[len - 2].value, token);
        } else {
            components.insert(len - 1, Component::delete(token));
        }
        return;
    }

    components.push(Component::new(kind, token));
}

/// The main diff engine
#[derive(Debug, Clone, Copy)]
pub struct DiffEngine {
    strategy: Strategy,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self {
            strategy: Strategy::Line,
        }
    }
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Compute the edit script between two strings
    pub fn diff_strings(&self, old: &str, new: &str) -> EditScript {
        // Degenerate cases are decided on the raw text, before tokenizing
        if old == new {
            return vec![Component::equal(new)];
        }
        if new.is_empty() {
            return vec![Component::delete(old)];
        }
        if old.is_empty() {
            return vec![Component::insert(new)];
        }

        let old_tokens = self.strategy.tokenize(old);
        let new_tokens = self.strategy.tokenize(new);
        let edits = diff_sequences(&old_tokens, &new_tokens, |a, b| self.strategy.equals(a, b));
        self.build_components(&edits, &old_tokens, &new_tokens)
    }

    fn build_components(&self, edits: &[Edit], old: &[&str], new: &[&str]) -> EditScript {
        let mut components = Vec::new();
        let mut old_pos = 0;
        let mut new_pos = 0;

        for edit in edits {
            let tokens = match edit.kind {
                // Unchanged runs carry the new text's tokens
                ChangeKind::Equal => {
                    old_pos += edit.len;
                    new_pos += edit.len;
                    &new[new_pos - edit.len..new_pos]
                }
                ChangeKind::Insert => {
                    new_pos += edit.len;
                    &new[new_pos - edit.len..new_pos]
                }
                ChangeKind::Delete => {
                    old_pos += edit.len;
                    &old[old_pos - edit.len..old_pos]
                }
            };
            for token in tokens {
                push_component(&mut components, &self.strategy, edit.kind, token);
            }
        }

        components
    }

    /// Count inserted and deleted tokens between two strings
    pub fn stats(&self, old: &str, new: &str) -> DiffStats {
        if old == new {
            return DiffStats::default();
        }
        let old_tokens = self.strategy.tokenize(old);
        let new_tokens = self.strategy.tokenize(new);
        diff_sequences(&old_tokens, &new_tokens, |a, b| self.strategy.equals(a, b))
            .iter()
            .fold(DiffStats::default(), |mut stats, edit| {
                match edit.kind {
                    ChangeKind::Insert => stats.insertions += edit.len,
                    ChangeKind::Delete => stats.deletions += edit.len,
                    ChangeKind::Equal => {}
                }
                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(old: &str, new: &str) -> EditScript {
        DiffEngine::new()
            .with_strategy(Strategy::Char)
            .diff_strings(old, new)
    }

    #[test]
    fn test_simple_char_diff() {
        assert_eq!(
            chars("abc", "abd"),
            vec![
                Component::equal("ab"),
                Component::delete("c"),
                Component::insert("d"),
            ]
        );
    }

    #[test]
    fn test_no_changes() {
        assert_eq!(chars("same", "same"), vec![Component::equal("same")]);
        assert_eq!(chars("", ""), vec![Component::equal("")]);
    }

    #[test]
    fn test_empty_sides() {
        assert_eq!(chars("abc", ""), vec![Component::delete("abc")]);
        assert_eq!(chars("", "abc"), vec![Component::insert("abc")]);
    }

    #[test]
    fn test_line_diff() {
        let result = DiffEngine::new().diff_strings("a\nb\nc\n", "a\nx\nc\n");
        assert_eq!(
            result,
            vec![
                Component::equal("a\n"),
                Component::delete("b\n"),
                Component::insert("x\n"),
                Component::equal("c\n"),
            ]
        );
    }

    #[test]
    fn test_default_strategy_is_line() {
        assert_eq!(DiffEngine::new().strategy(), Strategy::Line);
        let engine = DiffEngine::new().with_strategy(Strategy::Css);
        assert_eq!(engine.strategy(), Strategy::Css);
    }

    #[test]
    fn test_lone_carriage_return_is_not_a_line_end() {
        // Only '\n' ends a line, so "a\rb" is one line and changes as a whole
        let result = DiffEngine::new().diff_strings("a\rb\n", "a\rc\n");
        assert_eq!(
            result,
            vec![Component::delete("a\rb\n"), Component::insert("a\rc\n")]
        );
    }

    #[test]
    fn test_pure_insertion_and_deletion() {
        assert_eq!(
            chars("ac", "abc"),
            vec![
                Component::equal("a"),
                Component::insert("b"),
                Component::equal("c"),
            ]
        );
        assert_eq!(
            chars("abc", "ac"),
            vec![
                Component::equal("a"),
                Component::delete("b"),
                Component::equal("c"),
            ]
        );
    }

    #[test]
    fn test_sequences_generic() {
        let edits = diff_sequences(&[1, 2, 3], &[1, 3, 4], |a, b| a == b);
        let inserted: usize = edits
            .iter()
            .filter(|e| e.kind == ChangeKind::Insert)
            .map(|e| e.len)
            .sum();
        let deleted: usize = edits
            .iter()
            .filter(|e| e.kind == ChangeKind::Delete)
            .map(|e| e.len)
            .sum();
        assert_eq!((inserted, deleted), (1, 1));
        assert_eq!(
            edits[0],
            Edit {
                kind: ChangeKind::Equal,
                len: 1,
            }
        );
    }

    #[test]
    fn test_sequences_empty() {
        assert!(diff_sequences::<u8, _>(&[], &[], |a, b| a == b).is_empty());
        assert_eq!(
            diff_sequences(&[1, 2], &[], |a: &i32, b| a == b),
            vec![Edit {
                kind: ChangeKind::Delete,
                len: 2,
            }]
        );
        assert_eq!(
            diff_sequences(&[], &[7], |a: &i32, b| a == b),
            vec![Edit {
                kind: ChangeKind::Insert,
                len: 1,
            }]
        );
    }

    #[test]
    fn test_sequences_search_order_prefers_insertion() {
        // The search records the insertion first; the merger reorders it
        let edits = diff_sequences(&['a', 'b', 'c'], &['a', 'b', 'd'], |a, b| a == b);
        assert_eq!(
            edits,
            vec![
                Edit {
                    kind: ChangeKind::Equal,
                    len: 2,
                },
                Edit {
                    kind: ChangeKind::Insert,
                    len: 1,
                },
                Edit {
                    kind: ChangeKind::Delete,
                    len: 1,
                },
            ]
        );
    }

    #[test]
    fn test_push_component_coalesces() {
        let mut components = Vec::new();
        push_component(&mut components, &Strategy::Char, ChangeKind::Equal, "a");
        push_component(&mut components, &Strategy::Char, ChangeKind::Equal, "b");
        push_component(&mut components, &Strategy::Char, ChangeKind::Insert, "c");
        assert_eq!(components, vec![Component::equal("ab"), Component::insert("c")]);
    }

    #[test]
    fn test_push_component_removal_goes_first() {
        let mut components = vec![Component::equal("a"), Component::insert("x")];
        push_component(&mut components, &Strategy::Char, ChangeKind::Delete, "b");
        assert_eq!(
            components,
            vec![Component::equal("a"), Component::delete("b"), Component::insert("x")]
        );

        push_component(&mut components, &Strategy::Char, ChangeKind::Insert, "y");
        push_component(&mut components, &Strategy::Char, ChangeKind::Delete, "c");
        assert_eq!(
            components,
            vec![Component::equal("a"), Component::delete("bc"), Component::insert("xy")]
        );
    }

    #[test]
    fn test_no_adjacent_same_kind() {
        let result = chars("kitten sitting", "sitting kitten");
        for pair in result.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[test]
    fn test_stats() {
        let engine = DiffEngine::new();
        let stats = engine.stats("foo\nbar\nbaz", "foo\nqux\nbaz");
        assert_eq!(
            stats,
            DiffStats {
                insertions: 1,
                deletions: 1,
            }
        );
        assert!(engine.stats("same\n", "same\n").is_empty());
        assert_eq!(engine.stats("", "a\nb\n").insertions, 2);
    }

    #[test]
    fn test_long_common_prefix() {
        let old: String = "x\n".repeat(5000) + "old\n";
        let new: String = "x\n".repeat(5000) + "new\n";
        let result = DiffEngine::new().diff_strings(&old, &new);
        assert_eq!(result.len(), 3);
        assert_eq!(result[1], Component::delete("old\n"));
        assert_eq!(result[2], Component::insert("new\n"));
    }
}
