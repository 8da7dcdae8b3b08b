//! Unified diff generation from a line-level edit script

use crate::change::{ChangeKind, Component};
use crate::diff::DiffEngine;
use crate::patch::{Hunk, HunkLine, LineTag, PatchDocument};
use crate::tokenize::Strategy;
use tracing::trace;

/// Context lines kept before and after a change
const CONTEXT_LINES: usize = 4;
/// Unchanged runs up to this length are folded into the surrounding hunk
const MERGE_GAP: usize = 2 * CONTEXT_LINES;

/// A component split into lines, terminators stripped
struct Block<'a> {
    kind: ChangeKind,
    lines: Vec<&'a str>,
    terminated: bool,
}

impl<'a> Block<'a> {
    fn new(component: &'a Component) -> Self {
        let value = component.value.as_str();
        let body = value.strip_suffix('\n').unwrap_or(value);
        Self {
            kind: component.kind,
            lines: body.split('\n').collect(),
            terminated: value.ends_with('\n'),
        }
    }

    fn sentinel() -> Self {
        Self {
            kind: ChangeKind::Equal,
            lines: Vec::new(),
            terminated: false,
        }
    }

    fn tag(&self) -> LineTag {
        match self.kind {
            ChangeKind::Insert => LineTag::Add,
            ChangeKind::Delete => LineTag::Remove,
            ChangeKind::Equal => LineTag::Context,
        }
    }
}

/// Build the patch document describing `old` -> `new`
pub fn structured_patch(
    file_label: &str,
    old: &str,
    new: &str,
    old_header: Option<&str>,
    new_header: Option<&str>,
) -> PatchDocument {
    let mut script = DiffEngine::new()
        .with_strategy(Strategy::Line)
        .diff_strings(old, new);
    if script.last().is_some_and(|c| c.value.is_empty()) {
        script.pop();
    }

    let mut blocks: Vec<Block> = script.iter().map(Block::new).collect();
    blocks.push(Block::sentinel());

    let hunks = collect_hunks(&blocks);
    trace!(hunks = hunks.len(), file = file_label, "formatted patch");

    PatchDocument {
        file_label: file_label.to_string(),
        old_header: old_header.map(str::to_string),
        new_header: new_header.map(str::to_string),
        hunks,
    }
}

/// Render the unified diff text for `old` -> `new`
pub fn create_patch(
    file_label: &str,
    old: &str,
    new: &str,
    old_header: Option<&str>,
    new_header: Option<&str>,
) -> String {
    structured_patch(file_label, old, new, old_header, new_header).to_string()
}

/// Whether block `i` holds the unterminated final line of either side.
///
/// `blocks` ends with the sentinel, so the final real block sits at
/// `len - 2`; the other side's final line can only sit right before it.
fn missing_newline(blocks: &[Block], i: usize) -> bool {
    let Some(last) = blocks.len().checked_sub(2) else {
        return false;
    };
    let current = &blocks[i];
    let is_last = i == last;
    let is_last_of_kind = i + 3 == blocks.len() && current.kind != blocks[last].kind;
    !current.terminated && (is_last || is_last_of_kind)
}

fn mark_missing_newline(lines: &mut [HunkLine], blocks: &[Block], i: usize) {
    if missing_newline(blocks, i) {
        if let Some(line) = lines.last_mut() {
            line.no_newline = true;
        }
    }
}

fn collect_hunks(blocks: &[Block]) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut range: Option<(usize, usize)> = None;
    let mut current: Vec<HunkLine> = Vec::new();
    let mut old_line = 1;
    let mut new_line = 1;

    for (i, block) in blocks.iter().enumerate() {
        if block.kind != ChangeKind::Equal {
            if range.is_none() {
                let mut old_start = old_line;
                let mut new_start = new_line;
                if let Some(prev) = i.checked_sub(1).map(|p| &blocks[p]) {
                    let context = &prev.lines[prev.lines.len().saturating_sub(CONTEXT_LINES)..];
                    current = context.iter().map(|l| HunkLine::context(*l)).collect();
                    old_start -= context.len();
                    new_start -= context.len();
                }
                range = Some((old_start, new_start));
            }

            let tag = block.tag();
            current.extend(block.lines.iter().map(|l| HunkLine::new(tag, *l)));
            mark_missing_newline(&mut current, blocks, i);

            if block.kind == ChangeKind::Insert {
                new_line += block.lines.len();
            } else {
                old_line += block.lines.len();
            }
            continue;
        }

        if let Some((old_start, new_start)) = range {
            if block.lines.len() <= MERGE_GAP && i + 2 < blocks.len() {
                // Another change follows closely; keep the hunk open
                current.extend(block.lines.iter().map(|l| HunkLine::context(*l)));
            } else {
                let context_size = block.lines.len().min(CONTEXT_LINES);
                let mut lines = std::mem::take(&mut current);
                lines.extend(
                    block.lines[..context_size]
                        .iter()
                        .map(|l| HunkLine::context(*l)),
                );
                if block.lines.len() <= CONTEXT_LINES {
                    mark_missing_newline(&mut lines, blocks, i);
                }

                hunks.push(Hunk {
                    old_start,
                    old_count: old_line - old_start + context_size,
                    new_start,
                    new_count: new_line - new_start + context_size,
                    lines,
                });
                range = None;
            }
        }
        old_line += block.lines.len();
        new_line += block.lines.len();
    }

    hunks
}
