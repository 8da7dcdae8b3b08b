//! Patch application

use crate::patch::{Hunk, PatchDocument};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("Hunk {hunk} does not match line {line}: expected {expected:?}, found {found:?}")]
    ContextMismatch {
        hunk: usize,
        line: usize,
        expected: Option<String>,
        found: String,
    },
    #[error("Hunk {hunk} covers lines {start}..{end} but the text has {len} lines")]
    OutOfRange {
        hunk: usize,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("Hunk {hunk} overlaps or precedes the hunk before it")]
    Overlapping { hunk: usize },
}

/// Parse `patch` and apply it to `base`
pub fn apply_patch(base: &str, patch: &str) -> Result<String, ApplyError> {
    apply_document(base, &PatchDocument::parse(patch))
}

/// Apply a parsed patch to `base`.
///
/// Every hunk is checked against `base` before anything is spliced, so a
/// mismatch anywhere leaves no partial result.
pub fn apply_document(base: &str, document: &PatchDocument) -> Result<String, ApplyError> {
    let mut lines: Vec<&str> = base.split('\n').collect();

    let mut floor = 0;
    for (index, hunk) in document.hunks.iter().enumerate() {
        floor = verify_hunk(&lines, hunk, index, floor).inspect_err(|err| {
            debug!(error = %err, "patch rejected");
        })?;
    }

    // Bottom to top, so earlier hunks keep their line numbers
    for hunk in document.hunks.iter().rev() {
        let start = hunk.old_start.saturating_sub(1);
        lines.splice(start..start + hunk.old_count, hunk.new_lines());
    }

    if document.new_missing_newline() {
        while lines.last() == Some(&"") {
            lines.pop();
        }
    } else if document.old_missing_newline() {
        lines.push("");
    }

    Ok(lines.join("\n"))
}

/// Check one hunk's old side against the base; returns the end of its range.
fn verify_hunk(
    lines: &[&str],
    hunk: &Hunk,
    index: usize,
    floor: usize,
) -> Result<usize, ApplyError> {
    let start = hunk.old_start.saturating_sub(1);
    if start < floor {
        return Err(ApplyError::Overlapping { hunk: index });
    }

    let end = start.saturating_add(hunk.old_count);
    if end > lines.len() {
        return Err(ApplyError::OutOfRange {
            hunk: index,
            start: start + 1,
            end,
            len: lines.len(),
        });
    }

    let mut expected = hunk.old_lines();
    for (offset, found) in lines[start..end].iter().enumerate() {
        match expected.next() {
            Some(line) if line == *found => {}
            other => {
                return Err(ApplyError::ContextMismatch {
                    hunk: index,
                    line: start + offset + 1,
                    expected: other.map(str::to_string),
                    found: found.to_string(),
                })
            }
        }
    }

    Ok(end)
}
