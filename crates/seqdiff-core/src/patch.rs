//! Unified diff documents: model, rendering and lenient parsing

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::trace;

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+),(\d+) \+(\d+),(\d+) @@").expect("hunk header pattern is valid")
});

/// Marker emitted after a line that has no trailing terminator
pub const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

const SEPARATOR_WIDTH: usize = 67;

/// Which side(s) of the diff a hunk line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineTag {
    /// Present on both sides
    Context,
    /// Present only in the new text
    Add,
    /// Present only in the old text
    Remove,
}

impl LineTag {
    pub fn prefix(self) -> char {
        match self {
            LineTag::Context => ' ',
            LineTag::Add => '+',
            LineTag::Remove => '-',
        }
    }
}

/// A single line in a hunk, without its terminator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkLine {
    pub tag: LineTag,
    pub text: String,
    /// The line ends its file without a terminator
    #[serde(default)]
    pub no_newline: bool,
}

impl HunkLine {
    pub fn new(tag: LineTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
            no_newline: false,
        }
    }

    pub fn context(text: impl Into<String>) -> Self {
        Self::new(LineTag::Context, text)
    }

    pub fn add(text: impl Into<String>) -> Self {
        Self::new(LineTag::Add, text)
    }

    pub fn remove(text: impl Into<String>) -> Self {
        Self::new(LineTag::Remove, text)
    }
}

/// A contiguous block of changes with its surrounding context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// First old line covered by this hunk (1-based)
    pub old_start: usize,
    pub old_count: usize,
    /// First new line covered by this hunk (1-based)
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// Lines as they read in the old text (context and removals)
    pub fn old_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.tag != LineTag::Add)
            .map(|l| l.text.as_str())
    }

    /// Lines as they read in the new text (context and additions)
    pub fn new_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.tag != LineTag::Remove)
            .map(|l| l.text.as_str())
    }

    fn parse_header(line: &str) -> Option<Self> {
        let caps = HUNK_HEADER.captures(line)?;
        let number = |i: usize| caps.get(i)?.as_str().parse::<usize>().ok();
        Some(Self {
            old_start: number(1)?,
            old_count: number(2)?,
            new_start: number(3)?,
            new_count: number(4)?,
            lines: Vec::new(),
        })
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )?;
        for line in &self.lines {
            write!(f, "\n{}{}", line.tag.prefix(), line.text)?;
            if line.no_newline {
                write!(f, "\n{NO_NEWLINE_MARKER}")?;
            }
        }
        Ok(())
    }
}

/// A single-file unified diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchDocument {
    pub file_label: String,
    pub old_header: Option<String>,
    pub new_header: Option<String>,
    pub hunks: Vec<Hunk>,
}

impl PatchDocument {
    /// Parse unified diff text.
    ///
    /// Parsing never fails: a leading `Index:` block of four lines is read for
    /// the label and headers, hunks open at a well-formed `@@` line, and
    /// anything that cannot be placed in a hunk is ignored.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut document = PatchDocument::default();

        let body = if lines.first().is_some_and(|l| l.starts_with('I')) {
            document.read_header(&lines[..lines.len().min(4)]);
            &lines[lines.len().min(4)..]
        } else {
            &lines[..]
        };

        let mut current: Option<Hunk> = None;
        for line in body {
            let Some(prefix) = line.chars().next() else {
                continue;
            };
            match prefix {
                '@' => {
                    document.hunks.extend(current.take());
                    current = Hunk::parse_header(line);
                }
                '+' | '-' | ' ' => {
                    let tag = match prefix {
                        '+' => LineTag::Add,
                        '-' => LineTag::Remove,
                        _ => LineTag::Context,
                    };
                    if let Some(hunk) = current.as_mut() {
                        hunk.lines.push(HunkLine::new(tag, &line[1..]));
                    }
                }
                '\\' => {
                    if let Some(last) = current.as_mut().and_then(|h| h.lines.last_mut()) {
                        last.no_newline = true;
                    }
                }
                _ => {}
            }
        }
        document.hunks.extend(current);

        trace!(hunks = document.hunks.len(), "parsed patch");
        document
    }

    fn read_header(&mut self, header: &[&str]) {
        if let Some(label) = header.first().and_then(|l| l.strip_prefix("Index: ")) {
            self.file_label = label.to_string();
        }
        let file_header = |line: Option<&&str>, prefix: &str| {
            line.and_then(|l| l.strip_prefix(prefix))
                .and_then(|rest| rest.split_once('\t'))
                .map(|(_, header)| header.to_string())
        };
        self.old_header = file_header(header.get(2), "--- ");
        self.new_header = file_header(header.get(3), "+++ ");
    }

    /// The new text ends without a terminator
    pub fn new_missing_newline(&self) -> bool {
        self.marked(LineTag::Add)
    }

    /// The old text ended without a terminator
    pub fn old_missing_newline(&self) -> bool {
        self.marked(LineTag::Remove)
    }

    fn marked(&self, tag: LineTag) -> bool {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .any(|l| l.tag == tag && l.no_newline)
    }
}

impl fmt::Display for PatchDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = &self.file_label;
        writeln!(f, "Index: {label}")?;
        writeln!(f, "{}", "=".repeat(SEPARATOR_WIDTH))?;
        match &self.old_header {
            Some(header) => writeln!(f, "--- {label}\t{header}")?,
            None => writeln!(f, "--- {label}")?,
        }
        match &self.new_header {
            Some(header) => writeln!(f, "+++ {label}\t{header}")?,
            None => writeln!(f, "+++ {label}")?,
        }
        for hunk in &self.hunks {
            writeln!(f, "{hunk}")?;
        }
        Ok(())
    }
}
