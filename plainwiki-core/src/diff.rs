//! Structural context diffs between two versions of a page.
//!
//! A [`PageDiff`] is a list of hunks. Each hunk carries the affected slice of the
//! old text and the replacing slice of the new text, every line tagged as
//! context, added, removed or changed. Lines keep their terminators, so a diff
//! can be applied forwards or backwards to reconstruct either side exactly.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, group_diff_ops, Algorithm, DiffTag};

/// Version of the serialized hunk layout.
pub const DIFF_SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_CONTEXT_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTag {
    Context,
    Added,
    Removed,
    Changed,
}

impl LineTag {
    /// Prefix used by the classic context-diff text format.
    pub fn marker(&self) -> &'static str {
        match self {
            LineTag::Context => "  ",
            LineTag::Added => "+ ",
            LineTag::Removed => "- ",
            LineTag::Changed => "! ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub tag: LineTag,
    pub text: String,
}

impl DiffLine {
    fn new(tag: LineTag, text: &str) -> Self {
        Self {
            tag,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Zero-based index of the first old line covered by this hunk.
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    /// Context, removed and changed lines of the old text.
    pub old: Vec<DiffLine>,
    /// Context, added and changed lines of the new text.
    pub new: Vec<DiffLine>,
}

impl Hunk {
    /// Context-diff style range header, one-based as in `*** 1,4 ****`.
    pub fn header(&self) -> String {
        format!(
            "*** {} ****\n--- {} ----",
            format_range(self.old_start, self.old_len),
            format_range(self.new_start, self.new_len)
        )
    }

    pub fn has_removals(&self) -> bool {
        self.old.iter().any(|l| l.tag != LineTag::Context)
    }

    pub fn has_additions(&self) -> bool {
        self.new.iter().any(|l| l.tag != LineTag::Context)
    }
}

fn format_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{}", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, start + len),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDiff {
    pub version: u32,
    pub hunks: Vec<Hunk>,
}

impl PageDiff {
    pub fn compute(old_text: &str, new_text: &str) -> Self {
        Self::compute_with_context(old_text, new_text, DEFAULT_CONTEXT_LINES)
    }

    pub fn compute_with_context(old_text: &str, new_text: &str, context_lines: usize) -> Self {
        let old_lines = split_lines(old_text);
        let new_lines = split_lines(new_text);
        let ops = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines);

        let mut hunks = Vec::new();
        for group in group_diff_ops(ops, context_lines) {
            let (Some(first), Some(last)) = (group.first(), group.last()) else {
                continue;
            };
            let old_start = first.old_range().start;
            let new_start = first.new_range().start;
            let mut hunk = Hunk {
                old_start,
                old_len: last.old_range().end - old_start,
                new_start,
                new_len: last.new_range().end - new_start,
                old: Vec::new(),
                new: Vec::new(),
            };

            for op in &group {
                let (tag, old_range, new_range) = op.as_tag_tuple();
                let (old_tag, new_tag) = match tag {
                    DiffTag::Equal => (LineTag::Context, LineTag::Context),
                    DiffTag::Delete | DiffTag::Insert => (LineTag::Removed, LineTag::Added),
                    DiffTag::Replace => (LineTag::Changed, LineTag::Changed),
                };
                hunk.old
                    .extend(old_lines[old_range].iter().map(|l| DiffLine::new(old_tag, l)));
                hunk.new
                    .extend(new_lines[new_range].iter().map(|l| DiffLine::new(new_tag, l)));
            }

            hunks.push(hunk);
        }

        Self {
            version: DIFF_SCHEMA_VERSION,
            hunks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Rebuild the new text from the old text.
    pub fn apply(&self, old_text: &str) -> Result<String> {
        self.patch(old_text, |h| (h.old_start, &h.old, &h.new))
    }

    /// Rebuild the old text from the new text.
    pub fn revert(&self, new_text: &str) -> Result<String> {
        self.patch(new_text, |h| (h.new_start, &h.new, &h.old))
    }

    fn patch<'a, F>(&'a self, source: &str, sides: F) -> Result<String>
    where
        F: Fn(&'a Hunk) -> (usize, &'a Vec<DiffLine>, &'a Vec<DiffLine>),
    {
        let lines = split_lines(source);
        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;

        for hunk in &self.hunks {
            let (start, expected, replacement) = sides(hunk);
            if start < cursor || start + expected.len() > lines.len() {
                return Err(Error::DiffMismatch(format!(
                    "hunk at line {} is out of range",
                    start + 1
                )));
            }
            for line in &lines[cursor..start] {
                out.push_str(line);
            }
            for (offset, line) in expected.iter().enumerate() {
                if lines[start + offset] != line.text {
                    return Err(Error::DiffMismatch(format!(
                        "line {} does not match",
                        start + offset + 1
                    )));
                }
            }
            for line in replacement {
                out.push_str(&line.text);
            }
            cursor = start + expected.len();
        }

        for line in &lines[cursor..] {
            out.push_str(line);
        }

        Ok(out)
    }
}

/// Split text into lines, keeping each terminator (`\n`, `\r\n` or `\r`)
/// attached to its line. Concatenating the result yields the input.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..=i]);
                start = i + 1;
            }
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                lines.push(&text[start..=i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < bytes.len() {
        lines.push(&text[start..]);
    }

    lines
}
