//! Text edits against the parsed source
//!
//! Documenters never mutate the tree. They record replacements and
//! insertions by byte range, applied in one pass once all of them ran.

use std::ops::Range;

/// A replacement of `start..end` with `text`; `start == end` inserts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl TextEdit {
    /// Insert text at an offset
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            text: text.into(),
        }
    }

    /// Replace a byte range
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            start: range.start,
            end: range.end,
            text: text.into(),
        }
    }

    /// Remove a byte range
    pub fn remove(range: Range<usize>) -> Self {
        Self::replace(range, "")
    }
}

/// Apply edits to `text`.
///
/// Edits are ordered by start offset; insertions at the same offset keep
/// the order they were recorded in. An edit overlapping an earlier one is
/// dropped.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> String {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    // stable sort keeps recording order for equal offsets
    ordered.sort_by_key(|e| (e.start, e.end));

    let mut out = String::with_capacity(text.len() + edits.iter().map(|e| e.text.len()).sum::<usize>());
    let mut cursor = 0;
    for edit in ordered {
        if edit.start < cursor || edit.end > text.len() {
            tracing::debug!(start = edit.start, end = edit.end, "skipping overlapping edit");
            continue;
        }
        out.push_str(&text[cursor..edit.start]);
        out.push_str(&edit.text);
        cursor = edit.end;
    }
    out.push_str(&text[cursor..]);
    out
}
