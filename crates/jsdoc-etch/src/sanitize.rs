//! Sanitizing of free text before it is placed inside a doc comment
//!
//! Type expressions and descriptions are copied out of the source verbatim,
//! so they can carry tabs, their own comments, odd punctuation spacing and
//! sequences that would terminate the surrounding `/** ... */` block.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A block comment that opens and closes on one line, with the
    /// whitespace around it
    static ref INLINE_BLOCK_COMMENT: Regex = Regex::new(r"\s*/\*+.*?\*/\s*").unwrap();

    /// A block comment starting a line and spanning several lines
    static ref LEADING_BLOCK_COMMENT: Regex = Regex::new(r"(?ms)^\s*/\*+.*?\*/\n").unwrap();

    static ref COMMENT_OPEN: Regex = Regex::new(r"/(\*+)").unwrap();
    static ref COMMENT_CLOSE: Regex = Regex::new(r"(\*+)/").unwrap();

    static ref SPACE_BEFORE_PUNCTUATION: Regex = Regex::new(r"\s+([,;.])").unwrap();

    static ref OPEN_BRACE: Regex = Regex::new(r"^\{(\S)").unwrap();
    static ref CLOSE_BRACE: Regex = Regex::new(r"(\S)\}$").unwrap();
    static ref EMPTY_BRACES: Regex = Regex::new(r"^\{\s+\}$").unwrap();
}

/// Normalize text for use on a doc comment line.
///
/// The result is stable: `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(text: &str) -> String {
    let text = text.replace('\t', " ");
    let text = INLINE_BLOCK_COMMENT.replace_all(&text, " ");
    let text = LEADING_BLOCK_COMMENT.replace_all(&text, "");
    let text = COMMENT_OPEN.replace_all(&text, "/ $1");
    let text = COMMENT_CLOSE.replace_all(&text, "$1 /");
    let text = normalize_punctuation(text.trim());

    let text = OPEN_BRACE.replace(&text, "{ $1");
    let text = CLOSE_BRACE.replace(&text, "$1 }");
    let text = EMPTY_BRACES.replace(&text, "{}");

    text.trim().to_string()
}

/// Drop whitespace before `,` `;` `.` and put exactly one space after `,`
/// and `;` when something other than whitespace follows.
pub(crate) fn normalize_punctuation(text: &str) -> String {
    let text = SPACE_BEFORE_PUNCTUATION.replace_all(text, "$1");

    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if matches!(c, ',' | ';') {
            if let Some(next) = chars.peek() {
                if !next.is_whitespace() {
                    out.push(' ');
                }
            }
        }
    }
    out
}
