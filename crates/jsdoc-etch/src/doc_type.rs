//! Translation of TypeScript type text into JSDoc type grammar
//!
//! This is pattern matching over the rendered type string, not a structural
//! rewrite: `any` and `unknown` are substituted at the top level and in the
//! first/second argument of a single generic, and `Array<T>` becomes `T[]`.

use crate::sanitize::{normalize_punctuation, sanitize};
use lazy_static::lazy_static;
use regex::Regex;

/// Rendered for missing or empty type information
pub const UNKNOWN_TYPE: &str = "?";

lazy_static! {
    static ref LINE_COMMENT: Regex = Regex::new(r"(?m)(?:^|\s+)//.*$").unwrap();
    static ref LINE_BREAKS: Regex = Regex::new(r"\s*\n\s*").unwrap();

    static ref ANY: Regex = Regex::new(r"^any(\[\])?$").unwrap();
    static ref ANY_ONLY_ARG: Regex = Regex::new(r"(?i)^(\w+)<any(\[\])?>$").unwrap();
    static ref ANY_FIRST_ARG: Regex = Regex::new(r"(?i)^(\w+)<any(\[\])?,\s*([^>]+)>$").unwrap();
    static ref ANY_SECOND_ARG: Regex = Regex::new(r"(?i)^(\w+)<([^,]+),\s*any(\[\])?>$").unwrap();

    static ref UNKNOWN: Regex = Regex::new(r"^unknown(\[\])?$").unwrap();
    static ref UNKNOWN_ONLY_ARG: Regex = Regex::new(r"(?i)^(\w+)<unknown(\[\])?>$").unwrap();
    static ref UNKNOWN_FIRST_ARG: Regex = Regex::new(r"(?i)^(\w+)<unknown(\[\])?,\s*([^>]+)>$").unwrap();
    static ref UNKNOWN_SECOND_ARG: Regex = Regex::new(r"(?i)^(\w+)<([^,]+),\s*unknown(\[\])?>$").unwrap();

    static ref ARRAY_GENERIC: Regex = Regex::new(r"^Array<([^>]+)>$").unwrap();
    static ref GROUPED_ARRAY: Regex = Regex::new(r"^\(([\w*?]*|\{.*\})\)\[\]$").unwrap();
}

/// Translate type text into JSDoc type grammar.
///
/// Empty input yields [`UNKNOWN_TYPE`].
pub fn to_doc_type(text: &str) -> String {
    let text = LINE_COMMENT.replace_all(text, "\n");
    let text = LINE_BREAKS.replace_all(&text, " ");
    let text = normalize_punctuation(text.trim());

    let text = ANY.replace(&text, "*$1");
    let text = ANY_ONLY_ARG.replace(&text, "$1<*$2>");
    let text = ANY_FIRST_ARG.replace(&text, "$1<*$2, $3>");
    let text = ANY_SECOND_ARG.replace(&text, "$1<$2, *$3>");

    let text = UNKNOWN.replace(&text, "?$1");
    let text = UNKNOWN_ONLY_ARG.replace(&text, "$1<?$2>");
    let text = UNKNOWN_FIRST_ARG.replace(&text, "$1<?$2, $3>");
    let text = UNKNOWN_SECOND_ARG.replace(&text, "$1<$2, ?$3>");

    let text = ARRAY_GENERIC.replace(&text, "($1)[]");
    let text = GROUPED_ARRAY.replace(&text, "$1[]");

    let text = text.trim();
    if text.is_empty() {
        UNKNOWN_TYPE.to_string()
    } else {
        text.to_string()
    }
}

/// [`to_doc_type`] for type information that may be missing altogether
pub fn to_doc_type_or_unknown(text: Option<&str>) -> String {
    match text {
        Some(text) => to_doc_type(text),
        None => UNKNOWN_TYPE.to_string(),
    }
}

/// Sanitize raw source type text and translate it
pub fn render_type(raw: &str) -> String {
    to_doc_type(&sanitize(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_array_generic() {
        assert_eq!(to_doc_type("Array<string>"), "string[]");
        assert_eq!(to_doc_type("Array<string | number>"), "(string | number)[]");
        assert_eq!(to_doc_type("Array<{ a: string }>"), "{ a: string }[]");
    }

    #[test]
    fn test_any_and_unknown() {
        assert_eq!(to_doc_type("any"), "*");
        assert_eq!(to_doc_type("any[]"), "*[]");
        assert_eq!(to_doc_type("unknown"), "?");
        assert_eq!(to_doc_type("unknown[]"), "?[]");
    }

    #[test]
    fn test_missing_type() {
        assert_eq!(to_doc_type(""), "?");
        assert_eq!(to_doc_type("   "), "?");
        assert_eq!(to_doc_type_or_unknown(None), "?");
        assert_eq!(to_doc_type_or_unknown(Some("string")), "string");
    }

    #[test]
    fn test_generic_positions() {
        assert_eq!(to_doc_type("Map<any, any>"), "Map<*, *>");
        assert_eq!(to_doc_type("Map<unknown, boolean>"), "Map<?, boolean>");
        assert_eq!(to_doc_type("Map<string, unknown>"), "Map<string, ?>");
        assert_eq!(to_doc_type("Promise<any>"), "Promise<*>");
        assert_eq!(to_doc_type("Set<unknown>"), "Set<?>");
    }

    #[test]
    fn test_no_substitution_inside_words() {
        assert_eq!(to_doc_type("anyThing"), "anyThing");
        assert_eq!(to_doc_type("Company"), "Company");
    }

    #[test]
    fn test_multiline_conditional_type() {
        let text = "T extends string // strings\n  ? 'text' // text\n  : 'other'";
        assert_eq!(to_doc_type(text), "T extends string ? 'text' : 'other'");
    }

    #[test]
    fn test_url_literal_survives() {
        assert_eq!(to_doc_type("'http://example.com'"), "'http://example.com'");
    }

    #[test]
    fn test_render_type() {
        assert_eq!(render_type("{\n  a: string;\n  b: number;\n}"), "{ a: string; b: number; }");
        assert_eq!(render_type("Array<any>"), "*[]");
    }
}
