//! JSDoc comment blocks
//!
//! A [`JsDoc`] is the documentation block of one declaration: description
//! lines followed by tags. Blocks read from the source keep the raw text of
//! every tag, so tags nobody touches render exactly as they were written.
//! Tags built by the documenters render as `@name {type} identifier comment`.

/// Tags whose text carries an identifier after the optional `{type}`
const IDENTIFIER_TAGS: &[&str] = &[
    "param", "arg", "argument", "property", "prop", "template", "typedef", "callback",
];

/// Parsed JSDoc documentation block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsDoc {
    /// Description lines, without the leading ` * `
    pub description: Vec<String>,
    /// Tags in rendering order
    pub tags: Vec<JsDocTag>,
    /// Whether an empty line separates the description from the tags
    pub gap_before_tags: bool,
}

impl JsDoc {
    /// Create a new empty block
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a doc comment.
    ///
    /// Accepts a full `/** ... */` comment as well as the comment body a
    /// parser hands out (the text between `/*` and `*/`).
    pub fn parse(comment: &str) -> Self {
        let lines = clean_comment_lines(comment);

        let first_tag = lines.iter().position(|l| is_tag_line(l));
        let (desc_lines, tag_lines) = match first_tag {
            Some(idx) => lines.split_at(idx),
            None => (&lines[..], &[][..]),
        };

        let mut description: Vec<String> = desc_lines.to_vec();
        let gap_before_tags = description.last().is_some_and(|l| l.trim().is_empty())
            && description.iter().any(|l| !l.trim().is_empty());
        trim_blank_lines(&mut description);

        Self {
            description,
            tags: parse_tags(tag_lines),
            gap_before_tags,
        }
    }

    /// Check whether the block has neither description nor tags
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.tags.is_empty()
    }

    /// The description as a single line
    pub fn description_text(&self) -> Option<String> {
        let text = self
            .description
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// All tags with one of the given names
    pub fn tags_named<'a>(&'a self, names: &'a [&str]) -> impl Iterator<Item = &'a JsDocTag> + 'a {
        self.tags.iter().filter(move |t| names.contains(&t.name.as_str()))
    }

    /// First tag with one of the given names
    pub fn find_tag(&self, names: &[&str]) -> Option<&JsDocTag> {
        self.tags.iter().find(|t| names.contains(&t.name.as_str()))
    }

    /// Check for a tag by name
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    /// Remove all tags with one of the given names, returning how many went
    pub fn remove_tags(&mut self, names: &[&str]) -> usize {
        let before = self.tags.len();
        self.tags.retain(|t| !names.contains(&t.name.as_str()));
        before - self.tags.len()
    }

    /// Add a tag
    pub fn add_tag(&mut self, tag: JsDocTag) {
        self.tags.push(tag);
    }

    /// Add tags, keeping their order
    pub fn add_tags(&mut self, tags: impl IntoIterator<Item = JsDocTag>) {
        self.tags.extend(tags);
    }

    /// Render as a multi-line doc comment.
    ///
    /// `indent` is placed before every line but the first, which starts
    /// wherever the caller inserts it.
    pub fn render(&self, indent: &str) -> String {
        let mut body: Vec<String> = self.description.clone();
        if !self.description.is_empty() && !self.tags.is_empty() && self.gap_before_tags {
            body.push(String::new());
        }
        for tag in &self.tags {
            body.extend(tag.render().lines().map(str::to_string));
        }

        let mut out = String::from("/**");
        for line in body {
            out.push('\n');
            out.push_str(indent);
            if line.is_empty() {
                out.push_str(" *");
            } else {
                out.push_str(" * ");
                out.push_str(&line);
            }
        }
        out.push('\n');
        out.push_str(indent);
        out.push_str(" */");
        out
    }
}

/// A single `@tag`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsDocTag {
    /// Tag name without the `@`
    pub name: String,
    /// Type expression without its braces
    pub type_expr: Option<String>,
    /// Identifier as written, e.g. `[name=default]`
    pub name_text: Option<String>,
    /// Free text after type and identifier
    pub comment: Option<String>,
    /// Text after the tag name, for tags read from source
    raw: Option<String>,
}

impl JsDocTag {
    /// Create a tag with only a name, like `@abstract`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the type expression
    pub fn with_type(mut self, type_expr: impl Into<String>) -> Self {
        self.type_expr = Some(type_expr.into());
        self
    }

    /// Set the identifier text
    pub fn with_name(mut self, name_text: impl Into<String>) -> Self {
        let name_text = name_text.into();
        self.name_text = (!name_text.is_empty()).then_some(name_text);
        self
    }

    /// Set the comment, ignoring empty text
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = (!comment.trim().is_empty()).then_some(comment);
        self
    }

    /// Parse the text following `@name`
    pub fn parse(name: &str, text: &str) -> Self {
        let text = text.trim_end();
        let (type_expr, rest) = extract_type_and_rest(text);

        let (name_text, comment) = if IDENTIFIER_TAGS.contains(&name) {
            split_identifier(rest)
        } else {
            (None, non_empty(rest))
        };

        Self {
            name: name.to_string(),
            type_expr,
            name_text,
            comment,
            raw: Some(text.to_string()),
        }
    }

    /// The bare identifier: brackets, default value and whitespace removed
    pub fn identifier(&self) -> Option<&str> {
        let text = self.name_text.as_deref()?;
        let bare = match text.strip_prefix('[') {
            Some(inner) => {
                let inner = inner.strip_suffix(']').unwrap_or(inner);
                inner.split('=').next().unwrap_or(inner)
            }
            None => text,
        };
        let bare = bare.trim();
        (!bare.is_empty()).then_some(bare)
    }

    /// The free text of the tag
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Render as `@name ...`, possibly over several lines
    pub fn render(&self) -> String {
        let mut out = format!("@{}", self.name);
        let body = match &self.raw {
            Some(raw) => raw.clone(),
            None => {
                let mut parts = Vec::new();
                if let Some(t) = &self.type_expr {
                    parts.push(format!("{{{t}}}"));
                }
                if let Some(n) = &self.name_text {
                    parts.push(n.clone());
                }
                if let Some(c) = &self.comment {
                    parts.push(c.clone());
                }
                parts.join(" ")
            }
        };
        if !body.is_empty() {
            if !body.starts_with('\n') {
                out.push(' ');
            }
            out.push_str(&body);
        }
        out
    }
}

/// Strip comment delimiters and the leading `*` of each line
fn clean_comment_lines(comment: &str) -> Vec<String> {
    let mut text = comment.trim();
    text = text.strip_prefix("/*").unwrap_or(text);
    text = text.strip_suffix("*/").unwrap_or(text);
    // the second star of `/**`
    text = text.strip_prefix('*').unwrap_or(text);

    let mut lines: Vec<String> = text
        .lines()
        .map(|line| {
            let content = line.trim_start();
            let content = match content.strip_prefix('*') {
                Some(after) => after.strip_prefix(' ').unwrap_or(after),
                None => content,
            };
            content.trim_end().to_string()
        })
        .collect();
    trim_blank_lines(&mut lines);
    lines
}

fn is_tag_line(line: &str) -> bool {
    let mut chars = line.trim_start().chars();
    chars.next() == Some('@') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

fn parse_tags(lines: &[String]) -> Vec<JsDocTag> {
    let mut tags = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in lines {
        if is_tag_line(line) {
            if let Some((name, body)) = current.take() {
                tags.push(finish_tag(&name, body));
            }
            let after_at = &line.trim_start()[1..];
            let split = after_at
                .find(|c: char| c.is_whitespace() || c == '{')
                .unwrap_or(after_at.len());
            let name = after_at[..split].to_string();
            let first = after_at[split..].trim_start().to_string();
            current = Some((name, vec![first]));
        } else if let Some((_, ref mut body)) = current {
            body.push(line.clone());
        }
    }
    if let Some((name, body)) = current {
        tags.push(finish_tag(&name, body));
    }
    tags
}

fn finish_tag(name: &str, mut body: Vec<String>) -> JsDocTag {
    while body.len() > 1 && body.last().is_some_and(|l| l.trim().is_empty()) {
        body.pop();
    }
    JsDocTag::parse(name, &body.join("\n"))
}

fn trim_blank_lines(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.trim().is_empty()).count();
    lines.drain(..leading);
}

/// Extract `{type}` at the start of tag text
fn extract_type_and_rest(content: &str) -> (Option<String>, &str) {
    if content.starts_with('{') {
        if let Some(close) = find_matching(content, '{', '}') {
            return (
                Some(content[1..close].to_string()),
                content[close + 1..].trim_start(),
            );
        }
    }
    (None, content)
}

/// Byte index of the delimiter closing the one `s` starts with
fn find_matching(s: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Split `name rest` or `[name=default] rest`
fn split_identifier(text: &str) -> (Option<String>, Option<String>) {
    let text = text.trim_start();
    if text.is_empty() {
        return (None, None);
    }
    if text.starts_with('[') {
        if let Some(close) = find_matching(text, '[', ']') {
            return (
                Some(text[..=close].to_string()),
                non_empty(&text[close + 1..]),
            );
        }
    }
    match text.find(char::is_whitespace) {
        Some(pos) => (Some(text[..pos].to_string()), non_empty(&text[pos..])),
        None => (Some(text.to_string()), None),
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_jsdoc() {
        let doc = JsDoc::parse("/** Hello world */");
        assert_eq!(doc.description, vec!["Hello world"]);
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_parse_comment_body() {
        // what the parser hands out: no `/*` and `*/`
        let doc = JsDoc::parse("*\n * A function\n * @param {number} param - The input\n ");
        assert_eq!(doc.description, vec!["A function"]);
        assert_eq!(doc.tags.len(), 1);

        let tag = &doc.tags[0];
        assert_eq!(tag.name, "param");
        assert_eq!(tag.type_expr.as_deref(), Some("number"));
        assert_eq!(tag.identifier(), Some("param"));
        assert_eq!(tag.comment(), Some("- The input"));
    }

    #[test]
    fn test_parse_optional_param() {
        let doc = JsDoc::parse("/** @param {string} [name='a b'] the name */");
        let tag = &doc.tags[0];
        assert_eq!(tag.name_text.as_deref(), Some("[name='a b']"));
        assert_eq!(tag.identifier(), Some("name"));
        assert_eq!(tag.comment(), Some("the name"));
    }

    #[test]
    fn test_returns_has_no_identifier() {
        let doc = JsDoc::parse("/**\n * @returns {number} the count\n */");
        let tag = &doc.tags[0];
        assert_eq!(tag.identifier(), None);
        assert_eq!(tag.comment(), Some("the count"));
    }

    #[test]
    fn test_multiline_tag() {
        let doc = JsDoc::parse(
            "/**\n * @example\n *   const a = 1;\n *   const b = 2;\n * @since 1.0\n */",
        );
        assert_eq!(doc.tags.len(), 2);
        assert_eq!(doc.tags[0].render(), "@example\n  const a = 1;\n  const b = 2;");
        assert_eq!(doc.tags[1].render(), "@since 1.0");
    }

    #[test]
    fn test_render_generated_tags() {
        let mut doc = JsDoc::new();
        doc.add_tag(JsDocTag::new("abstract"));
        doc.add_tag(JsDocTag::new("template").with_name("T"));
        doc.add_tag(
            JsDocTag::new("param")
                .with_type("string")
                .with_name("[p='x']")
                .with_comment("- a value"),
        );
        assert_eq!(
            doc.render(""),
            "/**\n * @abstract\n * @template T\n * @param {string} [p='x'] - a value\n */"
        );
    }

    #[test]
    fn test_render_with_indent() {
        let mut doc = JsDoc::new();
        doc.add_tag(JsDocTag::new("type").with_type("number"));
        assert_eq!(doc.render("    "), "/**\n     * @type {number}\n     */");
    }

    #[test]
    fn test_round_trip_keeps_untouched_tags() {
        let source = "/**\n * A descriptor.\n *\n * @see {@link Other}\n * @deprecated use the other one\n */";
        let doc = JsDoc::parse(source);
        assert!(doc.gap_before_tags);
        assert_eq!(doc.render(""), source);
    }

    #[test]
    fn test_remove_and_find_tags() {
        let mut doc = JsDoc::parse("/**\n * @returns {number}\n * @param {string} a\n * @arg b\n */");
        assert!(doc.has_tag("returns"));
        assert_eq!(doc.tags_named(&["param", "arg"]).count(), 2);
        assert_eq!(doc.remove_tags(&["param", "arg", "argument"]), 2);
        assert_eq!(doc.tags.len(), 1);
        assert!(doc.find_tag(&["param"]).is_none());
    }

    #[test]
    fn test_description_text() {
        let doc = JsDoc::parse("/**\n * Whether the view\n * is visible.\n *\n * @defaultValue `true`\n */");
        assert_eq!(doc.description_text().as_deref(), Some("Whether the view is visible."));
        assert!(JsDoc::new().description_text().is_none());
    }

    #[test]
    fn test_empty_name_is_dropped() {
        let tag = JsDocTag::new("param").with_type("object").with_name("");
        assert_eq!(tag.render(), "@param {object}");
    }
}
