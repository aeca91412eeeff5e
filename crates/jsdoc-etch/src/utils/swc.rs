//! SWC/deno_ast parsing utilities
//!
//! This module provides utilities for:
//! - Parsing TypeScript/TSX source text
//! - Mapping swc positions back to byte offsets of the source text
//! - Looking up the JSDoc block that precedes a node

use crate::diagnostics::{EtchError, EtchResult};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::comments::{Comment, CommentKind};
use deno_ast::swc::common::{BytePos, Span};
use deno_ast::{MediaType, ParseParams, ParsedSource, SourcePos, SourceTextInfo};
use std::ops::Range;
use std::sync::Arc;

/// Specifier every translated text is parsed under; the core never touches
/// the file system
const SOURCE_SPECIFIER: &str = "file:///source.ts";

/// Information about the source text
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// The source text
    pub text: Arc<str>,
    /// Source text info for location lookups
    pub text_info: SourceTextInfo,
    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
}

impl SourceInfo {
    /// Create source info from source text
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let text_info = SourceTextInfo::new(text.clone());
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            text,
            text_info,
            line_starts,
        }
    }

    /// Get the source text as a string slice
    pub fn source_text(&self) -> &str {
        &self.text
    }

    /// Convert a byte position to a byte offset into the source text
    pub fn offset(&self, pos: BytePos) -> usize {
        let source_pos = SourcePos::unsafely_from_byte_pos(pos);
        let line_and_col = self.text_info.line_and_column_index(source_pos);
        let line_start = self
            .line_starts
            .get(line_and_col.line_index)
            .copied()
            .unwrap_or(self.text.len());
        (line_start + line_and_col.column_index).min(self.text.len())
    }

    /// Byte range covered by a span
    pub fn range(&self, span: Span) -> Range<usize> {
        let start = self.offset(span.lo);
        let end = self.offset(span.hi).max(start);
        start..end
    }

    /// Extract source text for a span
    pub fn text_for_span(&self, span: Span) -> &str {
        let range = self.range(span);
        self.text.get(range).unwrap_or_default()
    }

    /// Byte offset of the start of the line containing `offset`
    pub fn line_start(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => self.line_starts[idx],
            Err(idx) => self.line_starts[idx.saturating_sub(1)],
        }
    }

    /// Leading whitespace of the line containing `offset`
    pub fn indent_at(&self, offset: usize) -> &str {
        let start = self.line_start(offset);
        let line = &self.text[start..];
        let len = line
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(line.len());
        &line[..len]
    }
}

/// An existing doc comment found in the source
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingDoc {
    /// Byte range of the whole comment, delimiters included
    pub range: Range<usize>,
    /// Comment body between `/*` and `*/`
    pub text: String,
}

/// A parsed TypeScript module with source information
pub struct ParsedModule {
    /// The parsed source from deno_ast
    pub source: ParsedSource,
    /// Source information for location lookups
    pub source_info: SourceInfo,
}

impl ParsedModule {
    /// Get the module AST
    pub fn module(&self) -> EtchResult<&swc_ast::Module> {
        match self.source.program_ref() {
            deno_ast::ProgramRef::Module(m) => Ok(m),
            deno_ast::ProgramRef::Script(_) => Err(EtchError::parse("expected a module")),
        }
    }

    /// Get the source text
    pub fn source_text(&self) -> &str {
        self.source_info.source_text()
    }

    /// Convert a byte position to a byte offset
    pub fn offset(&self, pos: BytePos) -> usize {
        self.source_info.offset(pos)
    }

    /// Byte range covered by a span
    pub fn range(&self, span: Span) -> Range<usize> {
        self.source_info.range(span)
    }

    /// Extract source text for a span
    pub fn text_for_span(&self, span: Span) -> &str {
        self.source_info.text_for_span(span)
    }

    /// Leading whitespace of the line containing `offset`
    pub fn indent_at(&self, offset: usize) -> &str {
        self.source_info.indent_at(offset)
    }

    /// Get leading comments for a position
    pub fn leading_comments(&self, pos: BytePos) -> Vec<Comment> {
        self.source
            .comments()
            .get_leading(SourcePos::unsafely_from_byte_pos(pos))
            .map(|v| v.to_vec())
            .unwrap_or_default()
    }

    /// Get the JSDoc comment directly preceding a position: the last leading
    /// block comment whose text starts with `*`
    pub fn jsdoc_at(&self, pos: BytePos) -> Option<ExistingDoc> {
        self.leading_comments(pos)
            .into_iter()
            .rev()
            .find(|c| c.kind == CommentKind::Block && c.text.starts_with('*'))
            .map(|c| ExistingDoc {
                range: self.range(c.span),
                text: c.text.to_string(),
            })
    }
}

/// Parse TypeScript source code from a string
pub fn parse_source(source: impl Into<Arc<str>>, media_type: MediaType) -> EtchResult<ParsedModule> {
    let source: Arc<str> = source.into();

    let specifier = deno_ast::ModuleSpecifier::parse(SOURCE_SPECIFIER)
        .map_err(|e| EtchError::parse(e.to_string()))?;

    let parsed = deno_ast::parse_module(ParseParams {
        specifier,
        text: source.clone(),
        media_type,
        capture_tokens: false,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| EtchError::parse(e.to_string()))?;

    Ok(ParsedModule {
        source: parsed,
        source_info: SourceInfo::new(source),
    })
}

/// Helper to convert Wtf8Atom to String
pub fn wtf8_to_string(s: &swc_ast::Str) -> String {
    String::from_utf8_lossy(s.value.as_bytes()).into_owned()
}

/// Get the name of a property key
pub fn prop_name_str(name: &swc_ast::PropName) -> Option<String> {
    match name {
        swc_ast::PropName::Ident(i) => Some(i.sym.to_string()),
        swc_ast::PropName::Str(s) => Some(wtf8_to_string(s)),
        swc_ast::PropName::Num(n) => Some(n.value.to_string()),
        swc_ast::PropName::BigInt(b) => Some(b.value.to_string()),
        swc_ast::PropName::Computed(_) => None,
    }
}

/// Get the name from a property key expression of a type member
pub fn expr_to_name(expr: &swc_ast::Expr) -> Option<String> {
    match expr {
        swc_ast::Expr::Ident(i) => Some(i.sym.to_string()),
        swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => Some(wtf8_to_string(s)),
        swc_ast::Expr::Lit(swc_ast::Lit::Num(n)) => Some(n.value.to_string()),
        _ => None,
    }
}

/// Convert SWC accessibility to its modifier keyword
pub fn accessibility_str(access: Option<swc_ast::Accessibility>) -> Option<&'static str> {
    match access {
        Some(swc_ast::Accessibility::Public) => Some("public"),
        Some(swc_ast::Accessibility::Protected) => Some("protected"),
        Some(swc_ast::Accessibility::Private) => Some("private"),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        let source = "export function add(a: number, b: number): number {\n  return a + b;\n}\n";
        let parsed = parse_source(source, MediaType::TypeScript).unwrap();
        assert_eq!(parsed.module().unwrap().body.len(), 1);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_source("const = ;", MediaType::TypeScript).err().unwrap();
        assert!(matches!(err, EtchError::Parse(_)));
    }

    #[test]
    fn test_span_text_round_trip() {
        let source = "// héllo\nconst value: string = 'x';\n";
        let parsed = parse_source(source, MediaType::TypeScript).unwrap();
        let item = &parsed.module().unwrap().body[0];
        let span = match item {
            swc_ast::ModuleItem::Stmt(stmt) => deno_ast::swc::common::Spanned::span(stmt),
            _ => panic!("expected statement"),
        };
        assert_eq!(parsed.text_for_span(span), "const value: string = 'x';");
    }

    #[test]
    fn test_jsdoc_lookup() {
        let source = "/* plain */\n/**\n * Documented\n */\n  function f() {}\n";
        let parsed = parse_source(source, MediaType::TypeScript).unwrap();
        let item = &parsed.module().unwrap().body[0];
        let span = match item {
            swc_ast::ModuleItem::Stmt(stmt) => deno_ast::swc::common::Spanned::span(stmt),
            _ => panic!("expected statement"),
        };

        let doc = parsed.jsdoc_at(span.lo).unwrap();
        assert_eq!(&source[doc.range.clone()], "/**\n * Documented\n */");
        assert!(doc.text.contains("Documented"));
        assert_eq!(parsed.indent_at(parsed.offset(span.lo)), "  ");
    }

    #[test]
    fn test_indent_at() {
        let info = SourceInfo::new("a\n    b\n\tc");
        assert_eq!(info.indent_at(0), "");
        assert_eq!(info.indent_at(6), "    ");
        assert_eq!(info.indent_at(9), "\t");
        assert_eq!(info.line_start(7), 2);
    }
}
