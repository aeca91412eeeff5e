//! Translation of one TypeScript text into documented JavaScript
//!
//! The pipeline runs in a single pass:
//! 1. normalize line endings and protect blank lines with marker comments,
//!    since the emitter drops blank lines
//! 2. parse, run the documenters and reserve the point where typedef blocks
//!    of erased declarations go
//! 3. parse the documented text again and erase its types
//! 4. restore blank lines, typedef blocks and line endings

use crate::class::document_class;
use crate::context::DocContext;
use crate::diagnostics::{EtchError, EtchResult};
use crate::edits::{apply_edits, TextEdit};
use crate::function::{document_fn_decl, document_function, FunctionDef, ReturnPolicy};
use crate::import::document_import;
use crate::interface::document_interface;
use crate::type_alias::document_type_alias;
use crate::variable::document_var_decl;
use crate::utils::swc::{parse_source, ParsedModule};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{BytePos, Spanned};
use deno_ast::{EmitOptions, MediaType, TranspileModuleOptions, TranspileOptions};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

lazy_static! {
    /// A block comment followed by code on the same line
    static ref COMMENT_BEFORE_CODE: Regex = Regex::new(r"/\*[^()?:*/]*\*/[ \t]*(\S.+)").unwrap();

    static ref SOURCE_MAP_COMMENT: Regex = Regex::new(r"(?m)^//# sourceMappingURL=.*$").unwrap();
}

/// Options of a translation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslateOptions {
    /// Document declarations; without it, types are only erased
    pub add_type_documentation: bool,
    /// Project type configuration, passed through untouched
    pub type_config_path: Option<PathBuf>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            add_type_documentation: true,
            type_config_path: None,
        }
    }
}

impl TranslateOptions {
    /// Options with documentation enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable documentation
    pub fn add_type_documentation(mut self, enabled: bool) -> Self {
        self.add_type_documentation = enabled;
        self
    }

    /// Set the type configuration path
    pub fn type_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.type_config_path = Some(path.into());
        self
    }
}

/// A failed translation, with the text states it failed between
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct TranslateError {
    /// Text before the failing step
    pub old_text: String,
    /// Text the failing step produced or worked on
    pub new_text: String,
    /// What went wrong
    pub reason: String,
}

impl TranslateError {
    fn new(old_text: impl Into<String>, new_text: impl Into<String>, cause: &EtchError) -> Self {
        Self {
            old_text: old_text.into(),
            new_text: new_text.into(),
            reason: cause.to_string(),
        }
    }
}

/// The translated text, or the failure
pub type TranslateOutcome = Result<String, TranslateError>;

/// Marker texts unique to this process
struct Markers {
    blank_line: String,
    types_module: String,
}

impl Markers {
    fn new() -> Self {
        let pid = std::process::id();
        Self {
            blank_line: format!("// __{}_BLANK_LINE_MARKER__ //", pid),
            types_module: format!("./REMOVE/ME/{}", pid),
        }
    }
}

/// Translate TypeScript (or TSX with `is_jsx`) into JavaScript documented
/// with JSDoc.
///
/// Parse and emit failures are returned as a [`TranslateError`] holding the
/// text states around the failing step.
pub fn translate(source: &str, is_jsx: bool, options: &TranslateOptions) -> TranslateOutcome {
    let media_type = if is_jsx { MediaType::Tsx } else { MediaType::TypeScript };
    if let Some(path) = &options.type_config_path {
        tracing::debug!(path = %path.display(), "type configuration is passed through");
    }

    let crlf = source.contains("\r\n");
    let markers = Markers::new();
    let preprocessed = preprocess(&source.replace("\r\n", "\n"), &markers);

    let parsed = parse_source(preprocessed.as_str(), media_type).map_err(|e| {
        tracing::error!(error = %e, "failed to parse source");
        TranslateError::new(source, preprocessed.as_str(), &e)
    })?;

    let (parsed, type_blocks) = if options.add_type_documentation {
        let (edits, type_blocks) = document_module(&parsed, &markers).map_err(|e| {
            tracing::error!(error = %e, "failed to document source");
            TranslateError::new(preprocessed.as_str(), preprocessed.as_str(), &e)
        })?;
        let annotated = apply_edits(&preprocessed, &edits);
        let reparsed = parse_source(annotated.as_str(), media_type).map_err(|e| {
            let e = e.into_reparse();
            tracing::error!(error = %e, "documented source does not parse");
            TranslateError::new(preprocessed.as_str(), annotated.as_str(), &e)
        })?;
        (reparsed, type_blocks)
    } else {
        (parsed, Vec::new())
    };

    let annotated = parsed.source_text().to_string();
    let emitted = erase_types(parsed).map_err(|e| {
        tracing::error!(error = %e, "failed to erase types");
        TranslateError::new(preprocessed.as_str(), annotated.as_str(), &e)
    })?;

    let output = restore_layout(&emitted, &markers, &type_blocks);
    Ok(if crlf { output.replace('\n', "\r\n") } else { output })
}

/// Drop block comments that precede code on the same line and mark blank
/// lines
fn preprocess(source: &str, markers: &Markers) -> String {
    source
        .split('\n')
        .map(|line| {
            let line = COMMENT_BEFORE_CODE.replace_all(line, "$1");
            if line.trim().is_empty() {
                format!("{}{}", markers.blank_line, line)
            } else {
                line.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip types only: imports other than `type` ones are kept as written
/// and JSX is left untransformed
fn erase_types(parsed: ParsedModule) -> EtchResult<String> {
    let options = TranspileOptions {
        verbatim_module_syntax: true,
        jsx: None,
        ..Default::default()
    };
    let transpiled = parsed
        .source
        .transpile(
            &options,
            &TranspileModuleOptions::default(),
            &EmitOptions::default(),
        )
        .map_err(|e| EtchError::emit(e.to_string()))?;
    Ok(transpiled.into_source().text)
}

/// A declaration together with the position its doc comment belongs to
struct Declared<'m> {
    pos: BytePos,
    kind: DeclKind<'m>,
}

#[derive(Clone, Copy)]
enum DeclKind<'m> {
    Interface(&'m swc_ast::TsInterfaceDecl),
    TypeAlias(&'m swc_ast::TsTypeAliasDecl),
    Var(&'m swc_ast::VarDecl),
    Fn(&'m swc_ast::FnDecl),
    DefaultFn(&'m swc_ast::Function),
    Class(Option<&'m str>, &'m swc_ast::Class),
}

/// Top-level declarations, exported or not, in source order
fn declarations(module: &swc_ast::Module) -> Vec<Declared<'_>> {
    let mut found = Vec::new();
    for item in &module.body {
        let (pos, decl) = match item {
            swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(decl)) => (decl.span().lo, decl),
            swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export)) => {
                (export.span.lo, &export.decl)
            }
            swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDefaultDecl(export)) => {
                let kind = match &export.decl {
                    swc_ast::DefaultDecl::Class(class) => Some(DeclKind::Class(
                        class.ident.as_ref().map(|i| &*i.sym),
                        &class.class,
                    )),
                    swc_ast::DefaultDecl::Fn(f) => Some(DeclKind::DefaultFn(&f.function)),
                    swc_ast::DefaultDecl::TsInterfaceDecl(decl) => Some(DeclKind::Interface(decl)),
                };
                if let Some(kind) = kind {
                    found.push(Declared { pos: export.span.lo, kind });
                }
                continue;
            }
            _ => continue,
        };
        let kind = match decl {
            swc_ast::Decl::TsInterface(decl) => DeclKind::Interface(decl),
            swc_ast::Decl::TsTypeAlias(decl) => DeclKind::TypeAlias(decl),
            swc_ast::Decl::Var(var) => DeclKind::Var(var),
            swc_ast::Decl::Fn(decl) => DeclKind::Fn(decl),
            swc_ast::Decl::Class(decl) if !decl.declare => {
                DeclKind::Class(Some(&*decl.ident.sym), &decl.class)
            }
            _ => continue,
        };
        found.push(Declared { pos, kind });
    }
    found
}

/// Run the documenters over a module: imports, interfaces, type aliases,
/// variables, functions, classes. Returns the edits to the source and the
/// typedef blocks for the reserved insertion point.
fn document_module(parsed: &ParsedModule, markers: &Markers) -> EtchResult<(Vec<TextEdit>, Vec<String>)> {
    let module = parsed.module()?;
    let mut cx = DocContext::new(parsed);
    cx.push_edit(reserve_types_point(parsed, module, markers));

    for item in &module.body {
        if let swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::Import(import)) = item {
            document_import(&mut cx, import);
        }
    }

    let declared = declarations(module);
    for d in &declared {
        if let DeclKind::Interface(decl) = d.kind {
            document_interface(&mut cx, d.pos, decl)?;
        }
    }
    for d in &declared {
        if let DeclKind::TypeAlias(decl) = d.kind {
            document_type_alias(&mut cx, d.pos, decl)?;
        }
    }
    for d in &declared {
        if let DeclKind::Var(var) = d.kind {
            document_var_decl(&mut cx, d.pos, var)?;
        }
    }
    for d in &declared {
        match d.kind {
            DeclKind::Fn(decl) => document_fn_decl(&mut cx, d.pos, decl)?,
            DeclKind::DefaultFn(function) if function.body.is_some() => {
                let def = FunctionDef::from_function(&cx, function, ReturnPolicy::Always);
                document_function(&mut cx, d.pos, &def)?;
            }
            _ => {}
        }
    }
    for d in &declared {
        if let DeclKind::Class(name, class) = d.kind {
            document_class(&mut cx, d.pos, name, class)?;
        }
    }

    Ok(cx.finish())
}

/// Insert the side-effect import whose emitted line is later replaced by
/// the typedef blocks: after the last import, else before the first
/// statement and its doc comment
fn reserve_types_point(parsed: &ParsedModule, module: &swc_ast::Module, markers: &Markers) -> TextEdit {
    let statement = format!("import '{}';", markers.types_module);

    let last_import = module.body.iter().rev().find_map(|item| match item {
        swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::Import(import)) => Some(import.span),
        _ => None,
    });
    if let Some(span) = last_import {
        return TextEdit::insert(parsed.offset(span.hi), format!("\n{}", statement));
    }

    match module.body.first() {
        Some(item) => {
            let pos = item.span().lo;
            let offset = parsed
                .jsdoc_at(pos)
                .map(|doc| doc.range.start)
                .unwrap_or_else(|| parsed.offset(pos));
            TextEdit::insert(offset, format!("{}\n", statement))
        }
        None => TextEdit::insert(parsed.source_text().len(), format!("\n{}\n", statement)),
    }
}

/// Post-process emitted text: drop the source map comment, tidy doc
/// comments, restore blank lines and splice in the typedef blocks
fn restore_layout(emitted: &str, markers: &Markers, type_blocks: &[String]) -> String {
    let text = SOURCE_MAP_COMMENT.replace_all(emitted, "");
    let text = reflow_doc_comments(&text);

    let mut lines: Vec<String> = text
        .lines()
        .map(|line| strip_blank_line_marker(line, &markers.blank_line))
        .collect();

    let marker_line = lines.iter().position(|line| {
        let line = line.trim_start();
        line.starts_with("import") && line.contains(&markers.types_module)
    });
    if let Some(idx) = marker_line {
        let mut replacement = Vec::new();
        if !type_blocks.is_empty() {
            if idx > 0 && !lines[idx - 1].trim().is_empty() {
                replacement.push(String::new());
            }
            replacement.extend(type_blocks.join("\n\n").lines().map(str::to_string));
            if lines.get(idx + 1).is_some_and(|next| !next.trim().is_empty()) {
                replacement.push(String::new());
            }
        }
        lines.splice(idx..=idx, replacement);
    } else if !type_blocks.is_empty() {
        tracing::warn!("insertion point of type documentation not found, typedefs dropped");
    }

    let first = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(lines.len());
    let text = lines[first..].join("\n");
    format!("{}\n", text.trim_end())
}

/// A line that only held a blank-line marker becomes empty; markers
/// anywhere else are removed
fn strip_blank_line_marker(line: &str, marker: &str) -> String {
    let trimmed = line.trim();
    match trimmed.strip_prefix(marker) {
        Some(rest) => rest.trim().to_string(),
        None => line.replace(marker, ""),
    }
}

/// Re-indent doc comment continuation lines to their opening line and put
/// code that follows a closing `*/` on a line of its own
fn reflow_doc_comments(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut open: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];

        match open.take() {
            Some(opener_indent) => {
                let (comment, code) = split_comment_close(trimmed, 0);
                if comment.starts_with('*') {
                    out.push(format!("{} {}", opener_indent, comment));
                } else {
                    out.push(format!("{}{}", indent, comment));
                }
                match code {
                    Some(code) => {
                        if !code.is_empty() {
                            out.push(format!("{}{}", opener_indent, code));
                        }
                    }
                    None => open = Some(opener_indent),
                }
            }
            None if trimmed.starts_with("/**") => {
                let (comment, code) = split_comment_close(trimmed, 3);
                out.push(format!("{}{}", indent, comment));
                match code {
                    Some(code) => {
                        if !code.is_empty() {
                            out.push(format!("{}{}", indent, code));
                        }
                    }
                    None => open = Some(indent.to_string()),
                }
            }
            None => out.push(line.to_string()),
        }
    }
    out.join("\n")
}

/// Split a line at the first `*/` at or after `from`: the comment part and,
/// when the comment closes, the code after it
fn split_comment_close(line: &str, from: usize) -> (&str, Option<&str>) {
    match line.get(from..).and_then(|rest| rest.find("*/")) {
        Some(idx) => {
            let end = from + idx + 2;
            (&line[..end], Some(line[end..].trim()))
        }
        None => (line.trim_end(), None),
    }
}
