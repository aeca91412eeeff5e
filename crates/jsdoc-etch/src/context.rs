//! Shared state of one documenting pass
//!
//! Every documenter reads the parsed module through a [`DocContext`] and
//! writes its results back into it: doc comments as [`TextEdit`]s against
//! the source text, and typedef blocks for declarations that vanish on
//! type erasure.

use crate::edits::TextEdit;
use crate::js_doc::JsDoc;
use crate::utils::swc::{ExistingDoc, ParsedModule, SourceInfo};
use deno_ast::swc::common::BytePos;

/// Documentation target: the existing doc comment of a node, if any, and
/// the block that will replace it
pub struct DocTarget {
    /// Start of the node the doc is attached to
    pub pos: BytePos,
    /// Comment found in the source
    pub existing: Option<ExistingDoc>,
    /// Block being built; starts as the parsed existing comment
    pub doc: JsDoc,
}

impl DocTarget {
    /// Whether the node already carried a doc comment
    pub fn has_existing(&self) -> bool {
        self.existing.is_some()
    }
}

/// Accumulated output of the documenters
pub struct DocContext<'a> {
    parsed: &'a ParsedModule,
    edits: Vec<TextEdit>,
    type_blocks: Vec<String>,
}

impl<'a> DocContext<'a> {
    /// Create a context over a parsed module
    pub fn new(parsed: &'a ParsedModule) -> Self {
        Self {
            parsed,
            edits: Vec::new(),
            type_blocks: Vec::new(),
        }
    }

    /// The parsed module
    pub fn parsed(&self) -> &'a ParsedModule {
        self.parsed
    }

    /// Source information for span lookups
    pub fn src(&self) -> &'a SourceInfo {
        &self.parsed.source_info
    }

    /// Source text of a span
    pub fn text(&self, span: deno_ast::swc::common::Span) -> &'a str {
        self.parsed.source_info.text_for_span(span)
    }

    /// Open the doc comment of the node starting at `pos`
    pub fn target(&self, pos: BytePos) -> DocTarget {
        let existing = self.parsed.jsdoc_at(pos);
        let doc = existing
            .as_ref()
            .map(|e| JsDoc::parse(&e.text))
            .unwrap_or_default();
        DocTarget { pos, existing, doc }
    }

    /// Write a target back: its existing comment is replaced, otherwise a
    /// new comment is inserted before the node when the block has content.
    /// An untouched existing comment stays as written.
    pub fn attach(&mut self, target: DocTarget) {
        match target.existing {
            Some(existing) if JsDoc::parse(&existing.text) == target.doc => {}
            Some(existing) => {
                let text = if target.doc.is_empty() {
                    String::new()
                } else {
                    let indent = self.parsed.indent_at(existing.range.start);
                    target.doc.render(indent)
                };
                self.edits.push(TextEdit::replace(existing.range, text));
            }
            None if !target.doc.is_empty() => {
                let offset = self.parsed.offset(target.pos);
                let indent = self.parsed.indent_at(offset);
                let text = format!("{}\n{}", target.doc.render(indent), indent);
                self.edits.push(TextEdit::insert(offset, text));
            }
            None => {}
        }
    }

    /// Record an edit that is not tied to a doc comment
    pub fn push_edit(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    /// Remove the doc comment of a node that erasure drops
    pub fn remove_existing(&mut self, existing: &ExistingDoc) {
        self.edits.push(TextEdit::remove(existing.range.clone()));
    }

    /// Keep a typedef block for the reserved insertion point
    pub fn push_type_block(&mut self, block: impl Into<String>) {
        let block = block.into();
        let block = block.trim();
        if !block.is_empty() {
            self.type_blocks.push(block.to_string());
        }
    }

    /// Recorded edits and typedef blocks
    pub fn finish(self) -> (Vec<TextEdit>, Vec<String>) {
        (self.edits, self.type_blocks)
    }
}
