//! Harvesting of hand-written tag comments from existing doc blocks
//!
//! Before generated tags are written into an existing block, the comments
//! of the tags they replace are collected by identifier and the old tags
//! are dropped. The documenters then append each comment to the generated
//! tag with the same identifier.

use std::collections::HashMap;

use crate::diagnostics::{EtchError, EtchResult};
use crate::js_doc::JsDoc;
use crate::sanitize::sanitize;

/// Tag comments keyed by identifier; tags without one use `None`
pub type CommentLookup = HashMap<Option<String>, String>;

/// Collect the comments of all tags named in `tag_names`, then remove those
/// tags from `doc`.
///
/// Only non-empty comments are kept, sanitized. Fails when no doc block or
/// no tag names are supplied.
pub fn harvest(doc: Option<&mut JsDoc>, tag_names: &[&str]) -> EtchResult<CommentLookup> {
    let doc = doc.ok_or(EtchError::MissingArgument("doc block"))?;
    if tag_names.is_empty() {
        return Err(EtchError::MissingArgument("tag names"));
    }

    let mut lookup = CommentLookup::new();
    for tag in doc.tags_named(tag_names) {
        let Some(comment) = tag.comment() else {
            continue;
        };
        let comment = sanitize(comment);
        if comment.is_empty() {
            continue;
        }
        lookup.insert(tag.identifier().map(str::to_string), comment);
    }

    let removed = doc.remove_tags(tag_names);
    tracing::trace!(removed, kept = lookup.len(), "harvested tag comments");
    Ok(lookup)
}

/// Find the harvested comment for an identifier
pub fn comment_for<'a>(lookup: &'a CommentLookup, identifier: Option<&str>) -> Option<&'a str> {
    lookup
        .get(&identifier.map(str::to_string))
        .map(String::as_str)
}
