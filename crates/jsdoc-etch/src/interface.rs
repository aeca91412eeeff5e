//! Interface documentation
//!
//! Interfaces vanish on type erasure, so they are documented as standalone
//! `@typedef {object}` blocks listing one `@property` tag per member.
//! Object literal members are expanded as `parent.child` properties, and
//! method signatures become properties with a function type.

use crate::context::DocContext;
use crate::diagnostics::EtchResult;
use crate::doc_type::render_type;
use crate::js_doc::{JsDoc, JsDocTag};
use crate::merge::{comment_for, harvest, CommentLookup};
use crate::sanitize::sanitize;
use crate::ts_type_params::{type_params_from_swc, TsTypeParamDef, TEMPLATE_TAGS};
use crate::utils::swc::expr_to_name;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{BytePos, Spanned};

/// Tag names a member of an object type can be documented with
const PROPERTY_TAGS: &[&str] = &["property", "prop"];

/// Tags regenerated on every typedef block
const TYPEDEF_TAGS: &[&str] = &["typedef"];

/// Type written for members without a type annotation
const IMPLICIT_ANY: &str = "*";

/// Document an interface declaration
pub fn document_interface(cx: &mut DocContext<'_>, pos: BytePos, decl: &swc_ast::TsInterfaceDecl) -> EtchResult<()> {
    let name = decl.id.sym.to_string();
    tracing::debug!(name = %name, "documenting interface");

    if !decl.extends.is_empty() {
        tracing::trace!(name = %name, "extended interfaces are not listed");
    }

    let type_params = type_params_from_swc(cx.src(), decl.type_params.as_deref());
    push_object_typedef(cx, pos, &name, &type_params, &decl.body.body)
}

/// Write the `@typedef {object}` block of an object type and drop the doc
/// comment it replaces from the source
pub(crate) fn push_object_typedef(
    cx: &mut DocContext<'_>,
    pos: BytePos,
    name: &str,
    type_params: &[TsTypeParamDef],
    members: &[swc_ast::TsTypeElement],
) -> EtchResult<()> {
    let mut target = cx.target(pos);
    let template_comments = harvest(Some(&mut target.doc), TEMPLATE_TAGS)?;
    let property_comments = if target.doc.has_tag("property") || target.doc.has_tag("prop") {
        harvest(Some(&mut target.doc), PROPERTY_TAGS)?
    } else {
        CommentLookup::new()
    };
    target.doc.remove_tags(TYPEDEF_TAGS);

    let mut doc = target.doc;
    doc.add_tags(type_params.iter().map(|p| p.to_tag(&template_comments)));
    doc.add_tag(JsDocTag::new("typedef").with_type("object").with_name(name));

    let mut tags = Vec::new();
    member_tags(cx, members, None, &property_comments, &mut tags);
    doc.add_tags(tags);

    if let Some(existing) = &target.existing {
        cx.remove_existing(existing);
    }
    cx.push_type_block(doc.render(""));
    Ok(())
}

/// Append the tags of an object type's members: properties first, then
/// methods. Nested object literals are listed right after their parent.
fn member_tags(
    cx: &DocContext<'_>,
    members: &[swc_ast::TsTypeElement],
    parent: Option<&str>,
    comments: &CommentLookup,
    out: &mut Vec<JsDocTag>,
) {
    for member in members {
        if let swc_ast::TsTypeElement::TsPropertySignature(prop) = member {
            property_tags(cx, prop, parent, comments, out);
        }
    }
    for member in members {
        match member {
            swc_ast::TsTypeElement::TsPropertySignature(_) => {}
            swc_ast::TsTypeElement::TsMethodSignature(method) => {
                if let Some(tag) = method_tag(cx, method, parent, comments) {
                    out.push(tag);
                }
            }
            other => {
                tracing::warn!(
                    member = cx.text(other.span()),
                    "signature kind cannot be expressed as a property, skipped"
                );
            }
        }
    }
}

fn qualified(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) => format!("{}.{}", parent, name),
        None => name.to_string(),
    }
}

/// Identifier of a member tag: optional members are bracketed
fn member_identifier(path: &str, optional: bool) -> String {
    if optional {
        format!("[{}]", path)
    } else {
        path.to_string()
    }
}

/// Description of a member: its own doc comment, else a harvested comment
fn member_description(cx: &DocContext<'_>, pos: BytePos, path: &str, comments: &CommentLookup) -> Option<String> {
    let own = cx
        .parsed()
        .jsdoc_at(pos)
        .and_then(|existing| JsDoc::parse(&existing.text).description_text())
        .map(|text| sanitize(&text))
        .filter(|text| !text.is_empty());
    own.or_else(|| comment_for(comments, Some(path)).map(str::to_string))
}

fn property_tags(
    cx: &DocContext<'_>,
    prop: &swc_ast::TsPropertySignature,
    parent: Option<&str>,
    comments: &CommentLookup,
    out: &mut Vec<JsDocTag>,
) {
    let Some(name) = (!prop.computed).then(|| expr_to_name(&prop.key)).flatten() else {
        tracing::warn!(key = cx.text(prop.key.span()), "computed property key, skipped");
        return;
    };
    let path = qualified(parent, &name);

    let type_ann = prop.type_ann.as_deref().map(|t| &*t.type_ann);
    let nested = match type_ann {
        Some(swc_ast::TsType::TsTypeLit(lit)) => Some(&lit.members),
        _ => None,
    };
    let doc_type = match (nested, type_ann) {
        (Some(_), _) => "object".to_string(),
        (None, Some(ty)) => render_type(cx.text(ty.span())),
        (None, None) => IMPLICIT_ANY.to_string(),
    };

    let mut tag = JsDocTag::new("property")
        .with_type(doc_type)
        .with_name(member_identifier(&path, prop.optional));
    if let Some(description) = member_description(cx, prop.span.lo, &path, comments) {
        tag = tag.with_comment(description);
    }
    out.push(tag);

    if let Some(members) = nested {
        member_tags(cx, members, Some(&path), comments, out);
    }
}

/// A method signature as a property of function type
fn method_tag(
    cx: &DocContext<'_>,
    method: &swc_ast::TsMethodSignature,
    parent: Option<&str>,
    comments: &CommentLookup,
) -> Option<JsDocTag> {
    let Some(name) = (!method.computed).then(|| expr_to_name(&method.key)).flatten() else {
        tracing::warn!(key = cx.text(method.key.span()), "computed method key, skipped");
        return None;
    };
    let path = qualified(parent, &name);

    if method.type_params.as_ref().is_some_and(|p| !p.params.is_empty()) {
        tracing::warn!(method = %path, "generic methods cannot be documented as properties, skipped");
        return None;
    }

    let params = method
        .params
        .iter()
        .map(|p| fn_param_text(cx, p))
        .collect::<Vec<_>>()
        .join(", ");
    let returns = method
        .type_ann
        .as_ref()
        .map(|t| sanitize(cx.text(t.type_ann.span())))
        .unwrap_or_else(|| "any".to_string());

    let mut tag = JsDocTag::new("property")
        .with_type(format!("({}) => {}", params, returns))
        .with_name(member_identifier(&path, method.optional));
    if let Some(description) = member_description(cx, method.span.lo, &path, comments) {
        tag = tag.with_comment(description);
    }
    Some(tag)
}

/// `name: Type` of a signature parameter, with rest and optional markers
fn fn_param_text(cx: &DocContext<'_>, param: &swc_ast::TsFnParam) -> String {
    let (name, optional, rest, type_ann) = match param {
        swc_ast::TsFnParam::Ident(binding) => (
            binding.id.sym.to_string(),
            binding.id.optional,
            false,
            binding.type_ann.as_deref(),
        ),
        swc_ast::TsFnParam::Rest(rest) => {
            let name = match &*rest.arg {
                swc_ast::Pat::Ident(binding) => binding.id.sym.to_string(),
                other => cx.text(other.span()).to_string(),
            };
            (name, false, true, rest.type_ann.as_deref())
        }
        swc_ast::TsFnParam::Array(array) => (
            pattern_name(cx, array.span, array.type_ann.as_deref()),
            array.optional,
            false,
            array.type_ann.as_deref(),
        ),
        swc_ast::TsFnParam::Object(object) => (
            pattern_name(cx, object.span, object.type_ann.as_deref()),
            object.optional,
            false,
            object.type_ann.as_deref(),
        ),
    };

    let type_text = type_ann
        .map(|t| sanitize(cx.text(t.type_ann.span())))
        .unwrap_or_else(|| "any".to_string());
    format!(
        "{}{}{}: {}",
        if rest { "..." } else { "" },
        name,
        if optional { "?" } else { "" },
        type_text
    )
}

/// Source text of a destructuring pattern without its annotation
fn pattern_name(
    cx: &DocContext<'_>,
    span: deno_ast::swc::common::Span,
    type_ann: Option<&swc_ast::TsTypeAnn>,
) -> String {
    let mut name_span = span;
    if let Some(type_ann) = type_ann {
        if type_ann.span.lo > span.lo && type_ann.span.lo <= span.hi {
            name_span.hi = type_ann.span.lo;
        }
    }
    cx.text(name_span).trim().trim_end_matches('?').trim_end().to_string()
}
