//! Class documentation
//!
//! A class gets `@abstract`, `@template` and `@implements` tags. Its members
//! get their modifiers as tags, properties a `@type` tag, and constructors,
//! methods and accessors the function tags.

use crate::context::DocContext;
use crate::diagnostics::EtchResult;
use crate::doc_type::render_type;
use crate::function::{FunctionDef, ReturnPolicy};
use crate::js_doc::{JsDoc, JsDocTag};
use crate::merge::harvest;
use crate::ts_type_params::{type_params_from_swc, TEMPLATE_TAGS};
use crate::utils::swc::accessibility_str;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{BytePos, Spanned};

/// Tags regenerated on the class itself
const CLASS_TAGS: &[&str] = &["abstract", "implements"];

/// Document a class and its members
pub fn document_class(
    cx: &mut DocContext<'_>,
    pos: BytePos,
    name: Option<&str>,
    class: &swc_ast::Class,
) -> EtchResult<()> {
    tracing::debug!(name = name.unwrap_or("default"), "documenting class");

    let mut tags = Vec::new();
    if class.is_abstract {
        tags.push(JsDocTag::new("abstract"));
    }

    let mut target = cx.target(pos);
    let template_comments = harvest(Some(&mut target.doc), TEMPLATE_TAGS)?;
    tags.extend(
        type_params_from_swc(cx.src(), class.type_params.as_deref())
            .iter()
            .map(|p| p.to_tag(&template_comments)),
    );
    for implemented in &class.implements {
        let text = cx.text(implemented.span());
        tags.push(JsDocTag::new("implements").with_type(render_type(text)));
    }

    target.doc.remove_tags(CLASS_TAGS);
    target.doc.add_tags(tags);
    cx.attach(target);

    for member in &class.body {
        document_member(cx, member)?;
    }
    Ok(())
}

/// Modifier tags of a member, skipping those already documented
fn modifier_tags(
    doc: &JsDoc,
    accessibility: Option<swc_ast::Accessibility>,
    readonly: bool,
) -> Vec<JsDocTag> {
    let mut names = Vec::new();
    if let Some(keyword) = accessibility_str(accessibility) {
        names.push(keyword);
    }
    if readonly {
        names.push("readonly");
    }
    names
        .into_iter()
        .filter(|name| !doc.has_tag(name))
        .map(JsDocTag::new)
        .collect()
}

fn document_member(cx: &mut DocContext<'_>, member: &swc_ast::ClassMember) -> EtchResult<()> {
    match member {
        swc_ast::ClassMember::Constructor(ctor) => {
            if ctor.body.is_none() {
                return Ok(());
            }
            let mut target = cx.target(ctor.span.lo);
            let modifiers = modifier_tags(&target.doc, ctor.accessibility, false);
            target.doc.add_tags(modifiers);
            FunctionDef::from_constructor(cx, ctor).document(&mut target.doc)?;
            cx.attach(target);
        }
        swc_ast::ClassMember::Method(method) => {
            if method.function.body.is_none() {
                return Ok(());
            }
            let mut target = cx.target(method.span.lo);
            let modifiers = modifier_tags(&target.doc, method.accessibility, false);
            target.doc.add_tags(modifiers);
            method_def(cx, method.kind, &method.function).document(&mut target.doc)?;
            cx.attach(target);
        }
        swc_ast::ClassMember::PrivateMethod(method) => {
            if method.function.body.is_none() {
                return Ok(());
            }
            let mut target = cx.target(method.span.lo);
            method_def(cx, method.kind, &method.function).document(&mut target.doc)?;
            cx.attach(target);
        }
        swc_ast::ClassMember::ClassProp(prop) => {
            if prop.declare || prop.is_abstract {
                return Ok(());
            }
            let type_text = prop.type_ann.as_ref().map(|t| cx.text(t.type_ann.span()));
            document_property(cx, prop.span.lo, prop.accessibility, prop.readonly, type_text);
        }
        swc_ast::ClassMember::PrivateProp(prop) => {
            let type_text = prop.type_ann.as_ref().map(|t| cx.text(t.type_ann.span()));
            document_property(cx, prop.span.lo, None, prop.readonly, type_text);
        }
        // static blocks, index signatures and auto accessors carry no tags
        _ => {}
    }
    Ok(())
}

fn method_def(cx: &DocContext<'_>, kind: swc_ast::MethodKind, function: &swc_ast::Function) -> FunctionDef {
    let returns = match kind {
        swc_ast::MethodKind::Setter => ReturnPolicy::Never,
        swc_ast::MethodKind::Method | swc_ast::MethodKind::Getter => ReturnPolicy::WhenKnown,
    };
    FunctionDef::from_function(cx, function, returns)
}

fn document_property(
    cx: &mut DocContext<'_>,
    pos: BytePos,
    accessibility: Option<swc_ast::Accessibility>,
    readonly: bool,
    type_text: Option<&str>,
) {
    let mut target = cx.target(pos);
    let modifiers = modifier_tags(&target.doc, accessibility, readonly);
    target.doc.add_tags(modifiers);

    if let Some(type_text) = type_text {
        let doc_type = render_type(type_text);
        if !doc_type.is_empty() {
            target.doc.remove_tags(&["type"]);
            target.doc.add_tag(JsDocTag::new("type").with_type(doc_type));
        }
    }
    cx.attach(target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edits::apply_edits;
    use crate::utils::swc::parse_source;
    use deno_ast::MediaType;
    use pretty_assertions::assert_eq;

    /// Document the first class of a source and return the annotated text
    fn annotate(source: &str) -> String {
        let parsed = parse_source(source, MediaType::TypeScript).unwrap();
        let mut cx = DocContext::new(&parsed);
        let module = parsed.module().unwrap();
        let swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(swc_ast::Decl::Class(class))) = &module.body[0] else {
            panic!("expected a class declaration");
        };
        document_class(&mut cx, class.class.span.lo, Some(&*class.ident.sym), &class.class).unwrap();
        let (edits, _) = cx.finish();
        apply_edits(source, &edits)
    }

    #[test]
    fn test_generic_class() {
        let source = "class Box<Type> {\n  contents: Type;\n  constructor(value: Type) {\n    this.contents = value;\n  }\n}\n";
        let annotated = annotate(source);
        assert!(annotated.starts_with("/**\n * @template Type\n */\nclass Box<Type> {"));
        assert!(annotated.contains("  /**\n   * @type {Type}\n   */\n  contents: Type;"));
        assert!(annotated.contains("  /**\n   * @param {Type} value\n   */\n  constructor(value: Type) {"));
    }

    #[test]
    fn test_abstract_and_implements() {
        let source = "abstract class Shape<T extends object = {}> implements Drawable, Sized<number> {}\n";
        let annotated = annotate(source);
        assert!(annotated.starts_with(
            "/**\n * @abstract\n * @template {object} [T = {}]\n * @implements {Drawable}\n * @implements {Sized<number>}\n */\nabstract class"
        ));
    }

    #[test]
    fn test_member_modifiers() {
        let source = "class Account {\n  private readonly id: string = '';\n  protected balance = 0;\n  static count: number;\n}\n";
        let annotated = annotate(source);
        assert!(annotated.contains("  /**\n   * @private\n   * @readonly\n   * @type {string}\n   */\n  private readonly id"));
        assert!(annotated.contains("  /**\n   * @protected\n   */\n  protected balance = 0;"));
        assert!(annotated.contains("  /**\n   * @type {number}\n   */\n  static count: number;"));
    }

    #[test]
    fn test_accessors_and_methods() {
        let source = "class Thing {\n  _size = 0;\n  get size(): number {\n    return this._size;\n  }\n  set size(value: string | number | boolean) {\n    this._size = Number(value);\n  }\n  describe() {\n    return 'thing';\n  }\n  reset(): void {}\n}\n";
        let annotated = annotate(source);
        assert!(annotated.contains("  /**\n   * @returns {number}\n   */\n  get size()"));
        assert!(annotated.contains("  /**\n   * @param {string | number | boolean} value\n   */\n  set size("));
        assert!(annotated.contains("  /**\n   * @returns {string}\n   */\n  describe()"));
        assert!(annotated.contains("\n  reset(): void {}"));
        assert!(!annotated.contains("@returns {void}"));
    }

    #[test]
    fn test_existing_member_doc_is_extended() {
        let source = "class A {\n  /** The name */\n  private name: string;\n}\n";
        let annotated = annotate(source);
        assert!(annotated.contains("  /**\n   * The name\n   * @private\n   * @type {string}\n   */\n  private name: string;"));
    }

    #[test]
    fn test_untouched_doc_stays() {
        let source = "class A {\n  /** Runs it */\n  run(x) {}\n}\n";
        assert_eq!(annotate(source), source);
    }
}
