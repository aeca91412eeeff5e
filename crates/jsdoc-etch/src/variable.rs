//! Variable documentation
//!
//! Top-level `var`, `let` and `const` statements get a `@type` tag. A
//! `const` without annotation is left alone, its type is evident from the
//! initializer. Function-valued initializers are documented as functions.

use crate::context::DocContext;
use crate::diagnostics::EtchResult;
use crate::doc_type::{render_type, UNKNOWN_TYPE};
use crate::function::{document_fn_initializer, is_function_like};
use crate::infer::TypeInference;
use crate::js_doc::{JsDoc, JsDocTag};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{BytePos, Spanned};

/// Tag names marking a constant
const CONSTANT_TAGS: &[&str] = &["const", "constant"];

/// Type of a declaration with neither annotation nor initializer
const IMPLICIT_ANY: &str = "*";

/// Document a variable statement whose doc comment belongs to the node at
/// `pos`. The statement shares one comment, so its first declarator decides
/// what is documented; later declarators find the type already there.
pub fn document_var_decl(cx: &mut DocContext<'_>, pos: BytePos, var: &swc_ast::VarDecl) -> EtchResult<()> {
    if var.declare {
        return Ok(());
    }
    let Some(decl) = var.decls.first() else {
        return Ok(());
    };
    tracing::debug!(
        name = binding_name(cx, &decl.name),
        declarators = var.decls.len(),
        "documenting variable"
    );

    if let Some(init) = decl.init.as_deref().filter(|init| is_function_like(init)) {
        tracing::trace!("variable has a function initializer");
        document_fn_initializer(cx, pos, init)?;
        return Ok(());
    }

    let is_const = var.kind == swc_ast::VarDeclKind::Const;
    let annotation = binding_type(&decl.name).map(|t| cx.text(t.type_ann.span()));
    if is_const && annotation.is_none() {
        tracing::trace!("const without annotation, no need to document");
        return Ok(());
    }

    let mut target = cx.target(pos);
    if is_documented(&target.doc) {
        tracing::trace!("type is already documented");
        return Ok(());
    }

    let doc_type = match (annotation, decl.init.as_deref()) {
        (Some(annotation), _) => render_type(annotation),
        (None, Some(init)) => TypeInference::new(cx.src())
            .expr(init)
            .map(|t| render_type(&t))
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        (None, None) => IMPLICIT_ANY.to_string(),
    };
    target.doc.add_tag(JsDocTag::new("type").with_type(doc_type));
    cx.attach(target);
    Ok(())
}

/// An existing `@type` tag, or a constant tag that states the type itself
fn is_documented(doc: &JsDoc) -> bool {
    doc.has_tag("type")
        || doc
            .tags_named(CONSTANT_TAGS)
            .any(|tag| tag.type_expr.is_some() || tag.comment().is_some())
}

fn binding_type(pat: &swc_ast::Pat) -> Option<&swc_ast::TsTypeAnn> {
    match pat {
        swc_ast::Pat::Ident(binding) => binding.type_ann.as_deref(),
        swc_ast::Pat::Array(array) => array.type_ann.as_deref(),
        swc_ast::Pat::Object(object) => object.type_ann.as_deref(),
        _ => None,
    }
}

fn binding_name<'a>(cx: &DocContext<'a>, pat: &swc_ast::Pat) -> &'a str {
    match pat {
        swc_ast::Pat::Ident(binding) => cx.text(binding.id.span),
        other => cx.text(other.span()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edits::apply_edits;
    use crate::utils::swc::parse_source;
    use deno_ast::MediaType;
    use pretty_assertions::assert_eq;

    fn annotate(source: &str) -> String {
        let parsed = parse_source(source, MediaType::TypeScript).unwrap();
        let mut cx = DocContext::new(&parsed);
        let module = parsed.module().unwrap();
        for item in &module.body {
            if let swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(swc_ast::Decl::Var(var))) = item {
                document_var_decl(&mut cx, var.span.lo, var).unwrap();
            }
        }
        let (edits, _) = cx.finish();
        apply_edits(source, &edits)
    }

    #[test]
    fn test_const_declarations() {
        let source = "const foo = 'foo';\nconst bar: string = 'bar';\n\n/**\n * Baz\n */\nconst baz: boolean = true;\n";
        assert_eq!(
            annotate(source),
            "const foo = 'foo';\n/**\n * @type {string}\n */\nconst bar: string = 'bar';\n\n/**\n * Baz\n * @type {boolean}\n */\nconst baz: boolean = true;\n"
        );
    }

    #[test]
    fn test_let_declarations() {
        let source = "let a = undefined;\nlet h = [1, 2, '3'];\nlet j = { foo: 'bar' };\nlet s: Array<number | string>;\nlet x;\nlet y = compute();\n";
        let annotated = annotate(source);
        assert!(annotated.contains("/**\n * @type {*}\n */\nlet a = undefined;"));
        assert!(annotated.contains("/**\n * @type {(string | number)[]}\n */\nlet h"));
        assert!(annotated.contains("/**\n * @type {{ foo: string; }}\n */\nlet j"));
        assert!(annotated.contains("/**\n * @type {(number | string)[]}\n */\nlet s"));
        assert!(annotated.contains("/**\n * @type {*}\n */\nlet x;"));
        assert!(annotated.contains("/**\n * @type {?}\n */\nlet y"));
    }

    #[test]
    fn test_existing_type_is_kept() {
        let source = "/**\n * Quux\n * @constant\n * @type {number}\n */\nconst quux: number = 1;\n\n/** @constant {number} */\nvar ONE = 1;\n";
        assert_eq!(annotate(source), source);
    }

    #[test]
    fn test_const_tag_without_type() {
        let source = "/**\n * Foo\n *\n * @const\n */\nconst foo: string = 'foo';\n";
        assert_eq!(
            annotate(source),
            "/**\n * Foo\n *\n * @const\n * @type {string}\n */\nconst foo: string = 'foo';\n"
        );
    }

    #[test]
    fn test_function_initializers() {
        let source = "let n = function () {};\nconst add = (a: number, b: number) => a + b;\n";
        assert_eq!(
            annotate(source),
            "let n = function () {};\n/**\n * @param {number} a\n * @param {number} b\n * @returns {number}\n */\nconst add = (a: number, b: number) => a + b;\n"
        );
    }

    #[test]
    fn test_multiple_declarators() {
        let source = "let a: number = 1, b: string = 'x';\n";
        assert_eq!(
            annotate(source),
            "/**\n * @type {number}\n */\nlet a: number = 1, b: string = 'x';\n"
        );

        let source = "let count = 0, label = 'two';\nconst done = true, total: number = 2;\n";
        assert_eq!(
            annotate(source),
            "/**\n * @type {number}\n */\nlet count = 0, label = 'two';\nconst done = true, total: number = 2;\n"
        );
    }
}
