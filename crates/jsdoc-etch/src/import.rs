//! Import documentation
//!
//! Value imports are emitted verbatim, only `import type` declarations and
//! `type` qualified specifiers vanish on type erasure. Each of their
//! bindings is kept as a `@typedef {import('module').Name} Local` tag so the
//! documented types still resolve. Namespace imports are left alone.

use crate::context::DocContext;
use crate::js_doc::{JsDoc, JsDocTag};
use crate::utils::swc::wtf8_to_string;
use deno_ast::swc::ast as swc_ast;

/// Document the type-only bindings of an import declaration
pub fn document_import(cx: &mut DocContext<'_>, import: &swc_ast::ImportDecl) {
    let module = wtf8_to_string(&import.src);
    tracing::debug!(module = %module, type_only = import.type_only, "documenting import");

    let mut doc = JsDoc::new();
    for specifier in &import.specifiers {
        let (local, doc_type) = match specifier {
            swc_ast::ImportSpecifier::Default(default) if import.type_only => {
                (&default.local, format!("import('{}')", module))
            }
            swc_ast::ImportSpecifier::Named(named) if import.type_only || named.is_type_only => {
                let imported = match &named.imported {
                    Some(swc_ast::ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                    Some(swc_ast::ModuleExportName::Str(s)) => wtf8_to_string(s),
                    None => named.local.sym.to_string(),
                };
                (&named.local, format!("import('{}').{}", module, imported))
            }
            _ => continue,
        };
        tracing::trace!(local = %local.sym, "type-only import binding");
        doc.add_tag(JsDocTag::new("typedef").with_type(doc_type).with_name(local.sym.to_string()));
    }

    if !doc.is_empty() {
        cx.push_type_block(doc.render(""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::swc::parse_source;
    use deno_ast::MediaType;
    use pretty_assertions::assert_eq;

    fn blocks_of(source: &str) -> Vec<String> {
        let parsed = parse_source(source, MediaType::TypeScript).unwrap();
        let mut cx = DocContext::new(&parsed);
        let module = parsed.module().unwrap();
        for item in &module.body {
            if let swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::Import(import)) = item {
                document_import(&mut cx, import);
            }
        }
        cx.finish().1
    }

    #[test]
    fn test_type_only_declaration() {
        let blocks = blocks_of("import type Default from './types';\nimport type { A, B as C } from './types';\n");
        assert_eq!(
            blocks,
            vec![
                "/**\n * @typedef {import('./types')} Default\n */",
                "/**\n * @typedef {import('./types').A} A\n * @typedef {import('./types').B} C\n */",
            ]
        );
    }

    #[test]
    fn test_type_only_specifier() {
        let blocks = blocks_of("import { type A, b } from 'lib';\nb(1);\n");
        assert_eq!(blocks, vec!["/**\n * @typedef {import('lib').A} A\n */"]);
    }

    #[test]
    fn test_value_imports_are_not_documented() {
        let blocks = blocks_of(
            "import * as assert from 'node:assert';\nimport { Node } from 'ts-morph';\nimport Default from './default';\nfunction aFunction(node: Node, d: Default) {}\n",
        );
        assert!(blocks.is_empty());
    }
}
