//! Type alias documentation
//!
//! An alias of an object literal type is documented like an interface.
//! Any other alias becomes `@typedef {Type} Name` with the aliased type text.

use crate::context::DocContext;
use crate::diagnostics::EtchResult;
use crate::doc_type::render_type;
use crate::interface::push_object_typedef;
use crate::js_doc::JsDocTag;
use crate::merge::harvest;
use crate::ts_type_params::{type_params_from_swc, TEMPLATE_TAGS};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{BytePos, Spanned};

/// Document a type alias declaration
pub fn document_type_alias(cx: &mut DocContext<'_>, pos: BytePos, decl: &swc_ast::TsTypeAliasDecl) -> EtchResult<()> {
    let name = decl.id.sym.to_string();
    tracing::debug!(name = %name, "documenting type alias");

    let type_params = type_params_from_swc(cx.src(), decl.type_params.as_deref());
    if let swc_ast::TsType::TsTypeLit(lit) = &*decl.type_ann {
        return push_object_typedef(cx, pos, &name, &type_params, &lit.members);
    }

    let mut target = cx.target(pos);
    let template_comments = harvest(Some(&mut target.doc), TEMPLATE_TAGS)?;
    target.doc.remove_tags(&["typedef"]);

    let mut doc = target.doc;
    doc.add_tags(type_params.iter().map(|p| p.to_tag(&template_comments)));
    doc.add_tag(
        JsDocTag::new("typedef")
            .with_type(render_type(cx.text(decl.type_ann.span())))
            .with_name(name),
    );

    if let Some(existing) = &target.existing {
        cx.remove_existing(existing);
    }
    cx.push_type_block(doc.render(""));
    Ok(())
}
