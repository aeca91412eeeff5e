//! Function documentation
//!
//! Documents function declarations, function expressions and arrow
//! functions assigned to variables, class methods, accessors and
//! constructors. Tags are appended as templates, then parameters, then the
//! return type.

use crate::context::{DocContext, DocTarget};
use crate::diagnostics::EtchResult;
use crate::doc_type::{render_type, UNKNOWN_TYPE};
use crate::infer::TypeInference;
use crate::js_doc::{JsDoc, JsDocTag};
use crate::merge::{comment_for, harvest, CommentLookup};
use crate::params::{params_from_pats, params_from_swc, ParamDef, PARAM_TAGS};
use crate::ts_type_params::{type_params_from_swc, TsTypeParamDef, TEMPLATE_TAGS};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{BytePos, Spanned};

/// Tag names a return value can be documented with
pub const RETURN_TAGS: &[&str] = &["returns", "return"];

/// When a `@returns` tag is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnPolicy {
    /// Always; an unknown type renders as `?`
    Always,
    /// Only for an annotated or inferable type
    WhenKnown,
    /// Never (constructors, setters)
    Never,
}

/// Function definition, as far as documentation is concerned
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Type parameters
    pub type_params: Vec<TsTypeParamDef>,
    /// Parameters
    pub params: Vec<ParamDef>,
    /// Return type annotation as written
    pub return_type: Option<String>,
    /// Return type inferred from the body
    pub inferred_return: Option<String>,
    /// When to write the return tag
    pub returns: ReturnPolicy,
}

impl FunctionDef {
    /// Read a function declaration, function expression or method
    pub fn from_function(cx: &DocContext<'_>, function: &swc_ast::Function, returns: ReturnPolicy) -> Self {
        let src = cx.src();
        let params = params_from_swc(src, &function.params);
        let return_type = function
            .return_type
            .as_ref()
            .map(|t| cx.text(t.type_ann.span()).to_string());
        let inferred_return = match (&return_type, returns) {
            (None, ReturnPolicy::Always | ReturnPolicy::WhenKnown) => {
                inference_for(cx, &params).function_return(function)
            }
            _ => None,
        };
        Self {
            type_params: type_params_from_swc(src, function.type_params.as_deref()),
            params,
            return_type,
            inferred_return,
            returns,
        }
    }

    /// Read an arrow function
    pub fn from_arrow(cx: &DocContext<'_>, arrow: &swc_ast::ArrowExpr) -> Self {
        let src = cx.src();
        let params = params_from_pats(src, &arrow.params);
        let return_type = arrow
            .return_type
            .as_ref()
            .map(|t| cx.text(t.type_ann.span()).to_string());
        let inferred_return = match &return_type {
            None => inference_for(cx, &params).arrow_return(arrow),
            Some(_) => None,
        };
        Self {
            type_params: type_params_from_swc(src, arrow.type_params.as_deref()),
            params,
            return_type,
            inferred_return,
            returns: ReturnPolicy::Always,
        }
    }

    /// Read a class constructor
    pub fn from_constructor(cx: &DocContext<'_>, ctor: &swc_ast::Constructor) -> Self {
        let params = ctor
            .params
            .iter()
            .filter_map(|p| ParamDef::from_ctor_param(cx.src(), p))
            .collect();
        Self {
            type_params: Vec::new(),
            params,
            return_type: None,
            inferred_return: None,
            returns: ReturnPolicy::Never,
        }
    }

    /// The `@returns` tag, if one is written
    fn return_tag(&self, comments: &CommentLookup) -> Option<JsDocTag> {
        let doc_type = match (&self.return_type, &self.inferred_return, self.returns) {
            (_, _, ReturnPolicy::Never) => return None,
            (Some(annotated), _, _) => render_type(annotated),
            (None, Some(inferred), _) => render_type(inferred),
            (None, None, ReturnPolicy::Always) => UNKNOWN_TYPE.to_string(),
            (None, None, ReturnPolicy::WhenKnown) => return None,
        };
        if doc_type == "void" {
            tracing::trace!("return type is void, not documented");
            return None;
        }

        let tag = JsDocTag::new("returns").with_type(doc_type);
        Some(match comment_for(comments, None) {
            Some(comment) => tag.with_comment(comment),
            None => tag,
        })
    }

    /// Regenerate the function tags of a doc block.
    ///
    /// Comments of existing template, parameter and return tags are
    /// harvested and carried over to the regenerated tags.
    pub fn document(&self, doc: &mut JsDoc) -> EtchResult<()> {
        let template_comments = harvest(Some(&mut *doc), TEMPLATE_TAGS)?;
        let param_comments = harvest(Some(&mut *doc), PARAM_TAGS)?;
        let return_comments = harvest(Some(&mut *doc), RETURN_TAGS)?;

        doc.add_tags(self.type_params.iter().map(|p| p.to_tag(&template_comments)));
        doc.add_tags(self.params.iter().filter_map(|p| p.to_tag(&param_comments)));
        if let Some(tag) = self.return_tag(&return_comments) {
            doc.add_tag(tag);
        }
        Ok(())
    }
}

/// Inference that knows the annotated parameters of a function
fn inference_for<'a>(cx: &DocContext<'a>, params: &[ParamDef]) -> TypeInference<'a> {
    params
        .iter()
        .filter(|p| !p.name.contains(['{', '[', ',']))
        .fold(TypeInference::new(cx.src()), |inference, p| match &p.type_text {
            Some(type_text) => inference.with_binding(p.name.clone(), type_text.clone()),
            None => inference,
        })
}

/// Document a function whose doc comment belongs to the node at `pos`
pub fn document_function(cx: &mut DocContext<'_>, pos: BytePos, def: &FunctionDef) -> EtchResult<()> {
    let mut target: DocTarget = cx.target(pos);
    def.document(&mut target.doc)?;
    cx.attach(target);
    Ok(())
}

/// Document a function declaration
pub fn document_fn_decl(cx: &mut DocContext<'_>, pos: BytePos, decl: &swc_ast::FnDecl) -> EtchResult<()> {
    if decl.declare || decl.function.body.is_none() {
        tracing::trace!(name = %decl.ident.sym, "skipping overload signature");
        return Ok(());
    }
    tracing::debug!(name = %decl.ident.sym, "documenting function");
    let def = FunctionDef::from_function(cx, &decl.function, ReturnPolicy::Always);
    document_function(cx, pos, &def)
}

/// Document a function-valued initializer at its variable statement
pub fn document_fn_initializer(cx: &mut DocContext<'_>, pos: BytePos, init: &swc_ast::Expr) -> EtchResult<bool> {
    let def = match init {
        swc_ast::Expr::Fn(f) if f.function.body.is_some() => {
            FunctionDef::from_function(cx, &f.function, ReturnPolicy::Always)
        }
        swc_ast::Expr::Arrow(arrow) => FunctionDef::from_arrow(cx, arrow),
        _ => return Ok(false),
    };
    document_function(cx, pos, &def)?;
    Ok(true)
}

/// Whether an initializer is a function expression or arrow function
pub fn is_function_like(init: &swc_ast::Expr) -> bool {
    matches!(init, swc_ast::Expr::Fn(_) | swc_ast::Expr::Arrow(_))
}
