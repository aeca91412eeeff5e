//! TypeScript type parameters (generics)
//!
//! Generic parameters of functions, classes, interfaces and type aliases
//! are documented as `@template` tags:
//! - `T` renders as `@template T`
//! - `T extends Foo` renders as `@template {Foo} T`
//! - `T = string` renders as `@template [T = string]`

use crate::js_doc::JsDocTag;
use crate::merge::{comment_for, CommentLookup};
use crate::utils::swc::SourceInfo;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::Spanned;

/// Tag names a type parameter can be documented with
pub const TEMPLATE_TAGS: &[&str] = &["template"];

/// TypeScript type parameter definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeParamDef {
    /// Parameter name (e.g., "T", "K", "V")
    pub name: String,
    /// Constraint (extends clause) as written
    pub constraint: Option<String>,
    /// Default type as written
    pub default: Option<String>,
}

impl TsTypeParamDef {
    /// Create a new type parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
            default: None,
        }
    }

    /// Set the constraint (extends clause)
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    /// Set the default type
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Read a type parameter from the tree
    pub fn from_swc(src: &SourceInfo, param: &swc_ast::TsTypeParam) -> Self {
        let mut def = Self::new(param.name.sym.to_string());
        if let Some(constraint) = &param.constraint {
            def = def.with_constraint(src.text_for_span(constraint.span()));
        }
        if let Some(default) = &param.default {
            def = def.with_default(src.text_for_span(default.span()));
        }
        def
    }

    /// Render as a `@template` tag, restoring a harvested comment
    pub fn to_tag(&self, comments: &CommentLookup) -> JsDocTag {
        let mut tag = JsDocTag::new("template");
        if let Some(constraint) = &self.constraint {
            tag = tag.with_type(constraint.clone());
        }
        tag = match &self.default {
            Some(default) => tag.with_name(format!("[{} = {}]", self.name, default)),
            None => tag.with_name(self.name.clone()),
        };
        match comment_for(comments, Some(&self.name)) {
            Some(comment) => tag.with_comment(comment),
            None => tag,
        }
    }
}

/// Read all type parameters of a declaration
pub fn type_params_from_swc(
    src: &SourceInfo,
    type_params: Option<&swc_ast::TsTypeParamDecl>,
) -> Vec<TsTypeParamDef> {
    type_params
        .map(|decl| {
            decl.params
                .iter()
                .map(|p| TsTypeParamDef::from_swc(src, p))
                .collect()
        })
        .unwrap_or_default()
}
