//! Parameter definitions
//!
//! Parameters of functions, methods, constructors and accessors, read from
//! the tree and rendered as `@param` tags.

use crate::doc_type::render_type;
use crate::js_doc::JsDocTag;
use crate::merge::{comment_for, CommentLookup};
use crate::utils::swc::SourceInfo;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::Spanned;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ARRAY_SUFFIX: Regex = Regex::new(r"\[\]\s*$").unwrap();
}

/// Tag names a parameter can be documented with
pub const PARAM_TAGS: &[&str] = &["param", "arg", "argument"];

/// Parameter definition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamDef {
    /// Parameter name, or the binding pattern text for destructured ones
    pub name: String,
    /// Type annotation as written
    pub type_text: Option<String>,
    /// Whether this parameter is optional
    pub optional: bool,
    /// Default value as written
    pub default: Option<String>,
    /// Whether this is a rest parameter (...args)
    pub rest: bool,
}

impl ParamDef {
    /// Create a parameter with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the type annotation
    pub fn with_type(mut self, type_text: impl Into<String>) -> Self {
        self.type_text = Some(type_text.into());
        self
    }

    /// Mark as optional
    pub fn as_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set default value
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self.optional = true; // Default implies optional
        self
    }

    /// Mark as rest parameter
    pub fn as_rest(mut self) -> Self {
        self.rest = true;
        self
    }

    /// Read a parameter from its binding pattern
    pub fn from_pat(src: &SourceInfo, pat: &swc_ast::Pat) -> Option<Self> {
        match pat {
            swc_ast::Pat::Ident(binding) => {
                let mut def = Self::named(binding.id.sym.to_string());
                if let Some(type_ann) = &binding.type_ann {
                    def = def.with_type(src.text_for_span(type_ann.type_ann.span()));
                }
                if binding.id.optional {
                    def = def.as_optional();
                }
                Some(def)
            }
            swc_ast::Pat::Rest(rest) => {
                let mut def = Self::from_pat(src, &rest.arg)?.as_rest();
                if let Some(type_ann) = &rest.type_ann {
                    def = def.with_type(src.text_for_span(type_ann.type_ann.span()));
                }
                Some(def)
            }
            swc_ast::Pat::Assign(assign) => {
                let def = Self::from_pat(src, &assign.left)?;
                Some(def.with_default(src.text_for_span(assign.right.span())))
            }
            swc_ast::Pat::Array(array) => Some(Self::from_pattern_text(
                src,
                array.span,
                array.type_ann.as_deref(),
                array.optional,
            )),
            swc_ast::Pat::Object(object) => Some(Self::from_pattern_text(
                src,
                object.span,
                object.type_ann.as_deref(),
                object.optional,
            )),
            _ => None,
        }
    }

    /// Destructuring patterns keep their source text as the name
    fn from_pattern_text(
        src: &SourceInfo,
        span: deno_ast::swc::common::Span,
        type_ann: Option<&swc_ast::TsTypeAnn>,
        optional: bool,
    ) -> Self {
        let mut name_span = span;
        if let Some(type_ann) = type_ann {
            if type_ann.span.lo > span.lo && type_ann.span.lo <= span.hi {
                name_span.hi = type_ann.span.lo;
            }
        }
        let name = src.text_for_span(name_span).trim().trim_end_matches('?');
        let mut def = Self::named(name.trim_end());
        if let Some(type_ann) = type_ann {
            def = def.with_type(src.text_for_span(type_ann.type_ann.span()));
        }
        if optional {
            def = def.as_optional();
        }
        def
    }

    /// Read a constructor parameter, which may be a parameter property
    pub fn from_ctor_param(src: &SourceInfo, param: &swc_ast::ParamOrTsParamProp) -> Option<Self> {
        match param {
            swc_ast::ParamOrTsParamProp::Param(p) => Self::from_pat(src, &p.pat),
            swc_ast::ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                swc_ast::TsParamPropParam::Ident(binding) => {
                    Self::from_pat(src, &swc_ast::Pat::Ident(binding.clone()))
                }
                swc_ast::TsParamPropParam::Assign(assign) => {
                    Self::from_pat(src, &swc_ast::Pat::Assign(assign.clone()))
                }
            },
        }
    }

    /// The identifier of the `@param` tag; destructuring patterns have none
    pub fn doc_identifier(&self) -> String {
        if self.name.contains(['{', ',', '}']) {
            return String::new();
        }
        if self.optional && !self.rest && !self.name.is_empty() {
            match &self.default {
                Some(default) if !default.is_empty() => format!("[{}={}]", self.name, default),
                _ => format!("[{}]", self.name),
            }
        } else {
            self.name.clone()
        }
    }

    /// The type of the `@param` tag; rest parameters get `...T` for `T[]`
    pub fn doc_type(&self) -> Option<String> {
        let rendered = render_type(self.type_text.as_deref()?);
        if self.rest {
            Some(format!("...{}", ARRAY_SUFFIX.replace(&rendered, "")))
        } else {
            Some(rendered)
        }
    }

    /// Render as a `@param` tag, restoring a harvested comment.
    ///
    /// Parameters without a type annotation are not documented.
    pub fn to_tag(&self, comments: &CommentLookup) -> Option<JsDocTag> {
        let tag = JsDocTag::new("param")
            .with_type(self.doc_type()?)
            .with_name(self.doc_identifier());
        Some(match comment_for(comments, Some(&self.name)) {
            Some(comment) => tag.with_comment(comment),
            None => tag,
        })
    }
}

/// Read the parameters of a function
pub fn params_from_swc(src: &SourceInfo, params: &[swc_ast::Param]) -> Vec<ParamDef> {
    params
        .iter()
        .filter_map(|p| ParamDef::from_pat(src, &p.pat))
        .collect()
}

/// Read the parameters of an arrow function
pub fn params_from_pats(src: &SourceInfo, pats: &[swc_ast::Pat]) -> Vec<ParamDef> {
    pats.iter()
        .filter_map(|p| ParamDef::from_pat(src, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::swc::parse_source;
    use deno_ast::MediaType;
    use pretty_assertions::assert_eq;

    fn params_of(source: &str) -> Vec<ParamDef> {
        let parsed = parse_source(source, MediaType::TypeScript).unwrap();
        let module = parsed.module().unwrap();
        let swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(swc_ast::Decl::Fn(f))) = &module.body[0] else {
            panic!("expected a function declaration");
        };
        params_from_swc(&parsed.source_info, &f.function.params)
    }

    fn render(param: &ParamDef) -> Option<String> {
        param.to_tag(&CommentLookup::new()).map(|t| t.render())
    }

    #[test]
    fn test_read_params() {
        let params = params_of("function f(a: string, b?: number, c = 'x', ...rest: boolean[]) {}");
        assert_eq!(params.len(), 4);
        assert_eq!(params[0], ParamDef::named("a").with_type("string"));
        assert_eq!(params[1], ParamDef::named("b").with_type("number").as_optional());
        assert_eq!(params[2], ParamDef::named("c").with_default("'x'"));
        assert_eq!(params[3], ParamDef::named("rest").with_type("boolean[]").as_rest());
    }

    #[test]
    fn test_param_tags() {
        let params = params_of(
            "function f(p1: string, p2?: number, p3: string = 'defaultValue', ...items: Array<string>) {}",
        );
        let tags: Vec<_> = params.iter().filter_map(render).collect();
        assert_eq!(
            tags,
            vec![
                "@param {string} p1",
                "@param {number} [p2]",
                "@param {string} [p3='defaultValue']",
                "@param {...string} items",
            ]
        );
    }

    #[test]
    fn test_untyped_param_is_skipped() {
        let params = params_of("function f(x = 0, y) {}");
        assert!(params.iter().all(|p| render(p).is_none()));
    }

    #[test]
    fn test_destructured_param() {
        let params = params_of("function f({ a, b }: Options) {}");
        assert_eq!(render(&params[0]).as_deref(), Some("@param {Options}"));
    }

    #[test]
    fn test_restores_comment() {
        let mut comments = CommentLookup::new();
        comments.insert(Some("param".to_string()), "- The input.".to_string());
        let tag = ParamDef::named("param")
            .with_type("string")
            .as_optional()
            .to_tag(&comments)
            .unwrap();
        assert_eq!(tag.render(), "@param {string} [param] - The input.");
    }
}
