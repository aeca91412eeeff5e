//! Syntactic type inference
//!
//! Declarations without annotations still deserve a type in their doc
//! block when the type is obvious from the initializer or the returned
//! values. There is no checker behind this: only literals, operators and
//! annotated expressions are understood, everything else is unresolved.
//!
//! Inferred types are structural. A function returning an object literal
//! documents the literal's shape, such as `{ aKey: string; }`, even where a
//! checker would name the alias the value conforms to.

use crate::utils::swc::{prop_name_str, SourceInfo};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::Spanned;
use deno_ast::swc::ecma_visit::{Visit, VisitWith};
use std::collections::HashMap;

/// Order of primitive members in inferred array element unions
const PRIMITIVE_ORDER: &[&str] = &["string", "number", "bigint", "boolean"];

/// Inference over one source text, with the annotated types of the
/// identifiers in scope (the parameters of the function being documented)
pub struct TypeInference<'a> {
    src: &'a SourceInfo,
    bindings: HashMap<String, String>,
}

impl<'a> TypeInference<'a> {
    /// Inference without any known bindings
    pub fn new(src: &'a SourceInfo) -> Self {
        Self {
            src,
            bindings: HashMap::new(),
        }
    }

    /// Add the annotated type of an identifier
    pub fn with_binding(mut self, name: impl Into<String>, type_text: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), type_text.into());
        self
    }

    /// Infer the type of an expression
    pub fn expr(&self, expr: &swc_ast::Expr) -> Option<String> {
        infer_expr(self, expr)
    }

    /// Infer the return type of a function
    pub fn function_return(&self, function: &swc_ast::Function) -> Option<String> {
        infer_body_return(
            self,
            function.body.as_ref(),
            function.is_async,
            function.is_generator,
        )
    }

    /// Infer the return type of an arrow function
    pub fn arrow_return(&self, arrow: &swc_ast::ArrowExpr) -> Option<String> {
        match &*arrow.body {
            swc_ast::BlockStmtOrExpr::BlockStmt(block) => {
                infer_body_return(self, Some(block), arrow.is_async, arrow.is_generator)
            }
            swc_ast::BlockStmtOrExpr::Expr(expr) => {
                let inner = if is_nullish(expr) {
                    Some("any".to_string())
                } else {
                    infer_expr(self, expr)
                };
                if arrow.is_async {
                    Some(format!("Promise<{}>", inner?))
                } else {
                    inner
                }
            }
        }
    }
}

fn infer_expr(cx: &TypeInference<'_>, expr: &swc_ast::Expr) -> Option<String> {
    use swc_ast::Expr;

    let src = cx.src;

    match expr {
        Expr::Lit(lit) => Some(infer_lit(lit).to_string()),
        Expr::Tpl(_) => Some("string".to_string()),
        Expr::Ident(i) => match &*i.sym {
            "undefined" => Some("any".to_string()),
            "NaN" | "Infinity" => Some("number".to_string()),
            name => cx.bindings.get(name).cloned(),
        },
        Expr::Array(array) => infer_array(cx, array),
        Expr::Object(object) => infer_object(cx, object),
        Expr::New(new) => infer_new(cx, new),
        Expr::Unary(unary) => infer_unary(cx, unary),
        Expr::Update(_) => Some("number".to_string()),
        Expr::Bin(bin) => infer_bin(cx, bin),
        Expr::Cond(cond) => {
            let cons = infer_expr(cx, &cond.cons)?;
            let alt = infer_expr(cx, &cond.alt)?;
            Some(union(vec![cons, alt]))
        }
        Expr::Assign(assign) => infer_expr(cx, &assign.right),
        Expr::Paren(paren) => infer_expr(cx, &paren.expr),
        Expr::Seq(seq) => seq.exprs.last().and_then(|e| infer_expr(cx, e)),
        Expr::TsNonNull(n) => infer_expr(cx, &n.expr),
        Expr::TsSatisfies(s) => infer_expr(cx, &s.expr),
        Expr::TsAs(a) => Some(src.text_for_span(a.type_ann.span()).to_string()),
        Expr::TsTypeAssertion(a) => Some(src.text_for_span(a.type_ann.span()).to_string()),
        Expr::JSXElement(_) | Expr::JSXFragment(_) => Some("JSX.Element".to_string()),
        _ => None,
    }
}

fn infer_lit(lit: &swc_ast::Lit) -> &'static str {
    use swc_ast::Lit;

    match lit {
        Lit::Str(_) | Lit::JSXText(_) => "string",
        Lit::Num(_) => "number",
        Lit::Bool(_) => "boolean",
        Lit::BigInt(_) => "bigint",
        Lit::Regex(_) => "RegExp",
        Lit::Null(_) => "any",
    }
}

fn is_nullish(expr: &swc_ast::Expr) -> bool {
    match expr {
        swc_ast::Expr::Lit(swc_ast::Lit::Null(_)) => true,
        swc_ast::Expr::Ident(i) => &*i.sym == "undefined",
        swc_ast::Expr::Unary(u) => u.op == swc_ast::UnaryOp::Void,
        swc_ast::Expr::Paren(p) => is_nullish(&p.expr),
        _ => false,
    }
}

fn infer_array(cx: &TypeInference<'_>, array: &swc_ast::ArrayLit) -> Option<String> {
    let mut members = Vec::new();
    for elem in &array.elems {
        let elem = elem.as_ref()?;
        if elem.spread.is_some() {
            return None;
        }
        if is_nullish(&elem.expr) {
            continue;
        }
        members.push(infer_expr(cx, &elem.expr)?);
    }

    if members.is_empty() {
        return Some("any[]".to_string());
    }

    let members = ordered_members(members);
    if members.len() == 1 {
        let only = &members[0];
        if is_compound(only) {
            Some(format!("({only})[]"))
        } else {
            Some(format!("{only}[]"))
        }
    } else {
        Some(format!("({})[]", members.join(" | ")))
    }
}

/// Deduplicate, putting primitives first in a fixed order
fn ordered_members(members: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for member in members {
        if !unique.contains(&member) {
            unique.push(member);
        }
    }
    let mut ordered: Vec<String> = PRIMITIVE_ORDER
        .iter()
        .filter(|p| unique.iter().any(|m| m == *p))
        .map(|p| p.to_string())
        .collect();
    ordered.extend(
        unique
            .into_iter()
            .filter(|m| !PRIMITIVE_ORDER.contains(&m.as_str())),
    );
    ordered
}

fn is_compound(ty: &str) -> bool {
    ty.contains(" | ") || ty.contains(" & ") || ty.contains("=>")
}

fn infer_object(cx: &TypeInference<'_>, object: &swc_ast::ObjectLit) -> Option<String> {
    if object.props.is_empty() {
        return Some("{}".to_string());
    }

    let mut fields = Vec::new();
    for prop in &object.props {
        let swc_ast::PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        let swc_ast::Prop::KeyValue(kv) = &**prop else {
            return None;
        };
        let key = prop_name_str(&kv.key)?;
        let value = if is_nullish(&kv.value) {
            "any".to_string()
        } else {
            infer_expr(cx, &kv.value)?
        };
        fields.push(format!("{}: {};", quote_key(&key), value));
    }
    Some(format!("{{ {} }}", fields.join(" ")))
}

fn quote_key(key: &str) -> String {
    let is_ident = key
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if is_ident || key.parse::<f64>().is_ok() {
        key.to_string()
    } else {
        format!("'{}'", key.replace('\'', "\\'"))
    }
}

fn infer_new(cx: &TypeInference<'_>, new: &swc_ast::NewExpr) -> Option<String> {
    let callee = match &*new.callee {
        swc_ast::Expr::Ident(_) | swc_ast::Expr::Member(_) => cx.src.text_for_span(new.callee.span()),
        _ => return None,
    };

    if let Some(type_args) = &new.type_args {
        return Some(format!("{callee}{}", cx.src.text_for_span(type_args.span())));
    }

    let inferred = match callee {
        "Map" => "Map<any, any>",
        "Set" => "Set<unknown>",
        "Array" => "any[]",
        "String" => "String",
        other => other,
    };
    Some(inferred.to_string())
}

fn infer_unary(cx: &TypeInference<'_>, unary: &swc_ast::UnaryExpr) -> Option<String> {
    use swc_ast::UnaryOp;

    let ty = match unary.op {
        UnaryOp::Bang | UnaryOp::Delete => "boolean",
        UnaryOp::TypeOf => "string",
        UnaryOp::Void => "any",
        UnaryOp::Minus | UnaryOp::Tilde => {
            if infer_expr(cx, &unary.arg).as_deref() == Some("bigint") {
                "bigint"
            } else {
                "number"
            }
        }
        UnaryOp::Plus => "number",
    };
    Some(ty.to_string())
}

fn infer_bin(cx: &TypeInference<'_>, bin: &swc_ast::BinExpr) -> Option<String> {
    use swc_ast::BinaryOp;

    match bin.op {
        BinaryOp::EqEq
        | BinaryOp::NotEq
        | BinaryOp::EqEqEq
        | BinaryOp::NotEqEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::In
        | BinaryOp::InstanceOf => Some("boolean".to_string()),
        BinaryOp::Add => {
            let left = infer_expr(cx, &bin.left);
            let right = infer_expr(cx, &bin.right);
            match (left.as_deref(), right.as_deref()) {
                (Some("string"), _) | (_, Some("string")) => Some("string".to_string()),
                (Some("number"), Some("number")) => Some("number".to_string()),
                (Some("bigint"), Some("bigint")) => Some("bigint".to_string()),
                _ => None,
            }
        }
        BinaryOp::LogicalOr | BinaryOp::LogicalAnd | BinaryOp::NullishCoalescing => {
            let left = infer_expr(cx, &bin.left)?;
            let right = infer_expr(cx, &bin.right)?;
            (left == right).then_some(left)
        }
        _ => {
            let left = infer_expr(cx, &bin.left);
            let right = infer_expr(cx, &bin.right);
            if left.as_deref() == Some("bigint") && right.as_deref() == Some("bigint") {
                Some("bigint".to_string())
            } else {
                Some("number".to_string())
            }
        }
    }
}

/// Union of inferred types, deduplicated in order of appearance
fn union(types: Vec<String>) -> String {
    let mut unique: Vec<String> = Vec::new();
    for ty in types {
        if !unique.contains(&ty) {
            unique.push(ty);
        }
    }
    unique.join(" | ")
}

fn infer_body_return(
    cx: &TypeInference<'_>,
    body: Option<&swc_ast::BlockStmt>,
    is_async: bool,
    is_generator: bool,
) -> Option<String> {
    let body = body?;
    let mut collector = ReturnCollector::new(cx);
    body.visit_with(&mut collector);

    if is_generator {
        let yielded = collector.yielded_type()?;
        let wrapper = if is_async { "AsyncGenerator" } else { "Generator" };
        return Some(format!("{wrapper}<{yielded}>"));
    }

    let returned = collector.returned_type()?;
    if is_async {
        Some(format!("Promise<{returned}>"))
    } else {
        Some(returned)
    }
}

/// Collects `return` and `yield` values of one function body
struct ReturnCollector<'a, 'b> {
    cx: &'a TypeInference<'b>,
    returns: Vec<Option<String>>,
    yields: Vec<Option<String>>,
    nullish_returns: usize,
}

impl<'a, 'b> ReturnCollector<'a, 'b> {
    fn new(cx: &'a TypeInference<'b>) -> Self {
        Self {
            cx,
            returns: Vec::new(),
            yields: Vec::new(),
            nullish_returns: 0,
        }
    }

    fn returned_type(&self) -> Option<String> {
        if self.returns.is_empty() {
            return Some(if self.nullish_returns > 0 { "any" } else { "void" }.to_string());
        }
        let types: Option<Vec<String>> = self.returns.iter().cloned().collect();
        Some(union(types?))
    }

    fn yielded_type(&self) -> Option<String> {
        if self.yields.is_empty() {
            return Some("any".to_string());
        }
        let types: Option<Vec<String>> = self.yields.iter().cloned().collect();
        Some(union(types?))
    }
}

impl Visit for ReturnCollector<'_, '_> {
    fn visit_return_stmt(&mut self, n: &swc_ast::ReturnStmt) {
        if let Some(arg) = &n.arg {
            if is_nullish(arg) {
                self.nullish_returns += 1;
            } else {
                self.returns.push(infer_expr(self.cx, arg));
            }
        }
    }

    fn visit_yield_expr(&mut self, n: &swc_ast::YieldExpr) {
        match &n.arg {
            Some(arg) if !n.delegate => self.yields.push(infer_expr(self.cx, arg)),
            Some(_) => self.yields.push(None),
            None => self.yields.push(Some("any".to_string())),
        }
    }

    // nested functions have their own returns
    fn visit_function(&mut self, _: &swc_ast::Function) {}

    fn visit_arrow_expr(&mut self, _: &swc_ast::ArrowExpr) {}

    fn visit_class(&mut self, _: &swc_ast::Class) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::swc::{parse_source, ParsedModule};
    use deno_ast::MediaType;

    fn parse(source: &str) -> ParsedModule {
        parse_source(source, MediaType::TypeScript).unwrap()
    }

    /// Infer the initializer of the first declarator in the module
    fn infer_init(source: &str) -> Option<String> {
        let parsed = parse(source);
        let module = parsed.module().unwrap();
        let swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(swc_ast::Decl::Var(var))) = &module.body[0] else {
            panic!("expected a variable statement");
        };
        let init = var.decls[0].init.as_ref().unwrap();
        TypeInference::new(&parsed.source_info).expr(init)
    }

    fn infer_fn(source: &str) -> Option<String> {
        let parsed = parse(source);
        let module = parsed.module().unwrap();
        let swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(swc_ast::Decl::Fn(f))) = &module.body[0] else {
            panic!("expected a function declaration");
        };
        TypeInference::new(&parsed.source_info).function_return(&f.function)
    }

    #[test]
    fn test_literals() {
        assert_eq!(infer_init("let a = 'x';").as_deref(), Some("string"));
        assert_eq!(infer_init("let a = `x${1}`;").as_deref(), Some("string"));
        assert_eq!(infer_init("let a = 1.5;").as_deref(), Some("number"));
        assert_eq!(infer_init("let a = false;").as_deref(), Some("boolean"));
        assert_eq!(infer_init("let a = 10n;").as_deref(), Some("bigint"));
        assert_eq!(infer_init("let a = /x/g;").as_deref(), Some("RegExp"));
        assert_eq!(infer_init("let a = undefined;").as_deref(), Some("any"));
        assert_eq!(infer_init("let a = null;").as_deref(), Some("any"));
    }

    #[test]
    fn test_arrays() {
        assert_eq!(infer_init("let a = [];").as_deref(), Some("any[]"));
        assert_eq!(infer_init("let a = [1, 2];").as_deref(), Some("number[]"));
        assert_eq!(infer_init("let a = [true, 1, 'a', 2];").as_deref(), Some("(string | number | boolean)[]"));
        assert_eq!(infer_init("let a = [null, 'a'];").as_deref(), Some("string[]"));
        assert_eq!(infer_init("let a = [foo()];"), None);
        assert_eq!(infer_init("let a = [...b];"), None);
    }

    #[test]
    fn test_objects() {
        assert_eq!(infer_init("let a = {};").as_deref(), Some("{}"));
        assert_eq!(
            infer_init("let a = { x: 1, 'y z': 'a' };").as_deref(),
            Some("{ x: number; 'y z': string; }")
        );
        assert_eq!(infer_init("let a = { x };"), None);
    }

    #[test]
    fn test_new_and_assertions() {
        assert_eq!(infer_init("let a = new Map();").as_deref(), Some("Map<any, any>"));
        assert_eq!(infer_init("let a = new Set();").as_deref(), Some("Set<unknown>"));
        assert_eq!(infer_init("let a = new Map<string, number>();").as_deref(), Some("Map<string, number>"));
        assert_eq!(infer_init("let a = new Date();").as_deref(), Some("Date"));
        assert_eq!(infer_init("let a = b as Record<string, number>;").as_deref(), Some("Record<string, number>"));
        assert_eq!(infer_init("let a = <Foo>b;").as_deref(), Some("Foo"));
        assert_eq!(infer_init("let a = b!;"), None);
    }

    #[test]
    fn test_operators() {
        assert_eq!(infer_init("let a = !b;").as_deref(), Some("boolean"));
        assert_eq!(infer_init("let a = typeof b;").as_deref(), Some("string"));
        assert_eq!(infer_init("let a = 1 + 'x';").as_deref(), Some("string"));
        assert_eq!(infer_init("let a = 1 + 2;").as_deref(), Some("number"));
        assert_eq!(infer_init("let a = b * c;").as_deref(), Some("number"));
        assert_eq!(infer_init("let a = b > c;").as_deref(), Some("boolean"));
        assert_eq!(infer_init("let a = b + c;"), None);
        assert_eq!(infer_init("let a = b ? 1 : 'x';").as_deref(), Some("number | string"));
        assert_eq!(infer_init("let a = b ? 1 : 2;").as_deref(), Some("number"));
        assert_eq!(infer_init("let a = (1, 'x');").as_deref(), Some("string"));
    }

    #[test]
    fn test_function_returns() {
        assert_eq!(infer_fn("function f() { return 1; }").as_deref(), Some("number"));
        assert_eq!(infer_fn("function f() {}").as_deref(), Some("void"));
        assert_eq!(infer_fn("function f() { return; }").as_deref(), Some("void"));
        assert_eq!(
            infer_fn("function f(a) { if (a) { return 'a'; } return 1; }").as_deref(),
            Some("string | number")
        );
        assert_eq!(infer_fn("function f() { return g(); }"), None);
        assert_eq!(infer_fn("async function f() { return true; }").as_deref(), Some("Promise<boolean>"));
        assert_eq!(infer_fn("async function f() {}").as_deref(), Some("Promise<void>"));
        assert_eq!(infer_fn("function* f() { yield 1; yield 2; }").as_deref(), Some("Generator<number>"));
        assert_eq!(infer_fn("async function* f() { yield 'a'; }").as_deref(), Some("AsyncGenerator<string>"));
    }

    #[test]
    fn test_nested_functions_are_skipped() {
        assert_eq!(
            infer_fn("function f() { const g = () => { return 1; }; function h() { return 'x'; } }").as_deref(),
            Some("void")
        );
    }

    #[test]
    fn test_arrow_returns() {
        let parsed = parse("const f = async () => 1;");
        let module = parsed.module().unwrap();
        let swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(swc_ast::Decl::Var(var))) = &module.body[0] else {
            panic!("expected a variable statement");
        };
        let Some(swc_ast::Expr::Arrow(arrow)) = var.decls[0].init.as_deref() else {
            panic!("expected an arrow function");
        };
        assert_eq!(
            TypeInference::new(&parsed.source_info).arrow_return(arrow).as_deref(),
            Some("Promise<number>")
        );
    }

    #[test]
    fn test_bindings() {
        let parsed = parse("function* generator(i: number) {\n  yield i;\n  yield i + 10;\n}");
        let module = parsed.module().unwrap();
        let swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(swc_ast::Decl::Fn(f))) = &module.body[0] else {
            panic!("expected a function declaration");
        };

        let unbound = TypeInference::new(&parsed.source_info);
        assert_eq!(unbound.function_return(&f.function), None);

        let bound = TypeInference::new(&parsed.source_info).with_binding("i", "number");
        assert_eq!(bound.function_return(&f.function).as_deref(), Some("Generator<number>"));
    }
}
