//! End-to-end inference: modules built the way the parser would build
//! them, checked under the prelude scope, with function types compared
//! against their canonical printed form.

use sable_ast::expr::{BinOp, Expr, ExprKind, Lit};
use sable_ast::pattern::Pattern;
use sable_ast::stmt::{
    Block, DeclareFunc, FuncDecl, IfStmt, Module, Param, Stmt, StmtKind, TypeAliasDecl,
    TypeParamDecl, VarDecl,
};
use sable_ast::type_ann::{ObjAnnElem, PrimName, TypeAnn, TypeAnnKind};
use sable_ast::{Ident, QualIdent};
use sable_checker::Engine;
use sable_common::diagnostics::ErrorKind;
use sable_common::span::Span;

// =============================================================================
// AST builders
// =============================================================================

/// Opt-in tracing for debugging a failing case: `RUST_LOG=sable_checker=debug`.
fn trace_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sp() -> Span {
    Span::dummy()
}

fn ident(name: &str) -> Ident {
    Ident::new(name, sp())
}

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, sp())
}

fn var(name: &str) -> Expr {
    expr(ExprKind::Ident(name.to_string()))
}

fn str_lit(s: &str) -> Expr {
    expr(ExprKind::Lit(Lit::String(s.to_string())))
}

fn num_lit(n: f64) -> Expr {
    expr(ExprKind::Lit(Lit::Number(n)))
}

fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    expr(ExprKind::Call {
        callee: Box::new(callee),
        args,
    })
}

fn await_expr(inner: Expr) -> Expr {
    expr(ExprKind::Await(Box::new(inner)))
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, sp())
}

fn block(stmts: Vec<Stmt>) -> Block {
    Block { stmts, span: sp() }
}

fn ret(value: Expr) -> Stmt {
    stmt(StmtKind::Return(Some(value)))
}

fn throw(value: Expr) -> Stmt {
    stmt(StmtKind::Throw(value))
}

fn val(name: &str, init: Expr) -> Stmt {
    stmt(StmtKind::VarDecl(VarDecl {
        mutable: false,
        pattern: Pattern::ident(name, sp()),
        ann: None,
        init,
    }))
}

fn ann(kind: TypeAnnKind) -> TypeAnn {
    TypeAnn::new(kind, sp())
}

fn string_ann() -> TypeAnn {
    ann(TypeAnnKind::Prim(PrimName::String))
}

fn boolean_ann() -> TypeAnn {
    ann(TypeAnnKind::Prim(PrimName::Boolean))
}

fn ref_ann(name: &str, args: Vec<TypeAnn>) -> TypeAnn {
    ann(TypeAnnKind::Ref {
        name: QualIdent::single(name, sp()),
        args,
    })
}

fn param(name: &str, annotation: Option<TypeAnn>) -> Param {
    Param {
        pattern: Pattern::ident(name, sp()),
        ann: annotation,
        optional: false,
        span: sp(),
    }
}

fn func_decl(name: &str, is_async: bool, params: Vec<Param>, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::FuncDecl(FuncDecl {
        name: ident(name),
        is_async,
        type_params: Vec::new(),
        params,
        return_ann: None,
        throws_ann: None,
        body: block(body),
    }))
}

/// `declare fn fetch(url: string) -> Promise<string, string>`
fn declare_fetch() -> Stmt {
    stmt(StmtKind::DeclareFunc(DeclareFunc {
        name: ident("fetch"),
        type_params: Vec::new(),
        params: vec![param("url", Some(string_ann()))],
        return_ann: ref_ann("Promise", vec![string_ann(), string_ann()]),
        throws_ann: None,
    }))
}

fn check(module: Module) -> (Engine, sable_solver::Scope, Vec<sable_common::diagnostics::Diagnostic>)
{
    let mut engine = Engine::new();
    let mut scope = engine.prelude();
    let diags = engine.infer(&mut scope, &module);
    (engine, scope, diags)
}

fn printed(engine: &Engine, scope: &sable_solver::Scope, name: &str) -> String {
    let binding = scope
        .get_value(name)
        .unwrap_or_else(|| panic!("no binding named {name}"));
    engine.print(binding.ty)
}

// =============================================================================
// Async function scenarios
// =============================================================================

#[test]
fn test_async_function_wraps_literal_return() {
    trace_init();
    // async fn fetchData(url: string) { return "data" }
    let module = Module::new(vec![func_decl(
        "fetchData",
        true,
        vec![param("url", Some(string_ann()))],
        vec![ret(str_lit("data"))],
    )]);
    let (engine, scope, diags) = check(module);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert_eq!(
        printed(&engine, &scope, "fetchData"),
        "fn (url: string) -> Promise<\"data\", never> throws never"
    );
}

#[test]
fn test_async_function_collects_thrown_literal() {
    // async fn fetchData(url: string) {
    //   if url == "" { throw "error" }
    //   return "data"
    // }
    let module = Module::new(vec![func_decl(
        "fetchData",
        true,
        vec![param("url", Some(string_ann()))],
        vec![
            stmt(StmtKind::If(IfStmt {
                cond: binary(BinOp::Eq, var("url"), str_lit("")),
                then_branch: block(vec![throw(str_lit("error"))]),
                else_branch: None,
            })),
            ret(str_lit("data")),
        ],
    )]);
    let (engine, scope, diags) = check(module);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert_eq!(
        printed(&engine, &scope, "fetchData"),
        "fn (url: string) -> Promise<\"data\", \"error\"> throws never"
    );
}

#[test]
fn test_async_function_threads_awaited_promise() {
    // declare fn fetch(url: string) -> Promise<string, string>
    // async fn fetchData(url) { val data = await fetch(url); return data }
    let module = Module::new(vec![
        declare_fetch(),
        func_decl(
            "fetchData",
            true,
            vec![param("url", None)],
            vec![
                val("data", await_expr(call(var("fetch"), vec![var("url")]))),
                ret(var("data")),
            ],
        ),
    ]);
    let (engine, scope, diags) = check(module);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert_eq!(
        printed(&engine, &scope, "fetchData"),
        "fn (url: string) -> Promise<string, string> throws never"
    );
}

#[test]
fn test_await_outside_async_is_a_single_diagnostic() {
    // fn f() { await fetch("x") }
    let module = Module::new(vec![
        declare_fetch(),
        func_decl(
            "f",
            false,
            Vec::new(),
            vec![stmt(StmtKind::Expr(await_expr(call(
                var("fetch"),
                vec![str_lit("x")],
            ))))],
        ),
    ]);
    let (_, _, diags) = check(module);
    assert_eq!(diags.len(), 1, "expected exactly one diagnostic: {diags:?}");
    assert_eq!(diags[0].kind, ErrorKind::AwaitOutsideAsync);
}

#[test]
fn test_async_function_unions_throw_sites() {
    // async fn f(flag: boolean) {
    //   if flag { throw "s" } else { throw 42 }
    //   return "data"
    // }
    let module = Module::new(vec![func_decl(
        "f",
        true,
        vec![param("flag", Some(boolean_ann()))],
        vec![
            stmt(StmtKind::If(IfStmt {
                cond: var("flag"),
                then_branch: block(vec![throw(str_lit("s"))]),
                else_branch: Some(block(vec![throw(num_lit(42.0))])),
            })),
            ret(str_lit("data")),
        ],
    )]);
    let (engine, scope, diags) = check(module);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert_eq!(
        printed(&engine, &scope, "f"),
        "fn (flag: boolean) -> Promise<\"data\", \"s\" | 42> throws never"
    );
}

#[test]
fn test_ambient_declaration_installs_signature() {
    let module = Module::new(vec![declare_fetch()]);
    let (engine, scope, diags) = check(module);
    assert!(diags.is_empty());
    assert_eq!(
        printed(&engine, &scope, "fetch"),
        "fn (url: string) -> Promise<string, string> throws never"
    );
}

// =============================================================================
// Declarations, aliases and calls
// =============================================================================

#[test]
fn test_generic_call_instantiates_fresh_variables() {
    // declare fn identity<T>(t: T) -> T
    // val x = identity(42)
    let module = Module::new(vec![
        stmt(StmtKind::DeclareFunc(DeclareFunc {
            name: ident("identity"),
            type_params: vec![TypeParamDecl {
                name: ident("T"),
                constraint: None,
                default: None,
            }],
            params: vec![param("t", Some(ref_ann("T", Vec::new())))],
            return_ann: ref_ann("T", Vec::new()),
            throws_ann: None,
        })),
        val("x", call(var("identity"), vec![num_lit(42.0)])),
    ]);
    let (engine, scope, diags) = check(module);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert_eq!(printed(&engine, &scope, "x"), "42");
}

#[test]
fn test_alias_annotation_checks_object_literal() {
    // type User = {name: string}
    // val ok: User = {name: "ada"}
    // val bad: User = {name: 42}
    let user_ann = ann(TypeAnnKind::Object {
        elems: vec![ObjAnnElem::Property {
            name: ident("name"),
            ann: string_ann(),
            optional: false,
            readonly: false,
        }],
        sealed: false,
    });
    let alias = stmt(StmtKind::TypeAlias(TypeAliasDecl {
        name: ident("User"),
        type_params: Vec::new(),
        ann: user_ann,
        recursive: false,
    }));
    let obj = |value: Expr| {
        expr(ExprKind::Object(vec![sable_ast::expr::ObjProp {
            key: ident("name"),
            value: Some(value),
            span: sp(),
        }]))
    };
    let ok = stmt(StmtKind::VarDecl(VarDecl {
        mutable: false,
        pattern: Pattern::ident("ok", sp()),
        ann: Some(ref_ann("User", Vec::new())),
        init: obj(str_lit("ada")),
    }));
    let bad = stmt(StmtKind::VarDecl(VarDecl {
        mutable: false,
        pattern: Pattern::ident("bad", sp()),
        ann: Some(ref_ann("User", Vec::new())),
        init: obj(num_lit(42.0)),
    }));
    let (_, _, diags) = check(Module::new(vec![alias, ok, bad]));
    assert_eq!(diags.len(), 1, "only the second binding is wrong: {diags:?}");
    assert!(matches!(&diags[0].kind, ErrorKind::TypeMismatch { .. }));
}

#[test]
fn test_sealed_alias_annotation_rejects_excess_property() {
    // type Config = {|debug: boolean|}
    // val ok: Config = {debug: true}
    // val bad: Config = {debug: true, extra: 1}
    let config_ann = ann(TypeAnnKind::Object {
        elems: vec![ObjAnnElem::Property {
            name: ident("debug"),
            ann: boolean_ann(),
            optional: false,
            readonly: false,
        }],
        sealed: true,
    });
    let alias = stmt(StmtKind::TypeAlias(TypeAliasDecl {
        name: ident("Config"),
        type_params: Vec::new(),
        ann: config_ann,
        recursive: false,
    }));
    let prop = |name: &str, value: Expr| sable_ast::expr::ObjProp {
        key: ident(name),
        value: Some(value),
        span: sp(),
    };
    let ok = stmt(StmtKind::VarDecl(VarDecl {
        mutable: false,
        pattern: Pattern::ident("ok", sp()),
        ann: Some(ref_ann("Config", Vec::new())),
        init: expr(ExprKind::Object(vec![prop(
            "debug",
            expr(ExprKind::Lit(Lit::Boolean(true))),
        )])),
    }));
    let bad = stmt(StmtKind::VarDecl(VarDecl {
        mutable: false,
        pattern: Pattern::ident("bad", sp()),
        ann: Some(ref_ann("Config", Vec::new())),
        init: expr(ExprKind::Object(vec![
            prop("debug", expr(ExprKind::Lit(Lit::Boolean(true)))),
            prop("extra", num_lit(1.0)),
        ])),
    }));
    let (_, _, diags) = check(Module::new(vec![alias, ok, bad]));
    assert_eq!(diags.len(), 1, "only the excess property is wrong: {diags:?}");
    assert!(matches!(
        &diags[0].kind,
        ErrorKind::UnknownProperty { name, .. } if name == "extra"
    ));
}

#[test]
fn test_array_literal_and_element_access() {
    // val xs = [1, 2]
    // val first = xs[0]
    // val count = xs.length
    let xs = val(
        "xs",
        expr(ExprKind::Array(vec![num_lit(1.0), num_lit(2.0)])),
    );
    let first = val(
        "first",
        expr(ExprKind::Index {
            object: Box::new(var("xs")),
            index: Box::new(num_lit(0.0)),
            optional: false,
        }),
    );
    let count = val(
        "count",
        expr(ExprKind::Member {
            object: Box::new(var("xs")),
            property: ident("length"),
            optional: false,
        }),
    );
    let (engine, scope, diags) = check(Module::new(vec![xs, first, count]));
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert_eq!(printed(&engine, &scope, "xs"), "Array<1 | 2>");
    assert_eq!(printed(&engine, &scope, "first"), "1 | 2");
    assert_eq!(printed(&engine, &scope, "count"), "number");
}

#[test]
fn test_unknown_identifier_reports_and_recovers() {
    let module = Module::new(vec![
        val("a", var("missing")),
        val("b", num_lit(1.0)),
    ]);
    let (engine, scope, diags) = check(module);
    assert_eq!(diags.len(), 1);
    assert!(matches!(&diags[0].kind, ErrorKind::UnknownIdentifier { name } if name == "missing"));
    // Inference continued past the error.
    assert_eq!(printed(&engine, &scope, "b"), "1");
}

#[test]
fn test_string_member_through_wrapper() {
    // val shout = "hey".toUpperCase()
    let module = Module::new(vec![val(
        "shout",
        call(
            expr(ExprKind::Member {
                object: Box::new(str_lit("hey")),
                property: ident("toUpperCase"),
                optional: false,
            }),
            Vec::new(),
        ),
    )]);
    let (engine, scope, diags) = check(module);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert_eq!(printed(&engine, &scope, "shout"), "string");
}

#[test]
fn test_object_annotation_prints_canonically() {
    // val x: {foo: string, bar: fn <T>(t: T) -> T}
    let bar_fn = TypeAnnKind::Func(sable_ast::type_ann::FuncAnn {
        type_params: vec![TypeParamDecl {
            name: ident("T"),
            constraint: None,
            default: None,
        }],
        params: vec![sable_ast::type_ann::FuncAnnParam {
            name: "t".to_string(),
            ann: ref_ann("T", Vec::new()),
            optional: false,
        }],
        ret: Box::new(ref_ann("T", Vec::new())),
        throws: None,
    });
    let obj_ann = ann(TypeAnnKind::Object {
        elems: vec![
            ObjAnnElem::Property {
                name: ident("foo"),
                ann: string_ann(),
                optional: false,
                readonly: false,
            },
            ObjAnnElem::Property {
                name: ident("bar"),
                ann: ann(bar_fn),
                optional: false,
                readonly: false,
            },
        ],
        sealed: false,
    });
    let mut engine = Engine::new();
    let scope = engine.prelude();
    let lowered = {
        // Lowering is internal; drive it through a declaration.
        let module = Module::new(vec![stmt(StmtKind::TypeAlias(TypeAliasDecl {
            name: ident("Shape"),
            type_params: Vec::new(),
            ann: obj_ann,
            recursive: false,
        }))]);
        let mut scope = scope.clone();
        let diags = engine.infer(&mut scope, &module);
        assert!(diags.is_empty());
        scope.get_type_alias("Shape").expect("alias installed").ty
    };
    assert_eq!(
        engine.print(lowered),
        "{foo: string, bar: fn <T>(t: T) -> T}"
    );
}
