//! Statement and declaration nodes.

use sable_common::span::{Span, Spanned};

use crate::Ident;
use crate::expr::Expr;
use crate::pattern::Pattern;
use crate::type_ann::TypeAnn;

/// A compilation unit: the fragment handed to `Engine::infer`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Module {
    pub stmts: Vec<Stmt>,
}

impl Module {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Module { stmts }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Spanned for Block {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    VarDecl(VarDecl),
    FuncDecl(FuncDecl),
    DeclareFunc(DeclareFunc),
    TypeAlias(TypeAliasDecl),
    Return(Option<Expr>),
    Throw(Expr),
    If(IfStmt),
    Expr(Expr),
}

/// `val x = e` / `var x: T = e`
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    /// `var` introduces a mutable binding, `val` an immutable one.
    pub mutable: bool,
    pub pattern: Pattern,
    pub ann: Option<TypeAnn>,
    pub init: Expr,
}

/// A function parameter: a pattern with an optional annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub pattern: Pattern,
    pub ann: Option<TypeAnn>,
    pub optional: bool,
    pub span: Span,
}

/// A declared type parameter (`<T extends C = D>`).
#[derive(Clone, Debug, PartialEq)]
pub struct TypeParamDecl {
    pub name: Ident,
    pub constraint: Option<TypeAnn>,
    pub default: Option<TypeAnn>,
}

/// `fn name<T>(params) -> R throws E { body }`
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDecl {
    pub name: Ident,
    pub is_async: bool,
    pub type_params: Vec<TypeParamDecl>,
    pub params: Vec<Param>,
    pub return_ann: Option<TypeAnn>,
    pub throws_ann: Option<TypeAnn>,
    pub body: Block,
}

/// `declare fn name(params) -> R throws E`: an ambient binding with no
/// body, installed as-is into the enclosing scope.
#[derive(Clone, Debug, PartialEq)]
pub struct DeclareFunc {
    pub name: Ident,
    pub type_params: Vec<TypeParamDecl>,
    pub params: Vec<Param>,
    pub return_ann: TypeAnn,
    pub throws_ann: Option<TypeAnn>,
}

/// `type Name<T> = body`
///
/// `recursive` is set by the parser when the body mentions the alias being
/// declared (directly or through its own type parameters); the engine
/// treats recursive aliases as opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeAliasDecl {
    pub name: Ident,
    pub type_params: Vec<TypeParamDecl>,
    pub ann: TypeAnn,
    pub recursive: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Block,
    pub else_branch: Option<Block>,
}
