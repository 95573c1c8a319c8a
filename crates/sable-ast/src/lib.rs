//! Syntax tree consumed by the sable type engine.
//!
//! Parsing is out of scope for the engine; this crate defines the shape of
//! the tree a parser produces. Every node carries a `Span`. The engine
//! never mutates the tree; inferred types live on the engine side.

pub mod expr;
pub mod pattern;
pub mod stmt;
pub mod type_ann;

pub use expr::{BinOp, Expr, ExprKind, FuncExpr, Lit, ObjProp};
pub use pattern::{ObjectPatternProp, Pattern, PatternKind};
pub use stmt::{
    Block, DeclareFunc, FuncDecl, IfStmt, Module, Param, Stmt, StmtKind, TypeAliasDecl,
    TypeParamDecl, VarDecl,
};
pub use type_ann::{FuncAnn, FuncAnnParam, ObjAnnElem, PrimName, TypeAnn, TypeAnnKind};

use sable_common::span::{Span, Spanned};

/// An identifier with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

/// A dotted name (`A.B.C`), used by `typeof` annotations and namespace
/// references.
#[derive(Clone, Debug, PartialEq)]
pub struct QualIdent {
    pub parts: Vec<String>,
    pub span: Span,
}

impl QualIdent {
    pub fn new(parts: Vec<String>, span: Span) -> Self {
        QualIdent { parts, span }
    }

    pub fn single(name: impl Into<String>, span: Span) -> Self {
        QualIdent {
            parts: vec![name.into()],
            span,
        }
    }
}

impl std::fmt::Display for QualIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}

impl Spanned for QualIdent {
    fn span(&self) -> Span {
        self.span
    }
}
