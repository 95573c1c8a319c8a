//! Expression nodes.

use sable_common::span::{Span, Spanned};

use crate::Ident;
use crate::stmt::{Block, Param, TypeParamDecl};
use crate::type_ann::TypeAnn;

/// A literal value appearing in an expression or a literal type.
#[derive(Clone, Debug, PartialEq)]
pub enum Lit {
    Number(f64),
    String(String),
    Boolean(bool),
    BigInt(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
}

/// A property in an object literal. `value = None` is shorthand (`{x}`).
#[derive(Clone, Debug, PartialEq)]
pub struct ObjProp {
    pub key: Ident,
    pub value: Option<Expr>,
    pub span: Span,
}

/// A function expression (arrow). Shares the declaration's parameter and
/// body shape; the name is what distinguishes a `FuncDecl`.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncExpr {
    pub is_async: bool,
    pub type_params: Vec<TypeParamDecl>,
    pub params: Vec<Param>,
    pub return_ann: Option<TypeAnn>,
    pub throws_ann: Option<TypeAnn>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Ident(String),
    Lit(Lit),
    /// `` `a${x}b` ``: `quasis.len() == exprs.len() + 1`.
    TemplateString {
        quasis: Vec<String>,
        exprs: Vec<Expr>,
    },
    Array(Vec<Expr>),
    Object(Vec<ObjProp>),
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `obj.prop` / `obj?.prop`
    Member {
        object: Box<Expr>,
        property: Ident,
        optional: bool,
    },
    /// `obj[index]` / `obj?.[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        optional: bool,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Await(Box<Expr>),
    Func(FuncExpr),
}
