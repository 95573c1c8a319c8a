//! Type annotation nodes: the syntactic side of the type algebra.
//!
//! The checker lowers these to engine types; the engine never looks at
//! annotations directly.

use sable_common::span::{Span, Spanned};

use crate::expr::Lit;
use crate::stmt::TypeParamDecl;
use crate::{Ident, QualIdent};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrimName {
    Number,
    String,
    Boolean,
    Symbol,
    BigInt,
}

/// A parameter in a function type annotation (`fn (x: T) -> R`).
#[derive(Clone, Debug, PartialEq)]
pub struct FuncAnnParam {
    pub name: String,
    pub ann: TypeAnn,
    pub optional: bool,
}

/// The shape shared by function type annotations and method elements.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncAnn {
    pub type_params: Vec<TypeParamDecl>,
    pub params: Vec<FuncAnnParam>,
    pub ret: Box<TypeAnn>,
    pub throws: Option<Box<TypeAnn>>,
}

/// An element of an object type annotation.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjAnnElem {
    Property {
        name: Ident,
        ann: TypeAnn,
        optional: bool,
        readonly: bool,
    },
    Method {
        name: Ident,
        func: FuncAnn,
    },
    Callable(FuncAnn),
    /// `[K in C]: V` with optional `+?`/`-?` and `+readonly`/`-readonly`
    /// modifiers (`Some(true)` adds, `Some(false)` strips).
    Mapped {
        binder: Ident,
        constraint: Box<TypeAnn>,
        value: Box<TypeAnn>,
        optional: Option<bool>,
        readonly: Option<bool>,
    },
    /// `...T`
    Spread(TypeAnn),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeAnn {
    pub kind: TypeAnnKind,
    pub span: Span,
}

impl TypeAnn {
    pub fn new(kind: TypeAnnKind, span: Span) -> Self {
        TypeAnn { kind, span }
    }
}

impl Spanned for TypeAnn {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeAnnKind {
    Prim(PrimName),
    Lit(Lit),
    Never,
    Unknown,
    Any,
    Null,
    Undefined,
    Void,
    /// `Name<Args>`: a reference to a named type, possibly qualified.
    Ref {
        name: QualIdent,
        args: Vec<TypeAnn>,
    },
    Func(FuncAnn),
    /// `{a: T}` / `{|a: T|}`; a sealed object rejects excess properties.
    Object {
        elems: Vec<ObjAnnElem>,
        sealed: bool,
    },
    Tuple(Vec<TypeAnn>),
    Union(Vec<TypeAnn>),
    Intersection(Vec<TypeAnn>),
    KeyOf(Box<TypeAnn>),
    /// `T[K]`
    Index {
        target: Box<TypeAnn>,
        index: Box<TypeAnn>,
    },
    /// `typeof a.b`
    TypeOf(QualIdent),
    /// `check extends extends ? then : else`
    Cond {
        check: Box<TypeAnn>,
        extends: Box<TypeAnn>,
        then_ann: Box<TypeAnn>,
        else_ann: Box<TypeAnn>,
    },
    /// `infer T`, only valid inside a conditional's `extends` clause.
    Infer(String),
    /// `` `a${T}b` ``: `quasis.len() == types.len() + 1`.
    TemplateLit {
        quasis: Vec<String>,
        types: Vec<TypeAnn>,
    },
    /// `/pattern/`: a regex literal type.
    Regex(String),
    /// `readonly T`
    Readonly(Box<TypeAnn>),
}
