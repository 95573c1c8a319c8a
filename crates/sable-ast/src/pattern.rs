//! Binding patterns for `val` declarations and function parameters.

use sable_common::span::{Span, Spanned};

use crate::Ident;

#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Pattern { kind, span }
    }

    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        Pattern {
            kind: PatternKind::Ident(name.into()),
            span,
        }
    }
}

impl Spanned for Pattern {
    fn span(&self) -> Span {
        self.span
    }
}

/// A property in an object pattern. `value = None` is shorthand
/// (`{x}` binds `x` itself).
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectPatternProp {
    pub key: Ident,
    pub value: Option<Pattern>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    Ident(String),
    Tuple(Vec<Pattern>),
    Object(Vec<ObjectPatternProp>),
}
