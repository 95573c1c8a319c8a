//! Structured diagnostics accumulated by the type engine.
//!
//! All user-facing errors are values, never exceptions: inference records a
//! `Diagnostic` and continues, so a single compilation unit produces the
//! maximal set of diagnostics in one pass. Types referenced by a diagnostic
//! are carried pre-rendered (the printer lives above this crate).

use serde::{Deserialize, Serialize};

use crate::span::Span;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

/// The kind of a diagnostic, with the rendered pieces the message needs.
///
/// Each kind has a stable numeric code so drivers can match on diagnostics
/// without parsing message text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unification failure: `actual` is not compatible with `expected`.
    TypeMismatch { actual: String, expected: String },
    /// A value binding that is not in scope.
    UnknownIdentifier { name: String },
    /// A property lookup that no element of the object satisfies.
    UnknownProperty { object: String, name: String },
    /// A type name that resolves to no alias.
    UnknownType { name: String },
    /// A JSX component name that resolves to no binding.
    UnknownComponent { name: String },
    /// An index key that cannot address the target.
    InvalidObjectKey { key: String },
    /// Tuple index outside `0..length`.
    OutOfBounds { index: i64, length: usize },
    /// Member access on a type that is not object-like (or is nullish
    /// without an optional chain).
    ExpectedObject { found: String },
    /// Index access on a type that is not array-like.
    ExpectedArray { found: String },
    /// A required property missing from an object literal.
    MissingRequiredProp { name: String, object: String },
    /// `await` outside an `async` function body.
    AwaitOutsideAsync,
    /// No overload of a callable accepted the arguments.
    NoMatchingOverload { callee: String },
}

impl ErrorKind {
    /// Stable numeric code for this kind.
    pub fn code(&self) -> u32 {
        match self {
            ErrorKind::TypeMismatch { .. } => 1001,
            ErrorKind::UnknownIdentifier { .. } => 1002,
            ErrorKind::UnknownProperty { .. } => 1003,
            ErrorKind::UnknownType { .. } => 1004,
            ErrorKind::UnknownComponent { .. } => 1005,
            ErrorKind::InvalidObjectKey { .. } => 1006,
            ErrorKind::OutOfBounds { .. } => 1007,
            ErrorKind::ExpectedObject { .. } => 1008,
            ErrorKind::ExpectedArray { .. } => 1009,
            ErrorKind::MissingRequiredProp { .. } => 1010,
            ErrorKind::AwaitOutsideAsync => 1011,
            ErrorKind::NoMatchingOverload { .. } => 1012,
        }
    }

    /// Human-readable message for this kind.
    pub fn message(&self) -> String {
        match self {
            ErrorKind::TypeMismatch { actual, expected } => {
                format!("type '{actual}' is not assignable to type '{expected}'")
            }
            ErrorKind::UnknownIdentifier { name } => {
                format!("cannot find name '{name}'")
            }
            ErrorKind::UnknownProperty { object, name } => {
                format!("property '{name}' does not exist on type '{object}'")
            }
            ErrorKind::UnknownType { name } => {
                format!("cannot find type '{name}'")
            }
            ErrorKind::UnknownComponent { name } => {
                format!("cannot find component '{name}'")
            }
            ErrorKind::InvalidObjectKey { key } => {
                format!("type '{key}' cannot be used as an index key")
            }
            ErrorKind::OutOfBounds { index, length } => {
                format!("index {index} is out of bounds for a tuple of length {length}")
            }
            ErrorKind::ExpectedObject { found } => {
                format!("expected an object type, found '{found}'")
            }
            ErrorKind::ExpectedArray { found } => {
                format!("expected an array type, found '{found}'")
            }
            ErrorKind::MissingRequiredProp { name, object } => {
                format!("property '{name}' is required by type '{object}'")
            }
            ErrorKind::AwaitOutsideAsync => {
                "'await' is only allowed inside 'async' functions".to_string()
            }
            ErrorKind::NoMatchingOverload { callee } => {
                format!("no overload of '{callee}' matches this call")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRelatedInformation {
    pub span: Span,
    pub message: String,
}

/// A single diagnostic produced by the engine.
///
/// Ordering within one inference pass is source order (pre-order AST
/// traversal).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(kind: ErrorKind, span: Span) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code: kind.code(),
            message: kind.message(),
            kind,
            span,
            related_information: Vec::new(),
        }
    }

    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            span,
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let kinds = [
            ErrorKind::TypeMismatch {
                actual: "a".into(),
                expected: "b".into(),
            },
            ErrorKind::UnknownIdentifier { name: "x".into() },
            ErrorKind::AwaitOutsideAsync,
            ErrorKind::NoMatchingOverload { callee: "f".into() },
        ];
        let mut codes: Vec<u32> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_error_constructor_fills_message() {
        let d = Diagnostic::error(
            ErrorKind::TypeMismatch {
                actual: "string".into(),
                expected: "number".into(),
            },
            Span::new(0, 5),
        );
        assert_eq!(d.code, 1001);
        assert!(d.message.contains("string"));
        assert!(d.message.contains("number"));
    }
}
