//! The solver: the stateful façade over the type store.
//!
//! One `Solver` per compilation unit; type-variable ids are local to it,
//! so types from different solvers must never be mixed. All entry points
//! are synchronous; long-running ones poll the cancellation token at
//! recursion boundaries.

use regex::Regex;
use rustc_hash::FxHashMap;
use sable_common::cancel::CancelToken;
use sable_common::diagnostics::{Diagnostic, ErrorKind};
use sable_common::span::Span;

use crate::display::print_type;
use crate::store::TypeStore;
use crate::types::TypeId;

pub struct Solver {
    pub store: TypeStore,
    pub(crate) cancel: CancelToken,
    regex_cache: FxHashMap<String, Option<Regex>>,
}

impl Solver {
    pub fn new() -> Self {
        Self::with_cancel(CancelToken::new())
    }

    pub fn with_cancel(cancel: CancelToken) -> Self {
        Solver {
            store: TypeStore::new(),
            cancel,
            regex_cache: FxHashMap::default(),
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Pretty-print a type in canonical form.
    pub fn print(&self, t: TypeId) -> String {
        print_type(&self.store, t)
    }

    /// A `TypeMismatch` diagnostic for the pair, located at the actual
    /// side's provenance with the expected side attached as related info.
    pub(crate) fn mismatch(&self, actual: TypeId, expected: TypeId) -> Diagnostic {
        let span = self
            .store
            .prov(actual)
            .or_else(|| self.store.prov(expected))
            .unwrap_or_else(Span::dummy);
        let diag = Diagnostic::error(
            ErrorKind::TypeMismatch {
                actual: self.print(actual),
                expected: self.print(expected),
            },
            span,
        );
        match self.store.prov(expected) {
            Some(exp_span) if !exp_span.is_dummy() => {
                diag.with_related(exp_span, "expected type originates here")
            }
            _ => diag,
        }
    }

    /// Compile (and cache) the pattern of a regex literal type. Patterns
    /// are anchored: a literal matches only if the whole string does.
    pub(crate) fn compiled_regex(&mut self, pattern: &str) -> Option<&Regex> {
        self.regex_cache
            .entry(pattern.to_string())
            .or_insert_with(|| Regex::new(&format!("^(?:{pattern})$")).ok())
            .as_ref()
    }
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new()
    }
}
