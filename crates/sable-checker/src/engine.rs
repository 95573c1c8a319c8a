//! The engine API consumed by the outer driver.

use sable_ast::Module;
use sable_common::cancel::CancelToken;
use sable_common::diagnostics::Diagnostic;
use sable_solver::{MemberKey, Scope, Solver, TypeId};
use tracing::debug;

/// One type engine per compilation unit. Type-variable ids are
/// engine-local; callers parallelizing over units instantiate one engine
/// each.
pub struct Engine {
    pub solver: Solver,
}

/// Per-function inference frame: collects the observations the final
/// function type is built from. `return` and `throw` statements and
/// `await` rejection types land in the innermost frame; nested functions
/// push their own frame, which is what keeps collection from descending
/// into them.
pub(crate) struct FuncFrame {
    pub is_async: bool,
    pub returns: Vec<TypeId>,
    pub throws: Vec<TypeId>,
}

/// Mutable inference state threaded through one `infer` call.
pub(crate) struct InferCtx {
    pub diags: Vec<Diagnostic>,
    pub frames: Vec<FuncFrame>,
}

impl InferCtx {
    pub(crate) fn new() -> Self {
        InferCtx {
            diags: Vec::new(),
            frames: Vec::new(),
        }
    }
}

impl Engine {
    /// A fresh engine with zero type variables.
    pub fn new() -> Self {
        Engine {
            solver: Solver::new(),
        }
    }

    pub fn with_cancel(cancel: CancelToken) -> Self {
        Engine {
            solver: Solver::with_cancel(cancel),
        }
    }

    /// Infer the given AST fragment under the given scope. The scope is
    /// updated in place with the new bindings; the returned diagnostics
    /// are in source order.
    pub fn infer(&mut self, scope: &mut Scope, module: &Module) -> Vec<Diagnostic> {
        let mut ctx = InferCtx::new();
        for stmt in &module.stmts {
            self.infer_stmt(&mut ctx, scope, stmt);
        }
        debug!(diagnostics = ctx.diags.len(), "inference finished");
        ctx.diags
    }

    // Solver entry points re-exposed for tooling.

    pub fn unify(&mut self, scope: &Scope, actual: TypeId, expected: TypeId) -> Vec<Diagnostic> {
        self.solver.unify(scope, actual, expected)
    }

    pub fn expand(&mut self, scope: &Scope, t: TypeId, budget: i32) -> TypeId {
        self.solver.expand(scope, t, budget)
    }

    pub fn get_member(
        &mut self,
        scope: &Scope,
        obj: TypeId,
        key: &MemberKey,
    ) -> (TypeId, Vec<Diagnostic>) {
        let mut diags = Vec::new();
        let ty = self.solver.get_member(scope, obj, key, &mut diags);
        (ty, diags)
    }

    pub fn print(&self, t: TypeId) -> String {
        self.solver.print(t)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
