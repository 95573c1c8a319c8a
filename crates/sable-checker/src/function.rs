//! Function declaration inference.
//!
//! The advertised type is built first (type parameters in dependency
//! order, parameter patterns, declared or fresh return/throws), then the
//! body is walked under a fresh frame that collects `return` / `throw`
//! types and `await` rejection types. The collected observations either
//! unify with the declared types (sync) or are rewritten into a
//! `Promise<R, X>` return with `throws never` (async).

use sable_ast::stmt::{Block, Param, TypeParamDecl};
use sable_ast::type_ann::TypeAnn;
use sable_common::span::Span;
use sable_solver::{Binding, FuncParam, FuncType, Scope, TypeId};
use tracing::debug;

use crate::engine::{Engine, FuncFrame, InferCtx};

/// The pieces shared by `fn` declarations, function expressions and
/// ambient `declare fn` signatures (`body: None`).
pub(crate) struct FuncParts<'a> {
    pub is_async: bool,
    pub type_params: &'a [TypeParamDecl],
    pub params: &'a [Param],
    pub return_ann: Option<&'a TypeAnn>,
    pub throws_ann: Option<&'a TypeAnn>,
    pub body: Option<&'a Block>,
    pub span: Span,
}

impl Engine {
    pub(crate) fn infer_function(
        &mut self,
        ctx: &mut InferCtx,
        scope: &Scope,
        name: Option<&str>,
        parts: FuncParts<'_>,
    ) -> TypeId {
        let span = parts.span;
        let mut func_scope = scope.with_new_scope();
        let type_params = self.resolve_type_params(&mut func_scope, parts.type_params);

        // Parameters: each pattern yields a type and bindings; a declared
        // annotation constrains the pattern type.
        let mut func_params: Vec<FuncParam> = Vec::with_capacity(parts.params.len());
        let mut bindings: Vec<(String, TypeId)> = Vec::new();
        for (i, param) in parts.params.iter().enumerate() {
            let (pattern_t, binds) = self.infer_pattern(&param.pattern);
            let ty = match &param.ann {
                Some(ann) => {
                    let declared = self.lower_type(&func_scope, ann);
                    let ds = self.solver.unify(&func_scope, pattern_t, declared);
                    ctx.diags.extend(ds);
                    declared
                }
                None => pattern_t,
            };
            func_params.push(FuncParam {
                name: Engine::param_name(&param.pattern, i),
                ty,
                optional: param.optional,
            });
            bindings.extend(binds);
        }

        let ret = match parts.return_ann {
            Some(ann) => self.lower_type(&func_scope, ann),
            None => self.solver.store.fresh_var(Some(span)),
        };
        let throws = match parts.throws_ann {
            Some(ann) => self.lower_type(&func_scope, ann),
            // An ambient declaration without a throws clause promises not
            // to throw; an inferred body starts from an open variable.
            None if parts.body.is_none() => TypeId::NEVER,
            None => self.solver.store.fresh_var(Some(span)),
        };

        let func_ty = self.solver.store.func(
            FuncType {
                type_params,
                self_ty: None,
                params: func_params,
                ret,
                throws,
            },
            Some(span),
        );
        // Make the function visible to its own body for recursion.
        if let Some(name) = name {
            func_scope.set_value(name.to_string(), Binding::immutable(func_ty));
        }

        let Some(body) = parts.body else {
            return func_ty;
        };

        let mut body_scope = func_scope.with_new_scope();
        for (name, ty) in bindings {
            body_scope.set_value(name, Binding::immutable(ty));
        }
        ctx.frames.push(FuncFrame {
            is_async: parts.is_async,
            returns: Vec::new(),
            throws: Vec::new(),
        });
        for stmt in &body.stmts {
            self.infer_stmt(ctx, &mut body_scope, stmt);
        }
        let frame = ctx.frames.pop().expect("frame pushed above");

        let inferred_ret = if frame.returns.is_empty() {
            TypeId::VOID
        } else {
            self.solver.store.union(frame.returns, Some(span))
        };
        let inferred_throw = self.solver.store.union(frame.throws, Some(span));

        if parts.is_async {
            // Async rewrite: the function resolves with what it returned
            // and rejects with what it threw; the call itself never
            // throws.
            let promise = self.promise_type(scope, inferred_ret, inferred_throw, span);
            self.solver.store.set_func_return(func_ty, promise);
            self.solver.store.set_func_throws(func_ty, TypeId::NEVER);
        } else {
            let ds = self.solver.unify(&func_scope, inferred_ret, ret);
            ctx.diags.extend(ds);
            let ds = self.solver.unify(&func_scope, inferred_throw, throws);
            ctx.diags.extend(ds);
        }
        debug!(func = %self.solver.print(func_ty), "inferred function");
        func_ty
    }
}
