//! Statement and declaration inference.

use sable_ast::stmt::{Stmt, StmtKind};
use sable_common::span::Spanned;
use sable_solver::{Binding, Scope, TypeAlias, TypeId};

use crate::engine::{Engine, InferCtx};
use crate::function::FuncParts;

impl Engine {
    pub(crate) fn infer_stmt(&mut self, ctx: &mut InferCtx, scope: &mut Scope, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::VarDecl(decl) => {
                let init_t = self.infer_expr(ctx, scope, &decl.init);
                let declared = match &decl.ann {
                    Some(ann) => {
                        let expected = self.lower_type(scope, ann);
                        let ds = self.solver.unify(scope, init_t, expected);
                        ctx.diags.extend(ds);
                        expected
                    }
                    None => init_t,
                };
                let (pattern_t, bindings) = self.infer_pattern(&decl.pattern);
                let ds = self.solver.unify(scope, declared, pattern_t);
                ctx.diags.extend(ds);
                for (name, ty) in bindings {
                    let ty = self.solver.store.prune(ty);
                    scope.set_value(
                        name,
                        Binding {
                            ty,
                            mutable: decl.mutable,
                        },
                    );
                }
            }
            StmtKind::FuncDecl(decl) => {
                let ty = self.infer_function(
                    ctx,
                    scope,
                    Some(&decl.name.name),
                    FuncParts {
                        is_async: decl.is_async,
                        type_params: &decl.type_params,
                        params: &decl.params,
                        return_ann: decl.return_ann.as_ref(),
                        throws_ann: decl.throws_ann.as_ref(),
                        body: Some(&decl.body),
                        span: stmt.span(),
                    },
                );
                scope.set_value(decl.name.name.clone(), Binding::immutable(ty));
            }
            StmtKind::DeclareFunc(decl) => {
                let ty = self.infer_function(
                    ctx,
                    scope,
                    Some(&decl.name.name),
                    FuncParts {
                        is_async: false,
                        type_params: &decl.type_params,
                        params: &decl.params,
                        return_ann: Some(&decl.return_ann),
                        throws_ann: decl.throws_ann.as_ref(),
                        body: None,
                        span: stmt.span(),
                    },
                );
                scope.set_value(decl.name.name.clone(), Binding::immutable(ty));
            }
            StmtKind::TypeAlias(decl) => {
                let mut alias_scope = scope.with_new_scope();
                let type_params = self.resolve_type_params(&mut alias_scope, &decl.type_params);
                let body = self.lower_type(&alias_scope, &decl.ann);
                scope.set_type_alias(
                    decl.name.name.clone(),
                    TypeAlias {
                        type_params,
                        ty: body,
                        recursive: decl.recursive,
                    },
                );
            }
            StmtKind::Return(value) => {
                let ty = match value {
                    Some(expr) => self.infer_expr(ctx, scope, expr),
                    None => TypeId::VOID,
                };
                if let Some(frame) = ctx.frames.last_mut() {
                    frame.returns.push(ty);
                }
            }
            StmtKind::Throw(value) => {
                let ty = self.infer_expr(ctx, scope, value);
                if let Some(frame) = ctx.frames.last_mut() {
                    frame.throws.push(ty);
                }
            }
            StmtKind::If(if_stmt) => {
                let cond_t = self.infer_expr(ctx, scope, &if_stmt.cond);
                let ds = self.solver.unify(scope, cond_t, TypeId::BOOLEAN);
                ctx.diags.extend(ds);
                let mut then_scope = scope.with_new_scope();
                for s in &if_stmt.then_branch.stmts {
                    self.infer_stmt(ctx, &mut then_scope, s);
                }
                if let Some(else_branch) = &if_stmt.else_branch {
                    let mut else_scope = scope.with_new_scope();
                    for s in &else_branch.stmts {
                        self.infer_stmt(ctx, &mut else_scope, s);
                    }
                }
            }
            StmtKind::Expr(expr) => {
                self.infer_expr(ctx, scope, expr);
            }
        }
    }
}
