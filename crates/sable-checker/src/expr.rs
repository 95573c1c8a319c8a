//! Expression inference.

use sable_ast::expr::{BinOp, Expr, ExprKind, Lit};
use sable_common::diagnostics::{Diagnostic, ErrorKind};
use sable_common::span::Span;
use sable_solver::{
    FuncParam, FuncType, Literal, MemberKey, ObjElem, ObjectType, RefType, Scope, Subst, TypeId,
    TypeKind, TypeList, substitute,
};

use crate::engine::{Engine, InferCtx};

impl Engine {
    pub(crate) fn infer_expr(&mut self, ctx: &mut InferCtx, scope: &mut Scope, expr: &Expr) -> TypeId {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Ident(name) => match scope.get_value(name) {
                Some(binding) => binding.ty,
                None => {
                    ctx.diags.push(Diagnostic::error(
                        ErrorKind::UnknownIdentifier { name: name.clone() },
                        span,
                    ));
                    TypeId::ANY
                }
            },
            ExprKind::Lit(lit) => {
                let lit = match lit {
                    Lit::Number(n) => Literal::Number(*n),
                    Lit::String(s) => Literal::String(s.clone()),
                    Lit::Boolean(b) => Literal::Boolean(*b),
                    Lit::BigInt(s) => Literal::BigInt(s.clone()),
                };
                self.solver.store.literal(lit, Some(span))
            }
            ExprKind::TemplateString { exprs, .. } => {
                for e in exprs {
                    self.infer_expr(ctx, scope, e);
                }
                TypeId::STRING
            }
            ExprKind::Array(elems) => {
                let elem_types: Vec<TypeId> = elems
                    .iter()
                    .map(|e| self.infer_expr(ctx, scope, e))
                    .collect();
                let elem = if elem_types.is_empty() {
                    self.solver.store.fresh_var(Some(span))
                } else {
                    self.solver.store.union(elem_types, Some(span))
                };
                self.array_type(scope, elem, span)
            }
            ExprKind::Object(props) => {
                let elems = props
                    .iter()
                    .map(|prop| {
                        let ty = match &prop.value {
                            Some(value) => self.infer_expr(ctx, scope, value),
                            // Shorthand `{x}` reads the binding `x`.
                            None => match scope.get_value(&prop.key.name) {
                                Some(binding) => binding.ty,
                                None => {
                                    ctx.diags.push(Diagnostic::error(
                                        ErrorKind::UnknownIdentifier {
                                            name: prop.key.name.clone(),
                                        },
                                        prop.span,
                                    ));
                                    TypeId::ANY
                                }
                            },
                        };
                        ObjElem::Property(sable_solver::PropertyElem {
                            name: prop.key.name.clone(),
                            ty,
                            optional: false,
                            readonly: false,
                        })
                    })
                    .collect();
                self.solver.store.object(
                    ObjectType {
                        elems,
                        extends: TypeList::new(),
                        nominal: false,
                        sealed: false,
                    },
                    Some(span),
                )
            }
            ExprKind::Call { callee, args } => {
                let callee_t = self.infer_expr(ctx, scope, callee);
                let arg_types: Vec<TypeId> = args
                    .iter()
                    .map(|a| self.infer_expr(ctx, scope, a))
                    .collect();
                let desc = callee_description(callee);
                self.infer_call(ctx, scope, callee_t, &arg_types, &desc, span)
            }
            ExprKind::Member {
                object,
                property,
                optional,
            } => {
                let obj_t = self.infer_expr(ctx, scope, object);
                let key = MemberKey::Prop {
                    name: property.name.clone(),
                    optional: *optional,
                };
                self.solver.get_member(scope, obj_t, &key, &mut ctx.diags)
            }
            ExprKind::Index {
                object,
                index,
                optional,
            } => {
                let obj_t = self.infer_expr(ctx, scope, object);
                let idx_t = self.infer_expr(ctx, scope, index);
                if *optional {
                    let (defined, had_nullish) = self.strip_nullish(obj_t);
                    if had_nullish && defined == TypeId::NEVER {
                        return TypeId::UNDEFINED;
                    }
                    let found = self.solver.get_member(
                        scope,
                        defined,
                        &MemberKey::Index(idx_t),
                        &mut ctx.diags,
                    );
                    if had_nullish {
                        self.solver
                            .store
                            .union([found, TypeId::UNDEFINED], Some(span))
                    } else {
                        found
                    }
                } else {
                    self.solver
                        .get_member(scope, obj_t, &MemberKey::Index(idx_t), &mut ctx.diags)
                }
            }
            ExprKind::Binary { op, left, right } => {
                let lt = self.infer_expr(ctx, scope, left);
                let rt = self.infer_expr(ctx, scope, right);
                self.infer_binary(ctx, scope, *op, lt, rt)
            }
            ExprKind::Await(inner) => {
                let operand = self.infer_expr(ctx, scope, inner);
                self.infer_await(ctx, scope, operand, span)
            }
            ExprKind::Func(f) => self.infer_function(
                ctx,
                scope,
                None,
                crate::function::FuncParts {
                    is_async: f.is_async,
                    type_params: &f.type_params,
                    params: &f.params,
                    return_ann: f.return_ann.as_ref(),
                    throws_ann: f.throws_ann.as_ref(),
                    body: Some(&f.body),
                    span,
                },
            ),
        }
    }

    fn infer_binary(
        &mut self,
        ctx: &mut InferCtx,
        scope: &Scope,
        op: BinOp,
        left: TypeId,
        right: TypeId,
    ) -> TypeId {
        match op {
            // Equality accepts operands of any type.
            BinOp::Eq | BinOp::NotEq => TypeId::BOOLEAN,
            BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => {
                let ds = self.solver.unify(scope, left, TypeId::NUMBER);
                ctx.diags.extend(ds);
                let ds = self.solver.unify(scope, right, TypeId::NUMBER);
                ctx.diags.extend(ds);
                TypeId::BOOLEAN
            }
            BinOp::Add => {
                // `+` concatenates when either operand is a string.
                if self.is_stringish(left) || self.is_stringish(right) {
                    TypeId::STRING
                } else {
                    let ds = self.solver.unify(scope, left, TypeId::NUMBER);
                    ctx.diags.extend(ds);
                    let ds = self.solver.unify(scope, right, TypeId::NUMBER);
                    ctx.diags.extend(ds);
                    TypeId::NUMBER
                }
            }
            BinOp::Sub | BinOp::Mul | BinOp::Div => {
                let ds = self.solver.unify(scope, left, TypeId::NUMBER);
                ctx.diags.extend(ds);
                let ds = self.solver.unify(scope, right, TypeId::NUMBER);
                ctx.diags.extend(ds);
                TypeId::NUMBER
            }
        }
    }

    fn is_stringish(&self, t: TypeId) -> bool {
        let t = self.solver.store.resolve(t);
        matches!(
            self.solver.store.kind(t),
            TypeKind::Prim(sable_solver::PrimKind::String)
                | TypeKind::Lit(Literal::String(_))
                | TypeKind::TemplateLit(_)
        )
    }

    /// `await e`: the operand must be a `Promise<R, X>`; the result is `R`
    /// and `X` joins the enclosing function's thrown types. Outside an
    /// async body this is a hard error (inference still continues with the
    /// resolution type).
    fn infer_await(
        &mut self,
        ctx: &mut InferCtx,
        scope: &Scope,
        operand: TypeId,
        span: Span,
    ) -> TypeId {
        let is_async = ctx.frames.last().is_some_and(|f| f.is_async);
        if !is_async {
            ctx.diags
                .push(Diagnostic::error(ErrorKind::AwaitOutsideAsync, span));
        }
        let resolved = self.solver.store.fresh_var(Some(span));
        let rejected = self.solver.store.fresh_var(Some(span));
        let promise = self.promise_type(scope, resolved, rejected, span);
        let ds = self.solver.unify(scope, operand, promise);
        ctx.diags.extend(ds);
        if is_async {
            if let Some(frame) = ctx.frames.last_mut() {
                frame.throws.push(rejected);
            }
        }
        self.solver.store.prune(resolved)
    }

    /// Resolve a call: overloaded callables are tried in declaration
    /// order; otherwise the callee is unified against a function type
    /// synthesized from the argument types (binding an unbound callee the
    /// usual way).
    fn infer_call(
        &mut self,
        ctx: &mut InferCtx,
        scope: &Scope,
        callee_t: TypeId,
        args: &[TypeId],
        desc: &str,
        span: Span,
    ) -> TypeId {
        // Surface the callable shape.
        let mut t = self.solver.store.prune(callee_t);
        loop {
            let terminal = matches!(
                self.solver.store.kind(t),
                TypeKind::Func(_) | TypeKind::Object(_) | TypeKind::Var(_) | TypeKind::Any
            );
            if terminal {
                break;
            }
            let expanded = self.solver.expand_with_diags(scope, t, 1, &mut ctx.diags);
            let expanded = self.solver.store.prune(expanded);
            if expanded == t {
                break;
            }
            t = expanded;
        }
        if matches!(self.solver.store.kind(t), TypeKind::Any) {
            return TypeId::ANY;
        }
        // Overload sets: first signature that accepts the arguments wins.
        let callables: Vec<TypeId> = match self.solver.store.kind(t) {
            TypeKind::Object(o) => o
                .elems
                .iter()
                .filter_map(|e| match e {
                    ObjElem::Callable(f) => Some(*f),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        if !callables.is_empty() {
            for candidate in callables {
                let mut scratch = Vec::new();
                if let Some(ret) = self.try_apply(scope, candidate, args, span, &mut scratch) {
                    if scratch.is_empty() {
                        return ret;
                    }
                }
            }
            ctx.diags.push(Diagnostic::error(
                ErrorKind::NoMatchingOverload {
                    callee: desc.to_string(),
                },
                span,
            ));
            return TypeId::ANY;
        }
        match self.try_apply(scope, t, args, span, &mut ctx.diags) {
            Some(ret) => ret,
            None => TypeId::ANY,
        }
    }

    /// Apply one callable candidate. Returns the (pruned) result type;
    /// failures are reported into `diags` and `None` is returned only for
    /// shapes that cannot be called at all.
    fn try_apply(
        &mut self,
        scope: &Scope,
        callee: TypeId,
        args: &[TypeId],
        span: Span,
        diags: &mut Vec<Diagnostic>,
    ) -> Option<TypeId> {
        let callee = self.instantiate_generic(callee, diags, scope);
        let ret = self.solver.store.fresh_var(Some(span));
        let throws = self.solver.store.fresh_var(Some(span));
        let params = args
            .iter()
            .enumerate()
            .map(|(i, &ty)| FuncParam {
                name: format!("arg{i}"),
                ty,
                optional: false,
            })
            .collect();
        let synth = self.solver.store.func(
            FuncType {
                type_params: Vec::new(),
                self_ty: None,
                params,
                ret,
                throws,
            },
            Some(span),
        );
        let ds = self.solver.unify(scope, synth, callee);
        diags.extend(ds);
        Some(self.solver.store.prune(ret))
    }

    /// Replace a generic callee's type parameters with fresh variables and
    /// check the bindings against the declared constraints afterwards.
    fn instantiate_generic(
        &mut self,
        callee: TypeId,
        diags: &mut Vec<Diagnostic>,
        scope: &Scope,
    ) -> TypeId {
        let callee = self.solver.store.prune(callee);
        let TypeKind::Func(f) = self.solver.store.kind(callee).clone() else {
            return callee;
        };
        if f.type_params.is_empty() {
            return callee;
        }
        let mut sigma = Subst::default();
        let mut constrained: Vec<(TypeId, TypeId)> = Vec::new();
        for tp in &f.type_params {
            let var = self.solver.store.fresh_var(None);
            if let Some(c) = tp.constraint {
                constrained.push((var, c));
            }
            sigma.insert(tp.name.clone(), var);
        }
        let params = f
            .params
            .iter()
            .map(|p| FuncParam {
                name: p.name.clone(),
                ty: substitute(&mut self.solver.store, p.ty, &sigma),
                optional: p.optional,
            })
            .collect();
        let self_ty = f
            .self_ty
            .map(|s| substitute(&mut self.solver.store, s, &sigma));
        let ret = substitute(&mut self.solver.store, f.ret, &sigma);
        let throws = substitute(&mut self.solver.store, f.throws, &sigma);
        let prov = self.solver.store.prov(callee);
        let inst = self.solver.store.func(
            FuncType {
                type_params: Vec::new(),
                self_ty,
                params,
                ret,
                throws,
            },
            prov,
        );
        // Each constrained variable takes its constraint up front; the
        // argument unification that follows must then fit it.
        for (var, c) in constrained {
            let c = substitute(&mut self.solver.store, c, &sigma);
            let ds = self.solver.unify(scope, var, c);
            diags.extend(ds);
        }
        inst
    }

    /// Drop nullish members from a union (the optional-chain case).
    fn strip_nullish(&mut self, t: TypeId) -> (TypeId, bool) {
        let pruned = self.solver.store.prune(t);
        let TypeKind::Union(members) = self.solver.store.kind(pruned).clone() else {
            if self.solver.store.kind(pruned).is_nullish() {
                return (TypeId::NEVER, true);
            }
            return (pruned, false);
        };
        let mut defined: Vec<TypeId> = Vec::new();
        let mut had_nullish = false;
        for m in members {
            let m = self.solver.store.prune(m);
            if self.solver.store.kind(m).is_nullish() {
                had_nullish = true;
            } else {
                defined.push(m);
            }
        }
        let prov = self.solver.store.prov(pruned);
        (self.solver.store.union(defined, prov), had_nullish)
    }

    /// `Array<elem>` through the scope's `Array` alias.
    pub(crate) fn array_type(&mut self, scope: &Scope, elem: TypeId, span: Span) -> TypeId {
        let alias = scope.get_type_alias("Array");
        let mut args = TypeList::new();
        args.push(elem);
        self.solver.store.type_ref(
            RefType {
                name: "Array".to_string(),
                args,
                alias,
            },
            Some(span),
        )
    }

    /// `Promise<resolved, rejected>` through the scope's `Promise` alias.
    pub(crate) fn promise_type(
        &mut self,
        scope: &Scope,
        resolved: TypeId,
        rejected: TypeId,
        span: Span,
    ) -> TypeId {
        let alias = scope.get_type_alias("Promise");
        let mut args = TypeList::new();
        args.push(resolved);
        args.push(rejected);
        self.solver.store.type_ref(
            RefType {
                name: "Promise".to_string(),
                args,
                alias,
            },
            Some(span),
        )
    }
}

/// A short description of a callee for overload diagnostics.
fn callee_description(callee: &Expr) -> String {
    match &callee.kind {
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Member { property, .. } => property.name.clone(),
        _ => "callee".to_string(),
    }
}
