//! Lowering type annotations to engine types.
//!
//! References capture their alias pointer when the name already resolves;
//! otherwise resolution stays late-bound through the scope (forward
//! references to aliases declared later in the module).

use sable_ast::type_ann::{FuncAnn, ObjAnnElem, PrimName, TypeAnn, TypeAnnKind};
use sable_ast::{Lit, TypeParamDecl};
use sable_common::span::Span;
use sable_solver::{
    FuncParam, FuncType, Literal, MappedElem, Mutability, ObjElem, PropertyElem, RefType,
    RegexType, Scope, TemplateLitType, TypeAlias, TypeId, TypeList, TypeParam,
};

use crate::engine::Engine;

impl Engine {
    pub(crate) fn lower_type(&mut self, scope: &Scope, ann: &TypeAnn) -> TypeId {
        let span = Some(ann.span);
        match &ann.kind {
            TypeAnnKind::Prim(p) => match p {
                PrimName::Number => TypeId::NUMBER,
                PrimName::String => TypeId::STRING,
                PrimName::Boolean => TypeId::BOOLEAN,
                PrimName::Symbol => TypeId::SYMBOL,
                PrimName::BigInt => TypeId::BIGINT,
            },
            TypeAnnKind::Lit(lit) => {
                let lit = lower_literal(lit);
                self.solver.store.literal(lit, span)
            }
            TypeAnnKind::Never => TypeId::NEVER,
            TypeAnnKind::Unknown => TypeId::UNKNOWN,
            TypeAnnKind::Any => TypeId::ANY,
            TypeAnnKind::Null => TypeId::NULL,
            TypeAnnKind::Undefined => TypeId::UNDEFINED,
            TypeAnnKind::Void => TypeId::VOID,
            TypeAnnKind::Ref { name, args } => {
                let dotted = name.parts.join(".");
                let args: TypeList = args.iter().map(|a| self.lower_type(scope, a)).collect();
                let alias = scope.lookup_alias_path(&dotted);
                self.solver.store.type_ref(
                    RefType {
                        name: dotted,
                        args,
                        alias,
                    },
                    span,
                )
            }
            TypeAnnKind::Func(f) => {
                let func = self.lower_func_ann(scope, f, ann.span);
                self.solver.store.func(func, span)
            }
            TypeAnnKind::Object { elems, sealed } => {
                let elems = elems
                    .iter()
                    .map(|e| self.lower_obj_elem(scope, e))
                    .collect();
                self.solver.store.object(
                    sable_solver::ObjectType {
                        elems,
                        extends: TypeList::new(),
                        nominal: false,
                        sealed: *sealed,
                    },
                    span,
                )
            }
            TypeAnnKind::Tuple(elems) => {
                let elems: TypeList = elems.iter().map(|e| self.lower_type(scope, e)).collect();
                self.solver.store.tuple(elems, span)
            }
            TypeAnnKind::Union(members) => {
                let members: Vec<TypeId> =
                    members.iter().map(|m| self.lower_type(scope, m)).collect();
                self.solver.store.union(members, span)
            }
            TypeAnnKind::Intersection(members) => {
                let members: Vec<TypeId> =
                    members.iter().map(|m| self.lower_type(scope, m)).collect();
                self.solver.store.intersection(members, span)
            }
            TypeAnnKind::KeyOf(inner) => {
                let inner = self.lower_type(scope, inner);
                self.solver.store.key_of(inner, span)
            }
            TypeAnnKind::Index { target, index } => {
                let target = self.lower_type(scope, target);
                let index = self.lower_type(scope, index);
                self.solver.store.index(target, index, span)
            }
            TypeAnnKind::TypeOf(path) => self.solver.store.type_of(path.parts.clone(), span),
            TypeAnnKind::Cond {
                check,
                extends,
                then_ann,
                else_ann,
            } => {
                let check = self.lower_type(scope, check);
                let extends = self.lower_type(scope, extends);
                let then_ty = self.lower_type(scope, then_ann);
                let else_ty = self.lower_type(scope, else_ann);
                self.solver.store.cond(
                    sable_solver::CondType {
                        check,
                        extends,
                        then_ty,
                        else_ty,
                    },
                    span,
                )
            }
            TypeAnnKind::Infer(name) => self.solver.store.infer(name.clone(), span),
            TypeAnnKind::TemplateLit { quasis, types } => {
                let types: TypeList = types.iter().map(|t| self.lower_type(scope, t)).collect();
                self.solver.store.template_lit(
                    TemplateLitType {
                        quasis: quasis.clone(),
                        types,
                    },
                    span,
                )
            }
            TypeAnnKind::Regex(pattern) => {
                let groups = named_capture_groups(pattern)
                    .into_iter()
                    .map(|name| (name, TypeId::UNKNOWN))
                    .collect();
                self.solver.store.regex(
                    RegexType {
                        pattern: pattern.clone(),
                        groups,
                    },
                    span,
                )
            }
            TypeAnnKind::Readonly(inner) => {
                let inner = self.lower_type(scope, inner);
                self.solver
                    .store
                    .mutability(inner, Mutability::ReadOnly, span)
            }
        }
    }

    pub(crate) fn lower_func_ann(&mut self, scope: &Scope, f: &FuncAnn, span: Span) -> FuncType {
        let mut func_scope = scope.with_new_scope();
        let type_params = self.resolve_type_params(&mut func_scope, &f.type_params);
        let params = f
            .params
            .iter()
            .map(|p| FuncParam {
                name: p.name.clone(),
                ty: self.lower_type(&func_scope, &p.ann),
                optional: p.optional,
            })
            .collect();
        let ret = self.lower_type(&func_scope, &f.ret);
        let throws = match &f.throws {
            Some(t) => self.lower_type(&func_scope, t),
            None => self.solver.store.fresh_var(Some(span)),
        };
        FuncType {
            type_params,
            self_ty: None,
            params,
            ret,
            throws,
        }
    }

    fn lower_obj_elem(&mut self, scope: &Scope, elem: &ObjAnnElem) -> ObjElem {
        match elem {
            ObjAnnElem::Property {
                name,
                ann,
                optional,
                readonly,
            } => ObjElem::Property(PropertyElem {
                name: name.name.clone(),
                ty: self.lower_type(scope, ann),
                optional: *optional,
                readonly: *readonly,
            }),
            ObjAnnElem::Method { name, func } => {
                let f = self.lower_func_ann(scope, func, name.span);
                let func = self.solver.store.func(f, Some(name.span));
                ObjElem::Method {
                    name: name.name.clone(),
                    func,
                }
            }
            ObjAnnElem::Callable(func) => {
                let f = self.lower_func_ann(scope, func, func.ret.span);
                let func = self.solver.store.func(f, None);
                ObjElem::Callable(func)
            }
            ObjAnnElem::Mapped {
                binder,
                constraint,
                value,
                optional,
                readonly,
            } => ObjElem::Mapped(MappedElem {
                binder: binder.name.clone(),
                constraint: self.lower_type(scope, constraint),
                value: self.lower_type(scope, value),
                optional: *optional,
                readonly: *readonly,
            }),
            ObjAnnElem::Spread(inner) => ObjElem::RestSpread(self.lower_type(scope, inner)),
        }
    }

    /// Resolve declared type parameters in topological order of their
    /// constraint/default dependencies, installing each as a type alias
    /// (`t = constraint`, else `unknown`) in the given scope. The returned
    /// list keeps declaration order.
    pub(crate) fn resolve_type_params(
        &mut self,
        scope: &mut Scope,
        decls: &[TypeParamDecl],
    ) -> Vec<TypeParam> {
        let order = topo_order(decls);
        let mut resolved: Vec<Option<TypeParam>> = vec![None; decls.len()];
        for i in order {
            let d = &decls[i];
            let constraint = d.constraint.as_ref().map(|a| self.lower_type(scope, a));
            let default = d.default.as_ref().map(|a| self.lower_type(scope, a));
            let placeholder = constraint.unwrap_or(TypeId::UNKNOWN);
            scope.set_type_alias(d.name.name.clone(), TypeAlias::simple(placeholder));
            resolved[i] = Some(TypeParam {
                name: d.name.name.clone(),
                constraint,
                default,
            });
        }
        resolved
            .into_iter()
            .map(|r| r.expect("every type parameter was resolved"))
            .collect()
    }
}

/// Stable topological order of type-parameter declarations; a dependency
/// cycle falls back to declaration order for the remainder.
fn topo_order(decls: &[TypeParamDecl]) -> Vec<usize> {
    let names: Vec<&str> = decls.iter().map(|d| d.name.name.as_str()).collect();
    let deps: Vec<Vec<usize>> = decls
        .iter()
        .map(|d| {
            let mut referenced = Vec::new();
            if let Some(c) = &d.constraint {
                collect_ref_names(c, &mut referenced);
            }
            if let Some(def) = &d.default {
                collect_ref_names(def, &mut referenced);
            }
            referenced
                .iter()
                .filter_map(|name| names.iter().position(|n| n == name))
                .collect()
        })
        .collect();
    let mut order = Vec::with_capacity(decls.len());
    let mut placed = vec![false; decls.len()];
    loop {
        let mut progressed = false;
        for i in 0..decls.len() {
            if placed[i] {
                continue;
            }
            if deps[i].iter().all(|&d| placed[d] || d == i) {
                placed[i] = true;
                order.push(i);
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    for i in 0..decls.len() {
        if !placed[i] {
            order.push(i);
        }
    }
    order
}

/// Single-segment reference names mentioned by an annotation (the only
/// names that can refer to sibling type parameters).
fn collect_ref_names(ann: &TypeAnn, out: &mut Vec<String>) {
    match &ann.kind {
        TypeAnnKind::Ref { name, args } => {
            if name.parts.len() == 1 {
                out.push(name.parts[0].clone());
            }
            for a in args {
                collect_ref_names(a, out);
            }
        }
        TypeAnnKind::Func(f) => {
            for p in &f.params {
                collect_ref_names(&p.ann, out);
            }
            collect_ref_names(&f.ret, out);
            if let Some(t) = &f.throws {
                collect_ref_names(t, out);
            }
        }
        TypeAnnKind::Object { elems, .. } => {
            for e in elems {
                match e {
                    ObjAnnElem::Property { ann, .. } => collect_ref_names(ann, out),
                    ObjAnnElem::Method { func, .. } | ObjAnnElem::Callable(func) => {
                        for p in &func.params {
                            collect_ref_names(&p.ann, out);
                        }
                        collect_ref_names(&func.ret, out);
                    }
                    ObjAnnElem::Mapped {
                        constraint, value, ..
                    } => {
                        collect_ref_names(constraint, out);
                        collect_ref_names(value, out);
                    }
                    ObjAnnElem::Spread(inner) => collect_ref_names(inner, out),
                }
            }
        }
        TypeAnnKind::Tuple(items)
        | TypeAnnKind::Union(items)
        | TypeAnnKind::Intersection(items) => {
            for i in items {
                collect_ref_names(i, out);
            }
        }
        TypeAnnKind::KeyOf(inner) | TypeAnnKind::Readonly(inner) => collect_ref_names(inner, out),
        TypeAnnKind::Index { target, index } => {
            collect_ref_names(target, out);
            collect_ref_names(index, out);
        }
        TypeAnnKind::Cond {
            check,
            extends,
            then_ann,
            else_ann,
        } => {
            collect_ref_names(check, out);
            collect_ref_names(extends, out);
            collect_ref_names(then_ann, out);
            collect_ref_names(else_ann, out);
        }
        TypeAnnKind::TemplateLit { types, .. } => {
            for t in types {
                collect_ref_names(t, out);
            }
        }
        _ => {}
    }
}

fn lower_literal(lit: &Lit) -> Literal {
    match lit {
        Lit::Number(n) => Literal::Number(*n),
        Lit::String(s) => Literal::String(s.clone()),
        Lit::Boolean(b) => Literal::Boolean(*b),
        Lit::BigInt(s) => Literal::BigInt(s.clone()),
    }
}

/// Named capture groups (`(?<name>…)`) of a regex pattern, in order.
/// Lookbehind (`(?<=` / `(?<!`) is not a capture group.
fn named_capture_groups(pattern: &str) -> Vec<String> {
    let bytes = pattern.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i + 2 < bytes.len() {
        let prefix_len = if bytes[i..].starts_with(b"(?P<") {
            4
        } else if bytes[i..].starts_with(b"(?<") {
            3
        } else {
            0
        };
        if prefix_len == 0 || bytes[i..].starts_with(b"(?<=") || bytes[i..].starts_with(b"(?<!") {
            i += 1;
            continue;
        }
        let rest = &pattern[i + prefix_len..];
        if let Some(end) = rest.find('>') {
            let name = &rest[..end];
            if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                out.push(name.to_string());
            }
            i += prefix_len + end + 1;
        } else {
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::named_capture_groups;

    #[test]
    fn test_named_capture_groups() {
        assert_eq!(
            named_capture_groups("(?<major>\\d+)\\.(?<minor>\\d+)"),
            vec!["major".to_string(), "minor".to_string()]
        );
        assert!(named_capture_groups("(?<=prefix)suffix").is_empty());
        assert!(named_capture_groups("plain(group)").is_empty());
    }
}
