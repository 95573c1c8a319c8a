//! Member access: `T.name` and `T[K]`, resolved uniformly.
//!
//! The algorithm loops (prune, stop on a terminal object / namespace /
//! intersection, otherwise expand one level) and then dispatches on the
//! terminal. Primitives and functions delegate to their built-in wrapper
//! objects (`Number`, `String`, `Boolean`, `Function`) found in scope;
//! tuples delegate property keys to `Array<U>`.

use sable_common::diagnostics::{Diagnostic, ErrorKind};
use sable_common::limits::MAX_MEMBER_DEPTH;
use sable_common::span::Span;
use tracing::trace;

use crate::expand::Budget;
use crate::scope::Scope;
use crate::solver::Solver;
use crate::types::{
    Literal, NamespaceRef, ObjElem, ObjectType, PrimKind, TypeId, TypeKind, TypeList,
};

/// A member key: either a property key (a name, with an optional-chain
/// flag) or an index key (a type).
#[derive(Clone, Debug)]
pub enum MemberKey {
    Prop { name: String, optional: bool },
    Index(TypeId),
}

impl MemberKey {
    pub fn prop(name: impl Into<String>) -> Self {
        MemberKey::Prop {
            name: name.into(),
            optional: false,
        }
    }

    fn is_optional(&self) -> bool {
        matches!(self, MemberKey::Prop { optional: true, .. })
    }
}

impl Solver {
    /// Resolve a member of `obj`. Failures are reported into `diags`; the
    /// returned type is `any` in that case so one bad access does not
    /// cascade.
    pub fn get_member(
        &mut self,
        scope: &Scope,
        obj: TypeId,
        key: &MemberKey,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        self.member_in(scope, obj, key, 0, diags)
    }

    pub(crate) fn member_in(
        &mut self,
        scope: &Scope,
        obj: TypeId,
        key: &MemberKey,
        depth: u32,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        if depth > MAX_MEMBER_DEPTH {
            return TypeId::ANY;
        }
        enum Step {
            Terminal,
            ArrayElem(TypeId),
            Expand,
        }
        let mut t = self.store.prune(obj);
        // Walk to a terminal, expanding one level at a time.
        loop {
            t = self.store.prune(t);
            let step = match self.store.kind(t) {
                // An object still carrying mapped elements expands first;
                // dispatch must only ever see concrete properties.
                TypeKind::Object(o)
                    if o.elems.iter().any(|e| matches!(e, ObjElem::Mapped(_))) =>
                {
                    Step::Expand
                }
                TypeKind::Object(_) | TypeKind::Namespace(_) | TypeKind::Intersection(_) => {
                    Step::Terminal
                }
                // `Array<E>` answers an index key without expansion.
                TypeKind::Ref(r) if r.name == "Array" && matches!(key, MemberKey::Index(_)) => {
                    Step::ArrayElem(r.args.first().copied().unwrap_or(TypeId::UNKNOWN))
                }
                _ => Step::Expand,
            };
            match step {
                Step::Terminal => break,
                Step::ArrayElem(elem) => return elem,
                Step::Expand => {
                    let expanded = {
                        let mut b = Budget::new(1);
                        self.expand_in(scope, t, &mut b, diags)
                    };
                    if expanded == t {
                        break;
                    }
                    t = expanded;
                }
            }
        }
        trace!(obj = %self.print(t), "get_member");
        let span = self.store.prov(t).unwrap_or_else(Span::dummy);
        match self.store.kind(t).clone() {
            TypeKind::Object(o) => self.object_member(scope, t, &o, key, depth, diags),
            TypeKind::Namespace(ns) => self.namespace_member(t, &ns, key, span, diags),
            TypeKind::Intersection(members) => {
                self.intersection_member(scope, t, &members, key, depth, diags)
            }
            TypeKind::Union(members) => {
                self.union_member(scope, t, &members, key, depth, diags)
            }
            TypeKind::Tuple(elems) => self.tuple_member(scope, t, &elems, key, depth, diags),
            TypeKind::Prim(p) => {
                let wrapper = prim_wrapper(p);
                self.wrapper_member(scope, t, wrapper, &[], key, depth, diags)
            }
            TypeKind::Lit(lit) => {
                let wrapper = prim_wrapper(lit.prim_kind());
                self.wrapper_member(scope, t, wrapper, &[], key, depth, diags)
            }
            TypeKind::Func(_) => self.wrapper_member(scope, t, "Function", &[], key, depth, diags),
            TypeKind::Ref(r) => {
                // Unexpandable reference (nominal or recursive alias):
                // members still resolve through the instantiated body.
                let alias = r.alias.clone().or_else(|| scope.lookup_alias_path(&r.name));
                match alias {
                    Some(alias) => {
                        let sigma: crate::substitute::Subst = alias
                            .type_params
                            .iter()
                            .zip(r.args.iter())
                            .map(|(tp, &a)| (tp.name.clone(), a))
                            .collect();
                        let body =
                            crate::substitute::substitute(&mut self.store, alias.ty, &sigma);
                        self.member_in(scope, body, key, depth + 1, diags)
                    }
                    None => {
                        diags.push(Diagnostic::error(
                            ErrorKind::UnknownType {
                                name: r.name.clone(),
                            },
                            span,
                        ));
                        TypeId::ANY
                    }
                }
            }
            TypeKind::Any => TypeId::ANY,
            TypeKind::Null | TypeKind::Undefined | TypeKind::Void if key.is_optional() => {
                TypeId::UNDEFINED
            }
            _ => {
                diags.push(Diagnostic::error(
                    ErrorKind::ExpectedObject {
                        found: self.print(t),
                    },
                    span,
                ));
                TypeId::ANY
            }
        }
    }

    fn object_member(
        &mut self,
        scope: &Scope,
        obj: TypeId,
        o: &ObjectType,
        key: &MemberKey,
        depth: u32,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let span = self.store.prov(obj).unwrap_or_else(Span::dummy);
        let name = match key {
            MemberKey::Prop { name, .. } => name.clone(),
            MemberKey::Index(index) => {
                let index = self.store.prune(*index);
                match self.store.kind(index) {
                    TypeKind::Lit(Literal::String(s)) => s.clone(),
                    TypeKind::Lit(Literal::Number(n)) => crate::display::print_number(*n),
                    _ => {
                        diags.push(Diagnostic::error(
                            ErrorKind::InvalidObjectKey {
                                key: self.print(index),
                            },
                            span,
                        ));
                        return TypeId::ANY;
                    }
                }
            }
        };
        for e in &o.elems {
            match e {
                ObjElem::Property(p) if p.name == name => {
                    return if p.optional {
                        let prov = self.store.prov(p.ty);
                        self.store.union([p.ty, TypeId::UNDEFINED], prov)
                    } else {
                        p.ty
                    };
                }
                ObjElem::Method { name: n, func } if *n == name => return *func,
                ObjElem::Getter { name: n, ret } if *n == name => return *ret,
                ObjElem::Setter { name: n, param } if *n == name => return *param,
                ObjElem::Mapped(_) => {
                    // Mapped elements are expanded away before member
                    // access; one surviving here is a programmer error.
                    unreachable!("mapped element reached get_member")
                }
                _ => {}
            }
        }
        // Miss: the parents may provide it.
        for &parent in &o.extends {
            let mut scratch = Vec::new();
            let found = self.member_in(scope, parent, key, depth + 1, &mut scratch);
            if scratch.is_empty() {
                return found;
            }
        }
        diags.push(Diagnostic::error(
            ErrorKind::UnknownProperty {
                object: self.print(obj),
                name,
            },
            span,
        ));
        TypeId::ANY
    }

    fn namespace_member(
        &mut self,
        obj: TypeId,
        ns: &NamespaceRef,
        key: &MemberKey,
        span: Span,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        match key {
            MemberKey::Prop { name, .. } => {
                let (value, nested) = {
                    let ns = ns.borrow();
                    (
                        ns.values.get(name).map(|b| b.ty),
                        ns.namespaces.get(name).cloned(),
                    )
                };
                if let Some(ty) = value {
                    return ty;
                }
                if let Some(nested) = nested {
                    let prov = self.store.prov(obj);
                    return self.store.namespace(nested, prov);
                }
                diags.push(Diagnostic::error(
                    ErrorKind::UnknownProperty {
                        object: self.print(obj),
                        name: name.clone(),
                    },
                    span,
                ));
                TypeId::ANY
            }
            MemberKey::Index(index) => {
                diags.push(Diagnostic::error(
                    ErrorKind::InvalidObjectKey {
                        key: self.print(*index),
                    },
                    span,
                ));
                TypeId::ANY
            }
        }
    }

    /// Union dispatch: nullish members require an optional chain; the
    /// result is the union over the defined members, widened by
    /// `undefined` when nullish members were present.
    fn union_member(
        &mut self,
        scope: &Scope,
        obj: TypeId,
        members: &TypeList,
        key: &MemberKey,
        depth: u32,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let mut defined: Vec<TypeId> = Vec::new();
        let mut nullish = false;
        for &m in members {
            let m = self.store.prune(m);
            if self.store.kind(m).is_nullish() {
                nullish = true;
            } else {
                defined.push(m);
            }
        }
        if nullish && !key.is_optional() {
            let span = self.store.prov(obj).unwrap_or_else(Span::dummy);
            diags.push(Diagnostic::error(
                ErrorKind::ExpectedObject {
                    found: self.print(obj),
                },
                span,
            ));
            return TypeId::ANY;
        }
        let mut results: Vec<TypeId> = defined
            .iter()
            .map(|&m| self.member_in(scope, m, key, depth + 1, diags))
            .collect();
        if nullish {
            results.push(TypeId::UNDEFINED);
        }
        let prov = self.store.prov(obj);
        self.store.union(results, prov)
    }

    /// Intersection dispatch: object members that offer the key are
    /// intersected; a mixed intersection (e.g. a branded primitive) falls
    /// back to the first non-object member that has the key.
    fn intersection_member(
        &mut self,
        scope: &Scope,
        obj: TypeId,
        members: &TypeList,
        key: &MemberKey,
        depth: u32,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let mut object_hits: Vec<TypeId> = Vec::new();
        let mut fallback: Option<TypeId> = None;
        for &m in members {
            let m = self.store.prune(m);
            let is_object = matches!(self.store.kind(m), TypeKind::Object(_));
            let mut scratch = Vec::new();
            let found = self.member_in(scope, m, key, depth + 1, &mut scratch);
            if !scratch.is_empty() {
                continue;
            }
            if is_object {
                object_hits.push(found);
            } else if fallback.is_none() {
                fallback = Some(found);
            }
        }
        if !object_hits.is_empty() {
            let prov = self.store.prov(obj);
            return self.store.intersection(object_hits, prov);
        }
        if let Some(found) = fallback {
            return found;
        }
        let span = self.store.prov(obj).unwrap_or_else(Span::dummy);
        let name = match key {
            MemberKey::Prop { name, .. } => name.clone(),
            MemberKey::Index(i) => self.print(*i),
        };
        diags.push(Diagnostic::error(
            ErrorKind::UnknownProperty {
                object: self.print(obj),
                name,
            },
            span,
        ));
        TypeId::ANY
    }

    fn tuple_member(
        &mut self,
        scope: &Scope,
        obj: TypeId,
        elems: &TypeList,
        key: &MemberKey,
        depth: u32,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let prov = self.store.prov(obj);
        if let MemberKey::Index(index) = key {
            let index = self.store.prune(*index);
            if let TypeKind::Lit(Literal::Number(n)) = self.store.kind(index) {
                let i = *n as i64;
                if i >= 0 && (i as usize) < elems.len() {
                    return elems[i as usize];
                }
                let span = self.store.prov(obj).unwrap_or_else(Span::dummy);
                diags.push(Diagnostic::error(
                    ErrorKind::OutOfBounds {
                        index: i,
                        length: elems.len(),
                    },
                    span,
                ));
                return TypeId::ANY;
            }
            // A non-literal index behaves like `Array<U>[K]`: the element
            // union.
            return self.store.union(elems.iter().copied(), prov);
        }
        // Property keys delegate to `Array<U>`.
        let elem_union = self.store.union(elems.iter().copied(), prov);
        self.wrapper_member(scope, obj, "Array", &[elem_union], key, depth, diags)
    }

    /// Delegate a key to a built-in wrapper type from scope
    /// (`Number` / `String` / `Boolean` / `Function` / `Array<U>`).
    fn wrapper_member(
        &mut self,
        scope: &Scope,
        obj: TypeId,
        wrapper: &str,
        args: &[TypeId],
        key: &MemberKey,
        depth: u32,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let Some(alias) = scope.get_type_alias(wrapper) else {
            let span = self.store.prov(obj).unwrap_or_else(Span::dummy);
            let name = match key {
                MemberKey::Prop { name, .. } => name.clone(),
                MemberKey::Index(i) => self.print(*i),
            };
            diags.push(Diagnostic::error(
                ErrorKind::UnknownProperty {
                    object: self.print(obj),
                    name,
                },
                span,
            ));
            return TypeId::ANY;
        };
        let sigma: crate::substitute::Subst = alias
            .type_params
            .iter()
            .zip(args.iter())
            .map(|(tp, &a)| (tp.name.clone(), a))
            .collect();
        let body = crate::substitute::substitute(&mut self.store, alias.ty, &sigma);
        self.member_in(scope, body, key, depth + 1, diags)
    }
}

fn prim_wrapper(p: PrimKind) -> &'static str {
    match p {
        PrimKind::Number => "Number",
        PrimKind::String => "String",
        PrimKind::Boolean => "Boolean",
        PrimKind::Symbol => "Symbol",
        PrimKind::BigInt => "BigInt",
    }
}
