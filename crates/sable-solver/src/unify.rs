//! The unifier: structural equality / binding of two types.
//!
//! `unify(scope, actual, expected)` either succeeds, possibly binding
//! type variables as a side effect, or reports diagnostics. Bindings made
//! before a failure stick: recovery keeps inference going so one mismatch
//! does not cascade into noise.

use sable_common::diagnostics::{Diagnostic, ErrorKind};
use sable_common::limits::MAX_UNIFY_DEPTH;
use tracing::trace;

use crate::scope::Scope;
use crate::solver::Solver;
use crate::types::{
    FuncType, Literal, Mutability, ObjElem, ObjectType, RegexType, TypeId, TypeKind, TypeList,
};

impl Solver {
    /// Unify `actual` against `expected`. An empty result is success.
    pub fn unify(&mut self, scope: &Scope, actual: TypeId, expected: TypeId) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        self.unify_in(scope, actual, expected, 0, &mut diags);
        diags
    }

    /// Inner unification; returns whether the pair unified. Diagnostics for
    /// failures are pushed onto `diags`.
    pub(crate) fn unify_in(
        &mut self,
        scope: &Scope,
        actual: TypeId,
        expected: TypeId,
        depth: u32,
        diags: &mut Vec<Diagnostic>,
    ) -> bool {
        if self.cancel.is_cancelled() {
            return true;
        }
        if depth > MAX_UNIFY_DEPTH {
            diags.push(self.mismatch(actual, expected));
            return false;
        }
        let a = self.store.prune(actual);
        let b = self.store.prune(expected);
        if a == b {
            return true;
        }
        trace!(actual = %self.print(a), expected = %self.print(b), "unify");
        let ak = self.store.kind(a).clone();
        let bk = self.store.kind(b).clone();
        match (&ak, &bk) {
            (TypeKind::Var(va), TypeKind::Var(vb)) if va.id == vb.id => true,
            (TypeKind::Var(_), _) => self.bind(a, b, diags),
            (_, TypeKind::Var(_)) => self.bind(b, a, diags),

            (TypeKind::Any, _) | (_, TypeKind::Any) => true,
            // `unknown` is a supertype of everything but a subtype of
            // nothing (except itself and `any`, handled above).
            (_, TypeKind::Unknown) => true,
            (TypeKind::Unknown, _) => {
                diags.push(self.mismatch(a, b));
                false
            }
            // `never` is the bottom type.
            (TypeKind::Never, _) => true,

            // Mutability wrappers compare their inner types; a readonly
            // expectation accepts any mutability, a read-write expectation
            // requires one.
            (
                TypeKind::Mutability {
                    inner: ia,
                    mutability: ma,
                },
                TypeKind::Mutability {
                    inner: ib,
                    mutability: mb,
                },
            ) => {
                let compatible = match mb {
                    Mutability::ReadOnly | Mutability::Uncertain => true,
                    Mutability::ReadWrite => *ma == Mutability::ReadWrite,
                };
                if !compatible {
                    diags.push(self.mismatch(a, b));
                    return false;
                }
                self.unify_in(scope, *ia, *ib, depth + 1, diags)
            }
            (TypeKind::Mutability { inner, .. }, _) => {
                self.unify_in(scope, *inner, b, depth + 1, diags)
            }
            (_, TypeKind::Mutability { inner, .. }) => {
                self.unify_in(scope, a, *inner, depth + 1, diags)
            }

            (TypeKind::Lit(la), TypeKind::Lit(lb)) => {
                if la == lb {
                    true
                } else {
                    diags.push(self.mismatch(a, b));
                    false
                }
            }
            // Literals widen to their primitive.
            (TypeKind::Lit(l), TypeKind::Prim(p)) if l.prim_kind() == *p => true,
            (TypeKind::Lit(Literal::String(s)), TypeKind::Regex(r)) => {
                let s = s.clone();
                let r = r.clone();
                self.unify_string_regex(scope, a, b, &s, &r, depth, diags)
            }

            // A union on the sub side: every member must fit the expected.
            (TypeKind::Union(members), _) => {
                let members = members.clone();
                let mut ok = true;
                for m in members {
                    ok &= self.unify_in(scope, m, b, depth + 1, diags);
                }
                ok
            }
            // A union on the super side: first member that accepts wins.
            (_, TypeKind::Union(members)) => {
                let members = members.clone();
                if self.first_success(scope, a, &members, depth, false) {
                    true
                } else {
                    diags.push(self.mismatch(a, b));
                    false
                }
            }
            // Intersections are the dual.
            (_, TypeKind::Intersection(members)) => {
                let members = members.clone();
                let mut ok = true;
                for m in members {
                    ok &= self.unify_in(scope, a, m, depth + 1, diags);
                }
                ok
            }
            (TypeKind::Intersection(members), _) => {
                let members = members.clone();
                if self.first_success(scope, b, &members, depth, true) {
                    true
                } else {
                    diags.push(self.mismatch(a, b));
                    false
                }
            }

            // Two references to the same alias unify by their arguments;
            // this is also what keeps nominal aliases comparable.
            (TypeKind::Ref(ra), TypeKind::Ref(rb))
                if ra.name == rb.name && ra.args.len() == rb.args.len() =>
            {
                let (args_a, args_b) = (ra.args.clone(), rb.args.clone());
                let mut ok = true;
                for (x, y) in args_a.iter().zip(args_b.iter()) {
                    ok &= self.unify_in(scope, *x, *y, depth + 1, diags);
                }
                ok
            }

            // Type-level computations: expand one level and retry; when no
            // progress is possible, fall back to structural identity.
            _ if needs_expansion(&ak) || needs_expansion(&bk) => {
                let a2 = self.expand_with_diags(scope, a, 1, diags);
                let b2 = self.expand_with_diags(scope, b, 1, diags);
                if a2 != a || b2 != b {
                    return self.unify_in(scope, a2, b2, depth + 1, diags);
                }
                if self.store.equal(a, b) {
                    true
                } else {
                    diags.push(self.mismatch(a, b));
                    false
                }
            }

            (TypeKind::Func(fa), TypeKind::Func(fb)) => {
                let (fa, fb) = (fa.clone(), fb.clone());
                self.unify_func(scope, a, b, &fa, &fb, depth, diags)
            }
            (TypeKind::Tuple(ea), TypeKind::Tuple(eb)) => {
                if ea.len() != eb.len() {
                    diags.push(self.mismatch(a, b));
                    return false;
                }
                let (ea, eb) = (ea.clone(), eb.clone());
                let mut ok = true;
                for (x, y) in ea.iter().zip(eb.iter()) {
                    ok &= self.unify_in(scope, *x, *y, depth + 1, diags);
                }
                ok
            }
            (TypeKind::Object(oa), TypeKind::Object(ob)) => {
                let (oa, ob) = (oa.clone(), ob.clone());
                self.unify_objects(scope, a, b, &oa, &ob, depth, diags)
            }

            _ => {
                if self.store.equal(a, b) {
                    true
                } else {
                    diags.push(self.mismatch(a, b));
                    false
                }
            }
        }
    }

    /// Occurs-checked variable binding.
    fn bind(&mut self, var: TypeId, t: TypeId, diags: &mut Vec<Diagnostic>) -> bool {
        if self.store.occurs_in(var, t) {
            diags.push(self.mismatch(var, t));
            return false;
        }
        self.store.bind_var(var, t);
        true
    }

    /// Try each candidate in order; the first whose unification produces no
    /// diagnostics wins. Bindings made by failed attempts stick (recovery
    /// semantics). `candidate_is_sub` flips which side the candidate takes:
    /// a super-side union tries `a ≤ member`, a sub-side intersection tries
    /// `member ≤ b`.
    fn first_success(
        &mut self,
        scope: &Scope,
        fixed: TypeId,
        candidates: &TypeList,
        depth: u32,
        candidate_is_sub: bool,
    ) -> bool {
        candidates.iter().any(|&m| {
            let mut scratch = Vec::new();
            let ok = if candidate_is_sub {
                self.unify_in(scope, m, fixed, depth + 1, &mut scratch)
            } else {
                self.unify_in(scope, fixed, m, depth + 1, &mut scratch)
            };
            ok && scratch.is_empty()
        })
    }

    /// Rule 6: arity must match after discounting trailing optional
    /// parameters on the longer side (so the check stays symmetric either
    /// way around); params, return and throws unify pairwise, `self` is
    /// contravariant when both sides declare it. Type parameters are left
    /// uninstantiated.
    fn unify_func(
        &mut self,
        scope: &Scope,
        a: TypeId,
        b: TypeId,
        fa: &FuncType,
        fb: &FuncType,
        depth: u32,
        diags: &mut Vec<Diagnostic>,
    ) -> bool {
        if fa.params.len() != fb.params.len() {
            let shared = fa.params.len().min(fb.params.len());
            let longer = if fa.params.len() > fb.params.len() {
                &fa.params
            } else {
                &fb.params
            };
            if !longer[shared..].iter().all(|p| p.optional) {
                diags.push(self.mismatch(a, b));
                return false;
            }
        }
        let mut ok = true;
        for (pa, pb) in fa.params.iter().zip(fb.params.iter()) {
            ok &= self.unify_in(scope, pa.ty, pb.ty, depth + 1, diags);
        }
        if let (Some(sa), Some(sb)) = (fa.self_ty, fb.self_ty) {
            ok &= self.unify_in(scope, sb, sa, depth + 1, diags);
        }
        ok &= self.unify_in(scope, fa.ret, fb.ret, depth + 1, diags);
        ok &= self.unify_in(scope, fa.throws, fb.throws, depth + 1, diags);
        ok
    }

    /// Rule 8: every property the expected side names must be satisfied by
    /// the actual side; optional expected properties may be missing; extra
    /// actual properties are permitted unless the expected side is sealed.
    fn unify_objects(
        &mut self,
        scope: &Scope,
        a: TypeId,
        b: TypeId,
        oa: &ObjectType,
        ob: &ObjectType,
        depth: u32,
        diags: &mut Vec<Diagnostic>,
    ) -> bool {
        let mut ok = true;
        for expected in &ob.elems {
            match expected {
                ObjElem::Property(pb) => {
                    match self.find_member_type(oa, &pb.name) {
                        Some(found) => {
                            ok &= self.unify_in(scope, found, pb.ty, depth + 1, diags);
                        }
                        None if pb.optional => {}
                        None => {
                            let span = self
                                .store
                                .prov(a)
                                .unwrap_or_else(sable_common::span::Span::dummy);
                            diags.push(Diagnostic::error(
                                ErrorKind::MissingRequiredProp {
                                    name: pb.name.clone(),
                                    object: self.print(a),
                                },
                                span,
                            ));
                            ok = false;
                        }
                    }
                }
                ObjElem::Method { name, func } => match self.find_member_type(oa, name) {
                    Some(found) => {
                        ok &= self.unify_in(scope, found, *func, depth + 1, diags);
                    }
                    None => {
                        let span = self
                            .store
                            .prov(a)
                            .unwrap_or_else(sable_common::span::Span::dummy);
                        diags.push(Diagnostic::error(
                            ErrorKind::MissingRequiredProp {
                                name: name.clone(),
                                object: self.print(a),
                            },
                            span,
                        ));
                        ok = false;
                    }
                },
                ObjElem::Getter { name, ret } => match self.find_member_type(oa, name) {
                    Some(found) => {
                        ok &= self.unify_in(scope, found, *ret, depth + 1, diags);
                    }
                    None => {
                        let span = self
                            .store
                            .prov(a)
                            .unwrap_or_else(sable_common::span::Span::dummy);
                        diags.push(Diagnostic::error(
                            ErrorKind::MissingRequiredProp {
                                name: name.clone(),
                                object: self.print(a),
                            },
                            span,
                        ));
                        ok = false;
                    }
                },
                ObjElem::Callable(fb) => {
                    let callables: Vec<TypeId> = oa
                        .elems
                        .iter()
                        .filter_map(|e| match e {
                            ObjElem::Callable(f) => Some(*f),
                            _ => None,
                        })
                        .collect();
                    let matched = callables.iter().any(|&fa| {
                        let mut scratch = Vec::new();
                        self.unify_in(scope, fa, *fb, depth + 1, &mut scratch)
                            && scratch.is_empty()
                    });
                    if !matched {
                        diags.push(self.mismatch(a, *fb));
                        ok = false;
                    }
                }
                // Setters, constructors, spreads and mapped elements do not
                // constrain the actual side here; mapped elements are
                // expanded away before unification reaches them.
                _ => {}
            }
        }
        if ob.sealed {
            ok &= self.check_excess_properties(a, b, oa, ob, diags);
        }
        ok
    }

    /// A sealed expected object admits no member names beyond its own. The
    /// diagnostic points at the actual side and names the sealed type.
    fn check_excess_properties(
        &mut self,
        a: TypeId,
        b: TypeId,
        oa: &ObjectType,
        ob: &ObjectType,
        diags: &mut Vec<Diagnostic>,
    ) -> bool {
        let mut ok = true;
        for elem in &oa.elems {
            let Some(name) = elem.name() else {
                continue;
            };
            let known = ob.elems.iter().any(|e| e.name() == Some(name));
            if !known {
                let span = self
                    .store
                    .prov(a)
                    .unwrap_or_else(sable_common::span::Span::dummy);
                diags.push(Diagnostic::error(
                    ErrorKind::UnknownProperty {
                        object: self.print(b),
                        name: name.to_string(),
                    },
                    span,
                ));
                ok = false;
            }
        }
        ok
    }

    /// The type an object offers for a member name, if any element
    /// provides it.
    fn find_member_type(&self, o: &ObjectType, name: &str) -> Option<TypeId> {
        o.elems.iter().find_map(|e| match e {
            ObjElem::Property(p) if p.name == name => Some(p.ty),
            ObjElem::Method { name: n, func } if n == name => Some(*func),
            ObjElem::Getter { name: n, ret } if n == name => Some(*ret),
            _ => None,
        })
    }

    /// A string literal matches a regex literal type when the anchored
    /// pattern matches; named capture groups bind to the captured text (or
    /// `undefined` for groups that did not participate).
    fn unify_string_regex(
        &mut self,
        scope: &Scope,
        a: TypeId,
        b: TypeId,
        s: &str,
        r: &RegexType,
        depth: u32,
        diags: &mut Vec<Diagnostic>,
    ) -> bool {
        let captured: Option<Vec<(String, Option<String>)>> = {
            match self.compiled_regex(&r.pattern) {
                Some(re) => re.captures(s).map(|caps| {
                    r.groups
                        .iter()
                        .map(|(name, _)| {
                            (
                                name.clone(),
                                caps.name(name).map(|m| m.as_str().to_string()),
                            )
                        })
                        .collect()
                }),
                None => None,
            }
        };
        let Some(captured) = captured else {
            diags.push(self.mismatch(a, b));
            return false;
        };
        let mut ok = true;
        let prov = self.store.prov(b);
        for ((_, group_ty), (_, text)) in r.groups.iter().zip(captured.iter()) {
            let bound = match text {
                Some(text) => self.store.string_lit(text.clone(), prov),
                None => TypeId::UNDEFINED,
            };
            ok &= self.unify_in(scope, bound, *group_ty, depth + 1, diags);
        }
        ok
    }
}

fn needs_expansion(kind: &TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::Ref(_)
            | TypeKind::KeyOf(_)
            | TypeKind::Index(_)
            | TypeKind::TypeOf(_)
            | TypeKind::Cond(_)
            | TypeKind::TemplateLit(_)
    )
}
