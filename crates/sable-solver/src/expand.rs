//! The expansion engine: bounded rewriting of type-level computations.
//!
//! `expand` rewrites the top few levels of a type: references instantiate
//! their alias bodies, conditionals are decided once their check is
//! closed, `keyof` / indexed access / `typeof` / template literals are
//! evaluated, unions and intersections are renormalized.
//!
//! The budget is `-1` (unlimited, backstopped by a step counter), `0`
//! (leave even the top reference unexpanded) or a positive count
//! decremented at each reference crossed. Function and object types are
//! boundaries: they bump a skip counter that suppresses reference
//! expansion (and diagnostic-emitting evaluation) underneath, so generics
//! are not prematurely monomorphized.

use sable_common::diagnostics::{Diagnostic, ErrorKind};
use sable_common::limits::{
    MAX_DISTRIBUTION_SIZE, MAX_EXPANSION_STEPS, MAX_MAPPED_KEYS, TEMPLATE_EXPANSION_LIMIT,
};
use sable_common::span::Span;
use tracing::trace;

use crate::member::MemberKey;
use crate::scope::{Scope, TypeAlias};
use crate::solver::Solver;
use crate::store::TypeStore;
use crate::substitute::{Subst, substitute};
use crate::types::{
    CondType, FuncParam, FuncType, Literal, ObjElem, ObjectType, PropertyElem, RegexType,
    TemplateLitType, TypeId, TypeKind, TypeList, VarOrigin,
};
use crate::visitor::{TypeVisitor, walk};

/// Remaining expansion allowance, threaded through one `expand` entry.
#[derive(Clone, Copy, Debug)]
pub struct Budget {
    /// `-1` unlimited, `0` exhausted, else refs left to cross.
    pub depth: i32,
    /// Function/object boundary counter; refs under a boundary stay.
    pub skip: u32,
    /// Total refs crossed by this entry point (backstop for `-1`).
    steps: u32,
}

impl Budget {
    pub fn new(depth: i32) -> Self {
        Budget {
            depth,
            skip: 0,
            steps: 0,
        }
    }

    fn can_expand_ref(&self) -> bool {
        self.skip == 0 && self.depth != 0 && self.steps < MAX_EXPANSION_STEPS
    }

    fn cross_ref(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
        self.steps += 1;
    }

    fn under_boundary(&self) -> Budget {
        Budget {
            depth: self.depth,
            skip: self.skip + 1,
            steps: self.steps,
        }
    }
}

impl Solver {
    /// Expand `t` with the given budget, discarding diagnostics (tooling
    /// entry point; evaluation errors resurface when inference gets there).
    pub fn expand(&mut self, scope: &Scope, t: TypeId, budget: i32) -> TypeId {
        let mut diags = Vec::new();
        self.expand_with_diags(scope, t, budget, &mut diags)
    }

    pub fn expand_with_diags(
        &mut self,
        scope: &Scope,
        t: TypeId,
        budget: i32,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let mut budget = Budget::new(budget);
        self.expand_in(scope, t, &mut budget, diags)
    }

    pub(crate) fn expand_in(
        &mut self,
        scope: &Scope,
        t: TypeId,
        budget: &mut Budget,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        if self.cancel.is_cancelled() {
            return t;
        }
        let t = self.store.prune(t);
        let prov = self.store.prov(t);
        let kind = self.store.kind(t).clone();
        match kind {
            TypeKind::Ref(_) => self.expand_ref(scope, t, budget, diags),
            TypeKind::Cond(c) => {
                if budget.skip > 0 {
                    t
                } else {
                    self.expand_cond(scope, t, &c, budget, diags)
                }
            }
            TypeKind::Union(members) => {
                let out: Vec<TypeId> = members
                    .iter()
                    .map(|&m| self.expand_in(scope, m, budget, diags))
                    .collect();
                let result = self.store.union(out, prov);
                self.no_op_guard(t, result)
            }
            TypeKind::Intersection(members) => {
                let expanded: Vec<TypeId> = members
                    .iter()
                    .map(|&m| self.expand_in(scope, m, budget, diags))
                    .collect();
                let result = self.distribute_intersection(scope, expanded, prov, budget, diags);
                self.no_op_guard(t, result)
            }
            TypeKind::KeyOf(operand) => {
                // A directly-given object keeps its mapped elements so they
                // can contribute their binder constraint to the key set;
                // anything else expands to a terminal first.
                let operand = self.store.prune(operand);
                let operand = if matches!(self.store.kind(operand), TypeKind::Object(_)) {
                    operand
                } else {
                    self.expand_in(scope, operand, budget, diags)
                };
                let result = self.key_of_expanded(scope, operand, prov, budget, diags);
                self.no_op_guard(t, result)
            }
            TypeKind::Index(ix) => {
                if budget.skip > 0 {
                    return t;
                }
                let index = {
                    let mut b = Budget::new(1);
                    self.expand_in(scope, ix.index, &mut b, diags)
                };
                let target = self.store.prune(ix.target);
                if self.index_target_is_opaque(scope, target) {
                    if index == ix.index && target == ix.target {
                        return t;
                    }
                    return self.store.index(target, index, prov);
                }
                let key = self.index_key(index);
                match key {
                    Some(key) => self.get_member(scope, target, &key, diags),
                    None => {
                        diags.push(Diagnostic::error(
                            ErrorKind::InvalidObjectKey {
                                key: self.print(index),
                            },
                            prov.unwrap_or_else(Span::dummy),
                        ));
                        TypeId::ANY
                    }
                }
            }
            TypeKind::TypeOf(parts) => {
                if budget.skip > 0 {
                    return t;
                }
                self.expand_type_of(scope, t, &parts, prov, diags)
            }
            TypeKind::TemplateLit(tpl) => {
                let result = self.expand_template(scope, t, &tpl, prov, diags);
                self.no_op_guard(t, result)
            }
            TypeKind::Object(o) => self.expand_object(scope, t, &o, prov, budget, diags),
            TypeKind::Func(f) => self.expand_func(scope, t, &f, prov, budget, diags),
            TypeKind::Mutability { inner, mutability } => {
                let out = self.expand_in(scope, inner, budget, diags);
                if out == inner {
                    t
                } else {
                    self.store.mutability(out, mutability, prov)
                }
            }
            _ => t,
        }
    }

    /// Callers detect a fixed point by id comparison, so a rewrite that
    /// produced a structurally identical type must hand back the original
    /// id.
    fn no_op_guard(&self, before: TypeId, after: TypeId) -> TypeId {
        if after != before && self.store.equal(after, before) {
            before
        } else {
            after
        }
    }

    // =========================================================================
    // References
    // =========================================================================

    fn expand_ref(
        &mut self,
        scope: &Scope,
        t: TypeId,
        budget: &mut Budget,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        if !budget.can_expand_ref() {
            return t;
        }
        let TypeKind::Ref(r) = self.store.kind(t).clone() else {
            unreachable!("expand_ref on a non-reference")
        };
        let alias = r
            .alias
            .clone()
            .or_else(|| scope.lookup_alias_path(&r.name));
        let Some(alias) = alias else {
            return t;
        };
        // Recursive aliases (marked by the parser) and nominal objects are
        // opaque.
        if alias.recursive {
            return t;
        }
        let body = self.store.resolve(alias.ty);
        if matches!(self.store.kind(body), TypeKind::Object(o) if o.nominal) {
            return t;
        }
        trace!(name = %r.name, "expand ref");
        let prov = self.store.prov(t);
        let args = self.ref_args(&alias, &r.args);

        // A conditional alias body distributes over union arguments.
        if matches!(self.store.kind(body), TypeKind::Cond(_)) {
            let alternatives: Vec<Vec<TypeId>> = args
                .iter()
                .map(|&a| {
                    let a = self.store.prune(a);
                    match self.store.kind(a) {
                        TypeKind::Union(ms) => ms.iter().copied().collect(),
                        _ => vec![a],
                    }
                })
                .collect();
            let combos: usize = alternatives.iter().map(|alt| alt.len()).product();
            if combos > 1 && combos <= MAX_DISTRIBUTION_SIZE {
                budget.cross_ref();
                let mut results = Vec::with_capacity(combos);
                for combo in cartesian(&alternatives) {
                    let sigma = self.ref_subst(&alias, &combo);
                    let inst = substitute(&mut self.store, alias.ty, &sigma);
                    let mut b = *budget;
                    results.push(self.expand_in(scope, inst, &mut b, diags));
                }
                return self.store.union(results, prov);
            }
        }

        let sigma = self.ref_subst(&alias, &args);
        let inst = substitute(&mut self.store, alias.ty, &sigma);
        budget.cross_ref();
        self.expand_in(scope, inst, budget, diags)
    }

    /// Positional arguments padded with declared defaults (or `unknown`).
    fn ref_args(&mut self, alias: &TypeAlias, given: &TypeList) -> Vec<TypeId> {
        let mut args: Vec<TypeId> = given.iter().copied().collect();
        for (i, tp) in alias.type_params.iter().enumerate() {
            if i >= args.len() {
                let filled = match tp.default {
                    Some(d) => {
                        let sigma: Subst = alias
                            .type_params
                            .iter()
                            .take(i)
                            .zip(args.iter())
                            .map(|(p, &a)| (p.name.clone(), a))
                            .collect();
                        substitute(&mut self.store, d, &sigma)
                    }
                    None => TypeId::UNKNOWN,
                };
                args.push(filled);
            }
        }
        args
    }

    fn ref_subst(&self, alias: &TypeAlias, args: &[TypeId]) -> Subst {
        alias
            .type_params
            .iter()
            .zip(args.iter())
            .map(|(tp, &a)| (tp.name.clone(), a))
            .collect()
    }

    // =========================================================================
    // Conditionals
    // =========================================================================

    fn expand_cond(
        &mut self,
        scope: &Scope,
        t: TypeId,
        c: &CondType,
        budget: &mut Budget,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let check = self.expand_in(scope, c.check, budget, diags);
        // Determinacy: only a closed check can decide the conditional.
        if !self.store.is_closed(check) {
            if check == c.check {
                return t;
            }
            let prov = self.store.prov(t);
            return self.store.cond(
                CondType {
                    check,
                    extends: c.extends,
                    then_ty: c.then_ty,
                    else_ty: c.else_ty,
                },
                prov,
            );
        }
        // Freshen the extends clause: each `infer` binder (and each named
        // regex capture group) becomes a fresh variable, shared by name.
        let (extends, infer_subst) = self.freshen_extends(c.extends);
        let mut scratch = Vec::new();
        let matched = self.unify_in(scope, check, extends, 0, &mut scratch) && scratch.is_empty();
        if matched {
            let then_ty = substitute(&mut self.store, c.then_ty, &infer_subst);
            self.expand_in(scope, then_ty, budget, diags)
        } else {
            self.expand_in(scope, c.else_ty, budget, diags)
        }
    }

    /// Rewrite an `extends` clause replacing `infer` binders and regex
    /// capture groups with fresh variables, reusing one variable per name.
    /// The returned substitution propagates the binders into the `then`
    /// branch (never into `else`).
    fn freshen_extends(&mut self, extends: TypeId) -> (TypeId, Subst) {
        struct Freshen {
            vars: Subst,
        }
        impl Freshen {
            fn var_for(&mut self, store: &mut TypeStore, name: &str, prov: Option<Span>) -> TypeId {
                if let Some(&v) = self.vars.get(name) {
                    return v;
                }
                let v = store.fresh_var_with_origin(VarOrigin::InferBinder, prov);
                self.vars.insert(name.to_string(), v);
                v
            }
        }
        impl TypeVisitor for Freshen {
            fn enter(&mut self, store: &mut TypeStore, t: TypeId) -> Option<TypeId> {
                let prov = store.prov(t);
                match store.kind(t).clone() {
                    TypeKind::Infer(name) => Some(self.var_for(store, &name, prov)),
                    TypeKind::Regex(r) => {
                        let groups = r
                            .groups
                            .iter()
                            .map(|(name, _)| (name.clone(), self.var_for(store, name, prov)))
                            .collect();
                        Some(store.regex(
                            RegexType {
                                pattern: r.pattern.clone(),
                                groups,
                            },
                            prov,
                        ))
                    }
                    _ => None,
                }
            }
        }
        let mut freshen = Freshen {
            vars: Subst::default(),
        };
        let rewritten = walk(&mut self.store, extends, &mut freshen);
        (rewritten, freshen.vars)
    }

    // =========================================================================
    // keyof
    // =========================================================================

    fn key_of_expanded(
        &mut self,
        scope: &Scope,
        operand: TypeId,
        prov: Option<Span>,
        budget: &mut Budget,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let operand = self.store.prune(operand);
        match self.store.kind(operand).clone() {
            TypeKind::Object(o) => {
                let mut keys: Vec<TypeId> = Vec::new();
                for e in &o.elems {
                    match e {
                        ObjElem::Property(p) => {
                            keys.push(self.store.string_lit(p.name.clone(), prov));
                        }
                        ObjElem::Getter { name, .. } | ObjElem::Setter { name, .. } => {
                            keys.push(self.store.string_lit(name.clone(), prov));
                        }
                        ObjElem::Mapped(m) => keys.push(m.constraint),
                        ObjElem::RestSpread(s) => {
                            let inner = {
                                let mut b = Budget::new(1);
                                self.expand_in(scope, *s, &mut b, diags)
                            };
                            keys.push(self.key_of_expanded(scope, inner, prov, budget, diags));
                        }
                        _ => {}
                    }
                }
                self.store.union(keys, prov)
            }
            TypeKind::Union(members) | TypeKind::Intersection(members) => {
                let keys: Vec<TypeId> = members
                    .iter()
                    .map(|&m| self.key_of_expanded(scope, m, prov, budget, diags))
                    .collect();
                self.store.union(keys, prov)
            }
            TypeKind::Tuple(elems) => {
                let mut keys: Vec<TypeId> = vec![self.store.string_lit("length", prov)];
                for i in 0..elems.len() {
                    keys.push(self.store.number_lit(i as f64, prov));
                }
                self.store.union(keys, prov)
            }
            TypeKind::Prim(_)
            | TypeKind::Lit(_)
            | TypeKind::Never
            | TypeKind::Unknown
            | TypeKind::Null
            | TypeKind::Undefined
            | TypeKind::Void => TypeId::NEVER,
            TypeKind::Any => {
                let members = [TypeId::STRING, TypeId::NUMBER, TypeId::SYMBOL];
                self.store.union(members, prov)
            }
            _ => self.store.key_of(operand, prov),
        }
    }

    // =========================================================================
    // Indexed access and typeof
    // =========================================================================

    fn index_target_is_opaque(&self, scope: &Scope, target: TypeId) -> bool {
        match self.store.kind(target) {
            TypeKind::Var(_) => true,
            TypeKind::Infer(_) => true,
            // A reference that resolves to a type-parameter placeholder
            // (installed as `t = constraint`, often `unknown`) must stay
            // symbolic; concrete aliases go through member access.
            TypeKind::Ref(r) => {
                match r.alias.clone().or_else(|| scope.lookup_alias_path(&r.name)) {
                    Some(alias) => matches!(
                        self.store.kind(self.store.resolve(alias.ty)),
                        TypeKind::Unknown
                    ),
                    None => false,
                }
            }
            _ => false,
        }
    }

    fn index_key(&mut self, index: TypeId) -> Option<MemberKey> {
        let index = self.store.prune(index);
        match self.store.kind(index) {
            TypeKind::Lit(Literal::String(s)) => Some(MemberKey::Prop {
                name: s.clone(),
                optional: false,
            }),
            _ => Some(MemberKey::Index(index)),
        }
    }

    fn expand_type_of(
        &mut self,
        scope: &Scope,
        t: TypeId,
        parts: &[String],
        prov: Option<Span>,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let Some(first) = parts.first() else {
            return t;
        };
        let mut cur = match scope.get_value(first) {
            Some(binding) => binding.ty,
            None => match scope.get_namespace(first) {
                Some(ns) => self.store.namespace(ns, prov),
                None => {
                    diags.push(Diagnostic::error(
                        ErrorKind::UnknownIdentifier {
                            name: first.clone(),
                        },
                        prov.unwrap_or_else(Span::dummy),
                    ));
                    return t;
                }
            },
        };
        for part in &parts[1..] {
            let key = MemberKey::Prop {
                name: part.clone(),
                optional: false,
            };
            cur = self.get_member(scope, cur, &key, diags);
        }
        cur
    }

    // =========================================================================
    // Template literals
    // =========================================================================

    fn expand_template(
        &mut self,
        scope: &Scope,
        t: TypeId,
        tpl: &TemplateLitType,
        prov: Option<Span>,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        #[derive(Clone)]
        enum Alt {
            Text(String),
            Residual(TypeId),
        }
        let mut alternatives: Vec<Vec<Alt>> = Vec::with_capacity(tpl.types.len());
        for &hole in &tpl.types {
            let hole = {
                let mut b = Budget::new(1);
                self.expand_in(scope, hole, &mut b, diags)
            };
            let hole = self.store.prune(hole);
            let alts = match self.store.kind(hole).clone() {
                TypeKind::Lit(lit) => vec![Alt::Text(literal_text(&lit))],
                TypeKind::Union(members) => members
                    .iter()
                    .map(|&m| {
                        let m = self.store.resolve(m);
                        match self.store.kind(m) {
                            TypeKind::Lit(lit) => Alt::Text(literal_text(lit)),
                            _ => Alt::Residual(m),
                        }
                    })
                    .collect(),
                _ => vec![Alt::Residual(hole)],
            };
            alternatives.push(alts);
        }
        let combos: usize = alternatives.iter().map(|a| a.len().max(1)).product();
        if combos > TEMPLATE_EXPANSION_LIMIT {
            return t;
        }
        let mut results: Vec<TypeId> = Vec::with_capacity(combos);
        for combo in cartesian(&alternatives) {
            // Fold literal pieces; non-literal holes stay residual.
            let mut quasis: Vec<String> = vec![tpl.quasis[0].clone()];
            let mut holes: TypeList = TypeList::new();
            for (i, alt) in combo.iter().enumerate() {
                match alt {
                    Alt::Text(text) => {
                        let last = quasis.last_mut().expect("at least one quasi");
                        last.push_str(text);
                        last.push_str(&tpl.quasis[i + 1]);
                    }
                    Alt::Residual(hole) => {
                        holes.push(*hole);
                        quasis.push(tpl.quasis[i + 1].clone());
                    }
                }
            }
            if holes.is_empty() {
                let text = quasis.pop().expect("at least one quasi");
                results.push(self.store.string_lit(text, prov));
            } else {
                results.push(
                    self.store
                        .template_lit(TemplateLitType { quasis, types: holes }, prov),
                );
            }
        }
        self.store.union(results, prov)
    }

    // =========================================================================
    // Boundaries: objects and functions
    // =========================================================================

    fn expand_object(
        &mut self,
        scope: &Scope,
        t: TypeId,
        o: &ObjectType,
        prov: Option<Span>,
        budget: &mut Budget,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let mut under = budget.under_boundary();
        let mut changed = false;
        let mut elems: Vec<ObjElem> = Vec::with_capacity(o.elems.len());
        for e in &o.elems {
            match e {
                ObjElem::Mapped(m) if budget.skip == 0 => {
                    changed = true;
                    self.expand_mapped(scope, m, prov, &mut elems, diags);
                }
                ObjElem::Property(p) => {
                    let ty = self.expand_in(scope, p.ty, &mut under, diags);
                    changed |= ty != p.ty;
                    elems.push(ObjElem::Property(PropertyElem {
                        name: p.name.clone(),
                        ty,
                        optional: p.optional,
                        readonly: p.readonly,
                    }));
                }
                other => elems.push(other.clone()),
            }
        }
        if !changed {
            return t;
        }
        self.store.object(
            ObjectType {
                elems,
                extends: o.extends.clone(),
                nominal: o.nominal,
                sealed: o.sealed,
            },
            prov,
        )
    }

    /// Expand one mapped element into concrete properties. A constraint
    /// that does not reduce to literal keys produces no properties; the
    /// element never survives into member access.
    fn expand_mapped(
        &mut self,
        scope: &Scope,
        m: &crate::types::MappedElem,
        prov: Option<Span>,
        out: &mut Vec<ObjElem>,
        diags: &mut Vec<Diagnostic>,
    ) {
        let keys_ty = {
            let mut b = Budget::new(4);
            self.expand_in(scope, m.constraint, &mut b, diags)
        };
        let Some(keys) = self.literal_keys(keys_ty) else {
            return;
        };
        for lit in keys.into_iter().take(MAX_MAPPED_KEYS) {
            let name = literal_text(&lit);
            let key_ty = self.store.literal(lit, prov);
            let mut sigma = Subst::default();
            sigma.insert(m.binder.clone(), key_ty);
            let value = substitute(&mut self.store, m.value, &sigma);
            let value = {
                let mut b = Budget::new(2);
                self.expand_in(scope, value, &mut b, diags)
            };
            out.push(ObjElem::Property(PropertyElem {
                name,
                ty: value,
                optional: m.optional == Some(true),
                readonly: m.readonly == Some(true),
            }));
        }
    }

    fn literal_keys(&self, t: TypeId) -> Option<Vec<Literal>> {
        let t = self.store.resolve(t);
        match self.store.kind(t) {
            TypeKind::Lit(l @ (Literal::String(_) | Literal::Number(_))) => Some(vec![l.clone()]),
            TypeKind::Never => Some(Vec::new()),
            TypeKind::Union(members) => {
                let mut out = Vec::with_capacity(members.len());
                for &m in members {
                    match self.store.kind(self.store.resolve(m)) {
                        TypeKind::Lit(l @ (Literal::String(_) | Literal::Number(_))) => {
                            out.push(l.clone());
                        }
                        _ => return None,
                    }
                }
                Some(out)
            }
            _ => None,
        }
    }

    fn expand_func(
        &mut self,
        scope: &Scope,
        t: TypeId,
        f: &FuncType,
        prov: Option<Span>,
        budget: &mut Budget,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let mut under = budget.under_boundary();
        let mut changed = false;
        let params: Vec<FuncParam> = f
            .params
            .iter()
            .map(|p| {
                let ty = self.expand_in(scope, p.ty, &mut under, diags);
                changed |= ty != p.ty;
                FuncParam {
                    name: p.name.clone(),
                    ty,
                    optional: p.optional,
                }
            })
            .collect();
        let self_ty = f.self_ty.map(|s| {
            let out = self.expand_in(scope, s, &mut under, diags);
            changed |= out != s;
            out
        });
        let ret = self.expand_in(scope, f.ret, &mut under, diags);
        changed |= ret != f.ret;
        let throws = self.expand_in(scope, f.throws, &mut under, diags);
        changed |= throws != f.throws;
        if !changed {
            return t;
        }
        self.store.func(
            FuncType {
                type_params: f.type_params.clone(),
                self_ty,
                params,
                ret,
                throws,
            },
            prov,
        )
    }

    // =========================================================================
    // Intersections
    // =========================================================================

    /// `A & (B | C)` distributes to `(A & B) | (A & C)` before the
    /// normalizer runs on each term.
    fn distribute_intersection(
        &mut self,
        scope: &Scope,
        members: Vec<TypeId>,
        prov: Option<Span>,
        budget: &mut Budget,
        diags: &mut Vec<Diagnostic>,
    ) -> TypeId {
        let alternatives: Vec<Vec<TypeId>> = members
            .iter()
            .map(|&m| {
                let m = self.store.prune(m);
                match self.store.kind(m) {
                    TypeKind::Union(ms) => ms.iter().copied().collect(),
                    _ => vec![m],
                }
            })
            .collect();
        let combos: usize = alternatives.iter().map(|a| a.len()).product();
        if combos > 1 && combos <= MAX_DISTRIBUTION_SIZE {
            let mut results = Vec::with_capacity(combos);
            for combo in cartesian(&alternatives) {
                let term = self.normalize_intersection(combo, prov);
                let mut b = *budget;
                results.push(self.expand_in(scope, term, &mut b, diags));
            }
            return self.store.union(results, prov);
        }
        self.normalize_intersection(members, prov)
    }
}

fn literal_text(lit: &Literal) -> String {
    match lit {
        Literal::Number(n) => crate::display::print_number(*n),
        Literal::String(s) => s.clone(),
        Literal::Boolean(b) => b.to_string(),
        Literal::BigInt(s) => s.clone(),
    }
}

/// All combinations, first axis outermost (deterministic order).
fn cartesian<T: Clone>(axes: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut out: Vec<Vec<T>> = vec![Vec::new()];
    for axis in axes {
        let mut next = Vec::with_capacity(out.len() * axis.len().max(1));
        for prefix in &out {
            for item in axis {
                let mut combo = prefix.clone();
                combo.push(item.clone());
                next.push(combo);
            }
        }
        out = next;
    }
    out
}
