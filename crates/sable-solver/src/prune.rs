//! Pruning: following a variable's instance chain to its representative.
//!
//! Every operation that inspects a type prunes first; after `prune(t)` the
//! result is never an instantiated `Var`.

use crate::store::TypeStore;
use crate::types::{ObjElem, TypeId, TypeKind};

impl TypeStore {
    /// Follow the instance chain of `t` and path-compress it.
    pub fn prune(&mut self, t: TypeId) -> TypeId {
        let inst = match self.kind(t) {
            TypeKind::Var(v) => match v.instance {
                Some(inst) => inst,
                None => return t,
            },
            _ => return t,
        };
        let repr = self.prune(inst);
        if repr != inst {
            self.compress_var(t, repr);
        }
        repr
    }

    /// Read-only prune: follow the chain without compressing. Identical
    /// result to [`prune`](Self::prune), usable from `&self` contexts
    /// (equality, printing).
    pub fn resolve(&self, t: TypeId) -> TypeId {
        let mut cur = t;
        loop {
            match self.kind(cur) {
                TypeKind::Var(v) => match v.instance {
                    Some(inst) => cur = inst,
                    None => return cur,
                },
                _ => return cur,
            }
        }
    }

    /// Occurs check: does the unbound variable `var` occur anywhere inside
    /// `t`? Binding a variable to a type containing itself would create an
    /// infinite type.
    pub fn occurs_in(&self, var: TypeId, t: TypeId) -> bool {
        let t = self.resolve(t);
        if t == var {
            return true;
        }
        let occurs_list =
            |s: &Self, list: &[TypeId]| list.iter().any(|&child| s.occurs_in(var, child));
        match self.kind(t) {
            TypeKind::Var(_)
            | TypeKind::Prim(_)
            | TypeKind::Lit(_)
            | TypeKind::Never
            | TypeKind::Unknown
            | TypeKind::Any
            | TypeKind::Null
            | TypeKind::Undefined
            | TypeKind::Void
            | TypeKind::TypeOf(_)
            | TypeKind::Infer(_)
            | TypeKind::Namespace(_)
            | TypeKind::UniqueSymbol(_) => false,
            TypeKind::Func(f) => {
                f.params.iter().any(|p| self.occurs_in(var, p.ty))
                    || f.self_ty.is_some_and(|s| self.occurs_in(var, s))
                    || self.occurs_in(var, f.ret)
                    || self.occurs_in(var, f.throws)
                    || f.type_params.iter().any(|tp| {
                        tp.constraint.is_some_and(|c| self.occurs_in(var, c))
                            || tp.default.is_some_and(|d| self.occurs_in(var, d))
                    })
            }
            TypeKind::Object(o) => {
                o.elems.iter().any(|e| match e {
                    ObjElem::Property(p) => self.occurs_in(var, p.ty),
                    ObjElem::Method { func, .. } => self.occurs_in(var, *func),
                    ObjElem::Getter { ret, .. } => self.occurs_in(var, *ret),
                    ObjElem::Setter { param, .. } => self.occurs_in(var, *param),
                    ObjElem::Callable(f) | ObjElem::Constructor(f) => self.occurs_in(var, *f),
                    ObjElem::Mapped(m) => {
                        self.occurs_in(var, m.constraint) || self.occurs_in(var, m.value)
                    }
                    ObjElem::RestSpread(s) => self.occurs_in(var, *s),
                }) || occurs_list(self, &o.extends)
            }
            TypeKind::Tuple(list) | TypeKind::Union(list) | TypeKind::Intersection(list) => {
                occurs_list(self, list)
            }
            TypeKind::Ref(r) => occurs_list(self, &r.args),
            TypeKind::KeyOf(inner) => self.occurs_in(var, *inner),
            TypeKind::Index(ix) => {
                self.occurs_in(var, ix.target) || self.occurs_in(var, ix.index)
            }
            TypeKind::Cond(c) => {
                self.occurs_in(var, c.check)
                    || self.occurs_in(var, c.extends)
                    || self.occurs_in(var, c.then_ty)
                    || self.occurs_in(var, c.else_ty)
            }
            TypeKind::TemplateLit(tpl) => occurs_list(self, &tpl.types),
            TypeKind::Regex(r) => r.groups.iter().any(|(_, g)| self.occurs_in(var, *g)),
            TypeKind::Mutability { inner, .. } => self.occurs_in(var, *inner),
        }
    }
}
