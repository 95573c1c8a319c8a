//! Cached structural facts about a type, computed on demand.
//!
//! The expansion engine needs cheap answers to "is this type closed?" (no
//! unbound variables reachable) and "does this clause contain an `infer`
//! binder?"; the conditional-determinacy invariant is stated in those
//! terms.

use bitflags::bitflags;

use crate::store::TypeStore;
use crate::types::{ObjElem, TypeId, TypeKind};

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    pub struct TypeFlags: u8 {
        /// An unbound unification variable is reachable.
        const HAS_FREE_VAR = 1 << 0;
        /// An `infer` binder is reachable.
        const HAS_INFER = 1 << 1;
        /// A type reference is reachable.
        const HAS_REF = 1 << 2;
    }
}

impl TypeStore {
    /// Compute the flags of `t`. Namespaces are not traversed (they may be
    /// arbitrarily large and are identity-compared anyway).
    pub fn flags(&self, t: TypeId) -> TypeFlags {
        let t = self.resolve(t);
        let list = |s: &Self, items: &[TypeId]| {
            items
                .iter()
                .fold(TypeFlags::empty(), |acc, &i| acc | s.flags(i))
        };
        match self.kind(t) {
            TypeKind::Var(_) => TypeFlags::HAS_FREE_VAR,
            TypeKind::Infer(_) => TypeFlags::HAS_INFER,
            TypeKind::Ref(r) => TypeFlags::HAS_REF | list(self, &r.args),
            TypeKind::Prim(_)
            | TypeKind::Lit(_)
            | TypeKind::Never
            | TypeKind::Unknown
            | TypeKind::Any
            | TypeKind::Null
            | TypeKind::Undefined
            | TypeKind::Void
            | TypeKind::TypeOf(_)
            | TypeKind::Namespace(_)
            | TypeKind::UniqueSymbol(_) => TypeFlags::empty(),
            TypeKind::Func(f) => {
                let mut acc = self.flags(f.ret) | self.flags(f.throws);
                for p in &f.params {
                    acc |= self.flags(p.ty);
                }
                if let Some(s) = f.self_ty {
                    acc |= self.flags(s);
                }
                for tp in &f.type_params {
                    if let Some(c) = tp.constraint {
                        acc |= self.flags(c);
                    }
                    if let Some(d) = tp.default {
                        acc |= self.flags(d);
                    }
                }
                acc
            }
            TypeKind::Object(o) => {
                let mut acc = list(self, &o.extends);
                for e in &o.elems {
                    acc |= match e {
                        ObjElem::Property(p) => self.flags(p.ty),
                        ObjElem::Method { func, .. } => self.flags(*func),
                        ObjElem::Getter { ret, .. } => self.flags(*ret),
                        ObjElem::Setter { param, .. } => self.flags(*param),
                        ObjElem::Callable(f) | ObjElem::Constructor(f) => self.flags(*f),
                        ObjElem::Mapped(m) => self.flags(m.constraint) | self.flags(m.value),
                        ObjElem::RestSpread(s) => self.flags(*s),
                    };
                }
                acc
            }
            TypeKind::Tuple(items) | TypeKind::Union(items) | TypeKind::Intersection(items) => {
                list(self, items)
            }
            TypeKind::KeyOf(inner) => self.flags(*inner),
            TypeKind::Index(ix) => self.flags(ix.target) | self.flags(ix.index),
            TypeKind::Cond(c) => {
                self.flags(c.check)
                    | self.flags(c.extends)
                    | self.flags(c.then_ty)
                    | self.flags(c.else_ty)
            }
            TypeKind::TemplateLit(tpl) => list(self, &tpl.types),
            TypeKind::Regex(r) => {
                let ids: Vec<TypeId> = r.groups.iter().map(|(_, g)| *g).collect();
                list(self, &ids)
            }
            TypeKind::Mutability { inner, .. } => self.flags(*inner),
        }
    }

    /// A type is closed when no unbound variable is reachable from it.
    pub fn is_closed(&self, t: TypeId) -> bool {
        !self.flags(t).contains(TypeFlags::HAS_FREE_VAR)
    }
}
