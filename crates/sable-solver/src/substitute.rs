//! Capture-avoiding substitution of type parameters by a name→type map.
//!
//! `substitute(t, σ)` replaces every `Ref` whose name is a key of `σ` with
//! the mapped type. A `Func` whose type parameters reuse a key of `σ`
//! hides that key for its subtree; a mapped element hides its binder
//! inside its value the same way.

use rustc_hash::FxHashMap;

use crate::store::TypeStore;
use crate::types::{
    FuncParam, FuncType, MappedElem, ObjElem, ObjectType, PropertyElem, TypeId, TypeKind,
    TypeParam,
};
use crate::visitor::{TypeVisitor, walk};

pub type Subst = FxHashMap<String, TypeId>;

pub fn substitute(store: &mut TypeStore, t: TypeId, map: &Subst) -> TypeId {
    if map.is_empty() {
        return t;
    }
    let mut sub = Substitutor { map };
    walk(store, t, &mut sub)
}

struct Substitutor<'m> {
    map: &'m Subst,
}

impl Substitutor<'_> {
    fn narrowed(&self, hidden: impl Iterator<Item = impl AsRef<str>>) -> Subst {
        let mut out = self.map.clone();
        for name in hidden {
            out.remove(name.as_ref());
        }
        out
    }

    /// Rebuild a function whose type parameters shadow keys of the map,
    /// substituting children under the narrowed map.
    fn subst_func(&self, store: &mut TypeStore, t: TypeId, f: &FuncType) -> TypeId {
        let narrowed = self.narrowed(f.type_params.iter().map(|tp| tp.name.as_str()));
        if narrowed.is_empty() {
            return t;
        }
        let type_params = f
            .type_params
            .iter()
            .map(|tp| TypeParam {
                name: tp.name.clone(),
                constraint: tp.constraint.map(|c| substitute(store, c, &narrowed)),
                default: tp.default.map(|d| substitute(store, d, &narrowed)),
            })
            .collect();
        let params = f
            .params
            .iter()
            .map(|p| FuncParam {
                name: p.name.clone(),
                ty: substitute(store, p.ty, &narrowed),
                optional: p.optional,
            })
            .collect();
        let self_ty = f.self_ty.map(|s| substitute(store, s, &narrowed));
        let ret = substitute(store, f.ret, &narrowed);
        let throws = substitute(store, f.throws, &narrowed);
        let prov = store.prov(t);
        store.func(
            FuncType {
                type_params,
                self_ty,
                params,
                ret,
                throws,
            },
            prov,
        )
    }

    /// Rebuild an object that contains a mapped element whose binder
    /// shadows a key of the map. The binder is hidden only inside the
    /// element's value; the key constraint sees the full map.
    fn subst_object(&self, store: &mut TypeStore, t: TypeId, o: &ObjectType) -> TypeId {
        let elems = o
            .elems
            .iter()
            .map(|e| match e {
                ObjElem::Property(p) => ObjElem::Property(PropertyElem {
                    name: p.name.clone(),
                    ty: substitute(store, p.ty, self.map),
                    optional: p.optional,
                    readonly: p.readonly,
                }),
                ObjElem::Method { name, func } => ObjElem::Method {
                    name: name.clone(),
                    func: substitute(store, *func, self.map),
                },
                ObjElem::Getter { name, ret } => ObjElem::Getter {
                    name: name.clone(),
                    ret: substitute(store, *ret, self.map),
                },
                ObjElem::Setter { name, param } => ObjElem::Setter {
                    name: name.clone(),
                    param: substitute(store, *param, self.map),
                },
                ObjElem::Callable(f) => ObjElem::Callable(substitute(store, *f, self.map)),
                ObjElem::Constructor(f) => ObjElem::Constructor(substitute(store, *f, self.map)),
                ObjElem::Mapped(m) => {
                    let narrowed = self.narrowed(std::iter::once(m.binder.as_str()));
                    ObjElem::Mapped(MappedElem {
                        binder: m.binder.clone(),
                        constraint: substitute(store, m.constraint, self.map),
                        value: substitute(store, m.value, &narrowed),
                        optional: m.optional,
                        readonly: m.readonly,
                    })
                }
                ObjElem::RestSpread(s) => ObjElem::RestSpread(substitute(store, *s, self.map)),
            })
            .collect();
        let extends = o
            .extends
            .iter()
            .map(|&e| substitute(store, e, self.map))
            .collect();
        let prov = store.prov(t);
        store.object(
            ObjectType {
                elems,
                extends,
                nominal: o.nominal,
                sealed: o.sealed,
            },
            prov,
        )
    }
}

impl TypeVisitor for Substitutor<'_> {
    fn enter(&mut self, store: &mut TypeStore, t: TypeId) -> Option<TypeId> {
        match store.kind(t).clone() {
            TypeKind::Ref(r) => self.map.get(&r.name).copied(),
            TypeKind::Func(f) => {
                if f.type_params
                    .iter()
                    .any(|tp| self.map.contains_key(&tp.name))
                {
                    Some(self.subst_func(store, t, &f))
                } else {
                    None
                }
            }
            TypeKind::Object(o) => {
                let shadows = o.elems.iter().any(|e| {
                    matches!(e, ObjElem::Mapped(m) if self.map.contains_key(&m.binder))
                });
                if shadows {
                    Some(self.subst_object(store, t, &o))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
