//! The enter/exit type visitor.
//!
//! `enter` may return a replacement (skipping default traversal and the
//! `exit` hook for that node); returning `None` continues with the default
//! traversal, which descends into every child type field in a fixed order
//! and rebuilds the node only when a child changed. `exit` then receives
//! the possibly-rewritten node and may return the final replacement.
//!
//! Child order for `Func`: type-parameter constraints/defaults, params
//! left-to-right, self, return, throws. For `Object`: elements in
//! declaration order, then `extends`.

use crate::store::TypeStore;
use crate::types::{
    CondType, FuncParam, FuncType, IndexType, MappedElem, ObjElem, ObjectType, RefType,
    TemplateLitType, TypeId, TypeKind, TypeList, TypeParam,
};

pub trait TypeVisitor {
    fn enter(&mut self, _store: &mut TypeStore, _t: TypeId) -> Option<TypeId> {
        None
    }

    fn exit(&mut self, _store: &mut TypeStore, _t: TypeId) -> Option<TypeId> {
        None
    }
}

/// Drive a visitor over `t`, rebuilding rewritten nodes in the store.
pub fn walk(store: &mut TypeStore, t: TypeId, v: &mut dyn TypeVisitor) -> TypeId {
    if let Some(replacement) = v.enter(store, t) {
        return replacement;
    }
    let rebuilt = walk_children(store, t, v);
    v.exit(store, rebuilt).unwrap_or(rebuilt)
}

fn walk_list(
    store: &mut TypeStore,
    list: &TypeList,
    v: &mut dyn TypeVisitor,
    changed: &mut bool,
) -> TypeList {
    list.iter()
        .map(|&item| {
            let out = walk(store, item, v);
            *changed |= out != item;
            out
        })
        .collect()
}

fn walk_opt(
    store: &mut TypeStore,
    t: Option<TypeId>,
    v: &mut dyn TypeVisitor,
    changed: &mut bool,
) -> Option<TypeId> {
    t.map(|item| {
        let out = walk(store, item, v);
        *changed |= out != item;
        out
    })
}

fn walk_children(store: &mut TypeStore, t: TypeId, v: &mut dyn TypeVisitor) -> TypeId {
    // Clone the shape so the store can be borrowed mutably while recursing;
    // child ids are cheap and shared payloads are refcounted.
    let kind = store.kind(t).clone();
    let prov = store.prov(t);
    let mut changed = false;
    let rebuilt = match kind {
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
        | TypeKind::UniqueSymbol(_) => return t,
        TypeKind::Func(f) => {
            let type_params = f
                .type_params
                .iter()
                .map(|tp| TypeParam {
                    name: tp.name.clone(),
                    constraint: walk_opt(store, tp.constraint, v, &mut changed),
                    default: walk_opt(store, tp.default, v, &mut changed),
                })
                .collect();
            let params = f
                .params
                .iter()
                .map(|p| {
                    let ty = walk(store, p.ty, v);
                    changed |= ty != p.ty;
                    FuncParam {
                        name: p.name.clone(),
                        ty,
                        optional: p.optional,
                    }
                })
                .collect();
            let self_ty = walk_opt(store, f.self_ty, v, &mut changed);
            let ret = walk(store, f.ret, v);
            changed |= ret != f.ret;
            let throws = walk(store, f.throws, v);
            changed |= throws != f.throws;
            TypeKind::Func(FuncType {
                type_params,
                self_ty,
                params,
                ret,
                throws,
            })
        }
        TypeKind::Object(o) => {
            let elems = o
                .elems
                .iter()
                .map(|e| walk_elem(store, e, v, &mut changed))
                .collect();
            let extends = walk_list(store, &o.extends, v, &mut changed);
            TypeKind::Object(ObjectType {
                elems,
                extends,
                nominal: o.nominal,
                sealed: o.sealed,
            })
        }
        TypeKind::Tuple(items) => TypeKind::Tuple(walk_list(store, &items, v, &mut changed)),
        TypeKind::Union(items) => TypeKind::Union(walk_list(store, &items, v, &mut changed)),
        TypeKind::Intersection(items) => {
            TypeKind::Intersection(walk_list(store, &items, v, &mut changed))
        }
        TypeKind::Ref(r) => TypeKind::Ref(RefType {
            name: r.name.clone(),
            args: walk_list(store, &r.args, v, &mut changed),
            alias: r.alias.clone(),
        }),
        TypeKind::KeyOf(inner) => {
            let out = walk(store, inner, v);
            changed |= out != inner;
            TypeKind::KeyOf(out)
        }
        TypeKind::Index(ix) => {
            let target = walk(store, ix.target, v);
            changed |= target != ix.target;
            let index = walk(store, ix.index, v);
            changed |= index != ix.index;
            TypeKind::Index(IndexType { target, index })
        }
        TypeKind::Cond(c) => {
            let check = walk(store, c.check, v);
            changed |= check != c.check;
            let extends = walk(store, c.extends, v);
            changed |= extends != c.extends;
            let then_ty = walk(store, c.then_ty, v);
            changed |= then_ty != c.then_ty;
            let else_ty = walk(store, c.else_ty, v);
            changed |= else_ty != c.else_ty;
            TypeKind::Cond(CondType {
                check,
                extends,
                then_ty,
                else_ty,
            })
        }
        TypeKind::TemplateLit(tpl) => TypeKind::TemplateLit(TemplateLitType {
            quasis: tpl.quasis.clone(),
            types: walk_list(store, &tpl.types, v, &mut changed),
        }),
        TypeKind::Regex(r) => {
            let groups = r
                .groups
                .iter()
                .map(|(name, g)| {
                    let out = walk(store, *g, v);
                    changed |= out != *g;
                    (name.clone(), out)
                })
                .collect();
            TypeKind::Regex(crate::types::RegexType {
                pattern: r.pattern.clone(),
                groups,
            })
        }
        TypeKind::Mutability { inner, mutability } => {
            let out = walk(store, inner, v);
            changed |= out != inner;
            TypeKind::Mutability {
                inner: out,
                mutability,
            }
        }
    };
    if changed { store.alloc(rebuilt, prov) } else { t }
}

fn walk_elem(
    store: &mut TypeStore,
    elem: &ObjElem,
    v: &mut dyn TypeVisitor,
    changed: &mut bool,
) -> ObjElem {
    let mut one = |store: &mut TypeStore, t: TypeId| {
        let out = walk(store, t, v);
        *changed |= out != t;
        out
    };
    match elem {
        ObjElem::Property(p) => ObjElem::Property(crate::types::PropertyElem {
            name: p.name.clone(),
            ty: one(store, p.ty),
            optional: p.optional,
            readonly: p.readonly,
        }),
        ObjElem::Method { name, func } => ObjElem::Method {
            name: name.clone(),
            func: one(store, *func),
        },
        ObjElem::Getter { name, ret } => ObjElem::Getter {
            name: name.clone(),
            ret: one(store, *ret),
        },
        ObjElem::Setter { name, param } => ObjElem::Setter {
            name: name.clone(),
            param: one(store, *param),
        },
        ObjElem::Callable(f) => ObjElem::Callable(one(store, *f)),
        ObjElem::Constructor(f) => ObjElem::Constructor(one(store, *f)),
        ObjElem::Mapped(m) => ObjElem::Mapped(MappedElem {
            binder: m.binder.clone(),
            constraint: one(store, m.constraint),
            value: one(store, m.value),
            optional: m.optional,
            readonly: m.readonly,
        }),
        ObjElem::RestSpread(s) => ObjElem::RestSpread(one(store, *s)),
    }
}
