//! The type arena.
//!
//! All types of one engine live in a single `Vec`; a `TypeId` is an index
//! into it. The special types are pre-seeded at fixed indices so the
//! `TypeId::NEVER` … `TypeId::BIGINT` constants are valid in every store.
//!
//! Union and intersection construction goes through the smart constructors
//! here, which establish the canonical form: flat, deduplicated by
//! structural equality, singletons collapsed, `never` absorbed in unions,
//! `any`/`unknown` absorbed in intersections.

use sable_common::span::Span;

use crate::types::{
    CondType, FuncType, IndexType, Literal, Mutability, NamespaceRef, ObjectType, PrimKind,
    RefType, RegexType, TemplateLitType, TypeId, TypeKind, TypeList, VarOrigin, VarType,
};

/// A stored type: its shape plus optional provenance. Provenance points at
/// the syntax (or the parent type) that produced the type and is used only
/// for diagnostics; it never affects equality.
#[derive(Clone, Debug)]
pub struct TypeData {
    pub kind: TypeKind,
    pub prov: Option<Span>,
}

pub struct TypeStore {
    types: Vec<TypeData>,
    next_var_id: u32,
    next_symbol_id: u32,
}

impl TypeStore {
    pub fn new() -> Self {
        let mut store = TypeStore {
            types: Vec::with_capacity(64),
            next_var_id: 0,
            next_symbol_id: 0,
        };
        // Seed order must match the TypeId constants.
        store.push(TypeKind::Never, None);
        store.push(TypeKind::Unknown, None);
        store.push(TypeKind::Any, None);
        store.push(TypeKind::Null, None);
        store.push(TypeKind::Undefined, None);
        store.push(TypeKind::Void, None);
        store.push(TypeKind::Prim(PrimKind::Number), None);
        store.push(TypeKind::Prim(PrimKind::String), None);
        store.push(TypeKind::Prim(PrimKind::Boolean), None);
        store.push(TypeKind::Prim(PrimKind::Symbol), None);
        store.push(TypeKind::Prim(PrimKind::BigInt), None);
        debug_assert_eq!(store.types.len() as u32, TypeId::SEEDED);
        store
    }

    fn push(&mut self, kind: TypeKind, prov: Option<Span>) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeData { kind, prov });
        id
    }

    /// Number of types currently allocated (never below the seeded count).
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[inline]
    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.types[id.index()].kind
    }

    #[inline]
    pub fn prov(&self, id: TypeId) -> Option<Span> {
        self.types[id.index()].prov
    }

    pub fn alloc(&mut self, kind: TypeKind, prov: Option<Span>) -> TypeId {
        self.push(kind, prov)
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn fresh_var(&mut self, prov: Option<Span>) -> TypeId {
        self.fresh_var_with_origin(VarOrigin::Inference, prov)
    }

    pub fn fresh_var_with_origin(&mut self, origin: VarOrigin, prov: Option<Span>) -> TypeId {
        let id = self.next_var_id;
        self.next_var_id += 1;
        self.push(
            TypeKind::Var(VarType {
                id,
                instance: None,
                origin,
            }),
            prov,
        )
    }

    pub fn literal(&mut self, lit: Literal, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::Lit(lit), prov)
    }

    pub fn number_lit(&mut self, value: f64, prov: Option<Span>) -> TypeId {
        self.literal(Literal::Number(value), prov)
    }

    pub fn string_lit(&mut self, value: impl Into<String>, prov: Option<Span>) -> TypeId {
        self.literal(Literal::String(value.into()), prov)
    }

    pub fn boolean_lit(&mut self, value: bool, prov: Option<Span>) -> TypeId {
        self.literal(Literal::Boolean(value), prov)
    }

    pub fn func(&mut self, func: FuncType, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::Func(func), prov)
    }

    pub fn object(&mut self, object: ObjectType, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::Object(object), prov)
    }

    pub fn tuple(&mut self, elems: TypeList, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::Tuple(elems), prov)
    }

    pub fn type_ref(&mut self, r: RefType, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::Ref(r), prov)
    }

    pub fn key_of(&mut self, operand: TypeId, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::KeyOf(operand), prov)
    }

    pub fn index(&mut self, target: TypeId, index: TypeId, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::Index(IndexType { target, index }), prov)
    }

    pub fn type_of(&mut self, parts: Vec<String>, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::TypeOf(parts), prov)
    }

    pub fn cond(&mut self, cond: CondType, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::Cond(cond), prov)
    }

    pub fn infer(&mut self, name: impl Into<String>, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::Infer(name.into()), prov)
    }

    pub fn template_lit(&mut self, tpl: TemplateLitType, prov: Option<Span>) -> TypeId {
        debug_assert_eq!(tpl.quasis.len(), tpl.types.len() + 1);
        self.push(TypeKind::TemplateLit(tpl), prov)
    }

    pub fn regex(&mut self, regex: RegexType, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::Regex(regex), prov)
    }

    pub fn namespace(&mut self, ns: NamespaceRef, prov: Option<Span>) -> TypeId {
        self.push(TypeKind::Namespace(ns), prov)
    }

    pub fn mutability(
        &mut self,
        inner: TypeId,
        mutability: Mutability,
        prov: Option<Span>,
    ) -> TypeId {
        self.push(TypeKind::Mutability { inner, mutability }, prov)
    }

    pub fn unique_symbol(&mut self, prov: Option<Span>) -> TypeId {
        let id = self.next_symbol_id;
        self.next_symbol_id += 1;
        self.push(TypeKind::UniqueSymbol(id), prov)
    }

    // =========================================================================
    // Smart constructors (canonical union/intersection form)
    // =========================================================================

    /// Build a union in canonical form: flattened, deduplicated, `never`
    /// dropped, singleton collapsed. An empty member list yields `never`.
    pub fn union(&mut self, members: impl IntoIterator<Item = TypeId>, prov: Option<Span>) -> TypeId {
        let mut flat = TypeList::new();
        for m in members {
            self.flatten_into(m, true, &mut flat);
        }
        let mut out = TypeList::new();
        for m in flat {
            if matches!(self.kind(self.resolve(m)), TypeKind::Never) {
                continue;
            }
            if !out.iter().any(|&o| self.equal(o, m)) {
                out.push(m);
            }
        }
        match out.len() {
            0 => TypeId::NEVER,
            1 => out[0],
            _ => self.push(TypeKind::Union(out), prov),
        }
    }

    /// Build an intersection in canonical form: flattened, deduplicated,
    /// `never` absorbing, `any` absorbing, `unknown` dropped, singleton
    /// collapsed. An empty member list yields `unknown` (the identity).
    ///
    /// Object merging is not done here; that is the normalizer's job after
    /// expansion.
    pub fn intersection(
        &mut self,
        members: impl IntoIterator<Item = TypeId>,
        prov: Option<Span>,
    ) -> TypeId {
        let mut flat = TypeList::new();
        for m in members {
            self.flatten_into(m, false, &mut flat);
        }
        let mut out = TypeList::new();
        for m in flat {
            match self.kind(self.resolve(m)) {
                TypeKind::Never => return TypeId::NEVER,
                TypeKind::Any => return TypeId::ANY,
                TypeKind::Unknown => continue,
                _ => {}
            }
            if !out.iter().any(|&o| self.equal(o, m)) {
                out.push(m);
            }
        }
        match out.len() {
            0 => TypeId::UNKNOWN,
            1 => out[0],
            _ => self.push(TypeKind::Intersection(out), prov),
        }
    }

    fn flatten_into(&self, t: TypeId, union: bool, out: &mut TypeList) {
        let r = self.resolve(t);
        match (union, self.kind(r)) {
            (true, TypeKind::Union(members)) | (false, TypeKind::Intersection(members)) => {
                let members = members.clone();
                for m in members {
                    self.flatten_into(m, union, out);
                }
            }
            _ => out.push(r),
        }
    }

    // =========================================================================
    // Controlled mutations
    // =========================================================================

    /// Bind an unbound variable. Panics if `var` is not an unbound `Var`:
    /// a variable is bound at most once.
    pub fn bind_var(&mut self, var: TypeId, instance: TypeId) {
        match &mut self.types[var.index()].kind {
            TypeKind::Var(v) => {
                assert!(v.instance.is_none(), "type variable bound twice");
                v.instance = Some(instance);
            }
            _ => unreachable!("bind_var on a non-variable"),
        }
    }

    /// Path compression: repoint an already-bound variable's instance at its
    /// representative. The representative must be the transitive prune of
    /// the current instance, so observable behavior is unchanged.
    pub(crate) fn compress_var(&mut self, var: TypeId, repr: TypeId) {
        if let TypeKind::Var(v) = &mut self.types[var.index()].kind {
            debug_assert!(v.instance.is_some());
            v.instance = Some(repr);
        }
    }

    /// Overwrite a `Func`'s return type. Used only by async wrapping.
    pub fn set_func_return(&mut self, func: TypeId, ret: TypeId) {
        match &mut self.types[func.index()].kind {
            TypeKind::Func(f) => f.ret = ret,
            _ => unreachable!("set_func_return on a non-function"),
        }
    }

    /// Overwrite a `Func`'s throws type. Used only by async wrapping.
    pub fn set_func_throws(&mut self, func: TypeId, throws: TypeId) {
        match &mut self.types[func.index()].kind {
            TypeKind::Func(f) => f.throws = throws,
            _ => unreachable!("set_func_throws on a non-function"),
        }
    }

    // =========================================================================
    // Structural equality
    // =========================================================================

    /// Structural equality after (read-only) pruning. Provenance is
    /// ignored. Namespaces compare by identity, as do nominal objects'
    /// contents; two distinct `UniqueSymbol`s are never equal.
    pub fn equal(&self, a: TypeId, b: TypeId) -> bool {
        let a = self.resolve(a);
        let b = self.resolve(b);
        if a == b {
            return true;
        }
        match (self.kind(a), self.kind(b)) {
            (TypeKind::Var(va), TypeKind::Var(vb)) => va.id == vb.id,
            (TypeKind::Prim(ka), TypeKind::Prim(kb)) => ka == kb,
            (TypeKind::Lit(la), TypeKind::Lit(lb)) => la == lb,
            (TypeKind::Never, TypeKind::Never)
            | (TypeKind::Unknown, TypeKind::Unknown)
            | (TypeKind::Any, TypeKind::Any)
            | (TypeKind::Null, TypeKind::Null)
            | (TypeKind::Undefined, TypeKind::Undefined)
            | (TypeKind::Void, TypeKind::Void) => true,
            (TypeKind::Func(fa), TypeKind::Func(fb)) => self.func_equal(fa, fb),
            (TypeKind::Object(oa), TypeKind::Object(ob)) => self.object_equal(oa, ob),
            (TypeKind::Tuple(ea), TypeKind::Tuple(eb))
            | (TypeKind::Union(ea), TypeKind::Union(eb))
            | (TypeKind::Intersection(ea), TypeKind::Intersection(eb)) => self.list_equal(ea, eb),
            (TypeKind::Ref(ra), TypeKind::Ref(rb)) => {
                ra.name == rb.name && self.list_equal(&ra.args, &rb.args)
            }
            (TypeKind::KeyOf(ta), TypeKind::KeyOf(tb)) => self.equal(*ta, *tb),
            (TypeKind::Index(ia), TypeKind::Index(ib)) => {
                self.equal(ia.target, ib.target) && self.equal(ia.index, ib.index)
            }
            (TypeKind::TypeOf(pa), TypeKind::TypeOf(pb)) => pa == pb,
            (TypeKind::Cond(ca), TypeKind::Cond(cb)) => {
                self.equal(ca.check, cb.check)
                    && self.equal(ca.extends, cb.extends)
                    && self.equal(ca.then_ty, cb.then_ty)
                    && self.equal(ca.else_ty, cb.else_ty)
            }
            (TypeKind::Infer(na), TypeKind::Infer(nb)) => na == nb,
            (TypeKind::TemplateLit(ta), TypeKind::TemplateLit(tb)) => {
                ta.quasis == tb.quasis && self.list_equal(&ta.types, &tb.types)
            }
            (TypeKind::Regex(ra), TypeKind::Regex(rb)) => ra.pattern == rb.pattern,
            (TypeKind::Namespace(na), TypeKind::Namespace(nb)) => std::rc::Rc::ptr_eq(na, nb),
            (
                TypeKind::Mutability {
                    inner: ia,
                    mutability: ma,
                },
                TypeKind::Mutability {
                    inner: ib,
                    mutability: mb,
                },
            ) => ma == mb && self.equal(*ia, *ib),
            (TypeKind::UniqueSymbol(sa), TypeKind::UniqueSymbol(sb)) => sa == sb,
            _ => false,
        }
    }

    fn list_equal(&self, a: &TypeList, b: &TypeList) -> bool {
        a.len() == b.len() && a.iter().zip(b.iter()).all(|(&x, &y)| self.equal(x, y))
    }

    fn func_equal(&self, a: &FuncType, b: &FuncType) -> bool {
        if a.type_params.len() != b.type_params.len() || a.params.len() != b.params.len() {
            return false;
        }
        let tp_equal = a.type_params.iter().zip(&b.type_params).all(|(x, y)| {
            x.name == y.name
                && self.opt_equal(x.constraint, y.constraint)
                && self.opt_equal(x.default, y.default)
        });
        tp_equal
            && a.params
                .iter()
                .zip(&b.params)
                .all(|(x, y)| x.optional == y.optional && self.equal(x.ty, y.ty))
            && self.opt_equal(a.self_ty, b.self_ty)
            && self.equal(a.ret, b.ret)
            && self.equal(a.throws, b.throws)
    }

    fn opt_equal(&self, a: Option<TypeId>, b: Option<TypeId>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(x), Some(y)) => self.equal(x, y),
            _ => false,
        }
    }

    fn object_equal(&self, a: &ObjectType, b: &ObjectType) -> bool {
        if a.nominal || b.nominal {
            // Nominal objects compare by identity; reaching here means the
            // ids differed.
            return false;
        }
        a.sealed == b.sealed
            && a.elems.len() == b.elems.len()
            && self.list_equal(&a.extends, &b.extends)
            && a.elems
                .iter()
                .zip(&b.elems)
                .all(|(x, y)| self.elem_equal(x, y))
    }

    fn elem_equal(&self, a: &crate::types::ObjElem, b: &crate::types::ObjElem) -> bool {
        use crate::types::ObjElem::*;
        match (a, b) {
            (Property(pa), Property(pb)) => {
                pa.name == pb.name
                    && pa.optional == pb.optional
                    && pa.readonly == pb.readonly
                    && self.equal(pa.ty, pb.ty)
            }
            (Method { name: na, func: fa }, Method { name: nb, func: fb }) => {
                na == nb && self.equal(*fa, *fb)
            }
            (Getter { name: na, ret: ra }, Getter { name: nb, ret: rb }) => {
                na == nb && self.equal(*ra, *rb)
            }
            (Setter { name: na, param: pa }, Setter { name: nb, param: pb }) => {
                na == nb && self.equal(*pa, *pb)
            }
            (Callable(fa), Callable(fb)) | (Constructor(fa), Constructor(fb)) => {
                self.equal(*fa, *fb)
            }
            (Mapped(ma), Mapped(mb)) => {
                ma.binder == mb.binder
                    && ma.optional == mb.optional
                    && ma.readonly == mb.readonly
                    && self.equal(ma.constraint, mb.constraint)
                    && self.equal(ma.value, mb.value)
            }
            (RestSpread(ta), RestSpread(tb)) => self.equal(*ta, *tb),
            _ => false,
        }
    }
}
