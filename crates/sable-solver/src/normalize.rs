//! Intersection normalization.
//!
//! Runs after expansion: flatten, dedupe structurally, absorb the
//! specials, and, when every member is a plain object, merge them into
//! one object. Per property the merged value is the intersection of the
//! per-member values; `optional` is the conjunction, `readonly` the
//! disjunction.

use indexmap::IndexMap;
use sable_common::span::Span;

use crate::solver::Solver;
use crate::types::{ObjElem, ObjectType, PropertyElem, TypeId, TypeKind, TypeList};

struct MergedProp {
    parts: Vec<TypeId>,
    optional: bool,
    readonly: bool,
}

impl Solver {
    /// Normalize an intersection's member list into canonical form.
    pub fn normalize_intersection(
        &mut self,
        members: impl IntoIterator<Item = TypeId>,
        prov: Option<Span>,
    ) -> TypeId {
        // The smart constructor flattens, dedupes and absorbs
        // never/any/unknown.
        let t = self.store.intersection(members, prov);
        let TypeKind::Intersection(parts) = self.store.kind(t).clone() else {
            return t;
        };
        let all_plain_objects = parts.iter().all(|&p| {
            matches!(
                self.store.kind(self.store.resolve(p)),
                TypeKind::Object(o) if !o.nominal
            )
        });
        if !all_plain_objects {
            return t;
        }
        self.merge_objects(&parts, prov)
    }

    fn merge_objects(&mut self, parts: &TypeList, prov: Option<Span>) -> TypeId {
        let mut props: IndexMap<String, MergedProp> = IndexMap::new();
        let mut rest: Vec<ObjElem> = Vec::new();
        let mut extends = TypeList::new();
        let mut sealed = false;
        for &part in parts {
            let part = self.store.resolve(part);
            let TypeKind::Object(o) = self.store.kind(part).clone() else {
                unreachable!("merge_objects on a non-object member")
            };
            // A sealed constituent keeps the merged object exact.
            sealed |= o.sealed;
            for e in o.elems {
                match e {
                    ObjElem::Property(p) => match props.get_mut(&p.name) {
                        Some(merged) => {
                            merged.parts.push(p.ty);
                            merged.optional &= p.optional;
                            merged.readonly |= p.readonly;
                        }
                        None => {
                            props.insert(
                                p.name.clone(),
                                MergedProp {
                                    parts: vec![p.ty],
                                    optional: p.optional,
                                    readonly: p.readonly,
                                },
                            );
                        }
                    },
                    other => rest.push(other),
                }
            }
            extends.extend(o.extends.iter().copied());
        }
        let mut elems: Vec<ObjElem> = Vec::with_capacity(props.len() + rest.len());
        for (name, merged) in props {
            let ty = self.store.intersection(merged.parts, prov);
            elems.push(ObjElem::Property(PropertyElem {
                name,
                ty,
                optional: merged.optional,
                readonly: merged.readonly,
            }));
        }
        elems.extend(rest);
        self.store.object(
            ObjectType {
                elems,
                extends,
                nominal: false,
                sealed,
            },
            prov,
        )
    }
}
