//! Member access across objects, unions, intersections, namespaces,
//! primitives (wrapper delegation) and optional chains.

use sable_common::diagnostics::ErrorKind;
use sable_solver::{
    Binding, FuncParam, FuncType, MemberKey, Namespace, ObjElem, ObjectType, PropertyElem, Scope,
    Solver, TypeAlias, TypeId, TypeKind, TypeList,
};

fn object(solver: &mut Solver, props: &[(&str, TypeId, bool)]) -> TypeId {
    let elems = props
        .iter()
        .map(|&(name, ty, optional)| {
            ObjElem::Property(PropertyElem {
                name: name.to_string(),
                ty,
                optional,
                readonly: false,
            })
        })
        .collect();
    solver.store.object(
        ObjectType {
            elems,
            extends: TypeList::new(),
            nominal: false,
            sealed: false,
        },
        None,
    )
}

/// A scope with a minimal `Number` wrapper for delegation tests.
fn scope_with_number_wrapper(solver: &mut Solver) -> Scope {
    let to_fixed = solver.store.func(
        FuncType {
            type_params: Vec::new(),
            self_ty: None,
            params: vec![FuncParam {
                name: "digits".to_string(),
                ty: TypeId::NUMBER,
                optional: true,
            }],
            ret: TypeId::STRING,
            throws: TypeId::NEVER,
        },
        None,
    );
    let body = solver.store.object(
        ObjectType {
            elems: vec![ObjElem::Method {
                name: "toFixed".to_string(),
                func: to_fixed,
            }],
            extends: TypeList::new(),
            nominal: false,
            sealed: false,
        },
        None,
    );
    let mut scope = Scope::new();
    scope.set_type_alias("Number", TypeAlias::simple(body));
    scope
}

#[test]
fn test_property_lookup_and_miss() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let obj = object(&mut solver, &[("name", TypeId::STRING, false)]);
    let mut diags = Vec::new();
    let found = solver.get_member(&scope, obj, &MemberKey::prop("name"), &mut diags);
    assert!(diags.is_empty());
    assert_eq!(found, TypeId::STRING);

    let mut diags = Vec::new();
    solver.get_member(&scope, obj, &MemberKey::prop("missing"), &mut diags);
    assert_eq!(diags.len(), 1);
    assert!(matches!(
        &diags[0].kind,
        ErrorKind::UnknownProperty { name, .. } if name == "missing"
    ));
}

#[test]
fn test_optional_property_widens_with_undefined() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let obj = object(&mut solver, &[("nickname", TypeId::STRING, true)]);
    let mut diags = Vec::new();
    let found = solver.get_member(&scope, obj, &MemberKey::prop("nickname"), &mut diags);
    assert!(diags.is_empty());
    assert_eq!(solver.print(found), "string | undefined");
}

#[test]
fn test_miss_recurses_into_extends() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let base = object(&mut solver, &[("id", TypeId::NUMBER, false)]);
    let child = solver.store.object(
        ObjectType {
            elems: vec![ObjElem::Property(PropertyElem {
                name: "name".to_string(),
                ty: TypeId::STRING,
                optional: false,
                readonly: false,
            })],
            extends: [base].into_iter().collect(),
            nominal: false,
            sealed: false,
        },
        None,
    );
    let mut diags = Vec::new();
    let found = solver.get_member(&scope, child, &MemberKey::prop("id"), &mut diags);
    assert!(diags.is_empty());
    assert_eq!(found, TypeId::NUMBER);
}

#[test]
fn test_union_member_requires_optional_chain_when_nullish() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let obj = object(&mut solver, &[("name", TypeId::STRING, false)]);
    let nullable = solver.store.union([obj, TypeId::NULL], None);

    let mut diags = Vec::new();
    solver.get_member(&scope, nullable, &MemberKey::prop("name"), &mut diags);
    assert_eq!(diags.len(), 1);
    assert!(matches!(&diags[0].kind, ErrorKind::ExpectedObject { .. }));

    let mut diags = Vec::new();
    let found = solver.get_member(
        &scope,
        nullable,
        &MemberKey::Prop {
            name: "name".to_string(),
            optional: true,
        },
        &mut diags,
    );
    assert!(diags.is_empty());
    assert_eq!(solver.print(found), "string | undefined");
}

#[test]
fn test_union_member_is_union_of_member_types() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let a = object(&mut solver, &[("kind", TypeId::STRING, false)]);
    let b = object(&mut solver, &[("kind", TypeId::NUMBER, false)]);
    let union = solver.store.union([a, b], None);
    let mut diags = Vec::new();
    let found = solver.get_member(&scope, union, &MemberKey::prop("kind"), &mut diags);
    assert!(diags.is_empty());
    assert_eq!(solver.print(found), "string | number");
}

#[test]
fn test_intersection_member_intersects_object_hits() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let a = object(&mut solver, &[("shared", TypeId::STRING, false)]);
    let b = object(
        &mut solver,
        &[("shared", TypeId::STRING, false), ("only", TypeId::NUMBER, false)],
    );
    let both = solver.store.intersection([a, b], None);
    let mut diags = Vec::new();
    let found = solver.get_member(&scope, both, &MemberKey::prop("shared"), &mut diags);
    assert!(diags.is_empty());
    assert_eq!(found, TypeId::STRING);

    let mut diags = Vec::new();
    let found = solver.get_member(&scope, both, &MemberKey::prop("only"), &mut diags);
    assert!(diags.is_empty());
    assert_eq!(found, TypeId::NUMBER);
}

#[test]
fn test_namespace_member_lookup() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let ns = Namespace::new();
    ns.borrow_mut()
        .values
        .insert("version".to_string(), Binding::immutable(TypeId::NUMBER));
    let nested = Namespace::new();
    ns.borrow_mut()
        .namespaces
        .insert("inner".to_string(), nested);
    let ns_ty = solver.store.namespace(ns, None);

    let mut diags = Vec::new();
    let found = solver.get_member(&scope, ns_ty, &MemberKey::prop("version"), &mut diags);
    assert!(diags.is_empty());
    assert_eq!(found, TypeId::NUMBER);

    let mut diags = Vec::new();
    let inner = solver.get_member(&scope, ns_ty, &MemberKey::prop("inner"), &mut diags);
    assert!(diags.is_empty());
    assert!(matches!(solver.store.kind(inner), TypeKind::Namespace(_)));

    let mut diags = Vec::new();
    solver.get_member(&scope, ns_ty, &MemberKey::Index(TypeId::NUMBER), &mut diags);
    assert_eq!(diags.len(), 1);
    assert!(matches!(&diags[0].kind, ErrorKind::InvalidObjectKey { .. }));
}

#[test]
fn test_primitive_delegates_to_wrapper() {
    let mut solver = Solver::new();
    let scope = scope_with_number_wrapper(&mut solver);
    let mut diags = Vec::new();
    let found = solver.get_member(&scope, TypeId::NUMBER, &MemberKey::prop("toFixed"), &mut diags);
    assert!(diags.is_empty());
    assert!(matches!(solver.store.kind(found), TypeKind::Func(_)));

    // Literals delegate through the same wrapper.
    let forty_two = solver.store.number_lit(42.0, None);
    let mut diags = Vec::new();
    let found = solver.get_member(&scope, forty_two, &MemberKey::prop("toFixed"), &mut diags);
    assert!(diags.is_empty());
    assert!(matches!(solver.store.kind(found), TypeKind::Func(_)));
}

#[test]
fn test_member_through_alias_reference() {
    let mut solver = Solver::new();
    let mut scope = Scope::new();
    let obj = object(&mut solver, &[("value", TypeId::BOOLEAN, false)]);
    scope.set_type_alias("Flag", TypeAlias::simple(obj));
    let flag = solver.store.type_ref(
        sable_solver::RefType {
            name: "Flag".to_string(),
            args: TypeList::new(),
            alias: None,
        },
        None,
    );
    let mut diags = Vec::new();
    let found = solver.get_member(&scope, flag, &MemberKey::prop("value"), &mut diags);
    assert!(diags.is_empty());
    assert_eq!(found, TypeId::BOOLEAN);
}

#[test]
fn test_member_on_non_object_is_a_diagnostic() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let mut diags = Vec::new();
    solver.get_member(&scope, TypeId::NULL, &MemberKey::prop("anything"), &mut diags);
    assert_eq!(diags.len(), 1);
    assert!(matches!(&diags[0].kind, ErrorKind::ExpectedObject { .. }));
}
