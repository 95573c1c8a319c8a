//! Expansion engine behavior: conditionals with `infer` binders and regex
//! capture groups, `keyof`, indexed access, template literals and mapped
//! elements.

use sable_solver::{
    CondType, Literal, MappedElem, ObjElem, ObjectType, PropertyElem, RefType, RegexType, Scope,
    Solver, TemplateLitType, TypeAlias, TypeId, TypeKind, TypeList,
};

/// Opt-in tracing for debugging a failing case: `RUST_LOG=sable_solver=trace`.
fn trace_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn type_ref(solver: &mut Solver, name: &str, args: &[TypeId]) -> TypeId {
    solver.store.type_ref(
        RefType {
            name: name.to_string(),
            args: args.iter().copied().collect(),
            alias: None,
        },
        None,
    )
}

fn object(solver: &mut Solver, props: &[(&str, TypeId)]) -> TypeId {
    let elems = props
        .iter()
        .map(|&(name, ty)| {
            ObjElem::Property(PropertyElem {
                name: name.to_string(),
                ty,
                optional: false,
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

// =============================================================================
// Conditionals
// =============================================================================

#[test]
fn test_conditional_picks_then_branch() {
    trace_init();
    let mut solver = Solver::new();
    let scope = Scope::new();
    let yes = solver.store.string_lit("yes", None);
    let no = solver.store.string_lit("no", None);
    let cond = solver.store.cond(
        CondType {
            check: TypeId::STRING,
            extends: TypeId::STRING,
            then_ty: yes,
            else_ty: no,
        },
        None,
    );
    assert_eq!(solver.expand(&scope, cond, -1), yes);
}

#[test]
fn test_conditional_picks_else_branch() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let yes = solver.store.string_lit("yes", None);
    let no = solver.store.string_lit("no", None);
    let cond = solver.store.cond(
        CondType {
            check: TypeId::STRING,
            extends: TypeId::NUMBER,
            then_ty: yes,
            else_ty: no,
        },
        None,
    );
    assert_eq!(solver.expand(&scope, cond, -1), no);
}

#[test]
fn test_conditional_with_open_check_stays_opaque() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let open = solver.store.fresh_var(None);
    let cond = solver.store.cond(
        CondType {
            check: open,
            extends: TypeId::STRING,
            then_ty: TypeId::NUMBER,
            else_ty: TypeId::BOOLEAN,
        },
        None,
    );
    let out = solver.expand(&scope, cond, -1);
    assert!(matches!(solver.store.kind(out), TypeKind::Cond(_)));
}

#[test]
fn test_infer_binder_captures_into_then_branch() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    // [number, string] extends [infer A, string] ? A : never  →  number
    let check = {
        let elems: TypeList = [TypeId::NUMBER, TypeId::STRING].into_iter().collect();
        solver.store.tuple(elems, None)
    };
    let infer_a = solver.store.infer("A", None);
    let extends = {
        let elems: TypeList = [infer_a, TypeId::STRING].into_iter().collect();
        solver.store.tuple(elems, None)
    };
    let then_ty = type_ref(&mut solver, "A", &[]);
    let cond = solver.store.cond(
        CondType {
            check,
            extends,
            then_ty,
            else_ty: TypeId::NEVER,
        },
        None,
    );
    let out = solver.expand(&scope, cond, -1);
    assert_eq!(solver.store.prune(out), TypeId::NUMBER);
}

#[test]
fn test_regex_capture_groups_bind_in_then_branch() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    // "v1.42" extends /v(?<major>[0-9]+)\.(?<minor>[0-9]+)/ ? major : never
    let check = solver.store.string_lit("v1.42", None);
    let extends = solver.store.regex(
        RegexType {
            pattern: r"v(?<major>[0-9]+)\.(?<minor>[0-9]+)".to_string(),
            groups: vec![
                ("major".to_string(), TypeId::UNKNOWN),
                ("minor".to_string(), TypeId::UNKNOWN),
            ],
        },
        None,
    );
    let then_ty = type_ref(&mut solver, "major", &[]);
    let cond = solver.store.cond(
        CondType {
            check,
            extends,
            then_ty,
            else_ty: TypeId::NEVER,
        },
        None,
    );
    let out = solver.expand(&scope, cond, -1);
    let out = solver.store.prune(out);
    match solver.store.kind(out) {
        TypeKind::Lit(Literal::String(s)) => assert_eq!(s, "1"),
        other => panic!("expected the captured major component, found {other:?}"),
    }
}

#[test]
fn test_regex_mismatch_picks_else_branch() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let check = solver.store.string_lit("not-a-version", None);
    let extends = solver.store.regex(
        RegexType {
            pattern: r"v(?<major>[0-9]+)".to_string(),
            groups: vec![("major".to_string(), TypeId::UNKNOWN)],
        },
        None,
    );
    let cond = solver.store.cond(
        CondType {
            check,
            extends,
            then_ty: TypeId::STRING,
            else_ty: TypeId::NEVER,
        },
        None,
    );
    assert_eq!(solver.expand(&scope, cond, -1), TypeId::NEVER);
}

// =============================================================================
// keyof
// =============================================================================

#[test]
fn test_keyof_object_is_union_of_literal_keys() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let obj = object(
        &mut solver,
        &[("foo", TypeId::STRING), ("bar", TypeId::NUMBER)],
    );
    let keys = solver.store.key_of(obj, None);
    let out = solver.expand(&scope, keys, -1);
    assert_eq!(solver.print(out), "\"foo\" | \"bar\"");
}

#[test]
fn test_keyof_tuple_includes_length_and_indices() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let tuple = {
        let elems: TypeList = [TypeId::STRING, TypeId::NUMBER].into_iter().collect();
        solver.store.tuple(elems, None)
    };
    let keys = solver.store.key_of(tuple, None);
    let out = solver.expand(&scope, keys, -1);
    assert_eq!(solver.print(out), "\"length\" | 0 | 1");
}

#[test]
fn test_keyof_specials() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let keys = solver.store.key_of(TypeId::STRING, None);
    assert_eq!(solver.expand(&scope, keys, -1), TypeId::NEVER);
    let keys = solver.store.key_of(TypeId::ANY, None);
    let out = solver.expand(&scope, keys, -1);
    assert_eq!(solver.print(out), "string | number | symbol");
}

#[test]
fn test_keyof_mapped_element_contributes_its_constraint() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let a = solver.store.string_lit("a", None);
    let b = solver.store.string_lit("b", None);
    let constraint = solver.store.union([a, b], None);
    let value = type_ref(&mut solver, "K", &[]);
    let mapped = solver.store.object(
        ObjectType {
            elems: vec![ObjElem::Mapped(MappedElem {
                binder: "K".to_string(),
                constraint,
                value,
                optional: None,
                readonly: None,
            })],
            extends: TypeList::new(),
            nominal: false,
            sealed: false,
        },
        None,
    );
    let keys = solver.store.key_of(mapped, None);
    let out = solver.expand(&scope, keys, -1);
    assert_eq!(solver.print(out), "\"a\" | \"b\"");
}

// =============================================================================
// Indexed access
// =============================================================================

#[test]
fn test_indexed_access_through_alias() {
    let mut solver = Solver::new();
    let mut scope = Scope::new();
    let obj = object(&mut solver, &[("name", TypeId::STRING)]);
    scope.set_type_alias("User", TypeAlias::simple(obj));
    let user = type_ref(&mut solver, "User", &[]);
    let key = solver.store.string_lit("name", None);
    let access = solver.store.index(user, key, None);
    assert_eq!(solver.expand(&scope, access, -1), TypeId::STRING);
}

// =============================================================================
// Template literals
// =============================================================================

#[test]
fn test_template_literal_cartesian_product() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let a = solver.store.string_lit("get", None);
    let b = solver.store.string_lit("set", None);
    let verb = solver.store.union([a, b], None);
    let x = solver.store.string_lit("X", None);
    let y = solver.store.string_lit("Y", None);
    let field = solver.store.union([x, y], None);
    let tpl = solver.store.template_lit(
        TemplateLitType {
            quasis: vec![String::new(), "_".to_string(), String::new()],
            types: [verb, field].into_iter().collect(),
        },
        None,
    );
    let out = solver.expand(&scope, tpl, -1);
    assert_eq!(
        solver.print(out),
        "\"get_X\" | \"get_Y\" | \"set_X\" | \"set_Y\""
    );
}

#[test]
fn test_template_literal_keeps_residual_holes() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let tpl = solver.store.template_lit(
        TemplateLitType {
            quasis: vec!["id-".to_string(), String::new()],
            types: [TypeId::STRING].into_iter().collect(),
        },
        None,
    );
    let out = solver.expand(&scope, tpl, -1);
    assert_eq!(solver.print(out), "`id-${string}`");
}

// =============================================================================
// Mapped elements
// =============================================================================

#[test]
fn test_mapped_element_expands_into_properties() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let a = solver.store.string_lit("a", None);
    let b = solver.store.string_lit("b", None);
    let constraint = solver.store.union([a, b], None);
    let mapped = solver.store.object(
        ObjectType {
            elems: vec![ObjElem::Mapped(MappedElem {
                binder: "K".to_string(),
                constraint,
                value: TypeId::NUMBER,
                optional: Some(true),
                readonly: None,
            })],
            extends: TypeList::new(),
            nominal: false,
            sealed: false,
        },
        None,
    );
    let out = solver.expand(&scope, mapped, -1);
    assert_eq!(solver.print(out), "{a?: number, b?: number}");
}

// =============================================================================
// Intersections
// =============================================================================

#[test]
fn test_intersection_distributes_over_union() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let a = object(&mut solver, &[("a", TypeId::STRING)]);
    let b = object(&mut solver, &[("b", TypeId::NUMBER)]);
    let c = object(&mut solver, &[("c", TypeId::BOOLEAN)]);
    let bc = solver.store.union([b, c], None);
    let t = solver.store.intersection([a, bc], None);
    let out = solver.expand(&scope, t, -1);
    assert_eq!(
        solver.print(out),
        "{a: string, b: number} | {a: string, c: boolean}"
    );
}

#[test]
fn test_intersection_of_objects_merges_properties() {
    let mut solver = Solver::new();
    let scope = Scope::new();
    let left = solver.store.object(
        ObjectType {
            elems: vec![ObjElem::Property(PropertyElem {
                name: "shared".to_string(),
                ty: TypeId::STRING,
                optional: true,
                readonly: true,
            })],
            extends: TypeList::new(),
            nominal: false,
            sealed: false,
        },
        None,
    );
    let right = solver.store.object(
        ObjectType {
            elems: vec![
                ObjElem::Property(PropertyElem {
                    name: "shared".to_string(),
                    ty: TypeId::STRING,
                    optional: false,
                    readonly: false,
                }),
                ObjElem::Property(PropertyElem {
                    name: "only".to_string(),
                    ty: TypeId::NUMBER,
                    optional: false,
                    readonly: false,
                }),
            ],
            extends: TypeList::new(),
            nominal: false,
            sealed: false,
        },
        None,
    );
    let t = solver.store.intersection([left, right], None);
    let out = solver.expand(&scope, t, -1);
    // optional = both, readonly = either; equal value types collapse.
    assert_eq!(
        solver.print(out),
        "{readonly shared: string, only: number}"
    );
}
