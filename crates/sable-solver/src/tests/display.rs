use crate::store::TypeStore;
use crate::types::{
    FuncParam, FuncType, IndexType, Literal, ObjElem, ObjectType, PropertyElem, RefType, TypeId,
    TypeKind, TypeList,
};

use super::print_type;

#[test]
fn test_print_specials_and_primitives() {
    let store = TypeStore::new();
    assert_eq!(print_type(&store, TypeId::NEVER), "never");
    assert_eq!(print_type(&store, TypeId::ANY), "any");
    assert_eq!(print_type(&store, TypeId::NUMBER), "number");
    assert_eq!(print_type(&store, TypeId::STRING), "string");
}

#[test]
fn test_print_literals() {
    let mut store = TypeStore::new();
    let s = store.string_lit("data", None);
    assert_eq!(print_type(&store, s), "\"data\"");
    let n = store.number_lit(42.0, None);
    assert_eq!(print_type(&store, n), "42");
    let frac = store.number_lit(1.5, None);
    assert_eq!(print_type(&store, frac), "1.5");
    let b = store.boolean_lit(true, None);
    assert_eq!(print_type(&store, b), "true");
    let big = store.literal(Literal::BigInt("9".to_string()), None);
    assert_eq!(print_type(&store, big), "9n");
}

#[test]
fn test_print_function_omits_unbound_throws() {
    let mut store = TypeStore::new();
    let throws = store.fresh_var(None);
    let f = store.func(
        FuncType {
            type_params: Vec::new(),
            self_ty: None,
            params: vec![FuncParam {
                name: "url".to_string(),
                ty: TypeId::STRING,
                optional: false,
            }],
            ret: TypeId::STRING,
            throws,
        },
        None,
    );
    assert_eq!(print_type(&store, f), "fn (url: string) -> string");
    store.bind_var(throws, TypeId::NEVER);
    assert_eq!(
        print_type(&store, f),
        "fn (url: string) -> string throws never"
    );
}

#[test]
fn test_print_variables_through_bindings() {
    let mut store = TypeStore::new();
    let v = store.fresh_var(None);
    assert_eq!(print_type(&store, v), "t0");
    store.bind_var(v, TypeId::BOOLEAN);
    assert_eq!(print_type(&store, v), "boolean");
}

#[test]
fn test_print_compound_forms() {
    let mut store = TypeStore::new();
    let r = store.type_ref(
        RefType {
            name: "Array".to_string(),
            args: [TypeId::NUMBER].into_iter().collect(),
            alias: None,
        },
        None,
    );
    assert_eq!(print_type(&store, r), "Array<number>");

    let obj = store.object(
        ObjectType {
            elems: vec![ObjElem::Property(PropertyElem {
                name: "foo".to_string(),
                ty: TypeId::STRING,
                optional: false,
                readonly: false,
            })],
            extends: TypeList::new(),
            nominal: false,
            sealed: false,
        },
        None,
    );
    assert_eq!(print_type(&store, obj), "{foo: string}");

    let keys = store.key_of(obj, None);
    assert_eq!(print_type(&store, keys), "keyof {foo: string}");

    let name_key = store.string_lit("foo", None);
    let access = store.alloc(
        TypeKind::Index(IndexType {
            target: obj,
            index: name_key,
        }),
        None,
    );
    assert_eq!(print_type(&store, access), "{foo: string}[\"foo\"]");
}
