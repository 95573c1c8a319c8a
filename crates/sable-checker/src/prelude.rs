//! The host-injected global scope.
//!
//! `prelude()` builds the built-in bindings explicitly; the engine itself
//! has no process-wide state. `Promise` is nominal (never structurally
//! expanded; unification goes through its type arguments), the wrapper
//! objects back member access on primitives, tuples and functions.

use sable_solver::{
    FuncParam, FuncType, Namespace, ObjElem, ObjectType, PropertyElem, RefType, Scope, TypeAlias,
    TypeId, TypeList, TypeParam, TypeStore,
};

use crate::engine::Engine;

impl Engine {
    /// Construct the built-in scope: `Promise`, `Array`, the primitive
    /// wrappers, `Function`, `Symbol` and the `JSX` namespace.
    pub fn prelude(&mut self) -> Scope {
        let store = &mut self.solver.store;
        let global = Namespace::new();
        {
            let mut ns = global.borrow_mut();
            ns.types
                .insert("Promise".to_string(), promise_alias(store).into());
            ns.types
                .insert("Array".to_string(), array_alias(store).into());
            ns.types
                .insert("Number".to_string(), number_wrapper(store).into());
            ns.types
                .insert("String".to_string(), string_wrapper(store).into());
            ns.types
                .insert("Boolean".to_string(), boolean_wrapper(store).into());
            ns.types
                .insert("BigInt".to_string(), bigint_wrapper(store).into());
            ns.types
                .insert("Function".to_string(), function_wrapper(store).into());
            ns.types
                .insert("Symbol".to_string(), symbol_wrapper(store).into());
            let jsx = Namespace::new();
            {
                let mut jsx_ns = jsx.borrow_mut();
                jsx_ns
                    .types
                    .insert("Element".to_string(), jsx_element_alias(store).into());
            }
            ns.namespaces.insert("JSX".to_string(), jsx);
        }
        Scope::with_global(global)
    }
}

fn type_param(name: &str) -> TypeParam {
    TypeParam {
        name: name.to_string(),
        constraint: None,
        default: None,
    }
}

/// A bare reference to a type-parameter name; substitution fills it in at
/// instantiation.
fn param_ref(store: &mut TypeStore, name: &str) -> TypeId {
    store.type_ref(
        RefType {
            name: name.to_string(),
            args: TypeList::new(),
            alias: None,
        },
        None,
    )
}

fn fn_type(store: &mut TypeStore, params: &[(&str, TypeId, bool)], ret: TypeId) -> TypeId {
    let params = params
        .iter()
        .map(|&(name, ty, optional)| FuncParam {
            name: name.to_string(),
            ty,
            optional,
        })
        .collect();
    store.func(
        FuncType {
            type_params: Vec::new(),
            self_ty: None,
            params,
            ret,
            throws: TypeId::NEVER,
        },
        None,
    )
}

fn method(
    store: &mut TypeStore,
    name: &str,
    params: &[(&str, TypeId, bool)],
    ret: TypeId,
) -> ObjElem {
    let func = fn_type(store, params, ret);
    ObjElem::Method {
        name: name.to_string(),
        func,
    }
}

fn property(name: &str, ty: TypeId) -> ObjElem {
    ObjElem::Property(PropertyElem {
        name: name.to_string(),
        ty,
        optional: false,
        readonly: false,
    })
}

fn wrapper_object(store: &mut TypeStore, elems: Vec<ObjElem>, nominal: bool) -> TypeId {
    store.object(
        ObjectType {
            elems,
            extends: TypeList::new(),
            nominal,
            sealed: false,
        },
        None,
    )
}

fn promise_alias(store: &mut TypeStore) -> TypeAlias {
    let t = param_ref(store, "T");
    let e = param_ref(store, "E");
    let on_fulfilled = fn_type(store, &[("value", t, false)], TypeId::UNKNOWN);
    let on_rejected = fn_type(store, &[("reason", e, false)], TypeId::UNKNOWN);
    let on_finally = fn_type(store, &[], TypeId::UNKNOWN);
    let elems = vec![
        method(
            store,
            "then",
            &[
                ("on_fulfilled", on_fulfilled, false),
                ("on_rejected", on_rejected, true),
            ],
            TypeId::UNKNOWN,
        ),
        method(store, "catch", &[("on_rejected", on_rejected, false)], TypeId::UNKNOWN),
        method(store, "finally", &[("on_finally", on_finally, false)], TypeId::UNKNOWN),
    ];
    let body = wrapper_object(store, elems, true);
    TypeAlias {
        type_params: vec![type_param("T"), type_param("E")],
        ty: body,
        recursive: false,
    }
}

fn array_ref(store: &mut TypeStore, elem: TypeId) -> TypeId {
    let mut args = TypeList::new();
    args.push(elem);
    store.type_ref(
        RefType {
            name: "Array".to_string(),
            args,
            alias: None,
        },
        None,
    )
}

fn array_alias(store: &mut TypeStore) -> TypeAlias {
    let t = param_ref(store, "T");
    let self_array = array_ref(store, t);
    let t_or_undefined = store.union([t, TypeId::UNDEFINED], None);
    let predicate = fn_type(store, &[("item", t, false)], TypeId::BOOLEAN);

    // map is generic in its result element.
    let u = param_ref(store, "U");
    let mapper = fn_type(store, &[("item", t, false)], u);
    let u_array = array_ref(store, u);
    let map_fn = store.func(
        FuncType {
            type_params: vec![type_param("U")],
            self_ty: None,
            params: vec![FuncParam {
                name: "callback".to_string(),
                ty: mapper,
                optional: false,
            }],
            ret: u_array,
            throws: TypeId::NEVER,
        },
        None,
    );

    let elems = vec![
        property("length", TypeId::NUMBER),
        method(store, "push", &[("item", t, false)], TypeId::NUMBER),
        method(store, "pop", &[], t_or_undefined),
        method(store, "includes", &[("item", t, false)], TypeId::BOOLEAN),
        method(store, "indexOf", &[("item", t, false)], TypeId::NUMBER),
        method(store, "join", &[("separator", TypeId::STRING, true)], TypeId::STRING),
        method(
            store,
            "slice",
            &[("start", TypeId::NUMBER, true), ("end", TypeId::NUMBER, true)],
            self_array,
        ),
        method(store, "concat", &[("other", self_array, false)], self_array),
        ObjElem::Method {
            name: "map".to_string(),
            func: map_fn,
        },
        method(store, "filter", &[("predicate", predicate, false)], self_array),
    ];
    let body = wrapper_object(store, elems, false);
    TypeAlias {
        type_params: vec![type_param("T")],
        ty: body,
        recursive: false,
    }
}

fn number_wrapper(store: &mut TypeStore) -> TypeAlias {
    let elems = vec![
        method(store, "toString", &[("radix", TypeId::NUMBER, true)], TypeId::STRING),
        method(store, "toFixed", &[("digits", TypeId::NUMBER, true)], TypeId::STRING),
        method(store, "valueOf", &[], TypeId::NUMBER),
    ];
    let body = wrapper_object(store, elems, false);
    TypeAlias::simple(body)
}

fn string_wrapper(store: &mut TypeStore) -> TypeAlias {
    let string_array = array_ref(store, TypeId::STRING);
    let elems = vec![
        property("length", TypeId::NUMBER),
        method(store, "includes", &[("search", TypeId::STRING, false)], TypeId::BOOLEAN),
        method(store, "startsWith", &[("search", TypeId::STRING, false)], TypeId::BOOLEAN),
        method(store, "endsWith", &[("search", TypeId::STRING, false)], TypeId::BOOLEAN),
        method(
            store,
            "slice",
            &[("start", TypeId::NUMBER, true), ("end", TypeId::NUMBER, true)],
            TypeId::STRING,
        ),
        method(store, "toUpperCase", &[], TypeId::STRING),
        method(store, "toLowerCase", &[], TypeId::STRING),
        method(store, "trim", &[], TypeId::STRING),
        method(store, "charAt", &[("index", TypeId::NUMBER, false)], TypeId::STRING),
        method(store, "split", &[("separator", TypeId::STRING, false)], string_array),
    ];
    let body = wrapper_object(store, elems, false);
    TypeAlias::simple(body)
}

fn boolean_wrapper(store: &mut TypeStore) -> TypeAlias {
    let elems = vec![
        method(store, "valueOf", &[], TypeId::BOOLEAN),
        method(store, "toString", &[], TypeId::STRING),
    ];
    let body = wrapper_object(store, elems, false);
    TypeAlias::simple(body)
}

fn bigint_wrapper(store: &mut TypeStore) -> TypeAlias {
    let elems = vec![method(store, "toString", &[], TypeId::STRING)];
    let body = wrapper_object(store, elems, false);
    TypeAlias::simple(body)
}

fn function_wrapper(store: &mut TypeStore) -> TypeAlias {
    let unknown_array = array_ref(store, TypeId::UNKNOWN);
    let function_ref = store.type_ref(
        RefType {
            name: "Function".to_string(),
            args: TypeList::new(),
            alias: None,
        },
        None,
    );
    let elems = vec![
        method(store, "call", &[("self_arg", TypeId::UNKNOWN, false)], TypeId::UNKNOWN),
        method(
            store,
            "apply",
            &[("self_arg", TypeId::UNKNOWN, false), ("args", unknown_array, true)],
            TypeId::UNKNOWN,
        ),
        method(store, "bind", &[("self_arg", TypeId::UNKNOWN, false)], function_ref),
    ];
    let body = wrapper_object(store, elems, false);
    TypeAlias::simple(body)
}

fn symbol_wrapper(store: &mut TypeStore) -> TypeAlias {
    let elems = vec![
        property("description", TypeId::STRING),
        method(store, "toString", &[], TypeId::STRING),
    ];
    let body = wrapper_object(store, elems, false);
    TypeAlias::simple(body)
}

fn jsx_element_alias(store: &mut TypeStore) -> TypeAlias {
    let body = wrapper_object(store, Vec::new(), true);
    TypeAlias::simple(body)
}
