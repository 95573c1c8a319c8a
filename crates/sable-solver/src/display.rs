//! The type pretty-printer.
//!
//! Emits the canonical forms the rest of the tooling (and the test suite)
//! expects: `fn (url: string) -> Promise<"data", never> throws never`,
//! `{foo: string, bar: fn <T>(t: T) -> T}`, `Array<number>`.
//!
//! Variables are printed through their bindings; a `throws` clause whose
//! pruned type is still an unbound variable is omitted (the function body
//! never constrained it).

use crate::store::TypeStore;
use crate::types::{FuncType, Literal, Mutability, ObjElem, TypeId, TypeKind};

pub fn print_type(store: &TypeStore, t: TypeId) -> String {
    let t = store.resolve(t);
    match store.kind(t) {
        TypeKind::Var(v) => format!("t{}", v.id),
        TypeKind::Prim(k) => k.name().to_string(),
        TypeKind::Lit(lit) => print_literal(lit),
        TypeKind::Never => "never".to_string(),
        TypeKind::Unknown => "unknown".to_string(),
        TypeKind::Any => "any".to_string(),
        TypeKind::Null => "null".to_string(),
        TypeKind::Undefined => "undefined".to_string(),
        TypeKind::Void => "void".to_string(),
        TypeKind::Func(f) => print_func(store, f),
        TypeKind::Object(o) => {
            let elems: Vec<String> = o.elems.iter().map(|e| print_elem(store, e)).collect();
            format!("{{{}}}", elems.join(", "))
        }
        TypeKind::Tuple(elems) => {
            let parts: Vec<String> = elems.iter().map(|&e| print_type(store, e)).collect();
            format!("[{}]", parts.join(", "))
        }
        TypeKind::Union(members) => {
            let parts: Vec<String> = members.iter().map(|&m| print_type(store, m)).collect();
            parts.join(" | ")
        }
        TypeKind::Intersection(members) => {
            let parts: Vec<String> = members
                .iter()
                .map(|&m| {
                    let needs_parens =
                        matches!(store.kind(store.resolve(m)), TypeKind::Union(_));
                    let s = print_type(store, m);
                    if needs_parens { format!("({s})") } else { s }
                })
                .collect();
            parts.join(" & ")
        }
        TypeKind::Ref(r) => {
            if r.args.is_empty() {
                r.name.clone()
            } else {
                let args: Vec<String> = r.args.iter().map(|&a| print_type(store, a)).collect();
                format!("{}<{}>", r.name, args.join(", "))
            }
        }
        TypeKind::KeyOf(inner) => format!("keyof {}", print_operand(store, *inner)),
        TypeKind::Index(ix) => format!(
            "{}[{}]",
            print_operand(store, ix.target),
            print_type(store, ix.index)
        ),
        TypeKind::TypeOf(parts) => format!("typeof {}", parts.join(".")),
        TypeKind::Cond(c) => format!(
            "{} extends {} ? {} : {}",
            print_type(store, c.check),
            print_type(store, c.extends),
            print_type(store, c.then_ty),
            print_type(store, c.else_ty)
        ),
        TypeKind::Infer(name) => format!("infer {name}"),
        TypeKind::TemplateLit(tpl) => {
            let mut out = String::from("`");
            for (i, quasi) in tpl.quasis.iter().enumerate() {
                out.push_str(quasi);
                if let Some(&hole) = tpl.types.get(i) {
                    out.push_str("${");
                    out.push_str(&print_type(store, hole));
                    out.push('}');
                }
            }
            out.push('`');
            out
        }
        TypeKind::Regex(r) => format!("/{}/", r.pattern),
        TypeKind::Namespace(_) => "namespace".to_string(),
        TypeKind::Mutability { inner, mutability } => match mutability {
            Mutability::ReadOnly => format!("readonly {}", print_operand(store, *inner)),
            Mutability::ReadWrite | Mutability::Uncertain => print_type(store, *inner),
        },
        TypeKind::UniqueSymbol(_) => "unique symbol".to_string(),
    }
}

/// An operand position that binds tighter than `|` / `&` / `extends`.
fn print_operand(store: &TypeStore, t: TypeId) -> String {
    let s = print_type(store, t);
    match store.kind(store.resolve(t)) {
        TypeKind::Union(_) | TypeKind::Intersection(_) | TypeKind::Func(_) | TypeKind::Cond(_) => {
            format!("({s})")
        }
        _ => s,
    }
}

fn print_literal(lit: &Literal) -> String {
    match lit {
        Literal::Number(n) => print_number(*n),
        Literal::String(s) => format!("\"{s}\""),
        Literal::Boolean(b) => b.to_string(),
        Literal::BigInt(s) => format!("{s}n"),
    }
}

pub(crate) fn print_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn print_func(store: &TypeStore, f: &FuncType) -> String {
    let mut out = String::from("fn ");
    if !f.type_params.is_empty() {
        let tps: Vec<String> = f
            .type_params
            .iter()
            .map(|tp| {
                let mut s = tp.name.clone();
                if let Some(c) = tp.constraint {
                    s.push_str(" extends ");
                    s.push_str(&print_type(store, c));
                }
                if let Some(d) = tp.default {
                    s.push_str(" = ");
                    s.push_str(&print_type(store, d));
                }
                s
            })
            .collect();
        out.push('<');
        out.push_str(&tps.join(", "));
        out.push('>');
    }
    out.push('(');
    let mut parts: Vec<String> = Vec::new();
    if let Some(self_ty) = f.self_ty {
        parts.push(format!("self: {}", print_type(store, self_ty)));
    }
    for p in &f.params {
        let opt = if p.optional { "?" } else { "" };
        parts.push(format!("{}{}: {}", p.name, opt, print_type(store, p.ty)));
    }
    out.push_str(&parts.join(", "));
    out.push_str(") -> ");
    out.push_str(&print_type(store, f.ret));
    // An unbound throws variable means the body never threw and the
    // signature never promised anything; leave it out.
    let throws = store.resolve(f.throws);
    if !matches!(store.kind(throws), TypeKind::Var(_)) {
        out.push_str(" throws ");
        out.push_str(&print_type(store, throws));
    }
    out
}

#[cfg(test)]
#[path = "tests/display.rs"]
mod tests;

fn print_elem(store: &TypeStore, elem: &ObjElem) -> String {
    match elem {
        ObjElem::Property(p) => {
            let ro = if p.readonly { "readonly " } else { "" };
            let opt = if p.optional { "?" } else { "" };
            format!("{}{}{}: {}", ro, p.name, opt, print_type(store, p.ty))
        }
        ObjElem::Method { name, func } => format!("{}: {}", name, print_type(store, *func)),
        ObjElem::Getter { name, ret } => format!("get {}() -> {}", name, print_type(store, *ret)),
        ObjElem::Setter { name, param } => {
            format!("set {}(value: {})", name, print_type(store, *param))
        }
        ObjElem::Callable(f) => print_type(store, *f),
        ObjElem::Constructor(f) => format!("new {}", print_type(store, *f)),
        ObjElem::Mapped(m) => {
            let opt = match m.optional {
                Some(true) => "?",
                Some(false) => "-?",
                None => "",
            };
            let ro = match m.readonly {
                Some(true) => "readonly ",
                Some(false) => "-readonly ",
                None => "",
            };
            format!(
                "{}[{} in {}]{}: {}",
                ro,
                m.binder,
                print_type(store, m.constraint),
                opt,
                print_type(store, m.value)
            )
        }
        ObjElem::RestSpread(s) => format!("...{}", print_type(store, *s)),
    }
}
