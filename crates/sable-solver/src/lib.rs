//! The sable type engine.
//!
//! This crate is the semantic core: a first-class type algebra closed
//! under unification, substitution and normalization, plus the machinery
//! for type-level computation (reference expansion, conditional and
//! mapped types, template-literal and `keyof` / indexed-access types).
//!
//! The module map follows the data flow:
//! - `types` / `store`: the tagged type sum and its arena
//! - `flags`: cached structural facts (closedness, infer binders)
//! - `visitor`: enter/exit traversal, the generic extension point
//! - `prune` / `substitute`: variable chasing and capture-avoiding
//!   substitution
//! - `unify`: structural equality / binding, diagnostics as values
//! - `member`: `T.name` and `T[K]` resolution
//! - `expand`: bounded rewriting of type-level computations
//! - `normalize`: intersection flattening and object merging
//! - `scope`: namespaces, bindings, aliases
//! - `display`: the canonical pretty-printer

pub mod display;
pub mod expand;
pub mod flags;
pub mod member;
pub mod normalize;
pub mod prune;
pub mod scope;
pub mod solver;
pub mod store;
pub mod substitute;
pub mod types;
pub mod unify;
pub mod visitor;

pub use display::print_type;
pub use expand::Budget;
pub use flags::TypeFlags;
pub use member::MemberKey;
pub use scope::{Binding, Namespace, Scope, TypeAlias};
pub use solver::Solver;
pub use store::{TypeData, TypeStore};
pub use substitute::{Subst, substitute};
pub use types::{
    CondType, FuncParam, FuncType, IndexType, Literal, MappedElem, Mutability, NamespaceRef,
    ObjElem, ObjectType, PrimKind, PropertyElem, RefType, RegexType, TemplateLitType, TypeId,
    TypeKind, TypeList, TypeParam, VarOrigin,
};
pub use visitor::{TypeVisitor, walk};
