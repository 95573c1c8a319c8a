//! Scopes and namespaces.
//!
//! A `Namespace` holds three name→X maps: value bindings, type aliases and
//! nested namespaces. A `Scope` is a stack of namespace frames; resolution
//! searches the innermost frame then walks outward. The maps are
//! `IndexMap`s so iteration (keyof on a namespace, diagnostics about
//! required props) is deterministic.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::types::{NamespaceRef, TypeId, TypeParam};

/// A value binding: a type plus whether the binding may be reassigned.
#[derive(Clone, Debug)]
pub struct Binding {
    pub ty: TypeId,
    pub mutable: bool,
}

impl Binding {
    pub fn immutable(ty: TypeId) -> Self {
        Binding { ty, mutable: false }
    }

    pub fn mutable(ty: TypeId) -> Self {
        Binding { ty, mutable: true }
    }
}

/// A (possibly generic) named type. `recursive` is the parser's mark: the
/// body mentions the alias itself, so the expansion engine must treat
/// references to it as opaque.
#[derive(Clone, Debug)]
pub struct TypeAlias {
    pub type_params: Vec<TypeParam>,
    pub ty: TypeId,
    pub recursive: bool,
}

impl TypeAlias {
    pub fn simple(ty: TypeId) -> Self {
        TypeAlias {
            type_params: Vec::new(),
            ty,
            recursive: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Namespace {
    pub values: IndexMap<String, Binding>,
    pub types: IndexMap<String, Rc<TypeAlias>>,
    pub namespaces: IndexMap<String, NamespaceRef>,
}

impl Namespace {
    pub fn new() -> NamespaceRef {
        Rc::new(RefCell::new(Namespace::default()))
    }
}

/// A lexical chain of namespaces. The innermost frame is mutable; outer
/// frames are shared with enclosing scopes. The outermost frame is the
/// host-injected global scope (`Promise`, `Array`, `JSX.*`, …).
#[derive(Clone, Debug)]
pub struct Scope {
    frames: Vec<NamespaceRef>,
}

impl Scope {
    /// A scope with a single fresh frame.
    pub fn new() -> Self {
        Scope {
            frames: vec![Namespace::new()],
        }
    }

    /// A scope whose base frame is the given namespace (used for the
    /// global/prelude frame).
    pub fn with_global(global: NamespaceRef) -> Self {
        Scope {
            frames: vec![global, Namespace::new()],
        }
    }

    /// The innermost (mutable) frame.
    pub fn current(&self) -> &NamespaceRef {
        self.frames.last().expect("scope has at least one frame")
    }

    /// A child scope: same chain plus a fresh innermost frame.
    pub fn with_new_scope(&self) -> Scope {
        let mut frames = self.frames.clone();
        frames.push(Namespace::new());
        Scope { frames }
    }

    /// A child scope whose innermost frame is an existing namespace
    /// (entering `namespace N { … }`).
    pub fn with_new_scope_and_namespace(&self, ns: NamespaceRef) -> Scope {
        let mut frames = self.frames.clone();
        frames.push(ns);
        Scope { frames }
    }

    pub fn get_value(&self, name: &str) -> Option<Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|f| f.borrow().values.get(name).cloned())
    }

    pub fn set_value(&mut self, name: impl Into<String>, binding: Binding) {
        self.current().borrow_mut().values.insert(name.into(), binding);
    }

    pub fn get_type_alias(&self, name: &str) -> Option<Rc<TypeAlias>> {
        self.frames
            .iter()
            .rev()
            .find_map(|f| f.borrow().types.get(name).cloned())
    }

    pub fn set_type_alias(&mut self, name: impl Into<String>, alias: TypeAlias) {
        self.current()
            .borrow_mut()
            .types
            .insert(name.into(), Rc::new(alias));
    }

    pub fn get_namespace(&self, name: &str) -> Option<NamespaceRef> {
        self.frames
            .iter()
            .rev()
            .find_map(|f| f.borrow().namespaces.get(name).cloned())
    }

    pub fn set_namespace(&mut self, name: impl Into<String>, ns: NamespaceRef) {
        self.current()
            .borrow_mut()
            .namespaces
            .insert(name.into(), ns);
    }

    /// Resolve a dotted alias name (`JSX.Element`): all parts but the last
    /// are namespaces, the last is a type alias.
    pub fn lookup_alias_path(&self, dotted: &str) -> Option<Rc<TypeAlias>> {
        let mut parts = dotted.split('.');
        let first = parts.next()?;
        let rest: Vec<&str> = parts.collect();
        if rest.is_empty() {
            return self.get_type_alias(first);
        }
        let mut ns = self.get_namespace(first)?;
        for part in &rest[..rest.len() - 1] {
            let next = ns.borrow().namespaces.get(*part).cloned()?;
            ns = next;
        }
        let last = rest.last().expect("rest is non-empty");
        let alias = ns.borrow().types.get(*last).cloned();
        alias
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::new()
    }
}
