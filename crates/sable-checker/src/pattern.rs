//! Binding patterns: each pattern produces a pattern type (built from
//! fresh variables at the identifier leaves) plus the set of identifier
//! bindings it introduces. Unifying the pattern type against the matched
//! value's type is what gives every binding its type.

use sable_ast::pattern::{Pattern, PatternKind};
use sable_solver::{ObjElem, ObjectType, PropertyElem, TypeId, TypeList};

use crate::engine::Engine;

impl Engine {
    pub(crate) fn infer_pattern(&mut self, pattern: &Pattern) -> (TypeId, Vec<(String, TypeId)>) {
        let mut bindings = Vec::new();
        let ty = self.pattern_type(pattern, &mut bindings);
        (ty, bindings)
    }

    fn pattern_type(&mut self, pattern: &Pattern, bindings: &mut Vec<(String, TypeId)>) -> TypeId {
        let span = Some(pattern.span);
        match &pattern.kind {
            PatternKind::Ident(name) => {
                let var = self.solver.store.fresh_var(span);
                bindings.push((name.clone(), var));
                var
            }
            PatternKind::Tuple(pats) => {
                let elems: TypeList = pats
                    .iter()
                    .map(|p| self.pattern_type(p, bindings))
                    .collect();
                self.solver.store.tuple(elems, span)
            }
            PatternKind::Object(props) => {
                let elems = props
                    .iter()
                    .map(|prop| {
                        let ty = match &prop.value {
                            Some(inner) => self.pattern_type(inner, bindings),
                            None => {
                                // Shorthand `{x}` binds `x` itself.
                                let var = self.solver.store.fresh_var(Some(prop.span));
                                bindings.push((prop.key.name.clone(), var));
                                var
                            }
                        };
                        ObjElem::Property(PropertyElem {
                            name: prop.key.name.clone(),
                            ty,
                            optional: false,
                            readonly: false,
                        })
                    })
                    .collect();
                self.solver.store.object(
                    ObjectType {
                        elems,
                        extends: TypeList::new(),
                        nominal: false,
                        sealed: false,
                    },
                    span,
                )
            }
        }
    }

    /// A display name for a parameter introduced by a pattern.
    pub(crate) fn param_name(pattern: &Pattern, index: usize) -> String {
        match &pattern.kind {
            PatternKind::Ident(name) => name.clone(),
            _ => format!("arg{index}"),
        }
    }
}
