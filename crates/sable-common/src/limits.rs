//! Centralized limits and thresholds for the type engine.
//!
//! Every recursive operation in the engine carries an explicit bound; the
//! values live here so there is a single place to tune them and so no two
//! call sites disagree about a depth.

/// Maximum recursion depth for unification.
///
/// Comparing recursive structural types can re-enter `unify` once per
/// nesting level; past this depth the unifier gives up on the pair and
/// reports a mismatch instead of overflowing the stack.
pub const MAX_UNIFY_DEPTH: u32 = 100;

/// Maximum number of `Ref` expansions a single `expand` entry point may
/// perform when called with an unlimited (`-1`) budget.
///
/// Recursive aliases are marked by the parser and never expanded, so this
/// is a backstop against unmarked cycles, not a correctness bound.
pub const MAX_EXPANSION_STEPS: u32 = 64;

/// Maximum recursion depth for member access.
///
/// `getMember` recurses through unions, intersections and `extends` chains;
/// this bounds that walk.
pub const MAX_MEMBER_DEPTH: u32 = 64;

/// Maximum number of string combinations a template-literal type may expand
/// into.
///
/// `` `${A}-${B}` `` expands to `|A| × |B|` literal strings; past this cap
/// the template stays unexpanded rather than exhausting memory.
pub const TEMPLATE_EXPANSION_LIMIT: usize = 10_000;

/// Maximum union members when distributing a conditional alias over a
/// union argument.
pub const MAX_DISTRIBUTION_SIZE: usize = 100;

/// Maximum keys produced when expanding one mapped element.
pub const MAX_MAPPED_KEYS: usize = 500;

/// Inline capacity for type lists (union members, tuple elements, params).
///
/// Lists backed by `SmallVec<[TypeId; TYPE_LIST_INLINE]>` hold this many
/// elements without heap allocation; most unions and tuples in real code
/// are smaller.
pub const TYPE_LIST_INLINE: usize = 8;
