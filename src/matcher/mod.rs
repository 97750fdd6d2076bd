//! The matching engine.
//!
//! The generic machinery lives here and in `slot`/`seq`/`derive`; the per-kind
//! matchers are one table row each in `kinds`, expanded by the `matchers!`
//! macro. Two operations make up the contract:
//!
//! - `test(candidate, context) -> bool` — pure structural conformance. Never
//!   panics; every failure mode (wrong kind, constraint mismatch, required
//!   child absent) is just `false`.
//! - `fold(accumulator, candidate, context) -> accumulator` — bottom-up
//!   callback fold. Must only be called on a candidate a prior `test`
//!   accepted; the downcast is trusted and a violation panics.
//!
//! `fold` visits set child slots in the grammar's left-to-right field order,
//! threading the accumulator, and fires the matcher's own callback last, so
//! callbacks fire in strict post-order over the matched shape.

pub mod derive;
pub mod kinds;
pub mod seq;
pub mod slot;

/// A user predicate over a raw node and the semantic context, usable where a
/// structural matcher is not expressive enough. Must be pure: `test` relies
/// on it having no observable side effects.
pub type PredFn<C> =
    Box<dyn for<'pr> Fn(&ruby_prism::Node<'pr>, &C) -> bool + Send + Sync>;

/// Integer literal value, parsed from the node's source text with `_`
/// separators stripped. `None` for literals outside the `i64` range.
pub(crate) fn integer_value(node: &ruby_prism::IntegerNode<'_>) -> Option<i64> {
    let loc = node.location();
    let src = std::str::from_utf8(loc.as_slice()).ok()?;
    let cleaned: String = src.chars().filter(|c| *c != '_').collect();
    cleaned.parse().ok()
}
