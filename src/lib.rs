//! Typed, composable shape matchers for ruby-prism ASTs.
//!
//! A [`NodeMatcher`] is an immutable description of an expected node shape:
//! a target node kind, optional scalar constraints (method name, literal
//! value, safe-navigation flag, ...), and optional sub-matchers for the
//! kind's named child slots. Matchers are built through the factory
//! functions in [`build`], tested against candidates with
//! [`NodeMatcher::test`], and, once a candidate is known to match, folded
//! bottom-up with [`NodeMatcher::fold`] (or [`NodeMatcher::run`] for the
//! side-effect-only case) to fire per-node callbacks in post-order.
//!
//! The string NodePattern DSL (`(send nil? :require ...)`) can be compiled
//! into a typed matcher via [`text::compile`].

pub mod matcher;
pub mod text;

#[cfg(test)]
pub mod testutil;

pub use matcher::kinds::NodeMatcher;
pub use matcher::seq::SeqMatcher;
pub use matcher::slot::{Name, Slot};
pub use text::{PatternError, compile};

/// Factory functions for every supported node kind, plus combinators.
///
/// Every field of a per-kind options struct defaults to "unconstrained", so
/// callers only name the constraints they care about:
///
/// ```ignore
/// use prism_matchers::build::*;
///
/// let pat: NodeMatcher = send(SendMatcher {
///     receiver: absent(),
///     name: is("require"),
///     ..Default::default()
/// });
/// ```
pub mod build {
    pub use crate::matcher::kinds::*;
    pub use crate::matcher::seq::{seq, seq_empty, seq_rest};
    pub use crate::matcher::slot::{absent, is, one};
}
