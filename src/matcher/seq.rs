//! Ordered-child-sequence matching for variable-arity slots: argument lists,
//! statement bodies, array elements, interpolation parts.

use super::kinds::NodeMatcher;

/// Matches an ordered, possibly-empty child collection positionally.
///
/// Without `rest`, the candidate sequence must have exactly as many children
/// as there are element matchers, each conforming in order. With `rest`
/// (NodePattern `...`), extra trailing children are tolerated; the declared
/// elements still match the leading positions. An absent child collection
/// (e.g. a call with no argument list) is matched as the empty sequence.
pub struct SeqMatcher<A, C> {
    pub elems: Vec<NodeMatcher<A, C>>,
    pub rest: bool,
}

impl<A, C> Default for SeqMatcher<A, C> {
    fn default() -> Self {
        SeqMatcher { elems: Vec::new(), rest: true }
    }
}

impl<A, C> SeqMatcher<A, C> {
    /// Positional conformance test. Pure; never panics.
    pub fn test(&self, nodes: &[ruby_prism::Node<'_>], cx: &C) -> bool {
        if self.rest {
            if nodes.len() < self.elems.len() {
                return false;
            }
        } else if nodes.len() != self.elems.len() {
            return false;
        }
        self.elems.iter().zip(nodes).all(|(m, n)| m.test(n, cx))
    }

    /// Bottom-up fold over the matched leading positions, left to right.
    /// Children beyond the declared elements (under `rest`) are not visited.
    pub fn fold(&self, acc: A, nodes: &[ruby_prism::Node<'_>], cx: &mut C) -> A {
        let mut acc = acc;
        for (m, n) in self.elems.iter().zip(nodes) {
            acc = m.fold(acc, n, cx);
        }
        acc
    }
}

/// Test a sequence slot: an unset slot matches any children.
pub(crate) fn seq_slot_test<A, C>(
    slot: &Option<SeqMatcher<A, C>>,
    nodes: &[ruby_prism::Node<'_>],
    cx: &C,
) -> bool {
    match slot {
        None => true,
        Some(sm) => sm.test(nodes, cx),
    }
}

/// Exact-length sequence: the candidate must have exactly these children.
pub fn seq<A, C>(elems: impl Into<Vec<NodeMatcher<A, C>>>) -> Option<SeqMatcher<A, C>> {
    Some(SeqMatcher { elems: elems.into(), rest: false })
}

/// Leading-prefix sequence: these children first, anything after.
pub fn seq_rest<A, C>(elems: impl Into<Vec<NodeMatcher<A, C>>>) -> Option<SeqMatcher<A, C>> {
    Some(SeqMatcher { elems: elems.into(), rest: true })
}

/// Require an empty (or absent) child collection.
pub fn seq_empty<A, C>() -> Option<SeqMatcher<A, C>> {
    Some(SeqMatcher { elems: Vec::new(), rest: false })
}
