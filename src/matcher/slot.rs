//! Child-slot references and scalar constraints.

use super::kinds::NodeMatcher;

/// A named child-slot reference inside a composite matcher.
///
/// The default is [`Slot::Unset`] — a wildcard that matches any child,
/// including a structurally absent one. [`Slot::Is`] never matches an absent
/// child; [`Slot::Absent`] matches only absence (the typed counterpart of the
/// NodePattern `nil?` predicate). Relaxing `Absent` or `Is` to `Unset` only
/// ever widens the accepted set.
pub enum Slot<A, C> {
    /// Wildcard: any child, present or absent.
    Unset,
    /// The child must be structurally absent.
    Absent,
    /// The child must be present and conform to the sub-matcher.
    Is(Box<NodeMatcher<A, C>>),
}

impl<A, C> Default for Slot<A, C> {
    fn default() -> Self {
        Slot::Unset
    }
}

impl<A, C> Slot<A, C> {
    /// Structural conformance of this slot against the actual child.
    pub fn test(&self, child: Option<&ruby_prism::Node<'_>>, cx: &C) -> bool {
        match self {
            Slot::Unset => true,
            Slot::Absent => child.is_none(),
            Slot::Is(m) => match child {
                Some(node) => m.test(node, cx),
                None => false,
            },
        }
    }

    /// The sub-matcher, if this slot is constrained to one.
    pub fn get(&self) -> Option<&NodeMatcher<A, C>> {
        match self {
            Slot::Is(m) => Some(m),
            _ => None,
        }
    }
}

/// Set a child slot to a sub-matcher.
pub fn one<A, C>(m: NodeMatcher<A, C>) -> Slot<A, C> {
    Slot::Is(Box::new(m))
}

/// Require a child slot to be structurally absent.
pub fn absent<A, C>() -> Slot<A, C> {
    Slot::Absent
}

/// An optional scalar byte-equality constraint on identifier, keyword, or
/// literal text. The default (`Name::default()`) is a wildcard. Comparison is
/// exact ordinal byte equality; no case folding, no locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Name(Option<Box<str>>);

impl Name {
    pub fn matches(&self, actual: impl AsRef<[u8]>) -> bool {
        match &self.0 {
            None => true,
            Some(want) => want.as_bytes() == actual.as_ref(),
        }
    }

    /// Whether this constraint is a wildcard.
    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Constrain a scalar to exactly the given text.
pub fn is(s: impl Into<Box<str>>) -> Name {
    Name(Some(s.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_default_is_wildcard() {
        let n = Name::default();
        assert!(n.is_unset());
        assert!(n.matches(b"anything"));
        assert!(n.matches(b""));
    }

    #[test]
    fn test_name_exact_bytes() {
        let n = is("require");
        assert!(n.matches(b"require"));
        assert!(!n.matches(b"Require"));
        assert!(!n.matches(b"require_relative"));
        assert_eq!(n.get(), Some("require"));
    }

    #[test]
    fn test_unset_slot_matches_absent() {
        let slot: Slot<(), ()> = Slot::default();
        assert!(slot.test(None, &()));
    }

    #[test]
    fn test_absent_slot_requires_absence() {
        let slot: Slot<(), ()> = absent();
        assert!(slot.test(None, &()));
        let result = ruby_prism::parse(b"42");
        let node = result.node();
        assert!(!slot.test(Some(&node), &()));
    }

    #[test]
    fn test_constrained_slot_never_matches_absent() {
        use crate::build::*;
        let slot: Slot<(), ()> = one(any());
        assert!(!slot.test(None, &()));
    }
}
