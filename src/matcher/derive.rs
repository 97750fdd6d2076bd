//! Derivation of per-kind matchers from a descriptor table.
//!
//! `matchers!` takes one row per grammar production — variant name, options
//! struct name, builder/hook function names, target prism type, downcast
//! method, kind tag — plus a list of `field: slot_kind (accessor)` lines,
//! and expands the options struct, its `Default`, the factory function, the
//! callback wrapper, the `NodeMatcher` enum variant, and the `test`/`fold`
//! match arms. Slot kinds:
//!
//! - `req` / `opt` — required / optional node child (`fn() -> Node` /
//!   `fn() -> Option<Node>`)
//! - `req_into` / `opt_into` — typed child lowered via `.as_node()`
//! - `name` / `name_opt` — `ConstantId` scalar, exact byte equality
//! - `text` — byte-content scalar (e.g. `unescaped()`)
//! - `src_text` — scalar compared against the node's raw source slice
//! - `int_src` — integer literal value parsed from source
//! - `flag` — boolean constraint; the accessor expression must yield `bool`
//! - `list` — `NodeList` child collection, matched positionally
//! - `args` — `Option<ArgumentsNode>` collection, absent treated as empty

macro_rules! slot_ty {
    (req, $A:ty, $C:ty) => { $crate::matcher::slot::Slot<$A, $C> };
    (req_into, $A:ty, $C:ty) => { $crate::matcher::slot::Slot<$A, $C> };
    (opt, $A:ty, $C:ty) => { $crate::matcher::slot::Slot<$A, $C> };
    (opt_into, $A:ty, $C:ty) => { $crate::matcher::slot::Slot<$A, $C> };
    (name, $A:ty, $C:ty) => { $crate::matcher::slot::Name };
    (name_opt, $A:ty, $C:ty) => { $crate::matcher::slot::Name };
    (text, $A:ty, $C:ty) => { $crate::matcher::slot::Name };
    (src_text, $A:ty, $C:ty) => { $crate::matcher::slot::Name };
    (int_src, $A:ty, $C:ty) => { Option<i64> };
    (flag, $A:ty, $C:ty) => { Option<bool> };
    (list, $A:ty, $C:ty) => { Option<$crate::matcher::seq::SeqMatcher<$A, $C>> };
    (args, $A:ty, $C:ty) => { Option<$crate::matcher::seq::SeqMatcher<$A, $C>> };
}

macro_rules! slot_test {
    (req, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {{
        let child = $n.$($a)*;
        $m.test(Some(&child), $cx)
    }};
    (req_into, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {{
        let child = $n.$($a)*.as_node();
        $m.test(Some(&child), $cx)
    }};
    (opt, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {
        $m.test($n.$($a)*.as_ref(), $cx)
    };
    (opt_into, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {
        $m.test($n.$($a)*.map(|x| x.as_node()).as_ref(), $cx)
    };
    (name, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {
        $m.matches($n.$($a)*.as_slice())
    };
    (name_opt, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {
        match $n.$($a)* {
            Some(id) => $m.matches(id.as_slice()),
            None => $m.is_unset(),
        }
    };
    (text, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {
        $m.matches($n.$($a)*)
    };
    (src_text, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {
        $m.matches($n.location().as_slice())
    };
    (int_src, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {
        match $m {
            None => true,
            Some(want) => $crate::matcher::integer_value(&$n) == Some(want),
        }
    };
    (flag, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {
        match $m {
            None => true,
            Some(want) => ($n.$($a)*) == want,
        }
    };
    (list, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {{
        let kids: Vec<_> = $n.$($a)*.iter().collect();
        $crate::matcher::seq::seq_slot_test(&$m, &kids, $cx)
    }};
    (args, $m:expr, $n:ident, $cx:ident, ($($a:tt)*)) => {{
        let kids: Vec<_> = $n
            .$($a)*
            .map(|args| args.arguments().iter().collect::<Vec<_>>())
            .unwrap_or_default();
        $crate::matcher::seq::seq_slot_test(&$m, &kids, $cx)
    }};
}

macro_rules! slot_fold {
    (req, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {
        if let Some(p) = $m.get() {
            let child = $n.$($a)*;
            $acc = p.fold($acc, &child, $cx);
        }
    };
    (req_into, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {
        if let Some(p) = $m.get() {
            let child = $n.$($a)*.as_node();
            $acc = p.fold($acc, &child, $cx);
        }
    };
    (opt, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {
        if let Some(p) = $m.get() {
            if let Some(child) = $n.$($a)* {
                $acc = p.fold($acc, &child, $cx);
            }
        }
    };
    (opt_into, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {
        if let Some(p) = $m.get() {
            if let Some(child) = $n.$($a)*.map(|x| x.as_node()) {
                $acc = p.fold($acc, &child, $cx);
            }
        }
    };
    // Scalar constraints carry no sub-matchers; nothing to visit.
    (name, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {};
    (name_opt, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {};
    (text, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {};
    (src_text, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {};
    (int_src, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {};
    (flag, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {};
    (list, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {
        if let Some(sm) = &$m {
            let kids: Vec<_> = $n.$($a)*.iter().collect();
            $acc = sm.fold($acc, &kids, $cx);
        }
    };
    (args, $m:expr, $n:ident, $acc:ident, $cx:ident, ($($a:tt)*)) => {
        if let Some(sm) = &$m {
            let kids: Vec<_> = $n
                .$($a)*
                .map(|args| args.arguments().iter().collect::<Vec<_>>())
                .unwrap_or_default();
            $acc = sm.fold($acc, &kids, $cx);
        }
    };
}

macro_rules! matchers {
    (
        $(
            $(#[$doc:meta])*
            $Variant:ident / $Struct:ident / $builder:ident / $hook:ident :
                $PrismTy:ident / $cast:ident / $tag:literal {
                    $( $field:ident : $sk:ident ( $($a:tt)* ) ),* $(,)?
                }
        )*
    ) => {
        $(
            $(#[$doc])*
            ///
            /// Every field defaults to "unconstrained"; construct with struct
            /// update syntax and name only the constraints that matter.
            pub struct $Struct<A = (), C = ()> {
                $( pub $field: $crate::matcher::derive::slot_ty!($sk, A, C), )*
                /// Callback fired last on each successful bottom-up visit,
                /// after all of this matcher's own child slots.
                pub then: Option<
                    Box<dyn for<'pr> Fn(A, &ruby_prism::$PrismTy<'pr>, &mut C) -> A + Send + Sync>,
                >,
            }

            impl<A, C> Default for $Struct<A, C> {
                fn default() -> Self {
                    Self {
                        $( $field: Default::default(), )*
                        then: None,
                    }
                }
            }

            $(#[$doc])*
            pub fn $builder<A, C>(m: $Struct<A, C>) -> NodeMatcher<A, C> {
                NodeMatcher::$Variant(Box::new(m))
            }

            /// Wrap a callback for this kind's `then` field.
            pub fn $hook<A, C>(
                f: impl for<'pr> Fn(A, &ruby_prism::$PrismTy<'pr>, &mut C) -> A
                    + Send
                    + Sync
                    + 'static,
            ) -> Option<
                Box<dyn for<'pr> Fn(A, &ruby_prism::$PrismTy<'pr>, &mut C) -> A + Send + Sync>,
            > {
                Some(Box::new(f))
            }
        )*

        /// An immutable, composable matcher for one expected node shape.
        ///
        /// `A` is the accumulator threaded through [`NodeMatcher::fold`];
        /// `C` is the caller's opaque semantic context, passed through every
        /// call and never interpreted here. Both default to `()`.
        pub enum NodeMatcher<A = (), C = ()> {
            /// Any present node, of any kind.
            Any,
            /// Matches if any alternative matches; `fold` visits the first
            /// alternative that matches.
            AnyOf(Vec<NodeMatcher<A, C>>),
            /// Matches if every part matches; `fold` visits each in order.
            AllOf(Vec<NodeMatcher<A, C>>),
            /// Matches when the inner matcher does not; `fold` visits nothing.
            Not(Box<NodeMatcher<A, C>>),
            /// User predicate over the raw node and the semantic context.
            Pred($crate::matcher::PredFn<C>),
            $( $Variant(Box<$Struct<A, C>>), )*
        }

        impl<A, C> NodeMatcher<A, C> {
            /// Pure structural conformance test. Total; never panics; every
            /// failure mode is `false`.
            pub fn test(&self, node: &ruby_prism::Node<'_>, cx: &C) -> bool {
                match self {
                    NodeMatcher::Any => true,
                    NodeMatcher::AnyOf(alts) => alts.iter().any(|m| m.test(node, cx)),
                    NodeMatcher::AllOf(all) => all.iter().all(|m| m.test(node, cx)),
                    NodeMatcher::Not(inner) => !inner.test(node, cx),
                    NodeMatcher::Pred(f) => f(node, cx),
                    $(
                        NodeMatcher::$Variant(m) => {
                            let Some(n) = node.$cast() else { return false };
                            let _ = &n;
                            true $( && $crate::matcher::derive::slot_test!($sk, m.$field, n, cx, ($($a)*)) )*
                        }
                    )*
                }
            }

            /// [`NodeMatcher::test`] against a possibly-absent candidate.
            /// Absence never matches a matcher (only an unset or `Absent`
            /// [`Slot`](crate::Slot) accepts absence).
            pub fn test_opt(&self, node: Option<&ruby_prism::Node<'_>>, cx: &C) -> bool {
                match node {
                    Some(n) => self.test(n, cx),
                    None => false,
                }
            }

            /// Bottom-up callback fold.
            ///
            /// Precondition: `test` already accepted this exact candidate.
            /// The downcast is trusted; calling `fold` on a non-conforming
            /// candidate is a caller bug and panics.
            pub fn fold(&self, acc: A, node: &ruby_prism::Node<'_>, cx: &mut C) -> A {
                match self {
                    NodeMatcher::Any | NodeMatcher::Not(_) | NodeMatcher::Pred(_) => acc,
                    NodeMatcher::AnyOf(alts) => {
                        for m in alts {
                            if m.test(node, cx) {
                                return m.fold(acc, node, cx);
                            }
                        }
                        acc
                    }
                    NodeMatcher::AllOf(all) => {
                        let mut acc = acc;
                        for m in all {
                            acc = m.fold(acc, node, cx);
                        }
                        acc
                    }
                    $(
                        NodeMatcher::$Variant(m) => {
                            let n = node.$cast().unwrap_or_else(|| {
                                panic!("fold on a candidate that is not {}", $tag)
                            });
                            let mut acc = acc;
                            $( $crate::matcher::derive::slot_fold!($sk, m.$field, n, acc, cx, ($($a)*)); )*
                            if let Some(hook) = &m.then {
                                acc = hook(acc, &n, cx);
                            }
                            acc
                        }
                    )*
                }
            }

            /// The NodePattern-style name of this matcher's target kind.
            pub fn kind_name(&self) -> &'static str {
                match self {
                    NodeMatcher::Any => "any",
                    NodeMatcher::AnyOf(_) => "any_of",
                    NodeMatcher::AllOf(_) => "all_of",
                    NodeMatcher::Not(_) => "not",
                    NodeMatcher::Pred(_) => "pred",
                    $( NodeMatcher::$Variant(_) => $tag, )*
                }
            }
        }

        impl<C> NodeMatcher<(), C> {
            /// Side-effect-only variant of [`NodeMatcher::fold`]: the
            /// degenerate fold with a unit accumulator. Same precondition.
            pub fn run(&self, node: &ruby_prism::Node<'_>, cx: &mut C) {
                self.fold((), node, cx);
            }
        }

        impl<A, C> std::fmt::Debug for NodeMatcher<A, C> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "NodeMatcher({})", self.kind_name())
            }
        }
    };
}

pub(crate) use {matchers, slot_fold, slot_test, slot_ty};
