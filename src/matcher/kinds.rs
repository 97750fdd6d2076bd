//! Per-kind matcher instantiations.
//!
//! One table row per grammar production; the `matchers!` macro in `derive`
//! derives the options struct, factory function, callback wrapper, and the
//! `test`/`fold` arms for each. Kind tags and builder names follow the
//! Parser-gem vocabulary (`send`, `lvar`, `casgn`, ...); slot accessors are
//! the corresponding ruby-prism child accessors.

use super::derive::matchers;
use super::slot::is;

matchers! {
    /// Method call: `obj.foo(a, b)`, `foo x`, `obj&.foo`. Safe navigation
    /// (`&.`) is a flag constraint rather than a separate kind.
    Send / SendMatcher / send / on_send :
        CallNode / as_call_node / "send" {
            receiver: opt (receiver()),
            name: name (name()),
            args: args (arguments()),
            block: opt (block()),
            safe_navigation: flag (call_operator_loc().is_some_and(|l| l.as_slice() == b"&.")),
        }

    /// Brace or `do` block attached to a call. The owning call is the
    /// block's parent in prism, not a child; match it via `SendMatcher`'s
    /// `block` slot.
    Block / BlockMatcher / block / on_block :
        BlockNode / as_block_node / "block" {
            params: opt (parameters()),
            body: opt (body()),
        }

    /// Method definition, instance or singleton: `def foo` has an absent
    /// receiver, `def self.foo` a present one.
    Def / DefMatcher / def / on_def :
        DefNode / as_def_node / "def" {
            receiver: opt (receiver()),
            name: name (name()),
            params: opt_into (parameters()),
            body: opt (body()),
        }

    /// Bare constant read: `Foo`.
    Const / ConstMatcher / const_ / on_const :
        ConstantReadNode / as_constant_read_node / "const" {
            name: name (name()),
        }

    /// Qualified constant path: `Foo::Bar`, `::Baz` (absent parent).
    ConstPath / ConstPathMatcher / const_path / on_const_path :
        ConstantPathNode / as_constant_path_node / "const_path" {
            parent: opt (parent()),
            name: name_opt (name()),
        }

    /// `begin ... rescue ... else ... ensure ... end`.
    Begin / BeginMatcher / begin / on_begin :
        BeginNode / as_begin_node / "begin" {
            body: opt_into (statements()),
            rescue_clause: opt_into (rescue_clause()),
            else_clause: opt_into (else_clause()),
            ensure_clause: opt_into (ensure_clause()),
        }

    /// A `rescue` clause; `subsequent` is the next clause in the chain.
    Rescue / RescueMatcher / rescue / on_rescue :
        RescueNode / as_rescue_node / "rescue" {
            exceptions: list (exceptions()),
            reference: opt (reference()),
            body: opt_into (statements()),
            subsequent: opt_into (subsequent()),
        }

    /// Key/value association inside a hash literal or keyword arguments.
    Pair / PairMatcher / pair / on_pair :
        AssocNode / as_assoc_node / "pair" {
            key: req (key()),
            value: req (value()),
        }

    /// Hash literal: `{ a: 1 }`.
    Hash / HashMatcher / hash / on_hash :
        HashNode / as_hash_node / "hash" {
            pairs: list (elements()),
        }

    /// Bare keyword arguments at a call site: `foo(a: 1)`.
    Kwargs / KwargsMatcher / kwargs / on_kwargs :
        KeywordHashNode / as_keyword_hash_node / "kwargs" {
            pairs: list (elements()),
        }

    /// Local variable read: `x`.
    Lvar / LvarMatcher / lvar / on_lvar :
        LocalVariableReadNode / as_local_variable_read_node / "lvar" {
            name: name (name()),
        }

    /// Instance variable read: `@x` (the name includes the sigil).
    Ivar / IvarMatcher / ivar / on_ivar :
        InstanceVariableReadNode / as_instance_variable_read_node / "ivar" {
            name: name (name()),
        }

    /// Class variable read: `@@x`.
    Cvar / CvarMatcher / cvar / on_cvar :
        ClassVariableReadNode / as_class_variable_read_node / "cvar" {
            name: name (name()),
        }

    /// Global variable read: `$x`.
    Gvar / GvarMatcher / gvar / on_gvar :
        GlobalVariableReadNode / as_global_variable_read_node / "gvar" {
            name: name (name()),
        }

    /// Symbol literal: `:foo`; the constraint is the unescaped value.
    Sym / SymMatcher / sym / on_sym :
        SymbolNode / as_symbol_node / "sym" {
            value: text (unescaped()),
        }

    /// Plain string literal; the constraint is the unescaped content.
    Str / StrMatcher / str_ / on_str :
        StringNode / as_string_node / "str" {
            value: text (unescaped()),
        }

    /// Interpolated string: `"a#{b}"`.
    Dstr / DstrMatcher / dstr / on_dstr :
        InterpolatedStringNode / as_interpolated_string_node / "dstr" {
            parts: list (parts()),
        }

    /// Interpolated symbol: `:"a#{b}"`.
    Dsym / DsymMatcher / dsym / on_dsym :
        InterpolatedSymbolNode / as_interpolated_symbol_node / "dsym" {
            parts: list (parts()),
        }

    /// Integer literal; the value constraint is parsed from source with `_`
    /// separators stripped.
    Int / IntMatcher / int / on_int :
        IntegerNode / as_integer_node / "int" {
            value: int_src (),
        }

    /// Float literal; the constraint compares the raw source text.
    Float / FloatMatcher / float / on_float :
        FloatNode / as_float_node / "float" {
            value: src_text (),
        }

    /// Regexp literal; the constraint is the unescaped content between the
    /// delimiters.
    Regexp / RegexpMatcher / regexp / on_regexp :
        RegularExpressionNode / as_regular_expression_node / "regexp" {
            content: text (unescaped()),
        }

    /// The `true` literal.
    True / TrueMatcher / true_ / on_true :
        TrueNode / as_true_node / "true" {}

    /// The `false` literal.
    False / FalseMatcher / false_ / on_false :
        FalseNode / as_false_node / "false" {}

    /// The `nil` literal (a present node, distinct from an absent child).
    Nil / NilMatcher / nil / on_nil :
        NilNode / as_nil_node / "nil" {}

    /// The `self` keyword.
    SelfRef / SelfMatcher / self_ / on_self :
        SelfNode / as_self_node / "self" {}

    /// Array literal: `[1, 2, 3]`.
    Array / ArrayMatcher / array / on_array :
        ArrayNode / as_array_node / "array" {
            elements: list (elements()),
        }

    /// `if` (and `elsif`, which prism nests in `subsequent`).
    If / IfMatcher / if_ / on_if :
        IfNode / as_if_node / "if" {
            predicate: req (predicate()),
            then_branch: opt_into (statements()),
            else_branch: opt (subsequent()),
        }

    /// An `else` branch (of `if`, `case`, or `begin`).
    Else / ElseMatcher / else_ / on_else :
        ElseNode / as_else_node / "else" {
            body: opt_into (statements()),
        }

    /// `unless`.
    Unless / UnlessMatcher / unless_ / on_unless :
        UnlessNode / as_unless_node / "unless" {
            predicate: req (predicate()),
            then_branch: opt_into (statements()),
            else_branch: opt_into (else_clause()),
        }

    /// `case/when`.
    Case / CaseMatcher / case / on_case :
        CaseNode / as_case_node / "case" {
            predicate: opt (predicate()),
            whens: list (conditions()),
            else_branch: opt_into (else_clause()),
        }

    /// A `when` clause.
    When / WhenMatcher / when / on_when :
        WhenNode / as_when_node / "when" {
            conditions: list (conditions()),
            body: opt_into (statements()),
        }

    /// `while` loop.
    While / WhileMatcher / while_ / on_while :
        WhileNode / as_while_node / "while" {
            predicate: req (predicate()),
            body: opt_into (statements()),
        }

    /// `until` loop.
    Until / UntilMatcher / until / on_until :
        UntilNode / as_until_node / "until" {
            predicate: req (predicate()),
            body: opt_into (statements()),
        }

    /// `for x in xs` loop.
    For / ForMatcher / for_ / on_for :
        ForNode / as_for_node / "for" {
            index: req (index()),
            collection: req (collection()),
            body: opt_into (statements()),
        }

    /// `return`, with optional arguments.
    Return / ReturnMatcher / return_ / on_return :
        ReturnNode / as_return_node / "return" {
            args: args (arguments()),
        }

    /// `yield`, with optional arguments.
    Yield / YieldMatcher / yield_ / on_yield :
        YieldNode / as_yield_node / "yield" {
            args: args (arguments()),
        }

    /// `break`, with optional arguments.
    Break / BreakMatcher / break_ / on_break :
        BreakNode / as_break_node / "break" {
            args: args (arguments()),
        }

    /// `next`, with optional arguments.
    Next / NextMatcher / next / on_next :
        NextNode / as_next_node / "next" {
            args: args (arguments()),
        }

    /// `super` with an explicit argument list.
    Super / SuperMatcher / super_ / on_super :
        SuperNode / as_super_node / "super" {
            args: args (arguments()),
        }

    /// Bare `super` forwarding the enclosing method's arguments.
    Zsuper / ZsuperMatcher / zsuper / on_zsuper :
        ForwardingSuperNode / as_forwarding_super_node / "zsuper" {}

    /// `a && b`.
    And / AndMatcher / and / on_and :
        AndNode / as_and_node / "and" {
            left: req (left()),
            right: req (right()),
        }

    /// `a || b`.
    Or / OrMatcher / or / on_or :
        OrNode / as_or_node / "or" {
            left: req (left()),
            right: req (right()),
        }

    /// Class definition; `name` is the constant path being defined.
    Class / ClassMatcher / class / on_class :
        ClassNode / as_class_node / "class" {
            name: req (constant_path()),
            superclass: opt (superclass()),
            body: opt (body()),
        }

    /// Module definition.
    Module / ModuleMatcher / module / on_module :
        ModuleNode / as_module_node / "module" {
            name: req (constant_path()),
            body: opt (body()),
        }

    /// Local variable assignment: `x = ...`.
    Lvasgn / LvasgnMatcher / lvasgn / on_lvasgn :
        LocalVariableWriteNode / as_local_variable_write_node / "lvasgn" {
            name: name (name()),
            value: req (value()),
        }

    /// Instance variable assignment: `@x = ...`.
    Ivasgn / IvasgnMatcher / ivasgn / on_ivasgn :
        InstanceVariableWriteNode / as_instance_variable_write_node / "ivasgn" {
            name: name (name()),
            value: req (value()),
        }

    /// Class variable assignment: `@@x = ...`.
    Cvasgn / CvasgnMatcher / cvasgn / on_cvasgn :
        ClassVariableWriteNode / as_class_variable_write_node / "cvasgn" {
            name: name (name()),
            value: req (value()),
        }

    /// Global variable assignment: `$x = ...`.
    Gvasgn / GvasgnMatcher / gvasgn / on_gvasgn :
        GlobalVariableWriteNode / as_global_variable_write_node / "gvasgn" {
            name: name (name()),
            value: req (value()),
        }

    /// Constant assignment: `FOO = ...`.
    Casgn / CasgnMatcher / casgn / on_casgn :
        ConstantWriteNode / as_constant_write_node / "casgn" {
            name: name (name()),
            value: req (value()),
        }

    /// Splat: `*xs`; the expression is absent for a bare `*`.
    Splat / SplatMatcher / splat / on_splat :
        SplatNode / as_splat_node / "splat" {
            expression: opt (expression()),
        }

    /// Stabby lambda: `-> (x) { ... }`.
    Lambda / LambdaMatcher / lambda / on_lambda :
        LambdaNode / as_lambda_node / "lambda" {
            params: opt (parameters()),
            body: opt (body()),
        }

    /// Range literal: `a..b` or `a...b`; either bound may be absent.
    Range / RangeMatcher / range / on_range :
        RangeNode / as_range_node / "range" {
            left: opt (left()),
            right: opt (right()),
            exclusive: flag (operator_loc().as_slice() == b"..."),
        }

    /// Parenthesized expression (or empty `()`).
    Parens / ParensMatcher / parens / on_parens :
        ParenthesesNode / as_parentheses_node / "parens" {
            body: opt (body()),
        }

    /// A statement sequence (method body, branch body, program body).
    Stmts / StmtsMatcher / stmts / on_stmts :
        StatementsNode / as_statements_node / "stmts" {
            body: list (body()),
        }

    /// A method's parameter list node.
    Params / ParamsMatcher / params / on_params :
        ParametersNode / as_parameters_node / "args" {}

    /// The root node of a parse result.
    Program / ProgramMatcher / program / on_program :
        ProgramNode / as_program_node / "program" {
            statements: req_into (statements()),
        }
}

/// Any present node, of any kind. As a child slot this still requires
/// presence; an unset [`Slot`](crate::Slot) is the wildcard that also
/// accepts absence.
pub fn any<A, C>() -> NodeMatcher<A, C> {
    NodeMatcher::Any
}

/// Matches if any alternative matches. `fold` visits the first alternative
/// that matches the candidate.
pub fn any_of<A, C>(alts: impl Into<Vec<NodeMatcher<A, C>>>) -> NodeMatcher<A, C> {
    NodeMatcher::AnyOf(alts.into())
}

/// Matches if every part matches. `fold` visits each part in order.
pub fn all_of<A, C>(parts: impl Into<Vec<NodeMatcher<A, C>>>) -> NodeMatcher<A, C> {
    NodeMatcher::AllOf(parts.into())
}

/// Structural negation. Carries no callbacks; `fold` visits nothing.
pub fn not<A, C>(m: NodeMatcher<A, C>) -> NodeMatcher<A, C> {
    NodeMatcher::Not(Box::new(m))
}

/// A user predicate over the raw node and the semantic context. Must be
/// pure; `test` relies on it having no observable side effects.
pub fn pred<A, C>(
    f: impl for<'pr> Fn(&ruby_prism::Node<'pr>, &C) -> bool + Send + Sync + 'static,
) -> NodeMatcher<A, C> {
    NodeMatcher::Pred(Box::new(f))
}

// Abstract grammar categories, expressed as alternatives over their
// concrete productions.

/// Any literal value node.
pub fn any_literal<A, C>() -> NodeMatcher<A, C> {
    any_of([
        int(IntMatcher::default()),
        float(FloatMatcher::default()),
        str_(StrMatcher::default()),
        sym(SymMatcher::default()),
        regexp(RegexpMatcher::default()),
        true_(TrueMatcher::default()),
        false_(FalseMatcher::default()),
        nil(NilMatcher::default()),
    ])
}

/// Any plain variable read (local, instance, class, or global).
pub fn any_variable_read<A, C>() -> NodeMatcher<A, C> {
    any_of([
        lvar(LvarMatcher::default()),
        ivar(IvarMatcher::default()),
        cvar(CvarMatcher::default()),
        gvar(GvarMatcher::default()),
    ])
}

/// Any plain single-target assignment.
pub fn any_assignment<A, C>() -> NodeMatcher<A, C> {
    any_of([
        lvasgn(LvasgnMatcher::default()),
        ivasgn(IvasgnMatcher::default()),
        cvasgn(CvasgnMatcher::default()),
        gvasgn(GvasgnMatcher::default()),
        casgn(CasgnMatcher::default()),
    ])
}

/// Any looping construct.
pub fn any_loop<A, C>() -> NodeMatcher<A, C> {
    any_of([
        while_(WhileMatcher::default()),
        until(UntilMatcher::default()),
        for_(ForMatcher::default()),
    ])
}

// Literal shorthands for the common leaf constraints.

/// A symbol literal with exactly this value: `sym_val("foo")` matches `:foo`.
pub fn sym_val<A, C>(s: &str) -> NodeMatcher<A, C> {
    sym(SymMatcher { value: is(s), ..Default::default() })
}

/// A string literal with exactly this content.
pub fn str_val<A, C>(s: &str) -> NodeMatcher<A, C> {
    str_(StrMatcher { value: is(s), ..Default::default() })
}

/// An integer literal with exactly this value.
pub fn int_val<A, C>(v: i64) -> NodeMatcher<A, C> {
    int(IntMatcher { value: Some(v), ..Default::default() })
}

/// A bare constant read with exactly this name.
pub fn const_named<A, C>(s: &str) -> NodeMatcher<A, C> {
    const_(ConstMatcher { name: is(s), ..Default::default() })
}

// Direct-children conveniences for the list-bearing productions.

/// A statement sequence with exactly these statements, in order.
pub fn stmts_of<A, C>(elems: impl Into<Vec<NodeMatcher<A, C>>>) -> NodeMatcher<A, C> {
    stmts(StmtsMatcher { body: crate::matcher::seq::seq(elems), ..Default::default() })
}

/// An array literal with exactly these elements, in order.
pub fn array_of<A, C>(elems: impl Into<Vec<NodeMatcher<A, C>>>) -> NodeMatcher<A, C> {
    array(ArrayMatcher { elements: crate::matcher::seq::seq(elems), ..Default::default() })
}

/// A hash literal with exactly these pairs, in order.
pub fn hash_of<A, C>(pairs_elems: impl Into<Vec<NodeMatcher<A, C>>>) -> NodeMatcher<A, C> {
    hash(HashMatcher { pairs: crate::matcher::seq::seq(pairs_elems), ..Default::default() })
}
