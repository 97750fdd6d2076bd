//! Lower a parsed pattern tree onto typed matchers.
//!
//! Each `(kind ...)` form maps its positional children onto the named slots
//! of the corresponding matcher struct, following the Parser gem child
//! order (`send`: receiver, name, args...; `if`: predicate, then, else; ...).
//! Missing trailing children are unconstrained; extra children are an arity
//! error. A `...` in the last position tolerates whatever follows.

use super::PatternError;
use super::lexer::Lexer;
use super::parser::{Parser, PatternNode};
use crate::matcher::kinds::*;
use crate::matcher::seq::SeqMatcher;
use crate::matcher::slot::{Name, Slot, is, one};

/// Compile a pattern string into a matcher.
///
/// The result carries no callbacks; attach them by building the matcher
/// directly instead when a fold is needed.
pub fn compile<A, C>(pattern: &str) -> Result<NodeMatcher<A, C>, PatternError> {
    let tokens = Lexer::new(pattern).tokenize()?;
    let ast = Parser::new(tokens).parse()?;
    node(&ast)
}

fn node<A, C>(p: &PatternNode) -> Result<NodeMatcher<A, C>, PatternError> {
    match p {
        PatternNode::Wildcard => Ok(any()),
        PatternNode::Rest => Err(PatternError::MisplacedRest),
        PatternNode::Absent => Err(PatternError::Unexpected(
            "`nil?` outside a child position".to_string(),
        )),
        PatternNode::Kind { name, children } => kind(name, children),
        PatternNode::KindPred(name) => kind(name, &[]),
        PatternNode::AnyOf(alts) => {
            let alts = alts.iter().map(node).collect::<Result<Vec<_>, _>>()?;
            Ok(any_of(alts))
        }
        PatternNode::AllOf(parts) => {
            let parts = parts.iter().map(node).collect::<Result<Vec<_>, _>>()?;
            Ok(all_of(parts))
        }
        PatternNode::Not(inner) => {
            // At a node position `!nil?` just means "some node is here".
            if matches!(**inner, PatternNode::Absent) {
                return Ok(any());
            }
            Ok(not(node(inner)?))
        }
        PatternNode::Capture(inner) => node(inner),
        PatternNode::Sym(s) => Ok(sym_val(s)),
        PatternNode::Int(n) => Ok(int_val(*n)),
        PatternNode::Float(s) => {
            Ok(float(FloatMatcher { value: is(s.as_str()), ..Default::default() }))
        }
        PatternNode::Str(s) => Ok(str_val(s)),
        PatternNode::NilLit => Ok(nil(NilMatcher::default())),
        PatternNode::TrueLit => Ok(true_(TrueMatcher::default())),
        PatternNode::FalseLit => Ok(false_(FalseMatcher::default())),
        PatternNode::Helper(_) => Err(PatternError::Unsupported("helper predicates (`#method`)")),
        PatternNode::Param(_) => Err(PatternError::Unsupported("pattern parameters (`%name`)")),
        PatternNode::Parent(_) => Err(PatternError::Unsupported("parent references (`^`)")),
        PatternNode::Descend(_) => Err(PatternError::Unsupported("descend references (`` ` ``)")),
    }
}

/// Positional index of the name child for kinds that carry one.
fn name_index(kind: &str) -> Option<usize> {
    match kind {
        "send" | "csend" | "defs" | "const" => Some(1),
        "def" | "lvar" | "ivar" | "cvar" | "gvar" | "lvasgn" | "ivasgn" | "cvasgn" | "gvasgn"
        | "casgn" | "sym" => Some(0),
        _ => None,
    }
}

fn kind<A, C>(kind: &str, children: &[PatternNode]) -> Result<NodeMatcher<A, C>, PatternError> {
    // `{:a :b}` in a name position becomes one whole-matcher alternative per
    // symbol; the scalar slot itself holds at most one value.
    if let Some(i) = name_index(kind) {
        if let Some(PatternNode::AnyOf(alts)) = children.get(i) {
            if alts.iter().all(|a| matches!(a, PatternNode::Sym(_))) {
                let mut out = Vec::new();
                for alt in alts {
                    let mut subst = children.to_vec();
                    subst[i] = alt.clone();
                    out.push(kind_one(kind, &subst)?);
                }
                return Ok(any_of(out));
            }
        }
    }
    kind_one(kind, children)
}

fn kind_one<A, C>(kind: &str, children: &[PatternNode]) -> Result<NodeMatcher<A, C>, PatternError> {
    let mut cur = Cursor::new(kind, children)?;
    let m = match kind {
        "send" | "csend" => {
            let receiver = cur.slot()?;
            let name = cur.name()?;
            let args = seq_tail(&mut cur)?;
            send(SendMatcher {
                receiver,
                name,
                args,
                safe_navigation: Some(kind == "csend"),
                ..Default::default()
            })
        }
        "block" | "any_block" => {
            let call_p = cur.next().cloned();
            let params_p = cur.next().cloned();
            let body_p = cur.next().cloned();
            cur.finish()?;
            return block_pattern(call_p.as_ref(), params_p.as_ref(), body_p.as_ref());
        }
        "def" => def(DefMatcher {
            receiver: Slot::Absent,
            name: cur.name()?,
            params: cur.slot()?,
            body: cur.stmt_slot()?,
            ..Default::default()
        }),
        "defs" => {
            let receiver = match cur.slot()? {
                // A singleton def always has a receiver.
                Slot::Unset => one(any()),
                other => other,
            };
            def(DefMatcher {
                receiver,
                name: cur.name()?,
                params: cur.slot()?,
                body: cur.stmt_slot()?,
                ..Default::default()
            })
        }
        "const" => {
            let parent_p = cur.next().cloned();
            let name = cur.name()?;
            cur.finish()?;
            return const_pattern(parent_p.as_ref(), name);
        }
        "begin" => {
            // Children are the statements themselves.
            let body = seq_tail(&mut cur)?;
            let body = match &body {
                Some(sm) if sm.elems.is_empty() && sm.rest => Slot::Unset,
                _ => one(stmts(StmtsMatcher { body, ..Default::default() })),
            };
            begin(BeginMatcher { body, ..Default::default() })
        }
        "pair" => pair(PairMatcher {
            key: cur.slot()?,
            value: cur.slot()?,
            ..Default::default()
        }),
        "hash" => hash(HashMatcher { pairs: seq_tail(&mut cur)?, ..Default::default() }),
        "kwargs" => kwargs(KwargsMatcher { pairs: seq_tail(&mut cur)?, ..Default::default() }),
        "lvar" => lvar(LvarMatcher { name: cur.name()?, ..Default::default() }),
        "ivar" => ivar(IvarMatcher { name: cur.name()?, ..Default::default() }),
        "cvar" => cvar(CvarMatcher { name: cur.name()?, ..Default::default() }),
        "gvar" => gvar(GvarMatcher { name: cur.name()?, ..Default::default() }),
        "sym" => sym(SymMatcher { value: cur.name()?, ..Default::default() }),
        "str" => {
            let value = match cur.next() {
                None | Some(PatternNode::Wildcard) => Name::default(),
                Some(PatternNode::Str(s)) => is(s.as_str()),
                Some(_) => return Err(PatternError::NamePosition("str".to_string())),
            };
            str_(StrMatcher { value, ..Default::default() })
        }
        "dstr" => dstr(DstrMatcher { parts: seq_tail(&mut cur)?, ..Default::default() }),
        "dsym" => dsym(DsymMatcher { parts: seq_tail(&mut cur)?, ..Default::default() }),
        "int" => {
            let value = match cur.next() {
                None | Some(PatternNode::Wildcard) => None,
                Some(PatternNode::Int(n)) => Some(*n),
                Some(_) => return Err(PatternError::NamePosition("int".to_string())),
            };
            int(IntMatcher { value, ..Default::default() })
        }
        "float" => {
            let value = match cur.next() {
                None | Some(PatternNode::Wildcard) => Name::default(),
                Some(PatternNode::Float(s)) => is(s.as_str()),
                Some(_) => return Err(PatternError::NamePosition("float".to_string())),
            };
            float(FloatMatcher { value, ..Default::default() })
        }
        "regexp" => {
            let content = match cur.next() {
                None | Some(PatternNode::Wildcard) => Name::default(),
                Some(PatternNode::Str(s)) => is(s.as_str()),
                Some(_) => return Err(PatternError::NamePosition("regexp".to_string())),
            };
            regexp(RegexpMatcher { content, ..Default::default() })
        }
        "true" => true_(TrueMatcher::default()),
        "false" => false_(FalseMatcher::default()),
        "nil" => nil(NilMatcher::default()),
        "self" => self_(SelfMatcher::default()),
        "zsuper" => zsuper(ZsuperMatcher::default()),
        "array" => array(ArrayMatcher { elements: seq_tail(&mut cur)?, ..Default::default() }),
        "if" => if_(IfMatcher {
            predicate: cur.slot()?,
            then_branch: cur.stmt_slot()?,
            else_branch: cur.stmt_slot()?,
            ..Default::default()
        }),
        "unless" => unless_(UnlessMatcher {
            predicate: cur.slot()?,
            then_branch: cur.stmt_slot()?,
            else_branch: cur.stmt_slot()?,
            ..Default::default()
        }),
        "case" => {
            let predicate = cur.slot()?;
            let (whens, else_branch) = whens_and_else(&mut cur)?;
            case(CaseMatcher { predicate, whens, else_branch, ..Default::default() })
        }
        "when" => {
            let (conditions, body) = whens_and_else(&mut cur)?;
            when(WhenMatcher { conditions, body, ..Default::default() })
        }
        "while" => while_(WhileMatcher {
            predicate: cur.slot()?,
            body: cur.stmt_slot()?,
            ..Default::default()
        }),
        "until" => until(UntilMatcher {
            predicate: cur.slot()?,
            body: cur.stmt_slot()?,
            ..Default::default()
        }),
        "for" => for_(ForMatcher {
            index: cur.slot()?,
            collection: cur.slot()?,
            body: cur.stmt_slot()?,
            ..Default::default()
        }),
        "return" => return_(ReturnMatcher { args: seq_tail(&mut cur)?, ..Default::default() }),
        "yield" => yield_(YieldMatcher { args: seq_tail(&mut cur)?, ..Default::default() }),
        "break" => break_(BreakMatcher { args: seq_tail(&mut cur)?, ..Default::default() }),
        "next" => next(NextMatcher { args: seq_tail(&mut cur)?, ..Default::default() }),
        "super" => super_(SuperMatcher { args: seq_tail(&mut cur)?, ..Default::default() }),
        "and" => and(AndMatcher {
            left: cur.slot()?,
            right: cur.slot()?,
            ..Default::default()
        }),
        "or" => or(OrMatcher {
            left: cur.slot()?,
            right: cur.slot()?,
            ..Default::default()
        }),
        "class" => class(ClassMatcher {
            name: cur.slot()?,
            superclass: cur.slot()?,
            body: cur.stmt_slot()?,
            ..Default::default()
        }),
        "module" => module(ModuleMatcher {
            name: cur.slot()?,
            body: cur.stmt_slot()?,
            ..Default::default()
        }),
        "lvasgn" => lvasgn(LvasgnMatcher {
            name: cur.name()?,
            value: cur.slot()?,
            ..Default::default()
        }),
        "ivasgn" => ivasgn(IvasgnMatcher {
            name: cur.name()?,
            value: cur.slot()?,
            ..Default::default()
        }),
        "cvasgn" => cvasgn(CvasgnMatcher {
            name: cur.name()?,
            value: cur.slot()?,
            ..Default::default()
        }),
        "gvasgn" => gvasgn(GvasgnMatcher {
            name: cur.name()?,
            value: cur.slot()?,
            ..Default::default()
        }),
        "casgn" => casgn(CasgnMatcher {
            name: cur.name()?,
            value: cur.slot()?,
            ..Default::default()
        }),
        "splat" => splat(SplatMatcher { expression: cur.slot()?, ..Default::default() }),
        "lambda" => lambda(LambdaMatcher {
            params: cur.slot()?,
            body: cur.stmt_slot()?,
            ..Default::default()
        }),
        "range" | "irange" | "erange" => range(RangeMatcher {
            left: cur.slot()?,
            right: cur.slot()?,
            exclusive: match kind {
                "irange" => Some(false),
                "erange" => Some(true),
                _ => None,
            },
            ..Default::default()
        }),
        "args" => {
            if cur.next().is_some() {
                return Err(PatternError::Unsupported("parameter patterns"));
            }
            params(ParamsMatcher::default())
        }
        _ => return Err(PatternError::UnknownKind(kind.to_string())),
    };
    cur.finish()?;
    Ok(m)
}

/// Split a variable-arity tail into a leading sequence and a final slot,
/// for `case` (whens then else) and `when` (conditions then body).
fn whens_and_else<A, C>(
    cur: &mut Cursor<'_>,
) -> Result<(Option<SeqMatcher<A, C>>, Slot<A, C>), PatternError> {
    let mut tail = Vec::new();
    while let Some(p) = cur.next() {
        tail.push(p);
    }
    if cur.rest {
        let mut elems = Vec::new();
        for p in &tail {
            elems.push(node(p)?);
        }
        return Ok((Some(SeqMatcher { elems, rest: true }), Slot::Unset));
    }
    let Some(last) = tail.pop() else {
        return Ok((None, Slot::Unset));
    };
    let mut elems = Vec::new();
    for p in &tail {
        elems.push(node(p)?);
    }
    Ok((Some(SeqMatcher { elems, rest: false }), stmt_slot(last)?))
}

/// `(const parent :Name)` — the DSL has one constant kind where prism has
/// two. A bare or `nil?` parent admits `ConstantReadNode`; anything else
/// pins `ConstantPathNode`.
fn const_pattern<A, C>(
    parent: Option<&PatternNode>,
    name: Name,
) -> Result<NodeMatcher<A, C>, PatternError> {
    match parent {
        None | Some(PatternNode::Wildcard) => Ok(any_of([
            const_(ConstMatcher { name: name.clone(), ..Default::default() }),
            const_path(ConstPathMatcher { name, ..Default::default() }),
        ])),
        Some(PatternNode::Absent) => Ok(any_of([
            const_(ConstMatcher { name: name.clone(), ..Default::default() }),
            const_path(ConstPathMatcher {
                parent: Slot::Absent,
                name,
                ..Default::default()
            }),
        ])),
        Some(PatternNode::Kind { name: head, .. }) if head == "cbase" => {
            Ok(const_path(ConstPathMatcher {
                parent: Slot::Absent,
                name,
                ..Default::default()
            }))
        }
        Some(p) => Ok(const_path(ConstPathMatcher {
            parent: one(node(p)?),
            name,
            ..Default::default()
        })),
    }
}

/// `(block call args body)` — the DSL writes the call as the block's first
/// child; prism hangs the block off the call. The whole pattern therefore
/// compiles to the call matcher with the block constraint in its `block`
/// slot, and matches against the call node.
fn block_pattern<A, C>(
    call: Option<&PatternNode>,
    params: Option<&PatternNode>,
    body: Option<&PatternNode>,
) -> Result<NodeMatcher<A, C>, PatternError> {
    let call_m = match call {
        None | Some(PatternNode::Wildcard) => send(SendMatcher::default()),
        Some(p) => node(p)?,
    };
    inject_block(call_m, params, body)
}

fn inject_block<A, C>(
    call: NodeMatcher<A, C>,
    params: Option<&PatternNode>,
    body: Option<&PatternNode>,
) -> Result<NodeMatcher<A, C>, PatternError> {
    match call {
        NodeMatcher::Send(mut m) => {
            let body_slot = |b: Option<&PatternNode>| match b {
                None => Ok(Slot::Unset),
                Some(p) => stmt_slot(p),
            };
            // A bare `(args)` binds nothing: prism's block parameters are
            // either absent or an explicit empty `| |` list.
            let zero_params = matches!(
                params,
                Some(PatternNode::Kind { name, children })
                    if name == "args" && children.is_empty()
            );
            m.block = if zero_params {
                let empty_params = one(pred(|n: &ruby_prism::Node<'_>, _: &C| {
                    n.as_block_parameters_node()
                        .is_some_and(|bp| bp.parameters().is_none())
                }));
                one(any_of([
                    block(BlockMatcher {
                        params: Slot::Absent,
                        body: body_slot(body)?,
                        ..Default::default()
                    }),
                    block(BlockMatcher {
                        params: empty_params,
                        body: body_slot(body)?,
                        ..Default::default()
                    }),
                ]))
            } else {
                let params = match params {
                    None | Some(PatternNode::Wildcard) => Slot::Unset,
                    // `(args ...)` leaves the parameters unconstrained.
                    Some(PatternNode::Kind { name, children })
                        if name == "args"
                            && children.iter().all(|c| matches!(c, PatternNode::Rest)) =>
                    {
                        Slot::Unset
                    }
                    Some(p) => slot(p)?,
                };
                one(block(BlockMatcher {
                    params,
                    body: body_slot(body)?,
                    ..Default::default()
                }))
            };
            Ok(NodeMatcher::Send(m))
        }
        NodeMatcher::AnyOf(alts) => {
            let mut out = Vec::new();
            for alt in alts {
                out.push(inject_block(alt, params, body)?);
            }
            Ok(NodeMatcher::AnyOf(out))
        }
        _ => Err(PatternError::Unsupported("block patterns over non-call heads")),
    }
}

/// A child pattern in a node slot position.
fn slot<A, C>(p: &PatternNode) -> Result<Slot<A, C>, PatternError> {
    match p {
        PatternNode::Wildcard => Ok(Slot::Unset),
        PatternNode::Absent => Ok(Slot::Absent),
        PatternNode::Capture(inner) => slot(inner),
        other => Ok(one(node(other)?)),
    }
}

/// A child pattern in a body or branch position.
///
/// The DSL writes a single-expression body directly; prism wraps bodies in a
/// statements node and `else` branches additionally in an else node. Admit
/// each shape.
fn stmt_slot<A, C>(p: &PatternNode) -> Result<Slot<A, C>, PatternError> {
    match p {
        PatternNode::Wildcard => Ok(Slot::Unset),
        PatternNode::Absent => Ok(Slot::Absent),
        PatternNode::Capture(inner) => stmt_slot(inner),
        other => {
            let in_stmts = stmts(StmtsMatcher {
                body: Some(SeqMatcher { elems: vec![node(other)?], rest: false }),
                ..Default::default()
            });
            let in_else = else_(ElseMatcher {
                body: one(stmts(StmtsMatcher {
                    body: Some(SeqMatcher { elems: vec![node(other)?], rest: false }),
                    ..Default::default()
                })),
                ..Default::default()
            });
            Ok(one(any_of([node(other)?, in_stmts, in_else])))
        }
    }
}

/// The remaining children of a cursor as a positional sequence.
fn seq_tail<A, C>(cur: &mut Cursor<'_>) -> Result<Option<SeqMatcher<A, C>>, PatternError> {
    let mut elems = Vec::new();
    while let Some(p) = cur.next() {
        elems.push(node(p)?);
    }
    Ok(Some(SeqMatcher { elems, rest: cur.rest }))
}

/// Walks a kind's pattern children in slot order. A trailing `...` stops
/// consumption and marks the remainder unconstrained; leftover concrete
/// children after all slots are consumed are an arity error.
struct Cursor<'a> {
    kind: &'a str,
    items: &'a [PatternNode],
    pos: usize,
    rest: bool,
}

impl<'a> Cursor<'a> {
    fn new(kind: &'a str, items: &'a [PatternNode]) -> Result<Self, PatternError> {
        if let Some(i) = items.iter().position(|p| matches!(p, PatternNode::Rest)) {
            if i + 1 != items.len() {
                return Err(PatternError::MisplacedRest);
            }
        }
        let rest = matches!(items.last(), Some(PatternNode::Rest));
        Ok(Self { kind, items, pos: 0, rest })
    }

    fn next(&mut self) -> Option<&'a PatternNode> {
        let item = self.items.get(self.pos)?;
        if matches!(item, PatternNode::Rest) {
            return None;
        }
        self.pos += 1;
        Some(item)
    }

    fn slot<A, C>(&mut self) -> Result<Slot<A, C>, PatternError> {
        match self.next() {
            None => Ok(Slot::Unset),
            Some(p) => slot(p),
        }
    }

    fn stmt_slot<A, C>(&mut self) -> Result<Slot<A, C>, PatternError> {
        match self.next() {
            None => Ok(Slot::Unset),
            Some(p) => stmt_slot(p),
        }
    }

    fn name(&mut self) -> Result<Name, PatternError> {
        match self.next() {
            None => Ok(Name::default()),
            Some(PatternNode::Wildcard) => Ok(Name::default()),
            Some(PatternNode::Sym(s)) => Ok(is(s.as_str())),
            Some(PatternNode::Capture(inner)) => match &**inner {
                PatternNode::Wildcard => Ok(Name::default()),
                PatternNode::Sym(s) => Ok(is(s.as_str())),
                _ => Err(PatternError::NamePosition(self.kind.to_string())),
            },
            Some(_) => Err(PatternError::NamePosition(self.kind.to_string())),
        }
    }

    fn finish(self) -> Result<(), PatternError> {
        let concrete = self.items.len() - usize::from(self.rest);
        if self.pos < concrete {
            return Err(PatternError::Arity {
                kind: self.kind.to_string(),
                max: self.pos,
                got: concrete,
            });
        }
        Ok(())
    }
}
