//! Pattern string parser.
//!
//! Parses a token stream into a `PatternNode` tree. Errors are reported
//! rather than recovered: a malformed pattern never compiles to a matcher
//! that silently accepts everything.

use super::PatternError;
use super::lexer::Token;

#[derive(Debug, Clone)]
pub enum PatternNode {
    /// `(kind child1 child2 ...)`
    Kind {
        name: String,
        children: Vec<PatternNode>,
    },
    /// `{a b c}` — any alternative matches
    AnyOf(Vec<PatternNode>),
    /// `[a b c]` — every part matches
    AllOf(Vec<PatternNode>),
    /// `!pattern`
    Not(Box<PatternNode>),
    /// `$pattern` — transparent for matching purposes
    Capture(Box<PatternNode>),
    /// `_` — any present child
    Wildcard,
    /// `...` — tolerate any remaining children
    Rest,
    /// `nil?` — a structurally absent child
    Absent,
    /// `str?`, `send` — any node of the named kind
    KindPred(String),
    Sym(String),
    Int(i64),
    Float(String),
    Str(String),
    NilLit,
    TrueLit,
    FalseLit,
    /// `#helper` — rejected at compile time
    Helper(String),
    /// `%param` — rejected at compile time
    Param(String),
    /// `^pattern` — rejected at compile time
    Parent(Box<PatternNode>),
    /// `` `pattern `` — rejected at compile time
    Descend(Box<PatternNode>),
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Result<Token, PatternError> {
        let tok = self.tokens.get(self.pos).cloned().ok_or(PatternError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(tok)
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<(), PatternError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(match self.peek() {
                Some(tok) => PatternError::Unexpected(format!("{tok:?} (wanted {what})")),
                None => PatternError::UnexpectedEnd,
            })
        }
    }

    /// Parse one complete pattern; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<PatternNode, PatternError> {
        let node = self.parse_node()?;
        if self.pos < self.tokens.len() {
            return Err(PatternError::TrailingInput);
        }
        Ok(node)
    }

    fn parse_node(&mut self) -> Result<PatternNode, PatternError> {
        match self.bump()? {
            Token::Open => self.parse_kind(),
            Token::OpenBrace => self.parse_any_of(),
            Token::OpenBracket => self.parse_all_of(),
            Token::Capture => Ok(PatternNode::Capture(Box::new(self.parse_node()?))),
            Token::Bang => Ok(PatternNode::Not(Box::new(self.parse_node()?))),
            Token::Caret => Ok(PatternNode::Parent(Box::new(self.parse_node()?))),
            Token::Backtick => Ok(PatternNode::Descend(Box::new(self.parse_node()?))),
            Token::Wildcard => Ok(PatternNode::Wildcard),
            Token::Rest => Ok(PatternNode::Rest),
            Token::AbsentPred => Ok(PatternNode::Absent),
            Token::KindPred(name) => Ok(PatternNode::KindPred(name)),
            Token::Helper(name) => Ok(PatternNode::Helper(name)),
            Token::Param(name) => Ok(PatternNode::Param(name)),
            Token::Sym(s) => Ok(PatternNode::Sym(s)),
            Token::Int(n) => Ok(PatternNode::Int(n)),
            Token::Float(s) => Ok(PatternNode::Float(s)),
            Token::Str(s) => Ok(PatternNode::Str(s)),
            Token::Ident(name) => Ok(match name.as_str() {
                "nil" => PatternNode::NilLit,
                "true" => PatternNode::TrueLit,
                "false" => PatternNode::FalseLit,
                _ => PatternNode::KindPred(name),
            }),
            tok => Err(PatternError::Unexpected(format!("{tok:?}"))),
        }
    }

    fn parse_kind(&mut self) -> Result<PatternNode, PatternError> {
        // The head of a sequence must be a kind name.
        let name = match self.bump()? {
            Token::Ident(name) => name,
            tok => return Err(PatternError::Unexpected(format!("{tok:?} (wanted a kind name)"))),
        };

        let mut children = Vec::new();
        while self.peek().is_some() && self.peek() != Some(&Token::Close) {
            children.push(self.parse_node()?);
        }
        self.expect(&Token::Close, "`)`")?;

        Ok(PatternNode::Kind { name, children })
    }

    fn parse_any_of(&mut self) -> Result<PatternNode, PatternError> {
        let mut alts = Vec::new();
        while self.peek().is_some() && self.peek() != Some(&Token::CloseBrace) {
            // Pipe separators are optional
            if self.peek() == Some(&Token::Pipe) {
                self.pos += 1;
                continue;
            }
            alts.push(self.parse_node()?);
        }
        self.expect(&Token::CloseBrace, "`}`")?;
        Ok(PatternNode::AnyOf(alts))
    }

    fn parse_all_of(&mut self) -> Result<PatternNode, PatternError> {
        let mut parts = Vec::new();
        while self.peek().is_some() && self.peek() != Some(&Token::CloseBracket) {
            parts.push(self.parse_node()?);
        }
        self.expect(&Token::CloseBracket, "`]`")?;
        Ok(PatternNode::AllOf(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::lexer::Lexer;

    fn parse(input: &str) -> PatternNode {
        let tokens = Lexer::new(input).tokenize().unwrap();
        Parser::new(tokens).parse().unwrap()
    }

    fn parse_err(input: &str) -> PatternError {
        let tokens = Lexer::new(input).tokenize().unwrap();
        Parser::new(tokens).parse().unwrap_err()
    }

    #[test]
    fn test_parser_simple_send() {
        match parse("(send nil? :expect ...)") {
            PatternNode::Kind { name, children } => {
                assert_eq!(name, "send");
                assert_eq!(children.len(), 3);
                assert!(matches!(children[0], PatternNode::Absent));
                assert!(matches!(&children[1], PatternNode::Sym(s) if s == "expect"));
                assert!(matches!(children[2], PatternNode::Rest));
            }
            other => panic!("expected Kind, got {other:?}"),
        }
    }

    #[test]
    fn test_parser_nested() {
        match parse("(send (send _ :where) :first)") {
            PatternNode::Kind { name, children } => {
                assert_eq!(name, "send");
                assert!(matches!(
                    &children[0],
                    PatternNode::Kind { name, .. } if name == "send"
                ));
            }
            other => panic!("expected Kind, got {other:?}"),
        }
    }

    #[test]
    fn test_parser_alternatives_with_pipes() {
        match parse("{:first | :take}") {
            PatternNode::AnyOf(alts) => assert_eq!(alts.len(), 2),
            other => panic!("expected AnyOf, got {other:?}"),
        }
    }

    #[test]
    fn test_parser_conjunction() {
        match parse("[!nil? send?]") {
            PatternNode::AllOf(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(
                    &parts[0],
                    PatternNode::Not(inner) if matches!(**inner, PatternNode::Absent)
                ));
                assert!(matches!(&parts[1], PatternNode::KindPred(k) if k == "send"));
            }
            other => panic!("expected AllOf, got {other:?}"),
        }
    }

    #[test]
    fn test_parser_capture_is_parsed() {
        match parse("${:first :take}") {
            PatternNode::Capture(inner) => {
                assert!(matches!(*inner, PatternNode::AnyOf(_)));
            }
            other => panic!("expected Capture, got {other:?}"),
        }
    }

    #[test]
    fn test_parser_literal_keywords() {
        assert!(matches!(parse("nil"), PatternNode::NilLit));
        assert!(matches!(parse("true"), PatternNode::TrueLit));
        assert!(matches!(parse("false"), PatternNode::FalseLit));
    }

    #[test]
    fn test_parser_unbalanced_is_error() {
        assert!(matches!(parse_err("(send _ :foo"), PatternError::UnexpectedEnd));
    }

    #[test]
    fn test_parser_trailing_input_is_error() {
        assert!(matches!(parse_err("(send) (send)"), PatternError::TrailingInput));
    }

    #[test]
    fn test_parser_non_ident_head_is_error() {
        assert!(matches!(parse_err("(:foo _)"), PatternError::Unexpected(_)));
    }
}
