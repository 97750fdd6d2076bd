//! Text front-end: compile NodePattern-style strings into matchers.
//!
//! `compile` turns a pattern string like `(send nil? :require ...)` into the
//! equivalent [`NodeMatcher`](crate::NodeMatcher). The textual dialect is the
//! RuboCop NodePattern surface restricted to what the typed matchers can
//! express; constructs outside that subset (`#helper`, `%param`, `^parent`,
//! `` `descend ``) are compile errors, never silent wildcards.

pub mod compile;
pub mod lexer;
pub mod parser;

pub use compile::compile;

/// Why a pattern string failed to compile.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("unexpected character `{ch}` at byte {at}")]
    UnexpectedChar { ch: char, at: usize },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unexpected end of pattern")]
    UnexpectedEnd,
    #[error("unexpected `{0}`")]
    Unexpected(String),
    #[error("trailing input after the pattern")]
    TrailingInput,
    #[error("unknown node kind `{0}`")]
    UnknownKind(String),
    #[error("`...` is only allowed as the last child")]
    MisplacedRest,
    #[error("`{kind}` takes at most {max} children, pattern has {got}")]
    Arity {
        kind: String,
        max: usize,
        got: usize,
    },
    #[error("expected a symbol or `_` in the name position of `{0}`")]
    NamePosition(String),
    #[error("{0} are not supported")]
    Unsupported(&'static str),
}
