//! Pattern string lexer.
//!
//! Tokenizes NodePattern-style strings like `(send nil? :expect ...)`.
//! Unknown characters are errors; the lexer never skips input silently.

use super::PatternError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Open,         // (
    Close,        // )
    OpenBrace,    // {
    CloseBrace,   // }
    OpenBracket,  // [
    CloseBracket, // ]
    Capture,      // $
    Wildcard,     // _
    Rest,         // ...
    Bang,         // !
    Pipe,         // | between alternatives
    Caret,        // ^ parent reference
    Backtick,     // ` descend reference
    Helper(String), // #method or #method?
    Param(String),  // %1, %param
    Sym(String),    // :foo, :==
    Int(i64),
    Float(String),
    Str(String),
    /// A `kind?` predicate: `str?`, `send_type?`. Excludes `nil?`.
    KindPred(String),
    /// `nil?` — matches a structurally absent child.
    AbsentPred,
    /// Bare word: kind names (`send`, `lvar`) and the literal keywords.
    Ident(String),
}

pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input: input.as_bytes(), pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn read_while(&mut self, pred: impl Fn(u8) -> bool) -> String {
        let start = self.pos;
        while self.pos < self.input.len() && pred(self.input[self.pos]) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn is_word_char(ch: u8) -> bool {
        ch.is_ascii_alphanumeric() || ch == b'_'
    }

    /// Resolve a `foo?` word to its kind predicate token. The Parser gem
    /// spells a few of these with a `_type` suffix.
    fn kind_pred(word: &str) -> Token {
        let base = word.strip_suffix('?').unwrap_or(word);
        let kind = base.strip_suffix("_type").unwrap_or(base);
        Token::KindPred(kind.to_string())
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, PatternError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else { break };

            match ch {
                b'(' => {
                    self.bump();
                    tokens.push(Token::Open);
                }
                b')' => {
                    self.bump();
                    tokens.push(Token::Close);
                }
                b'{' => {
                    self.bump();
                    tokens.push(Token::OpenBrace);
                }
                b'}' => {
                    self.bump();
                    tokens.push(Token::CloseBrace);
                }
                b'[' => {
                    self.bump();
                    tokens.push(Token::OpenBracket);
                }
                b']' => {
                    self.bump();
                    tokens.push(Token::CloseBracket);
                }
                b'$' => {
                    self.bump();
                    tokens.push(Token::Capture);
                }
                b'|' => {
                    self.bump();
                    tokens.push(Token::Pipe);
                }
                b'^' => {
                    self.bump();
                    tokens.push(Token::Caret);
                }
                b'`' => {
                    self.bump();
                    tokens.push(Token::Backtick);
                }
                b'!' => {
                    self.bump();
                    tokens.push(Token::Bang);
                }
                b'.' => {
                    if self.input[self.pos..].starts_with(b"...") {
                        self.pos += 3;
                        tokens.push(Token::Rest);
                    } else {
                        return Err(PatternError::UnexpectedChar { ch: '.', at: self.pos });
                    }
                }
                b'#' => {
                    self.bump();
                    let name = self.read_while(|c| Self::is_word_char(c) || c == b'?');
                    tokens.push(Token::Helper(name));
                }
                b'%' => {
                    self.bump();
                    let name = self.read_while(Self::is_word_char);
                    tokens.push(Token::Param(name));
                }
                b':' => {
                    self.bump();
                    if self.peek() == Some(b':') {
                        // :: — cbase prefix
                        self.bump();
                        tokens.push(Token::Ident("cbase".to_string()));
                    } else {
                        // Symbols may be operator method names: :==, :<=>,
                        // :[], :+, :<<, ...
                        let name = if self.peek().is_some_and(|c| b"=<>!~+*&|^/%-".contains(&c)) {
                            self.read_while(|c| b"=<>!~+*&|^/%-[]@".contains(&c))
                        } else {
                            self.read_while(|c| {
                                Self::is_word_char(c) || c == b'?' || c == b'!' || c == b'='
                            })
                        };
                        if name.is_empty() {
                            return Err(PatternError::UnexpectedChar { ch: ':', at: self.pos - 1 });
                        }
                        tokens.push(Token::Sym(name));
                    }
                }
                b'\'' | b'"' => {
                    let quote = self.bump().unwrap_or(ch);
                    let s = self.read_while(move |c| c != quote);
                    if self.bump().is_none() {
                        return Err(PatternError::UnterminatedString);
                    }
                    tokens.push(Token::Str(s));
                }
                b'_' => {
                    let word = self.read_while(|c| Self::is_word_char(c) || c == b'?');
                    if word == "_" {
                        tokens.push(Token::Wildcard);
                    } else {
                        tokens.push(Token::Ident(word));
                    }
                }
                _ if ch.is_ascii_digit()
                    || (ch == b'-'
                        && self.input.get(self.pos + 1).is_some_and(|c| c.is_ascii_digit())) =>
                {
                    let text = self.read_while(|c| c.is_ascii_digit() || c == b'-' || c == b'.');
                    if text.contains('.') {
                        tokens.push(Token::Float(text));
                    } else {
                        match text.parse::<i64>() {
                            Ok(n) => tokens.push(Token::Int(n)),
                            Err(_) => {
                                return Err(PatternError::Unexpected(text));
                            }
                        }
                    }
                }
                _ if ch.is_ascii_alphabetic() => {
                    let word = self.read_while(|c| Self::is_word_char(c) || c == b'?');
                    if word == "nil?" {
                        tokens.push(Token::AbsentPred);
                    } else if word.ends_with('?') {
                        tokens.push(Self::kind_pred(&word));
                    } else {
                        tokens.push(Token::Ident(word));
                    }
                }
                _ => {
                    return Err(PatternError::UnexpectedChar {
                        ch: ch as char,
                        at: self.pos,
                    });
                }
            }
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize().unwrap()
    }

    #[test]
    fn test_lexer_basic() {
        let tokens = lex("(send nil? :expect ...)");
        assert_eq!(tokens[0], Token::Open);
        assert_eq!(tokens[1], Token::Ident("send".to_string()));
        assert_eq!(tokens[2], Token::AbsentPred);
        assert_eq!(tokens[3], Token::Sym("expect".to_string()));
        assert_eq!(tokens[4], Token::Rest);
        assert_eq!(tokens[5], Token::Close);
    }

    #[test]
    fn test_lexer_alternatives() {
        let tokens = lex("{:first :take}");
        assert_eq!(tokens[0], Token::OpenBrace);
        assert_eq!(tokens[1], Token::Sym("first".to_string()));
        assert_eq!(tokens[2], Token::Sym("take".to_string()));
        assert_eq!(tokens[3], Token::CloseBrace);
    }

    #[test]
    fn test_lexer_operator_symbol() {
        assert_eq!(lex(":=="), vec![Token::Sym("==".to_string())]);
        assert_eq!(lex(":<=>"), vec![Token::Sym("<=>".to_string())]);
        assert_eq!(lex(":+"), vec![Token::Sym("+".to_string())]);
    }

    #[test]
    fn test_lexer_kind_predicates() {
        assert_eq!(lex("str?"), vec![Token::KindPred("str".to_string())]);
        assert_eq!(lex("send_type?"), vec![Token::KindPred("send".to_string())]);
        assert_eq!(lex("nil?"), vec![Token::AbsentPred]);
    }

    #[test]
    fn test_lexer_negation_and_capture() {
        assert_eq!(lex("!nil?"), vec![Token::Bang, Token::AbsentPred]);
        assert_eq!(lex("$_"), vec![Token::Capture, Token::Wildcard]);
    }

    #[test]
    fn test_lexer_literals() {
        assert_eq!(lex("42"), vec![Token::Int(42)]);
        assert_eq!(lex("-1"), vec![Token::Int(-1)]);
        assert_eq!(lex("3.14"), vec![Token::Float("3.14".to_string())]);
        assert_eq!(lex("'hello'"), vec![Token::Str("hello".to_string())]);
    }

    #[test]
    fn test_lexer_cbase() {
        assert_eq!(lex("::"), vec![Token::Ident("cbase".to_string())]);
    }

    #[test]
    fn test_lexer_helper_and_param() {
        assert_eq!(lex("#helper?"), vec![Token::Helper("helper?".to_string())]);
        assert_eq!(lex("%1"), vec![Token::Param("1".to_string())]);
    }

    #[test]
    fn test_lexer_rejects_unknown_char() {
        assert!(matches!(
            Lexer::new("(send @ :foo)").tokenize(),
            Err(PatternError::UnexpectedChar { ch: '@', .. })
        ));
    }

    #[test]
    fn test_lexer_rejects_unterminated_string() {
        assert!(matches!(
            Lexer::new("'open").tokenize(),
            Err(PatternError::UnterminatedString)
        ));
    }

    #[test]
    fn test_lexer_rejects_lone_dot() {
        assert!(matches!(
            Lexer::new("(send . :foo)").tokenize(),
            Err(PatternError::UnexpectedChar { ch: '.', .. })
        ));
    }
}
