//! Parser for the filter text form.
//!
//! Filters are written as a brace-delimited list of `field:literal` bindings with
//! unquoted field names:
//!
//! ```text
//! filter     := '{' [binding (',' binding)*] '}'
//! binding    := identifier ':' literal
//! identifier := [A-Za-z_][A-Za-z0-9_]*
//! literal    := string | integer | float | true | false | null
//! string     := '"' characters '"'        (only \" and \\ are escapes)
//! integer    := '-'? digit+
//! float      := '-'? digit+ '.' digit+
//! ```
//!
//! Whitespace between tokens is ignored. Parsing happens in two passes: the lexer splits
//! the text into punctuation, quoted strings and bare words, and a recursive-descent
//! parser classifies each bare word by where it appears, so errors can say whether a
//! field name or a literal was malformed.
//!
//! # Example
//!
//! ```
//! use methoddb_core::{parser::parse, value::Value};
//!
//! let filter = parse(r#"{username:"johnperry", age:75}"#).unwrap();
//! assert_eq!(filter.get("age"), Some(&Value::Integer(75)));
//! ```

use std::{
    iter::Peekable,
    ops::Range,
    str::{CharIndices, FromStr},
    vec,
};

use thiserror::Error;

use crate::{
    query::{Condition, Filter},
    value::Value,
};

/// Why a filter failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("expected `{{` at start of filter")]
    MissingOpenBrace,
    #[error("unclosed `{{`")]
    UnclosedBrace,
    #[error("unexpected input after closing `}}`")]
    TrailingInput,
    #[error("expected a field name")]
    ExpectedField,
    #[error("invalid field name")]
    InvalidField,
    #[error("expected `:` after field name")]
    MissingColon,
    #[error("expected a value")]
    ExpectedValue,
    #[error("value is not a string, integer, float, boolean or null")]
    InvalidLiteral,
    #[error("integer literal out of range")]
    IntegerOutOfRange,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("trailing comma")]
    TrailingComma,
    #[error("expected `,` or `}}`")]
    ExpectedSeparator,
    #[error("duplicate field `{0}`")]
    DuplicateField(String),
}

/// A filter text that could not be parsed.
///
/// `position` is the byte offset of the offending input and `fragment` the offending
/// text itself (empty when the input ended too early).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid query: {kind} at {}", describe_location(.position, .fragment))]
pub struct QuerySyntaxError {
    pub position: usize,
    pub fragment: String,
    pub kind: SyntaxErrorKind,
}

impl QuerySyntaxError {
    fn new(position: usize, fragment: &str, kind: SyntaxErrorKind) -> Self {
        QuerySyntaxError {
            position,
            fragment: fragment.to_string(),
            kind,
        }
    }
}

fn describe_location(position: &usize, fragment: &str) -> String {
    if fragment.is_empty() {
        "end of input".to_string()
    } else {
        format!("position {position} (`{fragment}`)")
    }
}

/// Parses filter text into a [`Filter`].
///
/// # Errors
///
/// Returns a [`QuerySyntaxError`] when the braces are missing or unbalanced, a binding
/// lacks its colon, a field name or literal is malformed, a trailing comma is present,
/// or a field appears more than once.
pub fn parse(text: &str) -> Result<Filter, QuerySyntaxError> {
    let tokens = Lexer::new(text).tokenize()?;
    Parser::new(text, tokens).parse_filter()
}

impl FromStr for Filter {
    type Err = QuerySyntaxError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    OpenBrace,
    CloseBrace,
    Colon,
    Comma,
    /// Contents of a double-quoted string, escapes resolved.
    Str(String),
    /// Any other run of non-delimiter characters.
    Bare(String),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    span: Range<usize>,
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, QuerySyntaxError> {
        let mut tokens = Vec::new();

        while let Some(&(start, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
                continue;
            }

            let kind = match ch {
                '{' | '}' | ':' | ',' => {
                    self.chars.next();
                    match ch {
                        '{' => TokenKind::OpenBrace,
                        '}' => TokenKind::CloseBrace,
                        ':' => TokenKind::Colon,
                        _ => TokenKind::Comma,
                    }
                }
                '"' => self.string(start)?,
                _ => self.bare(),
            };

            tokens.push(Token {
                kind,
                span: start..self.offset(),
            });
        }

        Ok(tokens)
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map_or(self.source.len(), |&(index, _)| index)
    }

    fn string(&mut self, start: usize) -> Result<TokenKind, QuerySyntaxError> {
        // opening quote
        self.chars.next();
        let mut value = String::new();

        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(TokenKind::Str(value)),
                Some((_, '\\')) => match self.chars.peek() {
                    Some(&(_, escaped @ ('"' | '\\'))) => {
                        value.push(escaped);
                        self.chars.next();
                    }
                    _ => value.push('\\'),
                },
                Some((_, ch)) => value.push(ch),
                None => {
                    return Err(QuerySyntaxError::new(
                        start,
                        &self.source[start..],
                        SyntaxErrorKind::UnterminatedString,
                    ));
                }
            }
        }
    }

    fn bare(&mut self) -> TokenKind {
        let mut word = String::new();

        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '{' | '}' | ':' | ',' | '"') {
                break;
            }
            word.push(ch);
            self.chars.next();
        }

        TokenKind::Bare(word)
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Peekable<vec::IntoIter<Token>>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Parser {
            source,
            tokens: tokens.into_iter().peekable(),
        }
    }

    fn parse_filter(mut self) -> Result<Filter, QuerySyntaxError> {
        match self.tokens.next() {
            Some(Token { kind: TokenKind::OpenBrace, .. }) => {}
            Some(token) => return Err(self.error_at(&token.span, SyntaxErrorKind::MissingOpenBrace)),
            None => return Err(self.error_at_end(SyntaxErrorKind::MissingOpenBrace)),
        }

        let mut filter = Filter::new();

        if self.next_is(&TokenKind::CloseBrace) {
            self.tokens.next();
        } else {
            loop {
                self.parse_binding(&mut filter)?;

                match self.tokens.next() {
                    Some(Token { kind: TokenKind::Comma, span }) => {
                        if self.next_is(&TokenKind::CloseBrace) {
                            return Err(self.error_at(&span, SyntaxErrorKind::TrailingComma));
                        }
                    }
                    Some(Token { kind: TokenKind::CloseBrace, .. }) => break,
                    Some(token) => {
                        return Err(self.error_at(&token.span, SyntaxErrorKind::ExpectedSeparator));
                    }
                    None => return Err(self.error_at_end(SyntaxErrorKind::UnclosedBrace)),
                }
            }
        }

        if let Some(token) = self.tokens.next() {
            return Err(self.error_at(&token.span, SyntaxErrorKind::TrailingInput));
        }

        Ok(filter)
    }

    fn parse_binding(&mut self, filter: &mut Filter) -> Result<(), QuerySyntaxError> {
        let Token { kind, span: field_span } = self
            .tokens
            .next()
            .ok_or_else(|| self.error_at_end(SyntaxErrorKind::ExpectedField))?;

        let field = match kind {
            TokenKind::Bare(word) if is_identifier(&word) => word,
            TokenKind::Bare(_) | TokenKind::Str(_) => {
                return Err(self.error_at(&field_span, SyntaxErrorKind::InvalidField));
            }
            _ => return Err(self.error_at(&field_span, SyntaxErrorKind::ExpectedField)),
        };

        match self.tokens.next() {
            Some(Token { kind: TokenKind::Colon, .. }) => {}
            Some(token) => return Err(self.error_at(&token.span, SyntaxErrorKind::MissingColon)),
            None => return Err(self.error_at_end(SyntaxErrorKind::MissingColon)),
        }

        let Token { kind, span } = self
            .tokens
            .next()
            .ok_or_else(|| self.error_at_end(SyntaxErrorKind::ExpectedValue))?;

        let value = match kind {
            TokenKind::Str(text) => Value::String(text),
            TokenKind::Bare(word) => {
                classify_literal(&word).map_err(|reason| self.error_at(&span, reason))?
            }
            _ => return Err(self.error_at(&span, SyntaxErrorKind::ExpectedValue)),
        };

        filter
            .try_push(Condition { field, value })
            .map_err(|rejected| {
                self.error_at(&field_span, SyntaxErrorKind::DuplicateField(rejected.field))
            })
    }

    fn next_is(&mut self, kind: &TokenKind) -> bool {
        self.tokens
            .peek()
            .is_some_and(|token| &token.kind == kind)
    }

    fn error_at(&self, span: &Range<usize>, kind: SyntaxErrorKind) -> QuerySyntaxError {
        QuerySyntaxError::new(span.start, &self.source[span.clone()], kind)
    }

    fn error_at_end(&self, kind: SyntaxErrorKind) -> QuerySyntaxError {
        QuerySyntaxError::new(self.source.len(), "", kind)
    }
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn classify_literal(word: &str) -> Result<Value, SyntaxErrorKind> {
    match word {
        "true" => return Ok(Value::Boolean(true)),
        "false" => return Ok(Value::Boolean(false)),
        "null" => return Ok(Value::Null),
        _ => {}
    }

    let unsigned = word.strip_prefix('-').unwrap_or(word);

    match unsigned.split_once('.') {
        None if is_digits(unsigned) => word
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| SyntaxErrorKind::IntegerOutOfRange),
        Some((whole, fraction)) if is_digits(whole) && is_digits(fraction) => word
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| SyntaxErrorKind::InvalidLiteral),
        _ => Err(SyntaxErrorKind::InvalidLiteral),
    }
}
