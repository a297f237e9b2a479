use std::ops::Range;

use crate::parser::error::ParseError;
use crate::parser::lexer::{Spanned, Token};
use crate::pattern::{Pattern, UnsupportedPattern};
use crate::value::{SeqKind, Value};
use crate::{Arm, Chain};

/// Recursive-descent parser over a token stream.
pub(crate) struct NotationParser {
    tokens: Vec<Spanned>,
    pos: usize,
    /// Byte length of the source, used to point at end of input.
    end: usize,
    file_id: usize,
}

impl NotationParser {
    pub(crate) fn new(tokens: Vec<Spanned>, end: usize, file_id: usize) -> Self {
        NotationParser {
            tokens,
            pos: 0,
            end,
            file_id,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_span(&self) -> Range<usize> {
        match self.tokens.get(self.pos) {
            Some((_, span)) => span.clone(),
            None => self.end..self.end,
        }
    }

    fn advance(&mut self) -> Option<Spanned> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error_here(&self, msg: impl Into<String>) -> ParseError {
        ParseError::error(msg, self.peek_span(), self.file_id)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(t) => self.error_here(format!("expected {}, found {}", expected, t.describe())),
            None => self.error_here(format!("expected {}, found end of input", expected)),
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), ParseError> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(self.unexpected(&token.describe()))
        }
    }

    pub(crate) fn finish(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(t) => Err(self.error_here(format!("unexpected {} after input", t.describe()))),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    pub(crate) fn parse_chain(&mut self) -> Result<Chain, ParseError> {
        let mut alternatives = vec![self.parse_arm()?];
        while self.eat(&Token::Pipe) {
            alternatives.push(self.parse_arm()?);
        }
        Ok(Chain {
            alternatives,
            source_id: self.file_id,
        })
    }

    fn parse_arm(&mut self) -> Result<Arm, ParseError> {
        let start = self.peek_span().start;
        let test = self.eat(&Token::Tilde);
        let pattern = self.parse_pattern()?;
        let default = if self.eat(&Token::FatArrow) {
            Some(self.parse_value()?)
        } else {
            None
        };
        let end = self
            .tokens
            .get(self.pos.saturating_sub(1))
            .map_or(start, |(_, span)| span.end);
        Ok(Arm {
            pattern,
            test,
            default,
            span: start..end,
        })
    }

    // ------------------------------------------------------------------
    // Patterns
    // ------------------------------------------------------------------

    pub(crate) fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        match self.peek() {
            Some(Token::Underscore) => {
                self.advance();
                Ok(Pattern::ANY)
            }
            Some(Token::CaptureAt(index)) => {
                let index = *index;
                self.advance();
                Ok(Pattern::capture_at(index))
            }
            Some(Token::LBracket) => {
                self.advance();
                let elements = self.parse_items(Token::RBracket, Self::parse_pattern)?;
                Ok(Pattern::list(elements))
            }
            Some(Token::LParen) => {
                self.advance();
                match self.parse_parenthesised(Self::parse_pattern)? {
                    Grouped::Single(p) => Ok(p),
                    Grouped::Tuple(elements) => Ok(Pattern::tuple(elements)),
                }
            }
            Some(Token::LBrace) => {
                // Parsed in pattern mode so captures inside the braces do not
                // mask the real problem.
                let start = self.peek_span().start;
                self.advance();
                let kind = match self.parse_braced(Self::parse_pattern)? {
                    Braced::Map(_) => UnsupportedPattern::Map,
                    Braced::Set(_) => UnsupportedPattern::Set,
                };
                let span = start..self.tokens[self.pos - 1].1.end;
                Err(ParseError::unsupported(kind, span, self.file_id))
            }
            Some(Token::Ident(_)) => {
                let start = self.peek_span().start;
                let value = self.parse_value()?;
                let span = start..self.tokens[self.pos - 1].1.end;
                Pattern::literal(value)
                    .map_err(|kind| ParseError::unsupported(kind, span, self.file_id))
            }
            _ => {
                let value = self.parse_scalar()?;
                // Scalars are always valid literals.
                Pattern::literal(value).map_err(|kind| {
                    ParseError::unsupported(kind, self.peek_span(), self.file_id)
                })
            }
        }
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    pub(crate) fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            Some(Token::LBracket) => {
                self.advance();
                let items = self.parse_items(Token::RBracket, Self::parse_value)?;
                Ok(Value::List(items))
            }
            Some(Token::LParen) => {
                self.advance();
                match self.parse_parenthesised(Self::parse_value)? {
                    Grouped::Single(v) => Ok(v),
                    Grouped::Tuple(items) => Ok(Value::Tuple(items)),
                }
            }
            Some(Token::LBrace) => {
                self.advance();
                match self.parse_braced(Self::parse_value)? {
                    Braced::Map(entries) => Ok(Value::Map(entries)),
                    Braced::Set(items) => Ok(Value::Set(items)),
                }
            }
            Some(Token::Ident(name)) if name == "set" => {
                self.advance();
                self.expect(Token::LParen)?;
                self.expect(Token::RParen)?;
                Ok(Value::Set(Vec::new()))
            }
            Some(Token::Underscore) | Some(Token::CaptureAt(_)) => {
                Err(self.error_here("captures are only allowed in patterns"))
            }
            _ => self.parse_scalar(),
        }
    }

    fn parse_scalar(&mut self) -> Result<Value, ParseError> {
        let span = self.peek_span();
        match self.advance() {
            Some((Token::Int(n), _)) => Ok(Value::Int(n)),
            Some((Token::Float(x), _)) => Ok(Value::Float(x)),
            Some((Token::Str(s), _)) => Ok(Value::Str(s)),
            Some((Token::Ident(name), _)) => match name.as_str() {
                "none" => Ok(Value::None),
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(ParseError::error(
                    format!("unknown name `{}`", name),
                    span,
                    self.file_id,
                )
                .with_note("expected `none`, `true` or `false`")),
            },
            Some((t, _)) => Err(ParseError::error(
                format!("expected a value, found {}", t.describe()),
                span,
                self.file_id,
            )),
            None => Err(ParseError::error(
                "expected a value, found end of input",
                span,
                self.file_id,
            )),
        }
    }

    // ------------------------------------------------------------------
    // Shared sequence helpers
    // ------------------------------------------------------------------

    /// Comma-separated items up to `close`, trailing comma allowed. The
    /// opening delimiter has already been consumed.
    fn parse_items<T>(
        &mut self,
        close: Token,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.eat(&close) {
                return Ok(items);
            }
            items.push(item(self)?);
            if !self.eat(&Token::Comma) {
                self.expect(close)?;
                return Ok(items);
            }
        }
    }

    /// `()` and `(a,)` are tuples; `(a)` is plain grouping.
    fn parse_parenthesised<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Grouped<T>, ParseError> {
        if self.eat(&Token::RParen) {
            return Ok(Grouped::Tuple(Vec::new()));
        }
        let first = item(self)?;
        if self.eat(&Token::RParen) {
            return Ok(Grouped::Single(first));
        }
        self.expect(Token::Comma)?;
        let mut items = vec![first];
        items.extend(self.parse_items(Token::RParen, item)?);
        Ok(Grouped::Tuple(items))
    }

    /// `{}` is an empty map, `{k: v, ...}` a map, `{a, ...}` a set. The
    /// opening brace has already been consumed.
    fn parse_braced<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Braced<T>, ParseError> {
        if self.eat(&Token::RBrace) {
            return Ok(Braced::Map(Vec::new()));
        }
        let first = item(self)?;
        if self.eat(&Token::Colon) {
            let mut entries = vec![(first, item(self)?)];
            while self.eat(&Token::Comma) {
                if self.peek() == Some(&Token::RBrace) {
                    break;
                }
                let key = item(self)?;
                self.expect(Token::Colon)?;
                entries.push((key, item(self)?));
            }
            self.expect(Token::RBrace)?;
            Ok(Braced::Map(entries))
        } else {
            let mut items = vec![first];
            while self.eat(&Token::Comma) {
                if self.peek() == Some(&Token::RBrace) {
                    break;
                }
                items.push(item(self)?);
            }
            self.expect(Token::RBrace)?;
            Ok(Braced::Set(items))
        }
    }
}

enum Grouped<T> {
    Single(T),
    Tuple(Vec<T>),
}

enum Braced<T> {
    Map(Vec<(T, T)>),
    Set(Vec<T>),
}
