pub mod error;
mod lexer;
mod notation;

pub use error::ParseError;

use crate::Chain;
use crate::pattern::Pattern;
use crate::value::Value;

use lexer::tokenize;
use notation::NotationParser;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    fn notation(&self) -> Result<NotationParser, ParseError> {
        let tokens = tokenize(&self.source, self.file_id)?;
        Ok(NotationParser::new(tokens, self.source.len(), self.file_id))
    }

    /// Parse a full match expression: `alt | alt | ...`.
    pub fn parse(&self) -> Result<Chain, ParseError> {
        let mut parser = self.notation()?;
        let chain = parser.parse_chain()?;
        parser.finish()?;
        Ok(chain)
    }

    pub fn parse_value(&self) -> Result<Value, ParseError> {
        let mut parser = self.notation()?;
        let value = parser.parse_value()?;
        parser.finish()?;
        Ok(value)
    }

    pub fn parse_pattern(&self) -> Result<Pattern, ParseError> {
        let mut parser = self.notation()?;
        let pattern = parser.parse_pattern()?;
        parser.finish()?;
        Ok(pattern)
    }
}

pub fn parse_chain(source: &str) -> Result<Chain, ParseError> {
    Parser::new(source.to_string(), 0).parse()
}

pub fn parse_value(source: &str) -> Result<Value, ParseError> {
    Parser::new(source.to_string(), 0).parse_value()
}

pub fn parse_pattern(source: &str) -> Result<Pattern, ParseError> {
    Parser::new(source.to_string(), 0).parse_pattern()
}
