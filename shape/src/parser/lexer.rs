use std::ops::Range;

use crate::parser::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    // Literals
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),

    // Captures
    Underscore,      // _
    CaptureAt(usize), // #0, #1, ...

    // Expression operators
    Pipe,     // |
    Tilde,    // ~
    FatArrow, // =>

    // Punctuation
    Comma,
    Colon,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Int(n) => format!("integer `{}`", n),
            Token::Float(x) => format!("float `{}`", x),
            Token::Str(_) => "string literal".to_string(),
            Token::Ident(name) => format!("`{}`", name),
            Token::Underscore => "`_`".to_string(),
            Token::CaptureAt(n) => format!("`#{}`", n),
            Token::Pipe => "`|`".to_string(),
            Token::Tilde => "`~`".to_string(),
            Token::FatArrow => "`=>`".to_string(),
            Token::Comma => "`,`".to_string(),
            Token::Colon => "`:`".to_string(),
            Token::LBracket => "`[`".to_string(),
            Token::RBracket => "`]`".to_string(),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::LBrace => "`{`".to_string(),
            Token::RBrace => "`}`".to_string(),
        }
    }
}

pub(crate) type Spanned = (Token, Range<usize>);

/// Split notation source into tokens with byte spans.
pub(crate) fn tokenize(text: &str, file_id: usize) -> Result<Vec<Spanned>, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    // Map character indices to byte offsets within the text
    let byte_pos: Vec<usize> = {
        let mut bp = Vec::with_capacity(len + 1);
        let mut offset = 0;
        for c in &chars {
            bp.push(offset);
            offset += c.len_utf8();
        }
        bp.push(offset);
        bp
    };

    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        let start = i;
        let c = chars[i];
        let token = match c {
            ' ' | '\t' | '\n' | '\r' => {
                i += 1;
                continue;
            }

            '"' => {
                i += 1;
                let mut s = String::new();
                loop {
                    match chars.get(i) {
                        None => {
                            return Err(ParseError::error(
                                "unterminated string literal",
                                byte_pos[start]..byte_pos[len],
                                file_id,
                            ));
                        }
                        Some('"') => {
                            i += 1;
                            break;
                        }
                        Some('\\') => {
                            let escaped = match chars.get(i + 1) {
                                Some('n') => '\n',
                                Some('t') => '\t',
                                Some('"') => '"',
                                Some('\\') => '\\',
                                _ => {
                                    let end = (i + 2).min(len);
                                    return Err(ParseError::error(
                                        "unknown escape sequence",
                                        byte_pos[i]..byte_pos[end],
                                        file_id,
                                    ));
                                }
                            };
                            s.push(escaped);
                            i += 2;
                        }
                        Some(&ch) => {
                            s.push(ch);
                            i += 1;
                        }
                    }
                }
                Token::Str(s)
            }

            '-' if chars.get(i + 1).is_some_and(|d| d.is_ascii_digit()) => {
                i = scan_number(&chars, i + 1);
                number_token(&chars, start, i, &byte_pos, file_id)?
            }

            '-' if chars.get(i + 1).is_some_and(|d| d.is_ascii_alphabetic()) => {
                // -inf
                i += 1;
                while i < len && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let word: String = chars[start + 1..i].iter().collect();
                if word != "inf" {
                    return Err(ParseError::error(
                        format!("unexpected `-{}`", word),
                        byte_pos[start]..byte_pos[i],
                        file_id,
                    ));
                }
                Token::Float(f64::NEG_INFINITY)
            }

            '0'..='9' => {
                i = scan_number(&chars, i);
                number_token(&chars, start, i, &byte_pos, file_id)?
            }

            'a'..='z' | 'A'..='Z' | '_' => {
                while i < len && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                match ident.as_str() {
                    "_" => Token::Underscore,
                    "inf" => Token::Float(f64::INFINITY),
                    "nan" => Token::Float(f64::NAN),
                    _ => Token::Ident(ident),
                }
            }

            // Tagged captures: #0, #1, ...
            '#' => {
                i += 1;
                let digits_start = i;
                while i < len && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let span = byte_pos[start]..byte_pos[i];
                if digits_start == i {
                    return Err(ParseError::error(
                        "expected a capture index after `#`",
                        span,
                        file_id,
                    )
                    .with_note("capture indices are non-negative integers, e.g. `#0`"));
                }
                let digits: String = chars[digits_start..i].iter().collect();
                let index = digits.parse::<usize>().map_err(|_| {
                    ParseError::error("capture index is too large", span.clone(), file_id)
                })?;
                Token::CaptureAt(index)
            }

            '=' if chars.get(i + 1) == Some(&'>') => {
                i += 2;
                Token::FatArrow
            }

            '|' => {
                i += 1;
                Token::Pipe
            }
            '~' => {
                i += 1;
                Token::Tilde
            }
            ',' => {
                i += 1;
                Token::Comma
            }
            ':' => {
                i += 1;
                Token::Colon
            }
            '[' => {
                i += 1;
                Token::LBracket
            }
            ']' => {
                i += 1;
                Token::RBracket
            }
            '(' => {
                i += 1;
                Token::LParen
            }
            ')' => {
                i += 1;
                Token::RParen
            }
            '{' => {
                i += 1;
                Token::LBrace
            }
            '}' => {
                i += 1;
                Token::RBrace
            }

            other => {
                return Err(ParseError::error(
                    format!("unexpected character `{}`", other),
                    byte_pos[i]..byte_pos[i + 1],
                    file_id,
                ));
            }
        };
        tokens.push((token, byte_pos[start]..byte_pos[i]));
    }

    Ok(tokens)
}

/// Advance past `digits[.digits][e[+-]digits]`, returning the end index.
fn scan_number(chars: &[char], mut i: usize) -> usize {
    let len = chars.len();
    while i < len && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i + 1 < len && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
        i += 1;
        while i < len && chars[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < len && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < len && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < len && chars[j].is_ascii_digit() {
            while j < len && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

fn number_token(
    chars: &[char],
    start: usize,
    end: usize,
    byte_pos: &[usize],
    file_id: usize,
) -> Result<Token, ParseError> {
    let text: String = chars[start..end].iter().collect();
    let span = byte_pos[start]..byte_pos[end];
    if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>()
            .map(Token::Float)
            .map_err(|_| ParseError::error(format!("invalid float `{}`", text), span, file_id))
    } else {
        text.parse::<i64>().map(Token::Int).map_err(|_| {
            ParseError::error(format!("integer `{}` is out of range", text), span, file_id)
        })
    }
}
