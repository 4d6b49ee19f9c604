//! A lexer which consumes a stream of `char`s and produces a stream of [Token]s, each packed
//! alongside the [Span] of input it was matched from. The lexer works with a single character
//! of lookahead and translates escape sequences within strings as it goes.
use std::fmt::{Display, Formatter};
use std::iter::Peekable;

use crate::coords::{Coords, Span};
use crate::decode_error;
use crate::errors::{Details, ParserResult};

/// Sequence of literal characters forming a 'null' token
const NULL_SEQUENCE: &str = "null";
/// Sequence of literal characters forming a 'true' token
const TRUE_SEQUENCE: &str = "true";
/// Sequence of literal characters forming a 'false' token
const FALSE_SEQUENCE: &str = "false";

/// Default string buffer capacity
const DEFAULT_BUFFER_CAPACITY: usize = 64;

/// Enumeration of valid JSON tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Colon,
    Comma,
    Str(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
    Null,
    EndOfInput,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::StartObject => write!(f, "'{{'"),
            Token::EndObject => write!(f, "'}}'"),
            Token::StartArray => write!(f, "'['"),
            Token::EndArray => write!(f, "']'"),
            Token::Colon => write!(f, "':'"),
            Token::Comma => write!(f, "','"),
            Token::Str(s) => write!(f, "string {:?}", s),
            Token::Float(n) => write!(f, "number {}", n),
            Token::Integer(n) => write!(f, "number {}", n),
            Token::Boolean(b) => write!(f, "boolean {}", b),
            Token::Null => write!(f, "null"),
            Token::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// A packed token consists of a [Token] and the [Span] associated with it
pub type PackedToken = (Token, Span);

/// Convenience macro for packing tokens along with their positional information
macro_rules! packed_token {
    ($t:expr, $s:expr, $e:expr) => {
        ($t, Span { start: $s, end: $e })
    };
    ($t:expr, $s:expr) => {
        ($t, Span { start: $s, end: $s })
    };
}

pub struct Lexer<'a> {
    /// The source of characters
    chars: Peekable<&'a mut dyn Iterator<Item = char>>,
    /// Coordinates of the next character to be consumed
    position: Coords,
    /// Scratch buffer used when matching numbers
    buffer: String,
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a mut dyn Iterator<Item = char>) -> Self {
        Lexer {
            chars: chars.peekable(),
            position: Coords::default(),
            buffer: String::with_capacity(DEFAULT_BUFFER_CAPACITY),
        }
    }

    /// Consume the next token from the input stream. Whitespace between tokens is skipped and
    /// [Token::EndOfInput] is produced once the input is exhausted.
    pub fn consume(&mut self) -> ParserResult<PackedToken> {
        self.skip_whitespace();
        let start = self.position;
        match self.chars.peek().copied() {
            None => Ok(packed_token!(Token::EndOfInput, start)),
            Some('{') => self.match_single(Token::StartObject),
            Some('}') => self.match_single(Token::EndObject),
            Some('[') => self.match_single(Token::StartArray),
            Some(']') => self.match_single(Token::EndArray),
            Some(':') => self.match_single(Token::Colon),
            Some(',') => self.match_single(Token::Comma),
            Some('"') => self.match_string(),
            Some('n') => self.match_literal(NULL_SEQUENCE, Token::Null),
            Some('t') => self.match_literal(TRUE_SEQUENCE, Token::Boolean(true)),
            Some('f') => self.match_literal(FALSE_SEQUENCE, Token::Boolean(false)),
            Some(c) if c == '-' || c.is_ascii_digit() => self.match_number(),
            Some(c) => decode_error!(Details::InvalidCharacter(c), start),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.chars.next();
        if let Some(c) = next {
            self.position.advance(c);
        }
        next
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.chars.peek() {
            self.advance();
        }
    }

    fn match_single(&mut self, token: Token) -> ParserResult<PackedToken> {
        let start = self.position;
        self.advance();
        Ok(packed_token!(token, start, self.position))
    }

    /// Match (exactly) a sequence of literal characters, such as `true`
    fn match_literal(&mut self, literal: &str, token: Token) -> ParserResult<PackedToken> {
        let start = self.position;
        for expected in literal.chars() {
            let at = self.position;
            match self.advance() {
                Some(c) if c == expected => (),
                Some(c) => return decode_error!(Details::InvalidCharacter(c), at),
                None => return decode_error!(Details::EndOfInput, at),
            }
        }
        Ok(packed_token!(token, start, self.position))
    }

    /// Push the next char onto the number buffer if it satisfies the predicate
    fn push_if(&mut self, predicate: impl Fn(char) -> bool) -> bool {
        match self.chars.peek().copied() {
            Some(c) if predicate(c) => {
                self.advance();
                self.buffer.push(c);
                true
            }
            _ => false,
        }
    }

    /// Push a run of digits onto the number buffer, returning how many were found
    fn push_digits(&mut self) -> usize {
        let mut count = 0;
        while self.push_if(|c| c.is_ascii_digit()) {
            count += 1;
        }
        count
    }

    /// Match a number against the strict JSON grammar, then hand the validated text over to
    /// `lexical` or `fast_float` for conversion
    fn match_number(&mut self) -> ParserResult<PackedToken> {
        let start = self.position;
        self.buffer.clear();
        let mut integral = true;

        self.push_if(|c| c == '-');
        if self.push_if(|c| c == '0') {
            if self.push_digits() > 0 {
                return self.invalid_number(start);
            }
        } else if self.push_digits() == 0 {
            return self.invalid_number(start);
        }

        if self.push_if(|c| c == '.') {
            integral = false;
            if self.push_digits() == 0 {
                return self.invalid_number(start);
            }
        }

        if self.push_if(|c| c == 'e' || c == 'E') {
            integral = false;
            self.push_if(|c| c == '+' || c == '-');
            if self.push_digits() == 0 {
                return self.invalid_number(start);
            }
        }

        match self.numeric_token(integral) {
            Some(token) => Ok(packed_token!(token, start, self.position)),
            None => self.invalid_number(start),
        }
    }

    #[cfg(feature = "mixed_numerics")]
    fn numeric_token(&self, integral: bool) -> Option<Token> {
        if integral {
            if let Ok(value) = lexical::parse::<i64, _>(self.buffer.as_bytes()) {
                return Some(Token::Integer(value));
            }
        }
        self.float_token()
    }

    #[cfg(not(feature = "mixed_numerics"))]
    fn numeric_token(&self, _integral: bool) -> Option<Token> {
        self.float_token()
    }

    fn float_token(&self) -> Option<Token> {
        match fast_float::parse::<f64, _>(self.buffer.as_bytes()) {
            Ok(value) if value.is_finite() => Some(Token::Float(value)),
            _ => None,
        }
    }

    fn invalid_number(&mut self, start: Coords) -> ParserResult<PackedToken> {
        if let Some(c) = self.chars.peek().copied() {
            if c.is_ascii_alphanumeric() || c == '.' || c == '+' || c == '-' {
                self.buffer.push(c);
            }
        }
        decode_error!(
            Details::InvalidNumericRepresentation(self.buffer.clone()),
            start
        )
    }

    /// Match a string token, translating any escape sequences found within it
    fn match_string(&mut self) -> ParserResult<PackedToken> {
        let start = self.position;
        self.advance();
        let mut value = String::new();
        loop {
            let at = self.position;
            match self.advance() {
                Some('"') => break,
                Some('\\') => self.match_escape_sequence(&mut value, at)?,
                Some(c) if (c as u32) < 0x20 => {
                    return decode_error!(Details::InvalidCharacter(c), at)
                }
                Some(c) => value.push(c),
                None => return decode_error!(Details::EndOfInput, at),
            }
        }
        Ok(packed_token!(Token::Str(value), start, self.position))
    }

    fn match_escape_sequence(&mut self, value: &mut String, at: Coords) -> ParserResult<()> {
        let translated = match self.advance() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{0008}',
            Some('f') => '\u{000C}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => self.match_unicode_escape_sequence(at)?,
            Some(c) => {
                return decode_error!(Details::InvalidEscapeSequence(format!("\\{}", c)), at)
            }
            None => return decode_error!(Details::EndOfInput, self.position),
        };
        value.push(translated);
        Ok(())
    }

    /// Match the four hex digits following `\u`
    fn match_hex_quad(&mut self, at: Coords) -> ParserResult<u32> {
        let mut code = 0;
        let mut digits = String::with_capacity(4);
        for _ in 0..4 {
            match self.advance() {
                Some(c) => match c.to_digit(16) {
                    Some(d) => {
                        digits.push(c);
                        code = code * 16 + d;
                    }
                    None => {
                        return decode_error!(
                            Details::InvalidUnicodeEscapeSequence(format!("\\u{}{}", digits, c)),
                            at
                        )
                    }
                },
                None => return decode_error!(Details::EndOfInput, self.position),
            }
        }
        Ok(code)
    }

    /// Match a unicode escape, combining UTF-16 surrogate pairs into a single char
    fn match_unicode_escape_sequence(&mut self, at: Coords) -> ParserResult<char> {
        let high = self.match_hex_quad(at)?;
        let code = if (0xD800..0xDC00).contains(&high) {
            if self.advance() != Some('\\') || self.advance() != Some('u') {
                return decode_error!(
                    Details::InvalidUnicodeEscapeSequence(format!("\\u{:04x}", high)),
                    at
                );
            }
            let low = self.match_hex_quad(at)?;
            if !(0xDC00..0xE000).contains(&low) {
                return decode_error!(
                    Details::InvalidUnicodeEscapeSequence(format!(
                        "\\u{:04x}\\u{:04x}",
                        high, low
                    )),
                    at
                );
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };
        match char::from_u32(code) {
            Some(c) => Ok(c),
            None => decode_error!(
                Details::InvalidUnicodeEscapeSequence(format!("\\u{:04x}", code)),
                at
            ),
        }
    }
}
