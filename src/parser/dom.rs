//! The DOM parser
//!
//! Decodes a complete JSON document into a [JsonValue] tree, which is then held in memory for
//! querying. Any JSON value is accepted at the root.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::decode_error;
use crate::decoders::{DecoderSelector, Encoding};
use crate::errors::{Details, ParserResult};
use crate::lexer::{Lexer, PackedToken, Token};
use crate::JsonValue;

/// Maximum nesting depth of objects and arrays
pub const MAX_DEPTH: usize = 512;

/// Main JSON parser struct
#[derive(Default)]
pub struct Parser {
    decoders: DecoderSelector,
    encoding: Encoding,
}

impl Parser {
    /// Create a new instance of the parser using a specific [Encoding]
    pub fn with_encoding(encoding: Encoding) -> Self {
        Self {
            decoders: Default::default(),
            encoding,
        }
    }

    pub fn parse_file<PathLike: AsRef<Path>>(&self, path: PathLike) -> ParserResult<JsonValue> {
        match File::open(&path) {
            Ok(f) => self.parse_reader(BufReader::new(f)),
            Err(err) => {
                log::debug!("failed to open {}: {}", path.as_ref().display(), err);
                decode_error!(Details::InvalidFile)
            }
        }
    }

    /// Read the whole of the input, check that it is well formed for the configured encoding
    /// and then parse it
    pub fn parse_reader<Buffer: BufRead>(&self, mut reader: Buffer) -> ParserResult<JsonValue> {
        let mut bytes = vec![];
        if let Err(err) = reader.read_to_end(&mut bytes) {
            log::debug!("failed to read input: {}", err);
            return decode_error!(Details::StreamFailure);
        }
        self.decoders.validate(&bytes, self.encoding)?;
        let mut buffer: &[u8] = &bytes;
        let mut chars = self.decoders.new_decoder(&mut buffer, self.encoding);
        self.parse(&mut *chars)
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> ParserResult<JsonValue> {
        self.parse_reader(BufReader::new(bytes))
    }

    pub fn parse_str(&self, str: &str) -> ParserResult<JsonValue> {
        self.parse(&mut str.chars())
    }

    /// Parse a single JSON value from a stream of chars. Anything other than whitespace
    /// following the value is an error.
    pub fn parse(&self, chars: &mut dyn Iterator<Item = char>) -> ParserResult<JsonValue> {
        let mut lexer = Lexer::new(chars);
        let first = lexer.consume()?;
        let value = self.value_from(&mut lexer, first, 0)?;
        match lexer.consume()? {
            (Token::EndOfInput, _) => Ok(value),
            (_, span) => decode_error!(Details::TrailingContent, span.start),
        }
    }

    /// Build a value starting from a token which has already been consumed. `depth` is the
    /// number of containers enclosing the value.
    fn value_from(
        &self,
        lexer: &mut Lexer,
        packed: PackedToken,
        depth: usize,
    ) -> ParserResult<JsonValue> {
        match packed {
            (Token::StartObject | Token::StartArray, span) if depth >= MAX_DEPTH => {
                decode_error!(Details::MaxDepthExceeded, span.start)
            }
            (Token::StartObject, _) => self.parse_object(lexer, depth + 1),
            (Token::StartArray, _) => self.parse_array(lexer, depth + 1),
            (Token::Str(str), _) => Ok(JsonValue::String(str)),
            (Token::Float(value), _) => Ok(JsonValue::Float(value)),
            (Token::Integer(value), _) => Ok(JsonValue::Integer(value)),
            (Token::Boolean(value), _) => Ok(JsonValue::Boolean(value)),
            (Token::Null, _) => Ok(JsonValue::Null),
            (Token::EndOfInput, span) => decode_error!(Details::EndOfInput, span.start),
            (token, span) => {
                decode_error!(Details::UnexpectedToken(token.to_string()), span.start)
            }
        }
    }

    /// An object is just a list of comma separated KV pairs. Where a key is repeated, the
    /// last value wins but the key keeps its first position.
    fn parse_object(&self, lexer: &mut Lexer, depth: usize) -> ParserResult<JsonValue> {
        let mut pairs: Vec<(String, JsonValue)> = vec![];
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut next = lexer.consume()?;
        if next.0 == Token::EndObject {
            return Ok(JsonValue::Object(pairs));
        }
        loop {
            let key = match next {
                (Token::Str(key), _) => key,
                (Token::EndOfInput, span) => {
                    return decode_error!(Details::EndOfInput, span.start)
                }
                (_, span) => return decode_error!(Details::InvalidObject, span.start),
            };
            match lexer.consume()? {
                (Token::Colon, _) => (),
                (_, span) => return decode_error!(Details::PairExpected, span.start),
            }
            let value = self.parse_value(lexer, depth)?;
            match positions.get(&key) {
                Some(&position) => pairs[position].1 = value,
                None => {
                    positions.insert(key.clone(), pairs.len());
                    pairs.push((key, value));
                }
            }
            match lexer.consume()? {
                (Token::Comma, _) => next = lexer.consume()?,
                (Token::EndObject, _) => return Ok(JsonValue::Object(pairs)),
                (Token::EndOfInput, span) => {
                    return decode_error!(Details::EndOfInput, span.start)
                }
                (_, span) => return decode_error!(Details::InvalidObject, span.start),
            }
        }
    }

    /// An array is just a list of comma separated values
    fn parse_array(&self, lexer: &mut Lexer, depth: usize) -> ParserResult<JsonValue> {
        let mut values: Vec<JsonValue> = vec![];
        let mut next = lexer.consume()?;
        if next.0 == Token::EndArray {
            return Ok(JsonValue::Array(values));
        }
        loop {
            if let (Token::Comma | Token::EndArray, span) = next {
                return decode_error!(Details::InvalidArray, span.start);
            }
            values.push(self.value_from(lexer, next, depth)?);
            match lexer.consume()? {
                (Token::Comma, _) => next = lexer.consume()?,
                (Token::EndArray, _) => return Ok(JsonValue::Array(values)),
                (Token::EndOfInput, span) => {
                    return decode_error!(Details::EndOfInput, span.start)
                }
                (_, span) => return decode_error!(Details::InvalidArray, span.start),
            }
        }
    }

    fn parse_value(&self, lexer: &mut Lexer, depth: usize) -> ParserResult<JsonValue> {
        let packed = lexer.consume()?;
        self.value_from(lexer, packed, depth)
    }
}

#[cfg(test)]
mod tests {
    use crate::decoders::Encoding;
    use crate::errors::Details;
    use crate::parser::dom::{Parser, MAX_DEPTH};
    use crate::{relative_file, JsonValue};
    use bytesize::ByteSize;
    use std::fs;
    use std::time::Instant;

    #[test]
    fn should_parse_char_iterators_directly() {
        let source = r#"{
            "test" : 1232.0,
            "some other" : "thasdasd",
            "a bool" : true,
            "an array" : [1,2,3,4,5.8,6,7.2,7,8,10]
        }"#;
        let parser = Parser::default();
        let parsed = parser.parse(&mut source.chars());
        assert!(parsed.is_ok())
    }

    #[test]
    fn should_accept_scalar_roots() {
        let parser = Parser::default();
        assert_eq!(parser.parse_str(" 42 "), Ok(JsonValue::Integer(42)));
        assert_eq!(
            parser.parse_str(r#""hi""#),
            Ok(JsonValue::String("hi".to_string()))
        );
        assert_eq!(parser.parse_str("null"), Ok(JsonValue::Null));
    }

    #[test]
    fn should_keep_the_last_of_duplicate_keys() {
        let parser = Parser::default();
        let parsed = parser.parse_str(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        assert_eq!(
            parsed,
            JsonValue::Object(vec![
                ("a".to_string(), JsonValue::Integer(3)),
                ("b".to_string(), JsonValue::Integer(2)),
            ])
        );
    }

    #[test]
    fn should_reject_bad_separators() {
        let parser = Parser::default();
        for source in [
            "[1,]", "[,1]", "[1 2]", "{,}", r#"{"a":1,}"#, r#"{"a" 1}"#, r#"{"a":1 "b":2}"#,
            "{1:2}", "[1,,2]",
        ] {
            assert!(parser.parse_str(source).is_err(), "{} should not parse", source);
        }
    }

    #[test]
    fn should_keep_first_positions_across_many_duplicate_keys() {
        let mut source = String::from("{");
        for i in 0..1000 {
            source.push_str(&format!(r#""k{}": {}, "#, i % 10, i));
        }
        source.push_str(r#""last": true}"#);
        let parsed = Parser::default().parse_str(&source).unwrap();
        match parsed {
            JsonValue::Object(pairs) => {
                assert_eq!(pairs.len(), 11);
                assert_eq!(pairs[0], ("k0".to_string(), JsonValue::Integer(990)));
                assert_eq!(pairs[9], ("k9".to_string(), JsonValue::Integer(999)));
                assert_eq!(pairs[10], ("last".to_string(), JsonValue::Boolean(true)));
            }
            other => panic!("expected an object, got {:?}", other),
        }
    }

    #[test]
    fn should_reject_excessive_nesting() {
        let parser = Parser::default();
        let err = parser.parse_str(&"[".repeat(200_000)).unwrap_err();
        assert_eq!(err.details, Details::MaxDepthExceeded);
        assert_eq!(err.coords.map(|c| c.absolute), Some(MAX_DEPTH));

        let err = parser
            .parse_str(&r#"{"a":"#.repeat(MAX_DEPTH + 1))
            .unwrap_err();
        assert_eq!(err.details, Details::MaxDepthExceeded);
    }

    #[test]
    fn should_accept_nesting_up_to_the_limit() {
        let source = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(Parser::default().parse_str(&source).is_ok());
    }

    #[test]
    fn should_reject_invalid_utf8() {
        let parser = Parser::default();
        let err = parser.parse_bytes(b"{\"a\": 1}\xff\xfexy").unwrap_err();
        assert_eq!(err.details, Details::InvalidByteSequence(0xff));
        assert_eq!(err.coords.map(|c| c.column), Some(8));

        let err = parser.parse_bytes(b"{\"a\": \"x\xffy\"}").unwrap_err();
        assert_eq!(err.details, Details::InvalidByteSequence(0xff));
        assert_eq!(err.coords.map(|c| c.column), Some(8));
    }

    #[test]
    fn should_reject_non_ascii_bytes_in_ascii_mode() {
        let parser = Parser::with_encoding(Encoding::Ascii);
        let err = parser.parse_bytes("[\"é\"]".as_bytes()).unwrap_err();
        assert_eq!(err.details, Details::InvalidByteSequence(0xc3));
    }

    #[test]
    fn should_reject_trailing_content() {
        let parser = Parser::default();
        let err = parser.parse_str("{} {}").unwrap_err();
        assert_eq!(err.details, Details::TrailingContent);
    }

    #[test]
    fn should_report_truncated_input() {
        let parser = Parser::default();
        let err = parser.parse_str(r#"{"a": [1, 2"#).unwrap_err();
        assert_eq!(err.details, Details::EndOfInput);
        assert!(parser.parse_str("").is_err());
    }

    #[test]
    fn should_parse_bytes_with_explicit_encodings() {
        let parser = Parser::with_encoding(Encoding::Ascii);
        let parsed = parser.parse_bytes(br#"{"plain": [true, false]}"#).unwrap();
        assert_eq!(
            parsed.get("plain"),
            Some(&JsonValue::Array(vec![
                JsonValue::Boolean(true),
                JsonValue::Boolean(false)
            ]))
        );
    }

    #[test]
    fn should_fail_on_missing_files() {
        let parser = Parser::default();
        let err = parser
            .parse_file(relative_file!("fixtures/json/lol.json"))
            .unwrap_err();
        assert_eq!(err.details, Details::InvalidFile);
    }

    #[test]
    fn should_successfully_bail() {
        let parser = Parser::default();
        let parsed = parser.parse_file(relative_file!("fixtures/json/bad.json"));
        assert!(parsed.is_err());
    }

    #[test]
    fn should_parse_basic_test_files() {
        for name in ["good.json", "array.json", "wildcards.json"] {
            let path = relative_file!(format!("fixtures/json/{}", name));
            let len = fs::metadata(&path).unwrap().len();
            let start = Instant::now();
            let parser = Parser::default();
            let parsed = parser.parse_file(&path);
            assert!(parsed.is_ok(), "parse of {:?} failed: {:?}", path, parsed);
            println!(
                "Parsed {} in {:?} [{:?}]",
                ByteSize(len),
                start.elapsed(),
                path,
            );
        }
    }
}
