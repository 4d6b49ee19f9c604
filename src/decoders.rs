//! The DOM parser operates over a stream of `char`s produced by some flavour of iterator. By
//! default, this iterator is based on a decoder that will take a stream of bytes from an
//! underlying source, and convert into a stream of `char`s.
//!
//! The [DecoderSelector] implemented within this module is used to instantiate new `char`
//! iterators, based on different encodings. (Currently only ASCII and UTF-8 are supported).
use chisel_decoders::{ascii::AsciiDecoder, utf8::Utf8Decoder};
use std::fmt::{Display, Formatter};
use std::io::BufRead;
use std::str::FromStr;

use crate::coords::Coords;
use crate::decode_error;
use crate::errors::{Details, ParserResult};

/// Enumeration of different supported encoding types
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "utf8"),
            Encoding::Ascii => write!(f, "ascii"),
        }
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "ascii" => Ok(Encoding::Ascii),
            other => Err(format!("unsupported encoding '{}'", other)),
        }
    }
}

/// A struct that is essentially a factory for creating new instances of [char] iterators,
/// based on a specified encoding type
#[derive(Default)]
pub(crate) struct DecoderSelector {}

impl DecoderSelector {
    /// Check that a complete input buffer is well formed for an encoding. The char iterators
    /// simply stop at the first bad byte, so this has to happen before decoding.
    pub fn validate(&self, bytes: &[u8], encoding: Encoding) -> ParserResult<()> {
        let valid = match encoding {
            Encoding::Utf8 => match std::str::from_utf8(bytes) {
                Ok(_) => return Ok(()),
                Err(err) => err.valid_up_to(),
            },
            Encoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                None => return Ok(()),
                Some(position) => position,
            },
        };
        let mut coords = Coords::default();
        String::from_utf8_lossy(&bytes[..valid])
            .chars()
            .for_each(|c| coords.advance(c));
        log::debug!("invalid {} input at {}", encoding, coords);
        decode_error!(Details::InvalidByteSequence(bytes[valid]), coords)
    }

    /// Create and return an instance of a given byte decoder / char iterator based on a specific
    /// encoding
    pub fn new_decoder<'a, Buffer: BufRead>(
        &'a self,
        buffer: &'a mut Buffer,
        encoding: Encoding,
    ) -> Box<dyn Iterator<Item = char> + 'a> {
        log::trace!("creating {} decoder", encoding);
        match encoding {
            Encoding::Ascii => Box::new(AsciiDecoder::new(buffer)),
            Encoding::Utf8 => Box::new(Utf8Decoder::new(buffer)),
        }
    }
}
