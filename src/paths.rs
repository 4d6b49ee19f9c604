//! Compiled path expressions.
//!
//! A raw path such as `foo.bar[2].neat` is normalised into dot separated segments
//! (`foo.bar.2.neat`) and each segment is classified as a [PathToken]. Compilation never fails:
//! anything which isn't a wildcard or an index is simply treated as a field name.
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Separator between path segments
const PATH_SEPARATOR: char = '.';
/// Segment text which fans out across every element of an array
const WILDCARD: &str = "*";

/// A single compiled unit of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    /// A named member of an object
    Field(String),
    /// A numeric segment. The original text is kept so that the segment can still be used as
    /// an object key when the value being traversed isn't an array.
    Index { index: usize, text: String },
    /// Every element of an array
    Wildcard,
}

impl PathToken {
    /// Classify a single raw segment
    pub fn classify(segment: &str) -> Self {
        if segment == WILDCARD {
            return PathToken::Wildcard;
        }
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = segment.parse::<usize>() {
                return PathToken::Index {
                    index,
                    text: segment.to_string(),
                };
            }
        }
        PathToken::Field(segment.to_string())
    }

    /// The segment text this token was compiled from
    pub fn as_str(&self) -> &str {
        match self {
            PathToken::Field(name) => name,
            PathToken::Index { text, .. } => text,
            PathToken::Wildcard => WILDCARD,
        }
    }
}

impl Display for PathToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered sequence of [PathToken]s
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    tokens: Vec<PathToken>,
}

impl Path {
    /// Compile a raw path. Bracketed indices become plain segments, runs of separators collapse
    /// into one and a single trailing separator is dropped. The empty string compiles to the
    /// empty path, which can't be evaluated.
    pub fn compile(raw: &str) -> Path {
        if raw.is_empty() {
            return Path::default();
        }
        let mut normalised = String::with_capacity(raw.len());
        for c in raw.chars() {
            let c = match c {
                '[' | ']' => PATH_SEPARATOR,
                c => c,
            };
            if c == PATH_SEPARATOR && normalised.ends_with(PATH_SEPARATOR) {
                continue;
            }
            normalised.push(c);
        }
        if normalised.ends_with(PATH_SEPARATOR) {
            normalised.pop();
        }
        Path {
            tokens: normalised
                .split(PATH_SEPARATOR)
                .map(PathToken::classify)
                .collect(),
        }
    }

    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The dot-joined text of the first `depth` tokens, i.e. the parent of the token at `depth`
    pub fn prefix(&self, depth: usize) -> String {
        self.tokens[..depth.min(self.tokens.len())]
            .iter()
            .map(PathToken::as_str)
            .collect::<Vec<&str>>()
            .join(".")
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.prefix(self.tokens.len()))
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::compile(s))
    }
}
