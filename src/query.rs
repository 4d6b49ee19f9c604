//! The query façade: load a document once, then evaluate one or many raw paths against it and
//! render the matched values as output lines.
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::str::FromStr;

use crate::decoders::Encoding;
use crate::errors::{EvalResult, ParserError, Result};
use crate::eval::{self, ResultSet};
use crate::parser::Parser;
use crate::paths::Path;
use crate::render::render;
use crate::JsonValue;

/// Options controlling how matched values are rendered
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Render null as `null` rather than as an empty line
    pub print_nulls: bool,
}

impl QueryOptions {
    pub fn with_print_nulls(mut self, print_nulls: bool) -> Self {
        self.print_nulls = print_nulls;
        self
    }
}

/// A parsed JSON document, held in memory for the lifetime of a batch of queries
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: JsonValue,
}

impl Document {
    pub fn new(root: JsonValue) -> Self {
        Document { root }
    }

    /// Read and parse the document held in a file
    pub fn load_file<P: AsRef<std::path::Path>>(path: P, encoding: Encoding) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading {} document from {}", encoding, path.display());
        let file = File::open(path)?;
        Self::load_reader(BufReader::new(file), encoding)
    }

    /// Read and parse a document from standard input
    pub fn load_stdin(encoding: Encoding) -> Result<Self> {
        log::debug!("loading {} document from stdin", encoding);
        Self::load_reader(io::stdin().lock(), encoding)
    }

    pub fn load_reader<R: BufRead>(reader: R, encoding: Encoding) -> Result<Self> {
        let root = Parser::with_encoding(encoding).parse_reader(reader)?;
        Ok(Document::new(root))
    }

    pub fn root(&self) -> &JsonValue {
        &self.root
    }

    /// All of the values matched by a compiled path
    pub fn select(&self, path: &Path) -> EvalResult<ResultSet<'_>> {
        eval::select(path, &self.root)
    }

    /// Evaluate a single raw path, rendering each matched value
    pub fn value(&self, raw_path: &str, options: &QueryOptions) -> EvalResult<Vec<String>> {
        evaluate_one(&self.root, raw_path, options)
    }

    /// Evaluate several raw paths in order. The first failing path fails the whole batch.
    pub fn values<S: AsRef<str>>(
        &self,
        raw_paths: &[S],
        options: &QueryOptions,
    ) -> EvalResult<Vec<String>> {
        evaluate_many(&self.root, raw_paths, options.print_nulls)
    }
}

impl FromStr for Document {
    type Err = ParserError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Parser::default().parse_str(s).map(Document::new)
    }
}

/// Evaluate each raw path against the document in turn, concatenating the rendered values.
/// Nothing is returned unless every path resolves.
pub fn evaluate_many<S: AsRef<str>>(
    document: &JsonValue,
    raw_paths: &[S],
    print_nulls: bool,
) -> EvalResult<Vec<String>> {
    let options = QueryOptions { print_nulls };
    let mut values = vec![];
    for raw_path in raw_paths {
        values.extend(evaluate_one(document, raw_path.as_ref(), &options)?);
    }
    Ok(values)
}

fn evaluate_one(
    document: &JsonValue,
    raw_path: &str,
    options: &QueryOptions,
) -> EvalResult<Vec<String>> {
    let path = Path::compile(raw_path);
    log::debug!("evaluating '{}' as {} token(s)", raw_path, path.len());
    let matched = eval::select(&path, document).map_err(|err| {
        log::debug!("evaluation of '{}' failed: {}", raw_path, err);
        err
    })?;
    Ok(matched
        .into_iter()
        .map(|value| render(value, options.print_nulls))
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::errors::EvalError;
    use crate::paths::Path;
    use crate::query::{evaluate_many, Document, QueryOptions};
    use crate::JsonValue;

    const SOURCE: &str = r#"{"a": {"b": [1, null, "x"]}, "c": null}"#;

    #[test]
    fn should_render_each_match_of_a_single_path() {
        let doc: Document = SOURCE.parse().unwrap();
        assert_eq!(
            doc.value("a.b.*", &QueryOptions::default()).unwrap(),
            vec!["1", "", "x"]
        );
    }

    #[test]
    fn should_thread_the_null_option_through() {
        let doc: Document = SOURCE.parse().unwrap();
        let options = QueryOptions::default().with_print_nulls(true);
        assert_eq!(doc.value("c", &options).unwrap(), vec!["null"]);
        assert_eq!(doc.value("a.b[1]", &options).unwrap(), vec!["null"]);
    }

    #[test]
    fn should_concatenate_batches_in_argument_order() {
        let doc: Document = SOURCE.parse().unwrap();
        let values = doc
            .values(&["a.b[2]", "a.b[0]"], &QueryOptions::default())
            .unwrap();
        assert_eq!(values, vec!["x", "1"]);
    }

    #[test]
    fn should_fail_the_batch_on_the_first_bad_path() {
        let root = JsonValue::Object(vec![("a".to_string(), JsonValue::Integer(1))]);
        let result = evaluate_many(&root, &["a", "a.b", "zzz.y"], false);
        assert_eq!(
            result,
            Err(EvalError::TypeMismatch {
                token: "b".to_string(),
                parent: "a".to_string(),
                kind: crate::ValueKind::Number,
            })
        );
    }

    #[test]
    fn should_reject_empty_paths() {
        let doc: Document = SOURCE.parse().unwrap();
        assert_eq!(
            doc.value("", &QueryOptions::default()),
            Err(EvalError::EmptyPath)
        );
    }

    #[test]
    fn should_select_raw_values() {
        let doc: Document = SOURCE.parse().unwrap();
        let path: Path = "a.b.2".parse().unwrap();
        let selected = doc.select(&path).unwrap();
        assert_eq!(selected, vec![&JsonValue::String("x".to_string())]);
    }
}
