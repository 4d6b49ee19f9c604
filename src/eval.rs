//! Resolution of compiled [Path]s against a [JsonValue] tree.
//!
//! Evaluation is a left fold over the path tokens. The working set starts out holding the
//! document root and each token maps every value in the set onto zero or more children, which
//! are concatenated in order to form the next working set. The first failure aborts the
//! whole evaluation.
use crate::errors::{EvalError, EvalResult};
use crate::paths::{Path, PathToken};
use crate::JsonValue;

/// The ordered values matched by a path
pub type ResultSet<'a> = Vec<&'a JsonValue>;

/// Stands in for object members which are absent
static ABSENT: JsonValue = JsonValue::Null;

/// Resolve a path against a single root value
pub fn select<'a>(path: &Path, root: &'a JsonValue) -> EvalResult<ResultSet<'a>> {
    evaluate(path, vec![root])
}

/// Resolve a path against a set of root values, returning every terminal value in visitation
/// order
pub fn evaluate<'a>(path: &Path, roots: ResultSet<'a>) -> EvalResult<ResultSet<'a>> {
    if path.is_empty() {
        return Err(EvalError::EmptyPath);
    }
    let mut working = roots;
    for (depth, token) in path.tokens().iter().enumerate() {
        let mut next = Vec::with_capacity(working.len());
        for value in working {
            apply(path, depth, token, value, &mut next)?;
        }
        log::trace!(
            "'{}' matched {} value(s) at depth {}",
            token,
            next.len(),
            depth
        );
        working = next;
    }
    Ok(working)
}

/// Apply a single token to a single value, pushing whatever it selects onto `out`
fn apply<'a>(
    path: &Path,
    depth: usize,
    token: &PathToken,
    value: &'a JsonValue,
    out: &mut ResultSet<'a>,
) -> EvalResult<()> {
    match (value, token) {
        (JsonValue::Object(_), PathToken::Field(name)) => out.push(member(value, name)),
        (JsonValue::Object(_), PathToken::Index { text, .. }) => out.push(member(value, text)),
        (JsonValue::Object(pairs), PathToken::Wildcard) => out.extend(pairs.iter().map(|(_, v)| v)),

        (JsonValue::Array(_), PathToken::Field(name)) if depth == 0 => {
            return Err(EvalError::RootArray {
                token: name.clone(),
            })
        }
        (JsonValue::Array(_), PathToken::Field(name)) => {
            return Err(EvalError::InvalidIndex {
                token: name.clone(),
                parent: path.prefix(depth),
            })
        }
        (JsonValue::Array(elements), PathToken::Index { index, .. }) => match elements.get(*index)
        {
            Some(element) => out.push(element),
            None => {
                return Err(EvalError::OutOfBounds {
                    index: *index,
                    count: elements.len(),
                    parent: path.prefix(depth),
                })
            }
        },
        (JsonValue::Array(elements), PathToken::Wildcard) => out.extend(elements.iter()),

        (JsonValue::Null, PathToken::Field(_) | PathToken::Index { .. } | PathToken::Wildcard) => {
            return Err(EvalError::NilAccess {
                token: token.to_string(),
            })
        }

        (
            JsonValue::String(_)
            | JsonValue::Float(_)
            | JsonValue::Integer(_)
            | JsonValue::Boolean(_),
            PathToken::Field(_) | PathToken::Index { .. } | PathToken::Wildcard,
        ) => {
            return Err(EvalError::TypeMismatch {
                token: token.to_string(),
                parent: path.prefix(depth),
                kind: value.kind(),
            })
        }
    }
    Ok(())
}

/// Look up an object member. Absent members and explicit nulls are indistinguishable.
fn member<'a>(object: &'a JsonValue, key: &str) -> &'a JsonValue {
    object.get(key).unwrap_or(&ABSENT)
}
