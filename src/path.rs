//! Dot/bracket path utilities.
//!
//! Paths locate the part of a payload an error concerns, e.g.
//! `data.items[2].price`. Object keys join with `.`; array indices append
//! inline as `[i]` with no separator after the preceding key.

use serde_json::Value;
use thiserror::Error;

/// Failure to tokenize a path string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty path")]
    Empty,
    #[error("invalid path segment near byte {0}")]
    InvalidSegment(usize),
    #[error("unterminated index in `{0}`")]
    UnterminatedIndex(String),
}

/// One step of a tokenized path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Join an object key with a child locator.
pub fn join_key(key: &str, child: &str) -> String {
    if child.is_empty() {
        key.to_string()
    } else if child.starts_with('[') {
        format!("{key}{child}")
    } else {
        format!("{key}.{child}")
    }
}

/// Join an array index with a child locator.
pub fn join_index(index: usize, child: &str) -> String {
    if child.is_empty() {
        format!("[{index}]")
    } else if child.starts_with('[') {
        format!("[{index}]{child}")
    } else {
        format!("[{index}].{child}")
    }
}

/// Tokenize a dot/bracket path into segments.
pub fn parse(path: &str) -> Result<Vec<Segment>, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    let mut segments = Vec::new();
    let mut rest = path;
    let mut offset = 0usize;
    while !rest.is_empty() {
        if let Some(after_bracket) = rest.strip_prefix('[') {
            let close = after_bracket
                .find(']')
                .ok_or_else(|| PathError::UnterminatedIndex(path.to_string()))?;
            let index = after_bracket[..close]
                .parse::<usize>()
                .map_err(|_| PathError::InvalidSegment(offset + 1))?;
            segments.push(Segment::Index(index));
            let consumed = close + 2;
            rest = &rest[consumed..];
            offset += consumed;
            if let Some(after_dot) = rest.strip_prefix('.') {
                if after_dot.is_empty() {
                    return Err(PathError::InvalidSegment(offset));
                }
                rest = after_dot;
                offset += 1;
            }
        } else {
            let end = rest.find(['.', '[']).unwrap_or(rest.len());
            if end == 0 {
                return Err(PathError::InvalidSegment(offset));
            }
            segments.push(Segment::Key(rest[..end].to_string()));
            if rest[end..].starts_with('.') {
                if end + 1 >= rest.len() {
                    return Err(PathError::InvalidSegment(offset + end));
                }
                rest = &rest[end + 1..];
                offset += end + 1;
            } else {
                rest = &rest[end..];
                offset += end;
            }
        }
    }
    Ok(segments)
}

/// Look up the value a path points at, or `None` when the path does not
/// resolve (including unparseable paths).
pub fn value_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse(path).ok()?;
    let mut current = root;
    for segment in &segments {
        current = match segment {
            Segment::Key(key) => current.as_object()?.get(key)?,
            Segment::Index(index) => current.as_array()?.get(*index)?,
        };
    }
    Some(current)
}
