//! Deep get and copy-on-write set by path
//!
//! Paths are dot separated keys with optional bracketed segments, e.g.
//! `projects[1].title`, `a.0.b` or `a["dotted.key"]`. A backslash escapes
//! a literal dot. Digit segments index arrays; against objects they are
//! plain keys.

use serde_json::{Map, Value};

use crate::value::NULL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(i64),
}
impl Segment {
    fn key(&self) -> String {
        match self {
            Self::Key(k) => k.clone(),
            Self::Index(i) => i.to_string(),
        }
    }

    fn index(&self) -> Option<i64> {
        match self {
            Self::Key(k) => k.parse::<i64>().ok(),
            Self::Index(i) => Some(*i),
        }
    }

    /// An empty container suitable for holding this segment
    fn container(&self) -> Value {
        match self {
            Self::Index(_) => Value::Array(vec![]),
            Self::Key(_) => Value::Object(Map::new()),
        }
    }
}

/// Split a path into its segments.
pub fn parse(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            '.' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
                let mut inner = String::new();
                let mut closed = false;
                for b in chars.by_ref() {
                    if b == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(b);
                }
                if !closed {
                    // An unterminated bracket is just part of a key.
                    current.push('[');
                    current.push_str(&inner);
                    continue;
                }
                segments.push(bracket_segment(inner.trim()));
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        segments.push(Segment::Key(current));
    }
    if segments.is_empty() {
        segments.push(Segment::Key(String::new()));
    }
    segments
}

fn bracket_segment(inner: &str) -> Segment {
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| inner.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)));
    match unquoted {
        Some(key) => Segment::Key(key.to_string()),
        None => match inner.parse::<i64>() {
            Ok(i) => Segment::Index(i),
            Err(_) => Segment::Key(inner.to_string()),
        },
    }
}

/// Resolve a possibly negative index against a length
fn resolve_index(idx: i64, len: usize) -> Option<usize> {
    if idx >= 0 {
        usize::try_from(idx).ok()
    } else {
        let back = usize::try_from(idx.checked_neg()?).ok()?;
        len.checked_sub(back)
    }
}

fn get_segment<'a>(value: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(&segment.key()),
        Value::Array(items) => {
            let idx = resolve_index(segment.index()?, items.len())?;
            items.get(idx)
        }
        _ => None,
    }
}

/// Look up the value at `path`, if present.
pub fn get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    parse(path)
        .iter()
        .try_fold(value, |current, segment| get_segment(current, segment))
}

/// Return a copy of `value` with `new` written at `path`.
///
/// Missing intermediate containers are created. The input is never
/// modified.
pub fn set(value: &Value, path: &str, new: Value) -> Value {
    let mut copy = value.clone();
    set_in(&mut copy, &parse(path), new);
    copy
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn set_in(target: &mut Value, segments: &[Segment], new: Value) {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => {
            *target = new;
            return;
        }
    };

    let slot: &mut Value = match target {
        Value::Object(map) => map.entry(head.key()).or_insert(NULL),
        Value::Array(items) => {
            let idx = match head.index().and_then(|i| resolve_index(i, items.len())) {
                Some(idx) => idx,
                None => return,
            };
            if idx >= items.len() {
                items.resize(idx + 1, NULL);
            }
            &mut items[idx]
        }
        _ => return,
    };

    match rest.first() {
        None => *slot = new,
        Some(next) => {
            if !is_container(slot) {
                *slot = next.container();
            }
            set_in(slot, rest, new)
        }
    }
}
