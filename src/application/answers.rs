//! Path access into the answers document
//!
//! Answer paths are dotted key segments with optional numeric indices,
//! e.g. `periods[1].endDate`. The same syntax doubles as field ids.

use serde_json::{Map, Value};

/// One parsed segment of an answer path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Parse an answer path into segments, or `None` if it is malformed.
fn parse(path: &str) -> Option<Vec<Segment>> {
    if path.is_empty() {
        return None;
    }
    let mut segments = Vec::new();
    for part in path.split('.') {
        let mut rest = part;
        // Leading key before any `[index]` suffixes
        let key_end = rest.find('[').unwrap_or(rest.len());
        let key = &rest[..key_end];
        if key.is_empty() {
            return None;
        }
        if key.contains(']') {
            return None;
        }
        segments.push(Segment::Key(key.to_string()));
        rest = &rest[key_end..];
        while let Some(stripped) = rest.strip_prefix('[') {
            let close = stripped.find(']')?;
            let index: usize = stripped[..close].parse().ok()?;
            segments.push(Segment::Index(index));
            rest = &stripped[close + 1..];
        }
        if !rest.is_empty() {
            return None;
        }
    }
    Some(segments)
}

/// True if `path` parses as an answer path.
pub fn is_valid_path(path: &str) -> bool {
    parse(path).is_some()
}

/// Read the value at `path`, if present.
pub fn get_path<'a>(answers: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let segments = parse(path)?;
    let mut current: Option<&Value> = None;
    for segment in &segments {
        current = match (current, segment) {
            (None, Segment::Key(key)) => answers.get(key),
            (Some(Value::Object(map)), Segment::Key(key)) => map.get(key),
            (Some(Value::Array(items)), Segment::Index(index)) => items.get(*index),
            _ => return None,
        };
        current?;
    }
    current
}

/// Write `value` at `path`, creating intermediate objects and arrays.
///
/// Arrays are padded with `null` when the index is past the end. A
/// non-container value in the way is replaced.
pub fn set_path(answers: &mut Map<String, Value>, path: &str, value: Value) {
    let Some(segments) = parse(path) else {
        return;
    };
    let (first, rest) = match segments.split_first() {
        Some((Segment::Key(key), rest)) => (key.clone(), rest),
        _ => return,
    };
    if rest.is_empty() {
        answers.insert(first, value);
        return;
    }
    let slot = answers.entry(first).or_insert(Value::Null);
    set_segments(slot, rest, value);
}

fn set_segments(slot: &mut Value, segments: &[Segment], value: Value) {
    let Some((segment, rest)) = segments.split_first() else {
        *slot = value;
        return;
    };
    match segment {
        Segment::Key(key) => {
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let map = slot.as_object_mut().expect("object slot");
            let next = map.entry(key.clone()).or_insert(Value::Null);
            set_segments(next, rest, value);
        }
        Segment::Index(index) => {
            if !slot.is_array() {
                *slot = Value::Array(Vec::new());
            }
            let items = slot.as_array_mut().expect("array slot");
            while items.len() <= *index {
                items.push(Value::Null);
            }
            set_segments(&mut items[*index], rest, value);
        }
    }
}
