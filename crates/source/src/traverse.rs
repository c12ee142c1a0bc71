//! Path traversal shared by every data source, so they agree on semantics.

use tether_types::{Segment, Value};

/// The container operations traversal needs from a node type.
pub(crate) trait Node: Sized {
    fn member(&self, key: &str) -> Option<&Self>;
    fn element(&self, index: usize) -> Option<&Self>;
    /// Length reported for a `length` segment: arrays and strings only.
    fn length(&self) -> Option<usize>;
    fn is_array(&self) -> bool;
    fn to_value(&self) -> Value;
}

/// Where a traversal ended.
pub(crate) enum Lookup<'a, N> {
    Found(&'a N),
    Length(usize),
    Absent,
}

impl<N: Node> Lookup<'_, N> {
    pub(crate) fn into_value(self) -> Value {
        match self {
            Lookup::Found(node) => node.to_value(),
            Lookup::Length(len) => Value::Number(len as f64),
            Lookup::Absent => Value::Undefined,
        }
    }
}

pub(crate) fn lookup<'a, N: Node>(root: &'a N, path: &[Segment]) -> Lookup<'a, N> {
    let mut current = root;
    for (depth, segment) in path.iter().enumerate() {
        let next = if current.is_array() {
            segment.as_index().and_then(|i| current.element(i))
        } else {
            match segment {
                Segment::Key(k) => current.member(k),
                Segment::Index(i) => current.member(&i.to_string()),
            }
        };
        match next {
            Some(node) => current = node,
            None => {
                // `length` is only meaningful as the final segment.
                let is_last = depth + 1 == path.len();
                if is_last && segment.as_key() == Some("length") {
                    if let Some(len) = current.length() {
                        return Lookup::Length(len);
                    }
                }
                return Lookup::Absent;
            }
        }
    }
    Lookup::Found(current)
}

impl Node for serde_json::Value {
    fn member(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|map| map.get(key))
    }

    fn element(&self, index: usize) -> Option<&Self> {
        self.as_array().and_then(|items| items.get(index))
    }

    fn length(&self) -> Option<usize> {
        match self {
            serde_json::Value::Array(items) => Some(items.len()),
            serde_json::Value::String(s) => Some(s.encode_utf16().count()),
            _ => None,
        }
    }

    fn is_array(&self) -> bool {
        matches!(self, serde_json::Value::Array(_))
    }

    fn to_value(&self) -> Value {
        Value::from(self)
    }
}

impl Node for Value {
    fn member(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|map| map.get(key))
    }

    fn element(&self, index: usize) -> Option<&Self> {
        self.as_array().and_then(|items| items.get(index))
    }

    fn length(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(items.len()),
            Value::String(s) => Some(s.encode_utf16().count()),
            _ => None,
        }
    }

    fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}
