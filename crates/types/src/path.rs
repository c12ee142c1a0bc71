//! Resolved data paths.
//!
//! A resolved path is the concrete address of a value inside a data source:
//! an ordered list of object keys and array indices. Paths are compared and
//! hashed by their segments, never by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// A single step of a resolved path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// An array index (e.g. `[0]`).
    Index(usize),
    /// An object key (e.g. `.name`).
    Key(String),
}

impl Segment {
    /// Returns the key if this is a `Key` segment.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        }
    }

    /// Returns the numeric index this segment addresses in an array, if any.
    ///
    /// Keys written as canonical non-negative integers (`"3"`, not `"03"`)
    /// address array elements the same way an `Index` does.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Key(k) => parse_canonical_index(k),
        }
    }

    /// Whether both segments address the same slot in any data source.
    ///
    /// `Index(1)` and `Key("1")` do; `Index(1)` and `Key("01")` do not.
    pub fn addresses(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Key(a), Segment::Key(b)) => a == b,
            _ => self.as_index().is_some() && self.as_index() == other.as_index(),
        }
    }
}

/// Returns `true` if `prefix` addresses `path` or one of its ancestors.
/// Segments are compared with [`Segment::addresses`].
pub fn is_prefix(prefix: &[Segment], path: &[Segment]) -> bool {
    path.len() >= prefix.len() && prefix.iter().zip(path).all(|(a, b)| a.addresses(b))
}

fn parse_canonical_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => write!(f, "{}", k),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Segment {
    fn from(s: &str) -> Self {
        Segment::Key(s.to_string())
    }
}

impl From<String> for Segment {
    fn from(s: String) -> Self {
        Segment::Key(s)
    }
}

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Segment::Index(i)
    }
}

/// An ordered sequence of concrete key/index segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedPath(Vec<Segment>);

impl ResolvedPath {
    /// Creates an empty path, which addresses the root of a data source.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.0.push(segment.into());
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut next = self.clone();
        next.push(segment);
        next
    }

    /// Returns `true` if `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &[Segment]) -> bool {
        is_prefix(&self.0, other)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.0
    }
}

impl Deref for ResolvedPath {
    type Target = [Segment];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Segment>> for ResolvedPath {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl From<&[Segment]> for ResolvedPath {
    fn from(segments: &[Segment]) -> Self {
        Self(segments.to_vec())
    }
}

impl FromIterator<Segment> for ResolvedPath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Segment> for ResolvedPath {
    fn extend<I: IntoIterator<Item = Segment>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ResolvedPath {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ResolvedPath {
    /// Dot-joined form, e.g. `_page.colors.green`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Builds a [`ResolvedPath`] from keys and indices.
///
/// ```
/// use tether_types::{path, Segment};
/// let p = path!["_page", "nums", 0];
/// assert_eq!(p[2], Segment::Index(0));
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::ResolvedPath::new()
    };
    ($($segment:expr),+ $(,)?) => {
        $crate::ResolvedPath::from(vec![$($crate::Segment::from($segment)),+])
    };
}
