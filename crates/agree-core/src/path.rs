//! # Paths & Evaluation Context
//!
//! A [`Path`] records where in the candidate value a violation was found,
//! as the chain of object keys and array indices from the evaluation root.
//! A [`Context`] carries that path down the recursion together with the
//! caller-supplied environment used by cross-field conditions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Environment used when the caller supplies none.
static EMPTY_ENV: Value = Value::Null;

/// One step of a [`Path`]: an object key or a positional index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Position in an array or argument list.
    Index(usize),
    /// Key of an object member.
    Key(String),
}

impl PathSegment {
    /// Build a key segment.
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }

    /// Whether this is a positional segment.
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => write!(f, "{k}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Ordered key chain from the evaluation root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The empty path (the evaluation root).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(segment.into());
        Self(segments)
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments, root first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Last segment, if any.
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// Render as an RFC 6901 JSON Pointer (`/items/2/name`).
    pub fn to_json_pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.0 {
            pointer.push('/');
            match segment {
                PathSegment::Index(i) => pointer.push_str(&i.to_string()),
                PathSegment::Key(k) => pointer.push_str(&k.replace('~', "~0").replace('/', "~1")),
            }
        }
        pointer
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
            }
        }
        Ok(())
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Evaluation context handed to every predicate.
///
/// Cheap to extend: [`Context::child`] copies the path and borrows the
/// same environment.
#[derive(Debug, Clone)]
pub struct Context<'env> {
    path: Path,
    env: &'env Value,
}

impl Context<'static> {
    /// Root context with an empty (`null`) environment.
    pub fn root() -> Self {
        Self {
            path: Path::root(),
            env: &EMPTY_ENV,
        }
    }
}

impl<'env> Context<'env> {
    /// Root context with a caller-supplied environment.
    pub fn with_env(env: &'env Value) -> Self {
        Self {
            path: Path::root(),
            env,
        }
    }

    /// Same environment, evaluation rooted at `path`.
    pub fn at(&self, path: Path) -> Self {
        Self {
            path,
            env: self.env,
        }
    }

    /// Context for a sub-value one segment deeper.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        Self {
            path: self.path.child(segment),
            env: self.env,
        }
    }

    /// Current path from the root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Caller-supplied environment (`null` when none was given).
    pub fn env(&self) -> &'env Value {
        self.env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_displays_as_placeholder() {
        assert_eq!(Path::root().to_string(), "(root)");
        assert_eq!(Path::root().to_json_pointer(), "");
    }

    #[test]
    fn mixed_path_display() {
        let path = Path::root().child("items").child(2).child("name");
        assert_eq!(path.to_string(), "items[2].name");
        assert_eq!(path.to_json_pointer(), "/items/2/name");
    }

    #[test]
    fn json_pointer_escapes_reserved_characters() {
        let path: Path = ["a/b", "c~d"].into_iter().collect();
        assert_eq!(path.to_json_pointer(), "/a~1b/c~0d");
    }

    #[test]
    fn path_serializes_as_plain_array() {
        let path = Path::root().child("args").child(0);
        assert_eq!(serde_json::to_value(&path).unwrap(), serde_json::json!(["args", 0]));
        let back: Path = serde_json::from_value(serde_json::json!(["args", 0])).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn child_context_shares_environment() {
        let env = serde_json::json!({"limit": 3});
        let ctx = Context::with_env(&env);
        let child = ctx.child("x");
        assert_eq!(child.env(), &env);
        assert_eq!(child.path().segments(), &[PathSegment::key("x")]);
        assert!(ctx.path().is_root());
    }
}
