//! Dotted field paths
//!
//! A [`FieldPath`] is the ordered list of object keys leading from a document
//! root to one of its nodes. It is the join key between the confidence
//! metadata, the rule registry and reported issues.
//!
//! Paths keep their segments separately, so a key that itself contains a dot
//! stays one segment for lookups and comparisons. Only the rendered form joins
//! segments with `.`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Separator used when rendering and parsing paths
pub const SEPARATOR: char = '.';

/// Ordered sequence of object keys from the document root to a node
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// The document root (no segments)
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from individual keys, each kept as one segment
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a dotted rendering such as `general_information.client_1.dob`
    ///
    /// The empty string is the root path.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self::from_segments(dotted.split(SEPARATOR))
    }

    /// Extend the path by one key
    pub fn child(&self, key: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(key.to_string());
        Self { segments }
    }

    /// Path segments in root-to-leaf order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the document root
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, if any
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Resolve this path inside a document
    ///
    /// Every intermediate node must be an object containing the next key;
    /// arrays are never indexed into.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(document, |node, key| node.as_object()?.get(key))
    }

    /// Rendering used in human-facing messages, where the root reads `root`
    pub fn display_name(&self) -> String {
        if self.is_root() {
            "root".to_string()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl From<String> for FieldPath {
    fn from(dotted: String) -> Self {
        Self::parse(&dotted)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let dotted = String::deserialize(deserializer)?;
        Ok(Self::parse(&dotted))
    }
}
