//! Path segments and route patterns.
//!
//! # Responsibilities
//! - Split a concrete path into its `/`-delimited segments
//! - Parse canonical pattern strings (`/users/:param1`) into segments
//! - Render a segment sequence back to its canonical string
//!
//! # Design Decisions
//! - A dynamic segment is always named `param<N>`, N being its zero-indexed position
//! - The canonical string is the identity of a pattern
//! - Concrete paths never produce dynamic segments, even if they contain `:`
//! - When parsing, only `:param<digits>` is dynamic; other `:` segments stay literal
//! - A concrete segment spelled exactly `:param<N>` at position N is stored as a
//!   literal but parses back as dynamic, so it does not survive export/import

use std::fmt;
use thiserror::Error;

/// Prefix of every dynamic segment name.
pub const PARAM_PREFIX: &str = "param";

/// Marker that identifies a canonical pattern string rather than a concrete path.
pub const PARAM_TOKEN: &str = ":param";

/// Errors raised while parsing a canonical pattern string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    /// Pattern does not start with `/`.
    #[error("pattern `{0}` must start with `/`")]
    MissingLeadingSlash(String),

    /// A `:param<N>` segment whose N disagrees with its position.
    #[error("parameter `{name}` sits at position {position}")]
    MisplacedParameter { name: String, position: usize },
}

/// One component of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matches exactly this string.
    Literal(String),
    /// Matches any non-empty segment.
    Dynamic(String),
}

impl Segment {
    /// Dynamic segment named after `position`.
    pub fn param(position: usize) -> Self {
        Segment::Dynamic(format!("{PARAM_PREFIX}{position}"))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Segment::Dynamic(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(value) => f.write_str(value),
            Segment::Dynamic(name) => write!(f, ":{name}"),
        }
    }
}

/// Split a path into segments. `/` and `""` have no segments.
pub fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}

fn is_param_name(name: &str) -> bool {
    name.strip_prefix(PARAM_PREFIX)
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Returns true if `input` should be read as a pattern string.
pub fn is_pattern_string(input: &str) -> bool {
    input.contains(PARAM_TOKEN)
}

/// An ordered sequence of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// All-literal pattern for a concrete path.
    pub fn from_concrete(path: &str) -> Self {
        let segments = split_path(path)
            .into_iter()
            .map(|s| Segment::Literal(s.to_string()))
            .collect();
        Self { segments }
    }

    /// Parse a canonical pattern string.
    pub fn parse(pattern: &str) -> Result<Self, SegmentError> {
        if !pattern.starts_with('/') {
            return Err(SegmentError::MissingLeadingSlash(pattern.to_string()));
        }

        let mut segments = Vec::new();
        for (position, raw) in split_path(pattern).into_iter().enumerate() {
            let Some(name) = raw.strip_prefix(':').filter(|n| is_param_name(n)) else {
                segments.push(Segment::Literal(raw.to_string()));
                continue;
            };
            if name != format!("{PARAM_PREFIX}{position}") {
                return Err(SegmentError::MisplacedParameter {
                    name: name.to_string(),
                    position,
                });
            }
            segments.push(Segment::Dynamic(name.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn arity(&self) -> usize {
        self.segments.len()
    }

    /// Names of the dynamic segments, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Dynamic(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Copy of this pattern with `position` made dynamic.
    pub fn with_param_at(&self, position: usize) -> Option<Self> {
        if position >= self.segments.len() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments[position] = Segment::param(position);
        Some(Self { segments })
    }

    /// Canonical string form.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/1/2/a"), vec!["1", "2", "a"]);
        assert!(split_path("/").is_empty());
        assert!(split_path("").is_empty());
        assert_eq!(split_path("/a/"), vec!["a", ""]);
    }

    #[test]
    fn test_concrete_is_all_literal() {
        let pattern = Pattern::from_concrete("/users/:me/42");
        assert_eq!(pattern.arity(), 3);
        assert!(pattern.segments().iter().all(|s| !s.is_dynamic()));
        assert_eq!(pattern.canonical(), "/users/:me/42");
    }

    #[test]
    fn test_parse_pattern() {
        let pattern = Pattern::parse("/1/:param1/:param2").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("1".into()),
                Segment::Dynamic("param1".into()),
                Segment::Dynamic("param2".into()),
            ]
        );
        assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["param1", "param2"]);
        assert_eq!(pattern.to_string(), "/1/:param1/:param2");
    }

    #[test]
    fn test_parse_root() {
        let pattern = Pattern::parse("/").unwrap();
        assert_eq!(pattern.arity(), 0);
        assert_eq!(pattern.to_string(), "/");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            Pattern::parse("users/1"),
            Err(SegmentError::MissingLeadingSlash("users/1".into()))
        );
        assert!(matches!(
            Pattern::parse("/users/:param3"),
            Err(SegmentError::MisplacedParameter { position: 1, .. })
        ));
    }

    #[test]
    fn test_parse_keeps_other_colon_segments_literal() {
        let pattern = Pattern::parse("/users/:me/:param").unwrap();
        assert!(pattern.segments().iter().all(|s| !s.is_dynamic()));
        assert_eq!(pattern, Pattern::from_concrete("/users/:me/:param"));
    }

    #[test]
    fn test_param_shaped_literal_reparses_as_dynamic() {
        let concrete = Pattern::from_concrete("/users/:param1");
        assert!(!concrete.segments()[1].is_dynamic());
        let reparsed = Pattern::parse(&concrete.canonical()).unwrap();
        assert!(reparsed.segments()[1].is_dynamic());
        assert_ne!(reparsed, concrete);
    }

    #[test]
    fn test_with_param_at() {
        let pattern = Pattern::from_concrete("/1/2/a");
        let templated = pattern.with_param_at(2).unwrap();
        assert_eq!(templated.to_string(), "/1/2/:param2");
        assert!(pattern.with_param_at(3).is_none());
    }

    #[test]
    fn test_is_pattern_string() {
        assert!(is_pattern_string("/1/2/:param2"));
        assert!(!is_pattern_string("/1/2/a"));
    }
}
