//! Pattern matching logic.
//!
//! # Responsibilities
//! - Match a concrete path against a pattern (exact arity)
//! - Decide whether two patterns could match the same concrete path
//!
//! # Design Decisions
//! - Segment count must match exactly; no prefix matching
//! - Literal comparison is case-sensitive and encoding-sensitive
//! - A dynamic segment matches any non-empty segment
//! - No regex, a match is a single pass over the segments

use crate::routing::segment::{Pattern, Segment};

/// Trait for matching split paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the segment(s) satisfy this condition.
    fn matches(&self, segments: &[&str]) -> bool;
}

impl Segment {
    /// Match a single concrete segment.
    pub fn accepts(&self, input: &str) -> bool {
        match self {
            Segment::Literal(value) => value == input,
            Segment::Dynamic(_) => !input.is_empty(),
        }
    }

    /// True if some concrete segment satisfies both sides.
    pub fn compatible(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Literal(a), Segment::Literal(b)) => a == b,
            (Segment::Literal(value), Segment::Dynamic(_))
            | (Segment::Dynamic(_), Segment::Literal(value)) => !value.is_empty(),
            (Segment::Dynamic(_), Segment::Dynamic(_)) => true,
        }
    }
}

impl Matcher for Pattern {
    fn matches(&self, segments: &[&str]) -> bool {
        // All positions must pass (AND)
        self.arity() == segments.len()
            && self
                .segments()
                .iter()
                .zip(segments)
                .all(|(pattern, input)| pattern.accepts(input))
    }
}

impl Pattern {
    /// True if `other` has the same arity and is compatible at every position
    /// except `skip`.
    pub fn overlaps_except(&self, other: &Pattern, skip: Option<usize>) -> bool {
        self.arity() == other.arity()
            && self
                .segments()
                .iter()
                .zip(other.segments())
                .enumerate()
                .all(|(i, (a, b))| Some(i) == skip || a.compatible(b))
    }

    /// True if some concrete path matches both patterns.
    pub fn overlaps(&self, other: &Pattern) -> bool {
        self.overlaps_except(other, None)
    }
}
