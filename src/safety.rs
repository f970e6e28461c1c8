//! Deny-list of pattern shapes prone to catastrophic backtracking.
//!
//! The check looks at the pattern's own text and never runs it. It is a
//! heuristic: it misses pathological patterns outside the list and may reject
//! safe patterns that happen to look similar.
use lazy_static::lazy_static;
use regex::RegexSet;
use std::fmt;

/// Longest pattern accepted, in characters.
pub const MAX_PATTERN_LENGTH: usize = 200;
/// Search steps allowed per call before the scan stops.
pub const MAX_ITERATIONS: usize = 1000;
/// Match records returned per call at most.
pub const MAX_MATCHES: usize = 100;
/// Backtracking budget handed to the engine for a single search step.
pub const BACKTRACK_LIMIT: usize = 1_000_000;

lazy_static! {
    static ref DANGEROUS_SIGNATURES: RegexSet = RegexSet::new([
        r"\(\?=.*\)\+",
        r"\(\?!.*\)\+",
        r"\((?:\\w|\w)\+\)\+",
        r"\(\.\*\)\+",
        r"\(\.\+\)\+",
    ])
    .expect("dangerous-pattern signatures must compile");
}

/// Shapes rejected before a pattern is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerousSignature {
    /// `(?=...)+`
    RepeatedLookahead,
    /// `(?!...)+`
    RepeatedNegativeLookahead,
    /// `(\w+)+`
    NestedQuantifier,
    /// `(.*)+`
    RepeatedDotStar,
    /// `(.+)+`
    RepeatedDotPlus,
}

impl DangerousSignature {
    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::RepeatedLookahead),
            1 => Some(Self::RepeatedNegativeLookahead),
            2 => Some(Self::NestedQuantifier),
            3 => Some(Self::RepeatedDotStar),
            4 => Some(Self::RepeatedDotPlus),
            _ => None,
        }
    }
}

impl fmt::Display for DangerousSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::RepeatedLookahead => "repeated lookahead group",
            Self::RepeatedNegativeLookahead => "repeated negative lookahead group",
            Self::NestedQuantifier => "nested unbounded quantifiers",
            Self::RepeatedDotStar => "repeated `.*` group",
            Self::RepeatedDotPlus => "repeated `.+` group",
        };
        f.write_str(description)
    }
}

/// Returns the first signature the pattern text matches, if any.
pub fn matching_signature(pattern: &str) -> Option<DangerousSignature> {
    DANGEROUS_SIGNATURES
        .matches(pattern)
        .iter()
        .next()
        .and_then(DangerousSignature::from_index)
}

pub fn is_dangerous_regex(pattern: &str) -> bool {
    DANGEROUS_SIGNATURES.is_match(pattern)
}
