//! Bounded pattern matching over a backtracking engine.
//!
//! User patterns go through three gates before they run: a length limit, the
//! [`crate::safety`] deny-list and compilation. The scan itself is capped in
//! both steps taken and records produced, so a call always returns.
use crate::error::{RegexDojoError, Result};
use crate::flags::RegexFlags;
use crate::safety::{
    BACKTRACK_LIMIT, MAX_ITERATIONS, MAX_MATCHES, MAX_PATTERN_LENGTH, matching_signature,
};
use fancy_regex::{Captures, Regex, RegexBuilder};
use log::{debug, warn};
use serde::Serialize;

/// A non-empty match and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub text: String,
    pub index: usize,
}

/// Why a scan stopped before running out of matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Truncation {
    Iterations,
    Matches,
    /// The engine exhausted its backtracking budget on a single step.
    Backtracking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanOutcome<T = MatchRecord> {
    pub matches: Vec<T>,
    pub truncation: Option<Truncation>,
}

impl<T> ScanOutcome<T> {
    fn empty() -> Self {
        Self {
            matches: Vec::new(),
            truncation: None,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanMode {
    All,
    First,
}

/// A pattern that passed the safety gates, compiled and ready to scan.
#[derive(Debug)]
pub struct BoundedMatcher {
    regex: Regex,
    flags: RegexFlags,
}

impl BoundedMatcher {
    pub fn new(pattern: &str, flags: RegexFlags) -> Result<Self> {
        let length = pattern.chars().count();
        if length > MAX_PATTERN_LENGTH {
            return Err(RegexDojoError::PatternTooLong {
                length,
                max: MAX_PATTERN_LENGTH,
            });
        }

        if let Some(signature) = matching_signature(pattern) {
            warn!("Rejected pattern {pattern:?}: {signature}");
            return Err(RegexDojoError::UnsafePattern);
        }

        let source = match flags.inline_prefix() {
            Some(prefix) => format!("{prefix}{pattern}"),
            None => pattern.to_string(),
        };
        let regex = RegexBuilder::new(&source)
            .backtrack_limit(BACKTRACK_LIMIT)
            .build()
            .map_err(|e| RegexDojoError::InvalidSyntax(e.to_string()))?;

        Ok(Self { regex, flags })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn flags(&self) -> RegexFlags {
        self.flags
    }

    /// All non-empty matches, or only the first when the flags are not global.
    pub fn scan(&self, text: &str) -> ScanOutcome {
        self.scan_with(text, to_record)
    }

    pub fn first(&self, text: &str) -> Option<MatchRecord> {
        self.scan_in_mode(text, ScanMode::First, to_record)
            .matches
            .into_iter()
            .next()
    }

    /// Runs the bounded scan and converts each non-empty match with `convert`.
    pub fn scan_with<T, F>(&self, text: &str, convert: F) -> ScanOutcome<T>
    where
        F: FnMut(&Captures<'_>) -> Option<T>,
    {
        let mode = if self.flags.global {
            ScanMode::All
        } else {
            ScanMode::First
        };
        self.scan_in_mode(text, mode, convert)
    }

    fn scan_in_mode<T, F>(&self, text: &str, mode: ScanMode, mut convert: F) -> ScanOutcome<T>
    where
        F: FnMut(&Captures<'_>) -> Option<T>,
    {
        let mut outcome = ScanOutcome::empty();
        if text.is_empty() {
            return outcome;
        }

        let mut position = 0;
        let mut iterations = 0;

        while position <= text.len() {
            let caps = match self.regex.captures_from_pos(text, position) {
                Ok(Some(caps)) => caps,
                Ok(None) => break,
                Err(e) => {
                    warn!("Stopping scan at byte {position}: {e}");
                    outcome.truncation = Some(Truncation::Backtracking);
                    break;
                }
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            iterations += 1;
            if iterations > MAX_ITERATIONS {
                debug!("Iteration limit of {MAX_ITERATIONS} reached");
                outcome.truncation = Some(Truncation::Iterations);
                break;
            }

            if self.flags.sticky && whole.start() != position {
                break;
            }

            if whole.start() < whole.end() {
                if outcome.matches.len() >= MAX_MATCHES {
                    debug!("Match limit of {MAX_MATCHES} reached");
                    outcome.truncation = Some(Truncation::Matches);
                    break;
                }
                if let Some(item) = convert(&caps) {
                    outcome.matches.push(item);
                }
                if mode == ScanMode::First {
                    break;
                }
                position = whole.end();
            } else if self.flags.sticky {
                break;
            } else {
                position = next_char_boundary(text, whole.end());
            }
        }

        outcome
    }
}

fn to_record(caps: &Captures<'_>) -> Option<MatchRecord> {
    caps.get(0).map(|m| MatchRecord {
        text: m.as_str().to_string(),
        index: m.start(),
    })
}

fn next_char_boundary(text: &str, position: usize) -> usize {
    text[position..]
        .chars()
        .next()
        .map_or(position + 1, |c| position + c.len_utf8())
}

fn is_blank_input(pattern: &str, text: &str) -> bool {
    pattern.trim().is_empty() || text.is_empty()
}

/// Every non-empty match of `pattern` in `text`, bounded and in order.
///
/// Blank patterns and empty text yield an empty list. Hitting the iteration or
/// match limit truncates the list without an error.
pub fn get_regex_matches(pattern: &str, text: &str) -> Result<Vec<MatchRecord>> {
    scan(pattern, text).map(|outcome| outcome.matches)
}

/// Like [`get_regex_matches`], but also reports whether the scan was cut short.
pub fn scan(pattern: &str, text: &str) -> Result<ScanOutcome> {
    scan_with_flags(pattern, text, RegexFlags::default())
}

pub fn scan_with_flags(pattern: &str, text: &str, flags: RegexFlags) -> Result<ScanOutcome> {
    if is_blank_input(pattern, text) {
        return Ok(ScanOutcome::empty());
    }
    let matcher = BoundedMatcher::new(pattern, flags)?;
    let outcome = matcher.scan(text);
    debug!(
        "Pattern {pattern:?} produced {} match(es){}",
        outcome.matches.len(),
        if outcome.is_truncated() { " (truncated)" } else { "" }
    );
    Ok(outcome)
}

/// Whether the pattern compiles. No length or safety checks are applied.
pub fn validate_regex(pattern: &str) -> bool {
    Regex::new(pattern).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(records: &[MatchRecord]) -> Vec<&str> {
        records.iter().map(|m| m.text.as_str()).collect()
    }

    #[test]
    fn test_zero_length_matches_skip_multibyte_chars() {
        let matches = get_regex_matches("x*", "日本x語").unwrap();
        assert_eq!(
            matches,
            vec![MatchRecord {
                text: "x".to_string(),
                index: "日本".len()
            }]
        );
    }

    #[test]
    fn test_match_after_empty_prefix() {
        let matches = get_regex_matches("a*", "baaab").unwrap();
        assert_eq!(texts(&matches), vec!["aaa"]);
        assert_eq!(matches[0].index, 1);
    }

    #[test]
    fn test_iteration_limit_truncates_silently() {
        let text = "b".repeat(MAX_ITERATIONS * 2);
        let outcome = scan("a*", &text).unwrap();
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.truncation, Some(Truncation::Iterations));
    }

    #[test]
    fn test_match_limit_reports_truncation() {
        let text = "a".repeat(MAX_MATCHES + 20);
        let outcome = scan("a", &text).unwrap();
        assert_eq!(outcome.matches.len(), MAX_MATCHES);
        assert_eq!(outcome.truncation, Some(Truncation::Matches));
    }

    #[test]
    fn test_exact_match_limit_is_not_truncation() {
        let text = "a".repeat(MAX_MATCHES);
        let outcome = scan("a", &text).unwrap();
        assert_eq!(outcome.matches.len(), MAX_MATCHES);
        assert_eq!(outcome.truncation, None);
    }

    #[test]
    fn test_sticky_stops_at_first_gap() {
        let flags: RegexFlags = "gy".parse().unwrap();
        let outcome = scan_with_flags("ab", "ababxab", flags).unwrap();
        assert_eq!(texts(&outcome.matches), vec!["ab", "ab"]);
        assert_eq!(outcome.truncation, None);

        let outcome = scan_with_flags("ab", "xab", flags).unwrap();
        assert!(outcome.matches.is_empty());
    }

    #[test]
    fn test_sticky_empty_match_ends_scan() {
        for flags in ["y", "gy"] {
            let flags: RegexFlags = flags.parse().unwrap();
            let outcome = scan_with_flags("b*", "ab", flags).unwrap();
            assert!(outcome.matches.is_empty());
            assert_eq!(outcome.truncation, None);
        }

        let flags: RegexFlags = "gy".parse().unwrap();
        let outcome = scan_with_flags("a*", "aab", flags).unwrap();
        assert_eq!(texts(&outcome.matches), vec!["aa"]);
    }

    #[test]
    fn test_backtrack_budget_truncates_silently() {
        let text = format!("{}c", "a".repeat(40));
        let outcome = scan(r"^(a|aa)+\1$", &text).unwrap();
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.truncation, Some(Truncation::Backtracking));
    }

    #[test]
    fn test_non_global_returns_first_match_only() {
        let outcome = scan_with_flags("a", "banana", RegexFlags::none()).unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].index, 1);
        assert_eq!(outcome.truncation, None);
    }

    #[test]
    fn test_flags_reach_the_engine() {
        let flags: RegexFlags = "gi".parse().unwrap();
        let outcome = scan_with_flags("hello", "Hello HELLO", flags).unwrap();
        assert_eq!(texts(&outcome.matches), vec!["Hello", "HELLO"]);

        let flags: RegexFlags = "gm".parse().unwrap();
        let outcome = scan_with_flags("^\\w+", "one\ntwo", flags).unwrap();
        assert_eq!(texts(&outcome.matches), vec!["one", "two"]);

        let flags: RegexFlags = "gs".parse().unwrap();
        let outcome = scan_with_flags("a.b", "a\nb", flags).unwrap();
        assert_eq!(texts(&outcome.matches), vec!["a\nb"]);
    }

    #[test]
    fn test_lookaround_is_supported() {
        let matches = get_regex_matches(r"\d+(?=px)", "10px 20em 30px").unwrap();
        assert_eq!(texts(&matches), vec!["10", "30"]);
    }

    #[test]
    fn test_matcher_first() {
        let matcher = BoundedMatcher::new("o", RegexFlags::default()).unwrap();
        let first = matcher.first("foo").unwrap();
        assert_eq!(first.index, 1);
        assert!(matcher.first("bar").is_none());
    }

    #[test]
    fn test_unsafe_pattern_is_logged() {
        testing_logger::setup();
        let err = BoundedMatcher::new("(.*)+", RegexFlags::default()).unwrap_err();
        assert!(matches!(err, RegexDojoError::UnsafePattern));
        testing_logger::validate(|captured_logs| {
            let warnings: Vec<_> = captured_logs
                .iter()
                .filter(|entry| entry.level == log::Level::Warn)
                .collect();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].body.contains("repeated `.*` group"));
        });
    }
}
