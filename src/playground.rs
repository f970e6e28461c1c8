//! Free-form pattern testing with flags and capture groups.
use crate::flags::RegexFlags;
use crate::matcher::{BoundedMatcher, Truncation};
use fancy_regex::Captures;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_SAMPLE_TEXT: &str =
    "Hello World 123\nThis is a test string.\nContact: test@example.com";

/// One match with its capture groups. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaygroundMatch {
    pub text: String,
    pub index: usize,
    pub end: usize,
    pub groups: Vec<Option<String>>,
    pub named_groups: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaygroundReport {
    pub pattern: String,
    pub flags: String,
    pub matches: Vec<PlaygroundMatch>,
    pub truncation: Option<Truncation>,
    pub error: Option<String>,
}

impl PlaygroundReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Caller-owned playground state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playground {
    pub pattern: String,
    pub text: String,
    pub flags: RegexFlags,
}

impl Default for Playground {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            text: DEFAULT_SAMPLE_TEXT.to_string(),
            flags: RegexFlags::default(),
        }
    }
}

impl Playground {
    pub fn new(pattern: impl Into<String>, text: impl Into<String>, flags: RegexFlags) -> Self {
        Self {
            pattern: pattern.into(),
            text: text.into(),
            flags,
        }
    }

    pub fn toggle_flag(&mut self, letter: char) -> bool {
        let slot = match letter {
            'g' => &mut self.flags.global,
            'i' => &mut self.flags.ignore_case,
            'm' => &mut self.flags.multiline,
            's' => &mut self.flags.dot_all,
            'u' => &mut self.flags.unicode,
            'y' => &mut self.flags.sticky,
            _ => return false,
        };
        *slot = !*slot;
        true
    }

    /// Runs the pattern; pattern errors end up in `report.error`.
    pub fn evaluate(&self) -> PlaygroundReport {
        let mut report = PlaygroundReport {
            pattern: self.pattern.clone(),
            flags: self.flags.to_string(),
            ..PlaygroundReport::default()
        };

        if self.pattern.is_empty() || self.text.is_empty() {
            return report;
        }

        let matcher = match BoundedMatcher::new(&self.pattern, self.flags) {
            Ok(matcher) => matcher,
            Err(e) => {
                debug!("Playground pattern {:?} failed: {e}", self.pattern);
                report.error = Some(e.to_string());
                return report;
            }
        };

        let names: Vec<Option<String>> = matcher
            .regex()
            .capture_names()
            .map(|name| name.map(str::to_string))
            .collect();
        let outcome = matcher.scan_with(&self.text, |caps| to_playground_match(caps, &names));

        report.matches = outcome.matches;
        report.truncation = outcome.truncation;
        report
    }
}

fn to_playground_match(caps: &Captures<'_>, names: &[Option<String>]) -> Option<PlaygroundMatch> {
    let whole = caps.get(0)?;
    let groups = (1..caps.len())
        .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
        .collect();
    let named_groups = names
        .iter()
        .enumerate()
        .filter_map(|(i, name)| {
            name.as_ref()
                .map(|name| (name.clone(), caps.get(i).map(|m| m.as_str().to_string())))
        })
        .collect();

    Some(PlaygroundMatch {
        text: whole.as_str().to_string(),
        index: whole.start(),
        end: whole.end(),
        groups,
        named_groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sample_and_flags() {
        let playground = Playground::default();
        assert_eq!(playground.flags.to_string(), "g");
        assert!(playground.text.contains("test@example.com"));
        let report = playground.evaluate();
        assert!(report.is_ok());
        assert!(report.matches.is_empty());
    }

    #[test]
    fn test_capture_groups() {
        let playground = Playground::new(
            r"(?P<user>\w+)@(\w+)\.com",
            DEFAULT_SAMPLE_TEXT,
            RegexFlags::default(),
        );
        let report = playground.evaluate();
        assert_eq!(report.matches.len(), 1);

        let m = &report.matches[0];
        assert_eq!(m.text, "test@example.com");
        assert_eq!(m.end - m.index, m.text.len());
        assert_eq!(
            m.groups,
            vec![Some("test".to_string()), Some("example".to_string())]
        );
        assert_eq!(
            m.named_groups.get("user"),
            Some(&Some("test".to_string()))
        );
    }

    #[test]
    fn test_unmatched_optional_group() {
        let playground = Playground::new("a(b)?", "a", RegexFlags::default());
        let report = playground.evaluate();
        assert_eq!(report.matches[0].groups, vec![None]);
    }

    #[test]
    fn test_toggle_flags() {
        let mut playground = Playground::new("test", "Test test", RegexFlags::default());
        assert_eq!(playground.evaluate().matches.len(), 1);

        assert!(playground.toggle_flag('i'));
        assert_eq!(playground.evaluate().matches.len(), 2);

        assert!(playground.toggle_flag('g'));
        let report = playground.evaluate();
        assert_eq!(report.flags, "i");
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].text, "Test");

        assert!(!playground.toggle_flag('q'));
    }

    #[test]
    fn test_errors_become_report_messages() {
        let report = Playground::new("[", "abc", RegexFlags::default()).evaluate();
        assert!(!report.is_ok());
        assert!(report.matches.is_empty());

        let report = Playground::new("(.+)+", "abc", RegexFlags::default()).evaluate();
        assert_eq!(
            report.error.as_deref(),
            Some("this pattern is blocked for safety reasons")
        );
    }
}
