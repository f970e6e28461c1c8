//! Matching options, written and parsed in the `gimsuy` flag notation.
use crate::error::RegexDojoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegexFlags {
    /// Report every match instead of only the first.
    pub global: bool,
    pub ignore_case: bool,
    /// `^` and `$` also match at line boundaries.
    pub multiline: bool,
    /// `.` also matches `\n`.
    pub dot_all: bool,
    /// Accepted for notation compatibility; matching is always Unicode-aware.
    pub unicode: bool,
    /// Every match must start exactly where the previous one ended.
    pub sticky: bool,
}

impl Default for RegexFlags {
    fn default() -> Self {
        Self {
            global: true,
            ignore_case: false,
            multiline: false,
            dot_all: false,
            unicode: false,
            sticky: false,
        }
    }
}

impl RegexFlags {
    /// Flags with everything switched off, including `global`.
    pub fn none() -> Self {
        Self {
            global: false,
            ..Self::default()
        }
    }

    /// Inline group that applies the engine-level options, e.g. `(?is)`.
    pub(crate) fn inline_prefix(&self) -> Option<String> {
        let mut letters = String::new();
        if self.ignore_case {
            letters.push('i');
        }
        if self.multiline {
            letters.push('m');
        }
        if self.dot_all {
            letters.push('s');
        }
        if letters.is_empty() {
            None
        } else {
            Some(format!("(?{letters})"))
        }
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = [
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.sticky, 'y'),
        ];
        for (enabled, letter) in letters {
            if enabled {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for RegexFlags {
    type Err = RegexDojoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = RegexFlags::none();
        for letter in s.chars() {
            let slot = match letter {
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                's' => &mut flags.dot_all,
                'u' => &mut flags.unicode,
                'y' => &mut flags.sticky,
                other => {
                    return Err(RegexDojoError::Other(format!(
                        "unknown regex flag '{other}' (expected any of gimsuy)"
                    )));
                }
            };
            if *slot {
                return Err(RegexDojoError::Other(format!(
                    "regex flag '{letter}' given more than once"
                )));
            }
            *slot = true;
        }
        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_global_only() {
        assert_eq!(RegexFlags::default().to_string(), "g");
        assert_eq!(RegexFlags::none().to_string(), "");
    }

    #[test]
    fn test_parse_orders_canonically() {
        let flags: RegexFlags = "ysig".parse().unwrap();
        assert!(flags.global && flags.ignore_case && flags.dot_all && flags.sticky);
        assert!(!flags.multiline && !flags.unicode);
        assert_eq!(flags.to_string(), "gisy");
    }

    #[test]
    fn test_parse_rejects_unknown_and_repeated() {
        assert!("gx".parse::<RegexFlags>().is_err());
        assert!("gg".parse::<RegexFlags>().is_err());
        assert_eq!("".parse::<RegexFlags>().unwrap(), RegexFlags::none());
    }

    #[test]
    fn test_inline_prefix() {
        assert_eq!(RegexFlags::default().inline_prefix(), None);
        let flags: RegexFlags = "gims".parse().unwrap();
        assert_eq!(flags.inline_prefix().as_deref(), Some("(?ims)"));
        let unicode_only: RegexFlags = "u".parse().unwrap();
        assert_eq!(unicode_only.inline_prefix(), None);
    }
}
