pub mod cli;
pub mod config;
pub mod error;
pub mod flags;
pub mod matcher;
pub mod output;
pub mod playground;
pub mod safety;
pub mod tutorial;

pub use crate::error::{RegexDojoError, Result};
pub use clap::Parser;
pub use cli::{Cli, Commands};
pub use flags::RegexFlags;
pub use matcher::{
    BoundedMatcher, MatchRecord, ScanOutcome, Truncation, get_regex_matches, scan,
    scan_with_flags, validate_regex,
};
pub use playground::{Playground, PlaygroundMatch, PlaygroundReport};
pub use safety::{DangerousSignature, is_dangerous_regex, matching_signature};
pub use tutorial::{Curriculum, Exercise, Feedback, Lesson, TutorialSession, check_answer};
