use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegexDojoError {
    #[error("pattern is too long ({length} characters, maximum is {max})")]
    PatternTooLong { length: usize, max: usize },

    #[error("this pattern is blocked for safety reasons")]
    UnsafePattern,

    #[error("invalid regular expression: {0}")]
    InvalidSyntax(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lesson error: {0}")]
    Lesson(String),

    #[error("An unexpected error occurred: {0}")]
    Other(String),
}

impl RegexDojoError {
    /// True for the errors a user fixes by editing the pattern.
    pub fn is_pattern_error(&self) -> bool {
        matches!(
            self,
            RegexDojoError::PatternTooLong { .. }
                | RegexDojoError::UnsafePattern
                | RegexDojoError::InvalidSyntax(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RegexDojoError>;
