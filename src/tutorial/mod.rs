//! Lessons, exercises and answer checking for the guided tutorial.
pub mod session;

use crate::error::{RegexDojoError, Result};
use crate::matcher::get_regex_matches;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use session::TutorialSession;

const BUILTIN_LESSONS: &str = include_str!("lessons.toml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: u32,
    pub question: String,
    pub test_string: String,
    pub expected_answer: String,
    #[serde(default)]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(rename = "exercise")]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    #[serde(rename = "lesson")]
    pub lessons: Vec<Lesson>,
}

impl Curriculum {
    /// The lessons shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_LESSONS)
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        let curriculum: Curriculum = toml::from_str(source)
            .map_err(|e| RegexDojoError::Lesson(format!("failed to parse lessons: {e}")))?;
        curriculum.validate()?;
        Ok(curriculum)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.lessons.is_empty() {
            return Err(RegexDojoError::Lesson("no lessons defined".to_string()));
        }
        for lesson in &self.lessons {
            if lesson.exercises.is_empty() {
                return Err(RegexDojoError::Lesson(format!(
                    "lesson {} has no exercises",
                    lesson.id
                )));
            }
            if self.lessons.iter().filter(|l| l.id == lesson.id).count() > 1 {
                return Err(RegexDojoError::Lesson(format!(
                    "lesson id {} is used more than once",
                    lesson.id
                )));
            }
        }
        Ok(())
    }

    pub fn lesson(&self, id: u32) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }
}

/// Outcome of checking an answer against an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    Correct,
    MatchedButWrong { matches: Vec<String> },
    NoMatch,
    InvalidPattern { message: String },
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        matches!(self, Feedback::Correct)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Correct => write!(f, "Correct!"),
            Feedback::MatchedButWrong { matches } => write!(
                f,
                "Matched, but not the expected answer. Matched: {}",
                matches.join(", ")
            ),
            Feedback::NoMatch => write!(f, "No match. Try again."),
            Feedback::InvalidPattern { message } => write!(f, "Invalid pattern: {message}"),
        }
    }
}

/// Classifies `answer` for `exercise`.
///
/// Pattern errors win over everything else; an answer is only correct when it
/// is textually identical to the expected pattern.
pub fn check_answer(exercise: &Exercise, answer: &str) -> Feedback {
    let matches = match get_regex_matches(answer, &exercise.test_string) {
        Ok(matches) => matches,
        Err(e) => {
            return Feedback::InvalidPattern {
                message: e.to_string(),
            };
        }
    };

    if answer == exercise.expected_answer {
        Feedback::Correct
    } else if !matches.is_empty() {
        Feedback::MatchedButWrong {
            matches: matches.into_iter().map(|m| m.text).collect(),
        }
    } else {
        Feedback::NoMatch
    }
}
