use super::{Curriculum, Exercise, Feedback, Lesson, check_answer};
use crate::error::{RegexDojoError, Result};
use crate::matcher::{MatchRecord, get_regex_matches};
use log::{debug, info};
use std::collections::BTreeSet;

/// Progress through the curriculum. Owned by whoever drives the tutorial.
#[derive(Debug, Clone)]
pub struct TutorialSession {
    lessons: Vec<Lesson>,
    lesson_index: usize,
    exercise_index: usize,
    pattern: String,
    feedback: Option<Feedback>,
    show_hint: bool,
    solved: BTreeSet<(u32, u32)>,
}

impl TutorialSession {
    /// Starts on the first exercise of the first lesson.
    pub fn new(curriculum: Curriculum) -> Result<Self> {
        curriculum.validate()?;
        Ok(Self {
            lessons: curriculum.lessons,
            lesson_index: 0,
            exercise_index: 0,
            pattern: String::new(),
            feedback: None,
            show_hint: false,
            solved: BTreeSet::new(),
        })
    }

    pub fn builtin() -> Result<Self> {
        Curriculum::builtin().and_then(Self::new)
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn current_lesson(&self) -> &Lesson {
        &self.lessons[self.lesson_index]
    }

    pub fn current_exercise(&self) -> &Exercise {
        &self.current_lesson().exercises[self.exercise_index]
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Jumps to the first exercise of lesson `id` and clears the input.
    pub fn select_lesson(&mut self, id: u32) -> Result<()> {
        let index = self
            .lessons
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| RegexDojoError::Lesson(format!("no lesson with id {id}")))?;
        self.lesson_index = index;
        self.exercise_index = 0;
        self.reset_input();
        debug!("Selected lesson {id}");
        Ok(())
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
    }

    pub fn toggle_hint(&mut self) -> bool {
        self.show_hint = !self.show_hint;
        self.show_hint
    }

    /// The hint, when hints are shown and the exercise has one.
    pub fn hint(&self) -> Option<&str> {
        if self.show_hint {
            self.current_exercise().hint.as_deref()
        } else {
            None
        }
    }

    /// Checks the current pattern and remembers the feedback.
    pub fn check(&mut self) -> &Feedback {
        let feedback = check_answer(self.current_exercise(), &self.pattern);
        if feedback.is_correct() {
            let lesson_id = self.current_lesson().id;
            let exercise_id = self.current_exercise().id;
            self.solved.insert((lesson_id, exercise_id));

            let lesson = &self.lessons[self.lesson_index];
            if lesson
                .exercises
                .iter()
                .all(|ex| self.solved.contains(&(lesson_id, ex.id)))
            {
                self.lessons[self.lesson_index].completed = true;
                info!("Lesson {lesson_id} completed");
            }
        }
        self.feedback.insert(feedback)
    }

    /// Moves to the next exercise, continuing into the next lesson.
    /// Returns false at the end of the curriculum.
    pub fn next_exercise(&mut self) -> bool {
        if self.exercise_index + 1 < self.current_lesson().exercises.len() {
            self.exercise_index += 1;
        } else if self.lesson_index + 1 < self.lessons.len() {
            self.lesson_index += 1;
            self.exercise_index = 0;
        } else {
            return false;
        }
        self.reset_input();
        true
    }

    /// Matches of the current pattern in the exercise text; empty on error.
    pub fn preview(&self) -> Vec<MatchRecord> {
        get_regex_matches(&self.pattern, &self.current_exercise().test_string)
            .unwrap_or_default()
    }

    /// `(completed lessons, total lessons)`
    pub fn progress(&self) -> (usize, usize) {
        let completed = self.lessons.iter().filter(|l| l.completed).count();
        (completed, self.lessons.len())
    }

    fn reset_input(&mut self) {
        self.pattern.clear();
        self.feedback = None;
        self.show_hint = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_first_exercise() {
        let session = TutorialSession::builtin().unwrap();
        assert_eq!(session.current_lesson().id, 1);
        assert_eq!(session.current_exercise().id, 1);
        assert!(session.feedback().is_none());
        assert_eq!(session.progress().0, 0);
    }

    #[test]
    fn test_rejects_unusable_curriculum() {
        let empty = Curriculum { lessons: Vec::new() };
        assert!(matches!(
            TutorialSession::new(empty),
            Err(RegexDojoError::Lesson(_))
        ));

        let mut curriculum = Curriculum::builtin().unwrap();
        curriculum.lessons[0].exercises.clear();
        assert!(matches!(
            TutorialSession::new(curriculum),
            Err(RegexDojoError::Lesson(_))
        ));
    }

    #[test]
    fn test_select_lesson_resets_state() {
        let mut session = TutorialSession::builtin().unwrap();
        session.set_pattern("hel");
        session.toggle_hint();
        session.check();

        session.select_lesson(2).unwrap();
        assert_eq!(session.current_lesson().id, 2);
        assert_eq!(session.pattern(), "");
        assert!(session.feedback().is_none());
        assert!(session.hint().is_none());

        assert!(session.select_lesson(999).is_err());
    }

    #[test]
    fn test_correct_answer_completes_single_exercise_lesson() {
        let mut session = TutorialSession::builtin().unwrap();
        session.set_pattern("hello");
        assert!(session.check().is_correct());
        assert!(session.lessons()[0].completed);
        assert_eq!(session.progress().0, 1);
    }

    #[test]
    fn test_lesson_needs_every_exercise() {
        let mut session = TutorialSession::builtin().unwrap();
        session.select_lesson(2).unwrap();
        session.set_pattern(r"\d");
        assert!(session.check().is_correct());
        assert!(!session.current_lesson().completed);

        assert!(session.next_exercise());
        assert_eq!(session.current_lesson().id, 2);
        session.set_pattern("c.t");
        assert!(session.check().is_correct());
        assert!(session.current_lesson().completed);
    }

    #[test]
    fn test_hint_toggle() {
        let mut session = TutorialSession::builtin().unwrap();
        assert!(session.hint().is_none());
        assert!(session.toggle_hint());
        assert!(session.hint().is_some());
        assert!(!session.toggle_hint());
    }

    #[test]
    fn test_preview_and_navigation_to_end() {
        let mut session = TutorialSession::builtin().unwrap();
        session.set_pattern("o");
        assert_eq!(session.preview().len(), 2);
        session.set_pattern("[");
        assert!(session.preview().is_empty());

        let mut steps = 0;
        while session.next_exercise() {
            steps += 1;
        }
        let total: usize = session.lessons().iter().map(|l| l.exercises.len()).sum();
        assert_eq!(steps, total - 1);
        assert!(!session.next_exercise());
    }
}
