//! In-memory exam sessions.
//!
//! A session holds the answers a learner has given while working through one
//! exam. Nothing here is persisted: answers are discarded when the session
//! ends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::answer::is_correct;
use crate::model::{ExamData, UserAnswer};

/// One pass through an exam.
#[derive(Debug, Clone)]
pub struct ExamSession {
    exam: ExamData,
    answers: BTreeMap<i64, UserAnswer>,
}

/// Outcome of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Questions in the exam.
    pub total: usize,
    /// Questions with a non-blank answer.
    pub answered: usize,
    /// Questions answered correctly.
    pub correct: usize,
}

impl SessionSummary {
    /// Share of all questions answered correctly, in `[0, 1]`.
    pub fn score(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

impl ExamSession {
    /// Start a session with no answers.
    pub fn start(exam: ExamData) -> Self {
        tracing::debug!(items = exam.items.len(), "exam session started");
        Self {
            exam,
            answers: BTreeMap::new(),
        }
    }

    pub fn exam(&self) -> &ExamData {
        &self.exam
    }

    /// Record an answer, replacing any previous one.
    pub fn set_answer(&mut self, id: i64, answer: UserAnswer) {
        self.answers.insert(id, answer);
    }

    /// Select or deselect an option of a multi-select question.
    pub fn toggle_choice(&mut self, id: i64, option_text: &str) {
        let mut selection = match self.answers.remove(&id) {
            Some(UserAnswer::Choices(choices)) => choices,
            _ => Vec::new(),
        };
        if let Some(pos) = selection.iter().position(|c| c == option_text) {
            selection.remove(pos);
        } else {
            selection.push(option_text.to_string());
        }
        self.answers.insert(id, UserAnswer::Choices(selection));
    }

    pub fn answer(&self, id: i64) -> Option<&UserAnswer> {
        self.answers.get(&id)
    }

    /// Returns `true` if the question has a non-blank answer.
    pub fn has_answer(&self, id: i64) -> bool {
        self.answers.get(&id).is_some_and(UserAnswer::is_present)
    }

    /// Whether the answer to `id` is correct, or `None` if it is unanswered.
    pub fn evaluate(&self, id: i64) -> Option<bool> {
        if !self.has_answer(id) {
            return None;
        }
        let key = self.exam.item(id)?.correct_answer.as_deref();
        Some(is_correct(self.answers.get(&id), key))
    }

    /// Percentage of questions with a recorded answer, rounded.
    ///
    /// Recorded answers count even if they were later cleared.
    pub fn progress_percent(&self) -> u8 {
        let total = self.exam.items.len();
        if total == 0 {
            return 0;
        }
        let recorded = self
            .exam
            .items
            .iter()
            .filter(|item| self.answers.contains_key(&item.id))
            .count();
        ((recorded as f64 / total as f64) * 100.0).round() as u8
    }

    /// Leaving now would lose recorded answers.
    pub fn needs_exit_confirmation(&self) -> bool {
        !self.answers.is_empty()
    }

    pub fn summary(&self) -> SessionSummary {
        let mut summary = SessionSummary {
            total: self.exam.items.len(),
            answered: 0,
            correct: 0,
        };
        for item in &self.exam.items {
            match self.evaluate(item.id) {
                Some(true) => {
                    summary.answered += 1;
                    summary.correct += 1;
                }
                Some(false) => summary.answered += 1,
                None => {}
            }
        }
        summary
    }

    /// End the session, discarding its answers.
    pub fn finish(self) -> SessionSummary {
        let summary = self.summary();
        tracing::debug!(
            total = summary.total,
            answered = summary.answered,
            correct = summary.correct,
            "exam session finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionItem, QuestionOption};
    use serde_json::Map;

    fn item(id: i64, type_tag: &str, correct: &[&str]) -> QuestionItem {
        QuestionItem {
            id,
            type_tag: type_tag.into(),
            title: format!("Question {id}"),
            options: ["red", "green", "blue"]
                .iter()
                .zip(["A", "B", "C"])
                .map(|(text, label)| QuestionOption {
                    label: label.into(),
                    text: text.to_string(),
                })
                .collect(),
            correct_answer: Some(correct.iter().map(|c| c.to_string()).collect()),
            images: None,
            extra: Map::new(),
        }
    }

    fn exam() -> ExamData {
        ExamData::new(vec![
            item(1, "单选", &["red"]),
            item(2, "多选", &["red", "blue"]),
            item(3, "填空", &["Paris"]),
            item(4, "简答", &["anything"]),
        ])
    }

    #[test]
    fn fresh_session_is_empty() {
        let session = ExamSession::start(exam());
        assert_eq!(session.progress_percent(), 0);
        assert!(!session.needs_exit_confirmation());
        assert_eq!(session.evaluate(1), None);
        assert_eq!(
            session.summary(),
            SessionSummary {
                total: 4,
                answered: 0,
                correct: 0
            }
        );
    }

    #[test]
    fn answers_are_evaluated() {
        let mut session = ExamSession::start(exam());
        session.set_answer(1, "red".into());
        session.set_answer(3, " paris ".into());
        session.toggle_choice(2, "blue");
        assert_eq!(session.evaluate(2), Some(false));
        session.toggle_choice(2, "red");

        assert_eq!(session.evaluate(1), Some(true));
        assert_eq!(session.evaluate(2), Some(true));
        assert_eq!(session.evaluate(3), Some(true));
        assert_eq!(session.progress_percent(), 75);
        assert!(session.needs_exit_confirmation());

        let summary = session.finish();
        assert_eq!(summary.correct, 3);
        assert_eq!(summary.answered, 3);
        assert!((summary.score() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn toggle_deselects() {
        let mut session = ExamSession::start(exam());
        session.toggle_choice(2, "red");
        session.toggle_choice(2, "red");
        assert_eq!(session.answer(2), Some(&UserAnswer::Choices(vec![])));
        assert!(!session.has_answer(2));
        // A cleared selection still counts as recorded.
        assert_eq!(session.progress_percent(), 25);
    }

    #[test]
    fn toggle_replaces_text_answer() {
        let mut session = ExamSession::start(exam());
        session.set_answer(2, "red".into());
        session.toggle_choice(2, "green");
        assert_eq!(session.answer(2), Some(&UserAnswer::Choices(vec!["green".into()])));
    }

    #[test]
    fn blank_text_is_unanswered() {
        let mut session = ExamSession::start(exam());
        session.set_answer(3, "   ".into());
        assert!(!session.has_answer(3));
        assert_eq!(session.evaluate(3), None);
    }

    #[test]
    fn unknown_question_is_not_evaluated() {
        let mut session = ExamSession::start(exam());
        session.set_answer(99, "red".into());
        assert_eq!(session.evaluate(99), None);
        assert_eq!(session.progress_percent(), 0);
    }

    #[test]
    fn empty_exam_progress() {
        let session = ExamSession::start(ExamData::new(vec![]));
        assert_eq!(session.progress_percent(), 0);
        assert_eq!(session.summary().score(), 0.0);
    }
}
