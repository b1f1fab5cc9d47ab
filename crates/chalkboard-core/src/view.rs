//! Display-ready projections of questions.
//!
//! Every text field that came from an imported bank passes through
//! [`sanitize`] here, so front ends can hand them to a markup-interpreting
//! surface without further checks.

use crate::markup::sanitize;
use crate::model::{InputMode, QuestionItem, QuestionKind};

/// A labelled option, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    /// Positional label: `A`, `B`, ...
    pub letter: String,
    /// Sanitized option text.
    pub text: String,
    /// Raw option text, as recorded in answers.
    pub value: String,
}

/// A question prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: i64,
    /// 1-based position in the exam.
    pub number: usize,
    /// Raw type tag, trimmed; `unknown` if empty.
    pub type_label: String,
    pub kind: QuestionKind,
    pub input: InputMode,
    pub multi_select: bool,
    pub title: String,
    pub options: Vec<OptionView>,
    pub images: Vec<String>,
    /// The answer key as shown to the learner after answering.
    pub answer_key: String,
}

/// Positional letter for the option at `index` (0 -> `A`).
pub fn option_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        letters.push((b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Render an answer key: answers joined by ` / `, or `None` when absent.
pub fn answer_key_text(correct: Option<&[String]>) -> String {
    match correct {
        Some(answers) => answers.join(" / "),
        None => "None".to_string(),
    }
}

impl QuestionView {
    /// Build the view of the item at position `index` (0-based).
    pub fn from_item(item: &QuestionItem, index: usize) -> Self {
        let type_label = match item.type_tag.trim() {
            "" => "unknown".to_string(),
            tag => tag.to_string(),
        };
        Self {
            id: item.id,
            number: index + 1,
            type_label,
            kind: item.kind(),
            input: item.input_mode(),
            multi_select: item.is_multi_select(),
            title: sanitize(&item.title),
            options: item
                .options
                .iter()
                .enumerate()
                .map(|(i, option)| OptionView {
                    letter: option_letter(i),
                    text: sanitize(&option.text),
                    value: option.text.clone(),
                })
                .collect(),
            images: item.images.clone().unwrap_or_default(),
            answer_key: sanitize(&answer_key_text(item.correct_answer.as_deref())),
        }
    }

    /// Find the option labelled `letter` (case-insensitive).
    pub fn option_by_letter(&self, letter: &str) -> Option<&OptionView> {
        let letter = letter.trim();
        self.options
            .iter()
            .find(|option| option.letter.eq_ignore_ascii_case(letter))
    }
}
