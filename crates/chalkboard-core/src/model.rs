//! Core data model types for chalkboard.
//!
//! These are the fundamental types the rest of the system uses to represent
//! imported question banks, the library they are stored in, and the answers
//! a learner submits.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One answer option of a choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Label as written in the source bank (e.g. "A").
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    /// Option text. Selected answers are recorded as this text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

// Exporters write `null` for fields they have no value for.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|answers| match answers {
            OneOrMany::One(answer) => vec![answer],
            OneOrMany::Many(answers) => answers,
        }),
    )
}

/// A single question of an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    /// Identifier, unique within one exam.
    pub id: i64,
    /// Raw type tag from the source bank. See [`QuestionItem::kind`].
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub type_tag: String,
    /// Question text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Answer options; empty for free-text questions.
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<QuestionOption>,
    /// Answer key. Its length is the number of answers expected. A bare
    /// string in the source is read as a one-element key.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub correct_answer: Option<Vec<String>>,
    /// Image references attached to the question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Fields this model does not interpret, kept for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuestionItem {
    /// Classify the raw type tag.
    pub fn kind(&self) -> QuestionKind {
        QuestionKind::from_tag(&self.type_tag)
    }

    /// How a learner answers this question.
    ///
    /// Any item that carries options is answered by choosing, whatever its tag.
    pub fn input_mode(&self) -> InputMode {
        match self.kind() {
            QuestionKind::SingleChoice | QuestionKind::MultiChoice | QuestionKind::TrueFalse => {
                InputMode::Choice
            }
            _ if !self.options.is_empty() => InputMode::Choice,
            QuestionKind::FillBlank => InputMode::FreeText,
            _ => InputMode::Essay,
        }
    }

    /// Returns `true` if more than one option may be selected.
    pub fn is_multi_select(&self) -> bool {
        self.kind() == QuestionKind::MultiChoice
    }
}

/// Question kinds understood by the evaluator and the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    SingleChoice,
    MultiChoice,
    TrueFalse,
    FillBlank,
    Subjective,
    Unknown,
}

impl QuestionKind {
    /// Classify a type tag. Both the Chinese tags used by common exam
    /// exporters and English names are accepted.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "单选" | "单选题" | "single" | "single-choice" => QuestionKind::SingleChoice,
            "多选" | "多选题" | "multiple" | "multi-choice" => QuestionKind::MultiChoice,
            "判断" | "判断题" | "true-false" | "judge" => QuestionKind::TrueFalse,
            "填空" | "填空题" | "fill-blank" | "fill" => QuestionKind::FillBlank,
            "简答" | "简答题" | "主观" | "subjective" | "essay" => QuestionKind::Subjective,
            _ => QuestionKind::Unknown,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::SingleChoice => write!(f, "single-choice"),
            QuestionKind::MultiChoice => write!(f, "multi-choice"),
            QuestionKind::TrueFalse => write!(f, "true-false"),
            QuestionKind::FillBlank => write!(f, "fill-blank"),
            QuestionKind::Subjective => write!(f, "subjective"),
            QuestionKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// The kind of input widget a question needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Pick from the listed options.
    Choice,
    /// A single line of text.
    FreeText,
    /// Multi-line explanation.
    Essay,
}

/// An imported question set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamData {
    /// Questions, in exam order.
    #[serde(default)]
    pub items: Vec<QuestionItem>,
    /// Every other top-level field of the source document (`source`, `ts`,
    /// exporter metadata), kept exactly as written.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExamData {
    /// Exam data with no document fields besides the questions.
    pub fn new(items: Vec<QuestionItem>) -> Self {
        Self {
            items,
            extra: Map::new(),
        }
    }

    /// The exporter named in the `source` field, or `""` if it is absent or
    /// not a string.
    pub fn source(&self) -> &str {
        self.extra
            .get("source")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Look up a question by id.
    pub fn item(&self, id: i64) -> Option<&QuestionItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// A single exam stored in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamEntry {
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub date_added: i64,
    pub data: ExamData,
}

/// A group of exam parts produced by splitting an oversized import.
///
/// A folder always holds at least one child; the library prunes a folder
/// as soon as its last child is removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub date_added: i64,
    pub children: Vec<ExamEntry>,
}

/// A root entry of the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LibraryEntry {
    Exam(ExamEntry),
    Folder(FolderEntry),
}

impl LibraryEntry {
    pub fn id(&self) -> &str {
        match self {
            LibraryEntry::Exam(exam) => &exam.id,
            LibraryEntry::Folder(folder) => &folder.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            LibraryEntry::Exam(exam) => &exam.name,
            LibraryEntry::Folder(folder) => &folder.name,
        }
    }

    pub fn date_added(&self) -> i64 {
        match self {
            LibraryEntry::Exam(exam) => exam.date_added,
            LibraryEntry::Folder(folder) => folder.date_added,
        }
    }

    /// Creation time as a UTC timestamp, if the stored value is in range.
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.date_added()).single()
    }

    /// Number of questions held by this entry (summed over folder children).
    pub fn question_count(&self) -> usize {
        match self {
            LibraryEntry::Exam(exam) => exam.data.items.len(),
            LibraryEntry::Folder(folder) => folder
                .children
                .iter()
                .map(|child| child.data.items.len())
                .sum(),
        }
    }
}

/// A learner's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserAnswer {
    /// Free text, or the text of the single chosen option.
    Text(String),
    /// Texts of the chosen options of a multi-select question.
    Choices(Vec<String>),
}

impl UserAnswer {
    /// View the answer as a sequence; a single text becomes one element.
    pub fn as_slice(&self) -> &[String] {
        match self {
            UserAnswer::Text(text) => std::slice::from_ref(text),
            UserAnswer::Choices(choices) => choices,
        }
    }

    /// Returns `true` if something was actually entered or selected.
    pub fn is_present(&self) -> bool {
        match self {
            UserAnswer::Text(text) => !text.trim().is_empty(),
            UserAnswer::Choices(choices) => !choices.is_empty(),
        }
    }
}

impl From<&str> for UserAnswer {
    fn from(text: &str) -> Self {
        UserAnswer::Text(text.to_string())
    }
}

impl From<Vec<String>> for UserAnswer {
    fn from(choices: Vec<String>) -> Self {
        UserAnswer::Choices(choices)
    }
}
