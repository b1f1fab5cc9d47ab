//! chalkboard-core — Question bank model, import, and answer evaluation.
//!
//! This crate defines the data model for imported exam banks and the pure
//! logic the rest of chalkboard builds on: splitting oversized banks into
//! parts, normalizing and checking answers, and sanitizing imported markup.

pub mod answer;
pub mod error;
pub mod import;
pub mod markup;
pub mod model;
pub mod session;
pub mod view;

pub use answer::{is_correct, normalize_answer};
pub use error::{ErrorKind, ImportError};
pub use import::{import_bank, PartitionPolicy};
pub use markup::sanitize;
pub use model::{ExamData, ExamEntry, FolderEntry, LibraryEntry, QuestionItem, UserAnswer};
pub use session::{ExamSession, SessionSummary};
