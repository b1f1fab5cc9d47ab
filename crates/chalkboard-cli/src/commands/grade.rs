//! The `chalkboard grade` command: score a file of answers against an exam.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use comfy_table::Table;
use serde::Serialize;

use chalkboard_core::markup::strip_tags;
use chalkboard_core::view::answer_key_text;
use chalkboard_core::{ExamData, ExamSession, SessionSummary, UserAnswer};

use super::{open_library, GlobalOpts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Correct,
    Incorrect,
    Unanswered,
}

#[derive(Debug, Serialize)]
struct GradedQuestion {
    id: i64,
    status: Status,
    answer: Option<UserAnswer>,
    correct_answer: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct GradeReport {
    exam: String,
    summary: SessionSummary,
    score: f64,
    questions: Vec<GradedQuestion>,
}

pub fn execute(opts: &GlobalOpts, id: String, answers: PathBuf, format: String) -> Result<()> {
    let library = open_library(opts)?;
    let Some(exam) = library.find_exam(&id) else {
        bail!("no exam with id {id}");
    };

    let content = std::fs::read_to_string(&answers)
        .with_context(|| format!("failed to read answers: {}", answers.display()))?;
    let answers = parse_answers(&content)
        .with_context(|| format!("failed to parse answers: {}", answers.display()))?;

    let report = grade(&exam.name, exam.data.clone(), answers);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print_text(&report),
        other => bail!("unknown format: {other} (expected text or json)"),
    }
    Ok(())
}

/// Parse a JSON object mapping question ids to answers.
fn parse_answers(content: &str) -> Result<BTreeMap<i64, UserAnswer>> {
    let raw: BTreeMap<String, UserAnswer> = serde_json::from_str(content)?;
    raw.into_iter()
        .map(|(key, answer)| {
            let id = key
                .trim()
                .parse::<i64>()
                .with_context(|| format!("question id {key:?} is not a number"))?;
            Ok((id, answer))
        })
        .collect()
}

fn grade(name: &str, exam: ExamData, answers: BTreeMap<i64, UserAnswer>) -> GradeReport {
    let mut session = ExamSession::start(exam);
    for (id, answer) in answers {
        if session.exam().item(id).is_none() {
            tracing::warn!(id, "answer for a question not in this exam ignored");
            continue;
        }
        session.set_answer(id, answer);
    }

    let questions = session
        .exam()
        .items
        .iter()
        .map(|item| {
            let status = match session.evaluate(item.id) {
                Some(true) => Status::Correct,
                Some(false) => Status::Incorrect,
                None => Status::Unanswered,
            };
            GradedQuestion {
                id: item.id,
                status,
                answer: session.answer(item.id).cloned(),
                correct_answer: item.correct_answer.clone(),
            }
        })
        .collect();

    let summary = session.finish();
    GradeReport {
        exam: name.to_string(),
        score: summary.score(),
        summary,
        questions,
    }
}

fn print_text(report: &GradeReport) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Result", "Your Answer", "Correct Answer"]);
    for q in &report.questions {
        let result = match q.status {
            Status::Correct => "✓ correct",
            Status::Incorrect => "✗ incorrect",
            Status::Unanswered => "- unanswered",
        };
        let given = q
            .answer
            .as_ref()
            .map(|a| a.as_slice().join(" / "))
            .unwrap_or_default();
        table.add_row(vec![
            q.id.to_string(),
            result.to_string(),
            given,
            strip_tags(&answer_key_text(q.correct_answer.as_deref())),
        ]);
    }

    println!("{}\n", report.exam);
    println!("{table}");
    println!(
        "\nScore: {}/{} correct, {} answered ({:.0}%)",
        report.summary.correct,
        report.summary.total,
        report.summary.answered,
        report.score * 100.0
    );
}
