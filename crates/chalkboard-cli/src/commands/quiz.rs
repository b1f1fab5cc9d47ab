//! The `chalkboard quiz` command: an interactive pass through one exam.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};

use chalkboard_core::markup::strip_tags;
use chalkboard_core::model::InputMode;
use chalkboard_core::view::QuestionView;
use chalkboard_core::{ExamData, ExamSession, SessionSummary, UserAnswer};

use super::{confirm, open_library, GlobalOpts};

pub fn execute(opts: &GlobalOpts, id: String) -> Result<()> {
    let library = open_library(opts)?;
    let Some(exam) = library.find_exam(&id) else {
        bail!("no exam with id {id}");
    };

    println!("{} ({} questions)", exam.name, exam.data.items.len());
    println!("Answer with option letters or text. Empty line skips, q quits.\n");

    let stdin = std::io::stdin();
    let summary = run_quiz(exam.data.clone(), &mut stdin.lock(), &mut std::io::stdout())?;
    if summary.is_none() {
        println!("Quiz abandoned. Answers were discarded.");
    }
    Ok(())
}

/// What the learner typed at a question prompt.
enum Reply {
    Quit,
    Skip,
    Answer(String),
}

fn read_reply(input: &mut impl BufRead) -> Result<Reply> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Reply::Quit);
    }
    let line = line.trim_end_matches(['\r', '\n']);
    Ok(match line.trim() {
        "q" | "Q" => Reply::Quit,
        "" => Reply::Skip,
        _ => Reply::Answer(line.to_string()),
    })
}

/// Run the quiz loop over `exam`, reading replies from `input`.
///
/// Returns `None` if the learner quit before the last question.
pub fn run_quiz(
    exam: ExamData,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<SessionSummary>> {
    let views: Vec<QuestionView> = exam
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| QuestionView::from_item(item, i))
        .collect();
    let total = views.len();
    let mut session = ExamSession::start(exam);

    for view in &views {
        print_question(view, total, out)?;

        loop {
            write!(out, "> ")?;
            out.flush()?;

            match read_reply(input)? {
                Reply::Quit => {
                    if !session.needs_exit_confirmation()
                        || confirm("Exit? Your progress will be lost.", input, out)?
                    {
                        return Ok(None);
                    }
                }
                Reply::Skip => break,
                Reply::Answer(text) => {
                    if !record_answer(&mut session, view, &text, out)? {
                        continue;
                    }
                    match session.evaluate(view.id) {
                        Some(true) => writeln!(out, "✓ Good!")?,
                        Some(false) => writeln!(out, "✗ Try again")?,
                        None => {}
                    }
                    writeln!(out, "Correct Answer: {}", strip_tags(&view.answer_key))?;
                    writeln!(out, "Progress: {}%\n", session.progress_percent())?;
                    break;
                }
            }
        }
    }

    let summary = session.finish();
    writeln!(
        out,
        "Finished: {} of {} correct ({} answered, {:.0}%)",
        summary.correct,
        summary.total,
        summary.answered,
        summary.score() * 100.0
    )?;
    Ok(Some(summary))
}

fn print_question(view: &QuestionView, total: usize, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "Question {}/{} [{}]",
        view.number, total, view.type_label
    )?;
    writeln!(out, "{}", strip_tags(&view.title))?;
    for option in &view.options {
        writeln!(out, "  {}. {}", option.letter, strip_tags(&option.text))?;
    }
    for image in &view.images {
        writeln!(out, "  [image] {image}")?;
    }
    if view.multi_select {
        writeln!(out, "(select all that apply, e.g. \"A C\")")?;
    }
    Ok(())
}

/// Translate a reply into an answer. Returns `false` if the reply named an
/// option that does not exist.
fn record_answer(
    session: &mut ExamSession,
    view: &QuestionView,
    text: &str,
    out: &mut impl Write,
) -> Result<bool> {
    if view.input != InputMode::Choice || view.options.is_empty() {
        session.set_answer(view.id, UserAnswer::Text(text.to_string()));
        return Ok(true);
    }

    let letters: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    let mut chosen = Vec::with_capacity(letters.len());
    for letter in &letters {
        match view.option_by_letter(letter) {
            // Naming an option twice still selects it once.
            Some(option) if chosen.contains(&option.value) => {}
            Some(option) => chosen.push(option.value.clone()),
            None => {
                writeln!(out, "No option {letter}.")?;
                return Ok(false);
            }
        }
    }

    if view.multi_select {
        for value in &chosen {
            session.toggle_choice(view.id, value);
        }
    } else {
        let [value] = chosen.as_slice() else {
            writeln!(out, "Pick exactly one option.")?;
            return Ok(false);
        };
        session.set_answer(view.id, UserAnswer::Text(value.clone()));
    }
    Ok(true)
}
