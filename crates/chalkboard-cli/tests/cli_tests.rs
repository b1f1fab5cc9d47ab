//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A scratch directory used as working directory, home and data directory,
/// so no user configuration leaks into the tests.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn data_dir(&self) -> PathBuf {
        self.path().join("data")
    }

    fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("chalkboard").unwrap();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env_remove("CHALKBOARD_DATA_DIR")
            .env_remove("CHALKBOARD_CHUNK_SIZE")
            .arg("--data-dir")
            .arg(self.data_dir());
        cmd
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// The stored library, read straight from the slot file.
    fn stored(&self) -> serde_json::Value {
        let raw =
            std::fs::read_to_string(self.data_dir().join("chalk_exam_library_v2.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

fn bank(count: usize) -> String {
    let items: Vec<String> = (1..=count)
        .map(|i| {
            format!(
                r#"{{"id":{i},"type":"单选","title":"Question {i}","options":[{{"label":"A","text":"right"}},{{"label":"B","text":"wrong"}}],"correctAnswer":["right"]}}"#
            )
        })
        .collect();
    format!(r#"{{"source":"cli","ts":1,"items":[{}]}}"#, items.join(","))
}

#[test]
fn help_lists_commands() {
    Sandbox::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("quiz"))
        .stdout(predicate::str::contains("grade"));
}

#[test]
fn version_flag() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("chalkboard"));
}

#[test]
fn init_creates_files() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created chalkboard.toml"))
        .stdout(predicate::str::contains("Created sample-bank.json"));

    assert!(sandbox.path().join("chalkboard.toml").exists());
    assert!(sandbox.path().join("sample-bank.json").exists());

    sandbox
        .cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn sample_bank_validates_and_imports() {
    let sandbox = Sandbox::new();
    sandbox.cmd().arg("init").assert().success();

    sandbox
        .cmd()
        .args(["validate", "sample-bank.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 questions"))
        .stdout(predicate::str::contains("Source: chalkboard sample"))
        .stdout(predicate::str::contains("Bank is valid."));

    sandbox
        .cmd()
        .args(["import", "sample-bank.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported \"sample-bank\" (5 questions)"));
}

#[test]
fn import_small_bank_as_exam() {
    let sandbox = Sandbox::new();
    let file = sandbox.write("biology.json", &format!("exported by tool\n{}\n-- end", bank(3)));

    sandbox
        .cmd()
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported \"biology\" (3 questions)"));

    let stored = sandbox.stored();
    assert_eq!(stored[0]["type"], "exam");
    assert_eq!(stored[0]["name"], "biology");
    assert_eq!(stored[0]["data"]["items"].as_array().unwrap().len(), 3);
}

#[test]
fn import_large_bank_as_folder() {
    let sandbox = Sandbox::new();
    let file = sandbox.write("history.json", &bank(120));

    sandbox
        .cmd()
        .arg("import")
        .arg(&file)
        .args(["--name", "History"])
        .assert()
        .success()
        .stdout(predicate::str::contains("with 3 parts"))
        .stdout(predicate::str::contains("History - Part 3/3 (20 questions)"));

    let stored = sandbox.stored();
    assert_eq!(stored[0]["type"], "folder");
    assert_eq!(stored[0]["children"].as_array().unwrap().len(), 3);
}

#[test]
fn import_invalid_file_fails() {
    let sandbox = Sandbox::new();
    let file = sandbox.write("broken.json", "{ not json at all");

    sandbox
        .cmd()
        .arg("import")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("valid JSON question bank"));
}

#[test]
fn import_missing_file_fails() {
    Sandbox::new()
        .cmd()
        .args(["import", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn list_empty_and_populated() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Library is empty"));

    let file = sandbox.write("chem.json", &bank(60));
    sandbox.cmd().arg("import").arg(&file).assert().success();

    sandbox
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("chem (2 parts)"))
        .stdout(predicate::str::contains("chem - Part 1/2"))
        .stdout(predicate::str::contains("60"));
}

#[test]
fn delete_entry_and_part() {
    let sandbox = Sandbox::new();
    let file = sandbox.write("bank.json", &bank(70));
    sandbox.cmd().arg("import").arg(&file).assert().success();

    let stored = sandbox.stored();
    let folder_id = stored[0]["id"].as_str().unwrap().to_string();
    let first = stored[0]["children"][0]["id"].as_str().unwrap().to_string();
    let second = stored[0]["children"][1]["id"].as_str().unwrap().to_string();

    sandbox
        .cmd()
        .args(["delete", &first, "--folder", &folder_id, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted part {first}")));
    assert_eq!(sandbox.stored()[0]["children"].as_array().unwrap().len(), 1);

    sandbox
        .cmd()
        .args(["delete", &second, "--folder", &folder_id, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("was removed"));
    assert_eq!(sandbox.stored(), serde_json::json!([]));
}

#[test]
fn delete_requires_confirmation() {
    let sandbox = Sandbox::new();
    let file = sandbox.write("bank.json", &bank(2));
    sandbox.cmd().arg("import").arg(&file).assert().success();
    let id = sandbox.stored()[0]["id"].as_str().unwrap().to_string();

    sandbox
        .cmd()
        .args(["delete", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted."));
    assert_eq!(sandbox.stored().as_array().unwrap().len(), 1);

    sandbox
        .cmd()
        .args(["delete", &id])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted {id}")));
    assert_eq!(sandbox.stored(), serde_json::json!([]));
}

#[test]
fn delete_unknown_id_fails() {
    Sandbox::new()
        .cmd()
        .args(["delete", "no-such-id", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no library entry"));
}

#[test]
fn clear_empties_library() {
    let sandbox = Sandbox::new();
    let file = sandbox.write("bank.json", &bank(2));
    sandbox.cmd().arg("import").arg(&file).assert().success();
    sandbox.cmd().arg("import").arg(&file).assert().success();

    sandbox
        .cmd()
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 entries removed"));
    assert_eq!(sandbox.stored(), serde_json::json!([]));
}

#[test]
fn validate_reports_warnings() {
    let sandbox = Sandbox::new();
    let file = sandbox.write(
        "warn.json",
        r#"{"source":"v","ts":0,"items":[
            {"id":1,"type":"单选","title":"a","options":[{"label":"A","text":"x"}],"correctAnswer":["y"]},
            {"id":1,"type":"简答","title":"b","options":[]}
        ]}"#,
    );

    sandbox
        .cmd()
        .arg("validate")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate question ID: 1"))
        .stdout(predicate::str::contains("no correct answer provided"))
        .stdout(predicate::str::contains("not one of the options"));
}

#[test]
fn grade_answers_file() {
    let sandbox = Sandbox::new();
    let file = sandbox.write("bank.json", &bank(3));
    sandbox.cmd().arg("import").arg(&file).assert().success();
    let id = sandbox.stored()[0]["id"].as_str().unwrap().to_string();
    let answers = sandbox.write("answers.json", r#"{"1":"right","2":"wrong"}"#);

    sandbox
        .cmd()
        .args(["grade", &id, "--answers"])
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 1/3 correct, 2 answered"));

    let output = sandbox
        .cmd()
        .args(["grade", &id, "--format", "json", "--answers"])
        .arg(&answers)
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["correct"], 1);
    assert_eq!(report["questions"][1]["status"], "incorrect");
    assert_eq!(report["questions"][2]["status"], "unanswered");
}

#[test]
fn quiz_reads_answers_from_stdin() {
    let sandbox = Sandbox::new();
    let file = sandbox.write("bank.json", &bank(2));
    sandbox.cmd().arg("import").arg(&file).assert().success();
    let id = sandbox.stored()[0]["id"].as_str().unwrap().to_string();

    sandbox
        .cmd()
        .args(["quiz", &id])
        .write_stdin("A\nb\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1/2"))
        .stdout(predicate::str::contains("✓ Good!"))
        .stdout(predicate::str::contains("✗ Try again"))
        .stdout(predicate::str::contains("Finished: 1 of 2 correct"));
}

#[test]
fn quiz_unknown_exam_fails() {
    Sandbox::new()
        .cmd()
        .args(["quiz", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no exam with id missing"));
}
