//! The `chalkboard init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create chalkboard.toml
    if std::path::Path::new("chalkboard.toml").exists() {
        println!("chalkboard.toml already exists, skipping.");
    } else {
        std::fs::write("chalkboard.toml", SAMPLE_CONFIG)?;
        println!("Created chalkboard.toml");
    }

    // Create sample bank
    let sample_path = std::path::Path::new("sample-bank.json");
    if sample_path.exists() {
        println!("sample-bank.json already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_BANK)?;
        println!("Created sample-bank.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: chalkboard validate sample-bank.json");
    println!("  2. Run: chalkboard import sample-bank.json");
    println!("  3. Run: chalkboard list, then chalkboard quiz <ID>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# chalkboard configuration

# Where the library is stored. ${VAR} references are expanded.
data_dir = "./.chalkboard"

# Name of the storage slot holding the library.
storage_key = "chalk_exam_library_v2"

# Banks with more questions than this are split into parts.
chunk_size = 50

# Maximum size of the stored library in bytes (0 = unlimited).
storage_quota_bytes = 5242880
"#;

const SAMPLE_BANK: &str = r#"{
  "source": "chalkboard sample",
  "ts": 1700000000000,
  "items": [
    {
      "id": 1,
      "type": "单选",
      "title": "Which planet is known as the Red Planet?",
      "options": [
        { "label": "A", "text": "Venus" },
        { "label": "B", "text": "Mars" },
        { "label": "C", "text": "Jupiter" }
      ],
      "correctAnswer": ["Mars"]
    },
    {
      "id": 2,
      "type": "多选",
      "title": "Which of these are prime numbers?",
      "options": [
        { "label": "A", "text": "2" },
        { "label": "B", "text": "4" },
        { "label": "C", "text": "7" },
        { "label": "D", "text": "9" }
      ],
      "correctAnswer": ["2", "7"]
    },
    {
      "id": 3,
      "type": "判断",
      "title": "Water boils at 100 °C at sea level.",
      "options": [
        { "label": "A", "text": "True" },
        { "label": "B", "text": "False" }
      ],
      "correctAnswer": ["True"]
    },
    {
      "id": 4,
      "type": "填空",
      "title": "The capital of France is ____.",
      "options": [],
      "correctAnswer": ["Paris"]
    },
    {
      "id": 5,
      "type": "简答",
      "title": "Explain in one word what plants need from the sun.",
      "options": [],
      "correctAnswer": ["Light"]
    }
  ]
}
"#;
