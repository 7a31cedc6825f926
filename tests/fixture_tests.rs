//! Fixture-driven lexer tests: every tests/fixtures/*.quill file is lexed
//! and compared against its .expected.json neighbor.
//!
//! Regenerate the expected files with `cargo run --bin accept_fixtures`.

use std::fs;
use std::path::Path;

use libtest_mimic::{Arguments, Failed, Trial};
use quill_lexer::default_tags;

fn main() {
    let args = Arguments::from_args();

    let pattern = format!("{}/tests/fixtures/*.quill", env!("CARGO_MANIFEST_DIR"));
    let mut trials = Vec::new();
    for entry in glob::glob(&pattern).expect("invalid fixture glob") {
        let path = entry.expect("unreadable fixture path");
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("fixture")
            .to_string();
        trials.push(Trial::test(name, move || run_fixture(&path)));
    }

    libtest_mimic::run(&args, trials).exit();
}

fn run_fixture(path: &Path) -> Result<(), Failed> {
    let source =
        fs::read_to_string(path).map_err(|e| format!("failed to read {:?}: {}", path, e))?;

    let expected_path = path.with_extension("expected.json");
    if !expected_path.exists() {
        return Err(format!(
            "missing {:?} - run `cargo run --bin accept_fixtures` to create it",
            expected_path
        )
        .into());
    }
    let expected_text = fs::read_to_string(&expected_path)
        .map_err(|e| format!("failed to read {:?}: {}", expected_path, e))?;
    let expected: serde_json::Value = serde_json::from_str(&expected_text)
        .map_err(|e| format!("bad json in {:?}: {}", expected_path, e))?;

    let tags = default_tags();
    let nodes = quill_lexer::tokenize(&source, &tags)
        .map_err(|e| format!("lexing failed on line {}: {}", e.line, e))?;
    let actual = serde_json::to_value(&nodes).map_err(|e| e.to_string())?;

    if actual != expected {
        return Err(format!(
            "node tree mismatch\n--- expected ---\n{}\n--- actual ---\n{}",
            serde_json::to_string_pretty(&expected).unwrap(),
            serde_json::to_string_pretty(&actual).unwrap(),
        )
        .into());
    }

    Ok(())
}
