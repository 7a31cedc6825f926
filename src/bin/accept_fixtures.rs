//! Binary to generate/update .expected.json fixture files
//!
//! Usage:
//!   cargo run --bin accept_fixtures            # Update all
//!   cargo run --bin accept_fixtures -- block   # Update only fixtures matching "block"

use quill_lexer::default_tags;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let fixture_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&fixture_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|s| s == "quill").unwrap_or(false))
    {
        let path = entry.path();
        let path_str = path.to_string_lossy();

        // Apply filter if provided
        if let Some(ref f) = filter {
            if !path_str.contains(f) {
                skipped += 1;
                continue;
            }
        }

        process_file(path);
        updated += 1;
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

fn process_file(path: &Path) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", path, e);
            return;
        }
    };

    let tags = default_tags();
    let nodes = match quill_lexer::tokenize(&source, &tags) {
        Ok(nodes) => nodes,
        Err(e) => {
            eprintln!("ERROR: {:?} failed to lex: {}", path, e);
            return;
        }
    };

    let mut json = serde_json::to_string_pretty(&nodes).unwrap();
    json.push('\n');

    let expected = path.with_extension("expected.json");
    if let Err(e) = fs::write(&expected, json) {
        eprintln!("Failed to write {:?}: {}", expected, e);
    } else {
        println!("  wrote {}", expected.display());
    }
}
