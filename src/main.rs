use clap::{Parser, Subcommand};
use quill_lexer::{default_tags, Node, TagDefinitions};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill - line-fed lexer for .quill templates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize .quill files into node-tree JSON
    Tokenize {
        /// Path to .quill file or directory
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,

        /// Read from stdin
        #[arg(long)]
        stdin: bool,

        /// Output the node tree as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tokenize { file, stdin, json } => {
            if stdin {
                tokenize_stdin(json);
            } else if let Some(path) = file {
                tokenize_path(&path);
            } else {
                eprintln!("Error: provide a file/directory or use --stdin");
                std::process::exit(1);
            }
        }
    }
}

fn tokenize_stdin(json_output: bool) {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .expect("Failed to read stdin");

    let tags = default_tags();
    let nodes = match quill_lexer::tokenize(&source, &tags) {
        Ok(nodes) => nodes,
        Err(err) => {
            report_error(&err, &source, "stdin");
            std::process::exit(1);
        }
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&nodes).unwrap());
    } else {
        print_nodes(&nodes, 0);
    }
}

fn tokenize_path(path: &PathBuf) {
    let tags = default_tags();

    if path.is_file() {
        if path.extension().map_or(true, |ext| ext != "quill") {
            eprintln!("Error: {} is not a .quill file", path.display());
            std::process::exit(1);
        }
        let start = Instant::now();
        if !tokenize_file(path, &tags) {
            std::process::exit(1);
        }
        let elapsed = start.elapsed();
        print_summary(1, elapsed);
    } else if path.is_dir() {
        tokenize_directory(path, &tags);
    } else {
        eprintln!("Error: {} does not exist", path.display());
        std::process::exit(1);
    }
}

fn tokenize_directory(dir: &PathBuf, tags: &TagDefinitions) {
    let start = Instant::now();
    let mut ok_count = 0;
    let mut failed_count = 0;

    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "quill"))
    {
        if tokenize_file(entry.path(), tags) {
            ok_count += 1;
        } else {
            failed_count += 1;
        }
    }

    if ok_count == 0 && failed_count == 0 {
        eprintln!("No .quill files found in {}", dir.display());
        std::process::exit(1);
    }

    let elapsed = start.elapsed();
    print_summary(ok_count, elapsed);

    if failed_count > 0 {
        std::process::exit(1);
    }
}

/// Lex one file and write the node tree next to it as `.json`.
/// Returns false when the file failed to lex.
fn tokenize_file(path: &Path, tags: &TagDefinitions) -> bool {
    let source = fs::read_to_string(path).expect("Failed to read file");

    match quill_lexer::tokenize(&source, tags) {
        Ok(nodes) => {
            let mut json = serde_json::to_string_pretty(&nodes).unwrap();
            json.push('\n');

            let output = path.with_extension("json");
            fs::write(&output, json).expect("Failed to write file");
            print_generated(&output.display().to_string());
            true
        }
        Err(err) => {
            print_failed(&path.display().to_string());
            report_error(&err, &source, &path.display().to_string());
            false
        }
    }
}

fn report_error(err: &quill_lexer::LexError, source: &str, filename: &str) {
    if io::stderr().is_terminal() {
        eprint!("{}", err.render_color(source, filename));
    } else {
        eprint!("{}", err.render(source, filename));
    }
}

/// Compact per-node listing, children indented under their block.
fn print_nodes(nodes: &[Node], depth: usize) {
    let pad = "  ".repeat(depth);
    for node in nodes {
        match node {
            Node::Raw { value, line } => println!("{}raw({}) {:?}", pad, line, value),
            Node::Newline { line } => println!("{}newline({})", pad, line),
            Node::Mustache { line, properties } => {
                println!("{}{}({}) {}", pad, properties.name, line, properties.js_arg.trim())
            }
            Node::Block {
                line,
                properties,
                children,
            } => {
                println!("{}block({}) @{}({})", pad, line, properties.name, properties.js_arg);
                print_nodes(children, depth + 1);
            }
        }
    }
}

fn print_generated(path: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[32m✓\x1b[0m {}", path);
    } else {
        eprintln!("  ✓ {}", path);
    }
}

fn print_failed(path: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[1;31m✗\x1b[0m {}", path);
    } else {
        eprintln!("  ✗ {}", path);
    }
}

fn print_summary(count: usize, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let files_word = if count == 1 { "file" } else { "files" };

    if is_tty {
        eprintln!("\n\x1b[1m✨ Tokenized {} {} in {}\x1b[0m", count, files_word, time_str);
    } else {
        eprintln!("\n✨ Tokenized {} {} in {}", count, files_word, time_str);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
