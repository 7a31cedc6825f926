use std::fmt;

/// Kind of lex error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedToken,
    TrailingContent,
    StatementNotOpened,
}

impl ErrorKind {
    /// Stable code for the kind, usable in machine-readable output
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnexpectedToken => "unexpected-token",
            ErrorKind::TrailingContent => "trailing-content",
            ErrorKind::StatementNotOpened => "statement-not-opened",
        }
    }
}

/// Error during lexing
#[derive(Debug, Clone)]
pub struct LexError {
    pub kind: ErrorKind,
    pub message: String,
    /// 1-indexed source line the error was raised on
    pub line: usize,
    pub help: Option<String>,
}

impl LexError {
    /// Create a new lex error
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            help: None,
        }
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error with source context (no color)
    pub fn render(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, true)
    }

    fn render_inner(&self, source: &str, filename: &str, color: bool) -> String {
        // Visual hierarchy: red for errors only, dim for structural chrome
        let red = if color { "\x1b[1;31m" } else { "" };
        let dim = if color { "\x1b[2m" } else { "" };
        let underline = if color { "\x1b[4m" } else { "" };
        let cyan = if color { "\x1b[1;38;5;73m" } else { "" }; // bold teal for the help label
        let reset = if color { "\x1b[0m" } else { "" };

        let mut output = String::new();

        // Blank line above and below the report keeps it readable in a stream
        // of per-file output
        output.push('\n');

        // File location at the top
        let location = format!("{}:{}", filename, self.line);
        if color {
            // OSC 8 (\x1b]8;;URL\x07TEXT\x1b]8;;\x07) makes the location clickable
            let abs_path = std::path::Path::new(filename)
                .canonicalize()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| filename.to_string());
            output.push_str(&format!(
                " {}file:{} \x1b]8;;file://{}\x07{}{}{}\x1b]8;;\x07\n",
                dim, reset, abs_path, underline, location, reset
            ));
        } else {
            output.push_str(&format!(" file: {}\n", location));
        }

        // Error header
        output.push_str(&format!("{}error:{} {}\n", red, reset, self.message));

        // Source context with the offending line underlined
        if let Some(source_line) = source.lines().nth(self.line.saturating_sub(1)) {
            let line_num_width = format!("{}", self.line).len().max(2);
            output.push_str(&format!(
                "{}{:>width$} |{}\n",
                dim,
                "",
                reset,
                width = line_num_width
            ));
            output.push_str(&format!(
                "{}{:>width$} |{} {}\n",
                dim,
                self.line,
                reset,
                source_line,
                width = line_num_width
            ));

            let indent = source_line.chars().take_while(|c| c.is_whitespace()).count();
            let spaces = " ".repeat(indent);
            let carets = "^".repeat(source_line.trim().chars().count().max(1));
            output.push_str(&format!(
                "{}{:>width$} |{} {}{}{}{}\n",
                dim,
                "",
                reset,
                spaces,
                red,
                carets,
                reset,
                width = line_num_width
            ));
        }

        // Help text: bold cyan label, aligned with error:
        if let Some(ref help) = self.help {
            output.push('\n');
            for (i, help_line) in help.lines().enumerate() {
                if i == 0 {
                    output.push_str(&format!(" {}help:{} {}\n", cyan, reset, help_line));
                } else {
                    output.push_str(&format!("       {}\n", help_line));
                }
            }
        }

        output.push('\n');

        output
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}
