use crate::ast::TagProps;
use crate::error::{ErrorKind, LexError};
use crate::tags::TagDefinition;

use super::buffer::{CharBucket, WhitespacePolicy};

enum State {
    /// Collecting the tag name, waiting for the opening paren.
    NotStarted { name: CharBucket },
    /// Inside the argument list, tracking nested parens.
    Seeking {
        name: String,
        arg: CharBucket,
        depth: u32,
    },
    Ended,
}

/// Incremental parser for a single tag statement such as `@if(user && admin)`.
///
/// Lines are fed one at a time (without their terminators) until the
/// balanced closing paren is found, so a statement may span any number
/// of lines. Non-seekable tags complete on the first fed line.
pub struct TagStatement {
    def: TagDefinition,
    line: usize,
    lines_fed: usize,
    raw: String,
    state: State,
}

impl TagStatement {
    pub fn new(line: usize, def: TagDefinition) -> Self {
        Self {
            def,
            line,
            lines_fed: 0,
            raw: String::new(),
            state: State::NotStarted {
                name: CharBucket::new(WhitespacePolicy::None),
            },
        }
    }

    /// Feed one line of input. Returns the completed properties once the
    /// closing paren has been consumed, `None` while still seeking.
    pub fn feed(&mut self, text: &str) -> Result<Option<TagProps>, LexError> {
        if self.ended() {
            return Err(LexError::new(
                ErrorKind::UnexpectedToken,
                format!("Unexpected content '{}' after statement ended", text.trim()),
                self.line + self.lines_fed,
            )
            .with_help("Start a new line after a completed tag"));
        }

        self.lines_fed += 1;
        if self.lines_fed > 1 {
            self.raw.push('\n');
        }
        self.raw.push_str(text);

        if !self.def.seekable {
            self.state = State::Ended;
            return Ok(Some(TagProps {
                name: text.trim().to_string(),
                js_arg: String::new(),
                raw: std::mem::take(&mut self.raw),
            }));
        }

        let mut completed = None;
        for ch in text.chars() {
            match &mut self.state {
                State::NotStarted { name } => match ch {
                    '(' => {
                        let name = name.take();
                        self.state = State::Seeking {
                            name,
                            arg: CharBucket::new(WhitespacePolicy::Controlled),
                            depth: 0,
                        };
                    }
                    ')' => {
                        return Err(LexError::new(
                            ErrorKind::StatementNotOpened,
                            "Found ')' before a '(' opened the statement",
                            self.current_line(),
                        )
                        .with_help("Open the argument list with '(' before closing it"));
                    }
                    _ => name.feed(ch),
                },
                State::Seeking { name, arg, depth } => {
                    if ch == ')' && *depth == 0 {
                        completed = Some(TagProps {
                            name: std::mem::take(name),
                            js_arg: arg.take(),
                            raw: std::mem::take(&mut self.raw),
                        });
                        self.state = State::Ended;
                    } else {
                        match ch {
                            '(' => *depth += 1,
                            ')' => *depth -= 1,
                            _ => {}
                        }
                        arg.feed(ch);
                    }
                }
                State::Ended => {
                    // Whitespace may trail the closing paren, nothing else
                    if !ch.is_whitespace() {
                        return Err(LexError::new(
                            ErrorKind::TrailingContent,
                            format!("Unexpected token '{ch}' after ')'"),
                            self.current_line(),
                        )
                        .with_help("Write trailing content on its own line"));
                    }
                }
            }
        }

        Ok(completed)
    }

    /// Line on which the statement opened (1-indexed).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Every character fed so far, lines joined with `\n`.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn seeking(&self) -> bool {
        matches!(self.state, State::Seeking { .. })
    }

    pub fn ended(&self) -> bool {
        matches!(self.state, State::Ended)
    }

    pub fn definition(&self) -> TagDefinition {
        self.def
    }

    fn current_line(&self) -> usize {
        self.line + self.lines_fed - 1
    }
}
