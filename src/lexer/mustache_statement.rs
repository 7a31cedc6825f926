use crate::ast::MustacheProps;
use crate::error::{ErrorKind, LexError};

use super::buffer::{CharBucket, WhitespacePolicy};

#[derive(Clone, Copy)]
enum MustacheKind {
    /// `{{ expression }}`
    Mustache,
    /// `{{{ expression }}}`, rendered without escaping
    Emustache,
}

impl MustacheKind {
    fn as_str(&self) -> &'static str {
        match self {
            MustacheKind::Mustache => "mustache",
            MustacheKind::Emustache => "emustache",
        }
    }

    fn braces(&self) -> usize {
        match self {
            MustacheKind::Mustache => 2,
            MustacheKind::Emustache => 3,
        }
    }
}

enum State {
    /// Collecting surrounding text, waiting for the opening braces.
    NotStarted { text_left: CharBucket },
    /// Inside the expression, tracking nested braces.
    Seeking {
        kind: MustacheKind,
        text_left: String,
        js_arg: CharBucket,
        depth: u32,
    },
    Ended,
}

/// Incremental parser for a mustache interpolation such as `Hello {{ user }}!`.
///
/// The opening braces pick the flavor: two for a mustache, three for an
/// emustache. Text before the braces and text after the balanced close are
/// captured alongside the expression so the caller can re-process them.
pub struct MustacheStatement {
    line: usize,
    lines_fed: usize,
    raw: String,
    state: State,
}

impl MustacheStatement {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            lines_fed: 0,
            raw: String::new(),
            state: State::NotStarted {
                text_left: CharBucket::new(WhitespacePolicy::All),
            },
        }
    }

    /// Feed one line of input. Returns the completed properties once the
    /// balanced closing braces have been consumed, `None` while still seeking.
    pub fn feed(&mut self, text: &str) -> Result<Option<MustacheProps>, LexError> {
        if self.ended() {
            return Err(LexError::new(
                ErrorKind::UnexpectedToken,
                format!("Unexpected content '{}' after statement ended", text.trim()),
                self.line + self.lines_fed,
            )
            .with_help("Start a new line after a completed statement"));
        }

        self.lines_fed += 1;
        if self.lines_fed > 1 {
            self.raw.push('\n');
        }
        self.raw.push_str(text);

        let chars: Vec<char> = text.chars().collect();
        let mut completed = None;
        let mut text_right = CharBucket::new(WhitespacePolicy::All);
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            match &mut self.state {
                State::NotStarted { text_left } => {
                    if ch == '{' && chars.get(i + 1).copied() == Some('{') {
                        let kind = if chars.get(i + 2).copied() == Some('{') {
                            MustacheKind::Emustache
                        } else {
                            MustacheKind::Mustache
                        };
                        let text_left = text_left.take();
                        i += kind.braces();
                        self.state = State::Seeking {
                            kind,
                            text_left,
                            js_arg: CharBucket::new(WhitespacePolicy::Controlled),
                            depth: 0,
                        };
                        continue;
                    }
                    text_left.feed(ch);
                    i += 1;
                }
                State::Seeking {
                    kind,
                    text_left,
                    js_arg,
                    depth,
                } => {
                    if ch == '}' && *depth == 0 {
                        let run = chars[i..].iter().take_while(|&&c| c == '}').count();
                        if run >= kind.braces() {
                            completed = Some(MustacheProps {
                                name: kind.as_str().to_string(),
                                js_arg: js_arg.take(),
                                raw: std::mem::take(&mut self.raw),
                                text_left: std::mem::take(text_left),
                                text_right: String::new(),
                            });
                            i += kind.braces();
                            self.state = State::Ended;
                            continue;
                        }
                        // Lone closing brace, part of the expression
                        js_arg.feed(ch);
                        i += 1;
                        continue;
                    }
                    match ch {
                        '{' => *depth += 1,
                        '}' => *depth -= 1,
                        _ => {}
                    }
                    js_arg.feed(ch);
                    i += 1;
                }
                State::Ended => {
                    text_right.feed(ch);
                    i += 1;
                }
            }
        }

        if let Some(mut props) = completed {
            props.text_right = text_right.take();
            return Ok(Some(props));
        }
        Ok(None)
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
}
