use lazy_static::lazy_static;
use regex::Regex;

use crate::ast::{Node, TagProps};
use crate::error::LexError;
use crate::tags::{TagDefinition, TagDefinitions};

use super::mustache_statement::MustacheStatement;
use super::tag_statement::TagStatement;

lazy_static! {
    /// A line that opens a tag: optional escape backslash, `@`, then the name.
    /// Matched after leading whitespace is trimmed.
    static ref TAG_LINE: Regex = Regex::new(r"^(\\)?@(\w+)").unwrap();
}

struct OpenBlock {
    line: usize,
    properties: TagProps,
    children: Vec<Node>,
}

/// Line-fed tokenizer that turns template text into a tree of [`Node`]s.
///
/// Each fed line is either routed into the statement currently seeking
/// more input, or classified fresh: tag lines open a [`TagStatement`],
/// `@end...` lines close the innermost open block, lines containing `{{`
/// open a [`MustacheStatement`], and everything else becomes raw text.
/// Completed block tags collect the nodes that follow them as children
/// until their matching close line arrives.
///
/// Malformed input never fails the whole run: statements still seeking at
/// end of input are recovered as raw text by [`Tokenizer::finish`].
pub struct Tokenizer<'t> {
    tags: &'t TagDefinitions,
    tokens: Vec<Node>,
    open_blocks: Vec<OpenBlock>,
    tag_statement: Option<TagStatement>,
    mustache_statement: Option<MustacheStatement>,
    line: usize,
}

impl<'t> Tokenizer<'t> {
    pub fn new(tags: &'t TagDefinitions) -> Self {
        Self {
            tags,
            tokens: Vec::new(),
            open_blocks: Vec::new(),
            tag_statement: None,
            mustache_statement: None,
            line: 0,
        }
    }

    /// Feed the next line of the template, without its terminator.
    pub fn feed_line(&mut self, text: &str) -> Result<(), LexError> {
        self.line += 1;
        self.process_text(text)
    }

    fn process_text(&mut self, text: &str) -> Result<(), LexError> {
        if self.tag_statement.as_ref().is_some_and(|s| s.seeking()) {
            return self.feed_tag(text);
        }
        if self.mustache_statement.as_ref().is_some_and(|s| s.seeking()) {
            return self.feed_mustache(text);
        }
        self.classify(text)
    }

    fn classify(&mut self, text: &str) -> Result<(), LexError> {
        // Only the leading whitespace is dropped: the tail of a tag line
        // belongs to the statement (trailing whitespace is legal after `)`)
        let trimmed = text.trim_start();

        if let Some(caps) = TAG_LINE.captures(trimmed) {
            if caps.get(1).is_some() {
                // Escaped tag: drop the backslash, keep the line as raw text
                let leading = &text[..text.len() - text.trim_start().len()];
                self.consume_node(Node::Raw {
                    value: format!("{leading}{}", &trimmed[1..]),
                    line: self.line,
                });
                self.consume_node(Node::Newline { line: self.line });
                return Ok(());
            }
            if let Some(def) = self.tags.get(&caps[2]) {
                return self.open_tag(&trimmed[1..], *def);
            }
        }

        if self.is_closing_tag(text) {
            self.close_top_block();
            self.consume_node(Node::Newline { line: self.line });
            return Ok(());
        }

        if text.contains("{{") {
            return self.open_mustache(text);
        }

        self.consume_node(Node::Raw {
            value: text.to_string(),
            line: self.line,
        });
        self.consume_node(Node::Newline { line: self.line });
        Ok(())
    }

    fn open_tag(&mut self, text: &str, def: TagDefinition) -> Result<(), LexError> {
        self.tag_statement = Some(TagStatement::new(self.line, def));
        self.feed_tag(text)
    }

    fn feed_tag(&mut self, text: &str) -> Result<(), LexError> {
        let Some(mut statement) = self.tag_statement.take() else {
            return Ok(());
        };
        match statement.feed(text)? {
            Some(properties) => {
                if statement.definition().block {
                    self.open_blocks.push(OpenBlock {
                        line: statement.line(),
                        properties,
                        children: Vec::new(),
                    });
                } else {
                    self.consume_node(Node::Block {
                        line: statement.line(),
                        properties,
                        children: Vec::new(),
                    });
                }
                self.consume_node(Node::Newline { line: self.line });
            }
            None => self.tag_statement = Some(statement),
        }
        Ok(())
    }

    fn open_mustache(&mut self, text: &str) -> Result<(), LexError> {
        self.mustache_statement = Some(MustacheStatement::new(self.line));
        self.feed_mustache(text)
    }

    fn feed_mustache(&mut self, text: &str) -> Result<(), LexError> {
        let Some(mut statement) = self.mustache_statement.take() else {
            return Ok(());
        };
        match statement.feed(text)? {
            Some(properties) => {
                if !properties.text_left.is_empty() {
                    self.consume_node(Node::Raw {
                        value: properties.text_left.clone(),
                        line: statement.line(),
                    });
                }
                let text_right = properties.text_right.clone();
                self.consume_node(Node::Mustache {
                    line: statement.line(),
                    properties,
                });
                if text_right.is_empty() {
                    self.consume_node(Node::Newline { line: self.line });
                } else {
                    // The remainder may hold another statement, classify it
                    // against the same line number
                    self.classify(&text_right)?;
                }
            }
            None => self.mustache_statement = Some(statement),
        }
        Ok(())
    }

    fn is_closing_tag(&self, text: &str) -> bool {
        let Some(open) = self.open_blocks.last() else {
            return false;
        };
        text.trim()
            .strip_prefix("@end")
            .is_some_and(|rest| rest == open.properties.name)
    }

    fn close_top_block(&mut self) {
        let Some(open) = self.open_blocks.pop() else {
            return;
        };
        self.consume_node(Node::Block {
            line: open.line,
            properties: open.properties,
            children: open.children,
        });
    }

    /// Append a node to the innermost open block, or to the top level when
    /// no block is open.
    fn consume_node(&mut self, node: Node) {
        match self.open_blocks.last_mut() {
            Some(open) => open.children.push(node),
            None => self.tokens.push(node),
        }
    }

    /// Consume the tokenizer and return the node tree.
    ///
    /// Statements still seeking input are recovered as raw text, and blocks
    /// left open are closed innermost-first with their children intact.
    pub fn finish(mut self) -> Vec<Node> {
        if let Some(statement) = self.tag_statement.take() {
            self.consume_node(Node::Raw {
                value: format!("@{}", statement.raw()),
                line: statement.line(),
            });
            self.consume_node(Node::Newline { line: self.line });
        }
        if let Some(statement) = self.mustache_statement.take() {
            self.consume_node(Node::Raw {
                value: statement.raw().to_string(),
                line: statement.line(),
            });
            self.consume_node(Node::Newline { line: self.line });
        }
        while let Some(open) = self.open_blocks.pop() {
            let node = Node::Block {
                line: open.line,
                properties: open.properties,
                children: open.children,
            };
            match self.open_blocks.last_mut() {
                Some(parent) => parent.children.push(node),
                None => self.tokens.push(node),
            }
        }
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::default_tags;

    fn tokenize_lines(lines: &[&str]) -> Vec<Node> {
        let tags = default_tags();
        let mut tokenizer = Tokenizer::new(&tags);
        for line in lines {
            tokenizer.feed_line(line).unwrap();
        }
        tokenizer.finish()
    }

    #[test]
    fn test_plain_lines_become_raw_nodes() {
        let nodes = tokenize_lines(&["Hello", "world"]);
        assert_eq!(
            nodes,
            vec![
                Node::Raw {
                    value: "Hello".to_string(),
                    line: 1,
                },
                Node::Newline { line: 1 },
                Node::Raw {
                    value: "world".to_string(),
                    line: 2,
                },
                Node::Newline { line: 2 },
            ]
        );
    }

    #[test]
    fn test_block_collects_children() {
        let nodes = tokenize_lines(&["@if(user)", "Hi", "@endif"]);
        assert_eq!(nodes.len(), 2); // the block and the closing line's newline
        let Node::Block {
            line,
            properties,
            children,
        } = &nodes[0]
        else {
            panic!("expected a block node, got {:?}", nodes[0]);
        };
        assert_eq!(*line, 1);
        assert_eq!(properties.name, "if");
        assert_eq!(properties.js_arg, "user");
        assert_eq!(children.len(), 3); // newline, raw, newline
    }

    #[test]
    fn test_unclosed_block_recovered_at_finish() {
        let nodes = tokenize_lines(&["@if(user)", "Hi"]);
        assert_eq!(nodes.len(), 1);
        assert!(
            matches!(&nodes[0], Node::Block { properties, .. } if properties.name == "if")
        );
    }

    #[test]
    fn test_end_without_open_block_is_raw() {
        let nodes = tokenize_lines(&["@endif"]);
        assert!(
            matches!(&nodes[0], Node::Raw { value, .. } if value == "@endif")
        );
    }
}
