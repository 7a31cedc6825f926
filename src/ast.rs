use serde::{Deserialize, Serialize};

/// A node in the lexed template tree.
///
/// Serializes as a tagged object, e.g.
/// `{ "type": "raw", "value": "Hello", "line": 1 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// Plain template text, emitted verbatim.
    Raw { value: String, line: usize },

    /// A line break in the source.
    Newline { line: usize },

    /// An inline interpolation, `{{ ... }}` or `{{{ ... }}}`.
    Mustache {
        line: usize,
        properties: MustacheProps,
    },

    /// A tag statement. Block tags carry the nodes between the opening
    /// line and the matching `@end...` as children; inline tags have none.
    Block {
        line: usize,
        properties: TagProps,
        children: Vec<Node>,
    },
}

impl Node {
    /// Source line the node started on (1-indexed).
    pub fn line(&self) -> usize {
        match self {
            Node::Raw { line, .. }
            | Node::Newline { line }
            | Node::Mustache { line, .. }
            | Node::Block { line, .. } => *line,
        }
    }
}

/// Properties of a completed tag statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagProps {
    pub name: String,

    /// Expression between the parens, whitespace runs collapsed.
    #[serde(rename = "jsArg")]
    pub js_arg: String,

    /// The statement text exactly as fed, lines joined with `\n`.
    pub raw: String,
}

/// Properties of a completed mustache statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MustacheProps {
    /// Either `mustache` or `emustache`.
    pub name: String,

    #[serde(rename = "jsArg")]
    pub js_arg: String,

    pub raw: String,

    /// Text on the line before the opening braces.
    #[serde(rename = "textLeft")]
    pub text_left: String,

    /// Text on the line after the closing braces.
    #[serde(rename = "textRight")]
    pub text_right: String,
}
