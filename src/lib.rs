pub mod ast;
pub mod error;
pub mod lexer;
pub mod tags;

pub use ast::{MustacheProps, Node, TagProps};
pub use error::{ErrorKind, LexError};
pub use lexer::{CharBucket, MustacheStatement, TagStatement, Tokenizer, WhitespacePolicy};
pub use tags::{default_tags, TagDefinition, TagDefinitions};

/// Tokenize a whole template against a tag table.
///
/// Lines are split with [`str::lines`] semantics: `\r\n` terminators are
/// normalized away and a trailing newline does not produce a phantom empty
/// line. Unterminated statements and unclosed blocks are recovered as raw
/// text, so the only errors are the fatal ones raised while a statement is
/// being fed.
pub fn tokenize(template: &str, tags: &TagDefinitions) -> Result<Vec<Node>, LexError> {
    let mut tokenizer = Tokenizer::new(tags);
    for line in template.lines() {
        tokenizer.feed_line(line)?;
    }
    Ok(tokenizer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_crlf_lines() {
        let tags = default_tags();
        let nodes = tokenize("a\r\nb\r\n", &tags).unwrap();
        assert_eq!(nodes.len(), 4);
        assert!(matches!(&nodes[2], Node::Raw { value, line: 2 } if value == "b"));
    }

    #[test]
    fn test_tokenize_no_phantom_trailing_line() {
        let tags = default_tags();
        let with_newline = tokenize("hello\n", &tags).unwrap();
        let without = tokenize("hello", &tags).unwrap();
        assert_eq!(with_newline, without);
    }

    #[test]
    fn test_tokenize_propagates_errors() {
        let tags = default_tags();
        let err = tokenize("@if(x) trailing\n", &tags).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TrailingContent));
        assert_eq!(err.line, 1);
    }
}
