use std::collections::HashMap;

/// How the tokenizer treats a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagDefinition {
    /// Block tags collect children until a matching `@end...` line.
    pub block: bool,
    /// Seekable tags take a parenthesised argument, possibly spanning
    /// several lines. Non-seekable tags complete on their opening line.
    pub seekable: bool,
}

/// Tag table consulted while classifying lines.
pub type TagDefinitions = HashMap<String, TagDefinition>;

/// The built-in tag set.
pub fn default_tags() -> TagDefinitions {
    let mut tags = TagDefinitions::new();
    for (name, block, seekable) in [
        ("if", true, true),
        ("elseif", false, true),
        ("else", false, false),
        ("each", true, true),
        ("unless", true, true),
        ("include", false, true),
        ("component", true, true),
        ("slot", true, true),
        ("set", false, true),
        ("debugger", false, false),
    ] {
        tags.insert(name.to_string(), TagDefinition { block, seekable });
    }
    tags
}
