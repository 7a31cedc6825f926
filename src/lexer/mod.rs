mod buffer;
mod mustache_statement;
mod tag_statement;
mod tokenizer;

pub use buffer::{CharBucket, WhitespacePolicy};
pub use mustache_statement::MustacheStatement;
pub use tag_statement::TagStatement;
pub use tokenizer::Tokenizer;
