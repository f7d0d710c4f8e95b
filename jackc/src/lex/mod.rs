//! Tokenizer
mod comments;
mod cursor;
mod lexer;
mod token_stream;
mod tokens;

use std::io::Write;

pub use self::{
    comments::strip_comments,
    lexer::{Lexer, LexerIter},
    token_stream::{unexpected, TokenStream},
    tokens::{Keyword, Token, TokenKind},
};
use crate::error::LexError;

/// Strip comments from the source and scan it into a token sequence.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let lines = strip_comments(source.lines())?;
    let stripped = lines.join("\n");
    Lexer::new(&stripped).into_iter().collect()
}

/// Write one token per line as `line  kind  text`.
pub fn dump_tokens(tokens: &[Token], mut writer: impl Write) -> std::io::Result<()> {
    for token in tokens {
        writeln!(writer, "{:>4}  {:<20}  {}", token.line, token.kind.to_string(), token.text)?;
    }
    Ok(())
}
