//! Peekable token stream.
use itertools::Itertools;

use super::{Token, TokenKind};
use crate::error::{ParseError, ParseErrorKind};

/// Buffered stream of tokens that allows arbitrary look ahead.
///
/// The whole source is tokenized up front. The stream is a cursor
/// into the token buffer, so consuming is constant time and a
/// consumed token can be stepped back over with [`TokenStream::rewind`].
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    /// Index of the next token to be consumed.
    cursor: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Number of tokens that have not been consumed yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.cursor
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// The most recently consumed token.
    pub fn previous_token(&self) -> Option<&Token> {
        self.cursor.checked_sub(1).and_then(|index| self.tokens.get(index))
    }

    /// Line of the next token, or of the last token when at the end.
    ///
    /// Used to place errors that don't have a token of their own.
    pub fn line(&self) -> u32 {
        self.tokens
            .get(self.cursor)
            .or_else(|| self.tokens.last())
            .map(|token| token.line)
            .unwrap_or(1)
    }

    /// Consumes the current token regardless of type.
    ///
    /// Returns `None` when the cursor is at the end of the token stream.
    #[inline]
    pub fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    /// Return the current token without advancing the cursor.
    ///
    /// Returns `None` when the tokens are exhausted.
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// Look ahead `n` tokens past the current one, without advancing the cursor.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + n)
    }

    /// Return the current token kind without advancing the cursor.
    #[inline]
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    /// Step the cursor back over the previously consumed token.
    pub fn rewind(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Consumes the current token if it matches the given token kind.
    ///
    /// Returns true when matched. Returns false when token kinds
    /// do not match, or the token stream is at the end.
    ///
    /// Does not consume the token if the types do not match.
    pub fn match_token(&mut self, token_kind: TokenKind) -> bool {
        let is_match = self.peek_kind() == Some(token_kind);
        if is_match {
            self.cursor += 1;
        }
        is_match
    }

    /// Return the current token and advance the cursor.
    ///
    /// The consumed token must match the given token type, otherwise
    /// a parsing error is returned. The cursor is not advanced if
    /// the token kind does not match.
    ///
    /// # Errors
    ///
    /// Returns [`ParseErrorKind::UnexpectedToken`] if the token kind doesn't
    /// match, and [`ParseErrorKind::UnexpectedEnd`] when the stream is exhausted.
    pub fn consume(&mut self, token_kind: TokenKind) -> Result<Token, ParseError> {
        match self.peek() {
            Some(token) if token.kind == token_kind => {
                let token = token.clone();
                self.cursor += 1;
                Ok(token)
            }
            Some(token) => Err(unexpected(token_kind, token)),
            None => Err(self.unexpected_end(token_kind)),
        }
    }

    /// Consume the current token if it matches any of the given kinds.
    pub fn consume_any(&mut self, token_kinds: &[TokenKind]) -> Result<Token, ParseError> {
        match self.peek() {
            Some(token) if token_kinds.contains(&token.kind) => {
                let token = token.clone();
                self.cursor += 1;
                Ok(token)
            }
            Some(token) => Err(ParseError::new(
                ParseErrorKind::UnexpectedToken,
                token.line,
                format!(
                    "expected one of {}, got {}",
                    token_kinds.iter().join(", "),
                    token.text
                ),
            )),
            None => Err(ParseError::new(
                ParseErrorKind::UnexpectedEnd,
                self.line(),
                format!(
                    "expected one of {}, got end of input",
                    token_kinds.iter().join(", ")
                ),
            )),
        }
    }

    /// Error for when a token is required but the stream has run out.
    #[inline(never)]
    #[cold]
    pub fn unexpected_end(&self, expected: impl std::fmt::Display) -> ParseError {
        ParseError::new(
            ParseErrorKind::UnexpectedEnd,
            self.line(),
            format!("expected {expected}, got end of input"),
        )
    }
}

/// Error for when the encountered token doesn't match the expected one.
#[inline(never)]
#[cold]
pub fn unexpected(expected: impl std::fmt::Display, encountered: &Token) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnexpectedToken,
        encountered.line,
        format!("expected {expected}, got {}", encountered.text),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lex::tokenize;

    #[test]
    fn test_peek_does_not_consume() {
        let mut stream = TokenStream::new(tokenize("let x;").unwrap());
        assert_eq!(stream.peek().map(|t| t.text.as_str()), Some("let"));
        assert_eq!(stream.peek().map(|t| t.text.as_str()), Some("let"));
        assert_eq!(stream.peek_nth(1).map(|t| t.text.as_str()), Some("x"));
        assert_eq!(stream.remaining(), 3);
        assert_eq!(stream.next_token().map(|t| t.text), Some("let".into()));
        assert_eq!(stream.remaining(), 2);
    }

    #[test]
    fn test_exhausted_stream() {
        let mut stream = TokenStream::new(tokenize("x").unwrap());
        assert!(stream.next_token().is_some());
        assert!(stream.at_end());
        assert_eq!(stream.peek(), None);
        assert_eq!(stream.next_token(), None);
        assert_eq!(stream.next_token(), None);
    }

    #[test]
    fn test_consume_mismatch_keeps_cursor() {
        let mut stream = TokenStream::new(tokenize("x = 1").unwrap());
        let err = stream.consume(TokenKind::Semicolon).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.message, "expected ';', got x");
        assert_eq!(stream.remaining(), 3);
        assert!(stream.consume(TokenKind::Ident).is_ok());
    }

    #[test]
    fn test_consume_at_end() {
        let mut stream = TokenStream::new(tokenize("x\n\n").unwrap());
        stream.next_token();
        let err = stream.consume(TokenKind::Semicolon).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEnd);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_rewind() {
        let mut stream = TokenStream::new(tokenize("a . b").unwrap());
        stream.next_token();
        assert!(stream.match_token(TokenKind::Dot));
        stream.rewind();
        assert_eq!(stream.peek_kind(), Some(TokenKind::Dot));
        assert_eq!(stream.previous_token().map(|t| t.text.as_str()), Some("a"));
    }

    #[test]
    fn test_consume_any() {
        let mut stream = TokenStream::new(tokenize("field x").unwrap());
        let kinds = [
            TokenKind::Keyword(crate::lex::Keyword::Static),
            TokenKind::Keyword(crate::lex::Keyword::Field),
        ];
        assert!(stream.consume_any(&kinds).is_ok());
        let err = stream.consume_any(&kinds).unwrap_err();
        assert_eq!(err.message, "expected one of 'static', 'field', got x");
    }
}
