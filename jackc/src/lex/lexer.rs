//! Lexical analysis
use super::{
    cursor::{Cursor, EOF_CHAR},
    tokens::{Keyword, Token, TokenKind},
};
use crate::error::{LexError, LexErrorKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    /// Byte offset where the current token starts.
    start_pos: usize,
    /// Line the current token started on.
    start_line: u32,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over source that has already been stripped of comments.
    pub fn new(source_code: &'a str) -> Self {
        let mut cursor = Cursor::new(source_code);

        // The cursor starts before the first character.
        cursor.next();

        let start_pos = cursor.offset();
        let start_line = cursor.line();

        Self {
            cursor,
            start_pos,
            start_line,
        }
    }

    /// Scan the source characters and construct the next token.
    ///
    /// Returns `None` once the source is exhausted.
    ///
    /// ## Implementation
    ///
    /// Each call starts with the assumption that the internal cursor is
    /// pointing to the start of the remaining source to be consumed. When
    /// a call is done building a token, it must leave the cursor at the
    /// character following its own text.
    #[rustfmt::skip]
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        use TokenKind as TK;

        // Erase leading whitespace, newlines included.
        while is_whitespace(self.cursor.current()) {
            self.cursor.next();
        }

        if self.cursor.at_end() {
            return Ok(None);
        }

        self.start_token();

        let token = match self.cursor.current() {
            '(' => self.make_token(TK::LeftParen),
            ')' => self.make_token(TK::RightParen),
            '{' => self.make_token(TK::LeftBrace),
            '}' => self.make_token(TK::RightBrace),
            '[' => self.make_token(TK::LeftBracket),
            ']' => self.make_token(TK::RightBracket),
            '.' => self.make_token(TK::Dot),
            ',' => self.make_token(TK::Comma),
            ';' => self.make_token(TK::Semicolon),
            '+' => self.make_token(TK::Plus),
            '-' => self.make_token(TK::Minus),
            '*' => self.make_token(TK::Star),
            '/' => self.make_token(TK::Slash),
            '&' => self.make_token(TK::Amp),
            '|' => self.make_token(TK::Pipe),
            '~' => self.make_token(TK::Tilde),
            '=' => self.make_pair(TK::Eq, TK::Assign),
            '<' => self.make_pair(TK::LessEq, TK::Less),
            '>' => self.make_pair(TK::GreaterEq, TK::Greater),
            '!' => self.make_pair(TK::NotEq, TK::Bang),
            '"'  => self.consume_quoted(TK::Str, LexErrorKind::UnterminatedString)?,
            '\'' => self.consume_quoted(TK::Char, LexErrorKind::UnterminatedChar)?,
            '_' | 'a'..='z' | 'A'..='Z' => self.consume_ident(),
            '0'..='9' => self.consume_number(),
            c => return Err(LexError::new(LexErrorKind::UnknownCharacter(c), self.start_line)),
        };

        Ok(Some(token))
    }

    /// Remember where the next token starts.
    fn start_token(&mut self) {
        self.start_pos = self.cursor.offset();
        self.start_line = self.cursor.line();
    }

    /// Build a token from the text between [`Lexer::start_token`] and the
    /// current character inclusive, then step past it.
    fn make_token(&mut self, kind: TokenKind) -> Token {
        let text = self.cursor.fragment_from(self.start_pos);
        let token = Token::new(kind, text, self.start_line);

        self.cursor.next();

        token
    }

    /// Operator that may be followed by `=` to form a two character operator.
    fn make_pair(&mut self, with_eq: TokenKind, alone: TokenKind) -> Token {
        if self.cursor.peek() == '=' {
            self.cursor.next();
            self.make_token(with_eq)
        } else {
            self.make_token(alone)
        }
    }
}

/// Multi character tokens.
impl<'a> Lexer<'a> {
    /// Make an identifier, keyword or word literal token.
    fn consume_ident(&mut self) -> Token {
        debug_assert!(is_letter(self.cursor.current()));

        while is_letter_or_digit(self.cursor.peek()) {
            self.cursor.next();
        }

        let token_kind = match self.cursor.fragment_from(self.start_pos) {
            "true" | "false" => TokenKind::Bool,
            "null" => TokenKind::Null,
            word => match Keyword::parse(word) {
                Some(keyword) => TokenKind::Keyword(keyword),
                None => TokenKind::Ident,
            },
        };

        self.make_token(token_kind)
    }

    /// Make a number literal token.
    ///
    /// Signs are unary operators handled by the parser.
    fn consume_number(&mut self) -> Token {
        debug_assert!(is_digit(self.cursor.current()));

        while is_digit(self.cursor.peek()) {
            self.cursor.next();
        }

        self.make_token(TokenKind::Number)
    }

    /// Make a string or character literal, including both delimiters.
    ///
    /// Literals can't span lines.
    fn consume_quoted(&mut self, kind: TokenKind, unterminated: LexErrorKind) -> Result<Token, LexError> {
        let quote = self.cursor.current();

        loop {
            match self.cursor.peek() {
                c if c == quote => {
                    self.cursor.next();
                    break;
                }
                '\n' | '\r' | EOF_CHAR => return Err(LexError::new(unterminated, self.start_line)),
                _ => {
                    self.cursor.next();
                }
            }
        }

        Ok(self.make_token(kind))
    }
}

/// Whitespace separating tokens, newlines included.
fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0020}' // space
            | '\u{0009}' // tab
            | '\u{000A}' // line feed
            | '\u{000D}' // carriage return
            | '\u{00A0}' // no-break space
            | '\u{FEFF}' // zero width no-break space
    )
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_letter(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_')
}

fn is_letter_or_digit(c: char) -> bool {
    is_letter(c) || is_digit(c)
}

impl<'a> IntoIterator for Lexer<'a> {
    type Item = Result<Token, LexError>;
    type IntoIter = LexerIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        LexerIter {
            lexer: self,
            done: false,
        }
    }
}

/// Iterator over the tokens of a lexer.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct LexerIter<'a> {
    // Stop after the first error, the cursor doesn't move past it.
    done: bool,
    lexer: Lexer<'a>,
}

impl<'a> Iterator for LexerIter<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.lexer.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
