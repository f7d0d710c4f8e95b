//! Character scanner.
use std::{iter::Peekable, str::CharIndices};

/// Character returned when the cursor has moved past the end of the source.
pub const EOF_CHAR: char = '\0';

/// Wrapper for source code that keeps a cursor position.
///
/// Allows one character of lookahead via peeking.
pub struct Cursor<'a> {
    original: &'a str,
    chars: Peekable<CharIndices<'a>>,
    /// Byte position and character the cursor is pointing at.
    current: (usize, char),
    /// Line of the current character, starting at 1.
    line: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            original: source,
            chars: source.char_indices().peekable(),
            current: (0, EOF_CHAR),
            line: 1,
        }
    }

    /// Character the cursor is pointing at.
    #[inline]
    pub fn current(&self) -> char {
        self.current.1
    }

    /// Byte offset of the current character.
    #[inline]
    pub fn offset(&self) -> usize {
        self.current.0
    }

    /// Byte offset of the character after the current one.
    #[inline]
    pub fn peek_offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(index, _)| *index)
            .unwrap_or(self.original.len())
    }

    /// Line of the current character.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Character after the current one, without advancing.
    #[inline]
    pub fn peek(&mut self) -> char {
        self.chars.peek().map(|(_, c)| *c).unwrap_or(EOF_CHAR)
    }

    /// Advance the cursor and return the new current character.
    pub fn next(&mut self) -> char {
        // The line counter tracks the character being left behind, so
        // a newline is attributed to the line it terminates.
        if self.current.1 == '\n' {
            self.line += 1;
        }

        match self.chars.next() {
            Some((index, c)) => {
                self.current = (index, c);
                c
            }
            None => {
                // There is no End-of-file character, so
                // we just set it to the null-byte.
                self.current = (self.original.len(), EOF_CHAR);
                EOF_CHAR
            }
        }
    }

    /// Indicates whether the cursor has moved past the last character.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.current.0 >= self.original.len()
    }

    /// Slice of source between the given offset and the end of the current character.
    #[inline]
    pub fn fragment_from(&mut self, start: usize) -> &'a str {
        let end = self.peek_offset();
        &self.original[start..end]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cursor_lines() {
        let mut cursor = Cursor::new("a\nb\n\nc");
        assert_eq!(cursor.next(), 'a');
        assert_eq!(cursor.line(), 1);
        assert_eq!(cursor.next(), '\n');
        assert_eq!(cursor.line(), 1);
        assert_eq!(cursor.next(), 'b');
        assert_eq!(cursor.line(), 2);
        cursor.next();
        cursor.next();
        assert_eq!(cursor.next(), 'c');
        assert_eq!(cursor.line(), 4);
        assert_eq!(cursor.next(), EOF_CHAR);
        assert!(cursor.at_end());
    }

    #[test]
    fn test_cursor_fragment() {
        let mut cursor = Cursor::new("let x1 = 5;");
        cursor.next();
        let start = cursor.offset();
        cursor.next();
        cursor.next();
        assert_eq!(cursor.fragment_from(start), "let");
        assert_eq!(cursor.peek(), ' ');
    }
}
