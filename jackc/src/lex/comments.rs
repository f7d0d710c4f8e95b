//! Comment stripping.
//!
//! Runs before tokenization. The output has exactly one line for every
//! input line, so line numbers reported by later stages match the source.
use itertools::multipeek;

use crate::error::{LexError, LexErrorKind};

/// Remove `//` and `/* */` comments from the given lines.
///
/// A block comment is replaced by a single space where it closes, so
/// tokens on either side don't merge. Lines that end up empty are kept
/// as empty strings.
///
/// Comment markers inside string and character literals are left alone.
/// Unterminated literals are reported later by the lexer.
pub fn strip_comments<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>, LexError> {
    let mut stripped = Vec::new();
    // Line where the currently open block comment started.
    let mut block_start: Option<u32> = None;

    for (index, line) in lines.into_iter().enumerate() {
        let line_number = index as u32 + 1;
        let mut out = String::with_capacity(line.len());
        let mut chars = multipeek(line.chars());
        let mut quote: Option<char> = None;

        while let Some(c) = chars.next() {
            if block_start.is_some() {
                if c == '*' && chars.peek().copied() == Some('/') {
                    chars.next();
                    block_start = None;
                    out.push(' ');
                }
                continue;
            }

            if let Some(q) = quote {
                if c == q {
                    quote = None;
                }
                out.push(c);
                continue;
            }

            match c {
                '"' | '\'' => {
                    quote = Some(c);
                    out.push(c);
                }
                '/' => match chars.peek().copied() {
                    Some('/') => break,
                    Some('*') => {
                        chars.next();
                        block_start = Some(line_number);
                    }
                    _ => out.push(c),
                },
                _ => out.push(c),
            }
        }

        stripped.push(out);
    }

    match block_start {
        Some(line) => Err(LexError::new(LexErrorKind::UnterminatedComment, line)),
        None => Ok(stripped),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_line_comment() {
        let lines = strip_comments(["let x = 1; // set x", "// whole line"]).unwrap();
        assert_eq!(lines, vec!["let x = 1; ".to_string(), String::new()]);
    }

    #[test]
    fn test_block_comment_single_line() {
        let lines = strip_comments(["let/* inline */x = 1;"]).unwrap();
        assert_eq!(lines, vec!["let x = 1;".to_string()]);
    }

    #[test]
    fn test_block_comment_preserves_line_count() {
        let source = ["class Main {", "/** docs", " * more docs", " */", "}"];
        let lines = strip_comments(source).unwrap();
        assert_eq!(lines.len(), source.len());
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], " ");
        assert_eq!(lines[4], "}");
    }

    #[test]
    fn test_markers_in_strings() {
        let lines = strip_comments(["do Output.printString(\"a // b /* c\");"]).unwrap();
        assert_eq!(lines[0], "do Output.printString(\"a // b /* c\");");
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = strip_comments(["let x = 1;", "/* never", "closed"]).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_lone_slash_kept() {
        let lines = strip_comments(["let x = a / b;"]).unwrap();
        assert_eq!(lines[0], "let x = a / b;");
    }
}
