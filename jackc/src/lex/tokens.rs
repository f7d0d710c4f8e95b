//! Tokens

use smol_str::SmolStr;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text the token was scanned from.
    pub text: SmolStr,
    /// Line number, starting at 1.
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<SmolStr>, line: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// Contents of a string or character literal, without the quotes.
    pub fn literal_contents(&self) -> &str {
        match self.kind {
            TokenKind::Str | TokenKind::Char => {
                let text = self.text.as_str();
                text.get(1..text.len().saturating_sub(1)).unwrap_or_default()
            }
            _ => self.text.as_str(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}, {}>", self.text, self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[rustfmt::skip]
pub enum TokenKind {
    // Punctuators
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    // Array index
    LeftBracket,  // [
    RightBracket, // ]
    /// Member access `.`
    Dot,
    /// Separator `,`
    Comma,
    /// Terminator `;`
    Semicolon,
    /// Assignment operator `=`
    Assign,

    // ------------------------------------------------------------------------
    // Equality and relational
    Eq,        // ==
    NotEq,     // !=
    Less,      // <
    LessEq,    // <=
    Greater,   // >
    GreaterEq, // >=

    // ------------------------------------------------------------------------
    // Arithmetic and logical
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /
    Amp,   // &
    Pipe,  // |
    Tilde, // ~
    Bang,  // !

    // ------------------------------------------------------------------------
    // Complex
    Ident,
    /// Reserved identifiers
    Keyword(Keyword),
    /// Number literal
    Number,
    /// `true` or `false`
    Bool,
    /// String literal, including the double quotes
    Str,
    /// Character literal, including the single quotes
    Char,
    /// `null`
    Null,
}

impl TokenKind {
    /// Whether the token is one of the binary relational operators.
    #[inline]
    pub fn is_relational(&self) -> bool {
        use TokenKind as TK;
        matches!(
            self,
            TK::Assign | TK::Eq | TK::NotEq | TK::Less | TK::LessEq | TK::Greater | TK::GreaterEq
        )
    }
}

impl fmt::Display for TokenKind {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TokenKind as TK;
        match self {
            TK::LeftParen    => write!(f, "'('"),
            TK::RightParen   => write!(f, "')'"),
            TK::LeftBrace    => write!(f, "'{{'"),
            TK::RightBrace   => write!(f, "'}}'"),
            TK::LeftBracket  => write!(f, "'['"),
            TK::RightBracket => write!(f, "']'"),
            TK::Dot          => write!(f, "'.'"),
            TK::Comma        => write!(f, "','"),
            TK::Semicolon    => write!(f, "';'"),
            TK::Assign       => write!(f, "'='"),
            TK::Eq           => write!(f, "'=='"),
            TK::NotEq        => write!(f, "'!='"),
            TK::Less         => write!(f, "'<'"),
            TK::LessEq       => write!(f, "'<='"),
            TK::Greater      => write!(f, "'>'"),
            TK::GreaterEq    => write!(f, "'>='"),
            TK::Plus         => write!(f, "'+'"),
            TK::Minus        => write!(f, "'-'"),
            TK::Star         => write!(f, "'*'"),
            TK::Slash        => write!(f, "'/'"),
            TK::Amp          => write!(f, "'&'"),
            TK::Pipe         => write!(f, "'|'"),
            TK::Tilde        => write!(f, "'~'"),
            TK::Bang         => write!(f, "'!'"),
            TK::Ident        => write!(f, "identifier"),
            TK::Keyword(kw)  => write!(f, "'{kw}'"),
            TK::Number       => write!(f, "integer constant"),
            TK::Bool         => write!(f, "boolean constant"),
            TK::Str          => write!(f, "string constant"),
            TK::Char         => write!(f, "character constant"),
            TK::Null         => write!(f, "'null'"),
        }
    }
}

/// Reserved keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Keyword {
    // ------------------------------------------------------------------------
    // Declarations
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,

    // ------------------------------------------------------------------------
    // Types
    Int,
    Char,
    Boolean,
    Void,

    // ------------------------------------------------------------------------
    // Statements
    Let,
    Do,
    If,
    Else,
    While,
    Return,

    // ------------------------------------------------------------------------
    // Expressions
    This,
}

impl Keyword {
    #[rustfmt::skip]
    pub fn parse(text: impl AsRef<str>) -> Option<Self> {
        match text.as_ref() {
            "class"       => Some(Self::Class),
            "constructor" => Some(Self::Constructor),
            "function"    => Some(Self::Function),
            "method"      => Some(Self::Method),
            "field"       => Some(Self::Field),
            "static"      => Some(Self::Static),
            "var"         => Some(Self::Var),
            // ----------------------------------------------------------------
            "int"         => Some(Self::Int),
            "char"        => Some(Self::Char),
            "boolean"     => Some(Self::Boolean),
            "void"        => Some(Self::Void),
            // ----------------------------------------------------------------
            "let"         => Some(Self::Let),
            "do"          => Some(Self::Do),
            "if"          => Some(Self::If),
            "else"        => Some(Self::Else),
            "while"       => Some(Self::While),
            "return"      => Some(Self::Return),
            // ----------------------------------------------------------------
            "this"        => Some(Self::This),
            _ => None,
        }
    }

    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class       => "class",
            Self::Constructor => "constructor",
            Self::Function    => "function",
            Self::Method      => "method",
            Self::Field       => "field",
            Self::Static      => "static",
            Self::Var         => "var",
            Self::Int         => "int",
            Self::Char        => "char",
            Self::Boolean     => "boolean",
            Self::Void        => "void",
            Self::Let         => "let",
            Self::Do          => "do",
            Self::If          => "if",
            Self::Else        => "else",
            Self::While       => "while",
            Self::Return      => "return",
            Self::This        => "this",
        }
    }

    /// Keywords that name a primitive type.
    #[inline]
    pub fn is_primitive_type(&self) -> bool {
        matches!(self, Self::Int | Self::Char | Self::Boolean)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for word in ["class", "method", "boolean", "while", "this"] {
            let keyword = Keyword::parse(word).unwrap();
            assert_eq!(keyword.as_str(), word);
        }
    }

    #[test]
    fn test_keyword_case_sensitive() {
        assert_eq!(Keyword::parse("Class"), None);
        assert_eq!(Keyword::parse("WHILE"), None);
        assert_eq!(Keyword::parse("true"), None);
    }

    #[test]
    fn test_literal_contents() {
        let token = Token::new(TokenKind::Str, "\"hi there\"", 1);
        assert_eq!(token.literal_contents(), "hi there");

        let token = Token::new(TokenKind::Char, "'x'", 1);
        assert_eq!(token.literal_contents(), "x");

        let token = Token::new(TokenKind::Str, "\"\"", 1);
        assert_eq!(token.literal_contents(), "");
    }
}
