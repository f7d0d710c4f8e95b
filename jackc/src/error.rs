//! Result and errors.
use smol_str::SmolStr;
use std::{
    fmt::{self, Display, Formatter},
    io,
    string::FromUtf8Error,
};

pub type JackResult<T> = std::result::Result<T, JackError>;

#[derive(Debug)]
pub enum JackError {
    /// Malformed token in the source text.
    Lex(LexError),
    /// Grammar or semantic error raised by the compiler.
    Parse(ParseError),
    /// Malformed line in a predeclared library descriptor.
    Library { line: u32, message: String },
    /// Source file with an extension other than the configured one.
    Extension { path: String },
    Io(io::Error),
    Utf8(FromUtf8Error),
    Config(serde_yaml::Error),
}

impl JackError {
    /// Whether the error was caused by the contents of a source file,
    /// rather than the environment.
    pub fn is_source_error(&self) -> bool {
        matches!(self, Self::Lex(_) | Self::Parse(_))
    }
}

impl Display for JackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => write!(f, "{err}"),
            Self::Parse(err) => write!(f, "{err}"),
            Self::Library { line, message } => write!(f, "library descriptor error on line {line}: {message}"),
            Self::Extension { path } => write!(f, "not a source file: {path}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Utf8(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "configuration error: {err}"),
        }
    }
}

impl std::error::Error for JackError {}

impl From<LexError> for JackError {
    fn from(err: LexError) -> Self {
        JackError::Lex(err)
    }
}

impl From<ParseError> for JackError {
    fn from(err: ParseError) -> Self {
        JackError::Parse(err)
    }
}

impl From<io::Error> for JackError {
    fn from(err: io::Error) -> Self {
        JackError::Io(err)
    }
}

impl From<FromUtf8Error> for JackError {
    fn from(err: FromUtf8Error) -> Self {
        JackError::Utf8(err)
    }
}

impl From<serde_yaml::Error> for JackError {
    fn from(err: serde_yaml::Error) -> Self {
        JackError::Config(err)
    }
}

/// Error raised by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    UnknownCharacter(char),
    /// String literal without a closing double quote on the same line.
    UnterminatedString,
    /// Character literal without a closing single quote on the same line.
    UnterminatedChar,
    /// Block comment still open at the end of the source.
    UnterminatedComment,
}

impl LexError {
    pub fn new(kind: LexErrorKind, line: u32) -> Self {
        Self { kind, line }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use LexErrorKind as K;
        write!(f, "lexical error on line {}: ", self.line)?;
        match self.kind {
            K::UnknownCharacter(c) => write!(f, "unknown character {c:?}"),
            K::UnterminatedString => write!(f, "unterminated string literal"),
            K::UnterminatedChar => write!(f, "unterminated character literal"),
            K::UnterminatedComment => write!(f, "unterminated block comment"),
        }
    }
}

impl std::error::Error for LexError {}

/// Error raised by the parser and code generator.
///
/// Compilation stops at the first error, so there is only
/// ever one of these per source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Encountered a token that doesn't fit the grammar.
    UnexpectedToken,
    /// Token stream ran out in the middle of a construct.
    UnexpectedEnd,
    /// Identifier used without a declaration.
    Undeclared(SmolStr),
    /// Identifier declared twice in the same class.
    Duplicate(SmolStr),
    TypeMismatch { expected: SmolStr, found: SmolStr },
    /// `return;` in a subroutine with a declared return type.
    MissingReturnValue(SmolStr),
    /// Statement after a `return` in the same block.
    Unreachable,
    /// `var` declaration after the first statement of a body.
    MisplacedDeclaration,
    /// Literal that can't be represented by the VM.
    InvalidLiteral,
    /// Symbols, labels or arguments beyond what the VM can address.
    LimitExceeded,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: u32, message: impl ToString) -> Self {
        Self {
            kind,
            line,
            message: message.to_string(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "error on line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}
