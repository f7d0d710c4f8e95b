//! Single pass compiler from the Jack language to stack VM code.
pub mod compile;
pub mod config;
pub mod constants;
pub mod driver;
mod error;
pub mod lex;
pub mod library;
pub mod symbol;

pub use self::error::{JackError, JackResult, LexError, LexErrorKind, ParseError, ParseErrorKind};
use self::{compile::Compilation, library::Library};

/// Compile the source of one class against the given library.
pub fn compile_str(source_code: impl AsRef<str>, library: &Library) -> JackResult<Compilation> {
    let tokens = lex::tokenize(source_code.as_ref())?;
    Ok(compile::compile_tokens(tokens, library)?)
}

pub mod prelude {
    pub use super::{
        compile::{Compilation, Compiler, VmInstr},
        config::CompilerConf,
        driver::{BatchReport, Driver},
        error::{JackError, JackResult},
        library::Library,
        symbol::{Symbol, SymbolKind, SymbolTable},
    };
}
