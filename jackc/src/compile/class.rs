//! Class and subroutine declarations.
use smol_str::SmolStr;

use super::Compiler;
use crate::{
    constants::{CLASS_TYPE, VOID},
    error::ParseError,
    lex::{unexpected, Keyword, TokenKind as TK},
    symbol::SymbolKind,
};

const SUBROUTINE_KEYWORDS: [TK; 3] = [
    TK::Keyword(Keyword::Constructor),
    TK::Keyword(Keyword::Function),
    TK::Keyword(Keyword::Method),
];

impl Compiler {
    /// `'class' ident '{' classVar* subroutine* '}'`
    pub(super) fn class(&mut self) -> Result<(), ParseError> {
        self.stream.consume(TK::Keyword(Keyword::Class))?;
        let name = self.stream.consume(TK::Ident)?;
        self.declare_global(&name, CLASS_TYPE.into(), SymbolKind::Class, None)?;
        self.class_name = name.text.clone();
        self.stream.consume(TK::LeftBrace)?;

        while let Some(TK::Keyword(Keyword::Static | Keyword::Field)) = self.stream.peek_kind() {
            self.class_var()?;
        }

        while let Some(TK::Keyword(Keyword::Constructor | Keyword::Function | Keyword::Method)) = self.stream.peek_kind() {
            self.subroutine()?;
        }

        self.stream.consume(TK::RightBrace)?;
        Ok(())
    }

    /// `('static'|'field') type ident (',' ident)* ';'`
    fn class_var(&mut self) -> Result<(), ParseError> {
        let keyword = self.stream.consume_any(&[TK::Keyword(Keyword::Static), TK::Keyword(Keyword::Field)])?;
        let kind = match keyword.kind {
            TK::Keyword(Keyword::Field) => SymbolKind::Field,
            _ => SymbolKind::Static,
        };
        let ty = self.type_name()?;
        let class = Some(self.class_name.clone());

        loop {
            let name = self.stream.consume(TK::Ident)?;
            self.declare_global(&name, ty.clone(), kind, class.clone())?;
            if !self.stream.match_token(TK::Comma) {
                break;
            }
        }

        self.stream.consume(TK::Semicolon)?;
        Ok(())
    }

    /// `'int' | 'char' | 'boolean' | ident`
    ///
    /// Class names aren't checked, they may be declared in other files.
    fn type_name(&mut self) -> Result<SmolStr, ParseError> {
        match self.stream.peek() {
            Some(token) if token.kind == TK::Ident => {}
            Some(token) if matches!(token.kind, TK::Keyword(kw) if kw.is_primitive_type()) => {}
            Some(token) => return Err(unexpected("type", token)),
            None => return Err(self.stream.unexpected_end("type")),
        }
        Ok(self.stream.next_token().map(|token| token.text).unwrap_or_default())
    }

    /// `('constructor'|'function'|'method') ('void'|type) ident '(' paramList ')' body`
    fn subroutine(&mut self) -> Result<(), ParseError> {
        let keyword = self.stream.consume_any(&SUBROUTINE_KEYWORDS)?;
        let kind = match keyword.kind {
            TK::Keyword(Keyword::Constructor) => SymbolKind::Constructor,
            TK::Keyword(Keyword::Method) => SymbolKind::Method,
            _ => SymbolKind::Function,
        };

        let return_type = if self.stream.match_token(TK::Keyword(Keyword::Void)) {
            SmolStr::new_inline(VOID)
        } else {
            self.type_name()?
        };

        let name = self.stream.consume(TK::Ident)?;
        let class = Some(self.class_name.clone());
        self.declare_global(&name, return_type.clone(), kind, class)?;

        self.enter_subroutine(name.text.clone(), kind, return_type);
        self.stream.consume(TK::LeftParen)?;
        self.param_list()?;
        self.stream.consume(TK::RightParen)?;
        self.body()?;
        self.leave_subroutine();

        Ok(())
    }

    /// `(type ident (',' type ident)*)?`
    fn param_list(&mut self) -> Result<(), ParseError> {
        if self.stream.peek_kind() == Some(TK::RightParen) {
            return Ok(());
        }

        loop {
            let ty = self.type_name()?;
            let name = self.stream.consume(TK::Ident)?;
            self.declare_local(&name, ty, SymbolKind::Argument)?;
            if !self.stream.match_token(TK::Comma) {
                break;
            }
        }

        Ok(())
    }

    /// `'{' varDecl* statement* '}'`
    fn body(&mut self) -> Result<(), ParseError> {
        self.stream.consume(TK::LeftBrace)?;

        while self.stream.peek_kind() == Some(TK::Keyword(Keyword::Var)) {
            self.var_decl()?;
        }

        // First token after the declarations, all locals are known.
        self.enter_body();
        self.statements()?;

        self.stream.consume(TK::RightBrace)?;
        Ok(())
    }

    /// `'var' type ident (',' ident)* ';'`
    fn var_decl(&mut self) -> Result<(), ParseError> {
        self.stream.consume(TK::Keyword(Keyword::Var))?;
        let ty = self.type_name()?;

        loop {
            let name = self.stream.consume(TK::Ident)?;
            self.declare_local(&name, ty.clone(), SymbolKind::Var)?;
            if !self.stream.match_token(TK::Comma) {
                break;
            }
        }

        self.stream.consume(TK::Semicolon)?;
        Ok(())
    }
}
