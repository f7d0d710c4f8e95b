//! Statements.
use super::{mismatch, Compiler, Segment, VmInstr};
use crate::{
    compile::ArithOp,
    constants::VOID,
    error::{ParseError, ParseErrorKind},
    lex::{Keyword, TokenKind as TK},
};

impl Compiler {
    /// `statement*`
    ///
    /// Stops at the first token that can't start a statement.
    pub(super) fn statements(&mut self) -> Result<(), ParseError> {
        loop {
            match self.stream.peek_kind() {
                Some(TK::Keyword(Keyword::Let)) => self.let_stmt()?,
                Some(TK::Keyword(Keyword::If)) => self.if_stmt()?,
                Some(TK::Keyword(Keyword::While)) => self.while_stmt()?,
                Some(TK::Keyword(Keyword::Do)) => self.do_stmt()?,
                Some(TK::Keyword(Keyword::Return)) => self.return_stmt()?,
                Some(TK::Keyword(Keyword::Var)) => {
                    return Err(ParseError::new(
                        ParseErrorKind::MisplacedDeclaration,
                        self.stream.line(),
                        "'var' declarations must come before the first statement",
                    ));
                }
                _ => return Ok(()),
            }
        }
    }

    /// `'let' ident ('[' expr ']')? '=' expr ';'`
    fn let_stmt(&mut self) -> Result<(), ParseError> {
        self.stream.consume(TK::Keyword(Keyword::Let))?;
        let name = self.stream.consume(TK::Ident)?;
        let target = self.variable(&name)?;

        if self.stream.match_token(TK::LeftBracket) {
            self.emit_push(&target);
            let line = self.stream.line();
            let index = self.expression()?;
            self.check_index(&index, line)?;
            self.stream.consume(TK::RightBracket)?;
            self.emit(VmInstr::Arith(ArithOp::Add));

            self.stream.consume(TK::Assign)?;
            self.expression()?;
            self.stream.consume(TK::Semicolon)?;

            // The right hand side may move `pointer 1`.
            self.emit(VmInstr::Pop(Segment::Temp, 0));
            self.emit(VmInstr::Pop(Segment::Pointer, 1));
            self.emit(VmInstr::Push(Segment::Temp, 0));
            self.emit(VmInstr::Pop(Segment::That, 0));
        } else {
            self.stream.consume(TK::Assign)?;
            let line = self.stream.line();
            let value = self.expression()?;
            self.check_type(&target.ty, &value, line)?;
            self.stream.consume(TK::Semicolon)?;
            self.emit_pop(&target);
        }

        Ok(())
    }

    /// `'if' '(' expr ')' '{' statement* '}' ('else' '{' statement* '}')?`
    fn if_stmt(&mut self) -> Result<(), ParseError> {
        self.stream.consume(TK::Keyword(Keyword::If))?;
        self.stream.consume(TK::LeftParen)?;
        self.expression()?;
        self.stream.consume(TK::RightParen)?;

        let n = self.next_if_label()?;
        self.emit(VmInstr::IfGoto(format!("IF_TRUE{n}").into()));
        self.emit(VmInstr::Goto(format!("IF_FALSE{n}").into()));
        self.emit(VmInstr::Label(format!("IF_TRUE{n}").into()));
        self.block()?;

        if self.stream.match_token(TK::Keyword(Keyword::Else)) {
            self.emit(VmInstr::Goto(format!("IF_END{n}").into()));
            self.emit(VmInstr::Label(format!("IF_FALSE{n}").into()));
            self.block()?;
            self.emit(VmInstr::Label(format!("IF_END{n}").into()));
        } else {
            self.emit(VmInstr::Label(format!("IF_FALSE{n}").into()));
        }

        Ok(())
    }

    /// `'while' '(' expr ')' '{' statement* '}'`
    fn while_stmt(&mut self) -> Result<(), ParseError> {
        self.stream.consume(TK::Keyword(Keyword::While))?;

        let n = self.next_while_label()?;
        self.emit(VmInstr::Label(format!("WHILE_EXP{n}").into()));

        self.stream.consume(TK::LeftParen)?;
        self.expression()?;
        self.stream.consume(TK::RightParen)?;

        self.emit(VmInstr::Arith(ArithOp::Not));
        self.emit(VmInstr::IfGoto(format!("WHILE_END{n}").into()));
        self.block()?;
        self.emit(VmInstr::Goto(format!("WHILE_EXP{n}").into()));
        self.emit(VmInstr::Label(format!("WHILE_END{n}").into()));

        Ok(())
    }

    /// `'do' call ';'`
    fn do_stmt(&mut self) -> Result<(), ParseError> {
        self.stream.consume(TK::Keyword(Keyword::Do))?;
        let name = self.stream.consume(TK::Ident)?;
        self.call(name)?;
        self.stream.consume(TK::Semicolon)?;

        // Discard the return value.
        self.emit(VmInstr::Pop(Segment::Temp, 0));
        Ok(())
    }

    /// `'return' expr? ';'`
    ///
    /// Must be the last statement of its block.
    fn return_stmt(&mut self) -> Result<(), ParseError> {
        let keyword = self.stream.consume(TK::Keyword(Keyword::Return))?;
        let (routine_name, return_type) = match &self.routine {
            Some(routine) => (routine.name.clone(), routine.return_type.clone()),
            None => Default::default(),
        };

        if self.stream.peek_kind() == Some(TK::Semicolon) {
            if return_type != VOID {
                return Err(ParseError::new(
                    ParseErrorKind::MissingReturnValue(return_type.clone()),
                    keyword.line,
                    format!(
                        "'{}.{}' must return a value of type {}",
                        self.class_name, routine_name, return_type
                    ),
                ));
            }
            self.emit(VmInstr::Push(Segment::Constant, 0));
        } else {
            let line = self.stream.line();
            let value = self.expression()?;
            if return_type == VOID {
                return Err(mismatch(VOID, &value, line));
            }
            self.check_type(&return_type, &value, line)?;
        }

        self.stream.consume(TK::Semicolon)?;
        self.emit(VmInstr::Return);

        match self.stream.peek() {
            Some(token) if token.kind == TK::RightBrace => Ok(()),
            Some(token) => Err(ParseError::new(
                ParseErrorKind::Unreachable,
                token.line,
                format!("unreachable code after 'return', got {}", token.text),
            )),
            None => Err(self.stream.unexpected_end(TK::RightBrace)),
        }
    }

    /// `'{' statement* '}'`
    fn block(&mut self) -> Result<(), ParseError> {
        self.stream.consume(TK::LeftBrace)?;
        self.statements()?;
        self.stream.consume(TK::RightBrace)?;
        Ok(())
    }
}
