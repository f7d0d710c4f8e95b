//! Expressions and subroutine calls.
//!
//! Each precedence level compiles its operands first and then emits the
//! operator, leaving the result on top of the stack.
use super::{bump, ArithOp, Compiler, Operand, Segment, VmInstr};
use crate::{
    constants::{BOOLEAN, CHAR, INT, MAX_INT_CONSTANT, NULL, STRING},
    error::{ParseError, ParseErrorKind},
    lex::{unexpected, Keyword, Token, TokenKind as TK},
};

impl Compiler {
    /// `relational (('&'|'|') relational)*`
    ///
    /// The result has the type of the left operand.
    pub(super) fn expression(&mut self) -> Result<Operand, ParseError> {
        let mut left = self.relational()?;

        while let Some(kind @ (TK::Amp | TK::Pipe)) = self.stream.peek_kind() {
            self.stream.next_token();
            self.relational()?;
            self.emit(VmInstr::Arith(if kind == TK::Amp { ArithOp::And } else { ArithOp::Or }));
            left = left.to_value();
        }

        Ok(left)
    }

    /// `additive (relop additive)*`
    #[rustfmt::skip]
    fn relational(&mut self) -> Result<Operand, ParseError> {
        let mut left = self.additive()?;

        while let Some(kind) = self.stream.peek_kind().filter(TK::is_relational) {
            self.stream.next_token();
            self.additive()?;

            match kind {
                TK::Assign | TK::Eq => self.emit(VmInstr::Arith(ArithOp::Eq)),
                TK::Less             => self.emit(VmInstr::Arith(ArithOp::Lt)),
                TK::Greater          => self.emit(VmInstr::Arith(ArithOp::Gt)),
                TK::NotEq => {
                    self.emit(VmInstr::Arith(ArithOp::Eq));
                    self.emit(VmInstr::Arith(ArithOp::Not));
                }
                TK::LessEq => {
                    self.emit(VmInstr::Arith(ArithOp::Gt));
                    self.emit(VmInstr::Arith(ArithOp::Not));
                }
                // >=
                _ => {
                    self.emit(VmInstr::Arith(ArithOp::Lt));
                    self.emit(VmInstr::Arith(ArithOp::Not));
                }
            }

            left = Operand::typed(BOOLEAN);
        }

        Ok(left)
    }

    /// `term (('+'|'-') term)*`
    fn additive(&mut self) -> Result<Operand, ParseError> {
        let mut left = self.term()?;

        while let Some(kind @ (TK::Plus | TK::Minus)) = self.stream.peek_kind() {
            self.stream.next_token();
            self.term()?;
            self.emit(VmInstr::Arith(if kind == TK::Plus { ArithOp::Add } else { ArithOp::Sub }));
            left = Operand::typed(INT);
        }

        Ok(left)
    }

    /// `unary (('*'|'/') unary)*`
    ///
    /// The machine has no multiply or divide, these call into `Math`.
    fn term(&mut self) -> Result<Operand, ParseError> {
        let mut left = self.unary()?;

        while let Some(kind @ (TK::Star | TK::Slash)) = self.stream.peek_kind() {
            self.stream.next_token();
            self.unary()?;
            let routine = if kind == TK::Star { "multiply" } else { "divide" };
            self.emit_call("Math", routine, 2);
            left = Operand::typed(INT);
        }

        Ok(left)
    }

    /// `('-'|'~'|'!') unary | operand`
    fn unary(&mut self) -> Result<Operand, ParseError> {
        match self.stream.peek_kind() {
            Some(TK::Minus) => {
                self.stream.next_token();
                self.unary()?;
                self.emit(VmInstr::Arith(ArithOp::Neg));
                Ok(Operand::typed(INT))
            }
            Some(TK::Tilde | TK::Bang) => {
                self.stream.next_token();
                let operand = self.unary()?;
                self.emit(VmInstr::Arith(ArithOp::Not));
                Ok(operand.to_value())
            }
            _ => self.operand(),
        }
    }

    fn operand(&mut self) -> Result<Operand, ParseError> {
        let token = match self.stream.next_token() {
            Some(token) => token,
            None => return Err(self.stream.unexpected_end("expression")),
        };

        match token.kind {
            TK::Number => {
                let value = int_constant(&token)?;
                self.emit(VmInstr::Push(Segment::Constant, value));
                Ok(Operand::typed(INT))
            }
            TK::Str => {
                self.string_constant(&token)?;
                Ok(Operand::typed(STRING))
            }
            TK::Char => {
                self.string_constant(&token)?;
                Ok(Operand::typed(CHAR))
            }
            TK::Bool => {
                if token.text == "true" {
                    self.emit(VmInstr::Push(Segment::Constant, 1));
                    self.emit(VmInstr::Arith(ArithOp::Neg));
                } else {
                    self.emit(VmInstr::Push(Segment::Constant, 0));
                }
                Ok(Operand::typed(BOOLEAN))
            }
            TK::Null => {
                self.emit(VmInstr::Push(Segment::Constant, 0));
                Ok(Operand::typed(NULL))
            }
            TK::Keyword(Keyword::This) => {
                self.emit(VmInstr::Push(Segment::Pointer, 0));
                Ok(Operand::typed(self.class_name.clone()))
            }
            TK::LeftParen => {
                let inner = self.expression()?;
                self.stream.consume(TK::RightParen)?;
                Ok(inner.to_value())
            }
            TK::Ident => self.identifier(token),
            _ => Err(unexpected("expression", &token)),
        }
    }

    /// Operand starting with an identifier.
    ///
    /// `ident | ident '[' expr ']' | call | ident '.' ident`
    fn identifier(&mut self, name: Token) -> Result<Operand, ParseError> {
        match self.stream.peek_kind() {
            Some(TK::LeftBracket) => {
                let base = self.variable(&name)?;
                self.emit_push(&base);
                self.stream.next_token();

                let line = self.stream.line();
                let index = self.expression()?;
                self.check_index(&index, line)?;
                self.stream.consume(TK::RightBracket)?;

                self.emit(VmInstr::Arith(ArithOp::Add));
                self.emit(VmInstr::Pop(Segment::Pointer, 1));
                self.emit(VmInstr::Push(Segment::That, 0));
                Ok(Operand::unknown())
            }
            Some(TK::LeftParen) => self.call(name),
            Some(TK::Dot) if self.stream.peek_nth(2).map(|token| token.kind) == Some(TK::LeftParen) => self.call(name),
            Some(TK::Dot) => {
                self.stream.next_token();
                let member = self.stream.consume(TK::Ident)?;
                match self.class_static(&name.text, &member.text) {
                    Some(symbol) => {
                        self.emit_push(&symbol);
                        Ok(Operand::variable(symbol))
                    }
                    None => Err(ParseError::new(
                        ParseErrorKind::Undeclared(format!("{}.{}", name.text, member.text).into()),
                        member.line,
                        format!("'{}.{}' is not declared", name.text, member.text),
                    )),
                }
            }
            _ => {
                let symbol = self.variable(&name)?;
                self.emit_push(&symbol);
                Ok(Operand::variable(symbol))
            }
        }
    }

    /// `ident '(' exprList ')' | ident '.' ident '(' exprList ')'`
    ///
    /// The leading identifier has already been consumed. Calls through a
    /// variable and unqualified calls pass the object as a hidden first
    /// argument. The result type is unknown.
    pub(super) fn call(&mut self, name: Token) -> Result<Operand, ParseError> {
        let (class, routine, receiver) = if self.stream.match_token(TK::Dot) {
            let routine = self.stream.consume(TK::Ident)?;
            match self.resolve_variable(&name.text).cloned() {
                Some(object) => {
                    self.emit_push(&object);
                    (object.ty, routine.text, true)
                }
                // Anything that isn't a variable is taken to be a class,
                // which may be declared in another file.
                None => (name.text, routine.text, false),
            }
        } else {
            self.emit(VmInstr::Push(Segment::Pointer, 0));
            (self.class_name.clone(), name.text, true)
        };

        self.stream.consume(TK::LeftParen)?;
        let mut args = self.expression_list()?;
        let close = self.stream.consume(TK::RightParen)?;
        if receiver {
            bump(&mut args, "arguments", close.line)?;
        }

        self.emit_call(&class, &routine, args);
        Ok(Operand::unknown())
    }

    /// `(expr (',' expr)*)?`
    ///
    /// Returns the number of expressions.
    fn expression_list(&mut self) -> Result<u16, ParseError> {
        if self.stream.peek_kind() == Some(TK::RightParen) {
            return Ok(0);
        }

        let mut count = 0;
        loop {
            self.expression()?;
            bump(&mut count, "arguments", self.stream.line())?;
            if !self.stream.match_token(TK::Comma) {
                break;
            }
        }

        Ok(count)
    }

    /// `push constant len`, `call String.new 1`, then one
    /// `String.appendChar` per character.
    fn string_constant(&mut self, token: &Token) -> Result<(), ParseError> {
        let contents = token.literal_contents();
        let codes = contents
            .chars()
            .map(|c| char_code(c, token))
            .collect::<Result<Vec<u16>, _>>()?;
        let length = u16::try_from(codes.len())
            .ok()
            .filter(|length| *length <= MAX_INT_CONSTANT)
            .ok_or_else(|| invalid_literal(token, format!("literal of {} characters is too long", codes.len())))?;

        self.emit(VmInstr::Push(Segment::Constant, length));
        self.emit_call("String", "new", 1);
        for code in codes {
            self.emit(VmInstr::Push(Segment::Constant, code));
            self.emit_call("String", "appendChar", 2);
        }

        Ok(())
    }
}

fn int_constant(token: &Token) -> Result<u16, ParseError> {
    token
        .text
        .parse::<u16>()
        .ok()
        .filter(|value| *value <= MAX_INT_CONSTANT)
        .ok_or_else(|| invalid_literal(token, format!("integer constant {} is out of range", token.text)))
}

fn char_code(c: char, token: &Token) -> Result<u16, ParseError> {
    u16::try_from(c as u32)
        .ok()
        .filter(|code| *code <= MAX_INT_CONSTANT)
        .ok_or_else(|| invalid_literal(token, format!("character {c:?} can't be represented")))
}

#[inline(never)]
#[cold]
fn invalid_literal(token: &Token, message: String) -> ParseError {
    ParseError::new(ParseErrorKind::InvalidLiteral, token.line, message)
}
