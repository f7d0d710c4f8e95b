//! Single pass compiler.
//!
//! Grammar routines validate the token sequence, maintain the symbol
//! tables and emit VM code in one recursive descent. There is no
//! syntax tree. Code order follows the post-order traversal of the
//! implied expression tree.
mod class;
mod expr;
mod stmts;
mod types;
mod vm;

use log::{debug, trace};
use smol_str::SmolStr;

pub use self::{
    types::{is_compatible, Operand},
    vm::{render, ArithOp, Segment, VmInstr},
};
use crate::{
    constants::{GLOBAL_SCOPE, GLOBAL_TABLE, INT},
    error::{ParseError, ParseErrorKind},
    lex::{Token, TokenStream},
    library::Library,
    symbol::{self, add_table, Symbol, SymbolKind, SymbolTable},
};

/// Output of a successful compilation.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Name of the compiled class.
    pub class_name: SmolStr,
    pub code: Vec<VmInstr>,
    /// Global table followed by one table per subroutine, in declaration order.
    pub tables: Vec<SymbolTable>,
}

impl Compilation {
    /// Generated code as VM source text.
    pub fn render(&self) -> String {
        render(&self.code)
    }

    #[inline]
    pub fn global(&self) -> &SymbolTable {
        &self.tables[GLOBAL_TABLE]
    }
}

/// Compile a token sequence holding one class.
pub fn compile_tokens(tokens: Vec<Token>, library: &Library) -> Result<Compilation, ParseError> {
    Compiler::new(tokens, library).compile()
}

/// Subroutine currently being compiled.
#[derive(Debug)]
struct Routine {
    name: SmolStr,
    kind: SymbolKind,
    return_type: SmolStr,
    /// Whether the `function` instruction has been emitted.
    entered: bool,
}

pub struct Compiler {
    stream: TokenStream,
    tables: Vec<SymbolTable>,
    /// Index of the table new declarations and lookups go to first.
    current: usize,
    class_name: SmolStr,
    code: Vec<VmInstr>,
    if_labels: u16,
    while_labels: u16,
    routine: Option<Routine>,
}

impl Compiler {
    pub fn new(tokens: Vec<Token>, library: &Library) -> Self {
        let mut global = SymbolTable::new(GLOBAL_SCOPE);
        library.declare(&mut global);

        Self {
            stream: TokenStream::new(tokens),
            tables: vec![global],
            current: GLOBAL_TABLE,
            class_name: SmolStr::default(),
            code: vec![],
            if_labels: 0,
            while_labels: 0,
            routine: None,
        }
    }

    /// Compile the class and consume the compiler.
    ///
    /// Fails on the first error, which is either a malformed construct or
    /// a token left over after the class.
    pub fn compile(mut self) -> Result<Compilation, ParseError> {
        self.class()?;

        if let Some(token) = self.stream.peek() {
            return Err(crate::lex::unexpected("end of input", token));
        }

        Ok(Compilation {
            class_name: self.class_name,
            code: self.code,
            tables: self.tables,
        })
    }

    fn emit(&mut self, instr: VmInstr) {
        trace!("{}", instr);
        self.code.push(instr);
    }

    #[inline]
    fn emit_push(&mut self, symbol: &Symbol) {
        if let Some(segment) = symbol.kind.segment() {
            self.emit(VmInstr::Push(segment, symbol.slot));
        }
    }

    #[inline]
    fn emit_pop(&mut self, symbol: &Symbol) {
        if let Some(segment) = symbol.kind.segment() {
            self.emit(VmInstr::Pop(segment, symbol.slot));
        }
    }

    fn emit_call(&mut self, class: &str, name: &str, args: u16) {
        self.emit(VmInstr::Call(format!("{class}.{name}").into(), args));
    }
}

/// Scopes and symbols.
impl Compiler {
    #[inline]
    fn global(&self) -> &SymbolTable {
        &self.tables[GLOBAL_TABLE]
    }

    /// Allocate the local table of a subroutine and make it current.
    fn enter_subroutine(&mut self, name: SmolStr, kind: SymbolKind, return_type: SmolStr) {
        let scope = format!("{}.{}", self.class_name, name);
        debug!("entering {kind} {scope}");

        self.current = add_table(&mut self.tables, scope);
        let class_name = self.class_name.clone();
        // A new table always has room.
        let _ = self.tables[self.current].insert_receiver(&class_name, kind == SymbolKind::Method);

        self.routine = Some(Routine {
            name,
            kind,
            return_type,
            entered: false,
        });
    }

    /// Retire the current local table. It stays in the collection.
    fn leave_subroutine(&mut self) {
        if let Some(routine) = self.routine.take() {
            debug!("leaving {}.{}", self.class_name, routine.name);
        }
        self.current = GLOBAL_TABLE;
    }

    /// Emit the `function` instruction and prologue of the current
    /// subroutine, once all its locals are known.
    fn enter_body(&mut self) {
        let Some(routine) = self.routine.as_mut() else {
            return;
        };
        if routine.entered {
            return;
        }
        routine.entered = true;

        let kind = routine.kind;
        let name = format!("{}.{}", self.class_name, routine.name);
        let locals = self.tables[self.current].count(SymbolKind::Var) as u16;
        self.emit(VmInstr::Function(name.into(), locals));

        match kind {
            SymbolKind::Method => {
                self.emit(VmInstr::Push(Segment::Argument, 0));
                self.emit(VmInstr::Pop(Segment::Pointer, 0));
            }
            SymbolKind::Constructor => {
                let fields = self.global().field_count(&self.class_name) as u16;
                self.emit(VmInstr::Push(Segment::Constant, fields));
                self.emit_call("Memory", "alloc", 1);
                self.emit(VmInstr::Pop(Segment::Pointer, 0));
            }
            _ => {}
        }
    }

    /// Declare a symbol in the table at `table`, owned by the current class.
    fn declare(&mut self, table: usize, name: &Token, ty: SmolStr, kind: SymbolKind, class: Option<SmolStr>) -> Result<(), ParseError> {
        let target = &mut self.tables[table];
        if target.lookup(&name.text) && target.check_duplicate(&name.text, class.as_deref()) {
            return Err(duplicate(name, class.as_deref()));
        }
        if target.insert(name.text.clone(), ty, kind, class).is_none() {
            return Err(limit_exceeded(name.line, format!("too many symbols in scope {}", target.scope())));
        }
        Ok(())
    }

    fn declare_global(&mut self, name: &Token, ty: SmolStr, kind: SymbolKind, class: Option<SmolStr>) -> Result<(), ParseError> {
        self.declare(GLOBAL_TABLE, name, ty, kind, class)
    }

    fn declare_local(&mut self, name: &Token, ty: SmolStr, kind: SymbolKind) -> Result<(), ParseError> {
        let class = Some(self.class_name.clone());
        self.declare(self.current, name, ty, kind, class)
    }

    /// Look up a name in the current table, then the global table.
    fn resolve(&self, name: &str) -> Option<&Symbol> {
        symbol::resolve(&self.tables, self.current, name)
    }

    /// Look up a variable in the current table, then the global table,
    /// preferring those declared by the class being compiled.
    fn resolve_variable(&self, name: &str) -> Option<&Symbol> {
        symbol::resolve_variable(&self.tables, self.current, name, Some(self.class_name.as_str()))
    }

    /// Resolve an identifier that must name a variable.
    fn variable(&self, name: &Token) -> Result<Symbol, ParseError> {
        if let Some(symbol) = self.resolve_variable(&name.text) {
            return Ok(symbol.clone());
        }

        match self.resolve(&name.text) {
            Some(symbol) => Err(ParseError::new(
                ParseErrorKind::Undeclared(name.text.clone()),
                name.line,
                format!("expected variable, got {} {}", symbol.kind, name.text),
            )),
            None => Err(undeclared(name)),
        }
    }

    /// Static variable `name` declared by `class`.
    fn class_static(&self, class: &str, name: &str) -> Option<Symbol> {
        self.global()
            .symbols()
            .iter()
            .find(|symbol| symbol.kind == SymbolKind::Static && symbol.name == name && symbol.class.as_deref() == Some(class))
            .cloned()
    }
}

/// Labels and type checks.
impl Compiler {
    fn next_if_label(&mut self) -> Result<u16, ParseError> {
        let line = self.stream.line();
        bump(&mut self.if_labels, "if statements", line)
    }

    fn next_while_label(&mut self) -> Result<u16, ParseError> {
        let line = self.stream.line();
        bump(&mut self.while_labels, "while statements", line)
    }

    fn check_type(&self, expected: &str, found: &Operand, line: u32) -> Result<(), ParseError> {
        if is_compatible(self.global(), expected, found) {
            Ok(())
        } else {
            Err(mismatch(expected, found, line))
        }
    }

    fn check_index(&self, index: &Operand, line: u32) -> Result<(), ParseError> {
        match index.ty.as_deref() {
            None | Some(INT) => Ok(()),
            Some(_) => Err(mismatch(INT, index, line)),
        }
    }
}

/// Increment a counter and return its previous value.
fn bump(counter: &mut u16, what: &str, line: u32) -> Result<u16, ParseError> {
    let n = *counter;
    *counter = n
        .checked_add(1)
        .ok_or_else(|| limit_exceeded(line, format!("too many {what}")))?;
    Ok(n)
}

#[inline(never)]
#[cold]
fn duplicate(name: &Token, class: Option<&str>) -> ParseError {
    let message = match class {
        Some(class) => format!("'{}' is already declared in {}", name.text, class),
        None => format!("'{}' is already declared", name.text),
    };
    ParseError::new(ParseErrorKind::Duplicate(name.text.clone()), name.line, message)
}

#[inline(never)]
#[cold]
fn undeclared(name: &Token) -> ParseError {
    ParseError::new(
        ParseErrorKind::Undeclared(name.text.clone()),
        name.line,
        format!("'{}' is not declared", name.text),
    )
}

#[inline(never)]
#[cold]
fn mismatch(expected: &str, found: &Operand, line: u32) -> ParseError {
    let message = match &found.symbol {
        Some(symbol) => format!(
            "type mismatch, expected {}, got {} {} '{}'",
            expected,
            found.type_name(),
            symbol.kind,
            symbol.name
        ),
        None => format!("type mismatch, expected {}, got {}", expected, found.type_name()),
    };
    ParseError::new(
        ParseErrorKind::TypeMismatch {
            expected: expected.into(),
            found: found.type_name().into(),
        },
        line,
        message,
    )
}

#[inline(never)]
#[cold]
fn limit_exceeded(line: u32, message: String) -> ParseError {
    ParseError::new(ParseErrorKind::LimitExceeded, line, message)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bump() {
        let mut counter = 0;
        assert_eq!(bump(&mut counter, "labels", 1), Ok(0));
        assert_eq!(bump(&mut counter, "labels", 1), Ok(1));
        assert_eq!(counter, 2);

        let mut counter = u16::MAX;
        let err = bump(&mut counter, "labels", 7).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::LimitExceeded);
        assert_eq!(err.line, 7);
        assert_eq!(counter, u16::MAX);
    }

    #[test]
    fn test_label_counters_exhausted() {
        let library = Library::default();
        let mut compiler = Compiler::new(vec![], &library);
        compiler.if_labels = u16::MAX - 1;
        assert_eq!(compiler.next_if_label(), Ok(u16::MAX - 1));
        assert_eq!(compiler.next_if_label().unwrap_err().kind, ParseErrorKind::LimitExceeded);

        compiler.while_labels = u16::MAX;
        assert_eq!(compiler.next_while_label().unwrap_err().kind, ParseErrorKind::LimitExceeded);
    }

    #[test]
    fn test_mismatch_names_variable() {
        let mut table = SymbolTable::new("Main.main");
        let flag = table.insert("flag", "boolean", SymbolKind::Var, None).unwrap().clone();

        let err = mismatch("int", &Operand::variable(flag), 3);
        assert_eq!(err.message, "type mismatch, expected int, got boolean var 'flag'");

        let err = mismatch("int", &Operand::typed("string"), 3);
        assert_eq!(err.message, "type mismatch, expected int, got string");
    }
}
