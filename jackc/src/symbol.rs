//! Symbol tables.
use smol_str::SmolStr;
use std::fmt;

use crate::{compile::Segment, constants::GLOBAL_TABLE};

/// Storage or declaration kind of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Static,
    Field,
    /// Subroutine local variable.
    Var,
    Argument,
    Function,
    Method,
    Constructor,
    Class,
}

impl SymbolKind {
    /// Number of symbol kinds, used to size the slot counters.
    const COUNT: usize = 8;

    #[rustfmt::skip]
    pub fn parse(text: impl AsRef<str>) -> Option<Self> {
        match text.as_ref() {
            "static"      => Some(Self::Static),
            "field"       => Some(Self::Field),
            "var"         => Some(Self::Var),
            "argument"    => Some(Self::Argument),
            "function"    => Some(Self::Function),
            "method"      => Some(Self::Method),
            "constructor" => Some(Self::Constructor),
            "class"       => Some(Self::Class),
            _ => None,
        }
    }

    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static      => "static",
            Self::Field       => "field",
            Self::Var         => "var",
            Self::Argument    => "argument",
            Self::Function    => "function",
            Self::Method      => "method",
            Self::Constructor => "constructor",
            Self::Class       => "class",
        }
    }

    /// Memory segment variables of this kind are stored in.
    ///
    /// Subroutines and classes have no storage.
    #[rustfmt::skip]
    pub fn segment(&self) -> Option<Segment> {
        match self {
            Self::Static   => Some(Segment::Static),
            Self::Field    => Some(Segment::This),
            Self::Var      => Some(Segment::Local),
            Self::Argument => Some(Segment::Argument),
            _ => None,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: SmolStr,
    /// Declared type. For subroutines this is the return type.
    pub ty: SmolStr,
    pub kind: SymbolKind,
    /// Class the symbol was declared in. `None` for classes
    /// and symbols without an owner.
    pub class: Option<SmolStr>,
    /// Insertion position within the table, shared by all kinds.
    pub offset: u16,
    /// Index within the symbol's memory segment.
    pub slot: u16,
}

/// Ordered registry of declared names for one scope.
///
/// Lookups are linear and return the first symbol inserted under a name.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scope: SmolStr,
    /// Next offset, shared across symbol kinds.
    offset: u16,
    /// Next slot for each symbol kind.
    slots: [u16; SymbolKind::COUNT],
}

impl SymbolTable {
    pub fn new(scope: impl Into<SmolStr>) -> Self {
        Self {
            symbols: vec![],
            scope: scope.into(),
            offset: 0,
            slots: [0; SymbolKind::COUNT],
        }
    }

    /// Append a symbol, assigning it the next offset and the next
    /// slot of its kind.
    ///
    /// Returns `None` when the table has run out of offsets or slots.
    /// Doesn't check for duplicates, see [`SymbolTable::check_duplicate`].
    pub fn insert(&mut self, name: impl Into<SmolStr>, ty: impl Into<SmolStr>, kind: SymbolKind, class: Option<SmolStr>) -> Option<&Symbol> {
        let slot = self.slots[kind.index()];
        let next_slot = slot.checked_add(1)?;
        if self.offset == u16::MAX {
            return None;
        }
        self.slots[kind.index()] = next_slot;
        self.push(Symbol {
            name: name.into(),
            ty: ty.into(),
            kind,
            class,
            offset: self.offset,
            slot,
        })
    }

    /// Record the implicit `this` argument of a subroutine.
    ///
    /// The receiver only occupies an argument slot in methods. In functions
    /// and constructors the symbol exists for lookups, and declared
    /// parameters still start at argument 0.
    pub fn insert_receiver(&mut self, class: &SmolStr, occupies_slot: bool) -> Option<&Symbol> {
        if occupies_slot {
            return self.insert(crate::constants::THIS, class.clone(), SymbolKind::Argument, Some(class.clone()));
        }

        let slot = self.slots[SymbolKind::Argument.index()];
        self.push(Symbol {
            name: SmolStr::new_inline(crate::constants::THIS),
            ty: class.clone(),
            kind: SymbolKind::Argument,
            class: Some(class.clone()),
            offset: self.offset,
            slot,
        })
    }

    fn push(&mut self, symbol: Symbol) -> Option<&Symbol> {
        self.offset = self.offset.checked_add(1)?;
        self.symbols.push(symbol);
        self.symbols.last()
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> bool {
        self.symbols.iter().any(|symbol| symbol.name == name)
    }

    #[inline]
    pub fn get_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.name == name)
    }

    /// Variable with the given name, preferring one declared by `class`.
    ///
    /// Subroutines and classes share the namespace but have no storage,
    /// so they are skipped.
    pub fn get_variable(&self, name: &str, class: Option<&str>) -> Option<&Symbol> {
        let mut variables = self
            .symbols
            .iter()
            .filter(|symbol| symbol.name == name && symbol.kind.segment().is_some());
        let first = variables.next()?;
        if first.class.as_deref() == class {
            return Some(first);
        }
        variables.find(|symbol| symbol.class.as_deref() == class).or(Some(first))
    }

    /// Whether a symbol with the given name was declared by the given class.
    pub fn check_duplicate(&self, name: &str, class: Option<&str>) -> bool {
        self.symbols
            .iter()
            .filter(|symbol| symbol.name == name)
            .any(|symbol| symbol.class.as_deref() == class)
    }

    #[inline]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of offsets handed out so far.
    #[inline]
    pub fn offset_count(&self) -> u16 {
        self.offset
    }

    #[inline]
    pub fn scope(&self) -> &str {
        self.scope.as_str()
    }

    /// Number of symbols of the given kind.
    pub fn count(&self, kind: SymbolKind) -> usize {
        self.symbols.iter().filter(|symbol| symbol.kind == kind).count()
    }

    /// Number of fields the given class declared in this table.
    pub fn field_count(&self, class: &str) -> usize {
        self.symbols
            .iter()
            .filter(|symbol| symbol.kind == SymbolKind::Field && symbol.class.as_deref() == Some(class))
            .count()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[{}]", self.scope)?;
        for symbol in &self.symbols {
            writeln!(
                f,
                "{:>4}  {:<16}  {:<12}  {:<12}  {:<12}  {}",
                symbol.offset,
                symbol.name,
                symbol.ty,
                symbol.kind,
                symbol.class.as_deref().unwrap_or("null"),
                symbol.slot,
            )?;
        }
        Ok(())
    }
}

/// Append a new table to the collection and return its index.
pub fn add_table(tables: &mut Vec<SymbolTable>, scope: impl Into<SmolStr>) -> usize {
    tables.push(SymbolTable::new(scope));
    tables.len() - 1
}

/// Resolve a name in the current table first, then in the global table.
pub fn resolve<'a>(tables: &'a [SymbolTable], current: usize, name: &str) -> Option<&'a Symbol> {
    tables
        .get(current)
        .and_then(|table| table.get_symbol(name))
        .or_else(|| tables.get(GLOBAL_TABLE).and_then(|table| table.get_symbol(name)))
}

/// Resolve a variable in the current table first, then in the global table.
///
/// Unlike [`resolve`], names declared only as subroutines or classes
/// don't match, even when they come first in a table.
pub fn resolve_variable<'a>(tables: &'a [SymbolTable], current: usize, name: &str, class: Option<&str>) -> Option<&'a Symbol> {
    tables
        .get(current)
        .and_then(|table| table.get_variable(name, class))
        .or_else(|| tables.get(GLOBAL_TABLE).and_then(|table| table.get_variable(name, class)))
}
