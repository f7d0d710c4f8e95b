//! Predeclared library symbols.
//!
//! A library descriptor declares classes and subroutines that exist
//! outside the compilation unit, one symbol per line:
//!
//! ```text
//! name,type,kind,owning class
//! ```
//!
//! The owning class is `null` for symbols without one. Blank lines and
//! lines starting with `#` are ignored.
use log::{debug, warn};
use smol_str::SmolStr;
use std::{fs, path::Path};

use crate::{
    error::{JackError, JackResult},
    symbol::{SymbolKind, SymbolTable},
};

/// Descriptor of the Jack standard library.
pub const STDLIB: &str = include_str!("../lib/stdlib.txt");

/// Entries that fit in an empty symbol table.
const MAX_ENTRIES: usize = u16::MAX as usize;

/// A single parsed descriptor line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub name: SmolStr,
    pub ty: SmolStr,
    pub kind: SymbolKind,
    pub class: Option<SmolStr>,
}

/// Parsed library descriptor, ready to seed a global symbol table.
#[derive(Debug, Clone, Default)]
pub struct Library {
    entries: Vec<LibraryEntry>,
}

impl Library {
    /// The bundled standard library.
    pub fn stdlib() -> JackResult<Self> {
        Self::parse(STDLIB)
    }

    pub fn from_file(path: impl AsRef<Path>) -> JackResult<Self> {
        let path = path.as_ref();
        debug!("loading library descriptor {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Load the library at the given path, or the standard library when none is given.
    pub fn load(path: Option<&Path>) -> JackResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::stdlib(),
        }
    }

    pub fn parse(text: &str) -> JackResult<Self> {
        let mut entries = vec![];

        for (index, line) in text.lines().enumerate() {
            let line_number = index as u32 + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if entries.len() >= MAX_ENTRIES {
                return Err(library_error(line_number, format!("more than {MAX_ENTRIES} entries")));
            }
            entries.push(parse_entry(line, line_number)?);
        }

        Ok(Self { entries })
    }

    #[inline]
    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    /// Insert every entry into the given table, in descriptor order.
    ///
    /// Stops early when the table is full.
    pub fn declare(&self, table: &mut SymbolTable) {
        for entry in &self.entries {
            if table.insert(entry.name.clone(), entry.ty.clone(), entry.kind, entry.class.clone()).is_none() {
                warn!("symbol table {} is full, {} and later entries not declared", table.scope(), entry.name);
                break;
            }
        }
    }
}

fn parse_entry(line: &str, line_number: u32) -> JackResult<LibraryEntry> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    let &[name, ty, kind, class] = fields.as_slice() else {
        return Err(library_error(
            line_number,
            format!("expected 4 comma separated fields, got {}", fields.len()),
        ));
    };

    if name.is_empty() || ty.is_empty() {
        return Err(library_error(line_number, "name and type can't be empty"));
    }

    let kind = SymbolKind::parse(kind).ok_or_else(|| library_error(line_number, format!("unknown symbol kind '{kind}'")))?;

    let class = match class {
        "null" => None,
        "" => return Err(library_error(line_number, "owning class can't be empty, use null")),
        class => Some(SmolStr::from(class)),
    };

    Ok(LibraryEntry {
        name: name.into(),
        ty: ty.into(),
        kind,
        class,
    })
}

#[inline(never)]
#[cold]
fn library_error(line: u32, message: impl ToString) -> JackError {
    JackError::Library {
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stdlib_parses() {
        let library = Library::stdlib().unwrap();
        let classes: Vec<&str> = library
            .entries()
            .iter()
            .filter(|entry| entry.kind == SymbolKind::Class)
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(
            classes,
            vec!["Math", "String", "Array", "Output", "Screen", "Keyboard", "Memory", "Sys"]
        );
    }

    #[test]
    fn test_declare_into_table() {
        let library = Library::parse("Math,None,class,null\nabs,int,function,Math\n").unwrap();
        let mut table = SymbolTable::new("global");
        library.declare(&mut table);

        let math = table.get_symbol("Math").unwrap();
        assert_eq!(math.kind, SymbolKind::Class);
        assert_eq!(math.class, None);

        let abs = table.get_symbol("abs").unwrap();
        assert_eq!(abs.ty, "int");
        assert_eq!(abs.class.as_deref(), Some("Math"));
        assert_eq!(abs.offset, 1);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let library = Library::parse("# header\n\n  \nSys,None,class,null\n").unwrap();
        assert_eq!(library.entries().len(), 1);
    }

    #[test]
    fn test_malformed_lines() {
        match Library::parse("Math,None,class,null\nabs,int,function") {
            Err(JackError::Library { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {other:?}"),
        }
        match Library::parse("abs,int,procedure,Math") {
            Err(JackError::Library { line, message }) => {
                assert_eq!(line, 1);
                assert!(message.contains("procedure"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_too_many_entries() {
        let text = "x,int,static,Main\n".repeat(MAX_ENTRIES + 1);
        match Library::parse(&text) {
            Err(JackError::Library { line, .. }) => assert_eq!(line as usize, MAX_ENTRIES + 1),
            other => panic!("unexpected result: {:?}", other.map(|library| library.entries().len())),
        }

        let library = Library::parse(&"x,int,static,Main\n".repeat(MAX_ENTRIES)).unwrap();
        let mut table = SymbolTable::new("global");
        library.declare(&mut table);
        assert_eq!(table.symbols().len(), MAX_ENTRIES);
    }
}
