//! Expression types.
use smol_str::SmolStr;

use crate::symbol::{Symbol, SymbolKind, SymbolTable};

/// Result of compiling an expression.
///
/// The code computing the value has already been emitted, this only
/// describes what was left on the stack.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Operand {
    /// Inferred type, `None` when it can't be known at compile time.
    pub ty: Option<SmolStr>,
    /// Variable the value was read from, when it is a plain variable.
    pub symbol: Option<Symbol>,
}

impl Operand {
    pub fn typed(ty: impl Into<SmolStr>) -> Self {
        Self {
            ty: Some(ty.into()),
            symbol: None,
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn variable(symbol: Symbol) -> Self {
        Self {
            ty: Some(symbol.ty.clone()),
            symbol: Some(symbol),
        }
    }

    /// Keep the type of this operand but drop its symbol.
    pub fn to_value(&self) -> Self {
        Self {
            ty: self.ty.clone(),
            symbol: None,
        }
    }

    /// Type name for diagnostics.
    pub fn type_name(&self) -> &str {
        self.ty.as_deref().unwrap_or("unknown")
    }
}

/// Whether a value of the operand's type can be stored where `expected` is declared.
///
/// Identical types are compatible, as are operands of unknown type. Variables
/// declared with a class type accept any value, since objects, arrays and
/// `null` are all plain references to the machine.
pub fn is_compatible(global: &SymbolTable, expected: &str, found: &Operand) -> bool {
    let Some(found) = found.ty.as_deref() else {
        return true;
    };

    expected == found
        || global
            .symbols()
            .iter()
            .any(|symbol| symbol.kind == SymbolKind::Class && symbol.name == expected)
}
