//! Constant values of the Jack language and its virtual machine.

/// Version of this compiler.
pub const IMPL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extension of Jack source files, without the leading dot.
pub const SOURCE_EXTENSION: &str = "jack";

/// File extension of generated VM code, without the leading dot.
pub const OUTPUT_EXTENSION: &str = "vm";

/// Default name of the configuration file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "jackc.yaml";

/// Largest integer constant the VM can push.
///
/// Constants are 15-bit unsigned values; negative numbers are
/// produced at runtime with `neg`.
pub const MAX_INT_CONSTANT: u16 = 32767;

/// Scope label of the global symbol table.
pub const GLOBAL_SCOPE: &str = "global";

/// Index of the global symbol table in the table collection.
pub const GLOBAL_TABLE: usize = 0;

/// Name of the implicit receiver argument.
pub const THIS: &str = "this";

/// Return type of subroutines that don't return a value.
pub const VOID: &str = "void";

/// Type of integer expressions.
pub const INT: &str = "int";

/// Type of boolean expressions.
pub const BOOLEAN: &str = "boolean";

/// Type of character literals.
pub const CHAR: &str = "char";

/// Type of string literals.
pub const STRING: &str = "string";

/// Type of the `null` literal.
pub const NULL: &str = "null";

/// Declared type recorded for class symbols.
pub const CLASS_TYPE: &str = "None";
