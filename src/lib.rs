// Mon Aug 24 2026 - Alex
//
// Resolves the exported entry point in a compiled binary that matches a
// source-level C++ declaration, given only its class, name and
// parameter/qualifier signature. Raw ELF32/64 and PE32/32+ symbol-table
// extraction plus tokenized matching of demangled declarations; turning
// a resolved mangled name into a callable address is the OS loader's
// job, not ours.

pub mod binary;
pub mod catalog;
pub mod matcher;
pub mod resolver;

pub use binary::{BinaryError, BinaryFormat, Image, ImageSymbol, Section, SectionFlags};
pub use catalog::{CatalogEntry, SymbolCatalog};
pub use matcher::{CppAbi, SignatureMatcher};
pub use resolver::{ConstructorSymbols, DestructorSymbols, Signature, SymbolResolver};
