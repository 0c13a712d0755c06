// Sat Aug 22 2026 - Alex

use symbolic_common::{Language, Name, NameMangling};
use symbolic_demangle::{Demangle, DemangleOptions};

pub fn is_mangled(name: &str) -> bool {
    name.starts_with("_Z") || name.starts_with("__Z") || name.starts_with('?')
}

/// Demangle a C++ (Itanium or MSVC) symbol with its full argument list,
/// which the signature matcher needs for tokenizing.
pub fn demangle(name: &str) -> Option<String> {
    if !is_mangled(name) {
        return None;
    }
    let name = Name::new(name, NameMangling::Mangled, Language::Cpp);
    name.demangle(DemangleOptions::complete())
}

/// Demangling failures keep the raw name, so plain C exports stay
/// matchable as functions with their linker-visible spelling.
pub fn demangle_or_raw(name: &str) -> String {
    demangle(name).unwrap_or_else(|| name.to_string())
}
