// Sat Aug 22 2026 - Alex

pub mod demangle;

use crate::binary::Image;
use indexmap::IndexMap;
use serde::Serialize;
use std::any::TypeId;

/// One symbol-table row: the linker-visible name and its demangled text.
/// Order follows the symbol table; duplicates are kept as-is.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub mangled: String,
    pub demangled: String,
}

/// All (mangled, demangled) pairs for one binary snapshot, plus the
/// caller-registered type-name overrides. Immutable per snapshot apart
/// from alias registration; a reload is a new catalog, never an in-place
/// merge.
#[derive(Debug, Default)]
pub struct SymbolCatalog {
    entries: Vec<CatalogEntry>,
    aliases: IndexMap<TypeId, String>,
}

impl SymbolCatalog {
    pub fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut entries = Vec::new();
        for name in names {
            let mangled = name.as_ref();
            if mangled.is_empty() {
                continue;
            }
            entries.push(CatalogEntry {
                mangled: mangled.to_string(),
                demangled: demangle::demangle_or_raw(mangled),
            });
        }
        log::debug!("catalog built with {} entries", entries.len());
        Self {
            entries,
            aliases: IndexMap::new(),
        }
    }

    pub fn from_image(image: &Image) -> Self {
        Self::from_names(image.symbols.iter().map(|s| s.name.as_str()))
    }

    /// Register `name` as the printed spelling of `T` for this catalog.
    /// Used when a type only exists inside the target library and the
    /// local pretty name would not match the demangler's output.
    /// Re-registering the same type replaces the previous spelling.
    pub fn add_alias<T: 'static>(&mut self, name: impl Into<String>) {
        self.aliases.insert(TypeId::of::<T>(), name.into());
    }

    pub fn alias_for(&self, id: TypeId) -> Option<&str> {
        self.aliases.get(&id).map(String::as_str)
    }

    pub fn type_name_of<T: 'static>(&self) -> String {
        self.alias_for(TypeId::of::<T>())
            .map(str::to_string)
            .unwrap_or_else(pretty_type_name::<T>)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose demangled text differs from the mangled name, i.e.
    /// everything the demangler actually understood.
    pub fn demangled_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.demangled != e.mangled)
            .count()
    }
}

/// C++-facing spelling for a Rust type: fixed-width integers map to the
/// LP64 C++ keywords, everything else keeps its identifier with Rust
/// module paths stripped (aliases cover namespaced C++ types).
pub fn pretty_type_name<T: 'static>() -> String {
    let raw = std::any::type_name::<T>();
    match raw {
        "()" => "void".to_string(),
        "bool" => "bool".to_string(),
        "i8" => "signed char".to_string(),
        "u8" => "unsigned char".to_string(),
        "i16" => "short".to_string(),
        "u16" => "unsigned short".to_string(),
        "i32" => "int".to_string(),
        "u32" => "unsigned int".to_string(),
        "i64" | "isize" => "long".to_string(),
        "u64" | "usize" => "unsigned long".to_string(),
        "f32" => "float".to_string(),
        "f64" => "double".to_string(),
        other => trim_module_paths(other),
    }
}

fn trim_module_paths(name: &str) -> String {
    let mut out = String::new();
    let mut segment = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
    out
}
