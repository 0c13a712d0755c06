// Sun Aug 23 2026 - Alex

pub mod itanium;
pub mod msvc;
pub mod tokenizer;

use crate::catalog::{CatalogEntry, SymbolCatalog};

/// Which name-decoration scheme the target library was built with. One
/// value per resolver, chosen up front; the two token grammars are never
/// mixed within a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CppAbi {
    Itanium,
    Msvc,
}

impl CppAbi {
    pub fn host() -> Self {
        if cfg!(windows) {
            CppAbi::Msvc
        } else {
            CppAbi::Itanium
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtorVariant {
    /// C0: allocating constructor.
    Allocating,
    /// C1: complete-object constructor.
    Complete,
    /// C2: base-object constructor.
    Base,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtorVariant {
    /// D0: deleting destructor.
    Deleting,
    /// D1: complete-object destructor.
    Complete,
    /// D2: base-object destructor.
    Base,
}

/// Mangled names for each constructor entry point found for one class
/// and parameter list. First catalog-order match per slot.
#[derive(Debug, Clone, Default)]
pub struct CtorMatches {
    pub allocating: Option<String>,
    pub complete: Option<String>,
    pub base: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DtorMatches {
    pub deleting: Option<String>,
    pub complete: Option<String>,
    pub base: Option<String>,
}

/// Equality over whitespace-separated keyword sets, so
/// `"unsigned int"` equals `"int unsigned"` while `"int"` and `"long"`
/// stay distinct. Tolerates qualifier-ordering differences between
/// compilers at the cost of conflating reordered multi-word types; the
/// first catalog-order match wins such collisions silently.
pub fn word_set_eq(a: &str, b: &str) -> bool {
    let mut wa: Vec<&str> = a.split_whitespace().collect();
    let mut wb: Vec<&str> = b.split_whitespace().collect();
    wa.sort_unstable();
    wb.sort_unstable();
    wa == wb
}

/// The candidate's qualified name matches when its trailing `::`
/// component chain equals the expected name, so `"foo"` accepts
/// `ns::foo` but never `ns::foobar`.
pub fn name_matches(token: &str, expected: &str) -> bool {
    token == expected
        || token
            .strip_suffix(expected)
            .is_some_and(|prefix| prefix.ends_with("::"))
}

pub fn unscoped_name(class: &str) -> &str {
    class.rsplit("::").next().unwrap_or(class)
}

/// Scans a catalog for entries structurally matching a requested
/// signature under one ABI's token grammar. Always returns the first
/// satisfying entry in catalog order.
pub struct SignatureMatcher<'a> {
    catalog: &'a SymbolCatalog,
    abi: CppAbi,
}

impl<'a> SignatureMatcher<'a> {
    pub fn new(catalog: &'a SymbolCatalog, abi: CppAbi) -> Self {
        Self { catalog, abi }
    }

    pub fn abi(&self) -> CppAbi {
        self.abi
    }

    fn scan<F>(&self, mut matches: F) -> Option<&'a CatalogEntry>
    where
        F: FnMut(&[String]) -> bool,
    {
        self.catalog
            .entries()
            .iter()
            .find(|entry| matches(&tokenizer::tokenize(&entry.demangled)))
    }

    pub fn find_function(&self, name: &str, params: &[String]) -> Option<&'a CatalogEntry> {
        self.scan(|tokens| match self.abi {
            CppAbi::Itanium => itanium::match_function(tokens, name, params),
            CppAbi::Msvc => msvc::match_function(tokens, name, params),
        })
    }

    pub fn find_mem_fn(
        &self,
        class: &str,
        name: &str,
        params: &[String],
        is_const: bool,
        is_volatile: bool,
    ) -> Option<&'a CatalogEntry> {
        self.scan(|tokens| match self.abi {
            CppAbi::Itanium => {
                itanium::match_mem_fn(tokens, class, name, params, is_const, is_volatile)
            }
            CppAbi::Msvc => msvc::match_mem_fn(tokens, class, name, params, is_const, is_volatile),
        })
    }

    pub fn find_constructors(&self, class: &str, params: &[String]) -> CtorMatches {
        let unscoped = unscoped_name(class);
        let mut found = CtorMatches::default();

        for entry in self.catalog.entries() {
            let tokens = tokenizer::tokenize(&entry.demangled);
            let matched = match self.abi {
                CppAbi::Itanium => itanium::match_constructor(&tokens, class, params),
                CppAbi::Msvc => msvc::match_constructor(&tokens, class, params),
            };
            if !matched {
                continue;
            }

            let variant = match self.abi {
                CppAbi::Itanium => itanium::classify_ctor(&entry.mangled, unscoped),
                CppAbi::Msvc => msvc::classify_ctor(&entry.mangled),
            };
            let slot = match variant {
                Some(CtorVariant::Allocating) => &mut found.allocating,
                Some(CtorVariant::Complete) => &mut found.complete,
                Some(CtorVariant::Base) => &mut found.base,
                None => {
                    log::debug!(
                        "constructor symbol {} carries no variant marker",
                        entry.mangled
                    );
                    &mut found.complete
                }
            };
            if slot.is_none() {
                *slot = Some(entry.mangled.clone());
            }
        }
        found
    }

    pub fn find_destructors(&self, class: &str) -> DtorMatches {
        let mut found = DtorMatches::default();

        for entry in self.catalog.entries() {
            let tokens = tokenizer::tokenize(&entry.demangled);
            let matched = match self.abi {
                CppAbi::Itanium => itanium::match_destructor(&tokens, class),
                CppAbi::Msvc => msvc::match_destructor(&tokens, class),
            };
            if !matched {
                continue;
            }

            let variant = match self.abi {
                CppAbi::Itanium => itanium::classify_dtor(&entry.mangled),
                CppAbi::Msvc => msvc::classify_dtor(&entry.mangled),
            };
            let slot = match variant {
                Some(DtorVariant::Deleting) => &mut found.deleting,
                Some(DtorVariant::Complete) => &mut found.complete,
                Some(DtorVariant::Base) => &mut found.base,
                None => &mut found.complete,
            };
            if slot.is_none() {
                *slot = Some(entry.mangled.clone());
            }
        }
        found
    }
}
