// Mon Aug 24 2026 - Alex

use crate::binary::{BinaryError, Image};
use crate::catalog::{pretty_type_name, SymbolCatalog};
use crate::matcher::{CppAbi, SignatureMatcher};
use memmap2::Mmap;
use serde::Serialize;
use std::any::TypeId;
use std::fs::File;
use std::path::Path;

/// A requested parameter list plus member-function qualifiers, built up
/// before querying. Typed parameters are resolved against the catalog's
/// alias table at query time, so a `Signature` can be constructed before
/// the library is even loaded.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    params: Vec<SigParam>,
    is_const: bool,
    is_volatile: bool,
}

#[derive(Debug, Clone)]
enum SigParam {
    Named(String),
    Typed {
        id: TypeId,
        fallback: String,
    },
    /// Typed parameter with a pointer/reference suffix appended to
    /// whichever spelling wins.
    Wrapped {
        id: TypeId,
        fallback: String,
        suffix: &'static str,
    },
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameter spelled exactly as the demangler prints it
    /// (word order aside).
    pub fn arg_name(mut self, name: impl Into<String>) -> Self {
        self.params.push(SigParam::Named(name.into()));
        self
    }

    /// Parameter identified by a Rust type; the catalog alias for the
    /// type wins over its default spelling.
    pub fn arg<T: 'static>(mut self) -> Self {
        self.params.push(SigParam::Typed {
            id: TypeId::of::<T>(),
            fallback: pretty_type_name::<T>(),
        });
        self
    }

    pub fn arg_ptr<T: 'static>(self) -> Self {
        let fallback = format!("{}*", pretty_type_name::<T>());
        self.wrapped_arg::<T>(fallback, "*")
    }

    pub fn arg_ref<T: 'static>(self) -> Self {
        let fallback = format!("{}&", pretty_type_name::<T>());
        self.wrapped_arg::<T>(fallback, "&")
    }

    /// GNU demanglers print the qualifier after the type
    /// (`Widget const&`), so the helper follows that spelling.
    pub fn arg_const_ref<T: 'static>(self) -> Self {
        let fallback = format!("{} const&", pretty_type_name::<T>());
        self.wrapped_arg::<T>(fallback, " const&")
    }

    fn wrapped_arg<T: 'static>(mut self, fallback: String, suffix: &'static str) -> Self {
        self.params.push(SigParam::Wrapped {
            id: TypeId::of::<T>(),
            fallback,
            suffix,
        });
        self
    }

    pub fn const_qualified(mut self, value: bool) -> Self {
        self.is_const = value;
        self
    }

    pub fn volatile_qualified(mut self, value: bool) -> Self {
        self.is_volatile = value;
        self
    }

    fn resolve(&self, catalog: &SymbolCatalog) -> Vec<String> {
        self.params
            .iter()
            .map(|p| match p {
                SigParam::Named(name) => name.clone(),
                SigParam::Typed { id, fallback } => catalog
                    .alias_for(*id)
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback.clone()),
                SigParam::Wrapped { id, fallback, suffix } => catalog
                    .alias_for(*id)
                    .map(|name| format!("{}{}", name, suffix))
                    .unwrap_or_else(|| fallback.clone()),
            })
            .collect()
    }
}

/// The constructor entry points resolvable for one class/signature.
/// `standard` is the complete-object constructor; `allocating` is only
/// present when the library also carries a second entry point.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConstructorSymbols {
    pub standard: Option<String>,
    pub allocating: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DestructorSymbols {
    pub standard: Option<String>,
    pub deleting: Option<String>,
}

/// Front door for the loader: owns the parsed image snapshot and the
/// symbol catalog, and answers signature queries with mangled names.
/// Absence is `None`, never an error, so probing for optional symbols
/// stays distinguishable from "the file is not a recognized binary"
/// (which fails at load time).
///
/// A resolver is immutable once built apart from alias registration, so
/// sharing it for concurrent matching needs no locking; reloading means
/// building and publishing a new instance.
pub struct SymbolResolver {
    image: Image,
    catalog: SymbolCatalog,
    abi: CppAbi,
}

impl SymbolResolver {
    /// Map and parse the file. The mapping is dropped before this
    /// returns; no handle to the file outlives the parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BinaryError> {
        let file = File::open(path.as_ref())?;
        let mmap = unsafe { Mmap::map(&file)? };
        let resolver = Self::from_bytes(&mmap);
        if let Ok(resolver) = &resolver {
            log::info!(
                "loaded {} ({} sections, {} symbols)",
                path.as_ref().display(),
                resolver.image.sections.len(),
                resolver.catalog.len()
            );
        }
        resolver
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, BinaryError> {
        let image = Image::parse(data)?;
        let catalog = SymbolCatalog::from_image(&image);
        Ok(Self {
            image,
            catalog,
            abi: CppAbi::host(),
        })
    }

    /// Override the ABI grammar, e.g. when inspecting a Windows library
    /// from a POSIX host.
    pub fn with_abi(mut self, abi: CppAbi) -> Self {
        self.abi = abi;
        self
    }

    pub fn abi(&self) -> CppAbi {
        self.abi
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    /// Alias registration happens between load and matching; see
    /// [`SymbolCatalog::add_alias`].
    pub fn catalog_mut(&mut self) -> &mut SymbolCatalog {
        &mut self.catalog
    }

    pub fn sections(&self) -> Vec<String> {
        self.image.section_names()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.image.symbol_names()
    }

    pub fn symbols_in(&self, section: &str) -> Result<Vec<String>, BinaryError> {
        self.image.symbols_in(section)
    }

    fn matcher(&self) -> SignatureMatcher<'_> {
        SignatureMatcher::new(&self.catalog, self.abi)
    }

    /// Mangled name of the first free (or statically scoped) function
    /// matching `name` and the signature's parameter list.
    pub fn get_function(&self, name: &str, signature: &Signature) -> Option<String> {
        let params = signature.resolve(&self.catalog);
        self.matcher()
            .find_function(name, &params)
            .map(|entry| entry.mangled.clone())
    }

    pub fn get_mem_fn(&self, class: &str, name: &str, signature: &Signature) -> Option<String> {
        let params = signature.resolve(&self.catalog);
        self.matcher()
            .find_mem_fn(
                class,
                name,
                &params,
                signature.is_const,
                signature.is_volatile,
            )
            .map(|entry| entry.mangled.clone())
    }

    pub fn get_constructor(&self, class: &str, signature: &Signature) -> ConstructorSymbols {
        let params = signature.resolve(&self.catalog);
        let found = self.matcher().find_constructors(class, &params);
        ConstructorSymbols {
            standard: found.complete,
            allocating: found.allocating.or(found.base),
        }
    }

    pub fn get_destructor(&self, class: &str) -> DestructorSymbols {
        let found = self.matcher().find_destructors(class);
        DestructorSymbols {
            standard: found.complete.or(found.base),
            deleting: found.deleting,
        }
    }
}
