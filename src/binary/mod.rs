// Thu Aug 20 2026 - Alex

pub mod bytes;
pub mod elf;
pub mod error;
pub mod pe;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::BinaryError;

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SectionFlags: u32 {
        const ALLOC = 0x1;
        const WRITE = 0x2;
        const EXEC = 0x4;
    }
}

/// One named region of the image, normalized across formats.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub name: String,
    pub addr: u64,
    pub offset: u64,
    pub size: u64,
    /// Position in the format's own section table.
    pub index: usize,
    #[serde(skip)]
    pub flags: SectionFlags,
}

/// An exported/visible symbol, tied back to its owning section where the
/// format records one.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSymbol {
    pub name: String,
    /// Index into [`Image::sections`], if the defining section is known.
    pub section: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFormat {
    Elf,
    Pe,
    Unknown,
}

impl BinaryFormat {
    /// Sniff the leading magic bytes. Cheap, never fails: callers use this
    /// to tell "not a loadable module" apart from a real parse error.
    pub fn detect(data: &[u8]) -> Self {
        if data.len() >= 4 && data[..4] == elf::ELF_MAGIC {
            BinaryFormat::Elf
        } else if data.len() >= 2 && data[..2] == pe::DOS_MAGIC {
            BinaryFormat::Pe
        } else {
            BinaryFormat::Unknown
        }
    }
}

/// Parsed snapshot of one binary image: section list plus the visible
/// symbol names. All parsing happens up front; the source buffer is not
/// retained.
#[derive(Debug, Clone)]
pub struct Image {
    pub format: BinaryFormat,
    pub sections: Vec<Section>,
    pub symbols: Vec<ImageSymbol>,
}

impl Image {
    pub fn parse(data: &[u8]) -> Result<Self, BinaryError> {
        match BinaryFormat::detect(data) {
            BinaryFormat::Elf => elf::parse(data),
            BinaryFormat::Pe => pe::parse(data),
            BinaryFormat::Unknown => Err(BinaryError::UnknownFormat),
        }
    }

    pub fn section_names(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.name.clone()).collect()
    }

    pub fn symbol_names(&self) -> Vec<String> {
        self.symbols.iter().map(|s| s.name.clone()).collect()
    }

    /// Symbols whose defining storage lies in the named section.
    pub fn symbols_in(&self, section: &str) -> Result<Vec<String>, BinaryError> {
        let idx = self
            .sections
            .iter()
            .position(|s| s.name == section)
            .ok_or_else(|| BinaryError::SectionNotFound(section.to_string()))?;

        Ok(self
            .symbols
            .iter()
            .filter(|s| s.section == Some(idx))
            .map(|s| s.name.clone())
            .collect())
    }

    pub fn find_section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}
