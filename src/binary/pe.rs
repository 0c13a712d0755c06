// Fri Aug 21 2026 - Alex

use crate::binary::bytes::{self, Endian};
use crate::binary::error::BinaryError;
use crate::binary::{BinaryFormat, Image, ImageSymbol, Section, SectionFlags};

pub const DOS_MAGIC: [u8; 2] = [b'M', b'Z'];

const NT_MAGIC: [u8; 4] = [b'P', b'E', 0, 0];
const E_LFANEW_OFFSET: usize = 0x3C;

const OPT_MAGIC_PE32: u16 = 0x10B;
const OPT_MAGIC_PE32_PLUS: u16 = 0x20B;

const SECTION_HEADER_SIZE: usize = 40;
const EXPORT_DIRECTORY_INDEX: usize = 0;

const IMAGE_SCN_CNT_CODE: u32 = 0x0000_0020;
const IMAGE_SCN_MEM_EXECUTE: u32 = 0x2000_0000;
const IMAGE_SCN_MEM_WRITE: u32 = 0x8000_0000;

// PE fields are little-endian regardless of host or target machine.
const E: Endian = Endian::Little;

#[derive(Debug, Clone)]
struct PeSection {
    name: String,
    virtual_size: u32,
    virtual_address: u32,
    raw_size: u32,
    raw_offset: u32,
    characteristics: u32,
}

impl PeSection {
    fn span(&self) -> u32 {
        self.virtual_size.max(self.raw_size)
    }

    fn contains_rva(&self, rva: u32) -> bool {
        rva >= self.virtual_address && rva - self.virtual_address < self.span()
    }
}

/// Parse a PE32/PE32+ image into the normalized [`Image`] snapshot.
///
/// Exported names come from the export directory's name-pointer table,
/// each entry translated from RVA to file offset through the section
/// table. The 32- vs 64-bit optional header layout is chosen from the
/// header's own magic word.
pub fn parse(data: &[u8]) -> Result<Image, BinaryError> {
    if data.len() < 2 || data[..2] != DOS_MAGIC {
        return Err(BinaryError::UnknownFormat);
    }

    let nt_offset = bytes::read_u32(data, E_LFANEW_OFFSET, E)
        .ok_or(BinaryError::Truncated("DOS header", E_LFANEW_OFFSET))? as usize;

    match bytes::read_bytes(data, nt_offset, 4) {
        Some(sig) if sig == NT_MAGIC => {}
        Some(_) => {
            return Err(BinaryError::Malformed {
                kind: "NT header",
                detail: "missing PE signature".to_string(),
            })
        }
        None => return Err(BinaryError::Truncated("NT header", nt_offset)),
    }

    let section_count = bytes::read_u16(data, nt_offset + 6, E)
        .ok_or(BinaryError::Truncated("file header", nt_offset + 6))? as usize;
    let optional_size = bytes::read_u16(data, nt_offset + 20, E)
        .ok_or(BinaryError::Truncated("file header", nt_offset + 20))? as usize;

    let opt = nt_offset + 24;
    let magic = bytes::read_u16(data, opt, E).ok_or(BinaryError::Truncated("optional header", opt))?;
    let (dir_count_off, dir_table_off) = match magic {
        OPT_MAGIC_PE32 => (opt + 92, opt + 96),
        OPT_MAGIC_PE32_PLUS => (opt + 108, opt + 112),
        other => return Err(BinaryError::UnsupportedPeMagic(other)),
    };

    let pe_sections = read_section_table(data, opt + optional_size, section_count)?;

    let dir_count = bytes::read_u32(data, dir_count_off, E)
        .ok_or(BinaryError::Truncated("optional header", dir_count_off))? as usize;

    let symbols = if dir_count > EXPORT_DIRECTORY_INDEX {
        let export_va = bytes::read_u32(data, dir_table_off, E)
            .ok_or(BinaryError::Truncated("data directory", dir_table_off))?;
        if export_va == 0 {
            log::debug!("PE image has no export directory");
            Vec::new()
        } else {
            read_exports(data, export_va, &pe_sections)?
        }
    } else {
        Vec::new()
    };

    let sections = pe_sections
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let mut flags = SectionFlags::ALLOC;
            if s.characteristics & (IMAGE_SCN_MEM_EXECUTE | IMAGE_SCN_CNT_CODE) != 0 {
                flags |= SectionFlags::EXEC;
            }
            if s.characteristics & IMAGE_SCN_MEM_WRITE != 0 {
                flags |= SectionFlags::WRITE;
            }
            Section {
                name: s.name.clone(),
                addr: s.virtual_address as u64,
                offset: s.raw_offset as u64,
                size: s.span() as u64,
                index,
                flags,
            }
        })
        .collect();

    log::debug!(
        "parsed PE image: magic={:#x} sections={} exports={}",
        magic,
        section_count,
        symbols.len()
    );

    Ok(Image {
        format: BinaryFormat::Pe,
        sections,
        symbols,
    })
}

fn read_section_table(
    data: &[u8],
    table_offset: usize,
    count: usize,
) -> Result<Vec<PeSection>, BinaryError> {
    let mut sections = Vec::with_capacity(count);
    for i in 0..count {
        let base = table_offset + i * SECTION_HEADER_SIZE;
        let raw_name = bytes::read_bytes(data, base, 8)
            .ok_or(BinaryError::Truncated("section header", base))?;
        let end = raw_name.iter().position(|&b| b == 0).unwrap_or(8);
        let name = String::from_utf8_lossy(&raw_name[..end]).into_owned();

        let trunc = || BinaryError::Truncated("section header", base);
        sections.push(PeSection {
            name,
            virtual_size: bytes::read_u32(data, base + 8, E).ok_or_else(trunc)?,
            virtual_address: bytes::read_u32(data, base + 12, E).ok_or_else(trunc)?,
            raw_size: bytes::read_u32(data, base + 16, E).ok_or_else(trunc)?,
            raw_offset: bytes::read_u32(data, base + 20, E).ok_or_else(trunc)?,
            characteristics: bytes::read_u32(data, base + 36, E).ok_or_else(trunc)?,
        });
    }
    Ok(sections)
}

fn rva_to_offset(rva: u32, sections: &[PeSection]) -> Option<usize> {
    let section = sections.iter().find(|s| s.contains_rva(rva))?;
    // raw_offset plus the section-relative delta can exceed u32 in a
    // crafted image, so widen before adding.
    (section.raw_offset as usize).checked_add((rva - section.virtual_address) as usize)
}

fn read_exports(
    data: &[u8],
    export_va: u32,
    sections: &[PeSection],
) -> Result<Vec<ImageSymbol>, BinaryError> {
    let dir = rva_to_offset(export_va, sections).ok_or(BinaryError::Malformed {
        kind: "export directory",
        detail: format!("directory RVA {:#x} maps to no section", export_va),
    })?;

    let trunc = || BinaryError::Truncated("export directory", dir);
    let name_count = bytes::read_u32(data, dir + 24, E).ok_or_else(trunc)? as usize;
    let functions_va = bytes::read_u32(data, dir + 28, E).ok_or_else(trunc)?;
    let names_va = bytes::read_u32(data, dir + 32, E).ok_or_else(trunc)?;
    let ordinals_va = bytes::read_u32(data, dir + 36, E).ok_or_else(trunc)?;

    let bad_table = |what: &'static str| BinaryError::Malformed {
        kind: "export directory",
        detail: format!("{} table maps to no section", what),
    };
    let functions_off = rva_to_offset(functions_va, sections).ok_or_else(|| bad_table("function"))?;
    let names_off = rva_to_offset(names_va, sections).ok_or_else(|| bad_table("name"))?;
    let ordinals_off = rva_to_offset(ordinals_va, sections).ok_or_else(|| bad_table("ordinal"))?;

    let entry = |base: usize, i: usize, width: usize, what: &'static str| {
        i.checked_mul(width)
            .and_then(|rel| base.checked_add(rel))
            .ok_or(BinaryError::Truncated(what, base))
    };

    // name_count comes straight from the file; don't let a corrupt value
    // drive a giant allocation before the loop has a chance to fail.
    let mut symbols = Vec::with_capacity(name_count.min(1024));
    for i in 0..name_count {
        let name_rva = bytes::read_u32(data, entry(names_off, i, 4, "export name table")?, E)
            .ok_or(BinaryError::Truncated("export name table", names_off))?;
        let name_off = rva_to_offset(name_rva, sections).ok_or_else(|| bad_table("name entry"))?;
        let name = bytes::read_cstr(data, name_off)
            .ok_or(BinaryError::Truncated("export name", name_off))?;
        if name.is_empty() {
            continue;
        }

        let ordinal = bytes::read_u16(data, entry(ordinals_off, i, 2, "export ordinal table")?, E)
            .ok_or(BinaryError::Truncated("export ordinal table", ordinals_off))?
            as usize;
        let function_rva = bytes::read_u32(
            data,
            entry(functions_off, ordinal, 4, "export address table")?,
            E,
        )
        .ok_or(BinaryError::Truncated("export address table", functions_off))?;

        let section = sections.iter().position(|s| s.contains_rva(function_rva));
        symbols.push(ImageSymbol { name, section });
    }
    Ok(symbols)
}
