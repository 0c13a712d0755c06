// Fri Aug 21 2026 - Alex

use crate::binary::bytes::{self, Endian};
use crate::binary::error::BinaryError;
use crate::binary::{BinaryFormat, Image, ImageSymbol, Section, SectionFlags};

pub const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

const EI_CLASS: usize = 4;
const EI_DATA: usize = 5;

const ELFCLASS32: u8 = 1;
const ELFCLASS64: u8 = 2;
const ELFDATA2LSB: u8 = 1;
const ELFDATA2MSB: u8 = 2;

pub const SHT_SYMTAB: u32 = 2;
pub const SHT_STRTAB: u32 = 3;
pub const SHT_DYNSYM: u32 = 11;

const SHF_WRITE: u64 = 0x1;
const SHF_ALLOC: u64 = 0x2;
const SHF_EXECINSTR: u64 = 0x4;

// Section indices from SHN_LORESERVE up encode special meanings
// (SHN_ABS, SHN_COMMON), not real table positions.
const SHN_LORESERVE: u16 = 0xFF00;

const STV_MASK: u8 = 0x3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElfClass {
    Elf32,
    Elf64,
}

#[derive(Debug, Clone)]
struct SectionHeader {
    name_off: u32,
    sh_type: u32,
    flags: u64,
    addr: u64,
    offset: u64,
    size: u64,
    link: u32,
}

/// Parse an ELF image into the normalized [`Image`] snapshot.
///
/// The decode path (32- vs 64-bit record layouts, little- vs big-endian
/// field order) is chosen from the file's own `EI_CLASS` and `EI_DATA`
/// bytes, never from the host architecture, so a 32-bit big-endian object
/// parses correctly on any host.
pub fn parse(data: &[u8]) -> Result<Image, BinaryError> {
    if data.len() < 16 || data[..4] != ELF_MAGIC {
        return Err(BinaryError::UnknownFormat);
    }

    let class = match data[EI_CLASS] {
        ELFCLASS32 => ElfClass::Elf32,
        ELFCLASS64 => ElfClass::Elf64,
        other => return Err(BinaryError::UnsupportedClass(other)),
    };
    let endian = match data[EI_DATA] {
        ELFDATA2LSB => Endian::Little,
        ELFDATA2MSB => Endian::Big,
        other => return Err(BinaryError::UnsupportedEncoding(other)),
    };

    let headers = read_section_headers(data, class, endian)?;
    let sections = resolve_sections(data, class, endian, &headers)?;
    let symbols = read_symbols(data, class, endian, &headers)?;

    log::debug!(
        "parsed ELF image: class={:?} endian={:?} sections={} symbols={}",
        class,
        endian,
        sections.len(),
        symbols.len()
    );

    Ok(Image {
        format: BinaryFormat::Elf,
        sections,
        symbols,
    })
}

fn read_section_headers(
    data: &[u8],
    class: ElfClass,
    endian: Endian,
) -> Result<Vec<SectionHeader>, BinaryError> {
    // Field offsets differ between the Elf32_Ehdr and Elf64_Ehdr layouts
    // because e_entry/e_phoff/e_shoff widen from 4 to 8 bytes.
    let (shoff, shentsize_off, shnum_off) = match class {
        ElfClass::Elf32 => {
            let shoff = bytes::read_u32(data, 0x20, endian)
                .ok_or(BinaryError::Truncated("ELF header", 0x20))? as u64;
            (shoff, 0x2E, 0x30)
        }
        ElfClass::Elf64 => {
            let shoff = bytes::read_u64(data, 0x28, endian)
                .ok_or(BinaryError::Truncated("ELF header", 0x28))?;
            (shoff, 0x3A, 0x3C)
        }
    };

    let shentsize = bytes::read_u16(data, shentsize_off, endian)
        .ok_or(BinaryError::Truncated("ELF header", shentsize_off))? as usize;
    let shnum = bytes::read_u16(data, shnum_off, endian)
        .ok_or(BinaryError::Truncated("ELF header", shnum_off))? as usize;

    let min_entsize = match class {
        ElfClass::Elf32 => 40,
        ElfClass::Elf64 => 64,
    };
    if shnum > 0 && shentsize < min_entsize {
        return Err(BinaryError::Malformed {
            kind: "section header table",
            detail: format!("e_shentsize {} below record size {}", shentsize, min_entsize),
        });
    }

    // A hostile e_shoff can sit near u64::MAX; the offset math has to be
    // checked or a corrupt file becomes an overflow instead of an error.
    // Bounding the whole table up front also keeps every per-field offset
    // inside the buffer.
    let shoff = usize::try_from(shoff).unwrap_or(usize::MAX);
    let table_end = shnum
        .checked_mul(shentsize)
        .and_then(|len| shoff.checked_add(len));
    match table_end {
        Some(end) if end <= data.len() => {}
        _ => return Err(BinaryError::Truncated("section header table", shoff)),
    }

    let mut headers = Vec::with_capacity(shnum);
    for i in 0..shnum {
        let base = shoff + i * shentsize;
        headers.push(read_section_header(data, base, class, endian)?);
    }
    Ok(headers)
}

fn read_section_header(
    data: &[u8],
    base: usize,
    class: ElfClass,
    endian: Endian,
) -> Result<SectionHeader, BinaryError> {
    let trunc = || BinaryError::Truncated("section header", base);

    match class {
        ElfClass::Elf32 => Ok(SectionHeader {
            name_off: bytes::read_u32(data, base, endian).ok_or_else(trunc)?,
            sh_type: bytes::read_u32(data, base + 4, endian).ok_or_else(trunc)?,
            flags: bytes::read_u32(data, base + 8, endian).ok_or_else(trunc)? as u64,
            addr: bytes::read_u32(data, base + 12, endian).ok_or_else(trunc)? as u64,
            offset: bytes::read_u32(data, base + 16, endian).ok_or_else(trunc)? as u64,
            size: bytes::read_u32(data, base + 20, endian).ok_or_else(trunc)? as u64,
            link: bytes::read_u32(data, base + 24, endian).ok_or_else(trunc)?,
        }),
        ElfClass::Elf64 => Ok(SectionHeader {
            name_off: bytes::read_u32(data, base, endian).ok_or_else(trunc)?,
            sh_type: bytes::read_u32(data, base + 4, endian).ok_or_else(trunc)?,
            flags: bytes::read_u64(data, base + 8, endian).ok_or_else(trunc)?,
            addr: bytes::read_u64(data, base + 16, endian).ok_or_else(trunc)?,
            offset: bytes::read_u64(data, base + 24, endian).ok_or_else(trunc)?,
            size: bytes::read_u64(data, base + 32, endian).ok_or_else(trunc)?,
            link: bytes::read_u32(data, base + 40, endian).ok_or_else(trunc)?,
        }),
    }
}

fn section_blob<'a>(data: &'a [u8], header: &SectionHeader) -> Result<&'a [u8], BinaryError> {
    bytes::read_bytes(data, header.offset as usize, header.size as usize)
        .ok_or(BinaryError::Truncated("section contents", header.offset as usize))
}

fn resolve_sections(
    data: &[u8],
    class: ElfClass,
    endian: Endian,
    headers: &[SectionHeader],
) -> Result<Vec<Section>, BinaryError> {
    let shstrndx_off = match class {
        ElfClass::Elf32 => 0x32,
        ElfClass::Elf64 => 0x3E,
    };
    let shstrndx = bytes::read_u16(data, shstrndx_off, endian)
        .ok_or(BinaryError::Truncated("ELF header", shstrndx_off))? as usize;

    let shstrtab = match headers.get(shstrndx) {
        Some(h) if shstrndx != 0 => section_blob(data, h)?,
        _ => &[],
    };

    let mut sections = Vec::with_capacity(headers.len());
    for (index, header) in headers.iter().enumerate() {
        let name = bytes::read_cstr(shstrtab, header.name_off as usize).unwrap_or_default();

        let mut flags = SectionFlags::empty();
        if header.flags & SHF_WRITE != 0 {
            flags |= SectionFlags::WRITE;
        }
        if header.flags & SHF_ALLOC != 0 {
            flags |= SectionFlags::ALLOC;
        }
        if header.flags & SHF_EXECINSTR != 0 {
            flags |= SectionFlags::EXEC;
        }

        sections.push(Section {
            name,
            addr: header.addr,
            offset: header.offset,
            size: header.size,
            index,
            flags,
        });
    }
    Ok(sections)
}

fn read_symbols(
    data: &[u8],
    class: ElfClass,
    endian: Endian,
    headers: &[SectionHeader],
) -> Result<Vec<ImageSymbol>, BinaryError> {
    let entsize = match class {
        ElfClass::Elf32 => 16,
        ElfClass::Elf64 => 24,
    };

    let mut symbols = Vec::new();
    for header in headers {
        if header.sh_type != SHT_SYMTAB && header.sh_type != SHT_DYNSYM {
            continue;
        }

        let strtab = match headers.get(header.link as usize) {
            Some(h) if h.sh_type == SHT_STRTAB => section_blob(data, h)?,
            _ => {
                log::warn!(
                    "symbol section links to invalid string table index {}, skipping",
                    header.link
                );
                continue;
            }
        };

        let blob = section_blob(data, header)?;
        let count = blob.len() / entsize;

        for i in 0..count {
            let base = i * entsize;
            // The 64-bit record reorders the fields: info/other/shndx
            // come before value/size, not after.
            let (name_off, other, shndx) = match class {
                ElfClass::Elf32 => {
                    let name_off = bytes::read_u32(blob, base, endian)
                        .ok_or(BinaryError::Truncated("symbol record", base))?;
                    let other = bytes::read_u8(blob, base + 13)
                        .ok_or(BinaryError::Truncated("symbol record", base))?;
                    let shndx = bytes::read_u16(blob, base + 14, endian)
                        .ok_or(BinaryError::Truncated("symbol record", base))?;
                    (name_off, other, shndx)
                }
                ElfClass::Elf64 => {
                    let name_off = bytes::read_u32(blob, base, endian)
                        .ok_or(BinaryError::Truncated("symbol record", base))?;
                    let other = bytes::read_u8(blob, base + 5)
                        .ok_or(BinaryError::Truncated("symbol record", base))?;
                    let shndx = bytes::read_u16(blob, base + 6, endian)
                        .ok_or(BinaryError::Truncated("symbol record", base))?;
                    (name_off, other, shndx)
                }
            };

            // Only default-visibility symbols are callable from outside.
            if other & STV_MASK != 0 {
                continue;
            }

            let name = match bytes::read_cstr(strtab, name_off as usize) {
                Some(n) if !n.is_empty() => n,
                _ => continue,
            };

            let section = if shndx != 0 && shndx < SHN_LORESERVE && (shndx as usize) < headers.len()
            {
                Some(shndx as usize)
            } else {
                None
            };

            symbols.push(ImageSymbol { name, section });
        }
    }
    Ok(symbols)
}
