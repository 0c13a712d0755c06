// Fri Aug 21 2026 - Alex
//
// Hand-assembled ELF and PE images for tests. Layouts are fixed: three
// content sections with symbols split across .text and .data so the
// section-scoped queries have something to partition.

use crate::binary::bytes::Endian;

pub struct FixtureSym {
    pub name: String,
    pub shndx: u16,
    pub other: u8,
}

impl FixtureSym {
    pub fn new(name: &str, shndx: u16) -> Self {
        Self {
            name: name.to_string(),
            shndx,
            other: 0,
        }
    }

    pub fn with_other(mut self, other: u8) -> Self {
        self.other = other;
        self
    }
}

pub struct ElfFixture {
    pub class64: bool,
    pub endian: Endian,
    pub symbols: Vec<FixtureSym>,
}

impl ElfFixture {
    pub fn elf64(symbols: Vec<FixtureSym>) -> Self {
        Self {
            class64: true,
            endian: Endian::Little,
            symbols,
        }
    }
}

fn push_u16(out: &mut Vec<u8>, value: u16, endian: Endian) {
    match endian {
        Endian::Little => out.extend_from_slice(&value.to_le_bytes()),
        Endian::Big => out.extend_from_slice(&value.to_be_bytes()),
    }
}

fn push_u32(out: &mut Vec<u8>, value: u32, endian: Endian) {
    match endian {
        Endian::Little => out.extend_from_slice(&value.to_le_bytes()),
        Endian::Big => out.extend_from_slice(&value.to_be_bytes()),
    }
}

fn push_u64(out: &mut Vec<u8>, value: u64, endian: Endian) {
    match endian {
        Endian::Little => out.extend_from_slice(&value.to_le_bytes()),
        Endian::Big => out.extend_from_slice(&value.to_be_bytes()),
    }
}

// Section indices in the built image:
//   0 null, 1 .text, 2 .data, 3 .symtab, 4 .strtab, 5 .shstrtab
pub fn build_elf(fixture: &ElfFixture) -> Vec<u8> {
    let e = fixture.endian;
    let (ehdr_size, shentsize, sym_entsize): (usize, usize, usize) = if fixture.class64 {
        (64, 64, 24)
    } else {
        (52, 40, 16)
    };

    let shstrtab: &[u8] = b"\0.text\0.data\0.symtab\0.strtab\0.shstrtab\0";
    let name_offs = [0u32, 1, 7, 13, 21, 29];

    let mut strtab = vec![0u8];
    let mut str_offs = Vec::new();
    for sym in &fixture.symbols {
        str_offs.push(strtab.len() as u32);
        strtab.extend_from_slice(sym.name.as_bytes());
        strtab.push(0);
    }

    let text_contents = vec![0x90u8; 16];
    let data_contents = vec![0u8; 16];

    let mut symtab = vec![0u8; sym_entsize]; // null record at index 0
    for (i, sym) in fixture.symbols.iter().enumerate() {
        let value = 0x1000u64 + (i as u64) * 4;
        if fixture.class64 {
            push_u32(&mut symtab, str_offs[i], e);
            symtab.push(0x12); // STB_GLOBAL | STT_FUNC
            symtab.push(sym.other);
            push_u16(&mut symtab, sym.shndx, e);
            push_u64(&mut symtab, value, e);
            push_u64(&mut symtab, 4, e);
        } else {
            push_u32(&mut symtab, str_offs[i], e);
            push_u32(&mut symtab, value as u32, e);
            push_u32(&mut symtab, 4, e);
            symtab.push(0x12);
            symtab.push(sym.other);
            push_u16(&mut symtab, sym.shndx, e);
        }
    }

    let text_off = ehdr_size as u64;
    let data_off = text_off + text_contents.len() as u64;
    let symtab_off = data_off + data_contents.len() as u64;
    let strtab_off = symtab_off + symtab.len() as u64;
    let shstr_off = strtab_off + strtab.len() as u64;
    let shoff = shstr_off + shstrtab.len() as u64;

    let mut out = Vec::new();

    // e_ident
    out.extend_from_slice(&[0x7F, b'E', b'L', b'F']);
    out.push(if fixture.class64 { 2 } else { 1 });
    out.push(if e == Endian::Little { 1 } else { 2 });
    out.push(1); // EI_VERSION
    out.resize(16, 0);

    push_u16(&mut out, 3, e); // ET_DYN
    push_u16(&mut out, if fixture.class64 { 0x3E } else { 0x03 }, e);
    push_u32(&mut out, 1, e); // e_version
    if fixture.class64 {
        push_u64(&mut out, 0, e); // e_entry
        push_u64(&mut out, 0, e); // e_phoff
        push_u64(&mut out, shoff, e);
    } else {
        push_u32(&mut out, 0, e);
        push_u32(&mut out, 0, e);
        push_u32(&mut out, shoff as u32, e);
    }
    push_u32(&mut out, 0, e); // e_flags
    push_u16(&mut out, ehdr_size as u16, e);
    push_u16(&mut out, 0, e); // e_phentsize
    push_u16(&mut out, 0, e); // e_phnum
    push_u16(&mut out, shentsize as u16, e);
    push_u16(&mut out, 6, e); // e_shnum
    push_u16(&mut out, 5, e); // e_shstrndx
    assert_eq!(out.len(), ehdr_size);

    out.extend_from_slice(&text_contents);
    out.extend_from_slice(&data_contents);
    out.extend_from_slice(&symtab);
    out.extend_from_slice(&strtab);
    out.extend_from_slice(shstrtab);
    assert_eq!(out.len() as u64, shoff);

    // (sh_type, flags, addr, offset, size, link, entsize)
    let rows: [(u32, u64, u64, u64, u64, u32, u64); 6] = [
        (0, 0, 0, 0, 0, 0, 0),
        (1, 0x6, 0x1000, text_off, text_contents.len() as u64, 0, 0),
        (1, 0x3, 0x2000, data_off, data_contents.len() as u64, 0, 0),
        (2, 0, 0, symtab_off, symtab.len() as u64, 4, sym_entsize as u64),
        (3, 0, 0, strtab_off, strtab.len() as u64, 0, 0),
        (3, 0, 0, shstr_off, shstrtab.len() as u64, 0, 0),
    ];

    for (i, row) in rows.iter().enumerate() {
        let (sh_type, flags, addr, offset, size, link, entsize) = *row;
        push_u32(&mut out, name_offs[i], e);
        push_u32(&mut out, sh_type, e);
        if fixture.class64 {
            push_u64(&mut out, flags, e);
            push_u64(&mut out, addr, e);
            push_u64(&mut out, offset, e);
            push_u64(&mut out, size, e);
            push_u32(&mut out, link, e);
            push_u32(&mut out, 0, e); // sh_info
            push_u64(&mut out, 8, e); // sh_addralign
            push_u64(&mut out, entsize, e);
        } else {
            push_u32(&mut out, flags as u32, e);
            push_u32(&mut out, addr as u32, e);
            push_u32(&mut out, offset as u32, e);
            push_u32(&mut out, size as u32, e);
            push_u32(&mut out, link, e);
            push_u32(&mut out, 0, e);
            push_u32(&mut out, 4, e);
            push_u32(&mut out, entsize as u32, e);
        }
    }

    out
}

// PE32+ image with .text at RVA 0x1000, .edata at 0x2000, .data at 0x3000.
// Exports are (name, function rva) pairs supplied by the caller.
pub const PE_TEXT_RVA: u32 = 0x1000;
pub const PE_DATA_RVA: u32 = 0x3000;

pub fn build_pe(exports: &[(&str, u32)]) -> Vec<u8> {
    let e = Endian::Little;
    let edata_rva = 0x2000u32;
    let edata_raw = 0x400u32;

    let n = exports.len() as u32;
    let dir_size = 40u32;
    let funcs_rel = dir_size;
    let names_rel = funcs_rel + n * 4;
    let ords_rel = names_rel + n * 4;
    let strs_rel = ords_rel + n * 2;

    let mut strings = Vec::new();
    let mut str_rvas = Vec::new();
    for (name, _) in exports {
        str_rvas.push(edata_rva + strs_rel + strings.len() as u32);
        strings.extend_from_slice(name.as_bytes());
        strings.push(0);
    }

    let mut edata = Vec::new();
    push_u32(&mut edata, 0, e); // Characteristics
    push_u32(&mut edata, 0, e); // TimeDateStamp
    push_u16(&mut edata, 0, e);
    push_u16(&mut edata, 0, e);
    push_u32(&mut edata, 0, e); // Name RVA (unused by the reader)
    push_u32(&mut edata, 1, e); // Base
    push_u32(&mut edata, n, e); // NumberOfFunctions
    push_u32(&mut edata, n, e); // NumberOfNames
    push_u32(&mut edata, edata_rva + funcs_rel, e);
    push_u32(&mut edata, edata_rva + names_rel, e);
    push_u32(&mut edata, edata_rva + ords_rel, e);
    for (_, rva) in exports {
        push_u32(&mut edata, *rva, e);
    }
    for rva in &str_rvas {
        push_u32(&mut edata, *rva, e);
    }
    for i in 0..exports.len() {
        push_u16(&mut edata, i as u16, e);
    }
    edata.extend_from_slice(&strings);

    let mut out = Vec::new();

    // DOS header
    out.extend_from_slice(b"MZ");
    out.resize(0x3C, 0);
    push_u32(&mut out, 0x40, e); // e_lfanew

    // NT signature + COFF file header
    out.extend_from_slice(b"PE\0\0");
    push_u16(&mut out, 0x8664, e); // Machine
    push_u16(&mut out, 3, e); // NumberOfSections
    push_u32(&mut out, 0, e);
    push_u32(&mut out, 0, e);
    push_u32(&mut out, 0, e);
    push_u16(&mut out, 240, e); // SizeOfOptionalHeader (PE32+)
    push_u16(&mut out, 0x2022, e); // DLL | executable

    // Optional header (PE32+)
    let opt_start = out.len();
    push_u16(&mut out, 0x20B, e);
    out.resize(opt_start + 104, 0);
    push_u32(&mut out, 0, e); // LoaderFlags
    push_u32(&mut out, 16, e); // NumberOfRvaAndSizes
    push_u32(&mut out, edata_rva, e); // export table VA
    push_u32(&mut out, edata.len() as u32, e); // export table size
    out.resize(opt_start + 240, 0);

    // Section table: name[8], vsize, va, rawsize, rawptr, .., characteristics
    let sections: [(&[u8; 8], u32, u32, u32, u32, u32); 3] = [
        (b".text\0\0\0", 0x1000, PE_TEXT_RVA, 0x200, 0x200, 0x6000_0020),
        (b".edata\0\0", 0x1000, edata_rva, 0x200, edata_raw, 0x4000_0040),
        (b".data\0\0\0", 0x1000, PE_DATA_RVA, 0x200, 0x600, 0xC000_0040),
    ];
    for (name, vsize, va, rawsize, rawptr, characteristics) in sections {
        out.extend_from_slice(name);
        push_u32(&mut out, vsize, e);
        push_u32(&mut out, va, e);
        push_u32(&mut out, rawsize, e);
        push_u32(&mut out, rawptr, e);
        push_u32(&mut out, 0, e); // PointerToRelocations
        push_u32(&mut out, 0, e); // PointerToLinenumbers
        push_u16(&mut out, 0, e);
        push_u16(&mut out, 0, e);
        push_u32(&mut out, characteristics, e);
    }

    out.resize(0x400, 0);
    assert!(edata.len() <= 0x200, "export data overflows .edata");
    out.extend_from_slice(&edata);
    out.resize(0x800, 0);

    out
}
