// Thu Aug 20 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BinaryError {
    #[error("unrecognized binary format (bad magic)")]
    UnknownFormat,
    #[error("truncated {0} at offset {1:#x}")]
    Truncated(&'static str, usize),
    #[error("unsupported ELF class byte {0:#x}")]
    UnsupportedClass(u8),
    #[error("unsupported ELF data encoding {0:#x}")]
    UnsupportedEncoding(u8),
    #[error("unsupported PE optional header magic {0:#x}")]
    UnsupportedPeMagic(u16),
    #[error("malformed {kind}: {detail}")]
    Malformed { kind: &'static str, detail: String },
    #[error("section not found: {0}")]
    SectionNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
