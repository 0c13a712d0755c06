// Thu Aug 20 2026 - Alex

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

pub fn read_u8(data: &[u8], offset: usize) -> Option<u8> {
    data.get(offset).copied()
}

pub fn read_u16(data: &[u8], offset: usize, endian: Endian) -> Option<u16> {
    let bytes = data.get(offset..offset.checked_add(2)?)?;
    let arr = [bytes[0], bytes[1]];
    Some(match endian {
        Endian::Little => u16::from_le_bytes(arr),
        Endian::Big => u16::from_be_bytes(arr),
    })
}

pub fn read_u32(data: &[u8], offset: usize, endian: Endian) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    let arr = [bytes[0], bytes[1], bytes[2], bytes[3]];
    Some(match endian {
        Endian::Little => u32::from_le_bytes(arr),
        Endian::Big => u32::from_be_bytes(arr),
    })
}

pub fn read_u64(data: &[u8], offset: usize, endian: Endian) -> Option<u64> {
    let bytes = data.get(offset..offset.checked_add(8)?)?;
    let mut arr = [0u8; 8];
    arr.copy_from_slice(bytes);
    Some(match endian {
        Endian::Little => u64::from_le_bytes(arr),
        Endian::Big => u64::from_be_bytes(arr),
    })
}

/// NUL-terminated string starting at `offset`. The terminator must lie
/// inside the buffer; a run to end-of-buffer without one is a truncation.
pub fn read_cstr(data: &[u8], offset: usize) -> Option<String> {
    let tail = data.get(offset..)?;
    let end = tail.iter().position(|&b| b == 0)?;
    Some(String::from_utf8_lossy(&tail[..end]).into_owned())
}

pub fn read_bytes(data: &[u8], offset: usize, len: usize) -> Option<&[u8]> {
    data.get(offset..offset.checked_add(len)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u32_both_endians() {
        let data = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(read_u32(&data, 0, Endian::Little), Some(0x04030201));
        assert_eq!(read_u32(&data, 0, Endian::Big), Some(0x01020304));
    }

    #[test]
    fn test_read_past_end_is_none() {
        let data = [0xFF, 0xFF];
        assert_eq!(read_u32(&data, 0, Endian::Little), None);
        assert_eq!(read_u16(&data, 1, Endian::Little), None);
        assert_eq!(read_u8(&data, 2), None);
    }

    #[test]
    fn test_read_at_max_offset_is_none() {
        let data = [0u8; 16];
        assert_eq!(read_u16(&data, usize::MAX, Endian::Little), None);
        assert_eq!(read_u32(&data, usize::MAX, Endian::Little), None);
        assert_eq!(read_u64(&data, usize::MAX - 1, Endian::Big), None);
        assert_eq!(read_bytes(&data, usize::MAX, 8), None);
    }

    #[test]
    fn test_read_cstr() {
        let data = b"\0.text\0.data";
        assert_eq!(read_cstr(data, 1), Some(".text".to_string()));
        // no terminator before end of buffer
        assert_eq!(read_cstr(data, 7), None);
    }
}
