//! UCS-4 conversions used to move bytes across 4-byte groups

use crate::error::{Result, WrapError};

/// Code point of a CP437 byte. Only the ASCII half is exact; the upper half is
/// modelled in the box-drawing block.
fn code_point(byte: u8) -> u32 {
    if byte < 0x80 {
        byte as u32
    } else {
        0x2500 + (byte & 0x7f) as u32
    }
}

/// `convert.iconv.437.UCS-4le`: every byte becomes a little-endian code point.
pub fn widen(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() * 4);
    for &byte in input {
        out.extend_from_slice(&code_point(byte).to_le_bytes());
    }
    out
}

/// `convert.iconv.UCS-4.UCS-4LE`: reverse every 4-byte group.
pub fn swap4(input: &[u8]) -> Result<Vec<u8>> {
    if input.len() % 4 != 0 {
        return Err(WrapError::precondition(
            "swap4",
            format!("length {} is not a multiple of 4", input.len()),
        ));
    }
    let mut out = Vec::with_capacity(input.len());
    for group in input.chunks_exact(4) {
        out.extend(group.iter().rev());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen_ascii() {
        assert_eq!(widen(b"Ab"), vec![b'A', 0, 0, 0, b'b', 0, 0, 0]);
        assert_eq!(widen(&[0x81]).len(), 4);
    }

    #[test]
    fn test_swap4_reverses_groups() {
        assert_eq!(swap4(b"abcdefgh").unwrap(), b"dcbahgfe");
        assert_eq!(swap4(b"").unwrap(), b"");
    }

    #[test]
    fn test_swap4_requires_alignment() {
        assert!(matches!(
            swap4(b"abcde"),
            Err(WrapError::PreconditionViolation(_))
        ));
    }
}
