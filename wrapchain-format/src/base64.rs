//! Base64 encoding and the lenient decoder used by `convert.base64-decode`

use crate::constants::{BASE64_ALPHABET, BASE64_PAD};
use crate::error::{Result, WrapError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const INVALID: u8 = 0xff;

const fn build_index() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 64 {
        table[BASE64_ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static INDEX: [u8; 256] = build_index();

/// Index of `byte` in the base64 alphabet, if it belongs to it.
pub fn alphabet_index(byte: u8) -> Option<u8> {
    match INDEX[byte as usize] {
        INVALID => None,
        idx => Some(idx),
    }
}

/// Check whether `byte` is one of the 64 base64 characters.
pub fn is_base64_char(byte: u8) -> bool {
    INDEX[byte as usize] != INVALID
}

/// Standard base64 with `=` padding.
pub fn encode(input: &[u8]) -> Vec<u8> {
    STANDARD.encode(input).into_bytes()
}

/// Base64 without trailing padding.
pub fn encode_unpadded(input: &[u8]) -> Vec<u8> {
    let mut out = encode(input);
    while out.last() == Some(&BASE64_PAD) {
        out.pop();
    }
    out
}

/// Encoded length of `n` input bytes.
pub fn encoded_len(n: usize) -> usize {
    n.div_ceil(3).saturating_mul(4)
}

/// Lenient decoding as done by the stream filter.
///
/// Bytes outside the alphabet are skipped, a byte is emitted as soon as eight
/// bits are available and leftover bits are dropped. Once `=` has been seen
/// only further padding or non-alphabet bytes may follow.
pub fn decode_lenient(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len() / 4 * 3 + 2);
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    let mut padding = false;

    for (pos, &byte) in input.iter().enumerate() {
        if byte == BASE64_PAD {
            padding = true;
            continue;
        }
        let Some(idx) = alphabet_index(byte) else {
            continue;
        };
        if padding {
            return Err(WrapError::precondition(
                "base64-decode",
                format!("alphabet byte 0x{byte:02x} after padding at offset {pos}"),
            ));
        }
        acc = (acc << 6) | idx as u32;
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
            acc &= (1 << bits) - 1;
        }
    }

    Ok(out)
}

/// Upper bound of the decoded length for `n` input bytes.
pub fn decoded_len_bound(n: usize) -> usize {
    n / 4 * 3 + (n % 4) * 3 / 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_pads() {
        assert_eq!(encode(b"ab"), b"YWI=");
        assert_eq!(encode_unpadded(b"ab"), b"YWI");
        assert_eq!(encode(b""), b"");
        assert_eq!(encoded_len(0), 0);
        assert_eq!(encoded_len(4), 8);
    }

    #[test]
    fn test_decode_skips_foreign_bytes() {
        assert_eq!(decode_lenient(b"\x1bY\x00W-J\nj").unwrap(), b"abc");
    }

    #[test]
    fn test_decode_emits_partial_groups() {
        // Two characters carry one full byte, one character carries none.
        assert_eq!(decode_lenient(b"YWJjZA").unwrap(), b"abcd");
        assert_eq!(decode_lenient(b"YWJjZ").unwrap(), b"abc");
    }

    #[test]
    fn test_decode_rejects_data_after_padding() {
        assert!(decode_lenient(b"YQ==").is_ok());
        let err = decode_lenient(b"YQ==YQ").unwrap_err();
        assert!(matches!(err, WrapError::PreconditionViolation(_)));
    }

    #[test]
    fn test_prepended_character_drops_last_one() {
        let buffer = encode(b"012345");
        let mut pushed = vec![b'Q'];
        pushed.extend_from_slice(&buffer);
        let reencoded = encode(&decode_lenient(&pushed).unwrap());
        assert_eq!(reencoded.len(), buffer.len());
        assert_eq!(reencoded[0], b'Q');
        assert_eq!(&reencoded[1..], &buffer[..buffer.len() - 1]);
    }

    proptest! {
        #[test]
        fn prop_lenient_decode_inverts_encode(data in prop::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(decode_lenient(&encode(&data)).unwrap(), data);
        }

        #[test]
        fn prop_decoded_len_within_bound(data in prop::collection::vec(any::<u8>(), 0..256)) {
            let decoded = decode_lenient(&data).unwrap_or_default();
            prop_assert!(decoded.len() <= decoded_len_bound(data.len()));
        }
    }
}
