//! UTF-7 encoding of CP855 input, as done by `convert.iconv.855.UTF7`
//!
//! The chain only relies on what this conversion does to ASCII: `=` leaves the
//! base64 alphabet's padding role, `+` doubles up as `+-`. Bytes above 0x7f are
//! Cyrillic in CP855; they are modelled as code points in the U+0400 block,
//! which is enough to reason about the base64 characters they produce.

use crate::base64::encode_unpadded;

fn is_direct(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"'(),-./:? \t\r\n".contains(&byte)
}

fn code_point(byte: u8) -> u16 {
    if byte < 0x80 {
        byte as u16
    } else {
        0x0400 + (byte & 0x7f) as u16
    }
}

/// Encode `input`.
pub fn encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        if is_direct(byte) {
            out.push(byte);
            i += 1;
        } else if byte == b'+' {
            out.extend_from_slice(b"+-");
            i += 1;
        } else {
            let mut run = Vec::new();
            while i < input.len() && !is_direct(input[i]) && input[i] != b'+' {
                run.extend_from_slice(&code_point(input[i]).to_be_bytes());
                i += 1;
            }
            out.push(b'+');
            out.extend_from_slice(&encode_unpadded(&run));
            out.push(b'-');
        }
    }

    out
}

/// Upper bound of the encoded length for `n` input bytes.
pub fn encoded_len_bound(n: usize) -> usize {
    // A lone escaped byte costs "+XXX-".
    n.saturating_mul(5)
}
