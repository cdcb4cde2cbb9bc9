//! Quoted-printable encoding as done by `convert.quoted-printable-encode`

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Whether `byte` passes through the encoder unchanged.
pub fn is_literal(byte: u8) -> bool {
    matches!(byte, b'\t' | b' ') || ((33..=126).contains(&byte) && byte != b'=')
}

/// Encode `input`. No soft line breaks are inserted.
pub fn encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for &byte in input {
        if is_literal(byte) {
            out.push(byte);
        } else {
            out.extend_from_slice(&[
                b'=',
                HEX_UPPER[(byte >> 4) as usize],
                HEX_UPPER[(byte & 0x0f) as usize],
            ]);
        }
    }
    out
}

/// Upper bound of the encoded length for `n` input bytes.
pub fn encoded_len_bound(n: usize) -> usize {
    n.saturating_mul(3)
}
