//! HTTP chunked transfer decoding as done by the `dechunk` filter

use crate::error::{Result, WrapError};

fn fail(reason: String) -> WrapError {
    WrapError::precondition("dechunk", reason)
}

/// Decode a chunked body. A zero-size chunk ends the body; anything after it
/// is discarded.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut pos = 0;

    loop {
        let digits = input[pos..]
            .iter()
            .take_while(|b| b.is_ascii_hexdigit())
            .count();
        if digits == 0 {
            return Err(fail(format!("missing chunk size at offset {pos}")));
        }
        let size_text = std::str::from_utf8(&input[pos..pos + digits])
            .map_err(|e| fail(e.to_string()))?;
        let size = usize::from_str_radix(size_text, 16)
            .map_err(|e| fail(format!("chunk size {size_text:?}: {e}")))?;

        // Chunk extensions run until the line feed.
        let line_end = input[pos + digits..]
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| fail(format!("unterminated chunk header at offset {pos}")))?;
        pos += digits + line_end + 1;

        if size == 0 {
            return Ok(out);
        }
        let end = pos
            .checked_add(size)
            .filter(|&end| end <= input.len())
            .ok_or_else(|| {
                fail(format!(
                    "chunk of {size} bytes at offset {pos} overruns {} byte input",
                    input.len()
                ))
            })?;
        out.extend_from_slice(&input[pos..end]);
        pos = end;

        if input[pos..].starts_with(b"\r\n") {
            pos += 2;
        } else if input[pos..].starts_with(b"\n") {
            pos += 1;
        } else {
            return Err(fail(format!("missing line break after chunk at offset {pos}")));
        }
    }
}
