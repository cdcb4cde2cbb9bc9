//! wrapchain Test Utilities
//!
//! Shared source fixtures and output checks for wrapchain tests.

use wrapchain_format::{align_right, qprint};

/// Builder for source contents with common patterns
#[derive(Debug, Default)]
pub struct SourceBuilder {
    bytes: Vec<u8>,
}

impl SourceBuilder {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text
    pub fn text(mut self, text: &str) -> Self {
        self.bytes.extend_from_slice(text.as_bytes());
        self
    }

    /// Append `/etc/passwd`-style lines
    pub fn passwd_lines(mut self, count: usize) -> Self {
        for uid in 0..count {
            let line = format!("user{uid}:x:{uid}:{uid}:user{uid}:/home/user{uid}:/bin/sh\n");
            self.bytes.extend_from_slice(line.as_bytes());
        }
        self
    }

    /// Append `len` printable bytes that survive quoted-printable encoding
    pub fn printable(mut self, len: usize) -> Self {
        const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789:/_-.ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let mut state = 0x2545_f491_u32;
        for _ in 0..len {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            self.bytes.push(CHARSET[state as usize % CHARSET.len()]);
        }
        self
    }

    /// Finish the source
    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// What a full-layout chain outputs for `content`, when the escaped content is
/// at least `dumped_len` bytes long.
pub fn expected_wrap(
    prefix: &[u8],
    content: &[u8],
    suffix: &[u8],
    dumped_len: usize,
    padding_character: u8,
) -> Vec<u8> {
    let escaped = qprint::encode(content);
    assert!(
        escaped.len() >= dumped_len,
        "escaped content ({} bytes) shorter than dumped length {dumped_len}",
        escaped.len()
    );
    let mut out = align_right(prefix, 3, padding_character);
    out.extend_from_slice(&escaped[..dumped_len]);
    out.extend_from_slice(suffix);
    out
}

/// Render bytes for assertion messages, escaping anything unprintable.
pub fn show(bytes: &[u8]) -> String {
    bytes.escape_ascii().to_string()
}
