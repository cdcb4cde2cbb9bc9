//! wrapchain Format - Filter primitives for php://filter chain synthesis
//!
//! This crate describes the filters a chain is built from, with no I/O
//! dependencies. It includes:
//!
//! - Filter names and constants
//! - The character gadget catalog
//! - Byte-level models of every filter (base64, quoted-printable, UTF-7,
//!   UCS-4, dechunk)
//! - The `Primitive` type with its cost model
//! - Error types
//! - Resource limits

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod base64;
pub mod catalog;
pub mod constants;
pub mod dechunk;
pub mod error;
pub mod limits;
pub mod primitive;
pub mod qprint;
pub mod ucs4;
pub mod utf7;

// Re-export commonly used types
pub use catalog::Gadget;
pub use error::{Result, WrapError};
pub use limits::Limits;
pub use primitive::{apply_all, Primitive};

/// Round `value` up to the next multiple of `div`.
pub fn align_value(value: usize, div: usize) -> usize {
    value + (div - value % div) % div
}

/// Right-pad `input` with `pad` until its length is a multiple of `n`.
pub fn align_right(input: &[u8], n: usize, pad: u8) -> Vec<u8> {
    let mut out = input.to_vec();
    out.resize(align_value(input.len(), n), pad);
    out
}

/// Left-pad `input` with `pad` until its length is a multiple of `n`.
pub fn align_left(input: &[u8], n: usize, pad: u8) -> Vec<u8> {
    let mut out = vec![pad; align_value(input.len(), n) - input.len()];
    out.extend_from_slice(input);
    out
}
