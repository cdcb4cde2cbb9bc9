//! Byte injector
//!
//! Every injection is built from a character gadget followed by a base64
//! decode/encode pair. On a base64 buffer of `4k` characters that sequence puts
//! the gadget's character in front and drops the last character, whatever the
//! buffer holds.

use smallvec::SmallVec;
use wrapchain_format::{base64, Primitive, Result};

/// Sink for emitted primitives.
pub trait Emit {
    /// Append one primitive
    fn emit(&mut self, primitive: Primitive) -> Result<()>;

    /// Append primitives in order
    fn emit_all(&mut self, primitives: &[Primitive]) -> Result<()> {
        for primitive in primitives {
            self.emit(*primitive)?;
        }
        Ok(())
    }
}

/// Prepend `byte` to a base64 buffer.
pub fn push_char<E: Emit + ?Sized>(sink: &mut E, byte: u8) -> Result<()> {
    let gadget = Primitive::gadget(byte)?;
    sink.emit_all(&[gadget, Primitive::Base64Decode, Primitive::Base64Encode])
}

/// Like [`push_char`], then strip any `=` the re-encoding produced.
pub fn push_char_safely<E: Emit + ?Sized>(sink: &mut E, byte: u8) -> Result<()> {
    push_char(sink, byte)?;
    sink.emit(Primitive::RemoveEqual)
}

/// Prepend `bytes` to a base64 buffer, last byte first so the result reads in
/// order.
pub fn push_str_safely<E: Emit + ?Sized>(sink: &mut E, bytes: &[u8]) -> Result<()> {
    for &byte in bytes.iter().rev() {
        push_char_safely(sink, byte)?;
    }
    Ok(())
}

/// Prepend three raw bytes, drop the last three and swap 4-byte groups.
///
/// The buffer length must be a multiple of 12.
pub fn push_triplet<E: Emit + ?Sized>(sink: &mut E, triplet: [u8; 3]) -> Result<()> {
    let encoded: SmallVec<[u8; 4]> = base64::encode(&triplet).into_iter().collect();
    sink.emit(Primitive::Base64Encode)?;
    for &byte in encoded.iter().rev() {
        push_char(sink, byte)?;
    }
    sink.emit_all(&[Primitive::Base64Decode, Primitive::Swap4])
}
