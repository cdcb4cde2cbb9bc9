//! Filter primitives: identity, byte semantics and cost model

use crate::catalog;
use crate::constants::*;
use crate::error::{Result, WrapError};
use crate::{base64, dechunk, qprint, ucs4, utf7};
use std::borrow::Cow;
use std::fmt;

/// One elementary filter of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `convert.base64-encode`
    Base64Encode,
    /// `convert.base64-decode`
    Base64Decode,
    /// `convert.quoted-printable-encode`
    QuotedPrintableEncode,
    /// `convert.iconv.855.UTF7`
    RemoveEqual,
    /// `convert.iconv.437.UCS-4le`
    Ucs4Widen,
    /// `convert.iconv.UCS-4.UCS-4LE`
    Swap4,
    /// `dechunk`
    Dechunk,
    /// Character gadget prepending the given base64 character
    Gadget(u8),
}

impl Primitive {
    /// Build a gadget primitive, checking the byte against the catalog.
    pub fn gadget(byte: u8) -> Result<Self> {
        catalog::gadget(byte).map(|g| Primitive::Gadget(g.byte))
    }

    /// Filter text as it appears in a serialized chain.
    pub fn filter_name(&self) -> Result<Cow<'static, str>> {
        Ok(match self {
            Primitive::Base64Encode => Cow::Borrowed(FILTER_BASE64_ENCODE),
            Primitive::Base64Decode => Cow::Borrowed(FILTER_BASE64_DECODE),
            Primitive::QuotedPrintableEncode => Cow::Borrowed(FILTER_QUOTED_PRINTABLE_ENCODE),
            Primitive::RemoveEqual => Cow::Borrowed(FILTER_REMOVE_EQUAL),
            Primitive::Ucs4Widen => Cow::Borrowed(FILTER_UCS4_WIDEN),
            Primitive::Swap4 => Cow::Borrowed(FILTER_SWAP4),
            Primitive::Dechunk => Cow::Borrowed(FILTER_DECHUNK),
            Primitive::Gadget(byte) => Cow::Borrowed(catalog::gadget(*byte)?.filters),
        })
    }

    /// Length of the filter text, used by the cost model.
    pub fn serialized_len(&self) -> Result<usize> {
        self.filter_name().map(|name| name.len())
    }

    /// Apply the filter to a whole buffer.
    ///
    /// PHP only runs a filter on the buckets that reach it, so an empty
    /// stream comes out empty whatever the filter.
    pub fn apply(&self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return match self {
                Primitive::Gadget(byte) if !catalog::is_representable(*byte) => {
                    Err(WrapError::UnsupportedByte(*byte))
                }
                _ => Ok(Vec::new()),
            };
        }
        match self {
            Primitive::Base64Encode => Ok(base64::encode(input)),
            Primitive::Base64Decode => base64::decode_lenient(input),
            Primitive::QuotedPrintableEncode => Ok(qprint::encode(input)),
            Primitive::RemoveEqual => Ok(utf7::encode(input)),
            Primitive::Ucs4Widen => Ok(ucs4::widen(input)),
            Primitive::Swap4 => ucs4::swap4(input),
            Primitive::Dechunk => dechunk::decode(input),
            Primitive::Gadget(byte) => {
                if !catalog::is_representable(*byte) {
                    return Err(WrapError::UnsupportedByte(*byte));
                }
                if let Some(pos) = input.iter().position(|b| !b.is_ascii()) {
                    return Err(WrapError::precondition(
                        "gadget",
                        format!("non-ASCII byte at offset {pos}"),
                    ));
                }
                let mut out = Vec::with_capacity(input.len() + 2);
                out.push(GADGET_ESCAPE);
                out.push(*byte);
                out.extend_from_slice(input);
                Ok(out)
            }
        }
    }

    /// Output length for an input of `n` bytes.
    ///
    /// Exact when [`Primitive::is_exact`] holds, otherwise an upper bound.
    pub fn length_after(&self, n: usize) -> usize {
        match self {
            Primitive::Base64Encode => base64::encoded_len(n),
            Primitive::Base64Decode => base64::decoded_len_bound(n),
            Primitive::QuotedPrintableEncode => qprint::encoded_len_bound(n),
            Primitive::RemoveEqual => utf7::encoded_len_bound(n),
            Primitive::Ucs4Widen => n.saturating_mul(4),
            Primitive::Swap4 => n,
            Primitive::Dechunk => n,
            Primitive::Gadget(_) if n == 0 => 0,
            Primitive::Gadget(_) => n.saturating_add(2),
        }
    }

    /// Whether the output length depends on the input length only.
    pub fn is_exact(&self) -> bool {
        matches!(
            self,
            Primitive::Base64Encode | Primitive::Ucs4Widen | Primitive::Swap4 | Primitive::Gadget(_)
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.filter_name() {
            Ok(name) => f.write_str(&name),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}

/// Apply a sequence of primitives in order.
pub fn apply_all<'a>(
    primitives: impl IntoIterator<Item = &'a Primitive>,
    input: &[u8],
) -> Result<Vec<u8>> {
    let mut buffer = input.to_vec();
    for primitive in primitives {
        buffer = primitive.apply(&buffer)?;
    }
    Ok(buffer)
}
