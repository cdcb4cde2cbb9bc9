//! Chain serializer: renders a chain as a `php://filter` URL

use wrapchain_codec::Chain;
use wrapchain_format::constants::{FILTER_SEPARATOR, FILTER_WRAPPER};
use wrapchain_format::Result;

/// Render `chain` over `resource`.
///
/// Filters appear left to right in application order: the interpreter applies
/// the leftmost filter to the resource first.
pub fn serialize(chain: &Chain, resource: &str) -> Result<String> {
    let mut out = String::from(FILTER_WRAPPER);
    out.push('/');
    for (i, primitive) in chain.iter().enumerate() {
        if i > 0 {
            out.push(FILTER_SEPARATOR);
        }
        out.push_str(&primitive.filter_name()?);
    }
    if !chain.is_empty() {
        out.push('/');
    }
    out.push_str("resource=");
    out.push_str(resource);
    Ok(out)
}

/// Serialized length outside the filter list.
pub fn overhead(chain: &Chain, resource: &str) -> usize {
    let closing = if chain.is_empty() { 0 } else { 1 };
    FILTER_WRAPPER.len() + 1 + closing + "resource=".len() + resource.len()
}
