//! Constants and filter names for php://filter chains

/// Scheme and wrapper name that prefixes every serialized chain.
pub const FILTER_WRAPPER: &str = "php://filter";

/// Separator between filters in a serialized chain.
pub const FILTER_SEPARATOR: char = '|';

/// Filter name for base64 encoding.
pub const FILTER_BASE64_ENCODE: &str = "convert.base64-encode";
/// Filter name for base64 decoding.
pub const FILTER_BASE64_DECODE: &str = "convert.base64-decode";
/// Filter name for quoted-printable encoding.
pub const FILTER_QUOTED_PRINTABLE_ENCODE: &str = "convert.quoted-printable-encode";
/// CP855 to UTF-7 conversion; turns `=` into base64-harmless bytes.
pub const FILTER_REMOVE_EQUAL: &str = "convert.iconv.855.UTF7";
/// CP437 to little-endian UCS-4; widens every byte to four.
pub const FILTER_UCS4_WIDEN: &str = "convert.iconv.437.UCS-4le";
/// UCS-4 to UCS-4LE; reverses every 4-byte group.
pub const FILTER_SWAP4: &str = "convert.iconv.UCS-4.UCS-4LE";
/// HTTP chunked transfer decoding.
pub const FILTER_DECHUNK: &str = "dechunk";

/// The 64 characters of the standard base64 alphabet, in index order.
pub const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Base64 padding byte.
pub const BASE64_PAD: u8 = b'=';

/// Byte every character gadget emits ahead of its payload character.
pub const GADGET_ESCAPE: u8 = 0x1b;

/// Default byte used to right-align the prefix to a multiple of 3.
pub const DEFAULT_PADDING_CHARACTER: u8 = b'M';

/// The dumped content is a whole number of base64 groups.
pub const CONTENT_ALIGNMENT: usize = 3;

/// Content and the prefix bytes shifted in front of it fill groups of this
/// many bytes.
pub const DUMP_ALIGNMENT: usize = 9;

/// Terminating zero-size chunk, injected before the suffix.
pub const CHUNK_TERMINATOR: [u8; 3] = *b"\n0\n";

/// Filler triplet that rotates the suffix behind the content.
///
/// Its base64 form `CCkC` is cheap to inject.
pub const FILLER_TRIPLET: [u8; 3] = [0x08, 0x29, 0x02];

/// Encode and decode rounds in one padding block.
pub const PAD_ROUNDS: usize = 3;

/// Upper bound on the padding blocks run before escaping the content.
pub const MAX_PAD_BLOCKS: usize = 64;
