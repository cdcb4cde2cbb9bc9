//! Chain assembler
//!
//! Full layout, in application order:
//!
//! 1. pad the content with trailing garbage and escape it
//! 2. shift the prefix tail in front of the content so both fill whole
//!    9-byte groups
//! 3. double base64 encode and 3-align, then widen to UCS-4
//! 4. inject the chunk terminator and the suffix as triplets at the front
//! 5. rotate filler triplets until the suffix sits behind the dumped content
//! 6. inject a chunk header and the double-encoded prefix at the front
//! 7. decode, dechunk (which trims everything past the suffix), decode twice

use crate::cost::ChainCost;
use crate::injector::{push_char, push_char_safely, push_str_safely, push_triplet, Emit};
use crate::state::{sample_content, SynthesisState};
use crate::{Chain, SynthesisOpts, TargetSpec};
use tracing::debug;
use wrapchain_format::constants::*;
use wrapchain_format::{align_left, align_right, align_value, base64, catalog, Primitive};
use wrapchain_format::{Result, WrapError};

/// Everything injected by a synthesis, computed before any primitive is
/// emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionPlan {
    /// Content bytes the chain dumps
    pub dumped_len: usize,
    /// Base64 groups of the dumped content, in 4-character units
    pub nb_chunks: usize,
    /// Prefix right-padded to a multiple of 3
    pub padded_prefix: Vec<u8>,
    /// Tail of the padded prefix injected in front of the content
    pub shifted_prefix: Vec<u8>,
    /// Padding blocks run before the content is escaped
    pub pad_blocks: usize,
    /// Triplets injected for the suffix, in emission order (terminator first)
    pub suffix_triplets: Vec<[u8; 3]>,
    /// Number of filler triplets
    pub rotations: usize,
    /// Base64 characters pushed for the chunk header and prefix, in reading order
    pub prefix_payload: Vec<u8>,
    /// Whether the short prefix-only layout is used
    pub fast_prefix: bool,
}

impl InjectionPlan {
    /// Plan the injections for `target`.
    pub fn new(target: &TargetSpec, opts: &SynthesisOpts) -> Result<Self> {
        if opts.fast_prefix && !target.suffix.is_empty() {
            return Err(WrapError::InvalidTarget(
                "the prefix-only layout cannot add a suffix".to_string(),
            ));
        }

        let padded_prefix = align_right(&target.prefix, 3, opts.padding_character);

        if opts.fast_prefix {
            return Ok(Self {
                dumped_len: target.estimated_len,
                nb_chunks: 0,
                prefix_payload: base64::encode(&padded_prefix),
                padded_prefix,
                shifted_prefix: Vec::new(),
                pad_blocks: 0,
                suffix_triplets: Vec::new(),
                rotations: 0,
                fast_prefix: true,
            });
        }

        let (dumped_len, shift) = dump_window(target.estimated_len, padded_prefix.len());
        let (head, shifted) = padded_prefix.split_at(padded_prefix.len() - shift);
        let shifted_prefix = shifted.to_vec();
        let nb_chunks = (shift + dumped_len) / DUMP_ALIGNMENT * 4;

        let suffix_b64 = base64::encode(&target.suffix);
        let mut suffix_triplets = vec![CHUNK_TERMINATOR];
        let mut reverse = false;
        for pair in suffix_b64.chunks(2).rev() {
            let mut triplet = set_low_bits(&base64::encode_unpadded(pair))?;
            if reverse {
                triplet.reverse();
            }
            suffix_triplets.push(triplet);
            reverse = !reverse;
        }

        let inner = align_right(&base64::encode(head), 9, 0x00);
        let encoded_prefix = base64::encode(&inner);
        let size = suffix_b64.len() / 2 * 4 + nb_chunks * 16 + 2 + 7 + encoded_prefix.len();
        let mut header = align_left(format!("{size:x}\n").as_bytes(), 3, b'0');
        let chunked_len = header.len() + size + CHUNK_TERMINATOR.len();
        header.extend_from_slice(&encoded_prefix);

        let pad_blocks = pad_blocks_for(target.estimated_len, &shifted_prefix, chunked_len)?;
        debug!(dumped_len, shift, pad_blocks, chunked_len, "planned injections");

        Ok(Self {
            dumped_len,
            nb_chunks,
            padded_prefix,
            shifted_prefix,
            pad_blocks,
            suffix_triplets,
            rotations: nb_chunks * 4 + 2,
            prefix_payload: base64::encode(&header),
            fast_prefix: false,
        })
    }

    /// Every character a gadget has to produce, with repetitions.
    pub fn injected_chars(&self) -> Vec<u8> {
        let mut chars = Vec::new();
        if !self.fast_prefix {
            chars.extend(base64::encode(&self.shifted_prefix));
            chars.extend_from_slice(b"AAAA");
            for triplet in &self.suffix_triplets {
                chars.extend(base64::encode(triplet));
            }
            chars.extend(base64::encode(&FILLER_TRIPLET));
        }
        chars.extend_from_slice(&self.prefix_payload);
        chars
    }
}

/// Choose the dumped length and how many prefix bytes move in front of the
/// content.
///
/// The dump only ends on a base64 group, so the estimate is rounded up to a
/// multiple of 3. The chunked layout then cuts shifted prefix plus content on
/// a multiple of 9; the prefix tail fills the gap when it is long enough,
/// otherwise the dump grows by another group.
fn dump_window(estimated_len: usize, prefix_len: usize) -> (usize, usize) {
    let mut dumped_len = align_value(estimated_len, CONTENT_ALIGNMENT);
    loop {
        let shift = align_value(dumped_len, DUMP_ALIGNMENT) - dumped_len;
        if shift <= prefix_len {
            return (dumped_len, shift);
        }
        dumped_len += CONTENT_ALIGNMENT;
    }
}

/// Smallest number of padding blocks after which the widened buffer holds
/// the whole chunked body.
///
/// Every injection drops bytes off the tail, and the chunk reaches into the
/// base64 characters behind the content, so the clean part of the escaped
/// buffer has to outgrow the header, the prefix, the rotated content and the
/// suffix. Its length does not depend on the content, which lets a canonical
/// sample of the estimated length stand in for it.
fn pad_blocks_for(
    estimated_len: usize,
    shifted_prefix: &[u8],
    chunked_len: usize,
) -> Result<usize> {
    let mut block = Chain::new();
    emit_pad_block(&mut block)?;
    let mut escape = Chain::new();
    emit_escape(&mut escape, shifted_prefix)?;

    let mut padded = sample_content(estimated_len.max(1));
    for blocks in 1..=MAX_PAD_BLOCKS {
        padded = block.apply(&padded)?;
        let escaped = escape.apply(&padded)?;
        // Leading NULs come from the alignment; the first other byte outside
        // the alphabet starts the trailing artifacts.
        let clean = escaped
            .iter()
            .take_while(|&&b| b == 0 || base64::alphabet_index(b).is_some())
            .count();
        if clean * 4 >= chunked_len {
            return Ok(blocks);
        }
    }
    Err(WrapError::InvalidTarget(format!(
        "a chunked body of {chunked_len} bytes needs more than {MAX_PAD_BLOCKS} padding blocks"
    )))
}

/// Append trailing garbage behind the content so that later alignment and
/// injections trim garbage instead of content.
fn emit_pad_block<E: Emit + ?Sized>(sink: &mut E) -> Result<()> {
    sink.emit(Primitive::Base64Encode)?;
    for _ in 0..PAD_ROUNDS {
        sink.emit_all(&[Primitive::Base64Encode, Primitive::RemoveEqual])?;
    }
    for _ in 0..PAD_ROUNDS {
        sink.emit_all(&[Primitive::Base64Decode, Primitive::RemoveEqual])?;
    }
    sink.emit(Primitive::Base64Decode)
}

/// Escape the padded content, put the shifted prefix in front of it, encode
/// twice and align.
fn emit_escape<E: Emit + ?Sized>(sink: &mut E, shifted_prefix: &[u8]) -> Result<()> {
    sink.emit(Primitive::QuotedPrintableEncode)?;
    if !shifted_prefix.is_empty() {
        sink.emit(Primitive::Base64Encode)?;
        push_str_safely(sink, &base64::encode(shifted_prefix))?;
        sink.emit(Primitive::Base64Decode)?;
    }
    sink.emit_all(&[Primitive::Base64Encode, Primitive::Base64Encode])?;
    emit_align(sink)
}

/// Make the twice-encoded payload 3-aligned, so its next encoding is
/// 4-aligned.
fn emit_align<E: Emit + ?Sized>(sink: &mut E) -> Result<()> {
    sink.emit_all(&[
        Primitive::Base64Encode,
        Primitive::QuotedPrintableEncode,
        Primitive::RemoveEqual,
    ])?;
    push_char(sink, b'A')?;
    sink.emit_all(&[Primitive::QuotedPrintableEncode, Primitive::RemoveEqual])?;
    push_char(sink, b'A')?;
    sink.emit_all(&[Primitive::QuotedPrintableEncode, Primitive::RemoveEqual])?;
    push_char_safely(sink, b'A')?;
    push_char_safely(sink, b'A')?;
    sink.emit(Primitive::Base64Decode)
}

/// Set the two low bits of the third character of a 3-character group.
///
/// Once decoded, the byte that follows the group gets its top bits set: it is
/// no longer ASCII, so the next decode skips it.
fn set_low_bits(group: &[u8]) -> Result<[u8; 3]> {
    let [a, b, c] = group else {
        return Err(WrapError::PreconditionViolation(format!(
            "suffix group of {} characters",
            group.len()
        )));
    };
    let idx = base64::alphabet_index(*c)
        .filter(|idx| idx % 4 == 0)
        .ok_or_else(|| {
            WrapError::PreconditionViolation(format!("suffix group ends with {:?}", *c as char))
        })?;
    Ok([*a, *b, BASE64_ALPHABET[idx as usize + 3]])
}

/// Result of a synthesis.
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// The assembled chain
    pub chain: Chain,
    /// Injection plan the chain was built from
    pub plan: InjectionPlan,
    /// Cost of the chain
    pub cost: ChainCost,
    /// Cost-model length before the first and after every step
    pub length_trace: Vec<usize>,
    /// Whether the chain was checked against a canonical source
    pub verified: bool,
}

/// Builds a chain one primitive at a time.
pub struct ChainAssembler {
    opts: SynthesisOpts,
    chain: Chain,
    state: SynthesisState,
}

impl Emit for ChainAssembler {
    fn emit(&mut self, primitive: Primitive) -> Result<()> {
        self.state.record(&primitive)?;
        self.chain.emit(primitive)
    }
}

impl ChainAssembler {
    /// Create an assembler for a source of `source_len` bytes.
    pub fn new(opts: SynthesisOpts, source_len: usize) -> Self {
        let state = SynthesisState::new(source_len, opts.verify);
        Self {
            opts,
            chain: Chain::new(),
            state,
        }
    }

    /// Current synthesis state
    pub fn state(&self) -> &SynthesisState {
        &self.state
    }

    /// Assemble the chain for `target`.
    pub fn assemble(mut self, target: &TargetSpec) -> Result<Synthesis> {
        let plan = InjectionPlan::new(target, &self.opts)?;

        if target.is_identity() {
            debug!("empty prefix and suffix, emitting the identity chain");
        } else {
            catalog::validate(&plan.injected_chars())?;
            if plan.fast_prefix {
                self.add_prefix_only(&plan)?;
            } else {
                self.prelude(&plan)?;
                self.add_suffix(&plan)?;
                self.rotate(&plan)?;
                self.add_prefix(&plan)?;
                self.postlude()?;
            }
        }

        let verified = self.verify(target, &plan)?;
        let cost = ChainCost::of(&self.chain)?.with_peak_buffer(self.state.peak_sample());
        debug!(
            steps = cost.steps,
            injections = cost.injections,
            filters_len = cost.filters_len,
            "assembled chain"
        );

        Ok(Synthesis {
            length_trace: self.state.trace().to_vec(),
            chain: self.chain,
            plan,
            cost,
            verified,
        })
    }

    fn add_prefix_only(&mut self, plan: &InjectionPlan) -> Result<()> {
        debug!(chars = plan.prefix_payload.len(), "prefix-only layout");
        self.emit_all(&[Primitive::Base64Encode, Primitive::RemoveEqual])?;
        push_str_safely(self, &plan.prefix_payload)?;
        self.emit(Primitive::Base64Decode)
    }

    fn prelude(&mut self, plan: &InjectionPlan) -> Result<()> {
        debug!(
            pad_blocks = plan.pad_blocks,
            shifted = plan.shifted_prefix.len(),
            "padding, escaping and aligning content"
        );
        for _ in 0..plan.pad_blocks {
            emit_pad_block(self)?;
        }
        emit_escape(self, &plan.shifted_prefix)?;
        self.emit(Primitive::Ucs4Widen)
    }

    fn triplet(&mut self, triplet: [u8; 3]) -> Result<()> {
        self.state.require_aligned(12, "triplet injection")?;
        push_triplet(self, triplet)
    }

    fn add_suffix(&mut self, plan: &InjectionPlan) -> Result<()> {
        debug!(triplets = plan.suffix_triplets.len(), "injecting suffix");
        for &triplet in &plan.suffix_triplets {
            self.triplet(triplet)?;
        }
        Ok(())
    }

    fn rotate(&mut self, plan: &InjectionPlan) -> Result<()> {
        debug!(rotations = plan.rotations, "moving suffix behind content");
        for _ in 0..plan.rotations {
            self.triplet(FILLER_TRIPLET)?;
        }
        Ok(())
    }

    fn add_prefix(&mut self, plan: &InjectionPlan) -> Result<()> {
        debug!(chars = plan.prefix_payload.len(), "injecting chunk header and prefix");
        self.emit(Primitive::Base64Encode)?;
        push_str_safely(self, &plan.prefix_payload)
    }

    fn postlude(&mut self) -> Result<()> {
        self.emit_all(&[
            Primitive::Base64Decode,
            Primitive::Dechunk,
            Primitive::Base64Decode,
            Primitive::Base64Decode,
        ])
    }

    /// Check the canonical output against the target. Returns whether a check
    /// took place.
    fn verify(&self, target: &TargetSpec, plan: &InjectionPlan) -> Result<bool> {
        let Some(output) = self.state.sample() else {
            return Ok(false);
        };
        let source = sample_content(target.estimated_len.max(1));

        let ok = if target.is_identity() {
            output == source.as_slice()
        } else if plan.fast_prefix {
            output.starts_with(&plan.padded_prefix)
        } else {
            let shown = &source[..source.len().min(plan.dumped_len)];
            let expected_len = plan.padded_prefix.len() + plan.dumped_len + target.suffix.len();
            output.len() == expected_len
                && output.starts_with(&plan.padded_prefix)
                && output[plan.padded_prefix.len()..].starts_with(shown)
                && output.ends_with(&target.suffix)
        };

        if !ok {
            return Err(WrapError::PreconditionViolation(format!(
                "chain output of {} bytes does not wrap a {} byte source as requested",
                output.len(),
                source.len()
            )));
        }
        Ok(true)
    }
}
