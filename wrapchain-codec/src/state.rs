//! Synthesis state tracked while the assembler emits primitives

use wrapchain_format::{Primitive, Result, WrapError};

/// Printable bytes that quoted-printable encoding leaves untouched.
const SAMPLE_PATTERN: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz:/ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Canonical stand-in for a source of `len` bytes.
pub fn sample_content(len: usize) -> Vec<u8> {
    SAMPLE_PATTERN.iter().copied().cycle().take(len).collect()
}

/// Buffer bookkeeping for the chain emitted so far.
///
/// `bound` follows the cost model of each primitive. When verification is on,
/// a canonical source of the estimated length is also run through every
/// primitive, giving the exact length the chain produces for it.
#[derive(Debug, Clone)]
pub struct SynthesisState {
    bound: usize,
    trace: Vec<usize>,
    sample: Option<Vec<u8>>,
    peak_sample: usize,
    injected: usize,
}

impl SynthesisState {
    /// Start from a source of `source_len` bytes.
    pub fn new(source_len: usize, verify: bool) -> Self {
        // An estimate of zero still needs bytes to act on.
        let sample = verify.then(|| sample_content(source_len.max(1)));
        let peak_sample = sample.as_ref().map_or(0, Vec::len);
        Self {
            bound: source_len,
            trace: vec![source_len],
            sample,
            peak_sample,
            injected: 0,
        }
    }

    /// Record one emitted primitive.
    pub fn record(&mut self, primitive: &Primitive) -> Result<()> {
        let next_bound = primitive.length_after(self.bound);

        if let Some(sample) = self.sample.as_ref() {
            let out = primitive.apply(sample)?;
            let expected = primitive.length_after(sample.len());
            if primitive.is_exact() && out.len() != expected {
                return Err(WrapError::PreconditionViolation(format!(
                    "{primitive}: cost model gives {expected} bytes, filter produced {}",
                    out.len()
                )));
            }
            self.peak_sample = self.peak_sample.max(out.len());
            self.sample = Some(out);
        }

        if matches!(primitive, Primitive::Gadget(_)) {
            self.injected += 1;
        }
        self.bound = next_bound;
        self.trace.push(next_bound);
        Ok(())
    }

    /// Cost-model length after every step, starting with the source length.
    pub fn trace(&self) -> &[usize] {
        &self.trace
    }

    /// Cost-model length of the current buffer.
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Current canonical buffer, when verifying.
    pub fn sample(&self) -> Option<&[u8]> {
        self.sample.as_deref()
    }

    /// Largest canonical buffer seen, when verifying.
    pub fn peak_sample(&self) -> Option<usize> {
        self.sample.as_ref().map(|_| self.peak_sample)
    }

    /// Number of injected characters so far.
    pub fn injected(&self) -> usize {
        self.injected
    }

    /// Fail unless the canonical buffer length is a multiple of `n`.
    pub fn require_aligned(&self, n: usize, what: &str) -> Result<()> {
        match self.sample.as_ref() {
            Some(sample) if sample.len() % n != 0 => Err(WrapError::PreconditionViolation(
                format!("{what}: buffer of {} bytes is not {n}-aligned", sample.len()),
            )),
            _ => Ok(()),
        }
    }
}
