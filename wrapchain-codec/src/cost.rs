//! Cost model of a chain

use crate::Chain;
use wrapchain_format::constants::FILTER_SEPARATOR;
use wrapchain_format::{Limits, Result, WrapError};

/// Resource cost of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainCost {
    /// Number of filters
    pub steps: usize,
    /// Injected characters
    pub injections: usize,
    /// Length of the filter list once joined with separators
    pub filters_len: usize,
    /// Largest intermediate buffer for a canonical source, when measured
    pub peak_buffer: Option<usize>,
}

impl ChainCost {
    /// Cost of `chain` without a buffer measurement.
    ///
    /// Fails on a gadget the catalog cannot name, since such a chain has no
    /// serialized form.
    pub fn of(chain: &Chain) -> Result<Self> {
        let mut names = 0;
        for primitive in chain {
            names += primitive.serialized_len()?;
        }
        let separators = chain.len().saturating_sub(1) * FILTER_SEPARATOR.len_utf8();
        Ok(Self {
            steps: chain.len(),
            injections: chain.gadget_count(),
            filters_len: names + separators,
            peak_buffer: None,
        })
    }

    /// Attach a measured peak buffer size.
    pub fn with_peak_buffer(mut self, peak: Option<usize>) -> Self {
        self.peak_buffer = peak;
        self
    }

    /// Compare against interpreter limits. `overhead` is the serialized length
    /// outside the filter list (wrapper and resource).
    pub fn check(&self, limits: &Limits, overhead: usize) -> Result<()> {
        let total = self.filters_len + overhead;
        if total > limits.max_chain_len {
            return Err(WrapError::LimitExceeded(format!(
                "chain is {total} bytes (limit: {} bytes)",
                limits.max_chain_len
            )));
        }
        if let Some(peak) = self.peak_buffer {
            if peak > limits.max_buffer_len {
                return Err(WrapError::LimitExceeded(format!(
                    "intermediate buffer reaches {peak} bytes (limit: {} bytes)",
                    limits.max_buffer_len
                )));
            }
        }
        Ok(())
    }
}

/// Fold the cost model along `chain`, starting from `source_len`.
///
/// Returns the length before the first step and after every step.
pub fn length_trace(chain: &Chain, source_len: usize) -> Vec<usize> {
    let mut trace = Vec::with_capacity(chain.len() + 1);
    trace.push(source_len);
    let mut len = source_len;
    for primitive in chain {
        len = primitive.length_after(len);
        trace.push(len);
    }
    trace
}
