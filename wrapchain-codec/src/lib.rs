//! wrapchain Codec - Chain synthesis engine
//!
//! This crate turns a target (prefix, suffix, estimated source length) into a
//! chain of filters:
//!
//! - Byte injector built on character gadgets
//! - Chain assembler with its synthesis state
//! - Cost model for assembled chains

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod assembler;
pub mod chain;
pub mod cost;
pub mod injector;
pub mod state;

// Re-export commonly used types
pub use wrapchain_format::{Limits, Primitive, Result, WrapError};

// Re-export our own types
pub use assembler::{ChainAssembler, InjectionPlan, Synthesis};
pub use chain::Chain;
pub use cost::{length_trace, ChainCost};
pub use injector::Emit;
pub use state::SynthesisState;

use wrapchain_format::constants::DEFAULT_PADDING_CHARACTER;

/// What to wrap around the source content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    /// Bytes placed before the content
    pub prefix: Vec<u8>,
    /// Bytes placed after the content
    pub suffix: Vec<u8>,
    /// Estimated length of the source, in bytes
    pub estimated_len: usize,
}

impl TargetSpec {
    /// Create a target
    pub fn new(prefix: Vec<u8>, suffix: Vec<u8>, estimated_len: usize) -> Self {
        Self {
            prefix,
            suffix,
            estimated_len,
        }
    }

    /// Whether nothing has to be added
    pub fn is_identity(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }
}

/// Synthesis options
#[derive(Debug, Clone)]
pub struct SynthesisOpts {
    /// Byte used to right-align the prefix to a multiple of 3
    pub padding_character: u8,
    /// Use the short prefix-only layout, which truncates the content's tail
    pub fast_prefix: bool,
    /// Run a canonical source through the chain while assembling it
    pub verify: bool,
    /// Interpreter limits reported against
    pub limits: Limits,
}

impl Default for SynthesisOpts {
    fn default() -> Self {
        Self {
            padding_character: DEFAULT_PADDING_CHARACTER,
            fast_prefix: false,
            verify: true,
            limits: Limits::default(),
        }
    }
}

/// Assemble the chain for `target`.
pub fn synthesize(target: &TargetSpec, opts: &SynthesisOpts) -> Result<Synthesis> {
    ChainAssembler::new(opts.clone(), target.estimated_len).assemble(target)
}
