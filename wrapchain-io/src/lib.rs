//! wrapchain I/O - Chain serialization and high-level APIs
//!
//! This crate provides the outer layer of wrapchain:
//!
//! - Chain serializer (`php://filter` URLs)
//! - Output writer
//! - High-level synthesize-and-write request

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod serializer;
pub mod writer;

// Re-export commonly used types
pub use serializer::serialize;
pub use wrapchain_codec::{
    synthesize, Chain, ChainCost, Synthesis, SynthesisOpts, TargetSpec,
};
pub use wrapchain_format::{Limits, Result, WrapError};
pub use writer::{write_chain, OutputSink};

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// A complete synthesis job
#[derive(Debug)]
pub struct SynthesizeRequest {
    /// Path or identifier of the resource the chain reads
    pub resource: String,
    /// What to wrap around the resource
    pub target: TargetSpec,
    /// Where to write the chain
    pub output: OutputSink,
    /// Synthesis options
    pub options: SynthesisOpts,
    /// Fail instead of warning when the chain exceeds the limits
    pub strict_limits: bool,
}

/// Outcome of a synthesis job
#[derive(Debug, Clone, Serialize)]
pub struct SynthesizeSummary {
    /// Resource the chain reads
    pub resource: String,
    /// Bytes of content the chain dumps
    pub dumped_len: usize,
    /// Output file, when writing to a file
    pub output: Option<PathBuf>,
    /// Size of the written chain, in bytes
    pub bytes_written: usize,
    /// Number of filters in the chain
    pub filters: usize,
    /// Number of injected characters
    pub injections: usize,
    /// Whether the chain was checked against a canonical source
    pub verified: bool,
    /// Largest intermediate buffer for a canonical source, when verified
    pub peak_buffer: Option<usize>,
    /// Limit the chain exceeds, if any
    pub limit_warning: Option<String>,
}

/// Synthesize, serialize and write a chain.
///
/// Nothing is written when synthesis fails.
pub fn execute_synthesize(request: SynthesizeRequest) -> Result<SynthesizeSummary> {
    let SynthesizeRequest {
        resource,
        target,
        output,
        options,
        strict_limits,
    } = request;

    let synthesis = synthesize(&target, &options)?;
    let text = serialize(&synthesis.chain, &resource)?;

    let overhead = serializer::overhead(&synthesis.chain, &resource);
    let limit_warning = match synthesis.cost.check(&options.limits, overhead) {
        Ok(()) => None,
        Err(err) if !strict_limits => {
            warn!("{err}");
            Some(err.to_string())
        }
        Err(err) => return Err(err),
    };

    let output_path = output.path().cloned();
    let bytes_written = write_chain(output, &text)?;
    info!(
        resource = %resource,
        bytes = bytes_written,
        filters = synthesis.cost.steps,
        "wrote filter chain"
    );

    Ok(SynthesizeSummary {
        resource,
        dumped_len: synthesis.plan.dumped_len,
        output: output_path,
        bytes_written,
        filters: synthesis.cost.steps,
        injections: synthesis.cost.injections,
        verified: synthesis.verified,
        peak_buffer: synthesis.cost.peak_buffer,
        limit_warning,
    })
}
