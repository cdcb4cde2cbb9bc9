//! Resource limits for synthesized chains

/// Practical limits of the interpreter that runs a chain.
///
/// Synthesis never enforces these on its own; callers compare a chain's cost
/// against them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum serialized chain length in bytes (default: 1 MiB)
    pub max_chain_len: usize,
    /// Maximum intermediate buffer the interpreter may hold (default: 128 MiB)
    pub max_buffer_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_chain_len: 1024 * 1024,
            max_buffer_len: 128 * 1024 * 1024,
        }
    }
}
