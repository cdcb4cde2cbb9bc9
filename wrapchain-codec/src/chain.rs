//! The chain entity: an ordered list of primitives

use crate::injector::Emit;
use wrapchain_format::{apply_all, Primitive, Result};

/// Ordered sequence of filters, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    steps: Vec<Primitive>,
}

impl Chain {
    /// Create an empty (identity) chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of filters
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether this is the identity chain
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Filters in application order
    pub fn steps(&self) -> &[Primitive] {
        &self.steps
    }

    /// Iterate over filters in application order
    pub fn iter(&self) -> std::slice::Iter<'_, Primitive> {
        self.steps.iter()
    }

    /// Run the chain over `input` using the filter models.
    pub fn apply(&self, input: &[u8]) -> Result<Vec<u8>> {
        apply_all(&self.steps, input)
    }

    /// Number of gadget filters, i.e. injected characters
    pub fn gadget_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|p| matches!(p, Primitive::Gadget(_)))
            .count()
    }
}

impl Emit for Chain {
    fn emit(&mut self, primitive: Primitive) -> Result<()> {
        self.steps.push(primitive);
        Ok(())
    }
}

impl From<Vec<Primitive>> for Chain {
    fn from(steps: Vec<Primitive>) -> Self {
        Self { steps }
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Primitive;
    type IntoIter = std::slice::Iter<'a, Primitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
