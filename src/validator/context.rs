//! Evaluation context: reference-depth tracking and the key-value-coding
//! collaborator, threaded through a `validate` call.

use std::sync::Arc;

use super::kvc::KvcSource;

/// Carried through a single `validate` call. Cheap to clone: two `usize`s
/// and an `Option<Arc<..>>`.
///
/// Depth only increments when evaluation passes through a `Reference`
/// validator — it bounds recursion against pathologically cyclic *values*
/// validated by a cyclic *schema*, not general nesting depth (spec §9).
#[derive(Clone)]
pub struct EvalContext {
    pub depth: usize,
    pub max_depth: usize,
    pub kvc_source: Option<Arc<dyn KvcSource>>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self {
            depth: 0,
            max_depth: 128,
            kvc_source: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_kvc_source(mut self, source: Arc<dyn KvcSource>) -> Self {
        self.kvc_source = Some(source);
        self
    }

    /// Returns a context for one more reference hop.
    pub fn enter(&self) -> Self {
        Self {
            depth: self.depth + 1,
            max_depth: self.max_depth,
            kvc_source: self.kvc_source.clone(),
        }
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
