//! Scanner limits

use crate::constants::DEFAULT_MAX_DEPTH;

/// Limits applied while scanning untrusted JSON text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of arrays and objects (default: 128)
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Limits {
    /// Limits with no practical nesting bound, for input that was already validated
    pub fn unbounded() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}
