//! Rendering options and configuration.

/// Options controlling block tree traversal.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Maximum recursion depth before a branch soft-fails to empty.
    pub max_depth: usize,

    /// Bound on concurrent source fetches across sibling subtrees.
    pub max_concurrency: usize,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum recursion depth (minimum 1).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Set the fetch concurrency bound (minimum 1; 1 renders sequentially).
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    /// Disable sibling concurrency entirely.
    pub fn sequential(self) -> Self {
        self.with_max_concurrency(1)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_concurrency: 8,
        }
    }
}
