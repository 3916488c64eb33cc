//! Per-call configuration for [`Packer`](crate::Packer) and
//! [`Unpacker`](crate::Unpacker).

/// Default bound on container nesting, for both directions.
pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of nested containers (arrays, maps and extension
    /// envelopes). The root container is depth 1.
    pub max_depth: usize,
    /// When `false`, envelopes are returned as plain maps with their marker
    /// keys intact instead of being rebuilt through the registry.
    pub resolve_extensions: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            resolve_extensions: true,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn resolve_extensions(mut self, resolve: bool) -> Self {
        self.resolve_extensions = resolve;
        self
    }
}
