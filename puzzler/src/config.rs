//! Runtime configuration for codec contexts.
//!
//! See [`ContextConfig`] for the knobs a [`PersistContext`](crate::persist::PersistContext)
//! honours while decoding.

pub const DEFAULT_PREALLOCATION_SIZE_LIMIT: usize = 256 << 20; // 256 MiB
pub const PREALLOCATION_SIZE_LIMIT_DISABLED: usize = usize::MAX;
/// Largest solver allocation a decoded payload may imply.
pub const MAX_WORKING_SET: usize = DEFAULT_PREALLOCATION_SIZE_LIMIT;

/// Format tag leading every input record.
pub const INPUT_FORMAT: &str = "puzzle.input.v0";
/// Format tag leading every output record.
pub const OUTPUT_FORMAT: &str = "puzzle.output.v0";

/// Per-context settings.
///
/// Defaults:
/// - Preallocation size limit is 256 MiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    preallocation_size_limit: usize,
}

impl ContextConfig {
    pub const fn new() -> Self {
        Self {
            preallocation_size_limit: DEFAULT_PREALLOCATION_SIZE_LIMIT,
        }
    }

    /// Use the given preallocation size limit, in bytes.
    ///
    /// A decoded length prefix whose backing allocation would exceed the limit is rejected
    /// before anything is allocated. Pass [`PREALLOCATION_SIZE_LIMIT_DISABLED`] to accept any
    /// length.
    pub const fn with_preallocation_size_limit(mut self, limit: usize) -> Self {
        self.preallocation_size_limit = limit;
        self
    }

    /// Disable the preallocation size limit.
    pub const fn disable_preallocation_size_limit(self) -> Self {
        self.with_preallocation_size_limit(PREALLOCATION_SIZE_LIMIT_DISABLED)
    }

    #[inline]
    pub const fn preallocation_size_limit(&self) -> usize {
        self.preallocation_size_limit
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self::new()
    }
}
