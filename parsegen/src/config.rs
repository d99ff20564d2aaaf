/// Default limit on nested rule invocations. Sized so that a parse reaching
/// it still fits a 2 MiB thread stack in an unoptimized build.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for a single parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Record every rule entry and exit, and the rule stack at the furthest
    /// failure.
    pub trace: bool,
    /// Nested rule invocations allowed before the parse is aborted.
    pub max_depth: usize,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trace: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
