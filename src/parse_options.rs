//! Options for document decoding.

/// Default cap on control and shape nesting.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Options for controlling document decoding behavior.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// How to handle structural errors in the body.
    pub error_mode: ErrorMode,

    /// Whether to load and inflate `BinData` blobs.
    pub extract_resources: bool,

    /// Whether to decode sections in parallel.
    pub parallel: bool,

    /// Deepest nesting of paragraph lists and grouped shapes accepted.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            extract_resources: true,
            parallel: true,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets lenient error handling (drop broken paragraphs and sections).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Sets strict error handling (fail on any structural error).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Disables binary resource extraction.
    pub fn without_resources(mut self) -> Self {
        self.extract_resources = false;
        self
    }

    /// Disables parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Sets the nesting cap.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Returns true if structural errors in the body should be skipped.
    pub fn is_lenient(&self) -> bool {
        matches!(self.error_mode, ErrorMode::Lenient)
    }
}

/// How to handle structural errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail immediately on any structural error.
    #[default]
    Strict,
    /// Drop the failing top-level paragraph (or section) and continue.
    Lenient,
}
