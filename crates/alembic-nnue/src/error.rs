//! Error types for evaluation files.

/// Errors raised while reading or checking an evaluation file.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The file does not start with the supported version tag.
    #[error("unsupported file version {found:#010x} (expected {expected:#010x})")]
    Version {
        /// Supported version tag.
        expected: u32,
        /// Tag found in the file.
        found: u32,
    },

    /// The feature transformer was trained for a different layout.
    #[error("feature transformer hash {found:#010x} does not match layout ({expected:#010x})")]
    TransformerHash {
        /// Hash derived from the active layout.
        expected: u32,
        /// Hash stored in the file.
        found: u32,
    },

    /// Parameter arrays do not match the layout dimensions.
    #[error("expected {expected} parameters, found {found}")]
    Shape {
        /// Required parameter count.
        expected: usize,
        /// Supplied parameter count.
        found: usize,
    },

    /// I/O error while reading or writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
