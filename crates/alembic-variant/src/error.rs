//! Error types for variant definition and registration.

use std::path::PathBuf;

/// Diagnostics produced while defining, concluding or registering variants.
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    /// The board does not fit the 12×10 grid.
    #[error("board of {files}x{ranks} exceeds the 12x10 grid")]
    BoardTooLarge {
        /// Number of files requested.
        files: usize,
        /// Number of ranks requested.
        ranks: usize,
    },

    /// A variant of that name is already registered.
    #[error("variant '{name}' already exists")]
    DuplicateVariant {
        /// The clashing name.
        name: String,
    },

    /// The parent named in a `[name:parent]` header is not registered.
    #[error("variant '{name}' derives from unknown template '{template}'")]
    UnknownTemplate {
        /// Variant being defined.
        name: String,
        /// Missing parent.
        template: String,
    },

    /// A configuration line without `key = value` shape.
    #[error("invalid syntax: '{line}'")]
    InvalidSyntax {
        /// The offending line.
        line: String,
    },

    /// A recognised key whose value cannot be parsed.
    #[error("invalid value '{value}' for option '{key}'")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// A key no rule consumes.
    #[error("unknown option '{key}' in variant '{variant}'")]
    UnknownKey {
        /// Variant being defined.
        variant: String,
        /// Unused key.
        key: String,
    },

    /// Reading a configuration file failed.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
