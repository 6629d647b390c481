//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The market file could not be read.
    #[error("Cannot read market file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The market file extension is neither `.toml` nor `.json`.
    #[error("Unsupported market file format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    /// The market file content is malformed.
    #[error("Invalid market file {path}: {message}")]
    InvalidMarket {
        /// File path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A quote cannot be turned into an instrument.
    #[error("Invalid quote {index} of curve {curve}: {message}")]
    InvalidQuote {
        /// Curve name.
        curve: String,
        /// Position of the quote in the curve.
        index: usize,
        /// Description of the problem.
        message: String,
    },
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
