//! Error types for configuration, genome decoding and persistence.

use thiserror::Error;

/// Errors raised when a genome string cannot be turned back into a brain.
///
/// Any of these means the heredity chain is broken, so they are surfaced to
/// whoever is constructing the agent instead of being replaced by a founder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenomeError {
    /// The genome does not start with the expected tag.
    #[error("genome is missing the `{expected}` header")]
    MissingHeader {
        /// Header every genome starts with.
        expected: &'static str,
    },
    /// The header names a format version this build cannot read.
    #[error("unsupported genome version {0}")]
    UnsupportedVersion(String),
    /// The layout section is not three positive integers.
    #[error("invalid genome layout `{0}`")]
    InvalidLayout(String),
    /// The payload has the wrong number of characters for the layout.
    #[error("payload holds {actual} hex digits, layout requires {expected}")]
    PayloadLength {
        /// Digits required by the layout.
        expected: usize,
        /// Digits found.
        actual: usize,
    },
    /// A parameter chunk is not hexadecimal.
    #[error("parameter {index} is not valid hex")]
    InvalidHex {
        /// Index of the offending parameter.
        index: usize,
    },
    /// A parameter decodes to NaN or infinity.
    #[error("parameter {index} is not a finite number")]
    NonFinite {
        /// Index of the offending parameter.
        index: usize,
    },
    /// The text decodes but would not re-encode to the same string.
    #[error("genome is not in canonical form")]
    NonCanonical,
    /// The genome was built for a different network shape.
    #[error("genome layout {found:?} does not match expected layout {expected:?}")]
    LayoutMismatch {
        /// Layout the caller needs (inputs, hidden, outputs).
        expected: (usize, usize, usize),
        /// Layout recorded in the genome.
        found: (usize, usize, usize),
    },
}

/// Errors raised when validating simulation parameters or the world map.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A size, rate or count that must be positive is not.
    #[error("`{0}` must be positive")]
    NonPositive(&'static str),
    /// A value is outside its allowed range.
    #[error("`{field}` is out of range: {reason}")]
    OutOfRange {
        /// Offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// A per-species value is invalid.
    #[error("`{species}.{field}` {reason}")]
    Species {
        /// `predator` or `prey`.
        species: &'static str,
        /// Offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// The tile map is unusable.
    #[error("invalid map: {0}")]
    InvalidMap(String),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    /// Genome decoding failed.
    #[error(transparent)]
    Genome(#[from] GenomeError),
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// File access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON (de)serialisation failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
