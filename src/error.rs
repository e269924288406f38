//! Error types for the txcoord library.

use thiserror::Error;

/// Errors that can occur during transcript coordinate operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// Malformed construction input: exons, introns, transcripts or CDS markers.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A position lies outside the genomic or cDNA span it was resolved against.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// The requested conversion is not available.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Transcript data broke an internal invariant, e.g. non-adjacent exon ranks.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A coding query was made against a transcript without a coding region.
    #[error("non-coding transcript: {0}")]
    NonCoding(String),

    /// The sequence provider could not deliver the requested bases.
    #[error("sequence: {0}")]
    Sequence(String),
}
