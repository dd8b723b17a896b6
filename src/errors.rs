//! Error types for scram-trimmer.

use thiserror::Error;

/// Result type alias for trimmer operations.
pub type Result<T> = std::result::Result<T, TrimmerError>;

/// Fatal errors. Per-read rejections are not errors and live in
/// [`crate::trim::Rejection`]; anything here aborts the whole run.
#[derive(Error, Debug)]
pub enum TrimmerError {
    /// Header line did not start with '@'
    #[error("invalid fastq file: expected '@' at the beginning of header line, got: {line}")]
    InvalidHeader {
        /// The offending line
        line: String,
    },

    /// Separator line was not '+'
    #[error("invalid fastq file: expected '+' line, got: {line}")]
    InvalidSeparator {
        /// The offending line
        line: String,
    },

    /// Sequence and quality strings differ in length
    #[error("invalid fastq file: sequence and quality strings must have the same length, got: {seq_len} and {qual_len}")]
    LengthMismatch {
        /// Sequence length
        seq_len: usize,
        /// Quality length
        qual_len: usize,
    },

    /// Stream ended in the middle of a 4-line record
    #[error("invalid fastq file: truncated record (stream ended after {lines_read} of 4 lines)")]
    TruncatedRecord {
        /// Lines of the record read before EOF
        lines_read: usize,
    },

    /// A pipeline thread panicked; the run cannot be trusted
    #[error("pipeline thread panicked")]
    ThreadPanic,

    /// Underlying I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
