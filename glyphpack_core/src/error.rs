//! The single error type shared by every codec and by the pack pipeline.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Malformed or absent arguments. A programming error on the caller's side.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The output region cannot hold the next packet or the next expanded run.
    ///
    /// Callers may retry with more room or give up on compressing this input.
    #[error("output capacity exceeded: need at least {needed} bytes, only {capacity} available")]
    CapacityExceeded { needed: usize, capacity: usize },

    #[error("unsupported encoding '{0}'")]
    UnsupportedEncoding(String),

    /// The compressed stream itself is damaged (partial packet, zero-length run).
    #[error("corrupt {encoding} stream at byte {offset}: {reason}")]
    CorruptStream {
        encoding: &'static str,
        offset: usize,
        reason: String,
    },

    #[error("malformed packed bitmap: {0}")]
    MalformedPack(String),

    #[error("packed bitmap checksum mismatch: expected {expected:016x}, got {actual:016x}")]
    ChecksumMismatch { expected: u64, actual: u64 },
}

impl CodecError {
    /// Only a capacity shortfall can be fixed by the caller retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CodecError::CapacityExceeded { .. })
    }
}
