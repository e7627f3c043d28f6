//! Error taxonomy for the dictionary API.

use std::fmt;
use std::io;

/// Why a compiled buffer failed its structural validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptReason {
    /// A decoded offset pointed outside the buffer.
    OffsetOutOfRange,
    /// A `VInt` ran past the maximum 5-byte encoding without terminating.
    VarIntTooLong,
    /// A node declared an edge-record width of zero.
    ZeroEdgeWidth,
    /// Flag bits implied a value was present but none could be read.
    InconsistentFlags,
}

impl fmt::Display for CorruptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CorruptReason::OffsetOutOfRange => "decoded offset is outside the buffer",
            CorruptReason::VarIntTooLong => "VInt encoding exceeded 5 bytes",
            CorruptReason::ZeroEdgeWidth => "node declares a zero-width edge record",
            CorruptReason::InconsistentFlags => "node flags are structurally inconsistent",
        };
        f.write_str(msg)
    }
}

/// All errors a dictionary operation can return.
#[derive(Debug)]
pub enum DictError {
    /// An argument violated a precondition of the operation (e.g. a
    /// `put` issued with an out-of-range byte offset during a caller's
    /// own key construction). Kept distinct from `InvalidState` for API
    /// completeness even though Rust's type system rules out the null
    /// key/value case the source format also enumerates here.
    InvalidArgument(&'static str),
    /// The dictionary was asked to do something it is not currently in
    /// the right state for (`get` before `compile`, `put` after
    /// `compile`).
    InvalidState(&'static str),
    /// The compiled buffer failed structural validation during a read,
    /// at the given byte offset into the buffer.
    Corrupt {
        /// What kind of structural anomaly was found.
        reason: CorruptReason,
        /// The buffer offset at which it was detected.
        offset: usize,
    },
    /// A `save`/`load` operation failed at the filesystem boundary.
    Io(io::Error),
}

impl fmt::Display for DictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            DictError::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            DictError::Corrupt { reason, offset } => {
                write!(f, "corrupt dictionary at offset {offset}: {reason}")
            }
            DictError::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for DictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DictError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for DictError {
    fn from(err: io::Error) -> Self {
        DictError::Io(err)
    }
}

/// Shorthand for a dictionary-fallible result.
pub type DictResult<T> = Result<T, DictError>;
