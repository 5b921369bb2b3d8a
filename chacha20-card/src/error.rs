//! Error types.

use core::fmt;
use thiserror::Error;

/// Result type with the [`Error`] of this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// A request field that was missing, short or inconsistent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    /// The 32-byte key.
    Key,
    /// The 12-byte nonce.
    Nonce,
    /// The 4-byte initial block counter.
    Counter,
    /// The command header preceding the data field.
    Header,
    /// The declared data length of a command.
    Length,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Key => "key",
            Field::Nonce => "nonce",
            Field::Counter => "counter",
            Field::Header => "header",
            Field::Length => "length",
        })
    }
}

/// Coarse classification of an [`Error`], one per failure signal exposed
/// at the command boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request was rejected before any block was processed.
    Malformed,
    /// The message does not fit the fixed scratch buffers.
    Capacity,
    /// The request names an operation this engine does not perform.
    Unsupported,
    /// A caller broke the block engine's calling contract.
    Contract,
}

/// Errors returned by the block engine, the driver and the command boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A required field is missing or has the wrong length.
    #[error("malformed input: missing or short {0}")]
    MalformedInput(Field),

    /// The message is longer than the scratch buffers.
    #[error("message of {len} bytes exceeds buffer capacity of {capacity} bytes")]
    CapacityExceeded {
        /// Length of the rejected message.
        len: usize,
        /// Capacity of the context's scratch buffers.
        capacity: usize,
    },

    /// Operation code other than encrypt or decrypt.
    #[error("unsupported operation {0:#04x}")]
    UnsupportedOperation(u8),

    /// Instruction byte not handled by this engine.
    #[error("instruction {0:#04x} not supported")]
    InstructionNotSupported(u8),

    /// Class byte not handled by this engine.
    #[error("class {0:#04x} not supported")]
    ClassNotSupported(u8),

    /// A chunk longer than one block was handed to the block engine.
    #[error("chunk of {0} bytes exceeds the 64-byte block size")]
    ChunkTooLong(usize),

    /// Output slice length differs from the input slice length.
    #[error("output of {output} bytes does not match input of {input} bytes")]
    LengthMismatch {
        /// Input chunk length.
        input: usize,
        /// Output chunk length.
        output: usize,
    },
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Error::MalformedInput(_) => ErrorCategory::Malformed,
            Error::CapacityExceeded { .. } => ErrorCategory::Capacity,
            Error::UnsupportedOperation(_)
            | Error::InstructionNotSupported(_)
            | Error::ClassNotSupported(_) => ErrorCategory::Unsupported,
            Error::ChunkTooLong(_) | Error::LengthMismatch { .. } => ErrorCategory::Contract,
        }
    }
}
