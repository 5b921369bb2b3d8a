//! Framed command boundary.
//!
//! A request arrives as an ISO 7816-4 short command:
//!
//! ```text
//! +-----+-----+----+----+----+------------+-------------+----------+---------+
//! | CLA | INS | P1 | P2 | Lc | Nonce (12) | Counter (4) | Key (32) | Message |
//! +-----+-----+----+----+----+------------+-------------+----------+---------+
//! ```
//!
//! `CLA` is `0x00`, `INS` is `0xDA` (PUT DATA), `P1` selects the
//! [`Operation`] and `P2` is ignored. `Lc` counts the data bytes after it.
//! A case 4 frame may append one `Le` byte, which is ignored.
//! Failures map to distinct status words through [`Error::status_word`].

use core::fmt::{self, Debug};

#[cfg(feature = "tracing")]
use tracing::warn;

use crate::{
    COUNTER_SIZE, Counter, KEY_SIZE, Key, NONCE_SIZE, Nonce,
    backends::Backend,
    context::{CipherContext, Direction},
    error::{Error, Field, Result},
};

/// Class byte accepted by [`Command::parse`].
pub const CLA: u8 = 0x00;

/// PUT DATA instruction byte.
pub const INS_PUT_DATA: u8 = 0xDA;

/// Length of the `CLA INS P1 P2 Lc` header.
pub const HEADER_LEN: usize = 5;

/// Length of `nonce ‖ counter ‖ key` at the start of the data field.
pub const PARAMS_LEN: usize = NONCE_SIZE + COUNTER_SIZE + KEY_SIZE;

/// Success.
pub const SW_NO_ERROR: u16 = 0x9000;
/// Message longer than the context's buffers.
pub const SW_WRONG_LENGTH: u16 = 0x6700;
/// Truncated header, `Lc` inconsistent with the data, or a data field too
/// short to hold nonce, counter and key.
pub const SW_WRONG_DATA: u16 = 0x6A80;
/// Unknown operation in P1.
pub const SW_INCORRECT_P1P2: u16 = 0x6A86;
/// Unknown instruction.
pub const SW_INS_NOT_SUPPORTED: u16 = 0x6D00;
/// Unknown class.
pub const SW_CLA_NOT_SUPPORTED: u16 = 0x6E00;
/// No precise diagnosis.
pub const SW_UNKNOWN: u16 = 0x6F00;

/// Operation selected by `P1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Operation {
    /// `P1 = 0x01`
    Encrypt = 0x01,
    /// `P1 = 0x02`
    Decrypt = 0x02,
}

impl TryFrom<u8> for Operation {
    type Error = Error;

    fn try_from(p1: u8) -> Result<Self> {
        match p1 {
            0x01 => Ok(Operation::Encrypt),
            0x02 => Ok(Operation::Decrypt),
            other => Err(Error::UnsupportedOperation(other)),
        }
    }
}

impl From<Operation> for Direction {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Encrypt => Direction::Encrypt,
            Operation::Decrypt => Direction::Decrypt,
        }
    }
}

/// A parsed command, borrowing from its frame.
#[derive(Copy, Clone)]
pub struct Command<'a> {
    /// Requested operation.
    pub operation: Operation,
    /// ChaCha20 nonce.
    pub nonce: &'a Nonce,
    /// Little-endian initial block counter.
    pub counter: &'a Counter,
    /// ChaCha20 key.
    pub key: &'a Key,
    /// Bytes to transform.
    pub message: &'a [u8],
}

impl<'a> Command<'a> {
    /// Parse a complete command frame.
    ///
    /// A data field of exactly [`PARAMS_LEN`] bytes is a valid request for
    /// an empty message. One trailing byte past the `Lc` data is taken as
    /// `Le` and skipped.
    ///
    /// # Errors
    /// - [`Error::MalformedInput`] with [`Field::Header`] if the frame is
    ///   shorter than [`HEADER_LEN`], with [`Field::Length`] if the frame
    ///   holds neither `Lc` data bytes nor `Lc` data bytes plus `Le`, or
    ///   with the first missing parameter.
    /// - [`Error::ClassNotSupported`], [`Error::InstructionNotSupported`] or
    ///   [`Error::UnsupportedOperation`] for unknown `CLA`, `INS` or `P1`.
    pub fn parse(frame: &'a [u8]) -> Result<Self> {
        let (header, data) = frame
            .split_first_chunk::<HEADER_LEN>()
            .ok_or(Error::MalformedInput(Field::Header))?;
        let [cla, ins, p1, _p2, lc] = *header;

        if cla != CLA {
            return Err(Error::ClassNotSupported(cla));
        }
        if ins != INS_PUT_DATA {
            return Err(Error::InstructionNotSupported(ins));
        }
        let operation = Operation::try_from(p1)?;
        let lc = usize::from(lc);
        if data.len() != lc && data.len() != lc + 1 {
            return Err(Error::MalformedInput(Field::Length));
        }
        let data = &data[..lc];

        let (nonce, rest) = data
            .split_first_chunk::<NONCE_SIZE>()
            .ok_or(Error::MalformedInput(Field::Nonce))?;
        let (counter, rest) = rest
            .split_first_chunk::<COUNTER_SIZE>()
            .ok_or(Error::MalformedInput(Field::Counter))?;
        let (key, message) = rest
            .split_first_chunk::<KEY_SIZE>()
            .ok_or(Error::MalformedInput(Field::Key))?;

        Ok(Self {
            operation,
            nonce,
            counter,
            key,
            message,
        })
    }
}

impl Debug for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("operation", &self.operation)
            .field("message_len", &self.message.len())
            .finish_non_exhaustive()
    }
}

impl Error {
    /// ISO 7816 status word reported for this error.
    #[must_use]
    pub const fn status_word(&self) -> u16 {
        match self {
            Error::MalformedInput(_) => SW_WRONG_DATA,
            Error::CapacityExceeded { .. } => SW_WRONG_LENGTH,
            Error::UnsupportedOperation(_) => SW_INCORRECT_P1P2,
            Error::InstructionNotSupported(_) => SW_INS_NOT_SUPPORTED,
            Error::ClassNotSupported(_) => SW_CLA_NOT_SUPPORTED,
            Error::ChunkTooLong(_) | Error::LengthMismatch { .. } => SW_UNKNOWN,
        }
    }
}

/// Status word for the outcome of a request.
#[must_use]
pub fn status_word<T>(result: &Result<T>) -> u16 {
    match result {
        Ok(_) => SW_NO_ERROR,
        Err(err) => err.status_word(),
    }
}

impl<const CAP: usize, B: Backend> CipherContext<CAP, B> {
    /// Parse `frame` and run the request it carries.
    ///
    /// # Errors
    /// Any error of [`Command::parse`] or [`CipherContext::process`]. An
    /// unsupported operation never reaches the engine. Every buffer,
    /// including the previous output, is wiped on error.
    pub fn dispatch(&mut self, frame: &[u8]) -> Result<&[u8]> {
        let command = match Command::parse(frame) {
            Ok(command) => command,
            Err(err) => {
                #[cfg(feature = "tracing")]
                warn!(error = %err, sw = err.status_word(), "command rejected");
                self.reset();
                return Err(err);
            }
        };

        let res = self.process(
            command.operation.into(),
            command.key,
            command.nonce,
            command.counter,
            command.message,
        );
        #[cfg(feature = "tracing")]
        if let Err(err) = &res {
            warn!(error = %err, sw = err.status_word(), "request rejected");
        }
        res
    }
}
