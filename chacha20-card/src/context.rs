//! Chunked cipher driver over fixed-capacity scratch buffers.

use core::{
    fmt::{self, Debug},
    marker::PhantomData,
};

#[cfg(feature = "tracing")]
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    BLOCK_SIZE, COUNTER_SIZE, Counter, KEY_SIZE, Key, NONCE_SIZE, Nonce, STATE_BYTES,
    backends::{Backend, DefaultBackend},
    block,
    error::{Error, Field, Result},
    word,
};

/// Capacity of the scratch buffers when none is given: the largest message
/// a short command frame can carry after its 48-byte header fits easily.
pub const DEFAULT_CAPACITY: usize = 256;

/// Direction of a request.
///
/// ChaCha20 encryption and decryption are the same keystream XOR; the
/// direction is carried for the caller's benefit only.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Plaintext in, ciphertext out.
    Encrypt,
    /// Ciphertext in, plaintext out.
    Decrypt,
}

/// ChaCha20 engine owning every buffer a request needs.
///
/// A context holds an input and an output buffer of `CAP` bytes, one
/// 64-byte state buffer and scratch copies of the key, nonce and counter.
/// Requests overwrite these in place; nothing is allocated. The input
/// buffer, the state and the key material are wiped as soon as a request
/// finishes, the output buffer when the next request starts or the context
/// is dropped.
///
/// One context serves one caller at a time. Construct one per session if
/// sessions run concurrently.
pub struct CipherContext<const CAP: usize = DEFAULT_CAPACITY, B: Backend = DefaultBackend> {
    input: [u8; CAP],
    output: [u8; CAP],
    output_len: usize,
    state: [u8; STATE_BYTES],
    key: Key,
    nonce: Nonce,
    counter: Counter,
    backend: PhantomData<B>,
}

impl CipherContext {
    /// Create a context with [`DEFAULT_CAPACITY`] and the default backend.
    #[must_use]
    pub const fn new() -> Self {
        Self::blank()
    }
}

impl<const CAP: usize, B: Backend> Default for CipherContext<CAP, B> {
    fn default() -> Self {
        Self::blank()
    }
}

impl<const CAP: usize, B: Backend> CipherContext<CAP, B> {
    const fn blank() -> Self {
        Self {
            input: [0u8; CAP],
            output: [0u8; CAP],
            output_len: 0,
            state: [0u8; STATE_BYTES],
            key: [0u8; KEY_SIZE],
            nonce: [0u8; NONCE_SIZE],
            counter: [0u8; COUNTER_SIZE],
            backend: PhantomData,
        }
    }

    /// Largest message this context accepts.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        CAP
    }

    /// Output of the last successful request.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output[..self.output_len]
    }

    /// The input buffer, for callers that receive the message directly into
    /// it. Follow up with [`CipherContext::process_loaded`].
    pub fn input_mut(&mut self) -> &mut [u8] {
        &mut self.input
    }

    /// Encrypt `message` with ChaCha20 starting at block `counter`.
    ///
    /// # Errors
    /// See [`CipherContext::process`].
    pub fn encrypt(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        counter: &[u8],
        message: &[u8],
    ) -> Result<&[u8]> {
        self.process(Direction::Encrypt, key, nonce, counter, message)
    }

    /// Decrypt `message` with ChaCha20 starting at block `counter`.
    ///
    /// # Errors
    /// See [`CipherContext::process`].
    pub fn decrypt(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        counter: &[u8],
        message: &[u8],
    ) -> Result<&[u8]> {
        self.process(Direction::Decrypt, key, nonce, counter, message)
    }

    /// Copy `message` into the input buffer and transform it.
    ///
    /// `counter` is the little-endian block counter of the first block; it
    /// advances by one per full block and wraps at 2^32. The returned slice
    /// has exactly `message.len()` bytes and borrows the output buffer.
    ///
    /// # Errors
    /// - [`Error::MalformedInput`] if `key` is not 32 bytes, `nonce` not 12
    ///   bytes or `counter` not 4 bytes.
    /// - [`Error::CapacityExceeded`] if `message` does not fit the buffers.
    ///
    /// No output is produced on error.
    pub fn process(
        &mut self,
        direction: Direction,
        key: &[u8],
        nonce: &[u8],
        counter: &[u8],
        message: &[u8],
    ) -> Result<&[u8]> {
        let len = message.len();
        self.prepare(key, nonce, counter, len)?;
        self.input[..len].copy_from_slice(message);
        self.run(direction, len)
    }

    /// Transform the first `len` bytes already placed in the input buffer
    /// through [`CipherContext::input_mut`].
    ///
    /// # Errors
    /// As [`CipherContext::process`].
    pub fn process_loaded(
        &mut self,
        direction: Direction,
        key: &[u8],
        nonce: &[u8],
        counter: &[u8],
        len: usize,
    ) -> Result<&[u8]> {
        self.prepare(key, nonce, counter, len)?;
        self.run(direction, len)
    }

    /// Wipe every buffer, including the last output.
    pub fn reset(&mut self) {
        self.wipe_scratch();
        self.output.zeroize();
        self.output_len = 0;
    }

    /// Validate a request and stage its parameters. On error every buffer,
    /// including a preloaded input and the previous output, is wiped.
    fn prepare(&mut self, key: &[u8], nonce: &[u8], counter: &[u8], len: usize) -> Result<()> {
        let res = self.load_params(key, nonce, counter).and_then(|()| {
            if len > CAP {
                return Err(Error::CapacityExceeded { len, capacity: CAP });
            }
            Ok(())
        });
        if res.is_err() {
            self.reset();
        }
        res
    }

    /// Validate all three parameters before copying any of them.
    fn load_params(&mut self, key: &[u8], nonce: &[u8], counter: &[u8]) -> Result<()> {
        let key: &Key = key.try_into().map_err(|_| Error::MalformedInput(Field::Key))?;
        let nonce: &Nonce = nonce
            .try_into()
            .map_err(|_| Error::MalformedInput(Field::Nonce))?;
        let counter: &Counter = counter
            .try_into()
            .map_err(|_| Error::MalformedInput(Field::Counter))?;

        self.key.copy_from_slice(key);
        self.nonce.copy_from_slice(nonce);
        self.counter.copy_from_slice(counter);
        Ok(())
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn run(&mut self, direction: Direction, len: usize) -> Result<&[u8]> {
        #[cfg(feature = "tracing")]
        debug!(
            ?direction,
            len,
            blocks = len.div_ceil(BLOCK_SIZE),
            "chacha20 request"
        );

        self.output.zeroize();
        self.output_len = 0;

        let res = self.apply_keystream(len);
        self.wipe_scratch();
        let produced = res?;

        #[cfg(feature = "tracing")]
        debug!(?direction, produced, "chacha20 request done");
        self.output_len = produced;
        Ok(&self.output[..produced])
    }

    /// Walk the input one block at a time. Returns the number of bytes
    /// written to the output buffer.
    fn apply_keystream(&mut self, len: usize) -> Result<usize> {
        let mut remaining = len;
        let mut produced = 0;

        while remaining > 0 {
            let n = remaining.min(BLOCK_SIZE);
            let chunk = produced..produced + n;
            block::apply_keystream_block_with::<B>(
                &mut self.state,
                &self.key,
                &self.nonce,
                &self.counter,
                &self.input[chunk.clone()],
                &mut self.output[chunk],
            )?;

            produced += n;
            remaining -= n;

            // only a full block can be followed by another one
            if n == BLOCK_SIZE && remaining > 0 {
                word::increment32(&mut self.counter, 0);
            }
        }

        Ok(produced)
    }

    fn wipe_scratch(&mut self) {
        self.input.zeroize();
        self.state.zeroize();
        self.key.zeroize();
        self.nonce.zeroize();
        self.counter.zeroize();
    }
}

impl<const CAP: usize, B: Backend> Drop for CipherContext<CAP, B> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<const CAP: usize, B: Backend> ZeroizeOnDrop for CipherContext<CAP, B> {}

impl<const CAP: usize, B: Backend> Debug for CipherContext<CAP, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherContext<{CAP}> {{ .. }}")
    }
}
