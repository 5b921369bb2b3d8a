//! The ChaCha20 block function. Defined in RFC 8439 Section 2.3.
//!
//! <https://tools.ietf.org/html/rfc8439#section-2.3>
//!
//! The state lives in a single 64-byte buffer. The initial state is not
//! kept alongside the working state: the feed-forward step re-derives each
//! initial word from the constants, key, counter and nonce it was built
//! from, so a block needs no scratch memory beyond that one buffer.

use crate::{
    BLOCK_SIZE, COUNTER_SIZE, Counter, KEY_SIZE, Key, NONCE_SIZE, Nonce, SIGMA, STATE_BYTES,
    backends::{Backend, DefaultBackend},
    error::{Error, Result},
    word::{WORD_BYTES, add32_from},
};

/// Byte offset of the key words within the state.
const KEY_OFFSET: usize = SIGMA.len();
/// Byte offset of the block counter word within the state.
const COUNTER_OFFSET: usize = KEY_OFFSET + KEY_SIZE;
/// Byte offset of the nonce words within the state.
const NONCE_OFFSET: usize = COUNTER_OFFSET + COUNTER_SIZE;

/// Write the keystream block for (`key`, `nonce`, `counter`) into `state`
/// using the default backend.
///
/// On return `state` holds the 64 keystream bytes in output order.
#[inline]
pub fn keystream_block(state: &mut [u8; STATE_BYTES], key: &Key, nonce: &Nonce, counter: &Counter) {
    keystream_block_with::<DefaultBackend>(state, key, nonce, counter);
}

/// [`keystream_block`] with an explicit [`Backend`].
#[inline]
pub fn keystream_block_with<B: Backend>(
    state: &mut [u8; STATE_BYTES],
    key: &Key,
    nonce: &Nonce,
    counter: &Counter,
) {
    init(state, key, nonce, counter);
    B::run_rounds(state);
    finish(state, key, nonce, counter);
}

/// XOR `input` with the keystream block for (`key`, `nonce`, `counter`)
/// into `output`, using the default backend.
///
/// `state` is scratch space and holds the keystream block afterwards; the
/// caller is responsible for wiping it.
///
/// # Errors
/// [`Error::ChunkTooLong`] if `input` is longer than one block and
/// [`Error::LengthMismatch`] if `output` differs in length from `input`.
/// Nothing is written in either case.
#[inline]
pub fn apply_keystream_block(
    state: &mut [u8; STATE_BYTES],
    key: &Key,
    nonce: &Nonce,
    counter: &Counter,
    input: &[u8],
    output: &mut [u8],
) -> Result<()> {
    apply_keystream_block_with::<DefaultBackend>(state, key, nonce, counter, input, output)
}

/// [`apply_keystream_block`] with an explicit [`Backend`].
///
/// # Errors
/// See [`apply_keystream_block`].
pub fn apply_keystream_block_with<B: Backend>(
    state: &mut [u8; STATE_BYTES],
    key: &Key,
    nonce: &Nonce,
    counter: &Counter,
    input: &[u8],
    output: &mut [u8],
) -> Result<()> {
    if input.len() > BLOCK_SIZE {
        return Err(Error::ChunkTooLong(input.len()));
    }
    if output.len() != input.len() {
        return Err(Error::LengthMismatch {
            input: input.len(),
            output: output.len(),
        });
    }

    keystream_block_with::<B>(state, key, nonce, counter);
    for ((out, inp), ks) in output.iter_mut().zip(input).zip(state.iter()) {
        *out = inp ^ ks;
    }
    Ok(())
}

/// Lay out constants, key, counter and nonce as the initial state.
#[inline(always)]
fn init(state: &mut [u8; STATE_BYTES], key: &Key, nonce: &Nonce, counter: &Counter) {
    state[..KEY_OFFSET].copy_from_slice(&SIGMA);
    state[KEY_OFFSET..COUNTER_OFFSET].copy_from_slice(key);
    state[COUNTER_OFFSET..NONCE_OFFSET].copy_from_slice(counter);
    state[NONCE_OFFSET..].copy_from_slice(nonce);
}

/// Add the initial state back into the permuted state, word by word.
#[inline(always)]
fn finish(state: &mut [u8; STATE_BYTES], key: &Key, nonce: &Nonce, counter: &Counter) {
    for i in (0..SIGMA.len()).step_by(WORD_BYTES) {
        add32_from(state, i, &SIGMA, i);
    }
    for i in (0..KEY_SIZE).step_by(WORD_BYTES) {
        add32_from(state, KEY_OFFSET + i, key, i);
    }
    add32_from(state, COUNTER_OFFSET, counter, 0);
    for i in (0..NONCE_SIZE).step_by(WORD_BYTES) {
        add32_from(state, NONCE_OFFSET + i, nonce, i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{Narrow, Native};

    #[test]
    fn layout_matches_rfc8439_section_2_3() {
        let key: Key = core::array::from_fn(|i| u8::try_from(i).unwrap_or(0));
        let nonce = [0, 0, 0, 0x09, 0, 0, 0, 0x4a, 0, 0, 0, 0];
        let counter = 1u32.to_le_bytes();

        let mut state = [0u8; STATE_BYTES];
        init(&mut state, &key, &nonce, &counter);

        let words: [u32; 16] = core::array::from_fn(|i| {
            u32::from_le_bytes([state[4 * i], state[4 * i + 1], state[4 * i + 2], state[4 * i + 3]])
        });
        assert_eq!(
            words,
            [
                0x61707865, 0x3320646e, 0x79622d32, 0x6b206574, 0x03020100, 0x07060504,
                0x0b0a0908, 0x0f0e0d0c, 0x13121110, 0x17161514, 0x1b1a1918, 0x1f1e1d1c,
                0x00000001, 0x09000000, 0x4a000000, 0x00000000,
            ]
        );
    }

    #[test]
    fn backends_produce_same_block() {
        let key = [0x5a; KEY_SIZE];
        let nonce = [0xa5; NONCE_SIZE];
        for ctr in [0u32, 1, 0xffff_ffff] {
            let mut a = [0u8; STATE_BYTES];
            let mut b = [0u8; STATE_BYTES];
            keystream_block_with::<Narrow>(&mut a, &key, &nonce, &ctr.to_le_bytes());
            keystream_block_with::<Native>(&mut b, &key, &nonce, &ctr.to_le_bytes());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn rejects_oversized_chunk() {
        let mut state = [0u8; STATE_BYTES];
        let input = [0u8; BLOCK_SIZE + 1];
        let mut output = [0u8; BLOCK_SIZE + 1];
        let res = apply_keystream_block(
            &mut state,
            &[0; KEY_SIZE],
            &[0; NONCE_SIZE],
            &[0; COUNTER_SIZE],
            &input,
            &mut output,
        );
        assert_eq!(res, Err(Error::ChunkTooLong(BLOCK_SIZE + 1)));
        assert_eq!(output, [0u8; BLOCK_SIZE + 1]);
    }

    #[test]
    fn rejects_mismatched_output() {
        let mut state = [0u8; STATE_BYTES];
        let input = [0u8; 10];
        let mut output = [0u8; 9];
        let res = apply_keystream_block(
            &mut state,
            &[0; KEY_SIZE],
            &[0; NONCE_SIZE],
            &[0; COUNTER_SIZE],
            &input,
            &mut output,
        );
        assert_eq!(res, Err(Error::LengthMismatch { input: 10, output: 9 }));
    }
}
