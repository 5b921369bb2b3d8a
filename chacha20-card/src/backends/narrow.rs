//! Round network over the byte-buffer word operations.
//!
//! Only 8/16-bit arithmetic is involved; each quarter round updates its four
//! words in place inside the state buffer.

use crate::{
    DOUBLE_ROUNDS, STATE_BYTES,
    word::{WORD_BYTES, add32, rotl32, xor32},
};

#[inline(always)]
pub(super) fn run_rounds(state: &mut [u8; STATE_BYTES]) {
    for _ in 0..DOUBLE_ROUNDS {
        // column rounds
        quarter_round(0, 4, 8, 12, state);
        quarter_round(1, 5, 9, 13, state);
        quarter_round(2, 6, 10, 14, state);
        quarter_round(3, 7, 11, 15, state);

        // diagonal rounds
        quarter_round(0, 5, 10, 15, state);
        quarter_round(1, 6, 11, 12, state);
        quarter_round(2, 7, 8, 13, state);
        quarter_round(3, 4, 9, 14, state);
    }
}

/// The ChaCha20 quarter round function, addressed by word index.
#[inline(always)]
fn quarter_round(a: usize, b: usize, c: usize, d: usize, state: &mut [u8; STATE_BYTES]) {
    let (a, b, c, d) = (a * WORD_BYTES, b * WORD_BYTES, c * WORD_BYTES, d * WORD_BYTES);

    add32(state, a, b);
    xor32(state, d, a);
    rotl32(state, d, 16);

    add32(state, c, d);
    xor32(state, b, c);
    rotl32(state, b, 12);

    add32(state, a, b);
    xor32(state, d, a);
    rotl32(state, d, 8);

    add32(state, c, d);
    xor32(state, b, c);
    rotl32(state, b, 7);
}
