//! Portable implementation over native `u32` words.

use crate::{DOUBLE_ROUNDS, STATE_BYTES, STATE_WORDS, word::WORD_BYTES};

#[inline(always)]
pub(super) fn run_rounds(state: &mut [u8; STATE_BYTES]) {
    let mut res = [0u32; STATE_WORDS];
    for (val, chunk) in res.iter_mut().zip(state.chunks_exact(WORD_BYTES)) {
        *val = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for _ in 0..DOUBLE_ROUNDS {
        // column rounds
        quarter_round(0, 4, 8, 12, &mut res);
        quarter_round(1, 5, 9, 13, &mut res);
        quarter_round(2, 6, 10, 14, &mut res);
        quarter_round(3, 7, 11, 15, &mut res);

        // diagonal rounds
        quarter_round(0, 5, 10, 15, &mut res);
        quarter_round(1, 6, 11, 12, &mut res);
        quarter_round(2, 7, 8, 13, &mut res);
        quarter_round(3, 4, 9, 14, &mut res);
    }

    for (chunk, val) in state.chunks_exact_mut(WORD_BYTES).zip(res.iter()) {
        chunk.copy_from_slice(&val.to_le_bytes());
    }
}

/// The ChaCha20 quarter round function
#[inline(always)]
fn quarter_round(a: usize, b: usize, c: usize, d: usize, state: &mut [u32; STATE_WORDS]) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(16);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(12);

    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(8);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(7);
}
