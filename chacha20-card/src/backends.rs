//! Round-function backends.
//!
//! A backend runs the ten ChaCha20 double rounds over a 64-byte state
//! buffer. The feed-forward addition and the keystream XOR are shared by
//! all backends and live in [`crate::block`].
//!
//! The default backend is [`Narrow`]. Building with
//! `--cfg chacha20_card_backend="native"` makes [`Native`] the default.

use cfg_if::cfg_if;

use crate::STATE_BYTES;

mod narrow;
mod native;

/// Provider of the ChaCha20 round network.
pub trait Backend {
    /// Apply the 20 rounds (10 column/diagonal double rounds) to `state` in
    /// place. Word `i` of the state occupies bytes `[4i, 4i + 4)`, little
    /// endian.
    fn run_rounds(state: &mut [u8; STATE_BYTES]);
}

/// Backend built entirely from the byte-level operations in [`crate::word`].
#[derive(Copy, Clone, Debug, Default)]
pub struct Narrow;

/// Backend using native `u32` arithmetic.
#[derive(Copy, Clone, Debug, Default)]
pub struct Native;

impl Backend for Narrow {
    #[inline]
    fn run_rounds(state: &mut [u8; STATE_BYTES]) {
        narrow::run_rounds(state);
    }
}

impl Backend for Native {
    #[inline]
    fn run_rounds(state: &mut [u8; STATE_BYTES]) {
        native::run_rounds(state);
    }
}

cfg_if! {
    if #[cfg(chacha20_card_backend = "native")] {
        /// Backend used when none is named explicitly.
        pub type DefaultBackend = Native;
    } else {
        /// Backend used when none is named explicitly.
        pub type DefaultBackend = Narrow;
    }
}
