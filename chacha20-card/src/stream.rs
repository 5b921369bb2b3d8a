//! RustCrypto [`cipher`] traits over the block engine.
//!
//! Unlike [`CipherContext`](crate::CipherContext), which wraps the block
//! counter silently, the wrapper refuses to run past block `u32::MAX`.

use core::{
    fmt::{self, Debug},
    marker::PhantomData,
};

use cipher::{
    Block, BlockSizeUser, Iv, IvSizeUser, KeyIvInit, KeySizeUser, ParBlocksSizeUser,
    StreamBackend, StreamCipherCore, StreamCipherCoreWrapper, StreamCipherSeekCore,
    StreamClosure,
    consts::{U1, U12, U32, U64},
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    COUNTER_SIZE, Counter, KEY_SIZE, Key, NONCE_SIZE, Nonce, STATE_BYTES,
    backends::{Backend, DefaultBackend},
    block, word,
};

/// ChaCha20 (RFC 8439) stream cipher running on the card engine.
pub type ChaCha20Card<B = DefaultBackend> = StreamCipherCoreWrapper<ChaCha20CardCore<B>>;

/// Core of [`ChaCha20Card`]: key, nonce, counter and one state buffer.
pub struct ChaCha20CardCore<B: Backend = DefaultBackend> {
    key: Key,
    nonce: Nonce,
    counter: Counter,
    state: [u8; STATE_BYTES],
    backend: PhantomData<B>,
}

impl<B: Backend> KeySizeUser for ChaCha20CardCore<B> {
    type KeySize = U32;
}

impl<B: Backend> IvSizeUser for ChaCha20CardCore<B> {
    type IvSize = U12;
}

impl<B: Backend> BlockSizeUser for ChaCha20CardCore<B> {
    type BlockSize = U64;
}

impl<B: Backend> KeyIvInit for ChaCha20CardCore<B> {
    #[inline]
    fn new(key: &cipher::Key<Self>, iv: &Iv<Self>) -> Self {
        let mut core = Self {
            key: [0u8; KEY_SIZE],
            nonce: [0u8; NONCE_SIZE],
            counter: [0u8; COUNTER_SIZE],
            state: [0u8; STATE_BYTES],
            backend: PhantomData,
        };
        core.key.copy_from_slice(key);
        core.nonce.copy_from_slice(iv);
        core
    }
}

impl<B: Backend> StreamCipherCore for ChaCha20CardCore<B> {
    #[inline(always)]
    fn remaining_blocks(&self) -> Option<usize> {
        let rem = u32::MAX - self.get_block_pos();
        rem.try_into().ok()
    }

    fn process_with_backend(&mut self, f: impl StreamClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut KeystreamBackend(self));
    }
}

impl<B: Backend> StreamCipherSeekCore for ChaCha20CardCore<B> {
    type Counter = u32;

    #[inline(always)]
    fn get_block_pos(&self) -> u32 {
        u32::from_le_bytes(self.counter)
    }

    #[inline(always)]
    fn set_block_pos(&mut self, pos: u32) {
        self.counter = pos.to_le_bytes();
    }
}

impl<B: Backend> Drop for ChaCha20CardCore<B> {
    fn drop(&mut self) {
        self.key.zeroize();
        self.nonce.zeroize();
        self.counter.zeroize();
        self.state.zeroize();
    }
}

impl<B: Backend> ZeroizeOnDrop for ChaCha20CardCore<B> {}

impl<B: Backend> Debug for ChaCha20CardCore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChaCha20CardCore { .. }")
    }
}

struct KeystreamBackend<'a, B: Backend>(&'a mut ChaCha20CardCore<B>);

impl<B: Backend> BlockSizeUser for KeystreamBackend<'_, B> {
    type BlockSize = U64;
}

impl<B: Backend> ParBlocksSizeUser for KeystreamBackend<'_, B> {
    type ParBlocksSize = U1;
}

impl<B: Backend> StreamBackend for KeystreamBackend<'_, B> {
    #[inline(always)]
    fn gen_ks_block(&mut self, out: &mut Block<Self>) {
        let core = &mut *self.0;
        block::keystream_block_with::<B>(&mut core.state, &core.key, &core.nonce, &core.counter);
        out.copy_from_slice(&core.state);
        core.state.zeroize();
        word::increment32(&mut core.counter, 0);
    }
}
