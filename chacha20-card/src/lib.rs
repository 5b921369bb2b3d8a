//! The ChaCha20 stream cipher ([RFC 8439]) for targets with tiny, fixed
//! memory budgets.
//!
//! The crate is organised the way such a target runs the cipher:
//!
//! - [`word`]: 32-bit add, XOR and rotate over 4-byte little-endian words
//!   stored at arbitrary offsets in byte buffers, using only 8/16-bit
//!   arithmetic.
//! - [`block`]: the ChaCha20 block function on a single 64-byte state
//!   buffer, plus the XOR of one chunk of input with its keystream block.
//! - [`CipherContext`]: the chunked driver. It owns two fixed-capacity
//!   scratch buffers, walks a message 64 bytes at a time and advances the
//!   block counter between blocks. The cipher path allocates nothing.
//! - [`command`]: parsing of the framed `PUT DATA` command
//!   (`nonce ‖ counter ‖ key ‖ message`) and mapping of failures to ISO 7816
//!   status words.
//! - `ChaCha20Card` (feature `cipher`, on by default): the same engine
//!   behind the RustCrypto [`cipher`] stream cipher traits.
//!
//! # ⚠️ Security Warning: Hazmat!
//!
//! This crate does not ensure ciphertexts are authentic! Thus ciphertext integrity
//! is not verified, which can lead to serious vulnerabilities! Never reuse a
//! (key, nonce) pair.
//!
//! USE AT YOUR OWN RISK!
//!
//! # Example
//! ```
//! use chacha20_card::{CipherContext, Direction};
//!
//! let key = [0x42; 32];
//! let nonce = [0x24; 12];
//! let counter = 1u32.to_le_bytes();
//! let plaintext = *b"Ladies and Gentlemen of the class of '99";
//!
//! let mut ctx = CipherContext::new();
//! let ciphertext: [u8; 40] = ctx
//!     .process(Direction::Encrypt, &key, &nonce, &counter, &plaintext)?
//!     .try_into()
//!     .unwrap();
//! assert_ne!(ciphertext, plaintext);
//!
//! // decryption is the same operation
//! let recovered = ctx.process(Direction::Decrypt, &key, &nonce, &counter, &ciphertext)?;
//! assert_eq!(recovered, plaintext);
//! # Ok::<(), chacha20_card::Error>(())
//! ```
//!
//! # Configuration
//!
//! The round network is provided by a [`Backend`]. [`Narrow`] (the default)
//! routes every word operation through [`word`]; [`Native`] uses `u32`
//! arithmetic. Building with `RUSTFLAGS='--cfg chacha20_card_backend="native"'`
//! changes the default. Both are always available by name.
//!
//! The `tracing` feature (on by default) emits `debug!` events per request
//! and `warn!` events for rejected commands. It requires `alloc`; disable it
//! on targets without an allocator.
//!
//! [RFC 8439]: https://tools.ietf.org/html/rfc8439

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
#![warn(missing_docs, rust_2018_idioms)]

#[cfg(feature = "cipher")]
pub use cipher;

pub mod backends;
pub mod block;
pub mod command;
mod context;
mod error;
#[cfg(feature = "cipher")]
mod stream;
pub mod word;

pub use backends::{Backend, DefaultBackend, Narrow, Native};
pub use command::{Command, Operation};
pub use context::{CipherContext, DEFAULT_CAPACITY, Direction};
pub use error::{Error, ErrorCategory, Field, Result};
#[cfg(feature = "cipher")]
pub use stream::{ChaCha20Card, ChaCha20CardCore};

/// Size of a ChaCha20 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of a ChaCha20 (RFC 8439) nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the block counter in bytes.
pub const COUNTER_SIZE: usize = 4;

/// Size of a keystream block in bytes.
pub const BLOCK_SIZE: usize = 64;

/// Number of 32-bit words in the ChaCha20 state
pub(crate) const STATE_WORDS: usize = 16;

/// Number of bytes in the ChaCha20 state
pub const STATE_BYTES: usize = STATE_WORDS * word::WORD_BYTES;

/// Number of double rounds in ChaCha20
pub(crate) const DOUBLE_ROUNDS: usize = 10;

/// State initialization constant ("expand 32-byte k"), i.e. the words
/// `0x61707865 0x3320646e 0x79622d32 0x6b206574` in little-endian order.
pub(crate) const SIGMA: [u8; 16] = *b"expand 32-byte k";

/// ChaCha20 key.
pub type Key = [u8; KEY_SIZE];

/// ChaCha20 nonce.
pub type Nonce = [u8; NONCE_SIZE];

/// Little-endian block counter.
pub type Counter = [u8; COUNTER_SIZE];
