//! 32-bit word arithmetic emulated over byte buffers.
//!
//! Every word is four bytes in little-endian order embedded at an arbitrary
//! offset inside a larger buffer. Only `u8` and `u16` operations are used:
//! additions propagate the carry byte by byte through a `u16` accumulator,
//! and rotations are a whole-byte permutation followed by a sub-byte shift.
//!
//! Offsets are not validated beyond slice indexing, so an offset within
//! [`WORD_BYTES`] of the end of a buffer panics instead of wrapping.

/// Number of bytes in a 32-bit word.
pub const WORD_BYTES: usize = 4;

/// Read the word at `offset` into a local copy.
#[inline(always)]
fn load(buf: &[u8], offset: usize) -> [u8; WORD_BYTES] {
    let mut word = [0u8; WORD_BYTES];
    word.copy_from_slice(&buf[offset..offset + WORD_BYTES]);
    word
}

#[inline(always)]
fn add_word(dst: &mut [u8], rhs: &[u8; WORD_BYTES]) {
    let mut carry = 0u16;
    for (d, r) in dst.iter_mut().zip(rhs) {
        let [lo, hi] = (u16::from(*d) + u16::from(*r) + carry).to_le_bytes();
        *d = lo;
        carry = u16::from(hi);
    }
}

#[inline(always)]
fn xor_word(dst: &mut [u8], rhs: &[u8; WORD_BYTES]) {
    for (d, r) in dst.iter_mut().zip(rhs) {
        *d ^= *r;
    }
}

/// `buf[dst] = buf[dst] + buf[src] (mod 2^32)`.
///
/// `dst` and `src` may be equal.
///
/// # Panics
/// If either word does not lie entirely within `buf`.
#[inline]
pub fn add32(buf: &mut [u8], dst: usize, src: usize) {
    let rhs = load(buf, src);
    add_word(&mut buf[dst..dst + WORD_BYTES], &rhs);
}

/// `dst[dst_off] = dst[dst_off] + src[src_off] (mod 2^32)` across two buffers.
///
/// # Panics
/// If either word does not lie entirely within its buffer.
#[inline]
pub fn add32_from(dst: &mut [u8], dst_off: usize, src: &[u8], src_off: usize) {
    let rhs = load(src, src_off);
    add_word(&mut dst[dst_off..dst_off + WORD_BYTES], &rhs);
}

/// `buf[dst] = buf[dst] ^ buf[src]`.
///
/// `dst` and `src` may be equal, which clears the word.
///
/// # Panics
/// If either word does not lie entirely within `buf`.
#[inline]
pub fn xor32(buf: &mut [u8], dst: usize, src: usize) {
    let rhs = load(buf, src);
    xor_word(&mut buf[dst..dst + WORD_BYTES], &rhs);
}

/// `dst[dst_off] = dst[dst_off] ^ src[src_off]` across two buffers.
///
/// # Panics
/// If either word does not lie entirely within its buffer.
#[inline]
pub fn xor32_from(dst: &mut [u8], dst_off: usize, src: &[u8], src_off: usize) {
    let rhs = load(src, src_off);
    xor_word(&mut dst[dst_off..dst_off + WORD_BYTES], &rhs);
}

/// Rotate the word at `offset` left by `n` bits, in place.
///
/// `n` is taken modulo 32.
///
/// # Panics
/// If the word does not lie entirely within `buf`.
#[inline]
pub fn rotl32(buf: &mut [u8], offset: usize, n: u8) {
    let word = load(buf, offset);
    let n = n % 32;
    let bytes = usize::from(n / 8);
    let bits = n % 8;

    // Byte `i` of the result is byte `i - bytes` of the input, since byte 0
    // is the least significant.
    let mut rotated = [0u8; WORD_BYTES];
    for i in 0..WORD_BYTES {
        rotated[i] = word[(i + WORD_BYTES - bytes) % WORD_BYTES];
    }

    let out = &mut buf[offset..offset + WORD_BYTES];
    if bits == 0 {
        out.copy_from_slice(&rotated);
        return;
    }
    for i in 0..WORD_BYTES {
        let lower = rotated[(i + WORD_BYTES - 1) % WORD_BYTES];
        out[i] = (rotated[i] << bits) | (lower >> (8 - bits));
    }
}

/// Add one to the word at `offset`, wrapping at 2^32.
///
/// # Panics
/// If the word does not lie entirely within `buf`.
#[inline]
pub fn increment32(buf: &mut [u8], offset: usize) {
    add_word(&mut buf[offset..offset + WORD_BYTES], &[1, 0, 0, 0]);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [u32; 8] = [
        0,
        1,
        0xffff_ffff,
        0x8000_0000,
        0x0123_4567,
        0x89ab_cdef,
        0x7998_bfda,
        0xdead_beef,
    ];

    fn pair(a: u32, b: u32) -> [u8; 8] {
        let mut buf = [0u8; 8];
        buf[..4].copy_from_slice(&a.to_le_bytes());
        buf[4..].copy_from_slice(&b.to_le_bytes());
        buf
    }

    fn word_at(buf: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(load(buf, offset))
    }

    #[test]
    fn add32_matches_wrapping_add() {
        for &a in &SAMPLES {
            for &b in &SAMPLES {
                let mut buf = pair(a, b);
                add32(&mut buf, 0, 4);
                assert_eq!(word_at(&buf, 0), a.wrapping_add(b), "{a:#x} + {b:#x}");
                assert_eq!(word_at(&buf, 4), b);
            }
        }
    }

    #[test]
    fn add32_aliased_doubles() {
        let mut buf = pair(0x8000_0001, 0);
        add32(&mut buf, 0, 0);
        assert_eq!(word_at(&buf, 0), 2);
    }

    #[test]
    fn add32_from_other_buffer() {
        let mut dst = 0xffff_fffeu32.to_le_bytes();
        let src = pair(7, 3);
        add32_from(&mut dst, 0, &src, 4);
        assert_eq!(word_at(&dst, 0), 1);
    }

    #[test]
    fn xor32_round_trips() {
        for &a in &SAMPLES {
            for &b in &SAMPLES {
                let mut buf = pair(a, b);
                xor32(&mut buf, 0, 4);
                assert_eq!(word_at(&buf, 0), a ^ b);
                xor32(&mut buf, 0, 4);
                assert_eq!(word_at(&buf, 0), a);
            }
        }
    }

    #[test]
    fn xor32_from_other_buffer() {
        let mut dst = pair(0x0f0f_0f0f, 0x1234_5678);
        let src = pair(0, 0xffff_0000);
        xor32_from(&mut dst, 4, &src, 4);
        assert_eq!(word_at(&dst, 0), 0x0f0f_0f0f);
        assert_eq!(word_at(&dst, 4), 0xedcb_5678);
    }

    #[test]
    fn xor32_aliased_clears() {
        let mut buf = pair(0xdead_beef, 0);
        xor32(&mut buf, 0, 0);
        assert_eq!(word_at(&buf, 0), 0);
    }

    #[test]
    fn rotl32_matches_rotate_left() {
        for &x in &SAMPLES {
            for n in 0..32u8 {
                let mut buf = x.to_le_bytes();
                rotl32(&mut buf, 0, n);
                assert_eq!(word_at(&buf, 0), x.rotate_left(u32::from(n)), "{x:#x} <<< {n}");
            }
        }
    }

    #[test]
    fn rotl32_inverse() {
        for &x in &SAMPLES {
            for n in 0..32u8 {
                let mut buf = x.to_le_bytes();
                rotl32(&mut buf, 0, n);
                rotl32(&mut buf, 0, 32 - n);
                assert_eq!(word_at(&buf, 0), x);
            }
        }
    }

    #[test]
    fn rotl32_at_offset_leaves_neighbours() {
        let mut buf = [0xaau8; 12];
        buf[4..8].copy_from_slice(&0x0000_00ffu32.to_le_bytes());
        rotl32(&mut buf, 4, 12);
        assert_eq!(word_at(&buf, 4), 0x000f_f000);
        assert_eq!(buf[..4], [0xaa; 4]);
        assert_eq!(buf[8..], [0xaa; 4]);
    }

    #[test]
    fn increment32_wraps() {
        let mut buf = u32::MAX.to_le_bytes();
        increment32(&mut buf, 0);
        assert_eq!(buf, [0; 4]);

        let mut buf = 0x0000_00ffu32.to_le_bytes();
        increment32(&mut buf, 0);
        assert_eq!(word_at(&buf, 0), 0x100);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_offset_panics() {
        let mut buf = [0u8; 6];
        add32(&mut buf, 4, 0);
    }
}
