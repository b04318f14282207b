//! Key hashing.
//!
//! Keys are hashed by their raw bytes. The bytes are first folded into a
//! single `u64` word, then the word is run through a [`KeyHasher`] to spread
//! its bits before the table reduces it to a slot index.
//!
//! None of the hashers here are DoS-resistant. They are deterministic so that
//! the removal path can recompute any record's home slot at any time.

/// Fold a key's bytes into a single word.
///
/// Keys of exactly 1, 2, 4 or 8 bytes are read directly as an unsigned
/// integer in native byte order. Any other length XORs together every whole
/// 8-byte chunk and then the remaining tail bytes, packed into the low end of
/// a zeroed word.
///
/// # Examples
///
/// ```rust
/// # use slot_table::hasher::fold_key;
/// #
/// assert_eq!(fold_key(&7u32.to_ne_bytes()), 7);
/// assert_eq!(fold_key(&[]), 0);
/// ```
#[inline]
pub fn fold_key(bytes: &[u8]) -> u64 {
    match *bytes {
        [b] => b as u64,
        [a, b] => u16::from_ne_bytes([a, b]) as u64,
        [a, b, c, d] => u32::from_ne_bytes([a, b, c, d]) as u64,
        [a, b, c, d, e, f, g, h] => u64::from_ne_bytes([a, b, c, d, e, f, g, h]),
        _ => {
            let chunks = bytes.chunks_exact(8);
            let tail = chunks.remainder();
            let mut word = chunks.fold(0u64, |acc, chunk| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                acc ^ u64::from_ne_bytes(buf)
            });
            if !tail.is_empty() {
                let mut buf = [0u8; 8];
                buf[..tail.len()].copy_from_slice(tail);
                word ^= u64::from_ne_bytes(buf);
            }
            word
        }
    }
}

/// The fixed 64-bit mixing function used by [`MixHasher`].
///
/// Three odd (prime) multipliers and an xor-shift give reasonable avalanche
/// for a single word: keys differing in a single bit land in unrelated slots.
#[inline(always)]
pub const fn mix64(mut word: u64) -> u64 {
    word ^= 0x7B5B_AD59_5E23_8E31;
    word = word.wrapping_mul(0x9A32_98AF_B5AC_7173);
    word ^= word >> 32;
    word = word.wrapping_mul(0x2E42_6101_834D_5517);
    word
}

/// Turns a folded key word into a well-distributed hash.
///
/// Implementations must be pure: the same word must always produce the same
/// hash for the lifetime of a table.
pub trait KeyHasher {
    /// Hash a folded key word.
    fn hash_word(&self, word: u64) -> u64;

    /// Fold `bytes` with [`fold_key`] and hash the result.
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        self.hash_word(fold_key(bytes))
    }
}

/// The default hasher: [`mix64`] applied to the folded key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MixHasher;

impl KeyHasher for MixHasher {
    #[inline(always)]
    fn hash_word(&self, word: u64) -> u64 {
        mix64(word)
    }
}

/// A fixed-seed [foldhash](https://docs.rs/foldhash) hasher.
///
/// Slower to set up per call than [`MixHasher`], but with better diffusion
/// for keys whose folded words differ only in high bits.
#[cfg(feature = "foldhash")]
#[derive(Debug, Clone)]
pub struct FoldHasher {
    state: foldhash::fast::FixedState,
}

#[cfg(feature = "foldhash")]
impl FoldHasher {
    /// Create a hasher with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: foldhash::fast::FixedState::with_seed(seed),
        }
    }
}

#[cfg(feature = "foldhash")]
impl Default for FoldHasher {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

#[cfg(feature = "foldhash")]
impl KeyHasher for FoldHasher {
    #[inline]
    fn hash_word(&self, word: u64) -> u64 {
        use core::hash::BuildHasher;

        self.state.hash_one(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_keys_are_read_directly() {
        assert_eq!(fold_key(&[0xAB]), 0xAB);
        assert_eq!(fold_key(&0xBEEFu16.to_ne_bytes()), 0xBEEF);
        assert_eq!(fold_key(&0xDEAD_BEEFu32.to_ne_bytes()), 0xDEAD_BEEF);
        assert_eq!(
            fold_key(&0x0123_4567_89AB_CDEFu64.to_ne_bytes()),
            0x0123_4567_89AB_CDEF
        );
    }

    #[test]
    fn wide_keys_fold_chunks_and_tail() {
        let a = 0x1111_2222_3333_4444u64;
        let b = 0x5555_6666_7777_8888u64;
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&a.to_ne_bytes());
        bytes[8..].copy_from_slice(&b.to_ne_bytes());
        assert_eq!(fold_key(&bytes), a ^ b);

        // 3 bytes: no whole chunk, only a tail packed into the low bytes.
        let mut expected = [0u8; 8];
        expected[..3].copy_from_slice(&[1, 2, 3]);
        assert_eq!(fold_key(&[1, 2, 3]), u64::from_ne_bytes(expected));

        // 12 bytes: one chunk plus a 4 byte tail.
        let mut twelve = [0u8; 12];
        twelve[..8].copy_from_slice(&a.to_ne_bytes());
        twelve[8..].copy_from_slice(&[9, 9, 9, 9]);
        let mut tail = [0u8; 8];
        tail[..4].copy_from_slice(&[9, 9, 9, 9]);
        assert_eq!(fold_key(&twelve), a ^ u64::from_ne_bytes(tail));
    }

    #[test]
    fn mix_is_deterministic_and_spreads_neighbours() {
        assert_eq!(mix64(42), mix64(42));
        assert_ne!(mix64(0), 0);

        // Neighbouring words should flip roughly half the output bits.
        let mut total = 0u32;
        for w in 0..1024u64 {
            total += (mix64(w) ^ mix64(w + 1)).count_ones();
        }
        let average = total / 1024;
        assert!((20..=44).contains(&average), "average flipped bits {average}");
    }

    #[test]
    fn neighbouring_keys_spread_over_slots() {
        let slots = 64u64;
        let mut seen = [false; 64];
        for k in 0..64u64 {
            seen[(MixHasher.hash_bytes(&k.to_ne_bytes()) % slots) as usize] = true;
        }
        let distinct = seen.iter().filter(|s| **s).count();
        assert!(distinct > 24, "only {distinct} distinct home slots");
    }

    #[cfg(feature = "foldhash")]
    #[test]
    fn fold_hasher_is_seeded_and_stable() {
        let a = FoldHasher::with_seed(1);
        let b = FoldHasher::with_seed(1);
        let c = FoldHasher::with_seed(2);
        assert_eq!(a.hash_word(99), b.hash_word(99));
        assert_ne!(a.hash_word(99), c.hash_word(99));
    }
}
