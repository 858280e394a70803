//! Fixed-length bit signatures compared by Hamming distance.

use std::fmt;

/// A perceptual hash: a bit vector packed into 64-bit words.
///
/// Ordering is only used to pick a canonical side when two fingerprint sets
/// are compared; it carries no visual meaning.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHash {
    bit_len: u32,
    words: Vec<u64>,
}

impl ImageHash {
    /// Pack a sequence of bits, first bit in the lowest position.
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut words = Vec::new();
        let mut bit_len = 0u32;
        for bit in bits {
            let word = (bit_len / 64) as usize;
            if word == words.len() {
                words.push(0u64);
            }
            if bit {
                words[word] |= 1 << (bit_len % 64);
            }
            bit_len += 1;
        }
        Self { bit_len, words }
    }

    /// Number of bits in the signature.
    pub fn bit_len(&self) -> u32 {
        self.bit_len
    }

    /// Hamming distance, or `None` when the signatures have different lengths.
    pub fn distance(&self, other: &Self) -> Option<u32> {
        if self.bit_len != other.bit_len {
            return None;
        }
        Some(
            self.words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| (a ^ b).count_ones())
                .sum(),
        )
    }

    /// Lowercase hex, 16 characters per word.
    pub fn to_hex(&self) -> String {
        self.words.iter().map(|w| format!("{w:016x}")).collect()
    }

    /// Parse a hex signature produced by [`to_hex`](Self::to_hex).
    ///
    /// Returns `None` if the string is malformed or does not hold exactly
    /// `bit_len` bits worth of words.
    pub fn from_hex(hex: &str, bit_len: u32) -> Option<Self> {
        let expected_words = bit_len.div_ceil(64) as usize;
        if bit_len == 0 || !hex.is_ascii() || hex.len() != expected_words * 16 {
            return None;
        }
        let words = (0..expected_words)
            .map(|i| u64::from_str_radix(&hex[i * 16..(i + 1) * 16], 16).ok())
            .collect::<Option<Vec<_>>>()?;

        // Bits past bit_len in the last word must be clear
        let spare = expected_words as u32 * 64 - bit_len;
        if spare > 0 {
            let last = *words.last()?;
            if last >> (64 - spare) != 0 {
                return None;
            }
        }
        Some(Self { bit_len, words })
    }
}

impl fmt::Debug for ImageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageHash({}b:{})", self.bit_len, self.to_hex())
    }
}
