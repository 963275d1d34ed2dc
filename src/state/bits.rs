//! Packed, fixed-length bit vector.
//!
//! Backs both the machine's `current` / `next` buffers and the immutable
//! `Configuration` snapshots. Bits past `len` are always zero so that the
//! derived `Eq` / `Hash` compare bit patterns only.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

const WORD_BITS: usize = 64;

/// Fixed-length vector of bits packed into `u64` words.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
}

impl BitVector {
    /// All-zero vector of `len` bits.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Number of bits.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the vector holds no bits.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read bit `i`.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len, "bit {} out of range {}", i, self.len);
        self.words[i / WORD_BITS] >> (i % WORD_BITS) & 1 == 1
    }

    /// Write bit `i`.
    #[inline]
    pub fn set(&mut self, i: usize, value: bool) {
        debug_assert!(i < self.len, "bit {} out of range {}", i, self.len);
        let mask = 1u64 << (i % WORD_BITS);
        if value {
            self.words[i / WORD_BITS] |= mask;
        } else {
            self.words[i / WORD_BITS] &= !mask;
        }
    }

    /// Set bit `i` to true.
    #[inline]
    pub fn insert(&mut self, i: usize) {
        self.set(i, true);
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True if no bit is set.
    #[must_use]
    pub fn none(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Copy of the first `len` bits.
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        assert!(len <= self.len, "prefix {} longer than vector {}", len, self.len);
        let mut words = self.words[..len.div_ceil(WORD_BITS)].to_vec();
        let tail = len % WORD_BITS;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
        Self { words, len }
    }

    /// Bits that differ between `self` and `other`, which must be the same length.
    #[must_use]
    pub fn difference(&self, other: &BitVector) -> Self {
        assert_eq!(self.len, other.len, "difference of mismatched vectors");
        Self {
            words: self.words.iter().zip(&other.words).map(|(a, b)| a ^ b).collect(),
            len: self.len,
        }
    }

    /// Iterate over the indices of set bits in ascending order.
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl<'de> Deserialize<'de> for BitVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            words: Vec<u64>,
            len: usize,
        }

        let Raw { words, len } = Raw::deserialize(deserializer)?;
        let expected = len.div_ceil(WORD_BITS);
        if words.len() != expected {
            return Err(D::Error::custom(format_args!(
                "{} bits need {} words, got {}",
                len,
                expected,
                words.len()
            )));
        }
        let tail = len % WORD_BITS;
        if tail != 0 && words.last().is_some_and(|&last| last >> tail != 0) {
            return Err(D::Error::custom(format_args!("bits set past length {}", len)));
        }
        Ok(Self { words, len })
    }
}

impl std::fmt::Display for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (n, i) in self.ones().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", i)?;
        }
        f.write_str("}")
    }
}

/// Iterator over set bits, produced by [`BitVector::ones`].
pub struct Ones<'a> {
    words: &'a [u64],
    index: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.index += 1;
            if self.index >= self.words.len() {
                return None;
            }
            self.current = self.words[self.index];
        }
        let bit = self.current.trailing_zeros() as usize;
        self.current &= self.current - 1;
        Some(self.index * WORD_BITS + bit)
    }
}
