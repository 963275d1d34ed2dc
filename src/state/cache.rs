//! Validated per-configuration round memo.
//!
//! The first time a configuration is forced without moves, the resulting
//! `current` / `next` buffers are remembered. Every later round for the same
//! configuration is compared against that record instead of being trusted:
//! a mismatch means the net's incremental propagation disagrees with itself,
//! which points at a construction or pruning defect.
//!
//! Entries are written once and never invalidated; snapshots are immutable.

use rustc_hash::FxHashMap;

use super::bits::BitVector;
use super::configuration::Configuration;

/// The buffers produced by one propagation round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundRecord {
    /// Fully propagated `current` buffer.
    pub current: BitVector,
    /// `next` buffer after the round.
    pub next: BitVector,
}

/// Outcome of checking a round against the memo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheCheck {
    /// First sighting; the round was recorded.
    Recorded,
    /// Matched the recorded round.
    Verified,
    /// Differs from the recorded round.
    Mismatch,
    /// Not seen before and the memo is full; nothing recorded.
    Skipped,
}

/// Memo of rounds keyed by configuration.
#[derive(Debug, Default)]
pub struct RoundCache {
    rounds: FxHashMap<Configuration, RoundRecord>,
    capacity: usize,
    hits: u64,
}

impl RoundCache {
    /// Create a memo holding at most `capacity` configurations.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            rounds: FxHashMap::default(),
            capacity,
            hits: 0,
        }
    }

    /// Record the round for `config`, or compare it to the recorded one.
    pub fn check(&mut self, config: &Configuration, current: &BitVector, next: &BitVector) -> CacheCheck {
        if let Some(record) = self.rounds.get(config) {
            self.hits += 1;
            return if record.current == *current && record.next == *next {
                CacheCheck::Verified
            } else {
                CacheCheck::Mismatch
            };
        }

        if self.rounds.len() >= self.capacity {
            return CacheCheck::Skipped;
        }

        self.rounds.insert(
            config.clone(),
            RoundRecord {
                current: current.clone(),
                next: next.clone(),
            },
        );
        CacheCheck::Recorded
    }

    /// The recorded round for `config`, if any.
    #[must_use]
    pub fn get(&self, config: &Configuration) -> Option<&RoundRecord> {
        self.rounds.get(config)
    }

    /// Number of recorded configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Number of rounds compared against an existing record.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(len: usize, ones: &[usize]) -> BitVector {
        let mut b = BitVector::zeros(len);
        for &i in ones {
            b.insert(i);
        }
        b
    }

    #[test]
    fn test_record_then_verify() {
        let mut cache = RoundCache::new(8);
        let cfg = Configuration::from_bits(bits(3, &[1]));
        let cur = bits(10, &[1, 7]);
        let next = bits(10, &[2]);

        assert_eq!(cache.check(&cfg, &cur, &next), CacheCheck::Recorded);
        assert_eq!(cache.check(&cfg, &cur, &next), CacheCheck::Verified);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.get(&cfg).unwrap().current, cur);
    }

    #[test]
    fn test_mismatch_is_reported_and_record_kept() {
        let mut cache = RoundCache::new(8);
        let cfg = Configuration::from_bits(bits(3, &[0]));
        let cur = bits(10, &[0]);
        let next = bits(10, &[]);

        cache.check(&cfg, &cur, &next);
        let wrong = bits(10, &[0, 9]);
        assert_eq!(cache.check(&cfg, &wrong, &next), CacheCheck::Mismatch);
        assert_eq!(cache.get(&cfg).unwrap().current, cur);
    }

    #[test]
    fn test_capacity_limit() {
        let mut cache = RoundCache::new(1);
        let a = Configuration::from_bits(bits(2, &[0]));
        let b = Configuration::from_bits(bits(2, &[1]));
        let buf = bits(4, &[]);

        assert_eq!(cache.check(&a, &buf, &buf), CacheCheck::Recorded);
        assert_eq!(cache.check(&b, &buf, &buf), CacheCheck::Skipped);
        assert_eq!(cache.len(), 1);
    }
}
