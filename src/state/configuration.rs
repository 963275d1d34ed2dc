//! Game configuration snapshots.
//!
//! A `Configuration` is the truth assignment of every base proposition,
//! stored as a bit vector indexed by base slot. Base propositions occupy
//! slots `0..base_count` of the net, so the snapshot is exactly the low
//! bits of the machine's `next` buffer after a round.
//!
//! Snapshots are plain values: equality and hashing are by bit pattern and
//! they hold no reference to the net that produced them, so they can be
//! stored in transposition tables and shared between search threads.

use serde::{Deserialize, Serialize};

use super::bits::BitVector;

/// Immutable assignment of the base propositions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    bits: BitVector,
}

impl Configuration {
    /// Wrap a base-slot bit vector.
    #[must_use]
    pub fn from_bits(bits: BitVector) -> Self {
        Self { bits }
    }

    /// The underlying bits.
    #[must_use]
    pub fn bits(&self) -> &BitVector {
        &self.bits
    }

    /// Number of base slots covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True if the net has no base propositions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Whether the base proposition in `slot` holds.
    #[must_use]
    pub fn holds(&self, slot: usize) -> bool {
        self.bits.get(slot)
    }

    /// Slots of the base propositions that hold.
    pub fn true_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration{}", self.bits)
    }
}
