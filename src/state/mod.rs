//! State representation: packed bits, configuration snapshots, round memo.

pub mod bits;
pub mod configuration;
pub mod cache;

pub use bits::BitVector;
pub use configuration::Configuration;
pub use cache::{CacheCheck, RoundCache, RoundRecord};
